use askama::Template;

use crate::models::grievance::{Grievance, GrievanceErrors, GrievanceForm};
use super::PublicContext;

#[derive(Template)]
#[template(path = "grievances/feed.html")]
pub struct GrievanceFeedTemplate {
    pub ctx: PublicContext,
    pub grievances: Vec<Grievance>,
    pub load_error: Option<String>,
}

/// Values echoed back into the form after a failed submission.
#[derive(Debug, Clone, Default)]
pub struct GrievanceFormValues {
    pub title: String,
    pub description: String,
    /// Photo data URI; cleared when the photo itself was rejected.
    pub photo: Option<String>,
}

impl GrievanceFormValues {
    pub fn from_form(form: &GrievanceForm, keep_photo: bool) -> Self {
        Self {
            title: form.title.clone(),
            description: form.description.clone(),
            photo: if keep_photo { form.photo().map(String::from) } else { None },
        }
    }
}

#[derive(Template)]
#[template(path = "grievances/form.html")]
pub struct GrievanceFormTemplate {
    pub ctx: PublicContext,
    pub values: GrievanceFormValues,
    pub errors: GrievanceErrors,
    pub max_photo_bytes: usize,
}

#[derive(Template)]
#[template(path = "grievances/submitted.html")]
pub struct GrievanceSubmittedTemplate {
    pub ctx: PublicContext,
    pub grievance: Grievance,
}
