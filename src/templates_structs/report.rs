use askama::Template;

use crate::models::report::{Agency, CrimeCategory, Report, ReportErrors, ReportForm};
use super::PublicContext;

#[derive(Template)]
#[template(path = "reports/index.html")]
pub struct ReportsIndexTemplate {
    pub ctx: PublicContext,
    pub agencies: Vec<Agency>,
}

#[derive(Debug, Clone, Default)]
pub struct ReportFormValues {
    pub subtype: String,
    pub details: String,
    pub district: String,
    pub local_address: String,
    pub image: Option<String>,
}

impl ReportFormValues {
    pub fn from_form(form: &ReportForm, keep_image: bool) -> Self {
        let image = form.image_data_uri.trim();
        Self {
            subtype: form.subtype.trim().to_string(),
            details: form.details.clone(),
            district: form.district.clone(),
            local_address: form.local_address.clone(),
            image: (keep_image && !image.is_empty()).then(|| image.to_string()),
        }
    }
}

#[derive(Template)]
#[template(path = "reports/form.html")]
pub struct ReportFormTemplate {
    pub ctx: PublicContext,
    pub category: CrimeCategory,
    pub categories: Vec<CrimeCategory>,
    pub values: ReportFormValues,
    pub errors: ReportErrors,
    pub max_photo_bytes: usize,
}

impl ReportFormTemplate {
    /// The selected subtype, defaulting to the first option.
    pub fn is_selected(&self, subtype: &str) -> bool {
        if self.values.subtype.is_empty() {
            self.category.subtypes().first() == Some(&subtype)
        } else {
            self.values.subtype == subtype
        }
    }
}

#[derive(Template)]
#[template(path = "reports/submitted.html")]
pub struct ReportSubmittedTemplate {
    pub ctx: PublicContext,
    pub report: Report,
}

#[derive(Template)]
#[template(path = "reports/agency.html")]
pub struct AgencyReportsTemplate {
    pub ctx: PublicContext,
    pub agency: Agency,
    pub reports: Vec<Report>,
}

#[derive(Template)]
#[template(path = "reports/track.html")]
pub struct TrackReportTemplate {
    pub ctx: PublicContext,
    pub query: String,
    pub searched: bool,
    pub report: Option<Report>,
}
