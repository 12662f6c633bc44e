use serde::{Deserialize, Serialize};

use super::category::CrimeCategory;
use super::status::{ReportStatus, TimelineStep, timeline};
use crate::display;
use crate::validate::{validate_length, validate_photo, validate_required};

pub const DETAILS_MIN: usize = 20;
pub const DETAILS_MAX: usize = 5000;
pub const PLACE_MAX: usize = 200;
pub const FEEDBACK_MAX: usize = 5000;
/// Characters of `details` shown before "Read more".
pub const PREVIEW_LEN: usize = 100;

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub id: i64,
    pub track_id: String,
    pub category: CrimeCategory,
    pub subtype: String,
    pub details: String,
    pub district: String,
    pub local_address: String,
    pub image_url: Option<String>,
    pub status: ReportStatus,
    pub feedback: Option<String>,
    pub feedback_at: Option<String>,
    pub feedback_by: Option<String>,
    pub created_at: String,
}

impl Report {
    pub fn details_preview(&self) -> String {
        display::preview(&self.details, PREVIEW_LEN)
    }

    pub fn details_truncated(&self) -> bool {
        display::is_truncated(&self.details, PREVIEW_LEN)
    }

    pub fn timeline(&self) -> Vec<TimelineStep> {
        timeline(self.status)
    }

    pub fn created_date(&self) -> String {
        display::date_only(&self.created_at)
    }
}

/// Public report submission form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportForm {
    pub category: String,
    #[serde(default)]
    pub subtype: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub local_address: String,
    #[serde(default)]
    pub image_data_uri: String,
    pub csrf_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportErrors {
    pub category: Option<String>,
    pub subtype: Option<String>,
    pub details: Option<String>,
    pub district: Option<String>,
    pub local_address: Option<String>,
    pub image: Option<String>,
    pub general: Option<String>,
}

impl ReportErrors {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.subtype.is_none()
            && self.details.is_none()
            && self.district.is_none()
            && self.local_address.is_none()
            && self.image.is_none()
            && self.general.is_none()
    }
}

/// A report that passed validation, ready to insert.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub category: CrimeCategory,
    pub subtype: String,
    pub details: String,
    pub district: String,
    pub local_address: String,
    pub image_url: Option<String>,
}

impl ReportForm {
    pub fn category(&self) -> Option<CrimeCategory> {
        CrimeCategory::parse(&self.category)
    }

    pub fn validate(&self) -> Result<NewReport, ReportErrors> {
        let category = self.category();
        let subtype = self.subtype.trim();
        let errors = ReportErrors {
            category: category.is_none().then(|| "Choose a crime category".to_string()),
            subtype: match category {
                Some(c) if !c.is_valid_subtype(subtype) => Some("Choose a specific type of crime".to_string()),
                _ => None,
            },
            details: validate_length(&self.details, "Report details", DETAILS_MIN, DETAILS_MAX),
            district: validate_required(&self.district, "District", PLACE_MAX),
            local_address: validate_required(&self.local_address, "Local address", PLACE_MAX),
            image: validate_photo(&self.image_data_uri),
            general: None,
        };

        match category {
            Some(category) if errors.is_empty() => {
                let image = self.image_data_uri.trim();
                Ok(NewReport {
                    category,
                    subtype: subtype.to_string(),
                    details: self.details.trim().to_string(),
                    district: self.district.trim().to_string(),
                    local_address: self.local_address.trim().to_string(),
                    image_url: (!image.is_empty()).then(|| image.to_string()),
                })
            }
            _ => Err(errors),
        }
    }
}

/// Admin status-update form.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusForm {
    pub status: String,
    pub csrf_token: String,
}

/// Admin feedback form.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackForm {
    pub feedback: String,
    pub csrf_token: String,
}

/// Result of an admin status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Unchanged,
    Updated { from: ReportStatus, to: ReportStatus },
}
