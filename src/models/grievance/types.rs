use serde::{Deserialize, Serialize};

use crate::display;

/// Who wrote a comment. Admin replies are shown with a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentAuthor {
    Public,
    Admin,
}

impl CommentAuthor {
    pub fn as_str(self) -> &'static str {
        match self {
            CommentAuthor::Public => "public",
            CommentAuthor::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Self {
        if s == "admin" { CommentAuthor::Admin } else { CommentAuthor::Public }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, CommentAuthor::Admin)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GrievanceComment {
    pub id: i64,
    pub grievance_id: i64,
    pub text: String,
    pub author: CommentAuthor,
    /// RFC 3339, UTC.
    pub created_at: String,
}

/// A grievance with its comment thread, as shown on the feed and the admin pages.
#[derive(Debug, Clone, Serialize)]
pub struct Grievance {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub photo_url: Option<String>,
    pub likes_count: i64,
    pub created_at: String,
    /// Oldest first.
    pub comments: Vec<GrievanceComment>,
    /// Whether the requesting visitor has a like row for this grievance.
    pub liked: bool,
}

impl GrievanceComment {
    pub fn age(&self) -> String {
        display::time_ago(&self.created_at)
    }

    pub fn created_label(&self) -> String {
        display::long_date(&self.created_at)
    }
}

impl Grievance {
    pub fn age(&self) -> String {
        display::time_ago(&self.created_at)
    }

    pub fn created_label(&self) -> String {
        display::long_date(&self.created_at)
    }

    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    /// Letter shown in the card avatar.
    pub fn initial(&self) -> String {
        self.title
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_else(|| "?".to_string())
    }
}

/// Outcome of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeToggle {
    pub liked: bool,
    pub likes: i64,
}

/// Form input for submitting a grievance.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GrievanceForm {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub photo_data_uri: String,
    pub csrf_token: String,
}

/// Form input for a comment (public fallback form and admin replies).
#[derive(Debug, Clone, Deserialize)]
pub struct CommentForm {
    pub text: String,
    pub csrf_token: String,
}

pub const TITLE_MAX: usize = 200;
pub const DESCRIPTION_MAX: usize = 5000;
pub const COMMENT_MAX: usize = 2000;

/// Field-scoped validation errors for the grievance form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrievanceErrors {
    pub title: Option<String>,
    pub description: Option<String>,
    pub photo: Option<String>,
    /// Not tied to a field; set when the database write fails.
    pub general: Option<String>,
}

impl GrievanceErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.photo.is_none() && self.general.is_none()
    }
}

impl GrievanceForm {
    pub fn validate(&self) -> GrievanceErrors {
        GrievanceErrors {
            title: crate::validate::validate_required(&self.title, "Title", TITLE_MAX),
            description: crate::validate::validate_required(&self.description, "Description", DESCRIPTION_MAX),
            photo: crate::validate::validate_photo(&self.photo_data_uri),
            general: None,
        }
    }

    pub fn photo(&self) -> Option<&str> {
        let photo = self.photo_data_uri.trim();
        if photo.is_empty() { None } else { Some(photo) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, description: &str, photo: &str) -> GrievanceForm {
        GrievanceForm {
            title: title.into(),
            description: description.into(),
            photo_data_uri: photo.into(),
            csrf_token: String::new(),
        }
    }

    #[test]
    fn blank_title_and_description_are_field_errors() {
        let errors = form("", "  \n ", "").validate();
        assert_eq!(errors.title.as_deref(), Some("Title is required"));
        assert_eq!(errors.description.as_deref(), Some("Description is required"));
        assert!(errors.photo.is_none());
        assert!(!errors.is_empty());
    }

    #[test]
    fn valid_form_without_photo() {
        let f = form("Potholes on Main Street", "Road has been unsafe for 3 months", "");
        assert!(f.validate().is_empty());
        assert!(f.photo().is_none());
    }

    #[test]
    fn photo_errors_are_reported_on_the_photo_field() {
        let errors = form("t", "d", "data:image/png;base64,A").validate();
        assert!(errors.title.is_none());
        assert!(errors.photo.is_some());
    }

    #[test]
    fn initial_is_uppercased_first_letter() {
        let g = Grievance {
            id: 1,
            title: "water supply".into(),
            description: String::new(),
            photo_url: None,
            likes_count: 0,
            created_at: String::new(),
            comments: vec![],
            liked: false,
        };
        assert_eq!(g.initial(), "W");
        assert_eq!(g.comment_count(), 0);
    }
}
