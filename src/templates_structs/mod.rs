// Template context structures for askama templates, organized by area.

use actix_session::Session;

use crate::auth::csrf;
use crate::auth::session::{get_profile_id, get_username, take_flash};
use crate::errors::AppError;

mod admin;
mod api;
mod grievance;
mod report;

pub use admin::*;
pub use api::*;
pub use grievance::*;
pub use report::*;

/// Site-wide values shared by every page, registered once as app data.
#[derive(Debug, Clone)]
pub struct SiteInfo {
    pub app_name: String,
    /// Public key for the human-verification widget. Rendered only; never verified.
    pub recaptcha_site_key: Option<String>,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            app_name: "Citizen Voice".to_string(),
            recaptcha_site_key: None,
        }
    }
}

/// Context shared by all public pages.
pub struct PublicContext {
    pub app_name: String,
    pub csrf_token: String,
    pub flash: Option<String>,
    pub recaptcha_site_key: Option<String>,
    pub admin_signed_in: bool,
    pub current_path: String,
}

impl PublicContext {
    pub fn build(session: &Session, site: &SiteInfo, current_path: &str) -> Self {
        Self {
            app_name: site.app_name.clone(),
            csrf_token: csrf::get_or_create_token(session),
            flash: take_flash(session),
            recaptcha_site_key: site.recaptcha_site_key.clone(),
            admin_signed_in: get_profile_id(session).is_some(),
            current_path: current_path.to_string(),
        }
    }

    pub fn is_active(&self, prefix: &str) -> bool {
        self.current_path.starts_with(prefix)
    }
}

/// Context shared by all admin pages. Only built behind the admin gate.
pub struct AdminContext {
    pub app_name: String,
    pub username: String,
    pub avatar_initial: String,
    pub csrf_token: String,
    pub flash: Option<String>,
    pub current_path: String,
}

impl AdminContext {
    pub fn build(session: &Session, site: &SiteInfo, current_path: &str) -> Result<Self, AppError> {
        let username = get_username(session)
            .ok_or_else(|| AppError::Session("No username in session".to_string()))?;
        let avatar_initial = username.chars().next().unwrap_or('?').to_uppercase().to_string();
        Ok(Self {
            app_name: site.app_name.clone(),
            username,
            avatar_initial,
            csrf_token: csrf::get_or_create_token(session),
            flash: take_flash(session),
            current_path: current_path.to_string(),
        })
    }

    pub fn is_active(&self, prefix: &str) -> bool {
        self.current_path.starts_with(prefix)
    }
}
