use actix_session::Session;

use crate::auth::csrf;
use crate::errors::AppError;
use crate::models::profile::{Profile, Role};

const PROFILE_ID: &str = "profile_id";
const USERNAME: &str = "username";
const ROLE: &str = "role";
const VISITOR_ID: &str = "visitor_id";
const FLASH: &str = "flash";

pub fn get_profile_id(session: &Session) -> Option<i64> {
    session.get::<i64>(PROFILE_ID).unwrap_or(None)
}

pub fn get_username(session: &Session) -> Option<String> {
    session.get::<String>(USERNAME).unwrap_or(None)
}

pub fn get_role(session: &Session) -> Option<Role> {
    session
        .get::<String>(ROLE)
        .unwrap_or(None)
        .and_then(|r| Role::parse(&r))
}

/// Store the signed-in profile. The session id is renewed to avoid fixation.
pub fn sign_in(session: &Session, profile: &Profile) -> Result<(), AppError> {
    session.renew();
    session
        .insert(PROFILE_ID, profile.id)
        .and_then(|_| session.insert(USERNAME, &profile.username))
        .and_then(|_| session.insert(ROLE, profile.role.as_str()))
        .map_err(|e| AppError::Session(e.to_string()))
}

pub fn sign_out(session: &Session) {
    session.purge();
}

/// Profile id of the signed-in administrator, for audit entries.
pub fn require_admin_id(session: &Session) -> Result<i64, AppError> {
    match (get_profile_id(session), get_role(session)) {
        (Some(id), Some(Role::Admin)) => Ok(id),
        (Some(_), _) => Err(AppError::PermissionDenied("admin".to_string())),
        (None, _) => Err(AppError::Session("Not signed in".to_string())),
    }
}

/// Anonymous identity used for likes. Created on first use and kept for the session lifetime.
pub fn visitor_id(session: &Session) -> String {
    if let Ok(Some(id)) = session.get::<String>(VISITOR_ID) {
        return id;
    }
    let id = csrf::random_hex(16);
    let _ = session.insert(VISITOR_ID, &id);
    id
}

/// Like `visitor_id` but never creates one; read-only pages use this.
pub fn existing_visitor_id(session: &Session) -> Option<String> {
    session.get::<String>(VISITOR_ID).unwrap_or(None)
}

pub fn set_flash(session: &Session, message: &str) {
    let _ = session.insert(FLASH, message);
}

pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>(FLASH).unwrap_or(None);
    if flash.is_some() {
        session.remove(FLASH);
    }
    flash
}
