use actix_session::Session;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::session::{get_profile_id, sign_in, sign_out};
use crate::auth::{csrf, password, rate_limit::LoginThrottle};
use crate::errors::{AppError, render};
use crate::models::profile::{self, Role};
use crate::templates_structs::{LoginTemplate, SiteInfo};

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

fn login_page_with(session: &Session, site: &SiteInfo, error: Option<&str>) -> Result<HttpResponse, AppError> {
    render(LoginTemplate {
        app_name: site.app_name.clone(),
        csrf_token: csrf::get_or_create_token(session),
        error: error.map(String::from),
    })
}

/// GET /admin/login
pub async fn login_page(session: Session, site: web::Data<SiteInfo>) -> Result<HttpResponse, AppError> {
    if get_profile_id(&session).is_some() {
        return Ok(HttpResponse::SeeOther()
            .insert_header(("Location", "/admin/grievances"))
            .finish());
    }
    login_page_with(&session, &site, None)
}

/// POST /admin/login
pub async fn login_submit(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    session: Session,
    site: web::Data<SiteInfo>,
    form: web::Form<LoginForm>,
    throttle: web::Data<LoginThrottle>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    // Throttle before any database access
    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED));

    if throttle.is_blocked(ip) {
        log::warn!("Admin sign-in blocked for {ip}");
        return login_page_with(&session, &site, Some("Too many failed attempts. Please try again later."));
    }

    let found = profile::find_by_username(&pool, &form.username).await?;
    let verified = match &found {
        Some(p) => password::verify_password(&form.password, &p.password_hash).unwrap_or_else(|e| {
            log::error!("Stored hash for profile {} is unreadable: {e}", p.id);
            false
        }),
        None => false,
    };

    match found {
        Some(p) if verified && p.role == Role::Admin => {
            throttle.clear(ip);
            sign_in(&session, &p)?;
            log::info!("Admin '{}' signed in", p.username);
            Ok(HttpResponse::SeeOther()
                .insert_header(("Location", "/admin/grievances"))
                .finish())
        }
        Some(p) if verified => {
            log::warn!("Profile '{}' is not an administrator", p.username);
            login_page_with(&session, &site, Some("This account does not have admin access."))
        }
        _ => {
            throttle.record_failure(ip);
            login_page_with(&session, &site, Some("Invalid username or password"))
        }
    }
}

/// POST /admin/logout
pub async fn logout(session: Session, form: web::Form<CsrfOnly>) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    sign_out(&session);
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/"))
        .finish())
}
