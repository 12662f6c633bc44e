use actix_web::{web, HttpResponse};

use crate::auth::middleware::require_admin;
use crate::errors::AppError;
use crate::handlers::{
    admin_grievance_handlers, admin_report_handlers, api, audit_handlers, auth_handlers, grievance_handlers,
    report_handlers,
};

/// Largest accepted form body: a 4 MiB photo grows by a third as base64.
pub const FORM_LIMIT: usize = 8 * 1024 * 1024;
pub const JSON_LIMIT: usize = 64 * 1024;

fn redirect_to(location: &'static str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .finish()
}

/// Every route of the application. Shared by `main` and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::FormConfig::default().limit(FORM_LIMIT))
        .app_data(web::JsonConfig::default().limit(JSON_LIMIT))
        .route("/", web::get().to(|| async { redirect_to("/grievances") }))
        // Grievances: /grievances/new BEFORE /grievances/{id}
        .route("/grievances", web::get().to(grievance_handlers::feed))
        .route("/grievances/new", web::get().to(grievance_handlers::new_form))
        .route("/grievances", web::post().to(grievance_handlers::create))
        .route("/grievances/{id}/submitted", web::get().to(grievance_handlers::submitted))
        .route("/grievances/{id}/like", web::post().to(grievance_handlers::like))
        .route("/grievances/{id}/comments", web::post().to(grievance_handlers::comment))
        // Reports: fixed segments BEFORE /reports/{agency}
        .route("/reports", web::get().to(report_handlers::index))
        .route("/reports/new", web::get().to(report_handlers::new_form))
        .route("/reports", web::post().to(report_handlers::create))
        .route("/reports/submitted/{track_id}", web::get().to(report_handlers::submitted))
        .route("/reports/{agency}", web::get().to(report_handlers::by_agency))
        .route("/track", web::get().to(report_handlers::track))
        // JSON endpoints for the feed script
        .service(web::scope("/api").configure(api::configure))
        // Admin sign-in sits outside the gate
        .route("/admin/login", web::get().to(auth_handlers::login_page))
        .route("/admin/login", web::post().to(auth_handlers::login_submit))
        .service(
            web::scope("/admin")
                .wrap(actix_web::middleware::from_fn(require_admin))
                .route("", web::get().to(|| async { redirect_to("/admin/grievances") }))
                .route("/logout", web::post().to(auth_handlers::logout))
                .route("/grievances", web::get().to(admin_grievance_handlers::list))
                .route("/grievances/{id}", web::get().to(admin_grievance_handlers::detail))
                .route("/grievances/{id}/delete", web::get().to(admin_grievance_handlers::confirm_delete))
                .route("/grievances/{id}/delete", web::post().to(admin_grievance_handlers::delete))
                .route("/grievances/{id}/comments", web::post().to(admin_grievance_handlers::add_comment))
                .route(
                    "/grievances/{id}/comments/{comment_id}/delete",
                    web::post().to(admin_grievance_handlers::delete_comment),
                )
                .route("/reports/{agency}", web::get().to(admin_report_handlers::list))
                .route("/reports/{id}/status", web::post().to(admin_report_handlers::update_status))
                .route("/reports/{id}/feedback", web::post().to(admin_report_handlers::submit_feedback))
                .route("/audit", web::get().to(audit_handlers::list)),
        )
        // Default 404 (must be registered last)
        .default_service(web::to(|| async { Err::<HttpResponse, _>(AppError::NotFound) }));
}
