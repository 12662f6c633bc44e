use actix_session::Session;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::auth::csrf;
use crate::auth::session::{require_admin_id, set_flash};
use crate::errors::{AppError, render};
use crate::handlers::auth_handlers::CsrfOnly;
use crate::models::grievance::{self, CommentAuthor, CommentForm, COMMENT_MAX};
use crate::templates_structs::{
    AdminContext, AdminGrievanceDetailTemplate, AdminGrievancesTemplate, ConfirmDeleteTemplate, SiteInfo,
};
use crate::validate::validate_required;

fn redirect(location: String) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .finish()
}

/// GET /admin/grievances
pub async fn list(
    pool: web::Data<PgPool>,
    session: Session,
    site: web::Data<SiteInfo>,
) -> Result<HttpResponse, AppError> {
    let ctx = AdminContext::build(&session, &site, "/admin/grievances")?;
    let grievances = grievance::find_all(&pool, None).await?;
    render(AdminGrievancesTemplate { ctx, grievances })
}

/// GET /admin/grievances/{id}
pub async fn detail(
    pool: web::Data<PgPool>,
    session: Session,
    site: web::Data<SiteInfo>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let grievance = grievance::find_by_id(&pool, id, None).await?.ok_or(AppError::NotFound)?;
    let ctx = AdminContext::build(&session, &site, "/admin/grievances")?;
    render(AdminGrievanceDetailTemplate { ctx, grievance })
}

/// GET /admin/grievances/{id}/delete
/// Confirmation step before the irreversible delete.
pub async fn confirm_delete(
    pool: web::Data<PgPool>,
    session: Session,
    site: web::Data<SiteInfo>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let grievance = grievance::find_by_id(&pool, id, None).await?.ok_or(AppError::NotFound)?;
    let ctx = AdminContext::build(&session, &site, "/admin/grievances")?;
    render(ConfirmDeleteTemplate { ctx, grievance })
}

/// POST /admin/grievances/{id}/delete
/// Removes likes, comments, then the grievance itself.
pub async fn delete(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    let actor_id = require_admin_id(&session)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = path.into_inner();

    match grievance::delete(&pool, id).await {
        Ok(true) => {
            let details = serde_json::json!({ "summary": format!("Deleted grievance #{id}") });
            let _ = crate::audit::log(&pool, actor_id, "grievance.deleted", "grievance", id, details).await;
            set_flash(&session, "Grievance deleted successfully");
        }
        Ok(false) => return Err(AppError::NotFound),
        Err(e) => {
            log::error!("Failed to delete grievance {id}: {e}");
            set_flash(&session, "Failed to delete grievance");
        }
    }
    Ok(redirect("/admin/grievances".to_string()))
}

/// POST /admin/grievances/{id}/comments
pub async fn add_comment(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<CommentForm>,
) -> Result<HttpResponse, AppError> {
    let actor_id = require_admin_id(&session)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = path.into_inner();

    if let Some(err) = validate_required(&form.text, "Comment", COMMENT_MAX) {
        set_flash(&session, &err);
        return Ok(redirect(format!("/admin/grievances/{id}")));
    }

    match grievance::add_comment(&pool, id, &form.text, CommentAuthor::Admin).await {
        Ok(Some(comment)) => {
            let details = serde_json::json!({
                "grievance_id": id,
                "summary": format!("Commented on grievance #{id}")
            });
            let _ = crate::audit::log(&pool, actor_id, "comment.created", "comment", comment.id, details).await;
            set_flash(&session, "Comment added successfully");
        }
        Ok(None) => return Err(AppError::NotFound),
        Err(e) => {
            log::error!("Failed to add admin comment on grievance {id}: {e}");
            set_flash(&session, "Failed to add comment");
        }
    }
    Ok(redirect(format!("/admin/grievances/{id}")))
}

/// POST /admin/grievances/{id}/comments/{comment_id}/delete
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<(i64, i64)>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    let actor_id = require_admin_id(&session)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let (id, comment_id) = path.into_inner();

    match grievance::delete_comment(&pool, id, comment_id).await {
        Ok(true) => {
            let details = serde_json::json!({
                "grievance_id": id,
                "summary": format!("Deleted comment #{comment_id} on grievance #{id}")
            });
            let _ = crate::audit::log(&pool, actor_id, "comment.deleted", "comment", comment_id, details).await;
            set_flash(&session, "Comment deleted successfully");
        }
        Ok(false) => return Err(AppError::NotFound),
        Err(e) => {
            log::error!("Failed to delete comment {comment_id}: {e}");
            set_flash(&session, "Failed to delete comment");
        }
    }
    Ok(redirect(format!("/admin/grievances/{id}")))
}
