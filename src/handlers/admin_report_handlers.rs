use actix_session::Session;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::auth::csrf;
use crate::auth::session::{require_admin_id, set_flash};
use crate::errors::{AppError, render};
use crate::models::report::{self, Agency, FeedbackForm, ReportStatus, StatusChange, StatusForm, FEEDBACK_MAX};
use crate::templates_structs::{AdminContext, AdminReportsTemplate, SiteInfo};
use crate::validate::validate_required;

fn back_to(agency: Agency, report_id: i64) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", format!("/admin/reports/{}#report-{report_id}", agency.slug())))
        .finish()
}

/// GET /admin/reports/{agency}
/// Review table for one agency's category.
pub async fn list(
    pool: web::Data<PgPool>,
    session: Session,
    site: web::Data<SiteInfo>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let agency = Agency::from_segment(&path).ok_or(AppError::NotFound)?;
    let reports = report::find_by_category(&pool, agency.category()).await?;
    let ctx = AdminContext::build(&session, &site, &format!("/admin/reports/{}", agency.slug()))?;
    render(AdminReportsTemplate {
        ctx,
        agency,
        agencies: Agency::ALL.to_vec(),
        reports,
        statuses: ReportStatus::ALL.to_vec(),
    })
}

/// POST /admin/reports/{id}/status
pub async fn update_status(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<StatusForm>,
) -> Result<HttpResponse, AppError> {
    let actor_id = require_admin_id(&session)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let report_id = path.into_inner();

    let existing = report::find_by_id(&pool, report_id).await?.ok_or(AppError::NotFound)?;
    let agency = existing.category.agency();

    let Some(new_status) = ReportStatus::parse(&form.status) else {
        set_flash(&session, "Unknown status");
        return Ok(back_to(agency, report_id));
    };
    if !existing.status.can_transition(new_status) {
        set_flash(&session, "That status change is not allowed.");
        return Ok(back_to(agency, report_id));
    }

    match report::update_status(&pool, report_id, new_status).await {
        Ok(Some(StatusChange::Updated { from, to })) => {
            let details = serde_json::json!({
                "from": from.as_str(),
                "to": to.as_str(),
                "summary": format!("Report {} moved from {} to {}", existing.track_id, from.label(), to.label())
            });
            let _ = crate::audit::log(&pool, actor_id, "report.status_updated", "report", report_id, details).await;
            set_flash(&session, "Status updated successfully.");
        }
        Ok(Some(StatusChange::Unchanged)) => {
            set_flash(&session, "Status unchanged.");
        }
        Ok(None) => return Err(AppError::NotFound),
        Err(e) => {
            log::error!("Failed to update status of report {report_id}: {e}");
            set_flash(&session, "Failed to update status. Please try again.");
        }
    }
    Ok(back_to(agency, report_id))
}

/// POST /admin/reports/{id}/feedback
/// Stores the feedback and moves the report to `under_review`.
pub async fn submit_feedback(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<FeedbackForm>,
) -> Result<HttpResponse, AppError> {
    let actor_id = require_admin_id(&session)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let report_id = path.into_inner();

    let existing = report::find_by_id(&pool, report_id).await?.ok_or(AppError::NotFound)?;
    let agency = existing.category.agency();

    if let Some(err) = validate_required(&form.feedback, "Feedback", FEEDBACK_MAX) {
        set_flash(&session, &err);
        return Ok(back_to(agency, report_id));
    }

    match report::submit_feedback(&pool, report_id, &form.feedback, agency.feedback_role()).await {
        Ok(true) => {
            let details = serde_json::json!({
                "previous_status": existing.status.as_str(),
                "summary": format!("Feedback on report {}", existing.track_id)
            });
            let _ = crate::audit::log(&pool, actor_id, "report.feedback", "report", report_id, details).await;
            set_flash(&session, "Feedback submitted successfully.");
        }
        Ok(false) => return Err(AppError::NotFound),
        Err(e) => {
            log::error!("Failed to store feedback for report {report_id}: {e}");
            set_flash(&session, "Failed to submit feedback. Please try again.");
        }
    }
    Ok(back_to(agency, report_id))
}
