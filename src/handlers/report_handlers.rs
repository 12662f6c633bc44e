use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::csrf;
use crate::errors::{AppError, render};
use crate::models::report::{self, Agency, CrimeCategory, ReportErrors, ReportForm};
use crate::templates_structs::{
    AgencyReportsTemplate, PublicContext, ReportFormTemplate, ReportFormValues, ReportSubmittedTemplate,
    ReportsIndexTemplate, SiteInfo, TrackReportTemplate,
};
use crate::validate::MAX_PHOTO_BYTES;

#[derive(Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

#[derive(Deserialize)]
pub struct TrackQuery {
    pub track_id: Option<String>,
}

/// GET /reports
pub async fn index(session: Session, site: web::Data<SiteInfo>) -> Result<HttpResponse, AppError> {
    let ctx = PublicContext::build(&session, &site, "/reports");
    render(ReportsIndexTemplate { ctx, agencies: Agency::ALL.to_vec() })
}

fn form_template(
    ctx: PublicContext,
    category: CrimeCategory,
    values: ReportFormValues,
    errors: ReportErrors,
) -> ReportFormTemplate {
    ReportFormTemplate {
        ctx,
        category,
        categories: CrimeCategory::ALL.to_vec(),
        values,
        errors,
        max_photo_bytes: MAX_PHOTO_BYTES,
    }
}

/// GET /reports/new?category=government|civilian
pub async fn new_form(
    session: Session,
    site: web::Data<SiteInfo>,
    query: web::Query<CategoryQuery>,
) -> Result<HttpResponse, AppError> {
    let category = query
        .category
        .as_deref()
        .and_then(CrimeCategory::parse)
        .unwrap_or(CrimeCategory::Government);
    let ctx = PublicContext::build(&session, &site, "/reports/new");
    render(form_template(ctx, category, ReportFormValues::default(), ReportErrors::default()))
}

/// POST /reports
pub async fn create(
    pool: web::Data<PgPool>,
    session: Session,
    site: web::Data<SiteInfo>,
    form: web::Form<ReportForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let new = match form.validate() {
        Ok(new) => new,
        Err(errors) => {
            let category = form.category().unwrap_or(CrimeCategory::Government);
            let keep_image = errors.image.is_none();
            let ctx = PublicContext::build(&session, &site, "/reports/new");
            return render(form_template(ctx, category, ReportFormValues::from_form(&form, keep_image), errors));
        }
    };

    match report::create(&pool, &new).await {
        Ok(created) => {
            log::info!("Report {} submitted ({})", created.track_id, created.category.as_str());
            Ok(HttpResponse::SeeOther()
                .insert_header(("Location", format!("/reports/submitted/{}", created.track_id)))
                .finish())
        }
        Err(e) => {
            log::error!("Failed to save report: {e}");
            let ctx = PublicContext::build(&session, &site, "/reports/new");
            let errors = ReportErrors {
                general: Some("Something went wrong while submitting your report. Please try again.".to_string()),
                ..Default::default()
            };
            render(form_template(ctx, new.category, ReportFormValues::from_form(&form, true), errors))
        }
    }
}

/// GET /reports/submitted/{track_id}
pub async fn submitted(
    pool: web::Data<PgPool>,
    session: Session,
    site: web::Data<SiteInfo>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let report = report::find_by_track_id(&pool, &path).await?.ok_or(AppError::NotFound)?;
    let ctx = PublicContext::build(&session, &site, "/reports");
    render(ReportSubmittedTemplate { ctx, report })
}

/// GET /reports/{agency}
/// Only `ciaa` and `police` exist; any other segment is a 404.
pub async fn by_agency(
    pool: web::Data<PgPool>,
    session: Session,
    site: web::Data<SiteInfo>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let agency = Agency::from_segment(&path).ok_or(AppError::NotFound)?;
    let reports = report::find_by_category(&pool, agency.category()).await?;
    let ctx = PublicContext::build(&session, &site, "/reports");
    render(AgencyReportsTemplate { ctx, agency, reports })
}

/// GET /track?track_id=...
pub async fn track(
    pool: web::Data<PgPool>,
    session: Session,
    site: web::Data<SiteInfo>,
    query: web::Query<TrackQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner().track_id.unwrap_or_default().trim().to_string();
    let (searched, report) = if query.is_empty() {
        (false, None)
    } else {
        (true, report::find_by_track_id(&pool, &query).await?)
    };
    let ctx = PublicContext::build(&session, &site, "/track");
    render(TrackReportTemplate { ctx, query, searched, report })
}
