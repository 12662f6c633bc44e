use actix_session::Session;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::auth::csrf;
use crate::auth::session::{existing_visitor_id, set_flash, visitor_id};
use crate::errors::{AppError, render};
use crate::handlers::auth_handlers::CsrfOnly;
use crate::models::grievance::{self, CommentAuthor, CommentForm, GrievanceErrors, GrievanceForm, COMMENT_MAX};
use crate::templates_structs::{
    GrievanceFeedTemplate, GrievanceFormTemplate, GrievanceFormValues, GrievanceSubmittedTemplate,
    PublicContext, SiteInfo,
};
use crate::validate::{validate_required, MAX_PHOTO_BYTES};

/// GET /grievances
/// Public feed, newest first.
pub async fn feed(
    pool: web::Data<PgPool>,
    session: Session,
    site: web::Data<SiteInfo>,
) -> Result<HttpResponse, AppError> {
    let visitor = existing_visitor_id(&session);
    let ctx = PublicContext::build(&session, &site, "/grievances");

    let (grievances, load_error) = match grievance::find_all(&pool, visitor.as_deref()).await {
        Ok(list) => (list, None),
        Err(e) => {
            log::error!("Failed to load grievances: {e}");
            (vec![], Some("Failed to load grievances. Please try again later.".to_string()))
        }
    };

    render(GrievanceFeedTemplate { ctx, grievances, load_error })
}

/// GET /grievances/new
pub async fn new_form(
    session: Session,
    site: web::Data<SiteInfo>,
) -> Result<HttpResponse, AppError> {
    let ctx = PublicContext::build(&session, &site, "/grievances/new");
    render(GrievanceFormTemplate {
        ctx,
        values: GrievanceFormValues::default(),
        errors: GrievanceErrors::default(),
        max_photo_bytes: MAX_PHOTO_BYTES,
    })
}

/// POST /grievances
/// Validates before touching the database. On a database failure the form is
/// shown again with everything the visitor entered.
pub async fn create(
    pool: web::Data<PgPool>,
    session: Session,
    site: web::Data<SiteInfo>,
    form: web::Form<GrievanceForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let errors = form.validate();
    if !errors.is_empty() {
        let keep_photo = errors.photo.is_none();
        let ctx = PublicContext::build(&session, &site, "/grievances/new");
        return render(GrievanceFormTemplate {
            ctx,
            values: GrievanceFormValues::from_form(&form, keep_photo),
            errors,
            max_photo_bytes: MAX_PHOTO_BYTES,
        });
    }

    match grievance::create(&pool, &form.title, &form.description, form.photo()).await {
        Ok(id) => {
            log::info!("Grievance {id} submitted");
            Ok(HttpResponse::SeeOther()
                .insert_header(("Location", format!("/grievances/{id}/submitted")))
                .finish())
        }
        Err(e) => {
            log::error!("Failed to save grievance: {e}");
            let ctx = PublicContext::build(&session, &site, "/grievances/new");
            render(GrievanceFormTemplate {
                ctx,
                values: GrievanceFormValues::from_form(&form, true),
                errors: GrievanceErrors {
                    general: Some("Something went wrong while submitting your grievance. Please try again.".to_string()),
                    ..Default::default()
                },
                max_photo_bytes: MAX_PHOTO_BYTES,
            })
        }
    }
}

/// GET /grievances/{id}/submitted
pub async fn submitted(
    pool: web::Data<PgPool>,
    session: Session,
    site: web::Data<SiteInfo>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let grievance = grievance::find_by_id(&pool, id, None).await?.ok_or(AppError::NotFound)?;
    let ctx = PublicContext::build(&session, &site, "/grievances");
    render(GrievanceSubmittedTemplate { ctx, grievance })
}

/// POST /grievances/{id}/like
/// Form fallback for browsers without JavaScript.
pub async fn like(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = path.into_inner();
    let visitor = visitor_id(&session);

    match grievance::toggle_like(&pool, id, &visitor).await {
        Ok(Some(_)) => {}
        Ok(None) => return Err(AppError::NotFound),
        Err(e) => {
            log::error!("Like toggle failed for grievance {id}: {e}");
            set_flash(&session, "Could not update your like. Please try again.");
        }
    }
    Ok(back_to_card(id))
}

/// POST /grievances/{id}/comments
/// Form fallback for browsers without JavaScript.
pub async fn comment(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<CommentForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = path.into_inner();

    if let Some(err) = validate_required(&form.text, "Comment", COMMENT_MAX) {
        set_flash(&session, &err);
        return Ok(back_to_card(id));
    }

    match grievance::add_comment(&pool, id, &form.text, CommentAuthor::Public).await {
        Ok(Some(_)) => {}
        Ok(None) => return Err(AppError::NotFound),
        Err(e) => {
            log::error!("Comment failed for grievance {id}: {e}");
            set_flash(&session, "Could not post your comment. Please try again.");
        }
    }
    Ok(back_to_card(id))
}

fn back_to_card(id: i64) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", format!("/grievances#grievance-{id}")))
        .finish()
}
