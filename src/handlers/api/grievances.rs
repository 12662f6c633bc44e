use actix_session::Session;
use actix_web::{http::StatusCode, web, HttpResponse};
use sqlx::PgPool;

use crate::auth::session::visitor_id;
use crate::errors::json_error;
use crate::models::grievance::{self, CommentAuthor, COMMENT_MAX};
use crate::templates_structs::{ApiCommentRequest, ApiCommentResponse, ApiLikeResponse};
use crate::validate::validate_required;

/// POST /api/grievances/{id}/like
/// Toggles the visitor's like. The client updates optimistically and reverts
/// when this returns an error.
pub async fn toggle_like(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
) -> HttpResponse {
    let id = path.into_inner();
    let visitor = visitor_id(&session);

    match grievance::toggle_like(&pool, id, &visitor).await {
        Ok(Some(toggle)) => HttpResponse::Ok().json(ApiLikeResponse::from(toggle)),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "Grievance not found"),
        Err(e) => {
            log::error!("Like toggle failed for grievance {id}: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Could not update like")
        }
    }
}

/// POST /api/grievances/{id}/comments
/// Returns the stored comment so the client can append it with its real id.
pub async fn add_comment(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    body: web::Json<ApiCommentRequest>,
) -> HttpResponse {
    let id = path.into_inner();

    if let Some(err) = validate_required(&body.text, "Comment", COMMENT_MAX) {
        return json_error(StatusCode::BAD_REQUEST, &err);
    }

    match grievance::add_comment(&pool, id, &body.text, CommentAuthor::Public).await {
        Ok(Some(comment)) => HttpResponse::Created().json(ApiCommentResponse::from(comment)),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "Grievance not found"),
        Err(e) => {
            log::error!("Comment failed for grievance {id}: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Could not post comment")
        }
    }
}
