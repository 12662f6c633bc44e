use actix_session::Session;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::errors::{AppError, render};
use crate::templates_structs::{AdminContext, AuditTemplate, SiteInfo};

const RECENT_LIMIT: i64 = 200;

/// GET /admin/audit
pub async fn list(
    pool: web::Data<PgPool>,
    session: Session,
    site: web::Data<SiteInfo>,
) -> Result<HttpResponse, AppError> {
    let ctx = AdminContext::build(&session, &site, "/admin/audit")?;
    let entries = crate::audit::recent(&pool, RECENT_LIMIT).await?;
    render(AuditTemplate { ctx, entries })
}
