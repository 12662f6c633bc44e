use actix_session::SessionExt;
use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web,
};
use sqlx::PgPool;

use crate::auth::session;
use crate::models::profile::{self, Role};

/// Gate for every `/admin` route.
///
/// The session must carry a profile id, and that profile must still exist with
/// the `admin` role in `profiles`. Anything else is redirected to the home page.
pub async fn require_admin(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let sess = req.get_session();
    let allowed = match session::get_profile_id(&sess) {
        None => false,
        Some(profile_id) => match req.app_data::<web::Data<PgPool>>() {
            Some(pool) => match profile::find_role(pool.get_ref(), profile_id).await {
                Ok(Some(Role::Admin)) => true,
                Ok(_) => {
                    log::warn!("Profile {profile_id} denied admin access");
                    sess.purge();
                    false
                }
                Err(e) => {
                    log::error!("Role lookup failed for profile {profile_id}: {e}");
                    false
                }
            },
            None => {
                log::error!("No database pool registered; denying admin access");
                false
            }
        },
    };

    if !allowed {
        let response = HttpResponse::SeeOther()
            .insert_header(("Location", "/"))
            .finish();
        return Ok(req.into_response(response).map_into_right_body());
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}
