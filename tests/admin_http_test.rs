//! Request-level tests against a real database: signed-in admin actions,
//! the admin gate, grievance submission and the JSON like endpoint.
//! Requires `TEST_DATABASE_URL`.

use actix_web::http::{StatusCode, header};
use actix_web::test;
use sqlx::PgPool;

use citizen_voice::auth::password;
use citizen_voice::models::grievance::{self, CommentAuthor};
use citizen_voice::models::profile::{self, Role};
use citizen_voice::models::report::{self, CrimeCategory, NewReport, ReportStatus};

mod common;
use common::{extract_csrf, setup_test_db, test_app};

const ADMIN: &str = "desk_admin";
const PASSWORD: &str = "correct-horse-42";

fn session_cookie<B>(resp: &actix_web::dev::ServiceResponse<B>) -> Option<String> {
    resp.response()
        .cookies()
        .find(|c| c.name() == "id")
        .map(|c| format!("id={}", c.value()))
}

async fn body_string<B: actix_web::body::MessageBody>(resp: actix_web::dev::ServiceResponse<B>) -> String {
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

fn location<B>(resp: &actix_web::dev::ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("location header")
        .to_string()
}

fn form_post(uri: &str, cookie: &str, fields: &[(&str, &str)]) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header((header::COOKIE, cookie.to_string()))
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload(serde_urlencoded::to_string(fields).expect("encode form"))
}

async fn seed_admin(pool: &PgPool) -> i64 {
    let hash = password::hash_password(PASSWORD).expect("hash");
    profile::create(pool, ADMIN, &hash, Role::Admin).await.expect("create admin")
}

fn government_report(image_url: Option<&str>) -> NewReport {
    NewReport {
        category: CrimeCategory::Government,
        subtype: "Bribery".to_string(),
        details: "The clerk asked for cash before stamping the land papers.".to_string(),
        district: "Bhaktapur".to_string(),
        local_address: "Durbar Square".to_string(),
        image_url: image_url.map(String::from),
    }
}

/// Seeds an administrator and signs in through the login form.
/// Yields the signed-in session cookie and its CSRF token.
macro_rules! sign_in_admin {
    ($app:expr, $pool:expr) => {{
        seed_admin($pool).await;
        let page = test::call_service(&$app, test::TestRequest::get().uri("/admin/login").to_request()).await;
        let cookie = session_cookie(&page).expect("login page cookie");
        let token = extract_csrf(&body_string(page).await);

        let resp = test::call_service(
            &$app,
            form_post(
                "/admin/login",
                &cookie,
                &[("username", ADMIN), ("password", PASSWORD), ("csrf_token", token.as_str())],
            )
            .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/admin/grievances");
        (session_cookie(&resp).expect("signed-in cookie"), token)
    }};
}

async fn audit_count(pool: &PgPool, action: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM audit_log WHERE action = $1")
        .bind(action)
        .fetch_one(pool)
        .await
        .expect("count audit rows")
}

#[actix_rt::test]
async fn test_signed_in_admin_reaches_dashboard() {
    let Some(db) = setup_test_db().await else { return };
    let app = test::init_service(test_app(db.pool().clone())).await;
    let (cookie, _) = sign_in_admin!(app, db.pool());

    let req = test::TestRequest::get()
        .uri("/admin/grievances")
        .insert_header((header::COOKIE, cookie))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains(ADMIN));
}

#[actix_rt::test]
async fn test_wrong_password_stays_on_login_page() {
    let Some(db) = setup_test_db().await else { return };
    seed_admin(db.pool()).await;
    let app = test::init_service(test_app(db.pool().clone())).await;

    let page = test::call_service(&app, test::TestRequest::get().uri("/admin/login").to_request()).await;
    let cookie = session_cookie(&page).expect("cookie");
    let token = extract_csrf(&body_string(page).await);

    let resp = test::call_service(
        &app,
        form_post(
            "/admin/login",
            &cookie,
            &[("username", ADMIN), ("password", "not-the-password"), ("csrf_token", token.as_str())],
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains("Invalid username or password"));
}

#[actix_rt::test]
async fn test_feedback_on_resolved_report_reopens_review() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();
    let app = test::init_service(test_app(pool.clone())).await;
    let (cookie, token) = sign_in_admin!(app, pool);

    let created = report::create(pool, &government_report(None)).await.expect("create");
    report::update_status(pool, created.id, ReportStatus::Resolved)
        .await
        .expect("update")
        .expect("exists");

    let uri = format!("/admin/reports/{}/feedback", created.id);
    let resp = test::call_service(
        &app,
        form_post(
            &uri,
            &cookie,
            &[("feedback", "Please tell us which office this happened in."), ("csrf_token", token.as_str())],
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), format!("/admin/reports/ciaa#report-{}", created.id));

    let found = report::find_by_id(pool, created.id).await.expect("find").expect("exists");
    assert_eq!(found.status, ReportStatus::UnderReview);
    assert_eq!(found.feedback.as_deref(), Some("Please tell us which office this happened in."));
    assert_eq!(found.feedback_by.as_deref(), Some("ICC"));
    assert_eq!(audit_count(pool, "report.feedback").await, 1);
}

#[actix_rt::test]
async fn test_status_update_is_stored_and_audited() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();
    let app = test::init_service(test_app(pool.clone())).await;
    let (cookie, token) = sign_in_admin!(app, pool);

    let created = report::create(pool, &government_report(None)).await.expect("create");
    let uri = format!("/admin/reports/{}/status", created.id);

    let resp = test::call_service(
        &app,
        form_post(&uri, &cookie, &[("status", "action_taken"), ("csrf_token", token.as_str())]).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let found = report::find_by_id(pool, created.id).await.expect("find").expect("exists");
    assert_eq!(found.status, ReportStatus::ActionTaken);
    assert_eq!(audit_count(pool, "report.status_updated").await, 1);

    // Unknown values leave the report untouched
    let resp = test::call_service(
        &app,
        form_post(&uri, &cookie, &[("status", "closed"), ("csrf_token", token.as_str())]).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let found = report::find_by_id(pool, created.id).await.expect("find").expect("exists");
    assert_eq!(found.status, ReportStatus::ActionTaken);
    assert_eq!(audit_count(pool, "report.status_updated").await, 1);
}

#[actix_rt::test]
async fn test_admin_deletes_grievance() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();
    let app = test::init_service(test_app(pool.clone())).await;
    let (cookie, token) = sign_in_admin!(app, pool);

    let id = grievance::create(pool, "Overflowing bins", "Bins on the corner are never emptied.", None)
        .await
        .expect("create");
    grievance::add_comment(pool, id, "Same on our street", CommentAuthor::Public)
        .await
        .expect("comment")
        .expect("grievance exists");

    let uri = format!("/admin/grievances/{id}/delete");
    let resp = test::call_service(
        &app,
        form_post(&uri, &cookie, &[("csrf_token", token.as_str())]).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/admin/grievances");

    assert!(grievance::find_by_id(pool, id, None).await.expect("find").is_none());
    assert!(grievance::find_comments(pool, id).await.expect("comments").is_empty());
    assert_eq!(audit_count(pool, "grievance.deleted").await, 1);
}

#[actix_rt::test]
async fn test_admin_comment_add_and_delete() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();
    let app = test::init_service(test_app(pool.clone())).await;
    let (cookie, token) = sign_in_admin!(app, pool);

    let id = grievance::create(pool, "Dark street", "The street lights have been out for a week.", None)
        .await
        .expect("create");

    let resp = test::call_service(
        &app,
        form_post(
            &format!("/admin/grievances/{id}/comments"),
            &cookie,
            &[("text", "A crew is scheduled for Friday."), ("csrf_token", token.as_str())],
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), format!("/admin/grievances/{id}"));

    let comments = grievance::find_comments(pool, id).await.expect("comments");
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].author, CommentAuthor::Admin);
    assert_eq!(comments[0].text, "A crew is scheduled for Friday.");

    let resp = test::call_service(
        &app,
        form_post(
            &format!("/admin/grievances/{id}/comments/{}/delete", comments[0].id),
            &cookie,
            &[("csrf_token", token.as_str())],
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(grievance::find_comments(pool, id).await.expect("comments").is_empty());
    assert_eq!(audit_count(pool, "comment.created").await, 1);
    assert_eq!(audit_count(pool, "comment.deleted").await, 1);
}

#[actix_rt::test]
async fn test_demoted_profile_is_signed_out() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();
    let app = test::init_service(test_app(pool.clone())).await;
    let (cookie, _) = sign_in_admin!(app, pool);

    sqlx::query("UPDATE profiles SET role = 'viewer' WHERE username = $1")
        .bind(ADMIN)
        .execute(pool)
        .await
        .expect("demote");

    let req = test::TestRequest::get()
        .uri("/admin/grievances")
        .insert_header((header::COOKIE, cookie))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
    // The purged session comes back as an emptied cookie
    assert_eq!(session_cookie(&resp).as_deref(), Some("id="));
}

#[actix_rt::test]
async fn test_report_images_render_as_thumbnails() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();
    let app = test::init_service(test_app(pool.clone())).await;
    let (cookie, _) = sign_in_admin!(app, pool);

    report::create(pool, &government_report(Some("data:image/png;base64,iVBORw0KGgo=")))
        .await
        .expect("create");

    let req = test::TestRequest::get()
        .uri("/admin/reports/ciaa")
        .insert_header((header::COOKIE, cookie))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains(r#"<img class="thumb" src="data:image"#));
    assert!(!html.contains(r#"href="data:"#));
}

#[actix_rt::test]
async fn test_grievance_submission_redirects_to_confirmation() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();
    let app = test::init_service(test_app(pool.clone())).await;

    let form = test::call_service(&app, test::TestRequest::get().uri("/grievances/new").to_request()).await;
    let cookie = session_cookie(&form).expect("cookie");
    let token = extract_csrf(&body_string(form).await);

    let resp = test::call_service(
        &app,
        form_post(
            "/grievances",
            &cookie,
            &[
                ("title", "Potholes on Ring Road"),
                ("description", "Several deep potholes near the bus stop."),
                ("photo_data_uri", ""),
                ("csrf_token", token.as_str()),
            ],
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let target = location(&resp);
    let id: i64 = target
        .strip_prefix("/grievances/")
        .and_then(|rest| rest.strip_suffix("/submitted"))
        .and_then(|id| id.parse().ok())
        .expect("confirmation path");
    let stored = grievance::find_by_id(pool, id, None).await.expect("find").expect("exists");
    assert_eq!(stored.title, "Potholes on Ring Road");
    assert!(stored.photo_url.is_none());

    let resp = test::call_service(&app, test::TestRequest::get().uri(&target).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains("Potholes on Ring Road"));
}

#[actix_rt::test]
async fn test_json_like_toggles_on_and_off() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();
    let app = test::init_service(test_app(pool.clone())).await;

    let id = grievance::create(pool, "Noisy generator", "Runs all night next to the school.", None)
        .await
        .expect("create");
    let uri = format!("/api/grievances/{id}/like");

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{}")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = session_cookie(&resp).expect("visitor cookie");
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, serde_json::json!({ "liked": true, "likes": 1 }));

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .insert_header((header::COOKIE, cookie))
        .set_payload("{}")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, serde_json::json!({ "liked": false, "likes": 0 }));

    assert_eq!(grievance::count_like_rows(pool, id).await.expect("count"), 0);
}
