//! Shared test infrastructure.
//!
//! Database tests need a reachable Postgres server named by
//! `TEST_DATABASE_URL`. Each test gets a freshly created database with all
//! migrations applied; when the variable is unset the test is skipped.
//! Dropping the [`TestDb`] drops the database again.
//!
//! HTTP tests that never touch the database use [`lazy_pool`], which does not
//! connect until a query runs.

#![allow(dead_code)]

use std::str::FromStr;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{web, App};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};

use citizen_voice::auth::rate_limit::LoginThrottle;
use citizen_voice::db::MIGRATOR;
use citizen_voice::routes;
use citizen_voice::templates_structs::SiteInfo;

pub struct TestDb {
    pool: PgPool,
    server: PgConnectOptions,
    pub name: String,
}

impl TestDb {
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Connection options for the database named by `TEST_DATABASE_URL`.
    pub fn server_options(&self) -> &PgConnectOptions {
        &self.server
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        // The test runtime may be single-threaded, so the DROP runs on its own
        // runtime in a helper thread. FORCE ends the pool's open sessions.
        let server = self.server.clone();
        let name = std::mem::take(&mut self.name);
        let outcome = std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| e.to_string())?;
            rt.block_on(async move {
                let mut admin = server.connect().await?;
                sqlx::query(&format!("DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE)"))
                    .execute(&mut admin)
                    .await?;
                Ok::<_, sqlx::Error>(())
            })
            .map_err(|e| e.to_string())
        })
        .join();

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => eprintln!("failed to drop test database: {e}"),
            Err(_) => eprintln!("test database cleanup thread panicked"),
        }
    }
}

/// Create an isolated database for one test. `None` when no server is configured.
pub async fn setup_test_db() -> Option<TestDb> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping database test");
        return None;
    };

    let admin_opts = PgConnectOptions::from_str(&url).expect("parse TEST_DATABASE_URL");
    let mut admin = admin_opts.connect().await.expect("connect to test server");

    let name = format!("citizen_voice_test_{}", citizen_voice::auth::csrf::random_hex(6));
    sqlx::query(&format!("CREATE DATABASE \"{name}\""))
        .execute(&mut admin)
        .await
        .expect("create test database");

    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect_with(admin_opts.clone().database(&name))
        .await
        .expect("connect to test database");
    MIGRATOR.run(&pool).await.expect("run migrations");

    Some(TestDb { pool, server: admin_opts, name })
}

/// A pool that never connects unless a query is issued.
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(std::time::Duration::from_millis(200))
        .connect_lazy("postgres://nobody@127.0.0.1:1/none")
        .expect("lazy pool")
}

/// The full application wired the way `main` wires it.
pub fn test_app(
    pool: PgPool,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(
            SessionMiddleware::builder(CookieSessionStore::default(), Key::from(&[7u8; 64]))
                .cookie_secure(false)
                .build(),
        )
        .app_data(web::Data::new(pool))
        .app_data(web::Data::new(SiteInfo::default()))
        .app_data(web::Data::new(LoginThrottle::default()))
        .configure(routes::configure)
}

/// Pull the CSRF token out of a rendered page.
pub fn extract_csrf(html: &str) -> String {
    let re = regex::Regex::new(r#"name="csrf_token" value="([0-9a-f]+)""#).expect("regex");
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .expect("csrf token in page")
}
