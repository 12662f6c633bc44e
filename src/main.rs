use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, middleware, web};

use citizen_voice::auth::rate_limit::LoginThrottle;
use citizen_voice::config::AppConfig;
use citizen_voice::templates_structs::SiteInfo;
use citizen_voice::{db, routes};

fn fail(msg: String) -> std::io::Error {
    log::error!("{msg}");
    std::io::Error::other(msg)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env().map_err(fail)?;

    let pool = db::init_pool(&config.database_url, config.max_db_connections)
        .await
        .map_err(|e| fail(format!("Failed to connect to database: {e}")))?;
    db::run_migrations(&pool)
        .await
        .map_err(|e| fail(format!("Failed to run migrations: {e}")))?;
    db::seed_admin(&pool, &config.admin_username, &config.admin_password)
        .await
        .map_err(|e| fail(format!("Failed to seed admin profile: {e}")))?;

    let secret_key = config.session_key();
    let cookie_secure = config.cookie_secure;
    let site = web::Data::new(SiteInfo {
        recaptcha_site_key: config.recaptcha_site_key.clone(),
        ..SiteInfo::default()
    });
    let throttle = web::Data::new(LoginThrottle::default());
    let pool = web::Data::new(pool);

    log::info!("Starting server at http://{}", config.bind_addr);

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(pool.clone())
            .app_data(site.clone())
            .app_data(throttle.clone())
            .service(actix_files::Files::new("/static", "./static"))
            .configure(routes::configure)
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
