use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use crate::auth::password;
use crate::models::profile;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}

/// Create the first administrator profile when no profile exists yet.
pub async fn seed_admin(pool: &PgPool, username: &str, plain_password: &str) -> Result<(), String> {
    let count = profile::count(pool).await.map_err(|e| e.to_string())?;
    if count > 0 {
        log::info!("Profiles already present ({count}), skipping admin seed");
        return Ok(());
    }

    let hash = password::hash_password(plain_password)?;
    let id = profile::create(pool, username, &hash, profile::Role::Admin)
        .await
        .map_err(|e| e.to_string())?;
    log::info!("Seeded administrator profile '{username}' (id {id})");
    Ok(())
}
