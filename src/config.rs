use std::{env, fmt::Display, str::FromStr};

use actix_web::cookie::Key;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Runtime configuration, read once at startup from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub session_key: Option<String>,
    pub cookie_secure: bool,
    pub admin_username: String,
    pub admin_password: String,
    pub recaptcha_site_key: Option<String>,
    pub max_db_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        if let Err(e) = dotenvy::dotenv() {
            log::debug!("No .env file loaded: {e}");
        }

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "Environment variable 'DATABASE_URL' is not set".to_string())?;

        Ok(Self {
            database_url,
            bind_addr: try_load("BIND_ADDR", DEFAULT_BIND_ADDR),
            session_key: optional("SESSION_KEY"),
            cookie_secure: try_load("COOKIE_SECURE", "false"),
            admin_username: try_load("ADMIN_USERNAME", "admin"),
            admin_password: try_load("ADMIN_PASSWORD", "admin123"),
            recaptcha_site_key: optional("RECAPTCHA_SITE_KEY"),
            max_db_connections: try_load("MAX_DB_CONNECTIONS", "8"),
        })
    }

    /// Session encryption key. Needs 64+ bytes to persist sessions across restarts.
    pub fn session_key(&self) -> Key {
        match &self.session_key {
            Some(val) if val.len() >= 64 => {
                log::info!("Using SESSION_KEY from environment");
                Key::from(val.as_bytes())
            }
            Some(val) => {
                log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
                Key::generate()
            }
            None => {
                log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
                Key::generate()
            }
        }
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Parse `key` from the environment, falling back to `default` when unset or invalid.
fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        log::info!("{key} not set, using default: {default}");
        default.to_string()
    });
    parse_or_default(key, &raw, default)
}

fn parse_or_default<T: FromStr>(key: &str, raw: &str, default: &str) -> T
where
    T::Err: Display,
{
    match raw.trim().parse() {
        Ok(v) => v,
        Err(e) => {
            log::warn!("Invalid {key} value '{raw}': {e}, using default: {default}");
            match default.parse() {
                Ok(v) => v,
                Err(e) => panic!("default for {key} does not parse: {e}"),
            }
        }
    }
}
