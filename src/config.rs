use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

use crate::model::jam_settings::SettingsPolicy;

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub database_url: String,
    /// privileged connection for writes; defaults to `database_url`
    pub database_admin_url: String,
    pub jwt_secret: String,
    pub access_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    // Photo storage
    pub storage_url: String,
    pub storage_service_key: String,
    pub photo_bucket: String,

    pub settings_policy: SettingsPolicy,
    pub require_location: bool,
    pub location_ttl_secs: u64,
    pub run_migrations: bool,
    pub log_dir: String,
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn parsed_or<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{key}={raw:?} is invalid: {e}"))
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let database_url = required("DATABASE_URL")?;

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_admin_url: env::var("DATABASE_ADMIN_URL")
                .unwrap_or_else(|_| database_url.clone()),
            database_url,
            jwt_secret: required("JWT_SECRET")?,
            access_token_ttl: parsed_or("ACCESS_TOKEN_TTL", "28800")?, // default 8 hours

            rate_login_per_min: parsed_or("RATE_LOGIN_PER_MIN", "60")?,
            rate_protected_per_min: parsed_or("RATE_PROTECTED_PER_MIN", "1000")?,

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            storage_url: required("STORAGE_URL")?,
            storage_service_key: required("STORAGE_SERVICE_KEY")?,
            photo_bucket: env::var("PHOTO_BUCKET").unwrap_or_else(|_| "photos".to_string()),

            settings_policy: parsed_or("SETTINGS_POLICY", "append")?,
            require_location: parsed_or("REQUIRE_LOCATION", "true")?,
            location_ttl_secs: parsed_or("LOCATION_TTL_SECS", "600")?,
            run_migrations: parsed_or("RUN_MIGRATIONS", "false")?,
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
        })
    }
}

#[cfg(test)]
impl Config {
    /// Configuration for handler tests; nothing here touches the network.
    pub fn for_tests() -> Self {
        Self {
            server_addr: "127.0.0.1:0".into(),
            database_url: "mysql://localhost/absensi".into(),
            database_admin_url: "mysql://localhost/absensi".into(),
            jwt_secret: "test-secret".into(),
            access_token_ttl: 3600,
            rate_login_per_min: 1000,
            rate_protected_per_min: 1000,
            api_prefix: "/api".into(),
            storage_url: "https://storage.test".into(),
            storage_service_key: "service-key".into(),
            photo_bucket: "photos".into(),
            settings_policy: SettingsPolicy::Append,
            require_location: true,
            location_ttl_secs: 600,
            run_migrations: false,
            log_dir: "logs".into(),
        }
    }
}
