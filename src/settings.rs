use crate::common::env::FromEnv;
use std::ops::Deref;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::Level;

const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_DB_WAIT_TIMEOUT_SECS: u64 = 5;

pub struct AppSettings {
    pub level: Level,

    pub database_url: String,
    pub db_max_connections: u32,
    pub db_wait_timeout: Duration,
}

impl AppSettings {
    pub fn load_from_env() -> anyhow::Result<Self> {
        let _ = dotenv::dotenv();

        let level = Level::from_env_or("LOG_LEVEL", Level::INFO)?;

        let database_url = String::from_env("DATABASE_URL")?;
        let db_max_connections =
            u32::from_env_or("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?;
        let db_wait_timeout_secs =
            u64::from_env_or("DB_WAIT_TIMEOUT_SECS", DEFAULT_DB_WAIT_TIMEOUT_SECS)?;
        let db_wait_timeout = Duration::from_secs(db_wait_timeout_secs);

        Ok(AppSettings {
            level,

            database_url,
            db_max_connections,
            db_wait_timeout,
        })
    }

    pub fn get() -> &'static AppSettings {
        settings()
    }
}

pub fn settings() -> &'static AppSettings {
    static SETTINGS: LazyLock<AppSettings> =
        LazyLock::new(|| AppSettings::load_from_env().expect("Failed to load settings"));
    SETTINGS.deref()
}
