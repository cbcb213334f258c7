use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Runtime configuration, loaded once at startup.
///
/// `DATABASE_URL` is the only required variable; everything else has a
/// sensible default so the service boots in development with a bare env.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Vendor endpoint returning short-lived TURN relay credentials.
    /// When unset the TURN proxy always answers with an empty server list.
    pub turn_api_url: Option<String>,
    pub turn_api_key: Option<String>,
    /// Hard bound on the single outbound vendor request.
    pub turn_fetch_timeout: Duration,
    /// `max-age` advertised to clients on a non-empty credential response.
    pub turn_cache_max_age: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, crate::error::AppError> {
        dotenv().ok();
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| crate::error::AppError::Config("DATABASE_URL missing".into()))?;
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let turn_api_url = env::var("TURN_API_URL").ok().filter(|s| !s.is_empty());
        let turn_api_key = env::var("TURN_API_KEY").ok().filter(|s| !s.is_empty());
        let turn_fetch_timeout_ms = env::var("TURN_FETCH_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5_000);
        let turn_cache_max_age = env::var("TURN_CACHE_MAX_AGE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(300);

        Ok(Self {
            database_url,
            port,
            turn_api_url,
            turn_api_key,
            turn_fetch_timeout: Duration::from_millis(turn_fetch_timeout_ms),
            turn_cache_max_age,
        })
    }
}
