use chrono::TimeDelta;
use dotenv::dotenv;
use std::env;
use tracing::{info, warn};

const DEFAULT_DATABASE_URL: &str = "sqlite://society.db";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub max_connections: u32,
    pub session_ttl: TimeDelta,
    pub cors_origin: Option<String>,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    pub app_env: String,
}

impl Config {
    /// Load the configuration from the environment variables.
    /// Calls dotenv() automatically
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            warn!("DATABASE_URL not set, using {}", DEFAULT_DATABASE_URL);
            DEFAULT_DATABASE_URL.to_string()
        });

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| "Invalid SERVER_PORT: must be a number between 0-65535".to_string())?;

        let max_connections = env::var("MAX_DB_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .map_err(|_| "Invalid MAX_DB_CONNECTIONS: must be a positive number".to_string())?;

        let session_ttl = parse_session_ttl(
            &env::var("SESSION_TTL_SECS").unwrap_or_else(|_| "86400".to_string()),
        )?;

        let cors_origin = env::var("CORS_ORIGIN").ok().filter(|s| !s.is_empty());

        let admin_username = env::var("ADMIN_USERNAME").ok().filter(|s| !s.is_empty());
        let admin_password = env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty());
        if admin_username.is_some() != admin_password.is_some() {
            return Err("ADMIN_USERNAME and ADMIN_PASSWORD must be set together".to_string());
        }

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            database_url,
            server_host,
            server_port,
            max_connections,
            session_ttl,
            cors_origin,
            admin_username,
            admin_password,
            app_env,
        })
    }

    /// Log the configuration (hiding the secrets)
    pub fn print_info(&self) {
        info!("Server Configuration:");
        info!("  Environment: {}", self.app_env);
        info!("  Server Address: {}:{}", self.server_host, self.server_port);
        info!("  Database: {}", Self::mask_url(&self.database_url));
        info!("  Max DB Connections: {}", self.max_connections);
        info!("  Session TTL: {}s", self.session_ttl.num_seconds());
        info!(
            "  CORS Origin: {}",
            self.cors_origin.as_deref().unwrap_or("any")
        );
        info!(
            "  Bootstrap Admin: {}",
            self.admin_username.as_deref().unwrap_or("not configured")
        );
    }

    /// Mask the credentials of the database URL for logging
    fn mask_url(url: &str) -> String {
        if let Some(at_pos) = url.find('@') {
            if let Some(scheme_end) = url.find("://") {
                let scheme = &url[..scheme_end + 3];
                let after_at = &url[at_pos..];
                return format!("{}***{}", scheme, after_at);
            }
        }
        url.to_string()
    }
}

/// Positive number of seconds that fits a `TimeDelta`
fn parse_session_ttl(value: &str) -> Result<TimeDelta, String> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|secs| *secs > 0)
        .and_then(TimeDelta::try_seconds)
        .ok_or_else(|| "Invalid SESSION_TTL_SECS: must be a positive number".to_string())
}
