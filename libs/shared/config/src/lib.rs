use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub portal_api_base_url: String,
    pub portal_api_token: String,
    pub calendar_refresh_interval_seconds: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            portal_api_base_url: env::var("PORTAL_API_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("PORTAL_API_BASE_URL not set, using empty value");
                    String::new()
                }),
            portal_api_token: env::var("PORTAL_API_TOKEN")
                .unwrap_or_else(|_| {
                    warn!("PORTAL_API_TOKEN not set, using empty value");
                    String::new()
                }),
            calendar_refresh_interval_seconds: env::var("CALENDAR_REFRESH_INTERVAL_SECONDS")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or_else(|| {
                    warn!("CALENDAR_REFRESH_INTERVAL_SECONDS not set, using default of 60");
                    60
                }),
        };

        if !config.is_configured() {
            warn!("Portal API not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.portal_api_base_url.is_empty()
    }
}
