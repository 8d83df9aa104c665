use std::env;
use std::time::Duration;

/// Credentials and endpoint of the hosted conferencing platform.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub api_key: String,
    pub api_secret: String,
    pub url: String,
}

impl PlatformConfig {
    /// HTTP(S) base URL of the management API derived from the configured
    /// signalling URL. `wss://` maps to `https://`, `ws://` to `http://`.
    pub fn http_url(&self) -> String {
        let url = self.url.trim().trim_end_matches('/');
        if let Some(host) = url.strip_prefix("wss://") {
            format!("https://{}", host)
        } else if let Some(host) = url.strip_prefix("ws://") {
            format!("http://{}", host)
        } else if url.starts_with("https://") || url.starts_with("http://") {
            url.to_string()
        } else {
            format!("https://{}", url)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub production: bool,
    pub app_password: Option<String>,
    pub platform_api_key: Option<String>,
    pub platform_api_secret: Option<String>,
    pub platform_url: Option<String>,
    pub public_platform_url: Option<String>,
    pub platform_timeout_seconds: u64,
    pub json_logs: bool,
}

impl Config {
    /// Assemble the configuration once at startup.
    ///
    /// Missing secrets are not startup errors: the endpoints that need them
    /// report a configuration error per request.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidPort)?,
            production: env::var("APP_ENV")
                .map(|v| v.eq_ignore_ascii_case("production"))
                .unwrap_or(false),
            app_password: non_empty_var("APP_PASSWORD"),
            platform_api_key: non_empty_var("LIVEKIT_API_KEY"),
            platform_api_secret: non_empty_var("LIVEKIT_API_SECRET"),
            platform_url: non_empty_var("LIVEKIT_URL"),
            public_platform_url: non_empty_var("PUBLIC_LIVEKIT_URL"),
            platform_timeout_seconds: env::var("PLATFORM_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout)?,
            json_logs: env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// All three platform settings, or `None` if any is unset.
    pub fn platform(&self) -> Option<PlatformConfig> {
        match (
            &self.platform_api_key,
            &self.platform_api_secret,
            &self.platform_url,
        ) {
            (Some(api_key), Some(api_secret), Some(url)) => Some(PlatformConfig {
                api_key: api_key.clone(),
                api_secret: api_secret.clone(),
                url: url.clone(),
            }),
            _ => None,
        }
    }

    /// URL handed to the browser page for connecting to the platform.
    pub fn public_url(&self) -> Option<&str> {
        self.public_platform_url
            .as_deref()
            .or(self.platform_url.as_deref())
    }

    pub fn platform_timeout(&self) -> Duration {
        Duration::from_secs(self.platform_timeout_seconds)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid server port")]
    InvalidPort,
    #[error("PLATFORM_TIMEOUT_SECONDS must be a whole number of seconds")]
    InvalidTimeout,
}
