use std::env;

const ENV_GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";
const ENV_ANALYSIS_TIMEOUT: &str = "ANALYSIS_TIMEOUT";
const ENV_ENABLE_RATE_LIMIT: &str = "ENABLE_RATE_LIMIT";
const ENV_AUTH_SECRET: &str = "AUTH_SECRET";

const DEFAULT_GEMINI_MODEL: &str = "gemini-flash-latest";
const DEFAULT_ANALYSIS_TIMEOUT_SECS: u64 = 10;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// API key for the Gemini endpoint; required at startup
    pub google_api_key: Option<String>,
    pub gemini_model: String,
    /// Per-attempt timeout for upstream model calls, in seconds
    pub analysis_timeout_secs: u64,
    /// Admission control for anonymous callers
    pub enable_rate_limit: bool,
    /// HS256 secret used to verify access-token cookies
    pub auth_secret: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            google_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            analysis_timeout_secs: DEFAULT_ANALYSIS_TIMEOUT_SECS,
            enable_rate_limit: true,
            auth_secret: "supersecret".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the environment
    pub fn from_env() -> Self {
        let defaults = Config::default();

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let host = env::var("HOST").unwrap_or(defaults.host);

        let google_api_key = env::var(ENV_GOOGLE_API_KEY)
            .ok()
            .filter(|k| !k.trim().is_empty());

        let gemini_model = env::var(ENV_GEMINI_MODEL).unwrap_or(defaults.gemini_model);

        let analysis_timeout_secs = env::var(ENV_ANALYSIS_TIMEOUT)
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(defaults.analysis_timeout_secs);

        let enable_rate_limit = env::var(ENV_ENABLE_RATE_LIMIT)
            .ok()
            .and_then(|v| parse_bool(&v))
            .unwrap_or(defaults.enable_rate_limit);

        let auth_secret = env::var(ENV_AUTH_SECRET).unwrap_or(defaults.auth_secret);

        Self {
            host,
            port,
            google_api_key,
            gemini_model,
            analysis_timeout_secs,
            enable_rate_limit,
            auth_secret,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_parsing() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("False"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn default_bind_addr() {
        assert_eq!(Config::default().bind_addr(), "127.0.0.1:8080");
    }
}
