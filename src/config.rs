use std::env;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub session_ttl_hours: i64,
    pub app_env: AppEnv,
    /// Exact origins allowed by the CORS guard. Empty in development means
    /// "allow any"; empty in production means "allow none".
    pub cors_allowed_origins: Vec<String>,
    pub cors_max_age_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let session_ttl_hours = env::var("SESSION_TTL_HOURS")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(24);

        let app_env = match env::var("APP_ENV").as_deref() {
            Ok("production") => AppEnv::Production,
            _ => AppEnv::Development,
        };

        let cors_allowed_origins = parse_origins(
            env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default().as_str(),
        );
        let cors_max_age_secs = env::var("CORS_MAX_AGE_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(600);

        Ok(Self {
            database_url,
            bind_addr,
            session_ttl_hours,
            app_env,
            cors_allowed_origins,
            cors_max_age_secs,
        })
    }
}

/// Comma-separated allow-list; blanks and trailing slashes are stripped.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_list_is_trimmed_and_filtered() {
        let origins = parse_origins(" https://clinic.example.com/ , http://localhost:5173 ,, ");
        assert_eq!(
            origins,
            vec![
                "https://clinic.example.com".to_string(),
                "http://localhost:5173".to_string(),
            ]
        );
    }

    #[test]
    fn empty_origins_yield_empty_list() {
        assert!(parse_origins("").is_empty());
        assert!(parse_origins("  ,  ").is_empty());
    }
}
