// src/middleware/cors.rs
//
// Two pieces: a guard that rejects requests from disallowed origins with
// 403 {"error":"CORS_ERROR"}, and a tower-http CorsLayer that emits the
// allow headers and answers OPTIONS preflight with the configured max-age.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::Request;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tower_http::cors::{Any, AllowOrigin, CorsLayer};

use crate::config::{AppEnv, Config};

#[derive(Debug, Clone)]
pub struct CorsPolicy {
    env: AppEnv,
    allowed_origins: Vec<String>,
}

impl CorsPolicy {
    pub fn from_config(cfg: &Config) -> Arc<Self> {
        Arc::new(Self {
            env: cfg.app_env,
            allowed_origins: cfg.cors_allowed_origins.clone(),
        })
    }

    /// Requests without an Origin header (same-origin, curl) pass through.
    /// Development with no configured list is open; production with no
    /// configured list rejects every cross-origin caller.
    pub fn allows(&self, origin: Option<&str>) -> bool {
        let Some(origin) = origin else {
            return true;
        };
        if self.allowed_origins.is_empty() {
            return self.env == AppEnv::Development;
        }
        self.allowed_origins.iter().any(|o| o == origin)
    }
}

pub async fn origin_guard(policy: Arc<CorsPolicy>, req: Request, next: Next) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    if !policy.allows(origin.as_deref()) {
        return (
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({ "error": "CORS_ERROR" })),
        )
            .into_response();
    }

    next.run(req).await
}

pub fn cors_layer(cfg: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(Duration::from_secs(cfg.cors_max_age_secs));

    if cfg.cors_allowed_origins.is_empty() {
        // The guard above still rejects cross-origin calls in production.
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = cfg
            .cors_allowed_origins
            .iter()
            .filter_map(|o| o.parse::<HeaderValue>().ok())
            .collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(env: AppEnv, origins: &[&str]) -> CorsPolicy {
        CorsPolicy {
            env,
            allowed_origins: origins.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn missing_origin_always_passes() {
        assert!(policy(AppEnv::Production, &[]).allows(None));
        assert!(policy(AppEnv::Development, &[]).allows(None));
    }

    #[test]
    fn development_without_list_is_open() {
        let p = policy(AppEnv::Development, &[]);
        assert!(p.allows(Some("http://localhost:5173")));
    }

    #[test]
    fn production_without_list_rejects_cross_origin() {
        let p = policy(AppEnv::Production, &[]);
        assert!(!p.allows(Some("https://evil.example.com")));
    }

    #[test]
    fn listed_origins_match_exactly() {
        let p = policy(AppEnv::Production, &["https://clinic.example.com"]);
        assert!(p.allows(Some("https://clinic.example.com")));
        assert!(!p.allows(Some("https://clinic.example.com.evil.com")));
        assert!(!p.allows(Some("http://clinic.example.com")));
    }
}
