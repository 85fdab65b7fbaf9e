// src/middleware/audit.rs
//
// Observes request completion and emits one audit line per request. Does
// not alter control flow.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::middleware::auth_context::AuthContext;

pub async fn audit(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = Instant::now();

    let response = next.run(req).await;

    let user = response
        .extensions()
        .get::<AuthContext>()
        .map(|ctx| ctx.user_id.to_string());
    let line = audit_line(
        method.as_str(),
        &uri.to_string(),
        user.as_deref(),
        response.status().as_u16(),
        started.elapsed().as_millis(),
    );
    tracing::info!("{line}");

    response
}

fn audit_line(method: &str, url: &str, user: Option<&str>, status: u16, millis: u128) -> String {
    format!(
        "[AUDIT] {method}:{url} - USER:{} - STATUS:{status} - TIME:{millis}ms",
        user.unwrap_or("anonymous")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_format_with_user() {
        let line = audit_line(
            "POST",
            "/api/v1/appointments/42/confirm",
            Some("8b9e2f10-0000-0000-0000-000000000001"),
            200,
            17,
        );
        assert_eq!(
            line,
            "[AUDIT] POST:/api/v1/appointments/42/confirm - \
             USER:8b9e2f10-0000-0000-0000-000000000001 - STATUS:200 - TIME:17ms"
        );
    }

    #[test]
    fn line_format_falls_back_to_anonymous() {
        let line = audit_line("GET", "/healthz", None, 200, 0);
        assert_eq!(line, "[AUDIT] GET:/healthz - USER:anonymous - STATUS:200 - TIME:0ms");
    }
}
