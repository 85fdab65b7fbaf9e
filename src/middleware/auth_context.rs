// src/middleware/auth_context.rs
//
// Bearer-token session auth. `require_auth` runs as a layer around the
// protected routes, validates the opaque token against `session_token`
// and parks an `AuthContext` in the request extensions. Handlers pull it
// out with the `FromRequestParts` extractor below. The context is copied
// onto the response afterwards so the audit layer can attribute the
// request to a user.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use uuid::Uuid;

use crate::auth::hash_access_token;
use crate::error::ApiError;
use crate::models::AppState;

#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub role: i16,
    pub session_token_id: Uuid,
}

#[derive(Debug, sqlx::FromRow)]
struct SessionLookupRow {
    session_token_id: Uuid,
    user_id: Uuid,
    role: i16,
}

pub async fn require_auth(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (mut parts, body) = req.into_parts();
    let TypedHeader(authz): TypedHeader<Authorization<Bearer>> =
        TypedHeader::from_request_parts(&mut parts, &state)
            .await
            .map_err(|_| ApiError::session_expired())?;
    let mut req = Request::from_parts(parts, body);

    let token_hash = hash_access_token(authz.token());

    let row: SessionLookupRow = sqlx::query_as::<_, SessionLookupRow>(
        r#"
        SELECT st.session_token_id, st.user_id, u.role
        FROM session_token st
        JOIN staff_user u ON u.user_id = st.user_id
        WHERE st.session_token_hash = $1
          AND st.revoked_at IS NULL
          AND st.expires_at > now()
          AND u.is_active = true
        "#,
    )
    .bind(&token_hash)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| ApiError::Internal(format!("db error: {e}")))?
    .ok_or_else(ApiError::session_expired)?;

    // Touch last_seen_at (best-effort)
    let _ = sqlx::query(
        r#"
        UPDATE session_token
        SET last_seen_at = now()
        WHERE session_token_id = $1
        "#,
    )
    .bind(row.session_token_id)
    .execute(&state.db)
    .await;

    let ctx = AuthContext {
        user_id: row.user_id,
        role: row.role,
        session_token_id: row.session_token_id,
    };
    req.extensions_mut().insert(ctx.clone());

    let mut response = next.run(req).await;
    response.extensions_mut().insert(ctx);
    Ok(response)
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let ctx = parts.extensions.get::<AuthContext>().cloned();
        async move { ctx.ok_or_else(ApiError::session_expired) }
    }
}
