use axum::middleware::from_fn_with_state;
use axum::Router;

use crate::middleware::auth_context::require_auth;
use crate::models::AppState;

pub mod appointment_routes;
pub mod auth_routes;
pub mod clinical_history_routes;
pub mod home_routes;
pub mod patient_routes;

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/api/v1/auth", auth_routes::protected_router())
        .nest("/api/v1", appointment_routes::router())
        .nest("/api/v1", patient_routes::router())
        .nest("/api/v1", clinical_history_routes::router())
        .layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .nest("/api/v1/auth", auth_routes::router())
        .merge(home_routes::router())
        .merge(protected)
        .with_state(state)
}
