mod auth;
mod config;
mod middleware;

mod db;
mod domain;
mod dto;
mod error;
mod models;
mod repo;
mod routes;
mod usecases;

use std::sync::Arc;

use crate::{
    config::Config,
    middleware::{audit, cors},
    models::AppState,
    repo::{PgAppointmentRepository, PgClinicalHistoryRepository},
    usecases::{appointments::AppointmentUseCases, clinical_history::ClinicalHistoryUseCases},
};

use axum::extract::Request;
use axum::middleware::{from_fn, Next};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cfg = Config::from_env()?;
    let pool = db::connect_pg(&cfg.database_url).await?;

    let state = AppState {
        db: pool.clone(),
        session_ttl_hours: cfg.session_ttl_hours,
        appointments: AppointmentUseCases::new(Arc::new(PgAppointmentRepository::new(pool.clone()))),
        clinical: ClinicalHistoryUseCases::new(Arc::new(PgClinicalHistoryRepository::new(pool))),
    };

    let policy = cors::CorsPolicy::from_config(&cfg);
    let guard = from_fn(move |req: Request, next: Next| {
        let policy = policy.clone();
        async move { cors::origin_guard(policy, req, next).await }
    });

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors::cors_layer(&cfg))
        .layer(guard)
        .layer(from_fn(audit::audit));

    tracing::info!("Listening on http://{}", cfg.bind_addr);
    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
