// src/routes/patient_routes.rs
//
// Supporting CRUD around the appointment core. These handlers talk to
// sqlx directly; the use-case layering is reserved for the appointment
// and clinical-history modules.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    dto::ApiOk,
    error::ApiError,
    middleware::auth_context::AuthContext,
    models::AppState,
};

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct PatientRow {
    pub patient_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<chrono::NaiveDate>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePatientRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<chrono::NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<i64>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/patients", post(create_patient).get(search_patients))
        .route("/patients/{patient_id}", get(get_patient))
}

pub async fn create_patient(
    State(state): State<AppState>,
    _auth: AuthContext,
    Json(req): Json<CreatePatientRequest>,
) -> Result<Json<ApiOk<PatientRow>>, ApiError> {
    let first_name = req.first_name.trim();
    let last_name = req.last_name.trim();
    if first_name.is_empty() || last_name.is_empty() {
        return Err(ApiError::BadRequest(
            "VALIDATION_ERROR",
            "first_name and last_name are required".to_string(),
        ));
    }

    let row: PatientRow = sqlx::query_as::<_, PatientRow>(
        r#"
        INSERT INTO patient (first_name, last_name, email, phone, birth_date, created_at, updated_at)
        VALUES ($1,$2,$3,$4,$5, now(), now())
        RETURNING patient_id, first_name, last_name, email, phone, birth_date, created_at, updated_at
        "#,
    )
    .bind(first_name)
    .bind(last_name)
    .bind(req.email.as_deref())
    .bind(req.phone.as_deref())
    .bind(req.birth_date)
    .fetch_one(&state.db)
    .await
    .map_err(|e| ApiError::Internal(format!("db error: {e}")))?;

    Ok(Json(ApiOk { data: row }))
}

pub async fn search_patients(
    State(state): State<AppState>,
    _auth: AuthContext,
    Query(q): Query<SearchQuery>,
) -> Result<Json<ApiOk<Vec<PatientRow>>>, ApiError> {
    let limit = q.limit.unwrap_or(50).clamp(1, 200);
    let needle = q
        .q
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{s}%"));

    let rows: Vec<PatientRow> = sqlx::query_as::<_, PatientRow>(
        r#"
        SELECT patient_id, first_name, last_name, email, phone, birth_date, created_at, updated_at
        FROM patient
        WHERE ($1::text IS NULL
               OR first_name ILIKE $1
               OR last_name  ILIKE $1
               OR email      ILIKE $1)
        ORDER BY last_name ASC, first_name ASC
        LIMIT $2
        "#,
    )
    .bind(needle)
    .bind(limit)
    .fetch_all(&state.db)
    .await
    .map_err(|e| ApiError::Internal(format!("db error: {e}")))?;

    Ok(Json(ApiOk { data: rows }))
}

pub async fn get_patient(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<ApiOk<PatientRow>>, ApiError> {
    let row: Option<PatientRow> = sqlx::query_as::<_, PatientRow>(
        r#"
        SELECT patient_id, first_name, last_name, email, phone, birth_date, created_at, updated_at
        FROM patient
        WHERE patient_id = $1
        "#,
    )
    .bind(patient_id)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| ApiError::Internal(format!("db error: {e}")))?;

    let row = row.ok_or_else(|| ApiError::NotFound("NOT_FOUND", "patient not found".into()))?;
    Ok(Json(ApiOk { data: row }))
}
