// src/routes/clinical_history_routes.rs

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::de::Deserializer;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    dto::{ApiOk, ClinicalHistoryDto, TreatmentRecordDto},
    error::ApiError,
    middleware::auth_context::AuthContext,
    models::AppState,
    usecases::clinical_history::{AddTreatmentRecordInput, UpdateHistoryInput},
};

fn deserialize_double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let inner = Option::<T>::deserialize(deserializer)?;
    Ok(Some(inner))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/patients/{patient_id}/clinical-history",
            get(get_history).post(open_history).put(update_history),
        )
        .route("/clinical-history/{history_id}/records", post(add_record))
        .route("/treatment-records/{record_id}", put(update_record))
}

#[derive(Debug, Deserialize)]
pub struct UpdateHistoryRequest {
    #[serde(default, deserialize_with = "deserialize_double_option")]
    pub allergies: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    pub medications: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    pub medical_conditions: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct AddRecordRequest {
    pub appointment_id: Option<Uuid>,
    pub description: String,
    pub tooth: Option<String>,
    pub performed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRecordRequest {
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    pub notes: Option<Option<String>>,
}

pub async fn get_history(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<ApiOk<ClinicalHistoryDto>>, ApiError> {
    let (history, records) = state.clinical.get_for_patient(patient_id).await?;
    Ok(Json(ApiOk {
        data: ClinicalHistoryDto::from_parts(&history, &records),
    }))
}

pub async fn open_history(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<ApiOk<ClinicalHistoryDto>>, ApiError> {
    let history = state.clinical.open_for_patient(patient_id).await?;
    Ok(Json(ApiOk {
        data: ClinicalHistoryDto::from_parts(&history, &[]),
    }))
}

pub async fn update_history(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(patient_id): Path<Uuid>,
    Json(req): Json<UpdateHistoryRequest>,
) -> Result<Json<ApiOk<ClinicalHistoryDto>>, ApiError> {
    let history = state
        .clinical
        .update_for_patient(
            patient_id,
            UpdateHistoryInput {
                allergies: req.allergies,
                medications: req.medications,
                medical_conditions: req.medical_conditions,
                notes: req.notes,
            },
        )
        .await?;
    let records = state.clinical.get_for_patient(patient_id).await?.1;
    Ok(Json(ApiOk {
        data: ClinicalHistoryDto::from_parts(&history, &records),
    }))
}

pub async fn add_record(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(history_id): Path<Uuid>,
    Json(req): Json<AddRecordRequest>,
) -> Result<Json<ApiOk<TreatmentRecordDto>>, ApiError> {
    let record = state
        .clinical
        .add_record(
            history_id,
            AddTreatmentRecordInput {
                appointment_id: req.appointment_id,
                description: req.description,
                tooth: req.tooth,
                performed_at: req.performed_at.unwrap_or_else(Utc::now),
            },
        )
        .await?;
    Ok(Json(ApiOk {
        data: TreatmentRecordDto::from(&record),
    }))
}

pub async fn update_record(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(record_id): Path<Uuid>,
    Json(req): Json<UpdateRecordRequest>,
) -> Result<Json<ApiOk<TreatmentRecordDto>>, ApiError> {
    let record = state
        .clinical
        .update_record(record_id, req.description, req.notes)
        .await?;
    Ok(Json(ApiOk {
        data: TreatmentRecordDto::from(&record),
    }))
}
