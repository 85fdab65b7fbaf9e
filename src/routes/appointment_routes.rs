// src/routes/appointment_routes.rs

use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::de::Deserializer;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    domain::repository::AppointmentFilter,
    domain::{AppointmentStatus, TimeSlot},
    dto::{ApiOk, AppointmentDto},
    error::ApiError,
    middleware::auth_context::AuthContext,
    models::{AppState, ROLE_ADMIN, ROLE_DENTIST, ROLE_RECEPTIONIST},
    usecases::appointments::CreateAppointmentInput,
};

/*
Roles (staff_user.role):
0 admin
1 dentist
2 receptionist
*/

fn is_dentist(auth: &AuthContext) -> bool {
    auth.role == ROLE_DENTIST
}

fn can_manage_appointments(auth: &AuthContext) -> bool {
    auth.role == ROLE_ADMIN || auth.role == ROLE_RECEPTIONIST
}

fn ensure_manage(auth: &AuthContext) -> Result<(), ApiError> {
    if can_manage_appointments(auth) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "FORBIDDEN",
            "Only admin/receptionist can manage appointments".into(),
        ))
    }
}

fn ensure_treat(auth: &AuthContext) -> Result<(), ApiError> {
    if can_manage_appointments(auth) || is_dentist(auth) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "FORBIDDEN",
            "Only staff can work on appointments".into(),
        ))
    }
}

fn deserialize_double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    // Called only when the field is present; `null` becomes Some(None).
    let inner = Option::<T>::deserialize(deserializer)?;
    Ok(Some(inner))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/appointments", get(list_appointments).post(create_appointment))
        .route(
            "/appointments/{appointment_id}",
            get(get_appointment).put(update_appointment),
        )
        .route("/appointments/{appointment_id}/confirm", post(confirm_appointment))
        .route("/appointments/{appointment_id}/cancel", post(cancel_appointment))
        .route("/appointments/{appointment_id}/start", post(start_appointment))
        .route("/appointments/{appointment_id}/complete", post(complete_appointment))
        .route("/appointments/{appointment_id}/no_show", post(mark_no_show))
        .route("/appointments/{appointment_id}/dentist", put(assign_dentist))
}

/* ============================================================
   Query params / request bodies
   ============================================================ */

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub dentist_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAppointmentRequest {
    pub patient_id: Uuid,
    pub dentist_id: Option<Uuid>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub reason: String,
    pub treatment_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    pub treatment_type: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct AssignDentistRequest {
    pub dentist_id: Uuid,
}

/* ============================================================
   Handlers
   ============================================================ */

pub async fn list_appointments(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(q): Query<ListQuery>,
) -> Result<Json<ApiOk<Vec<AppointmentDto>>>, ApiError> {
    ensure_treat(&auth)?;

    let status = match q.status.as_deref() {
        Some(raw) => Some(raw.parse::<AppointmentStatus>().map_err(ApiError::from)?),
        None => None,
    };
    let filter = AppointmentFilter {
        status,
        dentist_id: q.dentist_id,
        patient_id: q.patient_id,
        from: q.from,
        to: q.to,
    };

    let appointments = state.appointments.list(filter).await?;
    Ok(Json(ApiOk {
        data: appointments.iter().map(AppointmentDto::from).collect(),
    }))
}

pub async fn create_appointment(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<CreateAppointmentRequest>,
) -> Result<Json<ApiOk<AppointmentDto>>, ApiError> {
    ensure_manage(&auth)?;

    let slot = TimeSlot::new(req.start_at, req.end_at)?;
    let appointment = state
        .appointments
        .create(CreateAppointmentInput {
            patient_id: req.patient_id,
            dentist_id: req.dentist_id,
            slot,
            reason: req.reason,
            treatment_type: req.treatment_type,
        })
        .await?;

    Ok(Json(ApiOk {
        data: AppointmentDto::from(&appointment),
    }))
}

pub async fn get_appointment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiOk<AppointmentDto>>, ApiError> {
    ensure_treat(&auth)?;
    let appointment = state.appointments.get(appointment_id).await?;
    Ok(Json(ApiOk {
        data: AppointmentDto::from(&appointment),
    }))
}

pub async fn update_appointment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(appointment_id): Path<Uuid>,
    Json(req): Json<UpdateAppointmentRequest>,
) -> Result<Json<ApiOk<AppointmentDto>>, ApiError> {
    ensure_manage(&auth)?;

    let slot = TimeSlot::new(req.start_at, req.end_at)?;
    let appointment = state
        .appointments
        .reschedule(appointment_id, slot, req.reason, req.notes, req.treatment_type)
        .await?;

    Ok(Json(ApiOk {
        data: AppointmentDto::from(&appointment),
    }))
}

pub async fn confirm_appointment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiOk<AppointmentDto>>, ApiError> {
    ensure_manage(&auth)?;
    let appointment = state.appointments.confirm(appointment_id).await?;
    Ok(Json(ApiOk {
        data: AppointmentDto::from(&appointment),
    }))
}

pub async fn cancel_appointment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiOk<AppointmentDto>>, ApiError> {
    ensure_manage(&auth)?;
    let appointment = state.appointments.cancel(appointment_id).await?;
    Ok(Json(ApiOk {
        data: AppointmentDto::from(&appointment),
    }))
}

pub async fn start_appointment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiOk<AppointmentDto>>, ApiError> {
    ensure_treat(&auth)?;
    let appointment = state.appointments.start(appointment_id).await?;
    Ok(Json(ApiOk {
        data: AppointmentDto::from(&appointment),
    }))
}

pub async fn complete_appointment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiOk<AppointmentDto>>, ApiError> {
    ensure_treat(&auth)?;
    let appointment = state.appointments.complete(appointment_id).await?;
    Ok(Json(ApiOk {
        data: AppointmentDto::from(&appointment),
    }))
}

pub async fn mark_no_show(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiOk<AppointmentDto>>, ApiError> {
    ensure_manage(&auth)?;
    let appointment = state.appointments.mark_no_show(appointment_id).await?;
    Ok(Json(ApiOk {
        data: AppointmentDto::from(&appointment),
    }))
}

pub async fn assign_dentist(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(appointment_id): Path<Uuid>,
    Json(req): Json<AssignDentistRequest>,
) -> Result<Json<ApiOk<AppointmentDto>>, ApiError> {
    ensure_manage(&auth)?;
    let appointment = state
        .appointments
        .assign_dentist(appointment_id, req.dentist_id)
        .await?;
    Ok(Json(ApiOk {
        data: AppointmentDto::from(&appointment),
    }))
}
