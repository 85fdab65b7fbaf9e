use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::usecases::appointments::AppointmentUseCases;
use crate::usecases::clinical_history::ClinicalHistoryUseCases;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub session_ttl_hours: i64,
    pub appointments: AppointmentUseCases,
    pub clinical: ClinicalHistoryUseCases,
}

/* -------------------------
   Auth DTOs
--------------------------*/

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub data: LoginResponseData,
}

#[derive(Debug, Serialize)]
pub struct LoginResponseData {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub staff: StaffProfile,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub data: MeResponseData,
}

#[derive(Debug, Serialize)]
pub struct MeResponseData {
    pub staff: StaffProfile,
    pub session: SessionInfo,
}

#[derive(Debug, Serialize)]
pub struct StaffProfile {
    pub user_id: Uuid,
    pub username: String,
    pub display_name: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub session_token_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/* -------------------------
   DB Row Models
--------------------------*/

#[derive(Debug, sqlx::FromRow)]
pub struct StaffUserRow {
    pub user_id: Uuid,
    pub username: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: i16,
    pub is_active: bool,
}

#[derive(Debug, sqlx::FromRow)]
pub struct SessionTokenRow {
    pub session_token_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/* -------------------------
   Helpers
--------------------------*/

pub const ROLE_ADMIN: i16 = 0;
pub const ROLE_DENTIST: i16 = 1;
pub const ROLE_RECEPTIONIST: i16 = 2;

pub fn role_to_string(role: i16) -> String {
    match role {
        ROLE_ADMIN => "admin",
        ROLE_DENTIST => "dentist",
        ROLE_RECEPTIONIST => "receptionist",
        _ => "unknown",
    }
    .to_string()
}
