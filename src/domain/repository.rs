// src/domain/repository.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Appointment, AppointmentStatus, ClinicalHistory, TreatmentRecord};
use crate::error::DomainError;

/// Server-side filters for listing appointments. All optional; absent filters
/// match everything.
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub status: Option<AppointmentStatus>,
    pub dentist_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn insert(&self, appointment: &Appointment) -> Result<(), DomainError>;
    async fn update(&self, appointment: &Appointment) -> Result<(), DomainError>;
    async fn find_by_id(&self, appointment_id: Uuid) -> Result<Option<Appointment>, DomainError>;
    async fn list(&self, filter: AppointmentFilter) -> Result<Vec<Appointment>, DomainError>;
}

#[async_trait]
pub trait ClinicalHistoryRepository: Send + Sync {
    async fn insert_history(&self, history: &ClinicalHistory) -> Result<(), DomainError>;
    async fn update_history(&self, history: &ClinicalHistory) -> Result<(), DomainError>;
    async fn find_history_by_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Option<ClinicalHistory>, DomainError>;

    async fn insert_record(&self, record: &TreatmentRecord) -> Result<(), DomainError>;
    async fn update_record(&self, record: &TreatmentRecord) -> Result<(), DomainError>;
    async fn find_record_by_id(&self, record_id: Uuid) -> Result<Option<TreatmentRecord>, DomainError>;
    async fn list_records(&self, history_id: Uuid) -> Result<Vec<TreatmentRecord>, DomainError>;
}
