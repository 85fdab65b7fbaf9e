// src/domain/clinical_history.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::DomainError;

/// One clinical history per patient. Plain record data; every mutation
/// stamps `updated_at`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClinicalHistory {
    pub history_id: Uuid,
    pub patient_id: Uuid,
    pub allergies: Option<String>,
    pub medications: Option<String>,
    pub medical_conditions: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClinicalHistory {
    pub fn new(patient_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            history_id: Uuid::new_v4(),
            patient_id,
            allergies: None,
            medications: None,
            medical_conditions: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update_allergies(&mut self, allergies: Option<String>, now: DateTime<Utc>) {
        self.allergies = allergies;
        self.updated_at = now;
    }

    pub fn update_medications(&mut self, medications: Option<String>, now: DateTime<Utc>) {
        self.medications = medications;
        self.updated_at = now;
    }

    pub fn update_medical_conditions(&mut self, conditions: Option<String>, now: DateTime<Utc>) {
        self.medical_conditions = conditions;
        self.updated_at = now;
    }

    pub fn update_notes(&mut self, notes: Option<String>, now: DateTime<Utc>) {
        self.notes = notes;
        self.updated_at = now;
    }
}

/// A procedure performed on a patient, optionally linked to the appointment
/// it happened in.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TreatmentRecord {
    pub record_id: Uuid,
    pub history_id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub description: String,
    pub tooth: Option<String>,
    pub performed_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TreatmentRecord {
    pub fn new(
        history_id: Uuid,
        appointment_id: Option<Uuid>,
        description: String,
        tooth: Option<String>,
        performed_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if description.trim().is_empty() {
            return Err(DomainError::Validation("description is required".into()));
        }
        Ok(Self {
            record_id: Uuid::new_v4(),
            history_id,
            appointment_id,
            description: description.trim().to_string(),
            tooth,
            performed_at,
            notes: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update_description(&mut self, description: String, now: DateTime<Utc>) -> Result<(), DomainError> {
        if description.trim().is_empty() {
            return Err(DomainError::Validation("description is required".into()));
        }
        self.description = description.trim().to_string();
        self.updated_at = now;
        Ok(())
    }

    pub fn update_notes(&mut self, notes: Option<String>, now: DateTime<Utc>) {
        self.notes = notes;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_updates_stamp_updated_at() {
        let created = Utc::now();
        let mut h = ClinicalHistory::new(Uuid::new_v4(), created);
        let later = created + chrono::Duration::minutes(5);
        h.update_allergies(Some("penicillin".into()), later);
        assert_eq!(h.allergies.as_deref(), Some("penicillin"));
        assert_eq!(h.updated_at, later);
        assert_eq!(h.created_at, created);
    }

    #[test]
    fn treatment_record_requires_description() {
        let now = Utc::now();
        assert!(TreatmentRecord::new(Uuid::new_v4(), None, "  ".into(), None, now, now).is_err());

        let mut r =
            TreatmentRecord::new(Uuid::new_v4(), None, "filling".into(), Some("26".into()), now, now)
                .unwrap();
        assert!(r.update_description(String::new(), now).is_err());
        let later = now + chrono::Duration::minutes(1);
        r.update_description("composite filling".into(), later).unwrap();
        assert_eq!(r.description, "composite filling");
        assert_eq!(r.updated_at, later);
    }
}
