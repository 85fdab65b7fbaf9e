// src/usecases/clinical_history.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::repository::ClinicalHistoryRepository;
use crate::domain::{ClinicalHistory, TreatmentRecord};
use crate::error::DomainError;

pub struct AddTreatmentRecordInput {
    pub appointment_id: Option<Uuid>,
    pub description: String,
    pub tooth: Option<String>,
    pub performed_at: DateTime<Utc>,
}

/// Partial update; `None` leaves a field untouched, `Some(None)` clears it.
#[derive(Default)]
pub struct UpdateHistoryInput {
    pub allergies: Option<Option<String>>,
    pub medications: Option<Option<String>>,
    pub medical_conditions: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

#[derive(Clone)]
pub struct ClinicalHistoryUseCases {
    repo: Arc<dyn ClinicalHistoryRepository>,
}

impl ClinicalHistoryUseCases {
    pub fn new(repo: Arc<dyn ClinicalHistoryRepository>) -> Self {
        Self { repo }
    }

    /// Fetches the patient's history together with its treatment records.
    pub async fn get_for_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<(ClinicalHistory, Vec<TreatmentRecord>), DomainError> {
        let history = self
            .repo
            .find_history_by_patient(patient_id)
            .await?
            .ok_or(DomainError::NotFound("clinical history"))?;
        let records = self.repo.list_records(history.history_id).await?;
        Ok((history, records))
    }

    /// Creates an empty history for a patient. One per patient; callers get
    /// the existing one back if it is already there.
    pub async fn open_for_patient(&self, patient_id: Uuid) -> Result<ClinicalHistory, DomainError> {
        if let Some(existing) = self.repo.find_history_by_patient(patient_id).await? {
            return Ok(existing);
        }
        let history = ClinicalHistory::new(patient_id, Utc::now());
        self.repo.insert_history(&history).await?;
        Ok(history)
    }

    pub async fn update_for_patient(
        &self,
        patient_id: Uuid,
        input: UpdateHistoryInput,
    ) -> Result<ClinicalHistory, DomainError> {
        let mut history = self
            .repo
            .find_history_by_patient(patient_id)
            .await?
            .ok_or(DomainError::NotFound("clinical history"))?;
        let now = Utc::now();
        if let Some(allergies) = input.allergies {
            history.update_allergies(allergies, now);
        }
        if let Some(medications) = input.medications {
            history.update_medications(medications, now);
        }
        if let Some(conditions) = input.medical_conditions {
            history.update_medical_conditions(conditions, now);
        }
        if let Some(notes) = input.notes {
            history.update_notes(notes, now);
        }
        self.repo.update_history(&history).await?;
        Ok(history)
    }

    pub async fn add_record(
        &self,
        history_id: Uuid,
        input: AddTreatmentRecordInput,
    ) -> Result<TreatmentRecord, DomainError> {
        let record = TreatmentRecord::new(
            history_id,
            input.appointment_id,
            input.description,
            input.tooth,
            input.performed_at,
            Utc::now(),
        )?;
        self.repo.insert_record(&record).await?;
        Ok(record)
    }

    pub async fn update_record(
        &self,
        record_id: Uuid,
        description: Option<String>,
        notes: Option<Option<String>>,
    ) -> Result<TreatmentRecord, DomainError> {
        let mut record = self
            .repo
            .find_record_by_id(record_id)
            .await?
            .ok_or(DomainError::NotFound("treatment record"))?;
        let now = Utc::now();
        if let Some(description) = description {
            record.update_description(description, now)?;
        }
        if let Some(notes) = notes {
            record.update_notes(notes, now);
        }
        self.repo.update_record(&record).await?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemRepo {
        histories: Mutex<HashMap<Uuid, ClinicalHistory>>,
        records: Mutex<HashMap<Uuid, TreatmentRecord>>,
    }

    #[async_trait]
    impl ClinicalHistoryRepository for MemRepo {
        async fn insert_history(&self, history: &ClinicalHistory) -> Result<(), DomainError> {
            self.histories
                .lock()
                .unwrap()
                .insert(history.history_id, history.clone());
            Ok(())
        }

        async fn update_history(&self, history: &ClinicalHistory) -> Result<(), DomainError> {
            self.histories
                .lock()
                .unwrap()
                .insert(history.history_id, history.clone());
            Ok(())
        }

        async fn find_history_by_patient(
            &self,
            patient_id: Uuid,
        ) -> Result<Option<ClinicalHistory>, DomainError> {
            Ok(self
                .histories
                .lock()
                .unwrap()
                .values()
                .find(|h| h.patient_id == patient_id)
                .cloned())
        }

        async fn insert_record(&self, record: &TreatmentRecord) -> Result<(), DomainError> {
            self.records
                .lock()
                .unwrap()
                .insert(record.record_id, record.clone());
            Ok(())
        }

        async fn update_record(&self, record: &TreatmentRecord) -> Result<(), DomainError> {
            self.records
                .lock()
                .unwrap()
                .insert(record.record_id, record.clone());
            Ok(())
        }

        async fn find_record_by_id(
            &self,
            record_id: Uuid,
        ) -> Result<Option<TreatmentRecord>, DomainError> {
            Ok(self.records.lock().unwrap().get(&record_id).cloned())
        }

        async fn list_records(&self, history_id: Uuid) -> Result<Vec<TreatmentRecord>, DomainError> {
            let mut out: Vec<TreatmentRecord> = self
                .records
                .lock()
                .unwrap()
                .values()
                .filter(|r| r.history_id == history_id)
                .cloned()
                .collect();
            out.sort_by_key(|r| r.performed_at);
            Ok(out)
        }
    }

    fn usecases() -> ClinicalHistoryUseCases {
        ClinicalHistoryUseCases::new(Arc::new(MemRepo::default()))
    }

    #[tokio::test]
    async fn open_is_idempotent_per_patient() {
        let uc = usecases();
        let patient = Uuid::new_v4();
        let first = uc.open_for_patient(patient).await.unwrap();
        let second = uc.open_for_patient(patient).await.unwrap();
        assert_eq!(first.history_id, second.history_id);
    }

    #[tokio::test]
    async fn get_for_unknown_patient_is_not_found() {
        let uc = usecases();
        let err = uc.get_for_patient(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound("clinical history")));
    }

    #[tokio::test]
    async fn update_clears_and_sets_fields() {
        let uc = usecases();
        let patient = Uuid::new_v4();
        uc.open_for_patient(patient).await.unwrap();

        let updated = uc
            .update_for_patient(
                patient,
                UpdateHistoryInput {
                    allergies: Some(Some("latex".into())),
                    notes: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.allergies.as_deref(), Some("latex"));
        assert!(updated.notes.is_none());
    }

    #[tokio::test]
    async fn records_attach_to_history_and_list_in_order() {
        let uc = usecases();
        let patient = Uuid::new_v4();
        let history = uc.open_for_patient(patient).await.unwrap();

        let later = Utc::now();
        let earlier = later - chrono::Duration::days(30);
        uc.add_record(
            history.history_id,
            AddTreatmentRecordInput {
                appointment_id: None,
                description: "extraction".into(),
                tooth: Some("38".into()),
                performed_at: later,
            },
        )
        .await
        .unwrap();
        uc.add_record(
            history.history_id,
            AddTreatmentRecordInput {
                appointment_id: None,
                description: "x-ray".into(),
                tooth: None,
                performed_at: earlier,
            },
        )
        .await
        .unwrap();

        let (_, records) = uc.get_for_patient(patient).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].description, "x-ray");
        assert_eq!(records[1].description, "extraction");
    }
}
