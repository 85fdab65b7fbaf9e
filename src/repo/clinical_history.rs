// src/repo/clinical_history.rs

use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::repository::ClinicalHistoryRepository;
use crate::domain::{ClinicalHistory, TreatmentRecord};
use crate::error::DomainError;

pub struct PgClinicalHistoryRepository {
    pool: sqlx::PgPool,
}

impl PgClinicalHistoryRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClinicalHistoryRepository for PgClinicalHistoryRepository {
    async fn insert_history(&self, h: &ClinicalHistory) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO clinical_history (
              history_id, patient_id, allergies, medications,
              medical_conditions, notes, created_at, updated_at
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
            "#,
        )
        .bind(h.history_id)
        .bind(h.patient_id)
        .bind(&h.allergies)
        .bind(&h.medications)
        .bind(&h.medical_conditions)
        .bind(&h.notes)
        .bind(h.created_at)
        .bind(h.updated_at)
        .execute(&self.pool)
        .await
        .context("insert clinical history")?;
        Ok(())
    }

    async fn update_history(&self, h: &ClinicalHistory) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE clinical_history
            SET allergies          = $2,
                medications        = $3,
                medical_conditions = $4,
                notes              = $5,
                updated_at         = $6
            WHERE history_id = $1
            "#,
        )
        .bind(h.history_id)
        .bind(&h.allergies)
        .bind(&h.medications)
        .bind(&h.medical_conditions)
        .bind(&h.notes)
        .bind(h.updated_at)
        .execute(&self.pool)
        .await
        .context("update clinical history")?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("clinical history"));
        }
        Ok(())
    }

    async fn find_history_by_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Option<ClinicalHistory>, DomainError> {
        let row = sqlx::query_as::<_, ClinicalHistory>(
            r#"
            SELECT history_id, patient_id, allergies, medications,
                   medical_conditions, notes, created_at, updated_at
            FROM clinical_history
            WHERE patient_id = $1
            "#,
        )
        .bind(patient_id)
        .fetch_optional(&self.pool)
        .await
        .context("fetch clinical history")?;
        Ok(row)
    }

    async fn insert_record(&self, r: &TreatmentRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO treatment_record (
              record_id, history_id, appointment_id, description,
              tooth, performed_at, notes, created_at, updated_at
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)
            "#,
        )
        .bind(r.record_id)
        .bind(r.history_id)
        .bind(r.appointment_id)
        .bind(&r.description)
        .bind(&r.tooth)
        .bind(r.performed_at)
        .bind(&r.notes)
        .bind(r.created_at)
        .bind(r.updated_at)
        .execute(&self.pool)
        .await
        .context("insert treatment record")?;
        Ok(())
    }

    async fn update_record(&self, r: &TreatmentRecord) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE treatment_record
            SET description = $2,
                notes       = $3,
                updated_at  = $4
            WHERE record_id = $1
            "#,
        )
        .bind(r.record_id)
        .bind(&r.description)
        .bind(&r.notes)
        .bind(r.updated_at)
        .execute(&self.pool)
        .await
        .context("update treatment record")?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("treatment record"));
        }
        Ok(())
    }

    async fn find_record_by_id(&self, record_id: Uuid) -> Result<Option<TreatmentRecord>, DomainError> {
        let row = sqlx::query_as::<_, TreatmentRecord>(
            r#"
            SELECT record_id, history_id, appointment_id, description,
                   tooth, performed_at, notes, created_at, updated_at
            FROM treatment_record
            WHERE record_id = $1
            "#,
        )
        .bind(record_id)
        .fetch_optional(&self.pool)
        .await
        .context("fetch treatment record")?;
        Ok(row)
    }

    async fn list_records(&self, history_id: Uuid) -> Result<Vec<TreatmentRecord>, DomainError> {
        let rows = sqlx::query_as::<_, TreatmentRecord>(
            r#"
            SELECT record_id, history_id, appointment_id, description,
                   tooth, performed_at, notes, created_at, updated_at
            FROM treatment_record
            WHERE history_id = $1
            ORDER BY performed_at ASC
            "#,
        )
        .bind(history_id)
        .fetch_all(&self.pool)
        .await
        .context("list treatment records")?;
        Ok(rows)
    }
}
