// src/repo/appointments.rs

use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::repository::{AppointmentFilter, AppointmentRepository};
use crate::domain::Appointment;
use crate::error::DomainError;

const APPOINTMENT_COLUMNS: &str = r#"
    appointment_id,
    patient_id,
    dentist_id,
    start_at,
    end_at,
    status,
    reason,
    notes,
    treatment_type,
    created_at,
    updated_at,
    confirmed_at,
    cancelled_at,
    completed_at
"#;

pub struct PgAppointmentRepository {
    pool: sqlx::PgPool,
}

impl PgAppointmentRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for PgAppointmentRepository {
    async fn insert(&self, a: &Appointment) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO appointment (
              appointment_id, patient_id, dentist_id,
              start_at, end_at, status, reason, notes, treatment_type,
              created_at, updated_at, confirmed_at, cancelled_at, completed_at
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14)
            "#,
        )
        .bind(a.appointment_id)
        .bind(a.patient_id)
        .bind(a.dentist_id)
        .bind(a.start_at)
        .bind(a.end_at)
        .bind(a.status)
        .bind(&a.reason)
        .bind(&a.notes)
        .bind(&a.treatment_type)
        .bind(a.created_at)
        .bind(a.updated_at)
        .bind(a.confirmed_at)
        .bind(a.cancelled_at)
        .bind(a.completed_at)
        .execute(&self.pool)
        .await
        .context("insert appointment")?;
        Ok(())
    }

    async fn update(&self, a: &Appointment) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE appointment
            SET dentist_id     = $2,
                start_at       = $3,
                end_at         = $4,
                status         = $5,
                reason         = $6,
                notes          = $7,
                treatment_type = $8,
                updated_at     = $9,
                confirmed_at   = $10,
                cancelled_at   = $11,
                completed_at   = $12
            WHERE appointment_id = $1
            "#,
        )
        .bind(a.appointment_id)
        .bind(a.dentist_id)
        .bind(a.start_at)
        .bind(a.end_at)
        .bind(a.status)
        .bind(&a.reason)
        .bind(&a.notes)
        .bind(&a.treatment_type)
        .bind(a.updated_at)
        .bind(a.confirmed_at)
        .bind(a.cancelled_at)
        .bind(a.completed_at)
        .execute(&self.pool)
        .await
        .context("update appointment")?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("appointment"));
        }
        Ok(())
    }

    async fn find_by_id(&self, appointment_id: Uuid) -> Result<Option<Appointment>, DomainError> {
        let row = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointment WHERE appointment_id = $1"
        ))
        .bind(appointment_id)
        .fetch_optional(&self.pool)
        .await
        .context("fetch appointment")?;
        Ok(row)
    }

    async fn list(&self, filter: AppointmentFilter) -> Result<Vec<Appointment>, DomainError> {
        // NULL binds fall through each predicate, so absent filters match all.
        let rows = sqlx::query_as::<_, Appointment>(&format!(
            r#"
            SELECT {APPOINTMENT_COLUMNS}
            FROM appointment
            WHERE ($1::smallint   IS NULL OR status     = $1)
              AND ($2::uuid        IS NULL OR dentist_id = $2)
              AND ($3::uuid        IS NULL OR patient_id = $3)
              AND ($4::timestamptz IS NULL OR start_at  >= $4)
              AND ($5::timestamptz IS NULL OR start_at  <  $5)
            ORDER BY start_at ASC
            "#
        ))
        .bind(filter.status.map(|s| s as i16))
        .bind(filter.dentist_id)
        .bind(filter.patient_id)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(&self.pool)
        .await
        .context("list appointments")?;
        Ok(rows)
    }
}
