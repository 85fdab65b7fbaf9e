// src/dto.rs
//
// Wire-format shaping. Entities carry `DateTime<Utc>`; responses carry
// ISO-8601 strings with millisecond precision.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Appointment, ClinicalHistory, TreatmentRecord};

/// Standard success envelope, mirroring the error envelope in `error.rs`.
#[derive(Debug, Serialize)]
pub struct ApiOk<T> {
    pub data: T,
}

pub fn to_iso8601(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn to_iso8601_opt(ts: Option<DateTime<Utc>>) -> Option<String> {
    ts.map(to_iso8601)
}

#[derive(Debug, Serialize)]
pub struct AppointmentDto {
    pub appointment_id: Uuid,
    pub patient_id: Uuid,
    pub dentist_id: Option<Uuid>,
    pub start_at: String,
    pub end_at: String,
    pub status: String,
    pub reason: String,
    pub notes: Option<String>,
    pub treatment_type: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub confirmed_at: Option<String>,
    pub cancelled_at: Option<String>,
    pub completed_at: Option<String>,
}

impl From<&Appointment> for AppointmentDto {
    fn from(a: &Appointment) -> Self {
        Self {
            appointment_id: a.appointment_id,
            patient_id: a.patient_id,
            dentist_id: a.dentist_id,
            start_at: to_iso8601(a.start_at),
            end_at: to_iso8601(a.end_at),
            status: a.status.as_str().to_string(),
            reason: a.reason.clone(),
            notes: a.notes.clone(),
            treatment_type: a.treatment_type.clone(),
            created_at: to_iso8601(a.created_at),
            updated_at: to_iso8601(a.updated_at),
            confirmed_at: to_iso8601_opt(a.confirmed_at),
            cancelled_at: to_iso8601_opt(a.cancelled_at),
            completed_at: to_iso8601_opt(a.completed_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TreatmentRecordDto {
    pub record_id: Uuid,
    pub history_id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub description: String,
    pub tooth: Option<String>,
    pub performed_at: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&TreatmentRecord> for TreatmentRecordDto {
    fn from(r: &TreatmentRecord) -> Self {
        Self {
            record_id: r.record_id,
            history_id: r.history_id,
            appointment_id: r.appointment_id,
            description: r.description.clone(),
            tooth: r.tooth.clone(),
            performed_at: to_iso8601(r.performed_at),
            notes: r.notes.clone(),
            created_at: to_iso8601(r.created_at),
            updated_at: to_iso8601(r.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClinicalHistoryDto {
    pub history_id: Uuid,
    pub patient_id: Uuid,
    pub allergies: Option<String>,
    pub medications: Option<String>,
    pub medical_conditions: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub records: Vec<TreatmentRecordDto>,
}

impl ClinicalHistoryDto {
    pub fn from_parts(h: &ClinicalHistory, records: &[TreatmentRecord]) -> Self {
        Self {
            history_id: h.history_id,
            patient_id: h.patient_id,
            allergies: h.allergies.clone(),
            medications: h.medications.clone(),
            medical_conditions: h.medical_conditions.clone(),
            notes: h.notes.clone(),
            created_at: to_iso8601(h.created_at),
            updated_at: to_iso8601(h.updated_at),
            records: records.iter().map(TreatmentRecordDto::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AppointmentStatus, TimeSlot};
    use chrono::TimeZone;

    #[test]
    fn iso8601_uses_millisecond_precision_with_z_suffix() {
        let ts = Utc.with_ymd_and_hms(2026, 5, 20, 8, 30, 0).unwrap();
        assert_eq!(to_iso8601(ts), "2026-05-20T08:30:00.000Z");
    }

    #[test]
    fn appointment_dto_renders_entity_timestamps() {
        let start = Utc.with_ymd_and_hms(2026, 5, 20, 8, 30, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 5, 20, 9, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        let mut a = Appointment::new(
            Uuid::new_v4(),
            None,
            TimeSlot::new(start, end).unwrap(),
            "checkup".into(),
            None,
            now,
        )
        .unwrap();
        let confirm_time = Utc.with_ymd_and_hms(2026, 5, 2, 12, 0, 0).unwrap();
        a.confirm(confirm_time).unwrap();

        let dto = AppointmentDto::from(&a);
        assert_eq!(dto.status, "confirmed");
        assert_eq!(dto.start_at, to_iso8601(start));
        assert_eq!(dto.created_at, "2026-05-01T12:00:00.000Z");
        assert_eq!(dto.confirmed_at.as_deref(), Some("2026-05-02T12:00:00.000Z"));
        assert!(dto.cancelled_at.is_none());
        assert_eq!(a.status, AppointmentStatus::Confirmed);
    }

    #[test]
    fn history_dto_embeds_records() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        let h = ClinicalHistory::new(Uuid::new_v4(), now);
        let r = TreatmentRecord::new(h.history_id, None, "sealant".into(), None, now, now).unwrap();
        let dto = ClinicalHistoryDto::from_parts(&h, &[r]);
        assert_eq!(dto.records.len(), 1);
        assert_eq!(dto.records[0].performed_at, "2026-05-01T12:00:00.000Z");
    }
}
