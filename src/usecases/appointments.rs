// src/usecases/appointments.rs
//
// Each use case fetches the entity through the repository, invokes one
// entity method, persists the result and returns the updated entity.
// No transactions span multiple entities.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{AppointmentFilter, AppointmentRepository};
use crate::domain::{Appointment, TimeSlot};
use crate::error::DomainError;

pub struct CreateAppointmentInput {
    pub patient_id: Uuid,
    pub dentist_id: Option<Uuid>,
    pub slot: TimeSlot,
    pub reason: String,
    pub treatment_type: Option<String>,
}

#[derive(Clone)]
pub struct AppointmentUseCases {
    repo: Arc<dyn AppointmentRepository>,
}

impl AppointmentUseCases {
    pub fn new(repo: Arc<dyn AppointmentRepository>) -> Self {
        Self { repo }
    }

    async fn fetch(&self, appointment_id: Uuid) -> Result<Appointment, DomainError> {
        self.repo
            .find_by_id(appointment_id)
            .await?
            .ok_or(DomainError::NotFound("appointment"))
    }

    pub async fn create(&self, input: CreateAppointmentInput) -> Result<Appointment, DomainError> {
        let appointment = Appointment::new(
            input.patient_id,
            input.dentist_id,
            input.slot,
            input.reason,
            input.treatment_type,
            Utc::now(),
        )?;
        self.repo.insert(&appointment).await?;
        Ok(appointment)
    }

    pub async fn get(&self, appointment_id: Uuid) -> Result<Appointment, DomainError> {
        self.fetch(appointment_id).await
    }

    pub async fn list(&self, filter: AppointmentFilter) -> Result<Vec<Appointment>, DomainError> {
        self.repo.list(filter).await
    }

    pub async fn confirm(&self, appointment_id: Uuid) -> Result<Appointment, DomainError> {
        let mut appointment = self.fetch(appointment_id).await?;
        appointment.confirm(Utc::now())?;
        self.repo.update(&appointment).await?;
        Ok(appointment)
    }

    pub async fn cancel(&self, appointment_id: Uuid) -> Result<Appointment, DomainError> {
        let mut appointment = self.fetch(appointment_id).await?;
        appointment.cancel(Utc::now())?;
        self.repo.update(&appointment).await?;
        Ok(appointment)
    }

    pub async fn start(&self, appointment_id: Uuid) -> Result<Appointment, DomainError> {
        let mut appointment = self.fetch(appointment_id).await?;
        appointment.start(Utc::now())?;
        self.repo.update(&appointment).await?;
        Ok(appointment)
    }

    pub async fn complete(&self, appointment_id: Uuid) -> Result<Appointment, DomainError> {
        let mut appointment = self.fetch(appointment_id).await?;
        appointment.complete(Utc::now())?;
        self.repo.update(&appointment).await?;
        Ok(appointment)
    }

    pub async fn mark_no_show(&self, appointment_id: Uuid) -> Result<Appointment, DomainError> {
        let mut appointment = self.fetch(appointment_id).await?;
        appointment.mark_no_show(Utc::now())?;
        self.repo.update(&appointment).await?;
        Ok(appointment)
    }

    pub async fn assign_dentist(
        &self,
        appointment_id: Uuid,
        dentist_id: Uuid,
    ) -> Result<Appointment, DomainError> {
        let mut appointment = self.fetch(appointment_id).await?;
        appointment.assign_dentist(dentist_id, Utc::now())?;
        self.repo.update(&appointment).await?;
        Ok(appointment)
    }

    pub async fn reschedule(
        &self,
        appointment_id: Uuid,
        slot: TimeSlot,
        reason: Option<String>,
        notes: Option<Option<String>>,
        treatment_type: Option<Option<String>>,
    ) -> Result<Appointment, DomainError> {
        let mut appointment = self.fetch(appointment_id).await?;
        let now = Utc::now();
        appointment.reschedule(slot, now)?;
        if let Some(reason) = reason {
            if reason.trim().is_empty() {
                return Err(DomainError::Validation("reason is required".into()));
            }
            appointment.reason = reason.trim().to_string();
        }
        if let Some(notes) = notes {
            appointment.set_notes(notes, now);
        }
        if let Some(treatment_type) = treatment_type {
            appointment.set_treatment_type(treatment_type, now);
        }
        self.repo.update(&appointment).await?;
        Ok(appointment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AppointmentStatus;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory stand-in for the Postgres repository.
    #[derive(Default)]
    struct MemRepo {
        rows: Mutex<HashMap<Uuid, Appointment>>,
    }

    #[async_trait]
    impl AppointmentRepository for MemRepo {
        async fn insert(&self, appointment: &Appointment) -> Result<(), DomainError> {
            self.rows
                .lock()
                .unwrap()
                .insert(appointment.appointment_id, appointment.clone());
            Ok(())
        }

        async fn update(&self, appointment: &Appointment) -> Result<(), DomainError> {
            let mut rows = self.rows.lock().unwrap();
            if !rows.contains_key(&appointment.appointment_id) {
                return Err(DomainError::NotFound("appointment"));
            }
            rows.insert(appointment.appointment_id, appointment.clone());
            Ok(())
        }

        async fn find_by_id(&self, appointment_id: Uuid) -> Result<Option<Appointment>, DomainError> {
            Ok(self.rows.lock().unwrap().get(&appointment_id).cloned())
        }

        async fn list(&self, filter: AppointmentFilter) -> Result<Vec<Appointment>, DomainError> {
            let mut out: Vec<Appointment> = self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|a| filter.status.is_none_or(|s| a.status == s))
                .filter(|a| filter.dentist_id.is_none_or(|d| a.dentist_id == Some(d)))
                .filter(|a| filter.patient_id.is_none_or(|p| a.patient_id == p))
                .filter(|a| filter.from.is_none_or(|t| a.start_at >= t))
                .filter(|a| filter.to.is_none_or(|t| a.start_at < t))
                .cloned()
                .collect();
            out.sort_by_key(|a| a.start_at);
            Ok(out)
        }
    }

    fn usecases() -> (AppointmentUseCases, Arc<MemRepo>) {
        let repo = Arc::new(MemRepo::default());
        (AppointmentUseCases::new(repo.clone()), repo)
    }

    fn slot() -> TimeSlot {
        TimeSlot::new(
            Utc.with_ymd_and_hms(2026, 4, 1, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 4, 1, 10, 30, 0).unwrap(),
        )
        .unwrap()
    }

    fn create_input() -> CreateAppointmentInput {
        CreateAppointmentInput {
            patient_id: Uuid::new_v4(),
            dentist_id: None,
            slot: slot(),
            reason: "routine cleaning".into(),
            treatment_type: Some("cleaning".into()),
        }
    }

    #[tokio::test]
    async fn create_persists_a_pending_appointment() {
        let (uc, repo) = usecases();
        let a = uc.create(create_input()).await.unwrap();
        assert_eq!(a.status, AppointmentStatus::Pending);
        let stored = repo.find_by_id(a.appointment_id).await.unwrap().unwrap();
        assert_eq!(stored.reason, "routine cleaning");
    }

    #[tokio::test]
    async fn get_missing_id_is_not_found() {
        let (uc, _) = usecases();
        let err = uc.get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound("appointment")));
    }

    #[tokio::test]
    async fn confirm_then_cancel_round_trips_through_the_repo() {
        let (uc, repo) = usecases();
        let a = uc.create(create_input()).await.unwrap();

        let confirmed = uc.confirm(a.appointment_id).await.unwrap();
        assert_eq!(confirmed.status, AppointmentStatus::Confirmed);
        assert!(confirmed.confirmed_at.is_some());

        let cancelled = uc.cancel(a.appointment_id).await.unwrap();
        assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
        assert!(cancelled.cancelled_at.is_some());

        let stored = repo.find_by_id(a.appointment_id).await.unwrap().unwrap();
        assert_eq!(stored.status, AppointmentStatus::Cancelled);
    }

    #[tokio::test]
    async fn confirm_twice_is_an_invalid_transition() {
        let (uc, _) = usecases();
        let a = uc.create(create_input()).await.unwrap();
        uc.confirm(a.appointment_id).await.unwrap();
        let err = uc.confirm(a.appointment_id).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn cancelled_appointment_rejects_confirm_and_cancel() {
        let (uc, _) = usecases();
        let a = uc.create(create_input()).await.unwrap();
        uc.cancel(a.appointment_id).await.unwrap();
        assert!(uc.confirm(a.appointment_id).await.is_err());
        assert!(uc.cancel(a.appointment_id).await.is_err());
    }

    #[tokio::test]
    async fn list_filters_by_status() {
        let (uc, _) = usecases();
        let a = uc.create(create_input()).await.unwrap();
        uc.create(create_input()).await.unwrap();
        uc.confirm(a.appointment_id).await.unwrap();

        let confirmed = uc
            .list(AppointmentFilter {
                status: Some(AppointmentStatus::Confirmed),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(confirmed.len(), 1);
        assert_eq!(confirmed[0].appointment_id, a.appointment_id);

        let all = uc.list(AppointmentFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn assign_dentist_overwrites_reference() {
        let (uc, _) = usecases();
        let a = uc.create(create_input()).await.unwrap();
        let dentist = Uuid::new_v4();
        let updated = uc.assign_dentist(a.appointment_id, dentist).await.unwrap();
        assert_eq!(updated.dentist_id, Some(dentist));

        let other = Uuid::new_v4();
        let updated = uc.assign_dentist(a.appointment_id, other).await.unwrap();
        assert_eq!(updated.dentist_id, Some(other));
    }

    #[tokio::test]
    async fn reschedule_moves_slot_and_edits_fields() {
        let (uc, _) = usecases();
        let a = uc.create(create_input()).await.unwrap();
        let new_slot = TimeSlot::new(
            Utc.with_ymd_and_hms(2026, 4, 2, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 4, 2, 9, 45, 0).unwrap(),
        )
        .unwrap();
        let updated = uc
            .reschedule(
                a.appointment_id,
                new_slot,
                Some("crown fitting".into()),
                Some(Some("bring x-rays".into())),
                None,
            )
            .await
            .unwrap();
        assert_eq!(updated.start_at, new_slot.start_at);
        assert_eq!(updated.reason, "crown fitting");
        assert_eq!(updated.notes.as_deref(), Some("bring x-rays"));
        assert_eq!(updated.treatment_type.as_deref(), Some("cleaning"));
    }
}
