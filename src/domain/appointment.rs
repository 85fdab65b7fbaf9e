// src/domain/appointment.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::DomainError;

/*
Appointment lifecycle:

  pending -> confirmed -> in_progress -> completed
  pending|confirmed -> cancelled
  pending|confirmed -> no_show

cancelled, completed and no_show are terminal.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "smallint")]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum AppointmentStatus {
    Pending = 0,
    Confirmed = 1,
    InProgress = 2,
    Completed = 3,
    Cancelled = 4,
    NoShow = 5,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::InProgress => "in_progress",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::NoShow => "no_show",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled | AppointmentStatus::NoShow
        )
    }

    /// The transition table. Exhaustive over both states so adding a status
    /// forces this match to be revisited.
    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        match (*self, next) {
            (Pending, Confirmed) => true,
            (Pending, Cancelled) => true,
            (Pending, NoShow) => true,
            (Confirmed, InProgress) => true,
            (Confirmed, Completed) => true,
            (Confirmed, Cancelled) => true,
            (Confirmed, NoShow) => true,
            (InProgress, Completed) => true,
            (Pending, _) | (Confirmed, _) | (InProgress, _) => false,
            // Terminal states admit nothing.
            (Completed, _) | (Cancelled, _) | (NoShow, _) => false,
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "in_progress" => Ok(AppointmentStatus::InProgress),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            "no_show" => Ok(AppointmentStatus::NoShow),
            other => Err(DomainError::Validation(format!("unknown status: {other}"))),
        }
    }
}

/// Scheduled slot; end must be strictly after start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

impl TimeSlot {
    pub fn new(start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> Result<Self, DomainError> {
        if end_at <= start_at {
            return Err(DomainError::Validation("end_at must be after start_at".into()));
        }
        Ok(Self { start_at, end_at })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Appointment {
    pub appointment_id: Uuid,
    pub patient_id: Uuid,
    pub dentist_id: Option<Uuid>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub reason: String,
    pub notes: Option<String>,
    pub treatment_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Appointment {
    /// New appointments always start out pending. The slot has already been
    /// validated by `TimeSlot::new`.
    pub fn new(
        patient_id: Uuid,
        dentist_id: Option<Uuid>,
        slot: TimeSlot,
        reason: String,
        treatment_type: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if reason.trim().is_empty() {
            return Err(DomainError::Validation("reason is required".into()));
        }
        Ok(Self {
            appointment_id: Uuid::new_v4(),
            patient_id,
            dentist_id,
            start_at: slot.start_at,
            end_at: slot.end_at,
            status: AppointmentStatus::Pending,
            reason: reason.trim().to_string(),
            notes: None,
            treatment_type,
            created_at: now,
            updated_at: now,
            confirmed_at: None,
            cancelled_at: None,
            completed_at: None,
        })
    }

    fn transition(
        &mut self,
        action: &'static str,
        next: AppointmentStatus,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                action,
                status: self.status,
            });
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }

    /// pending -> confirmed, stamping `confirmed_at`.
    pub fn confirm(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.transition("confirm", AppointmentStatus::Confirmed, now)?;
        self.confirmed_at = Some(now);
        Ok(())
    }

    /// pending|confirmed -> cancelled, stamping `cancelled_at`.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.transition("cancel", AppointmentStatus::Cancelled, now)?;
        self.cancelled_at = Some(now);
        Ok(())
    }

    /// confirmed -> in_progress.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.transition("start", AppointmentStatus::InProgress, now)
    }

    /// confirmed|in_progress -> completed, stamping `completed_at`.
    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.transition("complete", AppointmentStatus::Completed, now)?;
        self.completed_at = Some(now);
        Ok(())
    }

    /// pending|confirmed -> no_show.
    pub fn mark_no_show(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.transition("mark_no_show", AppointmentStatus::NoShow, now)
    }

    /// Overwrites the dentist reference. Allowed any time before completion;
    /// not a status transition.
    pub fn assign_dentist(&mut self, dentist_id: Uuid, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.status == AppointmentStatus::Completed {
            return Err(DomainError::InvalidTransition {
                action: "assign_dentist",
                status: self.status,
            });
        }
        self.dentist_id = Some(dentist_id);
        self.updated_at = now;
        Ok(())
    }

    /// Moves the slot and optionally edits reason/notes/treatment type.
    /// Only sensible while the appointment is still pending or confirmed.
    pub fn reschedule(&mut self, slot: TimeSlot, now: DateTime<Utc>) -> Result<(), DomainError> {
        if !matches!(
            self.status,
            AppointmentStatus::Pending | AppointmentStatus::Confirmed
        ) {
            return Err(DomainError::InvalidTransition {
                action: "reschedule",
                status: self.status,
            });
        }
        self.start_at = slot.start_at;
        self.end_at = slot.end_at;
        self.updated_at = now;
        Ok(())
    }

    pub fn set_notes(&mut self, notes: Option<String>, now: DateTime<Utc>) {
        self.notes = notes;
        self.updated_at = now;
    }

    pub fn set_treatment_type(&mut self, treatment_type: Option<String>, now: DateTime<Utc>) {
        self.treatment_type = treatment_type;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn slot() -> TimeSlot {
        let start = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 10, 9, 30, 0).unwrap();
        TimeSlot::new(start, end).unwrap()
    }

    fn pending() -> Appointment {
        Appointment::new(
            Uuid::new_v4(),
            None,
            slot(),
            "checkup".into(),
            None,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn slot_rejects_inverted_range() {
        let start = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        assert!(TimeSlot::new(start, start).is_err());
        assert!(TimeSlot::new(start, start - chrono::Duration::minutes(1)).is_err());
    }

    #[test]
    fn new_appointment_is_pending_and_requires_reason() {
        let a = pending();
        assert_eq!(a.status, AppointmentStatus::Pending);
        assert!(a.confirmed_at.is_none());

        let bad = Appointment::new(Uuid::new_v4(), None, slot(), "   ".into(), None, Utc::now());
        assert!(bad.is_err());
    }

    #[test]
    fn confirm_from_pending_stamps_timestamp() {
        let mut a = pending();
        let now = Utc::now();
        a.confirm(now).unwrap();
        assert_eq!(a.status, AppointmentStatus::Confirmed);
        assert_eq!(a.confirmed_at, Some(now));
        assert_eq!(a.updated_at, now);
    }

    #[test]
    fn confirm_fails_from_every_non_pending_state() {
        for status in [
            AppointmentStatus::Confirmed,
            AppointmentStatus::InProgress,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::NoShow,
        ] {
            let mut a = pending();
            a.status = status;
            assert!(a.confirm(Utc::now()).is_err(), "confirm from {status}");
        }
    }

    #[test]
    fn cancel_from_confirmed_stamps_timestamp() {
        let mut a = pending();
        a.confirm(Utc::now()).unwrap();
        let now = Utc::now();
        a.cancel(now).unwrap();
        assert_eq!(a.status, AppointmentStatus::Cancelled);
        assert_eq!(a.cancelled_at, Some(now));
    }

    #[test]
    fn cancel_fails_from_terminal_states() {
        for status in [
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::NoShow,
        ] {
            let mut a = pending();
            a.status = status;
            assert!(a.cancel(Utc::now()).is_err(), "cancel from {status}");
        }
    }

    #[test]
    fn complete_legal_from_confirmed_and_in_progress_only() {
        let mut a = pending();
        assert!(a.complete(Utc::now()).is_err());

        a.confirm(Utc::now()).unwrap();
        let mut direct = a.clone();
        direct.complete(Utc::now()).unwrap();
        assert_eq!(direct.status, AppointmentStatus::Completed);
        assert!(direct.completed_at.is_some());

        a.start(Utc::now()).unwrap();
        assert_eq!(a.status, AppointmentStatus::InProgress);
        a.complete(Utc::now()).unwrap();
        assert_eq!(a.status, AppointmentStatus::Completed);
    }

    #[test]
    fn no_show_from_pending_or_confirmed() {
        let mut a = pending();
        a.mark_no_show(Utc::now()).unwrap();
        assert_eq!(a.status, AppointmentStatus::NoShow);

        let mut b = pending();
        b.confirm(Utc::now()).unwrap();
        b.mark_no_show(Utc::now()).unwrap();
        assert_eq!(b.status, AppointmentStatus::NoShow);

        let mut c = pending();
        c.status = AppointmentStatus::InProgress;
        assert!(c.mark_no_show(Utc::now()).is_err());
    }

    #[test]
    fn assign_dentist_allowed_before_completion() {
        let dentist = Uuid::new_v4();

        let mut a = pending();
        a.assign_dentist(dentist, Utc::now()).unwrap();
        assert_eq!(a.dentist_id, Some(dentist));

        // Still allowed after cancellation per the lifecycle rules; only
        // completion closes the record.
        let mut b = pending();
        b.cancel(Utc::now()).unwrap();
        assert!(b.assign_dentist(dentist, Utc::now()).is_ok());

        let mut c = pending();
        c.confirm(Utc::now()).unwrap();
        c.complete(Utc::now()).unwrap();
        assert!(c.assign_dentist(dentist, Utc::now()).is_err());
    }

    #[test]
    fn reschedule_only_while_open() {
        let mut a = pending();
        let new_slot = TimeSlot::new(
            Utc.with_ymd_and_hms(2026, 3, 11, 14, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 11, 15, 0, 0).unwrap(),
        )
        .unwrap();
        a.reschedule(new_slot, Utc::now()).unwrap();
        assert_eq!(a.start_at, new_slot.start_at);

        let mut b = pending();
        b.cancel(Utc::now()).unwrap();
        assert!(b.reschedule(new_slot, Utc::now()).is_err());
    }

    #[test]
    fn status_parses_from_wire_names() {
        assert_eq!(
            "in_progress".parse::<AppointmentStatus>().unwrap(),
            AppointmentStatus::InProgress
        );
        assert!("rescheduled".parse::<AppointmentStatus>().is_err());
    }

    #[test]
    fn terminal_states_admit_no_transition() {
        use AppointmentStatus::*;
        for terminal in [Completed, Cancelled, NoShow] {
            assert!(terminal.is_terminal());
            for next in [Pending, Confirmed, InProgress, Completed, Cancelled, NoShow] {
                assert!(!terminal.can_transition_to(next), "{terminal} -> {next}");
            }
        }
    }
}
