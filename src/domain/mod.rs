pub mod appointment;
pub mod clinical_history;
pub mod repository;

pub use appointment::{Appointment, AppointmentStatus, TimeSlot};
pub use clinical_history::{ClinicalHistory, TreatmentRecord};
