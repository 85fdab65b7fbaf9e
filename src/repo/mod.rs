pub mod appointments;
pub mod clinical_history;

pub use appointments::PgAppointmentRepository;
pub use clinical_history::PgClinicalHistoryRepository;
