pub mod appointments;
pub mod clinical_history;
