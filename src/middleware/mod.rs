pub mod audit;
pub mod auth_context;
pub mod cors;
