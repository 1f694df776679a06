pub mod auth;
pub mod validated;
