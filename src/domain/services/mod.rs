pub mod auth_service;
pub mod event_service;
pub mod registration_service;
