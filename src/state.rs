use std::sync::Arc;
use crate::domain::ports::{AttendeeRepository, Clock, EventRepository};
use crate::domain::services::{
    auth_service::AuthService, event_service::EventService,
    registration_service::RegistrationService,
};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub event_repo: Arc<dyn EventRepository>,
    pub attendee_repo: Arc<dyn AttendeeRepository>,
    pub clock: Arc<dyn Clock>,
    pub event_service: Arc<EventService>,
    pub registration_service: Arc<RegistrationService>,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    pub fn new(
        config: Config,
        event_repo: Arc<dyn EventRepository>,
        attendee_repo: Arc<dyn AttendeeRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let event_service = Arc::new(EventService::new(event_repo.clone(), clock.clone()));
        let registration_service = Arc::new(RegistrationService::new(
            attendee_repo.clone(),
            event_repo.clone(),
            clock.clone(),
        ));
        let auth_service = Arc::new(AuthService::new(config.clone()));

        Self {
            config,
            event_repo,
            attendee_repo,
            clock,
            event_service,
            registration_service,
            auth_service,
        }
    }
}
