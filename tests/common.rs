use event_manager::{
    api::router::create_router,
    state::AppState,
    config::Config,
    domain::ports::Clock,
    infra::{
        factory::connect_sqlite,
        repositories::{
            sqlite_attendee_repo::SqliteAttendeeRepo,
            sqlite_event_repo::SqliteEventRepo,
        },
    },
};
use argon2::{password_hash::{PasswordHasher, SaltString}, Argon2};
use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::{Pool, Sqlite};
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
    Router,
};
use tower::ServiceExt;
use serde_json::{json, Value};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "password123";

/// Clock the tests move by hand.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// 2030-01-01 09:00 UTC, where every test starts.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 1, 1, 9, 0, 0).unwrap()
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub clock: Arc<ManualClock>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let pool = connect_sqlite(&db_url)
            .await
            .expect("Failed to set up test db");

        let salt = SaltString::from_b64("c2FsdHNhbHRzYWx0").unwrap();
        let admin_password_hash = Argon2::default()
            .hash_password(ADMIN_PASSWORD.as_bytes(), &salt)
            .unwrap()
            .to_string();

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret_key: "test-secret".to_string(),
            auth_issuer: "test-issuer".to_string(),
            access_token_expire_minutes: 30,
            sweep_interval: std::time::Duration::from_secs(60),
            admin_email: ADMIN_EMAIL.to_string(),
            admin_password_hash,
        };

        let clock = Arc::new(ManualClock::new(epoch()));

        let state = Arc::new(AppState::new(
            config,
            Arc::new(SqliteEventRepo::new(pool.clone())),
            Arc::new(SqliteAttendeeRepo::new(pool.clone())),
            clock.clone(),
        ));

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            clock,
        }
    }

    pub async fn request(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    pub async fn login(&self) -> String {
        let response = self.request(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
        ).await;

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let body = parse_body(response).await;
        assert_eq!(body["token_type"], "bearer");
        body["access_token"].as_str().expect("No access_token in body").to_string()
    }

    /// Creates an event starting `starts_in` from the test clock, lasting `length`.
    pub async fn create_event(&self, token: &str, name: &str, starts_in: Duration, length: Duration, max_attendees: i32) -> Value {
        let start = self.clock.now() + starts_in;
        let response = self.request(
            "POST",
            "/api/v1/events",
            Some(token),
            Some(json!({
                "name": name,
                "description": "Integration test event",
                "start_time": start.to_rfc3339(),
                "end_time": (start + length).to_rfc3339(),
                "location": "Convention Center",
                "max_attendees": max_attendees
            })),
        ).await;

        assert_eq!(response.status(), StatusCode::OK, "event creation failed");
        parse_body(response).await
    }

    pub async fn register(&self, event_id: i64, first_name: &str, email: &str) -> Response {
        self.request(
            "POST",
            "/api/v1/attendees/register",
            None,
            Some(json!({
                "first_name": first_name,
                "last_name": "Tester",
                "email": email,
                "phone_number": "0123456789",
                "event_id": event_id
            })),
        ).await
    }

    pub async fn check_in(&self, event_id: i64, email: &str) -> Response {
        self.request(
            "POST",
            "/api/v1/attendees/check-in",
            None,
            Some(json!({ "email": email, "event_id": event_id })),
        ).await
    }

    pub async fn get_event(&self, event_id: i64) -> Value {
        let response = self.request("GET", &format!("/api/v1/events/{}", event_id), None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        parse_body(response).await
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
