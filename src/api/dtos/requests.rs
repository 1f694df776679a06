use crate::domain::models::{attendee::NewAttendee, event::{EventDetails, EventStatus}};
use chrono::{DateTime, NaiveDateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Deserializer};

/// Accepts RFC 3339 timestamps; timestamps without an offset are read as UTC.
fn deserialize_utc<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| serde::de::Error::custom(format!("invalid timestamp '{}'", raw)))
}

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 1))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct CreateEventRequest {
    #[garde(length(chars, min = 1, max = 100))]
    pub name: String,
    #[garde(length(chars, max = 500))]
    pub description: Option<String>,
    #[garde(skip)]
    #[serde(deserialize_with = "deserialize_utc")]
    pub start_time: DateTime<Utc>,
    #[garde(skip)]
    #[serde(deserialize_with = "deserialize_utc")]
    pub end_time: DateTime<Utc>,
    #[garde(length(chars, min = 1, max = 200))]
    pub location: String,
    #[garde(range(min = 1))]
    pub max_attendees: i32,
}

impl From<CreateEventRequest> for EventDetails {
    fn from(req: CreateEventRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            start_time: req.start_time,
            end_time: req.end_time,
            location: req.location,
            max_attendees: req.max_attendees,
        }
    }
}

/// Full replacement of an event's mutable fields.
#[derive(Deserialize, Validate)]
pub struct UpdateEventRequest {
    #[garde(length(chars, min = 1, max = 100))]
    pub name: String,
    #[garde(length(chars, max = 500))]
    pub description: Option<String>,
    #[garde(skip)]
    #[serde(deserialize_with = "deserialize_utc")]
    pub start_time: DateTime<Utc>,
    #[garde(skip)]
    #[serde(deserialize_with = "deserialize_utc")]
    pub end_time: DateTime<Utc>,
    #[garde(length(chars, min = 1, max = 200))]
    pub location: String,
    #[garde(range(min = 1))]
    pub max_attendees: i32,
    #[garde(skip)]
    pub status: Option<EventStatus>,
}

impl UpdateEventRequest {
    pub fn into_parts(self) -> (EventDetails, Option<EventStatus>) {
        let details = EventDetails {
            name: self.name,
            description: self.description,
            start_time: self.start_time,
            end_time: self.end_time,
            location: self.location,
            max_attendees: self.max_attendees,
        };
        (details, self.status)
    }
}

#[derive(Deserialize, Validate)]
pub struct RegisterAttendeeRequest {
    #[garde(length(chars, min = 3, max = 100))]
    pub first_name: String,
    #[garde(length(chars, min = 3, max = 100))]
    pub last_name: String,
    #[garde(email)]
    pub email: String,
    #[garde(length(chars, min = 10, max = 15))]
    pub phone_number: String,
    #[garde(skip)]
    pub event_id: i64,
}

impl From<RegisterAttendeeRequest> for NewAttendee {
    fn from(req: RegisterAttendeeRequest) -> Self {
        Self {
            event_id: req.event_id,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone_number: req.phone_number,
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct CheckInRequest {
    #[garde(email)]
    pub email: String,
    #[garde(skip)]
    pub event_id: i64,
}
