mod common;

use axum::http::StatusCode;
use chrono::Duration;
use common::{parse_body, TestApp};
use std::sync::Arc;
use tokio::task::JoinSet;

#[tokio::test]
async fn test_register_and_check_in_flow() {
    let app = TestApp::new().await;
    let token = app.login().await;
    let event = app.create_event(&token, "Concert", Duration::hours(1), Duration::hours(2), 10).await;
    let id = event["id"].as_i64().unwrap();

    let response = app.register(id, "Alice", "alice@example.com").await;
    assert_eq!(response.status(), StatusCode::OK);
    let attendee = parse_body(response).await;
    assert_eq!(attendee["event_id"], id);
    assert_eq!(attendee["check_in_status"], false);
    assert!(attendee["id"].as_i64().is_some());

    // Doors not open yet
    let response = app.check_in(id, "alice@example.com").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(response).await["code"], "NOT_STARTED");

    app.clock.advance(Duration::minutes(90));
    let response = app.check_in(id, "alice@example.com").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_body(response).await["check_in_status"], true);

    // Checking in twice is harmless
    let response = app.check_in(id, "alice@example.com").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_body(response).await["check_in_status"], true);

    app.clock.advance(Duration::hours(2));
    let response = app.check_in(id, "alice@example.com").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(response).await["code"], "EVENT_OVER");
}

#[tokio::test]
async fn test_check_in_unknown_attendee() {
    let app = TestApp::new().await;
    let token = app.login().await;
    let event = app.create_event(&token, "Talk", Duration::hours(1), Duration::hours(1), 10).await;
    let other = app.create_event(&token, "Other Talk", Duration::hours(1), Duration::hours(1), 10).await;
    let id = event["id"].as_i64().unwrap();
    let other_id = other["id"].as_i64().unwrap();

    app.register(id, "Alice", "alice@example.com").await;
    app.clock.advance(Duration::minutes(90));

    let response = app.check_in(id, "nobody@example.com").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Registration is per event
    let response = app.check_in(other_id, "alice@example.com").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_registration_rules() {
    let app = TestApp::new().await;
    let token = app.login().await;
    let event = app.create_event(&token, "Small Room", Duration::hours(1), Duration::hours(1), 2).await;
    let second = app.create_event(&token, "Big Room", Duration::hours(1), Duration::hours(1), 50).await;
    let id = event["id"].as_i64().unwrap();
    let second_id = second["id"].as_i64().unwrap();

    assert_eq!(app.register(id, "Alice", "alice@example.com").await.status(), StatusCode::OK);

    let response = app.register(id, "Alice", "alice@example.com").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(response).await["code"], "DUPLICATE_REGISTRATION");

    // Same email, different event
    assert_eq!(app.register(second_id, "Alice", "alice@example.com").await.status(), StatusCode::OK);

    assert_eq!(app.register(id, "Bobby", "bob@example.com").await.status(), StatusCode::OK);

    let response = app.register(id, "Carol", "carol@example.com").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(response).await["code"], "CAPACITY_EXCEEDED");

    // Capacity is checked before duplicates
    let response = app.register(id, "Alice", "alice@example.com").await;
    assert_eq!(parse_body(response).await["code"], "CAPACITY_EXCEEDED");

    let response = app.register(9999, "Dave", "dave@example.com").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_registration_closes_at_start() {
    let app = TestApp::new().await;
    let token = app.login().await;
    let event = app.create_event(&token, "Keynote", Duration::hours(1), Duration::hours(1), 10).await;
    let id = event["id"].as_i64().unwrap();

    app.clock.advance(Duration::hours(1));
    let response = app.register(id, "Late", "late@example.com").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_registration_field_validation() {
    let app = TestApp::new().await;
    let token = app.login().await;
    let event = app.create_event(&token, "Forms", Duration::hours(1), Duration::hours(1), 10).await;
    let id = event["id"].as_i64().unwrap();

    let response = app.register(id, "Al", "al@example.com").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(response).await["field"], "first_name");

    let response = app.register(id, "Alice", "not-an-email").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(response).await["field"], "email");

    let response = app.request("GET", &format!("/api/v1/events/{}/attendees", id), Some(&token), None).await;
    assert!(parse_body(response).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_registrations_respect_capacity() {
    let app = Arc::new(TestApp::new().await);
    let token = app.login().await;
    let event = app.create_event(&token, "Hot Ticket", Duration::hours(1), Duration::hours(1), 3).await;
    let id = event["id"].as_i64().unwrap();

    let mut set = JoinSet::new();
    for i in 0..12 {
        let app = app.clone();
        set.spawn(async move {
            let email = format!("fan{}@example.com", i);
            app.register(id, "Fan Person", &email).await.status()
        });
    }

    let mut accepted = 0;
    let mut rejected = 0;
    while let Some(status) = set.join_next().await {
        match status.unwrap() {
            StatusCode::OK => accepted += 1,
            StatusCode::BAD_REQUEST => rejected += 1,
            other => panic!("unexpected status {}", other),
        }
    }

    assert_eq!(accepted, 3);
    assert_eq!(rejected, 9);

    let response = app.request("GET", &format!("/api/v1/events/{}/attendees", id), Some(&token), None).await;
    assert_eq!(parse_body(response).await.as_array().unwrap().len(), 3);
}
