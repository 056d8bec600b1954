mod common;

use axum::http::StatusCode;
use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};

#[tokio::test]
async fn test_stats_new_url() {
    let (server, _store) = common::create_test_server();
    let code = common::create_short_url(&server, "https://example.com/page").await;

    let response = server.get(&format!("/urls/{code}/stats")).await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["short_code"], code);
    assert_eq!(json["original_url"], "https://example.com/page");
    assert_eq!(json["clicks"], 0);
}

#[tokio::test]
async fn test_stats_not_found() {
    let (server, _store) = common::create_test_server();

    let response = server.get("/urls/nonexistent/stats").await;

    response.assert_status_not_found();

    let json = response.json::<Value>();
    assert_eq!(json["code"], "not_found");
    assert!(json["error"].as_str().unwrap().contains("nonexistent"));
}

#[tokio::test]
async fn test_create_redirect_three_times_then_stats() {
    let (server, _store) = common::create_test_server();
    let code = common::create_short_url(&server, "https://example.com/long/path").await;

    for _ in 0..3 {
        let response = server.get(&format!("/{code}")).await;
        response.assert_status(StatusCode::FOUND);
        assert_eq!(response.header("location"), "https://example.com/long/path");
    }

    let response = server.get(&format!("/urls/{code}/stats")).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["clicks"], 3);
}

#[tokio::test]
async fn test_stats_does_not_count_as_click() {
    let (server, _store) = common::create_test_server();
    let code = common::create_short_url(&server, "https://example.com").await;

    server.get(&format!("/urls/{code}/stats")).await;
    server.get(&format!("/urls/{code}/stats")).await;

    let response = server.get(&format!("/urls/{code}/stats")).await;
    assert_eq!(response.json::<Value>()["clicks"], 0);
}

#[tokio::test]
async fn test_stats_expires_at_format() {
    let (server, _store) = common::create_test_server();

    let before = Utc::now();
    let response = server
        .post("/urls")
        .json(&json!({ "url": "https://example.com", "expires_in_days": 30 }))
        .await;
    let code = response.json::<Value>()["short_code"]
        .as_str()
        .unwrap()
        .to_string();

    let json = server
        .get(&format!("/urls/{code}/stats"))
        .await
        .json::<Value>();
    let expires_at = json["expires_at"].as_str().unwrap();

    assert!(expires_at.ends_with("+00:00"));
    assert!(!expires_at.contains('.'));

    let parsed = DateTime::parse_from_rfc3339(expires_at).unwrap();
    let delta = parsed.with_timezone(&Utc) - before;
    assert!(delta >= Duration::days(30) - Duration::seconds(1));
    assert!(delta <= Duration::days(30) + Duration::seconds(5));
}

#[tokio::test]
async fn test_stats_unknown_subpath_is_not_found() {
    let (server, _store) = common::create_test_server();

    let response = server.get("/urls/abc/stats/extra").await;

    response.assert_status_not_found();
}
