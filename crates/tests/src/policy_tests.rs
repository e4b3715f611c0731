//! Requests rejected by a route policy never touch the database: these run
//! against a router whose pool cannot connect.

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::common::{get, offline_app, post_json, send_raw};

#[tokio::test]
async fn home_is_open() {
    let app = offline_app();
    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Courtdesk case management API");
    assert!(body["version"].as_str().is_some());
}

#[tokio::test]
async fn add_case_without_session_is_unauthorized() {
    let app = offline_app();
    let (status, body) = post_json(&app, "/addCase", &json!({"courtID": "C1"})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "Unauthorized");
    assert_eq!(body["error"], "Authentication required");
}

#[tokio::test]
async fn every_guarded_route_rejects_anonymous_callers() {
    let app = offline_app();
    let id = uuid::Uuid::new_v4();
    let routes = [
        (Method::GET, "/getCasesByCourtType/district".to_string()),
        (Method::GET, "/getCasesByCourtID/C1".to_string()),
        (Method::PUT, format!("/updateCase/{id}")),
        (Method::GET, "/allCases".to_string()),
        (Method::POST, "/addCase".to_string()),
        (Method::DELETE, format!("/deleteCase/{id}")),
        (Method::GET, "/logout".to_string()),
        (Method::GET, "/me".to_string()),
        (Method::GET, "/usertype".to_string()),
        (Method::GET, "/allusers".to_string()),
        (Method::GET, "/user/1".to_string()),
        (Method::PUT, "/user/edit/1".to_string()),
        (Method::GET, "/getUserCases".to_string()),
        (Method::GET, "/getUserCasesDetails".to_string()),
    ];

    for (method, uri) in routes {
        let body = json!({});
        let body = matches!(method, Method::POST | Method::PUT).then_some(&body);
        let (status, _, _) = send_raw(&app, method.clone(), &uri, None, body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
    }
}

#[tokio::test]
async fn garbage_bearer_token_is_treated_as_anonymous() {
    let app = offline_app();
    let (status, _, _) =
        send_raw(&app, Method::GET, "/allCases", Some("not.a.jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = offline_app();
    let (status, _) = get(&app, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
