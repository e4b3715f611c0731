use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{
    add_case_via_api, get_authed, post_json, seed_judge, seed_lawyer, send_raw, send_request,
    test_app, TEST_PASSWORD,
};

#[tokio::test]
async fn signup_creates_lawyer_by_default() {
    let (app, _pool, _guard) = test_app().await;

    let body = json!({
        "name": "Nia Counsel",
        "email": "Nia@Example.com",
        "password": "longenough1",
        "courtID": "C1"
    });
    let (status, resp) = post_json(&app, "/signup", &body).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(resp["message"], "User created successfully");
    assert_eq!(resp["user"]["email"], "nia@example.com");
    assert_eq!(resp["user"]["role"], "lawyer");
    assert_eq!(resp["user"]["courtID"], "C1");
    assert!(resp["user"].get("password").is_none());
    assert!(resp["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn signup_rejects_duplicate_email() {
    let (app, _pool, _guard) = test_app().await;
    let body = json!({"name": "A", "email": "dup@example.com", "password": "longenough1"});

    let (status, _) = post_json(&app, "/signup", &body).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, resp) = post_json(&app, "/signup", &body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(resp["kind"], "Conflict");
}

#[tokio::test]
async fn signup_refuses_admin_role() {
    let (app, _pool, _guard) = test_app().await;
    let body = json!({
        "name": "Mallory",
        "email": "mallory@example.com",
        "password": "longenough1",
        "role": "admin"
    });

    let (status, resp) = post_json(&app, "/signup", &body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp["field_errors"]["role"].as_str().is_some());
}

#[tokio::test]
async fn signup_validates_fields() {
    let (app, _pool, _guard) = test_app().await;
    let body = json!({"name": "", "email": "nope", "password": "short"});

    let (status, resp) = post_json(&app, "/signup", &body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp["kind"], "ValidationError");
    for field in ["name", "email", "password"] {
        assert!(resp["field_errors"][field].as_str().is_some(), "{field}");
    }
}

#[tokio::test]
async fn signup_rejects_blank_name() {
    let (app, pool, _guard) = test_app().await;
    let body = json!({"name": "   ", "email": "blank@courtdesk.test", "password": TEST_PASSWORD});

    let (status, resp) = post_json(&app, "/signup", &body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp["field_errors"]["name"].as_str().is_some());

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(users, 0);
}

#[tokio::test]
async fn signup_with_malformed_body_returns_json_error() {
    let (app, _pool, _guard) = test_app().await;

    let (status, resp) = post_json(&app, "/signup", &json!({"email": "a@b.com"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp["kind"], "ValidationError");
}

#[tokio::test]
async fn signup_promotes_admin_email() {
    let (app, _pool, _guard) = test_app().await;
    std::env::set_var("ADMIN_EMAIL", "chief@courtdesk.test");

    let body = json!({"name": "Chief", "email": "chief@courtdesk.test", "password": "longenough1"});
    let (status, resp) = post_json(&app, "/signup", &body).await;

    std::env::remove_var("ADMIN_EMAIL");
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(resp["user"]["role"], "admin");
}

#[tokio::test]
async fn signin_returns_token_and_cookie() {
    let (app, pool, _guard) = test_app().await;
    let judge = seed_judge(&pool).await;

    let body = json!({"email": judge.email.clone(), "password": TEST_PASSWORD});
    let (status, headers, resp) = send_raw(&app, Method::POST, "/signin", None, Some(&body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["user"]["_id"], judge.id);
    assert_eq!(resp["user"]["role"], "judge");
    let token = resp["token"].as_str().unwrap();

    let cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with(&format!("courtdesk_session={token}")));
    assert!(cookie.contains("HttpOnly"));

    let (status, me) = get_authed(&app, "/me", token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], judge.email);
}

#[tokio::test]
async fn signin_rejects_bad_credentials() {
    let (app, pool, _guard) = test_app().await;
    let lawyer = seed_lawyer(&pool).await;

    let (status, resp) = post_json(
        &app,
        "/signin",
        &json!({"email": lawyer.email, "password": "wrong-password"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp["error"], "Invalid email or password");

    let (status, _) = post_json(
        &app,
        "/signin",
        &json!({"email": "ghost@courtdesk.test", "password": TEST_PASSWORD}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_cookie_authenticates() {
    let (app, pool, _guard) = test_app().await;
    let lawyer = seed_lawyer(&pool).await;

    let req = Request::builder()
        .method(Method::GET)
        .uri("/usertype")
        .header(header::COOKIE, format!("courtdesk_session={}", lawyer.token))
        .body(Body::empty())
        .unwrap();
    let (status, _, resp) = send_request(&app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp, json!({"role": "lawyer"}));
}

#[tokio::test]
async fn logout_revokes_token() {
    let (app, pool, _guard) = test_app().await;
    let lawyer = seed_lawyer(&pool).await;

    let (status, headers, resp) =
        send_raw(&app, Method::GET, "/logout", Some(&lawyer.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["message"], "Logged out successfully");
    let cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.contains("Max-Age=0"));

    let (status, resp) = get_authed(&app, "/me", &lawyer.token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp["kind"], "Unauthorized");

    let revoked: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM revoked_tokens WHERE user_id = $1")
        .bind(lawyer.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(revoked, 1);
}

#[tokio::test]
async fn user_cases_lists_only_own_cases() {
    let (app, pool, _guard) = test_app().await;
    let lawyer = seed_lawyer(&pool).await;
    let other = crate::common::seed_user(
        &pool,
        "Omar Other",
        "other@courtdesk.test",
        shared_types::UserRole::Lawyer,
    )
    .await;
    let mine = add_case_via_api(&app, &lawyer.token, json!({"courtID": "C1", "title": "mine"})).await;
    add_case_via_api(&app, &other.token, json!({"courtID": "C1", "title": "theirs"})).await;

    for uri in ["/getUserCases", "/getUserCasesDetails"] {
        let (status, resp) = get_authed(&app, uri, &lawyer.token).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(resp["user"]["_id"], lawyer.id);
        let cases = resp["cases"].as_array().unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0]["_id"], mine["_id"]);
    }
}
