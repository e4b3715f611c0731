use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{
    add_case_via_api, get_authed, put_json_authed, seed_judge, seed_lawyer, test_app,
};

#[tokio::test]
async fn update_replaces_typed_fields() {
    let (app, pool, _guard) = test_app().await;
    let lawyer = seed_lawyer(&pool).await;
    let case = add_case_via_api(&app, &lawyer.token, json!({"courtID": "C1", "title": "X", "severity": 2})).await;
    let id = case["_id"].as_str().unwrap();

    let (status, resp) = put_json_authed(
        &app,
        &format!("/updateCase/{id}"),
        &json!({"title": "Y", "severity": 5}),
        &lawyer.token,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["message"], "Case updated successfully");
    assert_eq!(resp["case"]["_id"], id);
    assert_eq!(resp["case"]["title"], "Y");
    assert_eq!(resp["case"]["severity"], 5);
    assert_eq!(resp["case"]["courtID"], "C1");
}

#[tokio::test]
async fn update_accepts_untyped_severity() {
    let (app, pool, _guard) = test_app().await;
    let lawyer = seed_lawyer(&pool).await;
    let case = add_case_via_api(&app, &lawyer.token, json!({"courtID": "C1", "severity": 2})).await;
    let id = case["_id"].as_str().unwrap();

    let (status, resp) = put_json_authed(
        &app,
        &format!("/updateCase/{id}"),
        &json!({"severity": "critical"}),
        &lawyer.token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["case"]["severity"], "critical");

    let (_, list) = get_authed(&app, "/allCases", &lawyer.token).await;
    assert_eq!(list[0]["severity"], "critical");
}

#[tokio::test]
async fn patch_merges_extra_fields() {
    let (app, pool, _guard) = test_app().await;
    let lawyer = seed_lawyer(&pool).await;
    let case = add_case_via_api(
        &app,
        &lawyer.token,
        json!({"courtID": "C1", "petitioner": "Doe", "status": "open"}),
    )
    .await;
    let id = case["_id"].as_str().unwrap();

    let (status, resp) = put_json_authed(
        &app,
        &format!("/updateCase/{id}"),
        &json!({"status": "closed", "verdict": "dismissed"}),
        &lawyer.token,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let updated = &resp["case"];
    assert_eq!(updated["petitioner"], "Doe");
    assert_eq!(updated["status"], "closed");
    assert_eq!(updated["verdict"], "dismissed");
}

#[tokio::test]
async fn update_missing_case_is_not_found_and_changes_nothing() {
    let (app, pool, _guard) = test_app().await;
    let lawyer = seed_lawyer(&pool).await;
    add_case_via_api(&app, &lawyer.token, json!({"courtID": "C1", "title": "X"})).await;

    let missing = uuid::Uuid::new_v4();
    let (status, resp) = put_json_authed(
        &app,
        &format!("/updateCase/{missing}"),
        &json!({"title": "Y"}),
        &lawyer.token,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(resp["error"], "Case not found");

    let (_, list) = get_authed(&app, "/allCases", &lawyer.token).await;
    assert_eq!(list[0]["title"], "X");
}

#[tokio::test]
async fn malformed_id_is_not_found() {
    let (app, pool, _guard) = test_app().await;
    let lawyer = seed_lawyer(&pool).await;

    let (status, _) =
        put_json_authed(&app, "/updateCase/not-a-uuid", &json!({"title": "Y"}), &lawyer.token)
            .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_court_id_is_rejected() {
    let (app, pool, _guard) = test_app().await;
    let lawyer = seed_lawyer(&pool).await;
    let case = add_case_via_api(&app, &lawyer.token, json!({"courtID": "C1"})).await;
    let id = case["_id"].as_str().unwrap();

    let (status, _) = put_json_authed(
        &app,
        &format!("/updateCase/{id}"),
        &json!({"courtID": ""}),
        &lawyer.token,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn judge_cannot_update() {
    let (app, pool, _guard) = test_app().await;
    let lawyer = seed_lawyer(&pool).await;
    let judge = seed_judge(&pool).await;
    let case = add_case_via_api(&app, &lawyer.token, json!({"courtID": "C1", "title": "X"})).await;
    let id = case["_id"].as_str().unwrap();

    let (status, _) = put_json_authed(
        &app,
        &format!("/updateCase/{id}"),
        &json!({"title": "Y"}),
        &judge.token,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
