use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{add_case_via_api, get_authed, seed_admin, seed_judge, seed_lawyer, test_app};

fn titles(list: &Value) -> Vec<String> {
    let mut titles: Vec<String> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap().to_string())
        .collect();
    titles.sort();
    titles
}

#[tokio::test]
async fn judge_reads_cases_by_court_id() {
    let (app, pool, _guard) = test_app().await;
    let lawyer = seed_lawyer(&pool).await;
    let judge = seed_judge(&pool).await;
    add_case_via_api(&app, &lawyer.token, json!({"courtID": "C1", "title": "a"})).await;
    add_case_via_api(&app, &lawyer.token, json!({"courtID": "C1", "title": "b"})).await;
    add_case_via_api(&app, &lawyer.token, json!({"courtID": "C2", "title": "c"})).await;

    let (status, list) = get_authed(&app, "/getCasesByCourtID/C1", &judge.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&list), vec!["a", "b"]);
}

#[tokio::test]
async fn judge_reads_cases_by_court_type() {
    let (app, pool, _guard) = test_app().await;
    let lawyer = seed_lawyer(&pool).await;
    let judge = seed_judge(&pool).await;
    add_case_via_api(&app, &lawyer.token, json!({"courtID": "C1", "courtType": "district", "title": "a"})).await;
    add_case_via_api(&app, &lawyer.token, json!({"courtID": "C2", "courtType": "appeals", "title": "b"})).await;
    add_case_via_api(&app, &lawyer.token, json!({"courtID": "C3", "courtType": "district", "title": "c"})).await;

    let (status, list) = get_authed(&app, "/getCasesByCourtType/district", &judge.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&list), vec!["a", "c"]);
}

#[tokio::test]
async fn unknown_court_yields_empty_list() {
    let (app, pool, _guard) = test_app().await;
    let judge = seed_judge(&pool).await;

    let (status, list) = get_authed(&app, "/getCasesByCourtID/nowhere", &judge.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn lawyer_is_rejected_from_dashboards() {
    let (app, pool, _guard) = test_app().await;
    let lawyer = seed_lawyer(&pool).await;

    let (status, _) = get_authed(&app, "/getCasesByCourtID/C1", &lawyer.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = get_authed(&app, "/getCasesByCourtType/district", &lawyer.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_reads_dashboards() {
    let (app, pool, _guard) = test_app().await;
    let admin = seed_admin(&pool).await;

    let (status, _) = get_authed(&app, "/getCasesByCourtID/C1", &admin.token).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn judge_lists_all_cases() {
    let (app, pool, _guard) = test_app().await;
    let lawyer = seed_lawyer(&pool).await;
    let judge = seed_judge(&pool).await;
    add_case_via_api(&app, &lawyer.token, json!({"courtID": "C1", "title": "a"})).await;
    add_case_via_api(&app, &lawyer.token, json!({"courtID": "C2", "title": "b"})).await;

    let (status, list) = get_authed(&app, "/allCases", &judge.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&list), vec!["a", "b"]);
}
