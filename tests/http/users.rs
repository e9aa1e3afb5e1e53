use reqwest::header::AUTHORIZATION;
use serde_json::{json, Value};
use user_records::http::{MSG_INVALID_FIELDS, MSG_INVALID_ID, MSG_NOT_FOUND};
use user_records::INVALID_UPDATE;

use crate::support::{bearer, service, start_server, NOW};

async fn get(base: &str, path: &str) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .get(format!("{base}{path}"))
        .header(AUTHORIZATION, bearer())
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

async fn send(base: &str, method: reqwest::Method, path: &str, body: Option<Value>) -> (u16, Value) {
    let mut req = reqwest::Client::new()
        .request(method, format!("{base}{path}"))
        .header(AUTHORIZATION, bearer());
    if let Some(body) = body {
        req = req.json(&body);
    }
    let resp = req.send().await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

fn valid_body() -> Value {
    json!({
        "firstname": "Ada",
        "lastname": "Lovelace",
        "email": "ada@example.com",
        "age": 36,
        "height": 165,
        "active": true
    })
}

#[tokio::test]
async fn list_all() {
    let base = start_server(service()).await;
    let (status, body) = get(&base, "/users").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
    assert_eq!(body["data"][1]["lastname"], "apellido");
}

#[tokio::test]
async fn list_with_filters() {
    let base = start_server(service()).await;

    let (status, body) = get(&base, "/users?firstname=firstname").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, body) = get(&base, "/users?lastname=apellido").await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], 2);

    let (_, body) = get(&base, "/users?firstname=firstname&active=true").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = get(&base, "/users?created_date=02%2F2021").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn list_with_no_match_is_empty() {
    let base = start_server(service()).await;
    let (status, body) = get(&base, "/users?age=80").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn list_with_bad_filter_is_bad_request() {
    let base = start_server(service()).await;

    let (status, body) = get(&base, "/users?shoe_size=42").await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "bad_request");

    let (status, _) = get(&base, "/users?age=old").await;
    assert_eq!(status, 400);

    let (status, _) = get(&base, "/users?active=maybe").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn get_by_id() {
    let base = start_server(service()).await;

    let (status, body) = get(&base, "/users/3").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["firstname"], "firstname3");

    let (status, body) = get(&base, "/users/99").await;
    assert_eq!(status, 404);
    assert_eq!(body["code"], "not_found");
    assert_eq!(body["message"], MSG_NOT_FOUND);
}

#[tokio::test]
async fn invalid_id_is_bad_request() {
    let base = start_server(service()).await;
    for path in ["/users/abc", "/users/0", "/users/-4"] {
        let (status, body) = get(&base, path).await;
        assert_eq!(status, 400, "{path}");
        assert_eq!(body["message"], MSG_INVALID_ID);
    }
}

#[tokio::test]
async fn create_returns_created_user() {
    let base = start_server(service()).await;

    let (status, body) = send(&base, reqwest::Method::POST, "/users", Some(valid_body())).await;
    assert_eq!(status, 201);
    assert_eq!(body["data"]["id"], 4);
    assert_eq!(body["data"]["created_date"], NOW);
    assert!(body["data"].get("deleted_date").is_none());

    let (status, body) = get(&base, "/users/4").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["email"], "ada@example.com");
}

#[tokio::test]
async fn create_reports_every_invalid_field() {
    let base = start_server(service()).await;

    let (status, body) = send(
        &base,
        reqwest::Method::POST,
        "/users",
        Some(json!({ "firstname": "Ada", "age": 12 })),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], MSG_INVALID_FIELDS);

    let fields: Vec<(String, String)> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| {
            (
                f["field"].as_str().unwrap().to_string(),
                f["tag"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(
        fields,
        vec![
            ("lastname".to_string(), "required".to_string()),
            ("email".to_string(), "required".to_string()),
            ("age".to_string(), "min".to_string()),
            ("height".to_string(), "required".to_string()),
        ]
    );
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let base = start_server(service()).await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/users"))
        .header(AUTHORIZATION, bearer())
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "bad_request");
}

#[tokio::test]
async fn replace_user() {
    let base = start_server(service()).await;

    let (status, body) = send(&base, reqwest::Method::PUT, "/users/2", Some(valid_body())).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["id"], 2);
    assert_eq!(body["data"]["firstname"], "Ada");
    assert_eq!(body["data"]["created_date"], "23/03/2021");

    let (status, _) = send(&base, reqwest::Method::PUT, "/users/77", Some(valid_body())).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn patch_lastname_and_age() {
    let base = start_server(service()).await;

    let (status, body) = send(
        &base,
        reqwest::Method::PATCH,
        "/users/1",
        Some(json!({ "lastname": "Hopper", "age": 45 })),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["lastname"], "Hopper");
    assert_eq!(body["data"]["age"], 45);
    assert_eq!(body["data"]["firstname"], "firstname");
}

#[tokio::test]
async fn empty_patch_is_bad_request() {
    let base = start_server(service()).await;

    let (status, body) = send(&base, reqwest::Method::PATCH, "/users/1", Some(json!({}))).await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], INVALID_UPDATE);

    let (status, _) = send(
        &base,
        reqwest::Method::PATCH,
        "/users/1",
        Some(json!({ "lastname": "", "age": 0 })),
    )
    .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn delete_twice() {
    let base = start_server(service()).await;

    let (status, body) = send(&base, reqwest::Method::DELETE, "/users/2", None).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"], "user 2 was deleted");

    let (status, body) = send(&base, reqwest::Method::DELETE, "/users/2", None).await;
    assert_eq!(status, 404);
    assert_eq!(body["code"], "not_found");

    let (status, _) = get(&base, "/users/2").await;
    assert_eq!(status, 404);

    let (_, body) = get(&base, "/users").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn patch_with_invalid_fields_is_bad_request() {
    let base = start_server(service()).await;

    let (status, body) = send(
        &base,
        reqwest::Method::PATCH,
        "/users/1",
        Some(json!({ "lastname": "  ", "age": -3 })),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], MSG_INVALID_FIELDS);
    assert_eq!(body["fields"][0]["field"], "lastname");
    assert_eq!(body["fields"][0]["tag"], "required");
    assert_eq!(body["fields"][1]["field"], "age");
    assert_eq!(body["fields"][1]["tag"], "min");

    let (_, body) = get(&base, "/users/1").await;
    assert_eq!(body["data"]["age"], 24);
    assert_eq!(body["data"]["lastname"], "lastname");
}
