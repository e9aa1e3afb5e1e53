//! Router-level tests driven through `tower::ServiceExt::oneshot`, without a listener.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use user_records::http;

use crate::support::{bearer, service, verifier};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = http::router(service(), verifier());
    let response = app
        .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_then_list_through_router() {
    let service = service();

    let create = Request::post("/users")
        .header(header::AUTHORIZATION, bearer())
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "firstname": "Grace",
                "lastname": "Hopper",
                "email": "grace@example.com",
                "age": 85,
                "height": 160
            })
            .to_string(),
        ))
        .unwrap();
    let response = http::router(service.clone(), verifier())
        .oneshot(create)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["id"], 4);
    assert_eq!(body["data"]["active"], false);

    let list = Request::get("/users?lastname=Hopper")
        .header(header::AUTHORIZATION, bearer())
        .body(Body::empty())
        .unwrap();
    let response = http::router(service, verifier())
        .oneshot(list)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn empty_verifier_rejects_every_user_route() {
    let app = http::router(service(), http::TokenVerifier::default());
    let response = app
        .oneshot(
            Request::get("/users")
                .header(header::AUTHORIZATION, bearer())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], "unauthorized");
}
