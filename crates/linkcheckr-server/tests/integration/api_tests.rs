use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::common::{ALLOWED_ORIGIN, closed_address, setup_test_app, spawn_site};

fn post_json(body: serde_json::Value) -> Request<Body> {
    Request::post("/check-links")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn json_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_returns_200() {
    let app = setup_test_app().await;

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["renderer"], "http");
}

#[tokio::test]
async fn missing_url_returns_400() {
    let app = setup_test_app().await;

    let response = app
        .oneshot(post_json(serde_json::json!({ "wait_time": 1 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "invalid_input");
    assert_eq!(json["message"], "URL is required");
}

#[tokio::test]
async fn invalid_url_returns_400() {
    let app = setup_test_app().await;

    let response = app
        .oneshot(post_json(serde_json::json!({ "url": "not a url" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["message"], "Invalid URL provided");
}

#[tokio::test]
async fn negative_wait_time_returns_400() {
    let app = setup_test_app().await;

    let response = app
        .oneshot(post_json(
            serde_json::json!({ "url": "https://example.com", "wait_time": -1 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["message"], "Invalid wait_time provided");
}

#[tokio::test]
async fn malformed_json_returns_400() {
    let app = setup_test_app().await;

    let response = app
        .oneshot(
            Request::post("/check-links")
                .header("content-type", "application/json")
                .body(Body::from("{\"url\": "))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "invalid_input");
}

#[tokio::test]
async fn check_links_reports_working_and_broken() {
    let site = spawn_site().await;
    let app = setup_test_app().await;

    let response = app
        .oneshot(post_json(
            serde_json::json!({ "url": format!("{site}/"), "wait_time": 0 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;

    assert_eq!(json["url_checked"], format!("{site}/"));
    assert_eq!(json["total_links"], 3);
    assert_eq!(
        json["working_links"],
        serde_json::json!([
            { "url": format!("{site}/ok"), "status": 200 },
            { "url": format!("{site}/no-head"), "status": 200 },
        ])
    );
    assert_eq!(
        json["broken_links"],
        serde_json::json!([{ "url": format!("{site}/missing"), "status": 404 }])
    );
    assert_eq!(
        json["summary"],
        serde_json::json!({ "total": 3, "working": 2, "broken": 1 })
    );
}

#[tokio::test]
async fn relative_links_resolve_against_redirected_page() {
    let site = spawn_site().await;
    let app = setup_test_app().await;

    let response = app
        .oneshot(post_json(
            serde_json::json!({ "url": format!("{site}/moved"), "wait_time": 0 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["url_checked"], format!("{site}/moved"));
    assert_eq!(
        json["working_links"],
        serde_json::json!([{ "url": format!("{site}/section/page"), "status": 200 }])
    );
    assert_eq!(json["summary"]["broken"], 0);
}

#[tokio::test]
async fn error_page_is_checked_like_any_page() {
    let site = spawn_site().await;
    let app = setup_test_app().await;

    let response = app
        .oneshot(post_json(
            serde_json::json!({ "url": format!("{site}/not-here"), "wait_time": 0 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(
        json["working_links"],
        serde_json::json!([{ "url": format!("{site}/ok"), "status": 200 }])
    );
}

#[tokio::test]
async fn unreachable_page_returns_502() {
    let addr = closed_address().await;
    let app = setup_test_app().await;

    let response = app
        .oneshot(post_json(
            serde_json::json!({ "url": format!("http://{addr}/"), "wait_time": 0 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = json_body(response).await;
    assert_eq!(json["error"], "network_error");
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let app = setup_test_app().await;

    let response = app
        .oneshot(
            Request::options("/check-links")
                .header("origin", ALLOWED_ORIGIN)
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        ALLOWED_ORIGIN
    );
}

#[tokio::test]
async fn cors_rejects_unknown_origin() {
    let app = setup_test_app().await;

    let response = app
        .oneshot(
            Request::get("/health")
                .header("origin", "https://evil.test")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn openapi_document_lists_routes() {
    let app = setup_test_app().await;

    let response = app
        .oneshot(
            Request::get("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert!(json["paths"]["/check-links"]["post"].is_object());
    assert!(json["paths"]["/health"]["get"].is_object());
}
