use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use orderdesk::application::service::OrderService;
use orderdesk::infrastructure::in_memory::InMemoryOrderStore;
use orderdesk::interfaces::http::server::router;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    let store = Arc::new(InMemoryOrderStore::new());
    router(Arc::new(OrderService::new(store)))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body should be JSON")
    };
    (status, body)
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn burger_and_fries() -> Value {
    json!({
        "table_number": 5,
        "items": [
            {"name": "Burger", "amount": 2, "price": 12.50},
            {"name": "Fries", "amount": 1, "price": 5.00}
        ]
    })
}

async fn create_order(app: &Router, body: &Value) -> Value {
    let (status, order) = send(app, post_json("/orders", body)).await;
    assert_eq!(status, StatusCode::CREATED);
    order
}

#[tokio::test]
async fn test_create_order_returns_201_with_computed_total() {
    let app = app();
    let (status, order) = send(&app, post_json("/orders", &burger_and_fries())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["table_number"], json!(5));
    assert_eq!(order["status"], json!("pending"));
    assert_eq!(order["total"], json!(30.0));
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
    assert_eq!(order["items"][0]["name"], json!("Burger"));
    assert!(order["id"].as_u64().is_some());
    // RFC 3339 UTC timestamp
    let created_at = order["created_at"].as_str().unwrap();
    assert!(created_at.ends_with('Z'), "created_at was {created_at}");
}

#[tokio::test]
async fn test_create_order_rejects_empty_items() {
    let app = app();
    let body = json!({"table_number": 1, "items": []});
    let (status, error) = send(&app, post_json("/orders", &body)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["error"], json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_create_order_rejects_bad_fields() {
    let app = app();

    for body in [
        json!({"table_number": 0, "items": [{"name": "Soda", "amount": 1, "price": 3.50}]}),
        json!({"table_number": 1, "items": [{"name": "", "amount": 1, "price": 3.50}]}),
        json!({"table_number": 1, "items": [{"name": "Soda", "amount": 0, "price": 3.50}]}),
        json!({"table_number": 1, "items": [{"name": "Soda", "amount": 1, "price": 0}]}),
        json!({"table_number": 1, "items": [{"name": "Soda", "amount": 1, "price": 3.999}]}),
    ] {
        let (status, _) = send(&app, post_json("/orders", &body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "body: {body}");
    }

    // Nothing slipped into the pending list
    let (_, pending) = send(&app, request("GET", "/orders/pending")).await;
    assert_eq!(pending, json!([]));
}

#[tokio::test]
async fn test_create_order_rejects_malformed_body() {
    let app = app();
    // Negative amount does not even deserialize into the input type
    let body = json!({"table_number": 1, "items": [{"name": "Soda", "amount": -1, "price": 3.50}]});
    let (status, _) = send(&app, post_json("/orders", &body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_list_pending_is_oldest_first_and_excludes_moved_orders() {
    let app = app();
    let first = create_order(&app, &burger_and_fries()).await;
    let second = create_order(&app, &burger_and_fries()).await;
    let third = create_order(&app, &burger_and_fries()).await;

    let uri = format!("/orders/{}/complete", second["id"]);
    let (status, _) = send(&app, request("PATCH", &uri)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, pending) = send(&app, request("GET", "/orders/pending")).await;
    assert_eq!(status, StatusCode::OK);

    let ids: Vec<Value> = pending
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].clone())
        .collect();
    assert_eq!(ids, vec![first["id"].clone(), third["id"].clone()]);
}

#[tokio::test]
async fn test_complete_twice_both_return_200() {
    let app = app();
    let order = create_order(&app, &burger_and_fries()).await;
    let uri = format!("/orders/{}/complete", order["id"]);

    for _ in 0..2 {
        let (status, completed) = send(&app, request("PATCH", &uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(completed["status"], json!("completed"));
    }
}

#[tokio::test]
async fn test_cancel_order_returns_cancelled_order() {
    let app = app();
    let order = create_order(&app, &burger_and_fries()).await;

    let uri = format!("/orders/{}", order["id"]);
    let (status, cancelled) = send(&app, request("DELETE", &uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], json!("cancelled"));
    // Cancellation keeps the items and the derived total
    assert_eq!(cancelled["items"].as_array().unwrap().len(), 2);
    assert_eq!(cancelled["total"], json!(30.0));
}

#[tokio::test]
async fn test_cancel_twice_returns_400_already_cancelled() {
    let app = app();
    let order = create_order(&app, &burger_and_fries()).await;
    let uri = format!("/orders/{}", order["id"]);

    let (status, _) = send(&app, request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, error) = send(&app, request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], json!("ALREADY_CANCELLED"));
}

#[tokio::test]
async fn test_cancel_completed_order_returns_400() {
    let app = app();
    let order = create_order(&app, &burger_and_fries()).await;

    let uri = format!("/orders/{}/complete", order["id"]);
    let (status, _) = send(&app, request("PATCH", &uri)).await;
    assert_eq!(status, StatusCode::OK);

    let uri = format!("/orders/{}", order["id"]);
    let (status, error) = send(&app, request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], json!("TERMINAL_STATE"));
    assert_eq!(
        error["message"],
        json!("completed orders cannot be cancelled")
    );
}

#[tokio::test]
async fn test_complete_cancelled_order_returns_400() {
    let app = app();
    let order = create_order(&app, &burger_and_fries()).await;

    let uri = format!("/orders/{}", order["id"]);
    let (status, _) = send(&app, request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::OK);

    let uri = format!("/orders/{}/complete", order["id"]);
    let (status, error) = send(&app, request("PATCH", &uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error["message"],
        json!("cancelled orders cannot be completed")
    );
}

#[tokio::test]
async fn test_unknown_order_id_returns_404() {
    let app = app();

    let (status, error) = send(&app, request("DELETE", "/orders/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"], json!("ORDER_NOT_FOUND"));

    let (status, _) = send(&app, request("PATCH", "/orders/999/complete")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = app();
    let (status, health) = send(&app, request("GET", "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], json!("healthy"));
    assert_eq!(health["app_name"], json!("orderdesk"));
    assert!(health["version"].as_str().is_some());
}
