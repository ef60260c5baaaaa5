//! End-to-end API tests against the in-memory database.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use mesa_server::{Config, DbService, ServerState, api};

async fn test_app() -> Router {
    let db = DbService::connect_in_memory().await.unwrap();
    let state = ServerState::new(Config::from_env(), db.pool);
    api::router().with_state(state)
}

async fn request(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_restaurant(app: &Router, name: &str) -> i64 {
    let (status, body) = request(
        app,
        "POST",
        "/api/v1/restaurants",
        Some(json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = test_app().await;
    let (status, body) = request(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = request(&app, "GET", "/health/detailed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["database"]["status"], "ok");
}

#[tokio::test]
async fn duplicate_category_returns_conflict_envelope() {
    let app = test_app().await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/v1/categories",
        Some(json!({ "name": "Italiana" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(
        &app,
        "POST",
        "/api/v1/categories",
        Some(json!({ "name": "Italiana" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "DUPLICATE_RESOURCE");
    assert!(body["error"]["timestamp"].is_string());
}

#[tokio::test]
async fn booking_flow_blocks_and_releases_table() {
    let app = test_app().await;
    let rid = create_restaurant(&app, "La Casa de Tono").await;

    let (status, body) = request(
        &app,
        "POST",
        &format!("/api/v1/restaurants/{rid}/tables"),
        Some(json!({ "tableNumber": "M-01", "capacity": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let table_id = body["data"]["id"].as_i64().unwrap();

    let availability_uri = format!(
        "/api/v1/restaurants/{rid}/tables/availability?date=2024-12-25&time=19:00&partySize=4"
    );

    let (status, body) = request(&app, "GET", &availability_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["availableCount"], 1);
    assert_eq!(body["data"]["tables"][0]["availableForTime"], true);

    let (status, body) = request(
        &app,
        "POST",
        "/api/v1/reservations",
        Some(json!({
            "restaurantId": rid,
            "tableId": table_id,
            "guestName": "Carlos Ruiz",
            "guestEmail": "carlos@example.com",
            "guestPhone": "5551234567",
            "partySize": 4,
            "reservationDate": "2024-12-25",
            "reservationTime": "19:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "pending");
    let reservation_id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = request(&app, "GET", &availability_uri, None).await;
    assert_eq!(body["data"]["availableCount"], 0);
    assert_eq!(body["data"]["tables"][0]["availableForTime"], false);

    // Cancelling frees the slot and keeps the reservation retrievable
    let (status, body) = request(
        &app,
        "PATCH",
        &format!("/api/v1/reservations/{reservation_id}/cancel"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "cancelled");

    let (_, body) = request(&app, "GET", &availability_uri, None).await;
    assert_eq!(body["data"]["availableCount"], 1);

    let (status, body) = request(
        &app,
        "GET",
        &format!("/api/v1/reservations/{reservation_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "cancelled");
}

#[tokio::test]
async fn order_flow_computes_totals() {
    let app = test_app().await;
    let rid = create_restaurant(&app, "Burger Palace").await;

    let (status, body) = request(
        &app,
        "POST",
        &format!("/api/v1/restaurants/{rid}/products"),
        Some(json!({ "name": "Classic Burger", "price": 100.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let product_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = request(
        &app,
        "POST",
        "/api/v1/orders",
        Some(json!({
            "restaurantId": rid,
            "items": [{ "productId": product_id, "quantity": 2, "unitPrice": 100.0 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["subtotal"], 200.0);
    assert_eq!(body["data"]["tax"], 32.0);
    assert_eq!(body["data"]["total"], 232.0);
    assert_eq!(body["data"]["status"], "pending");

    let order_number = body["data"]["orderNumber"].as_str().unwrap();
    assert!(order_number.starts_with("ORD-"));
    assert_eq!(order_number.len(), 10);

    // Empty item list is a validation error
    let (status, body) = request(
        &app,
        "POST",
        "/api/v1/orders",
        Some(json!({ "restaurantId": rid, "items": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn invalid_time_is_a_validation_error() {
    let app = test_app().await;
    let rid = create_restaurant(&app, "Sushi Zen").await;

    let (status, body) = request(
        &app,
        "GET",
        &format!("/api/v1/restaurants/{rid}/tables/availability?date=2024-12-25&time=25:99"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn missing_restaurant_maps_to_404_envelope() {
    let app = test_app().await;
    let (status, body) = request(&app, "GET", "/api/v1/restaurants/424242", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn scaffolding_endpoints_answer_with_placeholders() {
    let app = test_app().await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/v1/auth/login",
        Some(json!({ "email": "ana@example.com", "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("not implemented"));
    assert!(body["data"].is_null());

    let (status, _) = request(&app, "GET", "/api/v1/admin/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
}
