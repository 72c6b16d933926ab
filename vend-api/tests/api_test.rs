use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use vend_api::{app, AppState};
use vend_catalog::{Catalog, MemoryProductRepository, MemoryVariantRepository, Product, Variant};
use vend_currency::{Ledger, MemoryCurrencyRepository, PaymentCurrency};

struct TestApp {
    router: axum::Router,
    state: AppState,
}

async fn test_app() -> TestApp {
    let ledger = Arc::new(Ledger::new(Arc::new(MemoryCurrencyRepository::new())));
    let catalog = Arc::new(Catalog::new(
        Arc::new(MemoryProductRepository::new()),
        Arc::new(MemoryVariantRepository::new()),
    ));

    ledger
        .save(PaymentCurrency::new("USD", 1.0, true))
        .await
        .unwrap();
    ledger
        .save(PaymentCurrency::new("EUR", 0.9, false))
        .await
        .unwrap();

    let state = AppState::new(ledger, catalog);
    TestApp {
        router: app(state.clone()),
        state,
    }
}

async fn send(router: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn seed_product(state: &AppState, price: f64, stock: i32) -> (Product, Variant) {
    let product = Product::new("Shirt", Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let mut variant = Variant::new(product.id, "SHIRT-M", price);
    variant.stock = stock;
    variant.is_default = true;

    state
        .catalog
        .save_product(&product, &[variant.clone()])
        .await
        .unwrap();

    (product, variant)
}

#[tokio::test]
async fn saving_a_currency_uppercases_and_lists_primary_first() {
    let app = test_app().await;

    let (status, body) = send(
        app.router.clone(),
        post("/v1/currencies", json!({"iso": "gbp", "rate": 0.8})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["iso"], "GBP");
    assert_eq!(body["rate"], 0.8);
    assert_eq!(body["primary"], false);

    let (status, body) = send(app.router, get("/v1/currencies")).await;
    assert_eq!(status, StatusCode::OK);

    let isos: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["iso"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(isos, vec!["USD", "EUR", "GBP"]);
}

#[tokio::test]
async fn promoting_a_new_primary_demotes_the_old_one() {
    let app = test_app().await;

    let (status, body) = send(
        app.router.clone(),
        post(
            "/v1/currencies",
            json!({"iso": "EUR", "rate": 0.9, "primary": true}),
        ),
    )
    .await;
    // The EUR code already exists on another record, so this is a new
    // record conflict.
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("EUR"));

    let (status, body) = send(
        app.router.clone(),
        post(
            "/v1/currencies",
            json!({"iso": "CHF", "rate": 0.95, "primary": true}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rate"], 1.0);

    let (_, body) = send(app.router, get("/v1/currencies")).await;
    let primaries: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["primary"] == true)
        .collect();
    assert_eq!(primaries.len(), 1);
    assert_eq!(primaries[0]["iso"], "CHF");
}

#[tokio::test]
async fn invalid_currency_payload_is_rejected() {
    let app = test_app().await;

    let (status, _) = send(
        app.router.clone(),
        post("/v1/currencies", json!({"iso": "EURO", "rate": 0.9})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        app.router,
        post("/v1/currencies", json!({"iso": "CHF", "rate": 0.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_a_currency_is_idempotent() {
    let app = test_app().await;
    let eur = app.state.ledger.by_iso("EUR").await.unwrap().unwrap();

    let (status, _) = send(
        app.router.clone(),
        delete(&format!("/v1/currencies/{}", eur.id)),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        app.router.clone(),
        delete(&format!("/v1/currencies/{}", eur.id)),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(app.router, get("/v1/currencies/EUR")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn prices_a_variant_end_to_end() {
    let app = test_app().await;
    let (_, variant) = seed_product(&app.state, 100.0, 3).await;

    let (status, body) = send(
        app.router,
        get(&format!("/v1/variants/{}/price?currency=eur", variant.id)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], 90.0);
    assert_eq!(body["currency"], "EUR");
}

#[tokio::test]
async fn unknown_price_currency_is_a_bad_request() {
    let app = test_app().await;
    let (_, variant) = seed_product(&app.state, 100.0, 3).await;

    let (status, _) = send(
        app.router,
        get(&format!("/v1/variants/{}/price?currency=XYZ", variant.id)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_entities_return_not_found() {
    let app = test_app().await;

    let (status, _) = send(
        app.router.clone(),
        get(&format!("/v1/variants/{}/price?currency=EUR", Uuid::new_v4())),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        app.router,
        get(&format!("/v1/products/{}", Uuid::new_v4())),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn quote_reports_price_and_availability() {
    let app = test_app().await;
    let (product, variant) = seed_product(&app.state, 200.0, 1).await;

    let (status, body) = send(
        app.router,
        get(&format!("/v1/products/{}/quote?currency=EUR", product.id)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["variant_id"], json!(variant.id));
    assert_eq!(body["price"], 180.0);
    assert_eq!(body["in_stock"], true);
}

#[tokio::test]
async fn stock_endpoint_aggregates_and_reports_status() {
    let app = test_app().await;

    let product = Product::new("Mug", Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let mut limited = Variant::new(product.id, "MUG-A", 10.0);
    limited.stock = 5;
    let mut unlimited = Variant::new(product.id, "MUG-B", 10.0);
    unlimited.unlimited_stock = true;

    app.state
        .catalog
        .save_product(&product, &[limited, unlimited])
        .await
        .unwrap();

    let (status, body) = send(
        app.router,
        get(&format!("/v1/products/{}/stock", product.id)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_stock"], 5);
    assert_eq!(body["unlimited_stock"], true);
    assert_eq!(body["status"], "LIVE");
}

#[tokio::test]
async fn saving_a_product_over_http_round_trips() {
    let app = test_app().await;

    let (status, body) = send(
        app.router.clone(),
        post(
            "/v1/products",
            json!({
                "title": "Poster",
                "type_id": Uuid::new_v4(),
                "tax_category_id": Uuid::new_v4(),
                "shipping_category_id": Uuid::new_v4(),
                "variants": [
                    {"sku": "POSTER-A2", "price": 25.0, "stock": 10, "is_default": true}
                ]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "LIVE");

    let id = body["id"].as_str().unwrap().to_string();
    let (status, body) = send(
        app.router,
        get(&format!("/v1/products/{}/variants", id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["sku"], "POSTER-A2");
}

#[tokio::test]
async fn rejects_a_product_with_bad_variant_data() {
    let app = test_app().await;

    let (status, _) = send(
        app.router,
        post(
            "/v1/products",
            json!({
                "title": "Poster",
                "type_id": Uuid::new_v4(),
                "tax_category_id": Uuid::new_v4(),
                "shipping_category_id": Uuid::new_v4(),
                "variants": [
                    {"sku": "POSTER-A2", "price": 25.0, "stock": -4}
                ]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn snapshot_is_a_point_in_time_copy() {
    let app = test_app().await;
    let (product, _) = seed_product(&app.state, 100.0, 3).await;

    let (status, before) = send(
        app.router.clone(),
        get(&format!("/v1/products/{}/snapshot", product.id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(before["title"], "Shirt");

    let mut renamed = product.clone();
    renamed.title = "Renamed shirt".to_string();
    app.state
        .catalog
        .save_product(&renamed, &[])
        .await
        .unwrap();

    let (_, after) = send(
        app.router,
        get(&format!("/v1/products/{}/snapshot", product.id)),
    )
    .await;
    assert_eq!(after["title"], "Renamed shirt");
    assert_eq!(before["title"], "Shirt");
}
