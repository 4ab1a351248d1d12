// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end checkout: build a cart, submit it as an order, clear the
//! cart only once the service accepts.

use std::sync::Arc;

use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use trundle_api::{ApiClient, CreateOrderRequest};
use trundle_bus::AuthBus;
use trundle_cart::CartStore;
use trundle_config::model::ApiConfig;
use trundle_core::{MenuItemRef, StaticToken};
use trundle_test_utils::MemoryStore;

fn item(id: &str, name: &str, price_cents: i64) -> MenuItemRef {
    MenuItemRef {
        id: id.into(),
        name: name.into(),
        price_cents,
    }
}

fn api_client(base_url: &str) -> ApiClient {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
    };
    ApiClient::new(
        &config,
        AuthBus::default(),
        Arc::new(StaticToken(Some("tok-student".into()))),
    )
    .unwrap()
}

fn order_body(id: &str, total_cents: i64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "status": "CREATED",
        "items": [],
        "totalCents": total_cents,
        "deliveryLocation": "Tech Hall",
        "createdAt": "2026-04-01T12:00:00Z",
        "updatedAt": "2026-04-01T12:00:00Z"
    })
}

#[tokio::test]
async fn cart_checks_out_as_an_order_and_clears() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(header("authorization", "Bearer tok-student"))
        .and(body_partial_json(serde_json::json!({
            "userId": "u1",
            "vendorId": "r-grill",
            "items": [
                {"menuItemId": "burger", "quantity": 2, "priceCents": 500},
                {"menuItemId": "fries", "quantity": 1, "priceCents": 250}
            ]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(order_body("o1", 1250)))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::default());
    let cart = CartStore::load(store.clone()).await;
    cart.add_item(item("burger", "Burger", 500), "r-grill", 2)
        .await
        .unwrap();
    cart.add_item(item("fries", "Fries", 250), "r-grill", 1)
        .await
        .unwrap();
    assert_eq!(cart.total_cents().await, 1250);
    assert_eq!(cart.count().await, 3);

    let snapshot = cart.snapshot().await;
    let request = CreateOrderRequest::from_cart("u1", &snapshot, "Tech Hall", None).unwrap();

    let api = api_client(&server.uri());
    let order = api.create_order(&request).await.unwrap();
    assert_eq!(order.total_cents, 1250);

    // Only a confirmed order empties the cart.
    cart.clear().await.unwrap();
    assert_eq!(cart.count().await, 0);
    assert!(cart.snapshot().await.restaurant_id.is_none());
}

#[tokio::test]
async fn rejected_checkout_leaves_the_cart_intact() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(serde_json::json!({"message": "Restaurant is closed"})),
        )
        .mount(&server)
        .await;

    let cart = CartStore::load(Arc::new(MemoryStore::default())).await;
    cart.add_item(item("burger", "Burger", 500), "r-grill", 2)
        .await
        .unwrap();

    let snapshot = cart.snapshot().await;
    let request = CreateOrderRequest::from_cart("u1", &snapshot, "Tech Hall", None).unwrap();

    let api = api_client(&server.uri());
    let err = api.create_order(&request).await.unwrap_err();
    assert_eq!(err.service_message(), Some("Restaurant is closed"));

    // The failed submission must not have touched the cart.
    assert_eq!(cart.total_cents().await, 1000);
    assert_eq!(cart.snapshot().await.restaurant_id.as_deref(), Some("r-grill"));
}
