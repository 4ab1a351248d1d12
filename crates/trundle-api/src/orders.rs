// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order endpoints: creation, listing, tracking, and status transitions.
//!
//! All order endpoints are authorized. Transition legality is enforced one
//! layer up, in the order tracker, before these methods are reached.

use trundle_core::{Order, OrderStatus, TrundleError};

use crate::client::ApiClient;
use crate::types::{CreateOrderRequest, StatusPatch, TrackingResponse};

impl ApiClient {
    /// `POST /orders`.
    pub async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order, TrundleError> {
        self.execute_authorized(self.post("/orders").json(request))
            .await
    }

    /// `GET /orders` -- scoped server-side to the caller (vendor dashboard,
    /// rider history).
    pub async fn orders(&self) -> Result<Vec<Order>, TrundleError> {
        self.execute_authorized(self.get("/orders")).await
    }

    /// `GET /orders/{id}/tracking`.
    pub async fn tracking(&self, order_id: &str) -> Result<TrackingResponse, TrundleError> {
        self.execute_authorized(self.get(&format!("/orders/{order_id}/tracking")))
            .await
    }

    /// `PATCH /orders/{id}/status`. Returns the authoritative updated order.
    pub async fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<Order, TrundleError> {
        let body = StatusPatch { status };
        self.execute_authorized(self.patch(&format!("/orders/{order_id}/status")).json(&body))
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use trundle_bus::AuthBus;
    use trundle_config::model::ApiConfig;
    use trundle_core::StaticToken;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn test_client(base_url: &str) -> ApiClient {
        let config = ApiConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        };
        ApiClient::new(
            &config,
            AuthBus::default(),
            Arc::new(StaticToken(Some("tok-1".into()))),
        )
        .unwrap()
    }

    fn order_json(id: &str, status: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "status": status,
            "items": [
                {"menuItemId": "m1", "name": "Burger", "quantity": 2, "priceCents": 500}
            ],
            "totalCents": 1000,
            "deliveryLocation": "North Quad",
            "robotId": null,
            "createdAt": "2026-04-01T12:00:00Z",
            "updatedAt": "2026-04-01T12:00:30Z"
        })
    }

    #[tokio::test]
    async fn create_order_posts_authorized_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/orders"))
            .and(header("authorization", "Bearer tok-1"))
            .respond_with(ResponseTemplate::new(201).set_body_json(order_json("o1", "CREATED")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let request = CreateOrderRequest {
            user_id: "u1".into(),
            vendor_id: "r1".into(),
            items: vec![],
            delivery_location: "North Quad".into(),
            delivery_location_lat: None,
            delivery_location_lng: None,
        };
        let order = client.create_order(&request).await.unwrap();
        assert_eq!(order.id, "o1");
        assert_eq!(order.status, OrderStatus::Created);
    }

    #[tokio::test]
    async fn tracking_parses_order_and_robot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/orders/o1/tracking"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "order": order_json("o1", "EN_ROUTE"),
                "robot": {
                    "id": "r9",
                    "robotId": "TRNDL-09",
                    "status": "EN_ROUTE",
                    "batteryPercent": 64,
                    "location": {"lat": 42.05, "lng": -87.68}
                },
                "estimatedDeliveryTime": "2026-04-01T12:20:00Z"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let tracking = client.tracking("o1").await.unwrap();
        assert_eq!(tracking.order.status, OrderStatus::EnRoute);
        assert_eq!(tracking.robot.unwrap().robot_id, "TRNDL-09");
        assert!(tracking.estimated_delivery_time.is_some());
    }

    #[tokio::test]
    async fn update_status_patches_wire_status() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/orders/o1/status"))
            .and(body_json(serde_json::json!({"status": "PREPARING"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(order_json("o1", "PREPARING")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let order = client
            .update_status("o1", OrderStatus::Preparing)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Preparing);
    }
}
