// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog endpoints: restaurants and their menus.

use trundle_core::{MenuItemRef, Restaurant, TrundleError};

use crate::client::ApiClient;

impl ApiClient {
    /// `GET /restaurants`.
    pub async fn restaurants(&self) -> Result<Vec<Restaurant>, TrundleError> {
        self.execute(self.get("/restaurants")).await
    }

    /// `GET /restaurants/{id}`.
    pub async fn restaurant(&self, id: &str) -> Result<Restaurant, TrundleError> {
        self.execute(self.get(&format!("/restaurants/{id}"))).await
    }

    /// `GET /restaurants/{id}/menu`.
    pub async fn menu(&self, restaurant_id: &str) -> Result<Vec<MenuItemRef>, TrundleError> {
        self.execute(self.get(&format!("/restaurants/{restaurant_id}/menu")))
            .await
    }
}
