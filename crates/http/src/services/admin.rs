//! Admin dashboard service
//!
//! Only the stats endpoint has a fixed shape; the listings are returned as
//! raw JSON for the dashboard to render.

use crate::client::{ClientError, MarketClient, cache::QueryKey};
use codemarket_core::AdminStats;
use serde_json::Value;

/// Admin endpoints under `/admin`; all require an admin token
#[derive(Clone)]
pub struct AdminApi {
    client: MarketClient,
}

impl AdminApi {
    pub fn new(client: MarketClient) -> Self {
        Self { client }
    }

    pub async fn stats(&self) -> Result<AdminStats, ClientError> {
        self.client.query(QueryKey::new("/admin/stats")).await
    }

    pub async fn users(&self) -> Result<Value, ClientError> {
        self.client.query(QueryKey::new("/admin/users")).await
    }

    pub async fn products(&self) -> Result<Value, ClientError> {
        self.client.query(QueryKey::new("/admin/products")).await
    }

    pub async fn transactions(&self) -> Result<Value, ClientError> {
        self.client.query(QueryKey::new("/admin/transactions")).await
    }
}
