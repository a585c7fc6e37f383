use crate::client::{ClientError, MarketClient, cache::QueryKey};
use codemarket_core::CategoryList;

/// Category listing
#[derive(Clone)]
pub struct CategoriesApi {
    client: MarketClient,
}

impl CategoriesApi {
    pub fn new(client: MarketClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<CategoryList, ClientError> {
        self.client.query(QueryKey::new("/categories")).await
    }
}
