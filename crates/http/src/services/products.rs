//! Product catalogue service

use crate::client::{ClientError, MarketClient, cache::QueryKey};
use codemarket_core::{Paginated, Product, ProductCreate, ProductDetail, ProductQuery};
use reqwest::Method;

/// Product endpoints under `/products`
#[derive(Clone)]
pub struct ProductsApi {
    client: MarketClient,
}

impl ProductsApi {
    pub fn new(client: MarketClient) -> Self {
        Self { client }
    }

    /// One page of products matching the filters (cached)
    pub async fn list(&self, query: &ProductQuery) -> Result<Paginated<Product>, ClientError> {
        let key = QueryKey::new("/products").params(query.to_params());
        self.client.query(key).await
    }

    /// Full product record (cached)
    pub async fn get(&self, product_id: i64) -> Result<ProductDetail, ClientError> {
        self.client
            .query(QueryKey::new(format!("/products/{product_id}")))
            .await
    }

    /// Publish a product; requires a seller or admin token
    pub async fn create(&self, product: &ProductCreate) -> Result<ProductDetail, ClientError> {
        let request = self
            .client
            .request(Method::POST, "/products")
            .json(product);
        self.client.execute(request).await
    }
}
