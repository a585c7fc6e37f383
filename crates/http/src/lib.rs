//! Codemarket HTTP client
//!
//! One configured [`MarketClient`] sends every request to the marketplace
//! backend. The current access token is read from the [`TokenStore`] each
//! time a request is built, read queries go through a [`QueryCache`], and the
//! per-feature wrappers in [`services`] expose one typed method per endpoint.

pub mod client;
pub mod services;

pub use client::{
    ClientError, MarketClient, MarketClientBuilder,
    cache::{QueryCache, QueryKey},
    config::{ClientConfig, QueryPolicy},
    error::ErrorBody,
    token_store::{MemoryStorage, Storage, StorageError, TokenStore},
};
pub use reqwest::StatusCode;
pub use services::{AdminApi, AuthApi, CategoriesApi, ProductsApi, SupportApi, UploadApi};
