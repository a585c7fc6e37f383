//! Per-feature service wrappers
//!
//! Each wrapper is a stateless adapter over a shared [`MarketClient`]: one
//! method per backend endpoint, shaping the request and the response type
//! and nothing else. Errors come back exactly as the client produced them.

pub mod admin;
pub mod auth;
pub mod categories;
pub mod products;
pub mod support;
pub mod upload;

pub use admin::AdminApi;
pub use auth::AuthApi;
pub use categories::CategoriesApi;
pub use products::ProductsApi;
pub use support::SupportApi;
pub use upload::UploadApi;

use crate::client::MarketClient;

impl MarketClient {
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    pub fn products(&self) -> ProductsApi {
        ProductsApi::new(self.clone())
    }

    pub fn categories(&self) -> CategoriesApi {
        CategoriesApi::new(self.clone())
    }

    pub fn upload(&self) -> UploadApi {
        UploadApi::new(self.clone())
    }

    pub fn support(&self) -> SupportApi {
        SupportApi::new(self.clone())
    }

    pub fn admin(&self) -> AdminApi {
        AdminApi::new(self.clone())
    }
}
