//! Wire types shared by the HTTP client, the session controller and the front ends

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role as reported by the backend
///
/// Unknown role strings are preserved rather than rejected so that a newer
/// backend does not break sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserRole {
    Admin,
    Seller,
    Buyer,
    Moderator,
    Other(String),
}

impl UserRole {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Seller => "seller",
            Self::Buyer => "buyer",
            Self::Moderator => "moderator",
            Self::Other(role) => role,
        }
    }

    /// Whether this role may publish products
    pub fn can_sell(&self) -> bool {
        matches!(self, Self::Seller | Self::Admin)
    }
}

impl From<String> for UserRole {
    fn from(value: String) -> Self {
        match value.as_str() {
            "admin" => Self::Admin,
            "seller" => Self::Seller,
            "buyer" => Self::Buyer,
            "moderator" => Self::Moderator,
            _ => Self::Other(value),
        }
    }
}

impl From<UserRole> for String {
    fn from(value: UserRole) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity record returned by `GET /auth/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub email: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub role: UserRole,
    pub is_verified: bool,

    // Account flags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_banned: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<String>,

    // Profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,

    // Seller statistics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_sales: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_earnings: Option<f64>,
}

impl User {
    /// Name to show in greetings: full name when set, username otherwise
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// Access and refresh bearer tokens, always stored together
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Response of `POST /auth/login` and `POST /auth/refresh`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl From<LoginResponse> for TokenPair {
    fn from(response: LoginResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
        }
    }
}

/// Body of `POST /auth/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// Generic `{"message": ...}` acknowledgement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Product summary as listed by `GET /products`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub price: f64,
    pub currency: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub total_reviews: Option<u32>,
    #[serde(default)]
    pub demo_url: Option<String>,
    pub created_at: String,
}

/// Full product record from `GET /products/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub summary: Product,
    pub description: String,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub programming_language: Option<String>,
    #[serde(default)]
    pub framework: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    pub seller_id: i64,
    #[serde(default)]
    pub category_id: Option<i64>,
}

/// Body of `POST /products`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCreate {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub programming_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    /// Stored names of the files uploaded for this product
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
}

/// Filters accepted by `GET /products`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl ProductQuery {
    /// Query parameters in wire form, absent filters omitted
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(q) = self.q.as_deref().filter(|q| !q.is_empty()) {
            params.push(("q", q.to_string()));
        }
        if let Some(category_id) = self.category_id {
            params.push(("category_id", category_id.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            params.push(("page_size", page_size.to_string()));
        }
        params
    }
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Paginated<T> {
    /// Number of pages needed to show `total` items
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size))
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryList {
    pub items: Vec<Category>,
    pub total: u64,
}

/// Descriptor returned by `POST /upload/file`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub filename: String,
    pub stored_as: String,
    pub size: u64,
}

/// A file selected for upload
#[derive(Clone, PartialEq, Eq)]
pub struct FilePayload {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FilePayload {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl fmt::Debug for FilePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePayload")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Body of `POST /support/contact`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, validator::Validate)]
pub struct ContactPayload {
    #[validate(custom(function = "crate::validation::validators::not_blank"))]
    pub name: String,
    #[validate(custom(function = "crate::validation::validators::not_blank"), email)]
    pub email: String,
    #[validate(custom(function = "crate::validation::validators::not_blank"))]
    pub subject: String,
    #[validate(
        custom(function = "crate::validation::validators::not_blank"),
        length(min = 10)
    )]
    pub message: String,
}

/// Counters from `GET /admin/stats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminStats {
    pub users: u64,
    pub products: u64,
    pub transactions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_deserializes_from_minimal_profile() {
        let user: User = serde_json::from_value(json!({
            "id": 1,
            "username": "alice",
            "role": "buyer",
            "is_verified": true
        }))
        .unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, UserRole::Buyer);
        assert!(user.email.is_empty());
        assert!(user.seller_rating.is_none());
        assert_eq!(user.display_name(), "alice");
    }

    #[test]
    fn unknown_role_is_preserved() {
        let role: UserRole = serde_json::from_value(json!("curator")).unwrap();
        assert_eq!(role, UserRole::Other("curator".to_string()));
        assert_eq!(serde_json::to_value(&role).unwrap(), json!("curator"));
        assert!(!role.can_sell());
        assert!(UserRole::Admin.can_sell());
    }

    #[test]
    fn token_pair_debug_hides_secrets() {
        let pair = TokenPair::new("secret-access", "secret-refresh");
        let rendered = format!("{pair:?}");
        assert!(!rendered.contains("secret-access"));
        assert!(!rendered.contains("secret-refresh"));
    }

    #[test]
    fn product_query_skips_absent_filters() {
        let query = ProductQuery {
            q: Some(String::new()),
            category_id: Some(4),
            page: Some(2),
            page_size: None,
        };
        assert_eq!(
            query.to_params(),
            vec![("category_id", "4".to_string()), ("page", "2".to_string())]
        );
    }

    #[test]
    fn product_detail_flattens_summary() {
        let detail: ProductDetail = serde_json::from_value(json!({
            "id": 7,
            "title": "Rust CRM",
            "slug": "rust-crm",
            "price": 49.0,
            "currency": "USD",
            "created_at": "2024-05-01T10:00:00",
            "description": "A CRM",
            "seller_id": 3
        }))
        .unwrap();
        assert_eq!(detail.summary.id, 7);
        assert_eq!(detail.seller_id, 3);
        assert!(detail.category_id.is_none());
    }

    #[test]
    fn pagination_math() {
        let page = Paginated::<Product> {
            items: vec![],
            total: 41,
            page: 2,
            page_size: 20,
        };
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
    }
}
