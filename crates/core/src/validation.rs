//! Client-side form validation
//!
//! Every form is checked before it is submitted. Field rules are declared
//! with `validator` attributes; a failed check yields one [`FieldError`] per
//! offending field, tagged with the kind of failure, so a front end can
//! render the message next to the field it belongs to.

use crate::types::{ContactPayload, FilePayload, ProductCreate, RegisterRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use validator::ValidationError;

/// Largest file accepted by the upload form (100 MiB)
pub const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

/// Why a single field was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    Required,
    TooShort { min: usize },
    TooLong { max: usize },
    InvalidFormat(&'static str),
    Negative,
    Mismatch { other: String },
}

/// A rejected field and the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Cow<'static, str>,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(field: impl Into<Cow<'static, str>>, kind: FieldErrorKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = label(&self.field);
        match &self.kind {
            FieldErrorKind::Required => write!(f, "{name} is required"),
            FieldErrorKind::TooShort { min } => {
                write!(f, "{name} must be at least {min} characters")
            }
            FieldErrorKind::TooLong { max } => {
                write!(f, "{name} must be at most {max} characters")
            }
            FieldErrorKind::InvalidFormat(reason) => write!(f, "{name} {reason}"),
            FieldErrorKind::Negative => write!(f, "{name} cannot be negative"),
            FieldErrorKind::Mismatch { other } => {
                write!(f, "{name} does not match {}", label(other).to_lowercase())
            }
        }
    }
}

fn label(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// All field errors found in one form
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{}", summary(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn push(&mut self, field: impl Into<Cow<'static, str>>, kind: FieldErrorKind) {
        self.errors.push(FieldError::new(field, kind));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// First error recorded for `field`
    pub fn for_field(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|error| error.field == field)
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(report: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = report.field_errors().into_iter().collect();
        fields.sort_by(|(a, _), (b, _)| a.cmp(b));

        let mut errors = Self::default();
        for (field, failures) in fields {
            let field: Cow<'static, str> = field.into();
            // A blank field only reports that it is missing
            if failures.iter().any(|failure| failure.code == "required") {
                errors.push(field, FieldErrorKind::Required);
                continue;
            }
            for failure in failures {
                errors.push(field.clone(), kind_of(failure));
            }
        }
        errors
    }
}

fn kind_of(failure: &ValidationError) -> FieldErrorKind {
    let param = |name: &str| failure.params.get(name);
    let bound = |name: &str| param(name).and_then(Value::as_u64).map(|n| n as usize);

    match failure.code.as_ref() {
        "required" => FieldErrorKind::Required,
        "length" => {
            let len = param("value")
                .and_then(Value::as_str)
                .map(|value| value.chars().count());
            match (bound("min"), bound("max"), len) {
                (Some(min), _, Some(len)) if len < min => FieldErrorKind::TooShort { min },
                (_, Some(max), _) => FieldErrorKind::TooLong { max },
                (Some(min), None, _) => FieldErrorKind::TooShort { min },
                _ => FieldErrorKind::InvalidFormat("has an invalid length"),
            }
        }
        "range" => FieldErrorKind::Negative,
        "email" => FieldErrorKind::InvalidFormat("is not a valid email address"),
        "url" => FieldErrorKind::InvalidFormat("must be a valid URL"),
        "not_a_number" => FieldErrorKind::InvalidFormat("must be a number"),
        "username_charset" => {
            FieldErrorKind::InvalidFormat("may only contain letters, digits, _ and -")
        }
        "letter_and_digit" => {
            FieldErrorKind::InvalidFormat("must contain at least one letter and one digit")
        }
        code => match code.strip_prefix("matches_") {
            Some(other) => FieldErrorKind::Mismatch {
                other: other.to_string(),
            },
            None => FieldErrorKind::InvalidFormat("is invalid"),
        },
    }
}

/// Forms that can be checked before submission
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Run the `validator` rules declared on a form
fn check<T: validator::Validate>(form: &T) -> Result<(), ValidationErrors> {
    validator::Validate::validate(form).map_err(ValidationErrors::from)
}

/// Custom rules referenced from the `#[validate]` attributes
pub mod validators {
    use validator::ValidationError;

    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("required"));
        }
        Ok(())
    }

    /// Alphanumeric, `_` and `-` only
    pub fn username_charset(value: &str) -> Result<(), ValidationError> {
        if value
            .trim()
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            return Ok(());
        }
        Err(ValidationError::new("username_charset"))
    }

    pub fn letter_and_digit(value: &str) -> Result<(), ValidationError> {
        if value.chars().any(char::is_alphabetic) && value.chars().any(|c| c.is_ascii_digit()) {
            return Ok(());
        }
        Err(ValidationError::new("letter_and_digit"))
    }

    pub fn finite(value: f64) -> Result<(), ValidationError> {
        if value.is_finite() {
            return Ok(());
        }
        Err(ValidationError::new("not_a_number"))
    }
}

/// Sign-in form
#[derive(Debug, Clone, Default, PartialEq, Eq, validator::Validate)]
pub struct LoginForm {
    #[validate(custom(function = "validators::not_blank"), email)]
    pub email: String,
    #[validate(custom(function = "validators::not_blank"))]
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl Validate for LoginForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        check(self)
    }
}

/// Sign-up form
#[derive(Debug, Clone, Default, PartialEq, Eq, validator::Validate)]
pub struct RegisterForm {
    #[validate(custom(function = "validators::not_blank"), email)]
    pub email: String,
    #[validate(
        custom(function = "validators::not_blank"),
        length(min = 3, max = 50),
        custom(function = "validators::username_charset")
    )]
    pub username: String,
    #[validate(
        custom(function = "validators::not_blank"),
        length(min = 6),
        custom(function = "validators::letter_and_digit")
    )]
    pub password: String,
    #[validate(must_match(other = "password", code = "matches_password"))]
    pub confirm_password: String,
    #[validate(length(max = 255))]
    pub full_name: Option<String>,
}

impl RegisterForm {
    /// Request body for `POST /auth/register`
    pub fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            email: self.email.trim().to_string(),
            username: self.username.trim().to_string(),
            password: self.password.clone(),
            full_name: trimmed(self.full_name.as_deref()),
        }
    }
}

impl Validate for RegisterForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        check(self)
    }
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Password reset request form
#[derive(Debug, Clone, Default, PartialEq, Eq, validator::Validate)]
pub struct PasswordResetForm {
    #[validate(custom(function = "validators::not_blank"), email)]
    pub email: String,
}

impl Validate for PasswordResetForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        check(self)
    }
}

/// New password form reached from a reset link
#[derive(Debug, Clone, Default, PartialEq, Eq, validator::Validate)]
pub struct NewPasswordForm {
    #[validate(custom(function = "validators::not_blank"))]
    pub token: String,
    #[validate(
        custom(function = "validators::not_blank"),
        length(min = 6),
        custom(function = "validators::letter_and_digit")
    )]
    pub new_password: String,
}

impl Validate for NewPasswordForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        check(self)
    }
}

impl Validate for ContactPayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        check(self)
    }
}

/// Seller-entered product details on the upload form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, validator::Validate)]
pub struct ProductDraft {
    #[validate(custom(function = "validators::not_blank"))]
    pub title: String,
    #[validate(custom(function = "validators::not_blank"))]
    pub description: String,
    #[validate(custom(function = "validators::finite"), range(min = 0.0))]
    pub price: f64,
    #[serde(default = "default_currency")]
    #[validate(custom(function = "validators::not_blank"))]
    pub currency: String,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub programming_language: Option<String>,
    #[serde(default)]
    pub framework: Option<String>,
    #[serde(default)]
    #[validate(url)]
    pub demo_url: Option<String>,
    #[serde(default)]
    #[validate(url)]
    pub github_url: Option<String>,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl ProductDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>, price: f64) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            price,
            currency: default_currency(),
            category_id: None,
            programming_language: None,
            framework: None,
            demo_url: None,
            github_url: None,
        }
    }

    /// Request body for `POST /products`, referencing the stored files
    pub fn to_create(&self, files: Vec<String>) -> ProductCreate {
        ProductCreate {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            price: self.price,
            currency: self.currency.clone(),
            category_id: self.category_id,
            programming_language: trimmed(self.programming_language.as_deref()),
            framework: trimmed(self.framework.as_deref()),
            demo_url: trimmed(self.demo_url.as_deref()),
            github_url: trimmed(self.github_url.as_deref()),
            files,
        }
    }

    /// Check the draft together with the files attached to it
    pub fn validate_with_files(&self, files: &[FilePayload]) -> Result<(), ValidationErrors> {
        let sizes: Vec<u64> = files.iter().map(FilePayload::size).collect();
        self.validate_with_sizes(&sizes)
    }

    /// Check the draft against the byte sizes of the attached files
    pub fn validate_with_sizes(&self, sizes: &[u64]) -> Result<(), ValidationErrors> {
        let mut errors = match Validate::validate(self) {
            Ok(()) => ValidationErrors::default(),
            Err(errors) => errors,
        };

        if sizes.is_empty() {
            errors.push("files", FieldErrorKind::Required);
        } else if sizes.iter().any(|&size| size > MAX_UPLOAD_BYTES) {
            errors.push("files", FieldErrorKind::InvalidFormat("exceed the 100MB limit"));
        }
        errors.into_result()
    }
}

impl Validate for ProductDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        check(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_form_requires_both_fields() {
        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(
            errors.for_field("email").map(|e| &e.kind),
            Some(&FieldErrorKind::Required)
        );
        assert_eq!(
            errors.for_field("password").map(|e| &e.kind),
            Some(&FieldErrorKind::Required)
        );
        assert_eq!(errors.errors().len(), 2);
        assert!(LoginForm::new("a@b.com", "secret").validate().is_ok());
    }

    #[test]
    fn login_form_rejects_malformed_email() {
        let errors = LoginForm::new("not-an-email", "secret")
            .validate()
            .unwrap_err();
        assert_eq!(errors.errors().len(), 1);
        assert_eq!(
            errors.errors()[0].to_string(),
            "Email is not a valid email address"
        );
    }

    #[test]
    fn register_form_rules() {
        let form = RegisterForm {
            email: "bob@example.com".into(),
            username: "b!".into(),
            password: "abcdef".into(),
            confirm_password: "abcdeg".into(),
            full_name: None,
        };
        let errors = form.validate().unwrap_err();

        let username: Vec<_> = errors
            .errors()
            .iter()
            .filter(|e| e.field == "username")
            .map(|e| e.kind.clone())
            .collect();
        assert!(username.contains(&FieldErrorKind::TooShort { min: 3 }));
        assert!(username.iter().any(|k| matches!(k, FieldErrorKind::InvalidFormat(_))));
        assert!(matches!(
            errors.for_field("password").map(|e| &e.kind),
            Some(FieldErrorKind::InvalidFormat(_))
        ));
        assert_eq!(
            errors.for_field("confirm_password").map(ToString::to_string),
            Some("Confirm password does not match password".to_string())
        );
    }

    #[test]
    fn register_form_length_limits() {
        let form = RegisterForm {
            email: "bob@example.com".into(),
            username: "b".repeat(51),
            password: "abc1".into(),
            confirm_password: "abc1".into(),
            full_name: Some("n".repeat(256)),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.for_field("username").map(|e| &e.kind),
            Some(&FieldErrorKind::TooLong { max: 50 })
        );
        assert_eq!(
            errors.for_field("password").map(|e| &e.kind),
            Some(&FieldErrorKind::TooShort { min: 6 })
        );
        assert_eq!(
            errors.for_field("full_name").map(|e| &e.kind),
            Some(&FieldErrorKind::TooLong { max: 255 })
        );
        assert!(errors.for_field("confirm_password").is_none());
    }

    #[test]
    fn register_form_builds_trimmed_request() {
        let form = RegisterForm {
            email: "bob@example.com".into(),
            username: "bob_42".into(),
            password: "hunter22".into(),
            confirm_password: "hunter22".into(),
            full_name: Some("   ".into()),
        };
        assert!(form.validate().is_ok());
        let request = form.to_request();
        assert_eq!(request.email, "bob@example.com");
        assert!(request.full_name.is_none());
    }

    #[test]
    fn new_password_follows_password_rule() {
        let form = NewPasswordForm {
            token: "reset-token".into(),
            new_password: "12345678".into(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "New password must contain at least one letter and one digit"
        );

        let form = NewPasswordForm {
            token: " ".into(),
            new_password: "hunter22".into(),
        };
        assert_eq!(form.validate().unwrap_err().to_string(), "Token is required");
    }

    #[test]
    fn contact_message_needs_detail() {
        let payload = ContactPayload {
            name: "Ann".into(),
            email: "ann@example.com".into(),
            subject: "Refund".into(),
            message: "help".into(),
        };
        let errors = payload.validate().unwrap_err();
        assert_eq!(
            errors.for_field("message").map(|e| &e.kind),
            Some(&FieldErrorKind::TooShort { min: 10 })
        );
    }

    #[test]
    fn upload_requires_files() {
        let draft = ProductDraft::new("Kit", "Starter kit", 10.0);
        let errors = draft.validate_with_files(&[]).unwrap_err();
        assert_eq!(errors.to_string(), "Files is required");

        let file = FilePayload::new("kit.zip", vec![0u8; 16]);
        assert!(draft.validate_with_files(&[file]).is_ok());
    }

    #[test]
    fn upload_size_limit_is_inclusive() {
        let draft = ProductDraft::new("Kit", "Starter kit", 10.0);
        assert!(draft.validate_with_sizes(&[MAX_UPLOAD_BYTES]).is_ok());
        assert!(draft.validate_with_sizes(&[1, MAX_UPLOAD_BYTES]).is_ok());

        let errors = draft
            .validate_with_sizes(&[1, MAX_UPLOAD_BYTES + 1])
            .unwrap_err();
        assert_eq!(errors.errors().len(), 1);
        assert_eq!(errors.to_string(), "Files exceed the 100MB limit");
    }

    #[test]
    fn product_draft_rejects_bad_urls_and_price() {
        let mut draft = ProductDraft::new("Kit", "Starter kit", -1.0);
        draft.github_url = Some("not a url".into());
        let errors = draft.validate().unwrap_err();
        assert_eq!(
            errors.for_field("price").map(|e| &e.kind),
            Some(&FieldErrorKind::Negative)
        );
        assert_eq!(
            errors.for_field("github_url").map(ToString::to_string),
            Some("Github url must be a valid URL".to_string())
        );

        draft.price = f64::NAN;
        draft.github_url = None;
        let errors = draft.validate().unwrap_err();
        assert!(
            errors
                .errors()
                .iter()
                .any(|e| e.kind == FieldErrorKind::InvalidFormat("must be a number"))
        );
    }

    #[test]
    fn product_create_carries_optional_details() {
        let mut draft = ProductDraft::new(" Kit ", "Starter kit", 10.0);
        draft.github_url = Some("https://github.com/acme/kit".into());
        draft.demo_url = Some("https://kit.example".into());
        draft.programming_language = Some("Rust".into());
        draft.framework = Some(" ".into());

        let create = draft.to_create(vec!["abc.zip".into()]);
        assert_eq!(create.title, "Kit");
        assert_eq!(create.github_url.as_deref(), Some("https://github.com/acme/kit"));
        assert_eq!(create.demo_url.as_deref(), Some("https://kit.example"));
        assert_eq!(create.programming_language.as_deref(), Some("Rust"));
        assert!(create.framework.is_none());

        let body = serde_json::to_value(&create).unwrap();
        assert_eq!(body["github_url"], "https://github.com/acme/kit");
        assert!(body.get("framework").is_none());
    }
}
