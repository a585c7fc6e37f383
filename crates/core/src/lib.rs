//! Codemarket core types and form validation

pub mod types;
pub mod validation;

pub use types::{
    AdminStats, Category, CategoryList, ContactPayload, FilePayload, LoginResponse,
    MessageResponse, Paginated, Product, ProductCreate, ProductDetail, ProductQuery,
    RegisterRequest, TokenPair, UploadedFile, User, UserRole,
};
pub use validation::{
    FieldError, FieldErrorKind, LoginForm, NewPasswordForm, PasswordResetForm, ProductDraft,
    RegisterForm, Validate, ValidationErrors,
};
