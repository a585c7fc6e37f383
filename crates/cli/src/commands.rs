//! CLI commands

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use codemarket_core::{
    ContactPayload, FilePayload, NewPasswordForm, ProductDraft, ProductQuery, RegisterForm,
};
use codemarket_session::AuthSession;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::output::print_json;

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the tokens
    Login {
        /// Account email
        email: String,

        /// Password (prompted for when omitted)
        #[arg(long, env = "CODEMARKET_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Sign out and forget the stored tokens
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Create an account
    Register {
        email: String,
        username: String,

        #[arg(long)]
        full_name: Option<String>,

        /// Password (prompted for when omitted)
        #[arg(long, env = "CODEMARKET_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Exchange the stored refresh token for new tokens
    Refresh,

    /// Reset a forgotten password
    PasswordReset {
        #[command(subcommand)]
        command: PasswordResetCommands,
    },

    /// Confirm an email address with the token from the verification mail
    VerifyEmail { token: String },

    /// Browse the product catalogue
    Products {
        #[command(subcommand)]
        command: ProductCommands,
    },

    /// List product categories
    Categories,

    /// Upload files and publish a product (sellers only)
    Upload {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: String,

        #[arg(long)]
        price: f64,

        #[arg(long, default_value = "USD")]
        currency: String,

        #[arg(long)]
        category: Option<i64>,

        /// Main programming language of the product
        #[arg(long)]
        language: Option<String>,

        #[arg(long)]
        framework: Option<String>,

        #[arg(long)]
        demo_url: Option<String>,

        #[arg(long)]
        github_url: Option<String>,

        /// Files to attach
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Send a message to support
    Contact {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        subject: String,

        #[arg(long)]
        message: String,
    },

    /// Admin dashboard data (admins only)
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Subcommand)]
pub enum PasswordResetCommands {
    /// Email a reset link
    Request { email: String },

    /// Set a new password using the token from the reset link
    Confirm {
        token: String,

        /// New password (prompted for when omitted)
        #[arg(long, env = "CODEMARKET_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ProductCommands {
    /// List products
    List {
        /// Search text
        #[arg(long)]
        q: Option<String>,

        #[arg(long)]
        category: Option<i64>,

        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Show one product
    Show { id: i64 },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    Stats,
    Users,
    Products,
    Transactions,
}

impl Commands {
    pub async fn execute(self, session: &AuthSession) -> Result<()> {
        match self {
            Commands::Login { email, password } => {
                let password = password_or_prompt(password, "Password")?;
                let user = session.login(&email, &password).await?;
                info!(username = %user.username, "Signed in");
                print_json(&user)
            }
            Commands::Logout => {
                if session.tokens().is_empty() {
                    bail!("Not signed in");
                }
                // The server call is advisory; local tokens go regardless
                if let Err(err) = session.client().auth().logout().await {
                    warn!(error = %err, "Server-side logout failed");
                }
                session.logout();
                Ok(())
            }
            Commands::Whoami => {
                session.initialize().await;
                match session.current_user() {
                    Some(user) => print_json(&user),
                    None => bail!("Not signed in"),
                }
            }
            Commands::Register {
                email,
                username,
                full_name,
                password,
            } => {
                let password = password_or_prompt(password, "Password")?;
                let confirm_password = password_or_prompt(None, "Repeat password")?;
                let form = RegisterForm {
                    email,
                    username,
                    password,
                    confirm_password,
                    full_name,
                };
                let user = session.register(&form).await?;
                print_json(&user)
            }
            Commands::Refresh => {
                session.refresh().await?;
                eprintln!("Tokens refreshed");
                Ok(())
            }
            Commands::PasswordReset { command } => command.execute(session).await,
            Commands::VerifyEmail { token } => {
                session.verify_email(&token).await?;
                Ok(())
            }
            Commands::Products { command } => command.execute(session).await,
            Commands::Categories => {
                let categories = session.client().categories().list().await?;
                print_json(&categories)
            }
            Commands::Upload {
                title,
                description,
                price,
                currency,
                category,
                language,
                framework,
                demo_url,
                github_url,
                files,
            } => {
                let mut draft = ProductDraft::new(title, description, price);
                draft.currency = currency;
                draft.category_id = category;
                draft.programming_language = language;
                draft.framework = framework;
                draft.demo_url = demo_url;
                draft.github_url = github_url;

                let mut payloads = Vec::with_capacity(files.len());
                for path in &files {
                    payloads.push(read_file(path).await?);
                }

                session.initialize().await;
                let product = session.submit_product(&draft, payloads).await?;
                print_json(&product)
            }
            Commands::Contact {
                name,
                email,
                subject,
                message,
            } => {
                let payload = ContactPayload {
                    name,
                    email,
                    subject,
                    message,
                };
                session.send_contact_message(&payload).await?;
                Ok(())
            }
            Commands::Admin { command } => command.execute(session).await,
        }
    }
}

impl PasswordResetCommands {
    pub async fn execute(self, session: &AuthSession) -> Result<()> {
        match self {
            PasswordResetCommands::Request { email } => {
                session.request_password_reset(&email).await?;
            }
            PasswordResetCommands::Confirm { token, password } => {
                let new_password = password_or_prompt(password, "New password")?;
                let form = NewPasswordForm {
                    token,
                    new_password,
                };
                session.confirm_password_reset(&form).await?;
            }
        }
        Ok(())
    }
}

impl ProductCommands {
    pub async fn execute(self, session: &AuthSession) -> Result<()> {
        let products = session.client().products();
        match self {
            ProductCommands::List {
                q,
                category,
                page,
                page_size,
            } => {
                let query = ProductQuery {
                    q,
                    category_id: category,
                    page,
                    page_size,
                };
                print_json(&products.list(&query).await?)
            }
            ProductCommands::Show { id } => print_json(&products.get(id).await?),
        }
    }
}

impl AdminCommands {
    pub async fn execute(self, session: &AuthSession) -> Result<()> {
        let admin = session.client().admin();
        match self {
            AdminCommands::Stats => print_json(&admin.stats().await?),
            AdminCommands::Users => print_json(&admin.users().await?),
            AdminCommands::Products => print_json(&admin.products().await?),
            AdminCommands::Transactions => print_json(&admin.transactions().await?),
        }
    }
}

fn password_or_prompt(password: Option<String>, prompt: &str) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    rpassword::prompt_password(format!("{prompt}: "))
        .with_context(|| format!("Failed to read {}", prompt.to_lowercase()))
}

async fn read_file(path: &Path) -> Result<FilePayload> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} is not a file", path.display()))?;

    let payload = FilePayload::new(name, bytes);
    Ok(match content_type(path) {
        Some(content_type) => payload.with_content_type(content_type),
        None => payload,
    })
}

/// MIME type for the archive and source formats the marketplace accepts
fn content_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match extension.as_str() {
        "zip" => "application/zip",
        "rar" => "application/x-rar-compressed",
        "7z" => "application/x-7z-compressed",
        "txt" | "md" => "text/plain",
        "js" => "application/javascript",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        _ => return None,
    };
    Some(mime)
}
