//! Server configuration
//!
//! All settings can be overridden through environment variables:
//!
//! | Variable | Default | Purpose |
//! |----------|---------|---------|
//! | WORK_DIR | /var/lib/cover-server | Database, uploads, logs |
//! | HTTP_PORT | 3000 | HTTP API port |
//! | PUBLIC_BASE_URL | http://localhost:3000 | Absolute URLs for uploads and checkout redirects |
//! | ENVIRONMENT | development | development \| staging \| production |
//! | REQUEST_TIMEOUT_MS | 30000 | Outbound collaborator timeout |
//! | PAYMENT_API_URL | https://api.stripe.com | Payment provider base URL |
//! | PAYMENT_SECRET_KEY | (unset) | Payment provider secret; card flow disabled without it |
//! | EMAIL_API_URL | https://api.resend.com | Email delivery base URL |
//! | EMAIL_API_KEY | (unset) | Email API key; delivery disabled without it |
//! | EMAIL_FROM | onboarding@resend.dev | Sender address |
//! | WALLET_* | (unset) | Wallet pass signing material, see [`WalletConfig`] |

use std::path::PathBuf;

use crate::auth::JwtConfig;

/// Wallet pass signing material (base64 PEM blobs)
///
/// All five values must be present for pass issuance to be enabled.
#[derive(Debug, Clone, Default)]
pub struct WalletConfig {
    pub signer_cert: Option<String>,
    pub signer_key: Option<String>,
    pub wwdr: Option<String>,
    pub pass_type_id: Option<String>,
    pub team_id: Option<String>,
    pub org_name: Option<String>,
}

impl WalletConfig {
    pub fn from_env() -> Self {
        Self {
            signer_cert: std::env::var("WALLET_SIGNER_CERT").ok(),
            signer_key: std::env::var("WALLET_SIGNER_KEY").ok(),
            wwdr: std::env::var("WALLET_WWDR").ok(),
            pass_type_id: std::env::var("WALLET_PASS_TYPE_ID").ok(),
            team_id: std::env::var("WALLET_TEAM_ID").ok(),
            org_name: std::env::var("WALLET_ORG_NAME").ok(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.signer_cert.is_some()
            && self.signer_key.is_some()
            && self.wwdr.is_some()
            && self.pass_type_id.is_some()
            && self.team_id.is_some()
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for database, uploads, and logs
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Base URL clients reach this server at
    pub public_base_url: String,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// development | staging | production
    pub environment: String,
    /// Timeout for outbound collaborator calls (milliseconds)
    pub request_timeout_ms: u64,

    // === Payment provider (card flow) ===
    pub payment_api_url: String,
    pub payment_secret_key: Option<String>,

    // === Email delivery ===
    pub email_api_url: String,
    pub email_api_key: Option<String>,
    pub email_from: String,

    // === Wallet passes ===
    pub wallet: WalletConfig,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/cover-server".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),

            payment_api_url: std::env::var("PAYMENT_API_URL")
                .unwrap_or_else(|_| "https://api.stripe.com".into()),
            payment_secret_key: std::env::var("PAYMENT_SECRET_KEY").ok(),

            email_api_url: std::env::var("EMAIL_API_URL")
                .unwrap_or_else(|_| "https://api.resend.com".into()),
            email_api_key: std::env::var("EMAIL_API_KEY").ok(),
            email_from: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "onboarding@resend.dev".into()),

            wallet: WalletConfig::from_env(),
        }
    }

    /// Override work dir and port (test scenarios)
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("uploads")
    }

    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// Create the work directory layout if missing
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.uploads_dir().join("payment-proofs"))?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
