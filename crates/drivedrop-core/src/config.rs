//! Configuration module
//!
//! Process configuration is read once at startup into `Config` and treated as
//! read-only afterwards. Values needed by a single pipeline stage (service
//! account, SMTP sender) are optional here; their absence is reported when the
//! stage that needs them runs.

use std::env;
use std::time::Duration;

use crate::credential::ServiceAccount;

// Common constants
const SERVER_PORT: u16 = 3000;
const MAX_UPLOAD_SIZE_MB: usize = 100;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;
const STORAGE_TIMEOUT_SECS: u64 = 300;
const EMAIL_TIMEOUT_SECS: u64 = 30;
const SMTP_HOST: &str = "smtp.gmail.com";
const SMTP_PORT: u16 = 587;
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const DRIVE_UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files";

/// Console log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub max_upload_bytes: usize,
    pub http_concurrency_limit: usize,
    pub log_format: LogFormat,
}

/// Remote storage (Google Drive) settings
#[derive(Clone)]
pub struct StorageConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub refresh_token: Option<String>,
    /// OAuth client id handed to the browser; public by nature.
    pub public_client_id: Option<String>,
    pub token_url: String,
    pub upload_url: String,
    pub folder_id: Option<String>,
    pub timeout: Duration,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("public_client_id", &self.public_client_id)
            .field("token_url", &self.token_url)
            .field("upload_url", &self.upload_url)
            .field("folder_id", &self.folder_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl StorageConfig {
    /// Build the fallback credential. Err lists the variables that are missing.
    pub fn service_account(&self) -> Result<ServiceAccount, String> {
        match (&self.client_id, &self.client_secret, &self.refresh_token) {
            (Some(client_id), Some(client_secret), Some(refresh_token)) => Ok(ServiceAccount {
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
                refresh_token: refresh_token.clone(),
            }),
            _ => {
                let missing: Vec<&str> = [
                    ("GOOGLE_CLIENT_ID", self.client_id.is_none()),
                    ("GOOGLE_CLIENT_SECRET", self.client_secret.is_none()),
                    ("GOOGLE_REFRESH_TOKEN", self.refresh_token.is_none()),
                ]
                .iter()
                .filter(|(_, missing)| *missing)
                .map(|(name, _)| *name)
                .collect();
                Err(format!("{} not set", missing.join(", ")))
            }
        }
    }
}

/// SMTP sender used for notification emails
#[derive(Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_tls: bool,
    pub sender_address: Option<String>,
    pub sender_password: Option<String>,
    pub timeout: Duration,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_tls", &self.smtp_tls)
            .field("sender_address", &self.sender_address)
            .field("sender_password", &self.sender_password.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl EmailConfig {
    /// Sender address and secret. Err lists the variables that are missing.
    pub fn sender(&self) -> Result<(&str, &str), String> {
        match (&self.sender_address, &self.sender_password) {
            (Some(user), Some(pass)) => Ok((user.as_str(), pass.as_str())),
            (None, Some(_)) => Err("EMAIL_USER not set".to_string()),
            (Some(_), None) => Err("EMAIL_PASS not set".to_string()),
            (None, None) => Err("EMAIL_USER, EMAIL_PASS not set".to_string()),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub storage: StorageConfig,
    pub email: EmailConfig,
}

impl Config {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values are treated as unset
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_upload_mb = var("MAX_UPLOAD_SIZE_MB")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let log_format = match var("LOG_FORMAT").map(|s| s.to_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        };

        let base = BaseConfig {
            server_port: var("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            http_concurrency_limit: var("HTTP_CONCURRENCY_LIMIT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT),
            log_format,
        };

        let client_id = var("GOOGLE_CLIENT_ID");
        let storage = StorageConfig {
            public_client_id: var("PUBLIC_GOOGLE_CLIENT_ID").or_else(|| client_id.clone()),
            client_id,
            client_secret: var("GOOGLE_CLIENT_SECRET"),
            refresh_token: var("GOOGLE_REFRESH_TOKEN"),
            token_url: var("GOOGLE_TOKEN_URL").unwrap_or_else(|| GOOGLE_TOKEN_URL.to_string()),
            upload_url: var("DRIVE_UPLOAD_URL").unwrap_or_else(|| DRIVE_UPLOAD_URL.to_string()),
            folder_id: var("DRIVE_FOLDER_ID"),
            timeout: Duration::from_secs(
                var("STORAGE_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(STORAGE_TIMEOUT_SECS),
            ),
        };

        let email = EmailConfig {
            smtp_host: var("SMTP_HOST").unwrap_or_else(|| SMTP_HOST.to_string()),
            smtp_port: var("SMTP_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(SMTP_PORT),
            smtp_tls: var("SMTP_TLS")
                .map(|s| s.to_lowercase())
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
            sender_address: var("EMAIL_USER"),
            sender_password: var("EMAIL_PASS"),
            timeout: Duration::from_secs(
                var("EMAIL_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(EMAIL_TIMEOUT_SECS),
            ),
        };

        Ok(Config {
            base,
            storage,
            email,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.base.max_upload_bytes
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }
}
