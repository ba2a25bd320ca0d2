//! Refresh-token exchange for the fallback service credential.

use drivedrop_core::ServiceAccount;
use serde::Deserialize;

use crate::traits::{StorageError, StorageResult};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Exchanges a refresh secret for a short-lived access token at the OAuth token endpoint.
///
/// Every call performs a fresh exchange; tokens are not cached between requests.
#[derive(Clone, Debug)]
pub struct TokenExchange {
    http_client: reqwest::Client,
    token_url: String,
}

impl TokenExchange {
    pub fn new(http_client: reqwest::Client, token_url: impl Into<String>) -> Self {
        Self {
            http_client,
            token_url: token_url.into(),
        }
    }

    pub async fn access_token(&self, account: &ServiceAccount) -> StorageResult<String> {
        let params = [
            ("client_id", account.client_id.as_str()),
            ("client_secret", account.client_secret.as_str()),
            ("refresh_token", account.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .http_client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                StorageError::CredentialExchange(format!("token endpoint unreachable: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let reason = match serde_json::from_str::<TokenErrorResponse>(&text) {
                Ok(err) => match err.error_description {
                    Some(description) => format!("{}: {}", err.error, description),
                    None => err.error,
                },
                Err(_) => text,
            };
            return Err(StorageError::CredentialExchange(format!(
                "token endpoint returned {} ({})",
                status, reason
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            StorageError::CredentialExchange(format!("invalid token response: {}", e))
        })?;

        tracing::debug!(client_id = %account.client_id, "Exchanged refresh token for access token");
        Ok(token.access_token)
    }
}
