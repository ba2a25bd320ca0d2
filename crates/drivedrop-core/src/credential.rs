//! Storage authorization credentials.

use std::fmt;

/// Pre-provisioned OAuth client plus long-lived refresh secret.
///
/// Lives only in server process configuration; `Debug` never prints the secrets.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceAccount {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Identity used for a single storage call. Resolved once per request.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Bearer token obtained interactively by the user. Not validated locally.
    UserToken(String),
    /// Fallback identity built from configuration.
    ServiceAccount(ServiceAccount),
}

impl Credential {
    /// Pick the user's token when one was supplied, otherwise the fallback.
    ///
    /// Returns `None` only when no token was supplied and no fallback exists.
    pub fn resolve(user_token: Option<String>, fallback: Option<&ServiceAccount>) -> Option<Self> {
        match user_token {
            Some(token) => Some(Credential::UserToken(token)),
            None => fallback.cloned().map(Credential::ServiceAccount),
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Credential::UserToken(_) => "user_token",
            Credential::ServiceAccount(_) => "service_account",
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::UserToken(_) => f.write_str("UserToken(<redacted>)"),
            Credential::ServiceAccount(account) => {
                f.debug_tuple("ServiceAccount").field(account).finish()
            }
        }
    }
}
