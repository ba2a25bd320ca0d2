//! Configuration validation
//!
//! Catches misconfigurations at startup. Stage credentials (service account,
//! SMTP sender) are not required here; their absence is reported when the
//! stage that needs them runs.

use anyhow::Result;
use drivedrop_core::Config;

pub fn validate_config(config: &Config) -> Result<()> {
    if config.server_port() == 0 {
        return Err(anyhow::anyhow!("PORT cannot be 0"));
    }

    if config.is_production() && config.cors_origins().iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production. \
            Set specific allowed origins via CORS_ORIGINS."
        ));
    }

    if config.max_upload_bytes() == 0 {
        return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB cannot be 0"));
    }

    if config.storage.timeout.is_zero() {
        return Err(anyhow::anyhow!("STORAGE_TIMEOUT_SECS cannot be 0"));
    }

    if config.email.timeout.is_zero() {
        return Err(anyhow::anyhow!("EMAIL_TIMEOUT_SECS cannot be 0"));
    }

    if let Err(missing) = config.storage.service_account() {
        tracing::warn!(
            missing = %missing,
            "No fallback Google credential; uploads without a user token will fail"
        );
    }

    if config.storage.public_client_id.is_none() {
        tracing::warn!("PUBLIC_GOOGLE_CLIENT_ID not set; browser sign-in will not work");
    }

    if let Err(missing) = config.email.sender() {
        tracing::warn!(missing = %missing, "Email sender not configured");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned()).expect("config")
    }

    #[test]
    fn development_defaults_pass() {
        assert!(validate_config(&config_from(&[])).is_ok());
    }

    #[test]
    fn wildcard_cors_rejected_in_production() {
        let config = config_from(&[("ENVIRONMENT", "production")]);
        assert!(validate_config(&config).is_err());

        let config = config_from(&[
            ("ENVIRONMENT", "production"),
            ("CORS_ORIGINS", "https://upload.example.com"),
        ]);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_timeouts_rejected() {
        assert!(validate_config(&config_from(&[("STORAGE_TIMEOUT_SECS", "0")])).is_err());
        assert!(validate_config(&config_from(&[("EMAIL_TIMEOUT_SECS", "0")])).is_err());
    }

    #[test]
    fn zero_port_rejected() {
        assert!(validate_config(&config_from(&[("PORT", "0")])).is_err());
    }
}
