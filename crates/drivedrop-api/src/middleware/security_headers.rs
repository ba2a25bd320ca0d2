use axum::http::HeaderValue;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Origin serving the Google Identity Services script and consent popup
const GOOGLE_ACCOUNTS_ORIGIN: &str = "https://accounts.google.com";

/// Security headers configuration
#[derive(Clone)]
pub struct SecurityHeadersConfig {
    pub is_production: bool,
    csp: HeaderValue,
}

impl SecurityHeadersConfig {
    pub fn new(is_production: bool) -> Self {
        Self {
            is_production,
            csp: Self::build_csp(),
        }
    }

    /// Content-Security-Policy for the form page. The page talks only to this
    /// server; the sign-in script and popup come from Google.
    fn build_csp() -> HeaderValue {
        let csp_parts = [
            "default-src 'self'".to_string(),
            format!("script-src 'self' {}/gsi/client", GOOGLE_ACCOUNTS_ORIGIN),
            format!("style-src 'self' {}/gsi/style", GOOGLE_ACCOUNTS_ORIGIN),
            format!("frame-src {}/gsi/", GOOGLE_ACCOUNTS_ORIGIN),
            format!("connect-src 'self' {}/gsi/", GOOGLE_ACCOUNTS_ORIGIN),
            "img-src 'self' data:".to_string(),
            "frame-ancestors 'none'".to_string(),
        ];
        HeaderValue::from_str(&csp_parts.join("; "))
            .unwrap_or_else(|_| HeaderValue::from_static("default-src 'self'"))
    }
}

/// Security headers middleware
/// Adds security headers to all HTTP responses
pub async fn security_headers_middleware(
    State(config): State<Arc<SecurityHeadersConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();

    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );

    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));

    // The token popup needs to post back to its opener
    headers.insert(
        "Cross-Origin-Opener-Policy",
        HeaderValue::from_static("same-origin-allow-popups"),
    );

    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    // HSTS only in production (served behind HTTPS)
    if config.is_production {
        headers.insert(
            "Strict-Transport-Security",
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }

    headers.insert("Content-Security-Policy", config.csp.clone());

    headers.insert(
        "Permissions-Policy",
        HeaderValue::from_static("geolocation=(), microphone=(), camera=()"),
    );

    headers.insert(
        "Cache-Control",
        HeaderValue::from_static("no-store, private"),
    );

    response
}
