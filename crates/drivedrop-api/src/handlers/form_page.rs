//! Browser form page and its static assets.

use crate::state::AppState;
use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
};
use std::sync::Arc;

const INDEX_TEMPLATE: &str = include_str!("../../assets/index.html");
const APP_JS: &str = include_str!("../../assets/app.js");
const APP_CSS: &str = include_str!("../../assets/app.css");

const CLIENT_ID_PLACEHOLDER: &str = "{{GOOGLE_CLIENT_ID}}";

/// Fill the page template. Only the public OAuth client id is ever injected.
pub fn render_index(public_client_id: Option<&str>) -> String {
    INDEX_TEMPLATE.replace(
        CLIENT_ID_PLACEHOLDER,
        &escape_attribute(public_client_id.unwrap_or_default()),
    )
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }
    escaped
}

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.index_html.clone())
}

pub async fn app_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        APP_JS,
    )
}

pub async fn app_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], APP_CSS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_id_is_injected() {
        let html = render_index(Some("123.apps.googleusercontent.com"));
        assert!(html.contains(r#"content="123.apps.googleusercontent.com""#));
        assert!(!html.contains(CLIENT_ID_PLACEHOLDER));
    }

    #[test]
    fn client_id_is_escaped() {
        let html = render_index(Some(r#""><script>alert(1)</script>"#));
        assert!(!html.contains("<script>alert(1)"));
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
    }

    #[test]
    fn missing_client_id_renders_empty() {
        let html = render_index(None);
        assert!(html.contains(r#"<meta name="google-client-id" content="">"#));
    }
}
