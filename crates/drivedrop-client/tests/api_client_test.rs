//! ApiClient tests against an in-process fake upload endpoint.
//!
//! Run with: `cargo test -p drivedrop-client --test api_client_test`

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use drivedrop_client::{ApiClient, ClientError, SelectedFile, Submission, SubmitReply, Submitter};
use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug, Default)]
struct ReceivedPart {
    file_name: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

#[derive(Clone, Default)]
struct FakeServer {
    parts: Arc<Mutex<HashMap<String, ReceivedPart>>>,
    reply: Option<(StatusCode, serde_json::Value)>,
}

async fn upload(State(fake): State<FakeServer>, mut multipart: Multipart) -> impl IntoResponse {
    while let Some(field) = multipart.next_field().await.expect("multipart") {
        let name = field.name().unwrap_or_default().to_string();
        let part = ReceivedPart {
            file_name: field.file_name().map(str::to_string),
            content_type: field.content_type().map(str::to_string),
            data: field.bytes().await.expect("field bytes").to_vec(),
        };
        fake.parts.lock().expect("lock").insert(name, part);
    }
    let (status, body) = fake.reply.clone().unwrap_or((
        StatusCode::OK,
        serde_json::json!({ "success": true, "file_id": "1AbC" }),
    ));
    (status, Json(body))
}

async fn spawn_fake(fake: FakeServer) -> String {
    let app = Router::new()
        .route("/api/upload", post(upload))
        .with_state(fake);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve fake server");
    });
    format!("http://{}", addr)
}

fn report_file() -> (tempfile::TempDir, SelectedFile) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("report.pdf");
    let mut file = std::fs::File::create(&path).expect("create file");
    file.write_all(b"%PDF-1.4 body").expect("write file");
    (dir, SelectedFile::new(path).with_mime_type("application/pdf"))
}

#[tokio::test]
async fn submission_sends_file_email_and_token_parts() {
    let fake = FakeServer::default();
    let base_url = spawn_fake(fake.clone()).await;
    let client = ApiClient::new(format!("{}/", base_url)).expect("client");
    let (_dir, file) = report_file();

    let reply = client
        .submit(&Submission {
            file,
            email: "user@example.com".to_string(),
            access_token: "ya29.token".to_string(),
        })
        .await
        .expect("submit");

    match reply {
        SubmitReply::Accepted(body) => {
            assert!(body.success);
            assert_eq!(body.file_id.as_deref(), Some("1AbC"));
        }
        other => panic!("Expected Accepted, got {:?}", other),
    }

    let parts = fake.parts.lock().expect("lock");
    let file_part = &parts["file"];
    assert_eq!(file_part.file_name.as_deref(), Some("report.pdf"));
    assert_eq!(file_part.content_type.as_deref(), Some("application/pdf"));
    assert_eq!(file_part.data, b"%PDF-1.4 body");
    assert_eq!(parts["email"].data, b"user@example.com");
    assert_eq!(parts["accessToken"].data, b"ya29.token");
}

#[tokio::test]
async fn error_body_is_surfaced() {
    let fake = FakeServer {
        reply: Some((
            StatusCode::BAD_REQUEST,
            serde_json::json!({ "error": "Missing file or email", "code": "MISSING_INPUT" }),
        )),
        ..FakeServer::default()
    };
    let base_url = spawn_fake(fake).await;
    let client = ApiClient::new(base_url).expect("client");
    let (_dir, file) = report_file();

    let reply = client
        .submit(&Submission {
            file,
            email: "user@example.com".to_string(),
            access_token: "ya29.token".to_string(),
        })
        .await
        .expect("submit");

    assert_eq!(
        reply,
        SubmitReply::Rejected {
            status: 400,
            error: Some("Missing file or email".to_string()),
        }
    );
}

#[tokio::test]
async fn unreadable_file_fails_before_sending() {
    let fake = FakeServer::default();
    let base_url = spawn_fake(fake.clone()).await;
    let client = ApiClient::new(base_url).expect("client");

    let err = client
        .submit(&Submission {
            file: SelectedFile::new("/nonexistent/drivedrop/report.pdf"),
            email: "user@example.com".to_string(),
            access_token: "ya29.token".to_string(),
        })
        .await
        .expect_err("must fail");

    assert!(matches!(err, ClientError::File { .. }));
    assert!(fake.parts.lock().expect("lock").is_empty());
}
