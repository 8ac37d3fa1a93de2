//! End-to-end tests driving the router with in-memory gateways.

use std::collections::HashSet;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use shutterdrop_server::{AppState, Server, ServerConfig};
use shutterdrop_storage::{MemoryDrive, StaticIdentity, UserProfile};

const ROOT_FOLDER: &str = "root-folder";
const AUTH_CODE: &str = "test-auth-code";
const BOUNDARY: &str = "test-boundary";

fn test_config() -> ServerConfig {
    ServerConfig {
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        root_folder_id: ROOT_FOLDER.to_string(),
        redirect_url: "http://localhost:3001/api/auth/google/callback".to_string(),
        frontend_url: "http://localhost:3000".to_string(),
        addr: "127.0.0.1:0".to_string(),
    }
}

fn test_profile() -> UserProfile {
    UserProfile {
        id: "account-1".to_string(),
        email: Some("alex@example.com".to_string()),
        name: Some("Alex".to_string()),
        picture: None,
    }
}

fn build_app(drive: Arc<MemoryDrive>) -> (Router, AppState) {
    let identity = Arc::new(StaticIdentity::new(test_profile(), AUTH_CODE));
    let state = AppState::new(test_config(), identity, drive);
    let router = Server::new(state.clone()).into_router();
    (router, state)
}

async fn send(router: &Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.unwrap()
}

/// Run the OAuth callback so the credential holder is populated.
async fn authenticate(router: &Router) {
    let request = Request::get(format!("/api/auth/google/callback?code={}", AUTH_CODE))
        .body(Body::empty())
        .unwrap();
    let response = send(router, request).await;
    assert_eq!(response.status(), StatusCode::FOUND);
}

fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!("--{}\r\n", BOUNDARY));
        body.push_str(&format!(
            "Content-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            name, value
        ));
    }
    for (file_name, content) in files {
        body.push_str(&format!("--{}\r\n", BOUNDARY));
        body.push_str(&format!(
            "Content-Disposition: form-data; name=\"imageFiles\"; filename=\"{}\"\r\n",
            file_name
        ));
        body.push_str("Content-Type: image/jpeg\r\n\r\n");
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));
    body
}

fn upload_body(files: &[(&str, &str)]) -> String {
    multipart_body(
        &[
            ("event", "Wedding"),
            ("photographer", "Alex"),
            ("date", "2024-01-01"),
        ],
        files,
    )
}

fn upload_request(body: String) -> Request<Body> {
    Request::post("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn rename_request(file_id: &str, body: serde_json::Value) -> Request<Body> {
    Request::put(format!("/api/files/{}", file_id))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_begin_auth_redirects_to_provider() {
    let (router, _state) = build_app(Arc::new(MemoryDrive::new()));

    let request = Request::get("/api/auth/google").body(Body::empty()).unwrap();
    let response = send(&router, request).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://auth.example/authorize?client_id=memory"
    );
}

#[tokio::test]
async fn test_routes_live_under_api_prefix() {
    let (router, _state) = build_app(Arc::new(MemoryDrive::new()));

    let request = Request::get("/auth/google").body(Body::empty()).unwrap();
    let response = send(&router, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let (router, _state) = build_app(Arc::new(MemoryDrive::new()));

    let request = Request::get("/api/auth/google")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = send(&router, request).await;

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}

#[tokio::test]
async fn test_callback_installs_credentials_and_redirects() {
    let (router, state) = build_app(Arc::new(MemoryDrive::new()));

    let request = Request::get(format!("/api/auth/google/callback?code={}", AUTH_CODE))
        .body(Body::empty())
        .unwrap();
    let response = send(&router, request).await;

    assert_eq!(response.status(), StatusCode::FOUND);

    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("http://localhost:3000/?user="));

    let target = url::Url::parse(location).unwrap();
    let (_, user) = target
        .query_pairs()
        .find(|(key, _)| key == "user")
        .unwrap();
    let profile: serde_json::Value = serde_json::from_str(&user).unwrap();
    assert_eq!(profile["id"], "account-1");
    assert_eq!(profile["email"], "alex@example.com");

    assert!(state.credentials.is_authenticated().await);
}

#[tokio::test]
async fn test_callback_rejects_unknown_code() {
    let (router, state) = build_app(Arc::new(MemoryDrive::new()));

    let request = Request::get("/api/auth/google/callback?code=wrong")
        .body(Body::empty())
        .unwrap();
    let response = send(&router, request).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Authentication failed");
    assert!(!state.credentials.is_authenticated().await);
}

#[tokio::test]
async fn test_callback_requires_code() {
    let (router, state) = build_app(Arc::new(MemoryDrive::new()));

    let request = Request::get("/api/auth/google/callback")
        .body(Body::empty())
        .unwrap();
    let response = send(&router, request).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Authentication failed");
    assert!(!state.credentials.is_authenticated().await);
}

#[tokio::test]
async fn test_upload_requires_authentication() {
    let drive = Arc::new(MemoryDrive::new());
    let (router, _state) = build_app(drive.clone());

    let response = send(&router, upload_request(upload_body(&[("a.jpg", "x")]))).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["message"],
        "Unauthorized: Please log in first."
    );
    assert!(drive.operations().is_empty());
}

#[tokio::test]
async fn test_upload_unauthenticated_non_multipart_is_401() {
    let drive = Arc::new(MemoryDrive::new());
    let (router, _state) = build_app(drive.clone());

    let request = Request::post("/api/upload")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = send(&router, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["message"],
        "Unauthorized: Please log in first."
    );
    assert!(drive.operations().is_empty());
}

#[tokio::test]
async fn test_upload_non_multipart_counts_as_no_files() {
    let drive = Arc::new(MemoryDrive::new());
    let (router, _state) = build_app(drive.clone());
    authenticate(&router).await;

    let request = Request::post("/api/upload")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = send(&router, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "No files uploaded.");
    assert!(drive.operations().is_empty());
}

#[tokio::test]
async fn test_upload_rejects_empty_file_list() {
    let drive = Arc::new(MemoryDrive::new());
    let (router, _state) = build_app(drive.clone());
    authenticate(&router).await;

    let response = send(&router, upload_request(upload_body(&[]))).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "No files uploaded.");
    assert!(drive.operations().is_empty());
}

#[tokio::test]
async fn test_upload_creates_missing_event_folder() {
    let drive = Arc::new(MemoryDrive::new());
    let (router, _state) = build_app(drive.clone());
    authenticate(&router).await;

    let response = send(&router, upload_request(upload_body(&[("a.jpg", "jpeg bytes")]))).await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["message"], "All files uploaded successfully!");

    let files = json["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["name"], "2024-01-01_Alex_a.jpg");
    assert!(files[0]["id"].as_str().is_some());
    assert!(files[0]["webViewLink"].as_str().is_some());
    assert!(files[0]["thumbnailLink"].as_str().is_some());

    assert_eq!(
        drive.operations(),
        [
            "find_folder:Wedding",
            "create_folder:Wedding",
            "create_file:2024-01-01_Alex_a.jpg",
        ]
    );
    assert_eq!(drive.folder_count(), 1);
    assert_eq!(drive.file_count(), 1);
}

#[tokio::test]
async fn test_upload_reuses_existing_event_folder() {
    let drive = Arc::new(MemoryDrive::new());
    drive.seed_folder("Wedding", ROOT_FOLDER);

    let (router, _state) = build_app(drive.clone());
    authenticate(&router).await;

    let response = send(&router, upload_request(upload_body(&[("a.jpg", "x")]))).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(drive.folder_count(), 1);
    assert_eq!(
        drive.operations(),
        ["find_folder:Wedding", "create_file:2024-01-01_Alex_a.jpg"]
    );
}

#[tokio::test]
async fn test_upload_preserves_request_order() {
    let drive = Arc::new(MemoryDrive::new());
    let (router, _state) = build_app(drive.clone());
    authenticate(&router).await;

    let body = upload_body(&[("a.jpg", "1"), ("b.jpg", "2"), ("c.jpg", "3")]);
    let response = send(&router, upload_request(body)).await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let files = json["files"].as_array().unwrap();
    let names: Vec<&str> = files.iter().map(|f| f["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        [
            "2024-01-01_Alex_a.jpg",
            "2024-01-01_Alex_b.jpg",
            "2024-01-01_Alex_c.jpg",
        ]
    );

    let ids: HashSet<&str> = files.iter().map(|f| f["id"].as_str().unwrap()).collect();
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn test_upload_failure_collapses_to_500() {
    let drive = Arc::new(MemoryDrive::new());
    drive.set_fail_uploads(true);

    let (router, _state) = build_app(drive.clone());
    authenticate(&router).await;

    let body = upload_body(&[("a.jpg", "1"), ("b.jpg", "2")]);
    let response = send(&router, upload_request(body)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["message"], "Failed to upload files.");

    // Every file-creation call was still issued.
    let creates = drive
        .operations()
        .iter()
        .filter(|op| op.starts_with("create_file:"))
        .count();
    assert_eq!(creates, 2);
}

#[tokio::test]
async fn test_upload_accepts_batch_at_limit() {
    let drive = Arc::new(MemoryDrive::new());
    let (router, _state) = build_app(drive.clone());
    authenticate(&router).await;

    let files: Vec<(String, String)> = (0..50)
        .map(|i| (format!("f{:02}.jpg", i), "x".to_string()))
        .collect();
    let refs: Vec<(&str, &str)> = files
        .iter()
        .map(|(name, content)| (name.as_str(), content.as_str()))
        .collect();

    let response = send(&router, upload_request(upload_body(&refs))).await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["message"], "All files uploaded successfully!");
    assert_eq!(json["files"].as_array().unwrap().len(), 50);

    let creates = drive
        .operations()
        .iter()
        .filter(|op| op.starts_with("create_file:"))
        .count();
    assert_eq!(creates, 50);
    assert_eq!(drive.file_count(), 50);
}

#[tokio::test]
async fn test_upload_rejects_too_many_files() {
    let drive = Arc::new(MemoryDrive::new());
    let (router, _state) = build_app(drive.clone());
    authenticate(&router).await;

    let files: Vec<(String, String)> = (0..51)
        .map(|i| (format!("f{:02}.jpg", i), "x".to_string()))
        .collect();
    let refs: Vec<(&str, &str)> = files
        .iter()
        .map(|(name, content)| (name.as_str(), content.as_str()))
        .collect();

    let response = send(&router, upload_request(upload_body(&refs))).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Too many files: limit is 50"
    );
}

#[tokio::test]
async fn test_upload_rejects_unexpected_file_field() {
    let drive = Arc::new(MemoryDrive::new());
    let (router, _state) = build_app(drive.clone());
    authenticate(&router).await;

    let mut body = String::new();
    body.push_str(&format!("--{}\r\n", BOUNDARY));
    body.push_str(
        "Content-Disposition: form-data; name=\"attachments\"; filename=\"a.jpg\"\r\n",
    );
    body.push_str("Content-Type: image/jpeg\r\n\r\nx\r\n");
    body.push_str(&format!("--{}--\r\n", BOUNDARY));

    let response = send(&router, upload_request(body)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Unexpected file field: attachments"
    );
}

#[tokio::test]
async fn test_upload_requires_metadata_fields() {
    let drive = Arc::new(MemoryDrive::new());
    let (router, _state) = build_app(drive.clone());
    authenticate(&router).await;

    let body = multipart_body(
        &[("event", "Wedding"), ("photographer", "Alex")],
        &[("a.jpg", "x")],
    );
    let response = send(&router, upload_request(body)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Missing field: date");
}

#[tokio::test]
async fn test_delete_requires_authentication() {
    let drive = Arc::new(MemoryDrive::new());
    let (router, _state) = build_app(drive.clone());

    let request = Request::delete("/api/files/some-file")
        .body(Body::empty())
        .unwrap();
    let response = send(&router, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Unauthorized");
    assert!(drive.operations().is_empty());
}

#[tokio::test]
async fn test_delete_removes_file() {
    let drive = Arc::new(MemoryDrive::new());
    let folder_id = drive.seed_folder("Wedding", ROOT_FOLDER);
    let file_id = drive.seed_file("2024-01-01_Alex_a.jpg", &folder_id);

    let (router, _state) = build_app(drive.clone());
    authenticate(&router).await;

    let request = Request::delete(format!("/api/files/{}", file_id))
        .body(Body::empty())
        .unwrap();
    let response = send(&router, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "File deleted successfully");
    assert!(drive.file(&file_id).is_none());
}

#[tokio::test]
async fn test_delete_missing_file_is_500() {
    let drive = Arc::new(MemoryDrive::new());
    let (router, _state) = build_app(drive.clone());
    authenticate(&router).await;

    let request = Request::delete("/api/files/nope")
        .body(Body::empty())
        .unwrap();
    let response = send(&router, request).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["message"], "Failed to delete file");
}

#[tokio::test]
async fn test_rename_requires_authentication() {
    let drive = Arc::new(MemoryDrive::new());
    let (router, _state) = build_app(drive.clone());

    let body = serde_json::json!({
        "event": "Wedding",
        "photographer": "Alex",
        "date": "2024-01-01",
        "originalName": "a.jpg",
    });
    let response = send(&router, rename_request("some-file", body)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Unauthorized");
    assert!(drive.operations().is_empty());
}

#[tokio::test]
async fn test_rename_unauthenticated_without_json_is_401() {
    let drive = Arc::new(MemoryDrive::new());
    let (router, _state) = build_app(drive.clone());

    let request = Request::put("/api/files/some-file")
        .body(Body::empty())
        .unwrap();
    let response = send(&router, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Unauthorized");
    assert!(drive.operations().is_empty());
}

#[tokio::test]
async fn test_rename_without_body_reports_missing_field() {
    let drive = Arc::new(MemoryDrive::new());
    let folder_id = drive.seed_folder("Wedding", ROOT_FOLDER);
    let file_id = drive.seed_file("old.jpg", &folder_id);

    let (router, _state) = build_app(drive.clone());
    authenticate(&router).await;

    let request = Request::put(format!("/api/files/{}", file_id))
        .body(Body::empty())
        .unwrap();
    let response = send(&router, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Missing field: photographer"
    );
    assert_eq!(drive.file(&file_id).unwrap().name, "old.jpg");
}

#[tokio::test]
async fn test_rename_updates_display_name() {
    let drive = Arc::new(MemoryDrive::new());
    let folder_id = drive.seed_folder("Wedding", ROOT_FOLDER);
    let file_id = drive.seed_file("old.jpg", &folder_id);

    let (router, _state) = build_app(drive.clone());
    authenticate(&router).await;

    let body = serde_json::json!({
        "event": "Gala",
        "photographer": "Alex",
        "date": "2024-01-01",
        "originalName": "a.jpg",
    });
    let response = send(&router, rename_request(&file_id, body)).await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["message"], "File updated successfully");
    assert_eq!(json["newName"], "2024-01-01_Alex_a.jpg");

    // Renaming never moves the file, even when the event changed.
    let entry = drive.file(&file_id).unwrap();
    assert_eq!(entry.name, "2024-01-01_Alex_a.jpg");
    assert_eq!(entry.folder_id, folder_id);
}

#[tokio::test]
async fn test_rename_missing_file_is_500() {
    let drive = Arc::new(MemoryDrive::new());
    let (router, _state) = build_app(drive.clone());
    authenticate(&router).await;

    let body = serde_json::json!({
        "photographer": "Alex",
        "date": "2024-01-01",
        "originalName": "a.jpg",
    });
    let response = send(&router, rename_request("nope", body)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["message"], "Failed to update file");
}

#[tokio::test]
async fn test_rename_requires_original_name() {
    let drive = Arc::new(MemoryDrive::new());
    let folder_id = drive.seed_folder("Wedding", ROOT_FOLDER);
    let file_id = drive.seed_file("old.jpg", &folder_id);

    let (router, _state) = build_app(drive.clone());
    authenticate(&router).await;

    let body = serde_json::json!({
        "photographer": "Alex",
        "date": "2024-01-01",
    });
    let response = send(&router, rename_request(&file_id, body)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Missing field: originalName"
    );
    assert_eq!(drive.file(&file_id).unwrap().name, "old.jpg");
}
