use super::*;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use std::sync::{Arc, Mutex};

/// Multipart parts seen by the fake service: (endpoint, part name, file name, text).
type Seen = Arc<Mutex<Vec<(String, String, Option<String>, String)>>>;

async fn record(seen: &Seen, endpoint: &str, mut multipart: Multipart) {
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(String::from);
        let text = field.text().await.unwrap();
        seen.lock()
            .unwrap()
            .push((endpoint.to_string(), name, file_name, text));
    }
}

async fn parse_po(State(seen): State<Seen>, multipart: Multipart) -> Json<serde_json::Value> {
    record(&seen, "po", multipart).await;
    Json(json!({"PO No": "PO-1", "SiteID": "MUM-001", "PO Length (Mtr)": 150}))
}

async fn parse_application(
    State(seen): State<Seen>,
    multipart: Multipart,
) -> Json<serde_json::Value> {
    record(&seen, "application", multipart).await;
    Json(json!({"Application Number": "APP/1", "Ward": null}))
}

async fn parse_dn(
    State(seen): State<Seen>,
    multipart: Multipart,
) -> (StatusCode, Json<serde_json::Value>) {
    record(&seen, "dn", multipart).await;
    let authority = seen
        .lock()
        .unwrap()
        .iter()
        .find(|(e, n, _, _)| e == "dn" && n == "authority")
        .map(|(_, _, _, t)| t.clone())
        .unwrap_or_default();
    match authority.as_str() {
        "KDMC" => (
            StatusCode::OK,
            Json(json!({"error": "Unsupported DN layout"})),
        ),
        "NMMC" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "parser crashed"})),
        ),
        _ => (
            StatusCode::OK,
            Json(json!({"Demand Note Reference number": "DN-9", "Section Length": "12.5"})),
        ),
    }
}

async fn spawn_server() -> (String, Seen) {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/api/parse-po", post(parse_po))
        .route("/api/parse-application", post(parse_application))
        .route("/api/parse-dn", post(parse_dn))
        .with_state(seen.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/", addr), seen)
}

fn request(authority: Authority) -> ParseRequest {
    ParseRequest {
        po: UploadFile::new("po.xlsx", b"po-bytes".to_vec()),
        site_id: SiteId::try_new("MUM-001").unwrap(),
        application: UploadFile::new("app.pdf", b"app-bytes".to_vec()),
        dn: UploadFile::new("dn.pdf", b"dn-bytes".to_vec()),
        authority,
    }
}

#[test]
fn test_fields_from_json_keeps_order_and_types() {
    let body = json!({"b": 1.5, "a": "x", "c": null, "d": [1, 2]});
    let set = fields_from_json(&body, Source::Dn).unwrap();
    assert_eq!(set.source, Source::Dn);
    assert_eq!(set.fields.columns().collect::<Vec<_>>(), vec!["b", "a", "c", "d"]);
    assert_eq!(set.fields.value("b"), CellValue::Number(1.5));
    assert_eq!(set.fields.value("c"), CellValue::Null);
    assert_eq!(set.fields.value("d"), CellValue::text("[1,2]"));
}

#[test]
fn test_fields_from_json_error_key() {
    let err = fields_from_json(&json!({"error": "bad pdf"}), Source::Po).unwrap_err();
    assert!(matches!(err, ClientError::Service(ref m) if m == "bad pdf"));
    assert!(fields_from_json(&json!([1]), Source::Po).is_err());
}

#[tokio::test]
async fn test_parse_all_sends_expected_forms() {
    let (url, seen) = spawn_server().await;
    let client = HttpParseClient::new(&url);

    let (po, app, dn) = parse_all(&client, request(Authority::MidcType1))
        .await
        .unwrap();
    assert_eq!(po.source, Source::Po);
    assert_eq!(po.fields.value("PO Length (Mtr)"), CellValue::Number(150.0));
    assert_eq!(app.source, Source::Application);
    assert_eq!(app.fields.value("Ward"), CellValue::Null);
    assert_eq!(dn.number("Section Length"), Some(12.5));

    let seen = seen.lock().unwrap().clone();
    let part = |endpoint: &str, name: &str| {
        seen.iter()
            .find(|(e, n, _, _)| e == endpoint && n == name)
            .cloned()
            .unwrap()
    };
    assert_eq!(part("po", "po_file").2.as_deref(), Some("po.xlsx"));
    assert_eq!(part("po", "site_id").3, "MUM-001");
    assert_eq!(part("application", "dn_application_file").3, "app-bytes");
    assert_eq!(part("dn", "dn_file").2.as_deref(), Some("dn.pdf"));
    assert_eq!(part("dn", "authority").3, "MIDC Type 1");
}

#[tokio::test]
async fn test_parse_all_fails_fast_on_service_error() {
    let (url, _seen) = spawn_server().await;
    let client = HttpParseClient::new(&url);
    let err = parse_all(&client, request(Authority::Kdmc))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Service(_)));
}

#[tokio::test]
async fn test_parse_dn_status_error() {
    let (url, _seen) = spawn_server().await;
    let client = HttpParseClient::new(&url);
    let err = client
        .parse_dn(UploadFile::new("dn.pdf", Vec::new()), Authority::Nmmc)
        .await
        .unwrap_err();
    match err {
        ClientError::Status { status, body, url } => {
            assert_eq!(status, 500);
            assert!(body.contains("parser crashed"));
            assert!(url.ends_with("/api/parse-dn"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_upload_file_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("note.pdf");
    std::fs::write(&path, b"%PDF").unwrap();
    let file = UploadFile::from_path(&path).unwrap();
    assert_eq!(file.file_name, "note.pdf");
    assert_eq!(file.bytes, b"%PDF");

    let err = UploadFile::from_path(&dir.path().join("missing.pdf")).unwrap_err();
    assert!(matches!(err, ClientError::Io { .. }));
}
