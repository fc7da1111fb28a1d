use super::*;
use axum::extract::Multipart;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response as AxumResponse};
use axum::routing::post;
use axum::{Json, Router};
use ce_core::CellValue;
use serde_json::{json, Map, Value};

/// Text fields of a multipart request; file parts are recorded as `file:<name>`.
async fn fields(mut multipart: Multipart) -> Map<String, Value> {
    let mut out = Map::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name() {
            Some(file_name) => {
                out.insert(name, json!(format!("file:{}", file_name)));
            }
            None => {
                out.insert(name, json!(field.text().await.unwrap()));
            }
        }
    }
    out
}

async fn preview(multipart: Multipart) -> AxumResponse {
    let form = fields(multipart).await;
    if form["authority"] != "mcgm" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Preview not implemented for this authority"})),
        )
            .into_response();
    }
    let Some(manual) = form.get("manualFields").and_then(|v| v.as_str()) else {
        return Json(json!({"error": "manualFields missing"})).into_response();
    };
    let manual: Value = serde_json::from_str(manual).unwrap();
    Json(json!({"rows": [{
        "Demand Note Reference number": "DN-5",
        "LM/BB/FTTH": manual["LM/BB/FTTH"],
        "Upload": form["file"],
    }]}))
    .into_response()
}

async fn process_non_refundable(multipart: Multipart) -> AxumResponse {
    let form = fields(multipart).await;
    let manual: Value = serde_json::from_str(form["manual_fields"].as_str().unwrap()).unwrap();
    let body = format!("xlsx:{}:{}", form["authority"].as_str().unwrap(), manual["GO RATE"]);
    (
        [(
            header::CONTENT_DISPOSITION,
            "attachment; filename*=utf-8''DN-5_Non%20Refundable%20Output.xlsx".to_string(),
        )],
        body,
    )
        .into_response()
}

async fn process_sd(multipart: Multipart) -> AxumResponse {
    let form = fields(multipart).await;
    assert!(form.contains_key("sd_manual_fields"));
    assert!(!form.contains_key("manual_fields"));
    "sd-bytes".into_response()
}

async fn process_all(multipart: Multipart) -> AxumResponse {
    let form = fields(multipart).await;
    let keys: Vec<&str> = form.keys().map(String::as_str).collect();
    (
        [(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"outputs.zip\"".to_string(),
        )],
        keys.join(","),
    )
        .into_response()
}

async fn spawn_server() -> String {
    let app = Router::new()
        .route("/preview/non_refundable", post(preview))
        .route("/preview/sd", post(preview))
        .route("/process/non_refundable", post(process_non_refundable))
        .route("/process/sd", post(process_sd))
        .route("/process", post(process_all));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn dn_upload() -> UploadFile {
    UploadFile::new("dn.pdf", b"%PDF".to_vec())
}

#[test]
fn test_filename_from_disposition() {
    assert_eq!(
        filename_from_disposition(
            Some("attachment; filename*=utf-8''DN%2F7_SD%20Output.xlsx"),
            "output_sd.xlsx"
        ),
        "DN/7_SD Output.xlsx"
    );
    assert_eq!(
        filename_from_disposition(
            Some("attachment; filename=\"plain.xlsx\"; filename*=UTF-8''enc%C3%A9.xlsx"),
            "x"
        ),
        "encé.xlsx"
    );
    assert_eq!(
        filename_from_disposition(Some("attachment; filename=bare.xlsx"), "x"),
        "bare.xlsx"
    );
    assert_eq!(filename_from_disposition(Some("attachment"), "outputs.zip"), "outputs.zip");
    assert_eq!(filename_from_disposition(None, "outputs.zip"), "outputs.zip");
}

#[tokio::test]
async fn test_preview_sends_camel_case_manual_fields() {
    let client = HttpParseClient::new(&spawn_server().await);
    let manual = Row::new().with("LM/BB/FTTH", "Airtel");
    let rows = client
        .preview_output(OutputKind::NonRefundable, Authority::Mcgm, dn_upload(), &manual)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value("Demand Note Reference number"), CellValue::text("DN-5"));
    assert_eq!(rows[0].value("LM/BB/FTTH"), CellValue::text("Airtel"));
    assert_eq!(rows[0].value("Upload"), CellValue::text("file:dn.pdf"));
}

#[tokio::test]
async fn test_preview_unsupported_authority_is_status_error() {
    let client = HttpParseClient::new(&spawn_server().await);
    let err = client
        .preview_output(OutputKind::Sd, Authority::Kdmc, dn_upload(), &Row::new())
        .await
        .unwrap_err();
    match err {
        ClientError::Status { status, body, .. } => {
            assert_eq!(status, 400);
            assert!(body.contains("Preview not implemented"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_process_output_uses_served_file_name() {
    let client = HttpParseClient::new(&spawn_server().await);
    let manual = Row::new().with("GO RATE", "Yes");
    let out = client
        .process_output(OutputKind::NonRefundable, Authority::Mcgm, dn_upload(), &manual)
        .await
        .unwrap();
    assert_eq!(out.file_name, "DN-5_Non Refundable Output.xlsx");
    assert_eq!(out.bytes, b"xlsx:mcgm:\"Yes\"".to_vec());
}

#[tokio::test]
async fn test_process_sd_falls_back_to_default_name() {
    let client = HttpParseClient::new(&spawn_server().await);
    let manual = Row::new().with("Unique route id", "R-1");
    let out = client
        .process_output(OutputKind::Sd, Authority::Mcgm, dn_upload(), &manual)
        .await
        .unwrap();
    assert_eq!(out.file_name, "output_sd.xlsx");
    assert_eq!(out.bytes, b"sd-bytes".to_vec());
}

#[tokio::test]
async fn test_process_all_sends_both_manual_sets() {
    let client = HttpParseClient::new(&spawn_server().await);
    let out = client
        .process_all(Authority::Mcgm, dn_upload(), &Row::new(), &Row::new())
        .await
        .unwrap();
    assert_eq!(out.file_name, ALL_OUTPUTS_FILE_NAME);
    assert_eq!(
        String::from_utf8(out.bytes).unwrap(),
        "authority,manual_fields,sd_manual_fields,file"
    );
}
