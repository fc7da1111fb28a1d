use super::*;
use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::routing::any;
use axum::{Json, Router};
use ce_core::CellValue;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    table: String,
    query: String,
    prefer: Option<String>,
    auth: Option<String>,
    body: String,
}

type Log = Arc<Mutex<Vec<Recorded>>>;

async fn handler(
    State(log): State<Log>,
    method: Method,
    Path(table): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<serde_json::Value>) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };
    log.lock().unwrap().push(Recorded {
        method: method.clone(),
        table: table.clone(),
        query: query.unwrap_or_default(),
        prefer: header("prefer"),
        auth: header("authorization"),
        body,
    });

    if table == "missing" {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"message": "relation does not exist"})),
        );
    }
    if table == "broken" {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"message": "boom"})),
        );
    }
    match method {
        Method::POST => (StatusCode::CREATED, Json(serde_json::json!([]))),
        Method::DELETE => (
            StatusCode::OK,
            Json(serde_json::json!([{"SiteID": "S8"}, {"SiteID": "S9"}])),
        ),
        _ => (
            StatusCode::OK,
            Json(serde_json::json!([
                {"SiteID": "S1", "RI Cost per Meter": 12.5, "Route Type": "LMC"}
            ])),
        ),
    }
}

async fn spawn_server() -> (String, Log) {
    let log: Log = Arc::default();
    let app = Router::new()
        .route("/{table}", any(handler))
        .with_state(log.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/", addr), log)
}

fn decoded(query: &str) -> String {
    // enough percent-decoding for the assertions below
    query
        .replace("%22", "\"")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%2C", ",")
        .replace("%20", " ")
        .replace('+', " ")
}

#[tokio::test]
async fn test_upsert_posts_merge_duplicates() {
    let (url, log) = spawn_server().await;
    let store = RestBackend::new(&url, Some("secret".to_string()));
    let schema = TableSchema::budget("budget_lmc");
    let rows = vec![Row::new().with("SiteID", "S1").with("Total RI Amount", "1,000")];

    assert_eq!(store.upsert(&schema, &rows).await.unwrap(), 1);

    let recorded = log.lock().unwrap()[0].clone();
    assert_eq!(recorded.method, Method::POST);
    assert_eq!(recorded.table, "budget_lmc");
    assert_eq!(recorded.query, "on_conflict=SiteID");
    assert!(recorded
        .prefer
        .unwrap()
        .contains("resolution=merge-duplicates"));
    assert_eq!(recorded.auth.as_deref(), Some("Bearer secret"));

    let body: serde_json::Value = serde_json::from_str(&recorded.body).unwrap();
    let first = &body.as_array().unwrap()[0];
    assert_eq!(first["SiteID"], "S1");
    assert_eq!(first["Total RI Amount"], 1000.0);
    // every canonical column is sent
    assert_eq!(first.as_object().unwrap().len(), 10);
}

#[tokio::test]
async fn test_delete_absent_uses_not_in_filter() {
    let (url, log) = spawn_server().await;
    let store = RestBackend::new(&url, None);
    let schema = TableSchema::budget("budget_lmc");

    let deleted = store
        .delete_absent(&schema, &["S1".to_string(), "S,2".to_string()])
        .await
        .unwrap();
    assert_eq!(deleted, 2);

    let recorded = log.lock().unwrap()[0].clone();
    assert_eq!(recorded.method, Method::DELETE);
    assert_eq!(
        decoded(&recorded.query),
        r#"SiteID=not.in.("S1","S,2")"#
    );
    assert!(recorded.auth.is_none());
}

#[tokio::test]
async fn test_delete_absent_empty_keep_sends_nothing() {
    let (url, log) = spawn_server().await;
    let store = RestBackend::new(&url, None);
    let schema = TableSchema::budget("budget_lmc");
    assert_eq!(store.delete_absent(&schema, &[]).await.unwrap(), 0);
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_query_one_projects_requested_columns() {
    let (url, log) = spawn_server().await;
    let store = RestBackend::new(&url, None);
    let schema = TableSchema::budget("budget_lmc");
    let columns = vec!["RI Cost per Meter".to_string(), "Material Cost".to_string()];

    let row = store.query_one(&schema, "S1", &columns).await.unwrap().unwrap();
    assert_eq!(
        row.columns().collect::<Vec<_>>(),
        vec!["RI Cost per Meter", "Material Cost"]
    );
    assert_eq!(row.value("RI Cost per Meter"), CellValue::Number(12.5));
    assert_eq!(row.value("Material Cost"), CellValue::Null);

    let query = decoded(&log.lock().unwrap()[0].query);
    assert!(query.contains(r#"select="RI Cost per Meter","Material Cost""#));
    assert!(query.contains("SiteID=eq.S1"));
    assert!(query.contains("limit=1"));
}

#[tokio::test]
async fn test_missing_table_maps_to_table_not_found() {
    let (url, _log) = spawn_server().await;
    let store = RestBackend::new(&url, None);
    let err = store
        .ensure_table(&TableSchema::budget("missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::TableNotFound(_)));
}

#[tokio::test]
async fn test_server_error_surfaces_status_and_body() {
    let (url, _log) = spawn_server().await;
    let store = RestBackend::new(&url, None);
    let err = store
        .count(&TableSchema::budget("broken"))
        .await
        .unwrap_err();
    match err {
        DbError::RequestFailed { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("boom"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_select_all_and_count() {
    let (url, _log) = spawn_server().await;
    let store = RestBackend::new(&url, None);
    let schema = TableSchema::budget("budget_lmc");
    let rows = store.select_all(&schema).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].len(), 10);
    assert_eq!(store.count(&schema).await.unwrap(), 1);
    assert_eq!(store.store_type(), "rest");
}
