use super::*;

#[test]
fn test_set_replaces_in_place() {
    let mut row = Row::new().with("a", 1.0).with("b", "x");
    row.set("a", 2.0);
    assert_eq!(row.columns().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(row.get("a"), Some(&CellValue::Number(2.0)));
}

#[test]
fn test_project_fills_missing_with_null() {
    let row = Row::new().with("SiteID", "S1").with("Route Type", "LMC");
    let projected = row.project(&["Route Type", "Total RI Amount"]);
    assert_eq!(
        projected.columns().collect::<Vec<_>>(),
        vec!["Route Type", "Total RI Amount"]
    );
    assert_eq!(projected.value("Total RI Amount"), CellValue::Null);
}

#[test]
fn test_serialize_preserves_order() {
    let row = Row::new().with("z", 1.0).with("a", "two").with("m", CellValue::Null);
    let json = serde_json::to_string(&row).unwrap();
    assert_eq!(json, r#"{"z":1.0,"a":"two","m":null}"#);
}

#[test]
fn test_deserialize_preserves_document_order() {
    let row: Row = serde_json::from_str(r#"{"z": 1, "a": "two", "m": null}"#).unwrap();
    assert_eq!(row.columns().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    assert_eq!(row.value("z"), CellValue::Number(1.0));
}

#[test]
fn test_from_json_object() {
    let row = Row::from_json(&serde_json::json!({"RI Amount": 1200.5, "Ward": "K/E"})).unwrap();
    assert_eq!(row.value("RI Amount"), CellValue::Number(1200.5));
    assert_eq!(row.value("Ward"), CellValue::text("K/E"));
    assert!(Row::from_json(&serde_json::json!([1, 2])).is_none());
}
