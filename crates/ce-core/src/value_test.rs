use super::*;

#[test]
fn test_round2() {
    assert_eq!(round2(12.3456), 12.35);
    assert_eq!(round2(-7.126), -7.13);
    assert_eq!(round2(100.0), 100.0);
}

#[test]
fn test_parse_number_amount_formats() {
    assert_eq!(parse_number("1,23,456.50"), Some(123456.5));
    assert_eq!(parse_number("  ₹ 2,000 "), Some(2000.0));
    assert_eq!(parse_number("Rs. 750"), Some(750.0));
    assert_eq!(parse_number("Rs 10"), Some(10.0));
    assert_eq!(parse_number("42"), Some(42.0));
}

#[test]
fn test_parse_number_rejects_garbage() {
    assert_eq!(parse_number(""), None);
    assert_eq!(parse_number("   "), None);
    assert_eq!(parse_number("N/A"), None);
    assert_eq!(parse_number("NaN"), None);
    assert_eq!(parse_number("inf"), None);
}

#[test]
fn test_per_meter() {
    assert_eq!(per_meter(1000.0, 10.0), Some(100.0));
    assert_eq!(per_meter(100.0, 3.0), Some(33.33));
}

#[test]
fn test_per_meter_never_divides_by_zero() {
    assert_eq!(per_meter(1000.0, 0.0), None);
    assert_eq!(per_meter(1000.0, -5.0), None);
    assert_eq!(per_meter(1000.0, f64::NAN), None);
    assert_eq!(per_meter(f64::NAN, 10.0), None);
}

#[test]
fn test_excel_serial_to_date() {
    assert_eq!(
        excel_serial_to_date(45292.0),
        NaiveDate::from_ymd_opt(2024, 1, 1)
    );
    // time-of-day fraction is dropped
    assert_eq!(
        excel_serial_to_date(45292.75),
        NaiveDate::from_ymd_opt(2024, 1, 1)
    );
    assert_eq!(excel_serial_to_date(0.0), None);
    assert_eq!(excel_serial_to_date(f64::NAN), None);
}

#[test]
fn test_parse_date_formats() {
    let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
    for raw in [
        "2024-03-05",
        "05/03/2024",
        "05-03-2024",
        "05.03.2024",
        "05-Mar-2024",
        "05 Mar 2024",
        "05 March 2024",
        "2024-03-05T10:30:00",
    ] {
        assert_eq!(parse_date(raw), expected, "format: {}", raw);
    }
    assert_eq!(parse_date("next tuesday"), None);
}

#[test]
fn test_cell_value_json_shape() {
    let values = vec![
        CellValue::Null,
        CellValue::Bool(true),
        CellValue::Number(12.5),
        CellValue::text("MBMC"),
    ];
    let json = serde_json::to_string(&values).unwrap();
    assert_eq!(json, r#"[null,true,12.5,"MBMC"]"#);

    let back: Vec<CellValue> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, values);
}

#[test]
fn test_cell_value_integer_json_is_number() {
    let v: CellValue = serde_json::from_str("17").unwrap();
    assert_eq!(v, CellValue::Number(17.0));
}

#[test]
fn test_as_f64_and_blank() {
    assert_eq!(CellValue::text(" 1,200 ").as_f64(), Some(1200.0));
    assert_eq!(CellValue::Number(3.0).as_f64(), Some(3.0));
    assert_eq!(CellValue::Bool(true).as_f64(), None);
    assert!(CellValue::text("   ").is_blank());
    assert!(CellValue::Null.is_blank());
    assert!(!CellValue::Number(0.0).is_blank());
    assert_eq!(CellValue::text("  x ").as_text().as_deref(), Some("x"));
    assert_eq!(CellValue::Null.as_text(), None);
}

#[test]
fn test_from_json_nested_kept_as_text() {
    let v = CellValue::from_json(&serde_json::json!({"a": 1}));
    assert_eq!(v, CellValue::text(r#"{"a":1}"#));
    assert_eq!(
        CellValue::from_json(&serde_json::json!(2.5)),
        CellValue::Number(2.5)
    );
}
