use super::*;
use crate::test_fixtures::{texts, xlsx, Cell::*};
use ce_core::CellValue;

fn budget_workbook() -> Vec<u8> {
    xlsx(&[(
        "LMC",
        vec![
            texts(&["LMC master - Mumbai"]),
            vec![],
            texts(&[
                "SiteID",
                "CE-Length-Mtr",
                "RI Cost per Meter",
                "Material  Cost Per Meter",
                "Total RI Amount",
                "Route Type",
                "Remarks",
            ]),
            vec![S("MUM-001"), N(120.0), N(1250.456), N(80.0), N(150054.72), S("LMC"), S("ok")],
            vec![],
            vec![S("MUM-002"), S("95"), N(1100.0), E, S("1,04,500"), S(" "), E],
        ],
    )])
}

#[test]
fn test_budget_rows_have_exactly_canonical_keys() {
    let rows = ingest(budget_workbook(), &IngestSpec::budget("budget_lmc")).unwrap();
    assert_eq!(rows.len(), 2);
    let expected = TableSchema::budget("budget_lmc");
    for row in &rows {
        assert_eq!(row.columns().collect::<Vec<_>>(), expected.column_names());
    }
}

#[test]
fn test_budget_values_rounded_and_normalized() {
    let rows = ingest(budget_workbook(), &IngestSpec::budget("budget_lmc")).unwrap();
    let first = &rows[0];
    assert_eq!(first.value("SiteID"), CellValue::text("MUM-001"));
    assert_eq!(first.value("RI Cost per Meter"), CellValue::Number(1250.46));
    assert_eq!(first.value("Material  Cost Per Meter"), CellValue::Number(80.0));

    let second = &rows[1];
    assert_eq!(second.value("CE-Length-Mtr"), CellValue::Number(95.0));
    assert_eq!(second.value("Total RI Amount"), CellValue::Number(104500.0));
    assert_eq!(second.value("Route Type"), CellValue::Null);
}

#[test]
fn test_unmapped_header_yields_null_not_dropped_row() {
    let rows = ingest(budget_workbook(), &IngestSpec::budget("budget_lmc")).unwrap();
    // "Build Cost Per Meter" has no header in the workbook
    assert!(rows
        .iter()
        .all(|r| r.value("Build Cost Per Meter") == CellValue::Null));
    assert_eq!(rows.len(), 2);
}

#[test]
fn test_non_numeric_text_in_numeric_column_is_null() {
    let bytes = xlsx(&[(
        "LMC",
        vec![
            texts(&["SiteID", "CE-Length-Mtr", "Total RI Amount"]),
            texts(&["MUM-001", "N/A", "pending"]),
        ],
    )]);
    let rows = ingest(bytes, &IngestSpec::budget("budget_lmc")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value("SiteID"), CellValue::text("MUM-001"));
    assert_eq!(rows[0].value("CE-Length-Mtr"), CellValue::Null);
    assert_eq!(rows[0].value("Total RI Amount"), CellValue::Null);
}

#[test]
fn test_row_with_only_unmapped_content_is_kept() {
    let bytes = xlsx(&[(
        "LMC",
        vec![
            texts(&["SiteID", "CE-Length-Mtr", "Remarks"]),
            vec![S("MUM-001"), N(10.0), E],
            vec![E, E, S("carried over from phase 1")],
            vec![],
        ],
    )]);
    let rows = ingest(bytes, &IngestSpec::budget("budget_lmc")).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows[1].iter().all(|(_, v)| *v == CellValue::Null));
    assert_eq!(rows[1].len(), 10);
}

#[test]
fn test_header_not_found() {
    let bytes = xlsx(&[("Sheet1", vec![texts(&["Site", "Length"]), texts(&["a", "b"])])]);
    let err = ingest(bytes, &IngestSpec::budget("budget_lmc")).unwrap_err();
    assert!(matches!(err, IngestError::HeaderNotFound { .. }));
    assert!(err.to_string().contains("[I003]"));
}

#[test]
fn test_header_beyond_scan_window_not_found() {
    let mut rows: Vec<Vec<_>> = (0..10).map(|_| texts(&["notes"])).collect();
    rows.push(texts(&["SiteID"]));
    rows.push(texts(&["S1"]));
    let err = ingest(xlsx(&[("Sheet1", rows)]), &IngestSpec::budget("b")).unwrap_err();
    assert!(matches!(err, IngestError::HeaderNotFound { scan_limit: 10, .. }));
}

#[test]
fn test_dn_master_aliases_and_dates() {
    let bytes = xlsx(&[(
        "DN Master",
        vec![
            texts(&[
                "Sr. No.",
                "Route ID / Site ID",
                "Demand Note Reference number",
                "DN Received Date",
                "Ground Rent",
                "Application Date",
            ]),
            vec![
                N(1.0),
                S("MUM-001"),
                S("MBMC/ROW/117"),
                N(45292.0),
                N(1000.0),
                S("15/02/2024"),
            ],
        ],
    )]);
    let rows = ingest(bytes, &IngestSpec::dn_master("dn_master_final")).unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.len(), 57);
    assert_eq!(row.value("sr_no"), CellValue::text("1"));
    assert_eq!(row.value("route_id / site_id"), CellValue::text("MUM-001"));
    assert_eq!(row.value("dn_number"), CellValue::text("MBMC/ROW/117"));
    assert_eq!(row.value("dn_received_date"), CellValue::text("2024-01-01"));
    assert_eq!(row.value("application_date"), CellValue::text("2024-02-15"));
    assert_eq!(row.value("ground_rent"), CellValue::Number(1000.0));
    assert_eq!(row.value("tat_days"), CellValue::Null);
}

#[test]
fn test_missing_sheet() {
    let bytes = xlsx(&[("Other", vec![texts(&["siteid"])])]);
    let err = ingest(bytes, &IngestSpec::po_master("po_master")).unwrap_err();
    assert!(err.to_string().contains("684 POP"));
    assert!(err.to_string().contains("Other"));
}

#[test]
fn test_not_a_workbook() {
    let err = ingest(b"plain text".to_vec(), &IngestSpec::budget("b")).unwrap_err();
    assert!(matches!(err, IngestError::Workbook(_)));
}
