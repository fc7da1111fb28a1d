//! Row cleaning against a canonical schema.

use ce_core::{Row, TableSchema};

/// Produce a row with exactly the schema's columns, in schema order.
///
/// Each value is normalized by its column kind (blank to null, numbers
/// rounded to two decimals, dates to ISO). Columns absent from `raw` are null.
pub fn clean_row(raw: &Row, schema: &TableSchema) -> Row {
    schema
        .columns
        .iter()
        .map(|col| (col.name.clone(), col.kind.coerce(raw.value(&col.name))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ce_core::CellValue;

    #[test]
    fn test_clean_row_shapes_to_schema() {
        let schema = TableSchema::budget("budget_lmc");
        let raw = Row::new()
            .with("Route Type", "  LMC ")
            .with("SiteID", 1042.0)
            .with("Total RI Amount", "12,345.678")
            .with("Material Cost", " ")
            .with("Unrelated", "dropped");
        let row = clean_row(&raw, &schema);

        assert_eq!(row.columns().collect::<Vec<_>>(), schema.column_names());
        assert_eq!(row.value("SiteID"), CellValue::text("1042"));
        assert_eq!(row.value("Route Type"), CellValue::text("LMC"));
        assert_eq!(row.value("Total RI Amount"), CellValue::Number(12345.68));
        assert_eq!(row.value("Material Cost"), CellValue::Null);
        assert_eq!(row.value("CE-Length-Mtr"), CellValue::Null);
        assert!(row.get("Unrelated").is_none());
    }
}
