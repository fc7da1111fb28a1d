use super::*;
use ce_core::model::dn_labels;
use ce_core::{FieldSet, Row};

fn merged_with_dn(dn: Row) -> MergedFields {
    MergedFields::merge(
        &FieldSet::empty(Source::Po),
        &FieldSet::empty(Source::Application),
        &FieldSet::new(Source::Dn, dn),
    )
}

fn sample_dn() -> Row {
    Row::new()
        .with(dn_labels::SECTION_LENGTH, "10")
        .with(dn_labels::GROUND_RENT, 200.0)
        .with(dn_labels::ADMINISTRATIVE_CHARGE, "100")
        .with(dn_labels::RI_AMOUNT, "1,500.50")
        .with(dn_labels::SUPERVISION_CHARGES, "n/a")
        .with(dn_labels::CHAMBER_FEE, 50.0)
        .with(dn_labels::GST, 90.0)
        .with(dn_labels::SD_AMOUNT, 1000.0)
}

#[test]
fn test_compute_all_metrics() {
    let m = DerivedMetrics::compute(&merged_with_dn(sample_dn()), Some(250.0));
    assert_eq!(m.ri_budget_amount_per_meter, Some(250.0));
    assert_eq!(m.projected_budget_ri_amount_dn, Some(2500.0));
    // non-numeric supervision charges count as zero
    assert_eq!(m.actual_total_non_refundable, Some(1800.5));
    assert_eq!(m.non_refundable_amount_per_mtr, Some(180.05));
    assert_eq!(m.non_refundable_savings_per_mtr, Some(69.95));
    assert_eq!(m.total_dn_amount, Some(2940.5));
}

#[test]
fn test_gst_amount_preferred_over_gst() {
    let dn = sample_dn().with(dn_labels::GST_AMOUNT, 10.0);
    let m = DerivedMetrics::compute(&merged_with_dn(dn), None);
    assert_eq!(m.total_dn_amount, Some(2860.5));
}

#[test]
fn test_without_budget_rate() {
    let m = DerivedMetrics::compute(&merged_with_dn(sample_dn()), None);
    assert_eq!(m.ri_budget_amount_per_meter, None);
    assert_eq!(m.projected_budget_ri_amount_dn, None);
    assert_eq!(m.non_refundable_savings_per_mtr, None);
    assert_eq!(m.non_refundable_amount_per_mtr, Some(180.05));
}

#[test]
fn test_zero_length_never_divides() {
    let dn = sample_dn().with(dn_labels::SECTION_LENGTH, 0.0);
    let m = DerivedMetrics::compute(&merged_with_dn(dn), Some(100.0));
    assert_eq!(m.non_refundable_amount_per_mtr, None);
    assert_eq!(m.non_refundable_savings_per_mtr, None);
    assert_eq!(m.projected_budget_ri_amount_dn, Some(0.0));
}

#[test]
fn test_empty_dn_yields_nothing() {
    let m = DerivedMetrics::compute(&merged_with_dn(Row::new()), Some(100.0));
    assert_eq!(m.actual_total_non_refundable, None);
    assert_eq!(m.total_dn_amount, None);
    assert_eq!(m.non_refundable_amount_per_mtr, None);
}

#[test]
fn test_only_dn_source_counts() {
    let merged = MergedFields::merge(
        &FieldSet::new(Source::Po, Row::new().with(dn_labels::RI_AMOUNT, 999.0)),
        &FieldSet::empty(Source::Application),
        &FieldSet::empty(Source::Dn),
    );
    let m = DerivedMetrics::compute(&merged, None);
    assert_eq!(m.actual_total_non_refundable, None);
}

#[test]
fn test_metric_names_and_values() {
    let m = DerivedMetrics {
        total_dn_amount: Some(12.5),
        ..Default::default()
    };
    assert_eq!(m.value(Metric::TotalDnAmount), CellValue::Number(12.5));
    assert_eq!(m.value(Metric::RiBudgetAmountPerMeter), CellValue::Null);
    assert_eq!(Metric::NonRefundableSavingsPerMtr.to_string(), "non_refundable_savings_per_mtr");
}
