//! Budget command implementation - LMC budget workbook and table

use anyhow::{Context, Result};
use ce_core::schema::budget;
use ce_core::{BudgetRow, CellValue};
use ce_db::replace_keyed;
use ce_ingest::{ingest, IngestSpec};
use ce_reconcile::{BudgetComparison, CostBreakdown};
use std::path::Path;

use crate::cli::{BudgetArgs, BudgetCommands, GlobalArgs, OutputFormat};
use crate::commands::common::{
    format_record, format_rows, print_json, read_file, rows_to_json, split_list,
};
use crate::context::{load_config, RuntimeContext};

/// Execute the budget command
pub(crate) async fn execute(args: &BudgetArgs, global: &GlobalArgs) -> Result<()> {
    match &args.command {
        BudgetCommands::Preview { file, output } => preview(file, *output, global),
        BudgetCommands::Upload { file } => upload(file, global).await,
        BudgetCommands::Query {
            site_id,
            columns,
            output,
        } => query(site_id, columns.as_deref(), *output, global).await,
        BudgetCommands::Compare {
            site_id,
            dn_number,
            actual_ri,
            actual_material,
            actual_service,
            output,
        } => {
            let actual = ActualInput {
                dn_number: dn_number.as_deref(),
                ri: *actual_ri,
                material: *actual_material,
                service: *actual_service,
            };
            compare(site_id, actual, *output, global).await
        }
    }
}

fn preview(file: &Path, output: OutputFormat, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let spec = IngestSpec::budget(&config.tables.budget);
    let rows = ingest(read_file(file)?, &spec)
        .with_context(|| format!("Failed to read budget workbook {}", file.display()))?;
    match output {
        OutputFormat::Table => {
            print!("{}", format_rows(&rows));
            println!("\n{} row(s)", rows.len());
            Ok(())
        }
        OutputFormat::Json => print_json(&rows_to_json(&rows)),
    }
}

async fn upload(file: &Path, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global).await?;
    let spec = IngestSpec::budget(&ctx.config.tables.budget);
    let rows = ingest(read_file(file)?, &spec)
        .with_context(|| format!("Failed to read budget workbook {}", file.display()))?;
    let report = replace_keyed(ctx.store.as_ref(), &spec.schema, rows)
        .await
        .context("Failed to upload budget rows")?;
    println!(
        "Uploaded {} budget row(s) to {} ({} removed, {} duplicate(s), {} without SiteID)",
        report.upserted, spec.schema.table, report.deleted, report.duplicates, report.blank_keys
    );
    Ok(())
}

async fn query(
    site_id: &str,
    columns: Option<&str>,
    output: OutputFormat,
    global: &GlobalArgs,
) -> Result<()> {
    let ctx = RuntimeContext::new(global).await?;
    let schema = ctx.budget_schema();
    let columns = match columns {
        Some(raw) => split_list(raw),
        None => budget::QUERY_COLUMNS.iter().map(|c| c.to_string()).collect(),
    };
    let row = ctx
        .fetch(&schema, site_id, &columns)
        .await?
        .with_context(|| format!("No budget row for site '{}'", site_id.trim()))?;
    match output {
        OutputFormat::Table => {
            print!("{}", format_record(&row));
            Ok(())
        }
        OutputFormat::Json => print_json(&row.to_json()),
    }
}

struct ActualInput<'a> {
    dn_number: Option<&'a str>,
    ri: Option<f64>,
    material: f64,
    service: f64,
}

async fn compare(
    site_id: &str,
    actual: ActualInput<'_>,
    output: OutputFormat,
    global: &GlobalArgs,
) -> Result<()> {
    let ctx = RuntimeContext::new(global).await?;
    let budget_row = ctx
        .fetch(&ctx.budget_schema(), site_id, &[])
        .await?
        .with_context(|| format!("No budget row for site '{}'", site_id.trim()))?;
    let budget_row = BudgetRow::from_row(&budget_row)?;

    let actual_ri = match (actual.ri, actual.dn_number) {
        (Some(ri), _) => ri,
        (None, Some(dn)) => {
            let columns = ["actual_total_non_refundable".to_string()];
            ctx.fetch(&ctx.dn_master_schema(), dn, &columns)
                .await?
                .with_context(|| format!("No DN master row for '{}'", dn.trim()))?
                .get(&columns[0])
                .and_then(CellValue::as_f64)
                .unwrap_or_else(|| {
                    log::warn!("DN '{}' has no {}, using 0", dn.trim(), columns[0]);
                    0.0
                })
        }
        (None, None) => {
            log::warn!("No --actual-ri or --dn-number given, actual RI cost counts as 0");
            0.0
        }
    };

    let comparison = BudgetComparison::new(
        &budget_row,
        CostBreakdown {
            ri: actual_ri,
            material: actual.material,
            service: actual.service,
        },
    );

    match output {
        OutputFormat::Json => print_json(&comparison.to_json()),
        OutputFormat::Table => {
            println!("Site {}", comparison.site_id);
            println!("{:<10} {:>14} {:>14}", "", "Budget", "Actual");
            let lines = [
                ("RI", comparison.budget.ri, comparison.actual.ri),
                ("Material", comparison.budget.material, comparison.actual.material),
                ("Service", comparison.budget.service, comparison.actual.service),
                ("Total", comparison.budget.total(), comparison.actual.total()),
            ];
            for (label, b, a) in lines {
                println!("{:<10} {:>14.2} {:>14.2}", label, b, a);
            }
            let percent = comparison
                .variance_percent()
                .map(|p| format!("{:.2}%", p))
                .unwrap_or_else(|| "n/a".to_string());
            println!("Variance   {:.2} ({})", comparison.variance(), percent);
            Ok(())
        }
    }
}
