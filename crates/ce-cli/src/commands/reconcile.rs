//! Reconcile command implementation - three-way parse, metrics, field resolution

use anyhow::{Context, Result};
use ce_client::{parse_all, HttpParseClient, ParseRequest, ParseService, UploadFile};
use ce_core::schema::{budget, dn_master};
use ce_core::{CellValue, FieldSet, SiteId};
use ce_db::merge_keyed;
use ce_ingest::PoWorkbook;
use ce_reconcile::{
    parse_overrides, DerivedMetrics, MergedFields, ReconciliationTable, TableRow,
};

use crate::cli::{GlobalArgs, OutputFormat, ReconcileArgs};
use crate::commands::common::{print_json, read_file};
use crate::context::RuntimeContext;

/// Execute the reconcile command
pub(crate) async fn execute(args: &ReconcileArgs, global: &GlobalArgs) -> Result<()> {
    // bad --set arguments fail before any upload
    let overrides = parse_overrides(&args.set, args.force)?;
    let site_id = SiteId::try_new(&args.site_id)?;

    let ctx = RuntimeContext::new(global).await?;
    let client = ctx.parser_client()?;

    let (po, application, dn) = parse_documents(&client, args, &site_id).await?;
    let merged = MergedFields::merge(&po, &application, &dn);
    log::debug!("Merged {} parsed field(s)", merged.len());

    let rate = budget_rate(&ctx, &site_id).await?;
    let metrics = DerivedMetrics::compute(&merged, rate);
    let table = ReconciliationTable::build(&merged, &metrics, &ctx.config.constants, &overrides);

    match args.output {
        OutputFormat::Table => print_table(table.rows()),
        OutputFormat::Json => print_json(&table.to_json())?,
    }

    if args.push || args.send {
        let row = table.to_master_row()?;
        if args.push {
            let schema = ctx.dn_master_schema();
            merge_keyed(ctx.store.as_ref(), &schema, vec![row.clone()])
                .await
                .context("Failed to push reconciled row")?;
            println!(
                "Pushed {} into {}",
                row.value(dn_master::DN_NUMBER),
                schema.table
            );
        }
        if args.send {
            let response = client
                .send_to_master_dn(&row)
                .await
                .context("Failed to send reconciled row")?;
            log::debug!("send-to-master-dn: {}", response);
            println!("Sent reconciled row to the parsing service");
        }
    }
    Ok(())
}

async fn parse_documents(
    client: &HttpParseClient,
    args: &ReconcileArgs,
    site_id: &SiteId,
) -> Result<(FieldSet, FieldSet, FieldSet)> {
    let application = UploadFile::from_path(&args.application)?;
    let dn = UploadFile::from_path(&args.dn)?;

    if args.local_po {
        let po = PoWorkbook::from_bytes(read_file(&args.po)?)
            .with_context(|| format!("Failed to read PO workbook {}", args.po.display()))?
            .lookup(site_id.as_str());
        let (application, dn) = tokio::try_join!(
            client.parse_application(application),
            client.parse_dn(dn, args.authority),
        )
        .context("Document parsing failed")?;
        return Ok((po, application, dn));
    }

    let request = ParseRequest {
        po: UploadFile::from_path(&args.po)?,
        site_id: site_id.clone(),
        application,
        dn,
        authority: args.authority,
    };
    parse_all(client, request)
        .await
        .context("Document parsing failed")
}

/// The site's `RI Cost per Meter` from the budget table, if any.
async fn budget_rate(ctx: &RuntimeContext, site_id: &SiteId) -> Result<Option<f64>> {
    let schema = ctx.budget_schema();
    let columns = [budget::RI_COST_PER_METER.to_string()];
    let rate = ctx
        .fetch(&schema, site_id.as_str(), &columns)
        .await?
        .and_then(|row| row.get(budget::RI_COST_PER_METER).and_then(CellValue::as_f64));
    if rate.is_none() {
        log::warn!(
            "No {} for site '{}' in {}, budget metrics left blank",
            budget::RI_COST_PER_METER,
            site_id,
            schema.table
        );
    }
    Ok(rate)
}

fn print_table(rows: &[TableRow]) {
    let width = rows
        .iter()
        .map(|r| r.field.name().len())
        .max()
        .unwrap_or(5);
    println!("{:<width$}  {:<15}  VALUE", "FIELD", "SOURCE", width = width);
    for row in rows {
        let source = if row.edited {
            format!("{} (edited)", row.source)
        } else {
            row.source.to_string()
        };
        let value = match &row.value {
            CellValue::Null => String::new(),
            other => other.to_string(),
        };
        println!(
            "{:<width$}  {:<15}  {}",
            row.field.name(),
            source,
            value,
            width = width
        );
    }
}
