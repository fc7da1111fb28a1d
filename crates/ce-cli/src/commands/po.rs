//! PO command implementation - site listing, lookup and PO master upload

use anyhow::{Context, Result};
use ce_client::MasterKind;
use ce_db::merge_keyed;
use ce_ingest::{IngestSpec, PoWorkbook};
use std::path::Path;

use crate::cli::{GlobalArgs, OutputFormat, PoArgs, PoCommands};
use crate::commands::common::{format_record, print_json, read_file};
use crate::commands::dn_master::{download, export, upload_remote};
use crate::context::RuntimeContext;

/// Execute the po command
pub(crate) async fn execute(args: &PoArgs, global: &GlobalArgs) -> Result<()> {
    match &args.command {
        PoCommands::Sites { file, filter } => sites(file, filter.as_deref()),
        PoCommands::Lookup {
            file,
            site_id,
            output,
        } => lookup(file, site_id, *output),
        PoCommands::Upload { file, remote: true } => {
            upload_remote(MasterKind::PoMaster, file, global).await
        }
        PoCommands::Upload {
            file,
            remote: false,
        } => upload(file, global).await,
        PoCommands::Download { out, remote: true } => {
            download(MasterKind::PoMaster, out, global).await
        }
        PoCommands::Download { out, remote: false } => {
            let ctx = RuntimeContext::new(global).await?;
            let spec = IngestSpec::po_master(&ctx.config.tables.po_master);
            export(&ctx, &spec, out).await
        }
    }
}

fn read_po(file: &Path) -> Result<PoWorkbook> {
    PoWorkbook::from_bytes(read_file(file)?)
        .with_context(|| format!("Failed to read PO workbook {}", file.display()))
}

/// Site ids containing `filter`, case-insensitively.
fn filter_sites(ids: Vec<String>, filter: Option<&str>) -> Vec<String> {
    match filter.map(|f| f.trim().to_lowercase()) {
        Some(f) if !f.is_empty() => ids
            .into_iter()
            .filter(|id| id.to_lowercase().contains(&f))
            .collect(),
        _ => ids,
    }
}

fn sites(file: &Path, filter: Option<&str>) -> Result<()> {
    let ids = filter_sites(read_po(file)?.site_ids(), filter);
    if ids.is_empty() {
        log::warn!("No matching site ids in {}", file.display());
    }
    for id in ids {
        println!("{}", id);
    }
    Ok(())
}

fn lookup(file: &Path, site_id: &str, output: OutputFormat) -> Result<()> {
    let fields = read_po(file)?.lookup(site_id);
    match output {
        OutputFormat::Table => {
            print!("{}", format_record(&fields.fields));
            Ok(())
        }
        OutputFormat::Json => print_json(&fields.fields.to_json()),
    }
}

async fn upload(file: &Path, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global).await?;
    let rows = read_po(file)?.into_rows();
    let schema = ctx.po_master_schema();
    let report = merge_keyed(ctx.store.as_ref(), &schema, rows)
        .await
        .context("Failed to upload PO rows")?;
    println!(
        "Upserted {} PO row(s) into {} ({} duplicate(s), {} without SiteID)",
        report.upserted, schema.table, report.duplicates, report.blank_keys
    );
    Ok(())
}
