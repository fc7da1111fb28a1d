//! DN master command implementation

use anyhow::{Context, Result};
use ce_client::{MasterKind, UploadFile};
use ce_db::merge_keyed;
use ce_ingest::{export_rows, ingest, IngestSpec};
use std::path::Path;

use crate::cli::{DnMasterArgs, DnMasterCommands, GlobalArgs, OutputFormat};
use crate::commands::common::{format_record, print_json, read_file};
use crate::context::{load_config, parser_client, RuntimeContext};
use ce_core::Config;

/// Execute the dn-master command
pub(crate) async fn execute(args: &DnMasterArgs, global: &GlobalArgs) -> Result<()> {
    match &args.command {
        DnMasterCommands::Upload { file, remote: true } => {
            upload_remote(MasterKind::DnMaster, file, global).await
        }
        DnMasterCommands::Upload { file, remote: false } => upload(file, global).await,
        DnMasterCommands::Download { out, remote: true } => {
            download(MasterKind::DnMaster, out, global).await
        }
        DnMasterCommands::Download { out, remote: false } => {
            let ctx = RuntimeContext::new(global).await?;
            let spec = IngestSpec::dn_master(&ctx.config.tables.dn_master);
            export(&ctx, &spec, out).await
        }
        DnMasterCommands::Show { dn_number, output } => show(dn_number, *output, global).await,
    }
}

async fn upload(file: &Path, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global).await?;
    let spec = IngestSpec::dn_master(&ctx.config.tables.dn_master);
    let rows = ingest(read_file(file)?, &spec)
        .with_context(|| format!("Failed to read DN master workbook {}", file.display()))?;
    let report = merge_keyed(ctx.store.as_ref(), &spec.schema, rows)
        .await
        .context("Failed to upload DN master rows")?;
    println!(
        "Upserted {} DN master row(s) into {} ({} duplicate(s), {} without dn_number)",
        report.upserted, spec.schema.table, report.duplicates, report.blank_keys
    );
    Ok(())
}

/// Hand a master workbook to the parsing service.
pub(crate) async fn upload_remote(
    kind: MasterKind,
    file: &Path,
    global: &GlobalArgs,
) -> Result<()> {
    let config = load_config(global)?;
    let client = parser_client(&config, Config::resolve_target(global.target.as_deref()).as_deref())?;
    let upload = UploadFile::from_path(file)?;
    let response = client
        .upload_master(kind, upload)
        .await
        .context("Master upload failed")?;
    print_json(&response)
}

/// Save a master workbook served by the parsing service.
pub(crate) async fn download(kind: MasterKind, out: &Path, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let client = parser_client(&config, Config::resolve_target(global.target.as_deref()).as_deref())?;
    let bytes = client
        .download_master(kind)
        .await
        .context("Master download failed")?;
    std::fs::write(out, &bytes).with_context(|| format!("Failed to write {}", out.display()))?;
    println!("Wrote {} ({} bytes)", out.display(), bytes.len());
    Ok(())
}

/// Write every stored row of `spec`'s table to an xlsx file.
pub(crate) async fn export(ctx: &RuntimeContext, spec: &IngestSpec, out: &Path) -> Result<()> {
    ctx.store.ensure_table(&spec.schema).await?;
    let rows = ctx
        .store
        .select_all(&spec.schema)
        .await
        .with_context(|| format!("Failed to read {}", spec.schema.table))?;
    let bytes = export_rows(spec, &rows).context("Failed to build workbook")?;
    std::fs::write(out, &bytes).with_context(|| format!("Failed to write {}", out.display()))?;
    println!(
        "Exported {} row(s) of {} to {}",
        rows.len(),
        spec.schema.table,
        out.display()
    );
    Ok(())
}

async fn show(dn_number: &str, output: OutputFormat, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global).await?;
    let row = ctx
        .fetch(&ctx.dn_master_schema(), dn_number, &[])
        .await?
        .with_context(|| format!("No DN master row for '{}'", dn_number.trim()))?;
    match output {
        OutputFormat::Table => {
            print!("{}", format_record(&row));
            Ok(())
        }
        OutputFormat::Json => print_json(&row.to_json()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ce_core::{CellValue, Row};
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn test_export_writes_stored_rows() {
        let dir = tempfile::tempdir().unwrap();
        std::env::remove_var(ce_core::config::TARGET_ENV_VAR);
        let global = GlobalArgs {
            verbose: false,
            project_dir: dir.path().display().to_string(),
            config: None,
            target: None,
        };
        let ctx = RuntimeContext::new(&global).await.unwrap();
        let spec = IngestSpec::dn_master(&ctx.config.tables.dn_master);
        let row = Row::new()
            .with("sr_no", "1")
            .with("dn_number", "DN-7")
            .with("ground_rent", 250.0);
        merge_keyed(ctx.store.as_ref(), &spec.schema, vec![row])
            .await
            .unwrap();

        let out = dir.path().join("dn_master.xlsx");
        export(&ctx, &spec, &out).await.unwrap();

        let rows = ingest(std::fs::read(&out).unwrap(), &spec).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value("dn_number"), CellValue::text("DN-7"));
        assert_eq!(rows[0].value("ground_rent"), CellValue::Number(250.0));
    }
}
