//! Process command implementation - per-authority output workbooks of a DN

use anyhow::{Context, Result};
use ce_client::{HttpParseClient, OutputFile, OutputKind, UploadFile};
use ce_core::{CellValue, Config, Row};
use std::path::{Path, PathBuf};

use crate::cli::{GlobalArgs, OutputFormat, ProcessArgs, ProcessKind};
use crate::commands::common::{format_rows, print_json, rows_to_json};
use crate::context::{load_config, parser_client};

/// Execute the process command
pub(crate) async fn execute(args: &ProcessArgs, global: &GlobalArgs) -> Result<()> {
    let manual = parse_manual(&args.manual)?;
    let sd_manual = parse_manual(&args.sd_manual)?;
    let upload = UploadFile::from_path(&args.file)?;

    let config = load_config(global)?;
    let target = Config::resolve_target(global.target.as_deref());
    let client = parser_client(&config, target.as_deref())?;

    let fields_for = |kind: OutputKind| match kind {
        OutputKind::NonRefundable => &manual,
        OutputKind::Sd => &sd_manual,
    };

    if args.preview {
        return preview(&client, args, upload, fields_for).await;
    }

    let output = match args.kind {
        ProcessKind::NonRefundable => OutputKind::NonRefundable,
        ProcessKind::Sd => OutputKind::Sd,
        ProcessKind::All => {
            let file = client
                .process_all(args.authority, upload, &manual, &sd_manual)
                .await
                .context("Processing failed")?;
            return save(&file, args.out.as_deref());
        }
    };
    let file = client
        .process_output(output, args.authority, upload, fields_for(output))
        .await
        .with_context(|| format!("{} processing failed", output.label()))?;
    save(&file, args.out.as_deref())
}

async fn preview<'a>(
    client: &HttpParseClient,
    args: &ProcessArgs,
    upload: UploadFile,
    fields_for: impl Fn(OutputKind) -> &'a Row,
) -> Result<()> {
    let kinds: &[OutputKind] = match args.kind {
        ProcessKind::NonRefundable => &[OutputKind::NonRefundable],
        ProcessKind::Sd => &[OutputKind::Sd],
        ProcessKind::All => &OutputKind::ALL,
    };
    let mut previews = serde_json::Map::new();
    for &kind in kinds {
        let rows = client
            .preview_output(kind, args.authority, upload.clone(), fields_for(kind))
            .await
            .with_context(|| format!("{} preview failed", kind.label()))?;
        match args.output {
            OutputFormat::Table => print!("{} output\n{}", kind.label(), format_rows(&rows)),
            OutputFormat::Json => {
                previews.insert(kind.label().to_string(), rows_to_json(&rows));
            }
        }
    }
    if args.output == OutputFormat::Json {
        print_json(&serde_json::Value::Object(previews))?;
    }
    Ok(())
}

/// Parse repeated `FIELD=VALUE` arguments into manual fields.
fn parse_manual(args: &[String]) -> Result<Row> {
    let mut row = Row::new();
    for arg in args {
        let (name, value) = arg
            .split_once('=')
            .with_context(|| format!("Invalid manual field '{}', expected FIELD=VALUE", arg))?;
        let name = name.trim();
        if name.is_empty() {
            anyhow::bail!("Invalid manual field '{}', the field name is empty", arg);
        }
        row.set(name, CellValue::text(value.trim()));
    }
    Ok(row)
}

/// Where to write a served file: into `out` when it is a directory, to `out`
/// itself otherwise, else under the served name in the current directory.
fn destination(out: Option<&Path>, served_name: &str) -> PathBuf {
    // only the final component of the served name is trusted
    let name = Path::new(served_name)
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("output.xlsx"));
    match out {
        Some(dir) if dir.is_dir() => dir.join(name),
        Some(file) => file.to_path_buf(),
        None => name,
    }
}

fn save(file: &OutputFile, out: Option<&Path>) -> Result<()> {
    let path = destination(out, &file.file_name);
    std::fs::write(&path, &file.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {} ({} bytes)", path.display(), file.bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manual() {
        let row = parse_manual(&[
            "LM/BB/FTTH=Airtel".to_string(),
            " Total Route (MTR) = 375 ".to_string(),
            "Formula=a=b".to_string(),
        ])
        .unwrap();
        assert_eq!(row.value("LM/BB/FTTH"), CellValue::text("Airtel"));
        assert_eq!(row.value("Total Route (MTR)"), CellValue::text("375"));
        assert_eq!(row.value("Formula"), CellValue::text("a=b"));
    }

    #[test]
    fn test_parse_manual_rejects_malformed() {
        assert!(parse_manual(&["GO RATE".to_string()]).is_err());
        assert!(parse_manual(&["=Yes".to_string()]).is_err());
        assert!(parse_manual(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_destination() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            destination(Some(dir.path()), "DN-5_SD Output.xlsx"),
            dir.path().join("DN-5_SD Output.xlsx")
        );
        let file = dir.path().join("mine.xlsx");
        assert_eq!(destination(Some(&file), "DN-5_SD Output.xlsx"), file);
        assert_eq!(
            destination(None, "../escape/outputs.zip"),
            PathBuf::from("outputs.zip")
        );
    }
}
