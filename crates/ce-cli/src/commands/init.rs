//! Init command implementation - writes a starter cloudextel.yml

use anyhow::{Context, Result};
use ce_core::config::CONFIG_FILE_NAMES;
use ce_core::{Config, StoreConfig};
use std::fs;
use std::path::Path;

use crate::cli::{GlobalArgs, InitArgs};

/// Execute the init command
pub(crate) async fn execute(args: &InitArgs, global: &GlobalArgs) -> Result<()> {
    let project_dir = Path::new(&global.project_dir);
    if args.name.trim().is_empty() {
        anyhow::bail!("Project name must not be empty");
    }

    let config_path = project_dir.join(CONFIG_FILE_NAMES[0]);
    if config_path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists. Pass --force to overwrite it.",
            config_path.display()
        );
    }

    fs::create_dir_all(project_dir)
        .with_context(|| format!("Failed to create directory: {}", project_dir.display()))?;

    let config = starter_config(args);
    config.validate().context("Generated configuration is invalid")?;
    let content = serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
    fs::write(&config_path, content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    let gitignore = project_dir.join(".gitignore");
    if !gitignore.exists() {
        fs::write(&gitignore, "*.duckdb\n*.duckdb.wal\n").context("Failed to write .gitignore")?;
    }

    println!("Created {}", config_path.display());
    println!();
    println!("Next steps:");
    println!("  cex budget upload <budget.xlsx>");
    println!("  cex reconcile --po <po.xlsx> --site-id <id> --application <app.pdf> --dn <dn.pdf> --authority MCGM");
    Ok(())
}

fn starter_config(args: &InitArgs) -> Config {
    Config {
        name: args.name.trim().to_string(),
        store: StoreConfig {
            path: args.db_path.clone(),
            ..StoreConfig::default()
        },
        ..Config::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global_for(dir: &Path) -> GlobalArgs {
        GlobalArgs {
            verbose: false,
            project_dir: dir.display().to_string(),
            config: None,
            target: None,
        }
    }

    fn init_args(force: bool) -> InitArgs {
        InitArgs {
            name: "ledger".to_string(),
            db_path: "ledger.duckdb".to_string(),
            force,
        }
    }

    #[tokio::test]
    async fn test_init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        execute(&init_args(false), &global_for(dir.path()))
            .await
            .unwrap();

        let config = Config::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.name, "ledger");
        assert_eq!(config.store.path, "ledger.duckdb");
        assert_eq!(config.tables.budget, "budget_lmc");
        assert!(dir.path().join(".gitignore").exists());
    }

    #[tokio::test]
    async fn test_init_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let global = global_for(dir.path());
        execute(&init_args(false), &global).await.unwrap();

        let err = execute(&init_args(false), &global).await.unwrap_err();
        assert!(err.to_string().contains("--force"));
        execute(&init_args(true), &global).await.unwrap();
    }
}
