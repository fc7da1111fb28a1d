//! Runtime context for CLI commands

use anyhow::{Context, Result};
use ce_client::HttpParseClient;
use ce_core::{Config, CoreError, Row, StoreConfig, StoreType, TableSchema};
use ce_db::{DuckDbBackend, RestBackend, Store};
use std::path::Path;
use std::sync::Arc;

use crate::cli::GlobalArgs;

/// Load the project configuration.
///
/// An explicit `--config` must exist. Without one, a missing
/// `cloudextel.yml` falls back to the defaults with a warning.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<Config> {
    if let Some(path) = &global.config {
        return Config::load(Path::new(path)).context("Failed to load configuration file");
    }
    match Config::load_from_dir(Path::new(&global.project_dir)) {
        Ok(config) => Ok(config),
        Err(CoreError::ConfigNotFound { path }) => {
            log::warn!("{} not found, using default configuration", path);
            Ok(Config::default())
        }
        Err(e) => Err(e).context("Failed to load project configuration"),
    }
}

/// Open the store described by `store`.
///
/// Relative DuckDB paths are resolved against the project directory; the
/// REST API key is read from the configured environment variable.
pub(crate) fn open_store(store: &StoreConfig, project_dir: &Path) -> Result<Arc<dyn Store>> {
    match store.store_type {
        StoreType::DuckDb => {
            let path = if store.path == ":memory:" || Path::new(&store.path).is_absolute() {
                store.path.clone()
            } else {
                project_dir.join(&store.path).display().to_string()
            };
            log::debug!("Opening DuckDB store at {}", path);
            let db = DuckDbBackend::new(&path).context("Failed to open DuckDB store")?;
            Ok(Arc::new(db))
        }
        StoreType::Rest => {
            let url = store
                .url
                .as_deref()
                .context("store.url is required for a rest store")?;
            let api_key = std::env::var(&store.api_key_env).ok();
            if api_key.is_none() {
                log::warn!(
                    "{} is not set, calling {} without an API key",
                    store.api_key_env,
                    url
                );
            }
            Ok(Arc::new(RestBackend::new(url, api_key)))
        }
    }
}

/// Runtime context containing the loaded config and store connection
pub(crate) struct RuntimeContext {
    pub config: Config,

    /// Active target, if any
    pub target: Option<String>,

    pub store: Arc<dyn Store>,
}

impl RuntimeContext {
    /// Create a new runtime context from global arguments
    pub async fn new(global: &GlobalArgs) -> Result<Self> {
        let config = load_config(global)?;
        let target = Config::resolve_target(global.target.as_deref());
        let store_config = config
            .get_store_config(target.as_deref())
            .context("Failed to resolve store configuration")?;
        let store = open_store(&store_config, Path::new(&global.project_dir))?;
        log::debug!(
            "Using {} store{}",
            store.store_type(),
            target
                .as_deref()
                .map(|t| format!(" (target {})", t))
                .unwrap_or_default()
        );
        Ok(Self {
            config,
            target,
            store,
        })
    }

    pub fn budget_schema(&self) -> TableSchema {
        TableSchema::budget(&self.config.tables.budget)
    }

    pub fn dn_master_schema(&self) -> TableSchema {
        TableSchema::dn_master(&self.config.tables.dn_master)
    }

    pub fn po_master_schema(&self) -> TableSchema {
        TableSchema::po_master(&self.config.tables.po_master)
    }

    /// Keyed lookup; the table is created first so a fresh store reads as empty.
    pub async fn fetch(
        &self,
        schema: &TableSchema,
        key: &str,
        columns: &[String],
    ) -> Result<Option<Row>> {
        self.store.ensure_table(schema).await?;
        self.store
            .query_one(schema, key, columns)
            .await
            .with_context(|| format!("Failed to query {}", schema.table))
    }

    pub fn parser_client(&self) -> Result<HttpParseClient> {
        parser_client(&self.config, self.target.as_deref())
    }
}

/// Client for the configured parsing service.
pub(crate) fn parser_client(config: &Config, target: Option<&str>) -> Result<HttpParseClient> {
    let service = config
        .get_parser_service(target)
        .context("Failed to resolve parser service configuration")?;
    Ok(HttpParseClient::new(&service.base_url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn global(dir: &Path) -> GlobalArgs {
        GlobalArgs {
            verbose: false,
            project_dir: dir.display().to_string(),
            config: None,
            target: None,
        }
    }

    #[test]
    fn test_missing_config_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&global(dir.path())).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_explicit_missing_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = global(dir.path());
        args.config = Some(dir.path().join("nope.yml").display().to_string());
        assert!(load_config(&args).is_err());
    }

    #[test]
    fn test_relative_duckdb_path_resolved_against_project() {
        let dir = tempfile::tempdir().unwrap();
        let store = StoreConfig {
            path: "ledger.duckdb".to_string(),
            ..StoreConfig::default()
        };
        let opened = open_store(&store, dir.path()).unwrap();
        assert_eq!(opened.store_type(), "duckdb");
        assert!(dir.path().join("ledger.duckdb").exists());
    }

    #[tokio::test]
    #[serial]
    async fn test_context_uses_target_store() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("cloudextel.yml"),
            r#"
name: test
store:
  type: duckdb
targets:
  remote:
    store:
      type: rest
      url: "http://localhost:3000"
"#,
        )
        .unwrap();
        std::env::remove_var(ce_core::config::TARGET_ENV_VAR);

        let ctx = RuntimeContext::new(&global(dir.path())).await.unwrap();
        assert_eq!(ctx.store.store_type(), "duckdb");
        assert_eq!(ctx.budget_schema().table, "budget_lmc");

        let mut args = global(dir.path());
        args.target = Some("remote".to_string());
        let ctx = RuntimeContext::new(&args).await.unwrap();
        assert_eq!(ctx.store.store_type(), "rest");
        assert_eq!(ctx.target.as_deref(), Some("remote"));
    }

    #[tokio::test]
    #[serial]
    async fn test_fetch_on_fresh_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::env::remove_var(ce_core::config::TARGET_ENV_VAR);
        let ctx = RuntimeContext::new(&global(dir.path())).await.unwrap();

        let schema = ctx.dn_master_schema();
        let row = ctx.fetch(&schema, "DN-1", &[]).await.unwrap();
        assert!(row.is_none());
        assert_eq!(ctx.store.count(&schema).await.unwrap(), 0);
    }
}
