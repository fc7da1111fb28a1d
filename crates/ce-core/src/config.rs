//! Configuration types and parsing for cloudextel.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Config file names looked up in a project directory, in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["cloudextel.yml", "cloudextel.yaml"];

/// Environment variable selecting the active target.
pub const TARGET_ENV_VAR: &str = "CE_TARGET";

/// Main project configuration from cloudextel.yml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// External document parsing service
    #[serde(default)]
    pub parser_service: ParserServiceConfig,

    /// Relational store holding the budget, DN master and PO master tables
    #[serde(default)]
    pub store: StoreConfig,

    /// Table names
    #[serde(default)]
    pub tables: TablesConfig,

    /// Hardcoded reconciliation values
    #[serde(default)]
    pub constants: ConstantsConfig,

    /// Email draft defaults
    #[serde(default)]
    pub email: EmailConfig,

    /// Named target configurations (e.g. local, prod)
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "cloudextel".to_string(),
            parser_service: ParserServiceConfig::default(),
            store: StoreConfig::default(),
            tables: TablesConfig::default(),
            constants: ConstantsConfig::default(),
            email: EmailConfig::default(),
            targets: HashMap::new(),
        }
    }
}

/// Target-specific overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Store override
    #[serde(default)]
    pub store: Option<StoreConfig>,

    /// Parser service override
    #[serde(default)]
    pub parser_service: Option<ParserServiceConfig>,
}

/// Parsing service endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParserServiceConfig {
    /// Base URL, e.g. `http://localhost:8000`
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ParserServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

/// Store backend selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    /// Embedded DuckDB (default)
    #[default]
    DuckDb,
    /// PostgREST-compatible HTTP store
    Rest,
}

impl std::fmt::Display for StoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreType::DuckDb => write!(f, "duckdb"),
            StoreType::Rest => write!(f, "rest"),
        }
    }
}

/// Store connection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Store type (duckdb or rest)
    #[serde(rename = "type", default)]
    pub store_type: StoreType,

    /// DuckDB file path or `:memory:`
    #[serde(default = "default_store_path")]
    pub path: String,

    /// REST endpoint root, e.g. `https://xyz.supabase.co/rest/v1`
    #[serde(default)]
    pub url: Option<String>,

    /// Environment variable holding the REST API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_type: StoreType::default(),
            path: default_store_path(),
            url: None,
            api_key_env: default_api_key_env(),
        }
    }
}

impl StoreConfig {
    fn validate(&self, context: &str) -> CoreResult<()> {
        if self.store_type == StoreType::Rest && self.url.as_deref().is_none_or(str::is_empty) {
            return Err(CoreError::ConfigInvalid {
                message: format!("{}: store type 'rest' requires a url", context),
            });
        }
        Ok(())
    }
}

const DEFAULT_STORE_PATH: &str = ":memory:";

fn default_store_path() -> String {
    DEFAULT_STORE_PATH.to_string()
}

fn default_api_key_env() -> String {
    "CE_STORE_API_KEY".to_string()
}

/// Table names in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TablesConfig {
    #[serde(default = "default_budget_table")]
    pub budget: String,
    #[serde(default = "default_dn_master_table")]
    pub dn_master: String,
    #[serde(default = "default_po_master_table")]
    pub po_master: String,
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            budget: default_budget_table(),
            dn_master: default_dn_master_table(),
            po_master: default_po_master_table(),
        }
    }
}

fn default_budget_table() -> String {
    "budget_lmc".to_string()
}

fn default_dn_master_table() -> String {
    "dn_master_final".to_string()
}

fn default_po_master_table() -> String {
    "po_master".to_string()
}

/// Values every reconciled DN master row carries regardless of its documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ConstantsConfig {
    pub lmc_route: String,
    pub ip1_co_built: String,
    pub dn_recipient: String,
    pub project_name: String,
    pub contract_type: String,
    pub build_type: String,
    pub category_type: String,
    pub trench_type: String,
}

impl Default for ConstantsConfig {
    fn default() -> Self {
        Self {
            lmc_route: "LMC".to_string(),
            ip1_co_built: "Co-Built".to_string(),
            dn_recipient: "Airtel".to_string(),
            project_name: "Mumbai Fiber Refresh Project".to_string(),
            contract_type: "Co-Built".to_string(),
            build_type: "New-build".to_string(),
            category_type: "Non-Strategic".to_string(),
            trench_type: "Open Trench".to_string(),
        }
    }
}

/// Email draft defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct EmailConfig {
    /// Default `To` recipients, comma separated
    pub to: Option<String>,
    /// Default `Cc` recipients, comma separated
    pub cc: Option<String>,
    /// Draft creation endpoint
    pub messages_url: String,
    /// Execution partner shown in the summary table
    pub execution_partner: String,
    /// Project name shown in the summary table
    pub project_name: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            to: None,
            cc: None,
            messages_url: "https://graph.microsoft.com/v1.0/me/messages".to_string(),
            execution_partner: "Excel Telesonic India Private Limited".to_string(),
            project_name: "Mumbai Fiber Refresh LMC".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                message: format!("{}: {}", path.display(), e),
            })?;
        config.validate()?;
        log::debug!("Loaded config '{}' from {}", config.name, path.display());
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for cloudextel.yml or cloudextel.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.exists())
            .map(|p| Self::load(&p))
            .unwrap_or_else(|| {
                Err(CoreError::ConfigNotFound {
                    path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
                })
            })
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        check_base_url("parser_service", &self.parser_service.base_url)?;
        self.store.validate("store")?;

        let tables = [
            ("tables.budget", &self.tables.budget),
            ("tables.dn_master", &self.tables.dn_master),
            ("tables.po_master", &self.tables.po_master),
        ];
        for (field, name) in tables {
            if name.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("{} cannot be empty", field),
                });
            }
        }
        if self.tables.budget == self.tables.dn_master
            || self.tables.budget == self.tables.po_master
            || self.tables.dn_master == self.tables.po_master
        {
            return Err(CoreError::ConfigInvalid {
                message: "budget, dn_master and po_master must be distinct tables".to_string(),
            });
        }

        for (name, target) in &self.targets {
            if let Some(store) = &target.store {
                store.validate(&format!("targets.{}.store", name))?;
            }
            if let Some(service) = &target.parser_service {
                check_base_url(&format!("targets.{}.parser_service", name), &service.base_url)?;
            }
        }

        Ok(())
    }

    /// Get the list of available target names, sorted
    pub fn available_targets(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.targets.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    fn target(&self, name: &str) -> CoreResult<&TargetConfig> {
        self.targets.get(name).ok_or_else(|| CoreError::ConfigInvalid {
            message: format!(
                "Target '{}' not found. Available targets: {}",
                name,
                self.available_targets().join(", ")
            ),
        })
    }

    /// Get store configuration, optionally applying target overrides
    pub fn get_store_config(&self, target: Option<&str>) -> CoreResult<StoreConfig> {
        match target {
            Some(name) => Ok(self
                .target(name)?
                .store
                .clone()
                .unwrap_or_else(|| self.store.clone())),
            None => Ok(self.store.clone()),
        }
    }

    /// Get parser service configuration, optionally applying target overrides
    pub fn get_parser_service(&self, target: Option<&str>) -> CoreResult<ParserServiceConfig> {
        match target {
            Some(name) => Ok(self
                .target(name)?
                .parser_service
                .clone()
                .unwrap_or_else(|| self.parser_service.clone())),
            None => Ok(self.parser_service.clone()),
        }
    }

    /// Resolve target from CLI flag or CE_TARGET environment variable
    ///
    /// Priority: CLI flag > CE_TARGET env var > None
    pub fn resolve_target(cli_target: Option<&str>) -> Option<String> {
        cli_target
            .map(String::from)
            .or_else(|| std::env::var(TARGET_ENV_VAR).ok())
            .filter(|t| !t.trim().is_empty())
    }
}

fn check_base_url(field: &str, url: &str) -> CoreResult<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(CoreError::ConfigInvalid {
            message: format!("{}.base_url must be an http(s) URL, got '{}'", field, url),
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
