//! CLI argument definitions using clap derive API

use ce_core::Authority;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// cex - demand-note ledger: budgets, DN reconciliation and email drafts
#[derive(Parser, Debug)]
#[command(name = "cex")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override target (store and parser service)
    #[arg(short, long, global = true)]
    pub target: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default cloudextel.yml into the project directory
    Init(InitArgs),

    /// LMC budget workbook: preview, upload, query, compare
    Budget(BudgetArgs),

    /// DN master table: upload, download, show
    DnMaster(DnMasterArgs),

    /// PO workbook: list sites, look up a site, upload
    Po(PoArgs),

    /// Parse PO, DN application and DN and reconcile them into a DN master row
    Reconcile(ReconcileArgs),

    /// Compose (and optionally create) the approval email draft for a DN
    Draft(DraftArgs),

    /// Extract actual costs from DN documents
    ActualCost(ActualCostArgs),

    /// Preview or generate the per-authority output workbooks of a DN
    Process(ProcessArgs),
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project name written to the config
    #[arg(short, long, default_value = "cloudextel")]
    pub name: String,

    /// DuckDB file for the local store
    #[arg(long, default_value = "ledger.duckdb")]
    pub db_path: String,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct BudgetArgs {
    #[command(subcommand)]
    pub command: BudgetCommands,
}

#[derive(Subcommand, Debug)]
pub enum BudgetCommands {
    /// Show the cleaned rows of a budget workbook without storing them
    Preview {
        /// Budget workbook (.xlsx/.xls)
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Replace the budget table with the rows of a workbook
    Upload {
        /// Budget workbook (.xlsx/.xls)
        file: PathBuf,
    },

    /// Look up the budget row of one site
    Query {
        /// Site/route id
        site_id: String,

        /// Columns to return (comma-separated, default: RI, material, execution and total cost)
        #[arg(long)]
        columns: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Compare a site's budget with its actual costs
    Compare {
        /// Site/route id
        site_id: String,

        /// Take the actual RI cost from this DN's master row
        #[arg(long)]
        dn_number: Option<String>,

        /// Actual RI cost (overrides --dn-number)
        #[arg(long)]
        actual_ri: Option<f64>,

        /// Actual material cost
        #[arg(long, default_value_t = 0.0)]
        actual_material: f64,

        /// Actual service (execution) cost
        #[arg(long, default_value_t = 0.0)]
        actual_service: f64,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },
}

#[derive(Args, Debug)]
pub struct DnMasterArgs {
    #[command(subcommand)]
    pub command: DnMasterCommands,
}

#[derive(Subcommand, Debug)]
pub enum DnMasterCommands {
    /// Insert new and update changed DN master rows from a workbook
    Upload {
        /// DN master workbook (.xlsx/.xls)
        file: PathBuf,

        /// Hand the workbook to the parsing service instead of the store
        #[arg(long)]
        remote: bool,
    },

    /// Export the DN master table to a workbook
    Download {
        /// Destination file
        #[arg(short, long, default_value = "dn_master.xlsx")]
        out: PathBuf,

        /// Fetch the parsing service's workbook instead of exporting the store
        #[arg(long)]
        remote: bool,
    },

    /// Show one DN master row from the store
    Show {
        /// Demand note reference number
        dn_number: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },
}

#[derive(Args, Debug)]
pub struct PoArgs {
    #[command(subcommand)]
    pub command: PoCommands,
}

#[derive(Subcommand, Debug)]
pub enum PoCommands {
    /// List the distinct site ids of a PO workbook
    Sites {
        /// PO workbook (.xlsx/.xls)
        file: PathBuf,

        /// Only ids containing this text (case-insensitive)
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Show the PO fields of one site
    Lookup {
        /// PO workbook (.xlsx/.xls)
        file: PathBuf,

        /// Site/route id
        site_id: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Store the PO rows in the PO master table
    Upload {
        /// PO workbook (.xlsx/.xls)
        file: PathBuf,

        /// Hand the workbook to the parsing service instead of the store
        #[arg(long)]
        remote: bool,
    },

    /// Export the PO master table to a workbook
    Download {
        /// Destination file
        #[arg(short, long, default_value = "po_master.xlsx")]
        out: PathBuf,

        /// Fetch the parsing service's workbook instead of exporting the store
        #[arg(long)]
        remote: bool,
    },
}

/// Arguments for the reconcile command
#[derive(Args, Debug)]
pub struct ReconcileArgs {
    /// PO workbook
    #[arg(long)]
    pub po: PathBuf,

    /// Site/route id to take from the PO workbook
    #[arg(long)]
    pub site_id: String,

    /// DN application document
    #[arg(long)]
    pub application: PathBuf,

    /// Demand note document
    #[arg(long)]
    pub dn: PathBuf,

    /// Issuing authority (mcgm, mbmc, kdmc, nmmc, midc-type1, midc-type2)
    #[arg(long)]
    pub authority: Authority,

    /// Set an output field (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub set: Vec<String>,

    /// Allow --set on fields filled from documents, constants or calculations
    #[arg(long)]
    pub force: bool,

    /// Read the PO fields locally instead of through the parsing service
    #[arg(long)]
    pub local_po: bool,

    /// Upsert the reconciled row into the DN master table
    #[arg(long)]
    pub push: bool,

    /// Also send the reconciled row to the parsing service's DN master
    #[arg(long)]
    pub send: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the draft command
#[derive(Args, Debug)]
pub struct DraftArgs {
    /// DN master row to summarize
    #[arg(long)]
    pub dn_number: String,

    /// To recipients, comma-separated (default: email.to)
    #[arg(long)]
    pub to: Option<String>,

    /// Cc recipients, comma-separated (default: email.cc)
    #[arg(long)]
    pub cc: Option<String>,

    /// Subject line
    #[arg(long)]
    pub subject: Option<String>,

    /// Body placed above the summary table (HTML allowed, newlines become <br>)
    #[arg(long)]
    pub body: Option<String>,

    /// Create the draft instead of printing its payload
    #[arg(long)]
    pub send: bool,

    /// Environment variable holding the mail access token
    #[arg(long, default_value = "CE_MAIL_TOKEN")]
    pub token_env: String,
}

/// Arguments for the actual-cost command
#[derive(Args, Debug)]
pub struct ActualCostArgs {
    /// Issuing authority
    #[arg(long)]
    pub authority: Authority,

    /// Demand note documents
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Output workbooks a process run covers
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessKind {
    /// Non-refundable output
    NonRefundable,
    /// Security deposit output
    Sd,
    /// Both outputs (zipped when generated)
    All,
}

/// Arguments for the process command
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Issuing authority
    #[arg(long)]
    pub authority: Authority,

    /// Demand note document
    pub file: PathBuf,

    /// Which output to build
    #[arg(short, long, value_enum, default_value = "all")]
    pub kind: ProcessKind,

    /// Print the rows instead of generating the workbook
    #[arg(long)]
    pub preview: bool,

    /// Manual field of the non-refundable output (repeatable)
    #[arg(long = "manual", value_name = "FIELD=VALUE")]
    pub manual: Vec<String>,

    /// Manual field of the SD output (repeatable)
    #[arg(long = "sd-manual", value_name = "FIELD=VALUE")]
    pub sd_manual: Vec<String>,

    /// Destination file or directory (default: served file name in the current directory)
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,

    /// Preview output format
    #[arg(long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
