//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse command-line arguments and environment variables.
//!
//! Non-responsibilities:
//! - Does not execute commands (see the command modules).
//! - Does not load `.env` (done in `main` before parsing).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ssrs-cli")]
#[command(about = "Manage a SQL Server Reporting Services server from the command line", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  ssrs-cli list /Reports --recursive\n  ssrs-cli render /Reports/Revenue --format pdf -p Region=East -o revenue.pdf\n  ssrs-cli upload ./reports /Reports/Demo --overwrite --fix-references\n  ssrs-cli download /Reports ./backup\n  ssrs-cli jobs --cancel jh3gq2vaf5crlnkk2y55dd45\n"
)]
pub struct Cli {
    /// Base URL of the report server (e.g., http://reports/ReportServer)
    #[arg(short = 'u', long, global = true, env = "SSRS_URL")]
    pub url: Option<String>,

    /// Username for authentication
    #[arg(long, global = true, env = "SSRS_USERNAME")]
    pub username: Option<String>,

    /// Password for authentication
    #[arg(long, global = true, env = "SSRS_PASSWORD")]
    pub password: Option<String>,

    /// Windows domain for the credentials
    #[arg(long, global = true, env = "SSRS_DOMAIN")]
    pub domain: Option<String>,

    /// Catalog folder that relative paths are resolved against
    #[arg(long, global = true, env = "SSRS_ROOT_FOLDER")]
    pub root_folder: Option<String>,

    /// Connection timeout in seconds
    #[arg(long, global = true, env = "SSRS_TIMEOUT_SECS")]
    pub timeout: Option<u64>,

    /// Skip TLS certificate verification (for self-signed certificates)
    #[arg(long, global = true, env = "SSRS_SKIP_VERIFY")]
    pub skip_verify: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List catalog items under a folder
    List {
        /// Folder path
        #[arg(default_value = "/")]
        folder: String,

        /// Recurse into subfolders
        #[arg(short, long)]
        recursive: bool,

        /// Include hidden items and non-report types
        #[arg(short, long)]
        all: bool,
    },

    /// Render a report to a file
    Render {
        /// Report path
        report: String,

        /// Render format (pdf, excel, word, html5, csv, ...)
        #[arg(short, long)]
        format: Option<String>,

        /// Report parameter, repeatable (name=value; omit the value for null)
        #[arg(short = 'p', long = "param", value_name = "NAME=VALUE")]
        params: Vec<String>,

        /// Output file (defaults to the report name plus the server's
        /// suggested extension)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Fail on missing required parameters before contacting the server
        #[arg(long)]
        strict: bool,
    },

    /// Upload a local folder tree into the catalog
    Upload {
        /// Local directory
        source: PathBuf,

        /// Target catalog folder
        target: String,

        /// Overwrite existing items
        #[arg(long)]
        overwrite: bool,

        /// Delete existing items under the target folder first
        #[arg(long)]
        delete_existing: bool,

        /// With --delete-existing, keep existing shared data sources
        #[arg(long)]
        keep_data_sources: bool,

        /// Rebind uploaded reports to the uploaded data sources
        #[arg(long)]
        fix_references: bool,

        /// Relative path to skip, repeatable
        #[arg(long = "exclude", value_name = "PATH")]
        exclude: Vec<String>,
    },

    /// Download catalog subtrees to a local directory
    Download {
        /// Catalog folders
        #[arg(required = true, num_args = 1..)]
        folders: Vec<String>,

        /// Local directory to write into
        #[arg(long, short, default_value = ".")]
        target: PathBuf,
    },

    /// Rebind the reports under a folder to the data sources in the same subtree
    FixRefs {
        /// Catalog folder
        folder: String,
    },

    /// List or cancel server jobs
    Jobs {
        /// Cancel the job with this id instead of listing
        #[arg(long, value_name = "JOB_ID")]
        cancel: Option<String>,
    },

    /// List the server's rendering extensions
    Extensions,
}
