//! CLI commands and argument parsing

use crate::console::DeviceFilter;
use crate::types::BackoffType;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Sync endpoint inventory with the management console
#[derive(Parser, Debug)]
#[command(name = "fleetsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Console API root
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Retries on transient HTTP statuses
    #[arg(long, global = true)]
    pub max_retries: Option<u32>,

    /// Seconds to wait before each retry
    #[arg(long, global = true)]
    pub retry_delay: Option<u64>,

    /// How the retry delay grows between attempts
    #[arg(long, global = true, value_enum)]
    pub backoff: Option<BackoffType>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Pace requests to at most this many per second
    #[arg(long, global = true)]
    pub requests_per_second: Option<u32>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Organization and API key, passed on every command
#[derive(Args, Debug, Clone)]
pub struct CredentialArgs {
    /// Organization ID
    pub org_id: String,

    /// API key
    pub api_key: String,
}

/// Device list filters
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only devices in this server group
    #[arg(long)]
    pub group_id: Option<i64>,

    /// Agent PowerShell version
    #[arg(long)]
    pub ps_version: Option<i64>,

    /// Devices with (1) or without (0) pending patches
    #[arg(long)]
    pub pending: Option<i64>,

    /// Only devices with available patches that are not installed
    #[arg(long)]
    pub missing_patches: bool,

    /// Only devices associated with this policy
    #[arg(long)]
    pub policy_id: Option<i64>,

    /// Devices excluded from (1) or included in (0) reports
    #[arg(long)]
    pub exception: Option<i64>,

    /// Managed state
    #[arg(long)]
    pub managed: Option<i64>,

    /// 1 = only compatible devices, 0 = everything
    #[arg(long)]
    pub compatible: Option<i64>,

    /// Column to sort by
    #[arg(long)]
    pub sort_column: Option<String>,

    /// Sort direction (asc or desc)
    #[arg(long)]
    pub sort_dir: Option<String>,
}

impl From<&FilterArgs> for DeviceFilter {
    fn from(args: &FilterArgs) -> Self {
        Self {
            group_id: args.group_id,
            ps_version: args.ps_version,
            pending: args.pending,
            missing_patches: args.missing_patches,
            policy_id: args.policy_id,
            exception: args.exception,
            managed: args.managed,
            compatible: args.compatible,
            sort_column: args.sort_column.clone(),
            sort_dir: args.sort_dir.clone(),
        }
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List devices, optionally filtered
    ListDevices {
        #[command(flatten)]
        credential: CredentialArgs,

        #[command(flatten)]
        filter: FilterArgs,

        /// Print only device names, one per line
        #[arg(long)]
        names_only: bool,
    },

    /// Move devices into the server groups named in a CSV file
    SyncGroups {
        #[command(flatten)]
        credential: CredentialArgs,

        /// CSV file with a header row
        csv_file: PathBuf,

        /// Column holding the device name
        #[arg(long, default_value = "Server")]
        device_column: String,

        /// Column holding the group name
        #[arg(long, default_value = "Current Schedule (IST)")]
        group_column: String,

        /// Show the planned changes without applying them
        #[arg(long)]
        dry_run: bool,
    },

    /// Set owner tags from a headerless CSV of hostname,owner rows
    SyncTags {
        #[command(flatten)]
        credential: CredentialArgs,

        /// CSV file without a header row
        csv_file: PathBuf,

        /// Column position of the hostname
        #[arg(long, default_value_t = 0)]
        hostname_column: usize,

        /// Column position of the owner
        #[arg(long, default_value_t = 1)]
        owner_column: usize,

        /// Prefix of owner tags
        #[arg(long, default_value = "Owner-")]
        tag_prefix: String,

        /// Show the planned changes without applying them
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete duplicate devices that have been disconnected for a while
    RemoveDuplicates {
        #[command(flatten)]
        credential: CredentialArgs,

        /// Minimum minutes a duplicate must have been disconnected
        #[arg(long, default_value_t = 10)]
        disconnected_minutes: i64,

        /// Show the planned removals without applying them
        #[arg(long)]
        dry_run: bool,
    },
}
