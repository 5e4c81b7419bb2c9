use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "macprov")]
#[command(author, version, long_about = None)]
#[command(about = "Bulk-provision client device policies by MAC address")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Dashboard API key (overrides config and environment)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Dashboard API base URL
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Select an organization and networks, then apply the CSV's policies
    Provision {
        /// CSV file of `mac,status` rows (header row required)
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,

        /// Organization id or 1-based index; skips the organization prompt
        #[arg(long, value_name = "ID|INDEX")]
        org: Option<String>,

        /// Network indices (`1,3`) or `0` for all; skips the network prompt
        #[arg(long, value_name = "LIST")]
        networks: Option<String>,

        /// Resolve and print payloads without sending them
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate the CSV offline and summarise the plan
    Check {
        /// CSV file of `mac,status` rows (header row required)
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,
    },

    /// List Dashboard resources
    List {
        #[command(subcommand)]
        resource: ListResource,
    },
}

#[derive(Subcommand)]
pub enum ListResource {
    /// Organizations visible to the API key
    Organizations,

    /// Networks of an organization
    Networks {
        /// Organization id
        #[arg(long)]
        org: String,
    },

    /// Group policies of a network
    Policies {
        /// Network id
        #[arg(long)]
        network: String,
    },
}
