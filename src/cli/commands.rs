//! CLI commands and argument parsing

use crate::output::OutputFormat;
use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Query, search and tail log groups from the command line
#[derive(Parser, Debug)]
#[command(name = "logscope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true, env = "LOGSCOPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Profile to use from the configuration file
    #[arg(long, global = true, env = "LOGSCOPE_PROFILE")]
    pub profile: Option<String>,

    /// Service endpoint, overriding the profile
    #[arg(long, global = true, env = "LOGSCOPE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log group commands
    Logs {
        #[command(subcommand)]
        command: LogsCommand,
    },

    /// Table commands
    Ddb {
        #[command(subcommand)]
        command: DdbCommand,
    },

    /// Bucket commands
    S3 {
        #[command(subcommand)]
        command: S3Command,
    },
}

/// `logs` subcommands
#[derive(Subcommand, Debug)]
pub enum LogsCommand {
    /// List log groups
    List(ListGroupsArgs),

    /// Get the events of one log group
    Get(GetEventsArgs),

    /// Search the events of every log group matching a name filter
    Search(SearchArgs),
}

/// `ddb` subcommands
#[derive(Subcommand, Debug)]
pub enum DdbCommand {
    /// List tables
    List(ListTablesArgs),
}

/// `s3` subcommands
#[derive(Subcommand, Debug)]
pub enum S3Command {
    /// List buckets
    List(ListBucketsArgs),
}

/// Arguments for `logs list`
#[derive(Args, Debug)]
pub struct ListGroupsArgs {
    /// Fetch every log group
    #[arg(short, long, conflicts_with = "limit")]
    pub all: bool,

    /// Limit the number of groups to fetch (negative = unbounded)
    #[arg(short, long, allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// Pattern filter on log group name
    #[arg(short = 'e', long, conflicts_with = "prefix")]
    pub pattern: Option<String>,

    /// Prefix filter on log group name
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Show log group ARNs
    #[arg(long)]
    pub arn: bool,

    /// Show log group retention
    #[arg(long)]
    pub retention: bool,

    /// Show log group streams
    #[arg(long)]
    pub streams: bool,
}

/// Arguments for `logs get`
#[derive(Args, Debug)]
pub struct GetEventsArgs {
    /// Log group name
    pub group: String,

    /// Fetch every matching event
    #[arg(short, long, conflicts_with = "limit")]
    pub all: bool,

    /// Limit the number of events to fetch (negative = unbounded)
    #[arg(short, long, allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// Pattern filter on log events
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Start of the window, absolute or relative to now
    #[arg(long, default_value = "1d")]
    pub since: String,

    /// End of the window, absolute or relative to now
    #[arg(long, default_value = "0s")]
    pub until: String,

    /// Keep streaming new events after the historical fetch
    #[arg(short, long)]
    pub tail: bool,
}

/// Arguments for `logs search`
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("group_filter").required(true).args(["pattern", "prefix"])))]
pub struct SearchArgs {
    /// Pattern filter on log group name
    #[arg(short = 'e', long)]
    pub pattern: Option<String>,

    /// Prefix filter on log group name
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Search every matching group
    #[arg(long, conflicts_with = "limit_groups")]
    pub all_groups: bool,

    /// Limit the number of groups to search (negative = unbounded)
    #[arg(long, allow_negative_numbers = true)]
    pub limit_groups: Option<i64>,

    /// Fetch every matching event from each group
    #[arg(short, long, conflicts_with = "limit")]
    pub all: bool,

    /// Limit the number of events fetched from each group (negative = unbounded)
    #[arg(short, long, allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// Pattern filter on log events
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Start of the window, absolute or relative to now
    #[arg(long, default_value = "1d")]
    pub since: String,

    /// End of the window, absolute or relative to now
    #[arg(long)]
    pub until: Option<String>,

    /// Keep streaming new events after the historical fetch
    #[arg(short, long)]
    pub tail: bool,

    /// Number of groups fetched at the same time
    #[arg(long)]
    pub max_par: Option<usize>,
}

/// Arguments for `ddb list`
#[derive(Args, Debug)]
pub struct ListTablesArgs {
    /// Fetch every table
    #[arg(short, long, conflicts_with = "limit")]
    pub all: bool,

    /// Limit the number of tables to fetch (negative = unbounded)
    #[arg(short, long, allow_negative_numbers = true)]
    pub limit: Option<i64>,
}

/// Arguments for `s3 list`
#[derive(Args, Debug)]
pub struct ListBucketsArgs {
    /// Fetch every bucket
    #[arg(short, long, conflicts_with = "limit")]
    pub all: bool,

    /// Limit the number of buckets to fetch (negative = unbounded)
    #[arg(short, long, allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// Only list buckets in this region
    #[arg(short, long)]
    pub region: Option<String>,
}
