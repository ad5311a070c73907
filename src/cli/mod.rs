//! CLI module
//!
//! Command-line interface for querying and tailing logs.
//!
//! # Commands
//!
//! - `logs list` - List log groups
//! - `logs get` - Fetch (and optionally tail) one log group
//! - `logs search` - Fetch (and optionally tail) every matching log group
//! - `ddb list` - List tables
//! - `s3 list` - List buckets

mod commands;
mod runner;

pub use commands::{
    Cli, Commands, DdbCommand, GetEventsArgs, ListBucketsArgs, ListGroupsArgs, ListTablesArgs,
    LogsCommand, S3Command, SearchArgs,
};
pub use runner::Runner;
