//! Record line rendering

use crate::error::Result;
use crate::types::Record;
use chrono::SecondsFormat;
use clap::ValueEnum;

/// How records and listings are written to stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines and aligned tables
    #[default]
    Pretty,
    /// One JSON document per record, JSON arrays for listings
    Json,
}

/// Render one record as a single output line (without trailing newline)
pub fn render_record(record: &Record, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(record)?),
        OutputFormat::Pretty => {
            let when = record.timestamp().map_or_else(
                || record.timestamp_millis.to_string(),
                |ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true),
            );
            Ok(format!(
                "{} {} {}",
                record.source_id,
                when,
                record.payload.trim_matches([' ', '\n'])
            ))
        }
    }
}
