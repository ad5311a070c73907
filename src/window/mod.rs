//! Time window parsing
//!
//! Query windows accept either an absolute timestamp or a duration relative
//! to now.
//!
//! # Formats
//!
//! - Absolute: `2024-01-31`, `2024-01-31T12:00:00`, `2024-01-31T12:00:00+0200`
//! - Relative: repeated `<integer><unit>` tokens with unit `s`, `m`, `h`, `d`
//!   or `w`, e.g. `1d`, `2h30m`

mod parse;

pub use parse::{parse_datetime, parse_duration, resolve_instant, TimeWindow};
