//! Output module
//!
//! Renders records and listings for stdout.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Rendering records as pretty lines or JSON documents
//! - Rendering listings as aligned column tables or JSON arrays

mod record;
mod table;

pub use record::{render_record, OutputFormat};
pub use table::{Alignment, Column, Table};
