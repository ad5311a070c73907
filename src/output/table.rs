//! Column tables for listings

use super::OutputFormat;
use crate::error::Result;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Horizontal alignment of a column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Right,
}

/// One table column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Key used to look up cells and as the JSON field name
    pub key: String,
    /// Header shown in pretty output
    pub title: String,
    /// Hidden columns are left out of every format
    pub visible: bool,
    /// Cell alignment in pretty output
    pub align: Alignment,
}

impl Column {
    /// Create a visible, left-aligned column
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            visible: true,
            align: Alignment::Left,
        }
    }

    /// Set the alignment
    #[must_use]
    pub fn with_align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    /// Show or hide the column
    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// Rows of cells keyed by column
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<HashMap<String, String>>,
}

impl Table {
    /// Create an empty table with the given columns
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row. Cells for unknown keys are ignored; missing cells render empty.
    pub fn add_row<I, K, V>(&mut self, cells: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.rows
            .push(cells.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the whole table
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Pretty => Ok(self.render_pretty()),
            OutputFormat::Json => self.render_json(),
        }
    }

    fn visible(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.visible)
    }

    fn cell<'a>(row: &'a HashMap<String, String>, column: &Column) -> &'a str {
        row.get(&column.key).map_or("", String::as_str)
    }

    fn render_pretty(&self) -> String {
        let columns: Vec<&Column> = self.visible().collect();
        let widths: Vec<usize> = columns
            .iter()
            .map(|col| {
                self.rows
                    .iter()
                    .map(|row| Self::cell(row, col).chars().count())
                    .chain(std::iter::once(col.title.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let format_line = |cells: Vec<&str>| -> String {
            let padded: Vec<String> = cells
                .iter()
                .zip(columns.iter().zip(&widths))
                .map(|(cell, (col, &width))| match col.align {
                    Alignment::Left => format!("{cell:<width$}"),
                    Alignment::Right => format!("{cell:>width$}"),
                })
                .collect();
            padded.join("  ").trim_end().to_string()
        };

        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        lines.push(format_line(columns.iter().map(|c| c.title.as_str()).collect()));
        for row in &self.rows {
            lines.push(format_line(
                columns.iter().map(|c| Self::cell(row, c)).collect(),
            ));
        }
        lines.join("\n")
    }

    fn render_json(&self) -> Result<String> {
        let rows: Vec<Value> = self
            .rows
            .iter()
            .map(|row| {
                let object: Map<String, Value> = self
                    .visible()
                    .map(|col| (col.key.clone(), Value::String(Self::cell(row, col).to_string())))
                    .collect();
                Value::Object(object)
            })
            .collect();
        Ok(serde_json::to_string_pretty(&rows)?)
    }
}
