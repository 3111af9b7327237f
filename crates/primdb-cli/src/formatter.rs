//! Output formatting for statement results.
//!
//! Supports table, JSON, and CSV output for `select` results. Every other
//! result prints its message.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Error};
use comfy_table::{Cell, ContentArrangement, Table};

use primdb_engine::{row_count_line, RowList, StatementResult};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Formatted table output.
    Table,
    /// JSON output.
    Json,
    /// CSV output.
    Csv,
}

impl OutputFormat {
    /// Returns the format name.
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => bail!("unknown format '{}'. Available: table, json, csv", other),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formats a statement result according to the specified format.
pub fn format_result(result: &StatementResult, format: OutputFormat) -> String {
    match result.as_rows() {
        Some((columns, rows)) => format_rows(columns, rows, format),
        None => result.display(),
    }
}

/// Formats rows in column order.
pub fn format_rows(columns: &[String], rows: &RowList, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => format_table(columns, rows),
        OutputFormat::Json => format_json(rows),
        OutputFormat::Csv => format_csv(columns, rows),
    }
}

fn cells(columns: &[String], rows: &RowList) -> Vec<Vec<String>> {
    rows.iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| record.get(column).map(ToString::to_string).unwrap_or_default())
                .collect()
        })
        .collect()
}

/// Formats the rows as a table.
fn format_table(columns: &[String], rows: &RowList) -> String {
    let mut table = Table::new();

    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);

    table.set_header(columns.iter().map(Cell::new));
    for row in cells(columns, rows) {
        table.add_row(row.into_iter().map(Cell::new));
    }

    format!("{}\n{}", table, row_count_line(rows.len()))
}

/// Formats the rows as a JSON array, in the same shape as the row files.
fn format_json(rows: &RowList) -> String {
    serde_json::to_string_pretty(rows).unwrap_or_else(|_| "[]".to_string())
}

/// Formats the rows as CSV.
fn format_csv(columns: &[String], rows: &RowList) -> String {
    let mut output = String::new();

    let header: Vec<String> = columns.iter().map(|c| escape_csv(c)).collect();
    output.push_str(&header.join(","));
    output.push('\n');

    for row in cells(columns, rows) {
        let values: Vec<String> = row.iter().map(|v| escape_csv(v)).collect();
        output.push_str(&values.join(","));
        output.push('\n');
    }

    output
}

/// Escapes a value for CSV output.
fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
