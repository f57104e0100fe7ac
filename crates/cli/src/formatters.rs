//! Output formatters for CLI commands.
//!
//! Responsibilities:
//! - Render derived keys and resolved values as a table or as JSON.
//!
//! Does NOT handle:
//! - Direct printing to stdout (returns formatted strings).
//!
//! Invariants:
//! - Tables use tab-separation for consistent alignment in standard terminals.
//! - JSON output is always a valid array, even when empty.
//! - Flags with no resolved values show `N/A` in tables and `[]` in JSON.

use anyhow::Result;
use serde::Serialize;

/// Placeholder for flags that resolved to nothing.
pub const DEFAULT_MISSING_VALUE: &str = "N/A";

/// A flag name and the key derived from it.
#[derive(Debug, Clone, Serialize)]
pub struct KeyRow {
    pub name: String,
    pub key: String,
}

/// A flag name, its key, and every value assigned from that key.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedRow {
    pub name: String,
    pub key: String,
    pub values: Vec<String>,
}

/// Output format selected with `--output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
}

impl OutputFormat {
    /// Parse from string.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            _ => anyhow::bail!("Invalid output format: {}. Valid options: json, table", s),
        }
    }
}

pub trait Formatter {
    fn format_keys(&self, rows: &[KeyRow]) -> Result<String>;
    fn format_resolved(&self, rows: &[ResolvedRow]) -> Result<String>;
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_keys(&self, rows: &[KeyRow]) -> Result<String> {
        Ok(serde_json::to_string_pretty(rows)?)
    }

    fn format_resolved(&self, rows: &[ResolvedRow]) -> Result<String> {
        Ok(serde_json::to_string_pretty(rows)?)
    }
}

/// Table formatter.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_keys(&self, rows: &[KeyRow]) -> Result<String> {
        let mut output = String::from("NAME\tKEY\n");
        for row in rows {
            output.push_str(&format!("{}\t{}\n", row.name, display_key(&row.key)));
        }
        Ok(output)
    }

    fn format_resolved(&self, rows: &[ResolvedRow]) -> Result<String> {
        let mut output = String::from("NAME\tKEY\tVALUES\n");
        for row in rows {
            let values = if row.values.is_empty() {
                DEFAULT_MISSING_VALUE.to_string()
            } else {
                row.values.join(", ")
            };
            output.push_str(&format!(
                "{}\t{}\t{}\n",
                row.name,
                display_key(&row.key),
                values
            ));
        }
        Ok(output)
    }
}

/// Empty keys mean the flag is never looked up.
fn display_key(key: &str) -> &str {
    if key.is_empty() {
        DEFAULT_MISSING_VALUE
    } else {
        key
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Table => Box::new(TableFormatter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved() -> Vec<ResolvedRow> {
        vec![
            ResolvedRow {
                name: "peer".to_string(),
                key: "APP_PEER".to_string(),
                values: vec!["a:1".to_string(), "b:2".to_string()],
            },
            ResolvedRow {
                name: "timeout".to_string(),
                key: "APP_TIMEOUT".to_string(),
                values: Vec::new(),
            },
        ]
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("table").unwrap(), OutputFormat::Table);
        assert!(OutputFormat::parse("xml").is_err());
    }

    #[test]
    fn test_table_resolved_marks_missing_values() {
        let output = TableFormatter.format_resolved(&resolved()).unwrap();
        assert_eq!(
            output,
            "NAME\tKEY\tVALUES\npeer\tAPP_PEER\ta:1, b:2\ntimeout\tAPP_TIMEOUT\tN/A\n"
        );
    }

    #[test]
    fn test_json_resolved_is_array() {
        let output = JsonFormatter.format_resolved(&resolved()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["values"], serde_json::json!(["a:1", "b:2"]));
        assert_eq!(parsed[1]["values"], serde_json::json!([]));

        let empty = JsonFormatter.format_keys(&[]).unwrap();
        assert_eq!(empty, "[]");
    }

    #[test]
    fn test_table_keys_marks_empty_key() {
        let rows = [KeyRow {
            name: "x".to_string(),
            key: String::new(),
        }];
        let output = TableFormatter.format_keys(&rows).unwrap();
        assert_eq!(output, "NAME\tKEY\nx\tN/A\n");
    }
}
