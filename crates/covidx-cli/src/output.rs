//! Output formatting for CLI commands.

use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell as TableCell, Color, ContentArrangement, Table};
use covidx_core::{Cell, IndexSpecProperties, IndexUpdate};
use serde_json::{json, Value};

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Renders bytes as text when printable, `0x`-prefixed hex otherwise.
pub fn render_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) if !text.chars().any(char::is_control) => text.to_string(),
        _ => format!("0x{}", hex::encode(bytes)),
    }
}

fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        header
            .iter()
            .map(|name| TableCell::new(name).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    table
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn null_marker(value: &[u8]) -> String {
    if value.is_empty() {
        "(null)".to_string()
    } else {
        render_bytes(value)
    }
}

/// Prints decoded slots and the primary key.
pub fn print_decoded<V: AsRef<[u8]>>(
    values: &[V],
    primary_key: &[u8],
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&json!({
            "primary_key": render_bytes(primary_key),
            "slots": values.iter().map(|v| render_bytes(v.as_ref())).collect::<Vec<_>>(),
            "all_null": values.iter().all(|v| v.as_ref().is_empty()),
        })),
        OutputFormat::Table => {
            println!("{} {}", "Primary key:".bold(), render_bytes(primary_key));
            let mut table = table(&["slot", "length", "value"]);
            for (index, value) in values.iter().enumerate() {
                let value: &[u8] = value.as_ref();
                table.add_row(vec![
                    TableCell::new(index),
                    TableCell::new(value.len()),
                    TableCell::new(null_marker(value)),
                ]);
            }
            println!("{table}");
            Ok(())
        }
    }
}

/// Prints an index specification property map.
pub fn print_properties(properties: &IndexSpecProperties, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&serde_json::to_value(properties)?),
        OutputFormat::Table => {
            if properties.is_empty() {
                println!("{}", "No column groups configured.".dimmed());
                return Ok(());
            }
            for (key, value) in properties {
                println!("{key}={value}");
            }
            Ok(())
        }
    }
}

/// Prints index updates.
pub fn print_updates(updates: &[IndexUpdate], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let rendered: Vec<Value> = updates.iter().map(update_json).collect();
            print_json(&Value::Array(rendered))
        }
        OutputFormat::Table => {
            if updates.is_empty() {
                println!("{}", "No index updates.".dimmed());
                return Ok(());
            }
            let mut table = table(&["op", "table", "row", "timestamp", "columns"]);
            for update in updates {
                let (op, timestamp, columns) = match update {
                    IndexUpdate::Put { write, .. } => (
                        "PUT".green().to_string(),
                        write.timestamp,
                        write
                            .columns
                            .iter()
                            .map(|c| render_bytes(&c.qualifier))
                            .collect::<Vec<_>>()
                            .join(", "),
                    ),
                    IndexUpdate::Delete { timestamp, .. } => {
                        ("DELETE".red().to_string(), *timestamp, "-".to_string())
                    }
                };
                table.add_row(vec![
                    TableCell::new(op),
                    TableCell::new(update.table()),
                    TableCell::new(render_bytes(update.row())),
                    TableCell::new(timestamp),
                    TableCell::new(columns),
                ]);
            }
            println!("{table}");
            Ok(())
        }
    }
}

fn update_json(update: &IndexUpdate) -> Value {
    match update {
        IndexUpdate::Put { table, write } => json!({
            "op": "put",
            "table": table,
            "row": hex::encode(&write.row),
            "family": render_bytes(&write.family),
            "timestamp": write.timestamp,
            "columns": write.columns.iter().map(|c| hex::encode(&c.qualifier)).collect::<Vec<_>>(),
        }),
        IndexUpdate::Delete {
            table,
            row,
            timestamp,
        } => json!({
            "op": "delete",
            "table": table,
            "row": hex::encode(row),
            "timestamp": timestamp,
        }),
    }
}

/// Prints visible cells.
pub fn print_cells(cells: &[Cell], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&json!(cells
            .iter()
            .map(|cell| json!({
                "family": render_bytes(&cell.family),
                "qualifier": render_bytes(&cell.qualifier),
                "timestamp": cell.timestamp,
                "value": render_bytes(&cell.value),
            }))
            .collect::<Vec<_>>())),
        OutputFormat::Table => {
            if cells.is_empty() {
                println!("{}", "No visible cells.".dimmed());
                return Ok(());
            }
            let mut table = table(&["family", "qualifier", "timestamp", "value"]);
            for cell in cells {
                table.add_row(vec![
                    TableCell::new(render_bytes(&cell.family)),
                    TableCell::new(render_bytes(&cell.qualifier)),
                    TableCell::new(cell.timestamp),
                    TableCell::new(render_bytes(&cell.value)),
                ]);
            }
            println!("{table}");
            Ok(())
        }
    }
}
