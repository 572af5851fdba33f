use std::io::IsTerminal;

use serde::Serialize;

use crate::cli::OutputFormat;

pub mod table;

/// One titled table in the `table` output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub title: Option<String>,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    pub footer: Option<String>,
}

/// Values that know how to lay themselves out as tables.
pub trait Tabulate {
    fn tables(&self) -> Vec<Table>;
}

/// Render a response to a string in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render<T: Serialize + Tabulate>(
    value: &T,
    format: OutputFormat,
    options: table::TableOptions,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
        OutputFormat::Table => Ok(render_tables(&value.tables(), options)),
    }
}

/// Print a response to stdout in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn output<T: Serialize + Tabulate>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format, terminal_options())?;
    println!("{rendered}");
    Ok(())
}

fn render_tables(tables: &[Table], options: table::TableOptions) -> String {
    tables
        .iter()
        .map(|t| {
            let mut block = String::new();
            if let Some(title) = &t.title {
                block.push_str(title);
                block.push('\n');
            }
            if t.rows.is_empty() {
                block.push_str("(no rows)");
            } else {
                block.push_str(&table::render_aligned(&t.headers, &t.rows, options));
            }
            if let Some(footer) = &t.footer {
                block.push('\n');
                block.push_str(footer);
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Width from `COLUMNS` and color only on an interactive stdout without `NO_COLOR`.
fn terminal_options() -> table::TableOptions {
    let stdout = std::io::stdout();
    table::TableOptions {
        max_width: std::env::var("COLUMNS")
            .ok()
            .and_then(|value| value.parse().ok()),
        color: stdout.is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}
