// Terminal presentation: result tables, dropdown listings, banners.

pub mod table;

use crate::domain::model::{SearchResults, SelectOption, SelectionField, SelectionState};
use crate::utils::error::Result;

pub use table::{render_csv, render_table};

pub const LOADING_INDICATOR: &str = "⏳ Searching...";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

pub fn render_results(results: &SearchResults, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(results)),
        OutputFormat::Csv => render_csv(results),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(results)?),
    }
}

pub fn error_banner(message: &str) -> String {
    format!("❌ {}", message)
}

/// 下拉選單內容，一行一個選項：`value  label`
pub fn render_options(field: SelectionField, options: &[SelectOption]) -> String {
    if options.is_empty() {
        return format!("No {} options available", field);
    }

    let width = options
        .iter()
        .map(|o| o.value.chars().count())
        .max()
        .unwrap_or(0);
    options
        .iter()
        .map(|o| format!("  {:<width$}  {}", o.value, o.label, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_selection(state: &SelectionState) -> String {
    let mut lines: Vec<String> = SelectionField::ALL
        .into_iter()
        .map(|field| {
            let value = state
                .get(field)
                .map(ToString::to_string)
                .unwrap_or_else(|| "-".to_string());
            format!("  {:<6} {}", field, value)
        })
        .collect();
    lines.push(format!(
        "  {:<6} {}",
        "entity",
        state
            .entity
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".to_string())
    ));
    lines.join("\n")
}
