use crate::domain::model::{ContactRow, SearchResults};
use crate::utils::error::{DirectoryError, Result};

fn heading(results: &SearchResults) -> String {
    format!(
        "Search results for {}, function {}",
        results.entity.label, results.function.label
    )
}

/// 表格欄數：至少七欄，後端多給的欄位照樣顯示
fn column_count(rows: &[ContactRow]) -> usize {
    rows.iter()
        .map(|row| row.cells().len())
        .max()
        .unwrap_or(0)
        .max(ContactRow::HEADERS.len())
}

fn header_cells(columns: usize) -> Vec<&'static str> {
    (0..columns)
        .map(|i| ContactRow::HEADERS.get(i).copied().unwrap_or(""))
        .collect()
}

pub fn render_table(results: &SearchResults) -> String {
    let columns = column_count(&results.rows);
    let headers = header_cells(columns);

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &results.rows {
        for (i, cell) in row.cells().iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let format_line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![heading(results), String::new()];
    lines.push(format_line(headers));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );

    if results.rows.is_empty() {
        lines.push("(no contacts found)".to_string());
    }
    for row in &results.rows {
        let cells = (0..columns).map(|i| row.cell(i).unwrap_or("")).collect();
        lines.push(format_line(cells));
    }

    lines.join("\n")
}

pub fn render_csv(results: &SearchResults) -> Result<String> {
    let columns = column_count(&results.rows);
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(header_cells(columns))?;
    for row in &results.rows {
        writer.write_record((0..columns).map(|i| row.cell(i).unwrap_or("")))?;
    }

    let data = writer
        .into_inner()
        .map_err(|e| DirectoryError::IoError(e.into_error()))?;
    String::from_utf8(data).map_err(|e| DirectoryError::ConfigError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}
