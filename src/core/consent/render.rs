//! Plain-text grid tables for previews
//!
//! ```text
//! +----+------------------+
//! | id | email            |
//! +====+==================+
//! | 1  | j**n@example.com |
//! +----+------------------+
//! ```

use crate::core::pipeline::AnonymizedRow;
use crate::domain::SqlValue;

/// Render `headers` and `rows` as a grid; widths count characters
pub fn grid(headers: &[String], rows: &[Vec<String>]) -> String {
    let columns = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(columns) {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let rule = |fill: char| {
        let mut line = String::from("+");
        for width in &widths {
            line.extend(std::iter::repeat(fill).take(width + 2));
            line.push('+');
        }
        line
    };
    let line = |cells: &[String]| {
        let mut line = String::from("|");
        for (idx, width) in widths.iter().enumerate() {
            let cell = cells.get(idx).map(String::as_str).unwrap_or("");
            let pad = width - cell.chars().count();
            line.push(' ');
            line.push_str(cell);
            line.extend(std::iter::repeat(' ').take(pad + 1));
            line.push('|');
        }
        line
    };

    let mut out = vec![rule('-'), line(headers), rule('=')];
    for row in rows {
        out.push(line(row));
        out.push(rule('-'));
    }
    if rows.is_empty() {
        out.pop();
        out.push(rule('-'));
    }
    out.join("\n")
}

fn cell(value: &SqlValue) -> String {
    value.to_string()
}

/// Original and anonymized values of one row, one line each
pub fn sample_table(primary_key: &str, row: &AnonymizedRow) -> String {
    let mut headers = vec![String::new(), primary_key.to_string()];
    headers.extend(row.original_values.column_names().map(str::to_string));

    let key = cell(&row.primary_key_value);
    let line = |label: &str, values: &crate::domain::Row| {
        let mut cells = vec![label.to_string(), key.clone()];
        cells.extend(values.iter().map(|(_, v)| cell(v)));
        cells
    };

    grid(
        &headers,
        &[
            line("Original", &row.original_values),
            line("Anonymized", &row.new_values),
        ],
    )
}

/// Anonymized values of up to `limit` rows
pub fn preview_table(primary_key: &str, columns: &[String], rows: &[AnonymizedRow], limit: usize) -> String {
    let mut headers = vec![primary_key.to_string()];
    headers.extend(columns.iter().cloned());

    let body: Vec<Vec<String>> = rows
        .iter()
        .take(limit)
        .map(|row| {
            std::iter::once(cell(&row.primary_key_value))
                .chain(row.new_values.iter().map(|(_, v)| cell(v)))
                .collect()
        })
        .collect();

    grid(&headers, &body)
}
