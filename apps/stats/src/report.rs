//! Renders the full text report. Nothing is printed here: the caller gets the
//! finished string so a failure never leaves half a report on stdout.

use std::fmt::Write;

use thiserror::Error;

use crate::output::{create_table, format_float, number_cell};
use crate::stats::{
    department_salary, dtype_counts, summarize_categorical, summarize_numeric, GroupRow, StatsError,
};
use crate::table::Table;

pub const HEAD_ROWS: usize = 5;
const RULE_WIDTH: usize = 50;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Stats(#[from] StatsError),
}

pub fn render(table: &Table) -> Result<String, ReportError> {
    // Aggregates first so a bad salary column fails before any text exists.
    let groups = department_salary(table)?;

    let mut out = String::new();
    let rule = "=".repeat(RULE_WIDTH);
    let thin = "-".repeat(30);

    writeln!(out, "\n{rule}\nDATA PROCESSING REPORT\n{rule}").ok();
    writeln!(
        out,
        "\nDataset Shape: {} rows × {} columns",
        table.rows,
        table.columns.len()
    )
    .ok();

    writeln!(out, "\nFirst {HEAD_ROWS} rows:\n{}", head(table)).ok();
    writeln!(out, "\nColumn Information:\n{}", info(table)).ok();
    writeln!(out, "\nBasic Statistics:\n{}", describe(table)).ok();

    writeln!(out, "\nAdditional Analysis:\n{thin}").ok();
    for column in &table.columns {
        if column.dtype.is_numeric() {
            let Some(s) = summarize_numeric(&column.numbers()) else {
                continue;
            };
            writeln!(out, "\nColumn: {}", column.name).ok();
            writeln!(out, "   Mean: {}", format_float(s.mean, 2)).ok();
            writeln!(out, "   Median: {}", format_float(s.median, 2)).ok();
            writeln!(out, "   Min: {}", format_float(s.min, 2)).ok();
            writeln!(out, "   Max: {}", format_float(s.max, 2)).ok();
            writeln!(out, "   Std Dev: {}", format_float(s.std, 2)).ok();
        } else {
            let s = summarize_categorical(&column.cells);
            writeln!(out, "\nColumn: {}", column.name).ok();
            writeln!(out, "   Type: Categorical").ok();
            writeln!(out, "   Unique values: {}", s.unique).ok();
            writeln!(out, "   Top value: {}", s.top.as_deref().unwrap_or("N/A")).ok();
        }
    }

    if let Some(groups) = groups {
        writeln!(out, "\nDepartment-wise Analysis:\n{thin}\n{}", group_table(&groups)).ok();
    }

    writeln!(out, "\n{rule}\nProcessing Complete!\n{rule}").ok();
    Ok(out)
}

fn head(table: &Table) -> String {
    let mut t = create_table();
    let mut header = vec![String::new()];
    header.extend(table.columns.iter().map(|c| c.name.clone()));
    t.set_header(header);

    for row in 0..table.rows.min(HEAD_ROWS) {
        let mut cells = vec![number_cell(row.to_string())];
        for column in &table.columns {
            let value = column.cells[row].as_deref().unwrap_or("NaN");
            cells.push(if column.dtype.is_numeric() {
                number_cell(value)
            } else {
                comfy_table::Cell::new(value)
            });
        }
        t.add_row(cells);
    }
    t.to_string()
}

fn info(table: &Table) -> String {
    let mut t = create_table();
    t.set_header(vec!["#", "Column", "Non-Null Count", "Dtype"]);
    for (i, column) in table.columns.iter().enumerate() {
        t.add_row(vec![
            number_cell(i.to_string()),
            comfy_table::Cell::new(&column.name),
            number_cell(format!("{} non-null", column.non_null())),
            comfy_table::Cell::new(column.dtype.to_string()),
        ]);
    }
    let dtypes = dtype_counts(table)
        .into_iter()
        .map(|(d, n)| format!("{d}({n})"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "RangeIndex: {} entries\n{t}\ndtypes: {dtypes}",
        table.rows
    )
}

fn describe(table: &Table) -> String {
    let summaries: Vec<_> = table
        .numeric_columns()
        .filter_map(|c| summarize_numeric(&c.numbers()).map(|s| (c.name.clone(), s)))
        .collect();
    if summaries.is_empty() {
        return "(no numeric columns)".to_string();
    }

    let mut t = create_table();
    let mut header = vec![String::new()];
    header.extend(summaries.iter().map(|(name, _)| name.clone()));
    t.set_header(header);

    let rows: [(&str, fn(&crate::stats::NumericSummary) -> f64); 8] = [
        ("count", |s| s.count as f64),
        ("mean", |s| s.mean),
        ("std", |s| s.std),
        ("min", |s| s.min),
        ("25%", |s| s.q25),
        ("50%", |s| s.median),
        ("75%", |s| s.q75),
        ("max", |s| s.max),
    ];
    for (label, pick) in rows {
        let mut cells = vec![comfy_table::Cell::new(label)];
        cells.extend(
            summaries
                .iter()
                .map(|(_, s)| number_cell(format_float(pick(s), 6))),
        );
        t.add_row(cells);
    }
    t.to_string()
}

fn group_table(groups: &[GroupRow]) -> String {
    let mut t = create_table();
    t.set_header(vec!["department", "Avg Salary", "Median Salary", "Employee Count"]);
    for g in groups {
        t.add_row(vec![
            comfy_table::Cell::new(&g.key),
            number_cell(format_float(g.mean, 2)),
            number_cell(format_float(g.median, 2)),
            number_cell(g.count.to_string()),
        ]);
    }
    t.to_string()
}
