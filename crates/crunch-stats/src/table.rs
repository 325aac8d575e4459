//! Comparison tables in plain text, LaTeX and CSV.

use std::fmt;
use std::str::FromStr;

use crunch_core::{CrunchError, ErrorInfo};
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};

use crate::summary::Summary;

const COLUMNS: [&str; 4] = ["Avg", "Max", "Stdev", "Sum"];

/// One algorithm's local and remote summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Algorithm name.
    pub name: String,
    /// Local operation timings.
    pub local: Summary,
    /// Remote operation timings.
    pub remote: Summary,
}

/// All algorithms measured on one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Dataset name.
    pub dataset: String,
    /// Rows in configuration order.
    pub rows: Vec<Row>,
}

/// Output format of [`render_tables`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    /// Column aligned text.
    #[default]
    Plain,
    /// A `tabular` environment.
    Latex,
    /// One CSV document with a leading dataset column.
    Csv,
}

impl FromStr for TableFormat {
    type Err = CrunchError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "plain" => Ok(TableFormat::Plain),
            "latex" => Ok(TableFormat::Latex),
            "csv" => Ok(TableFormat::Csv),
            other => Err(CrunchError::Input(
                ErrorInfo::new("unknown-format", format!("no table format named '{other}'"))
                    .with_hint("expected one of: plain, latex, csv"),
            )),
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TableFormat::Plain => "plain",
            TableFormat::Latex => "latex",
            TableFormat::Csv => "csv",
        })
    }
}

fn header() -> Vec<String> {
    let mut cells = vec!["Name".to_string()];
    for side in ["Local", "Remote"] {
        cells.extend(COLUMNS.iter().map(|column| format!("{side} {column}")));
    }
    cells
}

fn cells(row: &Row) -> Vec<String> {
    let mut cells = vec![row.name.clone()];
    for summary in [&row.local, &row.remote] {
        cells.extend(summary.columns().iter().map(|value| format!("{value:.2}")));
    }
    cells
}

impl Table {
    fn plain(&self) -> String {
        let header = header();
        let body: Vec<Vec<String>> = self.rows.iter().map(cells).collect();
        let widths: Vec<usize> = (0..header.len())
            .map(|col| {
                body.iter()
                    .map(|row| row[col].chars().count())
                    .chain([header[col].chars().count()])
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        let line = |row: &[String]| {
            row.iter()
                .zip(&widths)
                .enumerate()
                .map(|(col, (cell, width))| {
                    if col == 0 {
                        format!("{cell:<width$}")
                    } else {
                        format!("{cell:>width$}")
                    }
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };
        let rule = widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  ");
        let mut out = vec![line(&header), rule];
        out.extend(body.iter().map(|row| line(row)));
        out.join("\n") + "\n"
    }

    fn latex(&self) -> String {
        let header = header();
        let spec = format!("l{}", "r".repeat(header.len() - 1));
        let row = |cells: Vec<String>| {
            let escaped: Vec<String> = cells.iter().map(|cell| escape_latex(cell)).collect();
            format!(" {} \\\\", escaped.join(" & "))
        };
        let mut out = vec![format!("\\begin{{tabular}}{{{spec}}}"), "\\hline".to_string()];
        out.push(row(header));
        out.push("\\hline".to_string());
        out.extend(self.rows.iter().map(|r| row(cells(r))));
        out.push("\\hline".to_string());
        out.push("\\end{tabular}".to_string());
        out.join("\n") + "\n"
    }
}

fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

fn wrap_csv(code: &str, err: csv::Error) -> CrunchError {
    CrunchError::Serde(ErrorInfo::new(code, "CSV table failure").with_hint(err.to_string()))
}

fn csv(tables: &[Table]) -> Result<String, CrunchError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    let mut header = header();
    header.insert(0, "Dataset".to_string());
    writer
        .write_record(&header)
        .map_err(|err| wrap_csv("table-csv-header", err))?;
    for table in tables {
        for row in &table.rows {
            let mut record = cells(row);
            record.insert(0, table.dataset.clone());
            writer
                .write_record(&record)
                .map_err(|err| wrap_csv("table-csv-row", err))?;
        }
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| wrap_csv("table-csv-flush", err.into_error().into()))?;
    String::from_utf8(bytes)
        .map_err(|err| CrunchError::Serde(ErrorInfo::new("table-csv-utf8", err.to_string())))
}

/// Renders every table; text formats get a banner with the dataset name.
pub fn render_tables(tables: &[Table], format: TableFormat) -> Result<String, CrunchError> {
    if format == TableFormat::Csv {
        return csv(tables);
    }
    let mut out = String::new();
    for table in tables {
        out.push_str("\n=======\n\n");
        out.push_str(&table.dataset);
        out.push('\n');
        out.push_str(&match format {
            TableFormat::Latex => table.latex(),
            _ => table.plain(),
        });
    }
    Ok(out)
}
