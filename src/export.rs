//! Tab-separated export of computed series.
//!
//! Files have one header line with the column names, then one line per
//! sample. This is what pgfplots and gnuplot read directly.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// A named series.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub name: &'static str,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: &'static str, values: Vec<f64>) -> Self {
        Self { name, values }
    }
}

/// Writes the columns side by side. They must all have the same length.
pub fn write_columns<W: Write>(out: &mut W, columns: &[Column]) -> Result<()> {
    let rows = columns.first().map_or(0, |c| c.values.len());
    if let Some(bad) = columns.iter().find(|c| c.values.len() != rows) {
        bail!(
            "column {} has {} values, not {}",
            bad.name,
            bad.values.len(),
            rows
        );
    }

    let header: Vec<&str> = columns.iter().map(|c| c.name).collect();
    writeln!(out, "{}", header.join("\t"))?;

    for i in 0..rows {
        let row: Vec<String> = columns.iter().map(|c| c.values[i].to_string()).collect();
        writeln!(out, "{}", row.join("\t"))?;
    }

    Ok(())
}

/// Exports the columns to a file, replacing it if it exists.
pub fn export_results(path: &Path, columns: &[Column]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_columns(&mut out, columns)
        .with_context(|| format!("writing {}", path.display()))?;
    out.flush()?;

    info!(path = %path.display(), "exported results");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let mut out = Vec::new();
        let columns = [
            Column::new("df", vec![1e6, 2.5e6]),
            Column::new("rate", vec![0.5, 3.0]),
        ];
        write_columns(&mut out, &columns).expect("in-memory write");

        let text = String::from_utf8(out).expect("utf-8");
        assert_eq!(text, "df\trate\n1000000\t0.5\n2500000\t3\n");
    }

    #[test]
    fn rejects_ragged_columns() {
        let mut out = Vec::new();
        let columns = [Column::new("a", vec![1.0]), Column::new("b", vec![])];
        let result = write_columns(&mut out, &columns);
        assert!(result.is_err());
    }

    #[test]
    fn no_columns_no_rows() {
        let mut out = Vec::new();
        write_columns(&mut out, &[]).expect("in-memory write");
        assert_eq!(out, b"\n");
    }
}
