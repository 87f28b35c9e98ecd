//! Reference study tables: per-sample relative abundance distributions.

use crate::error::{AbundError, Result};
use std::collections::HashMap;
use std::path::Path;

/// A tabular reference dataset from a published study: one row per study
/// sample, one column per taxon name at a fixed rank, cell values are
/// relative abundance percentages.
///
/// Empty cells are permitted (not every taxon is observed in every sample)
/// and are excluded from that taxon's value list.
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    taxa: Vec<String>,
    columns: Vec<Vec<f64>>,
    index: HashMap<String, usize>,
    n_rows: usize,
}

impl ReferenceTable {
    /// Load a reference table from a CSV file.
    ///
    /// Expected format:
    /// - First row: header; first column is the sample ID header, remaining
    ///   columns are taxon names
    /// - Subsequent rows: sample ID followed by percentage values
    ///
    /// A cell that is neither empty nor numeric fails with `MalformedInput`.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        if headers.len() < 2 {
            return Err(AbundError::MalformedInput(
                "reference table must have at least one taxon column".to_string(),
            ));
        }
        let taxa: Vec<String> = headers.iter().skip(1).map(|h| h.trim().to_string()).collect();
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); taxa.len()];

        let mut n_rows = 0;
        for (row_idx, record) in reader.records().enumerate() {
            let record = record?;
            n_rows += 1;
            for (col_idx, cell) in record.iter().skip(1).enumerate() {
                if col_idx >= taxa.len() {
                    break;
                }
                let cell = cell.trim();
                if cell.is_empty() {
                    continue;
                }
                let value: f64 = cell.parse().map_err(|_| {
                    AbundError::MalformedInput(format!(
                        "non-numeric value '{}' at row {}, column '{}'",
                        cell,
                        row_idx + 1,
                        taxa[col_idx]
                    ))
                })?;
                columns[col_idx].push(value);
            }
        }

        let index = taxa
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        Ok(Self {
            taxa,
            columns,
            index,
            n_rows,
        })
    }

    /// Taxon names (column headers), in file order.
    pub fn taxa(&self) -> &[String] {
        &self.taxa
    }

    /// Number of taxon columns.
    pub fn n_taxa(&self) -> usize {
        self.taxa.len()
    }

    /// Number of study samples (data rows).
    pub fn n_samples(&self) -> usize {
        self.n_rows
    }

    /// Check whether a taxon column exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Values observed for a taxon across study samples, if the column exists.
    pub fn values(&self, name: &str) -> Option<&[f64]> {
        self.index.get(name).map(|&i| self.columns[i].as_slice())
    }
}
