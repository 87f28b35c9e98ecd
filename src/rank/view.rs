//! Ranked projections of a dataset at a single taxonomic level.

use crate::data::Rank;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Round a value to `precision` decimal places.
pub(crate) fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

/// A single taxon entry in a ranked view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTaxon {
    /// Taxon name.
    pub name: String,
    /// Normalized count.
    pub count: u64,
    /// Percentage of the normalization constant, rounded to the view's
    /// precision.
    pub percentage: f64,
}

/// A read-only projection of a dataset filtered to one rank, with a
/// percentage per taxon, sorted by count descending (ties broken by name
/// ascending).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedView {
    /// The rank this view was filtered to.
    pub rank: Rank,
    /// The normalization constant percentages were computed against.
    pub normalization: u64,
    /// Decimal precision of the percentage field.
    pub precision: u32,
    /// Ranked entries.
    pub taxa: Vec<RankedTaxon>,
}

impl RankedView {
    /// Number of entries.
    pub fn len(&self) -> usize {
        self.taxa.len()
    }

    /// Check if the view has no entries.
    pub fn is_empty(&self) -> bool {
        self.taxa.is_empty()
    }

    /// Look up an entry by taxon name.
    pub fn get(&self, name: &str) -> Option<&RankedTaxon> {
        self.taxa.iter().find(|t| t.name == name)
    }

    /// Taxon names in ranked order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.taxa.iter().map(|t| t.name.as_str())
    }

    /// A bounded copy containing only the top `k` entries.
    pub fn top(&self, k: usize) -> RankedView {
        RankedView {
            rank: self.rank,
            normalization: self.normalization,
            precision: self.precision,
            taxa: self.taxa.iter().take(k).cloned().collect(),
        }
    }

    /// Sum of the percentage field across all entries.
    pub fn total_percentage(&self) -> f64 {
        self.taxa.iter().map(|t| t.percentage).sum()
    }

    /// Render as TSV (header plus one row per taxon).
    pub fn to_tsv_string(&self) -> String {
        let mut out = String::from("taxon\tcount\tpercentage\n");
        let prec = self.precision as usize;
        for t in &self.taxa {
            out.push_str(&format!(
                "{}\t{}\t{:.prec$}\n",
                t.name, t.count, t.percentage
            ));
        }
        out
    }

    /// Write the view to a TSV file.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(self.to_tsv_string().as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn create_test_view() -> RankedView {
        RankedView {
            rank: Rank::Genus,
            normalization: 1000,
            precision: 2,
            taxa: vec![
                RankedTaxon {
                    name: "A".into(),
                    count: 500,
                    percentage: 50.0,
                },
                RankedTaxon {
                    name: "B".into(),
                    count: 300,
                    percentage: 30.0,
                },
                RankedTaxon {
                    name: "C".into(),
                    count: 100,
                    percentage: 10.0,
                },
            ],
        }
    }

    #[test]
    fn test_round_to() {
        assert_relative_eq!(round_to(33.33333, 2), 33.33);
        assert_relative_eq!(round_to(0.125, 2), 0.13);
        assert_relative_eq!(round_to(33.33333, 0), 33.0);
    }

    #[test]
    fn test_top_bounds_view() {
        let view = create_test_view();
        let top = view.top(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top.taxa[0].name, "A");
        assert_eq!(top.taxa[1].name, "B");

        // Bound larger than the view is a no-op
        assert_eq!(view.top(10).len(), 3);
    }

    #[test]
    fn test_get_and_names() {
        let view = create_test_view();
        assert_eq!(view.get("B").unwrap().count, 300);
        assert!(view.get("Z").is_none());
        let names: Vec<&str> = view.names().collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_total_percentage() {
        let view = create_test_view();
        assert_relative_eq!(view.total_percentage(), 90.0);
    }

    #[test]
    fn test_tsv_rendering() {
        let view = create_test_view();
        let tsv = view.to_tsv_string();
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines[0], "taxon\tcount\tpercentage");
        assert_eq!(lines[1], "A\t500\t50.00");
        assert_eq!(lines.len(), 4);
    }
}
