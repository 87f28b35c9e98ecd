//! Comparison of a ranked view against a reference study distribution.

use crate::data::{Rank, ReferenceTable};
use crate::error::Result;
use crate::rank::RankedView;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Summary of one taxon's relative abundance distribution across the
/// reference study samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonDistribution {
    /// Number of study samples with a value for this taxon.
    pub n: usize,
    /// Mean relative abundance.
    pub mean: f64,
    /// Minimum.
    pub min: f64,
    /// First quartile.
    pub q1: f64,
    /// Median.
    pub median: f64,
    /// Third quartile.
    pub q3: f64,
    /// Maximum.
    pub max: f64,
}

/// A taxon found in both the ranked view and the reference table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyMatch {
    /// Taxon name.
    pub name: String,
    /// Relative abundance observed in the personal sample.
    pub observed_percent: f64,
    /// Percentile of the observed value within the reference distribution
    /// (fraction of reference values <= observed, times 100).
    pub percentile: f64,
    /// Distribution summary of the reference values.
    pub distribution: TaxonDistribution,
}

/// Result of matching a ranked view against a reference study table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyComparison {
    /// The rank the view was filtered to.
    pub rank: Rank,
    /// Matched taxa, in the view's ranked order.
    pub matches: Vec<StudyMatch>,
    /// View taxa with no reference column (or an all-empty column).
    pub unmatched_sample: Vec<String>,
    /// Reference columns with no matching view taxon, sorted by name.
    pub unmatched_reference: Vec<String>,
}

impl StudyComparison {
    /// Number of matched taxa.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Check if no taxa matched.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Render matched taxa as TSV.
    pub fn to_tsv_string(&self) -> String {
        let mut out = String::from(
            "taxon\tobserved_percent\tpercentile\tn\tmean\tmin\tq1\tmedian\tq3\tmax\n",
        );
        for m in &self.matches {
            let d = &m.distribution;
            out.push_str(&format!(
                "{}\t{}\t{:.1}\t{}\t{:.4}\t{:.4}\t{:.4}\t{:.4}\t{:.4}\t{:.4}\n",
                m.name, m.observed_percent, m.percentile, d.n, d.mean, d.min, d.q1, d.median,
                d.q3, d.max
            ));
        }
        out
    }

    /// Write the comparison to a TSV file.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(self.to_tsv_string().as_bytes())?;
        Ok(())
    }
}

/// Match a ranked view against a reference study table.
///
/// The matched set is the intersection of view taxa and reference columns;
/// each match carries the reference distribution summary and the observed
/// value's percentile within it. Reference columns that exist but hold no
/// numeric values are treated as unmatched.
pub fn compare_reference(view: &RankedView, reference: &ReferenceTable) -> StudyComparison {
    let mut matches = Vec::new();
    let mut unmatched_sample = Vec::new();

    for taxon in &view.taxa {
        match reference.values(&taxon.name).and_then(summarize) {
            Some(distribution) => {
                let values = reference.values(&taxon.name).unwrap();
                let below = values.iter().filter(|&&v| v <= taxon.percentage).count();
                let percentile = 100.0 * below as f64 / values.len() as f64;
                matches.push(StudyMatch {
                    name: taxon.name.clone(),
                    observed_percent: taxon.percentage,
                    percentile,
                    distribution,
                });
            }
            None => unmatched_sample.push(taxon.name.clone()),
        }
    }

    let mut unmatched_reference: Vec<String> = reference
        .taxa()
        .iter()
        .filter(|name| view.get(name).is_none())
        .cloned()
        .collect();
    unmatched_reference.sort();

    StudyComparison {
        rank: view.rank,
        matches,
        unmatched_sample,
        unmatched_reference,
    }
}

/// Summarize a value list; `None` when empty.
fn summarize(values: &[f64]) -> Option<TaxonDistribution> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = median_of(&sorted);
    // Quartiles as medians of the lower and upper halves
    let half = n / 2;
    let (q1, q3) = if n < 2 {
        (sorted[0], sorted[0])
    } else {
        (median_of(&sorted[..half]), median_of(&sorted[n - half..]))
    };

    Some(TaxonDistribution {
        n,
        mean,
        min: sorted[0],
        q1,
        median,
        q3,
        max: sorted[n - 1],
    })
}

fn median_of(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SampleDataset, TaxonRecord};
    use crate::rank::{rank_abundance, RankOptions};
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_view() -> RankedView {
        let records = vec![
            TaxonRecord::new(Rank::Genus, "Bacteroides", 350_000),
            TaxonRecord::new(Rank::Genus, "Prevotella", 10_000),
            TaxonRecord::new(Rank::Genus, "Akkermansia", 5_000),
        ];
        let dataset = SampleDataset::from_records(records, 1_000_000).unwrap();
        rank_abundance(&dataset, Rank::Genus, &RankOptions::default()).unwrap()
    }

    fn create_test_reference() -> ReferenceTable {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "sample_id,Bacteroides,Prevotella,Faecalibacterium\n\
             s1,20.0,0.5,8.0\n\
             s2,30.0,1.5,9.0\n\
             s3,40.0,2.5,10.0\n\
             s4,50.0,3.5,11.0\n"
        )
        .unwrap();
        file.flush().unwrap();
        ReferenceTable::from_csv(file.path()).unwrap()
    }

    #[test]
    fn test_summarize() {
        let d = summarize(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(d.n, 4);
        assert_relative_eq!(d.mean, 2.5);
        assert_relative_eq!(d.min, 1.0);
        assert_relative_eq!(d.q1, 1.5);
        assert_relative_eq!(d.median, 2.5);
        assert_relative_eq!(d.q3, 3.5);
        assert_relative_eq!(d.max, 4.0);
    }

    #[test]
    fn test_summarize_single_value() {
        let d = summarize(&[7.0]).unwrap();
        assert_relative_eq!(d.median, 7.0);
        assert_relative_eq!(d.q1, 7.0);
        assert_relative_eq!(d.q3, 7.0);
    }

    #[test]
    fn test_summarize_empty() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn test_match_intersection() {
        let view = create_test_view();
        let reference = create_test_reference();
        let result = compare_reference(&view, &reference);

        let matched: Vec<&str> = result.matches.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(matched, vec!["Bacteroides", "Prevotella"]);
        assert_eq!(result.unmatched_sample, vec!["Akkermansia"]);
        assert_eq!(result.unmatched_reference, vec!["Faecalibacterium"]);
    }

    #[test]
    fn test_percentile() {
        let view = create_test_view();
        let reference = create_test_reference();
        let result = compare_reference(&view, &reference);

        // Bacteroides observed at 35.00%, above 2 of 4 reference values
        let bacteroides = &result.matches[0];
        assert_relative_eq!(bacteroides.observed_percent, 35.0);
        assert_relative_eq!(bacteroides.percentile, 50.0);

        // Prevotella observed at 1.00%, above 1 of 4
        let prevotella = &result.matches[1];
        assert_relative_eq!(prevotella.percentile, 25.0);
    }

    #[test]
    fn test_percentile_at_maximum_is_100() {
        let records = vec![TaxonRecord::new(Rank::Genus, "Bacteroides", 500_000)];
        let dataset = SampleDataset::from_records(records, 1_000_000).unwrap();
        let view = rank_abundance(&dataset, Rank::Genus, &RankOptions::default()).unwrap();

        let result = compare_reference(&view, &create_test_reference());
        assert_relative_eq!(result.matches[0].percentile, 100.0);
    }

    #[test]
    fn test_empty_intersection_is_valid() {
        let records = vec![TaxonRecord::new(Rank::Genus, "Roseburia", 1_000)];
        let dataset = SampleDataset::from_records(records, 1_000_000).unwrap();
        let view = rank_abundance(&dataset, Rank::Genus, &RankOptions::default()).unwrap();

        let result = compare_reference(&view, &create_test_reference());
        assert!(result.is_empty());
        assert_eq!(result.unmatched_sample, vec!["Roseburia"]);
        assert_eq!(result.unmatched_reference.len(), 3);
    }
}
