//! Dataset profiling: per-rank record counts and load diagnostics.

use crate::data::{Rank, SampleDataset};
use serde::{Deserialize, Serialize};

/// Record count and total normalized count at one rank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankCount {
    /// The rank.
    pub rank: Rank,
    /// Number of records at this rank.
    pub n_records: usize,
    /// Sum of normalized counts at this rank.
    pub total_count: u64,
}

/// Summary of a loaded dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetProfile {
    /// Number of retained records.
    pub n_records: usize,
    /// Normalization constant (100% reference).
    pub normalization: u64,
    /// Counts per rank, broadest first.
    pub rank_counts: Vec<RankCount>,
    /// Number of records skipped during load.
    pub n_skipped: usize,
    /// Distinct unrecognized rank labels among skipped records, sorted.
    pub skipped_ranks: Vec<String>,
}

impl std::fmt::Display for DatasetProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Dataset Profile")?;
        writeln!(f, "  Records:       {}", self.n_records)?;
        writeln!(f, "  Normalization: {}", self.normalization)?;
        writeln!(f, "  Per-rank records:")?;
        for rc in &self.rank_counts {
            writeln!(
                f,
                "    {:<8} {:>5}  (total count {})",
                rc.rank, rc.n_records, rc.total_count
            )?;
        }
        if self.n_skipped > 0 {
            writeln!(
                f,
                "  Skipped: {} records at unsupported ranks ({})",
                self.n_skipped,
                self.skipped_ranks.join(", ")
            )?;
        }
        Ok(())
    }
}

/// Profile a loaded dataset.
pub fn profile_dataset(dataset: &SampleDataset) -> DatasetProfile {
    let rank_counts = Rank::ALL
        .iter()
        .map(|&rank| {
            let mut n_records = 0;
            let mut total_count = 0;
            for record in dataset.records_at(rank) {
                n_records += 1;
                total_count += record.count;
            }
            RankCount {
                rank,
                n_records,
                total_count,
            }
        })
        .collect();

    let mut skipped_ranks: Vec<String> = dataset
        .skipped()
        .iter()
        .map(|s| s.rank_label.clone())
        .collect();
    skipped_ranks.sort();
    skipped_ranks.dedup();

    DatasetProfile {
        n_records: dataset.len(),
        normalization: dataset.normalization(),
        rank_counts,
        n_skipped: dataset.skipped().len(),
        skipped_ranks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TaxonRecord;

    fn create_test_dataset() -> SampleDataset {
        let records = vec![
            TaxonRecord::new(Rank::Phylum, "Firmicutes", 500),
            TaxonRecord::new(Rank::Phylum, "Bacteroidetes", 400),
            TaxonRecord::new(Rank::Genus, "Bacteroides", 380),
        ];
        SampleDataset::from_records(records, 1000).unwrap()
    }

    #[test]
    fn test_profile_counts() {
        let profile = profile_dataset(&create_test_dataset());

        assert_eq!(profile.n_records, 3);
        assert_eq!(profile.normalization, 1000);
        assert_eq!(profile.rank_counts.len(), 6);

        let phylum = &profile.rank_counts[0];
        assert_eq!(phylum.rank, Rank::Phylum);
        assert_eq!(phylum.n_records, 2);
        assert_eq!(phylum.total_count, 900);
    }

    #[test]
    fn test_profile_rank_counts_sum_to_total() {
        let profile = profile_dataset(&create_test_dataset());
        let sum: usize = profile.rank_counts.iter().map(|rc| rc.n_records).sum();
        assert_eq!(sum, profile.n_records);
    }

    #[test]
    fn test_profile_display() {
        let profile = profile_dataset(&create_test_dataset());
        let text = profile.to_string();
        assert!(text.contains("Records:       3"));
        assert!(text.contains("phylum"));
        assert!(!text.contains("Skipped"));
    }
}
