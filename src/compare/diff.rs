//! Two-sample comparison of ranked abundance views.

use crate::data::Rank;
use crate::error::{AbundError, Result};
use crate::rank::{round_to, RankedTaxon, RankedView};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// A taxon present in both compared views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonTaxon {
    /// Taxon name.
    pub name: String,
    /// Normalized count in view A.
    pub count_a: u64,
    /// Normalized count in view B.
    pub count_b: u64,
    /// Percentage in view A.
    pub percent_a: f64,
    /// Percentage in view B.
    pub percent_b: f64,
    /// Signed count difference, `count_a - count_b`.
    pub difference: i64,
    /// Percentage-point difference, rounded to view A's precision.
    pub percent_difference: f64,
}

/// Result of comparing two ranked views at the same rank.
///
/// The common set and the two unique sets are pairwise disjoint; their
/// union equals the union of taxa in both views. Empty unique sets stay
/// empty — rendering fallbacks are a caller concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// The rank both views were filtered to.
    pub rank: Rank,
    /// Taxa present in both views, sorted by count difference ascending
    /// (taxa most depleted in A relative to B come first).
    pub common: Vec<CommonTaxon>,
    /// Taxa present only in view A, in A's ranked order.
    pub unique_a: Vec<RankedTaxon>,
    /// Taxa present only in view B, in B's ranked order.
    pub unique_b: Vec<RankedTaxon>,
}

impl ComparisonResult {
    /// Total number of distinct taxa across both views.
    pub fn n_taxa(&self) -> usize {
        self.common.len() + self.unique_a.len() + self.unique_b.len()
    }

    /// Check if neither view had any taxa.
    pub fn is_empty(&self) -> bool {
        self.n_taxa() == 0
    }

    /// Render as TSV: one row per taxon with a membership column
    /// (`common`, `unique_a`, or `unique_b`).
    pub fn to_tsv_string(&self) -> String {
        let mut out = String::from(
            "taxon\tmembership\tcount_a\tcount_b\tdifference\tpercent_difference\n",
        );
        for t in &self.common {
            out.push_str(&format!(
                "{}\tcommon\t{}\t{}\t{}\t{}\n",
                t.name, t.count_a, t.count_b, t.difference, t.percent_difference
            ));
        }
        for t in &self.unique_a {
            out.push_str(&format!("{}\tunique_a\t{}\t\t\t\n", t.name, t.count));
        }
        for t in &self.unique_b {
            out.push_str(&format!("{}\tunique_b\t\t{}\t\t\n", t.name, t.count));
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

/// Compare two ranked views by an equi-join on taxon name.
///
/// Joined taxa carry `difference = count_a - count_b` and are sorted by
/// difference ascending (name-ascending tie-break); unique sets are the
/// symmetric complements in their original ranked order.
///
/// # Arguments
/// * `a` - Ranked view of the first sample
/// * `b` - Ranked view of the second sample
///
/// # Returns
/// A `ComparisonResult`, or `RankMismatch` when the views were filtered
/// to different ranks.
pub fn compare_ranked(a: &RankedView, b: &RankedView) -> Result<ComparisonResult> {
    if a.rank != b.rank {
        return Err(AbundError::RankMismatch {
            left: a.rank,
            right: b.rank,
        });
    }

    let names_a: HashSet<&str> = a.names().collect();
    let names_b: HashSet<&str> = b.names().collect();

    let norm_a = a.normalization as f64;
    let norm_b = b.normalization as f64;

    let mut common: Vec<CommonTaxon> = a
        .taxa
        .iter()
        .filter_map(|ta| {
            let tb = b.get(&ta.name)?;
            let difference = ta.count as i64 - tb.count as i64;
            let percent_difference = round_to(
                100.0 * (ta.count as f64 / norm_a - tb.count as f64 / norm_b),
                a.precision,
            );
            Some(CommonTaxon {
                name: ta.name.clone(),
                count_a: ta.count,
                count_b: tb.count,
                percent_a: ta.percentage,
                percent_b: tb.percentage,
                difference,
                percent_difference,
            })
        })
        .collect();
    common.sort_by(|x, y| {
        x.difference
            .cmp(&y.difference)
            .then_with(|| x.name.cmp(&y.name))
    });

    let unique_a: Vec<RankedTaxon> = a
        .taxa
        .iter()
        .filter(|t| !names_b.contains(t.name.as_str()))
        .cloned()
        .collect();
    let unique_b: Vec<RankedTaxon> = b
        .taxa
        .iter()
        .filter(|t| !names_a.contains(t.name.as_str()))
        .cloned()
        .collect();

    Ok(ComparisonResult {
        rank: a.rank,
        common,
        unique_a,
        unique_b,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SampleDataset, TaxonRecord};
    use crate::rank::{rank_abundance, RankOptions};
    use approx::assert_relative_eq;
    use std::collections::HashSet;

    fn view_from(counts: &[(&str, u64)], normalization: u64) -> RankedView {
        let records: Vec<TaxonRecord> = counts
            .iter()
            .map(|(name, count)| TaxonRecord::new(Rank::Genus, *name, *count))
            .collect();
        let dataset = SampleDataset::from_records(records, normalization).unwrap();
        rank_abundance(&dataset, Rank::Genus, &RankOptions::default()).unwrap()
    }

    #[test]
    fn test_compare_partition() {
        let a = view_from(&[("X", 400), ("Y", 300), ("Z", 100)], 1000);
        let b = view_from(&[("Y", 200), ("Z", 350), ("W", 50)], 1000);
        let result = compare_ranked(&a, &b).unwrap();

        let common: Vec<&str> = result.common.iter().map(|t| t.name.as_str()).collect();
        let unique_a: Vec<&str> = result.unique_a.iter().map(|t| t.name.as_str()).collect();
        let unique_b: Vec<&str> = result.unique_b.iter().map(|t| t.name.as_str()).collect();

        // Z is depleted in A (-250), Y is enriched (+100)
        assert_eq!(common, vec!["Z", "Y"]);
        assert_eq!(unique_a, vec!["X"]);
        assert_eq!(unique_b, vec!["W"]);

        // The three sets partition the union of all taxa
        let mut all: HashSet<&str> = HashSet::new();
        for name in common.iter().chain(&unique_a).chain(&unique_b) {
            assert!(all.insert(name), "taxon {} appears twice", name);
        }
        let union: HashSet<&str> = a.names().chain(b.names()).collect();
        assert_eq!(all, union);
    }

    #[test]
    fn test_compare_differences() {
        let a = view_from(&[("Y", 300), ("Z", 100)], 1000);
        let b = view_from(&[("Y", 200), ("Z", 350)], 1000);
        let result = compare_ranked(&a, &b).unwrap();

        let z = result.common.iter().find(|t| t.name == "Z").unwrap();
        assert_eq!(z.difference, -250);
        assert_relative_eq!(z.percent_difference, -25.0);
        let y = result.common.iter().find(|t| t.name == "Y").unwrap();
        assert_eq!(y.difference, 100);
        assert_relative_eq!(y.percent_difference, 10.0);
    }

    #[test]
    fn test_compare_sorted_by_difference_ascending() {
        let a = view_from(&[("P", 500), ("Q", 100), ("R", 250)], 1000);
        let b = view_from(&[("P", 100), ("Q", 400), ("R", 250)], 1000);
        let result = compare_ranked(&a, &b).unwrap();

        let diffs: Vec<i64> = result.common.iter().map(|t| t.difference).collect();
        assert_eq!(diffs, vec![-300, 0, 400]);
    }

    #[test]
    fn test_compare_symmetry() {
        let a = view_from(&[("X", 400), ("Y", 300)], 1000);
        let b = view_from(&[("Y", 200), ("W", 50)], 1000);

        let ab = compare_ranked(&a, &b).unwrap();
        let ba = compare_ranked(&b, &a).unwrap();

        let names_ab: HashSet<&str> = ab.common.iter().map(|t| t.name.as_str()).collect();
        let names_ba: HashSet<&str> = ba.common.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names_ab, names_ba);

        for t in &ab.common {
            let mirrored = ba.common.iter().find(|m| m.name == t.name).unwrap();
            assert_eq!(mirrored.difference, -t.difference);
        }

        let ua: Vec<&str> = ab.unique_a.iter().map(|t| t.name.as_str()).collect();
        let ub: Vec<&str> = ba.unique_b.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(ua, ub);
    }

    #[test]
    fn test_compare_disjoint_samples() {
        let a = view_from(&[("X", 100)], 1000);
        let b = view_from(&[("Y", 50)], 1000);
        let result = compare_ranked(&a, &b).unwrap();

        assert!(result.common.is_empty());
        assert_eq!(result.unique_a[0].name, "X");
        assert_eq!(result.unique_b[0].name, "Y");
    }

    #[test]
    fn test_compare_empty_unique_sets_stay_empty() {
        let a = view_from(&[("X", 100), ("Y", 200)], 1000);
        let b = view_from(&[("X", 150), ("Y", 100)], 1000);
        let result = compare_ranked(&a, &b).unwrap();

        assert_eq!(result.common.len(), 2);
        assert!(result.unique_a.is_empty());
        assert!(result.unique_b.is_empty());
    }

    #[test]
    fn test_compare_rank_mismatch() {
        let a = view_from(&[("X", 100)], 1000);
        let mut b = view_from(&[("X", 100)], 1000);
        b.rank = Rank::Species;

        let err = compare_ranked(&a, &b).unwrap_err();
        assert!(matches!(err, AbundError::RankMismatch { .. }));
    }

    #[test]
    fn test_compare_different_normalizations() {
        // Same relative abundance under different caps: no percent difference
        let a = view_from(&[("X", 100)], 1000);
        let b = view_from(&[("X", 200)], 2000);
        let result = compare_ranked(&a, &b).unwrap();

        assert_eq!(result.common[0].difference, -100);
        assert_relative_eq!(result.common[0].percent_difference, 0.0);
    }

    #[test]
    fn test_tsv_rendering() {
        let a = view_from(&[("X", 400), ("Y", 300)], 1000);
        let b = view_from(&[("Y", 200), ("W", 50)], 1000);
        let result = compare_ranked(&a, &b).unwrap();

        let tsv = result.to_tsv_string();
        assert!(tsv.contains("Y\tcommon\t300\t200\t100\t10\n"));
        assert!(tsv.contains("X\tunique_a\t400\t\t\t\n"));
        assert!(tsv.contains("W\tunique_b\t\t50\t\t\n"));
    }
}
