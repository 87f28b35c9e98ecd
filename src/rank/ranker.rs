//! Relative abundance ranking at a single taxonomic level.

use crate::data::{Rank, SampleDataset};
use crate::error::{AbundError, Result};
use crate::rank::view::{round_to, RankedTaxon, RankedView};
use serde::{Deserialize, Serialize};

/// Maximum meaningful decimal precision for percentages.
const MAX_PRECISION: u32 = 12;

/// Options controlling ranking behavior.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RankOptions {
    /// Decimal precision for the percentage field.
    pub precision: u32,
    /// Keep only the top K entries; `None` is unbounded.
    pub top: Option<usize>,
    /// Fail with `EmptyResult` when the rank filter yields zero records
    /// instead of returning an empty view.
    pub strict: bool,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            precision: 2,
            top: None,
            strict: false,
        }
    }
}

/// Rank the taxa of a dataset at one taxonomic level by relative abundance.
///
/// Filters the dataset to records matching `rank`, computes each taxon's
/// percentage of the normalization constant
/// (`round(count / normalization * 100, precision)`), and sorts by count
/// descending with name-ascending tie-break for determinism.
///
/// # Arguments
/// * `dataset` - The loaded dataset
/// * `rank` - Taxonomic level to filter to
/// * `options` - Precision, top-K bound, and strictness
///
/// # Returns
/// A `RankedView`, empty when no records match (unless `options.strict`,
/// in which case `EmptyResult` is returned).
pub fn rank_abundance(
    dataset: &SampleDataset,
    rank: Rank,
    options: &RankOptions,
) -> Result<RankedView> {
    if options.precision > MAX_PRECISION {
        return Err(AbundError::InvalidParameter(format!(
            "precision must be at most {}",
            MAX_PRECISION
        )));
    }

    let normalization = dataset.normalization() as f64;
    let mut taxa: Vec<RankedTaxon> = dataset
        .records_at(rank)
        .map(|r| RankedTaxon {
            name: r.name.clone(),
            count: r.count,
            percentage: round_to(r.count as f64 / normalization * 100.0, options.precision),
        })
        .collect();

    taxa.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

    if let Some(k) = options.top {
        taxa.truncate(k);
    }

    if taxa.is_empty() && options.strict {
        return Err(AbundError::EmptyResult(format!(
            "no records at rank '{}'",
            rank
        )));
    }

    Ok(RankedView {
        rank,
        normalization: dataset.normalization(),
        precision: options.precision,
        taxa,
    })
}
