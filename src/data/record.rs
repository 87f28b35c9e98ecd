//! Taxonomic rank enumeration and per-taxon count records.

use crate::error::AbundError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A taxonomic classification level.
///
/// Personal test exports label records with more levels than these
/// (`root`, `superkingdom`, `subspecies`, ...); only the six canonical
/// levels take part in ranking and comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Phylum,
    Class,
    Order,
    Family,
    Genus,
    Species,
}

impl Rank {
    /// All ranks, from broadest to most specific.
    pub const ALL: [Rank; 6] = [
        Rank::Phylum,
        Rank::Class,
        Rank::Order,
        Rank::Family,
        Rank::Genus,
        Rank::Species,
    ];

    /// Get the lowercase label used in export files.
    pub fn label(&self) -> &'static str {
        match self {
            Rank::Phylum => "phylum",
            Rank::Class => "class",
            Rank::Order => "order",
            Rank::Family => "family",
            Rank::Genus => "genus",
            Rank::Species => "species",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Rank {
    type Err = AbundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "phylum" => Ok(Rank::Phylum),
            "class" => Ok(Rank::Class),
            "order" => Ok(Rank::Order),
            "family" => Ok(Rank::Family),
            "genus" => Ok(Rank::Genus),
            "species" => Ok(Rank::Species),
            other => Err(AbundError::InvalidRank(other.to_string())),
        }
    }
}

/// A single taxon observation: rank, name, and normalized count.
///
/// The count is already scaled to a common reference total by the
/// sequencing provider; no mutation happens after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonRecord {
    /// Taxonomic level of this record.
    pub rank: Rank,
    /// Taxon name (e.g. "Bacteroides").
    pub name: String,
    /// Normalized count.
    pub count: u64,
}

impl TaxonRecord {
    /// Create a new record.
    pub fn new(rank: Rank, name: impl Into<String>, count: u64) -> Self {
        Self {
            rank,
            name: name.into(),
            count,
        }
    }
}
