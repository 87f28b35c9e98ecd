//! Taxonomic Abundance Ranking and Comparison
//!
//! This library compares taxonomic abundance data exported from a personal
//! microbiome test against a second sample or a reference study dataset.
//!
//! # Overview
//!
//! The library is organized into small composable modules:
//!
//! - **data**: Core data structures (Rank, TaxonRecord, SampleDataset,
//!   ReferenceTable) and file ingestion
//! - **rank**: Relative abundance ranking at one taxonomic level
//! - **compare**: Sample-vs-sample and sample-vs-study comparison
//! - **profile**: Dataset summaries and load diagnostics
//! - **config**: YAML-backed analysis configuration
//!
//! # Example
//!
//! ```no_run
//! use taxabund::prelude::*;
//!
//! // Load two test exports
//! let a = SampleDataset::from_json_file("export-2018-03-03.json").unwrap();
//! let b = SampleDataset::from_json_file("export-2018-01-23.json").unwrap();
//!
//! // Rank both at genus level and compare
//! let options = RankOptions::default();
//! let view_a = rank_abundance(&a, Rank::Genus, &options).unwrap();
//! let view_b = rank_abundance(&b, Rank::Genus, &options).unwrap();
//! let comparison = compare_ranked(&view_a, &view_b).unwrap();
//!
//! for taxon in &comparison.common {
//!     println!("{}: {:+}", taxon.name, taxon.difference);
//! }
//! ```

pub mod compare;
pub mod config;
pub mod data;
pub mod error;
pub mod profile;
pub mod rank;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::compare::{
        compare_ranked, compare_reference, CommonTaxon, ComparisonResult, StudyComparison,
        StudyMatch, TaxonDistribution,
    };
    pub use crate::config::AnalysisConfig;
    pub use crate::data::{Rank, ReferenceTable, SampleDataset, SkippedRecord, TaxonRecord};
    pub use crate::error::{AbundError, Result};
    pub use crate::profile::{profile_dataset, DatasetProfile, RankCount};
    pub use crate::rank::{rank_abundance, RankOptions, RankedTaxon, RankedView};
}
