//! Loading of taxonomic count datasets from personal test JSON exports.

use crate::data::record::{Rank, TaxonRecord};
use crate::error::{AbundError, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Raw export shape: a top-level object holding the bacteria count list.
#[derive(Debug, Deserialize)]
struct RawExport {
    ubiome_bacteriacounts: Vec<RawRecord>,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    tax_name: String,
    tax_rank: String,
    count_norm: u64,
}

/// A record that was skipped during load because its rank label is not
/// one of the six canonical levels (e.g. `root`, `superkingdom`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Taxon name of the skipped record.
    pub name: String,
    /// The unrecognized rank label as it appeared in the file.
    pub rank_label: String,
}

/// An ordered collection of taxon records plus the normalization constant
/// used as the 100% reference for percentage computation.
///
/// The normalization constant is the count of the topmost record in the
/// export (the root-level entry), following the export convention.
/// Invariants: the constant is positive, and every retained record's rank
/// is one of the six canonical levels. Records at other levels are kept
/// in the skipped report rather than dropped silently.
#[derive(Debug, Clone)]
pub struct SampleDataset {
    records: Vec<TaxonRecord>,
    normalization: u64,
    skipped: Vec<SkippedRecord>,
}

impl SampleDataset {
    /// Create a dataset from already-parsed records.
    ///
    /// Fails with `MalformedInput` when the normalization constant is zero.
    pub fn from_records(records: Vec<TaxonRecord>, normalization: u64) -> Result<Self> {
        if normalization == 0 {
            return Err(AbundError::MalformedInput(
                "normalization constant must be positive".to_string(),
            ));
        }
        Ok(Self {
            records,
            normalization,
            skipped: Vec::new(),
        })
    }

    /// Load a dataset from a JSON export file.
    ///
    /// Expected shape:
    /// ```json
    /// {"ubiome_bacteriacounts": [
    ///   {"tax_name": "root", "tax_rank": "root", "count_norm": 1000000, ...},
    ///   {"tax_name": "Firmicutes", "tax_rank": "phylum", "count_norm": 523441, ...}
    /// ]}
    /// ```
    ///
    /// The first record supplies the normalization constant. Fails with
    /// `MalformedInput` when the record list is empty or the constant is
    /// zero; unparseable JSON surfaces as a `Json` error.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_json_reader(BufReader::new(file))
    }

    /// Load a dataset from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Self::from_json_reader(s.as_bytes())
    }

    fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let raw: RawExport = serde_json::from_reader(reader)?;

        let normalization = raw
            .ubiome_bacteriacounts
            .first()
            .ok_or_else(|| {
                AbundError::MalformedInput("export contains no count records".to_string())
            })?
            .count_norm;
        if normalization == 0 {
            return Err(AbundError::MalformedInput(
                "normalization constant (topmost count) must be positive".to_string(),
            ));
        }

        let mut records = Vec::with_capacity(raw.ubiome_bacteriacounts.len());
        let mut skipped = Vec::new();
        for rec in raw.ubiome_bacteriacounts {
            match rec.tax_rank.parse::<Rank>() {
                Ok(rank) => records.push(TaxonRecord::new(rank, rec.tax_name, rec.count_norm)),
                Err(_) => skipped.push(SkippedRecord {
                    name: rec.tax_name,
                    rank_label: rec.tax_rank,
                }),
            }
        }

        Ok(Self {
            records,
            normalization,
            skipped,
        })
    }

    /// All retained records, in file order.
    pub fn records(&self) -> &[TaxonRecord] {
        &self.records
    }

    /// The normalization constant (100% reference).
    pub fn normalization(&self) -> u64 {
        self.normalization
    }

    /// Records skipped during tolerant parsing.
    pub fn skipped(&self) -> &[SkippedRecord] {
        &self.skipped
    }

    /// Number of retained records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no records were retained.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records at a single rank, in file order.
    pub fn records_at(&self, rank: Rank) -> impl Iterator<Item = &TaxonRecord> + '_ {
        self.records.iter().filter(move |r| r.rank == rank)
    }
}
