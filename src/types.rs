use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;

/// Identity of a bin across the whole run: dataset ordinal plus bin id.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BinKey {
    pub dataset: usize,
    pub bin: String,
}

impl BinKey {
    pub fn new(dataset: usize, bin: impl Into<String>) -> Self {
        Self {
            dataset,
            bin: bin.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quality {
    pub completeness: f64,
    pub contamination: f64,
}

impl Quality {
    /// Ranking score, `completeness - weight * contamination`.
    pub fn score(&self, contamination_weight: f64) -> f64 {
        self.completeness - contamination_weight * self.contamination
    }
}

/// One row of a quality report that survived filtering.
#[derive(Clone, Debug)]
pub struct StatsRow {
    pub quality: Quality,
    pub fields: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct Bin {
    pub name: String,
    pub file: PathBuf,
    /// contig id -> total sequence length
    pub contigs: HashMap<String, u64>,
    pub stats: StatsRow,
}

#[derive(Clone, Debug)]
pub struct DiscardedBin {
    pub name: String,
    pub reason: String,
}

#[derive(Clone, Debug, Default)]
pub struct DiscardSummary {
    pub total: usize,
    pub good: usize,
    pub discarded: Vec<DiscardedBin>,
}

pub struct Dataset {
    pub name: String,
    pub index: usize,
    pub bin_folder: PathBuf,
    pub stats_file: PathBuf,
    pub good_bins: BTreeSet<String>,
    /// Loaded bins, ordered by bin id.
    pub bins: BTreeMap<String, Bin>,
    pub header: Option<Vec<String>>,
    pub discard: DiscardSummary,
}

impl Dataset {
    pub fn bin(&self, name: &str) -> Option<&Bin> {
        self.bins.get(name)
    }
}

/// Symmetric cross-dataset overlap percentages.
pub type OverlapIndex = BTreeMap<BinKey, BTreeMap<BinKey, f64>>;

#[derive(Clone, Debug)]
pub struct MergedBin {
    pub number: usize,
    pub winner: BinKey,
    pub score: f64,
    pub members: Vec<BinKey>,
}
