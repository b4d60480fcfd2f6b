use anyhow::Context;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use rayon::prelude::*;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use crate::{
    fasta::read_contig_lengths,
    quality::{load_good_bins, load_stats},
    types::{Bin, Dataset, StatsRow},
};

const REPORT_SUFFIX: &str = "_checkm2_report.tsv";

/// Human readable dataset name. With an `id`, the stats file name is
/// stripped of a leading `<id>_` and a trailing `_checkm2_report.tsv`;
/// otherwise datasets are called `dataset_<n>` counting from one.
pub fn dataset_name(stats_file: &Path, id: Option<&str>, index: usize) -> String {
    let Some(id) = id else {
        return format!("dataset_{}", index + 1);
    };

    let file_name = stats_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| stats_file.to_string_lossy().into_owned());

    let prefix = format!("{}_", id);
    let name = file_name.strip_prefix(&prefix).unwrap_or(&file_name);
    let name = name.strip_suffix(REPORT_SUFFIX).unwrap_or(name);
    name.to_string()
}

pub struct LoadOptions<'a> {
    pub min_completeness: f64,
    pub max_contamination: f64,
    pub extension: &'a str,
}

/// Filters a binner's report and loads the contigs of every good bin.
pub fn load_dataset(
    index: usize,
    name: String,
    bin_folder: PathBuf,
    stats_file: PathBuf,
    opts: &LoadOptions,
) -> anyhow::Result<Dataset> {
    info!(
        "Processing {}: {} - {}",
        name,
        stats_file.display(),
        bin_folder.display()
    );

    let (good_bins, discard) =
        load_good_bins(&stats_file, opts.min_completeness, opts.max_contamination)?;

    info!(
        "Dataset {}: {} good bins, {} discarded bins (out of {} total)",
        name,
        discard.good,
        discard.discarded.len(),
        discard.total
    );
    if !discard.discarded.is_empty() {
        debug!("Dataset {} - Discarded bins breakdown:", name);
        for d in &discard.discarded {
            debug!("  - {}: {}", d.name, d.reason);
        }
    }

    info!("Loading stats for {}: {}", name, stats_file.display());
    let stats = load_stats(&stats_file, &good_bins)?;

    info!("Loading contig data from {}: {}", name, bin_folder.display());
    let bins = load_contig_data(&name, &bin_folder, opts.extension, stats.rows)
        .with_context(|| format!("Failed to load bins of {}", name))?;
    info!("Loaded contig data for {} bins from {}", bins.len(), name);

    Ok(Dataset {
        name,
        index,
        bin_folder,
        stats_file,
        good_bins,
        bins,
        header: stats.header,
        discard,
    })
}

/// Reads the bin file of every stats row. Missing or unreadable bins are
/// logged and left out.
pub fn load_contig_data(
    label: &str,
    bin_folder: &Path,
    extension: &str,
    rows: BTreeMap<String, StatsRow>,
) -> anyhow::Result<BTreeMap<String, Bin>> {
    let style =
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("##-");

    let pb = ProgressBar::new(rows.len() as u64);
    pb.set_style(style);
    pb.set_message(format!("{}: Loading bins...", label));

    let bins = rows
        .into_iter()
        .collect::<Vec<_>>()
        .into_par_iter()
        .progress_with(pb)
        .filter_map(|(name, stats)| {
            let file = bin_folder.join(format!("{}{}", name, extension));
            if !file.exists() {
                warn!("Bin file not found: {}", file.display());
                return None;
            }

            match read_contig_lengths(&file) {
                Ok(contigs) => Some(Bin {
                    name,
                    file,
                    contigs,
                    stats,
                }),
                Err(e) => {
                    error!("Error reading bin file {}: {:#}", file.display(), e);
                    None
                }
            }
        })
        .collect::<Vec<Bin>>();

    Ok(bins.into_iter().map(|b| (b.name.clone(), b)).collect())
}
