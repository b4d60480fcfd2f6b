use anyhow::Context;
use log::{error, info};

use crate::cli::Args;
use crate::compare::all_pairwise;
use crate::error::MergeError;
use crate::io::{dataset_name, load_dataset, LoadOptions};
use crate::output::write_outputs;
use crate::select::select_winners;

mod cli;
mod compare;
mod error;
mod fasta;
mod io;
mod logging;
mod output;
mod quality;
mod select;
mod types;

fn main() {
    let args = cli::parse_args();

    if let Err(e) = logging::init_logger(args.log_level, args.log.as_deref()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    info!("Starting bin merging process");
    info!("Input datasets: {}", args.bin_folders.len());
    info!(
        "Quality criteria: >{}% completion, <{}% contamination",
        args.min_completion, args.max_contamination
    );
    info!("Minimum overlap: {}%", args.min_overlap);

    match run(&args) {
        Ok(()) => info!("Bin merging completed successfully"),
        Err(e) => {
            error!("Error during processing: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    if args.bin_folders.len() != args.stats_files.len() {
        return Err(MergeError::ConfigurationMismatch(
            args.bin_folders.len(),
            args.stats_files.len(),
        )
        .into());
    }

    rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build_global()
        .context("Failed to set up thread pool")?;

    let opts = LoadOptions {
        min_completeness: args.min_completion,
        max_contamination: args.max_contamination,
        extension: &args.extension,
    };

    let mut datasets = Vec::with_capacity(args.bin_folders.len());
    for (i, (bin_folder, stats_file)) in args
        .bin_folders
        .iter()
        .zip(args.stats_files.iter())
        .enumerate()
    {
        let name = dataset_name(stats_file, args.id.as_deref(), i);
        datasets.push(load_dataset(
            i,
            name,
            bin_folder.clone(),
            stats_file.clone(),
            &opts,
        )?);
    }

    let total_bins: usize = datasets.iter().map(|d| d.discard.total).sum();
    let total_discarded: usize = datasets.iter().map(|d| d.discard.discarded.len()).sum();
    info!(
        "DISCARD SUMMARY: {} bins discarded out of {} total bins across all datasets\n{}",
        total_discarded,
        total_bins,
        "-".repeat(120)
    );

    info!("Performing pairwise comparisons between all datasets");
    let index = all_pairwise(&datasets)?;

    info!("Merging best bins");
    let merged = select_winners(
        &datasets,
        &index,
        args.min_overlap,
        args.contamination_weight,
    );

    let summary = write_outputs(&args.output_folder, &merged, &datasets, &args.extension)?;
    if summary.failed_copies > 0 {
        error!("{} bins could not be copied", summary.failed_copies);
    }

    info!(
        "Merged {} bins from {} datasets",
        summary.bins_written,
        datasets.len()
    );
    info!("Output written to {}", args.output_folder.display());
    if summary.stats_written {
        info!("Stats written to {}", summary.stats_path.display());
    }
    info!(
        "Total bins processed: {}, discarded: {}, merged: {}",
        total_bins, total_discarded, summary.bins_written
    );

    info!("Dataset summary:");
    for d in &datasets {
        info!(
            "  {}: {} good bins from {} ({})",
            d.name,
            d.good_bins.len(),
            d.bin_folder.display(),
            d.stats_file.display()
        );
    }

    Ok(())
}
