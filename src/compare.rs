use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use log::info;
use rayon::prelude::*;
use std::collections::HashMap;

use crate::types::{BinKey, Dataset, OverlapIndex};

fn shared_length(a: &HashMap<String, u64>, b: &HashMap<String, u64>) -> u64 {
    a.iter()
        .filter(|(contig, _)| b.contains_key(*contig))
        .map(|(_, len)| len)
        .sum()
}

/// Containment overlap of two bins in percent.
///
/// The shared contig length is taken relative to each bin's total length and
/// the larger ratio is returned, so a small bin fully contained in a larger
/// one scores 100. Bins without sequence score 0.
pub fn overlap(a: &HashMap<String, u64>, b: &HashMap<String, u64>) -> f64 {
    let total_a: u64 = a.values().sum();
    let total_b: u64 = b.values().sum();

    if total_a == 0 || total_b == 0 {
        return 0.0;
    }

    let ratio_a = 100.0 * shared_length(a, b) as f64 / total_a as f64;
    let ratio_b = 100.0 * shared_length(b, a) as f64 / total_b as f64;

    ratio_a.max(ratio_b)
}

/// Compares every bin against every bin of each other dataset. Bins of the
/// same dataset are never compared. Both directions end up in the index.
pub fn all_pairwise(datasets: &[Dataset]) -> anyhow::Result<OverlapIndex> {
    let dataset_pairs = datasets
        .iter()
        .enumerate()
        .flat_map(|(i, d1)| datasets.iter().skip(i + 1).map(move |d2| (d1, d2)))
        .collect::<Vec<(_, _)>>();

    let style = ProgressStyle::with_template(
        "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
    )?
    .progress_chars("##-");
    let pb = ProgressBar::new(dataset_pairs.len() as u64);
    pb.set_style(style);
    pb.set_message("Comparing datasets...");

    let pairs: Vec<(BinKey, BinKey, f64)> = dataset_pairs
        .into_par_iter()
        .progress_with(pb)
        .map(|(d1, d2)| {
            let mut local_vec = Vec::with_capacity(d1.bins.len() * d2.bins.len());
            info!("Comparing bins between {} and {}", d1.name, d2.name);

            for (name1, bin1) in &d1.bins {
                for (name2, bin2) in &d2.bins {
                    local_vec.push((
                        BinKey::new(d1.index, name1.as_str()),
                        BinKey::new(d2.index, name2.as_str()),
                        overlap(&bin1.contigs, &bin2.contigs),
                    ));
                }
            }
            local_vec
        })
        .flatten()
        .collect();

    let mut index = OverlapIndex::new();
    for (key1, key2, value) in pairs {
        index
            .entry(key1.clone())
            .or_default()
            .insert(key2.clone(), value);
        index.entry(key2).or_default().insert(key1, value);
    }

    Ok(index)
}
