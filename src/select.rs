use log::debug;
use std::collections::HashSet;

use crate::types::{BinKey, Dataset, MergedBin, OverlapIndex};

/// Greedy one-hop grouping of overlapping bins.
///
/// Datasets are visited in input order and bins by id. Each unconsumed bin
/// forms a group with its unconsumed direct neighbours at `min_overlap` or
/// above; the group is represented by its best scoring member, with ties
/// going to the first one seen. Neighbours of neighbours are not pulled in.
pub fn select_winners(
    datasets: &[Dataset],
    index: &OverlapIndex,
    min_overlap: f64,
    contamination_weight: f64,
) -> Vec<MergedBin> {
    let score = |key: &BinKey| -> f64 {
        datasets
            .get(key.dataset)
            .and_then(|d| d.bin(&key.bin))
            .map_or(0.0, |b| b.stats.quality.score(contamination_weight))
    };

    let mut consumed: HashSet<BinKey> = HashSet::new();
    let mut merged = Vec::new();

    for dataset in datasets {
        for name in dataset.bins.keys() {
            let key = BinKey::new(dataset.index, name.as_str());
            if consumed.contains(&key) {
                continue;
            }

            let mut members = vec![key.clone()];
            if let Some(neighbours) = index.get(&key) {
                members.extend(
                    neighbours
                        .iter()
                        .filter(|(other, overlap)| {
                            **overlap >= min_overlap && !consumed.contains(*other)
                        })
                        .map(|(other, _)| other.clone()),
                );
            }

            let mut winner = &members[0];
            let mut best = score(winner);
            for member in &members[1..] {
                let s = score(member);
                if s > best {
                    winner = member;
                    best = s;
                }
            }
            let winner = winner.clone();

            consumed.extend(members.iter().cloned());

            let number = merged.len() + 1;
            debug!(
                "Selected bin.{} from {}/{} (score: {:.2}, group of {})",
                number,
                datasets.get(winner.dataset).map_or("?", |d| d.name.as_str()),
                winner.bin,
                best,
                members.len()
            );

            merged.push(MergedBin {
                number,
                winner,
                score: best,
                members,
            });
        }
    }

    merged
}
