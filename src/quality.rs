use std::{
    collections::{BTreeMap, BTreeSet},
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use log::{debug, warn};

use crate::error::MergeError;
use crate::types::{DiscardSummary, DiscardedBin, Quality, StatsRow};

/// A parsed row of a quality report, before any filtering.
enum ReportLine {
    Header(Vec<String>),
    Row(String, StatsRow),
    Skipped,
}

fn is_header(line: &str) -> bool {
    line.to_lowercase().contains("completeness")
}

fn parse_line(path: &Path, line: &str, warn_on_error: bool) -> ReportLine {
    if is_header(line) {
        return ReportLine::Header(line.trim().split('\t').map(String::from).collect());
    }

    let fields: Vec<String> = line.trim().split('\t').map(String::from).collect();
    if fields.len() < 3 {
        debug!("Skipping short line in {}: {:?}", path.display(), line.trim());
        return ReportLine::Skipped;
    }

    let completeness = fields[1].trim().parse::<f64>();
    let contamination = fields[2].trim().parse::<f64>();

    match (completeness, contamination) {
        (Ok(completeness), Ok(contamination)) => ReportLine::Row(
            fields[0].clone(),
            StatsRow {
                quality: Quality {
                    completeness,
                    contamination,
                },
                fields,
            },
        ),
        (Err(e), _) | (_, Err(e)) => {
            if !warn_on_error {
                return ReportLine::Skipped;
            }
            warn!(
                "Error parsing line in {}: {} - {}",
                path.display(),
                line.trim(),
                e
            );
            ReportLine::Skipped
        }
    }
}

/// Reads every line of a report. Counts rows with enough columns in `total`.
fn read_report(path: &Path, warn_on_error: bool) -> Result<(Vec<ReportLine>, usize), MergeError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => MergeError::MissingReport(path.to_path_buf()),
        _ => MergeError::ReportRead(path.to_path_buf(), e),
    })?;

    let mut lines = Vec::new();
    let mut total = 0;
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| MergeError::ReportRead(path.to_path_buf(), e))?;
        if line.trim().is_empty() {
            continue;
        }
        if !is_header(&line) && line.trim().split('\t').count() >= 3 {
            total += 1;
        }
        lines.push(parse_line(path, &line, warn_on_error));
    }
    Ok((lines, total))
}

/// Selects the bins with completeness strictly above `min_completeness` and
/// contamination strictly below `max_contamination`.
pub fn load_good_bins<P: AsRef<Path>>(
    path: P,
    min_completeness: f64,
    max_contamination: f64,
) -> Result<(BTreeSet<String>, DiscardSummary), MergeError> {
    let (lines, total) = read_report(path.as_ref(), true)?;

    let mut good_bins = BTreeSet::new();
    let mut discarded = Vec::new();

    for line in lines {
        let ReportLine::Row(name, row) = line else {
            continue;
        };
        let Quality {
            completeness,
            contamination,
        } = row.quality;

        if completeness > min_completeness && contamination < max_contamination {
            good_bins.insert(name);
        } else {
            discarded.push(DiscardedBin {
                reason: format!(
                    "completion={:.1}% (min={}%), contamination={:.1}% (max={}%)",
                    completeness, min_completeness, contamination, max_contamination
                ),
                name,
            });
        }
    }

    let summary = DiscardSummary {
        total,
        good: good_bins.len(),
        discarded,
    };
    Ok((good_bins, summary))
}

/// Stats rows of the good bins, keyed by bin id.
pub struct BinStats {
    pub header: Option<Vec<String>>,
    pub rows: BTreeMap<String, StatsRow>,
}

/// Re-reads a report keeping only rows of `good_bins` plus the header row.
pub fn load_stats<P: AsRef<Path>>(
    path: P,
    good_bins: &BTreeSet<String>,
) -> Result<BinStats, MergeError> {
    // parse failures were already reported while filtering
    let (lines, _) = read_report(path.as_ref(), false)?;

    let mut header = None;
    let mut rows = BTreeMap::new();

    for line in lines {
        match line {
            ReportLine::Header(fields) => {
                header.get_or_insert(fields);
            }
            ReportLine::Row(name, row) if good_bins.contains(&name) => {
                rows.insert(name, row);
            }
            _ => {}
        }
    }

    Ok(BinStats { header, rows })
}
