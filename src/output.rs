use std::{
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use log::{debug, error, info};

use crate::error::MergeError;
use crate::types::{Dataset, MergedBin};

const PROVENANCE_COLUMNS: [&str; 2] = ["source_dataset", "source_bin"];

pub struct WriteSummary {
    pub stats_path: PathBuf,
    pub bins_written: usize,
    pub failed_copies: usize,
    pub stats_written: bool,
}

/// The stats table sits next to the output folder: `out` -> `out.stats`.
pub fn stats_path<P: AsRef<Path>>(outdir: P) -> PathBuf {
    outdir.as_ref().with_extension("stats")
}

/// Copies every winning bin to `outdir/bin.<n><extension>` and writes the
/// provenance stats table. Failed copies are logged and skipped; a failed
/// table write is logged and leaves the copied bins in place.
pub fn write_outputs<P: AsRef<Path>>(
    outdir: P,
    merged: &[MergedBin],
    datasets: &[Dataset],
    extension: &str,
) -> Result<WriteSummary> {
    let outdir = outdir.as_ref();
    std::fs::create_dir_all(outdir)
        .with_context(|| anyhow!("Could not create output directory: {:?}", outdir))?;

    let header = datasets.iter().find_map(|d| d.header.as_ref()).map(|h| {
        h.iter()
            .map(String::as_str)
            .chain(PROVENANCE_COLUMNS)
            .collect::<Vec<_>>()
            .join("\t")
    });

    let mut lines = Vec::with_capacity(merged.len() + 1);
    lines.extend(header);

    let mut failed_copies = 0;
    for m in merged {
        let Some(dataset) = datasets.get(m.winner.dataset) else {
            error!("No dataset with index {} for bin.{}", m.winner.dataset, m.number);
            failed_copies += 1;
            continue;
        };
        let Some(bin) = dataset.bin(&m.winner.bin) else {
            error!("Bin {} missing from {}", m.winner.bin, dataset.name);
            failed_copies += 1;
            continue;
        };

        let name = format!("bin.{}", m.number);
        let dest = outdir.join(format!("{}{}", name, extension));
        if let Err(e) = std::fs::copy(&bin.file, &dest) {
            error!(
                "Error copying {} to {}: {}",
                bin.file.display(),
                dest.display(),
                e
            );
            failed_copies += 1;
            continue;
        }

        let row = std::iter::once(name.as_str())
            .chain(bin.stats.fields.iter().skip(1).map(String::as_str))
            .chain([dataset.name.as_str(), bin.name.as_str()])
            .collect::<Vec<_>>()
            .join("\t");
        lines.push(row);
        debug!(
            "Wrote {} from {}/{} (score: {:.2}, group size: {})",
            dest.display(),
            dataset.name,
            bin.name,
            m.score,
            m.members.len()
        );
    }

    let stats_path = stats_path(outdir);
    let stats_written = match write_table(&stats_path, &lines) {
        Ok(()) => {
            info!("Summary written to {}", stats_path.display());
            true
        }
        Err(e) => {
            error!("Error writing summary file: {:#}", anyhow::Error::from(e));
            false
        }
    };

    Ok(WriteSummary {
        stats_path,
        bins_written: merged.len() - failed_copies,
        failed_copies,
        stats_written,
    })
}

fn write_table(path: &Path, lines: &[String]) -> Result<(), MergeError> {
    let write = || -> std::io::Result<()> {
        let outfile = std::fs::File::create(path)?;
        let mut writer = BufWriter::new(outfile);
        for line in lines {
            writeln!(writer, "{}", line)?;
        }
        writer.flush()
    };
    write().map_err(|e| MergeError::Output(path.to_path_buf(), e))
}
