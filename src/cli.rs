use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    #[value(name = "DEBUG")]
    Debug,
    #[value(name = "INFO")]
    Info,
    #[value(name = "WARNING")]
    Warning,
    #[value(name = "ERROR")]
    Error,
}

/// Merge the best bins from multiple binning methods based on their quality
/// reports. Bins are matched across methods by shared contig length.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Args {
    #[arg(short, long, num_args(1..), required=true, help="Bin folders to compare, one per binner")]
    pub bin_folders: Vec<PathBuf>,

    #[arg(short, long, num_args(1..), required=true, help="Quality reports in the same order as the bin folders")]
    pub stats_files: Vec<PathBuf>,

    #[arg(short, long, help = "Output folder for merged bins")]
    pub output_folder: PathBuf,

    #[arg(short = 'c', long, default_value_t = 70.0, help = "Minimum completeness, exclusive")]
    pub min_completion: f64,

    #[arg(short = 'x', long, default_value_t = 10.0, help = "Maximum contamination, exclusive")]
    pub max_contamination: f64,

    #[arg(short, long, default_value_t = 80.0, help = "Minimum overlap percentage for bin matching")]
    pub min_overlap: f64,

    #[arg(
        short = 'w',
        long,
        default_value_t = 5.0,
        help = "Contamination weight of the ranking score (completeness - weight * contamination)"
    )]
    pub contamination_weight: f64,

    #[arg(short, long, help = "ID to strip from stats file names to name datasets")]
    pub id: Option<String>,

    #[arg(short, long, default_value = ".fasta", help = "Extension of bin files. Can be .gz")]
    pub extension: String,

    #[arg(short, long, default_value_t = 1, help = "Num threads")]
    pub threads: usize,

    #[arg(short, long, help = "Log file name, logs go to stderr if not given")]
    pub log: Option<PathBuf>,

    #[arg(long, value_enum, ignore_case = true, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

pub fn parse_args() -> Args {
    normalize(Args::parse())
}

fn normalize(mut args: Args) -> Args {
    if !args.extension.starts_with('.') {
        args.extension = format!(".{}", args.extension);
    }
    args
}
