use std::{collections::HashMap, fs::File, io::BufReader, path::Path};

use flate2::read::GzDecoder;
use seq_io::fasta::{Reader, Record};

/// Reads a (possibly gzipped) FASTA file into a map of contig header to
/// sequence length. Line breaks inside a sequence do not count.
pub fn read_contig_lengths<P>(path: P) -> anyhow::Result<HashMap<String, u64>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let file = File::open(path)?;
    let buf_reader: Box<dyn std::io::BufRead> = if path.extension().map_or(false, |ext| ext == "gz")
    {
        Box::new(BufReader::new(GzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let mut reader = Reader::new(buf_reader);
    let mut contigs = HashMap::new();

    while let Some(record) = reader.next() {
        let record = record?;

        let head = std::str::from_utf8(record.head())?.trim().to_string();
        let length: u64 = record
            .seq_lines()
            .map(|line| line.trim_ascii().len() as u64)
            .sum();

        contigs.insert(head, length);
    }

    Ok(contigs)
}
