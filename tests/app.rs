use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

const HEADER: &str = "Name\tCompleteness\tContamination\tCompleteness_Model_Used";

/// Writes a bin folder with FASTA files and its quality report.
fn binner(root: &Path, label: &str, bins: &[(&str, &str)], report: &[&str]) -> (PathBuf, PathBuf) {
    let dir = root.join(label);
    fs::create_dir_all(&dir).unwrap();
    for (name, fasta) in bins {
        fs::write(dir.join(format!("{}.fasta", name)), fasta).unwrap();
    }
    let stats = root.join(format!("{}.tsv", label));
    let mut content = format!("{}\n", HEADER);
    for row in report {
        content.push_str(row);
        content.push('\n');
    }
    fs::write(&stats, content).unwrap();
    (dir, stats)
}

fn path(p: &Path) -> &str {
    p.to_str().unwrap()
}

#[test]
fn redundant_bins_merge_into_one() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let a_fasta = format!(">c1\nACGTACGTAC\n>c2\n{}\n", "A".repeat(200));
    let (d1, s1) = binner(
        tmp.path(),
        "metabat",
        &[("A", a_fasta.as_str())],
        &["A\t85.0\t1.0\tNeural Network"],
    );
    // same contigs, sequence wrapped differently
    let b_fasta = format!(">c1\nACGTACGTAC\n>c2\n{0}\n{0}\n", "A".repeat(100));
    let (d2, s2) = binner(
        tmp.path(),
        "maxbin",
        &[("B", b_fasta.as_str())],
        &["B\t65.0\t1.0\tNeural Network"],
    );
    let out = tmp.path().join("merged");

    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    cmd.args([
        "--bin-folders", path(&d1), path(&d2),
        "--stats-files", path(&s1), path(&s2),
        "--output-folder", path(&out),
    ]);
    cmd.assert().success();

    assert_eq!(fs::read_to_string(out.join("bin.1.fasta"))?, a_fasta);
    assert!(!out.join("bin.2.fasta").exists());

    let table = fs::read_to_string(tmp.path().join("merged.stats"))?;
    let header = format!("{}\tsource_dataset\tsource_bin", HEADER);
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(
        lines,
        vec![
            header.as_str(),
            "bin.1\t85.0\t1.0\tNeural Network\tdataset_1\tA",
        ]
    );

    Ok(())
}

#[test]
fn unrelated_bins_are_both_kept() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let (d1, s1) = binner(
        tmp.path(),
        "metabat",
        &[("A", ">c1\nACGT\n>c2\nACGTACGT\n")],
        &["A\t85.0\t1.0\tx"],
    );
    let (d2, s2) = binner(
        tmp.path(),
        "maxbin",
        &[("C", ">c3\nGGGGG\n")],
        &["C\t75.0\t3.0\ty"],
    );
    let out = tmp.path().join("merged");

    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    cmd.args([
        "-b", path(&d1), path(&d2),
        "-s", path(&s1), path(&s2),
        "-o", path(&out),
        "-m", "80",
    ]);
    cmd.assert().success();

    assert_eq!(fs::read_to_string(out.join("bin.1.fasta"))?, ">c1\nACGT\n>c2\nACGTACGT\n");
    assert_eq!(fs::read_to_string(out.join("bin.2.fasta"))?, ">c3\nGGGGG\n");

    let table = fs::read_to_string(tmp.path().join("merged.stats"))?;
    assert!(table.contains("bin.1\t85.0\t1.0\tx\tdataset_1\tA"));
    assert!(table.contains("bin.2\t75.0\t3.0\ty\tdataset_2\tC"));
    assert_eq!(table.lines().count(), 3);

    Ok(())
}

#[test]
fn completeness_threshold_is_exclusive() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let (d1, s1) = binner(
        tmp.path(),
        "metabat",
        &[("binX", ">c1\nACGT\n"), ("binY", ">c2\nACGT\n")],
        &["binX\t70.0\t5.0\tx", "binY\t70.1\t5.0\ty"],
    );
    let out = tmp.path().join("merged");

    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    cmd.args([
        "-b", path(&d1),
        "-s", path(&s1),
        "-o", path(&out),
        "--min-completion", "70",
    ]);
    cmd.assert().success();

    assert_eq!(fs::read_to_string(out.join("bin.1.fasta"))?, ">c2\nACGT\n");
    assert!(!out.join("bin.2.fasta").exists());

    let table = fs::read_to_string(tmp.path().join("merged.stats"))?;
    assert!(table.contains("bin.1\t70.1\t5.0\ty\tdataset_1\tbinY"));
    assert!(!table.contains("binX"));

    Ok(())
}

#[test]
fn id_names_datasets_from_report_names() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let (d1, _) = binner(tmp.path(), "metabat", &[("A", ">c1\nACGT\n")], &[]);
    let stats = tmp.path().join("S1_metabat_checkm2_report.tsv");
    fs::write(&stats, format!("{}\nA\t90\t1\tx\n", HEADER))?;
    let out = tmp.path().join("merged");

    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    cmd.args([
        "-b", path(&d1),
        "-s", path(&stats),
        "-o", path(&out),
        "--id", "S1",
    ]);
    cmd.assert().success();

    let table = fs::read_to_string(tmp.path().join("merged.stats"))?;
    assert!(table.contains("bin.1\t90\t1\tx\tmetabat\tA"));

    Ok(())
}

#[test]
fn mismatched_inputs_fail_without_output() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let (d1, s1) = binner(tmp.path(), "metabat", &[], &[]);
    let (d2, _) = binner(tmp.path(), "maxbin", &[], &[]);
    let out = tmp.path().join("merged");

    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    cmd.args([
        "-b", path(&d1), path(&d2),
        "-s", path(&s1),
        "-o", path(&out),
    ]);
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("must match number of stats files"));

    assert!(!out.exists());

    Ok(())
}

#[test]
fn missing_report_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let (d1, _) = binner(tmp.path(), "metabat", &[], &[]);
    let out = tmp.path().join("merged");

    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    cmd.args([
        "-b", path(&d1),
        "-s", "report/does/not/exist.tsv",
        "-o", path(&out),
    ]);
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Stats file not found"));

    Ok(())
}

#[test]
fn missing_bin_file_is_not_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let (d1, s1) = binner(
        tmp.path(),
        "metabat",
        &[("A", ">c1\nACGT\n")],
        &["A\t90\t1\tx", "ghost\t95\t1\ty"],
    );
    let out = tmp.path().join("merged");

    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    cmd.args(["-b", path(&d1), "-s", path(&s1), "-o", path(&out)]);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Bin file not found"));

    assert!(out.join("bin.1.fasta").exists());
    assert!(!out.join("bin.2.fasta").exists());

    Ok(())
}

#[test]
fn log_file_receives_messages() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let (d1, s1) = binner(tmp.path(), "metabat", &[("A", ">c1\nACGT\n")], &["A\t90\t1\tx"]);
    let out = tmp.path().join("merged");
    let log = tmp.path().join("merge.log");

    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    cmd.args([
        "-b", path(&d1),
        "-s", path(&s1),
        "-o", path(&out),
        "--log", path(&log),
        "--log-level", "DEBUG",
    ]);
    cmd.assert().success();

    let content = fs::read_to_string(&log)?;
    assert!(content.contains("INFO - Starting bin merging process"));
    assert!(content.contains("DEBUG - Selected bin.1"));
    assert!(content.contains("Dataset dataset_1: 1 good bins, 0 discarded bins (out of 1 total)"));
    assert!(content.contains("group size: 1"));
    assert!(content.contains("Bin merging completed successfully"));

    Ok(())
}
