// fmap-rust/tests/exact_mapping.rs

use std::fs;
use std::io::{BufReader, Cursor};
use std::path::Path;
use std::process::Command;

use fmap_rust::align::{map_exact, MapStats};
use fmap_rust::index::fm::{index_path, FmIndex, IndexOpt};
use fmap_rust::io::fasta::FastaReader;
use fmap_rust::io::reads::ReadSource;

const REF_FA: &str = ">chr1\nAGCTAGCTAGCTAGCTTTGACCA\n>chr2\nGGATCCAAGGTTNNACGTTA\n";

fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content.as_bytes()).unwrap();
    path
}

fn sam_records(text: &str) -> Vec<Vec<&str>> {
    text.lines().filter(|l| !l.starts_with('@')).map(|l| l.split('\t').collect()).collect()
}

#[test]
fn index_on_disk_then_map_fastq() {
    let dir = tempfile::tempdir().unwrap();
    let ref_path = write_file(dir.path(), "ref.fa", REF_FA);

    let mut reader = FastaReader::new(BufReader::new(fs::File::open(&ref_path).unwrap()));
    let fm = FmIndex::from_fasta(&mut reader, &IndexOpt::default()).unwrap();
    let idx = index_path(ref_path.to_str().unwrap());
    fm.save_to_file(&idx).unwrap();
    let fm = FmIndex::load_from_file(&idx).unwrap();

    let fastq = "@fwd\nTTTGACC\n+\nABCDEFG\n@rev\nCCTTGGA\n+\nABCDEFG\n@none\nCCCCCCC\n+\nIIIIIII\n@rep\nAGCTAGCT\n+\nIIIIIIII\n";
    let mut src = ReadSource::from_reader(Cursor::new(fastq.as_bytes())).unwrap();
    let mut out = Vec::new();
    let stats = map_exact(&fm, &mut src, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("@SQ\tSN:chr1\tLN:23\n@SQ\tSN:chr2\tLN:20\n"));
    let recs = sam_records(&text);

    let fwd: Vec<_> = recs.iter().filter(|r| r[0] == "fwd").collect();
    assert_eq!(fwd.len(), 1);
    assert_eq!(&fwd[0][1..6], &["0", "chr1", "16", "255", "7M"]);
    assert_eq!((fwd[0][9], fwd[0][10]), ("TTTGACC", "ABCDEFG"));

    // CCTTGGA 的反向互补 TCCAAGG 位于 chr2 第 4 位
    let rev: Vec<_> = recs.iter().filter(|r| r[0] == "rev").collect();
    assert_eq!(rev.len(), 1);
    assert_eq!(&rev[0][1..4], &["16", "chr2", "4"]);
    assert_eq!((rev[0][9], rev[0][10]), ("TCCAAGG", "GFEDCBA"));

    let none: Vec<_> = recs.iter().filter(|r| r[0] == "none").collect();
    assert_eq!(none.len(), 1);
    assert_eq!(&none[0][1..4], &["4", "*", "0"]);

    // AGCTAGCT 在 chr1 中出现于 1、5、9 位，反向互补与自身相同
    let mut rep: Vec<(&str, &str)> = recs.iter().filter(|r| r[0] == "rep").map(|r| (r[1], r[3])).collect();
    rep.sort_unstable();
    assert_eq!(rep, vec![("0", "1"), ("0", "5"), ("0", "9"), ("16", "1"), ("16", "5"), ("16", "9")]);

    assert_eq!(stats, MapStats { reads: 4, mapped: 3, unmapped: 1, records: 9, dropped: stats.dropped });
}

#[test]
fn output_count_covers_every_read() {
    let mut reader = FastaReader::new(Cursor::new(REF_FA.as_bytes()));
    let fm = FmIndex::from_fasta(&mut reader, &IndexOpt { sa_interval: 5, occ_interval: 3, seed: 2 }).unwrap();

    let reads = ">a\nGCTAG\n>b\n\n>c\nNNNN\n>d\nACCATTT\n";
    let mut src = ReadSource::from_reader(Cursor::new(reads.as_bytes())).unwrap();
    let mut out = Vec::new();
    let stats = map_exact(&fm, &mut src, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    let names: std::collections::BTreeSet<&str> = sam_records(&text).iter().map(|r| r[0]).collect();
    assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["a", "b", "c", "d"]);
    assert_eq!(stats.reads, 4);
    assert_eq!(stats.mapped + stats.unmapped, 4);
    // FASTA read 没有质量值
    assert!(sam_records(&text).iter().all(|r| r[10] == "*"));
}

#[test]
fn cli_index_and_exact() {
    let dir = tempfile::tempdir().unwrap();
    let ref_path = write_file(dir.path(), "ref.fa", REF_FA);
    let reads_path = write_file(dir.path(), "reads.fq", "@q\nGGATCCAAG\n+\nIIIIIIIII\n");
    let sam_path = dir.path().join("out.sam");
    let bin = env!("CARGO_BIN_EXE_fmap-rust");

    let status = Command::new(bin).arg("index").arg(&ref_path).arg("-v").arg("0").status().unwrap();
    assert!(status.success());
    assert!(Path::new(&format!("{}.fmi", ref_path.display())).exists());

    let status = Command::new(bin)
        .args(["exact", "-v", "0", "-f"])
        .arg(&ref_path)
        .arg("-r")
        .arg(&reads_path)
        .arg("-o")
        .arg(&sam_path)
        .status()
        .unwrap();
    assert!(status.success());
    let text = fs::read_to_string(&sam_path).unwrap();
    let recs = sam_records(&text);
    assert_eq!(recs.len(), 1);
    assert_eq!(&recs[0][..4], &["q", "0", "chr2", "1"]);

    // 缺少必需参数
    let status = Command::new(bin).args(["exact", "-v", "0", "-f"]).arg(&ref_path).status().unwrap();
    assert!(!status.success());
}
