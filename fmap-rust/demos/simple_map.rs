//! 演示如何在 library 模式下使用 fmap-rust：建索引、精确映射、向量比对。
//!
//! 运行方式：
//! ```bash
//! cargo run --example simple_map
//! ```

use std::io::Cursor;

use anyhow::Result;
use fmap_rust::align::{self, ExactMapper, MapStats, VswOpt};
use fmap_rust::index::fm::{FmIndex, IndexOpt};
use fmap_rust::io::fasta::FastaReader;
use fmap_rust::util::dna;
use fmap_rust::util::seq::QuerySequence;

fn main() -> Result<()> {
    // 1. 从内存中的 FASTA 构建 FM 索引
    let fasta = b">chr1\nACGTACGTAGCTGATCGTAGCTAGCTAGCTGATCGTAGCTAGCTAGCTGAT\n>chr2\nTTGACCATGGTACCAGT\n";
    let fm = FmIndex::from_fasta(&mut FastaReader::new(Cursor::new(&fasta[..])), &IndexOpt::default())?;
    println!("索引构建完成：{} 条 contig，共 {} bp", fm.pac.contigs().len(), fm.pac.len());

    // 2. 精确映射（两条链）
    let mapper = ExactMapper::new(&fm);
    let mut stats = MapStats::default();
    for (name, seq) in [("r1", &b"GCTGATCGTAG"[..]), ("r2", &b"ACTGGTACC"[..]), ("r3", &b"GGGGGGGG"[..])] {
        let read = QuerySequence::new(name, seq.to_vec(), Vec::new());
        for rec in mapper.map_read(&read, &mut stats) {
            println!("{}", rec);
        }
    }
    println!("\n{} 条 read：{} 条比对上，{} 条未比对", stats.reads, stats.mapped, stats.unmapped);

    // 3. 向量 Smith-Waterman（带一个错配，两端可软剪切）
    let opt = VswOpt::default();
    let query = dna::encode(b"TAGCTGATCCTAGCTAGC");
    let target = dna::encode(b"ACGTACGTAGCTGATCGTAGCTAGCTAGCTGAT");
    let res = align::align(&query, &target, true, true, &opt, 30);
    println!("\nSmith-Waterman：");
    println!("  得分:     {} / {}", res.score_fwd, res.score_rev);
    println!("  Query区间: [{}, {}]", res.query_start, res.query_end);
    println!("  Ref区间:   [{}, {}]", res.target_start, res.target_end);
    println!("  并列最优: {}", res.n_best);

    Ok(())
}
