//! 精确匹配映射：每条 read 的两个方向分别做反向搜索，
//! 逐个 rank 解析坐标，生成位置比对记录。

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::index::fm::FmIndex;
use crate::io::reads::ReadSource;
use crate::io::sam::{self, SamRecord, FLAG_REVERSE, MAPQ_EXACT};
use crate::util::seq::{QuerySequence, Strand};

/// 一次精确命中：参考上的绝对坐标与方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentHit {
    pub pac_pos: u32,
    pub strand: Strand,
}

/// 运行统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapStats {
    pub reads: u64,
    pub mapped: u64,
    pub unmapped: u64,
    pub records: u64,
    /// 跨 contig 边界而被丢弃的命中
    pub dropped: u64,
}

impl MapStats {
    pub fn merge(&mut self, other: &MapStats) {
        self.reads += other.reads;
        self.mapped += other.mapped;
        self.unmapped += other.unmapped;
        self.records += other.records;
        self.dropped += other.dropped;
    }
}

/// 只读地借用索引，可在多个线程中各持一份
#[derive(Clone, Copy)]
pub struct ExactMapper<'a> {
    fm: &'a FmIndex,
}

impl<'a> ExactMapper<'a> {
    pub fn new(fm: &'a FmIndex) -> Self {
        Self { fm }
    }

    /// 所有精确命中：先正向后反向，同一方向内按 rank 升序
    pub fn hits(&self, read: &QuerySequence) -> Vec<AlignmentHit> {
        let mut hits = Vec::new();
        if read.is_empty() {
            return hits;
        }
        for strand in Strand::BOTH {
            if let Some(iv) = self.fm.exact_match(&read.view(strand).codes) {
                hits.extend(iv.ranks().map(|rank| AlignmentHit { pac_pos: self.fm.resolve(rank), strand }));
            }
        }
        hits
    }

    /// 一条 read 的全部记录。反向命中输出反向互补序列与反转的质量值；
    /// 没有任何可报告的命中时恰好输出一条未比对记录。
    pub fn map_read<'r>(&'r self, read: &'r QuerySequence, stats: &mut MapStats) -> Vec<SamRecord<'r>> {
        let span = read.len() as u32;
        let contigs = self.fm.pac.contigs();
        let mut records = Vec::new();

        for hit in self.hits(read) {
            let coord = match self.fm.pac.pac_to_contig(hit.pac_pos, span) {
                Ok(c) => c,
                Err(e) => {
                    log::trace!("{}: dropped hit: {}", read.name, e);
                    stats.dropped += 1;
                    continue;
                }
            };
            let view = read.view(hit.strand);
            records.push(SamRecord {
                qname: &read.name,
                flag: if hit.strand.is_reverse() { FLAG_REVERSE } else { 0 },
                rname: Some(contigs[coord.contig].name.as_str()),
                pos: coord.pos,
                mapq: MAPQ_EXACT,
                match_len: Some(span),
                seq: &view.bases,
                qual: &view.qual,
            });
        }

        stats.reads += 1;
        if records.is_empty() {
            stats.unmapped += 1;
            let fwd = read.forward();
            records.push(SamRecord::unmapped(&read.name, &fwd.bases, &fwd.qual));
        } else {
            stats.mapped += 1;
        }
        stats.records += records.len() as u64;
        records
    }
}

/// 对整个 read 源做精确映射，先写 `@SQ` 头，再按输入顺序逐条写记录
pub fn map_exact<R: BufRead, W: Write>(fm: &FmIndex, reads: &mut ReadSource<R>, out: &mut W) -> Result<MapStats> {
    sam::write_header(out, fm.pac.contigs()).context("failed to write SAM header")?;

    let mapper = ExactMapper::new(fm);
    let mut stats = MapStats::default();
    while let Some(read) = reads.next_read().with_context(|| format!("failed to parse read #{}", stats.reads + 1))? {
        for rec in mapper.map_read(&read, &mut stats) {
            writeln!(out, "{}", rec)?;
        }
    }
    out.flush()?;

    log::info!(
        "processed {} reads: {} mapped, {} unmapped, {} records, {} boundary hits dropped",
        stats.reads,
        stats.mapped,
        stats.unmapped,
        stats.records,
        stats.dropped
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::fm::IndexOpt;
    use crate::io::fasta::FastaReader;
    use crate::io::sam::FLAG_UNMAPPED;
    use std::io::Cursor;

    fn index(fasta: &[u8]) -> FmIndex {
        let opt = IndexOpt { sa_interval: 2, occ_interval: 4, seed: 1 };
        FmIndex::from_fasta(&mut FastaReader::new(Cursor::new(fasta)), &opt).unwrap()
    }

    fn read(name: &str, seq: &[u8], qual: &[u8]) -> QuerySequence {
        QuerySequence::new(name, seq.to_vec(), qual.to_vec())
    }

    #[test]
    fn repeated_read_reports_every_occurrence() {
        let fm = index(b">chr1\nACGTACGT\n");
        let mapper = ExactMapper::new(&fm);
        let r = read("r1", b"ACGT", b"IIII");
        let mut stats = MapStats::default();
        let recs = mapper.map_read(&r, &mut stats);

        // ACGT 是回文，正反两个方向各命中两次；同一方向内 rank 升序（ACGT$ 在 ACGTACGT$ 之前）
        let got: Vec<(u16, u32)> = recs.iter().map(|r| (r.flag, r.pos)).collect();
        assert_eq!(got, vec![(0, 5), (0, 1), (FLAG_REVERSE, 5), (FLAG_REVERSE, 1)]);
        assert!(recs.iter().all(|r| r.rname == Some("chr1") && r.match_len == Some(4)));
        assert_eq!(stats, MapStats { reads: 1, mapped: 1, unmapped: 0, records: 4, dropped: 0 });
    }

    #[test]
    fn absent_read_is_unmapped_once() {
        let fm = index(b">chr1\nACGTACGT\n");
        let mapper = ExactMapper::new(&fm);
        let r = read("r2", b"TTTT", b"IIII");
        let mut stats = MapStats::default();
        let recs = mapper.map_read(&r, &mut stats);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].flag, FLAG_UNMAPPED);
        assert_eq!(recs[0].to_string(), "r2\t4\t*\t0\t0\t*\t*\t0\t0\tTTTT\tIIII");
        assert_eq!(stats.unmapped, 1);
    }

    #[test]
    fn reverse_hit_reports_reverse_complement() {
        // 参考中只有 read 的反向互补 AACCG
        let fm = index(b">chr1\nTTTAACCGTTT\n");
        let mapper = ExactMapper::new(&fm);
        let r = read("r3", b"CGGTT", b"ABCDE");
        let mut stats = MapStats::default();
        let recs = mapper.map_read(&r, &mut stats);

        assert_eq!(recs.len(), 1);
        let rec = &recs[0];
        assert!(rec.is_reverse());
        assert_eq!(rec.pos, 4);
        assert_eq!(rec.seq, b"AACCG");
        assert_eq!(rec.qual, b"EDCBA");
        // read 自身不受影响
        assert_eq!(r.forward().bases, b"CGGTT");
        assert_eq!(r.forward().qual, b"ABCDE");
    }

    #[test]
    fn junction_hit_is_dropped() {
        let fm = index(b">a\nGGGGAC\n>b\nGTCCCC\n");
        let mapper = ExactMapper::new(&fm);
        let mut stats = MapStats::default();
        let j = read("j", b"ACGT", b"");
        let recs = mapper.map_read(&j, &mut stats);
        assert_eq!(recs.len(), 1);
        assert!(recs[0].is_unmapped());
        assert!(stats.dropped >= 1);
    }

    #[test]
    fn positions_are_local_to_contig() {
        let fm = index(b">a\nGGGGGG\n>b\nCATTAG\n");
        let mapper = ExactMapper::new(&fm);
        let mut stats = MapStats::default();
        let p = read("p", b"TTA", b"!!!");
        let recs = mapper.map_read(&p, &mut stats);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].rname, Some("b"));
        assert_eq!(recs[0].pos, 3);
    }

    #[test]
    fn empty_and_ambiguous_reads_are_unmapped() {
        let fm = index(b">chr1\nACGTACGT\n");
        let mapper = ExactMapper::new(&fm);
        let mut stats = MapStats::default();
        assert!(mapper.map_read(&read("e", b"", b""), &mut stats)[0].is_unmapped());
        assert!(mapper.map_read(&read("n", b"ACNT", b"IIII"), &mut stats)[0].is_unmapped());
        assert_eq!(stats.unmapped, 2);
    }

    #[test]
    fn map_exact_writes_header_then_records() {
        let fm = index(b">chr1\nACGTTGCA\n");
        let mut src = ReadSource::from_reader(Cursor::new(&b"@q1\nGTTG\n+\nIIII\n@q2\nAAAA\n+\nIIII\n"[..])).unwrap();
        let mut out = Vec::new();
        let stats = map_exact(&fm, &mut src, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "@SQ\tSN:chr1\tLN:8");
        assert!(lines[1].starts_with("q1\t0\tchr1\t3\t255\t4M"));
        assert!(lines.iter().any(|l| l.starts_with("q2\t4\t*")));
        assert_eq!(stats.reads, 2);
        assert_eq!(stats.records as usize, lines.len() - 1);
    }
}
