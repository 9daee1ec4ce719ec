use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::fasta::FastaReader;
use super::fastq::FastqReader;
use crate::error::Result;
use crate::util::seq::QuerySequence;

/// 逐条产出 read 的数据源。格式由首个非空白字节判定：`>` 为 FASTA，其余按 FASTQ 解析。
///
/// FASTA read 没有质量值，输出时记为 `*`。
pub enum ReadSource<R: BufRead> {
    Fastq(FastqReader<R>),
    Fasta(FastaReader<R>),
}

impl ReadSource<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }
}

impl<R: BufRead> ReadSource<R> {
    pub fn from_reader(mut reader: R) -> Result<Self> {
        let first = loop {
            let buf = reader.fill_buf()?;
            if buf.is_empty() {
                break None;
            }
            let skip = buf.iter().take_while(|b| b.is_ascii_whitespace()).count();
            let found = buf.get(skip).copied();
            reader.consume(skip);
            if found.is_some() {
                break found;
            }
        };
        Ok(match first {
            Some(b'>') => ReadSource::Fasta(FastaReader::new(reader)),
            _ => ReadSource::Fastq(FastqReader::new(reader)),
        })
    }

    /// 下一条 read；数据结束时返回 `Ok(None)`
    pub fn next_read(&mut self) -> Result<Option<QuerySequence>> {
        Ok(match self {
            ReadSource::Fastq(r) => r.next_record()?.map(|rec| QuerySequence::new(rec.id, rec.seq, rec.qual)),
            ReadSource::Fasta(r) => r.next_record()?.map(|rec| QuerySequence::new(rec.id, rec.seq, Vec::new())),
        })
    }
}
