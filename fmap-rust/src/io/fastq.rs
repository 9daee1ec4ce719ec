use std::io::BufRead;

use super::fasta::split_header;
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct FastqRecord {
    pub id: String,
    pub desc: Option<String>,
    pub seq: Vec<u8>,
    pub qual: Vec<u8>,
}

/// 四行格式的 FASTQ 解析器（不支持折行序列）
pub struct FastqReader<R: BufRead> {
    reader: R,
    line: Vec<u8>,
    n_records: u64,
}

impl<R: BufRead> FastqReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line: Vec::new(), n_records: 0 }
    }

    /// 读一行并去掉行尾的 `\r\n`；EOF 返回 false
    fn read_line(&mut self) -> Result<bool> {
        self.line.clear();
        if self.reader.read_until(b'\n', &mut self.line)? == 0 {
            return Ok(false);
        }
        while matches!(self.line.last(), Some(b'\n' | b'\r')) {
            self.line.pop();
        }
        Ok(true)
    }

    fn bad(&self, what: &str) -> Error {
        Error::InvalidFormat(format!("FASTQ record {}: {}", self.n_records + 1, what))
    }

    pub fn next_record(&mut self) -> Result<Option<FastqRecord>> {
        // 跳过记录之间的空行
        loop {
            if !self.read_line()? {
                return Ok(None);
            }
            if !self.line.is_empty() {
                break;
            }
        }
        if self.line[0] != b'@' {
            return Err(self.bad("header not starting with '@'"));
        }
        let (id, desc) = split_header(&self.line[1..]);

        if !self.read_line()? {
            return Err(self.bad("unexpected EOF after header"));
        }
        let seq = self.line.clone();

        if !self.read_line()? || self.line.first() != Some(&b'+') {
            return Err(self.bad("missing '+' line"));
        }

        if !self.read_line()? {
            return Err(self.bad("missing quality line"));
        }
        let qual = self.line.clone();
        if qual.len() != seq.len() {
            return Err(self.bad("seq/qual length mismatch"));
        }

        self.n_records += 1;
        Ok(Some(FastqRecord { id, desc, seq, qual }))
    }
}
