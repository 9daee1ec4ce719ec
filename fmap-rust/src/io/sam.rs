use std::fmt;
use std::io::Write;

use crate::index::pac::Contig;

pub const FLAG_UNMAPPED: u16 = 0x4;
pub const FLAG_REVERSE: u16 = 0x10;

/// 精确匹配记录使用的固定 MAPQ
pub const MAPQ_EXACT: u8 = 255;

/// 一行位置比对记录。字段借用自索引与 read，生命周期不超过单条 read 的处理。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamRecord<'a> {
    pub qname: &'a str,
    pub flag: u16,
    /// None 表示未比对（输出 `*`）
    pub rname: Option<&'a str>,
    /// 1-based，未比对为 0
    pub pos: u32,
    pub mapq: u8,
    /// 全匹配长度，输出为 `{n}M`；None 输出 `*`
    pub match_len: Option<u32>,
    pub seq: &'a [u8],
    pub qual: &'a [u8],
}

impl<'a> SamRecord<'a> {
    pub fn unmapped(qname: &'a str, seq: &'a [u8], qual: &'a [u8]) -> Self {
        Self { qname, flag: FLAG_UNMAPPED, rname: None, pos: 0, mapq: 0, match_len: None, seq, qual }
    }

    pub fn is_unmapped(&self) -> bool {
        self.flag & FLAG_UNMAPPED != 0
    }

    pub fn is_reverse(&self) -> bool {
        self.flag & FLAG_REVERSE != 0
    }
}

fn or_star(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    if bytes.is_empty() {
        f.write_str("*")
    } else {
        f.write_str(&String::from_utf8_lossy(bytes))
    }
}

impl fmt::Display for SamRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}\t{}\t{}\t", self.qname, self.flag, self.rname.unwrap_or("*"), self.pos, self.mapq)?;
        match self.match_len {
            Some(n) => write!(f, "{}M", n)?,
            None => f.write_str("*")?,
        }
        f.write_str("\t*\t0\t0\t")?;
        or_star(f, self.seq)?;
        f.write_str("\t")?;
        or_star(f, self.qual)
    }
}

/// 每条 contig 一行 `@SQ`
pub fn write_header<W: Write>(out: &mut W, contigs: &[Contig]) -> std::io::Result<()> {
    for c in contigs {
        writeln!(out, "@SQ\tSN:{}\tLN:{}", c.name, c.len)?;
    }
    Ok(())
}
