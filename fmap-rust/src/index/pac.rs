use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, OutOfBounds, Result};
use crate::util::dna;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Contig {
    pub name: String,
    pub len: u32,
    /// 在拼接参考中的起始偏移
    pub offset: u32,
}

/// contig 内的 1-based 坐标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefCoord {
    pub contig: usize,
    pub pos: u32,
}

/// 2-bit 压缩参考序列：所有 contig 首尾相接，占据 [0, len) 的连续绝对坐标。
///
/// contig 之间没有分隔符；跨越 contig 边界的区间由 [`PackedReference::pac_to_contig`] 拒绝。
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PackedReference {
    /// 每字节 4 个碱基，低位在前
    pac: Vec<u8>,
    len: u32,
    contigs: Vec<Contig>,
}

impl PackedReference {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条 contig。非 ACGT 碱基用 `rng` 随机替换为 ACGT 之一。
    pub fn push_contig<R: Rng>(&mut self, name: impl Into<String>, seq: &[u8], rng: &mut R) -> Result<()> {
        let offset = self.len;
        let new_len = (offset as u64) + seq.len() as u64;
        if new_len >= u32::MAX as u64 {
            return Err(Error::InvalidFormat(format!(
                "reference too long: {} bases (limit {})",
                new_len,
                u32::MAX - 1
            )));
        }
        self.pac.resize((new_len as usize + 3) / 4, 0);
        for (i, &b) in seq.iter().enumerate() {
            let mut a = dna::to_2bit(b);
            if a >= dna::AMBIG {
                a = rng.gen_range(0..dna::SIGMA as u8);
            }
            self.set(offset as usize + i, a);
        }
        self.len = new_len as u32;
        self.contigs.push(Contig { name: name.into(), len: seq.len() as u32, offset });
        Ok(())
    }

    #[inline]
    fn set(&mut self, pos: usize, a: u8) {
        let shift = (pos & 3) << 1;
        self.pac[pos >> 2] = (self.pac[pos >> 2] & !(3 << shift)) | (a << shift);
    }

    /// 绝对坐标处的 2-bit 碱基
    #[inline]
    pub fn base(&self, pos: u32) -> u8 {
        let p = pos as usize;
        (self.pac[p >> 2] >> ((p & 3) << 1)) & 3
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contigs(&self) -> &[Contig] {
        &self.contigs
    }

    /// 取出 [pos, pos+len) 的 2-bit 碱基，越界部分截断
    pub fn subseq(&self, pos: u32, len: u32) -> Vec<u8> {
        let end = pos.saturating_add(len).min(self.len);
        (pos.min(end)..end).map(|p| self.base(p)).collect()
    }

    /// 解包整条参考（索引构建用）
    pub fn unpack(&self) -> Vec<u8> {
        (0..self.len).map(|p| self.base(p)).collect()
    }

    /// 将绝对坐标 `pos` 映射为 (contig, 1-based 位置)。
    ///
    /// 要求 [pos, pos+span) 完整落在同一条 contig 内，否则返回 [`OutOfBounds`]。
    pub fn pac_to_contig(&self, pos: u32, span: u32) -> std::result::Result<RefCoord, OutOfBounds> {
        let oob = OutOfBounds { pos: pos as u64, span: span as u64 };
        let end = pos as u64 + span as u64;
        if end > self.len as u64 {
            return Err(oob);
        }
        // 最后一个 offset <= pos 的 contig；零长 contig 排在同 offset 的非空 contig 之前
        let idx = self.contigs.partition_point(|c| c.offset <= pos);
        if idx == 0 {
            return Err(oob);
        }
        let c = &self.contigs[idx - 1];
        if end > c.offset as u64 + c.len as u64 || pos >= c.offset + c.len {
            return Err(oob);
        }
        Ok(RefCoord { contig: idx - 1, pos: pos - c.offset + 1 })
    }
}
