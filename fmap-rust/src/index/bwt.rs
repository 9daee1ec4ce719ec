use serde::{Deserialize, Serialize};

use crate::util::dna::SIGMA;

/// BWT 中哨兵的符号值
pub const SENTINEL: u8 = SIGMA as u8;

/// 根据后缀数组构建 BWT：`bwt[r] = text[SA[r] - 1]`，SA[r] 为 0 的行取哨兵。
pub fn build_bwt(codes: &[u8], sa: &[u32]) -> Vec<u8> {
    sa.iter()
        .map(|&p| if p == 0 { SENTINEL } else { codes[p as usize - 1] })
        .collect()
}

/// BWT 排序中的闭区间 [lo, hi]，构造时保证 lo <= hi（非空）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankInterval {
    lo: u32,
    hi: u32,
}

impl RankInterval {
    /// 空区间返回 None
    #[inline]
    pub fn new(lo: u32, hi: u32) -> Option<Self> {
        (lo <= hi).then_some(Self { lo, hi })
    }

    pub fn lo(&self) -> u32 {
        self.lo
    }

    pub fn hi(&self) -> u32 {
        self.hi
    }

    /// 区间内后缀个数，即匹配出现次数
    pub fn len(&self) -> u32 {
        self.hi - self.lo + 1
    }

    /// 升序遍历区间内的 rank
    pub fn ranks(&self) -> std::ops::RangeInclusive<u32> {
        self.lo..=self.hi
    }
}

/// 只读 BWT 索引：变换串、C 表与分块采样的 Occ。
///
/// - rank 0 对应哨兵后缀，可检索的 rank 落在 [1, n]。
/// - `c[b]` 为变换中比 `b` 小的碱基个数（不含哨兵），`c[SIGMA] = n`。
/// - Occ 每 `occ_interval` 个符号存一次前缀计数，块内顺扫补偿。
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BwtIndex {
    bwt: Vec<u8>,
    c: [u32; SIGMA + 1],
    occ_interval: u32,
    /// occ_samples[i][b] = bwt[0 .. i*occ_interval) 中 b 的个数
    occ_samples: Vec<[u32; SIGMA]>,
}

impl BwtIndex {
    pub fn build(bwt: Vec<u8>, occ_interval: usize) -> Self {
        let interval = occ_interval.max(1);

        let mut occ_samples = Vec::with_capacity(bwt.len() / interval + 1);
        let mut running = [0u32; SIGMA];
        for (i, &ch) in bwt.iter().enumerate() {
            if i % interval == 0 {
                occ_samples.push(running);
            }
            if (ch as usize) < SIGMA {
                running[ch as usize] += 1;
            }
        }
        if bwt.len() % interval == 0 {
            occ_samples.push(running);
        }

        let mut c = [0u32; SIGMA + 1];
        for b in 0..SIGMA {
            c[b + 1] = c[b] + running[b];
        }

        Self { bwt, c, occ_interval: interval as u32, occ_samples }
    }

    /// 变换长度（参考长度 + 1 个哨兵）
    pub fn len(&self) -> usize {
        self.bwt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bwt.is_empty()
    }

    /// 参考长度 n（不含哨兵）
    pub fn seq_len(&self) -> u32 {
        self.c[SIGMA]
    }

    pub fn c(&self, b: u8) -> u32 {
        self.c[b as usize]
    }

    /// bwt[0..k) 中碱基 `b` 的出现次数
    #[inline]
    pub fn occ(&self, b: u8, k: usize) -> u32 {
        let interval = self.occ_interval as usize;
        let bi = k / interval;
        let base = self.occ_samples[bi][b as usize];
        let add = self.bwt[bi * interval..k].iter().filter(|&&ch| ch == b).count() as u32;
        base + add
    }

    /// LF 映射：返回文本中前一个位置对应的 rank；BWT[rank] 为哨兵时返回 None
    #[inline]
    pub fn lf(&self, rank: u32) -> Option<u32> {
        let b = self.bwt[rank as usize];
        if b == SENTINEL {
            return None;
        }
        Some(self.c[b as usize] + self.occ(b, rank as usize) + 1)
    }

    /// 在区间前方扩展一个碱基；结果为空时返回 None
    #[inline]
    pub fn extend(&self, iv: RankInterval, b: u8) -> Option<RankInterval> {
        if b >= SENTINEL {
            return None;
        }
        let c = self.c[b as usize];
        let lo = c + self.occ(b, iv.lo as usize) + 1;
        let hi = c + self.occ(b, iv.hi as usize + 1);
        RankInterval::new(lo, hi)
    }

    /// 精确匹配的反向搜索。
    ///
    /// 从查询末尾向开头逐个碱基收缩区间，一旦为空立即返回 None。
    /// 空查询或包含非 ACGT 编码的查询不匹配。
    pub fn exact_match(&self, query: &[u8]) -> Option<RankInterval> {
        let (&last, rest) = query.split_last()?;
        if last >= SENTINEL {
            return None;
        }
        let mut iv = RankInterval::new(self.c[last as usize] + 1, self.c[last as usize + 1])?;
        for &b in rest.iter().rev() {
            iv = self.extend(iv, b)?;
        }
        Some(iv)
    }
}
