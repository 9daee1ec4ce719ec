use serde::{Deserialize, Serialize};

use super::bwt::BwtIndex;

/// 构建后缀数组（倍增法，O(n log² n)）。
///
/// `codes` 为 2-bit 编码的拼接参考；末尾隐式追加一个比所有碱基都小的哨兵，
/// 因此返回长度为 `codes.len() + 1`，且 `sa[0] == codes.len()`。
pub fn build_sa(codes: &[u8]) -> Vec<u32> {
    let n = codes.len() + 1;
    // 哨兵 rank 为 0，碱基整体 +1
    let mut rank: Vec<u32> = codes.iter().map(|&a| a as u32 + 1).chain(std::iter::once(0)).collect();
    let mut sa: Vec<u32> = (0..n as u32).collect();
    let mut tmp = vec![0u32; n];

    let key = |rank: &[u32], i: u32, k: usize| -> (u32, u32) {
        let i = i as usize;
        // 越界的第二关键字记为 0，哨兵唯一，不会产生歧义
        let second = if i + k < n { rank[i + k] + 1 } else { 0 };
        (rank[i], second)
    };

    let mut k = 1usize;
    loop {
        sa.sort_unstable_by_key(|&i| key(&rank, i, k));

        tmp[sa[0] as usize] = 0;
        for w in 1..n {
            let prev = key(&rank, sa[w - 1], k);
            let curr = key(&rank, sa[w], k);
            tmp[sa[w] as usize] = tmp[sa[w - 1] as usize] + u32::from(curr != prev);
        }
        rank.copy_from_slice(&tmp);

        if rank[sa[n - 1] as usize] as usize == n - 1 || k >= n {
            break;
        }
        k <<= 1;
    }
    sa
}

/// 按 rank 等间隔采样的后缀数组：`samples[i] = SA[i * interval]`。
///
/// 未采样的 rank 通过 LF 映射逐步回退，直到命中采样点，再加上回退步数。
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SampledSa {
    interval: u32,
    samples: Vec<u32>,
}

impl SampledSa {
    pub fn from_full(sa: &[u32], interval: u32) -> Self {
        let interval = interval.max(1);
        let samples = sa.iter().step_by(interval as usize).copied().collect();
        Self { interval, samples }
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// rank → 拼接参考中的绝对坐标。对 [0, bwt.len()) 内的任意 rank 都有定义。
    pub fn resolve(&self, bwt: &BwtIndex, rank: u32) -> u32 {
        let mut k = rank;
        let mut steps = 0u32;
        while k % self.interval != 0 {
            match bwt.lf(k) {
                Some(prev) => {
                    k = prev;
                    steps += 1;
                }
                // BWT[k] 为哨兵：该行后缀即文本起点
                None => return steps,
            }
        }
        self.samples[(k / self.interval) as usize] + steps
    }
}
