//! 条带化（Farrar striped）向量 Smith-Waterman，仿射间隙，可选两端软剪切。
//!
//! 一次调用做两遍 DP：
//!
//! 1. 正向：在整段 target 窗口内求最佳得分、终点坐标与并列最优个数；
//! 2. 镜像：把 query/target 截到正向终点并反转，以该终点为锚再做一遍，得到起点坐标。
//!
//! 目标序列始终是局部的（可以从窗口任意位置开始、结束）；`clip_start`/`clip_end`
//! 只约束 query 两端是否允许不计罚分地剪掉。
//!
//! 间隙罚分：长度为 g 的间隙扣 `gap_open + gap_extend * (g - 1)`。

use super::lanes::{Lanes, Score, LANES};
use crate::error::{Error, Result};
use crate::util::dna::AMBIG;

/// 打分参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VswOpt {
    pub match_score: i32,
    pub mismatch_penalty: i32,
    pub gap_open: i32,
    pub gap_extend: i32,
}

impl Default for VswOpt {
    fn default() -> Self {
        Self { match_score: 5, mismatch_penalty: 3, gap_open: 12, gap_extend: 6 }
    }
}

impl VswOpt {
    pub fn validate(&self) -> Result<()> {
        if self.match_score <= 0 {
            return Err(Error::InvalidConfig(format!("match score must be positive, got {}", self.match_score)));
        }
        if self.mismatch_penalty < 0 || self.gap_open < 0 || self.gap_extend < 0 {
            return Err(Error::InvalidConfig("penalties must not be negative".into()));
        }
        if self.gap_open < self.gap_extend {
            return Err(Error::InvalidConfig(format!(
                "gap open ({}) must not be smaller than gap extension ({})",
                self.gap_open, self.gap_extend
            )));
        }
        Ok(())
    }

    /// 替换得分；含非 ACGT 的位置一律按错配计
    #[inline]
    pub fn score(&self, q: u8, t: u8) -> i32 {
        if q == t && q < AMBIG {
            self.match_score
        } else {
            -self.mismatch_penalty
        }
    }
}

/// 一次比对的结果。坐标均为 0-based 闭区间。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoredAlignment {
    pub score_fwd: i32,
    pub score_rev: i32,
    pub query_start: usize,
    pub query_end: usize,
    pub target_start: usize,
    pub target_end: usize,
    /// 累加器饱和，得分不可信
    pub overflow: bool,
    /// 达到最佳得分的不同 target 终点列数
    pub n_best: u32,
}

impl ScoredAlignment {
    pub fn query_span(&self) -> usize {
        self.query_end + 1 - self.query_start
    }

    pub fn target_span(&self) -> usize {
        self.target_end + 1 - self.target_start
    }
}

/// 单遍 DP 的边界条件
#[derive(Debug, Clone, Copy)]
pub(crate) struct PassMode {
    /// 每个格子下限为 0：query 与 target 都可以从任意位置开始
    pub local_start: bool,
    /// 只能从 target 第 0 列开始（镜像遍使用）
    pub anchor_target: bool,
    /// 允许在任意 query 行结束；否则必须结束在最后一行
    pub free_end: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PassResult {
    pub score: i32,
    pub qend: usize,
    pub tend: usize,
    pub n_best: u32,
    pub overflow: bool,
}

/// 记录一列的最佳值。新纪录只在严格更大时替换，相等则累加并列数；
/// 因此终点取最早的列、列内最小的行。
#[inline]
pub(crate) fn record_column(best: &mut Option<PassResult>, score: i32, row: usize, col: usize) {
    if let Some(b) = best.as_mut() {
        if score < b.score {
            return;
        }
        if score == b.score {
            b.n_best += 1;
            return;
        }
    }
    *best = Some(PassResult { score, qend: row, tend: col, n_best: 1, overflow: false });
}

/// 由正向结果出发，跑镜像遍求起点，组装最终结果
pub(crate) fn finish(
    query: &[u8],
    target: &[u8],
    fwd: Option<PassResult>,
    clip_start: bool,
    score_thr: i32,
    mirror: impl FnOnce(&[u8], &[u8], PassMode) -> Option<PassResult>,
) -> ScoredAlignment {
    let Some(fwd) = fwd else {
        return ScoredAlignment::default();
    };
    let mut res = ScoredAlignment {
        score_fwd: fwd.score,
        score_rev: 0,
        query_start: fwd.qend,
        query_end: fwd.qend,
        target_start: fwd.tend,
        target_end: fwd.tend,
        overflow: fwd.overflow,
        n_best: fwd.n_best,
    };
    if fwd.overflow || fwd.score < score_thr {
        return res;
    }

    let q_rev: Vec<u8> = query[..=fwd.qend].iter().rev().copied().collect();
    let t_rev: Vec<u8> = target[..=fwd.tend].iter().rev().copied().collect();
    let mode = PassMode { local_start: false, anchor_target: true, free_end: clip_start };
    if let Some(rev) = mirror(&q_rev, &t_rev, mode) {
        res.score_rev = rev.score;
        res.query_start = fwd.qend - rev.qend;
        res.target_start = fwd.tend - rev.tend;
        res.overflow |= rev.overflow;
    }
    res
}

/// 条带化 query profile：第 t 个碱基的 `seg_len` 个向量，
/// 分量 k、段 s 对应 query 第 `k * seg_len + s` 行；越过 query 末尾的填充行取 `MIN`。
struct Profile<S: Score> {
    qlen: usize,
    seg_len: usize,
    rows: Vec<Lanes<S>>,
}

impl<S: Score> Profile<S> {
    fn new(query: &[u8], opt: &VswOpt) -> Self {
        let qlen = query.len();
        let seg_len = (qlen + LANES - 1) / LANES;
        let mut rows = Vec::with_capacity((AMBIG as usize + 1) * seg_len);
        for t in 0..=AMBIG {
            for s in 0..seg_len {
                let mut v = [S::MIN; LANES];
                for (k, lane) in v.iter_mut().enumerate() {
                    let row = k * seg_len + s;
                    if row < qlen {
                        *lane = S::from_i32(opt.score(query[row], t));
                    }
                }
                rows.push(Lanes(v));
            }
        }
        Self { qlen, seg_len, rows }
    }

    #[inline]
    fn column(&self, t: u8) -> &[Lanes<S>] {
        let t = t.min(AMBIG) as usize;
        &self.rows[t * self.seg_len..(t + 1) * self.seg_len]
    }

    #[inline]
    fn cell(&self, h: &[Lanes<S>], row: usize) -> S {
        h[row % self.seg_len].0[row / self.seg_len]
    }

    /// 真实行中的最大值及其最小行号
    fn best_row(&self, h: &[Lanes<S>]) -> (i32, usize) {
        let mut best = (self.cell(h, 0).to_i32(), 0);
        for row in 1..self.qlen {
            let v = self.cell(h, row).to_i32();
            if v > best.0 {
                best = (v, row);
            }
        }
        best
    }
}

fn striped_pass<S: Score>(p: &Profile<S>, target: &[u8], opt: &VswOpt, mode: PassMode) -> Option<PassResult> {
    let seg = p.seg_len;
    let neg = S::MIN;
    let zero = Lanes::splat(S::ZERO);
    let v_open = Lanes::splat(S::from_i32(opt.gap_open));
    let v_ext = Lanes::splat(S::from_i32(opt.gap_extend));
    let init = Lanes::splat(if mode.local_start { S::ZERO } else { neg });

    let mut h_store = vec![init; seg];
    let mut h_load = vec![init; seg];
    let mut e = vec![Lanes::splat(neg); seg];

    let mut best: Option<PassResult> = None;
    let mut overflow = false;

    for (j, &t) in target.iter().enumerate() {
        let prof = p.column(t);
        let boundary = if mode.local_start || !mode.anchor_target || j == 0 { S::ZERO } else { neg };

        // 上一列最后一段平移一个分量，得到本列各段首行的对角线值
        let mut v_h = h_store[seg - 1].shift_in(boundary);
        std::mem::swap(&mut h_load, &mut h_store);
        let mut v_f = Lanes::splat(neg);

        for s in 0..seg {
            v_h = v_h.adds(prof[s]).max(e[s]).max(v_f);
            if mode.local_start {
                v_h = v_h.max(zero);
            }
            h_store[s] = v_h;
            let h_open = v_h.subs(v_open);
            e[s] = e[s].subs(v_ext).max(h_open);
            v_f = v_f.subs(v_ext).max(h_open);
            v_h = h_load[s];
        }

        // lazy-F：把跨分量的纵向间隙补传下去。
        // 必须与更新前的 H 比较：F <= H - open 时后续各行已由第一遍覆盖；
        // gap_open == gap_extend 时与更新后的 H 比较会提前截断。
        'lazy: for _ in 0..LANES {
            v_f = v_f.shift_in(neg);
            for s in 0..seg {
                if !v_f.any_gt(h_store[s].subs(v_open)) {
                    break 'lazy;
                }
                let v_h = h_store[s].max(v_f);
                h_store[s] = v_h;
                e[s] = e[s].max(v_h.subs(v_open));
                v_f = v_f.subs(v_ext);
            }
        }

        let (col_max, row) = if mode.free_end {
            let v_max = h_store.iter().fold(Lanes::splat(neg), |acc, &v| acc.max(v)).hmax().to_i32();
            if matches!(best, Some(b) if v_max < b.score) {
                continue;
            }
            p.best_row(&h_store)
        } else {
            let last = p.qlen - 1;
            (p.cell(&h_store, last).to_i32(), last)
        };

        if col_max >= S::MAX.to_i32() {
            overflow = true;
        }
        if mode.local_start && col_max <= 0 {
            continue;
        }
        record_column(&mut best, col_max, row, j);
    }

    best.map(|b| PassResult { overflow, ..b })
}

/// 预先条带化的 query，可对多个 target 重复使用。
///
/// 分量类型 `S` 决定累加器宽度：`i16` 为默认，溢出后可换 `i32` 重算。
pub struct VswQuery<'q, S: Score = i16> {
    query: &'q [u8],
    opt: VswOpt,
    profile: Profile<S>,
}

impl<'q, S: Score> VswQuery<'q, S> {
    /// query 为 2-bit 编码。空 query 或非法打分参数属于调用方错误，直接 panic。
    pub fn new(query: &'q [u8], opt: &VswOpt) -> Self {
        assert!(!query.is_empty(), "vsw: empty query");
        if let Err(e) = opt.validate() {
            panic!("vsw: {}", e);
        }
        Self { query, opt: *opt, profile: Profile::new(query, opt) }
    }

    pub fn len(&self) -> usize {
        self.query.len()
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    /// 对一个 target 窗口求最佳局部比对。低于 `score_thr` 时不做镜像遍（起点等于终点，`score_rev` 为 0），
    /// 但得分照常返回。
    pub fn align(&self, target: &[u8], clip_start: bool, clip_end: bool, score_thr: i32) -> ScoredAlignment {
        assert!(!target.is_empty(), "vsw: empty target");
        let mode = PassMode { local_start: clip_start, anchor_target: false, free_end: clip_end };
        let fwd = striped_pass(&self.profile, target, &self.opt, mode);
        let res = finish(self.query, target, fwd, clip_start, score_thr, |q, t, m| {
            striped_pass(&Profile::<S>::new(q, &self.opt), t, &self.opt, m)
        });
        log::trace!(
            "vsw: qlen={} tlen={} score={} q=[{},{}] t=[{},{}] n_best={} overflow={}",
            self.query.len(),
            target.len(),
            res.score_fwd,
            res.query_start,
            res.query_end,
            res.target_start,
            res.target_end,
            res.n_best,
            res.overflow
        );
        res
    }
}

/// 16 位累加器的便捷入口
pub fn align(
    query: &[u8],
    target: &[u8],
    clip_start: bool,
    clip_end: bool,
    opt: &VswOpt,
    score_thr: i32,
) -> ScoredAlignment {
    align_with::<i16>(query, target, clip_start, clip_end, opt, score_thr)
}

pub fn align_with<S: Score>(
    query: &[u8],
    target: &[u8],
    clip_start: bool,
    clip_end: bool,
    opt: &VswOpt,
    score_thr: i32,
) -> ScoredAlignment {
    VswQuery::<S>::new(query, opt).align(target, clip_start, clip_end, score_thr)
}
