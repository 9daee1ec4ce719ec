//! 标量全矩阵仿射间隙 Smith-Waterman。
//!
//! 与 [`super::vsw`] 的边界条件、间隙模型、并列规则完全一致，
//! 用作向量实现的对照（单元测试与 `vswbm --verify`）。

use super::vsw::{finish, record_column, PassMode, PassResult, ScoredAlignment, VswOpt};

const NEG_INF: i32 = i32::MIN / 4;

/// DP 工作缓冲区，可跨调用复用
#[derive(Default)]
pub struct SwBuffer {
    h_prev: Vec<i32>,
    h_cur: Vec<i32>,
    e: Vec<i32>,
}

impl SwBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self, m: usize, init: i32) {
        self.h_prev.clear();
        self.h_prev.resize(m, init);
        self.h_cur.clear();
        self.h_cur.resize(m, 0);
        self.e.clear();
        self.e.resize(m, NEG_INF);
    }
}

fn scalar_pass(query: &[u8], target: &[u8], opt: &VswOpt, mode: PassMode, buf: &mut SwBuffer) -> Option<PassResult> {
    let m = query.len();
    buf.reset(m, if mode.local_start { 0 } else { NEG_INF });
    let mut best = None;

    for (j, &t) in target.iter().enumerate() {
        let boundary = if mode.local_start || !mode.anchor_target || j == 0 { 0 } else { NEG_INF };
        let mut f = NEG_INF;
        for i in 0..m {
            let diag = if i == 0 { boundary } else { buf.h_prev[i - 1] };
            let mut h = (diag + opt.score(query[i], t)).max(buf.e[i]).max(f);
            if mode.local_start {
                h = h.max(0);
            }
            buf.h_cur[i] = h;
            // E/F 均为下一格使用的值
            buf.e[i] = (buf.e[i] - opt.gap_extend).max(h - opt.gap_open);
            f = (f - opt.gap_extend).max(h - opt.gap_open);
        }

        let (col_max, row) = if mode.free_end {
            let mut best_row = (buf.h_cur[0], 0);
            for (i, &h) in buf.h_cur.iter().enumerate().skip(1) {
                if h > best_row.0 {
                    best_row = (h, i);
                }
            }
            best_row
        } else {
            (buf.h_cur[m - 1], m - 1)
        };
        if !(mode.local_start && col_max <= 0) {
            record_column(&mut best, col_max, row, j);
        }
        std::mem::swap(&mut buf.h_prev, &mut buf.h_cur);
    }
    best
}

pub fn align(
    query: &[u8],
    target: &[u8],
    clip_start: bool,
    clip_end: bool,
    opt: &VswOpt,
    score_thr: i32,
) -> ScoredAlignment {
    align_with_buf(query, target, clip_start, clip_end, opt, score_thr, &mut SwBuffer::new())
}

pub fn align_with_buf(
    query: &[u8],
    target: &[u8],
    clip_start: bool,
    clip_end: bool,
    opt: &VswOpt,
    score_thr: i32,
    buf: &mut SwBuffer,
) -> ScoredAlignment {
    if query.is_empty() || target.is_empty() {
        return ScoredAlignment::default();
    }
    let mode = PassMode { local_start: clip_start, anchor_target: false, free_end: clip_end };
    let fwd = scalar_pass(query, target, opt, mode, buf);
    finish(query, target, fwd, clip_start, score_thr, |q, t, m| scalar_pass(q, t, opt, m, buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::dna;

    #[test]
    fn perfect_match() {
        let q = dna::encode(b"ACGTACGT");
        let res = align(&q, &q, true, true, &VswOpt::default(), 0);
        assert_eq!(res.score_fwd, 40);
        assert_eq!(res.score_rev, 40);
        assert_eq!((res.query_start, res.query_end), (0, 7));
        assert_eq!(res.n_best, 1);
    }

    #[test]
    fn single_mismatch_in_middle() {
        let opt = VswOpt::default();
        let q = dna::encode(b"ACGTAGGTACGT");
        let t = dna::encode(b"ACGTACGTACGT");
        let res = align(&q, &t, true, true, &opt, 0);
        assert_eq!(res.score_fwd, 11 * 5 - 3);
        assert_eq!((res.target_start, res.target_end), (0, 11));
    }

    #[test]
    fn single_insertion() {
        let opt = VswOpt { match_score: 2, mismatch_penalty: 4, gap_open: 3, gap_extend: 1 };
        let q = dna::encode(b"AACCGGGTTAA");
        let t = dna::encode(b"AACCGGTTAA");
        let res = align(&q, &t, true, true, &opt, 0);
        assert_eq!(res.score_fwd, 10 * 2 - 3);
        assert_eq!((res.query_start, res.query_end), (0, 10));
        assert_eq!((res.target_start, res.target_end), (0, 9));
    }

    #[test]
    fn empty_inputs() {
        let opt = VswOpt::default();
        assert_eq!(align(&[], &[0, 1], true, true, &opt, 0), ScoredAlignment::default());
        assert_eq!(align(&[0, 1], &[], true, true, &opt, 0), ScoredAlignment::default());
    }

    #[test]
    fn buffer_reuse() {
        let opt = VswOpt::default();
        let mut buf = SwBuffer::new();
        let long = dna::encode(b"ACGTACGTACGTACGT");
        let short = dna::encode(b"ACGT");
        assert_eq!(align_with_buf(&long, &long, true, true, &opt, 0, &mut buf).score_fwd, 80);
        assert_eq!(align_with_buf(&short, &long, true, true, &opt, 0, &mut buf).n_best, 4);
    }
}
