//! 定宽分量向量，条带化 DP 的最小运算集合。
//!
//! 全部为安全 Rust 的定长数组逐分量运算，编译器在 release 下会将其向量化
//! （SSE2/AVX2/NEON 视目标而定）。分量宽度由 [`Score`] 决定，对外不可见。

use std::fmt::Debug;

/// 每个向量的分量数
pub const LANES: usize = 16;

/// DP 累加器的分量类型。所有运算都是饱和的：溢出停在 `MAX`/`MIN`，不回绕。
pub trait Score: Copy + Ord + Debug + Send + Sync + 'static {
    const MIN: Self;
    const MAX: Self;
    const ZERO: Self;

    /// 超出表示范围时饱和截断
    fn from_i32(v: i32) -> Self;
    fn to_i32(self) -> i32;
    fn sat_add(self, rhs: Self) -> Self;
    fn sat_sub(self, rhs: Self) -> Self;
}

macro_rules! impl_score {
    ($t:ty) => {
        impl Score for $t {
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;
            const ZERO: Self = 0;

            #[inline]
            fn from_i32(v: i32) -> Self {
                v.clamp(<$t>::MIN as i32, <$t>::MAX as i32) as $t
            }

            #[inline]
            fn to_i32(self) -> i32 {
                self as i32
            }

            #[inline]
            fn sat_add(self, rhs: Self) -> Self {
                self.saturating_add(rhs)
            }

            #[inline]
            fn sat_sub(self, rhs: Self) -> Self {
                self.saturating_sub(rhs)
            }
        }
    };
}

impl_score!(i16);
impl_score!(i32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lanes<S: Score>(pub [S; LANES]);

impl<S: Score> Lanes<S> {
    #[inline]
    pub fn splat(v: S) -> Self {
        Self([v; LANES])
    }

    #[inline]
    pub fn adds(self, rhs: Self) -> Self {
        let mut out = self.0;
        for (o, r) in out.iter_mut().zip(rhs.0) {
            *o = o.sat_add(r);
        }
        Self(out)
    }

    #[inline]
    pub fn subs(self, rhs: Self) -> Self {
        let mut out = self.0;
        for (o, r) in out.iter_mut().zip(rhs.0) {
            *o = o.sat_sub(r);
        }
        Self(out)
    }

    #[inline]
    pub fn max(self, rhs: Self) -> Self {
        let mut out = self.0;
        for (o, r) in out.iter_mut().zip(rhs.0) {
            *o = (*o).max(r);
        }
        Self(out)
    }

    /// 是否存在某个分量 self > rhs
    #[inline]
    pub fn any_gt(self, rhs: Self) -> bool {
        self.0.iter().zip(rhs.0.iter()).fold(false, |acc, (a, b)| acc | (a > b))
    }

    /// 整体向高位平移一个分量，最低分量填入 `fill`（对应 `_mm_slli_si128` + 插入）
    #[inline]
    pub fn shift_in(self, fill: S) -> Self {
        let mut out = [fill; LANES];
        out[1..].copy_from_slice(&self.0[..LANES - 1]);
        Self(out)
    }

    /// 水平最大值
    #[inline]
    pub fn hmax(self) -> S {
        self.0.iter().copied().fold(S::MIN, S::max)
    }
}
