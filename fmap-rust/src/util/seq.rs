use super::dna;

/// 链方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    pub const BOTH: [Strand; 2] = [Strand::Forward, Strand::Reverse];

    pub fn is_reverse(self) -> bool {
        self == Strand::Reverse
    }
}

/// 单一方向上的 read 视图：字符形式（输出用）、2-bit 形式（检索/比对用）与质量值。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqView {
    pub bases: Vec<u8>,
    pub codes: Vec<u8>,
    pub qual: Vec<u8>,
}

impl SeqView {
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }
}

/// 一条 read 的两个方向，构造后不可变。
///
/// 正向与反向互补各自持有独立的缓冲区，二者从不互为别名；
/// 反向视图的质量值是原质量值的简单反转。
#[derive(Debug, Clone)]
pub struct QuerySequence {
    pub name: String,
    forward: SeqView,
    reverse: SeqView,
}

impl QuerySequence {
    pub fn new(name: impl Into<String>, bases: Vec<u8>, qual: Vec<u8>) -> Self {
        let codes = dna::encode(&bases);

        let mut rc_bases = bases.clone();
        reverse_complement(&mut rc_bases, false);
        let mut rc_codes = codes.clone();
        reverse_complement(&mut rc_codes, true);
        let mut rev_qual = qual.clone();
        reverse(&mut rev_qual);

        Self {
            name: name.into(),
            forward: SeqView { bases, codes, qual },
            reverse: SeqView { bases: rc_bases, codes: rc_codes, qual: rev_qual },
        }
    }

    pub fn view(&self, strand: Strand) -> &SeqView {
        match strand {
            Strand::Forward => &self.forward,
            Strand::Reverse => &self.reverse,
        }
    }

    pub fn forward(&self) -> &SeqView {
        &self.forward
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

/// 原地反转
#[inline]
pub fn reverse(buf: &mut [u8]) {
    buf.reverse();
}

/// 原地反向互补。`is_int` 为 true 时按 2-bit 整数编码处理，否则按字符处理。
pub fn reverse_complement(buf: &mut [u8], is_int: bool) {
    buf.reverse();
    if is_int {
        buf.iter_mut().for_each(|a| *a = dna::complement_2bit(*a));
    } else {
        buf.iter_mut().for_each(|b| *b = dna::complement(*b));
    }
}
