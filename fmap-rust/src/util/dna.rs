/// 碱基字母表大小（A/C/G/T），哨兵与 N 不计入
pub const SIGMA: usize = 4;

/// 非 ACGT 碱基的整数编码，不会与索引中的任何符号匹配
pub const AMBIG: u8 = 4;

/// 2-bit 编码：A=0, C=1, G=2, T/U=3，其余为 [`AMBIG`]
#[inline]
pub fn to_2bit(b: u8) -> u8 {
    match b.to_ascii_uppercase() {
        b'A' => 0,
        b'C' => 1,
        b'G' => 2,
        b'T' | b'U' => 3,
        _ => AMBIG,
    }
}

#[inline]
pub fn from_2bit(a: u8) -> u8 {
    match a {
        0 => b'A',
        1 => b'C',
        2 => b'G',
        3 => b'T',
        _ => b'N',
    }
}

pub fn encode(seq: &[u8]) -> Vec<u8> {
    seq.iter().map(|&b| to_2bit(b)).collect()
}

pub fn decode(codes: &[u8]) -> Vec<u8> {
    codes.iter().map(|&a| from_2bit(a)).collect()
}

/// 字符形式的互补碱基，保留大小写
#[inline]
pub fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' | b'U' => b'A',
        b'a' => b't',
        b'c' => b'g',
        b'g' => b'c',
        b't' | b'u' => b'a',
        b'n' => b'n',
        _ => b'N',
    }
}

/// 整数形式的互补碱基：3 - a，AMBIG 保持不变
#[inline]
pub fn complement_2bit(a: u8) -> u8 {
    if a < AMBIG { 3 - a } else { AMBIG }
}

pub fn revcomp(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement(b)).collect()
}

pub fn revcomp_2bit(codes: &[u8]) -> Vec<u8> {
    codes.iter().rev().map(|&a| complement_2bit(a)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_acgt() {
        assert_eq!(encode(b"ACGTacgu"), vec![0, 1, 2, 3, 0, 1, 2, 3]);
        assert_eq!(decode(&[0, 1, 2, 3, 4]), b"ACGTN".to_vec());
    }

    #[test]
    fn ambiguous_bases_map_to_ambig() {
        assert_eq!(to_2bit(b'N'), AMBIG);
        assert_eq!(to_2bit(b'R'), AMBIG);
        assert_eq!(complement_2bit(AMBIG), AMBIG);
    }

    #[test]
    fn revcomp_both_forms_agree() {
        let seq = b"AACGTN";
        assert_eq!(revcomp(seq), b"NACGTT".to_vec());
        assert_eq!(revcomp_2bit(&encode(seq)), encode(&revcomp(seq)));
    }

    #[test]
    fn complement_preserves_case() {
        assert_eq!(revcomp(b"acGT"), b"ACgt".to_vec());
    }
}
