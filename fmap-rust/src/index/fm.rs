use std::io::{BufRead, BufReader, BufWriter};
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::bwt::{build_bwt, BwtIndex, RankInterval};
use super::pac::{PackedReference, RefCoord};
use super::sa::{build_sa, SampledSa};
use crate::error::{Error, OutOfBounds, Result};
use crate::io::fasta::FastaReader;

/// 索引文件格式版本，结构变化时递增
pub const FORMAT_VERSION: u32 = 1;

/// 索引文件后缀
pub const INDEX_SUFFIX: &str = "fmi";

/// 索引构建参数
#[derive(Debug, Clone, Copy)]
pub struct IndexOpt {
    /// 后缀数组按 rank 采样的间隔
    pub sa_interval: u32,
    /// Occ 前缀计数的采样间隔
    pub occ_interval: u32,
    /// 替换参考中非 ACGT 碱基所用的随机种子
    pub seed: u64,
}

impl Default for IndexOpt {
    fn default() -> Self {
        Self { sa_interval: 32, occ_interval: 128, seed: 11 }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct IndexMeta {
    pub reference_file: Option<String>,
    pub build_args: Option<String>,
    pub build_timestamp: Option<String>,
}

/// 一次比对会话所需的全部只读索引：压缩参考、BWT 与采样后缀数组。
///
/// 构建后不可变，可在多个线程间共享引用并发检索。
#[derive(Debug, Serialize, Deserialize)]
pub struct FmIndex {
    version: u32,
    pub pac: PackedReference,
    pub bwt: BwtIndex,
    pub sa: SampledSa,
    pub meta: IndexMeta,
}

impl FmIndex {
    pub fn build(pac: PackedReference, opt: &IndexOpt) -> Self {
        let codes = pac.unpack();
        let full_sa = build_sa(&codes);
        let bwt = BwtIndex::build(build_bwt(&codes, &full_sa), opt.occ_interval as usize);
        let sa = SampledSa::from_full(&full_sa, opt.sa_interval);
        log::debug!(
            "built index: {} bases, {} contigs, sa interval {}, occ interval {}",
            pac.len(),
            pac.contigs().len(),
            sa.interval(),
            opt.occ_interval
        );
        Self { version: FORMAT_VERSION, pac, bwt, sa, meta: IndexMeta::default() }
    }

    /// 从 FASTA 记录构建。没有序列或全部为空序列时报错。
    pub fn from_fasta<R: BufRead>(reader: &mut FastaReader<R>, opt: &IndexOpt) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(opt.seed);
        let mut pac = PackedReference::new();
        while let Some(rec) = reader.next_record()? {
            pac.push_contig(rec.id, &rec.seq, &mut rng)?;
        }
        if pac.contigs().is_empty() {
            return Err(Error::InvalidFormat("FASTA contains no sequences".into()));
        }
        if pac.is_empty() {
            return Err(Error::InvalidFormat("FASTA contains only empty sequences".into()));
        }
        Ok(Self::build(pac, opt))
    }

    pub fn set_meta(&mut self, meta: IndexMeta) {
        self.meta = meta;
    }

    /// 精确匹配：返回与查询完全相同的后缀所在的 rank 区间
    pub fn exact_match(&self, query: &[u8]) -> Option<RankInterval> {
        self.bwt.exact_match(query)
    }

    /// rank → 绝对坐标
    pub fn resolve(&self, rank: u32) -> u32 {
        self.sa.resolve(&self.bwt, rank)
    }

    /// rank → (contig, 1-based 位置)，要求长度为 `span` 的区间不跨 contig
    pub fn rank_to_contig(&self, rank: u32, span: u32) -> std::result::Result<RefCoord, OutOfBounds> {
        self.pac.pac_to_contig(self.resolve(rank), span)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut w = BufWriter::new(std::fs::File::create(path)?);
        bincode::serialize_into(&mut w, self)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::MissingFile(path.to_path_buf()));
        }
        let idx: Self = bincode::deserialize_from(BufReader::new(std::fs::File::open(path)?))?;
        if idx.version != FORMAT_VERSION {
            return Err(Error::InvalidFormat(format!(
                "index format version {} (expected {})",
                idx.version, FORMAT_VERSION
            )));
        }
        Ok(idx)
    }
}

/// `<prefix>.fmi`
pub fn index_path(prefix: &str) -> String {
    format!("{}.{}", prefix, INDEX_SUFFIX)
}
