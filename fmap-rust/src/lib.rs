//! # fmap-rust
//!
//! 短 read 比对器的两个核心引擎：
//!
//! - **精确匹配**：基于 FM 索引（BWT + 分块 Occ + 按 rank 采样的后缀数组）的反向搜索，
//!   将 rank 解析为参考坐标，输出位置比对记录（SAM 子集）
//! - **向量比对**：条带化 Smith-Waterman，仿射间隙、可选两端软剪切，检测累加器溢出并统计并列最优
//!
//! ## 快速示例
//!
//! ```rust,no_run
//! use std::io::Cursor;
//! use fmap_rust::index::fm::{FmIndex, IndexOpt};
//! use fmap_rust::io::fasta::FastaReader;
//! use fmap_rust::util::dna;
//!
//! // 构建 FM 索引
//! let mut reader = FastaReader::new(Cursor::new(&b">chr1\nACGTACGTAGCTGATCGTAG\n"[..]));
//! let fm = FmIndex::from_fasta(&mut reader, &IndexOpt::default()).unwrap();
//!
//! // 精确匹配搜索
//! if let Some(iv) = fm.exact_match(&dna::encode(b"GCTGATC")) {
//!     for rank in iv.ranks() {
//!         println!("hit at {}", fm.resolve(rank));
//!     }
//! }
//!
//! // 局部比对
//! let query = dna::encode(b"GCTGATCG");
//! let res = fmap_rust::align::align(&query, &fm.pac.unpack(), true, true, &Default::default(), 30);
//! println!("score {} at [{}, {}]", res.score_fwd, res.target_start, res.target_end);
//! ```
//!
//! ## 模块说明
//!
//! - [`io`] — FASTA / FASTQ 解析、read 源、SAM 记录
//! - [`index`] — 压缩参考、后缀数组、BWT 与 FM 索引
//! - [`align`] — 精确映射、向量 Smith-Waterman 及其标量对照实现
//! - [`bench`] — 向量引擎基准
//! - [`util`] — DNA 编码 / 反向互补 / read 双向视图

pub mod align;
pub mod bench;
pub mod error;
pub mod index;
pub mod io;
pub mod util;
