//! # bioanalyzer
//!
//! DNA 序列分析算法库。
//!
//! 本 crate 提供以下功能：
//!
//! - **校验与解析**：原始核苷酸文本校验、多记录 FASTA 解析
//! - **组成分析**：GC/AT 含量、互补、反向互补、翻译
//! - **精确匹配**：朴素扫描与 Boyer-Moore（坏字符规则）
//! - **索引**：k-mer 索引、倍增法后缀数组
//! - **组装**：两两重叠检测与贪心合并
//!
//! ## 快速示例
//!
//! ```rust
//! use bioanalyzer::util::dna;
//! use bioanalyzer::index::{kmer::KmerIndex, sa::SuffixArray};
//! use bioanalyzer::search::{bm, naive};
//!
//! let seq = dna::validate("ATGCGATCGATCGATCG").unwrap();
//! let pattern = dna::parse_pattern("gatc").unwrap();
//!
//! let hits = naive::search(&seq, &pattern).unwrap();
//! assert_eq!(hits, vec![4, 8, 12]);
//!
//! let (bm_hits, table) = bm::search(&seq, &pattern).unwrap();
//! assert_eq!(bm_hits, hits);
//! assert_eq!(table.last_occurrence(b'C'), 3);
//!
//! let idx = KmerIndex::build(&seq, 3).unwrap();
//! assert_eq!(idx.query(&seq, &pattern).unwrap(), hits);
//!
//! let sa = SuffixArray::build(&seq);
//! assert_eq!(sa.search(&seq, &pattern).unwrap(), hits);
//! ```
//!
//! ## 模块说明
//!
//! - [`util`] — `Sequence` 类型与校验
//! - [`io`] — FASTA 解析
//! - [`analysis`] — 碱基组成与序列变换
//! - [`search`] — 精确模式匹配
//! - [`index`] — k-mer 索引与后缀数组
//! - [`assembly`] — 重叠检测与贪心组装
//! - [`report`] — 结果的文本渲染
//! - [`error`] — 错误类型

pub mod analysis;
pub mod assembly;
pub mod error;
pub mod index;
pub mod io;
pub mod report;
pub mod search;
pub mod util;

pub use error::{Result, SeqError};
pub use util::dna::Sequence;
