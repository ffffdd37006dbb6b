use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::error::{Result, SeqError};
use crate::search::MatchSet;
use crate::util::dna::Sequence;

pub const MIN_K: usize = 2;
pub const MAX_K: usize = 10;

/// k-mer 索引：k-mer -> 升序出现位置。
///
/// 索引不持有原序列；查询时由调用方传入建索引时使用的同一序列。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KmerIndex {
    k: usize,
    seq_len: usize,
    table: BTreeMap<String, Vec<usize>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KmerStats {
    pub sequence_length: usize,
    pub k: usize,
    pub unique_kmers: usize,
    pub total_kmers: usize,
}

impl KmerIndex {
    /// 滑动宽度为 k 的窗口，按插入顺序记录每个 k-mer 的起点。
    pub fn build(seq: &Sequence, k: usize) -> Result<Self> {
        let n = seq.len();
        if !(MIN_K..=MAX_K).contains(&k) || k > n {
            return Err(SeqError::InvalidK { k, len: n });
        }
        let text = seq.as_str();
        let mut table: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for i in 0..=n - k {
            table.entry(text[i..i + k].to_string()).or_default().push(i);
        }
        debug!(k, len = n, unique = table.len(), "built k-mer index");
        Ok(Self { k, seq_len: n, table })
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn positions(&self, kmer: &str) -> &[usize] {
        self.table.get(kmer).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 按 k-mer 字典序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> + '_ {
        self.table.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// 以模式前 k 个符号为探针取候选位置，再逐一完整校验。
    ///
    /// 同一 k-mer 可能在多处出现而后续符号不同，因此校验不可省略。
    /// 模式短于 k 时返回 `PatternTooShort`，不回退为直接扫描。
    pub fn query(&self, seq: &Sequence, pattern: &Sequence) -> Result<MatchSet> {
        let m = pattern.len();
        if m < self.k {
            return Err(SeqError::PatternTooShort { len: m, k: self.k });
        }
        let probe = &pattern.as_str()[..self.k];
        let pattern = pattern.as_bytes();
        let text = seq.as_bytes();
        let hits = self
            .positions(probe)
            .iter()
            .copied()
            .filter(|&pos| text.get(pos..pos + m) == Some(pattern))
            .collect();
        Ok(hits)
    }

    pub fn stats(&self) -> KmerStats {
        KmerStats {
            sequence_length: self.seq_len,
            k: self.k,
            unique_kmers: self.table.len(),
            total_kmers: self.table.values().map(Vec::len).sum(),
        }
    }
}
