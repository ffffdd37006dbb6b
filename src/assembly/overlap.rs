use serde::Serialize;

use crate::util::dna::Sequence;

/// 有向重叠：`source` 的长度为 `len` 的后缀等于 `target` 的前缀
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Overlap {
    pub source: usize,
    pub target: usize,
    pub len: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverlapStats {
    pub total_pairs: usize,
    pub min_overlap: usize,
    pub max_overlap: usize,
    pub avg_overlap: f64,
}

/// `a` 的后缀与 `b` 的前缀的最长重叠，长度不小于 `min_len`（至少为 1）。
pub fn longest_overlap(a: &[u8], b: &[u8], min_len: usize) -> Option<usize> {
    let lo = min_len.max(1);
    let hi = a.len().min(b.len());
    (lo..=hi).rev().find(|&l| a[a.len() - l..] == b[..l])
}

/// 所有有序对 (i, j)，i != j，按 (i, j) 顺序输出；每对只保留最长重叠。
pub fn find_overlaps(seqs: &[Sequence], min_overlap: usize) -> Vec<Overlap> {
    let mut out = Vec::new();
    for (i, a) in seqs.iter().enumerate() {
        for (j, b) in seqs.iter().enumerate() {
            if i == j {
                continue;
            }
            if let Some(len) = longest_overlap(a.as_bytes(), b.as_bytes(), min_overlap) {
                out.push(Overlap { source: i, target: j, len });
            }
        }
    }
    out
}

pub fn stats(overlaps: &[Overlap]) -> OverlapStats {
    if overlaps.is_empty() {
        return OverlapStats::default();
    }
    let total: usize = overlaps.iter().map(|o| o.len).sum();
    OverlapStats {
        total_pairs: overlaps.len(),
        min_overlap: overlaps.iter().map(|o| o.len).min().unwrap_or(0),
        max_overlap: overlaps.iter().map(|o| o.len).max().unwrap_or(0),
        avg_overlap: total as f64 / overlaps.len() as f64,
    }
}
