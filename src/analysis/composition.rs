//! 碱基组成与序列变换：GC/AT 含量、互补、反向互补、翻译。

use serde::Serialize;

use crate::util::dna::{self, Sequence};

/// 标准遗传密码（NCBI table 1），密码子按 ACGT 四进制编码索引，终止密码子为 `*`。
const CODON_TABLE: &[u8; 64] = b"KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSS*CWCLFLF";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BaseCounts {
    pub a: usize,
    pub c: usize,
    pub g: usize,
    pub t: usize,
}

/// 单条序列的完整组成分析结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositionReport {
    pub length: usize,
    pub counts: BaseCounts,
    pub gc_content: f64,
    pub at_content: f64,
    pub complement: Sequence,
    pub reverse: Sequence,
    pub reverse_complement: Sequence,
    pub translation: String,
}

#[inline]
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn percent(count: usize, len: usize) -> f64 {
    round2(100.0 * count as f64 / len as f64)
}

pub fn base_counts(seq: &Sequence) -> BaseCounts {
    let mut counts = BaseCounts::default();
    for &b in seq.as_bytes() {
        match b {
            b'A' => counts.a += 1,
            b'C' => counts.c += 1,
            b'G' => counts.g += 1,
            _ => counts.t += 1,
        }
    }
    counts
}

/// GC 百分比，保留两位小数
pub fn gc_content(seq: &Sequence) -> f64 {
    let c = base_counts(seq);
    percent(c.g + c.c, seq.len())
}

/// AT 百分比，独立计数（与 `gc_content` 之和为 100，误差不超过舍入）
pub fn at_content(seq: &Sequence) -> f64 {
    let c = base_counts(seq);
    percent(c.a + c.t, seq.len())
}

pub fn complement(seq: &Sequence) -> Sequence {
    Sequence::from_valid_bytes(seq.as_bytes().iter().map(|&b| dna::complement(b)))
}

pub fn reverse(seq: &Sequence) -> Sequence {
    Sequence::from_valid_bytes(seq.as_bytes().iter().rev().copied())
}

pub fn reverse_complement(seq: &Sequence) -> Sequence {
    Sequence::from_valid_bytes(dna::revcomp(seq.as_bytes()))
}

#[inline]
fn base_index(b: u8) -> usize {
    match b {
        b'A' => 0,
        b'C' => 1,
        b'G' => 2,
        _ => 3,
    }
}

/// 从位置 0 起按不重叠三联体翻译。
/// 末尾不足 3 个碱基的部分直接丢弃；终止密码子记为 `*`，翻译不在此处截断。
pub fn translate(seq: &Sequence) -> String {
    seq.as_bytes()
        .chunks_exact(3)
        .map(|codon| {
            let idx = base_index(codon[0]) * 16 + base_index(codon[1]) * 4 + base_index(codon[2]);
            char::from(CODON_TABLE[idx])
        })
        .collect()
}

pub fn analyze(seq: &Sequence) -> CompositionReport {
    CompositionReport {
        length: seq.len(),
        counts: base_counts(seq),
        gc_content: gc_content(seq),
        at_content: at_content(seq),
        complement: complement(seq),
        reverse: reverse(seq),
        reverse_complement: reverse_complement(seq),
        translation: translate(seq),
    }
}
