use crate::error::Result;
use crate::util::dna::Sequence;

use super::MatchSet;

/// 朴素匹配：对每个起点逐字符比较，O(n·m) 时间，除结果外 O(1) 空间。
///
/// 模式须经 [`parse_pattern`](crate::util::dna::parse_pattern) 得到，空模式在那里已被拒绝。
pub fn search(seq: &Sequence, pattern: &Sequence) -> Result<MatchSet> {
    let text = seq.as_bytes();
    let pattern = pattern.as_bytes();
    let n = text.len();
    let m = pattern.len();
    let mut positions = Vec::new();
    if m > n {
        return Ok(positions);
    }
    for i in 0..=n - m {
        let mut j = 0;
        while j < m && text[i + j] == pattern[j] {
            j += 1;
        }
        if j == m {
            positions.push(i);
        }
    }
    Ok(positions)
}
