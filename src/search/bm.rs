use std::collections::BTreeMap;

use serde::Serialize;
use tracing::trace;

use crate::error::Result;
use crate::util::dna::Sequence;

use super::MatchSet;

/// 坏字符表：模式中每个符号最后一次出现的下标。
/// 未出现的符号视为 -1。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadCharTable {
    pub pattern_len: usize,
    pub last: BTreeMap<char, usize>,
    #[serde(skip)]
    lookup: Vec<isize>,
}

impl BadCharTable {
    pub fn build(pattern: &Sequence) -> Self {
        let mut lookup = vec![-1isize; 256];
        let mut last = BTreeMap::new();
        for (i, &b) in pattern.as_bytes().iter().enumerate() {
            lookup[b as usize] = i as isize;
            last.insert(char::from(b), i);
        }
        Self { pattern_len: pattern.len(), last, lookup }
    }

    #[inline]
    pub fn last_occurrence(&self, sym: u8) -> isize {
        self.lookup[sym as usize]
    }
}

/// Boyer-Moore 精确匹配（仅坏字符规则，无好后缀规则）。
///
/// 每个对齐窗口内从右向左比较；在模式位置 `j` 失配时，
/// 窗口右移 `max(1, j - last(text[s + j]))`；完全匹配时记录位置并右移 1，
/// 以便找到重叠匹配。返回匹配位置和用于展示的坏字符表。
pub fn search(seq: &Sequence, pattern: &Sequence) -> Result<(MatchSet, BadCharTable)> {
    let table = BadCharTable::build(pattern);
    let pattern = pattern.as_bytes();
    let text = seq.as_bytes();
    let n = text.len();
    let m = pattern.len();

    let mut positions = Vec::new();
    if m > n {
        return Ok((positions, table));
    }

    let mut s = 0usize;
    let mut windows = 0usize;
    while s <= n - m {
        windows += 1;
        let mut j = m as isize - 1;
        while j >= 0 && pattern[j as usize] == text[s + j as usize] {
            j -= 1;
        }
        if j < 0 {
            positions.push(s);
            s += 1;
        } else {
            let bad = text[s + j as usize];
            let shift = (j - table.last_occurrence(bad)).max(1);
            s += shift as usize;
        }
    }
    trace!(n, m, windows, hits = positions.len(), "boyer-moore scan done");
    Ok((positions, table))
}
