use serde::Serialize;
use tracing::{debug, trace};

use crate::error::Result;
use crate::search::MatchSet;
use crate::util::dna::Sequence;

/// 倍增过程中某一轮的名次表：`ranks[i]` 为后缀 i 前 `prefix_len` 个符号的名次。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankRound {
    pub prefix_len: usize,
    pub ranks: Vec<usize>,
}

/// 后缀数组及其构建过程中每一轮的名次表（供展示）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuffixArray {
    sa: Vec<usize>,
    rounds: Vec<RankRound>,
}

#[inline]
fn all_distinct(ranks: &[usize]) -> bool {
    ranks.iter().copied().max().map_or(true, |m| m + 1 == ranks.len())
}

/// 后缀 p 的前 m 个符号（不足则取到末尾；p 越界时为空）
#[inline]
fn prefix_at(text: &[u8], p: usize, m: usize) -> &[u8] {
    text.get(p..).map(|s| &s[..m.min(s.len())]).unwrap_or(&[])
}

impl SuffixArray {
    /// 构建后缀数组（倍增法，每轮 O(n log n) 排序）。
    ///
    /// 第 0 轮名次为单个符号的稠密字典序名次；越过序列末尾视为哨兵（-1），
    /// 比任何符号都小。每轮按 `(rank[i], rank[i+w])` 稳定排序后重新编号，
    /// 名次全部不同或 `w >= n` 时停止。
    pub fn build(seq: &Sequence) -> Self {
        let text = seq.as_bytes();
        let n = text.len();

        let mut symbols: Vec<u8> = text.to_vec();
        symbols.sort_unstable();
        symbols.dedup();
        let mut rank: Vec<usize> = text
            .iter()
            .map(|b| symbols.partition_point(|s| s < b))
            .collect();

        let mut rounds = vec![RankRound { prefix_len: 1, ranks: rank.clone() }];
        let mut sa: Vec<usize> = (0..n).collect();
        let mut tmp: Vec<usize> = vec![0; n];

        let key = |rank: &[usize], i: usize, w: usize| -> (i64, i64) {
            let second = if i + w < n { rank[i + w] as i64 } else { -1 };
            (rank[i] as i64, second)
        };

        let mut w = 1usize;
        while !all_distinct(&rank) && w < n {
            // 稳定排序：名次对相同的位置保持原下标顺序
            sa = (0..n).collect();
            sa.sort_by_key(|&i| key(&rank, i, w));

            tmp[sa[0]] = 0;
            for t in 1..n {
                let a = sa[t - 1];
                let b = sa[t];
                tmp[b] = tmp[a] + usize::from(key(&rank, a, w) != key(&rank, b, w));
            }

            // 复制回 rank
            rank.copy_from_slice(&tmp);
            w <<= 1;
            trace!(prefix_len = w, "doubling round");
            rounds.push(RankRound { prefix_len: w, ranks: rank.clone() });
        }

        // 名次即最终位置
        for (i, &r) in rank.iter().enumerate() {
            sa[r] = i;
        }
        debug!(len = n, rounds = rounds.len(), "built suffix array");
        Self { sa, rounds }
    }

    pub fn sa(&self) -> &[usize] {
        &self.sa
    }

    pub fn rounds(&self) -> &[RankRound] {
        &self.rounds
    }

    /// 逆后缀数组：`rank()[sa[i]] == i`
    pub fn rank(&self) -> &[usize] {
        self.rounds.last().map(|r| r.ranks.as_slice()).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.sa.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sa.is_empty()
    }

    /// 在后缀数组上二分查找以 `pattern` 开头的后缀区间，返回升序位置。
    /// `seq` 应为构建时使用的序列；传入其他序列不会越界，但结果无意义。
    pub fn search(&self, seq: &Sequence, pattern: &Sequence) -> Result<MatchSet> {
        let text = seq.as_bytes();
        let pattern = pattern.as_bytes();
        let m = pattern.len();
        let l = self.sa.partition_point(|&p| prefix_at(text, p, m) < pattern);
        let r = l + self.sa[l..].partition_point(|&p| prefix_at(text, p, m) == pattern);

        let mut hits = self.sa[l..r].to_vec();
        hits.sort_unstable();
        Ok(hits)
    }
}
