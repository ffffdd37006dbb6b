use serde::Serialize;
use tracing::debug;

use super::overlap::longest_overlap;
use crate::util::dna::Sequence;

/// 组装得到的连续序列；`members` 为按合并顺序排列的原始序列下标
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contig {
    pub seq: String,
    pub members: Vec<usize>,
}

impl Contig {
    fn from_read(idx: usize, seq: &Sequence) -> Self {
        Self { seq: seq.as_str().to_string(), members: vec![idx] }
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// 追加 `other` 中不重叠的部分
    fn absorb(&mut self, other: &Contig, overlap: usize) {
        self.seq.push_str(&other.seq[overlap..]);
        self.members.extend_from_slice(&other.members);
    }
}

/// 一次合并：source 的后缀与 target 的前缀重叠 `overlap` 个碱基
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssemblyStep {
    pub source_members: Vec<usize>,
    pub target_members: Vec<usize>,
    pub overlap: usize,
    pub merged_len: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Assembly {
    /// 存活的 contig，按工作列表顺序
    pub contigs: Vec<Contig>,
    pub steps: Vec<AssemblyStep>,
    /// 未能接入的原始序列下标（仅种子延伸策略使用）
    pub unplaced: Vec<usize>,
    pub total_input_len: usize,
}

impl Assembly {
    /// 需要单一结果时返回的 contig：最长者，等长时取工作列表中靠前者
    pub fn primary(&self) -> Option<&Contig> {
        self.contigs.iter().fold(None, |best: Option<&Contig>, c| match best {
            Some(b) if b.len() >= c.len() => Some(b),
            _ => Some(c),
        })
    }

    /// `1 - primary 长度 / 输入总长`；空输入为 0
    pub fn compression_ratio(&self) -> f64 {
        if self.total_input_len == 0 {
            return 0.0;
        }
        let assembled = self.primary().map_or(0, Contig::len);
        1.0 - assembled as f64 / self.total_input_len as f64
    }
}

fn total_len(seqs: &[Sequence]) -> usize {
    seqs.iter().map(Sequence::len).sum()
}

/// 全局贪心组装。
///
/// 每步在当前工作列表中选出最长的重叠（同长时取 source 下标最小、再取 target 下标最小），
/// 合并结果占据 source 的位置，target 被移除；直到不存在长度 >= `min_overlap` 的重叠。
/// 重叠矩阵增量维护：每次合并只重算新 contig 所在的行与列，合并顺序与逐步全量重扫一致。
pub fn assemble_greedy(seqs: &[Sequence], min_overlap: usize) -> Assembly {
    let mut items: Vec<Contig> = seqs
        .iter()
        .enumerate()
        .map(|(i, s)| Contig::from_read(i, s))
        .collect();

    let n = items.len();
    let mut matrix: Vec<Vec<Option<usize>>> = vec![vec![None; n]; n];
    for i in 0..n {
        for j in 0..n {
            if i != j {
                matrix[i][j] =
                    longest_overlap(items[i].seq.as_bytes(), items[j].seq.as_bytes(), min_overlap);
            }
        }
    }

    let mut steps = Vec::new();
    loop {
        let mut best: Option<(usize, usize, usize)> = None;
        for (i, row) in matrix.iter().enumerate() {
            for (j, cell) in row.iter().enumerate() {
                if let Some(len) = *cell {
                    if best.map_or(true, |(bl, _, _)| len > bl) {
                        best = Some((len, i, j));
                    }
                }
            }
        }
        let Some((len, si, ti)) = best else { break };

        let target = items.remove(ti);
        let k = if ti < si { si - 1 } else { si };
        let step_source = items[k].members.clone();
        items[k].absorb(&target, len);
        debug!(source = ?step_source, target = ?target.members, overlap = len, "merged contigs");
        steps.push(AssemblyStep {
            source_members: step_source,
            target_members: target.members,
            overlap: len,
            merged_len: items[k].len(),
        });

        matrix.remove(ti);
        for row in matrix.iter_mut() {
            row.remove(ti);
        }
        for x in 0..items.len() {
            if x == k {
                continue;
            }
            matrix[k][x] = longest_overlap(items[k].seq.as_bytes(), items[x].seq.as_bytes(), min_overlap);
            matrix[x][k] = longest_overlap(items[x].seq.as_bytes(), items[k].seq.as_bytes(), min_overlap);
        }
    }

    Assembly {
        contigs: items,
        steps,
        unplaced: Vec::new(),
        total_input_len: total_len(seqs),
    }
}

/// 种子延伸组装：从第 0 条序列出发，每次接入与当前 contig 重叠最长的剩余序列
/// （同长取下标最小者），没有满足 `min_overlap` 的候选时停止；剩余序列记入 `unplaced`，不做拼接。
pub fn assemble_seed_extend(seqs: &[Sequence], min_overlap: usize) -> Assembly {
    let Some(first) = seqs.first() else {
        return Assembly::default();
    };
    let mut contig = Contig::from_read(0, first);
    let mut remaining: Vec<usize> = (1..seqs.len()).collect();
    let mut steps = Vec::new();

    loop {
        let mut best: Option<(usize, usize)> = None;
        for (pos, &idx) in remaining.iter().enumerate() {
            if let Some(len) = longest_overlap(contig.seq.as_bytes(), seqs[idx].as_bytes(), min_overlap) {
                if best.map_or(true, |(bl, _)| len > bl) {
                    best = Some((len, pos));
                }
            }
        }
        let Some((len, pos)) = best else { break };

        let idx = remaining.remove(pos);
        let source_members = contig.members.clone();
        contig.absorb(&Contig::from_read(idx, &seqs[idx]), len);
        debug!(read = idx, overlap = len, len = contig.len(), "extended seed contig");
        steps.push(AssemblyStep {
            source_members,
            target_members: vec![idx],
            overlap: len,
            merged_len: contig.len(),
        });
    }

    Assembly {
        contigs: vec![contig],
        steps,
        unplaced: remaining,
        total_input_len: total_len(seqs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::dna::validate;

    fn seqs(xs: &[&str]) -> Vec<Sequence> {
        xs.iter().map(|x| validate(x).unwrap()).collect()
    }

    /// 每步全量重扫的参考实现
    fn assemble_rescan(seqs: &[Sequence], min_overlap: usize) -> Vec<Contig> {
        let mut items: Vec<Contig> = seqs.iter().enumerate().map(|(i, s)| Contig::from_read(i, s)).collect();
        loop {
            let mut best: Option<(usize, usize, usize)> = None;
            for i in 0..items.len() {
                for j in 0..items.len() {
                    if i == j {
                        continue;
                    }
                    if let Some(l) = longest_overlap(items[i].seq.as_bytes(), items[j].seq.as_bytes(), min_overlap) {
                        if best.map_or(true, |(bl, _, _)| l > bl) {
                            best = Some((l, i, j));
                        }
                    }
                }
            }
            let Some((l, i, j)) = best else { return items };
            let t = items.remove(j);
            let k = if j < i { i - 1 } else { i };
            items[k].absorb(&t, l);
        }
    }

    fn make_genome(len: usize, seed: u32) -> String {
        let bases = ['A', 'C', 'G', 'T'];
        let mut x = seed;
        (0..len)
            .map(|_| {
                x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                bases[(x >> 16) as usize % 4]
            })
            .collect()
    }

    const READS: [&str; 3] = ["ATGCGATCG", "TCGATCGAT", "ATCGATCGC"];

    #[test]
    fn greedy_merges_longest_overlap_first() {
        let a = assemble_greedy(&seqs(&READS), 3);
        assert_eq!(a.contigs.len(), 1);
        assert_eq!(a.steps.len(), 2);
        assert_eq!(a.steps[0].source_members, vec![1]);
        assert_eq!(a.steps[0].target_members, vec![2]);
        assert_eq!(a.steps[0].overlap, 6);
        assert_eq!(a.steps[1].source_members, vec![0]);
        assert_eq!(a.steps[1].target_members, vec![1, 2]);
        assert_eq!(a.steps[1].overlap, 3);

        let p = a.primary().unwrap();
        assert_eq!(p.seq, "ATGCGATCGATCGATCGC");
        assert_eq!(p.members, vec![0, 1, 2]);
        assert_eq!(a.total_input_len, 27);
        assert!((a.compression_ratio() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn seed_extend_follows_best_overlap_from_first_read() {
        let a = assemble_seed_extend(&seqs(&READS), 3);
        let p = a.primary().unwrap();
        assert_eq!(p.seq, "ATGCGATCGATCGC");
        assert_eq!(p.len(), 14);
        assert_eq!(p.members, vec![0, 2]);
        assert_eq!(a.unplaced, vec![1]);
        assert!((a.compression_ratio() - 0.48).abs() < 0.005);
    }

    #[test]
    fn single_read_is_unchanged() {
        let s = seqs(&["ACGTTGCA"]);
        for a in [assemble_greedy(&s, 3), assemble_seed_extend(&s, 3)] {
            assert_eq!(a.primary().unwrap().seq, "ACGTTGCA");
            assert!(a.steps.is_empty());
            assert_eq!(a.compression_ratio(), 0.0);
        }
    }

    #[test]
    fn empty_input() {
        let a = assemble_greedy(&[], 3);
        assert!(a.primary().is_none());
        assert_eq!(a.compression_ratio(), 0.0);
        assert!(assemble_seed_extend(&[], 3).primary().is_none());
    }

    #[test]
    fn ties_break_on_lowest_target() {
        // 0->1 与 0->2 均重叠 2，取 target 1
        let a = assemble_greedy(&seqs(&["ACGTA", "TAGGG", "TACCC"]), 2);
        assert_eq!(a.steps.len(), 1);
        assert_eq!(a.contigs[0].seq, "ACGTAGGG");
        assert_eq!(a.contigs[1].seq, "TACCC");
        assert_eq!(a.primary().unwrap().members, vec![0, 1]);
    }

    #[test]
    fn disconnected_groups_keep_longest_as_primary() {
        let a = assemble_greedy(&seqs(&["AAAACCC", "CCCGGG", "TTTTTT"]), 3);
        assert_eq!(a.contigs.len(), 2);
        assert_eq!(a.primary().unwrap().seq, "AAAACCCGGG");
        assert!((a.compression_ratio() - (1.0 - 10.0 / 19.0)).abs() < 1e-9);

        // 等长时取靠前者
        let b = assemble_greedy(&seqs(&["AAAA", "CCCC"]), 3);
        assert_eq!(b.primary().unwrap().seq, "AAAA");
    }

    #[test]
    fn incremental_matches_full_rescan() {
        for seed in 1..=8u32 {
            let genome = make_genome(60, seed);
            let mut reads = Vec::new();
            let mut start = 0usize;
            let mut x = seed;
            while start + 12 <= genome.len() {
                reads.push(&genome[start..start + 12]);
                x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                start += 3 + (x >> 16) as usize % 6;
            }
            // 打乱顺序以覆盖不同的平局情形
            reads.reverse();
            let s = seqs(&reads);
            for min in [2usize, 4] {
                assert_eq!(assemble_greedy(&s, min).contigs, assemble_rescan(&s, min), "seed={} min={}", seed, min);
            }
        }
    }
}
