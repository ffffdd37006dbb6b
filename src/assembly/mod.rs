//! 基于重叠的序列组装：两两重叠检测与贪心合并。

pub mod greedy;
pub mod overlap;

pub use greedy::{assemble_greedy, assemble_seed_extend, Assembly, AssemblyStep, Contig};
pub use overlap::{find_overlaps, Overlap};
