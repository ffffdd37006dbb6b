//! 精确模式匹配：朴素扫描与 Boyer-Moore（仅坏字符规则）。

pub mod bm;
pub mod naive;

/// 升序、去重的 0 起始匹配位置
pub type MatchSet = Vec<usize>;

pub use bm::BadCharTable;
