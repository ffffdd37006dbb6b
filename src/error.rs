//! 错误类型：所有算法模块共用的可恢复错误。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeqError {
    #[error("sequence is empty")]
    EmptySequence,

    /// `pos` 为去除空白后的 0 起始下标
    #[error("invalid nucleotide '{ch}' at position {pos}")]
    InvalidSequence { ch: char, pos: usize },

    /// `line` 为 1 起始行号
    #[error("malformed FASTA at line {line}: {reason}")]
    MalformedFasta { line: usize, reason: String },

    /// FASTA 记录内的序列校验失败；`line` 为该记录标题行的 1 起始行号
    #[error("FASTA record '{header}' (line {line}): {source}")]
    InvalidRecord {
        header: String,
        line: usize,
        source: Box<SeqError>,
    },

    #[error("pattern is empty")]
    InvalidPattern,

    #[error("k-mer size {k} is invalid (must be in 2..=10 and not exceed sequence length {len})")]
    InvalidK { k: usize, len: usize },

    #[error("pattern length {len} is shorter than index k-mer size {k}")]
    PatternTooShort { len: usize, k: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SeqError>;
