use std::io::{BufRead, Cursor};

use serde::Serialize;
use tracing::debug;

use crate::error::{Result, SeqError};
use crate::util::dna::{self, Sequence};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FastaRecord {
    pub header: String,
    pub seq: Sequence,
}

impl FastaRecord {
    /// First whitespace-delimited word of the header.
    pub fn id(&self) -> &str {
        self.header.split_whitespace().next().unwrap_or("")
    }

    pub fn description(&self) -> Option<&str> {
        self.header
            .split_once(char::is_whitespace)
            .map(|(_, d)| d.trim())
            .filter(|d| !d.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FastaStats {
    pub total_sequences: usize,
    pub total_bases: usize,
    pub min_length: usize,
    pub max_length: usize,
    pub avg_length: f64,
}

pub struct FastaReader<R: BufRead> {
    reader: R,
    buf: String,
    done: bool,
    line_no: usize,
    /// 预读到的下一条标题及其行号
    peek_header: Option<(String, usize)>,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            done: false,
            line_no: 0,
            peek_header: None,
        }
    }

    fn read_line(&mut self) -> Result<bool> {
        self.buf.clear();
        let n = self.reader.read_line(&mut self.buf)?;
        if n == 0 {
            self.done = true;
            return Ok(false);
        }
        self.line_no += 1;
        Ok(true)
    }

    pub fn next_record(&mut self) -> Result<Option<FastaRecord>> {
        if self.done && self.peek_header.is_none() {
            return Ok(None);
        }

        // Find header line; only blank lines may precede it
        let (header, header_line) = if let Some(h) = self.peek_header.take() {
            h
        } else {
            loop {
                if !self.read_line()? {
                    return Ok(None);
                }
                if let Some(rest) = self.buf.strip_prefix('>') {
                    break (rest.trim().to_string(), self.line_no);
                }
                if !self.buf.trim().is_empty() {
                    return Err(SeqError::MalformedFasta {
                        line: self.line_no,
                        reason: "sequence data before first header".to_string(),
                    });
                }
            }
        };

        // Read sequence lines up to the next header
        let mut raw = String::new();
        while self.read_line()? {
            if let Some(rest) = self.buf.strip_prefix('>') {
                self.peek_header = Some((rest.trim().to_string(), self.line_no));
                break;
            }
            raw.push_str(&self.buf);
        }

        let seq = dna::validate(&raw).map_err(|e| SeqError::InvalidRecord {
            header: header.clone(),
            line: header_line,
            source: Box::new(e),
        })?;
        debug!(header = %header, len = seq.len(), "parsed FASTA record");
        Ok(Some(FastaRecord { header, seq }))
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = Result<FastaRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// Parse a whole FASTA document held in memory. Empty input yields no records.
pub fn parse(raw: &str) -> Result<Vec<FastaRecord>> {
    FastaReader::new(Cursor::new(raw.as_bytes())).collect()
}

pub fn stats(records: &[FastaRecord]) -> FastaStats {
    if records.is_empty() {
        return FastaStats::default();
    }
    let lengths = records.iter().map(|r| r.seq.len());
    let total_bases: usize = lengths.clone().sum();
    FastaStats {
        total_sequences: records.len(),
        total_bases,
        min_length: lengths.clone().min().unwrap_or(0),
        max_length: lengths.max().unwrap_or(0),
        avg_length: total_bases as f64 / records.len() as f64,
    }
}
