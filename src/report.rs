//! Plain-text renderers for analysis results.
//!
//! Every renderer writes to a `dyn Write` so the CLI can stream to stdout
//! and tests can capture into a `Vec<u8>`.

use std::io::{self, Write};

use crate::analysis::composition::CompositionReport;
use crate::assembly::{Assembly, Overlap};
use crate::assembly::overlap::OverlapStats;
use crate::index::kmer::KmerIndex;
use crate::index::sa::SuffixArray;
use crate::io::fasta::{FastaRecord, FastaStats};
use crate::search::BadCharTable;
use crate::util::dna::{Sequence, ALPHABET};

/// Display limits for the renderers.
#[derive(Debug, Clone, Copy)]
pub struct ReportOpt {
    /// Matches listed before summarizing the rest
    pub max_matches: usize,
    /// Bases of context on each side of a match
    pub context: usize,
    /// k-mer rows shown
    pub max_rows: usize,
    /// Suffix characters shown in suffix-array tables
    pub suffix_preview: usize,
}

impl Default for ReportOpt {
    fn default() -> Self {
        Self { max_matches: 10, context: 20, max_rows: 20, suffix_preview: 15 }
    }
}

fn preview(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

pub fn render_records(out: &mut dyn Write, records: &[FastaRecord], stats: &FastaStats) -> io::Result<()> {
    writeln!(out, "{:<4} {:<30} {:>8}  Sequence", "#", "ID", "Length")?;
    writeln!(out, "{}", "-".repeat(70))?;
    for (i, r) in records.iter().enumerate() {
        writeln!(out, "{:<4} {:<30} {:>8}  {}", i + 1, preview(r.id(), 30), r.seq.len(), preview(r.seq.as_str(), 24))?;
    }
    writeln!(out)?;
    writeln!(out, "Total sequences: {}", stats.total_sequences)?;
    writeln!(out, "Total bases:     {}", stats.total_bases)?;
    writeln!(out, "Min length:      {}", stats.min_length)?;
    writeln!(out, "Max length:      {}", stats.max_length)?;
    writeln!(out, "Avg length:      {:.2}", stats.avg_length)?;
    Ok(())
}

pub fn render_composition(out: &mut dyn Write, header: &str, r: &CompositionReport) -> io::Result<()> {
    writeln!(out, ">{}", header)?;
    writeln!(out, "Length:             {}", r.length)?;
    writeln!(out, "A/C/G/T:            {}/{}/{}/{}", r.counts.a, r.counts.c, r.counts.g, r.counts.t)?;
    writeln!(out, "GC content:         {:.2}%", r.gc_content)?;
    writeln!(out, "AT content:         {:.2}%", r.at_content)?;
    writeln!(out, "Complement:         {}", r.complement)?;
    writeln!(out, "Reverse:            {}", r.reverse)?;
    writeln!(out, "Reverse complement: {}", r.reverse_complement)?;
    writeln!(out, "Translation:        {}", r.translation)?;
    Ok(())
}

/// Matches with surrounding context, the matched bases in brackets.
pub fn render_matches(
    out: &mut dyn Write,
    seq: &Sequence,
    pattern_len: usize,
    positions: &[usize],
    opt: &ReportOpt,
) -> io::Result<()> {
    if positions.is_empty() {
        return writeln!(out, "No matches found.");
    }
    let text = seq.as_str();
    writeln!(out, "Found {} match(es): {:?}", positions.len(), positions)?;
    writeln!(out)?;
    for (i, &pos) in positions.iter().take(opt.max_matches).enumerate() {
        let start = pos.saturating_sub(opt.context);
        let end = (pos + pattern_len + opt.context).min(text.len());
        writeln!(out, "Match {} at position {}:", i + 1, pos)?;
        writeln!(
            out,
            "  ...{}[{}]{}...",
            &text[start..pos],
            &text[pos..pos + pattern_len],
            &text[pos + pattern_len..end]
        )?;
    }
    if positions.len() > opt.max_matches {
        writeln!(out, "... and {} more matches", positions.len() - opt.max_matches)?;
    }
    Ok(())
}

pub fn render_bad_char_table(out: &mut dyn Write, table: &BadCharTable, pattern: &Sequence) -> io::Result<()> {
    writeln!(out, "Bad Character Table (pattern {}, length {}):", pattern, table.pattern_len)?;
    writeln!(out, "Symbol | Last index")?;
    writeln!(out, "-------+-----------")?;
    for &b in &ALPHABET {
        writeln!(out, "{:>6} | {:>10}", char::from(b), table.last_occurrence(b))?;
    }
    Ok(())
}

pub fn render_kmer_index(out: &mut dyn Write, index: &KmerIndex, opt: &ReportOpt) -> io::Result<()> {
    let stats = index.stats();
    writeln!(
        out,
        "k = {}, sequence length = {}, unique k-mers = {}, total k-mers = {}",
        stats.k, stats.sequence_length, stats.unique_kmers, stats.total_kmers
    )?;
    writeln!(out)?;
    writeln!(out, "{:<10} Positions", "K-mer")?;
    writeln!(out, "{}", "-".repeat(60))?;
    for (kmer, positions) in index.iter().take(opt.max_rows) {
        if positions.len() <= 10 {
            writeln!(out, "{:<10} {:?}", kmer, positions)?;
        } else {
            writeln!(out, "{:<10} {:?}...", kmer, &positions[..10])?;
        }
    }
    if stats.unique_kmers > opt.max_rows {
        writeln!(out)?;
        writeln!(out, "... and {} more k-mers", stats.unique_kmers - opt.max_rows)?;
    }
    Ok(())
}

/// Rank table for every doubling round, then the final suffix order.
pub fn render_suffix_array(out: &mut dyn Write, seq: &Sequence, sa: &SuffixArray, opt: &ReportOpt) -> io::Result<()> {
    let text = seq.as_str();
    writeln!(out, "Text: {}", text)?;
    writeln!(out, "Length: {}", text.len())?;
    writeln!(out)?;

    write!(out, "Pos | {:<w$} |", "Suffix", w = opt.suffix_preview)?;
    for round in sa.rounds() {
        write!(out, " {:>4}", format!("k={}", round.prefix_len))?;
    }
    writeln!(out)?;
    writeln!(out, "{}", "-".repeat(opt.suffix_preview + 9 + sa.rounds().len() * 5))?;
    for pos in 0..text.len() {
        write!(out, "{:>3} | {:<w$} |", pos, preview(&text[pos..], opt.suffix_preview), w = opt.suffix_preview)?;
        for round in sa.rounds() {
            write!(out, " {:>4}", round.ranks[pos])?;
        }
        writeln!(out)?;
    }

    writeln!(out)?;
    writeln!(out, "Final Suffix Array Order:")?;
    writeln!(out, "Rank | Position | Suffix")?;
    writeln!(out, "{}", "-".repeat(40))?;
    for (rank, &pos) in sa.sa().iter().enumerate() {
        writeln!(out, "{:>4} | {:>8} | {}", rank, pos, preview(&text[pos..], opt.suffix_preview))?;
    }
    Ok(())
}

pub fn render_overlaps(
    out: &mut dyn Write,
    seqs: &[Sequence],
    overlaps: &[Overlap],
    stats: &OverlapStats,
) -> io::Result<()> {
    if overlaps.is_empty() {
        return writeln!(out, "No overlaps found.");
    }
    let mut sorted: Vec<&Overlap> = overlaps.iter().collect();
    sorted.sort_by(|a, b| b.len.cmp(&a.len));

    writeln!(out, "{:<20} {:<20} {:>14}", "Sequence A", "Sequence B", "Overlap Length")?;
    writeln!(out, "{}", "-".repeat(70))?;
    for o in sorted {
        writeln!(
            out,
            "{:<20} {:<20} {:>14}",
            preview(seqs[o.source].as_str(), 15),
            preview(seqs[o.target].as_str(), 15),
            o.len
        )?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "Pairs: {}, min: {}, max: {}, avg: {:.2}",
        stats.total_pairs, stats.min_overlap, stats.max_overlap, stats.avg_overlap
    )?;
    Ok(())
}

/// A above B, B shifted so the shared region lines up under A's suffix.
pub fn render_overlap_detail(out: &mut dyn Write, a: &Sequence, b: &Sequence, len: usize) -> io::Result<()> {
    let len = len.min(a.len()).min(b.len());
    if len == 0 {
        return writeln!(out, "No overlap");
    }
    let start = a.len() - len;
    writeln!(out, "Sequence A: {}", a)?;
    writeln!(out, "{}{}", " ".repeat(12 + start), "|".repeat(len))?;
    writeln!(out, "Sequence B: {}{}", " ".repeat(start), b)?;
    writeln!(out)?;
    writeln!(out, "Overlap region: {}", &a.as_str()[start..])?;
    writeln!(out, "Overlap length: {} bp", len)?;
    Ok(())
}

pub fn render_assembly(out: &mut dyn Write, assembly: &Assembly) -> io::Result<()> {
    writeln!(out, "Merge steps:")?;
    if assembly.steps.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for (i, s) in assembly.steps.iter().enumerate() {
        writeln!(
            out,
            "  {}. {:?} + {:?} overlap {} -> length {}",
            i + 1,
            s.source_members,
            s.target_members,
            s.overlap,
            s.merged_len
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Contigs:")?;
    for c in &assembly.contigs {
        writeln!(out, "  {:?} ({} bp) {}", c.members, c.len(), c.seq)?;
    }
    if !assembly.unplaced.is_empty() {
        writeln!(out, "Unplaced reads: {:?}", assembly.unplaced)?;
    }
    writeln!(out)?;
    match assembly.primary() {
        Some(p) => {
            writeln!(out, "Assembled: {}", p.seq)?;
            writeln!(out, "Assembled length: {} bp (input {} bp)", p.len(), assembly.total_input_len)?;
        }
        None => writeln!(out, "Assembled: (empty)")?,
    }
    writeln!(out, "Compression ratio: {:.2}%", assembly.compression_ratio() * 100.0)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::{assemble_seed_extend, find_overlaps, overlap};
    use crate::search::{bm, naive};
    use crate::util::dna::validate;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        let mut buf: Vec<u8> = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn matches_show_context_and_overflow() {
        let s = validate("AAAACGTAAAACGTAAAA").unwrap();
        let pos = naive::search(&s, &validate("CGT").unwrap()).unwrap();
        let opt = ReportOpt { max_matches: 1, context: 2, ..ReportOpt::default() };
        let text = render(|o| render_matches(o, &s, 3, &pos, &opt));
        assert!(text.contains("Found 2 match(es)"));
        assert!(text.contains("...AA[CGT]AA..."));
        assert!(text.contains("... and 1 more matches"));

        let none = render(|o| render_matches(o, &s, 3, &[], &opt));
        assert_eq!(none, "No matches found.\n");
    }

    #[test]
    fn bad_char_table_lists_absent_symbols() {
        let s = validate("ACACGT").unwrap();
        let p = validate("ACA").unwrap();
        let (_, table) = bm::search(&s, &p).unwrap();
        let text = render(|o| render_bad_char_table(o, &table, &p));
        assert!(text.contains("     A |          2"));
        assert!(text.contains("     G |         -1"));
    }

    #[test]
    fn kmer_table_truncates_rows() {
        let s = validate("ACGTTGCAACGT").unwrap();
        let idx = KmerIndex::build(&s, 2).unwrap();
        let opt = ReportOpt { max_rows: 3, ..ReportOpt::default() };
        let text = render(|o| render_kmer_index(o, &idx, &opt));
        assert!(text.contains("AA         [7]"));
        assert!(text.contains("more k-mers"));
    }

    #[test]
    fn suffix_array_table_has_one_column_per_round() {
        let s = validate("GATAGA").unwrap();
        let sa = SuffixArray::build(&s);
        let text = render(|o| render_suffix_array(o, &s, &sa, &ReportOpt::default()));
        assert!(text.contains("k=1"));
        assert!(text.contains("k=4"));
        assert!(text.contains("   0 |        5 | A"));
    }

    #[test]
    fn overlap_detail_without_overlap() {
        let a = validate("AAAA").unwrap();
        let b = validate("CCCC").unwrap();
        assert_eq!(render(|o| render_overlap_detail(o, &a, &b, 0)), "No overlap\n");
    }

    #[test]
    fn overlaps_and_assembly_render() {
        let reads: Vec<Sequence> = ["ATGCGATCG", "TCGATCGAT", "ATCGATCGC"]
            .iter()
            .map(|r| validate(r).unwrap())
            .collect();
        let ov = find_overlaps(&reads, 3);
        let text = render(|o| render_overlaps(o, &reads, &ov, &overlap::stats(&ov)));
        let first_row = text.lines().nth(2).unwrap();
        assert!(first_row.starts_with("TCGATCGAT"));
        assert!(first_row.ends_with('6'));

        let top = ov.iter().max_by_key(|o| o.len).unwrap();
        let text = render(|o| render_overlap_detail(o, &reads[top.source], &reads[top.target], top.len));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Sequence A: TCGATCGAT");
        assert_eq!(lines[1], "               ||||||");
        assert_eq!(lines[2], "Sequence B:    ATCGATCGC");
        assert_eq!(lines[4], "Overlap region: ATCGAT");
        assert_eq!(lines[5], "Overlap length: 6 bp");

        let a = assemble_seed_extend(&reads, 3);
        let text = render(|o| render_assembly(o, &a));
        assert!(text.contains("Assembled: ATGCGATCGATCGC"));
        assert!(text.contains("Unplaced reads: [1]"));
        assert!(text.contains("Compression ratio: 48.15%"));
    }
}
