use std::io::{BufWriter, Write};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{fmt::time::ChronoUtc, EnvFilter};

use bioanalyzer::analysis::composition::{self, CompositionReport};
use bioanalyzer::assembly::{self, overlap, Assembly, Overlap};
use bioanalyzer::index::{kmer::KmerIndex, sa::SuffixArray};
use bioanalyzer::io::fasta::{self, FastaRecord};
use bioanalyzer::report::{self, ReportOpt};
use bioanalyzer::search::{bm, naive, BadCharTable};
use bioanalyzer::util::dna::{self, Sequence};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "bioanalyzer", author, version, about = "DNA sequence analysis toolkit", arg_required_else_help = true)]
struct Cli {
    /// Log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Print results as JSON instead of text tables
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Input file: FASTA, or a raw nucleotide sequence
    #[arg(required_unless_present = "seq", conflicts_with = "seq")]
    input: Option<String>,
    /// Inline sequence text instead of a file
    #[arg(short, long)]
    seq: Option<String>,
}

#[derive(Args, Debug)]
struct DisplayArgs {
    /// Matches listed with context
    #[arg(long = "max-matches", default_value_t = 10)]
    max_matches: usize,
    /// Bases of context on each side of a match
    #[arg(long = "context", default_value_t = 20)]
    context: usize,
    /// k-mer rows shown
    #[arg(long = "max-rows", default_value_t = 20)]
    max_rows: usize,
    /// Suffix characters shown in suffix-array tables
    #[arg(long = "suffix-preview", default_value_t = 15)]
    suffix_preview: usize,
}

impl From<&DisplayArgs> for ReportOpt {
    fn from(d: &DisplayArgs) -> Self {
        ReportOpt {
            max_matches: d.max_matches,
            context: d.context,
            max_rows: d.max_rows,
            suffix_preview: d.suffix_preview,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Strategy {
    /// Always merge the longest overlap in the working set
    Greedy,
    /// Grow one contig from the first read
    SeedExtend,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse FASTA and list records with summary statistics
    Fasta {
        #[command(flatten)]
        input: InputArgs,
    },
    /// GC/AT content, complement, reverse complement and translation per record
    Composition {
        #[command(flatten)]
        input: InputArgs,
        #[arg(short = 't', long = "threads", default_value_t = 1)]
        threads: usize,
    },
    /// Naive exact search over the first record
    Naive {
        #[command(flatten)]
        input: InputArgs,
        #[arg(short, long)]
        pattern: String,
        #[command(flatten)]
        display: DisplayArgs,
    },
    /// Boyer-Moore (bad-character rule) search over the first record
    BoyerMoore {
        #[command(flatten)]
        input: InputArgs,
        #[arg(short, long)]
        pattern: String,
        #[command(flatten)]
        display: DisplayArgs,
    },
    /// Build a k-mer index over the first record, optionally query it
    Kmer {
        #[command(flatten)]
        input: InputArgs,
        #[arg(short, long, default_value_t = 3)]
        k: usize,
        #[arg(short, long)]
        pattern: Option<String>,
        #[command(flatten)]
        display: DisplayArgs,
    },
    /// Build a suffix array over the first record, optionally search it
    Suffix {
        #[command(flatten)]
        input: InputArgs,
        #[arg(short, long)]
        pattern: Option<String>,
        #[command(flatten)]
        display: DisplayArgs,
    },
    /// Pairwise suffix/prefix overlaps between all records
    Overlaps {
        #[command(flatten)]
        input: InputArgs,
        #[arg(short = 'm', long = "min-overlap", default_value_t = 3)]
        min_overlap: usize,
    },
    /// Assemble all records into contigs
    Assemble {
        #[command(flatten)]
        input: InputArgs,
        #[arg(short = 'm', long = "min-overlap", default_value_t = 3)]
        min_overlap: usize,
        #[arg(long, value_enum, default_value_t = Strategy::Greedy)]
        strategy: Strategy,
    },
}

#[derive(Serialize)]
struct Meta {
    tool: &'static str,
    version: &'static str,
    command: &'static str,
    generated_at: String,
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    meta: Meta,
    result: &'a T,
}

#[derive(Serialize)]
struct CompositionEntry<'a> {
    header: &'a str,
    #[serde(flatten)]
    report: &'a CompositionReport,
}

#[derive(Serialize)]
struct SearchResult<'a> {
    header: &'a str,
    pattern: &'a Sequence,
    positions: &'a [usize],
    #[serde(skip_serializing_if = "Option::is_none")]
    bad_char_table: Option<&'a BadCharTable>,
}

#[derive(Serialize)]
struct OverlapResult<'a> {
    overlaps: &'a [Overlap],
    stats: overlap::OverlapStats,
}

#[derive(Serialize)]
struct AssemblyResult<'a> {
    strategy: &'static str,
    primary: Option<&'a str>,
    compression_ratio: f64,
    #[serde(flatten)]
    assembly: &'a Assembly,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let json = cli.json;

    match cli.command {
        Commands::Fasta { input } => {
            let records = load_records(&input)?;
            let stats = fasta::stats(&records);
            if json {
                #[derive(Serialize)]
                struct FastaResult<'a> {
                    records: &'a [FastaRecord],
                    stats: &'a fasta::FastaStats,
                }
                emit_json(&mut out, "fasta", &FastaResult { records: &records, stats: &stats })?;
            } else {
                report::render_records(&mut out, &records, &stats)?;
            }
        }
        Commands::Composition { input, threads } => {
            let records = load_records(&input)?;
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .context("cannot build thread pool")?;
            let reports: Vec<CompositionReport> =
                pool.install(|| records.par_iter().map(|r| composition::analyze(&r.seq)).collect());
            if json {
                let entries: Vec<CompositionEntry> = records
                    .iter()
                    .zip(&reports)
                    .map(|(r, report)| CompositionEntry { header: &r.header, report })
                    .collect();
                emit_json(&mut out, "composition", &entries)?;
            } else {
                for (i, (r, rep)) in records.iter().zip(&reports).enumerate() {
                    if i > 0 {
                        writeln!(out)?;
                    }
                    report::render_composition(&mut out, &r.header, rep)?;
                }
            }
        }
        Commands::Naive { input, pattern, display } => {
            let record = first_record(load_records(&input)?);
            let pattern = dna::parse_pattern(&pattern)?;
            let positions = naive::search(&record.seq, &pattern)?;
            info!(hits = positions.len(), "naive search finished");
            if json {
                let res = SearchResult { header: &record.header, pattern: &pattern, positions: &positions, bad_char_table: None };
                emit_json(&mut out, "naive", &res)?;
            } else {
                report::render_matches(&mut out, &record.seq, pattern.len(), &positions, &ReportOpt::from(&display))?;
            }
        }
        Commands::BoyerMoore { input, pattern, display } => {
            let record = first_record(load_records(&input)?);
            let pattern = dna::parse_pattern(&pattern)?;
            let (positions, table) = bm::search(&record.seq, &pattern)?;
            info!(hits = positions.len(), "boyer-moore search finished");
            if json {
                let res = SearchResult {
                    header: &record.header,
                    pattern: &pattern,
                    positions: &positions,
                    bad_char_table: Some(&table),
                };
                emit_json(&mut out, "boyer-moore", &res)?;
            } else {
                report::render_bad_char_table(&mut out, &table, &pattern)?;
                writeln!(out)?;
                report::render_matches(&mut out, &record.seq, pattern.len(), &positions, &ReportOpt::from(&display))?;
            }
        }
        Commands::Kmer { input, k, pattern, display } => {
            let record = first_record(load_records(&input)?);
            let index = KmerIndex::build(&record.seq, k)?;
            let query = match pattern {
                Some(p) => {
                    let p = dna::parse_pattern(&p)?;
                    let hits = index.query(&record.seq, &p)?;
                    Some((p, hits))
                }
                None => None,
            };
            if json {
                #[derive(Serialize)]
                struct KmerResult<'a> {
                    stats: bioanalyzer::index::kmer::KmerStats,
                    index: &'a KmerIndex,
                    #[serde(skip_serializing_if = "Option::is_none")]
                    query: Option<&'a (Sequence, Vec<usize>)>,
                }
                emit_json(&mut out, "kmer", &KmerResult { stats: index.stats(), index: &index, query: query.as_ref() })?;
            } else {
                let opt = ReportOpt::from(&display);
                report::render_kmer_index(&mut out, &index, &opt)?;
                if let Some((p, hits)) = &query {
                    writeln!(out)?;
                    writeln!(out, "Query {}:", p)?;
                    report::render_matches(&mut out, &record.seq, p.len(), hits, &opt)?;
                }
            }
        }
        Commands::Suffix { input, pattern, display } => {
            let record = first_record(load_records(&input)?);
            let sa = SuffixArray::build(&record.seq);
            let query = match pattern {
                Some(p) => {
                    let p = dna::parse_pattern(&p)?;
                    let hits = sa.search(&record.seq, &p)?;
                    Some((p, hits))
                }
                None => None,
            };
            if json {
                #[derive(Serialize)]
                struct SuffixResult<'a> {
                    suffix_array: &'a SuffixArray,
                    #[serde(skip_serializing_if = "Option::is_none")]
                    query: Option<&'a (Sequence, Vec<usize>)>,
                }
                emit_json(&mut out, "suffix", &SuffixResult { suffix_array: &sa, query: query.as_ref() })?;
            } else {
                let opt = ReportOpt::from(&display);
                report::render_suffix_array(&mut out, &record.seq, &sa, &opt)?;
                if let Some((p, hits)) = &query {
                    writeln!(out)?;
                    writeln!(out, "Query {}:", p)?;
                    report::render_matches(&mut out, &record.seq, p.len(), hits, &opt)?;
                }
            }
        }
        Commands::Overlaps { input, min_overlap } => {
            let seqs = sequences(load_records(&input)?);
            let overlaps = assembly::find_overlaps(&seqs, min_overlap);
            let stats = overlap::stats(&overlaps);
            if json {
                emit_json(&mut out, "overlaps", &OverlapResult { overlaps: &overlaps, stats })?;
            } else {
                report::render_overlaps(&mut out, &seqs, &overlaps, &stats)?;
                if let Some(top) = overlaps.iter().max_by_key(|o| o.len) {
                    writeln!(out)?;
                    report::render_overlap_detail(&mut out, &seqs[top.source], &seqs[top.target], top.len)?;
                }
            }
        }
        Commands::Assemble { input, min_overlap, strategy } => {
            let seqs = sequences(load_records(&input)?);
            let (name, result) = match strategy {
                Strategy::Greedy => ("greedy", assembly::assemble_greedy(&seqs, min_overlap)),
                Strategy::SeedExtend => ("seed-extend", assembly::assemble_seed_extend(&seqs, min_overlap)),
            };
            info!(strategy = name, contigs = result.contigs.len(), steps = result.steps.len(), "assembly finished");
            if json {
                let res = AssemblyResult {
                    strategy: name,
                    primary: result.primary().map(|c| c.seq.as_str()),
                    compression_ratio: result.compression_ratio(),
                    assembly: &result,
                };
                emit_json(&mut out, "assemble", &res)?;
            } else {
                report::render_assembly(&mut out, &result)?;
            }
        }
    }

    out.flush()?;
    Ok(())
}

fn init_logging(verbose: u8) -> Result<()> {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))
}

/// Read the input; text containing a `>` header line is FASTA, anything else one raw sequence.
fn load_records(input: &InputArgs) -> Result<Vec<FastaRecord>> {
    let (text, label) = match (&input.input, &input.seq) {
        (_, Some(s)) => (s.clone(), "inline".to_string()),
        (Some(path), None) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read input '{}'", path))?;
            (text, path.clone())
        }
        (None, None) => bail!("no input given; pass a file path or --seq"),
    };

    if text.lines().any(|l| l.starts_with('>')) {
        let records = fasta::parse(&text).with_context(|| format!("cannot parse FASTA '{}'", label))?;
        if records.is_empty() {
            bail!("FASTA input '{}' contains no sequences", label);
        }
        info!(records = records.len(), "loaded FASTA input");
        Ok(records)
    } else {
        let seq = dna::validate(&text).with_context(|| format!("invalid sequence in '{}'", label))?;
        Ok(vec![FastaRecord { header: label, seq }])
    }
}

fn first_record(mut records: Vec<FastaRecord>) -> FastaRecord {
    if records.len() > 1 {
        warn!(records = records.len(), "multiple records given; using the first");
    }
    records.swap_remove(0)
}

fn sequences(records: Vec<FastaRecord>) -> Vec<Sequence> {
    records.into_iter().map(|r| r.seq).collect()
}

fn emit_json<T: Serialize>(out: &mut dyn Write, command: &'static str, result: &T) -> Result<()> {
    let envelope = Envelope {
        meta: Meta {
            tool: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            command,
            generated_at: chrono::Utc::now().to_rfc3339(),
        },
        result,
    };
    serde_json::to_writer_pretty(&mut *out, &envelope)?;
    writeln!(out)?;
    Ok(())
}
