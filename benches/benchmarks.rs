use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bioanalyzer::assembly;
use bioanalyzer::index::{kmer::KmerIndex, sa::SuffixArray};
use bioanalyzer::search::{bm, naive};
use bioanalyzer::util::dna::{self, Sequence};

fn make_reference(len: usize) -> Sequence {
    let bases = ['A', 'C', 'G', 'T'];
    let mut seq = String::with_capacity(len);
    let mut x: u32 = 42;
    for _ in 0..len {
        x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        seq.push(bases[(x >> 16) as usize % 4]);
    }
    dna::validate(&seq).expect("generated sequence is valid")
}

fn bench_search(c: &mut Criterion) {
    let reference = make_reference(10_000);
    let pattern = dna::parse_pattern(&reference.as_str()[100..120]).expect("slice of valid sequence");

    c.bench_function("naive_search_20bp", |b| {
        b.iter(|| black_box(naive::search(black_box(&reference), black_box(&pattern))))
    });
    c.bench_function("boyer_moore_search_20bp", |b| {
        b.iter(|| black_box(bm::search(black_box(&reference), black_box(&pattern))))
    });
}

fn bench_kmer_index(c: &mut Criterion) {
    let reference = make_reference(10_000);
    c.bench_function("kmer_build_k8_10k", |b| {
        b.iter(|| black_box(KmerIndex::build(black_box(&reference), 8)))
    });
}

fn bench_build_sa(c: &mut Criterion) {
    let reference = make_reference(10_000);
    c.bench_function("build_sa_10k", |b| {
        b.iter(|| black_box(SuffixArray::build(black_box(&reference))))
    });
}

fn bench_greedy_assembly(c: &mut Criterion) {
    let genome = make_reference(2_000);
    let reads: Vec<Sequence> = (0..genome.len() - 100)
        .step_by(40)
        .map(|s| dna::validate(&genome.as_str()[s..s + 100]).expect("slice of valid sequence"))
        .collect();

    c.bench_function("greedy_assembly_50_reads", |b| {
        b.iter(|| black_box(assembly::assemble_greedy(black_box(&reads), 20)))
    });
}

criterion_group!(benches, bench_search, bench_kmer_index, bench_build_sa, bench_greedy_assembly);
criterion_main!(benches);
