use bioanalyzer::analysis::composition::{at_content, complement, gc_content, reverse_complement};
use bioanalyzer::assembly::{assemble_greedy, assemble_seed_extend, find_overlaps};
use bioanalyzer::index::{kmer::KmerIndex, sa::SuffixArray};
use bioanalyzer::io::fasta;
use bioanalyzer::search::{bm, naive};
use bioanalyzer::util::dna::{validate, Sequence};

struct Lcg(u32);

impl Lcg {
    fn next_u32(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        self.0 >> 16
    }

    /// 小字母表偏置，制造更多重复与匹配
    fn seq(&mut self, len: usize, alphabet: &[char]) -> Sequence {
        let s: String = (0..len).map(|_| alphabet[self.next_u32() as usize % alphabet.len()]).collect();
        validate(&s).unwrap()
    }
}

const ACGT: [char; 4] = ['A', 'C', 'G', 'T'];
const AC: [char; 2] = ['A', 'C'];

#[test]
fn gc_plus_at_is_hundred() {
    let mut rng = Lcg(7);
    for len in 1..60 {
        let s = rng.seq(len, &ACGT);
        let sum = gc_content(&s) + at_content(&s);
        assert!((sum - 100.0).abs() < 0.011, "len={} sum={}", len, sum);
    }
}

#[test]
fn complement_is_involution() {
    let mut rng = Lcg(11);
    for len in 1..40 {
        let s = rng.seq(len, &ACGT);
        assert_eq!(complement(&complement(&s)), s);
        assert_eq!(reverse_complement(&reverse_complement(&s)), s);
    }
}

#[test]
fn all_searches_agree() {
    let mut rng = Lcg(42);
    for round in 0..200 {
        let alphabet: &[char] = if round % 2 == 0 { &AC } else { &ACGT };
        let n = 5 + rng.next_u32() as usize % 60;
        let s = rng.seq(n, alphabet);
        let m = 2 + rng.next_u32() as usize % 5;
        let p = if rng.next_u32() % 2 == 0 && m <= n {
            // 从文本中截取，保证至少一处命中
            let start = rng.next_u32() as usize % (n - m + 1);
            validate(&s.as_str()[start..start + m]).unwrap()
        } else {
            rng.seq(m, alphabet)
        };

        let expected = naive::search(&s, &p).unwrap();
        let (bm_hits, _) = bm::search(&s, &p).unwrap();
        assert_eq!(bm_hits, expected, "boyer-moore s={} p={}", s, p);

        let sa = SuffixArray::build(&s);
        assert_eq!(sa.search(&s, &p).unwrap(), expected, "suffix array s={} p={}", s, p);

        for k in 2..=m.min(n).min(10) {
            let idx = KmerIndex::build(&s, k).unwrap();
            assert_eq!(idx.query(&s, &p).unwrap(), expected, "k={} s={} p={}", k, s, p);
        }
    }
}

#[test]
fn suffix_array_is_sorted_permutation() {
    let mut rng = Lcg(3);
    for len in 1..80 {
        let alphabet: &[char] = if len % 3 == 0 { &AC } else { &ACGT };
        let s = rng.seq(len, alphabet);
        let sa = SuffixArray::build(&s);
        assert_eq!(sa.len(), len);

        let text = s.as_bytes();
        for w in sa.sa().windows(2) {
            assert!(text[w[0]..] < text[w[1]..], "len={}", len);
        }
        let mut seen = sa.sa().to_vec();
        seen.sort_unstable();
        assert_eq!(seen, (0..len).collect::<Vec<_>>());
    }
}

#[test]
fn fasta_to_assembly_pipeline() {
    let doc = ">r1 first read\nATGCGATCG\n>r2\nTCGATCGAT\n>r3\nATCGATCGC\n";
    let records = fasta::parse(doc).unwrap();
    let reads: Vec<Sequence> = records.into_iter().map(|r| r.seq).collect();

    assert_eq!(find_overlaps(&reads, 3).len(), 3);

    let seeded = assemble_seed_extend(&reads, 3);
    let p = seeded.primary().unwrap();
    assert_eq!(p.len(), 14);
    assert!((seeded.compression_ratio() - 0.48).abs() < 0.005);

    let greedy = assemble_greedy(&reads, 3);
    assert_eq!(greedy.primary().unwrap().seq, "ATGCGATCGATCGATCGC");
}

#[test]
fn disjoint_reads_have_no_overlaps() {
    let reads = vec![validate("AAAAAAA").unwrap(), validate("CCCCCCC").unwrap()];
    assert!(find_overlaps(&reads, 3).is_empty());
    let a = assemble_greedy(&reads, 3);
    assert_eq!(a.contigs.len(), 2);
    assert!(a.steps.is_empty());
}
