//! Test utilities shared by the unit tests
//!
//! - Deterministic sequence generators for fixed fixtures
//! - proptest strategies for random proteins and DNA
//! - Assertion helpers for alignment results

use banded_swipe::align::{DpTarget, Hsp};
use banded_swipe::Scoring;
use proptest::prelude::*;

/// The 20 standard amino acids
pub const AMINO: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";

pub const NUCLEOTIDES: &[u8] = b"ACGT";

/// Small linear congruential generator so fixtures stay identical across runs
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407))
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    pub fn below(&mut self, n: usize) -> usize {
        self.next_u32() as usize % n
    }
}

/// Random protein of length `len`
pub fn random_protein(rng: &mut Lcg, len: usize) -> Vec<u8> {
    (0..len).map(|_| AMINO[rng.below(AMINO.len())]).collect()
}

/// Copy of `seq` with roughly one in `rate` positions substituted
pub fn mutate(rng: &mut Lcg, seq: &[u8], rate: usize) -> Vec<u8> {
    seq.iter()
        .map(|&c| {
            if rng.below(rate) == 0 {
                AMINO[rng.below(AMINO.len())]
            } else {
                c
            }
        })
        .collect()
}

/// Banded job of width `width` around diagonal `d_center` over the whole subject
pub fn band_around(seq: &[u8], d_center: i32, width: i32, target_idx: usize) -> DpTarget<'_> {
    DpTarget::new(
        seq,
        d_center - width / 2,
        d_center - width / 2 + width,
        0,
        seq.len() as i32,
        target_idx,
    )
}

pub fn protein(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(AMINO), len)
}

pub fn dna(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(NUCLEOTIDES), len)
}

/// The transcript of `hsp` must re-score to its reported score
pub fn assert_transcript_consistent(hsp: &Hsp, query: &[u8], subject: &[u8], scoring: &Scoring) {
    assert_eq!(
        hsp.rescore(query, subject, scoring),
        Some(hsp.score),
        "transcript does not reproduce score {} (q {:?}, s {:?})",
        hsp.score,
        hsp.query_range,
        hsp.subject_range
    );
}
