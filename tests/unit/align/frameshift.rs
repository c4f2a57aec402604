//! Unit tests for align/frameshift.rs

use banded_swipe::align::{
    anchored_3frame_dp, banded_3frame_sw, banded_3frame_swipe, full_3frame_target, sw_3frame,
    DiagonalSegment, DpStat, DpTarget, Frame, Strand, TranslatedSequence,
};
use banded_swipe::Scoring;
use proptest::prelude::*;

use crate::helpers::{dna, mutate, random_protein, Lcg, NUCLEOTIDES};

fn random_dna(rng: &mut Lcg, len: usize) -> Vec<u8> {
    (0..len).map(|_| NUCLEOTIDES[rng.below(4)]).collect()
}

/// Subjects carrying translated pieces of `query` from all three forward frames
fn translated_subjects(query: &TranslatedSequence, rng: &mut Lcg, n: usize) -> Vec<Vec<u8>> {
    (0..n)
        .map(|k| {
            let frame = query.frame(Frame::new(Strand::Forward, (k % 3) as u8));
            let start = rng.below(frame.len() / 2);
            let len = 5 + rng.below(frame.len() - start - 5);
            let head = rng.below(8);
            let mut s = random_protein(rng, head);
            s.extend(mutate(rng, &frame[start..start + len], 6));
            s
        })
        .collect()
}

fn frame_jobs<'a>(subjects: &'a [Vec<u8>], rng: &mut Lcg) -> Vec<DpTarget<'a>> {
    subjects
        .iter()
        .enumerate()
        .map(|(idx, s)| {
            let d_begin = rng.below(40) as i32 - 10;
            let width = 1 + rng.below(10) as i32;
            DpTarget::new(s, d_begin, d_begin + width, 0, s.len() as i32, idx)
        })
        .collect()
}

#[test]
fn test_batch_matches_single_target() {
    let scoring = Scoring::default();
    let mut rng = Lcg::new(17);
    let query = TranslatedSequence::new(&random_dna(&mut rng, 150));
    let subjects = translated_subjects(&query, &mut rng, 40);
    let targets = frame_jobs(&subjects, &mut rng);

    let hsps = banded_3frame_swipe(&query, Strand::Forward, &targets, &scoring, &DpStat::new(), false, false);
    assert!(hsps.windows(2).all(|w| w[0].swipe_target < w[1].swipe_target));
    for (pos, target) in targets.iter().enumerate() {
        let single = banded_3frame_sw(&query, Strand::Forward, target, &scoring, true, &DpStat::new());
        match hsps.iter().find(|h| h.swipe_target == pos) {
            Some(hsp) => {
                assert_eq!(hsp.score, single.score, "target {}", pos);
                assert_eq!(hsp.query_range, single.query_range, "target {}", pos);
                assert_eq!(hsp.subject_range, single.subject_range, "target {}", pos);
                assert_eq!(hsp.transcript, single.transcript, "target {}", pos);
                assert_eq!(hsp.frame, single.frame);
            }
            None => assert_eq!(single.score, 0, "target {} missing from batch", pos),
        }
    }
}

#[test]
fn test_parallel_matches_sequential() {
    let scoring = Scoring::default();
    let mut rng = Lcg::new(23);
    let query = TranslatedSequence::new(&random_dna(&mut rng, 120));
    // more jobs than one worker chunk
    let subjects = translated_subjects(&query, &mut rng, 300);
    let targets = frame_jobs(&subjects, &mut rng);

    let seq_stat = DpStat::new();
    let par_stat = DpStat::new();
    let sequential = banded_3frame_swipe(&query, Strand::Forward, &targets, &scoring, &seq_stat, false, false);
    let parallel = banded_3frame_swipe(&query, Strand::Forward, &targets, &scoring, &par_stat, false, true);
    assert_eq!(sequential, parallel);
    assert_eq!(seq_stat.snapshot(), par_stat.snapshot());
}

#[test]
fn test_score_only_keeps_scores() {
    let scoring = Scoring::default();
    let mut rng = Lcg::new(29);
    let query = TranslatedSequence::new(&random_dna(&mut rng, 90));
    let subjects = translated_subjects(&query, &mut rng, 30);
    let targets = frame_jobs(&subjects, &mut rng);
    let stat = DpStat::new();
    let full = banded_3frame_swipe(&query, Strand::Forward, &targets, &scoring, &stat, false, false);
    let scores = banded_3frame_swipe(&query, Strand::Forward, &targets, &scoring, &stat, true, false);
    assert_eq!(full.len(), scores.len());
    for (a, b) in full.iter().zip(&scores) {
        assert_eq!(a.score, b.score);
        assert_eq!(a.swipe_target, b.swipe_target);
        assert_eq!(a.query_range.end, b.query_range.end);
        assert!(b.transcript.is_none());
    }
}

#[test]
fn test_frame_shift_counted_in_reverse_strand() {
    let scoring = Scoring::default();
    let mut rng = Lcg::new(31);
    let coding = random_dna(&mut rng, 60);
    let protein = TranslatedSequence::new(&coding)
        .frame(Frame::new(Strand::Forward, 0))
        .to_vec();
    // drop one base in the middle, then present the query reverse-complemented
    let mut broken = coding.clone();
    broken.remove(31);
    let query = TranslatedSequence::new(&bio::alphabets::dna::revcomp(&broken));
    let hsp = sw_3frame(&query, Strand::Reverse, &protein, &scoring, &DpStat::new());
    assert_eq!(hsp.frame.strand, Strand::Reverse);
    assert!(hsp.frame_shifts <= 1);
    let forward = sw_3frame(&query, Strand::Forward, &protein, &scoring, &DpStat::new());
    assert!(hsp.score > forward.score);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_full_band_equals_sw_3frame(query in dna(3..90), subject in crate::helpers::protein(1..30)) {
        let scoring = Scoring::default();
        let query = TranslatedSequence::new(&query);
        let target = full_3frame_target(&subject, &query, 0);
        let stat = DpStat::new();
        let banded = banded_3frame_sw(&query, Strand::Forward, &target, &scoring, true, &stat);
        let full = sw_3frame(&query, Strand::Forward, &subject, &scoring, &stat);
        prop_assert_eq!(banded.score, full.score);
        if full.score > 0 {
            prop_assert_eq!(banded.query_range.end, full.query_range.end);
            prop_assert_eq!(banded.subject_range.end, full.subject_range.end);
        }
    }

    #[test]
    fn prop_anchor_on_planted_diagonal(codons in 4usize..30, seed in any::<u64>(), a in 0usize..30, l in 1usize..30) {
        let scoring = Scoring::default();
        let mut rng = Lcg::new(seed);
        let coding = random_dna(&mut rng, 3 * codons);
        let query = TranslatedSequence::new(&coding);
        let protein = query.frame(Frame::new(Strand::Forward, 0)).to_vec();
        let a = a % codons;
        let l = 1 + (l - 1) % (codons - a);
        let anchor = DiagonalSegment::new(Strand::Forward, 3 * a, a, l);

        let self_score: i32 = protein.iter().map(|&r| scoring.matrix.score(r, r)).sum();
        let stat = DpStat::new();
        let anchored = anchored_3frame_dp(&query, &protein, &anchor, &scoring, &stat);
        let local = sw_3frame(&query, Strand::Forward, &protein, &scoring, &stat);
        prop_assert_eq!(local.score, self_score);
        prop_assert_eq!(anchored.score, self_score);
        prop_assert!(anchored.query_range.start <= anchor.i);
        prop_assert!(anchored.query_range.end >= anchor.query_end());
    }
}
