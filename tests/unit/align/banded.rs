//! Unit tests for align/sw_banded.rs and align/sw.rs

use banded_swipe::align::{
    banded_sw, banded_sw_target, global_alignment, score_range, smith_waterman,
    smith_waterman_banded, DpStat, DpTarget,
};
use banded_swipe::Scoring;
use proptest::prelude::*;

use crate::helpers::{assert_transcript_consistent, mutate, protein, random_protein, Lcg};

#[test]
fn test_known_pair() {
    let scoring = Scoring::default();
    let stat = DpStat::new();
    let query = b"MKTAYIAKQRQISFVKSHFSRQ";
    let subject = b"GGGMKTAYIAKQRQISFVKSHFSRQGGG";
    let hsp = banded_sw(query, subject, -5, 1, 0, subject.len() as i32, &scoring, true, &stat);
    let full = smith_waterman(query, subject, &scoring, &stat);
    assert_eq!(hsp.score, full.score);
    assert_eq!(hsp.query_range, 0..22);
    assert_eq!(hsp.subject_range, 3..25);
    assert_eq!(hsp.identities, 22);
    assert_transcript_consistent(&hsp, query, subject, &scoring);
}

#[test]
fn test_gapped_alignment_in_band() {
    let scoring = Scoring::default();
    let stat = DpStat::new();
    let mut rng = Lcg::new(11);
    let query = random_protein(&mut rng, 60);
    // delete 3 residues from the middle of the subject
    let mut subject = query[..30].to_vec();
    subject.extend_from_slice(&query[33..]);
    let target = DpTarget::full(&subject, query.len(), 0);
    let hsp = banded_sw_target(&query, &target, &scoring, true, &stat);
    let full = smith_waterman(&query, &subject, &scoring, &stat);
    assert_eq!(hsp.score, full.score);
    assert_transcript_consistent(&hsp, &query, &subject, &scoring);

    // a band on diagonals 0..3 still holds both halves of the alignment
    let narrow = banded_sw(&query, &subject, 0, 4, 0, subject.len() as i32, &scoring, true, &stat);
    assert_eq!(narrow.score, full.score);
}

#[test]
fn test_smith_waterman_banded_wrapper() {
    let scoring = Scoring::default();
    let mut rng = Lcg::new(5);
    let query = random_protein(&mut rng, 50);
    let subject = mutate(&mut rng, &query, 6);
    let full = smith_waterman(&query, &subject, &scoring, &DpStat::new());
    // no indels, the best alignment lies on the main diagonal
    assert_eq!(smith_waterman_banded(&query, &subject, 2, 2, &scoring), full.score);
    assert!(smith_waterman_banded(&query, &subject, 0, 0, &scoring) <= full.score);
}

#[test]
fn test_global_alignment_penalizes_ends() {
    let scoring = Scoring::default();
    let stat = DpStat::new();
    let query = b"MKTAYIAKQR";
    let subject = b"PPPPMKTAYIAKQRPPPP";
    let local = smith_waterman(query, subject, &scoring, &stat);
    let global = global_alignment(query, subject, &scoring, &stat);
    assert_eq!(local.score, 49);
    // 8 subject residues left over: two gaps of 4
    assert_eq!(global.score, 49 - 2 * scoring.gap_cost(4));
    assert_eq!(global.query_range, 0..10);
    assert_eq!(global.subject_range, 0..18);
}

#[test]
fn test_score_range_bounds_band_score() {
    let scoring = Scoring::default();
    let stat = DpStat::new();
    let mut rng = Lcg::new(99);
    for _ in 0..20 {
        let query = random_protein(&mut rng, 40);
        let subject = mutate(&mut rng, &query, 3);
        let target = DpTarget::new(&subject, -3, 4, 0, subject.len() as i32, 0);
        let bound = score_range(query.len(), &target, scoring.matrix.max_score());
        let hsp = banded_sw_target(&query, &target, &scoring, false, &stat);
        assert!(hsp.score <= bound, "score {} above bound {}", hsp.score, bound);
    }
}

#[test]
fn test_stat_counts_cells() {
    let scoring = Scoring::default();
    let stat = DpStat::new();
    let query = b"MKTAYIAKQR";
    let subject = b"MKTAYIAKQRQISF";
    let target = DpTarget::new(subject, -2, 3, 0, 14, 0);
    banded_sw_target(query, &target, &scoring, false, &stat);
    assert_eq!(stat.gross_cells(), target.cells());
    assert_eq!(stat.net_cells(), target.net_cells(query.len()));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_full_band_equals_smith_waterman(query in protein(1..50), subject in protein(1..50)) {
        let scoring = Scoring::default();
        let stat = DpStat::new();
        let target = DpTarget::full(&subject, query.len(), 0);
        let banded = banded_sw_target(&query, &target, &scoring, true, &stat);
        let full = smith_waterman(&query, &subject, &scoring, &stat);
        prop_assert_eq!(banded.score, full.score);
        if banded.score > 0 {
            prop_assert_eq!(banded.query_range.end, full.query_range.end);
            prop_assert_eq!(banded.subject_range.end, full.subject_range.end);
            prop_assert_eq!(banded.rescore(&query, &subject, &scoring), Some(banded.score));
        }
    }

    #[test]
    fn prop_band_never_beats_full(
        query in protein(1..50),
        subject in protein(1..50),
        d_begin in -20i32..20,
        width in 0i32..12,
    ) {
        let scoring = Scoring::default();
        let stat = DpStat::new();
        let banded = banded_sw(
            &query, &subject, d_begin, d_begin + width, 0, subject.len() as i32, &scoring, true, &stat,
        );
        let full = smith_waterman(&query, &subject, &scoring, &stat);
        prop_assert!(banded.score <= full.score);
        if banded.score > 0 {
            prop_assert_eq!(banded.rescore(&query, &subject, &scoring), Some(banded.score));
        }
    }
}
