//! Unit tests for align/diag_scan.rs

use banded_swipe::align::{diag_alignment, scan_diags};
use banded_swipe::utils::matrix::ScoreProfile;
use banded_swipe::ScoreMatrix;
use proptest::prelude::*;

use crate::helpers::protein;

fn diagonal_scores(matrix: &ScoreMatrix, query: &[u8], subject: &[u8], d: i64, j_begin: usize, j_end: usize) -> Vec<i32> {
    (j_begin..j_end)
        .filter(|&j| (0..query.len() as i64).contains(&(j as i64 + d)))
        .map(|j| matrix.score(query[(j as i64 + d) as usize], subject[j]))
        .collect()
}

#[test]
fn test_planted_segment() {
    let matrix = ScoreMatrix::blosum62();
    let query = b"PPPPPMKTAYIAKQRPPPPP";
    let subject = b"GGMKTAYIAKQRGG";
    let profile = ScoreProfile::new(query, &matrix);
    // segment sits on d = 5 - 2 = 3
    let scores = scan_diags::<4>(&profile, &matrix, subject, 1, 0, subject.len() as i32);
    assert_eq!(scores[2], 49);
    assert!(scores[0] < 49 && scores[1] < 49 && scores[3] < 49);
}

#[test]
fn test_column_window() {
    let matrix = ScoreMatrix::blosum62();
    let query = b"MKTAYIAKQR";
    let profile = ScoreProfile::new(query, &matrix);
    // only the first five columns: MKTAY
    let scores = scan_diags::<1>(&profile, &matrix, query, 0, 0, 5);
    let expected: i32 = b"MKTAY".iter().map(|&r| matrix.score(r, r)).sum();
    assert_eq!(scores[0], expected);
    let empty = scan_diags::<1>(&profile, &matrix, query, 0, 3, 3);
    assert_eq!(empty[0], 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_scan_matches_diag_alignment(
        query in protein(1..40),
        subject in protein(1..40),
        d_begin in -45i32..45,
        window in (0usize..40, 0usize..40),
    ) {
        let matrix = ScoreMatrix::blosum62();
        let profile = ScoreProfile::new(&query, &matrix);
        let (a, b) = (window.0 % (subject.len() + 1), window.1 % (subject.len() + 1));
        let (j_begin, j_end) = (a.min(b), a.max(b));
        let scores = scan_diags::<8>(&profile, &matrix, &subject, d_begin, j_begin as i32, j_end as i32);
        for (k, &got) in scores.iter().enumerate() {
            let d = d_begin as i64 + k as i64;
            let cells = diagonal_scores(&matrix, &query, &subject, d, j_begin, j_end);
            prop_assert_eq!(got, diag_alignment(&cells));
        }
    }
}
