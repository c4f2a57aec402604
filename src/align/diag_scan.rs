//! Ungapped scoring of consecutive diagonals
//!
//! Used to rank candidate diagonals before any gapped DP runs: for each of `N`
//! neighbouring diagonals the best ungapped local segment is found in one pass
//! over the subject, all diagonals advancing together like lanes of a vector.

use super::swipe::ScoreVector;
use crate::utils::matrix::{ScoreMatrix, ScoreProfile};

/// Best ungapped local score on diagonals `d_begin..d_begin + N` over subject
/// columns `[j_begin, j_end)`.
///
/// Entry `k` is the score of diagonal `d_begin + k` (`i = j + d`), zero if no
/// positive segment exists or the diagonal misses the query.
pub fn scan_diags<const N: usize>(
    profile: &ScoreProfile,
    matrix: &ScoreMatrix,
    subject: &[u8],
    d_begin: i32,
    j_begin: i32,
    j_end: i32,
) -> [i32; N] {
    assert!(
        0 <= j_begin && j_begin <= j_end && j_end as usize <= subject.len(),
        "column range [{}, {}) outside subject of length {}",
        j_begin,
        j_end,
        subject.len()
    );
    let qlen = profile.query_len() as i64;
    let zero = ScoreVector::<i32, N>::zero();
    let mut running = zero;
    let mut best = zero;

    for j in j_begin..j_end {
        let row = profile.row(matrix.encode(subject[j as usize]));
        let mut sub = [0i32; N];
        let mut inside = [false; N];
        for (k, (s, m)) in sub.iter_mut().zip(inside.iter_mut()).enumerate() {
            let i = j as i64 + d_begin as i64 + k as i64;
            if (0..qlen).contains(&i) {
                *s = row[i as usize] as i32;
                *m = true;
            }
        }
        running = running
            .adds(ScoreVector::from_array(sub))
            .max(zero)
            .keep(&inside, zero);
        best = best.max(running);
    }

    *best.lanes()
}

/// Best ungapped local score of one diagonal given its per-cell scores
pub fn diag_alignment(scores: &[i32]) -> i32 {
    let mut running = 0;
    let mut best = 0;
    for &s in scores {
        running = (running + s).max(0);
        best = best.max(running);
    }
    best
}
