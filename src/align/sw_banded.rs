//! Single-target banded Smith-Waterman
//!
//! These run the same lane kernel as the SWIPE batch with a single 32-bit
//! lane, so a batch result can always be checked against the job aligned on
//! its own.

use super::frame::Frame;
use super::result::Hsp;
use super::stat::{DpCells, DpStat};
use super::swipe::{finish, run_lanes, KernelInput, NoBias};
use super::target::DpTarget;
use crate::utils::matrix::{ScoreProfile, Scoring};

/// Upper bound of the local score a band can reach.
///
/// A local path takes at most one diagonal step per column and per query row
/// the band touches, each worth at most `max_sub`.
pub fn score_range(query_len: usize, target: &DpTarget<'_>, max_sub: i32) -> i32 {
    let row_lo = (target.j_begin as i64 + target.d_begin as i64).max(0);
    let row_hi = (target.j_end as i64 - 1 + target.d_end as i64).min(query_len as i64);
    let rows = (row_hi - row_lo).max(0);
    let steps = rows.min(target.cols() as i64);
    (steps * max_sub.max(0) as i64).min(i32::MAX as i64) as i32
}

/// Best local score within diagonals `-(band + padding)..=band + padding`
/// around the main diagonal, score only.
pub fn smith_waterman_banded(
    query: &[u8],
    subject: &[u8],
    band: usize,
    padding: usize,
    scoring: &Scoring,
) -> i32 {
    let half = (band + padding) as i32;
    let target = DpTarget::new(subject, -half, half + 1, 0, subject.len() as i32, 0);
    let hsp = banded_sw_target(query, &target, scoring, false, &DpStat::new());
    hsp.score
}

/// Banded local alignment of one job over diagonals `[d_begin, d_end)` and
/// subject columns `[j_begin, j_end)`.
///
/// With `traceback` the HSP carries its transcript. A job without a positive
/// score gives a zero-score HSP with empty ranges.
#[allow(clippy::too_many_arguments)]
pub fn banded_sw(
    query: &[u8],
    subject: &[u8],
    d_begin: i32,
    d_end: i32,
    j_begin: i32,
    j_end: i32,
    scoring: &Scoring,
    traceback: bool,
    stat: &DpStat,
) -> Hsp {
    let target = DpTarget::new(subject, d_begin, d_end, j_begin, j_end, 0);
    banded_sw_target(query, &target, scoring, traceback, stat)
}

/// `banded_sw` for an existing job
pub fn banded_sw_target(
    query: &[u8],
    target: &DpTarget<'_>,
    scoring: &Scoring,
    traceback: bool,
    stat: &DpStat,
) -> Hsp {
    let profile = ScoreProfile::new(query, &scoring.matrix);
    let input = KernelInput {
        query_len: query.len(),
        profile: &profile,
        matrix: &scoring.matrix,
        gap_open_extend: scoring.gap_open_extend(),
        gap_extend: scoring.gap_extend,
        bias: &NoBias,
        traceback,
    };
    let targets = std::slice::from_ref(target);
    let mut cells = DpCells::default();
    let outcome = run_lanes::<i32, 1, NoBias>(&input, targets, &[0], &mut cells).pop();
    stat.combine(&cells);

    outcome
        .and_then(|o| finish(o, query, targets, Frame::default(), 1))
        .map(|hsp| hsp.with_target(target.target_idx, 0))
        .unwrap_or_else(|| Hsp::with_transcript(0, 0..0, 0..0, Vec::new()))
}
