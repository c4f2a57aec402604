//! Batched banded alignment (SWIPE)
//!
//! Many `DpTarget`s are aligned against one query at once, one job per lane.
//! Jobs whose score provably stays below 127 run in 16 lanes of i8, the rest
//! in 8 lanes of i16. A job that saturates its lane is rerun one width up
//! (i8 -> i16 -> i32), so saturating arithmetic never leaks into a score.

pub(crate) mod frame_kernel;
mod kernel;
pub mod vector;

use std::ops::BitOr;

use rayon::prelude::*;

use super::frame::Frame;
use super::result::Hsp;
use super::stat::{DpCells, DpStat};
use super::sw_banded::score_range;
use super::target::DpTarget;
use super::traceback::traceback_band;
use crate::diagnostics::{bump, counters};
use crate::utils::matrix::{ScoreProfile, Scoring};

pub(crate) use kernel::{run_lanes, KernelInput, LaneOutcome};
pub use vector::{ScoreVector, SwipeScore};

/// Jobs handed to one worker; chunks are cut the same way with and without
/// `PARALLEL`, so both modes see identical lane assignments
const CHUNK_SIZE: usize = 256;

/// Batch options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwipeFlags(u8);

impl SwipeFlags {
    /// Score only
    pub const NONE: SwipeFlags = SwipeFlags(0);
    /// Materialize alignments
    pub const TRACEBACK: SwipeFlags = SwipeFlags(1);
    /// Fan the batch out over the current rayon pool
    pub const PARALLEL: SwipeFlags = SwipeFlags(2);

    pub fn contains(self, other: SwipeFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for SwipeFlags {
    type Output = SwipeFlags;

    fn bitor(self, rhs: SwipeFlags) -> SwipeFlags {
        SwipeFlags(self.0 | rhs.0)
    }
}

/// Per query position score adjustment
pub trait BiasProvider: Sync {
    fn bias(&self, query_pos: usize) -> i32;
    /// Largest adjustment, used to bound the score range of a band
    fn max_bias(&self) -> i32;
}

/// No composition adjustment
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBias;

impl BiasProvider for NoBias {
    #[inline(always)]
    fn bias(&self, _query_pos: usize) -> i32 {
        0
    }

    fn max_bias(&self) -> i32 {
        0
    }
}

/// Composition-based correction, one value per query position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiasCorrection {
    values: Vec<i8>,
}

impl BiasCorrection {
    pub fn new(values: Vec<i8>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[i8] {
        &self.values
    }
}

impl BiasProvider for BiasCorrection {
    #[inline(always)]
    fn bias(&self, query_pos: usize) -> i32 {
        self.values[query_pos] as i32
    }

    fn max_bias(&self) -> i32 {
        self.values.iter().copied().max().unwrap_or(0).max(0) as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LaneWidth {
    Bits8,
    Bits16,
    Bits32,
}

/// Align every target in `targets` against `query`.
///
/// Returns one `Hsp` per target scoring above zero and at least
/// `score_cutoff`, ordered by position in `targets`. `Hsp::swipe_target` is
/// that position, `Hsp::target_idx` the target's own index. With
/// `SwipeFlags::TRACEBACK` every HSP carries its transcript, otherwise the
/// ranges are empty and sit at the alignment end.
#[allow(clippy::too_many_arguments)]
pub fn banded_swipe(
    query: &[u8],
    targets: &[DpTarget<'_>],
    frame: Frame,
    composition_bias: Option<&BiasCorrection>,
    flags: SwipeFlags,
    score_cutoff: i32,
    scoring: &Scoring,
    stat: &DpStat,
) -> Vec<Hsp> {
    match composition_bias {
        Some(bias) => {
            assert_eq!(
                bias.len(),
                query.len(),
                "composition bias covers {} positions, query has {}",
                bias.len(),
                query.len()
            );
            run_batch(query, targets, frame, bias, flags, score_cutoff, scoring, stat)
        }
        None => run_batch(query, targets, frame, &NoBias, flags, score_cutoff, scoring, stat),
    }
}

/// Score-only local alignment of `query` against whole subjects.
///
/// Returns one `Hsp` per subject scoring at least `score_cutoff` (and above
/// zero), with `target_idx` set to the subject's position.
pub fn swipe(
    query: &[u8],
    subjects: &[&[u8]],
    score_cutoff: i32,
    scoring: &Scoring,
    stat: &DpStat,
) -> Vec<Hsp> {
    let targets: Vec<DpTarget<'_>> = subjects
        .iter()
        .enumerate()
        .map(|(idx, s)| DpTarget::full(s, query.len(), idx))
        .collect();
    banded_swipe(
        query,
        &targets,
        Frame::default(),
        None,
        SwipeFlags::NONE,
        score_cutoff,
        scoring,
        stat,
    )
}

#[allow(clippy::too_many_arguments)]
fn run_batch<B: BiasProvider>(
    query: &[u8],
    targets: &[DpTarget<'_>],
    frame: Frame,
    bias: &B,
    flags: SwipeFlags,
    score_cutoff: i32,
    scoring: &Scoring,
    stat: &DpStat,
) -> Vec<Hsp> {
    let go_ge = scoring.gap_open_extend();
    assert!(
        scoring.gap_extend >= 0 && go_ge < i8::MAX as i32,
        "gap penalties {}/{} do not fit an 8-bit lane",
        scoring.gap_open,
        scoring.gap_extend
    );

    let profile = ScoreProfile::new(query, &scoring.matrix);
    let input = KernelInput {
        query_len: query.len(),
        profile: &profile,
        matrix: &scoring.matrix,
        gap_open_extend: go_ge,
        gap_extend: scoring.gap_extend,
        bias,
        traceback: flags.contains(SwipeFlags::TRACEBACK),
    };

    let mut order: Vec<usize> = (0..targets.len()).collect();
    order.sort_by(|&a, &b| targets[a].cmp(&targets[b]));

    let max_sub = scoring.matrix.max_score() + bias.max_bias();
    let (narrow, wide): (Vec<usize>, Vec<usize>) = order
        .into_iter()
        .partition(|&t| score_range(query.len(), &targets[t], max_sub) < i8::MAX as i32);
    bump(&counters().targets_8bit, narrow.len());
    bump(&counters().targets_16bit, wide.len());

    let units: Vec<(LaneWidth, &[usize])> = narrow
        .chunks(CHUNK_SIZE)
        .map(|c| (LaneWidth::Bits8, c))
        .chain(wide.chunks(CHUNK_SIZE).map(|c| (LaneWidth::Bits16, c)))
        .collect();

    let run_unit = |&(width, jobs): &(LaneWidth, &[usize])| -> Vec<Hsp> {
        let mut cells = DpCells::default();
        let hsps = run_promoting(&input, query, targets, frame, width, jobs, score_cutoff, &mut cells);
        stat.combine(&cells);
        hsps
    };

    let parts: Vec<Vec<Hsp>> = if flags.contains(SwipeFlags::PARALLEL) {
        units.par_iter().map(run_unit).collect()
    } else {
        units.iter().map(run_unit).collect()
    };

    let mut hsps: Vec<Hsp> = parts.into_iter().flatten().collect();
    hsps.sort_by_key(|h| h.swipe_target);
    bump(&counters().hsps_reported, hsps.len());
    hsps
}

/// Run `jobs` at `width`, rerunning saturated jobs one width up
#[allow(clippy::too_many_arguments)]
fn run_promoting<B: BiasProvider>(
    input: &KernelInput<'_, B>,
    query: &[u8],
    targets: &[DpTarget<'_>],
    frame: Frame,
    mut width: LaneWidth,
    jobs: &[usize],
    score_cutoff: i32,
    cells: &mut DpCells,
) -> Vec<Hsp> {
    let mut hsps = Vec::new();
    let mut pending = jobs.to_vec();

    while !pending.is_empty() {
        let outcomes = match width {
            LaneWidth::Bits8 => run_lanes::<i8, 16, B>(input, targets, &pending, cells),
            LaneWidth::Bits16 => run_lanes::<i16, 8, B>(input, targets, &pending, cells),
            LaneWidth::Bits32 => run_lanes::<i32, 4, B>(input, targets, &pending, cells),
        };

        let mut saturated = Vec::new();
        for outcome in outcomes {
            match outcome {
                LaneOutcome::Saturated { job } => saturated.push(job),
                done => {
                    if let Some(hsp) = finish(done, query, targets, frame, score_cutoff) {
                        hsps.push(hsp);
                    }
                }
            }
        }

        if saturated.is_empty() {
            break;
        }
        width = match width {
            LaneWidth::Bits8 => {
                bump(&counters().promoted_to_16bit, saturated.len());
                LaneWidth::Bits16
            }
            LaneWidth::Bits16 => {
                bump(&counters().promoted_to_32bit, saturated.len());
                LaneWidth::Bits32
            }
            LaneWidth::Bits32 => panic!("{} targets saturated a 32-bit lane", saturated.len()),
        };
        log::debug!(
            "{} targets saturated their lanes, rerunning as {:?}",
            saturated.len(),
            width
        );
        // keep feed order for the rerun
        saturated.sort_by(|&a, &b| targets[a].cmp(&targets[b]).then(a.cmp(&b)));
        pending = saturated;
    }

    hsps
}

/// Turn a finished lane into an HSP, dropping it if it misses the cutoff
pub(crate) fn finish(
    outcome: LaneOutcome,
    query: &[u8],
    targets: &[DpTarget<'_>],
    frame: Frame,
    score_cutoff: i32,
) -> Option<Hsp> {
    let LaneOutcome::Done {
        job,
        score,
        end,
        band,
    } = outcome
    else {
        return None;
    };
    if score <= 0 {
        bump(&counters().empty_targets, 1);
        return None;
    }
    if score < score_cutoff {
        bump(&counters().hsps_below_cutoff, 1);
        return None;
    }

    let target = &targets[job];
    let (q_end, s_end) = (end.0 + 1, end.1 + 1);
    let hsp = match band {
        Some(band) => {
            bump(&counters().tracebacks, 1);
            let (ops, q_begin, s_begin) = traceback_band(&band, target, query, end.0, end.1);
            Hsp::with_transcript(score, q_begin..q_end, s_begin..s_end, ops)
        }
        None => Hsp::score_only(score, q_end, s_end),
    };
    Some(hsp.with_frame(frame).with_target(target.target_idx, job))
}
