//! Frame-shift aware alignment of translated queries against proteins
//!
//! The query is a nucleotide strand read as overlapping codons: row `c` of the
//! DP matrix is the residue encoded by the codon starting at nucleotide `c`.
//! A diagonal step into `c` normally comes from `c - 3`; coming from `c - 2`
//! (one nucleotide lost) or `c - 4` (one nucleotide gained) costs
//! `frame_shift` on top of the substitution score. Query gaps remove whole
//! codons (`c - 3`, same subject column), subject gaps one residue.
//!
//! Query coordinates in the returned HSPs are nucleotide offsets on the
//! aligned strand.

use rayon::prelude::*;

use super::band::Band;
use super::frame::{DiagonalSegment, Frame, Strand, TranslatedSequence};
use super::result::{EditOp, Hsp};
use super::score_buffer::ScoreBuffer;
use super::stat::{DpCells, DpStat};
use super::sw::NEG_INF;
use super::swipe::frame_kernel::{dir3, run_3frame_lanes, FrameKernelInput};
use super::swipe::LaneOutcome;
use super::target::DpTarget;
use crate::diagnostics::{bump, counters};
use crate::utils::matrix::Scoring;

/// Boundary rows above codon start 0 (`c = -4..-1`)
const ROW_OFFSET: usize = 4;
/// Buffer row of `c = -3`, the origin of an anchored extension
const ORIGIN_ROW: usize = 1;

const CHUNK_SIZE: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameMode {
    /// Every cell may restart at zero, boundary cells are zero
    Local,
    /// One path origin at `(c = -3, j = -1)`, everything else must be reached from it
    Anchored,
}

/// Filled H matrix; buffer row `c + ROW_OFFSET`, buffer column `j + 1`
struct FrameMatrix {
    h: ScoreBuffer<i32>,
    best: i32,
    best_cell: (usize, usize),
}

#[inline]
fn diag_op(a: u8, b: u8) -> EditOp {
    if a == b {
        EditOp::Match
    } else {
        EditOp::Mismatch
    }
}

/// Fill the frame-shift matrix over `rows` codon starts and `cols` subject
/// columns. `pair(c, j)` yields the (query, subject) residues of a cell, or
/// `None` where the codon does not exist.
fn fill_3frame<P>(rows: usize, cols: usize, mode: FrameMode, scoring: &Scoring, pair: P) -> FrameMatrix
where
    P: Fn(i64, usize) -> Option<(u8, u8)>,
{
    let col_size = rows + ROW_OFFSET;
    let go_ge = scoring.gap_open_extend();
    let ge = scoring.gap_extend;
    let fs = scoring.frame_shift;
    let boundary = match mode {
        FrameMode::Local => 0,
        FrameMode::Anchored => NEG_INF,
    };

    let mut h = ScoreBuffer::new();
    h.init(col_size, cols + 1, boundary);
    let mut f = vec![NEG_INF; col_size];

    if mode == FrameMode::Anchored {
        // codon gaps straight after the origin
        let first = h.column_mut(0);
        first[ORIGIN_ROW] = 0;
        for idx in ORIGIN_ROW + 3..col_size {
            let v = (first[idx - 3] - go_ge).max(f[idx - 3] - ge).max(NEG_INF);
            f[idx] = v;
            first[idx] = v;
        }
    }

    let mut e = vec![NEG_INF; col_size];
    let mut best = 0;
    let mut best_cell = (ORIGIN_ROW, 0);

    for j in 0..cols {
        let (prev, cur) = h.append_column();
        f.iter_mut().for_each(|v| *v = NEG_INF);
        for idx in 0..col_size {
            if mode == FrameMode::Local && idx < ROW_OFFSET {
                cur[idx] = 0;
                continue;
            }
            let c = idx as i64 - ROW_OFFSET as i64;

            let ev = (prev[idx] - go_ge).max(e[idx] - ge).max(NEG_INF);
            e[idx] = ev;
            let mut v = ev;
            if idx >= 3 {
                let fv = (cur[idx - 3] - go_ge).max(f[idx - 3] - ge).max(NEG_INF);
                f[idx] = fv;
                v = v.max(fv);
            }
            if let Some((a, b)) = pair(c, j) {
                let s = scoring.matrix.score(a, b);
                if idx >= 3 {
                    v = v.max(prev[idx - 3] + s);
                }
                if idx >= 2 {
                    v = v.max(prev[idx - 2] + s - fs);
                }
                if idx >= 4 {
                    v = v.max(prev[idx - 4] + s - fs);
                }
            }
            if mode == FrameMode::Local {
                v = v.max(0);
            }
            let v = v.max(NEG_INF);
            cur[idx] = v;
            if v > best {
                best = v;
                best_cell = (idx, j + 1);
            }
        }
    }

    FrameMatrix { h, best, best_cell }
}

/// Path through a filled frame-shift matrix.
///
/// Returns the ops in the order they were walked (from the end cell back) and
/// the first aligned cell `(c, j)`, if the path has any diagonal step.
fn traceback_3frame<P>(
    m: &FrameMatrix,
    mode: FrameMode,
    scoring: &Scoring,
    pair: P,
) -> (Vec<EditOp>, Option<(i64, usize)>)
where
    P: Fn(i64, usize) -> Option<(u8, u8)>,
{
    let fs = scoring.frame_shift;
    let mut ops = Vec::new();
    let mut first = None;
    let (mut idx, mut col) = m.best_cell;

    'walk: loop {
        let h = m.h.at(idx, col);
        match mode {
            FrameMode::Local if h <= 0 => break,
            FrameMode::Anchored if (idx, col) == (ORIGIN_ROW, 0) => break,
            _ => {}
        }
        let c = idx as i64 - ROW_OFFSET as i64;

        if col > 0 {
            if let Some((a, b)) = pair(c, col - 1) {
                let s = scoring.matrix.score(a, b);
                let steps = [
                    (3, 0, None),
                    (2, fs, Some(EditOp::FrameShiftReverse)),
                    (4, fs, Some(EditOp::FrameShiftForward)),
                ];
                for (back, penalty, shift) in steps {
                    if idx >= back && m.h.at(idx - back, col - 1) + s - penalty == h {
                        ops.push(diag_op(a, b));
                        ops.extend(shift);
                        first = Some((c, col - 1));
                        idx -= back;
                        col -= 1;
                        continue 'walk;
                    }
                }
            }
        }

        if let Some(l) = (1..=col).find(|&l| m.h.at(idx, col - l) - scoring.gap_cost(l as i32) == h) {
            ops.extend(std::iter::repeat(EditOp::Del).take(l));
            col -= l;
            continue;
        }

        if let Some(l) = (1..=idx / 3).find(|&l| m.h.at(idx - 3 * l, col) - scoring.gap_cost(l as i32) == h) {
            ops.extend(std::iter::repeat(EditOp::Ins).take(l));
            idx -= 3 * l;
            continue;
        }

        panic!(
            "frame-shift traceback failed: no predecessor explains score {} at codon {} column {}",
            h,
            c,
            col as i64 - 1
        );
    }

    (ops, first)
}

/// Local frame-shift aware alignment of one strand of `query` against `subject`.
///
/// The HSP's frame is the frame of its first aligned codon. Without a
/// positive score the HSP has score zero and empty ranges.
pub fn sw_3frame(
    query: &TranslatedSequence,
    strand: Strand,
    subject: &[u8],
    scoring: &Scoring,
    stat: &DpStat,
) -> Hsp {
    let rows = query.codon_starts();
    let pair = |c: i64, j: usize| -> Option<(u8, u8)> {
        if c < 0 {
            return None;
        }
        query.residue_checked(strand, c).map(|a| (a, subject[j]))
    };
    let m = fill_3frame(rows, subject.len(), FrameMode::Local, scoring, pair);
    let cells = rows * subject.len();
    stat.combine(&DpCells::new(cells, cells));

    if m.best <= 0 {
        return Hsp::with_transcript(0, 0..0, 0..0, Vec::new()).with_frame(Frame::new(strand, 0));
    }

    let (mut ops, first) = traceback_3frame(&m, FrameMode::Local, scoring, pair);
    ops.reverse();
    let (end_idx, end_col) = m.best_cell;
    let q_end = end_idx - ROW_OFFSET + 3;
    let s_end = end_col;
    let (c0, j0) = first.unwrap_or((q_end as i64 - 3, s_end - 1));
    Hsp::with_transcript(m.best, c0 as usize..q_end, j0..s_end, ops)
        .with_frame(Frame::of_position(strand, c0 as usize))
}

/// Extend an ungapped anchor in both directions with frame-shift aware DP.
///
/// Each side is aligned end-to-end from the anchor boundary and may stop at
/// any cell; the best stopping cell of each side is kept. The score is the
/// anchor's own substitution score plus both extensions.
pub fn anchored_3frame_dp(
    query: &TranslatedSequence,
    subject: &[u8],
    anchor: &DiagonalSegment,
    scoring: &Scoring,
    stat: &DpStat,
) -> Hsp {
    let strand = anchor.strand;
    assert!(
        anchor.len > 0
            && anchor.query_end() <= query.len()
            && anchor.subject_end() <= subject.len(),
        "anchor {:?} outside query of {} nt / subject of {} residues",
        anchor,
        query.len(),
        subject.len()
    );

    let mut anchor_score = 0;
    let mut anchor_ops = Vec::with_capacity(anchor.len);
    for t in 0..anchor.len {
        let a = query.residue(strand, anchor.i + 3 * t);
        let b = subject[anchor.j + t];
        anchor_score += scoring.matrix.score(a, b);
        anchor_ops.push(diag_op(a, b));
    }

    // right: codons after the anchor, read forwards
    let c_right = anchor.query_end() as i64;
    let j_right = anchor.subject_end();
    let right_rows = (query.codon_starts() as i64 - c_right).max(0) as usize;
    let right_cols = subject.len() - j_right;
    let right_pair = |r: i64, q: usize| -> Option<(u8, u8)> {
        if r < -1 {
            return None;
        }
        query
            .residue_checked(strand, c_right + r)
            .map(|a| (a, subject[j_right + q]))
    };
    let right = fill_3frame(right_rows, right_cols, FrameMode::Anchored, scoring, right_pair);
    let (mut right_ops, _) = traceback_3frame(&right, FrameMode::Anchored, scoring, right_pair);
    right_ops.reverse();

    // left: codons before the anchor, read backwards
    let c_left = anchor.i as i64 - 3;
    let j_left = anchor.j;
    let left_rows = (c_left + 1).max(0) as usize;
    let left_pair = |r: i64, q: usize| -> Option<(u8, u8)> {
        if r < -1 {
            return None;
        }
        query
            .residue_checked(strand, c_left - r)
            .map(|a| (a, subject[j_left - 1 - q]))
    };
    let left = fill_3frame(left_rows, j_left, FrameMode::Anchored, scoring, left_pair);
    let (left_ops, _) = traceback_3frame(&left, FrameMode::Anchored, scoring, left_pair);

    let cells = right_rows * right_cols + left_rows * j_left;
    stat.combine(&DpCells::new(cells, cells));

    let (q_end, s_end) = match right.best_cell {
        (ORIGIN_ROW, 0) => (anchor.query_end(), j_right),
        (idx, col) => ((c_right + idx as i64 - ROW_OFFSET as i64 + 3) as usize, j_right + col),
    };
    let (q_begin, s_begin) = match left.best_cell {
        (ORIGIN_ROW, 0) => (anchor.i, anchor.j),
        (idx, col) => ((c_left - (idx as i64 - ROW_OFFSET as i64)) as usize, j_left - col),
    };

    let mut ops = left_ops;
    ops.extend(anchor_ops);
    ops.extend(right_ops);
    Hsp::with_transcript(
        anchor_score + left.best + right.best,
        q_begin..q_end,
        s_begin..s_end,
        ops,
    )
    .with_frame(Frame::of_position(strand, q_begin))
}

/// Job covering every codon start of `query` against the whole subject
pub fn full_3frame_target<'a>(subject: &'a [u8], query: &TranslatedSequence, target_idx: usize) -> DpTarget<'a> {
    let rows = query.codon_starts() as i32;
    let d_begin = 1 - subject.len() as i32;
    let d_end = ((rows + 2) / 3).max(d_begin);
    DpTarget::new(subject, d_begin, d_end, 0, subject.len() as i32, target_idx)
}

fn encode_codons(query: &TranslatedSequence, strand: Strand, scoring: &Scoring) -> Vec<usize> {
    (0..query.codon_starts())
        .map(|c| scoring.matrix.encode(query.residue(strand, c)))
        .collect()
}

/// Banded frame-shift alignment of a single job in one 32-bit lane
pub fn banded_3frame_sw(
    query: &TranslatedSequence,
    strand: Strand,
    target: &DpTarget<'_>,
    scoring: &Scoring,
    traceback: bool,
    stat: &DpStat,
) -> Hsp {
    let codons = encode_codons(query, strand, scoring);
    let input = kernel_input(&codons, scoring, traceback);
    let targets = std::slice::from_ref(target);
    let mut cells = DpCells::default();
    let outcome = run_3frame_lanes::<i32, 1>(&input, targets, &[0], &mut cells).pop();
    stat.combine(&cells);
    outcome
        .and_then(|o| finish_3frame(o, query, strand, targets, 1))
        .unwrap_or_else(|| Hsp::with_transcript(0, 0..0, 0..0, Vec::new()).with_frame(Frame::new(strand, 0)))
}

/// Batched frame-shift alignment of many jobs against one strand of `query`.
///
/// Jobs run in 16-bit lanes; a job that saturates is rerun in 32-bit lanes.
/// Returns one HSP per job with a positive score, ordered by position in
/// `targets`, with transcripts unless `score_only`.
pub fn banded_3frame_swipe(
    query: &TranslatedSequence,
    strand: Strand,
    targets: &[DpTarget<'_>],
    scoring: &Scoring,
    stat: &DpStat,
    score_only: bool,
    parallel: bool,
) -> Vec<Hsp> {
    assert!(
        scoring.gap_open_extend() < i16::MAX as i32 && scoring.frame_shift < i16::MAX as i32,
        "penalties {}/{}/{} do not fit a 16-bit lane",
        scoring.gap_open,
        scoring.gap_extend,
        scoring.frame_shift
    );
    let codons = encode_codons(query, strand, scoring);
    let input = kernel_input(&codons, scoring, !score_only);

    let mut order: Vec<usize> = (0..targets.len()).collect();
    order.sort_by(|&a, &b| targets[a].cmp(&targets[b]));
    bump(&counters().frameshift_targets, order.len());

    let run_chunk = |jobs: &[usize]| -> Vec<Hsp> {
        let mut cells = DpCells::default();
        let mut hsps = Vec::new();
        let mut saturated = Vec::new();
        for outcome in run_3frame_lanes::<i16, 8>(&input, targets, jobs, &mut cells) {
            match outcome {
                LaneOutcome::Saturated { job } => saturated.push(job),
                done => hsps.extend(finish_3frame(done, query, strand, targets, 1)),
            }
        }
        if !saturated.is_empty() {
            bump(&counters().frameshift_promoted, saturated.len());
            log::debug!("{} frame-shift targets saturated 16-bit lanes", saturated.len());
            for outcome in run_3frame_lanes::<i32, 4>(&input, targets, &saturated, &mut cells) {
                hsps.extend(finish_3frame(outcome, query, strand, targets, 1));
            }
        }
        stat.combine(&cells);
        hsps
    };

    let parts: Vec<Vec<Hsp>> = if parallel {
        order.par_chunks(CHUNK_SIZE).map(run_chunk).collect()
    } else {
        order.chunks(CHUNK_SIZE).map(run_chunk).collect()
    };
    let mut hsps: Vec<Hsp> = parts.into_iter().flatten().collect();
    hsps.sort_by_key(|h| h.swipe_target);
    hsps
}

fn kernel_input<'a>(codons: &'a [usize], scoring: &'a Scoring, traceback: bool) -> FrameKernelInput<'a> {
    FrameKernelInput {
        codons,
        matrix: &scoring.matrix,
        gap_open_extend: scoring.gap_open_extend(),
        gap_extend: scoring.gap_extend,
        frame_shift: scoring.frame_shift,
        traceback,
    }
}

fn finish_3frame(
    outcome: LaneOutcome,
    query: &TranslatedSequence,
    strand: Strand,
    targets: &[DpTarget<'_>],
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
    if score < score_cutoff.max(1) {
        return None;
    }
    let target = &targets[job];
    let (q_end, s_end) = (end.0 + 3, end.1 + 1);
    let hsp = match band {
        Some(band) => {
            bump(&counters().tracebacks, 1);
            let (ops, c0, j0) = traceback_band_3frame(&band, target, query, strand, end.0, end.1);
            Hsp::with_transcript(score, c0..q_end, j0..s_end, ops).with_frame(Frame::of_position(strand, c0))
        }
        None => Hsp::score_only(score, q_end, s_end).with_frame(Frame::of_position(strand, end.0)),
    };
    Some(hsp.with_target(target.target_idx, job))
}

/// Follow frame-shift direction bits back from the best cell `(c, j)`.
/// Returns the transcript in forward order and the first aligned `(c, j)`.
fn traceback_band_3frame(
    band: &Band,
    target: &DpTarget<'_>,
    query: &TranslatedSequence,
    strand: Strand,
    best_c: usize,
    best_j: usize,
) -> (Vec<EditOp>, usize, usize) {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        H,
        HGap,
        VGap,
    }

    let rows = query.codon_starts() as i64;
    let cell = |c: i64, j: i64| -> Option<u8> {
        let r = c - 3 * (j + target.d_begin as i64);
        let col = j - target.j_begin as i64;
        if c < 0 || c >= rows || r < 0 || r >= band.diags() as i64 || col < 0 || col >= band.cols() as i64 {
            return None;
        }
        Some(band.get(r as usize, col as usize))
    };

    let mut ops = Vec::new();
    let (mut c, mut j) = (best_c as i64, best_j as i64);
    let mut first = (c, j);
    let mut state = State::H;

    loop {
        let bits = match cell(c, j) {
            Some(b) => b,
            None => {
                assert!(state == State::H, "gap run leaves the band at codon {} column {}", c, j);
                break;
            }
        };
        match state {
            State::H => {
                let back = match bits & dir3::SRC_MASK {
                    dir3::STOP => break,
                    dir3::IN_FRAME => 3,
                    dir3::SHIFT_REVERSE => 2,
                    dir3::SHIFT_FORWARD => 4,
                    dir3::HGAP => {
                        state = State::HGap;
                        continue;
                    }
                    _ => {
                        state = State::VGap;
                        continue;
                    }
                };
                let a = query.residue(strand, c as usize);
                let b = target.seq[j as usize];
                ops.push(diag_op(a, b));
                match back {
                    2 => ops.push(EditOp::FrameShiftReverse),
                    4 => ops.push(EditOp::FrameShiftForward),
                    _ => {}
                }
                first = (c, j);
                c -= back;
                j -= 1;
            }
            State::HGap => {
                ops.push(EditOp::Del);
                if bits & dir3::HGAP_EXT == 0 {
                    state = State::H;
                }
                j -= 1;
            }
            State::VGap => {
                ops.push(EditOp::Ins);
                if bits & dir3::VGAP_EXT == 0 {
                    state = State::H;
                }
                c -= 3;
            }
        }
    }

    ops.reverse();
    (ops, first.0 as usize, first.1 as usize)
}
