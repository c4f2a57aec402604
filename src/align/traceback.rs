//! Alignment path recovery
//!
//! Two flavours:
//! - `traceback_matrix` walks a full H matrix kept in a `ScoreBuffer`, finding
//!   for every cell a predecessor that explains its score (diagonal first, then
//!   horizontal gaps, then vertical gaps, shortest gap first).
//! - `traceback_band` follows the direction bits the banded kernels record in a
//!   `Band`.

use super::band::Band;
use super::result::EditOp;
use super::score_buffer::ScoreBuffer;
use super::sw::DpMode;
use super::target::DpTarget;
use crate::utils::matrix::Scoring;

/// Direction bits stored per banded cell
pub(crate) mod dir {
    /// Source of H: cell restarted at zero
    pub const STOP: u8 = 0;
    /// Source of H: diagonal step
    pub const DIAG: u8 = 1;
    /// Source of H: horizontal gap (subject residue against a gap)
    pub const HGAP: u8 = 2;
    /// Source of H: vertical gap (query residue against a gap)
    pub const VGAP: u8 = 3;
    pub const SRC_MASK: u8 = 3;
    /// Horizontal gap at this cell extends the one in the previous column
    pub const HGAP_EXT: u8 = 4;
    /// Vertical gap at this cell extends the one in the previous row
    pub const VGAP_EXT: u8 = 8;
}

#[inline]
fn diag_op(a: u8, b: u8) -> EditOp {
    if a == b {
        EditOp::Match
    } else {
        EditOp::Mismatch
    }
}

/// Walk back from `(end_row, end_col)` of a full score matrix.
///
/// Rows are query prefix lengths, columns subject prefix lengths. Returns the
/// transcript in forward order and the `(row, col)` where the path starts.
pub fn traceback_matrix(
    buf: &ScoreBuffer<i32>,
    query: &[u8],
    subject: &[u8],
    scoring: &Scoring,
    mode: DpMode,
    end_row: usize,
    end_col: usize,
) -> (Vec<EditOp>, usize, usize) {
    let mut ops = Vec::new();
    let (mut i, mut j) = (end_row, end_col);

    loop {
        let h = buf.at(i, j);
        match mode {
            DpMode::Local if h <= 0 => break,
            DpMode::Global if i == 0 && j == 0 => break,
            _ => {}
        }

        if i > 0 && j > 0 {
            let s = scoring.matrix.score(query[i - 1], subject[j - 1]);
            if h == buf.at(i - 1, j - 1) + s {
                ops.push(diag_op(query[i - 1], subject[j - 1]));
                i -= 1;
                j -= 1;
                continue;
            }
        }

        if let Some(l) = (1..=j).find(|&l| buf.at(i, j - l) - scoring.gap_cost(l as i32) == h) {
            ops.extend(std::iter::repeat(EditOp::Del).take(l));
            j -= l;
            continue;
        }

        if let Some(l) = (1..=i).find(|&l| buf.at(i - l, j) - scoring.gap_cost(l as i32) == h) {
            ops.extend(std::iter::repeat(EditOp::Ins).take(l));
            i -= l;
            continue;
        }

        panic!(
            "traceback failed: no predecessor explains score {} at cell ({}, {})",
            h, i, j
        );
    }

    ops.reverse();
    (ops, i, j)
}

/// Walk back through the direction bits of a banded local alignment.
///
/// `(best_i, best_j)` is the last aligned cell (query position, subject
/// position). Returns the transcript in forward order and the first aligned
/// `(query, subject)` positions.
pub(crate) fn traceback_band(
    band: &Band,
    target: &DpTarget<'_>,
    query: &[u8],
    best_i: usize,
    best_j: usize,
) -> (Vec<EditOp>, usize, usize) {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        H,
        HGap,
        VGap,
    }

    let subject = target.seq;
    let cell = |i: i64, j: i64| -> Option<u8> {
        let k = i - j - target.d_begin as i64;
        let col = j - target.j_begin as i64;
        if i < 0
            || i >= query.len() as i64
            || k < 0
            || k >= target.band() as i64
            || col < 0
            || col >= target.cols() as i64
        {
            return None;
        }
        let flat = k as usize + col as usize * band.diags();
        debug_assert!(band.contains(flat));
        Some(band.get(k as usize, col as usize))
    };

    let mut ops = Vec::new();
    let (mut i, mut j) = (best_i as i64, best_j as i64);
    let mut state = State::H;

    loop {
        let bits = match cell(i, j) {
            Some(b) => b,
            None => {
                assert!(state == State::H, "gap run leaves the band at ({}, {})", i, j);
                break;
            }
        };
        match state {
            State::H => match bits & dir::SRC_MASK {
                dir::STOP => break,
                dir::DIAG => {
                    ops.push(diag_op(query[i as usize], subject[j as usize]));
                    i -= 1;
                    j -= 1;
                }
                dir::HGAP => state = State::HGap,
                _ => state = State::VGap,
            },
            State::HGap => {
                ops.push(EditOp::Del);
                if bits & dir::HGAP_EXT == 0 {
                    state = State::H;
                }
                j -= 1;
            }
            State::VGap => {
                ops.push(EditOp::Ins);
                if bits & dir::VGAP_EXT == 0 {
                    state = State::H;
                }
                i -= 1;
            }
        }
    }

    ops.reverse();
    (ops, (i + 1) as usize, (j + 1) as usize)
}
