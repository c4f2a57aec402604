//! Full-matrix Smith-Waterman / Needleman-Wunsch with affine gaps
//!
//! The H matrix is kept column by column in a `ScoreBuffer` (one column per
//! subject prefix, one row per query prefix); the traceback then searches that
//! matrix for predecessors, starting from the first cell that holds the best
//! score.

use super::result::Hsp;
use super::score_buffer::ScoreBuffer;
use super::stat::{DpCells, DpStat};
use super::traceback::traceback_matrix;
use crate::utils::matrix::Scoring;

/// Stand-in for minus infinity that survives a few subtractions
pub(crate) const NEG_INF: i32 = i32::MIN / 4;

/// Alignment mode of the full-matrix DP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DpMode {
    /// Smith-Waterman: every cell may restart at zero
    Local,
    /// Needleman-Wunsch: end gaps are charged, the alignment spans both sequences
    Global,
}

/// Fill the full DP matrix of `query` (rows) against `subject` (columns).
///
/// Returns the matrix and the alignment score: the best cell for `Local`, the
/// bottom-right cell for `Global`.
pub fn needleman_wunsch(
    query: &[u8],
    subject: &[u8],
    scoring: &Scoring,
    mode: DpMode,
) -> (ScoreBuffer<i32>, i32) {
    let rows = query.len() + 1;
    let mut buf = ScoreBuffer::new();
    buf.init(rows, subject.len() + 1, 0);

    if mode == DpMode::Global {
        let first = buf.column_mut(0);
        for (i, cell) in first.iter_mut().enumerate().skip(1) {
            *cell = -scoring.gap_cost(i as i32);
        }
    }

    let go_ge = scoring.gap_open_extend();
    let ge = scoring.gap_extend;
    let q_enc: Vec<usize> = query.iter().map(|&c| scoring.matrix.encode(c)).collect();

    // horizontal gap state per row, carried across columns
    let mut hgap = vec![NEG_INF; rows];
    let mut best = 0;

    for (j, &s_res) in subject.iter().enumerate() {
        let s_enc = scoring.matrix.encode(s_res);
        let (prev, cur) = buf.append_column();
        cur[0] = match mode {
            DpMode::Local => 0,
            DpMode::Global => -scoring.gap_cost(j as i32 + 1),
        };
        let mut vgap = NEG_INF;
        for i in 1..rows {
            let e = (hgap[i] - ge).max(prev[i] - go_ge);
            hgap[i] = e;
            vgap = (vgap - ge).max(cur[i - 1] - go_ge);
            let diag = prev[i - 1] + scoring.matrix.score_encoded(q_enc[i - 1], s_enc);
            let mut h = diag.max(e).max(vgap);
            if mode == DpMode::Local {
                h = h.max(0);
                best = best.max(h);
            }
            cur[i] = h.max(NEG_INF);
        }
    }

    let score = match mode {
        DpMode::Local => best,
        DpMode::Global => buf.at(query.len(), subject.len()),
    };
    (buf, score)
}

/// Local alignment with traceback over the full matrix.
///
/// An alignment with no positive score comes back as a zero-score HSP with
/// empty ranges and an empty transcript.
pub fn smith_waterman(query: &[u8], subject: &[u8], scoring: &Scoring, stat: &DpStat) -> Hsp {
    let (buf, score) = needleman_wunsch(query, subject, scoring, DpMode::Local);
    let cells = query.len() * subject.len();
    stat.combine(&DpCells::new(cells, cells));

    if score <= 0 {
        return Hsp::with_transcript(0, 0..0, 0..0, Vec::new());
    }

    let (end_row, end_col) = buf
        .find_value(score)
        .unwrap_or_else(|| panic!("score {} missing from DP matrix", score));
    let (transcript, row, col) =
        traceback_matrix(&buf, query, subject, scoring, DpMode::Local, end_row, end_col);
    Hsp::with_transcript(score, row..end_row, col..end_col, transcript)
}

/// Global alignment with traceback; the transcript spans both sequences
pub fn global_alignment(query: &[u8], subject: &[u8], scoring: &Scoring, stat: &DpStat) -> Hsp {
    let (buf, score) = needleman_wunsch(query, subject, scoring, DpMode::Global);
    let cells = query.len() * subject.len();
    stat.combine(&DpCells::new(cells, cells));

    let (transcript, _, _) = traceback_matrix(
        &buf,
        query,
        subject,
        scoring,
        DpMode::Global,
        query.len(),
        subject.len(),
    );
    Hsp::with_transcript(score, 0..query.len(), 0..subject.len(), transcript)
}
