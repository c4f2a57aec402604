//! Banded frame-shift aware local alignment over N lanes
//!
//! Rows are codon starts `c` on one strand of a translated query. A job's band
//! covers `c` in `[3(j + d_begin), 3(j + d_end))` at subject column `j`; slot
//! `r = c - 3(j + d_begin)` of a column holds cell `c`. Predecessors then sit
//! at fixed slots: in frame `r` (previous column), reverse shift `r + 1` and
//! forward shift `r - 1` (previous column), horizontal gap `r + 3` (previous
//! column), vertical gap `r - 3` (current column).

use super::vector::{ScoreVector, SwipeScore};
use super::LaneOutcome;
use crate::align::band::Band;
use crate::align::stat::DpCells;
use crate::align::target::DpTarget;
use crate::utils::matrix::ScoreMatrix;

/// Direction bits of a frame-shift band cell
pub(crate) mod dir3 {
    pub const STOP: u8 = 0;
    pub const IN_FRAME: u8 = 1;
    /// Previous codon started two nucleotides earlier
    pub const SHIFT_REVERSE: u8 = 2;
    /// Previous codon started four nucleotides earlier
    pub const SHIFT_FORWARD: u8 = 3;
    pub const HGAP: u8 = 4;
    pub const VGAP: u8 = 5;
    pub const SRC_MASK: u8 = 7;
    pub const HGAP_EXT: u8 = 8;
    pub const VGAP_EXT: u8 = 16;
}

/// Slots left of `r = 0` reachable by `r - 3`
const LEFT_PAD: usize = 3;
/// Slots right of the widest band reachable by `r + 3`
const RIGHT_PAD: usize = 3;

pub(crate) struct FrameKernelInput<'a> {
    /// Encoded residue of the codon starting at each nucleotide offset
    pub codons: &'a [usize],
    pub matrix: &'a ScoreMatrix,
    pub gap_open_extend: i32,
    pub gap_extend: i32,
    pub frame_shift: i32,
    pub traceback: bool,
}

struct Lane {
    job: usize,
    col: i32,
    best: i32,
    best_cell: (usize, usize),
    band: Option<Band>,
}

/// Rows a job's band spans per column
#[inline]
pub(crate) fn frame_band_width(target: &DpTarget<'_>) -> usize {
    3 * target.band()
}

pub(crate) fn run_3frame_lanes<T: SwipeScore, const N: usize>(
    input: &FrameKernelInput<'_>,
    targets: &[DpTarget<'_>],
    jobs: &[usize],
    cells: &mut DpCells,
) -> Vec<LaneOutcome> {
    let mut out = Vec::with_capacity(jobs.len());
    let width_max = jobs
        .iter()
        .map(|&j| frame_band_width(&targets[j]))
        .max()
        .unwrap_or(0);
    let empty = |job| LaneOutcome::Done {
        job,
        score: 0,
        end: (0, 0),
        band: None,
    };
    if width_max == 0 {
        out.extend(jobs.iter().map(|&job| empty(job)));
        return out;
    }

    let go_ge = ScoreVector::<T, N>::splat(T::from_i32(input.gap_open_extend));
    let ge = ScoreVector::<T, N>::splat(T::from_i32(input.gap_extend));
    let fs = ScoreVector::<T, N>::splat(T::from_i32(input.frame_shift));
    let zero = ScoreVector::<T, N>::zero();
    let minv = ScoreVector::<T, N>::min_value();
    let query_len = input.codons.len();

    let slots = LEFT_PAD + width_max + RIGHT_PAD;
    let mut h_prev = vec![zero; slots];
    let mut e_prev = vec![minv; slots];
    let mut h_cur = vec![zero; slots];
    let mut e_cur = vec![minv; slots];
    let mut f_cur = vec![minv; slots];

    let mut lanes: [Option<Lane>; N] = std::array::from_fn(|_| None);
    let mut next = 0;

    loop {
        for l in 0..N {
            if lanes[l].is_some() {
                continue;
            }
            while next < jobs.len() {
                let job = jobs[next];
                next += 1;
                let t = &targets[job];
                if t.band() == 0 || t.cols() == 0 {
                    out.push(empty(job));
                    continue;
                }
                for s in 0..slots {
                    h_prev[s][l] = T::ZERO;
                    e_prev[s][l] = T::MIN;
                }
                let band = input.traceback.then(|| {
                    let mut b = Band::new();
                    b.init(frame_band_width(t), t.cols());
                    b
                });
                lanes[l] = Some(Lane {
                    job,
                    col: t.j_begin,
                    best: 0,
                    best_cell: (0, 0),
                    band,
                });
                break;
            }
        }
        if lanes.iter().all(Option::is_none) {
            break;
        }

        let mut row0 = [0i64; N];
        let mut width = [0usize; N];
        let mut s_enc = [None; N];
        for (l, lane) in lanes.iter().enumerate() {
            if let Some(lane) = lane {
                let t = &targets[lane.job];
                row0[l] = 3 * (lane.col as i64 + t.d_begin as i64);
                width[l] = frame_band_width(t);
                s_enc[l] = Some(input.matrix.encode(t.seq[lane.col as usize]));
            }
        }

        let mut saturated = [false; N];
        let mut net = 0;

        for r in 0..width_max {
            let mut sub = [T::ZERO; N];
            let mut valid = [false; N];
            for l in 0..N {
                if let Some(s) = s_enc[l] {
                    let c = row0[l] + r as i64;
                    if r < width[l] && c >= 0 && (c as usize) < query_len {
                        valid[l] = true;
                        sub[l] = T::from_i32(input.matrix.score_encoded(input.codons[c as usize], s));
                    }
                }
            }
            let sub = ScoreVector::from_array(sub);
            let at = r + LEFT_PAD;

            let in_frame = h_prev[at].adds(sub);
            let reverse = h_prev[at + 1].adds(sub).subs(fs);
            let forward = h_prev[at - 1].adds(sub).subs(fs);
            let e_open = h_prev[at + 3].subs(go_ge);
            let e_ext = e_prev[at + 3].subs(ge);
            let e = e_open.max(e_ext);
            let f_open = h_cur[at - 3].subs(go_ge);
            let f_ext = f_cur[at - 3].subs(ge);
            let f = f_open.max(f_ext);
            let h = in_frame
                .max(reverse)
                .max(forward)
                .max(e)
                .max(f)
                .max(zero);

            let h = h.keep(&valid, zero);
            h_cur[at] = h;
            e_cur[at] = e.keep(&valid, minv);
            f_cur[at] = f.keep(&valid, minv);

            for l in 0..N {
                if !valid[l] {
                    continue;
                }
                net += 1;
                let Some(lane) = lanes[l].as_mut() else {
                    continue;
                };
                if h[l] == T::MAX {
                    saturated[l] = true;
                }
                let score = h[l].to_i32();
                let c = (row0[l] + r as i64) as usize;
                if score > lane.best {
                    lane.best = score;
                    lane.best_cell = (c, lane.col as usize);
                }
                if let Some(band) = lane.band.as_mut() {
                    let mut bits = if score == 0 {
                        dir3::STOP
                    } else if h[l] == in_frame[l] {
                        dir3::IN_FRAME
                    } else if h[l] == reverse[l] {
                        dir3::SHIFT_REVERSE
                    } else if h[l] == forward[l] {
                        dir3::SHIFT_FORWARD
                    } else if h[l] == e[l] {
                        dir3::HGAP
                    } else {
                        dir3::VGAP
                    };
                    if e_ext[l] >= e_open[l] {
                        bits |= dir3::HGAP_EXT;
                    }
                    if f_ext[l] >= f_open[l] {
                        bits |= dir3::VGAP_EXT;
                    }
                    let col = (lane.col - targets[lane.job].j_begin) as usize;
                    band.diagonal(r)[col] = bits;
                }
            }
        }

        std::mem::swap(&mut h_prev, &mut h_cur);
        std::mem::swap(&mut e_prev, &mut e_cur);
        *cells += DpCells::new(width_max * N, net);

        for l in 0..N {
            let Some(lane) = lanes[l].as_mut() else {
                continue;
            };
            if saturated[l] {
                out.push(LaneOutcome::Saturated { job: lane.job });
                lanes[l] = None;
                continue;
            }
            lane.col += 1;
            if lane.col == targets[lane.job].j_end {
                if let Some(lane) = lanes[l].take() {
                    out.push(LaneOutcome::Done {
                        job: lane.job,
                        score: lane.best,
                        end: lane.best_cell,
                        band: lane.band,
                    });
                }
            }
        }
    }

    out
}
