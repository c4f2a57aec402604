//! Banded local alignment over N lanes
//!
//! Every lane runs its own `DpTarget`, one subject column per step. The band
//! of a lane is stored diagonal-major: slot `k` of a column holds the cell on
//! diagonal `d_begin + k`, so the diagonal predecessor of slot `k` is slot `k`
//! of the previous column, the horizontal one slot `k + 1` of the previous
//! column and the vertical one slot `k - 1` of the current column. When a lane
//! reaches the end of its columns it is retired and refilled with the next
//! job, so lanes stay busy across jobs of different lengths.

use super::vector::{ScoreVector, SwipeScore};
use super::BiasProvider;
use crate::align::band::Band;
use crate::align::stat::DpCells;
use crate::align::target::DpTarget;
use crate::align::traceback::dir;
use crate::utils::matrix::{ScoreMatrix, ScoreProfile};

/// Everything the kernel reads about the query
pub(crate) struct KernelInput<'a, B: BiasProvider> {
    pub query_len: usize,
    pub profile: &'a ScoreProfile,
    pub matrix: &'a ScoreMatrix,
    pub gap_open_extend: i32,
    pub gap_extend: i32,
    pub bias: &'a B,
    pub traceback: bool,
}

/// What became of one job
#[derive(Debug)]
pub(crate) enum LaneOutcome {
    Done {
        job: usize,
        score: i32,
        /// Last aligned (query, subject) cell, meaningful when `score > 0`
        end: (usize, usize),
        band: Option<Band>,
    },
    /// A cell hit the lane's maximum; the job must be rerun wider
    Saturated { job: usize },
}

struct Lane {
    job: usize,
    col: i32,
    best: i32,
    best_cell: (usize, usize),
    band: Option<Band>,
}

/// Run `jobs` (indices into `targets`, in feed order) through `N` lanes of `T`.
pub(crate) fn run_lanes<T: SwipeScore, const N: usize, B: BiasProvider>(
    input: &KernelInput<'_, B>,
    targets: &[DpTarget<'_>],
    jobs: &[usize],
    cells: &mut DpCells,
) -> Vec<LaneOutcome> {
    let mut out = Vec::with_capacity(jobs.len());
    let band_max = jobs.iter().map(|&j| targets[j].band()).max().unwrap_or(0);
    if band_max == 0 {
        out.extend(jobs.iter().map(|&job| empty_outcome(job)));
        return out;
    }

    let go_ge = ScoreVector::<T, N>::splat(T::from_i32(input.gap_open_extend));
    let ge = ScoreVector::<T, N>::splat(T::from_i32(input.gap_extend));
    let zero = ScoreVector::<T, N>::zero();
    let minv = ScoreVector::<T, N>::min_value();

    // one trailing slot per array stays at H = 0 / E = MIN as the band edge
    let mut h_prev = vec![zero; band_max + 1];
    let mut e_prev = vec![minv; band_max + 1];
    let mut h_cur = vec![zero; band_max + 1];
    let mut e_cur = vec![minv; band_max + 1];

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
                    out.push(empty_outcome(job));
                    continue;
                }
                for k in 0..=band_max {
                    h_prev[k][l] = T::ZERO;
                    e_prev[k][l] = T::MIN;
                }
                let band = input.traceback.then(|| {
                    let mut b = Band::new();
                    b.init(t.band(), t.cols());
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

        // per-lane setup of this column
        let mut row0 = [0i64; N];
        let mut width = [0usize; N];
        let mut profile_row: [Option<&[i8]>; N] = [None; N];
        for (l, lane) in lanes.iter().enumerate() {
            if let Some(lane) = lane {
                let t = &targets[lane.job];
                row0[l] = lane.col as i64 + t.d_begin as i64;
                width[l] = t.band();
                let residue = input.matrix.encode(t.seq[lane.col as usize]);
                profile_row[l] = Some(input.profile.row(residue));
            }
        }

        let mut vgap = minv;
        let mut h_up = zero;
        let mut saturated = [false; N];
        let mut net = 0;

        for k in 0..band_max {
            let mut sub = [T::ZERO; N];
            let mut valid = [false; N];
            for l in 0..N {
                if let Some(row) = profile_row[l] {
                    let i = row0[l] + k as i64;
                    if k < width[l] && i >= 0 && (i as usize) < input.query_len {
                        valid[l] = true;
                        let i = i as usize;
                        sub[l] = T::from_i32(row[i] as i32 + input.bias.bias(i));
                    }
                }
            }
            let sub = ScoreVector::from_array(sub);

            let diag = h_prev[k].adds(sub);
            let e_open = h_prev[k + 1].subs(go_ge);
            let e_ext = e_prev[k + 1].subs(ge);
            let e = e_open.max(e_ext);
            let f_open = h_up.subs(go_ge);
            let f_ext = vgap.subs(ge);
            let f = f_open.max(f_ext);
            let h = diag.max(e).max(f).max(zero);

            let h = h.keep(&valid, zero);
            let e = e.keep(&valid, minv);
            let f = f.keep(&valid, minv);
            h_cur[k] = h;
            e_cur[k] = e;
            vgap = f;
            h_up = h;

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
                let i = (row0[l] + k as i64) as usize;
                if score > lane.best {
                    lane.best = score;
                    lane.best_cell = (i, lane.col as usize);
                }
                if let Some(band) = lane.band.as_mut() {
                    let mut bits = if score == 0 {
                        dir::STOP
                    } else if h[l] == diag[l] {
                        dir::DIAG
                    } else if h[l] == e[l] {
                        dir::HGAP
                    } else {
                        dir::VGAP
                    };
                    if e_ext[l] >= e_open[l] {
                        bits |= dir::HGAP_EXT;
                    }
                    if f_ext[l] >= f_open[l] {
                        bits |= dir::VGAP_EXT;
                    }
                    let col = (lane.col - targets[lane.job].j_begin) as usize;
                    band.diagonal(k)[col] = bits;
                }
            }
        }

        std::mem::swap(&mut h_prev, &mut h_cur);
        std::mem::swap(&mut e_prev, &mut e_cur);
        *cells += DpCells::new(band_max * N, net);

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

fn empty_outcome(job: usize) -> LaneOutcome {
    LaneOutcome::Done {
        job,
        score: 0,
        end: (0, 0),
        band: None,
    }
}
