//! Banded alignment jobs and the order they are fed to the lane kernels

use std::cmp::Ordering;

/// One banded alignment job against the query.
///
/// Diagonals are `d = i - j` (query position minus subject position). The job
/// covers diagonals `[d_begin, d_end)` over subject columns `[j_begin, j_end)`.
/// `target_idx` points back at the candidate the job was generated for; several
/// jobs may share one index.
#[derive(Debug, Clone, Copy)]
pub struct DpTarget<'a> {
    pub seq: &'a [u8],
    pub d_begin: i32,
    pub d_end: i32,
    pub j_begin: i32,
    pub j_end: i32,
    pub target_idx: usize,
}

impl<'a> DpTarget<'a> {
    pub fn new(
        seq: &'a [u8],
        d_begin: i32,
        d_end: i32,
        j_begin: i32,
        j_end: i32,
        target_idx: usize,
    ) -> Self {
        assert!(
            d_begin <= d_end,
            "inverted diagonal range [{}, {})",
            d_begin,
            d_end
        );
        assert!(
            0 <= j_begin && j_begin <= j_end && j_end as usize <= seq.len(),
            "column range [{}, {}) outside subject of length {}",
            j_begin,
            j_end,
            seq.len()
        );
        Self {
            seq,
            d_begin,
            d_end,
            j_begin,
            j_end,
            target_idx,
        }
    }

    /// Band over the whole subject, covering every diagonal that meets a query
    /// of length `query_len`
    pub fn full(seq: &'a [u8], query_len: usize, target_idx: usize) -> Self {
        let d_begin = 1 - seq.len() as i32;
        let d_end = (query_len as i32).max(d_begin);
        Self::new(seq, d_begin, d_end, 0, seq.len() as i32, target_idx)
    }

    /// Primary batching key: the query row the last diagonal of the band
    /// reaches at column zero, clamped at zero
    #[inline]
    pub fn left_i1(&self) -> i32 {
        (self.d_end - 1).max(0)
    }

    /// Number of diagonals in the band
    #[inline]
    pub fn band(&self) -> usize {
        (self.d_end - self.d_begin) as usize
    }

    /// Number of subject columns the job covers
    #[inline]
    pub fn cols(&self) -> usize {
        (self.j_end - self.j_begin) as usize
    }

    /// Cells computed if every band cell lies inside the matrix
    pub fn cells(&self) -> usize {
        self.band() * self.cols()
    }

    /// Cells of the band that fall inside a query of length `query_len`
    pub fn net_cells(&self, query_len: usize) -> usize {
        let q = query_len as i64;
        (self.j_begin..self.j_end)
            .map(|j| {
                let lo = (j as i64 + self.d_begin as i64).max(0);
                let hi = (j as i64 + self.d_end as i64).min(q);
                (hi - lo).max(0) as usize
            })
            .sum()
    }
}

impl PartialEq for DpTarget<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DpTarget<'_> {}

impl PartialOrd for DpTarget<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DpTarget<'_> {
    /// `left_i1` ASC -> `target_idx` ASC -> `d_begin` ASC
    fn cmp(&self, other: &Self) -> Ordering {
        self.left_i1()
            .cmp(&other.left_i1())
            .then(self.target_idx.cmp(&other.target_idx))
            .then(self.d_begin.cmp(&other.d_begin))
    }
}
