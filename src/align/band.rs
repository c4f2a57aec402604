//! Skewed storage for banded DP matrices
//!
//! Cells are laid out column by column with one byte per diagonal, so walking a
//! single diagonal is a strided walk with stride `diags`.

use std::ops::{Index, IndexMut};

/// `diags x cols` byte cells, fixed shape after `init`
#[derive(Debug, Clone, Default)]
pub struct Band {
    diags: usize,
    cols: usize,
    data: Vec<u8>,
}

impl Band {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate `diags * cols` zeroed cells
    pub fn init(&mut self, diags: usize, cols: usize) {
        self.diags = diags;
        self.cols = cols;
        self.data.clear();
        self.data.resize(diags * cols, 0);
    }

    /// Strided view over diagonal `offset`; element `i` is column `i`
    pub fn diagonal(&mut self, offset: usize) -> DiagonalView<'_> {
        assert!(
            offset < self.diags.max(1),
            "diagonal {} outside band of {} diagonals",
            offset,
            self.diags
        );
        DiagonalView {
            data: &mut self.data,
            base: offset,
            stride: self.diags,
        }
    }

    /// Read-only access to cell `(offset, col)`
    #[inline]
    pub fn get(&self, offset: usize, col: usize) -> u8 {
        debug_assert!(offset < self.diags && col < self.cols);
        self.data[offset + col * self.diags]
    }

    /// Bounds check for a flat cell index. One past the end is accepted.
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        index <= self.data.len()
    }

    pub fn diags(&self) -> usize {
        self.diags
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Base offset + stride view into a `Band`
pub struct DiagonalView<'a> {
    data: &'a mut [u8],
    base: usize,
    stride: usize,
}

impl DiagonalView<'_> {
    #[inline]
    fn offset(&self, i: usize) -> usize {
        let k = self.base + i * self.stride;
        assert!(
            k < self.data.len(),
            "diagonal index {} outside band storage of {} cells",
            i,
            self.data.len()
        );
        k
    }

    /// Number of columns reachable on this diagonal
    pub fn len(&self) -> usize {
        if self.stride == 0 || self.base >= self.data.len() {
            0
        } else {
            (self.data.len() - self.base).div_ceil(self.stride)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Index<usize> for DiagonalView<'_> {
    type Output = u8;

    #[inline]
    fn index(&self, i: usize) -> &u8 {
        &self.data[self.offset(i)]
    }
}

impl IndexMut<usize> for DiagonalView<'_> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut u8 {
        let k = self.offset(i);
        &mut self.data[k]
    }
}
