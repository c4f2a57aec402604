//! Column-major score storage for full-matrix DP

use std::fmt;

/// Growable column-major DP matrix.
///
/// `col_size` rows per column, fixed at `init`. Storage only grows by whole
/// columns, so `len()` is always a multiple of `col_size`.
#[derive(Debug, Clone, Default)]
pub struct ScoreBuffer<T> {
    data: Vec<T>,
    col_size: usize,
}

impl<T: Copy + Default + PartialEq> ScoreBuffer<T> {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            col_size: 0,
        }
    }

    /// Reset storage to a single column of `col_size` cells set to `init`,
    /// reserving room for `cols` columns.
    pub fn init(&mut self, col_size: usize, cols: usize, init: T) {
        assert!(col_size > 0, "score buffer needs at least one row");
        self.col_size = col_size;
        self.data.clear();
        self.data.reserve(col_size * cols);
        self.data.resize(col_size, init);
    }

    /// Append one zeroed column and return `(previous, current)`.
    ///
    /// Slices handed out by earlier calls are invalidated by the borrow checker
    /// as soon as the buffer grows again.
    pub fn append_column(&mut self) -> (&mut [T], &mut [T]) {
        debug_assert!(self.col_size > 0, "append_column before init");
        let n = self.data.len();
        self.data.resize(n + self.col_size, T::default());
        let (head, current) = self.data.split_at_mut(n);
        let previous = &mut head[n - self.col_size..];
        (previous, current)
    }

    #[inline(always)]
    pub fn at(&self, row: usize, col: usize) -> T {
        debug_assert!(row < self.col_size && col < self.columns());
        self.data[col * self.col_size + row]
    }

    pub fn column(&self, col: usize) -> &[T] {
        let start = col * self.col_size;
        &self.data[start..start + self.col_size]
    }

    pub fn column_mut(&mut self, col: usize) -> &mut [T] {
        let start = col * self.col_size;
        &mut self.data[start..start + self.col_size]
    }

    /// Position `(row, col)` of the first cell holding `value`, scanning in
    /// storage order.
    pub fn find_value(&self, value: T) -> Option<(usize, usize)> {
        self.data
            .iter()
            .position(|&v| v == value)
            .map(|k| (k % self.col_size, k / self.col_size))
    }

    pub fn col_size(&self) -> usize {
        self.col_size
    }

    pub fn columns(&self) -> usize {
        if self.col_size == 0 {
            0
        } else {
            self.data.len() / self.col_size
        }
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T: Copy + Default + PartialEq + fmt::Display> fmt::Display for ScoreBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\t")?;
        for j in 0..self.columns() {
            write!(f, "{}\t", j)?;
        }
        writeln!(f)?;
        for i in 0..self.col_size {
            write!(f, "{}\t", i)?;
            for j in 0..self.columns() {
                write!(f, "{}\t", self.at(i, j))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
