//! DP cell accounting shared by concurrent workers
//!
//! Workers count cells into a local `DpCells` and fold it into the shared
//! `DpStat` once per unit of work.

use std::ops::AddAssign;
use std::sync::Mutex;

/// Gross = cells computed, net = cells that lie inside the DP matrix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DpCells {
    pub gross_cells: usize,
    pub net_cells: usize,
}

impl DpCells {
    pub fn new(gross_cells: usize, net_cells: usize) -> Self {
        Self {
            gross_cells,
            net_cells,
        }
    }
}

impl AddAssign for DpCells {
    fn add_assign(&mut self, other: Self) {
        self.gross_cells += other.gross_cells;
        self.net_cells += other.net_cells;
    }
}

/// Run-wide cell counters. Monotonic: there is no reset.
#[derive(Debug, Default)]
pub struct DpStat {
    cells: Mutex<DpCells>,
}

impl DpStat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `other` under one short-held lock
    pub fn combine(&self, other: &DpCells) {
        let mut cells = self.cells.lock().unwrap_or_else(|e| e.into_inner());
        cells.gross_cells += other.gross_cells;
        cells.net_cells += other.net_cells;
    }

    pub fn snapshot(&self) -> DpCells {
        *self.cells.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn gross_cells(&self) -> usize {
        self.snapshot().gross_cells
    }

    pub fn net_cells(&self) -> usize {
        self.snapshot().net_cells
    }

    /// net / gross, 1.0 when nothing was computed
    pub fn efficiency(&self) -> f64 {
        let c = self.snapshot();
        if c.gross_cells == 0 {
            1.0
        } else {
            c.net_cells as f64 / c.gross_cells as f64
        }
    }
}
