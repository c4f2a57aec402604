//! Diagnostic counters for the alignment engine
//!
//! Counts where targets go inside the batch kernels (which lane width scored
//! them, how many were promoted after saturating) and what culling did with the
//! hit lists. Enabled via the BANDED_SWIPE_DIAGNOSTICS environment variable;
//! the counters are always updated, the summary is only printed when enabled.

use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::OnceLock;

use crate::align::stat::DpStat;

/// Check if diagnostics are enabled via environment variable
pub fn diagnostics_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| {
        std::env::var("BANDED_SWIPE_DIAGNOSTICS")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false)
    })
}

/// Process-wide counters for the DP kernels and culling
pub struct DiagnosticCounters {
    // Batch kernels
    pub targets_8bit: AtomicUsize,
    pub targets_16bit: AtomicUsize,
    pub promoted_to_16bit: AtomicUsize,
    pub promoted_to_32bit: AtomicUsize,
    pub empty_targets: AtomicUsize, // zero-width band or no columns
    pub tracebacks: AtomicUsize,
    pub hsps_below_cutoff: AtomicUsize,
    pub hsps_reported: AtomicUsize,
    // Frame-shift kernels
    pub frameshift_targets: AtomicUsize,
    pub frameshift_promoted: AtomicUsize,
    // Culling
    pub culling_calls: AtomicUsize,
    pub culling_deferred: AtomicUsize,
    pub targets_culled: AtomicUsize,
}

impl DiagnosticCounters {
    const fn new() -> Self {
        Self {
            targets_8bit: AtomicUsize::new(0),
            targets_16bit: AtomicUsize::new(0),
            promoted_to_16bit: AtomicUsize::new(0),
            promoted_to_32bit: AtomicUsize::new(0),
            empty_targets: AtomicUsize::new(0),
            tracebacks: AtomicUsize::new(0),
            hsps_below_cutoff: AtomicUsize::new(0),
            hsps_reported: AtomicUsize::new(0),
            frameshift_targets: AtomicUsize::new(0),
            frameshift_promoted: AtomicUsize::new(0),
            culling_calls: AtomicUsize::new(0),
            culling_deferred: AtomicUsize::new(0),
            targets_culled: AtomicUsize::new(0),
        }
    }

    /// Print a summary of all counters plus the DP cell totals of `stat`
    pub fn print_summary(&self, stat: &DpStat) {
        let load = |c: &AtomicUsize| c.load(AtomicOrdering::Relaxed);

        eprintln!("\n=== Banded SWIPE Diagnostics ===");
        eprintln!("Batch Kernels:");
        eprintln!("  Targets in 8-bit lanes:     {}", load(&self.targets_8bit));
        eprintln!("  Targets in 16-bit lanes:    {}", load(&self.targets_16bit));
        eprintln!("  Promoted 8 -> 16 bit:       {}", load(&self.promoted_to_16bit));
        eprintln!("  Promoted 16 -> 32 bit:      {}", load(&self.promoted_to_32bit));
        eprintln!("  Empty targets:              {}", load(&self.empty_targets));
        eprintln!("  Tracebacks computed:        {}", load(&self.tracebacks));
        eprintln!("  HSPs below cutoff:          {}", load(&self.hsps_below_cutoff));
        eprintln!("  HSPs reported:              {}", load(&self.hsps_reported));
        eprintln!("Frame-Shift Kernels:");
        eprintln!("  Targets scored:             {}", load(&self.frameshift_targets));
        eprintln!("  Promoted 16 -> 32 bit:      {}", load(&self.frameshift_promoted));
        eprintln!("Culling:");
        eprintln!("  Hit lists culled:           {}", load(&self.culling_calls));
        eprintln!("  Deferred to filters:        {}", load(&self.culling_deferred));
        eprintln!("  Targets removed:            {}", load(&self.targets_culled));
        eprintln!("DP Cells:");
        eprintln!("  Gross cells:                {}", stat.gross_cells());
        eprintln!("  Net cells:                  {}", stat.net_cells());
        eprintln!("  Efficiency:                 {:.3}", stat.efficiency());
        eprintln!("================================\n");
    }
}

static COUNTERS: DiagnosticCounters = DiagnosticCounters::new();

pub fn counters() -> &'static DiagnosticCounters {
    &COUNTERS
}

#[inline]
pub(crate) fn bump(counter: &AtomicUsize, n: usize) {
    counter.fetch_add(n, AtomicOrdering::Relaxed);
}

/// Print the summary if diagnostics are enabled
pub fn print_summary(stat: &DpStat) {
    if diagnostics_enabled() {
        counters().print_summary(stat);
    }
}
