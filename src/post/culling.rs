//! Score-only culling of a query's hit list

use std::cmp::Ordering;

use crate::align::result::Hsp;
use crate::diagnostics::{bump, counters};

/// Hits of one query against one subject
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    /// Position of the subject in the database
    pub subject_idx: usize,
    /// Score used for ranking
    pub filter_score: i32,
    /// Alignments, best first
    pub hsps: Vec<Hsp>,
}

impl Target {
    pub fn new(subject_idx: usize, filter_score: i32) -> Self {
        Self {
            subject_idx,
            filter_score,
            hsps: Vec::new(),
        }
    }

    /// Target ranked by its best HSP
    pub fn from_hsps(subject_idx: usize, mut hsps: Vec<Hsp>) -> Self {
        hsps.sort_by(|a, b| b.score.cmp(&a.score));
        let filter_score = hsps.first().map_or(0, |h| h.score);
        Self {
            subject_idx,
            filter_score,
            hsps,
        }
    }

    /// Best HSP, if any
    pub fn top_hsp(&self) -> Option<&Hsp> {
        self.hsps.first()
    }

    /// Ranking order: higher `filter_score` first
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other.filter_score.cmp(&self.filter_score)
    }
}

/// Hit list policy
#[derive(Debug, Clone, PartialEq)]
pub struct CullingConfig {
    /// Keep hits within this percentage of the best score (100 = off)
    pub toppercent: f64,
    /// Minimum percent identity
    pub min_id: f64,
    /// Minimum percent query coverage
    pub query_cover: f64,
    /// Minimum percent subject coverage
    pub subject_cover: f64,
    pub no_self_hits: bool,
    /// Hits kept when no other policy applies
    pub max_alignments: usize,
}

impl Default for CullingConfig {
    fn default() -> Self {
        Self {
            toppercent: 100.0,
            min_id: 0.0,
            query_cover: 0.0,
            subject_cover: 0.0,
            no_self_hits: false,
            max_alignments: 25,
        }
    }
}

impl CullingConfig {
    /// True if identity, coverage or self-hit filters run downstream
    pub fn filters_active(&self) -> bool {
        self.min_id > 0.0 || self.query_cover > 0.0 || self.subject_cover > 0.0 || self.no_self_hits
    }
}

/// Rank `targets` best first and cut the list down per `config`.
///
/// With `toppercent < 100` every hit scoring at least
/// `(1 - toppercent / 100) * best` survives. With `toppercent == 100` the list
/// is cut to `max_alignments`, unless downstream filters are active; then it
/// is only sorted, so the filters see every hit.
pub fn score_only_culling(targets: &mut Vec<Target>, config: &CullingConfig) {
    bump(&counters().culling_calls, 1);
    targets.sort_by(Target::rank_cmp);

    if config.toppercent == 100.0 && config.filters_active() {
        bump(&counters().culling_deferred, 1);
        log::trace!("culling deferred to filters for {} targets", targets.len());
        return;
    }

    let keep = if config.toppercent < 100.0 {
        match targets.first() {
            Some(best) => {
                let cutoff = ((1.0 - config.toppercent / 100.0) * best.filter_score as f64) as i32;
                targets
                    .iter()
                    .position(|t| t.filter_score < cutoff)
                    .unwrap_or(targets.len())
            }
            None => 0,
        }
    } else {
        config.max_alignments.min(targets.len())
    };

    bump(&counters().targets_culled, targets.len() - keep);
    targets.truncate(keep);
}
