use super::culling::{CullingConfig, Target};
use crate::align::result::Hsp;

/// Minimum identity / coverage thresholds applied to single HSPs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HspThresholds {
    pub min_id: f64,
    pub query_cover: f64,
    pub subject_cover: f64,
}

impl From<&CullingConfig> for HspThresholds {
    fn from(config: &CullingConfig) -> Self {
        Self {
            min_id: config.min_id,
            query_cover: config.query_cover,
            subject_cover: config.subject_cover,
        }
    }
}

/// Check one HSP against the thresholds.
///
/// Identity needs a transcript; a score-only HSP fails any positive `min_id`.
pub fn passes(hsp: &Hsp, thresholds: &HspThresholds, query_len: usize, subject_len: usize) -> bool {
    (thresholds.min_id <= 0.0 || hsp.identity() >= thresholds.min_id)
        && (thresholds.query_cover <= 0.0 || hsp.query_coverage(query_len) >= thresholds.query_cover)
        && (thresholds.subject_cover <= 0.0
            || hsp.subject_coverage(subject_len) >= thresholds.subject_cover)
}

/// Apply the filters `score_only_culling` defers to, then the count limit.
///
/// HSPs failing identity or coverage are dropped, targets left without HSPs
/// are dropped, and with `no_self_hits` the target `self_subject` is removed.
/// The surviving list keeps its order and is cut to `max_alignments`.
pub fn apply_hit_filters<F>(
    targets: &mut Vec<Target>,
    config: &CullingConfig,
    query_len: usize,
    subject_len: F,
    self_subject: Option<usize>,
) where
    F: Fn(usize) -> usize,
{
    let thresholds = HspThresholds::from(config);
    let hsp_filters = thresholds.min_id > 0.0 || thresholds.query_cover > 0.0 || thresholds.subject_cover > 0.0;

    targets.retain_mut(|t| {
        if config.no_self_hits && Some(t.subject_idx) == self_subject {
            return false;
        }
        if hsp_filters {
            let slen = subject_len(t.subject_idx);
            t.hsps.retain(|h| passes(h, &thresholds, query_len, slen));
            return !t.hsps.is_empty();
        }
        true
    });
    targets.truncate(config.max_alignments);
}
