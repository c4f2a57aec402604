//! Unit tests for post/filter.rs

use banded_swipe::align::{banded_swipe, DpStat, DpTarget, Frame, SwipeFlags};
use banded_swipe::post::{apply_hit_filters, score_only_culling, CullingConfig, Target};
use banded_swipe::Scoring;

use crate::helpers::{mutate, random_protein, Lcg};

/// Hits of `query` against `subjects`, one target per subject, with transcripts
fn hit_list(query: &[u8], subjects: &[Vec<u8>]) -> Vec<Target> {
    let targets: Vec<DpTarget<'_>> = subjects
        .iter()
        .enumerate()
        .map(|(idx, s)| DpTarget::full(s, query.len(), idx))
        .collect();
    let hsps = banded_swipe(
        query,
        &targets,
        Frame::default(),
        None,
        SwipeFlags::TRACEBACK,
        0,
        &Scoring::default(),
        &DpStat::new(),
    );
    hsps.into_iter()
        .map(|h| Target::from_hsps(h.target_idx, vec![h]))
        .collect()
}

#[test]
fn test_deferred_culling_then_identity_filter() {
    let mut rng = Lcg::new(5);
    let query = random_protein(&mut rng, 80);
    let subjects = vec![
        query.clone(),
        mutate(&mut rng, &query, 2),
        mutate(&mut rng, &query, 3),
    ];
    let mut hits = hit_list(&query, &subjects);
    let config = CullingConfig {
        min_id: 95.0,
        max_alignments: 10,
        ..Default::default()
    };

    score_only_culling(&mut hits, &config);
    // deferred: nothing dropped yet
    assert_eq!(hits.len(), 3);

    apply_hit_filters(&mut hits, &config, query.len(), |i| subjects[i].len(), None);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].subject_idx, 0);
    assert_eq!(hits[0].hsps[0].identity(), 100.0);
}

#[test]
fn test_self_hit_removed_after_deferral() {
    let mut rng = Lcg::new(6);
    let query = random_protein(&mut rng, 50);
    let subjects = vec![mutate(&mut rng, &query, 4), query.clone(), mutate(&mut rng, &query, 3)];
    let mut hits = hit_list(&query, &subjects);
    let config = CullingConfig {
        no_self_hits: true,
        max_alignments: 1,
        ..Default::default()
    };
    score_only_culling(&mut hits, &config);
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].subject_idx, 1);

    apply_hit_filters(&mut hits, &config, query.len(), |i| subjects[i].len(), Some(1));
    assert_eq!(hits.len(), 1);
    assert_ne!(hits[0].subject_idx, 1);
}

#[test]
fn test_query_coverage_filter() {
    let mut rng = Lcg::new(8);
    let query = random_protein(&mut rng, 100);
    let subjects = vec![query[..30].to_vec(), query.clone()];
    let mut hits = hit_list(&query, &subjects);
    let config = CullingConfig {
        query_cover: 50.0,
        ..Default::default()
    };
    score_only_culling(&mut hits, &config);
    apply_hit_filters(&mut hits, &config, query.len(), |i| subjects[i].len(), None);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].subject_idx, 1);
    assert_eq!(hits[0].hsps[0].query_coverage(query.len()), 100.0);
}
