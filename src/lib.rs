//! Banded dynamic-programming alignment core of a protein search tool
//!
//! - `align`: score storage, full and banded Smith-Waterman, batched SWIPE
//!   kernels over saturating score lanes, frame-shift aware translated
//!   alignment, ungapped diagonal scans
//! - `post`: culling of per-query hit lists
//! - `config`: clap argument groups and thread-pool setup
//! - `diagnostics`: env-gated counters (`BANDED_SWIPE_DIAGNOSTICS=1`)

pub mod align;
pub mod config;
pub mod diagnostics;
pub mod post;
pub mod utils;

pub use align::{DpStat, DpTarget, Hsp};
pub use utils::matrix::{ScoreMatrix, Scoring};
