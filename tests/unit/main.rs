//! Unit test infrastructure for banded-swipe
//!
//! Tests are organized by module:
//! - `align/` - DP storage, single-target and batched kernels, frame-shift DP
//! - `post/` - hit-list culling and filters
//! - `common/` - diagnostics and configuration

pub mod align;
pub mod common;
pub mod helpers;
