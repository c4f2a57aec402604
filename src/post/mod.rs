pub mod culling;
pub mod filter;

pub use culling::{score_only_culling, CullingConfig, Target};
pub use filter::apply_hit_filters;
