mod args;

pub use args::{CullingArgs, DpArgs};

use anyhow::{Context, Result};

/// Worker pool for batched alignment; `0` threads means one per core
pub fn build_thread_pool(num_threads: usize) -> Result<rayon::ThreadPool> {
    let num_threads = if num_threads == 0 {
        num_cpus::get()
    } else {
        num_threads
    };
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .context("Failed to build thread pool")
}
