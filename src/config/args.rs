//! Command-line arguments for the alignment engine and hit-list culling

use anyhow::{bail, Result};
use clap::Args;

use crate::post::culling::CullingConfig;
use crate::utils::matrix::{
    ScoreMatrix, Scoring, DEFAULT_FRAME_SHIFT, DEFAULT_GAP_EXTEND, DEFAULT_GAP_OPEN,
};

/// Dynamic programming options
#[derive(Args, Debug, Clone)]
pub struct DpArgs {
    /// Gap open penalty
    #[arg(long, default_value_t = DEFAULT_GAP_OPEN)]
    pub gap_open: i32,
    /// Gap extension penalty
    #[arg(long, default_value_t = DEFAULT_GAP_EXTEND)]
    pub gap_extend: i32,
    /// Frame-shift penalty for translated alignments
    #[arg(long, default_value_t = DEFAULT_FRAME_SHIFT)]
    pub frame_shift: i32,
    /// Half-width of the diagonal band
    #[arg(long, default_value_t = 8)]
    pub band: usize,
    /// Extra diagonals added on each side of the band
    #[arg(long, default_value_t = 8)]
    pub padding: usize,
    /// Minimum raw score of a reported alignment
    #[arg(long, default_value_t = 0)]
    pub score_cutoff: i32,
    /// Compute full alignments instead of scores only
    #[arg(
        long,
        default_value_t = false,
        action = clap::ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub traceback: bool,
    /// Worker threads (0 = all cores)
    #[arg(short = 'n', long, default_value_t = 0)]
    pub num_threads: usize,
}

impl Default for DpArgs {
    fn default() -> Self {
        Self {
            gap_open: DEFAULT_GAP_OPEN,
            gap_extend: DEFAULT_GAP_EXTEND,
            frame_shift: DEFAULT_FRAME_SHIFT,
            band: 8,
            padding: 8,
            score_cutoff: 0,
            traceback: false,
            num_threads: 0,
        }
    }
}

impl DpArgs {
    pub fn validate(&self) -> Result<()> {
        if self.gap_open < 0 || self.gap_extend < 0 || self.frame_shift < 0 {
            bail!(
                "Penalties must be non-negative (gap open {}, gap extend {}, frame shift {})",
                self.gap_open,
                self.gap_extend,
                self.frame_shift
            );
        }
        if self.gap_open + self.gap_extend >= i8::MAX as i32 {
            bail!(
                "Gap open + extend must stay below {} to fit 8-bit lanes (got {})",
                i8::MAX,
                self.gap_open + self.gap_extend
            );
        }
        if self.frame_shift >= i16::MAX as i32 {
            bail!("Frame-shift penalty {} does not fit 16-bit lanes", self.frame_shift);
        }
        Ok(())
    }

    /// BLOSUM62 scoring with these penalties
    pub fn scoring(&self) -> Scoring {
        Scoring::new(ScoreMatrix::blosum62(), self.gap_open, self.gap_extend)
            .with_frame_shift(self.frame_shift)
    }
}

/// Hit-list policy options
#[derive(Args, Debug, Clone)]
pub struct CullingArgs {
    /// Report hits within this percentage of the best score
    #[arg(long = "top", default_value_t = 100.0)]
    pub toppercent: f64,
    /// Maximum number of target sequences per query
    #[arg(short = 'k', long, default_value_t = 25)]
    pub max_target_seqs: usize,
    /// Minimum percent identity
    #[arg(long = "id", default_value_t = 0.0)]
    pub min_id: f64,
    /// Minimum percent query coverage
    #[arg(long, default_value_t = 0.0)]
    pub query_cover: f64,
    /// Minimum percent subject coverage
    #[arg(long, default_value_t = 0.0)]
    pub subject_cover: f64,
    /// Suppress hits of a query against itself
    #[arg(long, default_value_t = false)]
    pub no_self_hits: bool,
}

impl Default for CullingArgs {
    fn default() -> Self {
        Self {
            toppercent: 100.0,
            max_target_seqs: 25,
            min_id: 0.0,
            query_cover: 0.0,
            subject_cover: 0.0,
            no_self_hits: false,
        }
    }
}

impl CullingArgs {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.toppercent) {
            bail!("--top must be within 0-100 (got {})", self.toppercent);
        }
        for (name, v) in [
            ("--id", self.min_id),
            ("--query-cover", self.query_cover),
            ("--subject-cover", self.subject_cover),
        ] {
            if !(0.0..=100.0).contains(&v) {
                bail!("{} must be within 0-100 (got {})", name, v);
            }
        }
        Ok(())
    }

    pub fn culling_config(&self) -> CullingConfig {
        CullingConfig {
            toppercent: self.toppercent,
            min_id: self.min_id,
            query_cover: self.query_cover,
            subject_cover: self.subject_cover,
            no_self_hits: self.no_self_hits,
            max_alignments: self.max_target_seqs,
        }
    }
}

impl From<&CullingArgs> for CullingConfig {
    fn from(args: &CullingArgs) -> Self {
        args.culling_config()
    }
}
