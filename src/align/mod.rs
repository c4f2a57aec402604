pub mod band;
pub mod diag_scan;
pub mod frame;
pub mod frameshift;
pub mod result;
pub mod score_buffer;
pub mod stat;
pub mod sw;
pub mod sw_banded;
pub mod swipe;
pub mod target;
pub mod traceback;

pub use band::{Band, DiagonalView};
pub use diag_scan::{diag_alignment, scan_diags};
pub use frame::{DiagonalSegment, Frame, Strand, TranslatedSequence};
pub use frameshift::{
    anchored_3frame_dp, banded_3frame_sw, banded_3frame_swipe, full_3frame_target, sw_3frame,
};
pub use result::{EditOp, Hsp};
pub use score_buffer::ScoreBuffer;
pub use stat::{DpCells, DpStat};
pub use sw::{global_alignment, needleman_wunsch, smith_waterman, DpMode};
pub use sw_banded::{banded_sw, banded_sw_target, score_range, smith_waterman_banded};
pub use swipe::{banded_swipe, swipe, BiasCorrection, BiasProvider, NoBias, SwipeFlags};
pub use target::DpTarget;
