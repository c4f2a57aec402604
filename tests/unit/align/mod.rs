pub mod banded;
pub mod diag_scan;
pub mod frameshift;
pub mod score_buffer;
