use std::ops::Range;

use super::frame::Frame;

/// Edit operation of an alignment transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditOp {
    /// Match (identical residues)
    Match,
    /// Mismatch (different residues)
    Mismatch,
    /// Insertion in query (gap in subject)
    Ins,
    /// Deletion from query (gap in query)
    Del,
    /// One extra nucleotide in the query before the next codon
    FrameShiftForward,
    /// One nucleotide missing from the query before the next codon
    FrameShiftReverse,
}

/// High-scoring pair: one local alignment between the query and a subject.
///
/// Coordinates are 0-based half-open. For translated queries `query_range` is
/// in nucleotides on the strand given by `frame`. When the HSP comes from a
/// score-only pass, both ranges are empty and sit at the alignment end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hsp {
    /// Raw alignment score
    pub score: i32,
    pub frame: Frame,
    pub query_range: Range<usize>,
    pub subject_range: Range<usize>,
    /// Candidate index of the job that produced this HSP
    pub target_idx: usize,
    /// Position of that job in the batch it was submitted with
    pub swipe_target: usize,
    /// Number of identical positions
    pub identities: usize,
    /// Number of mismatched positions
    pub mismatches: usize,
    /// Number of gap openings
    pub gap_openings: usize,
    /// Number of gap positions
    pub gaps: usize,
    /// Number of frame shifts
    pub frame_shifts: usize,
    /// Total alignment length (columns including gaps)
    pub length: usize,
    pub transcript: Option<Vec<EditOp>>,
}

impl Hsp {
    /// Score-only HSP ending after query position `q_end` and subject position `s_end`
    pub fn score_only(score: i32, q_end: usize, s_end: usize) -> Self {
        Self {
            score,
            frame: Frame::default(),
            query_range: q_end..q_end,
            subject_range: s_end..s_end,
            target_idx: 0,
            swipe_target: 0,
            identities: 0,
            mismatches: 0,
            gap_openings: 0,
            gaps: 0,
            frame_shifts: 0,
            length: 0,
            transcript: None,
        }
    }

    /// HSP with a transcript; statistics are derived from the edit script
    pub fn with_transcript(
        score: i32,
        query_range: Range<usize>,
        subject_range: Range<usize>,
        transcript: Vec<EditOp>,
    ) -> Self {
        let stats = EditStats::from_transcript(&transcript);
        Self {
            score,
            frame: Frame::default(),
            query_range,
            subject_range,
            target_idx: 0,
            swipe_target: 0,
            identities: stats.identities,
            mismatches: stats.mismatches,
            gap_openings: stats.gap_openings,
            gaps: stats.gaps,
            frame_shifts: stats.frame_shifts,
            length: stats.length,
            transcript: Some(transcript),
        }
    }

    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = frame;
        self
    }

    pub fn with_target(mut self, target_idx: usize, swipe_target: usize) -> Self {
        self.target_idx = target_idx;
        self.swipe_target = swipe_target;
        self
    }

    pub fn has_traceback(&self) -> bool {
        self.transcript.is_some()
    }

    /// Calculate percent identity
    pub fn identity(&self) -> f64 {
        if self.length == 0 {
            return 0.0;
        }
        100.0 * (self.identities as f64) / (self.length as f64)
    }

    /// Percent of the query covered by the alignment
    pub fn query_coverage(&self, query_len: usize) -> f64 {
        if query_len == 0 {
            return 0.0;
        }
        100.0 * self.query_range.len() as f64 / query_len as f64
    }

    /// Percent of the subject covered by the alignment
    pub fn subject_coverage(&self, subject_len: usize) -> f64 {
        if subject_len == 0 {
            return 0.0;
        }
        100.0 * self.subject_range.len() as f64 / subject_len as f64
    }

    /// Re-derive the score of the transcript under `scoring`.
    ///
    /// Only available for protein-vs-protein transcripts.
    pub fn rescore(
        &self,
        query: &[u8],
        subject: &[u8],
        scoring: &crate::utils::matrix::Scoring,
    ) -> Option<i32> {
        let transcript = self.transcript.as_ref()?;
        let mut i = self.query_range.start;
        let mut j = self.subject_range.start;
        let mut score = 0;
        let mut prev: Option<EditOp> = None;
        for &op in transcript {
            match op {
                EditOp::Match | EditOp::Mismatch => {
                    score += scoring.matrix.score(query[i], subject[j]);
                    i += 1;
                    j += 1;
                }
                EditOp::Ins => {
                    score -= if prev == Some(EditOp::Ins) {
                        scoring.gap_extend
                    } else {
                        scoring.gap_open_extend()
                    };
                    i += 1;
                }
                EditOp::Del => {
                    score -= if prev == Some(EditOp::Del) {
                        scoring.gap_extend
                    } else {
                        scoring.gap_open_extend()
                    };
                    j += 1;
                }
                EditOp::FrameShiftForward | EditOp::FrameShiftReverse => return None,
            }
            prev = Some(op);
        }
        Some(score)
    }
}

/// Statistics computed from edit script
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct EditStats {
    identities: usize,
    mismatches: usize,
    gap_openings: usize,
    gaps: usize,
    frame_shifts: usize,
    length: usize,
}

impl EditStats {
    fn from_transcript(transcript: &[EditOp]) -> Self {
        let mut stats = Self::default();
        let mut prev: Option<EditOp> = None;
        for &op in transcript {
            match op {
                EditOp::Match => stats.identities += 1,
                EditOp::Mismatch => stats.mismatches += 1,
                EditOp::Ins | EditOp::Del => {
                    if prev != Some(op) {
                        stats.gap_openings += 1;
                    }
                    stats.gaps += 1;
                }
                EditOp::FrameShiftForward | EditOp::FrameShiftReverse => {
                    stats.frame_shifts += 1;
                }
            }
            prev = Some(op);
        }
        stats.length = stats.identities + stats.mismatches + stats.gaps;
        stats
    }
}

/// Compact CIGAR-like rendering (`M`, `X`, `I`, `D`, `/`, `\`)
pub fn transcript_string(transcript: &[EditOp]) -> String {
    let mut out = String::new();
    let mut iter = transcript.iter().peekable();
    while let Some(&op) = iter.next() {
        let mut n = 1;
        while iter.peek() == Some(&&op) {
            iter.next();
            n += 1;
        }
        let c = match op {
            EditOp::Match => 'M',
            EditOp::Mismatch => 'X',
            EditOp::Ins => 'I',
            EditOp::Del => 'D',
            EditOp::FrameShiftForward => '/',
            EditOp::FrameShiftReverse => '\\',
        };
        out.push_str(&n.to_string());
        out.push(c);
    }
    out
}
