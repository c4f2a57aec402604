//! Substitution scores and gap costs for protein alignment
//!
//! Residues are plain ASCII letters. A `ScoreMatrix` maps every byte onto a
//! compact alphabet index (unknown residues fall back to `X`) and stores the
//! square score table over that alphabet, so the DP kernels only ever do one
//! table lookup per cell.

use bio::alignment::pairwise::MatchFunc;

/// BLOSUM62 alphabet in NCBI matrix order: ARNDCQEGHILKMFPSTWYVBJZX*
pub const BLOSUM62_ALPHABET: &[u8] = b"ARNDCQEGHILKMFPSTWYVBJZX*";

/// Residue used for bytes that are not part of the alphabet
pub const UNKNOWN_RESIDUE: u8 = b'X';

/// Default gap costs (BLOSUM62, 11/1)
pub const DEFAULT_GAP_OPEN: i32 = 11;
pub const DEFAULT_GAP_EXTEND: i32 = 1;
/// Default frame-shift penalty for translated alignment
pub const DEFAULT_FRAME_SHIFT: i32 = 15;

/// Square substitution table over a small residue alphabet
#[derive(Debug, Clone)]
pub struct ScoreMatrix {
    alphabet: Vec<u8>,
    /// byte -> alphabet index
    index: [u8; 256],
    /// alphabet.len() x alphabet.len(), row = first residue
    scores: Vec<i8>,
    max_score: i32,
    min_score: i32,
}

impl ScoreMatrix {
    /// Build a matrix over `alphabet` from any pairwise match function.
    ///
    /// Lower-case bytes are mapped to their upper-case residue. Bytes outside the
    /// alphabet map to `X` (or to the first residue when `X` is absent).
    pub fn new<F: MatchFunc>(alphabet: &[u8], match_fn: F) -> Self {
        assert!(
            !alphabet.is_empty() && alphabet.len() <= u8::MAX as usize,
            "alphabet must have between 1 and 255 residues"
        );
        let fallback = alphabet
            .iter()
            .position(|&c| c == UNKNOWN_RESIDUE)
            .unwrap_or(0) as u8;
        let mut index = [fallback; 256];
        for (k, &c) in alphabet.iter().enumerate() {
            index[c as usize] = k as u8;
            index[c.to_ascii_lowercase() as usize] = k as u8;
        }

        let n = alphabet.len();
        let mut scores = Vec::with_capacity(n * n);
        for &a in alphabet {
            for &b in alphabet {
                let s = match_fn.score(a, b);
                assert!(
                    (i8::MIN as i32..=i8::MAX as i32).contains(&s),
                    "substitution score {} for {}/{} does not fit in i8",
                    s,
                    a as char,
                    b as char
                );
                scores.push(s as i8);
            }
        }
        let max_score = scores.iter().copied().max().map_or(0, i32::from);
        let min_score = scores.iter().copied().min().map_or(0, i32::from);

        Self {
            alphabet: alphabet.to_vec(),
            index,
            scores,
            max_score,
            min_score,
        }
    }

    /// BLOSUM62 as shipped by rust-bio
    pub fn blosum62() -> Self {
        Self::new(BLOSUM62_ALPHABET, bio::scores::blosum62)
    }

    /// Alphabet index of a residue byte
    #[inline(always)]
    pub fn encode(&self, residue: u8) -> usize {
        self.index[residue as usize] as usize
    }

    #[inline(always)]
    pub fn score(&self, a: u8, b: u8) -> i32 {
        self.score_encoded(self.encode(a), self.encode(b))
    }

    #[inline(always)]
    pub fn score_encoded(&self, a: usize, b: usize) -> i32 {
        self.scores[a * self.alphabet.len() + b] as i32
    }

    pub fn alphabet(&self) -> &[u8] {
        &self.alphabet
    }

    pub fn alphabet_size(&self) -> usize {
        self.alphabet.len()
    }

    pub fn max_score(&self) -> i32 {
        self.max_score
    }

    pub fn min_score(&self) -> i32 {
        self.min_score
    }
}

/// Matrix plus affine gap and frame-shift costs.
///
/// Costs are positive numbers: a gap of length `l` costs `gap_open + l * gap_extend`.
#[derive(Debug, Clone)]
pub struct Scoring {
    pub matrix: ScoreMatrix,
    pub gap_open: i32,
    pub gap_extend: i32,
    pub frame_shift: i32,
}

impl Scoring {
    pub fn new(matrix: ScoreMatrix, gap_open: i32, gap_extend: i32) -> Self {
        assert!(
            gap_open >= 0 && gap_extend >= 0,
            "gap costs must be non-negative (open={}, extend={})",
            gap_open,
            gap_extend
        );
        Self {
            matrix,
            gap_open,
            gap_extend,
            frame_shift: DEFAULT_FRAME_SHIFT,
        }
    }

    pub fn with_frame_shift(mut self, frame_shift: i32) -> Self {
        assert!(frame_shift >= 0, "frame-shift penalty must be non-negative");
        self.frame_shift = frame_shift;
        self
    }

    /// Cost of opening a gap of length one
    #[inline(always)]
    pub fn gap_open_extend(&self) -> i32 {
        self.gap_open + self.gap_extend
    }

    /// Cost of a gap of `len` residues
    #[inline(always)]
    pub fn gap_cost(&self, len: i32) -> i32 {
        self.gap_open + len * self.gap_extend
    }
}

impl Default for Scoring {
    fn default() -> Self {
        Self::new(ScoreMatrix::blosum62(), DEFAULT_GAP_OPEN, DEFAULT_GAP_EXTEND)
    }
}

/// Per-residue rows of query substitution scores.
///
/// `row(r)[i]` is the score of query position `i` against residue index `r`.
/// This is the long score profile the diagonal scan and the lane kernels read.
#[derive(Debug, Clone)]
pub struct ScoreProfile {
    rows: Vec<Vec<i8>>,
    query_len: usize,
}

impl ScoreProfile {
    pub fn new(query: &[u8], matrix: &ScoreMatrix) -> Self {
        let encoded: Vec<usize> = query.iter().map(|&c| matrix.encode(c)).collect();
        let rows = (0..matrix.alphabet_size())
            .map(|r| {
                encoded
                    .iter()
                    .map(|&q| matrix.score_encoded(q, r) as i8)
                    .collect()
            })
            .collect();
        Self {
            rows,
            query_len: query.len(),
        }
    }

    #[inline(always)]
    pub fn row(&self, residue_index: usize) -> &[i8] {
        &self.rows[residue_index]
    }

    pub fn query_len(&self) -> usize {
        self.query_len
    }
}
