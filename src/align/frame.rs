//! Reading frames of translated nucleotide queries
//!
//! This module builds the three reading frames per strand of a nucleotide
//! query with the standard genetic code, and defines the coordinates the
//! frame-shift aware DP works in: nucleotide offsets on one strand, where the
//! codon starting at offset `c` belongs to frame `c % 3`.

use std::fmt;

use bio::alphabets::dna;

/// Standard genetic code, codons enumerated in TCAG order
const STANDARD_CODE: &[u8; 64] =
    b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

#[inline]
fn base_index(b: u8) -> Option<usize> {
    match b {
        b'T' | b't' | b'U' | b'u' => Some(0),
        b'C' | b'c' => Some(1),
        b'A' | b'a' => Some(2),
        b'G' | b'g' => Some(3),
        _ => None,
    }
}

/// Translate one codon; ambiguous bases give `X`
pub fn translate_codon(codon: &[u8]) -> u8 {
    debug_assert_eq!(codon.len(), 3);
    match (
        base_index(codon[0]),
        base_index(codon[1]),
        base_index(codon[2]),
    ) {
        (Some(a), Some(b), Some(c)) => STANDARD_CODE[a * 16 + b * 4 + c],
        _ => b'X',
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum Strand {
    #[default]
    Forward,
    Reverse,
}

impl Strand {
    pub fn index(self) -> usize {
        match self {
            Strand::Forward => 0,
            Strand::Reverse => 1,
        }
    }
}

/// Reading frame: strand plus offset 0..3 of the first codon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Frame {
    pub strand: Strand,
    pub offset: u8,
}

impl Frame {
    pub fn new(strand: Strand, offset: u8) -> Self {
        assert!(offset < 3, "frame offset {} out of range", offset);
        Self { strand, offset }
    }

    /// Frame of the codon starting at nucleotide `pos` of `strand`
    pub fn of_position(strand: Strand, pos: usize) -> Self {
        Self::new(strand, (pos % 3) as u8)
    }

    /// Signed BLAST frame number: 1..3 forward, -1..-3 reverse
    pub fn signed(self) -> i8 {
        let n = self.offset as i8 + 1;
        match self.strand {
            Strand::Forward => n,
            Strand::Reverse => -n,
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.signed())
    }
}

/// Nucleotide query with its six translated frames
#[derive(Debug, Clone)]
pub struct TranslatedSequence {
    /// Forward and reverse-complement nucleotides
    nucleotides: [Vec<u8>; 2],
    /// `frames[strand][offset]`
    frames: [[Vec<u8>; 3]; 2],
}

impl TranslatedSequence {
    pub fn new(dna_seq: &[u8]) -> Self {
        let forward = dna_seq.to_vec();
        let reverse = dna::revcomp(dna_seq);
        let frames = [translate_frames(&forward), translate_frames(&reverse)];
        Self {
            nucleotides: [forward, reverse],
            frames,
        }
    }

    /// Nucleotide length (same on both strands)
    pub fn len(&self) -> usize {
        self.nucleotides[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn nucleotides(&self, strand: Strand) -> &[u8] {
        &self.nucleotides[strand.index()]
    }

    pub fn frame(&self, frame: Frame) -> &[u8] {
        &self.frames[frame.strand.index()][frame.offset as usize]
    }

    /// Number of complete codons on `strand`, i.e. valid codon starts are `0..codon_starts()`
    pub fn codon_starts(&self) -> usize {
        self.len().saturating_sub(2)
    }

    /// Residue of the codon starting at nucleotide `pos`
    #[inline(always)]
    pub fn residue(&self, strand: Strand, pos: usize) -> u8 {
        self.frames[strand.index()][pos % 3][pos / 3]
    }

    /// Residue of the codon starting at `pos`, if the codon is complete
    #[inline]
    pub fn residue_checked(&self, strand: Strand, pos: i64) -> Option<u8> {
        if pos < 0 || pos as usize + 3 > self.len() {
            None
        } else {
            Some(self.residue(strand, pos as usize))
        }
    }
}

fn translate_frames(seq: &[u8]) -> [Vec<u8>; 3] {
    let frame = |offset: usize| -> Vec<u8> {
        if seq.len() < offset {
            return Vec::new();
        }
        seq[offset..].chunks_exact(3).map(translate_codon).collect()
    };
    [frame(0), frame(1), frame(2)]
}

/// Ungapped anchor between a translated query and a protein subject.
///
/// `i` is the nucleotide offset of the first anchored codon on `strand`, `j`
/// the first anchored subject position, `len` the anchor length in residues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagonalSegment {
    pub strand: Strand,
    pub i: usize,
    pub j: usize,
    pub len: usize,
}

impl DiagonalSegment {
    pub fn new(strand: Strand, i: usize, j: usize, len: usize) -> Self {
        Self { strand, i, j, len }
    }

    /// Nucleotide offset one past the last anchored codon
    pub fn query_end(&self) -> usize {
        self.i + 3 * self.len
    }

    pub fn subject_end(&self) -> usize {
        self.j + self.len
    }
}
