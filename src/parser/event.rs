//! Uniform event representation produced by the parser.

use super::payload::{Payload, Tracepoint};

/// One decoded trace line
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    /// Task name, kept for diagnostics only
    pub comm: String,

    /// Task pid, kept for diagnostics only
    pub pid: u64,

    /// CPU the record was emitted on
    pub cpu: u32,

    /// Seconds since an arbitrary trace epoch
    pub timestamp: f64,

    pub tracepoint: Tracepoint,

    /// Structured payload; `None` when decoding failed or the kind has none
    pub payload: Option<Payload>,
}

/// Arbitrary-width CPU bitmask as printed by the `ipi_raise` tracepoint.
///
/// Stored as little-endian 64-bit words so masks wider than 128 CPUs
/// survive intact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpuMask {
    words: Vec<u64>,
}

impl CpuMask {
    /// Parse a hex mask, with or without comma group separators
    ///
    /// Returns `None` for an empty mask or a non-hex digit.
    pub fn from_hex(text: &str) -> Option<Self> {
        let digits: Vec<u8> = text
            .bytes()
            .filter(|b| *b != b',')
            .map(|b| (b as char).to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()?;

        if digits.is_empty() {
            return None;
        }

        // Least significant nibble last in the text
        let mut words = Vec::with_capacity(digits.len().div_ceil(16));
        for chunk in digits.rchunks(16) {
            let word = chunk.iter().fold(0u64, |acc, d| (acc << 4) | u64::from(*d));
            words.push(word);
        }

        Some(Self { words })
    }

    pub fn from_bits(bits: u64) -> Self {
        Self { words: vec![bits] }
    }

    /// Iterate set bit positions, least significant first
    pub fn iter_set_bits(&self) -> impl Iterator<Item = u32> + '_ {
        self.words.iter().enumerate().flat_map(|(index, word)| {
            (0..64u32)
                .filter(move |bit| word & (1u64 << bit) != 0)
                .map(move |bit| index as u32 * 64 + bit)
        })
    }
}
