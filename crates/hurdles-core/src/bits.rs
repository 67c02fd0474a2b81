use crate::constants::{BIT_STRING_PREFIX, MAX_INTEGER_BITS};
use crate::error::GeneticError;
use crate::rng::UniformSource;
use std::fmt;
use std::ops::{Bound, RangeBounds};
use std::str::FromStr;

/// Ordered bit sequence, most significant bit first.
///
/// Width is part of the value: `0b0110` and `0b110` hold the same integer but
/// are different genomes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BitGenome {
    bits: Vec<bool>,
}

impl BitGenome {
    /// Minimal-width encoding of `value`. Zero encodes as a single `0` bit.
    pub fn from_int(value: u64) -> Self {
        let width = (u64::BITS - value.leading_zeros()).max(1) as usize;
        let bits = (0..width)
            .rev()
            .map(|shift| (value >> shift) & 1 == 1)
            .collect();
        Self { bits }
    }

    /// Build from raw 0/1 values. Any other value rejects the whole input.
    pub fn from_bits(bits: &[u8]) -> Result<Self, GeneticError> {
        let invalid = || GeneticError::InvalidLiteral {
            literal: format!("{bits:?}"),
        };
        let bits = bits
            .iter()
            .map(|&b| bit_value(b).ok_or_else(invalid))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { bits })
    }

    pub fn from_bools(bits: impl IntoIterator<Item = bool>) -> Self {
        Self {
            bits: bits.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Unsigned value of the sequence. Leading zeros do not count towards
    /// the 64-bit limit; an empty genome is 0.
    pub fn to_int(&self) -> Result<u64, GeneticError> {
        let significant = match self.bits.iter().position(|&b| b) {
            Some(first_one) => &self.bits[first_one..],
            None => return Ok(0),
        };
        if significant.len() > MAX_INTEGER_BITS {
            return Err(GeneticError::LiteralTooWide {
                bits: significant.len(),
            });
        }
        Ok(significant
            .iter()
            .fold(0u64, |acc, &b| (acc << 1) | u64::from(b)))
    }

    /// New genome over the half-open range, clamped like sequence slicing.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Self {
        let (start, end) = self.clamp_range(range);
        Self {
            bits: self.bits[start..end].to_vec(),
        }
    }

    /// Set every bit in the (clamped) range to `value`.
    pub fn set_range(
        &mut self,
        range: impl RangeBounds<usize>,
        value: u8,
    ) -> Result<(), GeneticError> {
        let bit = bit_value(value).ok_or_else(|| GeneticError::InvalidLiteral {
            literal: value.to_string(),
        })?;
        let (start, end) = self.clamp_range(range);
        self.bits[start..end].fill(bit);
        Ok(())
    }

    pub fn flip(&mut self, index: usize) -> Result<(), GeneticError> {
        let len = self.bits.len();
        let bit = self
            .bits
            .get_mut(index)
            .ok_or(GeneticError::BitIndexOutOfRange { index, len })?;
        *bit = !*bit;
        Ok(())
    }

    /// Flip the bit at `floor(uniform * len)`. Returns the flipped index, or
    /// `None` for an empty genome.
    pub fn flip_random<S: UniformSource + ?Sized>(&mut self, source: &mut S) -> Option<usize> {
        if self.bits.is_empty() {
            return None;
        }
        let index = source.index_below(self.bits.len());
        self.bits[index] = !self.bits[index];
        Some(index)
    }

    pub fn append(&mut self, other: &BitGenome) {
        self.bits.extend_from_slice(&other.bits);
    }

    /// Append raw 0/1 values. Nothing is appended if any value is invalid.
    pub fn append_bits(&mut self, bits: &[u8]) -> Result<(), GeneticError> {
        let tail = Self::from_bits(bits)?;
        self.append(&tail);
        Ok(())
    }

    /// Positions that differ, plus the length difference.
    pub fn hamming_distance(&self, other: &BitGenome) -> usize {
        let differing = self
            .bits
            .iter()
            .zip(&other.bits)
            .filter(|(a, b)| a != b)
            .count();
        differing + self.bits.len().abs_diff(other.bits.len())
    }

    fn clamp_range(&self, range: impl RangeBounds<usize>) -> (usize, usize) {
        let len = self.bits.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(len);
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        }
        .min(len);
        (start, end.max(start))
    }
}

fn bit_value(value: u8) -> Option<bool> {
    match value {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    }
}

impl fmt::Display for BitGenome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(BIT_STRING_PREFIX)?;
        for &b in &self.bits {
            f.write_str(if b { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for BitGenome {
    type Err = GeneticError;

    /// Parse the canonical `0b...` form, keeping leading zeros.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GeneticError::InvalidLiteral {
            literal: s.to_string(),
        };
        let digits = s.strip_prefix(BIT_STRING_PREFIX).ok_or_else(invalid)?;
        let bits = digits
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(invalid()),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { bits })
    }
}
