use crate::bits::BitGenome;
use crate::error::GeneticError;
use crate::rng::UniformSource;
use std::fmt;
use std::ops::RangeBounds;

/// N-bit genotype: a [`BitGenome`] literal plus the mutation rate it was
/// created with.
///
/// The rate is carried for provenance only. Mutation is driven by the
/// algorithm, never applied implicitly by the literal.
#[derive(Clone, Debug, PartialEq)]
pub struct Genotype {
    literal: BitGenome,
    mutation_rate: f64,
}

impl Genotype {
    pub fn new(literal: BitGenome, mutation_rate: f64) -> Result<Self, GeneticError> {
        if !(mutation_rate.is_finite() && (0.0..=1.0).contains(&mutation_rate)) {
            return Err(GeneticError::InvalidMutationRate {
                rate: mutation_rate,
            });
        }
        Ok(Self {
            literal,
            mutation_rate,
        })
    }

    pub fn from_int(value: u64, mutation_rate: f64) -> Result<Self, GeneticError> {
        Self::new(BitGenome::from_int(value), mutation_rate)
    }

    pub fn literal(&self) -> &BitGenome {
        &self.literal
    }

    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    pub fn len(&self) -> usize {
        self.literal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literal.is_empty()
    }

    pub fn to_int(&self) -> Result<u64, GeneticError> {
        self.literal.to_int()
    }

    /// Sub-genotype over `range`; keeps this genotype's mutation rate.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Self {
        Self {
            literal: self.literal.slice(range),
            mutation_rate: self.mutation_rate,
        }
    }

    /// Flip one uniformly chosen bit. Returns the flipped index.
    pub fn mutate<S: UniformSource + ?Sized>(&mut self, source: &mut S) -> Option<usize> {
        self.literal.flip_random(source)
    }

    pub fn append<T: IntoBits>(&mut self, other: T) -> Result<(), GeneticError> {
        let tail = other.into_bits()?;
        self.literal.append(&tail);
        Ok(())
    }

    /// Single-point crossover at `position`.
    ///
    /// Returns `(self[..p] + other[p..], other[..p] + self[p..])`. Each child
    /// inherits the mutation rate of the parent that supplied its prefix.
    pub fn crossover(
        &self,
        other: &Genotype,
        position: usize,
    ) -> Result<(Genotype, Genotype), GeneticError> {
        let max = self.len().min(other.len());
        if position > max {
            return Err(GeneticError::CrossoverOutOfRange { position, max });
        }
        let mut offspring_a = self.slice(..position);
        let mut offspring_b = other.slice(..position);
        offspring_a.append(&other.literal.slice(position..))?;
        offspring_b.append(&self.literal.slice(position..))?;
        Ok((offspring_a, offspring_b))
    }
}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Nbit literal={}; mutation_rate={}",
            self.literal, self.mutation_rate
        )
    }
}

/// Anything that normalizes into a run of bits for [`Genotype::append`].
pub trait IntoBits {
    fn into_bits(self) -> Result<BitGenome, GeneticError>;
}

impl IntoBits for BitGenome {
    fn into_bits(self) -> Result<BitGenome, GeneticError> {
        Ok(self)
    }
}

impl IntoBits for &BitGenome {
    fn into_bits(self) -> Result<BitGenome, GeneticError> {
        Ok(self.clone())
    }
}

impl IntoBits for &Genotype {
    fn into_bits(self) -> Result<BitGenome, GeneticError> {
        Ok(self.literal.clone())
    }
}

impl IntoBits for &[u8] {
    fn into_bits(self) -> Result<BitGenome, GeneticError> {
        BitGenome::from_bits(self)
    }
}

impl<const N: usize> IntoBits for &[u8; N] {
    fn into_bits(self) -> Result<BitGenome, GeneticError> {
        BitGenome::from_bits(self)
    }
}
