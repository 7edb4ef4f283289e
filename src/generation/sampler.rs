//! # Sampler
//!
//! Uniform random choice, optionally filtered by a predicate.

use crate::{WarrenError, WarrenResult};
use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;

/// Seeded source of every random decision made during generation.
///
/// Two samplers built from the same seed make the same choices when asked the
/// same questions in the same order.
///
/// # Examples
///
/// ```
/// use warren::Sampler;
///
/// let mut first = Sampler::seeded(7);
/// let mut second = Sampler::seeded(7);
/// let items = [10, 20, 30, 40];
/// assert_eq!(first.pick(&items).unwrap(), second.pick(&items).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Sampler {
    seed: u64,
    rng: StdRng,
}

impl Sampler {
    /// Creates a sampler with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a sampler from a fresh random seed.
    ///
    /// The chosen seed is still available through [`Sampler::seed`] so the run
    /// can be replayed.
    pub fn from_entropy() -> Self {
        Self::seeded(rand::random())
    }

    /// Seed this sampler was last seeded with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restarts the random stream from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::seeded(seed);
    }

    /// Picks one element uniformly.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> WarrenResult<&'a T> {
        if items.is_empty() {
            return Err(WarrenError::EmptySequence);
        }
        Ok(&items[self.rng.gen_range(0..items.len())])
    }

    /// Picks one element uniformly among those satisfying `predicate`.
    pub fn pick_where<'a, T, F>(&mut self, items: &'a [T], mut predicate: F) -> WarrenResult<&'a T>
    where
        F: FnMut(&T) -> bool,
    {
        let matches: Vec<&'a T> = items.iter().filter(|item| predicate(item)).collect();
        if matches.is_empty() {
            return Err(WarrenError::NoMatch);
        }
        Ok(matches[self.rng.gen_range(0..matches.len())])
    }

    /// Picks one element uniformly from any finite iterator.
    pub fn pick_from<I>(&mut self, items: I) -> WarrenResult<I::Item>
    where
        I: IntoIterator,
    {
        let mut items: Vec<I::Item> = items.into_iter().collect();
        if items.is_empty() {
            return Err(WarrenError::EmptySequence);
        }
        let index = self.rng.gen_range(0..items.len());
        Ok(items.swap_remove(index))
    }

    /// Picks one element with probability proportional to `weight`.
    ///
    /// Elements of weight zero are never picked.
    pub fn pick_weighted<'a, T, F>(&mut self, items: &'a [T], weight: F) -> WarrenResult<&'a T>
    where
        F: FnMut(&T) -> usize,
    {
        let index = WeightedIndex::new(items.iter().map(weight))
            .map_err(|error| match error {
                WeightedError::NoItem => WarrenError::EmptySequence,
                _ => WarrenError::NoMatch,
            })?;
        Ok(&items[index.sample(&mut self.rng)])
    }

    /// Draws an integer uniformly from an inclusive range.
    pub fn range(&mut self, range: RangeInclusive<usize>) -> usize {
        self.rng.gen_range(range)
    }
}
