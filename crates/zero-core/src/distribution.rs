//! Move distributions: search visit counts and raw policy priors.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// A probability distribution over moves.
///
/// Entries keep the order given by the agent. Probabilities are non-negative;
/// [`MoveDistribution::normalize`] rescales them to sum to one.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveDistribution<M> {
    entries: Vec<(M, f32)>,
}

impl<M> MoveDistribution<M> {
    /// Builds a distribution from `(move, weight)` pairs and normalizes it.
    ///
    /// Negative and non-finite weights are treated as zero.
    pub fn new(entries: Vec<(M, f32)>) -> Self {
        let mut dist = Self {
            entries: entries
                .into_iter()
                .map(|(mv, p)| (mv, if p.is_finite() && p > 0.0 { p } else { 0.0 }))
                .collect(),
        };
        dist.normalize();
        dist
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&M, f32)> {
        self.entries.iter().map(|(mv, p)| (mv, *p))
    }

    pub fn total(&self) -> f32 {
        self.entries.iter().map(|(_, p)| p).sum()
    }

    /// Rescales the entries to sum to one. A zero distribution is left as is.
    pub fn normalize(&mut self) {
        let total = self.total();
        if total > 0.0 {
            for (_, p) in &mut self.entries {
                *p /= total;
            }
        }
    }

    /// Zeroes every entry below `threshold` and renormalizes.
    ///
    /// Used before exporting a search distribution as a training target, to
    /// strip the probability mass spread by exploration noise. If no entry
    /// reaches `threshold`, the maximal entries are kept instead so the
    /// distribution never collapses to zero. A threshold of zero or less
    /// leaves the distribution untouched.
    pub fn sharpen(&mut self, threshold: f32) {
        if threshold <= 0.0 || self.entries.is_empty() {
            return;
        }
        let max = self
            .entries
            .iter()
            .map(|(_, p)| *p)
            .fold(0.0f32, f32::max);
        let cutoff = threshold.min(max);
        for (_, p) in &mut self.entries {
            if *p < cutoff {
                *p = 0.0;
            }
        }
        self.normalize();
    }

    /// The entry with the highest probability. Ties go to the first entry.
    pub fn best(&self) -> Option<&M> {
        let mut best: Option<&(M, f32)> = None;
        for entry in &self.entries {
            if best.map_or(true, |b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(mv, _)| mv)
    }

    /// Samples a move with the distribution raised to `1 / temperature`.
    ///
    /// A temperature of zero or less picks the best move. Returns `None` for
    /// an empty distribution or one without any probability mass.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, temperature: f32) -> Option<&M> {
        if self.total() <= 0.0 {
            return None;
        }
        if temperature <= 0.0 {
            return self.best();
        }
        let weights: Vec<f64> = self
            .entries
            .iter()
            .map(|(_, p)| f64::from(*p).powf(1.0 / f64::from(temperature)))
            .collect();
        match WeightedIndex::new(&weights) {
            Ok(index) => Some(&self.entries[index.sample(rng)].0),
            // weights underflowed at a tiny temperature
            Err(_) => self.best(),
        }
    }

    /// Maps every move, keeping probabilities.
    pub fn map_moves<T, F: FnMut(&M) -> T>(&self, mut f: F) -> Vec<(T, f32)> {
        self.entries.iter().map(|(mv, p)| (f(mv), *p)).collect()
    }
}

impl<M> FromIterator<(M, f32)> for MoveDistribution<M> {
    fn from_iter<I: IntoIterator<Item = (M, f32)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
