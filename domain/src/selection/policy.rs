//! Selection policy: pick one candidate from a scored pool
//!
//! Pure apart from the injected random source, so callers (and tests)
//! decide how reproducible a draw is.

use super::candidate::{CandidatePool, ScoredCandidate};
use super::mode::SelectionMode;
use crate::core::error::DomainError;
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use std::cmp::Ordering;

/// Default softmax temperature
pub const DEFAULT_TEMPERATURE: f64 = 1.0;

/// Picks one candidate per request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionPolicy {
    temperature: f64,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl SelectionPolicy {
    pub fn new(temperature: f64) -> Result<Self, DomainError> {
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(DomainError::InvalidTemperature(temperature.to_string()));
        }
        Ok(Self { temperature })
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Select exactly one candidate from `pool` according to `mode`
    pub fn select<'a, R: Rng + ?Sized>(
        &self,
        pool: &'a CandidatePool,
        mode: SelectionMode,
        rng: &mut R,
    ) -> Result<&'a ScoredCandidate, DomainError> {
        pool.ensure_non_empty()?;
        let candidates = &pool.candidates;

        let index = match mode {
            SelectionMode::Random => rng.gen_range(0..candidates.len()),
            SelectionMode::Weighted => {
                let weights = self.softmax_weights(candidates);
                match WeightedIndex::new(&weights) {
                    Ok(dist) => dist.sample(rng),
                    // unreachable for finite scores; fall back to argmax
                    Err(_) => Self::highest_index(candidates),
                }
            }
            SelectionMode::Highest => Self::highest_index(candidates),
        };

        Ok(&candidates[index])
    }

    /// Softmax probabilities `exp(s_i / T) / Σ exp(s_j / T)`.
    ///
    /// The maximum score is subtracted before exponentiating, and every
    /// weight is floored at the smallest positive `f64` so no candidate ever
    /// drops to zero probability.
    pub fn softmax_weights(&self, candidates: &[ScoredCandidate]) -> Vec<f64> {
        let Some(max) = candidates.iter().map(|c| c.score).max() else {
            return Vec::new();
        };
        let raw: Vec<f64> = candidates
            .iter()
            .map(|c| {
                let shifted = (c.score - max) as f64 / self.temperature;
                shifted.exp().max(f64::MIN_POSITIVE)
            })
            .collect();
        let total: f64 = raw.iter().sum();
        raw.into_iter().map(|w| w / total).collect()
    }

    /// Index of the best candidate.
    ///
    /// Tie-break rule, in order:
    /// 1. higher aggregated score
    /// 2. more recently used pair (a pair that was never used sorts last)
    /// 3. lower model id
    /// 4. lower prompt id
    ///
    /// This is the only place the ordering is defined.
    pub fn highest_index(candidates: &[ScoredCandidate]) -> usize {
        let mut best = 0;
        for i in 1..candidates.len() {
            if Self::rank(&candidates[i], &candidates[best]) == Ordering::Less {
                best = i;
            }
        }
        best
    }

    /// `Less` means `a` ranks ahead of `b`
    fn rank(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
        b.score
            .cmp(&a.score)
            .then_with(|| match (a.last_used, b.last_used) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
            .then_with(|| a.candidate.sort_key().cmp(&b.candidate.sort_key()))
    }
}
