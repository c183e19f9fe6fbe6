//! Discrete category sampling.

use dwlr_core::{
    error::{DwlrError, Result},
    station::StationStatus,
    trend::Trend,
};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Trend assignment during synthesis: 30% falling, 30% rising, 40% stable.
pub const TREND_WEIGHTS: [(Trend, f64); 3] = [
    (Trend::Falling, 0.3),
    (Trend::Rising, 0.3),
    (Trend::Stable, 0.4),
];

/// Operational status assignment: 85% active, 10% maintenance, 5% inactive.
pub const STATUS_WEIGHTS: [(StationStatus, f64); 3] = [
    (StationStatus::Active, 0.85),
    (StationStatus::Maintenance, 0.10),
    (StationStatus::Inactive, 0.05),
];

/// A finite set of categories, each drawn with a fixed probability.
#[derive(Debug, Clone)]
pub struct Categorical<T> {
    categories: Vec<T>,
    probabilities: Vec<f64>,
    index: WeightedIndex<f64>,
}

impl<T: Clone + PartialEq> Categorical<T> {
    /// Build a sampler from `(category, weight)` pairs.
    ///
    /// Weights are normalised by their sum, so they need not add up to one,
    /// but each must be finite and non-negative and at least one positive.
    pub fn new(weights: impl IntoIterator<Item = (T, f64)>) -> Result<Self> {
        let (categories, raw): (Vec<T>, Vec<f64>) = weights.into_iter().unzip();
        if let Some(bad) = raw.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(DwlrError::InvalidWeights(format!(
                "weight {bad} is not a finite non-negative number"
            )));
        }
        let index =
            WeightedIndex::new(&raw).map_err(|e| DwlrError::InvalidWeights(e.to_string()))?;
        let total: f64 = raw.iter().sum();
        let probabilities = raw.iter().map(|w| w / total).collect();
        Ok(Categorical {
            categories,
            probabilities,
            index,
        })
    }

    /// Normalised probability of drawing `category`; 0 for unknown categories.
    pub fn probability(&self, category: &T) -> f64 {
        self.categories
            .iter()
            .zip(&self.probabilities)
            .filter(|(c, _)| *c == category)
            .map(|(_, p)| p)
            .sum()
    }

    pub fn categories(&self) -> &[T] {
        &self.categories
    }
}

impl<T: Clone> Distribution<T> for Categorical<T> {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        self.categories[self.index.sample(rng)].clone()
    }
}

/// Sampler for synthetic station trends.
pub fn trend_sampler() -> Result<Categorical<Trend>> {
    Categorical::new(TREND_WEIGHTS)
}

/// Sampler for synthetic station statuses.
pub fn status_sampler() -> Result<Categorical<StationStatus>> {
    Categorical::new(STATUS_WEIGHTS)
}
