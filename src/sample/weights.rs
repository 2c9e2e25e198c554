use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

use crate::dnf::Analysis;

/// Draws clause indices with probability proportional to clause weight.
///
/// Raw weights `2^free_i` overflow f64 for wide universes, so every weight is
/// divided by `2^max_free` before sampling. The draw proportions are unchanged
/// and the true total is kept as `scaled_total * 2^max_free`.
#[derive(Debug, Clone)]
pub struct ClauseSampler {
    dist: WeightedIndex<f64>,
    scaled: Vec<f64>,
    scaled_total: f64,
    scale_exp: u32,
}

impl ClauseSampler {
    /// `None` when the formula has zero total weight (or the weight leaves f64 range).
    pub fn new(analysis: &Analysis) -> Option<Self> {
        let scale_exp = analysis.max_free()?;
        let scaled = analysis
            .clauses
            .iter()
            .map(|c| match c.weight_exp() {
                Some(e) => scaled_weight(scale_exp - e),
                None => 0.0,
            })
            .collect::<Vec<_>>();
        let scaled_total = scaled.iter().sum::<f64>();
        if scaled_total == 0.0 {
            return None;
        }
        let sampler = Self {
            dist: WeightedIndex::new(&scaled).ok()?,
            scaled,
            scaled_total,
            scale_exp,
        };
        if !sampler.total_weight().is_finite() {
            return None;
        }
        Some(sampler)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.dist.sample(rng)
    }

    /// Scaled weight of clause `i`, in `[0, 1]`.
    pub fn scaled_weight(&self, i: usize) -> f64 {
        self.scaled.get(i).copied().unwrap_or(0.0)
    }

    /// Draw probability of clause `i`.
    pub fn probability(&self, i: usize) -> f64 {
        self.scaled_weight(i) / self.scaled_total
    }

    pub fn scale_exp(&self) -> u32 {
        self.scale_exp
    }

    /// Sum of the true clause weights, `scaled_total * 2^max_free`.
    pub fn total_weight(&self) -> f64 {
        match i32::try_from(self.scale_exp) {
            Ok(e) => self.scaled_total * 2f64.powi(e),
            Err(_) => f64::INFINITY,
        }
    }
}

/// `2^-shift`, flushing to 0 once it underflows.
fn scaled_weight(shift: u32) -> f64 {
    match i32::try_from(shift) {
        Ok(s) => 0.5f64.powi(s),
        Err(_) => 0.0,
    }
}
