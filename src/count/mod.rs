pub mod coverage;
pub mod exact;
pub mod first_hit;

use log::{debug, warn};
use thiserror::Error;

use crate::dnf::{Analysis, Dnf};
use crate::sample::ClauseSampler;

pub use coverage::{estimate_union_coverage, estimate_union_coverage_with_rng};
pub use exact::exact_count;
pub use first_hit::{estimate_union_first_hit, estimate_union_first_hit_with_rng};

pub const DEFAULT_EPS: f64 = 0.1;
pub const DEFAULT_DELTA: f64 = 0.1;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum CountError {
    #[error("eps must be > 0, got {0}")]
    InvalidEps(f64),
    #[error("delta must be in (0,1), got {0}")]
    InvalidDelta(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountOptions {
    pub eps: f64,
    pub delta: f64,
    /// Fixed seed for the run's generator; `None` draws one from OS entropy.
    pub seed: Option<u64>,
}

impl Default for CountOptions {
    fn default() -> Self {
        Self {
            eps: DEFAULT_EPS,
            delta: DEFAULT_DELTA,
            seed: None,
        }
    }
}

impl CountOptions {
    pub fn new(eps: f64, delta: f64) -> Self {
        Self {
            eps,
            delta,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), CountError> {
        if !(self.eps > 0.0 && self.eps.is_finite()) {
            return Err(CountError::InvalidEps(self.eps));
        }
        if !(self.delta > 0.0 && self.delta < 1.0) {
            return Err(CountError::InvalidDelta(self.delta));
        }
        Ok(())
    }

    /// Trial count `ceil((3t / eps^2) * ln(2 / delta))` for `t` clauses.
    pub fn sample_count(&self, clauses: usize) -> usize {
        let m = (3.0 * clauses as f64 / (self.eps * self.eps)) * (2.0 / self.delta).ln();
        let m = m.ceil();
        if m.is_finite() && m > 0.0 {
            m as usize
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub value: f64,
    pub samples: usize,
}

impl Estimate {
    pub fn zero(samples: usize) -> Self {
        Self { value: 0.0, samples }
    }
}

/// Shared preprocessing for the sampling estimators: clause metadata over the
/// effective universe plus the weighted sampler. `None` means the formula
/// has no satisfying assignments to sample from.
pub(crate) struct Prepared {
    pub analysis: Analysis,
    pub sampler: ClauseSampler,
}

pub(crate) fn prepare(dnf: &Dnf, n: u32, samples: usize) -> Option<Prepared> {
    if dnf.is_empty() || samples == 0 {
        return None;
    }
    let num_vars = dnf.universe(n);
    let analysis = Analysis::new(dnf, num_vars);
    let Some(sampler) = ClauseSampler::new(&analysis) else {
        warn!(
            "formula with {} clause(s) has zero or non-finite total weight, counting 0",
            dnf.len()
        );
        return None;
    };
    debug!(
        "prepared: n={} clauses={} live={} m={} total_weight={:e}",
        num_vars,
        dnf.len(),
        analysis.live_count(),
        samples,
        sampler.total_weight()
    );
    Some(Prepared { analysis, sampler })
}
