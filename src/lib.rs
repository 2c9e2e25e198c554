//! Exact and randomized counting of satisfying assignments of DNF formulas.
//!
//! [`count::exact_count`] enumerates every assignment and serves as ground
//! truth on small universes. [`count::estimate_union_first_hit`] and
//! [`count::estimate_union_coverage`] are `(eps, delta)` Monte Carlo
//! estimators of the union of the clause solution sets.

pub mod bench;
pub mod count;
pub mod dnf;
pub mod generator;
pub mod rng;
pub mod sample;
