use rand::Rng;

use super::{CountError, CountOptions, Estimate, prepare};
use crate::dnf::Dnf;
use crate::rng::run_rng;
use crate::sample::conditional_assignment;

/// Karp-Luby-Madras coverage estimator.
///
/// Each trial samples a clause by weight and a uniform assignment inside it,
/// then contributes `1 / coverage` where coverage is the number of live
/// clauses (anywhere in the formula) the assignment satisfies. An assignment
/// covered by `k` clauses is reached with probability proportional to `k`,
/// so the contributions average to `|union| / total_weight`. Independent of
/// clause order.
pub fn estimate_union_coverage(
    dnf: &Dnf,
    n: u32,
    opts: &CountOptions,
) -> Result<Estimate, CountError> {
    opts.validate()?;
    let mut rng = run_rng(opts.seed);
    estimate_union_coverage_with_rng(dnf, n, opts, &mut rng)
}

pub fn estimate_union_coverage_with_rng<R: Rng + ?Sized>(
    dnf: &Dnf,
    n: u32,
    opts: &CountOptions,
    rng: &mut R,
) -> Result<Estimate, CountError> {
    opts.validate()?;
    let m = opts.sample_count(dnf.len());
    let Some(prep) = prepare(dnf, n, m) else {
        return Ok(Estimate::zero(m));
    };

    let mut sum = 0.0f64;
    for _ in 0..m {
        let i = prep.sampler.sample(rng);
        let clause = &prep.analysis.clauses[i];
        // zero-weight draws still count against m
        if !clause.is_live() || prep.sampler.scaled_weight(i) == 0.0 {
            continue;
        }
        let a = conditional_assignment(clause, prep.analysis.num_vars, rng);
        let coverage = dnf
            .clauses
            .iter()
            .zip(&prep.analysis.clauses)
            .filter(|(lits, info)| info.is_live() && Dnf::eval_clause(lits, &a))
            .count();
        if coverage > 0 {
            sum += 1.0 / coverage as f64;
        }
    }

    Ok(Estimate {
        value: (sum / m as f64) * prep.sampler.total_weight(),
        samples: m,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dnf::Lit;

    #[test]
    fn identical_clauses_split_credit() {
        // every sample is covered by both copies
        let dnf = Dnf::from_clauses(vec![vec![Lit::pos(1)], vec![Lit::pos(1)]]);
        let est = estimate_union_coverage(&dnf, 3, &CountOptions::default().with_seed(9))
            .expect("estimate");
        assert!((est.value - 4.0).abs() < 1e-9, "got {}", est.value);
    }

    #[test]
    fn contradictory_clause_is_not_coverage() {
        let dnf = Dnf::from_clauses(vec![
            vec![Lit::pos(1)],
            vec![Lit::pos(1), Lit::pos(2), Lit::neg(2)],
        ]);
        let est = estimate_union_coverage(&dnf, 2, &CountOptions::default().with_seed(4))
            .expect("estimate");
        assert!((est.value - 2.0).abs() < 1e-9, "got {}", est.value);
    }

    #[test]
    fn invalid_params_fail_before_sampling() {
        let err = estimate_union_coverage(&Dnf::new(), 1, &CountOptions::new(-0.5, 0.1));
        assert_eq!(err, Err(CountError::InvalidEps(-0.5)));
    }
}
