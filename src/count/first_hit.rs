use rand::Rng;

use super::{CountError, CountOptions, Estimate, prepare};
use crate::dnf::Dnf;
use crate::rng::run_rng;
use crate::sample::conditional_assignment;

/// Union-size estimate where each satisfying assignment is owned by the
/// earliest clause it satisfies. A trial on clause `i` is a hit when no clause
/// `j < i` also accepts the sampled assignment; the estimate is
/// `hits / m * total_weight`.
pub fn estimate_union_first_hit(
    dnf: &Dnf,
    n: u32,
    opts: &CountOptions,
) -> Result<Estimate, CountError> {
    opts.validate()?;
    let mut rng = run_rng(opts.seed);
    estimate_union_first_hit_with_rng(dnf, n, opts, &mut rng)
}

pub fn estimate_union_first_hit_with_rng<R: Rng + ?Sized>(
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

    let mut hits = 0usize;
    for _ in 0..m {
        let i = prep.sampler.sample(rng);
        let clause = &prep.analysis.clauses[i];
        if !clause.is_live() {
            continue;
        }
        let a = conditional_assignment(clause, prep.analysis.num_vars, rng);
        let owned_earlier = dnf.clauses[..i]
            .iter()
            .any(|prior| Dnf::eval_clause(prior, &a));
        if !owned_earlier {
            hits += 1;
        }
    }

    Ok(Estimate {
        value: (hits as f64 / m as f64) * prep.sampler.total_weight(),
        samples: m,
    })
}
