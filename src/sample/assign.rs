use rand::Rng;

use crate::dnf::{Assignment, ClauseInfo};

/// Uniform assignment over the satisfying set of `clause`: its variables are
/// forced to their literal values, every free variable gets a fair coin.
pub fn conditional_assignment<R: Rng + ?Sized>(
    clause: &ClauseInfo,
    num_vars: u32,
    rng: &mut R,
) -> Assignment {
    let mut a = Assignment::new(num_vars);
    for &v in &clause.free_vars {
        a.set(v, rng.random::<bool>());
    }
    for (&v, &value) in clause.vars.iter().zip(&clause.signs) {
        a.set(v, value);
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dnf::{Dnf, Lit, analyze_clause};
    use crate::rng::run_rng;

    #[test]
    fn always_satisfies_its_clause() {
        let clause = vec![Lit::pos(2), Lit::neg(5), Lit::pos(2), Lit::neg(7)];
        let info = analyze_clause(&clause, 8);
        let mut rng = run_rng(Some(1));
        for _ in 0..10_000 {
            let a = conditional_assignment(&info, 8, &mut rng);
            assert!(Dnf::eval_clause(&clause, &a));
        }
    }

    #[test]
    fn free_vars_are_uniform() {
        let info = analyze_clause(&[Lit::pos(1)], 3);
        let mut rng = run_rng(Some(2));
        let mut hist = [0usize; 4];
        let draws = 20_000usize;
        for _ in 0..draws {
            let a = conditional_assignment(&info, 3, &mut rng);
            assert!(a.get(1));
            let idx = usize::from(a.get(2)) | (usize::from(a.get(3)) << 1);
            hist[idx] += 1;
        }
        for h in hist {
            let freq = h as f64 / draws as f64;
            assert!((freq - 0.25).abs() < 0.02, "freq {freq}");
        }
    }
}
