use dnfcount::count::{
    CountError, CountOptions, estimate_union_coverage, estimate_union_first_hit, exact_count,
};
use dnfcount::dnf::{Dnf, Lit};
use dnfcount::generator::{GenConfig, generate};
use dnfcount::rng::run_rng;
use proptest::prelude::*;

type Estimator = fn(&Dnf, u32, &CountOptions) -> Result<dnfcount::count::Estimate, CountError>;

const ESTIMATORS: [(&str, Estimator); 2] = [
    ("first-hit", estimate_union_first_hit),
    ("coverage", estimate_union_coverage),
];

#[test]
fn unit_clause_converges() {
    let dnf = Dnf::from_clauses(vec![vec![Lit::pos(1)]]);
    for (name, f) in ESTIMATORS {
        let est = f(&dnf, 3, &CountOptions::default().with_seed(1)).expect("estimate");
        assert!((est.value - 4.0).abs() <= 0.4, "{name}: {}", est.value);
    }
}

#[test]
fn tautology_is_four() {
    let dnf = Dnf::from_clauses(vec![vec![Lit::pos(1)], vec![Lit::neg(1)]]);
    for (name, f) in ESTIMATORS {
        let est = f(&dnf, 2, &CountOptions::default().with_seed(2)).expect("estimate");
        assert!((est.value - 4.0).abs() < 1e-9, "{name}: {}", est.value);
        assert_eq!(est.samples, CountOptions::default().sample_count(2));
    }
}

#[test]
fn contradictory_clause_contributes_nothing() {
    let dnf = Dnf::from_clauses(vec![vec![Lit::pos(1), Lit::neg(1)]]);
    for (name, f) in ESTIMATORS {
        let est = f(&dnf, 3, &CountOptions::default()).expect("estimate");
        assert_eq!(est.value, 0.0, "{name}");
    }
}

#[test]
fn empty_formula_is_zero() {
    for n in [0, 1, 20, 200] {
        for (name, f) in ESTIMATORS {
            let est = f(&Dnf::new(), n, &CountOptions::default()).expect("estimate");
            assert_eq!(est.value, 0.0, "{name}");
            assert_eq!(est.samples, 0, "{name}");
        }
    }
}

#[test]
fn invalid_parameters_are_rejected() {
    let dnf = Dnf::from_clauses(vec![vec![Lit::pos(1)]]);
    for (_, f) in ESTIMATORS {
        assert_eq!(
            f(&dnf, 1, &CountOptions::new(0.0, 0.1)),
            Err(CountError::InvalidEps(0.0))
        );
        assert_eq!(
            f(&dnf, 1, &CountOptions::new(0.1, 0.0)),
            Err(CountError::InvalidDelta(0.0))
        );
        assert_eq!(
            f(&dnf, 1, &CountOptions::new(0.1, 1.0)),
            Err(CountError::InvalidDelta(1.0))
        );
    }
}

#[test]
fn random_formulas_within_eps() {
    let opts = CountOptions::default();
    let mut gen_rng = run_rng(Some(2024));
    let mut runs = 0usize;
    let mut within = [0usize; 2];
    for case in 0..12u64 {
        let cfg = GenConfig {
            num_vars: 10,
            num_clauses: 8,
            clause_width: Some(5),
            var_width: true,
        };
        let dnf = generate(&cfg, &mut gen_rng);
        let exact = exact_count(&dnf, cfg.num_vars) as f64;
        assert!(exact > 0.0);
        for rep in 0..3u64 {
            runs += 1;
            let seeded = opts.with_seed(case * 100 + rep);
            for (k, (_, f)) in ESTIMATORS.iter().enumerate() {
                let est = f(&dnf, cfg.num_vars, &seeded).expect("estimate");
                if ((est.value - exact) / exact).abs() <= opts.eps {
                    within[k] += 1;
                }
            }
        }
    }
    // (eps, delta) guarantee: at least 1 - delta of runs land within eps
    for (k, (name, _)) in ESTIMATORS.iter().enumerate() {
        let rate = within[k] as f64 / runs as f64;
        assert!(rate >= 1.0 - opts.delta, "{name}: {}/{}", within[k], runs);
    }
}

#[test]
fn averages_converge_on_overlapping_formula() {
    // heavy overlap: x1 | x1 x2 | x1 x2 x3 | !x4 over 5 vars
    let dnf = Dnf::from_clauses(vec![
        vec![Lit::pos(1)],
        vec![Lit::pos(1), Lit::pos(2)],
        vec![Lit::pos(1), Lit::pos(2), Lit::pos(3)],
        vec![Lit::neg(4)],
    ]);
    let exact = exact_count(&dnf, 5) as f64;
    assert_eq!(exact, 24.0);
    for (name, f) in ESTIMATORS {
        let runs = 10u64;
        let mean = (0..runs)
            .map(|s| {
                f(&dnf, 5, &CountOptions::default().with_seed(s))
                    .expect("estimate")
                    .value
            })
            .sum::<f64>()
            / runs as f64;
        assert!(((mean - exact) / exact).abs() < 0.03, "{name}: mean {mean}");
    }
}

#[test]
fn wide_universe_does_not_overflow() {
    // x1 | x2 over 1000 vars: 3 * 2^998
    let dnf = Dnf::from_clauses(vec![vec![Lit::pos(1)], vec![Lit::pos(2)]]);
    let expected = 3.0 * 2f64.powi(998);
    for (name, f) in ESTIMATORS {
        let est = f(&dnf, 1000, &CountOptions::default().with_seed(5)).expect("estimate");
        assert!(est.value.is_finite(), "{name}");
        assert!(((est.value - expected) / expected).abs() < 0.1, "{name}: {}", est.value);
    }
}

#[test]
fn first_hit_depends_only_on_clause_owner() {
    // second clause is contained in the first, so it never scores a hit
    let dnf = Dnf::from_clauses(vec![vec![Lit::pos(1)], vec![Lit::pos(1), Lit::pos(2)]]);
    let est = estimate_union_first_hit(&dnf, 2, &CountOptions::default().with_seed(6))
        .expect("estimate");
    assert!((est.value - 2.0).abs() <= 0.2, "{}", est.value);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn all_contradictory_is_zero(vars in prop::collection::vec(1i32..8, 1..5), n in 1u32..10) {
        let clauses = vars
            .iter()
            .map(|&v| vec![Lit::pos(v), Lit::neg(v)])
            .collect::<Vec<_>>();
        let dnf = Dnf::from_clauses(clauses);
        for (_, f) in ESTIMATORS {
            let est = f(&dnf, n, &CountOptions::new(0.5, 0.5)).expect("estimate");
            prop_assert_eq!(est.value, 0.0);
        }
    }
}
