use std::path::Path;

use rand::Rng;
use rand::seq::index::sample;

use crate::dnf::{Dnf, Lit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenConfig {
    pub num_vars: u32,
    pub num_clauses: usize,
    /// Literals per clause; `None` means every variable.
    pub clause_width: Option<usize>,
    /// Draw each clause width uniformly from `[2, clause_width]`.
    pub var_width: bool,
}

/// Random DNF: each clause uses distinct variables picked uniformly without
/// replacement, with a fair coin for every negation.
pub fn generate<R: Rng + ?Sized>(cfg: &GenConfig, rng: &mut R) -> Dnf {
    let n = cfg.num_vars as usize;
    let max_width = cfg.clause_width.unwrap_or(n).min(n);
    let mut dnf = Dnf::new();
    for _ in 0..cfg.num_clauses {
        let width = if cfg.var_width && max_width >= 2 {
            rng.random_range(2..=max_width)
        } else {
            max_width
        };
        let clause = sample(rng, n, width)
            .into_iter()
            .map(|i| Lit::new(i as i32 + 1, rng.random::<bool>()))
            .collect::<Vec<_>>();
        dnf.add_clause(clause);
    }
    dnf
}

pub fn dataset_file_name(samples: usize, cfg: &GenConfig) -> String {
    format!(
        "samples{}_literals{}_clauses{}_var_width{}.bin",
        samples,
        cfg.num_vars,
        cfg.num_clauses,
        u8::from(cfg.var_width)
    )
}

/// Universe size encoded as `literals<N>` in a dataset file name.
pub fn num_vars_from_path(path: &Path) -> Option<u32> {
    let name = path.file_name()?.to_str()?;
    let pos = name.find("literals")? + "literals".len();
    let digits = name[pos..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>();
    digits.parse().ok()
}
