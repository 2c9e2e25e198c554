use log::debug;

use crate::dnf::Dnf;

/// Exact number of assignments over `dnf.universe(n)` variables that satisfy
/// at least one clause, by enumerating every bit pattern.
///
/// Runs in `O(2^n * |dnf|)`; the caller decides what `n` is practical.
pub fn exact_count(dnf: &Dnf, n: u32) -> u128 {
    let num_vars = dnf.universe(n);
    if dnf.is_empty() {
        return 0;
    }
    debug!("exact count over {} vars, {} clauses", num_vars, dnf.len());

    let total = 1u128.checked_shl(num_vars).unwrap_or(u128::MAX);
    let mut count = 0u128;
    let mut mask = 0u128;
    while mask < total {
        let bit = |v: u32| mask.checked_shr(v - 1).is_some_and(|m| m & 1 == 1);
        if dnf
            .clauses
            .iter()
            .any(|clause| Dnf::eval_clause_with(clause, &bit))
        {
            count += 1;
        }
        mask += 1;
    }
    count
}
