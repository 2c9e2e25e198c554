use indexmap::IndexMap;
use log::warn;

use super::dnf::{Dnf, Lit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseStatus {
    Live,
    /// Same variable with both signs.
    Contradictory,
    /// Non-empty, but every literal is malformed.
    Void,
    /// More distinct variables than the universe holds.
    Oversized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseInfo {
    pub status: ClauseStatus,
    /// Distinct variables, ascending.
    pub vars: Vec<u32>,
    /// `signs[k]` is the value `vars[k]` must take.
    pub signs: Vec<bool>,
    pub free_vars: Vec<u32>,
}

impl ClauseInfo {
    pub fn is_live(&self) -> bool {
        self.status == ClauseStatus::Live
    }

    /// log2 of the clause weight, `None` when the weight is 0.
    pub fn weight_exp(&self) -> Option<u32> {
        if self.is_live() {
            Some(self.free_vars.len() as u32)
        } else {
            None
        }
    }

    /// Clause weight `2^(n - |vars|)` as a float; `inf` once it leaves f64 range.
    pub fn weight(&self) -> f64 {
        match self.weight_exp() {
            Some(e) => 2f64.powi(i32::try_from(e).unwrap_or(i32::MAX)),
            None => 0.0,
        }
    }
}

pub fn analyze_clause(clause: &[Lit], n: u32) -> ClauseInfo {
    let mut seen = IndexMap::<u32, bool>::new();
    let mut status = ClauseStatus::Live;
    for &lit in clause {
        let Some(var) = lit.index() else {
            continue;
        };
        let want = lit.required_value();
        match seen.get(&var) {
            Some(&prev) if prev != want => {
                status = ClauseStatus::Contradictory;
                break;
            }
            Some(_) => {}
            None => {
                seen.insert(var, want);
            }
        }
    }

    if status == ClauseStatus::Live && seen.is_empty() && !clause.is_empty() {
        status = ClauseStatus::Void;
    }
    if status == ClauseStatus::Live && seen.len() as u64 > n as u64 {
        status = ClauseStatus::Oversized;
    }
    if status != ClauseStatus::Live {
        return ClauseInfo {
            status,
            vars: Vec::new(),
            signs: Vec::new(),
            free_vars: Vec::new(),
        };
    }

    seen.sort_keys();
    let (vars, signs): (Vec<u32>, Vec<bool>) = seen.into_iter().unzip();

    let mut in_clause = vec![false; n as usize + 1];
    for &v in &vars {
        if let Some(slot) = in_clause.get_mut(v as usize) {
            *slot = true;
        }
    }
    let free_vars = (1..=n).filter(|&v| !in_clause[v as usize]).collect();

    ClauseInfo {
        status,
        vars,
        signs,
        free_vars,
    }
}

/// Per-clause metadata for one counting run over a fixed universe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub num_vars: u32,
    pub clauses: Vec<ClauseInfo>,
}

impl Analysis {
    pub fn new(dnf: &Dnf, num_vars: u32) -> Self {
        let clauses = dnf
            .clauses
            .iter()
            .map(|c| analyze_clause(c, num_vars))
            .collect::<Vec<_>>();
        let oversized = clauses
            .iter()
            .filter(|c| c.status == ClauseStatus::Oversized)
            .count();
        if oversized > 0 {
            warn!(
                "{} clause(s) reference more variables than the universe of {}",
                oversized, num_vars
            );
        }
        Self { num_vars, clauses }
    }

    pub fn live_count(&self) -> usize {
        self.clauses.iter().filter(|c| c.is_live()).count()
    }

    pub fn contradictory_count(&self) -> usize {
        self.clauses
            .iter()
            .filter(|c| c.status == ClauseStatus::Contradictory)
            .count()
    }

    /// Largest free-variable count over live clauses.
    pub fn max_free(&self) -> Option<u32> {
        self.clauses.iter().filter_map(|c| c.weight_exp()).max()
    }
}
