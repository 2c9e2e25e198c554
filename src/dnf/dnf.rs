#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lit {
    pub var: i32,
    pub negated: bool,
}

impl Lit {
    pub fn new(var: i32, negated: bool) -> Self {
        Self { var, negated }
    }

    pub fn pos(var: i32) -> Self {
        Self::new(var, false)
    }

    pub fn neg(var: i32) -> Self {
        Self::new(var, true)
    }

    /// Variable index, or `None` for a malformed literal (`var <= 0`).
    pub fn index(self) -> Option<u32> {
        if self.var > 0 {
            Some(self.var as u32)
        } else {
            None
        }
    }

    /// Value the variable must take for this literal to hold.
    pub fn required_value(self) -> bool {
        !self.negated
    }
}

/// Boolean vector indexed `1..=n`; slot 0 is reserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    values: Vec<bool>,
}

impl Assignment {
    pub fn new(num_vars: u32) -> Self {
        Self {
            values: vec![false; num_vars as usize + 1],
        }
    }

    pub fn num_vars(&self) -> u32 {
        (self.values.len() - 1) as u32
    }

    pub fn get(&self, var: u32) -> bool {
        var != 0 && self.values.get(var as usize).copied().unwrap_or(false)
    }

    pub fn set(&mut self, var: u32, value: bool) {
        if var != 0 {
            if let Some(slot) = self.values.get_mut(var as usize) {
                *slot = value;
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dnf {
    pub clauses: Vec<Vec<Lit>>,
}

impl Dnf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_clauses(clauses: Vec<Vec<Lit>>) -> Self {
        Self { clauses }
    }

    pub fn add_clause(&mut self, clause: Vec<Lit>) {
        self.clauses.push(clause);
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Largest well-formed variable index referenced, 0 if none.
    pub fn max_var(&self) -> u32 {
        self.clauses
            .iter()
            .flatten()
            .filter_map(|lit| lit.index())
            .max()
            .unwrap_or(0)
    }

    /// Effective universe size: the requested `n`, grown to cover every referenced variable.
    pub fn universe(&self, n: u32) -> u32 {
        n.max(self.max_var())
    }

    pub fn eval_clause_with<F>(clause: &[Lit], value: F) -> bool
    where
        F: Fn(u32) -> bool,
    {
        let mut any_valid = false;
        for &lit in clause {
            let Some(var) = lit.index() else {
                continue;
            };
            any_valid = true;
            if value(var) != lit.required_value() {
                return false;
            }
        }
        // a clause made only of malformed literals never holds
        any_valid || clause.is_empty()
    }

    pub fn eval_clause(clause: &[Lit], assignment: &Assignment) -> bool {
        Self::eval_clause_with(clause, |v| assignment.get(v))
    }

    pub fn eval(&self, assignment: &Assignment) -> bool {
        self.clauses
            .iter()
            .any(|clause| Self::eval_clause(clause, assignment))
    }
}
