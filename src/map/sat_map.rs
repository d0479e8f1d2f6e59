//! A CNF-backed `MapSolver`: one incremental varisat instance over exactly
//! the `n` constraint-selector variables.
//!
//! A Map Solver may be backed by a CDCL SAT solver for the general case, or
//! by a cardinality-constrained solver for SMUS mode. Rather than vendoring
//! a second cardinality-native backend, `block_above_size` is realized here
//! as a permanent Sinz sequential-counter at-most-k encoding over the same
//! instance (see DESIGN.md for the rationale).

use varisat::{ExtendFormula, Lit, Solver};

use crate::error::SolverError;
use crate::map::{Direction, MapSolver};
use crate::subset::Subset;

pub struct SatMapSolver<'a> {
    n: usize,
    solver: Solver<'a>,
    bias: Option<Direction>,
    next_var: usize,
}

impl<'a> SatMapSolver<'a> {
    /// `bias`: `Some(direction)` makes `next_seed` hand back an already
    /// extremal seed with `known_max = true` (`-m`/`--max`'s default
    /// "solver" maximisation); `None` returns the raw model (`--nomax` /
    /// `-m always` / `-m half`, which maximise explicitly in the
    /// Enumerator instead).
    pub fn new(n: usize, bias: Option<Direction>) -> Self {
        SatMapSolver {
            n,
            solver: Solver::new(),
            bias,
            next_var: n + 1,
        }
    }

    fn lit(i: usize) -> Lit {
        Lit::from_dimacs((i + 1) as isize)
    }

    fn neg(i: usize) -> Lit {
        Lit::from_dimacs(-((i + 1) as isize))
    }

    fn fresh_var(&mut self) -> usize {
        let v = self.next_var;
        self.next_var += 1;
        v
    }

    fn model_to_subset(&self, model: &[Lit]) -> Subset {
        let mut s = Subset::empty(self.n);
        for &l in model {
            let d = l.to_dimacs();
            if d > 0 {
                let idx = (d as usize) - 1;
                if idx < self.n {
                    s.insert(idx);
                }
            }
        }
        s
    }

    /// Sinz's sequential-counter at-most-`k` encoding over the `n`
    /// selector variables, added permanently (never retracted, matching
    /// the monotone `F_map` invariant).
    fn add_at_most_k(&mut self, k: usize) {
        if k >= self.n {
            return; // already implied
        }
        if k == 0 {
            for i in 0..self.n {
                self.solver.add_clause(&[Self::neg(i)]);
            }
            return;
        }

        let mut s = Vec::with_capacity(self.n);
        for _ in 0..self.n {
            let mut row = Vec::with_capacity(k);
            for _ in 0..k {
                row.push(self.fresh_var());
            }
            s.push(row);
        }
        let pos = |v: usize| Lit::from_dimacs(v as isize);
        let neg = |v: usize| Lit::from_dimacs(-(v as isize));

        self.solver.add_clause(&[Self::neg(0), pos(s[0][0])]);
        for j in 1..k {
            self.solver.add_clause(&[neg(s[0][j])]);
        }
        for i in 1..self.n {
            self.solver.add_clause(&[Self::neg(i), pos(s[i][0])]);
            self.solver.add_clause(&[neg(s[i - 1][0]), pos(s[i][0])]);
            for j in 1..k {
                self.solver
                    .add_clause(&[Self::neg(i), neg(s[i - 1][j - 1]), pos(s[i][j])]);
                self.solver.add_clause(&[neg(s[i - 1][j]), pos(s[i][j])]);
            }
            self.solver.add_clause(&[Self::neg(i), neg(s[i - 1][k - 1])]);
        }
    }
}

impl<'a> MapSolver for SatMapSolver<'a> {
    fn n(&self) -> usize {
        self.n
    }

    fn next_seed(&mut self) -> Result<Option<(Subset, bool)>, SolverError> {
        self.solver.assume(&[]);
        let sat = self.solver.solve()?;
        if !sat {
            return Ok(None);
        }
        let model = self.solver.model().expect("model present after SAT solve");
        let seed = self.model_to_subset(&model);
        match self.bias {
            Some(direction) => {
                let maximized = self.maximize_seed(&seed, direction)?;
                Ok(Some((maximized, true)))
            }
            None => Ok(Some((seed, false))),
        }
    }

    fn block_up(&mut self, u: &Subset) -> Result<(), SolverError> {
        let clause: Vec<Lit> = u.iter().map(Self::neg).collect();
        self.solver.add_clause(&clause);
        Ok(())
    }

    fn block_down(&mut self, m: &Subset) -> Result<(), SolverError> {
        let clause: Vec<Lit> = m.complement().iter().map(Self::lit).collect();
        self.solver.add_clause(&clause);
        Ok(())
    }

    fn block_above_size(&mut self, k: usize) -> Result<(), SolverError> {
        self.add_at_most_k(k);
        Ok(())
    }

    fn maximize_seed(&mut self, s: &Subset, direction: Direction) -> Result<Subset, SolverError> {
        let mut current = s.clone();
        let candidates: Vec<usize> = match direction {
            Direction::High => current.complement().iter().collect(),
            Direction::Low => current.iter().collect(),
        };

        for i in candidates {
            if direction == Direction::High && current.contains(i) {
                continue; // already pulled in by a previous witness
            }
            if direction == Direction::Low && !current.contains(i) {
                continue; // already dropped by a previous witness
            }

            let mut assumptions: Vec<Lit> = current.iter().map(Self::lit).collect();
            match direction {
                Direction::High => assumptions.push(Self::lit(i)),
                Direction::Low => assumptions.push(Self::neg(i)),
            }
            self.solver.assume(&assumptions);
            if self.solver.solve()? {
                let model = self.solver.model().expect("model present after SAT solve");
                current = self.model_to_subset(&model);
            }
        }
        self.solver.assume(&[]);
        Ok(current)
    }

    fn find_above(&mut self, s: &Subset) -> Result<Option<Subset>, SolverError> {
        let others: Vec<usize> = s.complement().iter().collect();
        if others.is_empty() {
            return Ok(None);
        }

        let activation = self.fresh_var();
        let mut clause: Vec<Lit> = Vec::with_capacity(others.len() + 1);
        clause.push(Lit::from_dimacs(-(activation as isize)));
        clause.extend(others.iter().map(|&j| Self::lit(j)));
        self.solver.add_clause(&clause);

        let mut assumptions: Vec<Lit> = s.iter().map(Self::lit).collect();
        assumptions.push(Lit::from_dimacs(activation as isize));
        self.solver.assume(&assumptions);
        let sat = self.solver.solve()?;
        self.solver.assume(&[]);
        if !sat {
            return Ok(None);
        }
        let model = self.solver.model().expect("model present after SAT solve");
        Ok(Some(self.model_to_subset(&model)))
    }
}
