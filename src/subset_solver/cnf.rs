//! A CNF-backed `SubsetSolver`: each constraint gets a fresh indicator
//! variable `v_i` and every one of its clauses is reified as
//! `v_i -> clause`, so assuming `v_i` true activates constraint `i` and
//! assuming it false turns it off without ever retracting a clause.

use std::collections::HashMap;

use varisat::{ExtendFormula, Lit, Solver};

use crate::error::SolverError;
use crate::input::Instance;
use crate::subset::Subset;
use crate::subset_solver::SubsetSolver;

pub struct CnfSubsetSolver<'a> {
    n: usize,
    solver: Solver<'a>,
    /// `constraints[i]` is the list of raw DIMACS clauses making up
    /// constraint `i` (more than one for a Group CNF group).
    constraints: Vec<Vec<Vec<i64>>>,
    /// Indicator variable for constraint `i` is `indicator_base + i + 1`.
    indicator_base: i64,
}

impl<'a> CnfSubsetSolver<'a> {
    pub fn new(instance: &Instance) -> Self {
        let mut max_var: i64 = 0;
        for clause in &instance.hard_clauses {
            for &lit in clause {
                max_var = max_var.max(lit.abs());
            }
        }
        for constraint in &instance.constraints {
            for clause in constraint {
                for &lit in clause {
                    max_var = max_var.max(lit.abs());
                }
            }
        }
        let indicator_base = max_var;

        let mut solver = Solver::new();
        for clause in &instance.hard_clauses {
            let lits: Vec<Lit> = clause.iter().map(|&l| Lit::from_dimacs(l as isize)).collect();
            solver.add_clause(&lits);
        }
        for (i, constraint) in instance.constraints.iter().enumerate() {
            let v = indicator_base + i as i64 + 1;
            for clause in constraint {
                let mut lits: Vec<Lit> = Vec::with_capacity(clause.len() + 1);
                lits.push(Lit::from_dimacs(-v as isize));
                lits.extend(clause.iter().map(|&l| Lit::from_dimacs(l as isize)));
                solver.add_clause(&lits);
            }
        }

        CnfSubsetSolver {
            n: instance.constraints.len(),
            solver,
            constraints: instance.constraints.clone(),
            indicator_base,
        }
    }

    fn indicator(&self, i: usize) -> Lit {
        Lit::from_dimacs(self.indicator_base + i as i64 + 1)
    }

    fn neg_indicator(&self, i: usize) -> Lit {
        Lit::from_dimacs(-(self.indicator_base + i as i64 + 1))
    }

    fn truth_map(model: &[Lit]) -> HashMap<i64, bool> {
        model
            .iter()
            .map(|l| {
                let d = l.to_dimacs() as i64;
                (d.abs(), d > 0)
            })
            .collect()
    }

    fn clause_satisfied(clause: &[i64], truth: &HashMap<i64, bool>) -> bool {
        clause.iter().any(|&lit| {
            let var = lit.abs();
            let want_true = lit > 0;
            truth.get(&var).copied() == Some(want_true)
        })
    }

    fn constraint_satisfied(&self, j: usize, truth: &HashMap<i64, bool>) -> bool {
        self.constraints[j]
            .iter()
            .all(|clause| Self::clause_satisfied(clause, truth))
    }
}

impl<'a> SubsetSolver for CnfSubsetSolver<'a> {
    fn n(&self) -> usize {
        self.n
    }

    fn check_subset(
        &mut self,
        s: &Subset,
        improve_seed: bool,
    ) -> Result<(bool, Subset), SolverError> {
        let assumptions: Vec<Lit> = s.iter().map(|i| self.indicator(i)).collect();
        self.solver.assume(&assumptions);
        let sat = self.solver.solve()?;

        if sat {
            if !improve_seed {
                return Ok((true, s.clone()));
            }
            let model = self.solver.model().expect("model present after SAT solve");
            let truth = Self::truth_map(&model);
            let mut extended = s.clone();
            for j in 0..self.n {
                if !extended.contains(j) && self.constraint_satisfied(j, &truth) {
                    extended.insert(j);
                }
            }
            Ok((true, extended))
        } else {
            if !improve_seed {
                return Ok((false, s.clone()));
            }
            let core = self.solver.failed_core().unwrap_or(&[]);
            let mut restricted = Subset::empty(self.n);
            for &lit in core {
                let d = lit.to_dimacs();
                if d > 0 {
                    let idx = d - 1 - self.indicator_base;
                    if idx >= 0 && (idx as usize) < self.n {
                        restricted.insert(idx as usize);
                    }
                }
            }
            Ok((false, restricted))
        }
    }

    fn grow(&mut self, s: &Subset) -> Result<Subset, SolverError> {
        let mut current = s.clone();
        for j in s.complement().iter() {
            let mut probe = current.clone();
            probe.insert(j);
            let (sat, _) = self.check_subset(&probe, false)?;
            if sat {
                current.insert(j);
            }
        }
        Ok(current)
    }

    fn shrink(&mut self, s: &Subset, hard: &Subset) -> Result<Subset, SolverError> {
        let mut current = s.clone();
        for i in s.iter() {
            if hard.contains(i) {
                continue;
            }
            let mut probe = current.clone();
            probe.remove(i);
            let (sat, _) = self.check_subset(&probe, false)?;
            if !sat {
                current = probe;
            }
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// n=3, C = {x, !x, y}: constraints 0 and 1 are jointly unsatisfiable.
    fn xnotxy_instance() -> Instance {
        Instance {
            constraints: vec![vec![vec![1]], vec![vec![-1]], vec![vec![2]]],
            hard_clauses: vec![],
        }
    }

    #[test]
    fn check_subset_detects_unsat_pair() {
        let instance = xnotxy_instance();
        let mut solver = CnfSubsetSolver::new(&instance);
        let s = Subset::from_indices(3, [0, 1]);
        let (sat, _) = solver.check_subset(&s, false).unwrap();
        assert!(!sat);
    }

    #[test]
    fn check_subset_improve_seed_extends_sat_witness() {
        let instance = xnotxy_instance();
        let mut solver = CnfSubsetSolver::new(&instance);
        let s = Subset::from_indices(3, [0]); // {x}; y is unconstrained so some model may also satisfy it
        let (sat, extended) = solver.check_subset(&s, true).unwrap();
        assert!(sat);
        assert!(s.is_subset_of(&extended));
    }

    #[test]
    fn shrink_finds_the_mus() {
        let instance = xnotxy_instance();
        let mut solver = CnfSubsetSolver::new(&instance);
        let s = Subset::from_indices(3, [0, 1, 2]);
        let mus = solver.shrink(&s, &Subset::empty(3)).unwrap();
        assert_eq!(mus, Subset::from_indices(3, [0, 1]));
        let (sat, _) = solver.check_subset(&mus, false).unwrap();
        assert!(!sat);
    }

    #[test]
    fn grow_finds_an_mss() {
        let instance = xnotxy_instance();
        let mut solver = CnfSubsetSolver::new(&instance);
        let s = Subset::from_indices(3, [0]);
        let mss = solver.grow(&s).unwrap();
        let (sat, _) = solver.check_subset(&mss, false).unwrap();
        assert!(sat);
        for j in mss.complement().iter() {
            let mut probe = mss.clone();
            probe.insert(j);
            let (sat, _) = solver.check_subset(&probe, false).unwrap();
            assert!(!sat, "mss {:?} was not maximal at {j}", mss);
        }
    }

    #[test]
    fn shrink_respects_hard_assumptions() {
        let instance = xnotxy_instance();
        let mut solver = CnfSubsetSolver::new(&instance);
        let s = Subset::from_indices(3, [0, 1, 2]);
        let hard = Subset::from_indices(3, [0]);
        let mus = solver.shrink(&s, &hard).unwrap();
        assert!(mus.contains(0));
    }
}
