//! The Subset Solver abstract contract: an oracle over the underlying
//! decision theory, queried for satisfiability of arbitrary constraint
//! subsets and able to grow a satisfiable one or shrink an unsatisfiable
//! one to an extremal witness.

pub mod cnf;

use crate::error::SolverError;
use crate::subset::Subset;

pub trait SubsetSolver {
    /// Number of constraints.
    fn n(&self) -> usize;

    /// Decides satisfiability of `C↓S`. When `improve_seed` is set: on SAT,
    /// the returned subset is extended with any constraint the witness
    /// model happens to also satisfy; on UNSAT, it is restricted to the
    /// unsat core. With `improve_seed = false`, the returned subset equals
    /// `S`.
    fn check_subset(&mut self, s: &Subset, improve_seed: bool) -> Result<(bool, Subset), SolverError>;

    /// Given SAT `S`, grows it to some MSS by single-element probes.
    fn grow(&mut self, s: &Subset) -> Result<Subset, SolverError>;

    /// Given UNSAT `S`, shrinks it to some MUS by single-element deletion
    /// probes. Indices in `hard` are never removed.
    fn shrink(&mut self, s: &Subset, hard: &Subset) -> Result<Subset, SolverError>;

    fn complement(&self, s: &Subset) -> Subset {
        s.complement()
    }
}
