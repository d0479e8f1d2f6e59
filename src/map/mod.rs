//! The Map Solver abstract contract: an oracle over the
//! power-set lattice of constraint indices.

pub mod sat_map;

use crate::error::SolverError;
use crate::subset::Subset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    High,
    Low,
}

impl Direction {
    pub fn from_aim_high(aim_high: bool) -> Self {
        if aim_high { Direction::High } else { Direction::Low }
    }
}

/// Oracle over `F_map`, the implicit Boolean formula whose satisfying
/// assignments are exactly the unexplored subsets.
pub trait MapSolver {
    /// Number of constraints.
    fn n(&self) -> usize;

    /// Some unexplored subset, or `None` when `F_map` is UNSAT (enumeration
    /// complete). The bool is `true` iff this implementation was configured
    /// to hand back an already maximal/minimal seed directly.
    fn next_seed(&mut self) -> Result<Option<(Subset, bool)>, SolverError>;

    /// Removes all supersets of `U` from the unexplored region.
    fn block_up(&mut self, u: &Subset) -> Result<(), SolverError>;

    /// Removes all subsets of `M` from the unexplored region.
    fn block_down(&mut self, m: &Subset) -> Result<(), SolverError>;

    /// SMUS mode only: restricts the unexplored region to `|S| <= k`.
    fn block_above_size(&mut self, k: usize) -> Result<(), SolverError>;

    /// Returns `S'` maximal (`direction = High`) or minimal (`direction =
    /// Low`) within the unexplored region, with `S ⊆ S'` / `S' ⊆ S`
    /// respectively. `S'` remains unexplored.
    fn maximize_seed(&mut self, s: &Subset, direction: Direction) -> Result<Subset, SolverError>;

    /// Some unexplored strict superset of `S`, or `None`.
    fn find_above(&mut self, s: &Subset) -> Result<Option<Subset>, SolverError>;
}
