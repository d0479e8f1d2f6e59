//! The Seed Manager: a FIFO injection queue layered over
//! the Map's own `next_seed`, matching the reference tool's
//! `SeedManager`.

use std::collections::VecDeque;

use crate::error::SolverError;
use crate::map::MapSolver;
use crate::subset::Subset;

/// A candidate subset plus whether it is already known to be
/// maximal/minimal for the current aim.
#[derive(Debug, Clone)]
pub struct Seed {
    pub subset: Subset,
    pub known_max: bool,
}

pub struct SeedManager {
    queue: VecDeque<Seed>,
}

impl SeedManager {
    pub fn new() -> Self {
        SeedManager {
            queue: VecDeque::new(),
        }
    }

    /// Enqueue an externally hinted seed (MSS-guided exploration,
    /// §4.4 step 4).
    pub fn add_seed(&mut self, subset: Subset, known_max: bool) {
        self.queue.push_back(Seed { subset, known_max });
    }

    /// Pulls the next seed: the front of the injection queue if non-empty,
    /// otherwise the Map's own generator. Returns `None` exactly when both
    /// are exhausted.
    pub fn next(&mut self, map: &mut dyn MapSolver) -> Result<Option<Seed>, SolverError> {
        if let Some(seed) = self.queue.pop_front() {
            return Ok(Some(seed));
        }
        Ok(map.next_seed()?.map(|(subset, known_max)| Seed {
            subset,
            known_max,
        }))
    }
}

impl Default for SeedManager {
    fn default() -> Self {
        Self::new()
    }
}
