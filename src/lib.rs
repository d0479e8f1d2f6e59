//! Enumerates minimal unsatisfiable subsets (MUSes) and maximal satisfying
//! subsets (MSSes, whose complements are MCSes) of an indexed constraint
//! set, using the MARCO lattice-navigation algorithm: a Map Solver walks
//! the power set of constraint indices, a Subset Solver decides and refines
//! each candidate, and a Hub Coordinator runs several differently-biased
//! Enumerators in parallel.

pub mod config;
pub mod enumerator;
pub mod error;
pub mod hub;
pub mod input;
pub mod map;
pub mod seed;
pub mod signals;
pub mod stats;
pub mod subset;
pub mod subset_solver;
