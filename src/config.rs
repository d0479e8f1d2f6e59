//! Run configuration (the CLI surface's translation into the Config/Seed data
//! model), mirroring the reference tool's `setup_config`.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    MUSes,
    MCSes,
}

impl Bias {
    /// Maximisation direction.
    pub fn aim_high(self) -> bool {
        matches!(self, Bias::MUSes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaximizeStrategy {
    /// `--nomax`: every seed goes straight to `grow`/`shrink`.
    None,
    /// `-m always`: maximise every seed before checking it.
    Always,
    /// `-m half`: maximise only when the seed came back on the "wrong" side
    /// of the bias.
    Half,
    /// Default / `-M`/`--smus`: the Map itself hands back an already
    /// maximal/minimal seed (`known_max = true`).
    Solver,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bias: Bias,
    pub smus: bool,
    pub maximize: MaximizeStrategy,
    pub mssguided: bool,
    pub use_singletons: bool,
    pub limit: Option<usize>,
    pub timeout: Option<Duration>,
    pub verbose: u8,
    pub stats: bool,
    pub alltimes: bool,
}

impl Config {
    pub fn aim_high(&self) -> bool {
        self.bias.aim_high()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bias: Bias::MUSes,
            smus: false,
            maximize: MaximizeStrategy::Solver,
            mssguided: true,
            use_singletons: true,
            limit: None,
            timeout: None,
            verbose: 0,
            stats: false,
            alltimes: false,
        }
    }
}
