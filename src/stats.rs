//! Per-worker timing/counter statistics, modeled on
//! the reference tool's `utils.Statistics` and the
//! `eprintln!`-based report style of the `satgalaxy-cli` example.

use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct Statistics {
    times: HashMap<String, Duration>,
    counts: HashMap<String, u64>,
    other: HashMap<String, Vec<f64>>,
    start: Option<Instant>,
}

impl Statistics {
    pub fn new() -> Self {
        Statistics {
            start: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// Times `f`, accumulating the elapsed duration under `category` and
    /// bumping its call count. Mirrors the `with self.stats.time(...)`
    /// context manager used throughout `MarcoPolo.enumerate`.
    pub fn time<T>(&mut self, category: &str, f: impl FnOnce() -> T) -> T {
        let started = Instant::now();
        let result = f();
        *self
            .times
            .entry(category.to_string())
            .or_insert(Duration::ZERO) += started.elapsed();
        *self.counts.entry(category.to_string()).or_insert(0) += 1;
        result
    }

    pub fn add_stat(&mut self, name: &str, value: f64) {
        self.other.entry(name.to_string()).or_default().push(value);
    }

    pub fn total_time(&self) -> f64 {
        self.start
            .map(|s| s.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Prints the `-s`/`--stats` report to stderr, sorted by total runtime
    /// ascending as in `marco.py::at_exit`.
    pub fn report(&self) {
        let mut categories: Vec<&String> = self.times.keys().collect();
        categories.sort_by(|a, b| self.times[*a].partial_cmp(&self.times[*b]).unwrap());

        let maxlen = categories.iter().map(|c| c.len()).max().unwrap_or(0);
        for category in &categories {
            eprintln!(
                "{:<width$} : {:8.3}",
                category,
                self.times[*category].as_secs_f64(),
                width = maxlen
            );
        }
        for category in &categories {
            if let Some(&count) = self.counts.get(*category) {
                eprintln!(
                    "{:<width$} : {:8}",
                    format!("{category} count"),
                    count,
                    width = maxlen + 6
                );
                eprintln!(
                    "{:<width$} : {:8.5}",
                    format!("{category} per"),
                    self.times[*category].as_secs_f64() / count as f64,
                    width = maxlen + 6
                );
            }
        }

        if !self.other.is_empty() {
            let maxlen = self.other.keys().map(|k| k.len()).max().unwrap_or(0);
            for (name, values) in &self.other {
                let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
                let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                let avg = values.iter().sum::<f64>() / values.len() as f64;
                eprintln!("{:<width$} : {min:.6}", format!("{name} min"), width = maxlen + 4);
                eprintln!("{:<width$} : {max:.6}", format!("{name} max"), width = maxlen + 4);
                eprintln!("{:<width$} : {avg:.6}", format!("{name} avg"), width = maxlen + 4);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_accumulates_duration_and_count() {
        let mut stats = Statistics::new();
        stats.time("seed", || std::thread::sleep(Duration::from_millis(1)));
        stats.time("seed", || {});
        assert_eq!(stats.counts["seed"], 2);
        assert!(stats.times["seed"] > Duration::ZERO);
    }

    #[test]
    fn add_stat_collects_values() {
        let mut stats = Statistics::new();
        stats.add_stat("improvement", 0.5);
        stats.add_stat("improvement", 0.25);
        assert_eq!(stats.other["improvement"], vec![0.5, 0.25]);
    }
}
