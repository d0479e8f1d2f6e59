//! The Hub Coordinator: runs several Enumerators in
//! parallel, each with its own solver state (no shared mutable data between
//! workers), deduplicates their results, and fans each
//! unique result out to every peer so blocks cross-propagate.
//!
//! The reference tool this reimplements forks one OS process per worker and
//! talks to each over a `multiprocessing.Pipe`. This crate instead spawns
//! one OS thread per worker and fans messages through `std::sync::mpsc`
//! channels: a single fan-in channel (sender cloned per worker, tagged with
//! the worker id) so the hub never needs to select over many receivers, and
//! one fan-out channel per worker for the blocks the hub forwards back.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::Config;
use crate::enumerator::{Emit, Enumerator, StepOutcome};
use crate::error::MarcoError;
use crate::input::Instance;
use crate::map::sat_map::SatMapSolver;
use crate::map::Direction;
use crate::stats::Statistics;
use crate::subset_solver::cnf::CnfSubsetSolver;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

enum WorkerToHub {
    Result(Emit),
    Done { complete: bool, stats: Statistics },
    Error(MarcoError),
}

enum HubToWorker {
    Block(Emit),
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubOutcome {
    /// A worker observed its own Map go UNSAT while running a non-SMUS,
    /// full enumeration: by construction every MUS/MSS has been found.
    Complete,
    /// Every worker's Seed Manager was exhausted without any of them being
    /// able to claim global completeness (e.g. all workers were SMUS-mode).
    Exhausted,
    /// The output limit was reached.
    LimitReached,
    /// A signal (interrupt or timeout) triggered an orderly shutdown.
    Interrupted,
}

pub struct HubReport {
    pub outcome: HubOutcome,
    pub worker_stats: Vec<Statistics>,
}

fn dedup_key(emit: &Emit) -> (u8, Vec<u64>) {
    match emit {
        Emit::Sat(s) => (0, s.canonical_key()),
        Emit::Unsat(s) => (1, s.canonical_key()),
    }
}

fn worker_loop(
    id: usize,
    instance: Instance,
    config: Config,
    to_hub: Sender<(usize, WorkerToHub)>,
    from_hub: Receiver<HubToWorker>,
    shutdown: Arc<AtomicBool>,
) {
    let n = instance.n();
    let bias = match config.maximize {
        crate::config::MaximizeStrategy::Solver => Some(Direction::from_aim_high(config.aim_high())),
        _ => None,
    };
    let map = SatMapSolver::new(n, bias);
    let subs = CnfSubsetSolver::new(&instance);
    let mut enumerator = Enumerator::new(map, subs, config);

    loop {
        // Drain peer blocks before drawing the next seed -- the one
        // cancellation/polling point inside a worker.
        loop {
            match from_hub.try_recv() {
                Ok(HubToWorker::Block(emit)) => {
                    if let Err(e) = enumerator.apply_peer_block(&emit) {
                        let _ = to_hub.send((id, WorkerToHub::Error(e)));
                        return;
                    }
                }
                Ok(HubToWorker::Shutdown) => return,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        if shutdown.load(Ordering::SeqCst) {
            return;
        }

        match enumerator.step() {
            Ok(StepOutcome::Emitted(emit)) => {
                if to_hub.send((id, WorkerToHub::Result(emit))).is_err() {
                    return;
                }
            }
            Ok(StepOutcome::Done { complete }) => {
                let _ = to_hub.send((
                    id,
                    WorkerToHub::Done {
                        complete,
                        stats: enumerator.stats().clone(),
                    },
                ));
                return;
            }
            Err(e) => {
                let _ = to_hub.send((id, WorkerToHub::Error(e)));
                return;
            }
        }
    }
}

/// Runs `worker_configs.len()` Enumerators in parallel, calling
/// `on_result` for every globally unique emitted subset in the order the
/// hub observes it. Returns once the enumeration is complete, exhausted,
/// the limit is hit, or `interrupt` is set.
pub fn run(
    instance: &Instance,
    worker_configs: Vec<Config>,
    limit: Option<usize>,
    interrupt: Arc<AtomicBool>,
    mut on_result: impl FnMut(&Emit),
) -> HubReport {
    let k = worker_configs.len();
    let (hub_tx, hub_rx): (Sender<(usize, WorkerToHub)>, Receiver<(usize, WorkerToHub)>) =
        mpsc::channel();

    let mut to_workers = Vec::with_capacity(k);
    let mut handles = Vec::with_capacity(k);
    let worker_shutdown = Arc::new(AtomicBool::new(false));

    for (id, config) in worker_configs.into_iter().enumerate() {
        let (worker_tx, worker_rx) = mpsc::channel();
        to_workers.push(worker_tx);

        let hub_tx = hub_tx.clone();
        let instance = instance.clone();
        let shutdown = Arc::clone(&worker_shutdown);
        handles.push(thread::spawn(move || {
            worker_loop(id, instance, config, hub_tx, worker_rx, shutdown);
        }));
    }
    drop(hub_tx);

    let mut seen: HashSet<(u8, Vec<u64>)> = HashSet::new();
    let mut active = k;
    let mut remaining = limit;
    let mut outcome = HubOutcome::Exhausted;
    let mut worker_stats = Vec::new();

    'hub: loop {
        if interrupt.load(Ordering::SeqCst) {
            outcome = HubOutcome::Interrupted;
            break;
        }

        match hub_rx.recv_timeout(POLL_INTERVAL) {
            Ok((from, msg)) => match msg {
                WorkerToHub::Result(emit) => {
                    let key = dedup_key(&emit);
                    if seen.insert(key) {
                        on_result(&emit);

                        for (peer, sender) in to_workers.iter().enumerate() {
                            if peer != from {
                                let _ = sender.send(HubToWorker::Block(emit.clone()));
                            }
                        }

                        if let Some(r) = remaining.as_mut() {
                            *r -= 1;
                            if *r == 0 {
                                outcome = HubOutcome::LimitReached;
                                break 'hub;
                            }
                        }
                    }
                }
                WorkerToHub::Done { complete, stats } => {
                    worker_stats.push(stats);
                    active -= 1;
                    if complete {
                        outcome = HubOutcome::Complete;
                        break 'hub;
                    }
                    if active == 0 {
                        outcome = HubOutcome::Exhausted;
                        break 'hub;
                    }
                }
                WorkerToHub::Error(_) => {
                    active -= 1;
                    if active == 0 {
                        outcome = HubOutcome::Exhausted;
                        break 'hub;
                    }
                }
            },
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    worker_shutdown.store(true, Ordering::SeqCst);
    for sender in &to_workers {
        let _ = sender.send(HubToWorker::Shutdown);
    }
    drop(to_workers);
    for handle in handles {
        let _ = handle.join();
    }

    HubReport {
        outcome,
        worker_stats,
    }
}
