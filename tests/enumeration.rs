//! Integration coverage for the full Hub/Enumerator path, driving the
//! library over small in-memory CNF instances: the six scenarios and the
//! boundary cases worked through in the design.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use marco::config::{Bias, Config};
use marco::enumerator::Emit;
use marco::hub::{self, HubOutcome};
use marco::input::Instance;

fn collect(instance: &Instance, configs: Vec<Config>) -> (Vec<Vec<usize>>, Vec<Vec<usize>>, HubOutcome) {
    let results = Arc::new(Mutex::new(Vec::new()));
    let collector = Arc::clone(&results);
    let report = hub::run(
        instance,
        configs,
        None,
        Arc::new(AtomicBool::new(false)),
        move |emit| collector.lock().unwrap().push(emit.clone()),
    );

    let results = results.lock().unwrap();
    let mut mus: Vec<Vec<usize>> = results
        .iter()
        .filter_map(|e| match e {
            Emit::Unsat(s) => Some(s.iter().collect()),
            _ => None,
        })
        .collect();
    mus.sort();
    let mut mss: Vec<Vec<usize>> = results
        .iter()
        .filter_map(|e| match e {
            Emit::Sat(s) => Some(s.iter().collect()),
            _ => None,
        })
        .collect();
    mss.sort();
    (mus, mss, report.outcome)
}

/// n=3, C = {x, !x, y}: single worker, default config.
#[test]
fn scenario_one_single_worker() {
    let instance = Instance {
        constraints: vec![vec![vec![1]], vec![vec![-1]], vec![vec![2]]],
        hard_clauses: vec![],
    };
    let (mus, mss, outcome) = collect(&instance, vec![Config::default()]);
    assert_eq!(outcome, HubOutcome::Complete);
    assert_eq!(mus, vec![vec![0, 1]]);
    assert_eq!(mss, vec![vec![0, 2], vec![1, 2]]);
}

/// n=4, C = {x, !x, y, !y}: the "typical three" worker pool (MUS-biased,
/// MCS-biased, unbiased-no-maximisation) still converges to exactly the
/// same globally unique result set as a single worker would.
#[test]
fn scenario_two_typical_three_workers() {
    let instance = Instance {
        constraints: vec![
            vec![vec![1]],
            vec![vec![-1]],
            vec![vec![2]],
            vec![vec![-2]],
        ],
        hard_clauses: vec![],
    };
    let mut mus_biased = Config::default();
    mus_biased.bias = Bias::MUSes;
    let mut mcs_biased = Config::default();
    mcs_biased.bias = Bias::MCSes;
    let mut unbiased = Config::default();
    unbiased.maximize = marco::config::MaximizeStrategy::None;

    let (mus, mss, outcome) = collect(&instance, vec![mus_biased, mcs_biased, unbiased]);
    assert_eq!(outcome, HubOutcome::Complete);
    assert_eq!(mus, vec![vec![0, 1], vec![2, 3]]);
    assert_eq!(
        mss,
        vec![vec![0, 2], vec![0, 3], vec![1, 2], vec![1, 3]]
    );
}

/// n=3, C = {x, x|y, y}: everything satisfiable, one top-level MSS.
#[test]
fn scenario_three_all_satisfiable() {
    let instance = Instance {
        constraints: vec![vec![vec![1]], vec![vec![1, 2]], vec![vec![2]]],
        hard_clauses: vec![],
    };
    let (mus, mss, outcome) = collect(&instance, vec![Config::default()]);
    assert_eq!(outcome, HubOutcome::Complete);
    assert!(mus.is_empty());
    assert_eq!(mss, vec![vec![0, 1, 2]]);
}

/// n=2, C = {x & !x, y}: constraint 0 is internally contradictory.
#[test]
fn scenario_four_internally_contradictory_constraint() {
    let instance = Instance {
        constraints: vec![vec![vec![1], vec![-1]], vec![vec![2]]],
        hard_clauses: vec![],
    };
    let (mus, mss, outcome) = collect(&instance, vec![Config::default()]);
    assert_eq!(outcome, HubOutcome::Complete);
    assert_eq!(mus, vec![vec![0]]);
    assert_eq!(mss, vec![vec![1]]);
}

/// n=0: exactly one empty MSS and immediate completion.
#[test]
fn boundary_n_zero() {
    let instance = Instance {
        constraints: vec![],
        hard_clauses: vec![],
    };
    let (mus, mss, outcome) = collect(&instance, vec![Config::default()]);
    assert_eq!(outcome, HubOutcome::Complete);
    assert!(mus.is_empty());
    assert_eq!(mss, vec![Vec::<usize>::new()]);
}

/// Every {i} is individually UNSAT: n singleton MUSes and one empty MSS.
#[test]
fn boundary_all_unsat_singletons() {
    let instance = Instance {
        constraints: vec![
            vec![vec![1], vec![-1]],
            vec![vec![2], vec![-2]],
            vec![vec![3], vec![-3]],
        ],
        hard_clauses: vec![],
    };
    let (mus, mss, outcome) = collect(&instance, vec![Config::default()]);
    assert_eq!(outcome, HubOutcome::Complete);
    assert_eq!(mus, vec![vec![0], vec![1], vec![2]]);
    assert_eq!(mss, vec![Vec::<usize>::new()]);
}

/// Two workers, MUS- and MCS-biased, on scenario two: every result
/// appears exactly once at the hub despite both workers being able to
/// find it.
#[test]
fn two_biased_workers_deduplicate_across_the_hub() {
    let instance = Instance {
        constraints: vec![
            vec![vec![1]],
            vec![vec![-1]],
            vec![vec![2]],
            vec![vec![-2]],
        ],
        hard_clauses: vec![],
    };
    let mut mus_biased = Config::default();
    mus_biased.bias = Bias::MUSes;
    let mut mcs_biased = Config::default();
    mcs_biased.bias = Bias::MCSes;

    let results = Arc::new(Mutex::new(Vec::new()));
    let collector = Arc::clone(&results);
    let report = hub::run(
        &instance,
        vec![mus_biased, mcs_biased],
        None,
        Arc::new(AtomicBool::new(false)),
        move |emit| collector.lock().unwrap().push(emit.clone()),
    );
    assert_eq!(report.outcome, HubOutcome::Complete);

    let results = results.lock().unwrap();
    let mut keys: Vec<(u8, Vec<u64>)> = results
        .iter()
        .map(|e| match e {
            Emit::Sat(s) => (0u8, s.canonical_key()),
            Emit::Unsat(s) => (1u8, s.canonical_key()),
        })
        .collect();
    let before = keys.len();
    keys.sort();
    keys.dedup();
    assert_eq!(before, keys.len(), "every result should appear exactly once at the hub");
    assert_eq!(before, 6); // 2 MUSes + 4 MSSes
}

/// A Group-CNF-shaped instance: a permanent hard clause (`x`) plus two
/// enumerable constraints, one of which (`!x`) directly contradicts it.
/// Exercises that hard clauses are never themselves part of an emitted
/// subset while still constraining what's satisfiable.
#[test]
fn hard_clauses_constrain_without_appearing_in_any_emitted_subset() {
    let instance = Instance {
        constraints: vec![vec![vec![-1]], vec![vec![2]]],
        hard_clauses: vec![vec![1]],
    };
    let (mus, mss, outcome) = collect(&instance, vec![Config::default()]);
    assert_eq!(outcome, HubOutcome::Complete);
    assert_eq!(mus, vec![vec![0]]); // {!x} is UNSAT against the hard {x}
    assert_eq!(mss, vec![vec![1]]); // {y} alone is the only MSS
}
