mod common;

use std::{thread, time::Duration};

use common::{Scripted, guess, registry};
use harness::{
    Harness, HarnessConfig, HarnessErr, Outcome, SolveErr, Solution, SolverKind, TrialSpec,
};

fn swept_only(swept_solvers: Vec<SolverKind>) -> HarnessConfig {
    HarnessConfig {
        fixed_solvers: vec![],
        swept_solvers,
        ..Default::default()
    }
}

fn planted() -> TrialSpec {
    TrialSpec::new("planted", 30, 20, 4, 1)
}

#[test]
fn step_sizes_attempted_in_order() {
    let factory = Scripted::perfect();
    let config = swept_only(vec![SolverKind::Iht, SolverKind::Htp]);
    let harness = Harness::new(registry(), factory.clone(), config).unwrap();

    harness.task(&planted()).unwrap();

    let ladder = [1.0, 0.1, 0.01, 0.001, 0.0001];
    let expected: Vec<_> = [SolverKind::Iht, SolverKind::Htp]
        .into_iter()
        .flat_map(|kind| ladder.map(|s| (kind, Some(s))))
        .collect();
    assert_eq!(factory.calls(), expected);
}

#[test]
fn keeps_lowest_objective() {
    // The objective is minimal at 0.01, the recovered support there is the worst one.
    let factory = Scripted::new(|_, params| {
        let step_size = params.step_size.unwrap();
        let objective = if step_size == 0.01 { 0.1 } else { 1. + step_size };
        let hits = if step_size == 0.01 { 1 } else { 4 };
        Ok(Solution::new(guess(params, hits), objective))
    });
    let harness = Harness::new(registry(), factory, swept_only(vec![SolverKind::Iht])).unwrap();

    let results = harness.task(&planted()).unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0].outcome,
        Outcome::Recovered {
            accuracy: 0.25,
            objective: 0.1,
            step_size: Some(0.01),
        }
    );
}

#[test]
fn ties_keep_first_attempt() {
    let factory = Scripted::new(|_, params| Ok(Solution::new(guess(params, 4), 1.)));
    let harness = Harness::new(registry(), factory, swept_only(vec![SolverKind::Htp])).unwrap();

    let results = harness.task(&planted()).unwrap();

    let Outcome::Recovered { step_size, .. } = results[0].outcome else {
        panic!("expected a recovered outcome");
    };
    assert_eq!(step_size, Some(1.0));
}

#[test]
fn numerical_failures_are_skipped() {
    let factory = Scripted::new(|_, params| match params.step_size {
        Some(s) if s >= 0.1 => Err(SolveErr::Diverged { iteration: 2 }),
        Some(s) if s == 0.001 => Err(SolveErr::NonFiniteObjective),
        Some(s) => Ok(Solution::new(guess(params, 3), s)),
        None => unreachable!("swept solvers always get a step size"),
    });
    let harness = Harness::new(registry(), factory, swept_only(vec![SolverKind::Iht])).unwrap();

    let results = harness.task(&planted()).unwrap();

    assert_eq!(
        results[0].outcome,
        Outcome::Recovered {
            accuracy: 0.75,
            objective: 0.0001,
            step_size: Some(0.0001),
        }
    );
}

#[test]
fn all_failures_are_explicit_not_stale() {
    // HTP succeeds first, then every IHT attempt diverges.
    let factory = Scripted::new(|kind, params| match kind {
        SolverKind::Htp => Ok(Solution::new(guess(params, 4), 0.5)),
        _ => Err(SolveErr::Diverged { iteration: 0 }),
    });
    let config = swept_only(vec![SolverKind::Htp, SolverKind::Iht]);
    let harness = Harness::new(registry(), factory, config).unwrap();

    let results = harness.task(&planted()).unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].method, SolverKind::Htp);
    assert_eq!(results[0].accuracy(), Some(1.));

    assert_eq!(results[1].method, SolverKind::Iht);
    assert_eq!(results[1].outcome, Outcome::NoFeasibleStepSize);
    assert_eq!(results[1].accuracy(), None);
}

#[test]
fn unexpected_failure_propagates() {
    let factory = Scripted::new(|_, params| match params.step_size {
        Some(s) if s == 0.01 => Err(SolveErr::InvalidInput("bad dim".into())),
        _ => Err(SolveErr::Diverged { iteration: 1 }),
    });
    let harness = Harness::new(registry(), factory.clone(), swept_only(vec![SolverKind::Iht]))
        .unwrap();

    let err = harness.task(&planted()).unwrap_err();

    assert!(matches!(
        err,
        HarnessErr::SweptSolverFailure {
            method: SolverKind::Iht,
            step_size,
            ..
        } if step_size == 0.01
    ));
    // The sweep stops at the failing step size.
    assert_eq!(factory.calls().len(), 3);
}

#[test]
fn custom_ladder_order() {
    let factory = Scripted::perfect();
    let config = HarnessConfig {
        step_sizes: vec![0.001, 0.5],
        ..swept_only(vec![SolverKind::Htp])
    };
    let harness = Harness::new(registry(), factory.clone(), config).unwrap();

    harness.task(&planted()).unwrap();

    assert_eq!(
        factory.calls(),
        [(SolverKind::Htp, Some(0.001)), (SolverKind::Htp, Some(0.5))]
    );
}

const ATTEMPT: Duration = Duration::from_millis(5);

#[test]
fn retained_time_covers_sweep_so_far() {
    // Every attempt is slower than the last one kept, the smallest step size wins.
    let factory = Scripted::new(|_, params| {
        thread::sleep(ATTEMPT);
        let step_size = params.step_size.unwrap();
        Ok(Solution::new(guess(params, 4), step_size))
    });
    let harness = Harness::new(registry(), factory, swept_only(vec![SolverKind::Iht])).unwrap();

    let results = harness.task(&planted()).unwrap();

    let Outcome::Recovered { step_size, .. } = results[0].outcome else {
        panic!("expected a recovered outcome");
    };
    assert_eq!(step_size, Some(0.0001));
    assert!(results[0].time >= 5. * ATTEMPT.as_secs_f64(), "{}", results[0].time);
}

#[test]
fn infeasible_time_covers_every_attempt() {
    let factory = Scripted::new(|_, _| {
        thread::sleep(ATTEMPT);
        Err(SolveErr::NonFiniteObjective)
    });
    let harness = Harness::new(registry(), factory, swept_only(vec![SolverKind::Htp])).unwrap();

    let results = harness.task(&planted()).unwrap();

    assert_eq!(results[0].outcome, Outcome::NoFeasibleStepSize);
    assert!(results[0].time >= 5. * ATTEMPT.as_secs_f64(), "{}", results[0].time);
}
