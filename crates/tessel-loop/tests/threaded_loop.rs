//! Integration tests: fork-join traversal and fault capture.
//!
//! Drives `ThreadedElementLoop` with the mock contexts and fixture
//! operations from `tessel-test-utils` across several pool sizes.

use std::sync::Barrier;
use std::thread;

use tessel_core::{ElementError, ElementId};
use tessel_loop::{FaultPolicy, ProblemContext, SystemContext, ThreadedElementLoop};
use tessel_test_utils::{
    CountingOperation, FailingOperation, HookPanicOperation, MockProblem, MockSystem,
    PanickingOperation, RecordingOperation,
};

fn pool(threads: usize) -> rayon::ThreadPool {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .unwrap()
}

// ── Ordering and coverage ────────────────────────────────────────────

#[test]
fn four_element_leaf_order_is_independent_of_thread_count() {
    for threads in [1, 2, 4] {
        let problem = MockProblem::new();
        let system = MockSystem::line(4);
        let lp = ThreadedElementLoop::new(&problem, &system);
        let mut op = RecordingOperation::new();
        let range = system.mesh().element_range(1).unwrap();

        pool(threads).install(|| lp.run(range, &mut op));

        assert_eq!(
            op.order,
            vec![ElementId(0), ElementId(1), ElementId(2), ElementId(3)],
            "order differs with {threads} threads"
        );
    }
}

#[test]
fn every_element_visited_exactly_once() {
    for (n, grain) in [(1, 1), (7, 3), (1000, 100), (1024, 1), (333, 500)] {
        let problem = MockProblem::new();
        let system = MockSystem::line(n);
        let lp = ThreadedElementLoop::new(&problem, &system);
        let mut op = CountingOperation::new(n as usize);
        let range = system.mesh().element_range(grain).unwrap();

        let stats = pool(4).install(|| lp.run(range, &mut op));

        assert!(op.counts.iter().all(|&c| c == 1), "n={n} grain={grain}");
        assert_eq!(stats.visited, n as usize);
        assert_eq!(stats.leaves, op.leaves);
        assert!(!problem.has_exception());
        assert_eq!(problem.message(), None);
    }
}

#[test]
fn pre_runs_once_per_leaf() {
    let problem = MockProblem::new();
    let system = MockSystem::line(1000);
    let lp = ThreadedElementLoop::new(&problem, &system);
    let mut op = CountingOperation::new(1000);
    let range = system.mesh().element_range(100).unwrap();
    let expected_leaves = range.leaves().len();

    let stats = pool(3).install(|| lp.run(range, &mut op));

    assert_eq!(stats.leaves, expected_leaves);
    assert_eq!(op.leaves, expected_leaves);
    // Single subdomain: one change notification per leaf.
    assert_eq!(op.subdomain_changes, expected_leaves);
}

// ── Fault capture ────────────────────────────────────────────────────

#[test]
fn single_fault_at_550_completes_other_visits() {
    let problem = MockProblem::new();
    let system = MockSystem::line(1000);
    let lp = ThreadedElementLoop::new(&problem, &system).with_policy(FaultPolicy::CompleteTraversal);
    let mut op = FailingOperation::new(1000, [ElementId(550)]);
    let range = system.mesh().element_range(100).unwrap();

    let stats = pool(4).install(|| lp.run(range, &mut op));

    assert!(problem.has_exception());
    assert_eq!(problem.set_calls(), 1);
    let message = problem.message().unwrap();
    assert!(message.contains("element 550"), "message: {message}");
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.visited, 999);
    assert!(op.counts.iter().all(|&c| c == 1));
}

#[test]
fn cancel_policy_stops_dispatch_but_accounts_for_everything() {
    let problem = MockProblem::new();
    let system = MockSystem::line(1000);
    let lp = ThreadedElementLoop::new(&problem, &system);
    let mut op = FailingOperation::new(1000, [ElementId(550)]);
    let range = system.mesh().element_range(100).unwrap();

    let stats = pool(4).install(|| lp.run(range, &mut op));

    assert!(problem.has_exception());
    assert_eq!(problem.set_calls(), 1);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.total(), 1000);
    // No element is ever visited twice, and every started visit finished.
    assert!(op.counts.iter().all(|&c| c <= 1));
    assert_eq!(op.distinct_visited(), stats.visited + stats.failed);
}

#[test]
fn many_faults_leave_one_message() {
    let problem = MockProblem::new();
    let system = MockSystem::line(256);
    let lp = ThreadedElementLoop::new(&problem, &system).with_policy(FaultPolicy::CompleteTraversal);
    let failing: Vec<ElementId> = (0..256).step_by(8).map(ElementId).collect();
    let mut op = FailingOperation::new(256, failing.clone());
    let range = system.mesh().element_range(4).unwrap();

    let stats = pool(8).install(|| lp.run(range, &mut op));

    assert_eq!(stats.failed, failing.len());
    assert_eq!(problem.set_calls(), failing.len());
    assert_eq!(problem.suppressed(), failing.len() - 1);
    let message = problem.message().unwrap();
    assert!(failing
        .iter()
        .any(|id| message == format!("evaluation failed on element {id}: injected failure")));
}

#[test]
fn panic_in_body_is_captured() {
    let problem = MockProblem::new();
    let system = MockSystem::line(64);
    let lp = ThreadedElementLoop::new(&problem, &system).with_policy(FaultPolicy::CompleteTraversal);
    let mut op = PanickingOperation::new(ElementId(17));
    let range = system.mesh().element_range(8).unwrap();

    let stats = pool(4).install(|| lp.run(range, &mut op));

    assert!(problem.has_exception());
    assert!(problem.message().unwrap().contains("element 17 exploded"));
    assert_eq!(stats.failed, 1);
    assert_eq!(op.visited, 63);
}

#[test]
fn panic_in_post_hook_is_captured() {
    let problem = MockProblem::new();
    let system = MockSystem::line(16);
    let lp = ThreadedElementLoop::new(&problem, &system).with_policy(FaultPolicy::CompleteTraversal);
    let mut op = HookPanicOperation::new("post");
    let range = system.mesh().element_range(4).unwrap();

    let stats = pool(4).install(|| lp.run(range, &mut op));

    assert_eq!(
        problem.message().as_deref(),
        Some("panic in 'post' hook: post exploded")
    );
    assert_eq!(stats.visited, 16);
    assert_eq!(stats.leaves, 4);
    assert_eq!(op.visited, 16);
    // One panic per leaf; the first is kept.
    assert_eq!(problem.set_calls(), 4);
}

#[test]
fn panic_in_join_hook_is_captured() {
    let problem = MockProblem::new();
    let system = MockSystem::line(16);
    let lp = ThreadedElementLoop::new(&problem, &system).with_policy(FaultPolicy::CompleteTraversal);
    let mut op = HookPanicOperation::new("join");
    let range = system.mesh().element_range(4).unwrap();

    let stats = pool(4).install(|| lp.run(range, &mut op));

    assert_eq!(
        problem.message().as_deref(),
        Some("panic in 'join' hook: join exploded")
    );
    assert_eq!(stats.total(), 16);
    assert_eq!(op.visited, 16);
}

#[test]
fn panic_in_fork_hook_walks_both_halves_in_place() {
    let problem = MockProblem::new();
    let system = MockSystem::line(16);
    let lp = ThreadedElementLoop::new(&problem, &system).with_policy(FaultPolicy::CompleteTraversal);
    let mut op = HookPanicOperation::new("fork");
    let range = system.mesh().element_range(4).unwrap();

    let stats = pool(4).install(|| lp.run(range, &mut op));

    assert_eq!(
        problem.message().as_deref(),
        Some("panic in 'fork' hook: fork exploded")
    );
    assert_eq!(stats.visited, 16);
    assert_eq!(op.visited, 16);
}

#[test]
fn panic_in_pre_hook_cancels_the_leaf() {
    let problem = MockProblem::new();
    let system = MockSystem::line(8);
    let lp = ThreadedElementLoop::new(&problem, &system);
    let mut op = HookPanicOperation::new("pre");
    let range = system.mesh().element_range(8).unwrap();

    let stats = lp.run_serial(range, &mut op);

    assert!(problem.has_exception());
    assert_eq!(stats.skipped, 8);
    assert_eq!(op.visited, 0);
}

#[test]
fn clearing_between_traversals_resets_flag() {
    let problem = MockProblem::new();
    let system = MockSystem::line(32);
    let lp = ThreadedElementLoop::new(&problem, &system);

    let mut failing = FailingOperation::new(32, [ElementId(3)]);
    lp.run(system.mesh().element_range(4).unwrap(), &mut failing);
    assert!(problem.has_exception());

    problem.clear();
    let mut counting = CountingOperation::new(32);
    let stats = lp.run(system.mesh().element_range(4).unwrap(), &mut counting);
    assert!(!problem.has_exception());
    assert_eq!(stats.visited, 32);
}

// ── Concurrency of the choke point ───────────────────────────────────

#[test]
fn concurrent_caught_element_error_records_one_message() {
    const WORKERS: usize = 16;
    let problem = MockProblem::new();
    let system = MockSystem::line(WORKERS as u32);
    let lp = ThreadedElementLoop::new(&problem, &system);
    let barrier = Barrier::new(WORKERS);

    thread::scope(|s| {
        for i in 0..WORKERS {
            let lp = lp.fork();
            let barrier = &barrier;
            s.spawn(move || {
                barrier.wait();
                lp.caught_element_error(&ElementError::EvaluationFailed {
                    element: ElementId(i as u32),
                    reason: "race".into(),
                });
            });
        }
    });

    assert!(problem.has_exception());
    assert_eq!(problem.set_calls(), WORKERS);
    assert_eq!(problem.suppressed(), WORKERS - 1);
    assert!(!problem.lock().is_locked());
    let message = problem.message().unwrap();
    assert!(message.starts_with("evaluation failed on element "));
    assert!(message.ends_with(": race"));
}

#[test]
fn lock_is_released_after_each_capture() {
    let problem = MockProblem::new();
    let system = MockSystem::line(2);
    let lp = ThreadedElementLoop::new(&problem, &system);
    lp.caught_element_error(&ElementError::NonFinite {
        element: ElementId(1),
        origin: "ic".into(),
    });
    assert!(!problem.lock().is_locked());
    lp.caught_element_error(&ElementError::NonFinite {
        element: ElementId(0),
        origin: "ic".into(),
    });
    assert!(!problem.lock().is_locked());
    assert_eq!(
        problem.message().as_deref(),
        Some("non-finite value from 'ic' on element 1")
    );
}
