//! The fork-join element loop.
//!
//! [`ThreadedElementLoop`] recursively splits an element range with
//! `rayon::join`, forking the operation at every split and joining it
//! back once both halves finish. Faults are funnelled through
//! [`caught_element_error()`](ThreadedElementLoop::caught_element_error),
//! the single place where a worker touches problem-wide state.

use std::any::Any;
use std::ops::{Add, AddAssign};
use std::panic::{self, AssertUnwindSafe};

use tessel_core::ElementError;
use tessel_mesh::{Element, ElementRange};

use crate::context::{ProblemContext, SystemContext, VisitContext};
use crate::exception::ExceptionLock;
use crate::operation::ElementOperation;

/// What a traversal does after a fault has been recorded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FaultPolicy {
    /// Stop dispatching new sub-ranges and elements once a fault is
    /// recorded. In-flight element visits finish.
    #[default]
    Cancel,
    /// Record the fault but visit every remaining element, so that
    /// accumulators cover the whole range.
    CompleteTraversal,
}

/// Counters from one traversal, summed across all leaves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Elements whose visit returned `Ok`.
    pub visited: usize,
    /// Elements whose visit returned `Err` or panicked.
    pub failed: usize,
    /// Elements never visited because the traversal was cancelled.
    pub skipped: usize,
    /// Leaf ranges that were dispatched.
    pub leaves: usize,
}

impl TraversalStats {
    /// Total elements accounted for. Equals the range length after a
    /// traversal completes.
    pub fn total(&self) -> usize {
        self.visited + self.failed + self.skipped
    }
}

impl Add for TraversalStats {
    type Output = TraversalStats;

    fn add(mut self, rhs: TraversalStats) -> TraversalStats {
        self += rhs;
        self
    }
}

impl AddAssign for TraversalStats {
    fn add_assign(&mut self, rhs: TraversalStats) {
        self.visited += rhs.visited;
        self.failed += rhs.failed;
        self.skipped += rhs.skipped;
        self.leaves += rhs.leaves;
    }
}

/// Fork-join traversal over an element range.
///
/// Holds only borrowed references: the problem (fault record and lock)
/// and the system (mesh and variables). [`fork()`](Self::fork) produces a
/// sibling sharing both references; nothing is deep-copied, and dropping
/// a loop releases nothing but its own fields.
///
/// When called inside `rayon::ThreadPool::install` the traversal runs on
/// that pool; otherwise on rayon's global pool.
#[derive(Clone, Copy)]
pub struct ThreadedElementLoop<'a> {
    problem: &'a dyn ProblemContext,
    system: &'a dyn SystemContext,
    lock: &'a ExceptionLock,
    policy: FaultPolicy,
}

impl<'a> ThreadedElementLoop<'a> {
    /// A loop over `system`'s mesh reporting faults to `problem`.
    pub fn new(problem: &'a dyn ProblemContext, system: &'a dyn SystemContext) -> Self {
        Self {
            problem,
            system,
            lock: problem.exception_lock(),
            policy: FaultPolicy::default(),
        }
    }

    /// Set the fault policy.
    pub fn with_policy(mut self, policy: FaultPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The fault policy in effect.
    pub fn policy(&self) -> FaultPolicy {
        self.policy
    }

    /// Split constructor: a sibling sharing this loop's problem, system,
    /// lock and policy.
    pub fn fork(&self) -> Self {
        *self
    }

    /// The problem this loop reports to.
    pub fn problem(&self) -> &'a dyn ProblemContext {
        self.problem
    }

    /// The system this loop traverses.
    pub fn system(&self) -> &'a dyn SystemContext {
        self.system
    }

    /// Whether new work should be dispatched.
    ///
    /// Under [`FaultPolicy::Cancel`] this is `false` as soon as the
    /// problem has recorded a fault. Under
    /// [`FaultPolicy::CompleteTraversal`] it is always `true`.
    pub fn keep_going(&self) -> bool {
        match self.policy {
            FaultPolicy::Cancel => !self.problem.has_exception(),
            FaultPolicy::CompleteTraversal => true,
        }
    }

    /// Record a per-element fault on the problem.
    ///
    /// Takes the problem's exception lock, formats the message, and
    /// forwards it to [`ProblemContext::set_exception`]. The guard
    /// releases the lock on every exit path; the outcome is logged only
    /// after it is released.
    pub fn caught_element_error(&self, error: &ElementError) {
        let stored = {
            let _guard = self.lock.lock();
            let message = error.to_string();
            self.problem.set_exception(message)
        };
        if stored {
            log::warn!("fault recorded: {error}");
        } else {
            log::debug!("fault suppressed, one already recorded: {error}");
        }
    }

    /// Traverse `range` in parallel, fork-joining `op`.
    ///
    /// On return every split has been joined back into `op`. Faults are
    /// never propagated: inspect the problem's exception flag afterwards.
    pub fn run<O: ElementOperation>(&self, range: ElementRange<'_>, op: &mut O) -> TraversalStats {
        log::debug!(
            "threaded loop over '{}': {} elements, grain {}",
            self.system.name(),
            range.len(),
            range.grain_size()
        );
        let stats = self.traverse(range, op);
        log::debug!(
            "threaded loop over '{}' done: {} visited, {} failed, {} skipped, {} leaves",
            self.system.name(),
            stats.visited,
            stats.failed,
            stats.skipped,
            stats.leaves
        );
        stats
    }

    /// Traverse `range` on the calling thread as a single leaf, with the
    /// same fault capture as [`run()`](Self::run).
    pub fn run_serial<O: ElementOperation>(
        &self,
        range: ElementRange<'_>,
        op: &mut O,
    ) -> TraversalStats {
        self.visit_leaf(range, op, None)
    }

    fn traverse<O: ElementOperation>(&self, range: ElementRange<'_>, op: &mut O) -> TraversalStats {
        if !self.keep_going() {
            return TraversalStats {
                skipped: range.len(),
                ..TraversalStats::default()
            };
        }
        if !range.is_divisible() {
            return self.visit_leaf(range, op, rayon::current_thread_index());
        }

        let (left, right) = range.split();
        let Some(mut sibling_op) = self.guard_hook("fork", || op.fork()) else {
            // No sibling to hand the right half to: walk both halves here.
            let left_stats = self.traverse(left, op);
            return left_stats + self.traverse(right, op);
        };
        let sibling = self.fork();
        let (left_stats, right_stats) = rayon::join(
            || self.traverse(left, op),
            || sibling.traverse(right, &mut sibling_op),
        );
        self.guard_hook("join", || op.join(sibling_op));
        left_stats + right_stats
    }

    /// Run a non-element hook, recording a panic as
    /// [`ElementError::HookPanicked`] instead of letting it unwind through
    /// `rayon::join`.
    fn guard_hook<R>(&self, hook: &'static str, f: impl FnOnce() -> R) -> Option<R> {
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(value) => Some(value),
            Err(payload) => {
                self.caught_element_error(&ElementError::HookPanicked {
                    hook,
                    message: panic_message(payload.as_ref()),
                });
                None
            }
        }
    }

    fn visit_leaf<O: ElementOperation>(
        &self,
        range: ElementRange<'_>,
        op: &mut O,
        worker: Option<usize>,
    ) -> TraversalStats {
        let ctx = VisitContext::new(self.system, worker);
        let mut stats = TraversalStats {
            leaves: 1,
            ..TraversalStats::default()
        };

        self.guard_hook("pre", || op.pre());
        let mut subdomain = None;
        for (i, elem) in range.iter().enumerate() {
            if !self.keep_going() {
                stats.skipped += range.len() - i;
                break;
            }
            if subdomain != Some(elem.subdomain()) {
                subdomain = Some(elem.subdomain());
                self.guard_hook("on_subdomain_changed", || {
                    op.on_subdomain_changed(elem.subdomain())
                });
            }
            match visit_element(op, &ctx, elem) {
                Ok(()) => stats.visited += 1,
                Err(e) => {
                    stats.failed += 1;
                    self.caught_element_error(&e);
                }
            }
        }
        self.guard_hook("post", || op.post());
        stats
    }
}

fn visit_element<O: ElementOperation>(
    op: &mut O,
    ctx: &VisitContext<'_>,
    elem: &Element,
) -> Result<(), ElementError> {
    // A panicking body must not unwind through rayon::join into the caller.
    match panic::catch_unwind(AssertUnwindSafe(|| op.on_element(ctx, elem))) {
        Ok(result) => result,
        Err(payload) => Err(ElementError::Panicked {
            element: elem.id(),
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
