//! The coordinating problem.
//!
//! [`FeProblem`] owns everything a traversal shares: the variable
//! system, the initial conditions, the worker pool, and the fault record
//! with its lock. Every traversal goes through one path:
//!
//! 1. clear the fault record,
//! 2. run the threaded loop on the problem's pool,
//! 3. store metrics,
//! 4. turn a set fault flag into [`SolveError::TraversalFailed`].
//!
//! Results are committed only after a traversal succeeds, so a failed
//! projection leaves the solution untouched.

use std::time::Instant;

use crate::assembly::{ElementKernel, ResidualAssembly};
use crate::config::{ConfigError, ParallelConfig, ProblemConfig};
use crate::error::SolveError;
use crate::metrics::TraversalMetrics;
use crate::system::NonlinearSystem;
use tessel_core::{IcError, InputParameters, Real};
use tessel_ics::{IcFactory, IcSet, InitialCondition, ProjectInitialCondition};
use tessel_loop::{
    ElementOperation, ExceptionLock, ExceptionRecord, ProblemContext, SystemContext,
    ThreadedElementLoop, TraversalStats,
};

/// Phase name of the initial-condition projection.
pub const PHASE_INITIAL_CONDITIONS: &str = "initial conditions";
/// Phase name of residual assembly.
pub const PHASE_RESIDUAL: &str = "residual";

// Compile-time assertion: loops borrow the problem from worker threads.
const _: () = {
    #[allow(dead_code)]
    fn assert_sync<T: Sync + Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_sync::<FeProblem>();
    }
};

/// A finite-element problem: one nonlinear system plus the machinery to
/// traverse it in parallel.
///
/// Created from a [`ProblemConfig`] via [`new()`](Self::new). Operations
/// that traverse the mesh take `&mut self`, so traversals never overlap.
pub struct FeProblem {
    system: NonlinearSystem,
    ics: IcSet,
    record: ExceptionRecord,
    lock: ExceptionLock,
    pool: rayon::ThreadPool,
    parallel: ParallelConfig,
    metrics: TraversalMetrics,
}

impl FeProblem {
    /// Build a problem, constructing initial conditions with the library
    /// factory.
    pub fn new(config: ProblemConfig) -> Result<Self, ConfigError> {
        Self::with_factory(config, &IcFactory::with_builtins())
    }

    /// Build a problem, constructing initial conditions with `factory`.
    ///
    /// Validates the configuration, starts the worker pool, and builds
    /// every configured initial condition against the new system.
    pub fn with_factory(config: ProblemConfig, factory: &IcFactory) -> Result<Self, ConfigError> {
        config.validate()?;
        let ProblemConfig {
            mesh,
            variables,
            initial_conditions,
            parallel,
        } = config;

        let n_threads = parallel.resolved_threads();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .thread_name(|i| format!("tessel-worker-{i}"))
            .build()
            .map_err(|e| ConfigError::ThreadPool {
                reason: e.to_string(),
            })?;

        let system = NonlinearSystem::new("nl", mesh, &variables);
        let mut ics = IcSet::new();
        for ic in &initial_conditions {
            ics.add(factory.build(&ic.type_name, ic.name.as_str(), &system, &ic.params)?)?;
        }

        log::info!(
            "problem ready: {} elements, {} variables, {} initial conditions, {} threads",
            system.mesh().n_elements(),
            system.variables().len(),
            ics.len(),
            n_threads
        );

        Ok(Self {
            system,
            ics,
            record: ExceptionRecord::new(),
            lock: ExceptionLock::new(),
            pool,
            parallel,
            metrics: TraversalMetrics::default(),
        })
    }

    /// The nonlinear system.
    pub fn system(&self) -> &NonlinearSystem {
        &self.system
    }

    /// Mutable access to the system, e.g. to set solution values.
    pub fn system_mut(&mut self) -> &mut NonlinearSystem {
        &mut self.system
    }

    /// The initial conditions registered so far.
    pub fn initial_conditions(&self) -> &IcSet {
        &self.ics
    }

    /// The parallel settings in effect.
    pub fn parallel(&self) -> &ParallelConfig {
        &self.parallel
    }

    /// Number of worker threads in the pool.
    pub fn n_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Metrics of the most recent traversal.
    pub fn last_metrics(&self) -> &TraversalMetrics {
        &self.metrics
    }

    /// The fault message recorded by the most recent traversal, if any.
    pub fn exception_message(&self) -> Option<String> {
        self.record.message()
    }

    /// Register an already-built initial condition.
    ///
    /// Rejects a condition overlapping an existing one on the same
    /// variable and subdomain.
    pub fn set_initial_condition(&mut self, ic: Box<dyn InitialCondition>) -> Result<(), IcError> {
        self.ics.add(ic)
    }

    /// Build an initial condition through `factory` against this
    /// problem's system and register it.
    pub fn add_initial_condition(
        &mut self,
        factory: &IcFactory,
        type_name: &str,
        name: &str,
        params: &InputParameters,
    ) -> Result<(), IcError> {
        let ic = factory.build(type_name, name, &self.system, params)?;
        self.ics.add(ic)
    }

    /// Evaluate every initial condition at the mesh nodes in parallel and
    /// commit the values to the solution.
    ///
    /// Returns the number of nodal values written. On failure nothing is
    /// written.
    pub fn project_initial_conditions(&mut self) -> Result<usize, SolveError> {
        let mut op = ProjectInitialCondition::new(&self.ics, &self.system);
        let (stats, outcome) = self.traverse(PHASE_INITIAL_CONDITIONS, &mut op);
        let values = op.into_values();
        self.finish(PHASE_INITIAL_CONDITIONS, stats, outcome)?;

        let written = self.system.commit(&values);
        log::info!(
            "committed {written} initial values from {} conditions",
            self.ics.len()
        );
        Ok(written)
    }

    /// Assemble the residual of `kernel` over the whole mesh.
    ///
    /// Returns one entry per node for the kernel's variable.
    pub fn compute_residual<K: ElementKernel>(&mut self, kernel: &K) -> Result<Vec<Real>, SolveError> {
        let variable = kernel.variable();
        let solution = self
            .system
            .variable_values(variable)
            .ok_or(SolveError::UnknownVariable { variable })?;
        let mut op = ResidualAssembly::new(kernel, &self.system, solution);
        let (stats, outcome) = self.traverse(PHASE_RESIDUAL, &mut op);
        let residual = op.into_residual();
        self.finish(PHASE_RESIDUAL, stats, outcome)?;
        Ok(residual)
    }

    /// Run an arbitrary element operation over the whole mesh with the
    /// problem's pool, grain size and fault policy.
    ///
    /// `phase` names the operation in metrics and errors.
    pub fn run_loop<O: ElementOperation>(
        &mut self,
        phase: &str,
        op: &mut O,
    ) -> Result<TraversalStats, SolveError> {
        let (stats, outcome) = self.traverse(phase, op);
        self.finish(phase, stats, outcome)?;
        Ok(stats)
    }

    fn traverse<O: ElementOperation>(&self, phase: &str, op: &mut O) -> (TraversalStats, Traversal) {
        self.record.clear();
        let range = match self.system.mesh().element_range(self.parallel.grain_size) {
            Ok(range) => range,
            Err(e) => return (TraversalStats::default(), Traversal::Mesh(e)),
        };

        log::debug!("{phase}: traversing {} elements", range.len());
        let lp = ThreadedElementLoop::new(self, &self.system).with_policy(self.parallel.fault_policy);
        let start = Instant::now();
        let stats = self.pool.install(|| lp.run(range, op));
        let elapsed_us = start.elapsed().as_micros() as u64;

        (stats, Traversal::Ran { elapsed_us })
    }

    fn finish(
        &mut self,
        phase: &str,
        stats: TraversalStats,
        outcome: Traversal,
    ) -> Result<(), SolveError> {
        let elapsed_us = match outcome {
            Traversal::Ran { elapsed_us } => elapsed_us,
            Traversal::Mesh(e) => return Err(SolveError::Mesh(e)),
        };
        self.metrics =
            TraversalMetrics::from_stats(phase, stats, self.record.suppressed(), elapsed_us);

        if self.record.is_set() {
            let message = self.record.message().unwrap_or_default();
            return Err(SolveError::TraversalFailed {
                phase: phase.to_string(),
                message,
            });
        }
        Ok(())
    }
}

/// How a traversal ended, before the fault flag is inspected.
enum Traversal {
    Ran { elapsed_us: u64 },
    Mesh(tessel_core::MeshError),
}

impl ProblemContext for FeProblem {
    fn has_exception(&self) -> bool {
        self.record.is_set()
    }

    fn set_exception(&self, message: String) -> bool {
        self.record.record(message)
    }

    fn exception_lock(&self) -> &ExceptionLock {
        &self.lock
    }
}
