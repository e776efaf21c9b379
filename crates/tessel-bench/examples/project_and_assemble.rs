//! End-to-end example.
//!
//! Demonstrates: build config → FeProblem → project initial conditions →
//! assemble a residual → inspect metrics, first cleanly and then with an
//! inverted element.

use tessel_bench::{reference_profile, LumpedMass};
use tessel_core::{ElementError, Real, VariableId};
use tessel_engine::{ElementData, ElementKernel, FeProblem, ParallelConfig, SolveError};
use tessel_loop::FaultPolicy;

fn main() {
    println!("=== Tessel projection + assembly ===\n");

    for threads in [1usize, 2, 4, 8] {
        let parallel = ParallelConfig {
            n_threads: Some(threads),
            ..ParallelConfig::default()
        };
        let mut problem = FeProblem::new(reference_profile(42, parallel)).unwrap();

        let written = problem.project_initial_conditions().unwrap();
        let project_us = problem.last_metrics().total_us;

        let residual = problem
            .compute_residual(&LumpedMass {
                variable: VariableId(0),
            })
            .unwrap();
        let m = problem.last_metrics();
        let total: Real = residual.iter().sum();

        println!(
            "  threads {:>2}: {written} values in {:>6}μs, residual sum={:>10.6} in {:>6}μs over {} leaves",
            threads, project_us, total, m.total_us, m.leaves,
        );
    }

    println!("\nInverted element, complete traversal:");
    let mut config = reference_profile(42, ParallelConfig::default());
    config.parallel.fault_policy = FaultPolicy::CompleteTraversal;
    let mut problem = FeProblem::new(config).unwrap();
    problem.project_initial_conditions().unwrap();
    let kernel = Flipped {
        inner: LumpedMass {
            variable: VariableId(0),
        },
    };
    match problem.compute_residual(&kernel) {
        Ok(_) => println!("  unexpected success"),
        Err(SolveError::TraversalFailed { message, .. }) => {
            let m = problem.last_metrics();
            println!(
                "  reported: {message}\n  failed={} suppressed={} visited={}",
                m.elements_failed, m.faults_suppressed, m.elements_visited
            );
        }
        Err(e) => println!("  error: {e}"),
    }
}

/// Fails on every 1000th element, as an inverted element would.
struct Flipped {
    inner: LumpedMass,
}

impl ElementKernel for Flipped {
    fn name(&self) -> &str {
        "flipped"
    }

    fn variable(&self) -> VariableId {
        self.inner.variable
    }

    fn compute(&self, data: &ElementData<'_>, local: &mut [Real]) -> Result<(), ElementError> {
        let id = data.element.id();
        if id.0 % 1000 == 999 {
            return Err(ElementError::NegativeJacobian {
                element: id,
                determinant: -data.measure,
            });
        }
        self.inner.compute(data, local)
    }
}
