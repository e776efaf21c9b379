//! Benchmark profiles and utilities for the Tessel element loop.
//!
//! Provides pre-built [`ProblemConfig`] profiles for benchmarking and examples:
//!
//! - [`reference_profile`]: 100x100 QUAD4 mesh (10K elements) with a random initial condition
//! - [`stress_profile`]: 316x316 QUAD4 mesh (~100K elements) for stress testing
//! - [`LumpedMass`]: a cheap residual kernel that touches every node

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use tessel_core::{ElementError, InputParameters, Real, VariableId};
use tessel_engine::{ElementData, ElementKernel, ParallelConfig, ProblemConfig};
use tessel_mesh::StructuredMesh;

/// Build a reference benchmark profile: 100x100 unit-square mesh.
///
/// One variable `u` with a seeded `RandomIC` in `[0, 1)`.
pub fn reference_profile(seed: i64, parallel: ParallelConfig) -> ProblemConfig {
    square_profile(100, seed, parallel)
}

/// Build a stress benchmark profile: 316x316 unit-square mesh.
///
/// Same setup as [`reference_profile`] at 10x the element count.
pub fn stress_profile(seed: i64, parallel: ParallelConfig) -> ProblemConfig {
    square_profile(316, seed, parallel)
}

fn square_profile(n: u32, seed: i64, parallel: ParallelConfig) -> ProblemConfig {
    let mesh = StructuredMesh::quad(n, n, (0.0, 0.0), (1.0, 1.0))
        .unwrap_or_else(|e| panic!("profile mesh {n}x{n}: {e}"));
    ProblemConfig::new(mesh)
        .variable("u")
        .initial_condition(
            "RandomIC",
            "noise",
            InputParameters::new()
                .with("variable", "u")
                .with("seed", seed),
        )
        .parallel(parallel)
}

/// Lumped mass residual: each node receives `measure / n_nodes * u`.
pub struct LumpedMass {
    /// The variable assembled.
    pub variable: VariableId,
}

impl ElementKernel for LumpedMass {
    fn name(&self) -> &str {
        "lumped_mass"
    }

    fn variable(&self) -> VariableId {
        self.variable
    }

    fn compute(&self, data: &ElementData<'_>, local: &mut [Real]) -> Result<(), ElementError> {
        let share = data.measure / local.len() as Real;
        for (r, u) in local.iter_mut().zip(&data.u) {
            *r = share * u;
        }
        Ok(())
    }
}
