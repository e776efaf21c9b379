//! Problem configuration, validation, and error types.
//!
//! [`ProblemConfig`] is the builder input for constructing an
//! [`FeProblem`](crate::problem::FeProblem). [`validate()`](ProblemConfig::validate)
//! checks structural invariants before anything is allocated.

use std::error::Error;
use std::fmt;

use tessel_core::{IcError, InputParameters, MeshError, SubdomainId};
use tessel_loop::FaultPolicy;
use tessel_mesh::Mesh;

// ── ParallelConfig ─────────────────────────────────────────────────

/// Thread pool and traversal settings.
#[derive(Clone, Debug)]
pub struct ParallelConfig {
    /// Number of worker threads. `None` = auto-detect
    /// (`available_parallelism`, falling back to 4).
    pub n_threads: Option<usize>,
    /// Ranges of at most this many elements are not split further.
    /// Default: 64.
    pub grain_size: usize,
    /// What a traversal does once a fault is recorded. Default: cancel.
    pub fault_policy: FaultPolicy,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            n_threads: None,
            grain_size: 64,
            fault_policy: FaultPolicy::Cancel,
        }
    }
}

impl ParallelConfig {
    /// Resolve the actual thread count, applying auto-detection if `None`.
    ///
    /// Explicit values are clamped to `[1, 256]`.
    pub fn resolved_threads(&self) -> usize {
        match self.n_threads {
            Some(n) => n.clamp(1, 256),
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
        }
    }

    /// Check the settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grain_size == 0 {
            return Err(ConfigError::ZeroGrainSize);
        }
        if self.n_threads == Some(0) {
            return Err(ConfigError::ZeroThreads);
        }
        Ok(())
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while validating a [`ProblemConfig`] or building a
/// problem from it.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// The mesh has no elements.
    EmptyMesh,
    /// No variables registered.
    NoVariables,
    /// Two variables share a name.
    DuplicateVariable {
        /// The repeated name.
        name: String,
    },
    /// A variable is restricted to a subdomain the mesh does not contain.
    UnknownSubdomain {
        /// The variable.
        variable: String,
        /// The missing subdomain.
        subdomain: SubdomainId,
    },
    /// Node or variable count overflows the solution vector index.
    TooLarge {
        /// Nodes times variables.
        dofs: usize,
    },
    /// `grain_size` is zero.
    ZeroGrainSize,
    /// `n_threads` is `Some(0)`.
    ZeroThreads,
    /// The worker pool could not be started.
    ThreadPool {
        /// Description from the pool builder.
        reason: String,
    },
    /// An initial condition could not be built.
    InitialCondition(IcError),
    /// The mesh rejected an operation.
    Mesh(MeshError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMesh => write!(f, "mesh has no elements"),
            Self::NoVariables => write!(f, "no variables registered"),
            Self::DuplicateVariable { name } => write!(f, "variable '{name}' registered twice"),
            Self::UnknownSubdomain {
                variable,
                subdomain,
            } => write!(
                f,
                "variable '{variable}' is restricted to subdomain {subdomain}, which the mesh does not contain"
            ),
            Self::TooLarge { dofs } => write!(f, "{dofs} degrees of freedom exceed u32::MAX"),
            Self::ZeroGrainSize => write!(f, "grain_size must be at least 1"),
            Self::ZeroThreads => write!(f, "n_threads must be at least 1"),
            Self::ThreadPool { reason } => write!(f, "thread pool: {reason}"),
            Self::InitialCondition(e) => write!(f, "initial condition: {e}"),
            Self::Mesh(e) => write!(f, "mesh: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InitialCondition(e) => Some(e),
            Self::Mesh(e) => Some(e),
            _ => None,
        }
    }
}

impl From<IcError> for ConfigError {
    fn from(e: IcError) -> Self {
        Self::InitialCondition(e)
    }
}

impl From<MeshError> for ConfigError {
    fn from(e: MeshError) -> Self {
        Self::Mesh(e)
    }
}

// ── ProblemConfig ──────────────────────────────────────────────────

/// A variable declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableConfig {
    /// Unique name.
    pub name: String,
    /// Subdomains the variable lives on. `None` = whole mesh.
    pub subdomains: Option<Vec<SubdomainId>>,
}

/// An initial condition to build through the factory.
#[derive(Clone, Debug, PartialEq)]
pub struct IcConfig {
    /// Registered type name, e.g. `"ConstantIC"`.
    pub type_name: String,
    /// Instance name used in diagnostics.
    pub name: String,
    /// Raw parameters, validated against the type's schema at build time.
    pub params: InputParameters,
}

/// Everything needed to construct an [`FeProblem`](crate::problem::FeProblem).
pub struct ProblemConfig {
    /// The mesh. Owned by the problem once built.
    pub mesh: Box<dyn Mesh>,
    /// Variables in id order.
    pub variables: Vec<VariableConfig>,
    /// Initial conditions, built in order.
    pub initial_conditions: Vec<IcConfig>,
    /// Thread pool and traversal settings.
    pub parallel: ParallelConfig,
}

impl ProblemConfig {
    /// A configuration over `mesh` with no variables.
    pub fn new(mesh: impl Mesh + 'static) -> Self {
        Self {
            mesh: Box::new(mesh),
            variables: Vec::new(),
            initial_conditions: Vec::new(),
            parallel: ParallelConfig::default(),
        }
    }

    /// Add a whole-mesh variable. Builder style.
    pub fn variable(mut self, name: impl Into<String>) -> Self {
        self.variables.push(VariableConfig {
            name: name.into(),
            subdomains: None,
        });
        self
    }

    /// Add a variable restricted to `subdomains`. Builder style.
    pub fn block_variable(mut self, name: impl Into<String>, subdomains: Vec<SubdomainId>) -> Self {
        self.variables.push(VariableConfig {
            name: name.into(),
            subdomains: Some(subdomains),
        });
        self
    }

    /// Add an initial condition. Builder style.
    pub fn initial_condition(
        mut self,
        type_name: impl Into<String>,
        name: impl Into<String>,
        params: InputParameters,
    ) -> Self {
        self.initial_conditions.push(IcConfig {
            type_name: type_name.into(),
            name: name.into(),
            params,
        });
        self
    }

    /// Replace the parallel settings. Builder style.
    pub fn parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mesh.n_elements() == 0 {
            return Err(ConfigError::EmptyMesh);
        }
        if self.variables.is_empty() {
            return Err(ConfigError::NoVariables);
        }
        let dofs = self.mesh.n_nodes().saturating_mul(self.variables.len());
        if dofs > u32::MAX as usize {
            return Err(ConfigError::TooLarge { dofs });
        }

        let subdomains = self.mesh.subdomains();
        for (i, var) in self.variables.iter().enumerate() {
            if self.variables[..i].iter().any(|v| v.name == var.name) {
                return Err(ConfigError::DuplicateVariable {
                    name: var.name.clone(),
                });
            }
            for &s in var.subdomains.iter().flatten() {
                if !subdomains.contains(&s) {
                    return Err(ConfigError::UnknownSubdomain {
                        variable: var.name.clone(),
                        subdomain: s,
                    });
                }
            }
        }

        self.parallel.validate()
    }
}
