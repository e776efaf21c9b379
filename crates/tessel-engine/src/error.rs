//! Problem-level failures.

use std::error::Error;
use std::fmt;

use tessel_core::{IcError, MeshError, VariableId};

/// Why a problem operation failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveError {
    /// A traversal finished with the problem's exception flag set.
    ///
    /// `message` is the single recorded fault; others raised in the same
    /// traversal are counted in the metrics but not reported.
    TraversalFailed {
        /// The operation that was running.
        phase: String,
        /// The recorded fault message.
        message: String,
    },
    /// The operation named a variable the system does not have.
    UnknownVariable {
        /// The requested variable.
        variable: VariableId,
    },
    /// An initial condition could not be added.
    InitialCondition(IcError),
    /// The mesh rejected an operation.
    Mesh(MeshError),
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TraversalFailed { phase, message } => {
                write!(f, "{phase} traversal failed: {message}")
            }
            Self::UnknownVariable { variable } => write!(f, "unknown variable {variable}"),
            Self::InitialCondition(e) => write!(f, "initial condition: {e}"),
            Self::Mesh(e) => write!(f, "mesh: {e}"),
        }
    }
}

impl Error for SolveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InitialCondition(e) => Some(e),
            Self::Mesh(e) => Some(e),
            _ => None,
        }
    }
}

impl From<IcError> for SolveError {
    fn from(e: IcError) -> Self {
        Self::InitialCondition(e)
    }
}

impl From<MeshError> for SolveError {
    fn from(e: MeshError) -> Self {
        Self::Mesh(e)
    }
}
