//! Error types for the Tessel finite-element framework.
//!
//! Organized by subsystem: per-element faults raised inside threaded
//! loops, mesh construction, parameter validation, and initial-condition
//! construction. Problem-level errors live in `tessel-engine`.

use std::error::Error;
use std::fmt;

use crate::id::{ElementId, VariableId};

/// A fault raised by a per-element operation.
///
/// Returned from `ElementOperation::on_element()`. The threaded loop
/// catches it at the loop boundary and records its message on the
/// problem context; it never crosses a thread boundary.
#[derive(Clone, Debug, PartialEq)]
pub enum ElementError {
    /// The element mapping has a non-positive Jacobian determinant.
    NegativeJacobian {
        /// The inverted element.
        element: ElementId,
        /// The offending determinant.
        determinant: f64,
    },
    /// A material or kernel evaluation failed on this element.
    EvaluationFailed {
        /// The element being visited.
        element: ElementId,
        /// Human-readable description of the failure.
        reason: String,
    },
    /// A computed value was NaN or infinite.
    NonFinite {
        /// The element being visited.
        element: ElementId,
        /// What produced the value (e.g. an initial condition name).
        origin: String,
    },
    /// The per-element body panicked; the panic was caught at the loop
    /// boundary.
    Panicked {
        /// The element being visited.
        element: ElementId,
        /// The panic payload, if it was a string.
        message: String,
    },
    /// A loop hook (`pre`, `post`, `on_subdomain_changed`, `fork` or
    /// `join`) panicked outside any single element visit.
    HookPanicked {
        /// Which hook panicked.
        hook: &'static str,
        /// The panic payload, if it was a string.
        message: String,
    },
}

impl ElementError {
    /// The element that raised this fault, if it came from an element
    /// visit.
    pub fn element(&self) -> Option<ElementId> {
        match self {
            Self::NegativeJacobian { element, .. }
            | Self::EvaluationFailed { element, .. }
            | Self::NonFinite { element, .. }
            | Self::Panicked { element, .. } => Some(*element),
            Self::HookPanicked { .. } => None,
        }
    }
}

impl fmt::Display for ElementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeJacobian {
                element,
                determinant,
            } => write!(
                f,
                "negative jacobian {determinant} on element {element}"
            ),
            Self::EvaluationFailed { element, reason } => {
                write!(f, "evaluation failed on element {element}: {reason}")
            }
            Self::NonFinite { element, origin } => {
                write!(f, "non-finite value from '{origin}' on element {element}")
            }
            Self::Panicked { element, message } => {
                write!(f, "panic while visiting element {element}: {message}")
            }
            Self::HookPanicked { hook, message } => {
                write!(f, "panic in '{hook}' hook: {message}")
            }
        }
    }
}

impl Error for ElementError {}

/// Errors arising from mesh construction or range creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MeshError {
    /// Attempted to construct a mesh with zero elements.
    EmptyMesh,
    /// A dimension exceeds what element/node ids can address.
    TooLarge {
        /// Which quantity overflowed.
        name: &'static str,
        /// The requested value.
        value: usize,
    },
    /// The physical extent is empty or inverted.
    InvalidExtent {
        /// Description of the bad extent.
        reason: String,
    },
    /// Grain size must be at least 1.
    ZeroGrainSize,
    /// An element references a node that does not exist.
    DanglingNode {
        /// The element with the bad connectivity.
        element: ElementId,
    },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMesh => write!(f, "mesh must have at least one element"),
            Self::TooLarge { name, value } => {
                write!(f, "{name} = {value} exceeds u32::MAX")
            }
            Self::InvalidExtent { reason } => write!(f, "invalid extent: {reason}"),
            Self::ZeroGrainSize => write!(f, "grain size must be at least 1"),
            Self::DanglingNode { element } => {
                write!(f, "element {element} references a missing node")
            }
        }
    }
}

impl Error for MeshError {}

/// Errors from parameter validation.
///
/// Produced by `ParamSchema::validate()` before any object is built from
/// the parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamError {
    /// A required parameter was not supplied.
    Missing {
        /// Parameter name.
        name: String,
    },
    /// A parameter was supplied that the schema does not declare.
    Unknown {
        /// Parameter name.
        name: String,
    },
    /// A parameter has the wrong value kind.
    WrongKind {
        /// Parameter name.
        name: String,
        /// The kind the schema declares.
        expected: &'static str,
        /// The kind that was supplied.
        found: &'static str,
    },
    /// A parameter value violates a declared constraint.
    OutOfRange {
        /// Parameter name.
        name: String,
        /// Description of the violated constraint.
        reason: String,
    },
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { name } => write!(f, "missing required parameter '{name}'"),
            Self::Unknown { name } => write!(f, "unknown parameter '{name}'"),
            Self::WrongKind {
                name,
                expected,
                found,
            } => write!(f, "parameter '{name}' expects {expected}, got {found}"),
            Self::OutOfRange { name, reason } => {
                write!(f, "parameter '{name}' out of range: {reason}")
            }
        }
    }
}

impl Error for ParamError {}

/// Errors from building or binding an initial condition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IcError {
    /// Parameter validation failed.
    Params {
        /// Name of the initial condition being built.
        name: String,
        /// The underlying validation error.
        reason: ParamError,
    },
    /// No initial condition type is registered under this name.
    UnknownType {
        /// The requested type name.
        type_name: String,
    },
    /// The initial condition names a variable the system does not have.
    UnknownVariable {
        /// The variable name.
        variable: String,
    },
    /// More than one initial condition targets the same variable and
    /// subdomain.
    Duplicate {
        /// The variable.
        variable: VariableId,
        /// Name of the initial condition that was rejected.
        name: String,
    },
}

impl fmt::Display for IcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Params { name, reason } => {
                write!(f, "initial condition '{name}': {reason}")
            }
            Self::UnknownType { type_name } => {
                write!(f, "no initial condition type '{type_name}' registered")
            }
            Self::UnknownVariable { variable } => {
                write!(f, "unknown variable '{variable}'")
            }
            Self::Duplicate { variable, name } => write!(
                f,
                "initial condition '{name}' duplicates an existing one for variable {variable}"
            ),
        }
    }
}

impl Error for IcError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Params { reason, .. } => Some(reason),
            _ => None,
        }
    }
}
