//! Parameter bags and their validation.
//!
//! Objects such as initial conditions are configured from an
//! [`InputParameters`] bag. A [`ParamSchema`] declares which parameters a
//! type accepts; [`ParamSchema::validate()`] checks a raw bag against it,
//! fills defaults, and returns a [`ValidParams`]. Constructors only ever
//! see `ValidParams`, so they read values without re-validating.

use indexmap::IndexMap;
use std::fmt;

use crate::error::ParamError;
use crate::geometry::Real;

/// A single parameter value.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    /// A real number.
    Real(Real),
    /// A signed integer.
    Int(i64),
    /// A boolean flag.
    Bool(bool),
    /// A string.
    Str(String),
    /// A list of real numbers.
    RealVec(Vec<Real>),
}

impl ParamValue {
    /// The kind of this value.
    pub fn kind(&self) -> ParamKind {
        match self {
            Self::Real(_) => ParamKind::Real,
            Self::Int(_) => ParamKind::Int,
            Self::Bool(_) => ParamKind::Bool,
            Self::Str(_) => ParamKind::Str,
            Self::RealVec(_) => ParamKind::RealVec,
        }
    }
}

impl From<Real> for ParamValue {
    fn from(v: Real) -> Self {
        Self::Real(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Vec<Real>> for ParamValue {
    fn from(v: Vec<Real>) -> Self {
        Self::RealVec(v)
    }
}

/// The declared kind of a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    /// [`ParamValue::Real`]. Integers are accepted and promoted.
    Real,
    /// [`ParamValue::Int`].
    Int,
    /// [`ParamValue::Bool`].
    Bool,
    /// [`ParamValue::Str`].
    Str,
    /// [`ParamValue::RealVec`].
    RealVec,
}

impl ParamKind {
    /// Name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Real => "real",
            Self::Int => "integer",
            Self::Bool => "bool",
            Self::Str => "string",
            Self::RealVec => "real vector",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An ordered, unvalidated bag of named parameters.
///
/// Insertion order is preserved so diagnostics list parameters in the
/// order the user wrote them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputParameters {
    values: IndexMap<String, ParamValue>,
}

impl InputParameters {
    /// An empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing any previous value. Builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a parameter, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Look up a parameter.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// Returns `true` if the parameter is present.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Declaration of one parameter within a [`ParamSchema`].
#[derive(Clone, Debug)]
pub struct ParamSpec {
    /// Declared kind.
    pub kind: ParamKind,
    /// Value used when the parameter is omitted. `None` means required.
    pub default: Option<ParamValue>,
    /// One-line description for help output.
    pub doc: &'static str,
}

/// Cross-parameter check run after per-parameter validation.
pub type SchemaCheck = fn(&InputParameters) -> Result<(), ParamError>;

/// The set of parameters a type accepts.
///
/// # Examples
///
/// ```
/// use tessel_core::{InputParameters, ParamKind, ParamSchema};
///
/// let schema = ParamSchema::new()
///     .required("value", ParamKind::Real, "The constant value")
///     .optional("scale", 1.0, "Multiplier");
///
/// let raw = InputParameters::new().with("value", 3.0);
/// let valid = schema.validate(&raw).unwrap();
/// assert_eq!(valid.real("value").unwrap(), 3.0);
/// assert_eq!(valid.real("scale").unwrap(), 1.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ParamSchema {
    specs: IndexMap<&'static str, ParamSpec>,
    checks: Vec<SchemaCheck>,
}

impl ParamSchema {
    /// An empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a required parameter.
    pub fn required(mut self, name: &'static str, kind: ParamKind, doc: &'static str) -> Self {
        self.specs.insert(
            name,
            ParamSpec {
                kind,
                default: None,
                doc,
            },
        );
        self
    }

    /// Declare an optional parameter with a default. The kind is taken
    /// from the default value.
    pub fn optional(
        mut self,
        name: &'static str,
        default: impl Into<ParamValue>,
        doc: &'static str,
    ) -> Self {
        let default = default.into();
        self.specs.insert(
            name,
            ParamSpec {
                kind: default.kind(),
                default: Some(default),
                doc,
            },
        );
        self
    }

    /// Add a cross-parameter check, run on the defaulted bag.
    pub fn check(mut self, check: SchemaCheck) -> Self {
        self.checks.push(check);
        self
    }

    /// Look up a parameter declaration.
    pub fn spec(&self, name: &str) -> Option<&ParamSpec> {
        self.specs.get(name)
    }

    /// Iterate over declared parameters in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ParamSpec)> {
        self.specs.iter().map(|(k, v)| (*k, v))
    }

    /// Validate a raw bag against this schema.
    ///
    /// Rejects unknown parameters, missing required parameters, and
    /// kind mismatches (an `Int` supplied for a `Real` parameter is
    /// promoted). Omitted optional parameters take their defaults.
    pub fn validate(&self, raw: &InputParameters) -> Result<ValidParams, ParamError> {
        for (name, _) in raw.iter() {
            if !self.specs.contains_key(name) {
                return Err(ParamError::Unknown {
                    name: name.to_string(),
                });
            }
        }

        let mut out = InputParameters::new();
        for (name, spec) in &self.specs {
            let value = match (raw.get(name), &spec.default) {
                (Some(v), _) => coerce(name, spec.kind, v)?,
                (None, Some(default)) => default.clone(),
                (None, None) => {
                    return Err(ParamError::Missing {
                        name: name.to_string(),
                    })
                }
            };
            out.set(*name, value);
        }

        for check in &self.checks {
            check(&out)?;
        }
        Ok(ValidParams { inner: out })
    }
}

fn coerce(name: &str, kind: ParamKind, value: &ParamValue) -> Result<ParamValue, ParamError> {
    match (kind, value) {
        (ParamKind::Real, ParamValue::Int(i)) => Ok(ParamValue::Real(*i as Real)),
        (k, v) if v.kind() == k => Ok(v.clone()),
        (k, v) => Err(ParamError::WrongKind {
            name: name.to_string(),
            expected: k.name(),
            found: v.kind().name(),
        }),
    }
}

/// A parameter bag that has passed [`ParamSchema::validate()`].
///
/// Every declared parameter is present with the declared kind. Typed
/// getters still return `Result` so that asking for an undeclared name
/// is reported instead of panicking.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidParams {
    inner: InputParameters,
}

impl ValidParams {
    /// The underlying bag.
    pub fn as_input(&self) -> &InputParameters {
        &self.inner
    }

    fn lookup(&self, name: &str) -> Result<&ParamValue, ParamError> {
        self.inner.get(name).ok_or_else(|| ParamError::Missing {
            name: name.to_string(),
        })
    }

    fn mismatch(name: &str, expected: ParamKind, found: &ParamValue) -> ParamError {
        ParamError::WrongKind {
            name: name.to_string(),
            expected: expected.name(),
            found: found.kind().name(),
        }
    }

    /// Read a real parameter.
    pub fn real(&self, name: &str) -> Result<Real, ParamError> {
        match self.lookup(name)? {
            ParamValue::Real(v) => Ok(*v),
            other => Err(Self::mismatch(name, ParamKind::Real, other)),
        }
    }

    /// Read an integer parameter.
    pub fn int(&self, name: &str) -> Result<i64, ParamError> {
        match self.lookup(name)? {
            ParamValue::Int(v) => Ok(*v),
            other => Err(Self::mismatch(name, ParamKind::Int, other)),
        }
    }

    /// Read a boolean parameter.
    pub fn bool(&self, name: &str) -> Result<bool, ParamError> {
        match self.lookup(name)? {
            ParamValue::Bool(v) => Ok(*v),
            other => Err(Self::mismatch(name, ParamKind::Bool, other)),
        }
    }

    /// Read a string parameter.
    pub fn str(&self, name: &str) -> Result<&str, ParamError> {
        match self.lookup(name)? {
            ParamValue::Str(v) => Ok(v),
            other => Err(Self::mismatch(name, ParamKind::Str, other)),
        }
    }

    /// Read a real-vector parameter.
    pub fn real_vec(&self, name: &str) -> Result<&[Real], ParamError> {
        match self.lookup(name)? {
            ParamValue::RealVec(v) => Ok(v),
            other => Err(Self::mismatch(name, ParamKind::RealVec, other)),
        }
    }
}
