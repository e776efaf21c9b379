//! Strongly-typed identifiers and the [`NodeList`] type alias.

use smallvec::SmallVec;
use std::fmt;

/// Identifies an element within a mesh.
///
/// Elements are numbered sequentially at mesh construction.
/// `ElementId(n)` is the n-th element in the mesh's canonical order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl ElementId {
    /// The id as a `usize` index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ElementId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a mesh node (vertex).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The id as a `usize` index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a field variable within a system.
///
/// Variables are registered with the system and assigned sequential IDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(pub u32);

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for VariableId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a mesh subdomain (block).
///
/// Every element belongs to exactly one subdomain. Structured meshes
/// start with all elements in `SubdomainId(0)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubdomainId(pub u16);

impl fmt::Display for SubdomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for SubdomainId {
    fn from(v: u16) -> Self {
        Self(v)
    }
}

/// Node connectivity of one element.
///
/// `SmallVec<[NodeId; 8]>` stores up to hex8 connectivity inline without
/// heap allocation.
pub type NodeList = SmallVec<[NodeId; 8]>;
