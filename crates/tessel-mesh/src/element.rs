//! Mesh elements.

use tessel_core::{ElementId, NodeId, NodeList, SubdomainId};

/// One element of a mesh: its id, its subdomain, and its node
/// connectivity.
///
/// Geometry lives on the mesh; an element only names its nodes. Use
/// [`Mesh::element_points`](crate::Mesh::element_points) to resolve them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    id: ElementId,
    subdomain: SubdomainId,
    nodes: NodeList,
}

impl Element {
    /// Construct an element.
    pub fn new(id: ElementId, subdomain: SubdomainId, nodes: NodeList) -> Self {
        Self {
            id,
            subdomain,
            nodes,
        }
    }

    /// Element id.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Subdomain the element belongs to.
    pub fn subdomain(&self) -> SubdomainId {
        self.subdomain
    }

    /// Node ids in local order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Number of nodes.
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn set_subdomain(&mut self, subdomain: SubdomainId) {
        self.subdomain = subdomain;
    }
}
