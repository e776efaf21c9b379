//! The core `Mesh` trait.

use crate::element::Element;
use crate::range::ElementRange;
use smallvec::SmallVec;
use tessel_core::{ElementId, MeshError, NodeId, Point, Real, SubdomainId};

/// Read-only view of a discretized domain.
///
/// Threaded loops borrow a mesh for the duration of a traversal and
/// obtain their initial [`ElementRange`] from it. Storage, partitioning,
/// and refinement are the implementor's concern.
///
/// # Thread Safety
///
/// `Sync` is required because every worker of a traversal reads the
/// same mesh concurrently.
pub trait Mesh: Send + Sync {
    /// Spatial dimension (1, 2 or 3).
    fn dim(&self) -> usize;

    /// All elements, in canonical order. `elements()[i].id() == ElementId(i)`.
    fn elements(&self) -> &[Element];

    /// Number of nodes.
    fn n_nodes(&self) -> usize;

    /// Position of a node, or `None` if the id is out of range.
    fn node(&self, id: NodeId) -> Option<Point>;

    /// Number of elements.
    fn n_elements(&self) -> usize {
        self.elements().len()
    }

    /// Look up an element by id.
    fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements().get(id.index())
    }

    /// Node positions of an element, in local node order.
    ///
    /// Nodes that do not resolve are skipped; meshes validate
    /// connectivity at construction so this does not happen in practice.
    fn element_points(&self, element: &Element) -> SmallVec<[Point; 8]> {
        element
            .nodes()
            .iter()
            .filter_map(|&n| self.node(n))
            .collect()
    }

    /// Arithmetic mean of an element's node positions.
    fn centroid(&self, element: &Element) -> Point {
        let pts = self.element_points(element);
        if pts.is_empty() {
            return Point::ORIGIN;
        }
        let n = pts.len() as Real;
        let (sx, sy, sz) = pts
            .iter()
            .fold((0.0, 0.0, 0.0), |(x, y, z), p| (x + p.x, y + p.y, z + p.z));
        Point::new(sx / n, sy / n, sz / n)
    }

    /// Signed measure of an element: length for EDGE2, area for planar
    /// polygons (shoelace, counter-clockwise positive).
    ///
    /// A non-positive value means the element is inverted.
    fn signed_measure(&self, element: &Element) -> Real {
        let pts = self.element_points(element);
        match pts.len() {
            0 | 1 => 0.0,
            2 => (pts[1] - pts[0]).norm() * (pts[1].x - pts[0].x).signum(),
            n => {
                let mut twice_area = 0.0;
                for i in 0..n {
                    let a = pts[i];
                    let b = pts[(i + 1) % n];
                    twice_area += a.x * b.y - b.x * a.y;
                }
                0.5 * twice_area
            }
        }
    }

    /// Distinct subdomain ids present in the mesh, ascending.
    fn subdomains(&self) -> Vec<SubdomainId> {
        let mut ids: Vec<SubdomainId> = self.elements().iter().map(|e| e.subdomain()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// The range over every element, splitting down to `grain_size`.
    fn element_range(&self, grain_size: usize) -> Result<ElementRange<'_>, MeshError> {
        ElementRange::new(self.elements(), grain_size)
    }
}
