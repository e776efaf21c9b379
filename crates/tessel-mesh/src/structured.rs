//! Generated structured meshes and explicit-connectivity meshes.

use crate::element::Element;
use crate::mesh::Mesh;
use smallvec::smallvec;
use tessel_core::{ElementId, MeshError, NodeId, NodeList, Point, Real, SubdomainId};

/// An in-memory mesh with explicit node positions and connectivity.
///
/// Generators cover uniform EDGE2 lines and QUAD4 grids. Arbitrary
/// meshes (including deliberately inverted ones for testing) can be
/// assembled with [`from_parts`](Self::from_parts).
///
/// # Examples
///
/// ```
/// use tessel_mesh::{Mesh, StructuredMesh};
///
/// let mesh = StructuredMesh::quad(4, 2, (0.0, 0.0), (2.0, 1.0)).unwrap();
/// assert_eq!(mesh.dim(), 2);
/// assert_eq!(mesh.n_elements(), 8);
/// assert_eq!(mesh.n_nodes(), 15);
/// ```
#[derive(Clone, Debug)]
pub struct StructuredMesh {
    dim: usize,
    points: Vec<Point>,
    elements: Vec<Element>,
}

impl StructuredMesh {
    /// A uniform 1D mesh of `n` EDGE2 elements on `[x0, x1]`.
    pub fn line(n: u32, x0: Real, x1: Real) -> Result<Self, MeshError> {
        if n == 0 {
            return Err(MeshError::EmptyMesh);
        }
        if !(x1 > x0) {
            return Err(MeshError::InvalidExtent {
                reason: format!("x1 ({x1}) must exceed x0 ({x0})"),
            });
        }
        // n + 1 nodes must fit in u32.
        if n == u32::MAX {
            return Err(MeshError::TooLarge {
                name: "nodes",
                value: n as usize + 1,
            });
        }
        let h = (x1 - x0) / n as Real;
        let points = (0..=n)
            .map(|i| Point::new(x0 + h * i as Real, 0.0, 0.0))
            .collect();
        let elements = (0..n)
            .map(|i| Element::new(ElementId(i), SubdomainId(0), smallvec![NodeId(i), NodeId(i + 1)]))
            .collect();
        Ok(Self {
            dim: 1,
            points,
            elements,
        })
    }

    /// A uniform 2D mesh of `nx * ny` QUAD4 elements over the rectangle
    /// with corners `lo` and `hi`.
    ///
    /// Elements are numbered row-major (x fastest); nodes are listed
    /// counter-clockwise so every element has positive area.
    pub fn quad(nx: u32, ny: u32, lo: (Real, Real), hi: (Real, Real)) -> Result<Self, MeshError> {
        if nx == 0 || ny == 0 {
            return Err(MeshError::EmptyMesh);
        }
        if !(hi.0 > lo.0 && hi.1 > lo.1) {
            return Err(MeshError::InvalidExtent {
                reason: format!("upper corner {hi:?} must exceed lower corner {lo:?}"),
            });
        }
        let n_nodes = (nx as usize + 1) * (ny as usize + 1);
        if n_nodes > u32::MAX as usize {
            return Err(MeshError::TooLarge {
                name: "nodes",
                value: n_nodes,
            });
        }
        let n_elems = nx as usize * ny as usize;
        if n_elems > u32::MAX as usize {
            return Err(MeshError::TooLarge {
                name: "elements",
                value: n_elems,
            });
        }

        let hx = (hi.0 - lo.0) / nx as Real;
        let hy = (hi.1 - lo.1) / ny as Real;
        let mut points = Vec::with_capacity(n_nodes);
        for j in 0..=ny {
            for i in 0..=nx {
                points.push(Point::new(lo.0 + hx * i as Real, lo.1 + hy * j as Real, 0.0));
            }
        }

        let row = nx + 1;
        let mut elements = Vec::with_capacity(n_elems);
        for j in 0..ny {
            for i in 0..nx {
                let n0 = j * row + i;
                let nodes: NodeList = smallvec![
                    NodeId(n0),
                    NodeId(n0 + 1),
                    NodeId(n0 + row + 1),
                    NodeId(n0 + row),
                ];
                let id = ElementId(j * nx + i);
                elements.push(Element::new(id, SubdomainId(0), nodes));
            }
        }

        Ok(Self {
            dim: 2,
            points,
            elements,
        })
    }

    /// Build a mesh from explicit node positions and per-element
    /// `(subdomain, nodes)` connectivity. Element ids are assigned in
    /// order.
    ///
    /// Returns `Err(MeshError::DanglingNode)` if any element references a
    /// node index outside `points`.
    pub fn from_parts(
        dim: usize,
        points: Vec<Point>,
        connectivity: Vec<(SubdomainId, NodeList)>,
    ) -> Result<Self, MeshError> {
        if connectivity.is_empty() {
            return Err(MeshError::EmptyMesh);
        }
        if connectivity.len() > u32::MAX as usize {
            return Err(MeshError::TooLarge {
                name: "elements",
                value: connectivity.len(),
            });
        }
        let mut elements = Vec::with_capacity(connectivity.len());
        for (i, (subdomain, nodes)) in connectivity.into_iter().enumerate() {
            // Bounded by the u32::MAX check above.
            let id = ElementId(i as u32);
            if nodes.iter().any(|n| n.index() >= points.len()) {
                return Err(MeshError::DanglingNode { element: id });
            }
            elements.push(Element::new(id, subdomain, nodes));
        }
        Ok(Self {
            dim,
            points,
            elements,
        })
    }

    /// Assign `subdomain` to every element whose centroid lies inside the
    /// axis-aligned box `[lo, hi]` (inclusive). Returns how many elements
    /// were reassigned.
    pub fn set_subdomain_in_box(&mut self, lo: Point, hi: Point, subdomain: SubdomainId) -> usize {
        let inside: Vec<usize> = self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| {
                let c = self.centroid(e);
                (0..3).all(|axis| {
                    let v = c.component(axis);
                    v >= lo.component(axis) && v <= hi.component(axis)
                })
            })
            .map(|(i, _)| i)
            .collect();
        for &i in &inside {
            self.elements[i].set_subdomain(subdomain);
        }
        inside.len()
    }

    /// All node positions, indexed by `NodeId`.
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

impl Mesh for StructuredMesh {
    fn dim(&self) -> usize {
        self.dim
    }

    fn elements(&self) -> &[Element] {
        &self.elements
    }

    fn n_nodes(&self) -> usize {
        self.points.len()
    }

    fn node(&self, id: NodeId) -> Option<Point> {
        self.points.get(id.index()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;

    #[test]
    fn line_has_n_elements_and_n_plus_one_nodes() {
        let mesh = StructuredMesh::line(10, 0.0, 2.0).unwrap();
        assert_eq!(mesh.n_elements(), 10);
        assert_eq!(mesh.n_nodes(), 11);
        assert_eq!(mesh.dim(), 1);
        compliance::assert_connectivity_consistent(&mesh);
        compliance::assert_elements_not_inverted(&mesh);
    }

    #[test]
    fn line_rejects_empty_and_inverted_extent() {
        assert_eq!(
            StructuredMesh::line(0, 0.0, 1.0).unwrap_err(),
            MeshError::EmptyMesh
        );
        assert!(matches!(
            StructuredMesh::line(3, 1.0, 0.0),
            Err(MeshError::InvalidExtent { .. })
        ));
    }

    #[test]
    fn quad_elements_have_positive_area() {
        let mesh = StructuredMesh::quad(3, 2, (0.0, 0.0), (3.0, 2.0)).unwrap();
        compliance::assert_connectivity_consistent(&mesh);
        compliance::assert_elements_not_inverted(&mesh);
        for e in mesh.elements() {
            assert!((mesh.signed_measure(e) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn quad_centroids_are_cell_centres() {
        let mesh = StructuredMesh::quad(2, 2, (0.0, 0.0), (2.0, 2.0)).unwrap();
        let c = mesh.centroid(&mesh.elements()[3]);
        assert!((c.x - 1.5).abs() < 1e-12);
        assert!((c.y - 1.5).abs() < 1e-12);
    }

    #[test]
    fn from_parts_rejects_dangling_node() {
        let points = vec![Point::new(0.0, 0.0, 0.0), Point::new(1.0, 0.0, 0.0)];
        let err = StructuredMesh::from_parts(
            1,
            points,
            vec![(SubdomainId(0), smallvec![NodeId(0), NodeId(5)])],
        )
        .unwrap_err();
        assert_eq!(err, MeshError::DanglingNode { element: ElementId(0) });
    }

    #[test]
    fn reversed_edge_is_inverted() {
        let points = vec![Point::new(0.0, 0.0, 0.0), Point::new(1.0, 0.0, 0.0)];
        let mesh = StructuredMesh::from_parts(
            1,
            points,
            vec![(SubdomainId(0), smallvec![NodeId(1), NodeId(0)])],
        )
        .unwrap();
        assert!(mesh.signed_measure(&mesh.elements()[0]) < 0.0);
    }

    #[test]
    fn subdomain_box_reassigns_matching_elements() {
        let mut mesh = StructuredMesh::line(10, 0.0, 1.0).unwrap();
        let moved = mesh.set_subdomain_in_box(
            Point::new(0.5, -1.0, -1.0),
            Point::new(1.0, 1.0, 1.0),
            SubdomainId(1),
        );
        assert_eq!(moved, 5);
        assert_eq!(mesh.subdomains(), vec![SubdomainId(0), SubdomainId(1)]);
        assert_eq!(mesh.elements()[9].subdomain(), SubdomainId(1));
        assert_eq!(mesh.elements()[0].subdomain(), SubdomainId(0));
    }
}
