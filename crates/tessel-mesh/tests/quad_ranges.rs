//! Range splitting over generated quad meshes with mixed subdomains.

use tessel_core::{ElementId, Point, SubdomainId};
use tessel_mesh::{Mesh, StructuredMesh};

#[test]
fn quad_leaves_tile_the_mesh_in_order() {
    let mesh = StructuredMesh::quad(8, 5, (0.0, 0.0), (4.0, 1.0)).unwrap();
    let range = mesh.element_range(3).unwrap();
    let leaves = range.leaves();

    assert!(leaves.iter().all(|l| !l.is_divisible() && !l.is_empty()));
    let ids: Vec<ElementId> = leaves.iter().flat_map(|l| l.iter().map(|e| e.id())).collect();
    let expected: Vec<ElementId> = (0..40).map(ElementId).collect();
    assert_eq!(ids, expected);
}

#[test]
fn subdomain_box_reassigns_left_half() {
    let mut mesh = StructuredMesh::quad(4, 2, (0.0, 0.0), (4.0, 2.0)).unwrap();
    let moved = mesh.set_subdomain_in_box(
        Point::new(0.0, 0.0, -1.0),
        Point::new(2.0, 2.0, 1.0),
        SubdomainId(3),
    );
    assert_eq!(moved, 4);
    assert_eq!(mesh.subdomains(), vec![SubdomainId(0), SubdomainId(3)]);
    for e in mesh.elements() {
        let left = mesh.centroid(e).x < 2.0;
        assert_eq!(e.subdomain() == SubdomainId(3), left);
    }
}

#[test]
fn every_quad_has_positive_area() {
    let mesh = StructuredMesh::quad(3, 3, (-1.0, -1.0), (1.0, 1.0)).unwrap();
    let total: f64 = mesh.elements().iter().map(|e| mesh.signed_measure(e)).sum();
    assert!(mesh.elements().iter().all(|e| mesh.signed_measure(e) > 0.0));
    assert!((total - 4.0).abs() < 1e-12);
}
