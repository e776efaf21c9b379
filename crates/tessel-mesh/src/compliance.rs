//! Range and mesh compliance test helpers.
//!
//! These functions verify the invariants the traversal engine relies on.
//! Reused across the range and structured-mesh test modules.

use crate::mesh::Mesh;
use crate::range::ElementRange;
use tessel_core::ElementId;

/// Assert that the leaves of `range`, concatenated in order, visit every
/// element of `range` exactly once and in its original order.
pub fn assert_split_partitions(range: ElementRange<'_>) {
    let original: Vec<ElementId> = range.iter().map(|e| e.id()).collect();
    let leaves = range.leaves();
    let flattened: Vec<ElementId> = leaves
        .iter()
        .flat_map(|leaf| leaf.iter().map(|e| e.id()))
        .collect();
    assert_eq!(
        flattened, original,
        "leaves do not reconstruct the original range"
    );
    for leaf in &leaves {
        assert!(
            !leaf.is_divisible(),
            "leaf of length {} still divisible at grain {}",
            leaf.len(),
            leaf.grain_size()
        );
    }
}

/// Assert that element ids match their position and that every node
/// referenced by an element resolves.
pub fn assert_connectivity_consistent(mesh: &dyn Mesh) {
    for (i, elem) in mesh.elements().iter().enumerate() {
        assert_eq!(elem.id().index(), i, "element id out of canonical order");
        for &n in elem.nodes() {
            assert!(
                mesh.node(n).is_some(),
                "element {} references missing node {n}",
                elem.id()
            );
        }
    }
}

/// Assert that every element has a strictly positive measure.
pub fn assert_elements_not_inverted(mesh: &dyn Mesh) {
    for elem in mesh.elements() {
        let m = mesh.signed_measure(elem);
        assert!(m > 0.0, "element {} has measure {m}", elem.id());
    }
}
