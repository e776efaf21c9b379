//! Splittable, ordered element ranges.
//!
//! An [`ElementRange`] borrows a contiguous run of a mesh's elements.
//! Fork-join traversal divides it with [`split()`](ElementRange::split)
//! until each piece is no larger than the grain size, then visits the
//! leaves.

use crate::element::Element;
use tessel_core::MeshError;

/// An ordered, splittable view over mesh elements.
///
/// Non-owning: the mesh owns the elements and must outlive the range.
///
/// # Invariants
///
/// - Splitting a range of length `n` yields two ranges whose lengths sum
///   to `n` and whose concatenation, left then right, is the original
///   sequence.
/// - A range with `len() <= grain_size()` is not divisible.
///
/// # Examples
///
/// ```
/// use tessel_mesh::{Mesh, StructuredMesh};
///
/// let mesh = StructuredMesh::line(4, 0.0, 1.0).unwrap();
/// let range = mesh.element_range(1).unwrap();
/// let (left, right) = range.split();
/// assert_eq!(left.len() + right.len(), 4);
/// assert_eq!(range.leaves().len(), 4);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ElementRange<'a> {
    elements: &'a [Element],
    grain_size: usize,
}

impl<'a> ElementRange<'a> {
    /// Create a range over `elements` that splits down to `grain_size`.
    ///
    /// Returns `Err(MeshError::ZeroGrainSize)` if `grain_size == 0`.
    pub fn new(elements: &'a [Element], grain_size: usize) -> Result<Self, MeshError> {
        if grain_size == 0 {
            return Err(MeshError::ZeroGrainSize);
        }
        Ok(Self {
            elements,
            grain_size,
        })
    }

    /// Number of elements in the range.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the range has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The grain size this range splits down to.
    pub fn grain_size(&self) -> usize {
        self.grain_size
    }

    /// Returns `true` if the range is larger than its grain size.
    pub fn is_divisible(&self) -> bool {
        self.elements.len() > self.grain_size
    }

    /// Divide the range at its midpoint.
    ///
    /// The left half receives `len / 2` elements, the right half the
    /// remainder. Both halves keep this range's grain size. Callers
    /// should check [`is_divisible()`](Self::is_divisible) first; splitting
    /// a one-element range yields an empty left half.
    pub fn split(self) -> (Self, Self) {
        let mid = self.elements.len() / 2;
        let (left, right) = self.elements.split_at(mid);
        (
            Self {
                elements: left,
                grain_size: self.grain_size,
            },
            Self {
                elements: right,
                grain_size: self.grain_size,
            },
        )
    }

    /// Recursively split until no piece is divisible, returning the
    /// leaves in their original order.
    pub fn leaves(self) -> Vec<Self> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(self, out: &mut Vec<Self>) {
        if self.is_divisible() {
            let (left, right) = self.split();
            left.collect_leaves(out);
            right.collect_leaves(out);
        } else {
            out.push(self);
        }
    }

    /// The elements as a slice.
    pub fn as_slice(&self) -> &'a [Element] {
        self.elements
    }

    /// Iterate over the elements in order.
    pub fn iter(&self) -> std::slice::Iter<'a, Element> {
        self.elements.iter()
    }
}

impl<'a> IntoIterator for ElementRange<'a> {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;
    use crate::mesh::Mesh;
    use crate::structured::StructuredMesh;
    use proptest::prelude::*;
    use tessel_core::ElementId;

    #[test]
    fn zero_grain_rejected() {
        let mesh = StructuredMesh::line(3, 0.0, 1.0).unwrap();
        assert_eq!(
            mesh.element_range(0).unwrap_err(),
            MeshError::ZeroGrainSize
        );
    }

    #[test]
    fn four_elements_split_two_then_one() {
        let mesh = StructuredMesh::line(4, 0.0, 1.0).unwrap();
        let range = mesh.element_range(1).unwrap();

        let (l, r) = range.split();
        assert_eq!(l.len(), 2);
        assert_eq!(r.len(), 2);

        let (ll, lr) = l.split();
        let (rl, rr) = r.split();
        let flat: Vec<ElementId> = [ll, lr, rl, rr]
            .iter()
            .flat_map(|leaf| leaf.iter().map(|e| e.id()))
            .collect();
        assert_eq!(flat, vec![ElementId(0), ElementId(1), ElementId(2), ElementId(3)]);
    }

    #[test]
    fn range_at_grain_size_does_not_divide() {
        let mesh = StructuredMesh::line(100, 0.0, 1.0).unwrap();
        let range = mesh.element_range(100).unwrap();
        assert!(!range.is_divisible());
        assert_eq!(range.leaves().len(), 1);
    }

    #[test]
    fn odd_split_puts_extra_on_the_right() {
        let mesh = StructuredMesh::line(5, 0.0, 1.0).unwrap();
        let (l, r) = mesh.element_range(1).unwrap().split();
        assert_eq!((l.len(), r.len()), (2, 3));
    }

    #[test]
    fn leaves_of_thousand_by_hundred_are_bounded() {
        let mesh = StructuredMesh::line(1000, 0.0, 1.0).unwrap();
        let range = mesh.element_range(100).unwrap();
        compliance::assert_split_partitions(range);
        for leaf in range.leaves() {
            assert!(leaf.len() <= 100);
            assert!(!leaf.is_empty());
        }
    }

    proptest! {
        #[test]
        fn split_reconstructs_original(n in 1u32..600, grain in 1usize..64) {
            let mesh = StructuredMesh::line(n, 0.0, 1.0).unwrap();
            let range = mesh.element_range(grain).unwrap();
            compliance::assert_split_partitions(range);
        }

        #[test]
        fn single_split_sums_to_len(n in 2u32..600) {
            let mesh = StructuredMesh::line(n, 0.0, 1.0).unwrap();
            let range = mesh.element_range(1).unwrap();
            let (l, r) = range.split();
            prop_assert_eq!(l.len() + r.len(), range.len());
            prop_assert!(!l.is_empty() && !r.is_empty());
        }
    }
}
