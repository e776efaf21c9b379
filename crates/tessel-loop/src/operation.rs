//! The [`ElementOperation`] trait: the per-element hole a loop fills.

use crate::context::VisitContext;
use tessel_core::{ElementError, SubdomainId};
use tessel_mesh::Element;

/// Work performed on every element of a traversal.
///
/// # Fork/join contract
///
/// - [`fork()`](Self::fork) is the split constructor. The copy shares
///   whatever read-only configuration the operation borrows but starts
///   with empty local scratch. It never deep-copies accumulated results.
/// - [`on_element()`](Self::on_element) writes only to the operation's own
///   scratch. Shared structures are never touched here.
/// - [`join()`](Self::join) folds a finished sibling's scratch into
///   `self`. It runs on the thread that performed the split, after both
///   halves have completed.
///
/// Element visit order within one leaf is the range order; across leaves
/// there is no ordering guarantee.
///
/// A panic in any hook is caught and recorded as
/// [`ElementError::HookPanicked`]. A panicking `fork` leaves both halves
/// to the current operation; a panicking `join` drops the sibling.
///
/// # Examples
///
/// Counting elements:
///
/// ```
/// use tessel_core::ElementError;
/// use tessel_loop::{ElementOperation, VisitContext};
/// use tessel_mesh::Element;
///
/// struct Count(usize);
///
/// impl ElementOperation for Count {
///     fn fork(&self) -> Self { Count(0) }
///
///     fn on_element(&mut self, _ctx: &VisitContext<'_>, _elem: &Element) -> Result<(), ElementError> {
///         self.0 += 1;
///         Ok(())
///     }
///
///     fn join(&mut self, other: Self) { self.0 += other.0; }
/// }
/// ```
pub trait ElementOperation: Send + Sized {
    /// Split constructor: a sibling with fresh local scratch.
    fn fork(&self) -> Self;

    /// Called once before the elements of each leaf range are visited.
    fn pre(&mut self) {}

    /// Called before the first element of a leaf and whenever consecutive
    /// elements belong to different subdomains.
    fn on_subdomain_changed(&mut self, _subdomain: SubdomainId) {}

    /// Visit one element.
    ///
    /// An `Err` is caught by the loop, recorded on the problem, and does
    /// not stop the remainder of the current leaf unless the loop's fault
    /// policy cancels.
    fn on_element(&mut self, ctx: &VisitContext<'_>, element: &Element) -> Result<(), ElementError>;

    /// Called once after the elements of each leaf range are visited.
    fn post(&mut self) {}

    /// Merge a completed sibling into `self`.
    fn join(&mut self, other: Self);
}
