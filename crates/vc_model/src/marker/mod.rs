//! Call-site markers.
//!
//! A call site carries two collections of markers: the ones attached to the
//! method and the ones attached to the parameter being converted. Strategies
//! declare a [`MarkerSet`] of required marker types and only apply when the
//! union of both collections covers it.

// -----------------------------------------------------------------------------
// Modules

mod json;
mod marker_set;
mod marker_type;

// -----------------------------------------------------------------------------
// Exports

pub use json::{Json, ReturnsJson};
pub use marker_set::MarkerSet;
pub use marker_type::{Marker, MarkerType};

// -----------------------------------------------------------------------------
// Macros

/// Implements [`Marker`] for one or more types.
///
/// ```
/// use vc_model::{Marker, MarkerSet, impl_marker};
///
/// pub struct Body;
/// pub struct Query;
///
/// impl_marker!(Body, Query);
///
/// let set = MarkerSet::from_markers([&Body as &dyn Marker, &Query]);
/// assert_eq!(set.len(), 2);
/// ```
#[macro_export]
macro_rules! impl_marker {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Marker for $ty {
                #[inline]
                fn marker_type(&self) -> $crate::MarkerType {
                    $crate::MarkerType::of::<Self>()
                }
            }
        )+
    };
}
