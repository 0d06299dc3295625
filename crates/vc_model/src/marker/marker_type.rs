use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};

// -----------------------------------------------------------------------------
// Marker

/// An opaque tag attached to a method or to one of its parameters.
///
/// Markers are produced by the surrounding framework, e.g. "this method
/// returns JSON". Matching only ever looks at the *type* of a marker,
/// never at its value.
///
/// Implement it with [`impl_marker!`](crate::impl_marker).
///
/// ```
/// use vc_model::{Marker, MarkerType, impl_marker};
///
/// #[derive(Debug)]
/// pub struct Timeout(pub u64);
///
/// impl_marker!(Timeout);
///
/// let short: &dyn Marker = &Timeout(1);
/// let long: &dyn Marker = &Timeout(60);
///
/// assert_eq!(short.marker_type(), long.marker_type());
/// assert_eq!(short.marker_type(), MarkerType::of::<Timeout>());
/// ```
pub trait Marker: Send + Sync + 'static {
    /// Returns the type of this marker.
    fn marker_type(&self) -> MarkerType;
}

// -----------------------------------------------------------------------------
// MarkerType

/// The type of a [`Marker`], compared by [`TypeId`].
#[derive(Clone, Copy)]
pub struct MarkerType {
    id: TypeId,
    name: &'static str,
}

impl MarkerType {
    /// Returns the marker type of `M`.
    #[inline]
    pub fn of<M: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<M>(),
            name: core::any::type_name::<M>(),
        }
    }

    /// Returns the marker type of a marker instance.
    #[inline]
    pub fn of_val(marker: &dyn Marker) -> Self {
        marker.marker_type()
    }

    /// Returns the [`TypeId`] of the marker.
    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the name of the marker, only used for diagnostics.
    ///
    /// The name comes from [`core::any::type_name`], do not rely on its format.
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for MarkerType {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MarkerType {}

impl Hash for MarkerType {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for MarkerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
