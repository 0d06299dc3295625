use alloc::vec::Vec;
use core::fmt;

use crate::hash::{HashSet, new_set};
use crate::marker::{Marker, MarkerType};

/// A set of [`MarkerType`]s.
///
/// Used in two roles:
///
/// - the markers a strategy *requires*, built once at registration time;
/// - the markers a call site *supplies*, collected from its parameter-level
///   and method-level markers.
///
/// Marker instances of the same type collapse into one entry.
///
/// # Examples
///
/// ```
/// use vc_model::{Json, Marker, MarkerSet, ReturnsJson};
///
/// let required = MarkerSet::new().with::<ReturnsJson>();
///
/// let method: [&dyn Marker; 2] = [&ReturnsJson, &Json];
/// let supplied = MarkerSet::collect_context(&[], &method);
///
/// assert!(supplied.is_superset(&required));
/// assert!(!required.is_superset(&supplied));
/// ```
#[derive(Clone)]
pub struct MarkerSet {
    types: HashSet<MarkerType>,
}

impl MarkerSet {
    /// Creates an empty set.
    ///
    /// An empty requirement is satisfied by every call site.
    #[inline]
    pub const fn new() -> Self {
        Self { types: new_set() }
    }

    /// Creates a set from the types of the given marker instances.
    pub fn from_markers<'a>(markers: impl IntoIterator<Item = &'a dyn Marker>) -> Self {
        let mut set = Self::new();
        set.extend_markers(markers);
        set
    }

    /// Creates a set from marker types.
    pub fn from_types(types: impl IntoIterator<Item = MarkerType>) -> Self {
        let mut set = Self::new();
        set.types.extend(types);
        set
    }

    /// Collects the types of every parameter-level and method-level marker
    /// of a call site into one set.
    pub fn collect_context(param_markers: &[&dyn Marker], method_markers: &[&dyn Marker]) -> Self {
        let mut set = Self::new();
        set.extend_markers(param_markers.iter().copied());
        set.extend_markers(method_markers.iter().copied());
        set
    }

    /// Inserts the type of every given marker instance.
    pub fn extend_markers<'a>(&mut self, markers: impl IntoIterator<Item = &'a dyn Marker>) {
        self.types.extend(markers.into_iter().map(MarkerType::of_val));
    }

    /// Inserts a marker type, returns `false` if it was already present.
    #[inline]
    pub fn insert(&mut self, ty: MarkerType) -> bool {
        self.types.insert(ty)
    }

    /// Returns the set with marker type `M` inserted.
    #[inline]
    pub fn with<M: Marker>(mut self) -> Self {
        self.insert(MarkerType::of::<M>());
        self
    }

    /// Returns `true` if the set contains marker type `M`.
    #[inline]
    pub fn contains<M: Marker>(&self) -> bool {
        self.contains_type(&MarkerType::of::<M>())
    }

    /// Returns `true` if the set contains the given marker type.
    #[inline]
    pub fn contains_type(&self, ty: &MarkerType) -> bool {
        self.types.contains(ty)
    }

    /// Returns `true` if every type of `other` is also in `self`.
    ///
    /// Every set is a superset of the empty set.
    #[inline]
    pub fn is_superset(&self, other: &MarkerSet) -> bool {
        self.types.is_superset(&other.types)
    }

    /// Returns the number of marker types.
    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Returns an iterator over the marker types, in no particular order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &MarkerType> {
        self.types.iter()
    }
}

impl Default for MarkerSet {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for MarkerSet {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.types == other.types
    }
}

impl Eq for MarkerSet {}

impl FromIterator<MarkerType> for MarkerSet {
    fn from_iter<T: IntoIterator<Item = MarkerType>>(iter: T) -> Self {
        Self::from_types(iter)
    }
}

impl fmt::Debug for MarkerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Sorted for stable output.
        let mut names: Vec<&'static str> = self.types.iter().map(MarkerType::name).collect();
        names.sort_unstable();
        f.debug_set().entries(names).finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
