use alloc::vec::Vec;
use core::fmt;

use vc_model::{Marker, MarkerSet, MarkerType, Model, ModelType};

/// What the pipeline knows about one conversion site.
///
/// Built fresh for every dispatch attempt and never stored: the encountered
/// model type, the markers attached to the parameter being converted, and the
/// markers attached to the method.
///
/// # Examples
///
/// ```
/// use vc_convert::MatchContext;
/// use vc_model::{Json, Marker, Model, impl_model};
///
/// pub struct User;
/// impl_model!(User);
///
/// let method: [&dyn Marker; 1] = [&Json];
/// let cx = MatchContext::of::<User>().with_method_markers(&method);
///
/// assert!(cx.model().is::<User>());
/// assert!(cx.supplied_markers().contains::<Json>());
/// ```
#[derive(Clone, Copy)]
pub struct MatchContext<'a> {
    model: &'static ModelType,
    param_markers: &'a [&'a dyn Marker],
    method_markers: &'a [&'a dyn Marker],
}

impl<'a> MatchContext<'a> {
    /// Creates a context for `model` without any marker.
    #[inline]
    pub const fn new(model: &'static ModelType) -> Self {
        Self {
            model,
            param_markers: &[],
            method_markers: &[],
        }
    }

    /// Creates a context for `M` without any marker.
    #[inline]
    pub fn of<M: Model>() -> Self {
        Self::new(M::model_type())
    }

    /// Sets the parameter-level markers.
    #[inline]
    pub const fn with_param_markers(mut self, markers: &'a [&'a dyn Marker]) -> Self {
        self.param_markers = markers;
        self
    }

    /// Sets the method-level markers.
    #[inline]
    pub const fn with_method_markers(mut self, markers: &'a [&'a dyn Marker]) -> Self {
        self.method_markers = markers;
        self
    }

    /// Returns the encountered model type.
    #[inline(always)]
    pub const fn model(&self) -> &'static ModelType {
        self.model
    }

    /// Returns the parameter-level markers.
    #[inline(always)]
    pub const fn param_markers(&self) -> &'a [&'a dyn Marker] {
        self.param_markers
    }

    /// Returns the method-level markers.
    #[inline(always)]
    pub const fn method_markers(&self) -> &'a [&'a dyn Marker] {
        self.method_markers
    }

    /// Returns `true` if a marker of type `ty` is attached to the parameter or the method.
    pub fn carries(&self, ty: &MarkerType) -> bool {
        self.param_markers
            .iter()
            .chain(self.method_markers)
            .any(|marker| marker.marker_type() == *ty)
    }

    /// Returns `true` if every type of `required` is carried by this context.
    ///
    /// Same result as `self.supplied_markers().is_superset(required)`,
    /// without collecting the supplied markers first.
    pub fn carries_all(&self, required: &MarkerSet) -> bool {
        required.iter().all(|ty| self.carries(ty))
    }

    /// Collects the types of all parameter-level and method-level markers.
    pub fn supplied_markers(&self) -> MarkerSet {
        MarkerSet::collect_context(self.param_markers, self.method_markers)
    }
}

impl fmt::Debug for MatchContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn names(markers: &[&dyn Marker]) -> Vec<&'static str> {
            markers.iter().map(|m| m.marker_type().name()).collect()
        }

        f.debug_struct("MatchContext")
            .field("model", &self.model.type_path())
            .field("param_markers", &names(self.param_markers))
            .field("method_markers", &names(self.method_markers))
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
