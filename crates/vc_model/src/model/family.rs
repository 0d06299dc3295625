use core::fmt;

use crate::model::{Model, ModelType};

/// A base model type together with all of its descendants.
///
/// Families are the unit converters are registered for: a converter for the
/// `Animal` family also applies to `Dog` and `Cat` if they declare `Animal`
/// as an ancestor.
///
/// # Examples
///
/// ```
/// use vc_model::{Model, ModelFamily, impl_model};
///
/// pub struct Shape;
/// pub struct Circle;
///
/// impl_model!(Shape);
/// impl_model!(Circle: Shape);
///
/// let shapes = ModelFamily::of::<Shape>();
/// assert!(shapes.is_member(Circle::model_type()));
///
/// let circles = ModelFamily::of::<Circle>();
/// assert!(!circles.is_member(Shape::model_type()));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelFamily {
    base: &'static ModelType,
}

impl ModelFamily {
    /// Creates the family rooted at `base`.
    #[inline]
    pub const fn new(base: &'static ModelType) -> Self {
        Self { base }
    }

    /// Creates the family rooted at `M`.
    #[inline]
    pub fn of<M: Model>() -> Self {
        Self::new(M::model_type())
    }

    /// Returns the base type of the family.
    #[inline(always)]
    pub const fn base(&self) -> &'static ModelType {
        self.base
    }

    /// Returns `true` if `ty` is the base type or one of its descendants.
    #[inline]
    pub fn is_member(&self, ty: &ModelType) -> bool {
        ty.is_subtype_of(self.base)
    }
}

impl fmt::Debug for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModelFamily")
            .field(&self.base.type_path())
            .finish()
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+", self.base.type_path())
    }
}
