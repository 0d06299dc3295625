use alloc::sync::Arc;
use core::fmt;

use vc_model::{MarkerSet, ModelFamily};

use crate::{Converter, Direction, MatchContext};

/// A registered conversion strategy.
///
/// Created by attaching a function to a [`StrategyBuilder`](crate::StrategyBuilder),
/// after which it is read-only: binding it concurrently from several threads
/// needs no synchronization.
pub struct Strategy<D: Direction> {
    family: ModelFamily,
    required: MarkerSet,
    func: Arc<D::Function>,
}

impl<D: Direction> Strategy<D> {
    #[inline]
    pub(crate) fn new(family: ModelFamily, required: MarkerSet, func: Arc<D::Function>) -> Self {
        Self {
            family,
            required,
            func,
        }
    }

    /// Returns the model family this strategy applies to.
    #[inline(always)]
    pub const fn family(&self) -> ModelFamily {
        self.family
    }

    /// Returns the marker types a call site must carry.
    #[inline(always)]
    pub const fn required_markers(&self) -> &MarkerSet {
        &self.required
    }

    /// Returns `true` if the strategy applies to the given context.
    ///
    /// 1. The encountered type must be the base type of the family or one of
    ///    its descendants, whatever the markers.
    /// 2. The markers of the parameter and of the method, taken together,
    ///    must cover every required marker type. Extra markers are ignored,
    ///    and an empty requirement is always covered.
    pub fn matches(&self, cx: &MatchContext<'_>) -> bool {
        self.family.is_member(cx.model()) && cx.carries_all(&self.required)
    }

    /// Binds the strategy to the encountered type of `cx`.
    ///
    /// Returns `None` if the strategy does not apply, so the caller can fall
    /// through to the next candidate. This is not an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_convert::{MatchContext, Payload, load};
    /// use vc_model::{ModelType, impl_model};
    ///
    /// pub struct Animal;
    /// pub struct Dog;
    /// pub struct Plant;
    /// impl_model!(Animal);
    /// impl_model!(Dog: Animal);
    /// impl_model!(Plant);
    ///
    /// let strategy = load::<Animal>().attach(|ty: &'static ModelType, _: Payload| {
    ///     Ok::<_, &'static str>(ty.type_name())
    /// });
    ///
    /// let converter = strategy.try_bind(&MatchContext::of::<Dog>()).unwrap();
    /// let name = converter.convert_as::<&str>(Payload::Text(String::new())).unwrap();
    /// assert_eq!(name, "Dog");
    ///
    /// assert!(strategy.try_bind(&MatchContext::of::<Plant>()).is_none());
    /// ```
    pub fn try_bind(&self, cx: &MatchContext<'_>) -> Option<Converter<D>> {
        if self.matches(cx) {
            Some(Converter::new(cx.model(), Arc::clone(&self.func)))
        } else {
            log::trace!("{} strategy for `{}` declined {cx:?}", D::NAME, self.family);
            None
        }
    }

    /// Returns `true` if every context matched by `other` is matched by `self`.
    ///
    /// When registered before `other`, `self` always wins and `other` is never used.
    pub fn shadows(&self, other: &Strategy<D>) -> bool {
        self.family.is_member(other.family.base()) && other.required.is_superset(&self.required)
    }
}

impl<D: Direction> Clone for Strategy<D> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            family: self.family,
            required: self.required.clone(),
            func: Arc::clone(&self.func),
        }
    }
}

impl<D: Direction> fmt::Debug for Strategy<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strategy")
            .field("direction", &D::NAME)
            .field("family", &self.family)
            .field("required", &self.required)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
