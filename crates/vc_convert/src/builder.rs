use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;
use core::marker::PhantomData;

use vc_model::{Marker, MarkerSet, MarkerType, ModelFamily, ModelType};

use crate::direction::into_any;
use crate::{BoxError, ConverterRegistry, Direction, Dump, DumpFn, Load, LoadFn, Payload, Strategy};

// -----------------------------------------------------------------------------
// StrategyBuilder

/// A model family and its required markers, waiting for a conversion function.
///
/// A builder cannot be queried: only a [`Strategy`], obtained by attaching a
/// function, can be bound. Attaching consumes the builder, so a function is
/// attached at most once.
///
/// Builders are usually obtained from the entry points, e.g. [`load`](crate::load)
/// or [`dump_to_json`](crate::dump_to_json).
///
/// # Examples
///
/// ```
/// use vc_convert::{Dump, Load, StrategyBuilder};
/// use vc_model::{Json, Model, ReturnsJson, impl_model};
///
/// pub struct Order;
/// impl_model!(Order);
///
/// let builder = StrategyBuilder::<Load>::new(Order::model_type()).json();
/// assert!(builder.required_markers().contains::<ReturnsJson>());
///
/// let builder = StrategyBuilder::<Dump>::new(Order::model_type()).json();
/// assert!(builder.required_markers().contains::<Json>());
/// ```
pub struct StrategyBuilder<D: Direction> {
    family: ModelFamily,
    required: MarkerSet,
    _marker: PhantomData<fn() -> D>,
}

impl<D: Direction> StrategyBuilder<D> {
    /// Creates a builder for the family rooted at `base`, without required markers.
    #[inline]
    pub const fn new(base: &'static ModelType) -> Self {
        Self::with_required(base, MarkerSet::new())
    }

    /// Creates a builder for the family rooted at `base` with the given required markers.
    #[inline]
    pub const fn with_required(base: &'static ModelType, required: MarkerSet) -> Self {
        Self {
            family: ModelFamily::new(base),
            required,
            _marker: PhantomData,
        }
    }

    /// Requires marker type `M`.
    #[inline]
    pub fn require<M: Marker>(self) -> Self {
        self.require_type(MarkerType::of::<M>())
    }

    /// Requires the given marker type.
    #[inline]
    pub fn require_type(mut self, ty: MarkerType) -> Self {
        self.required.insert(ty);
        self
    }

    /// Requires the type of every given marker instance.
    pub fn require_markers<'a>(mut self, markers: impl IntoIterator<Item = &'a dyn Marker>) -> Self {
        self.required.extend_markers(markers);
        self
    }

    /// Requires the structured JSON marker of this direction.
    ///
    /// See [`Direction::json_marker`].
    #[inline]
    pub fn json(self) -> Self {
        self.require_type(D::json_marker())
    }

    /// Returns the model family.
    #[inline(always)]
    pub const fn family(&self) -> ModelFamily {
        self.family
    }

    /// Returns the required marker types.
    #[inline(always)]
    pub const fn required_markers(&self) -> &MarkerSet {
        &self.required
    }

    #[inline]
    fn finish(self, func: Arc<D::Function>) -> Strategy<D> {
        Strategy::new(self.family, self.required, func)
    }
}

impl StrategyBuilder<Load> {
    /// Attaches a deserialization function.
    ///
    /// The function receives the encountered type, which is the base type or
    /// one of its descendants, and the payload. Its error is boxed once into
    /// a [`BoxError`] and otherwise left untouched.
    pub fn attach<F, T, E>(self, func: F) -> Strategy<Load>
    where
        F: Fn(&'static ModelType, Payload) -> Result<T, E> + Send + Sync + 'static,
        T: Any + Send,
        E: Into<BoxError> + 'static,
    {
        let func: Arc<LoadFn> = Arc::new(
            move |ty: &'static ModelType, payload: Payload| -> Result<Box<dyn Any + Send>, BoxError> {
                match func(ty, payload) {
                    Ok(value) => Ok(into_any(value)),
                    Err(err) => Err(err.into()),
                }
            },
        );
        self.finish(func)
    }

    /// Attaches a deserialization function, registers the strategy and
    /// returns the function unchanged.
    ///
    /// The function stays usable on its own, outside of any pipeline.
    pub fn using<F, T, E>(self, registry: &mut ConverterRegistry, func: F) -> F
    where
        F: Fn(&'static ModelType, Payload) -> Result<T, E> + Clone + Send + Sync + 'static,
        T: Any + Send,
        E: Into<BoxError> + 'static,
    {
        registry.register_loader(self.attach(func.clone()));
        func
    }
}

impl StrategyBuilder<Dump> {
    /// Attaches a serialization function.
    ///
    /// The function receives the encountered type, which is the base type or
    /// one of its descendants, and the instance to serialize. Use
    /// [`downcast_model`](crate::downcast_model) to get the concrete type back.
    pub fn attach<F, P, E>(self, func: F) -> Strategy<Dump>
    where
        F: Fn(&'static ModelType, &dyn Any) -> Result<P, E> + Send + Sync + 'static,
        P: Into<Payload> + 'static,
        E: Into<BoxError> + 'static,
    {
        let func: Arc<DumpFn> = Arc::new(
            move |ty: &'static ModelType, value: &dyn Any| -> Result<Payload, BoxError> {
                match func(ty, value) {
                    Ok(payload) => Ok(payload.into()),
                    Err(err) => Err(err.into()),
                }
            },
        );
        self.finish(func)
    }

    /// Attaches a serialization function, registers the strategy and
    /// returns the function unchanged.
    ///
    /// The function stays usable on its own, outside of any pipeline.
    pub fn using<F, P, E>(self, registry: &mut ConverterRegistry, func: F) -> F
    where
        F: Fn(&'static ModelType, &dyn Any) -> Result<P, E> + Clone + Send + Sync + 'static,
        P: Into<Payload> + 'static,
        E: Into<BoxError> + 'static,
    {
        registry.register_dumper(self.attach(func.clone()));
        func
    }
}

impl<D: Direction> fmt::Debug for StrategyBuilder<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyBuilder")
            .field("direction", &D::NAME)
            .field("family", &self.family)
            .field("required", &self.required)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
