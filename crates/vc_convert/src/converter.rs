use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use vc_model::ModelType;

use crate::{BoxError, ConvertError, Direction, Dump, Load, Payload};

// -----------------------------------------------------------------------------
// Converter

/// A conversion function bound to the encountered model type.
///
/// Returned by [`Strategy::try_bind`](crate::Strategy::try_bind). Calling it
/// with a runtime argument calls the user function with
/// `(encountered type, argument)`. A converter holds no state of its own, so
/// calling it several times is the same as calling the user function several times.
pub struct Converter<D: Direction> {
    model: &'static ModelType,
    func: Arc<D::Function>,
}

impl<D: Direction> Converter<D> {
    #[inline]
    pub(crate) fn new(model: &'static ModelType, func: Arc<D::Function>) -> Self {
        Self { model, func }
    }

    /// Returns the model type this converter is bound to.
    #[inline(always)]
    pub const fn model(&self) -> &'static ModelType {
        self.model
    }
}

impl Converter<Load> {
    /// Converts a payload into a model instance.
    ///
    /// Errors of the user function are returned unmodified.
    #[inline]
    pub fn convert(&self, payload: Payload) -> Result<alloc::boxed::Box<dyn Any + Send>, BoxError> {
        (self.func)(self.model, payload)
    }

    /// Converts a payload into a `T`.
    ///
    /// Fails with [`ConvertError::MismatchedOutput`] if the user function
    /// produced another type.
    pub fn convert_as<T: Any>(&self, payload: Payload) -> Result<T, BoxError> {
        match self.convert(payload)?.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(_) => Err(ConvertError::MismatchedOutput {
                model: self.model.type_path(),
                expected: core::any::type_name::<T>(),
            }
            .into()),
        }
    }
}

impl Converter<Dump> {
    /// Converts a model instance into a payload.
    ///
    /// Errors of the user function are returned unmodified.
    #[inline]
    pub fn convert(&self, value: &dyn Any) -> Result<Payload, BoxError> {
        (self.func)(self.model, value)
    }
}

impl<D: Direction> Clone for Converter<D> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            model: self.model,
            func: Arc::clone(&self.func),
        }
    }
}

impl<D: Direction> fmt::Debug for Converter<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("direction", &D::NAME)
            .field("model", &self.model.type_path())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// downcast_model

/// Downcasts the instance handed to a serialization function.
///
/// # Examples
///
/// ```
/// use core::any::Any;
/// use vc_convert::{ConvertError, downcast_model};
/// use vc_model::{Model, impl_model};
///
/// pub struct Point(i32, i32);
/// impl_model!(Point);
///
/// let value: &dyn Any = &Point(1, 2);
/// let point = downcast_model::<Point>(Point::model_type(), value).unwrap();
/// assert_eq!(point.0 + point.1, 3);
///
/// let value: &dyn Any = &"oops";
/// assert!(matches!(
///     downcast_model::<Point>(Point::model_type(), value),
///     Err(ConvertError::MismatchedInput { .. }),
/// ));
/// ```
pub fn downcast_model<'a, T: Any>(
    model: &'static ModelType,
    value: &'a dyn Any,
) -> Result<&'a T, ConvertError> {
    value
        .downcast_ref::<T>()
        .ok_or_else(|| ConvertError::MismatchedInput {
            model: model.type_path(),
            expected: core::any::type_name::<T>(),
        })
}
