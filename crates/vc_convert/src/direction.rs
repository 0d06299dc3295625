use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::error::Error;

use vc_model::{Json, MarkerType, ModelType, ReturnsJson};

use crate::{ConverterRegistry, Payload, Strategy};

// -----------------------------------------------------------------------------
// Function types

/// Error type returned by user conversion functions.
///
/// The error produced by a user function is boxed once and handed back
/// to the caller as is, it can be recovered with [`Box::downcast`].
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Erased deserialization function: `(encountered type, payload) -> model`.
pub type LoadFn =
    dyn Fn(&'static ModelType, Payload) -> Result<Box<dyn Any + Send>, BoxError> + Send + Sync;

/// Erased serialization function: `(encountered type, model) -> payload`.
pub type DumpFn = dyn Fn(&'static ModelType, &dyn Any) -> Result<Payload, BoxError> + Send + Sync;

// -----------------------------------------------------------------------------
// Direction

mod sealed {
    pub trait Sealed {}
}

/// The direction of a conversion, either [`Load`] or [`Dump`].
///
/// Each direction has its own function type and its own list of strategies
/// inside a [`ConverterRegistry`]. This trait is sealed.
pub trait Direction: sealed::Sealed + Sized + 'static {
    /// The erased conversion function.
    type Function: ?Sized + Send + Sync + 'static;

    /// Name used in diagnostics.
    const NAME: &'static str;

    /// The marker required by the JSON preset of this direction.
    fn json_marker() -> MarkerType;

    #[doc(hidden)]
    fn strategies(registry: &ConverterRegistry) -> &[Strategy<Self>];

    #[doc(hidden)]
    fn strategies_mut(registry: &mut ConverterRegistry) -> &mut Vec<Strategy<Self>>;
}

/// Deserialization: turns payloads into model instances.
///
/// Uses [`LoadFn`], the JSON preset requires [`ReturnsJson`].
#[derive(Debug, Clone, Copy)]
pub enum Load {}

/// Serialization: turns model instances into payloads.
///
/// Uses [`DumpFn`], the JSON preset requires [`Json`].
#[derive(Debug, Clone, Copy)]
pub enum Dump {}

impl sealed::Sealed for Load {}
impl sealed::Sealed for Dump {}

impl Direction for Load {
    type Function = LoadFn;

    const NAME: &'static str = "load";

    #[inline]
    fn json_marker() -> MarkerType {
        MarkerType::of::<ReturnsJson>()
    }

    #[inline]
    fn strategies(registry: &ConverterRegistry) -> &[Strategy<Self>] {
        &registry.loaders
    }

    #[inline]
    fn strategies_mut(registry: &mut ConverterRegistry) -> &mut Vec<Strategy<Self>> {
        &mut registry.loaders
    }
}

impl Direction for Dump {
    type Function = DumpFn;

    const NAME: &'static str = "dump";

    #[inline]
    fn json_marker() -> MarkerType {
        MarkerType::of::<Json>()
    }

    #[inline]
    fn strategies(registry: &ConverterRegistry) -> &[Strategy<Self>] {
        &registry.dumpers
    }

    #[inline]
    fn strategies_mut(registry: &mut ConverterRegistry) -> &mut Vec<Strategy<Self>> {
        &mut registry.dumpers
    }
}

// -----------------------------------------------------------------------------
// Erasure

/// Boxes a model instance, without double boxing values that are already erased.
pub(crate) fn into_any<T: Any + Send>(value: T) -> Box<dyn Any + Send> {
    let boxed: Box<dyn Any + Send> = Box::new(value);
    match boxed.downcast::<Box<dyn Any + Send>>() {
        Ok(inner) => *inner,
        Err(boxed) => boxed,
    }
}
