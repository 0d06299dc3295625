//! Model hierarchies.
//!
//! Rust has no subclassing, so model hierarchies are declared explicitly with
//! [`impl_model!`](crate::impl_model). Each declaration creates a static
//! [`ModelType`] that knows its parents, and [`ModelFamily::is_member`] walks
//! those parents to answer "is this type part of the family".

// -----------------------------------------------------------------------------
// Modules

mod family;
mod model_type;

// -----------------------------------------------------------------------------
// Exports

pub use family::ModelFamily;
pub use model_type::{Ancestors, Model, ModelType};

// -----------------------------------------------------------------------------
// Macros

/// Implements [`Model`] for a type, declaring its parents.
///
/// The type path is `module_path!()` of the invocation joined with the type.
///
/// ```
/// use vc_model::{Model, impl_model};
///
/// pub struct Vehicle;
/// pub struct Motorized;
/// pub struct Car;
///
/// // A root type.
/// impl_model!(Vehicle);
/// impl_model!(Motorized);
///
/// // Any number of parents.
/// impl_model!(Car: Vehicle, Motorized);
///
/// assert_eq!(Car::model_type().parents().len(), 2);
/// assert_eq!(Car::model_type().type_name(), "Car");
/// ```
#[macro_export]
macro_rules! impl_model {
    ($ty:ty $(: $($parent:ty),+ $(,)?)?) => {
        impl $crate::Model for $ty {
            fn model_type() -> &'static $crate::ModelType {
                const PARENTS: &[fn() -> &'static $crate::ModelType] = &[
                    $($(<$parent as $crate::Model>::model_type),+)?
                ];
                static MODEL_TYPE: $crate::ModelType = $crate::ModelType::new::<$ty>(
                    ::core::concat!(::core::module_path!(), "::", ::core::stringify!($ty)),
                    PARENTS,
                );
                &MODEL_TYPE
            }
        }
    };
}
