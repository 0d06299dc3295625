//! Items used by the exported macros, not public API.

#[cfg(feature = "auto_register")]
pub use inventory;

/// A model submitted through [`auto_register_model!`](crate::auto_register_model).
#[cfg(feature = "auto_register")]
pub struct AutoRegisterModel(pub fn() -> &'static crate::ModelType);

#[cfg(feature = "auto_register")]
inventory::collect!(AutoRegisterModel);

/// Submits a model type for [`ModelCatalog::auto_register`](crate::ModelCatalog::auto_register).
///
/// Only effective with the `auto_register` feature, otherwise expands to nothing.
///
/// ```
/// use vc_model::{Model, ModelCatalog, auto_register_model, impl_model};
///
/// pub struct Invoice;
/// impl_model!(Invoice);
/// auto_register_model!(Invoice);
///
/// let mut catalog = ModelCatalog::new();
/// if catalog.auto_register() {
///     assert!(catalog.contains(Invoice::model_type()));
/// }
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! auto_register_model {
    ($ty:ty) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::__macro_exports::AutoRegisterModel(<$ty as $crate::Model>::model_type)
        }
    };
}

/// Submits a model type for [`ModelCatalog::auto_register`](crate::ModelCatalog::auto_register).
///
/// Only effective with the `auto_register` feature, otherwise expands to nothing.
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! auto_register_model {
    ($ty:ty) => {};
}
