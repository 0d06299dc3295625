//! Items used by the exported macros, not public API.

#[cfg(feature = "auto_register")]
pub use inventory;

/// A registration function submitted through
/// [`auto_register_strategy!`](crate::auto_register_strategy).
#[cfg(feature = "auto_register")]
pub struct AutoRegisterStrategy(pub fn(&mut crate::ConverterRegistry));

#[cfg(feature = "auto_register")]
inventory::collect!(AutoRegisterStrategy);

/// Submits a registration function for
/// [`ConverterRegistry::auto_register`](crate::ConverterRegistry::auto_register).
///
/// The function must have the signature `fn(&mut ConverterRegistry)`.
/// Only effective with the `auto_register` feature, otherwise expands to nothing.
///
/// ```
/// use vc_convert::{ConverterRegistry, MatchContext, Payload, auto_register_strategy, load};
/// use vc_model::{ModelType, impl_model};
///
/// pub struct Invoice;
/// impl_model!(Invoice);
///
/// fn register_invoice(registry: &mut ConverterRegistry) {
///     registry.register(load::<Invoice>().attach(|ty: &'static ModelType, _: Payload| {
///         Ok::<_, &'static str>(ty.type_name())
///     }));
/// }
///
/// auto_register_strategy!(register_invoice);
///
/// let mut registry = ConverterRegistry::new();
/// if registry.auto_register() {
///     assert!(registry.make_response_body_converter(&MatchContext::of::<Invoice>()).is_some());
/// }
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! auto_register_strategy {
    ($register:path) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::__macro_exports::AutoRegisterStrategy($register)
        }
    };
}

/// Submits a registration function for
/// [`ConverterRegistry::auto_register`](crate::ConverterRegistry::auto_register).
///
/// Only effective with the `auto_register` feature, otherwise expands to nothing.
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! auto_register_strategy {
    ($register:path) => {};
}
