//! Registration entry points.
//!
//! Every entry point returns a [`StrategyBuilder`]; [`StrategyBuilder::using`]
//! then attaches the user function, registers the strategy and gives the
//! function back:
//!
//! ```
//! use vc_convert::{ConverterRegistry, Payload, dump_to_json};
//! use vc_model::{Model, ModelType, impl_model};
//!
//! pub struct Shape;
//! impl_model!(Shape);
//!
//! fn to_json(ty: &'static ModelType, _: &dyn core::any::Any) -> Result<Payload, &'static str> {
//!     Ok(Payload::Text(ty.type_name().into()))
//! }
//!
//! let mut registry = ConverterRegistry::new();
//! let f = dump_to_json::<Shape>().using(&mut registry, to_json);
//!
//! assert_eq!(registry.len(), 1);
//! assert_eq!(f(Shape::model_type(), &()), Ok(Payload::Text("Shape".into())));
//! ```

use vc_model::{ConfigError, MarkerSet, Model, ModelCatalog, ModelType};

use crate::{Dump, Load, StrategyBuilder};

// -----------------------------------------------------------------------------
// Load

/// Builds a deserialization strategy for `M` and all of its descendants.
///
/// The strategy applies whatever the markers of the call site.
#[inline]
pub fn load<M: Model>() -> StrategyBuilder<Load> {
    StrategyBuilder::new(M::model_type())
}

/// Builds a deserialization strategy for `base` and all of its descendants,
/// requiring the given markers.
#[inline]
pub const fn load_with(base: &'static ModelType, required: MarkerSet) -> StrategyBuilder<Load> {
    StrategyBuilder::with_required(base, required)
}

/// Builds a JSON deserialization strategy for `M` and all of its descendants.
///
/// Same as [`load`] with [`ReturnsJson`](vc_model::ReturnsJson) required:
/// only methods marked as returning JSON use the strategy.
#[inline]
pub fn load_from_json<M: Model>() -> StrategyBuilder<Load> {
    load::<M>().json()
}

/// Builds a deserialization strategy for the model type named `name` in `catalog`.
///
/// Fails if `name` does not refer to exactly one registered model type.
pub fn load_by_path(
    catalog: &ModelCatalog,
    name: &str,
    required: MarkerSet,
) -> Result<StrategyBuilder<Load>, ConfigError> {
    Ok(load_with(catalog.resolve(name)?, required))
}

// -----------------------------------------------------------------------------
// Dump

/// Builds a serialization strategy for `M` and all of its descendants.
///
/// The strategy applies whatever the markers of the call site.
#[inline]
pub fn dump<M: Model>() -> StrategyBuilder<Dump> {
    StrategyBuilder::new(M::model_type())
}

/// Builds a serialization strategy for `base` and all of its descendants,
/// requiring the given markers.
#[inline]
pub const fn dump_with(base: &'static ModelType, required: MarkerSet) -> StrategyBuilder<Dump> {
    StrategyBuilder::with_required(base, required)
}

/// Builds a JSON serialization strategy for `M` and all of its descendants.
///
/// Same as [`dump`] with [`Json`](vc_model::Json) required:
/// only methods marked as sending JSON use the strategy.
#[inline]
pub fn dump_to_json<M: Model>() -> StrategyBuilder<Dump> {
    dump::<M>().json()
}

/// Builds a serialization strategy for the model type named `name` in `catalog`.
///
/// Fails if `name` does not refer to exactly one registered model type.
pub fn dump_by_path(
    catalog: &ModelCatalog,
    name: &str,
    required: MarkerSet,
) -> Result<StrategyBuilder<Dump>, ConfigError> {
    Ok(dump_with(catalog.resolve(name)?, required))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use core::any::Any;
    use core::sync::atomic::{AtomicUsize, Ordering};

    use vc_model::{ConfigError, Json, Marker, MarkerSet, Model, ModelCatalog, ModelType};
    use vc_model::{ReturnsJson, impl_marker, impl_model};

    use super::*;
    use crate::{ConverterRegistry, MatchContext, Payload, downcast_model};

    struct Animal;
    struct Dog;
    impl_model!(Animal);
    impl_model!(Dog: Animal);

    struct Body;
    impl_marker!(Body);

    fn load_name(ty: &'static ModelType, _: Payload) -> Result<String, &'static str> {
        Ok(ty.type_name().to_string())
    }

    fn dump_name(ty: &'static ModelType, _: &dyn Any) -> Result<Payload, &'static str> {
        Ok(Payload::Text(ty.type_name().to_string()))
    }

    #[test]
    fn returns_the_same_function() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let func = move |_: &'static ModelType, _: Payload| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, &'static str>(())
        };

        let mut registry = ConverterRegistry::new();
        let returned = load::<Animal>().using(&mut registry, func);

        // Still callable on its own, and shares its state with the registered copy.
        returned(Dog::model_type(), Payload::Text(String::new())).unwrap();
        let converter = registry
            .make_response_body_converter(&MatchContext::of::<Dog>())
            .unwrap();
        converter.convert(Payload::Text(String::new())).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn returns_the_same_fn_item() {
        let mut registry = ConverterRegistry::new();
        let returned: fn(&'static ModelType, Payload) -> Result<String, &'static str> =
            load::<Animal>().using(&mut registry, load_name);
        let original: fn(&'static ModelType, Payload) -> Result<String, &'static str> = load_name;

        let payload = Payload::Text(String::new());
        assert_eq!(
            returned(Dog::model_type(), payload.clone()),
            original(Dog::model_type(), payload)
        );
    }

    #[test]
    fn json_presets() {
        let load = load_from_json::<Animal>();
        assert_eq!(load.required_markers(), &MarkerSet::new().with::<ReturnsJson>());
        assert_eq!(load.family().base(), Animal::model_type());

        let dump = dump_to_json::<Animal>();
        assert_eq!(dump.required_markers(), &MarkerSet::new().with::<Json>());
    }

    #[test]
    fn preset_is_sugar() {
        let sugar = load_from_json::<Animal>().attach(load_name);
        let plain = load_with(Animal::model_type(), MarkerSet::new().with::<ReturnsJson>())
            .attach(load_name);

        let with_json: [&dyn Marker; 1] = [&ReturnsJson];
        let with_body: [&dyn Marker; 1] = [&Body];
        let contexts = [
            MatchContext::of::<Dog>(),
            MatchContext::of::<Dog>().with_method_markers(&with_json),
            MatchContext::of::<Dog>().with_param_markers(&with_body),
            MatchContext::of::<Animal>().with_param_markers(&with_json),
        ];

        let sugar: Vec<bool> = contexts.iter().map(|cx| sugar.matches(cx)).collect();
        let plain: Vec<bool> = contexts.iter().map(|cx| plain.matches(cx)).collect();
        assert_eq!(sugar, plain);
        assert_eq!(sugar, [false, true, false, true]);
    }

    #[test]
    fn dump_entry_points() {
        let mut registry = ConverterRegistry::new();
        dump::<Animal>().using(&mut registry, dump_name);

        let converter = registry
            .make_request_body_converter(&MatchContext::of::<Dog>())
            .unwrap();
        assert_eq!(
            converter.convert(&Dog).unwrap(),
            Payload::Text("Dog".to_string())
        );
        assert!(
            registry
                .make_response_body_converter(&MatchContext::of::<Dog>())
                .is_none()
        );
    }

    #[test]
    fn dump_with_downcast() {
        struct Point(i32);
        impl_model!(Point);

        let strategy = dump::<Point>().attach(
            |ty: &'static ModelType, value: &dyn Any| -> Result<serde_json::Value, crate::ConvertError> {
                let point = downcast_model::<Point>(ty, value)?;
                Ok(serde_json::json!(point.0))
            },
        );
        let converter = strategy.try_bind(&MatchContext::of::<Point>()).unwrap();

        assert_eq!(converter.convert(&Point(3)).unwrap(), Payload::Json(serde_json::json!(3)));

        let err = converter.convert(&"not a point").unwrap_err();
        assert!(err.downcast_ref::<crate::ConvertError>().is_some());
    }

    #[test]
    fn by_path() {
        let mut catalog = ModelCatalog::new();
        catalog.register::<Dog>();

        let builder = load_by_path(&catalog, "Animal", MarkerSet::new()).unwrap();
        assert_eq!(builder.family().base(), Animal::model_type());

        let path = Dog::model_type().type_path();
        let builder = dump_by_path(&catalog, path, MarkerSet::new().with::<Body>()).unwrap();
        assert_eq!(builder.family().base(), Dog::model_type());
        assert!(builder.required_markers().contains::<Body>());

        assert!(matches!(
            load_by_path(&catalog, "Plant", MarkerSet::new()),
            Err(ConfigError::UnknownModel { .. })
        ));
        assert!(matches!(
            dump_by_path(&catalog, "", MarkerSet::new()),
            Err(ConfigError::UnknownModel { .. })
        ));
    }
}
