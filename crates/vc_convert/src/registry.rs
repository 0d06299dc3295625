use alloc::vec::Vec;
use core::fmt;

use crate::{Converter, Direction, Dump, Load, MatchContext, Strategy};

// -----------------------------------------------------------------------------
// ConverterRegistry

/// Ordered conversion strategies of both directions.
///
/// The registry is passed explicitly to registration calls, so tests and
/// independent clients can each use their own.
///
/// # Query order
///
/// Strategies are tried in registration order: the first registered strategy
/// that applies to a context wins, later ones are only tried when every
/// earlier one declined. Register specific strategies (narrow family, more
/// required markers) before general ones.
///
/// # Example
///
/// ```
/// use vc_convert::{ConverterRegistry, MatchContext, Payload, load};
/// use vc_model::{ModelType, impl_model};
///
/// pub struct Animal;
/// pub struct Dog;
/// impl_model!(Animal);
/// impl_model!(Dog: Animal);
///
/// let mut registry = ConverterRegistry::new();
/// registry.register(load::<Dog>().attach(|_: &'static ModelType, _: Payload| Ok::<_, &'static str>("dog")));
/// registry.register(load::<Animal>().attach(|_: &'static ModelType, _: Payload| Ok::<_, &'static str>("animal")));
///
/// let convert = |cx: &MatchContext<'_>| {
///     let converter = registry.make_response_body_converter(cx).unwrap();
///     converter.convert_as::<&str>(Payload::Text(String::new())).unwrap()
/// };
///
/// assert_eq!(convert(&MatchContext::of::<Dog>()), "dog");
/// assert_eq!(convert(&MatchContext::of::<Animal>()), "animal");
/// ```
pub struct ConverterRegistry {
    pub(crate) loaders: Vec<Strategy<Load>>,
    pub(crate) dumpers: Vec<Strategy<Dump>>,
    #[cfg_attr(not(feature = "auto_register"), allow(dead_code))]
    auto_registered: bool,
}

impl Default for ConverterRegistry {
    /// See [`ConverterRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterRegistry {
    /// Creates an empty registry.
    #[inline]
    pub const fn new() -> Self {
        Self {
            loaders: Vec::new(),
            dumpers: Vec::new(),
            auto_registered: false,
        }
    }

    /// Appends a strategy to the list of its direction.
    ///
    /// A strategy that can never be reached, because an earlier one of the
    /// same direction matches every context it matches, is still registered
    /// but reported with a warning.
    pub fn register<D: Direction>(&mut self, strategy: Strategy<D>) {
        let strategies = D::strategies_mut(self);

        if let Some(earlier) = strategies.iter().find(|earlier| earlier.shadows(&strategy)) {
            log::warn!(
                "{} strategy for `{}` requiring {:?} is shadowed by the earlier one for `{}` requiring {:?}",
                D::NAME,
                strategy.family(),
                strategy.required_markers(),
                earlier.family(),
                earlier.required_markers(),
            );
        }

        log::debug!(
            "registered {} strategy #{} for `{}` requiring {:?}",
            D::NAME,
            strategies.len(),
            strategy.family(),
            strategy.required_markers(),
        );
        strategies.push(strategy);
    }

    /// Registers a deserialization strategy.
    #[inline]
    pub fn register_loader(&mut self, strategy: Strategy<Load>) {
        self.register(strategy);
    }

    /// Registers a serialization strategy.
    #[inline]
    pub fn register_dumper(&mut self, strategy: Strategy<Dump>) {
        self.register(strategy);
    }

    /// Returns the strategies of direction `D`, in query order.
    #[inline]
    pub fn strategies<D: Direction>(&self) -> &[Strategy<D>] {
        D::strategies(self)
    }

    /// Binds the first strategy of direction `D` that applies to `cx`.
    ///
    /// Returns `None` once every strategy declined: no custom strategy
    /// applies and the pipeline should fall back to its default conversion.
    pub fn find<D: Direction>(&self, cx: &MatchContext<'_>) -> Option<Converter<D>> {
        let found = D::strategies(self)
            .iter()
            .find_map(|strategy| strategy.try_bind(cx));

        if found.is_none() {
            log::trace!("no {} strategy applies to {cx:?}", D::NAME);
        }
        found
    }

    /// Returns a converter turning a response body into a model instance.
    ///
    /// See [`find`](Self::find).
    #[inline]
    pub fn make_response_body_converter(&self, cx: &MatchContext<'_>) -> Option<Converter<Load>> {
        self.find(cx)
    }

    /// Returns a converter turning a model instance into a request body.
    ///
    /// See [`find`](Self::find).
    #[inline]
    pub fn make_request_body_converter(&self, cx: &MatchContext<'_>) -> Option<Converter<Dump>> {
        self.find(cx)
    }

    /// Returns the number of strategies of both directions.
    #[inline]
    pub fn len(&self) -> usize {
        self.loaders.len() + self.dumpers.len()
    }

    /// Returns `true` if no strategy is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty() && self.dumpers.is_empty()
    }

    /// Runs every registration function submitted with
    /// [`auto_register_strategy!`](crate::auto_register_strategy).
    ///
    /// The functions run at most once per registry, in an unspecified order:
    /// strategies whose relative order matters should be registered by a
    /// single function.
    ///
    /// ## Return Value
    ///
    /// Returns `true` if automatic registration is available, that is, the
    /// `auto_register` feature is enabled. Otherwise does nothing and returns `false`.
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            use crate::__macro_exports::{AutoRegisterStrategy, inventory};

            if !self.auto_registered {
                self.auto_registered = true;
                for AutoRegisterStrategy(register) in inventory::iter::<AutoRegisterStrategy> {
                    register(self);
                }
            }
            true
        }

        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("loaders", &self.loaders)
            .field("dumpers", &self.dumpers)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// ConverterRegistryArc

#[cfg(feature = "std")]
pub use arc::ConverterRegistryArc;

#[cfg(feature = "std")]
mod arc {
    use alloc::sync::Arc;
    use std::sync::PoisonError;
    use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

    use super::ConverterRegistry;

    /// A [`ConverterRegistry`] shared between threads.
    ///
    /// Registration takes the write lock, queries only the read lock, so a
    /// registration happens-before every query that acquires the lock after it.
    #[derive(Clone, Default)]
    pub struct ConverterRegistryArc {
        /// The wrapped [`ConverterRegistry`].
        pub internal: Arc<RwLock<ConverterRegistry>>,
    }

    impl ConverterRegistryArc {
        /// Wraps an existing registry.
        #[inline]
        pub fn new(registry: ConverterRegistry) -> Self {
            Self {
                internal: Arc::new(RwLock::new(registry)),
            }
        }

        /// Takes a read lock on the underlying [`ConverterRegistry`].
        pub fn read(&self) -> RwLockReadGuard<'_, ConverterRegistry> {
            self.internal.read().unwrap_or_else(PoisonError::into_inner)
        }

        /// Takes a write lock on the underlying [`ConverterRegistry`].
        pub fn write(&self) -> RwLockWriteGuard<'_, ConverterRegistry> {
            self.internal
                .write()
                .unwrap_or_else(PoisonError::into_inner)
        }
    }

    impl core::fmt::Debug for ConverterRegistryArc {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            core::fmt::Debug::fmt(&*self.read(), f)
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::{String, ToString};
    use alloc::vec;
    use alloc::vec::Vec;
    use core::any::Any;
    use core::fmt;

    use serde_json::{Value, json};
    use vc_model::{Json, Marker, MarkerSet, MarkerType, Model, ModelType, ReturnsJson};
    use vc_model::{impl_marker, impl_model};

    use super::ConverterRegistry;
    use crate::{BoxError, Dump, Load, MatchContext, Payload, dump, dump_to_json};
    use crate::{load, load_from_json, load_with};

    struct Animal;
    struct Dog;
    struct Puppy;
    struct Plant;
    impl_model!(Animal);
    impl_model!(Dog: Animal);
    impl_model!(Puppy: Dog);
    impl_model!(Plant);

    struct Body;
    struct Header;
    impl_marker!(Body, Header);

    /// What a test conversion function saw.
    #[derive(Debug, PartialEq)]
    struct Seen {
        model: &'static str,
        payload: Value,
    }

    fn record(ty: &'static ModelType, payload: Payload) -> Result<Seen, serde_json::Error> {
        Ok(Seen {
            model: ty.type_name(),
            payload: payload.into_json()?,
        })
    }

    fn named(name: &'static str) -> impl Fn(&'static ModelType, Payload) -> Result<&'static str, BoxError> + Clone {
        move |_, _| Ok(name)
    }

    fn load_as_str(registry: &ConverterRegistry, cx: &MatchContext<'_>) -> Option<&'static str> {
        let converter = registry.make_response_body_converter(cx)?;
        Some(converter.convert_as::<&'static str>(Payload::Text(String::new())).unwrap())
    }

    #[test]
    fn subtype_without_markers() {
        let mut registry = ConverterRegistry::new();
        load::<Animal>().using(&mut registry, record);

        let converter = registry
            .make_response_body_converter(&MatchContext::of::<Dog>())
            .unwrap();
        assert!(converter.model().is::<Dog>());

        let seen = converter
            .convert_as::<Seen>(Payload::Json(json!({"name": "Rex"})))
            .unwrap();
        assert_eq!(
            seen,
            Seen {
                model: "Dog",
                payload: json!({"name": "Rex"}),
            }
        );
    }

    #[test]
    fn json_preset_requires_marker() {
        let mut registry = ConverterRegistry::new();
        load_from_json::<Animal>().using(&mut registry, record);

        assert!(
            registry
                .make_response_body_converter(&MatchContext::of::<Animal>())
                .is_none()
        );

        let method: [&dyn Marker; 1] = [&ReturnsJson];
        let cx = MatchContext::of::<Animal>().with_method_markers(&method);
        let converter = registry.make_response_body_converter(&cx).unwrap();
        assert!(converter.model().is::<Animal>());
    }

    #[test]
    fn unrelated_type_never_matches() {
        let mut registry = ConverterRegistry::new();
        load::<Animal>().using(&mut registry, record);
        load_from_json::<Animal>().using(&mut registry, record);
        registry.register(dump::<Animal>().attach(|_: &'static ModelType, _: &dyn Any| {
            Ok::<_, BoxError>(Payload::Text(String::new()))
        }));

        let all: [&dyn Marker; 4] = [&ReturnsJson, &Json, &Body, &Header];
        let contexts = [
            MatchContext::of::<Plant>(),
            MatchContext::of::<Plant>().with_param_markers(&all),
            MatchContext::of::<Plant>().with_method_markers(&all),
            MatchContext::of::<Plant>()
                .with_param_markers(&all)
                .with_method_markers(&all),
        ];

        for cx in &contexts {
            assert!(registry.make_response_body_converter(cx).is_none());
            assert!(registry.make_request_body_converter(cx).is_none());
        }
    }

    #[test]
    fn supertype_never_matches() {
        let mut registry = ConverterRegistry::new();
        load::<Dog>().using(&mut registry, record);

        assert!(load_as_str(&registry, &MatchContext::of::<Animal>()).is_none());
        assert!(
            registry
                .make_response_body_converter(&MatchContext::of::<Puppy>())
                .is_some()
        );
    }

    #[test]
    fn overlapping_families_fall_through() {
        let mut registry = ConverterRegistry::new();
        registry.register(
            load_with(Dog::model_type(), MarkerSet::new().with::<Body>()).attach(named("dog body")),
        );
        registry.register(load::<Animal>().attach(named("animal")));

        assert_eq!(registry.strategies::<Load>().len(), 2);

        let body: [&dyn Marker; 1] = [&Body];
        assert_eq!(
            load_as_str(&registry, &MatchContext::of::<Puppy>().with_param_markers(&body)),
            Some("dog body")
        );
        // The first strategy declines, the second one is tried.
        assert_eq!(load_as_str(&registry, &MatchContext::of::<Puppy>()), Some("animal"));
        assert_eq!(
            load_as_str(&registry, &MatchContext::of::<Animal>().with_param_markers(&body)),
            Some("animal")
        );
    }

    #[test]
    fn registration_order_wins() {
        let mut registry = ConverterRegistry::new();
        registry.register(load::<Animal>().attach(named("first")));
        registry.register(load::<Animal>().attach(named("second")));

        assert_eq!(load_as_str(&registry, &MatchContext::of::<Dog>()), Some("first"));
    }

    #[test]
    fn exhaustion_is_none() {
        let registry = ConverterRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.find::<Load>(&MatchContext::of::<Dog>()).is_none());
        assert!(registry.find::<Dump>(&MatchContext::of::<Dog>()).is_none());
    }

    #[test]
    fn superset_law() {
        let universe = [
            MarkerType::of::<ReturnsJson>(),
            MarkerType::of::<Body>(),
            MarkerType::of::<Header>(),
        ];
        let instances: [&dyn Marker; 3] = [&ReturnsJson, &Body, &Header];

        // Every subset of the universe, as a bit mask.
        let bits = |mask: usize| (0..3_usize).filter(move |&bit| mask & (1 << bit) != 0);
        let subset = |mask: usize| -> MarkerSet { bits(mask).map(|bit| universe[bit]).collect() };

        for required in 0..8_usize {
            let strategy = load_with(Animal::model_type(), subset(required)).attach(record);

            for supplied in 0..8_usize {
                let expected = supplied & required == required;
                let all: Vec<&dyn Marker> = bits(supplied).map(|bit| instances[bit]).collect();

                // Split the supplied markers between parameter and method.
                let (param, method) = all.split_at(all.len() / 2);
                let cx = MatchContext::of::<Dog>()
                    .with_param_markers(param)
                    .with_method_markers(method);
                assert_eq!(strategy.try_bind(&cx).is_some(), expected);
                assert_eq!(cx.supplied_markers().is_superset(&subset(required)), expected);

                let plant = MatchContext::of::<Plant>()
                    .with_param_markers(param)
                    .with_method_markers(method);
                assert!(strategy.try_bind(&plant).is_none());
            }
        }
    }

    #[test]
    fn duplicate_markers_collapse() {
        let strategy = load_with(Animal::model_type(), MarkerSet::new().with::<Body>().with::<Header>())
            .attach(record);

        let param: [&dyn Marker; 3] = [&Body, &Body, &Body];
        let cx = MatchContext::of::<Dog>().with_param_markers(&param);
        assert!(strategy.try_bind(&cx).is_none());

        let method: [&dyn Marker; 2] = [&Header, &Body];
        let cx = cx.with_method_markers(&method);
        assert!(strategy.try_bind(&cx).is_some());
    }

    #[test]
    fn converter_is_stateless() {
        let mut registry = ConverterRegistry::new();
        load::<Animal>().using(&mut registry, record);

        let converter = registry
            .make_response_body_converter(&MatchContext::of::<Dog>())
            .unwrap();
        let payload = Payload::Json(json!({"name": "Rex"}));

        let direct = [
            record(Dog::model_type(), payload.clone()).unwrap(),
            record(Dog::model_type(), payload.clone()).unwrap(),
        ];
        let bound = [
            converter.convert_as::<Seen>(payload.clone()).unwrap(),
            converter.convert_as::<Seen>(payload).unwrap(),
        ];
        assert_eq!(direct, bound);
    }

    #[test]
    fn directions_are_separate() {
        let mut registry = ConverterRegistry::new();
        load_from_json::<Animal>().using(&mut registry, record);
        registry.register(dump_to_json::<Animal>().attach(|ty: &'static ModelType, _: &dyn Any| {
            Ok::<_, BoxError>(json!({ "type": ty.type_name() }))
        }));
        assert_eq!(registry.len(), 2);

        // Each preset requires the marker of its own direction.
        let returns_json: [&dyn Marker; 1] = [&ReturnsJson];
        let json: [&dyn Marker; 1] = [&Json];
        let load_cx = MatchContext::of::<Dog>().with_method_markers(&returns_json);
        let dump_cx = MatchContext::of::<Dog>().with_method_markers(&json);

        assert!(registry.make_response_body_converter(&load_cx).is_some());
        assert!(registry.make_request_body_converter(&load_cx).is_none());
        assert!(registry.make_response_body_converter(&dump_cx).is_none());

        let converter = registry.make_request_body_converter(&dump_cx).unwrap();
        assert_eq!(
            converter.convert(&Dog).unwrap(),
            Payload::Json(json!({"type": "Dog"}))
        );
    }

    #[derive(Debug, PartialEq)]
    struct Rejected(&'static str);

    impl fmt::Display for Rejected {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "rejected: {}", self.0)
        }
    }

    impl core::error::Error for Rejected {}

    #[test]
    fn user_errors_are_unchanged() {
        let mut registry = ConverterRegistry::new();
        registry.register(load::<Animal>().attach(|ty: &'static ModelType, _: Payload| {
            Err::<(), _>(Rejected(ty.type_name()))
        }));

        let converter = registry
            .make_response_body_converter(&MatchContext::of::<Puppy>())
            .unwrap();

        let err = converter.convert(Payload::Text(String::new())).unwrap_err();
        assert_eq!(err.to_string(), "rejected: Puppy");
        assert_eq!(err.downcast::<Rejected>().ok().map(|e| *e), Some(Rejected("Puppy")));

        // The same error through `convert_as`.
        let err = converter.convert_as::<()>(Payload::Text(String::new())).unwrap_err();
        assert!(err.downcast_ref::<Rejected>().is_some());
    }

    #[test]
    fn boxed_user_errors_are_not_boxed_twice() {
        let strategy = load::<Animal>().attach(|_: &'static ModelType, _: Payload| {
            Err::<(), BoxError>(Box::new(Rejected("boxed")))
        });

        let converter = strategy.try_bind(&MatchContext::of::<Dog>()).unwrap();
        let err = converter.convert(Payload::Text(String::new())).unwrap_err();
        assert!(err.downcast_ref::<Rejected>().is_some());
    }

    #[test]
    fn mismatched_output() {
        let mut registry = ConverterRegistry::new();
        registry.register(load::<Animal>().attach(named("not a number")));

        let converter = registry
            .make_response_body_converter(&MatchContext::of::<Dog>())
            .unwrap();
        let err = converter.convert_as::<u32>(Payload::Text(String::new())).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<crate::ConvertError>(),
            Some(crate::ConvertError::MismatchedOutput { .. })
        ));
    }

    #[test]
    fn dump_receives_instance() {
        #[derive(serde::Serialize)]
        struct Cat {
            name: String,
        }
        impl_model!(Cat: Animal);

        let mut registry = ConverterRegistry::new();
        registry.register(dump::<Animal>().attach(
            |ty: &'static ModelType, value: &dyn Any| -> Result<Payload, BoxError> {
                let cat = crate::downcast_model::<Cat>(ty, value)?;
                Ok(Payload::json(cat)?)
            },
        ));

        let converter = registry
            .make_request_body_converter(&MatchContext::of::<Cat>())
            .unwrap();
        let cat = Cat {
            name: "Tom".to_string(),
        };
        assert_eq!(
            converter.convert(&cat).unwrap(),
            Payload::Json(json!({"name": "Tom"}))
        );
        assert!(converter.convert(&Dog).is_err());
    }

    #[test]
    fn debug_lists_strategies() {
        let mut registry = ConverterRegistry::new();
        load_from_json::<Animal>().using(&mut registry, record);

        let debug = alloc::format!("{registry:?}");
        assert!(debug.contains("ReturnsJson"));
        assert!(debug.contains("Animal"));
        assert!(debug.contains("dumpers: []"));
    }

    #[test]
    fn shadowed_strategies_stay_registered() {
        let mut registry = ConverterRegistry::new();
        registry.register(load::<Animal>().attach(named("general")));
        registry.register(load_from_json::<Dog>().attach(named("specific")));

        let strategies = registry.strategies::<Load>();
        assert!(strategies[0].shadows(&strategies[1]));
        assert!(!strategies[1].shadows(&strategies[0]));

        let method: [&dyn Marker; 1] = [&ReturnsJson];
        let cx = MatchContext::of::<Dog>().with_method_markers(&method);
        assert_eq!(load_as_str(&registry, &cx), Some("general"));
    }

    #[test]
    fn concurrent_binding() {
        use alloc::sync::Arc;
        use std::thread;

        let mut registry = ConverterRegistry::new();
        load::<Animal>().using(&mut registry, record);
        let registry = Arc::new(registry);

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    (0..64)
                        .map(|_| {
                            let cx = if i % 2 == 0 {
                                MatchContext::of::<Dog>()
                            } else {
                                MatchContext::of::<Puppy>()
                            };
                            let converter = registry.make_response_body_converter(&cx).unwrap();
                            converter.convert_as::<Seen>(Payload::Json(json!(i))).unwrap()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let model = if i % 2 == 0 { "Dog" } else { "Puppy" };
            for seen in handle.join().unwrap() {
                assert_eq!(
                    seen,
                    Seen {
                        model,
                        payload: json!(i),
                    }
                );
            }
        }
    }

    #[cfg(feature = "std")]
    #[test]
    fn shared_handle() {
        use std::thread;

        use super::ConverterRegistryArc;

        let shared = ConverterRegistryArc::default();
        let writer = shared.clone();
        thread::spawn(move || {
            writer.write().register(load::<Animal>().attach(named("shared")));
        })
        .join()
        .unwrap();

        assert_eq!(shared.read().len(), 1);
        assert_eq!(load_as_str(&shared.read(), &MatchContext::of::<Dog>()), Some("shared"));
        assert!(alloc::format!("{shared:?}").contains("ConverterRegistry"));

        let wrapped = ConverterRegistryArc::new(ConverterRegistry::new());
        assert!(wrapped.read().is_empty());
    }

    #[test]
    fn strategies_in_order() {
        let mut registry = ConverterRegistry::new();
        registry.register(load::<Dog>().attach(named("dog")));
        registry.register(load::<Animal>().attach(named("animal")));

        let bases: Vec<_> = registry
            .strategies::<Load>()
            .iter()
            .map(|strategy| strategy.family().base().type_name())
            .collect();
        assert_eq!(bases, vec!["Dog", "Animal"]);
        assert!(registry.strategies::<Dump>().is_empty());
    }

    #[cfg(feature = "auto_register")]
    mod auto_register {
        use alloc::string::String;

        use vc_model::{ModelType, impl_model};

        use crate::{ConverterRegistry, MatchContext, Payload, auto_register_strategy, load};

        struct Ticket;
        impl_model!(Ticket);

        fn register_ticket(registry: &mut ConverterRegistry) {
            registry.register(load::<Ticket>().attach(|ty: &'static ModelType, _: Payload| {
                Ok::<_, &'static str>(ty.type_name())
            }));
        }

        auto_register_strategy!(register_ticket);

        #[test]
        fn auto_register() {
            let mut registry = ConverterRegistry::new();
            assert!(registry.auto_register());
            let registered = registry.len();
            assert!(registered >= 1);

            // Registration functions run once per registry.
            assert!(registry.auto_register());
            assert_eq!(registry.len(), registered);

            let converter = registry
                .make_response_body_converter(&MatchContext::of::<Ticket>())
                .unwrap();
            let name = converter.convert_as::<&str>(Payload::Text(String::new())).unwrap();
            assert_eq!(name, "Ticket");
        }
    }
}
