use alloc::borrow::Cow;
use core::any::TypeId;
use core::fmt;

use crate::ConfigError;
use crate::hash::{HashMap, HashSet, new_map, new_set};
use crate::model::{Model, ModelType};

// -----------------------------------------------------------------------------
// ModelCatalog

/// A catalog of known [model types].
///
/// Strategies are usually registered with a statically known base type,
/// e.g. [`ModelFamily::of::<Animal>()`](crate::ModelFamily::of). When the base
/// type only comes as a string, the catalog resolves it and reports a
/// [`ConfigError`] if the string does not name a registered model type.
///
/// # Example
///
/// ```
/// use vc_model::{ConfigError, Model, ModelCatalog, impl_model};
///
/// pub struct Animal;
/// pub struct Dog;
/// impl_model!(Animal);
/// impl_model!(Dog: Animal);
///
/// let mut catalog = ModelCatalog::new();
/// catalog.register::<Dog>();
///
/// // Ancestors are registered too.
/// assert!(catalog.contains(Animal::model_type()));
///
/// assert_eq!(catalog.resolve("Dog"), Ok(Dog::model_type()));
/// assert!(matches!(
///     catalog.resolve("Cat"),
///     Err(ConfigError::UnknownModel { .. }),
/// ));
/// ```
///
/// [model types]: ModelType
pub struct ModelCatalog {
    model_table: HashMap<TypeId, &'static ModelType>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
    #[cfg_attr(not(feature = "auto_register"), allow(dead_code))]
    auto_registered: bool,
}

impl Default for ModelCatalog {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ModelCatalog {
    /// Creates an empty catalog.
    #[inline]
    pub const fn new() -> Self {
        Self {
            model_table: new_map(),
            type_path_to_id: new_map(),
            type_name_to_id: new_map(),
            ambiguous_names: new_set(),
            auto_registered: false,
        }
    }

    // # Validity
    // The type must **not** already exist.
    fn add_new_type_indices(&mut self, ty: &'static ModelType) {
        let type_name = ty.type_name();

        // Check for duplicate names.
        if !self.ambiguous_names.contains(type_name) {
            if self.type_name_to_id.contains_key(type_name) {
                self.type_name_to_id.remove(type_name);
                self.ambiguous_names.insert(type_name);
                log::debug!("model name `{type_name}` became ambiguous");
            } else {
                self.type_name_to_id.insert(type_name, ty.id());
            }
        }

        // For new type, assuming that the full path cannot be duplicated.
        self.type_path_to_id.insert(ty.type_path(), ty.id());
    }

    /// Registers `ty` and all of its ancestors.
    ///
    /// Returns `false` if `ty` was already registered, in which case nothing changes.
    pub fn register_type(&mut self, ty: &'static ModelType) -> bool {
        if self.model_table.contains_key(&ty.id()) {
            return false;
        }
        for item in ty.ancestors() {
            if self.model_table.contains_key(&item.id()) {
                continue;
            }
            self.model_table.insert(item.id(), item);
            self.add_new_type_indices(item);
            log::debug!("registered model type `{item}`");
        }
        true
    }

    /// Registers `M` and all of its ancestors.
    ///
    /// See [`register_type`](Self::register_type).
    #[inline]
    pub fn register<M: Model>(&mut self) -> bool {
        self.register_type(M::model_type())
    }

    /// Registers every model type submitted with
    /// [`auto_register_model!`](crate::auto_register_model).
    ///
    /// Repeated calls are cheap and will not insert duplicates.
    ///
    /// ## Return Value
    ///
    /// Returns `true` if automatic registration is available, that is, the
    /// `auto_register` feature is enabled. Otherwise does nothing and returns `false`.
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            use crate::__macro_exports::{AutoRegisterModel, inventory};

            if !self.auto_registered {
                for AutoRegisterModel(model_type) in inventory::iter::<AutoRegisterModel> {
                    self.register_type(model_type());
                }
                self.auto_registered = true;
            }
            true
        }

        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    /// Whether the given model type has been registered.
    #[inline]
    pub fn contains(&self, ty: &ModelType) -> bool {
        self.model_table.contains_key(&ty.id())
    }

    /// Returns the model type with the given [`TypeId`].
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&'static ModelType> {
        self.model_table.get(&type_id).copied()
    }

    /// Returns the model type with the given full type path.
    pub fn get_with_type_path(&self, type_path: &str) -> Option<&'static ModelType> {
        // Manual inline
        match self.type_path_to_id.get(type_path) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns the model type with the given short type name.
    ///
    /// If the name is ambiguous, returns `None`.
    pub fn get_with_type_name(&self, type_name: &str) -> Option<&'static ModelType> {
        match self.type_name_to_id.get(type_name) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns `true` if the given short type name matches multiple registered types.
    #[inline]
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    /// Resolves a full type path or a short type name.
    ///
    /// Full paths are tried first. A leading `::` is ignored.
    pub fn resolve(&self, name: &str) -> Result<&'static ModelType, ConfigError> {
        let name = name.strip_prefix("::").unwrap_or(name);

        if let Some(ty) = self.get_with_type_path(name) {
            return Ok(ty);
        }
        if let Some(ty) = self.get_with_type_name(name) {
            return Ok(ty);
        }
        if self.is_ambiguous(name) {
            return Err(ConfigError::AmbiguousModel {
                type_name: Cow::Owned(name.into()),
            });
        }
        Err(ConfigError::UnknownModel {
            type_path: Cow::Owned(name.into()),
        })
    }

    /// Returns the number of registered model types.
    #[inline]
    pub fn len(&self) -> usize {
        self.model_table.len()
    }

    /// Returns an iterator over the registered model types, in no particular order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'static ModelType> {
        self.model_table.values().copied()
    }
}

impl fmt::Debug for ModelCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.type_path_to_id.keys()).finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::ModelCatalog;
    use crate::{ConfigError, Model, impl_model};

    struct Animal;
    struct Dog;

    impl_model!(Animal);
    impl_model!(Dog: Animal);

    mod zoo {
        pub struct Animal;
        crate::impl_model!(Animal);
    }

    #[test]
    fn register_with_ancestors() {
        let mut catalog = ModelCatalog::new();
        assert!(catalog.register::<Dog>());
        assert!(!catalog.register::<Dog>());
        assert!(!catalog.register::<Animal>());

        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains(Animal::model_type()));
        assert_eq!(
            catalog.get(Animal::model_type().id()),
            Some(Animal::model_type())
        );
    }

    #[test]
    fn lookup() {
        let mut catalog = ModelCatalog::new();
        catalog.register::<Dog>();

        let path = Dog::model_type().type_path();
        assert_eq!(catalog.get_with_type_path(path), Some(Dog::model_type()));
        assert_eq!(catalog.get_with_type_name("Dog"), Some(Dog::model_type()));
        assert_eq!(catalog.resolve(path), Ok(Dog::model_type()));
        assert_eq!(catalog.resolve("Dog"), Ok(Dog::model_type()));
    }

    struct Item;
    struct Page<T>(core::marker::PhantomData<T>);
    impl_model!(Page<self::Item>);

    #[test]
    fn generic_names() {
        let mut catalog = ModelCatalog::new();
        catalog.register::<Page<Item>>();

        let page = <Page<Item> as Model>::model_type();
        assert_eq!(catalog.get_with_type_name("Page<self::Item>"), Some(page));
        assert_eq!(catalog.get_with_type_name("Item>"), None);
        assert_eq!(catalog.resolve(page.type_path()), Ok(page));
    }

    #[test]
    fn ambiguous_names() {
        let mut catalog = ModelCatalog::new();
        catalog.register::<Dog>();
        catalog.register::<zoo::Animal>();

        assert!(catalog.is_ambiguous("Animal"));
        assert_eq!(catalog.get_with_type_name("Animal"), None);
        assert!(matches!(
            catalog.resolve("Animal"),
            Err(ConfigError::AmbiguousModel { .. })
        ));

        // Full paths stay usable.
        let path = zoo::Animal::model_type().type_path();
        assert_eq!(catalog.resolve(path), Ok(zoo::Animal::model_type()));
    }

    #[test]
    fn unknown() {
        let catalog = ModelCatalog::new();
        let err = catalog.resolve("::app::Missing").unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownModel {
                type_path: "app::Missing".into()
            }
        );
        assert_eq!(
            alloc::string::ToString::to_string(&err),
            "`app::Missing` is not a registered model type"
        );
    }

    #[cfg(feature = "auto_register")]
    mod auto {
        use super::super::ModelCatalog;
        use crate::{Model, auto_register_model, impl_model};

        struct Receipt;
        struct Refund;

        impl_model!(Receipt);
        impl_model!(Refund: Receipt);
        auto_register_model!(Refund);

        #[test]
        fn auto_register() {
            let mut catalog = ModelCatalog::new();
            assert!(catalog.auto_register());
            assert!(catalog.auto_register());
            assert!(catalog.contains(Refund::model_type()));
            assert!(catalog.contains(Receipt::model_type()));
        }
    }
}
