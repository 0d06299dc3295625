use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};

// -----------------------------------------------------------------------------
// Model

/// A type that takes part in a model hierarchy.
///
/// Implement it through [`impl_model!`](crate::impl_model), which declares the
/// parents of the type at the same time:
///
/// ```
/// use vc_model::{Model, impl_model};
///
/// pub struct Animal;
/// pub struct Pet;
/// pub struct Dog;
///
/// impl_model!(Animal);
/// impl_model!(Pet);
/// impl_model!(Dog: Animal, Pet);
///
/// let dog = Dog::model_type();
/// assert!(dog.is_subtype_of(Animal::model_type()));
/// assert!(dog.is_subtype_of(Pet::model_type()));
/// assert!(!Animal::model_type().is_subtype_of(dog));
/// ```
pub trait Model: 'static {
    /// Returns the static descriptor of this model type.
    fn model_type() -> &'static ModelType;
}

// -----------------------------------------------------------------------------
// ModelType

/// Static descriptor of a model type.
///
/// A `ModelType` is the runtime handle of a type inside a model hierarchy.
/// Two descriptors are equal when they describe the same [`TypeId`],
/// paths and parents are not compared.
///
/// Descriptors are normally created by [`impl_model!`](crate::impl_model) and
/// live in a `static`, so `&'static ModelType` can be freely copied around.
pub struct ModelType {
    type_id: fn() -> TypeId,
    type_path: &'static str,
    parents: &'static [fn() -> &'static ModelType],
}

impl ModelType {
    /// Creates a descriptor for `T`.
    ///
    /// `type_path` must not start with `::`.
    ///
    /// This is usually called by [`impl_model!`](crate::impl_model).
    #[inline]
    pub const fn new<T: ?Sized + 'static>(
        type_path: &'static str,
        parents: &'static [fn() -> &'static ModelType],
    ) -> Self {
        Self {
            type_id: TypeId::of::<T>,
            type_path,
            parents,
        }
    }

    /// Returns the [`TypeId`] of the described type.
    #[inline]
    pub fn id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Returns `true` if this descriptor describes `T`.
    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id() == TypeId::of::<T>()
    }

    /// Returns the full path of the type, e.g. `my_crate::models::Dog`.
    #[inline(always)]
    pub const fn type_path(&self) -> &'static str {
        self.type_path
    }

    // Splits the path at the last `::` outside of the generic arguments.
    fn split_path(&self) -> (Option<&'static str>, &'static str) {
        let path = self.type_path;
        let generics = path.find('<').unwrap_or(path.len());
        match path[..generics].rfind("::") {
            Some(index) => (Some(&path[..index]), &path[index + 2..]),
            None => (None, path),
        }
    }

    /// Returns the type name without module path, e.g. `Dog` or `Page<my_crate::User>`.
    ///
    /// Generic arguments are kept as written.
    pub fn type_name(&self) -> &'static str {
        self.split_path().1
    }

    /// Returns the type name without module path and generics, e.g. `Page`.
    pub fn type_ident(&self) -> &'static str {
        let name = self.type_name();
        match name.find('<') {
            Some(index) => &name[..index],
            None => name,
        }
    }

    /// Returns the module path of the type, if any.
    pub fn module_path(&self) -> Option<&'static str> {
        self.split_path().0
    }

    /// Returns an iterator over the direct parents of this type.
    pub fn parents(&self) -> impl ExactSizeIterator<Item = &'static ModelType> {
        self.parents.iter().map(|parent| parent())
    }

    /// Returns `true` if the type declares no parent.
    #[inline]
    pub const fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Returns a depth-first iterator over this type and all of its ancestors.
    ///
    /// Every type is yielded once, even if it can be reached through several
    /// parents or the declared hierarchy is cyclic.
    pub fn ancestors(&'static self) -> Ancestors {
        Ancestors {
            stack: alloc::vec![self],
            visited: Vec::new(),
        }
    }

    /// Returns `true` if `self` is `base` or one of its descendants.
    ///
    /// This is the structural subclass test of model hierarchies.
    pub fn is_subtype_of(&self, base: &ModelType) -> bool {
        let target = base.id();
        if self.id() == target {
            return true;
        }

        let mut stack: Vec<&'static ModelType> = self.parents().collect();
        let mut visited: Vec<TypeId> = Vec::new();

        while let Some(ty) = stack.pop() {
            let id = ty.id();
            if id == target {
                return true;
            }
            if visited.contains(&id) {
                continue;
            }
            visited.push(id);
            stack.extend(ty.parents());
        }

        false
    }
}

impl PartialEq for ModelType {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for ModelType {}

impl Hash for ModelType {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelType")
            .field("type_path", &self.type_path)
            .field(
                "parents",
                &self.parents().map(ModelType::type_path).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl fmt::Display for ModelType {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_path)
    }
}

// -----------------------------------------------------------------------------
// Ancestors

/// Iterator returned by [`ModelType::ancestors`].
pub struct Ancestors {
    stack: Vec<&'static ModelType>,
    visited: Vec<TypeId>,
}

impl Iterator for Ancestors {
    type Item = &'static ModelType;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(ty) = self.stack.pop() {
            let id = ty.id();
            if self.visited.contains(&id) {
                continue;
            }
            self.visited.push(id);
            // Reverse so that the first declared parent is visited first.
            let len = self.stack.len();
            self.stack.extend(ty.parents());
            self.stack[len..].reverse();
            return Some(ty);
        }
        None
    }
}

// -----------------------------------------------------------------------------
// Tests
