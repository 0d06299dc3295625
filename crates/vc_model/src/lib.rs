//! Model families and call-site markers.
//!
//! This crate describes *what* a converter can be matched against:
//!
//! - [`ModelType`]: a static descriptor of one model type and its declared parents.
//! - [`ModelFamily`]: a base model type and all of its descendants, treated as one unit.
//! - [`Marker`]: an opaque tag attached to a method or a parameter, compared by type only.
//! - [`MarkerSet`]: a set of marker types, used to describe what a call site carries
//!   or what a strategy requires.
//! - [`ModelCatalog`]: resolves model types from their paths or names.
//!
//! # Example
//!
//! ```
//! use vc_model::{Model, ModelFamily, impl_model};
//!
//! pub struct Animal;
//! pub struct Dog;
//! pub struct Plant;
//!
//! impl_model!(Animal);
//! impl_model!(Dog: Animal);
//! impl_model!(Plant);
//!
//! let animals = ModelFamily::of::<Animal>();
//!
//! assert!(animals.is_member(Dog::model_type()));
//! assert!(animals.is_member(Animal::model_type()));
//! assert!(!animals.is_member(Plant::model_type()));
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

#[cfg(any(feature = "std", test))]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod catalog;
mod error;
mod hash;

pub mod marker;
pub mod model;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use catalog::ModelCatalog;
pub use error::ConfigError;
pub use marker::{Json, Marker, MarkerSet, MarkerType, ReturnsJson};
pub use model::{Ancestors, Model, ModelFamily, ModelType};
