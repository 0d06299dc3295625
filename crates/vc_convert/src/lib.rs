//! Custom conversion strategies for model families.
//!
//! A strategy pairs a [`ModelFamily`](vc_model::ModelFamily) and a set of
//! required markers with a user conversion function. The request pipeline
//! asks the [`ConverterRegistry`] for a converter with a [`MatchContext`],
//! and every registered [`Strategy`] either declines or returns a
//! [`Converter`] bound to the encountered model type.
//!
//! ## Menu
//!
//! - Entry points: [`load`], [`load_from_json`], [`dump`], [`dump_to_json`] and
//!   their `_with` / `_by_path` variants.
//! - [`StrategyBuilder`]: a family and required markers, without a function yet.
//! - [`Strategy`]: a builder with its function attached, see [`Strategy::try_bind`].
//! - [`Converter`]: the function bound to the encountered model type.
//! - [`ConverterRegistry`]: ordered strategies of both directions.
//! - [`Payload`]: the data flowing in and out of conversion functions.
//!
//! # Example
//!
//! ```
//! use vc_convert::{ConverterRegistry, MatchContext, Payload, load_from_json};
//! use vc_model::{Marker, Model, ModelType, ReturnsJson, impl_model};
//!
//! pub struct Animal;
//! #[derive(Debug, PartialEq)]
//! pub struct Dog {
//!     name: String,
//! }
//!
//! impl_model!(Animal);
//! impl_model!(Dog: Animal);
//!
//! fn load_animal(ty: &'static ModelType, payload: Payload) -> Result<Dog, &'static str> {
//!     assert!(ty.is::<Dog>());
//!     let json = payload.as_json().ok_or("not json")?;
//!     let name = json["name"].as_str().ok_or("missing name")?;
//!     Ok(Dog { name: name.into() })
//! }
//!
//! let mut registry = ConverterRegistry::new();
//!
//! // Registers the strategy, and hands the function back.
//! let f = load_from_json::<Animal>().using(&mut registry, load_animal);
//! assert!(f(Dog::model_type(), Payload::Json(serde_json::json!({"name": "Odie"}))).is_ok());
//!
//! // Not tagged as JSON: no custom strategy applies.
//! let cx = MatchContext::of::<Dog>();
//! assert!(registry.make_response_body_converter(&cx).is_none());
//!
//! let method: [&dyn Marker; 1] = [&ReturnsJson];
//! let cx = MatchContext::of::<Dog>().with_method_markers(&method);
//! let converter = registry.make_response_body_converter(&cx).unwrap();
//!
//! let dog = converter
//!     .convert_as::<Dog>(Payload::Json(serde_json::json!({"name": "Rex"})))
//!     .unwrap();
//! assert_eq!(dog, Dog { name: "Rex".into() });
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

mod builder;
mod context;
mod converter;
mod direction;
mod entry;
mod error;
mod payload;
mod registry;
mod strategy;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use builder::StrategyBuilder;
pub use context::MatchContext;
pub use converter::{Converter, downcast_model};
pub use direction::{BoxError, Direction, Dump, DumpFn, Load, LoadFn};
pub use entry::{dump, dump_by_path, dump_to_json, dump_with};
pub use entry::{load, load_by_path, load_from_json, load_with};
pub use error::ConvertError;
pub use payload::{Payload, PayloadKind};
pub use registry::ConverterRegistry;
pub use strategy::Strategy;

#[cfg(feature = "std")]
pub use registry::ConverterRegistryArc;
