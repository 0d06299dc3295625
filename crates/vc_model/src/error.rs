use alloc::borrow::Cow;

use thiserror::Error;

/// A enumeration of configuration mistakes,
/// reported at registration time instead of being treated as a mismatch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The given path or name does not refer to a registered model type.
    #[error("`{type_path}` is not a registered model type")]
    UnknownModel { type_path: Cow<'static, str> },

    /// The given short name refers to several registered model types.
    #[error("model name `{type_name}` is ambiguous, use the full type path instead")]
    AmbiguousModel { type_name: Cow<'static, str> },
}
