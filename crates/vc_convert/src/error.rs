use thiserror::Error;

/// A enumeration of the errors produced by this crate itself.
///
/// Errors returned by user conversion functions are never wrapped in it,
/// they reach the caller as the [`BoxError`](crate::BoxError) they were boxed into.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConvertError {
    /// A deserialization function produced another type than the one requested.
    #[error("converter for `{model}` did not produce a `{expected}`")]
    MismatchedOutput {
        model: &'static str,
        expected: &'static str,
    },

    /// A serialization function received an instance of an unexpected type.
    #[error("converter for `{model}` expected a `{expected}` instance")]
    MismatchedInput {
        model: &'static str,
        expected: &'static str,
    },
}
