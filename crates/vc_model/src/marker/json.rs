/// Method-level marker: the response body is decoded as JSON.
///
/// Deserialization strategies registered with the JSON preset only apply to
/// call sites carrying this marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReturnsJson;

/// Method-level marker: the request body is encoded as JSON.
///
/// Serialization strategies registered with the JSON preset only apply to
/// call sites carrying this marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Json;

crate::impl_marker!(ReturnsJson);
crate::impl_marker!(Json);
