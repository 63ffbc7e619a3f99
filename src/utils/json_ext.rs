//! JSON serialization helpers.
//!
//! [`JsonSerializable`] is the seam the persistence layer uses to move
//! typed values in and out of JSON columns with a caller-chosen error type.

/// Types that can round-trip through a JSON string with error type `E`.
///
/// The persistence module provides a blanket implementation for every
/// `Serialize + DeserializeOwned` type using its own error enum, so
/// checkpointer backends call `to_json_string`/`from_json_str` without
/// repeating the error mapping.
pub trait JsonSerializable<E>: Sized {
    fn to_json_string(&self) -> Result<String, E>;
    fn from_json_str(s: &str) -> Result<Self, E>;
}
