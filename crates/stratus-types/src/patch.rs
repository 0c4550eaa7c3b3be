//! Partial-update ("patch") wire primitives.

use serde::Serialize;
use serde::ser::SerializeMap;

/// A single-field update: set a new value or clear the field.
///
/// Wire form is `{"set": value}` or `{"setNull": true}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    /// Replace the field with the given value.
    Set(T),
    /// Clear the field on the server.
    SetNull,
}

impl<T: Serialize> Serialize for FieldUpdate<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::Set(value) => map.serialize_entry("set", value)?,
            Self::SetNull => map.serialize_entry("setNull", &true)?,
        }
        map.end()
    }
}
