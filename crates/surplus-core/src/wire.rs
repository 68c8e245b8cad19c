//! Serde helpers for the service's loosely typed JSON.

use serde::{Deserialize, Deserializer};

/// Read an explicit `null` the same as a missing field.
///
/// The service serialises empty SQL aggregates and unset columns as `null`;
/// one such value must not fail the whole row or list.
pub(crate) fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}
