use serde::Deserialize;

pub mod business;
pub mod customer;
pub mod organization;
pub mod role;
pub mod user;

pub use business::*;
pub use customer::*;
pub use organization::*;
pub use role::*;
pub use user::*;

/// Distinguishes an absent field from an explicit `null` in partial updates:
/// `None` = not supplied, `Some(None)` = set NULL, `Some(Some(v))` = set value.
pub fn deserialize_optional_field<'de, T, D>(
    deserializer: D,
) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Ok(Some(Option::<T>::deserialize(deserializer)?))
}
