/// Domain models for Budgetboard
///
/// Entities, the DTOs that create and update them, and the typed filters
/// used by `search`. Persistence lives behind [`crate::db::store::Store`];
/// these types carry no database handle.
///
/// # Models
///
/// - `user`: accounts and their board roles
/// - `board`: shared boards with administrators and members
/// - `category`: per-family categories, plus the [`Family`] discriminator
/// - `record`: per-family records with paging and ordering filters
/// - `group`: category groups and their subjects
/// - `reference`: seeded category types and currencies
///
/// All JSON uses camelCase keys.

pub mod board;
pub mod category;
pub mod group;
pub mod record;
pub mod reference;
pub mod user;

pub use category::Family;

use serde::{Deserialize, Deserializer};

/// Keeps "absent" and "null" apart on partial updates
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`: an absent
/// key stays `None`, an explicit `null` becomes `Some(None)`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
