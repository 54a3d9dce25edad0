pub mod auth_dto;
pub mod candidate_dto;
pub mod employee_dto;
pub mod meet_dto;
pub mod metrics_dto;

use serde::{Deserialize, Deserializer};

/// Distinguishes "field absent" from "field explicitly null" in PATCH bodies:
/// absent maps to the outer `None`, `null` to `Some(None)`, a value to
/// `Some(Some(v))`. Use together with `#[serde(default)]`.
pub fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}
