//! Sheet-backed rows come back with numeric-looking cells as JSON numbers.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Cell {
    Text(String),
    Integer(i64),
    Float(f64),
}

pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Cell::deserialize(deserializer)? {
        Cell::Text(value) => value,
        Cell::Integer(value) => value.to_string(),
        Cell::Float(value) => value.to_string(),
    })
}
