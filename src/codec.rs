//! Decoding and encoding of persisted collections.
//!
//! Decoding never trusts the stored text: the outer value must be a JSON array,
//! and each element is decoded on its own so a single foreign or truncated record
//! does not take the rest of the collection down with it.

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Outcome of decoding one store value.
#[derive(Debug)]
pub enum Decoded<T> {
    /// The key has never been written.
    Absent,
    /// The value is an array; `foreign` holds the elements that did not match
    /// the schema, untouched and in their original order.
    Parsed { records: Vec<T>, foreign: Vec<Value> },
    /// The value is not a JSON array at all.
    Malformed(serde_json::Error),
}

impl<T> Decoded<T> {
    /// Fail-open view: anything that is not a parsed array becomes empty.
    pub fn into_records(self) -> Vec<T> {
        match self {
            Decoded::Parsed { records, .. } => records,
            Decoded::Absent | Decoded::Malformed(_) => Vec::new(),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Decoded::Malformed(_))
    }
}

pub fn decode_collection<T: DeserializeOwned>(raw: Option<&str>) -> Decoded<T> {
    let Some(raw) = raw else {
        return Decoded::Absent;
    };
    let elements: Vec<Value> = match serde_json::from_str(raw) {
        Ok(elements) => elements,
        Err(err) => return Decoded::Malformed(err),
    };

    let mut records = Vec::with_capacity(elements.len());
    let mut foreign = Vec::new();
    for element in elements {
        // from_value consumes its input, so decode from a borrowed view.
        match <T as Deserialize>::deserialize(&element) {
            Ok(record) => records.push(record),
            Err(_) => foreign.push(element),
        }
    }
    Decoded::Parsed { records, foreign }
}

pub fn encode_collection<T: Serialize>(records: &[T]) -> Result<String, serde_json::Error> {
    serde_json::to_string(records)
}

/// Encode `records` followed by elements this build could not decode.
pub fn encode_with_foreign<T: Serialize>(
    records: &[T],
    foreign: &[Value],
) -> Result<String, serde_json::Error> {
    if foreign.is_empty() {
        return encode_collection(records);
    }
    let mut elements = records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<Value>, _>>()?;
    elements.extend(foreign.iter().cloned());
    serde_json::to_string(&elements)
}

/// Decodes a single scalar value such as the `darkMode` flag.
pub fn decode_value<T: DeserializeOwned>(raw: Option<&str>) -> Option<T> {
    raw.and_then(|raw| serde_json::from_str(raw).ok())
}
