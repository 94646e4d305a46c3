//! Structured records for persistence and interchange.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::Result;

/// Conversion to and from the JSON record format.
///
/// Every entity round-trips: `T::from_record(x.to_record()?)? == x`.
pub trait Record: Serialize + DeserializeOwned {
    /// Encode as a JSON value.
    fn to_record(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Decode from a JSON value, rejecting missing fields and unknown discriminators.
    fn from_record(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Encode as a JSON string.
    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from a JSON string.
    fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
