//! Observation snapshots returned by the world service

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// World state visible to an agent.
///
/// The service does not publish a schema, so the body is kept as a JSON object
/// and fields are read through accessors that report the missing path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Observation(Map<String, Value>);

impl Observation {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Walk nested objects by key.
    ///
    /// An absent key anywhere along the way reports the full requested path; a
    /// non-object in the middle reports the path up to that value.
    pub fn get_path(&self, path: &[&str]) -> Result<&Value, SchemaError> {
        let missing = || SchemaError::Missing {
            path: path.join("."),
        };

        let (first, rest) = path.split_first().ok_or_else(missing)?;
        let mut current = self.0.get(*first).ok_or_else(missing)?;

        for (depth, key) in rest.iter().enumerate() {
            let object = current.as_object().ok_or_else(|| SchemaError::WrongType {
                path: path[..=depth].join("."),
                expected: "an object",
            })?;
            current = object.get(*key).ok_or_else(missing)?;
        }

        Ok(current)
    }

    pub fn get_str(&self, path: &[&str]) -> Result<&str, SchemaError> {
        self.get_path(path)?
            .as_str()
            .ok_or_else(|| SchemaError::WrongType {
                path: path.join("."),
                expected: "a string",
            })
    }

    /// Id of the unit this agent controls (`unit.id`)
    pub fn unit_id(&self) -> Result<&str, SchemaError> {
        self.get_str(&["unit", "id"])
    }
}
