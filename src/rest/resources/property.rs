//! Custom file properties.
//!
//! Some services (Box, Egnyte, Google Drive) store key/value properties on
//! files. The properties endpoint answers with
//! `{"properties": [{"key": ..., "value": ..., "created": ..., "modified": ...}]}`.
//!
//! ```rust,ignore
//! let properties = file.properties();
//! properties.delete_all().await?;
//!
//! let current = properties
//!     .update(&[
//!         PropertyUpdate::set("key1", "value1"),
//!         PropertyUpdate::remove("key2"),
//!     ])
//!     .await?;
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::HttpResponse;
use crate::rest::{Resource, ResourceError, ResourceKind, ResourceOperation};

/// One custom property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// The property key.
    pub key: String,
    /// The property value.
    pub value: Value,
    /// When the property was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// When the property was last modified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
}

/// One entry of a property patch. A `null` value removes the key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyUpdate {
    /// The property key.
    pub key: String,
    /// The new value, or `null` to remove the key.
    pub value: Value,
}

impl PropertyUpdate {
    /// Adds or changes `key`.
    #[must_use]
    pub fn set(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Removes `key`.
    #[must_use]
    pub fn remove(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Value::Null,
        }
    }
}

#[derive(Deserialize)]
struct PropertyList {
    #[serde(default)]
    properties: Vec<Property>,
}

/// The properties of one file.
#[derive(Debug, Clone)]
pub struct PropertyCollection {
    file: Resource,
}

impl PropertyCollection {
    pub(crate) const fn new(file: Resource) -> Self {
        Self { file }
    }

    /// Lists every property.
    ///
    /// # Errors
    ///
    /// Returns API or transport errors, or [`ResourceError::Decode`] for an
    /// unexpected body.
    pub async fn all(&self) -> Result<Vec<Property>, ResourceError> {
        let target = self.file.resolve(ResourceOperation::ListProperties)?;
        let response = self
            .file
            .client()
            .get(&target.path, None)
            .await
            .map_err(|e| self.file.map_error(e))?;
        parse_properties(response)
    }

    /// Applies a patch and returns the resulting properties.
    ///
    /// # Errors
    ///
    /// Returns API or transport errors, or [`ResourceError::Decode`] for an
    /// unexpected body.
    pub async fn update(&self, updates: &[PropertyUpdate]) -> Result<Vec<Property>, ResourceError> {
        let target = self.file.resolve(ResourceOperation::UpdateProperties)?;
        let body = serde_json::to_value(updates).map_err(|e| ResourceError::Decode {
            resource: ResourceKind::File.name(),
            message: e.to_string(),
        })?;
        let response = self
            .file
            .send_json(&target, body, None)
            .await
            .map_err(|e| self.file.map_error(e))?;
        parse_properties(response)
    }

    /// Removes every property.
    ///
    /// # Errors
    ///
    /// Returns API or transport errors.
    pub async fn delete_all(&self) -> Result<(), ResourceError> {
        let target = self.file.resolve(ResourceOperation::DeleteProperties)?;
        self.file
            .client()
            .delete(&target.path, None)
            .await
            .map_err(|e| self.file.map_error(e))?;
        Ok(())
    }
}

fn parse_properties(response: HttpResponse) -> Result<Vec<Property>, ResourceError> {
    if response.body.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value::<PropertyList>(response.body)
        .map(|list| list.properties)
        .map_err(|e| ResourceError::Decode {
            resource: ResourceKind::File.name(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_property_update_serializes_null_for_removal() {
        let updates = vec![
            PropertyUpdate::remove("key1"),
            PropertyUpdate::set("key2", "hello"),
        ];
        assert_eq!(
            serde_json::to_value(&updates).unwrap(),
            json!([{"key": "key1", "value": null}, {"key": "key2", "value": "hello"}])
        );
    }

    #[test]
    fn test_parse_properties() {
        let body = json!({"properties": [
            {"key": "key2", "value": "hello", "created": "2024-01-01T00:00:00Z", "modified": "2024-01-02T00:00:00Z"},
            {"key": "key3", "value": "value3"}
        ]});
        let properties = parse_properties(HttpResponse::new(200, HashMap::new(), body)).unwrap();

        assert_eq!(properties.len(), 2);
        assert_eq!(properties[0].key, "key2");
        assert!(properties[0].created.is_some());
        assert_eq!(properties[1].value, json!("value3"));
        assert!(properties[1].modified.is_none());
    }

    #[test]
    fn test_parse_empty_properties() {
        let empty = parse_properties(HttpResponse::new(200, HashMap::new(), json!({}))).unwrap();
        assert!(empty.is_empty());

        let no_body = parse_properties(HttpResponse::new(204, HashMap::new(), Value::Null)).unwrap();
        assert!(no_body.is_empty());

        assert!(parse_properties(HttpResponse::new(200, HashMap::new(), json!([1]))).is_err());
    }
}
