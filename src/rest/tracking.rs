//! Dirty tracking for partial updates.
//!
//! [`TrackedFields`] holds a resource's field map, the server state it was
//! last synchronized with, and the set of field names written locally since
//! then. A write marks a field dirty even if the value is unchanged; the
//! dirty set is explicit rather than derived from a diff.
//!
//! # Example
//!
//! ```rust
//! use kloudless::rest::TrackedFields;
//! use serde_json::json;
//!
//! let server = json!({"id": "F1", "name": "test.txt", "size": 4});
//! let mut tracked = TrackedFields::from_server(server.as_object().unwrap().clone());
//! assert!(!tracked.is_dirty());
//!
//! tracked.set("name", json!("renamed test.txt"));
//! assert!(tracked.is_dirty());
//! assert_eq!(tracked.changed_fields(), json!({"name": "renamed test.txt"}));
//!
//! tracked.unset("name");
//! assert_eq!(tracked.get("name"), Some(&json!("test.txt")));
//! assert!(!tracked.is_dirty());
//! ```

use std::collections::BTreeSet;

use serde_json::{Map, Value};

/// A field map with an explicit set of locally modified field names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackedFields {
    fields: Map<String, Value>,
    /// Server state captured when loaded or after save. `None` until the
    /// resource exists server-side.
    original: Option<Map<String, Value>>,
    dirty: BTreeSet<String>,
}

impl TrackedFields {
    /// Creates an empty field map for a resource that does not exist yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a field map for a resource that does not exist yet, with
    /// every given field marked dirty.
    #[must_use]
    pub fn with_fields(fields: Map<String, Value>) -> Self {
        let dirty = fields.keys().cloned().collect();
        Self {
            fields,
            original: None,
            dirty,
        }
    }

    /// Creates a clean field map from a server representation.
    #[must_use]
    pub fn from_server(fields: Map<String, Value>) -> Self {
        Self {
            original: Some(fields.clone()),
            fields,
            dirty: BTreeSet::new(),
        }
    }

    /// Returns the current value of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns `true` if the field is present, dirty or not.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Stores a value and marks the field dirty.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        self.fields.insert(name.clone(), value);
        self.dirty.insert(name);
    }

    /// Drops the dirty mark on a field and restores its server value.
    ///
    /// A field the server never sent is removed. Returns `true` if the field
    /// was dirty.
    pub fn unset(&mut self, name: &str) -> bool {
        if !self.dirty.remove(name) {
            return false;
        }

        match self.original.as_ref().and_then(|orig| orig.get(name)) {
            Some(value) => {
                self.fields.insert(name.to_string(), value.clone());
            }
            None => {
                self.fields.remove(name);
            }
        }
        true
    }

    /// Returns `true` if any field was written since the last sync.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Returns the names of dirty fields in sorted order.
    pub fn dirty_fields(&self) -> impl Iterator<Item = &str> {
        self.dirty.iter().map(String::as_str)
    }

    /// Returns `true` if the field was written since the last sync.
    #[must_use]
    pub fn is_field_dirty(&self, name: &str) -> bool {
        self.dirty.contains(name)
    }

    /// Returns the request body for a save.
    ///
    /// For new resources every field is returned; for existing resources only
    /// dirty fields are.
    #[must_use]
    pub fn changed_fields(&self) -> Value {
        if self.is_new() {
            return Value::Object(self.fields.clone());
        }

        let changed = self
            .dirty
            .iter()
            .filter_map(|name| {
                self.fields
                    .get(name)
                    .map(|value| (name.clone(), value.clone()))
            })
            .collect();
        Value::Object(changed)
    }

    /// Replaces the field map with a fresh server representation and clears
    /// the dirty set.
    pub fn mark_clean(&mut self, server: Map<String, Value>) {
        self.original = Some(server.clone());
        self.fields = server;
        self.dirty.clear();
    }

    /// Returns `true` if the resource has never been synchronized with the
    /// server.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.original.is_none()
    }

    /// Returns the current field map.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consumes the tracker and returns the current field map.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }
}
