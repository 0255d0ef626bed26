//! Transport envelope.
//!
//! The realtime transport delivers events as a two-element JSON array: the
//! event name followed by its data object (`["new_message", {...}]`). An
//! [`Envelope`] holds that pair before the data is validated against the
//! schema for the name.

use serde_json::Value;

use crate::errors::{ProtocolError, Result};

/// A named event with unvalidated JSON data.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Event name.
    pub event: String,
    /// Event data. `Value::Null` when the event carries none.
    pub data: Value,
}

impl Envelope {
    /// Create an envelope from a name and data.
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self { event: event.into(), data }
    }

    /// Parse an envelope from its JSON text form.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Json`] if the text is not valid JSON or not a
    /// `[name]` / `[name, data]` array.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Build an envelope from an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Json`] if the value is not a `[name]` or
    /// `[name, data]` array with a string name.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Array(items) = value else {
            return Err(ProtocolError::Json("envelope must be an array".to_string()));
        };

        let mut items = items.into_iter();
        let event = match items.next() {
            Some(Value::String(name)) => name,
            Some(_) => return Err(ProtocolError::Json("event name must be a string".to_string())),
            None => return Err(ProtocolError::Json("envelope is empty".to_string())),
        };
        let data = items.next().unwrap_or(Value::Null);

        if items.next().is_some() {
            return Err(ProtocolError::Json(format!("{event}: too many envelope elements")));
        }

        Ok(Self { event, data })
    }

    /// JSON value form (`[name, data]`).
    pub fn to_value(&self) -> Value {
        Value::Array(vec![Value::String(self.event.clone()), self.data.clone()])
    }

    /// JSON text form (`["name", {...}]`).
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}
