//! Typed accessors over tool-call arguments.

use serde::de::DeserializeOwned;

use crate::error::WayfareError;

/// Arguments passed to a tool, as decoded from the model's tool call.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    pub fn new(value: serde_json::Value) -> Self {
        Self { value }
    }

    /// The raw JSON value.
    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }

    /// Get a required string argument.
    pub fn get_str(&self, name: &str) -> Result<&str, WayfareError> {
        self.value
            .get(name)
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                WayfareError::InvalidArgument(format!("missing string argument '{name}'"))
            })
    }

    /// Get an optional string argument.
    pub fn get_str_opt(&self, name: &str) -> Option<&str> {
        self.value.get(name).and_then(|v| v.as_str())
    }

    /// Get a required number argument.
    pub fn get_f64(&self, name: &str) -> Result<f64, WayfareError> {
        self.value
            .get(name)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| {
                WayfareError::InvalidArgument(format!("missing number argument '{name}'"))
            })
    }

    /// Deserialize the full argument object into a typed struct.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, WayfareError> {
        Ok(serde_json::from_value(self.value.clone())?)
    }
}
