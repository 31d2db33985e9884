//! Request and response shapes exchanged with the triggering surface.
//!
//! A toolbar action or shortcut sends a [`ConvertRequest`] naming a command;
//! the converter answers with a [`ConvertResponse`] carrying the Markdown that
//! the clipboard collaborator writes out.

use serde::{Deserialize, Serialize};

use crate::Result;

/// A conversion request. The command identifier is opaque to the converter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertRequest {
    pub message: String,
}

/// The converter's answer
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConvertResponse {
    pub markdown: String,
}

impl ConvertRequest {
    /// Decode a request from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl ConvertResponse {
    /// Encode the response as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
