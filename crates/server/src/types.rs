use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize, Default)]
pub struct DebugParams {
    pub debug: Option<bool>,
}

#[derive(Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Value>,
    pub result: T,
}

/// A user-visible message, optionally pointing the client at the next page.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Notice {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub redirect: Option<String>,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            redirect: None,
        }
    }

    pub fn redirect_to(mut self, path: &str) -> Self {
        self.redirect = Some(path.to_string());
        self
    }
}
