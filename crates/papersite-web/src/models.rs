use serde::{Deserialize, Serialize};

pub const NO_FILE_MESSAGE: &str = "No file provided";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred during upload";

/// JSON body of every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
