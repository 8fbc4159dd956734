// Shared JSON response envelopes

use serde::Serialize;

/// `{ message, data }`
#[derive(Serialize, Debug)]
pub struct DataResponse<T: Serialize> {
    pub message: String,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(message: &str, data: T) -> Self {
        Self {
            message: message.to_string(),
            data,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}
