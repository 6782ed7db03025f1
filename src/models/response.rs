use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            status: "success",
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FailureResponse {
    pub status: &'static str,
    pub message: String,
}

impl FailureResponse {
    pub fn new(message: impl Into<String>) -> Self {
        FailureResponse {
            status: "failed",
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedId {
    pub id: i32,
}
