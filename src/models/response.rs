use serde::Serialize;

// Envelope for mutation responses
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LiveScoresResponse<T> {
    pub live_scores: Vec<T>,
    pub count: usize,
}
