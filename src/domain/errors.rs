// Domain-level errors surfaced by request handlers. Every variant carries
// the internal detail for logging; none of it reaches the caller.
#[derive(Debug)]
pub enum ApiError {
    Database(String),
    Internal(String),
}

impl ApiError {
    // Internal detail for the log sink, never for the response body.
    pub fn detail(&self) -> &str {
        match self {
            ApiError::Database(detail) | ApiError::Internal(detail) => detail,
        }
    }
}

// Failures of the server lifecycle itself.
#[derive(Debug)]
pub enum ServerError {
    DatabaseConnect(String),
    Serve(std::io::Error),
}
