/// Gateway result type
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway error types
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Schema validation failed: {message}")]
    SchemaValidation { message: String },

    #[error("Backend timeout: {timeout_ms}ms")]
    BackendTimeout { timeout_ms: u64 },

    #[error("Backend returned status {status}")]
    BackendHttp { status: u16 },

    #[error("Backend unreachable: {message}")]
    BackendUnreachable { message: String },

    #[error("Invalid backend response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("Unknown adapter: {key}")]
    UnknownAdapter { key: String },
}
