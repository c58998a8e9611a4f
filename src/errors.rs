use thiserror::Error;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum AppError {
    /// Upstream JSON-RPC operations
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// File I/O and socket operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration issues
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP server failures
    #[error("Server error: {0}")]
    Server(String),

    /// Data validation/parsing
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// RPC error types
#[derive(Error, Debug)]
pub enum RpcError {
    /// Could not reach the JSON-RPC endpoint
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Endpoint answered with a non-2xx status
    #[error("Unexpected HTTP status: {status}")]
    HttpStatus { status: u16 },

    /// Failed to deserialise RPC response data
    #[error("Deserialisation failed: {0}")]
    DeserialisationFailed(String),

    /// RPC request timed out
    #[error("Request timeout: {timeout_seconds}s for {operation}")]
    Timeout {
        timeout_seconds: u64,
        operation: String,
    },

    /// RPC returned unexpected or malformed response data
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Node answered with a JSON-RPC error object
    #[error("Node error {code}: {message}")]
    NodeError { code: i64, message: String },

    /// Result was not a `0x`-prefixed hexadecimal quantity
    #[error("Invalid hex quantity: {value:?}")]
    InvalidHexQuantity { value: String },
}

/// Application-wide result type - single point of truth
pub type AppResult<T> = Result<T, AppError>;

/// Result type for RPC operations
pub type RpcResult<T> = Result<T, RpcError>;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidData(format!("JSON error: {}", err))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<reqwest::Error> for RpcError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            RpcError::HttpStatus {
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            RpcError::DeserialisationFailed(err.to_string())
        } else if err.is_connect() || err.is_request() {
            RpcError::ConnectionFailed(err.to_string())
        } else {
            RpcError::ConnectionFailed(format!("Request failed: {}", err))
        }
    }
}
