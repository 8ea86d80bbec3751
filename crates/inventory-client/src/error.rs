//! Client error types.

/// Errors that can occur when using the inventory client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server rejected a value.
    #[error("invalid value {value} for field {field}")]
    InvalidValue {
        /// Name of the offending field.
        field: String,
        /// The offending value.
        value: String,
    },

    /// Another mutation holds the inventory lock. Retrying later may succeed.
    #[error("inventory is currently locked")]
    Locked,

    /// Removal requested more than is available.
    #[error("not available: available={available}, requested={requested}")]
    NotAvailable {
        /// Quantity available.
        available: u64,
        /// Quantity requested.
        requested: u64,
    },

    /// Server returned any other error response.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code.
        code: String,
        /// Error message.
        message: String,
        /// HTTP status code.
        status: u16,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
