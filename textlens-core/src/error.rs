//! Error types for analysis operations.

/// The main error type for textlens operations.
#[derive(Debug, thiserror::Error)]
pub enum LensError {
    /// User-supplied text or parameters are unusable
    #[error("invalid input: {0}")]
    Input(String),

    /// Missing or rejected API credential
    #[error("credential error: {0}")]
    Credential(String),

    /// Network-related errors
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Timeout errors
    #[error("request timeout: {0}")]
    Timeout(String),

    /// Rate limit errors
    #[error("rate limit exceeded: {0}")]
    RateLimit(String),

    /// Server-side failures (5xx-equivalent)
    #[error("service error: {0}")]
    Service(String),

    /// Request rejected outright by the remote service
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Provider-specific errors
    #[error("provider error: {0}")]
    Provider(String),

    /// All attempts were spent on transient failures
    #[error("call failed after {attempts} attempts: {last_error}")]
    Exhausted {
        attempts: u32,
        #[source]
        last_error: Box<LensError>,
    },

    /// Response decoded but does not conform to the expected shape
    #[error("schema violation: {0}")]
    SchemaViolation(String),

    /// Serialization/deserialization errors outside response validation
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Call abandoned between retry attempts
    #[error("operation cancelled")]
    Cancelled,

    /// Document loading or extraction errors
    #[error("document error: {0}")]
    Document(String),

    /// Result persistence errors
    #[error("output error: {0}")]
    Output(String),
}

impl LensError {
    /// Create an input error
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Create a credential error
    pub fn credential(msg: impl Into<String>) -> Self {
        Self::Credential(msg.into())
    }

    /// Create a timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limit(msg: impl Into<String>) -> Self {
        Self::RateLimit(msg.into())
    }

    /// Create a service error
    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a provider error
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create a schema violation error
    pub fn schema_violation(msg: impl Into<String>) -> Self {
        Self::SchemaViolation(msg.into())
    }

    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a document error
    pub fn document(msg: impl Into<String>) -> Self {
        Self::Document(msg.into())
    }

    /// Create an output error
    pub fn output(msg: impl Into<String>) -> Self {
        Self::Output(msg.into())
    }

    /// Wrap the last failure after the attempt ceiling was reached
    pub fn exhausted(attempts: u32, last_error: LensError) -> Self {
        Self::Exhausted {
            attempts,
            last_error: Box::new(last_error),
        }
    }

    /// Check if this is a retryable (transient) error
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LensError::Network(_)
                | LensError::Timeout(_)
                | LensError::RateLimit(_)
                | LensError::Service(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_errors_are_retryable() {
        assert!(LensError::timeout("read timed out").is_retryable());
        assert!(LensError::rate_limit("429").is_retryable());
        assert!(LensError::service("upstream overloaded").is_retryable());
    }

    #[test]
    fn terminal_errors_are_not_retryable() {
        assert!(!LensError::credential("bad key").is_retryable());
        assert!(!LensError::invalid_request("malformed body").is_retryable());
        assert!(!LensError::schema_violation("missing field").is_retryable());
        assert!(!LensError::input("empty text").is_retryable());
        assert!(!LensError::Cancelled.is_retryable());
    }

    #[test]
    fn exhausted_keeps_the_last_cause() {
        let err = LensError::exhausted(3, LensError::timeout("attempt 3 timed out"));
        match err {
            LensError::Exhausted {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*last_error, LensError::Timeout(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // exhaustion itself is terminal
        assert!(!LensError::exhausted(3, LensError::timeout("t")).is_retryable());
    }
}
