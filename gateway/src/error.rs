//! Gateway failure taxonomy

/// Failures that can come back from a gateway call.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    /// The provider could not be reached or returned a server error
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The provider rejected the call due to rate limiting
    #[error("rate limited by provider")]
    RateLimited,

    /// The provider answered but the response was empty or malformed
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// The call did not complete within the allowed time
    #[error("provider call timed out")]
    Timeout,
}

impl GatewayError {
    /// Whether the caller's retry policy should attempt this call again.
    /// Rate limits and timeouts are transient; the other kinds are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::Timeout)
    }

    /// Short machine-readable name for logs and run records.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ProviderUnavailable(_) => "provider_unavailable",
            Self::RateLimited => "rate_limited",
            Self::InvalidResponse(_) => "invalid_response",
            Self::Timeout => "timeout",
        }
    }
}
