/// Errors from the customer API client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// The server's `error` message, or the raw body when it has none.
        message: String,
    },

    /// The form failed local validation; nothing was sent.
    #[error("Invalid form: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }

    /// True for local validation failures and server-side 400s.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ClientError::Validation(_) | ClientError::Api { status: 400, .. }
        )
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
