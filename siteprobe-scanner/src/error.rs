use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid retry policy: {0}")]
    InvalidPolicy(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;

/// Why a single probe attempt did not produce a live verdict.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    /// Timeout, refused/reset connection, TLS handshake failure. Always retryable.
    #[error("{kind} error: {message}")]
    Transport {
        kind: TransportErrorKind,
        message: String,
    },

    /// The server answered with an error status. 404 is terminal, the rest retry.
    #[error("rejected with HTTP {status}")]
    Rejected { status: u16 },

    /// Success status but the body looks like an error or placeholder page.
    #[error("ambiguous body on HTTP {status}")]
    AmbiguousBody { status: u16 },
}

impl ProbeFailure {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProbeFailure::Rejected { status: 404 })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Tls,
    Other,
}

impl std::fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportErrorKind::Timeout => write!(f, "timeout"),
            TransportErrorKind::Connect => write!(f, "connection"),
            TransportErrorKind::Tls => write!(f, "tls"),
            TransportErrorKind::Other => write!(f, "transport"),
        }
    }
}
