use thiserror::Error;

/// Why a single symbol could not be turned into a usable series.
///
/// Every variant is recovered the same way (the symbol is skipped), but the
/// kind is kept so callers and tests can tell them apart.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("rate limited by market data source (HTTP {status})")]
    RateLimited { status: u16 },

    #[error("market data source refused this origin (HTTP {status})")]
    Blocked { status: u16 },

    #[error("market data source returned HTTP {status}")]
    Http { status: u16 },

    #[error("market data source error {code}: {msg}")]
    Api { code: i64, msg: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("market data source returned no candles")]
    Empty,

    #[error("insufficient history: got {got} candles, need {need}")]
    InsufficientHistory { got: usize, need: usize },

    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),
}

impl FetchError {
    /// Maps a non-success HTTP status to its error kind.
    pub fn from_status(status: u16) -> Self {
        match status {
            418 | 429 => Self::RateLimited { status },
            403 | 451 => Self::Blocked { status },
            _ => Self::Http { status },
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Malformed(e.to_string())
        } else if let Some(status) = e.status() {
            Self::from_status(status.as_u16())
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(FetchError::from_status(429), FetchError::RateLimited { status: 429 }));
        assert!(matches!(FetchError::from_status(418), FetchError::RateLimited { .. }));
        assert!(FetchError::from_status(451).is_blocked());
        assert!(FetchError::from_status(403).is_blocked());
        assert!(matches!(FetchError::from_status(500), FetchError::Http { status: 500 }));
    }
}
