use thiserror::Error;

/// Why a generation produced no image.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("Image client was not initialized")]
    NotInitialized,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Response contained no image")]
    EmptyResponse,

    #[error("Could not decode image data: {0}")]
    Decode(String),
}

impl GenerateError {
    /// Network failures, rate limits and server errors might succeed when sent again.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for GenerateError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl From<base64::DecodeError> for GenerateError {
    fn from(e: base64::DecodeError) -> Self {
        Self::Decode(e.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn transient_failures() {
        assert!(GenerateError::Network("timed out".into()).is_transient());
        assert!(
            GenerateError::Api {
                status: 429,
                message: "slow down".into()
            }
            .is_transient()
        );
        assert!(
            GenerateError::Api {
                status: 503,
                message: "overloaded".into()
            }
            .is_transient()
        );
        assert!(
            !GenerateError::Api {
                status: 401,
                message: "bad key".into()
            }
            .is_transient()
        );
        assert!(!GenerateError::Decode("bad padding".into()).is_transient());
        assert!(!GenerateError::NotInitialized.is_transient());
    }
}
