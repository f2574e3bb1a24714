use tracing::{error, warn};

/// Classified failure of a single TMDB call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("TMDB rejected the API key (401)")]
    Unauthorized,
    #[error("TMDB rate limit exceeded (429)")]
    RateLimited,
    #[error("TMDB resource not found: {0}")]
    NotFound(String),
    #[error("request to TMDB failed: {0}")]
    Network(String),
    #[error("TMDB returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode TMDB response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn from_status(status: u16, endpoint: &str, body: String) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            429 => ApiError::RateLimited,
            404 => ApiError::NotFound(endpoint.to_string()),
            _ => ApiError::Status { status, body },
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "unauthorized",
            ApiError::RateLimited => "rate_limited",
            ApiError::NotFound(_) => "not_found",
            ApiError::Network(_) => "network",
            ApiError::Status { .. } => "status",
            ApiError::Decode(_) => "decode",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    /// Log with a kind-specific diagnostic. Users only ever see [`user_message`].
    pub fn log(&self, what: &str) {
        match self {
            ApiError::Unauthorized => {
                error!(kind = self.kind(), "Invalid TMDB API key while fetching {}; check TMDB_API_KEY", what)
            }
            ApiError::RateLimited => {
                warn!(kind = self.kind(), "TMDB rate limit exceeded while fetching {}", what)
            }
            _ => error!(kind = self.kind(), "Error fetching {}: {}", what, self),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

pub fn user_message(what: &str) -> String {
    format!("Failed to fetch {}. Please try again later.", what)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_statuses() {
        assert_eq!(
            ApiError::from_status(401, "/movie/1", String::new()),
            ApiError::Unauthorized
        );
        assert_eq!(
            ApiError::from_status(429, "/movie/1", String::new()),
            ApiError::RateLimited
        );
        assert!(ApiError::from_status(404, "/movie/1", String::new()).is_not_found());
        assert_eq!(
            ApiError::from_status(500, "/movie/1", "boom".to_string()).kind(),
            "status"
        );
    }

    #[test]
    fn user_message_is_generic() {
        assert_eq!(
            user_message("movies"),
            "Failed to fetch movies. Please try again later."
        );
    }
}
