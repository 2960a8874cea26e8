use thiserror::Error;

/// Transport-level failure talking to the backend.
///
/// All variants are the same kind of error to callers: something went wrong
/// at the network/HTTP boundary. The variants only exist so logs and tests
/// can tell them apart; session state only ever keeps [`GatewayError::message`].
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}{}", detail_suffix(.detail.as_deref()))]
    UnexpectedStatus {
        status: u16,
        url: String,
        /// `detail` string from the backend's error body, when it sent one.
        detail: Option<String>,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl GatewayError {
    /// User-facing message for this failure.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status code, when the backend answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::UnexpectedStatus { status, .. } => Some(*status),
            GatewayError::Http(e) => e.status().map(|s| s.as_u16()),
            GatewayError::Deserialize { .. } | GatewayError::InvalidBaseUrl { .. } => None,
        }
    }
}

fn detail_suffix(detail: Option<&str>) -> String {
    detail.map(|d| format!(": {d}")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpected_status_message_includes_detail() {
        let err = GatewayError::UnexpectedStatus {
            status: 404,
            url: "http://localhost:8000/api/v1/products/X".to_owned(),
            detail: Some("Product not found".to_owned()),
        };
        assert_eq!(
            err.message(),
            "unexpected HTTP status 404 from http://localhost:8000/api/v1/products/X: Product not found"
        );
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn unexpected_status_message_without_detail() {
        let err = GatewayError::UnexpectedStatus {
            status: 500,
            url: "http://localhost:8000/x".to_owned(),
            detail: None,
        };
        assert_eq!(
            err.message(),
            "unexpected HTTP status 500 from http://localhost:8000/x"
        );
    }

    #[test]
    fn deserialize_error_has_no_status() {
        let source = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        let err = GatewayError::Deserialize {
            context: "search".to_owned(),
            source,
        };
        assert!(err.status().is_none());
        assert!(err.message().starts_with("JSON deserialization error for search"));
    }
}
