//! Availability client error types.

use std::path::PathBuf;

/// Errors from the seat-availability API, or from the fixtures standing in
/// for it.
#[derive(Debug, thiserror::Error)]
pub enum AvailabilityError {
    /// Transport failure (connect, TLS, timeout)
    #[error("availability request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Body was not a calendar or seats payload
    #[error("unexpected {payload} payload: {message}")]
    Payload {
        payload: &'static str,
        message: String,
        /// Start of the offending body, for logs
        excerpt: String,
    },

    /// Any other non-success status
    #[error("availability API returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The seat detail behind a calendar row is gone, usually because the
    /// calendar was refreshed after it was read
    #[error("no seat data for segment {0}")]
    SegmentNotFound(String),

    #[error("rate limited by availability API{}", retry_hint(.retry_after_secs))]
    RateLimited { retry_after_secs: Option<u64> },

    /// The API refused the partner credential
    #[error("partner credential rejected")]
    Unauthorized,

    /// The credential cannot be sent at all
    #[error("partner credential {0}")]
    BadCredential(&'static str),

    /// The client was dropped while a request waited for a slot
    #[error("availability client closed")]
    Closed,

    /// Mock data on disk could not be loaded
    #[error("fixture {}: {message}", .path.display())]
    Fixture { path: PathBuf, message: String },
}

fn retry_hint(retry_after_secs: &Option<u64>) -> String {
    match retry_after_secs {
        Some(secs) => format!(" (retry after {secs}s)"),
        None => String::new(),
    }
}

impl AvailabilityError {
    /// Returns true if the same request may succeed later.
    pub fn is_transient(&self) -> bool {
        match self {
            AvailabilityError::Http(e) => e.is_timeout() || e.is_connect(),
            AvailabilityError::Status { status, .. } => *status >= 500,
            AvailabilityError::RateLimited { .. } => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = AvailabilityError::SegmentNotFound("2pLk9".into());
        assert_eq!(err.to_string(), "no seat data for segment 2pLk9");

        let err = AvailabilityError::Status {
            status: 502,
            message: "Bad Gateway".into(),
        };
        assert_eq!(err.to_string(), "availability API returned 502: Bad Gateway");

        let err = AvailabilityError::Payload {
            payload: "seats",
            message: "expected value".into(),
            excerpt: "<html>".into(),
        };
        assert_eq!(err.to_string(), "unexpected seats payload: expected value");

        let err = AvailabilityError::RateLimited {
            retry_after_secs: Some(30),
        };
        assert_eq!(err.to_string(), "rate limited by availability API (retry after 30s)");

        let err = AvailabilityError::RateLimited {
            retry_after_secs: None,
        };
        assert_eq!(err.to_string(), "rate limited by availability API");

        let err = AvailabilityError::Fixture {
            path: PathBuf::from("/tmp/availability.json"),
            message: "missing".into(),
        };
        assert_eq!(err.to_string(), "fixture /tmp/availability.json: missing");
    }

    #[test]
    fn transient_errors() {
        assert!(AvailabilityError::RateLimited { retry_after_secs: None }.is_transient());
        assert!(
            AvailabilityError::Status {
                status: 503,
                message: String::new()
            }
            .is_transient()
        );
        assert!(!AvailabilityError::Unauthorized.is_transient());
        assert!(!AvailabilityError::SegmentNotFound("x".into()).is_transient());
    }
}
