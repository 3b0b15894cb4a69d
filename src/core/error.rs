//! Error taxonomy shared by every data-access path
//!
//! Information Hiding:
//! - Raw transport errors never leave the repository/auth boundary
//! - Presentation code only sees these variants and their user messages

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    /// No token, or the backend rejected it. Recovered by logging in again.
    #[error("not authenticated")]
    Unauthenticated,

    #[error("not found: {0}")]
    NotFound(String),

    /// Rejected request; carries the backend detail when one was provided
    #[error("{0}")]
    ValidationFailure(String),

    #[error("transport failure: {0}")]
    TransportFailure(String),

    #[error("token storage failure: {0}")]
    Storage(String),
}

impl DashboardError {
    /// Text suitable for a notification. `Unauthenticated` is never shown as
    /// a raw error; the session layer redirects instead.
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::Unauthenticated => "Please log in to continue.".to_string(),
            DashboardError::NotFound(what) => format!("{} could not be found.", what),
            DashboardError::ValidationFailure(detail) => detail.clone(),
            DashboardError::TransportFailure(_) => {
                "Could not reach the server. Please try again.".to_string()
            }
            DashboardError::Storage(_) => "Could not access the saved session.".to_string(),
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, DashboardError::Unauthenticated)
    }
}

impl From<anyhow::Error> for DashboardError {
    fn from(err: anyhow::Error) -> Self {
        DashboardError::Storage(format!("{:#}", err))
    }
}

/// Failure reported by the transport layer, before translation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiFailure {
    #[error("HTTP {status}")]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },

    #[error("{0}")]
    Transport(String),
}

impl ApiFailure {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiFailure::Status { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiFailure::Status { detail, .. } => detail.as_deref(),
            ApiFailure::Transport(_) => None,
        }
    }

    /// Map into the taxonomy. `what` names the entity for `NotFound`.
    pub fn into_dashboard_error(self, what: &str) -> DashboardError {
        match self {
            ApiFailure::Status { status, .. } if status == StatusCode::UNAUTHORIZED => {
                DashboardError::Unauthenticated
            }
            ApiFailure::Status { status, .. } if status == StatusCode::NOT_FOUND => {
                DashboardError::NotFound(what.to_string())
            }
            ApiFailure::Status { status, detail } if status.is_client_error() => {
                DashboardError::ValidationFailure(
                    detail.unwrap_or_else(|| format!("Request rejected ({})", status)),
                )
            }
            ApiFailure::Status { status, detail } => DashboardError::TransportFailure(match detail {
                Some(detail) => format!("{}: {}", status, detail),
                None => status.to_string(),
            }),
            ApiFailure::Transport(msg) => DashboardError::TransportFailure(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16, detail: Option<&str>) -> ApiFailure {
        ApiFailure::Status {
            status: StatusCode::from_u16(code).unwrap(),
            detail: detail.map(String::from),
        }
    }

    #[test]
    fn test_status_translation() {
        assert_eq!(
            status(401, None).into_dashboard_error("Conversation 1"),
            DashboardError::Unauthenticated
        );
        assert_eq!(
            status(404, None).into_dashboard_error("Conversation 1"),
            DashboardError::NotFound("Conversation 1".to_string())
        );
        assert_eq!(
            status(400, Some("Email already exists")).into_dashboard_error("x"),
            DashboardError::ValidationFailure("Email already exists".to_string())
        );
        assert!(matches!(
            status(500, None).into_dashboard_error("x"),
            DashboardError::TransportFailure(_)
        ));
    }

    #[test]
    fn test_user_messages() {
        let err = DashboardError::TransportFailure("connection refused".to_string());
        assert!(err.user_message().contains("try again"));
        assert!(!err.user_message().contains("connection refused"));

        let err = DashboardError::ValidationFailure("Email already exists".to_string());
        assert_eq!(err.user_message(), "Email already exists");
    }
}
