use thiserror::Error;

pub type SourceResult<T> = Result<T, SourceError>;

/// Failures talking to the paginated source API.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed-to-perform-request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP bad response: {status}")]
    BadStatus { status: u16 },

    #[error("failed-to-decode-response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid route {route}: {reason}")]
    InvalidRoute { route: String, reason: String }
}

/// Failures returned by the destination role service.
#[derive(Debug, Error)]
pub enum RoleServiceError {
    #[error("role service request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("role service rejected {operation}: {status} - {message}")]
    Rejected {
        operation: String,
        status: u16,
        message: String
    },

    #[error("invalid role service url {url}: {reason}")]
    InvalidUrl { url: String, reason: String }
}

/// A failure attributed to one source route and resource.
///
/// Displays as its cause so that the report groups identical causes under
/// the same route.
#[derive(Debug, Error)]
#[error("{cause}")]
pub struct ErrorEvent {
    #[source]
    pub cause: Box<dyn std::error::Error + Send + Sync>,
    pub entity_type: String,
    pub guid: String
}

impl ErrorEvent {
    pub fn new(
        entity_type: impl Into<String>,
        guid: impl Into<String>,
        cause: impl Into<Box<dyn std::error::Error + Send + Sync>>
    ) -> Self {
        Self {
            cause: cause.into(),
            entity_type: entity_type.into(),
            guid: guid.into()
        }
    }
}

/// Everything that can travel on the error stream of a migration run.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Event(#[from] ErrorEvent),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    RoleService(#[from] RoleServiceError)
}

impl MigrationError {
    /// The route or resource class the error is attributed to, if any.
    pub fn entity_type(&self) -> Option<&str> {
        match self {
            Self::Event(event) => Some(event.entity_type.as_str()),
            Self::Source(_) | Self::RoleService(_) => None
        }
    }

    pub fn guid(&self) -> Option<&str> {
        match self {
            Self::Event(event) => Some(event.guid.as_str()),
            Self::Source(_) | Self::RoleService(_) => None
        }
    }
}

/// Failures of the orchestration itself, as opposed to the per-entity
/// failures that are collected into the report.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("migration task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("failed to write report: {0}")]
    Report(#[from] std::io::Error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_event_displays_cause() {
        let event = ErrorEvent::new(
            "/v2/organizations",
            "",
            SourceError::BadStatus { status: 502 }
        );
        assert_eq!(event.to_string(), "HTTP bad response: 502");
    }

    #[test]
    fn test_entity_type_only_for_events() {
        let tagged: MigrationError = ErrorEvent::new(
            "/v2/spaces/space-guid/user_roles",
            "space-guid",
            SourceError::BadStatus { status: 404 }
        )
        .into();
        assert_eq!(
            tagged.entity_type(),
            Some("/v2/spaces/space-guid/user_roles")
        );
        assert_eq!(tagged.guid(), Some("space-guid"));

        let untagged: MigrationError = RoleServiceError::Rejected {
            operation: "create-role".to_string(),
            status: 500,
            message: "boom".to_string()
        }
        .into();
        assert_eq!(untagged.entity_type(), None);
        assert_eq!(untagged.guid(), None);
    }
}
