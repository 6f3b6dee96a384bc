//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::RegistryError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// RFC-9457 Problem Details for HTTP API errors
#[derive(Debug, Serialize)]
pub struct Problem {
    /// A URI reference that identifies the problem type
    #[serde(rename = "type")]
    pub type_uri: String,

    /// A short, human-readable summary of the problem type
    pub title: String,

    pub status: u16,

    /// A human-readable explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", status.as_u16()),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// 404 for classes that are unknown or not exposed over HTTP
    pub fn object_not_found(name: &str) -> Self {
        Problem::new(StatusCode::NOT_FOUND, "Object Not Found")
            .with_detail(format!("Object '{name}' was not found"))
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: RegistryError) -> Problem {
    match &error {
        RegistryError::NotRegistered { class } => Problem::object_not_found(class),

        RegistryError::CircularDependency { .. } => {
            Problem::new(StatusCode::CONFLICT, "Circular Dependency").with_detail(error.to_string())
        }

        RegistryError::Schema { .. }
        | RegistryError::InvalidPattern { .. }
        | RegistryError::UnknownValidator { .. } => {
            Problem::new(StatusCode::UNPROCESSABLE_ENTITY, "Invalid Class Declaration")
                .with_detail(error.to_string())
        }

        RegistryError::Validation(report) => {
            Problem::new(StatusCode::BAD_REQUEST, "Validation Error").with_detail(report.to_string())
        }

        RegistryError::Collection { .. } | RegistryError::Storage { .. } => {
            tracing::error!(error = %error, "Internal registry error");
            Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                .with_detail("An unexpected error occurred")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = map_domain_error(RegistryError::NotRegistered {
            class: "Ghost".to_string(),
        });
        assert_eq!(not_found.status, 404);
        assert_eq!(not_found.detail.as_deref(), Some("Object 'Ghost' was not found"));

        let cycle = map_domain_error(RegistryError::CircularDependency {
            class: "A".to_string(),
        });
        assert_eq!(cycle.status, 409);

        let storage = map_domain_error(RegistryError::Storage {
            reason: "disk full".to_string(),
        });
        assert_eq!(storage.status, 500);
        assert_eq!(storage.detail.as_deref(), Some("An unexpected error occurred"));
    }
}
