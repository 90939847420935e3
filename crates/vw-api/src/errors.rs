use crate::dto::ApiResponse;
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vaultwatch_db::DatabaseError;
use vaultwatch_master::MasterApiError;

#[derive(Error, Debug, Serialize, Deserialize)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("Internal server error")]
    InternalServerError,
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        // NOTE: Error is already logged in the DatabaseError layer
        match err {
            DatabaseError::NotFound { .. } => {
                Self::NotFound("The requested resource was not found".to_string())
            }
            DatabaseError::Unavailable { .. }
            | DatabaseError::UnknownPlatform { .. }
            | DatabaseError::Query { .. } => {
                // Don't expose internal database details to clients
                Self::InternalServerError
            }
        }
    }
}

impl From<MasterApiError> for ApiError {
    fn from(err: MasterApiError) -> Self {
        if err.is_not_found() {
            tracing::warn!(error = %err, "Vault data provider has no such vault");
            return Self::NotFound("Vault not found".to_string());
        }

        tracing::error!(error = %err, "Vault data provider request failed");
        match err {
            MasterApiError::RateLimited => Self::ServiceUnavailable(
                "Vault data provider is rate limiting requests, retry later".to_string(),
            ),
            _ => Self::InternalServerError,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, msg) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            Self::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };
        let response: ApiResponse<()> = ApiResponse::error(msg);
        (status, Json(response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_errors_map_to_statuses() {
        let missing: ApiError = MasterApiError::NotFound("base/0xdead".to_string()).into();
        assert!(matches!(missing, ApiError::NotFound(_)));

        let not_listed: ApiError =
            MasterApiError::VaultNotListed("Gauntlet USD Alpha".to_string()).into();
        assert!(matches!(not_listed, ApiError::InternalServerError));

        let upstream: ApiError = MasterApiError::UpstreamStatus {
            status: 502,
            url: "https://api.vaults.fyi/v2/detailed-vaults".to_string(),
        }
        .into();
        assert_eq!(
            upstream.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let limited: ApiError = MasterApiError::RateLimited.into();
        assert_eq!(
            limited.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_database_errors_hide_details() {
        let err: ApiError = DatabaseError::query("insert snapshot", "syntax error").into();
        assert!(matches!(err, ApiError::InternalServerError));

        let err: ApiError = DatabaseError::NotFound {
            operation: "latest snapshot".to_string(),
        }
        .into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
