use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

pub const ALL_FIELDS_REQUIRED: &str = "All fields are required.";
pub const SAVE_FAILED: &str = "Failed to save application.";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{}", ALL_FIELDS_REQUIRED)]
    MissingFields,

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("{}", SAVE_FAILED)]
    SaveFailed,
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self {
            Error::MissingFields | Error::Validation(_) => {
                (StatusCode::BAD_REQUEST, ALL_FIELDS_REQUIRED.to_string())
            }
            Error::SaveFailed => (StatusCode::INTERNAL_SERVER_ERROR, SAVE_FAILED.to_string()),
            Error::Database(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            other => {
                tracing::error!(error = %other, "Unhandled error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_error_kind() {
        assert_eq!(
            Error::MissingFields.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::SaveFailed.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::Config("PORT must be a number".into())
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
