//! Error types shared by the query layer and the HTTP handlers.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing required field(s): {0}")]
    MissingField(String),

    #[error("No valid fields to update.")]
    NothingToUpdate,

    #[error("Unknown column '{column}' for table {table}")]
    UnknownColumn { table: &'static str, column: String },

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Unable to establish connection to the database: {0}")]
    ConnectionUnavailable(#[source] sqlx::Error),

    #[error("Query execution failed: {source}")]
    Query {
        query: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingField(_)
            | Error::NothingToUpdate
            | Error::UnknownColumn { .. }
            | Error::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Error::ConnectionUnavailable(_) | Error::Query { .. } | Error::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Error::ConnectionUnavailable(_) => {
                json!({ "error": "Unable to establish connection to the database." })
            }
            // The driver message goes back to the caller as-is; it never carries credentials
            Error::Query { source, .. } => {
                json!({ "message": "Query execution failed.", "error": source.to_string() })
            }
            other => json!({ "error": other.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_mistakes_map_to_bad_request() {
        assert_eq!(
            Error::MissingField("bedID".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(Error::NothingToUpdate.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            Error::UnknownColumn { table: "Bed", column: "Colour".into() }.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn database_failures_map_to_server_error() {
        let err = Error::ConnectionUnavailable(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = Error::Query {
            query: "SELECT * FROM Bed".into(),
            source: sqlx::Error::RowNotFound,
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
