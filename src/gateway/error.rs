use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

/// Normalized outcome of a failed backend call.
#[derive(Debug, Display)]
pub enum GatewayError {
    /// database or storage could not complete the request
    #[display(fmt = "{}", _0)]
    Transport(String),
    /// unique constraint or object-name collision
    #[display(fmt = "{}", _0)]
    Duplicate(String),
    #[display(fmt = "Data tidak ditemukan")]
    NotFound,
    /// rejected before any remote call was made
    #[display(fmt = "{}", _0)]
    Validation(String),
}

impl std::error::Error for GatewayError {}

impl From<sqlx::Error> for GatewayError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            // MySQL reports unique key violations as SQLSTATE 23000 "Duplicate entry ..."
            if db_err.code().as_deref() == Some("23000") && db_err.message().contains("Duplicate") {
                return GatewayError::Duplicate(db_err.message().to_string());
            }
        }
        if let sqlx::Error::RowNotFound = e {
            return GatewayError::NotFound;
        }
        GatewayError::Transport(e.to_string())
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        GatewayError::Transport(e.to_string())
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Transport(_) => StatusCode::BAD_GATEWAY,
            GatewayError::Duplicate(_) => StatusCode::CONFLICT,
            GatewayError::NotFound => StatusCode::NOT_FOUND,
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}
