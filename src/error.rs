use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// No credential presented on a gated route.
    #[error("token required")]
    TokenRequired,

    /// Bad signature, malformed or expired token. All three render the same
    /// message so the response cannot be used as a token-lifetime oracle.
    #[error("invalid token")]
    InvalidToken,

    /// Unknown username or wrong password. Generic on purpose to prevent
    /// username enumeration.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Valid identity without the required capability.
    #[error("forbidden")]
    Forbidden,

    /// The upstream API has no such resource.
    #[error("resource not found")]
    NotFound,

    /// Downstream dependency failure. Detail is logged, never serialized.
    #[error("upstream error")]
    Upstream(String),

    #[error("internal server error")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::TokenRequired => StatusCode::UNAUTHORIZED,
            ApiError::InvalidToken => StatusCode::FORBIDDEN,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Upstream(detail) => tracing::error!(%detail, "upstream failure"),
            ApiError::Internal(detail) => tracing::error!(%detail, "internal error"),
            _ => {}
        }

        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Upstream(err.to_string())
    }
}
