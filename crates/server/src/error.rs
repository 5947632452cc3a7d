use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use executors::{DispatchError, UnitError};
use services::services::{auth::AuthError, license::LicenseError};
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error, ts_rs::TS)]
#[ts(type = "string")]
pub enum ApiError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    License(#[from] LicenseError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Dispatch(err) => match err {
                DispatchError::UnitNotFound(_) => StatusCode::NOT_FOUND,
                DispatchError::DuplicateUnit(_) => StatusCode::CONFLICT,
                DispatchError::EmptyUnitName => StatusCode::BAD_REQUEST,
                DispatchError::Unit(UnitError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
                DispatchError::Unit(UnitError::Failed(_)) => StatusCode::INTERNAL_SERVER_ERROR,
                DispatchError::History(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Auth(err) => match err {
                AuthError::UsernameTaken | AuthError::EmailTaken => StatusCode::CONFLICT,
                AuthError::InvalidCredentials
                | AuthError::InvalidToken(_)
                | AuthError::UserNotFound => StatusCode::UNAUTHORIZED,
                AuthError::Validation(_) => StatusCode::BAD_REQUEST,
                AuthError::Hash(_)
                | AuthError::TokenIssue(_)
                | AuthError::TokenLifetime
                | AuthError::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::License(err) => match err {
                LicenseError::Missing => StatusCode::UNAUTHORIZED,
                LicenseError::Invalid => StatusCode::FORBIDDEN,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }

    /// Message sent to the client. Backend failures are replaced by a
    /// generic text; their detail only goes to the log.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Dispatch(DispatchError::History(_))
            | ApiError::Auth(
                AuthError::Hash(_)
                | AuthError::TokenIssue(_)
                | AuthError::TokenLifetime
                | AuthError::Join(_),
            ) => INTERNAL_ERROR_MESSAGE.to_string(),
            _ => self.to_string(),
        }
    }
}

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let error_message = self.public_message();

        if status_code.is_server_error() {
            tracing::error!("API error ({}): {:?}", status_code, self);
        } else {
            tracing::debug!("API error ({}): {}", status_code, error_message);
        }

        let response = ApiResponse::<()>::error(&error_message);
        (status_code, Json(response)).into_response()
    }
}
