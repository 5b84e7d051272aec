//! Mapping from store errors to HTTP responses.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use herodex_core::Error;

use crate::api::MessageResponse;

/// A store error on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl ApiError {
    /// HTTP status for the wrapped error.
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::HeroNotFound { .. } => StatusCode::NOT_FOUND,
            Error::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            Error::Storage { .. }
            | Error::Io(_)
            | Error::Serialization(_)
            | Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client. Server-side details stay in the logs.
    pub fn public_message(&self) -> String {
        match &self.0 {
            Error::HeroNotFound { .. } => "Hero not found.".to_string(),
            Error::InvalidRequest { message } => message.clone(),
            _ => "Internal server error.".to_string(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(Error::invalid_request(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(Error::invalid_request(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, status = status.as_u16(), "Request rejected");
        }

        (status, Json(MessageResponse::new(self.public_message()))).into_response()
    }
}
