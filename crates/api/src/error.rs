use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Handler failures. Client mistakes carry a code and hint back to the caller;
/// anything else is reported to Sentry and surfaces as a generic 500.
#[derive(Debug)]
pub enum ApiError {
    BadRequest {
        code: &'static str,
        message: String,
        hint: &'static str,
    },
    Internal(anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    hint: Option<&'static str>,
}

impl ApiError {
    pub fn bad_request(code: &'static str, message: impl Into<String>, hint: &'static str) -> Self {
        ApiError::BadRequest {
            code,
            message: message.into(),
            hint,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest {
                code,
                message,
                hint,
            } => {
                tracing::debug!(code, %message, "rejected request");
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorBody {
                        code,
                        message,
                        hint: Some(hint),
                    }),
                )
                    .into_response()
            }
            ApiError::Internal(err) => {
                sentry_anyhow::capture_anyhow(&err);
                let detail = format!("{err:#}");
                tracing::error!(error = %detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        code: "INTERNAL",
                        message: "internal error".to_string(),
                        hint: None,
                    }),
                )
                    .into_response()
            }
        }
    }
}
