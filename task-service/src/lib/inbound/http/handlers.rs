use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use crate::task::errors::TaskError;
use crate::user::errors::PasswordError;
use crate::user::errors::UserError;

pub mod create_task;
pub mod delete_task;
pub mod get_task;
pub mod health;
pub mod list_tasks;
pub mod login;
pub mod logout;
pub mod register;
pub mod task_data;
pub mod update_task;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<T>);

impl<T: Serialize> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// JSON body extractor whose rejections use the service's error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    NotFound(String),
    Unauthorized(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "Request failed");
                "Internal server error".to_string()
            }
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) | ApiError::Unauthorized(msg) => {
                msg
            }
        };

        error_response(status, &message)
    }
}

/// Error body shared by handlers and the authentication gate.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({
            "error": message,
            "timestamp": Utc::now().to_rfc3339(),
        })),
    )
        .into_response()
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::UsernameAlreadyExists(_)
            | UserError::InvalidUsername(_)
            | UserError::Password(PasswordError::Blank) => ApiError::BadRequest(err.to_string()),
            UserError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            UserError::NotFoundByUsername(_) => ApiError::NotFound(err.to_string()),
            UserError::Password(PasswordError::HashingFailed(_))
            | UserError::Token(_)
            | UserError::DatabaseError(_)
            | UserError::Unknown(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::InvalidTaskId(_) | TaskError::InvalidTitle(_) => {
                ApiError::BadRequest(err.to_string())
            }
            TaskError::NotFound(_) => ApiError::NotFound(err.to_string()),
            TaskError::DatabaseError(_) | TaskError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}
