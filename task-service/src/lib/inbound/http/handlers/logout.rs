use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Clears the login flag. Tokens already issued stay valid until they expire.
pub async fn logout(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LogoutRequestBody>,
) -> Result<ApiSuccess<LogoutResponseData>, ApiError> {
    let username = body
        .username
        .ok_or_else(|| ApiError::BadRequest("Username is required".to_string()))?;
    let username = Username::new(username).map_err(UserError::from)?;

    state.auth_service.logout(&username).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LogoutResponseData {
            message: "User logged out successfully".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogoutRequestBody {
    #[serde(default)]
    username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutResponseData {
    pub message: String,
}
