use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::task_data::TaskRequestBody;
use super::task_data::TaskResponseData;
use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn create_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(body): ApiJson<TaskRequestBody>,
) -> Result<ApiSuccess<TaskResponseData>, ApiError> {
    state
        .task_service
        .create_task(user.user_id, body.try_into_create_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref task| {
            ApiSuccess::new(
                StatusCode::CREATED,
                TaskResponseData::new(task, &user.username),
            )
        })
}
