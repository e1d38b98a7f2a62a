use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::task_data::TaskResponseData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::task::errors::TaskError;
use crate::domain::task::models::TaskId;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn get_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(task_id): Path<String>,
) -> Result<ApiSuccess<TaskResponseData>, ApiError> {
    let task_id = TaskId::from_string(&task_id).map_err(TaskError::from)?;

    state
        .task_service
        .get_task(task_id, user.user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref task| {
            ApiSuccess::new(
                StatusCode::OK,
                TaskResponseData::new(task, &user.username),
            )
        })
}
