use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::task_data::TaskResponseData;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<Vec<TaskResponseData>>, ApiError> {
    let tasks = state.task_service.list_tasks(user.user_id).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        tasks
            .iter()
            .map(|task| TaskResponseData::new(task, &user.username))
            .collect(),
    ))
}
