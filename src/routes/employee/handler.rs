use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::{AppState, error::AppError, utils::success_to_api_response};

use super::model::Employee;

/// 返回全部员工记录，认证由中间件保证
#[axum::debug_handler]
pub async fn list_employees(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let employees = Employee::list_all(&state.pool).await?;

    Ok((StatusCode::OK, success_to_api_response(employees)))
}
