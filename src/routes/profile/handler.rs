use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    error::{AppError, is_unique_violation},
    middleware::CurrentUser,
    utils::success_to_api_response,
};

use super::model::{CreateProfileRequest, PatchProfileRequest, Profile, UpdateProfileRequest};

#[axum::debug_handler]
pub async fn create_profile(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<CreateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let fields = req.validate()?;

    let profile = match Profile::create(&state.pool, &current_user.user_id, &fields).await {
        Ok(profile) => profile,
        Err(e) if is_unique_violation(&e) => {
            // 每个用户最多一份资料
            return Err(AppError::Conflict("Profile already exists.".to_string()));
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!("Created profile for user: {}", current_user.username);

    Ok((StatusCode::CREATED, success_to_api_response(profile)))
}

/// 全量替换当前用户的资料
#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let fields = req.validate()?;

    let profile = Profile::update_full(&state.pool, &current_user.user_id, &fields)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found.".to_string()))?;

    Ok((StatusCode::OK, success_to_api_response(profile)))
}

/// 部分更新当前用户的资料，缺省字段保持原值
#[axum::debug_handler]
pub async fn update_own_profile(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<PatchProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let patch = req.validate()?;

    let profile = Profile::update_partial(&state.pool, &current_user.user_id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found.".to_string()))?;

    Ok((StatusCode::OK, success_to_api_response(profile)))
}
