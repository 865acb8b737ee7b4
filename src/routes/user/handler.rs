use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    cache::{CachedToken, TokenCacheOperations},
    error::{AppError, is_unique_violation},
    utils::{hash_password, success_to_api_response},
};

use super::model::{AuthToken, LoginRequest, SignupRequest, TokenResponse, User};

#[axum::debug_handler]
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (username, password, email) = req.validate()?;

    let password_hash = hash_password(&password)?;

    let user = match User::create(&state.pool, &username, &password_hash, email.as_deref()).await {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            return Err(AppError::Conflict("Username already exists.".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let token = AuthToken::mint(&state.pool, &user.id).await?;
    tracing::info!("Created user: {}", user.username);

    warm_token_cache(&state, &token, &user).await;

    Ok((
        StatusCode::CREATED,
        success_to_api_response(TokenResponse { token: token.key }),
    ))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (username, password) = req.validate()?;

    // 未知用户和密码错误返回同一条消息
    let user = User::find_by_username(&state.pool, &username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid username or password.".to_string()))?;

    if !user.verify_login(&password)? {
        return Err(AppError::Unauthorized(
            "Invalid username or password.".to_string(),
        ));
    }

    let token = AuthToken::fetch_or_mint(&state.pool, &user.id).await?;

    warm_token_cache(&state, &token, &user).await;

    Ok((
        StatusCode::OK,
        success_to_api_response(TokenResponse { token: token.key }),
    ))
}

/// 预热令牌缓存，失败只记日志不影响响应
async fn warm_token_cache(state: &AppState, token: &AuthToken, user: &User) {
    let cached = CachedToken {
        token: token.key.clone(),
        user_id: user.id,
        username: user.username.clone(),
    };

    if let Err(e) =
        TokenCacheOperations::cache_token(&state.redis, &cached, state.config.token_cache_ttl())
            .await
    {
        tracing::warn!("Failed to warm token cache: {}", e);
    }
}
