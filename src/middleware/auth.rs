use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use uuid::Uuid;

use crate::{
    AppState,
    cache::{CachedToken, TokenCacheOperations},
    error::AppError,
    routes::user::model::AuthToken,
};

/// 已验证的请求身份，由认证中间件写入请求扩展
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub username: String,
}

/// 认证中间件：解析 Bearer 令牌并注入 `CurrentUser`
///
/// 查找顺序：Redis缓存 → 数据库。缓存不可用时降级到数据库路径，不算认证失败
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = match bearer.as_ref() {
        Some(TypedHeader(Authorization(bearer))) => bearer.token(),
        None => {
            return Err(AppError::Unauthorized(
                "Missing authentication token.".to_string(),
            ));
        }
    };

    let current_user = match TokenCacheOperations::get_cached_token(&state.redis, token).await {
        Ok(Some(cached)) => CurrentUser {
            user_id: cached.user_id,
            username: cached.username,
        },
        Ok(None) => resolve_from_database(&state, token).await?,
        Err(e) => {
            tracing::warn!("Token cache lookup failed, falling back to database: {}", e);
            resolve_from_database(&state, token).await?
        }
    };

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

async fn resolve_from_database(state: &AppState, token: &str) -> Result<CurrentUser, AppError> {
    let (user_id, username) = AuthToken::find_owner(&state.pool, token)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid authentication token.".to_string()))?;

    // 回填缓存，失败只记日志
    let cached = CachedToken {
        token: token.to_string(),
        user_id,
        username: username.clone(),
    };
    if let Err(e) =
        TokenCacheOperations::cache_token(&state.redis, &cached, state.config.token_cache_ttl())
            .await
    {
        tracing::warn!("Failed to backfill token cache: {}", e);
    }

    Ok(CurrentUser { user_id, username })
}
