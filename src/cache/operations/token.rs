use std::sync::Arc;
use std::time::Duration;

use redis::{AsyncCommands, Client as RedisClient};

use crate::cache::keys::auth_token_key;
use crate::cache::models::token::CachedToken;

/// 令牌缓存操作
pub struct TokenCacheOperations;

impl TokenCacheOperations {
    /// 缓存令牌，过期时间由配置决定
    pub async fn cache_token(
        redis: &Arc<RedisClient>,
        cached_token: &CachedToken,
        ttl: Duration,
    ) -> Result<(), redis::RedisError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;

        let key = auth_token_key(&cached_token.token);
        let json = serde_json::to_string(cached_token).map_err(|e| {
            redis::RedisError::from((redis::ErrorKind::IoError, "序列化错误", e.to_string()))
        })?;

        let _: () = conn.set_ex(key, json, ttl.as_secs()).await?;

        Ok(())
    }

    /// 获取令牌缓存
    pub async fn get_cached_token(
        redis: &Arc<RedisClient>,
        token: &str,
    ) -> Result<Option<CachedToken>, redis::RedisError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;

        let key = auth_token_key(token);
        let result: Option<String> = conn.get(key).await?;

        match result {
            Some(json) => {
                let cached_token = serde_json::from_str(&json).map_err(|e| {
                    redis::RedisError::from((
                        redis::ErrorKind::IoError,
                        "反序列化错误",
                        e.to_string(),
                    ))
                })?;
                Ok(Some(cached_token))
            }
            None => Ok(None),
        }
    }

    /// 删除令牌缓存
    pub async fn remove_token(
        redis: &Arc<RedisClient>,
        token: &str,
    ) -> Result<(), redis::RedisError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;

        let _: () = conn.del(auth_token_key(token)).await?;

        Ok(())
    }
}
