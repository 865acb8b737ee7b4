use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 令牌缓存数据模型
///
/// 带上用户名，认证中间件命中缓存时无需再查数据库
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CachedToken {
    pub token: String,
    pub user_id: Uuid,
    pub username: String,
}
