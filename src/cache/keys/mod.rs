/// 缓存键模块
/// 提供各种缓存键生成函数

// 令牌缓存键模块
pub mod token_keys;

// 重新导出常用的键生成函数
pub use token_keys::auth_token_key;
