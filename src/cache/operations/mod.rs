/// 缓存操作
/// 提供缓存操作的功能实现

// 令牌缓存操作
pub mod token;

// 重新导出常用操作
pub use token::TokenCacheOperations;
