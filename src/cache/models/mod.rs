/// 缓存数据模型
/// 定义缓存数据的结构体

// 令牌缓存模型
pub mod token;

// 重新导出常用类型
pub use token::CachedToken;
