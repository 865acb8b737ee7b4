/// 令牌缓存键前缀
const AUTH_TOKEN_PREFIX: &str = "auth:token:";

/// 生成令牌缓存键
pub fn auth_token_key(token: &str) -> String {
    format!("{}{}", AUTH_TOKEN_PREFIX, token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_carries_prefix_and_token() {
        assert_eq!(auth_token_key("abc123"), "auth:token:abc123");
    }
}
