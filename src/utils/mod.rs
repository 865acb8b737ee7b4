use axum::Json;
use bcrypt::{DEFAULT_COST, hash, verify};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::common::ApiResponse;

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password.as_bytes(), DEFAULT_COST)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password.as_bytes(), hash)
}

/// 生成不透明令牌键：对用户ID和随机UUID做SHA-256，输出小写十六进制
pub fn generate_token_key(user_id: &Uuid) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_id.as_bytes());
    hasher.update(Uuid::new_v4().as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

pub fn success_to_api_response<T: serde::Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code: 0,
        msg: "success".into(),
        resp_data: Some(data),
    })
}

pub mod error_codes {
    pub const SUCCESS: i32 = 0;
    pub const VALIDATION_ERROR: i32 = 1000;
    pub const ALREADY_EXISTS: i32 = 1001;
    pub const AUTH_FAILED: i32 = 1002;
    pub const NOT_FOUND: i32 = 1004;
    pub const RATE_LIMIT: i32 = 1005;
    pub const INTERNAL_ERROR: i32 = 5000;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_key_is_64_lowercase_hex_chars() {
        let user_id = Uuid::new_v4();
        let key = generate_token_key(&user_id);

        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn token_keys_are_unique_per_mint() {
        let user_id = Uuid::new_v4();
        assert_ne!(generate_token_key(&user_id), generate_token_key(&user_id));
    }

    #[test]
    fn password_hash_round_trip() {
        // 用低cost避免测试变慢，verify 与 cost 无关
        let hash = bcrypt::hash("pw1", 4).unwrap();

        assert!(verify_password("pw1", &hash).unwrap());
        assert!(!verify_password("pw2", &hash).unwrap());
    }

    #[test]
    fn success_envelope_shape() {
        let Json(response) = success_to_api_response("data");

        assert_eq!(response.code, error_codes::SUCCESS);
        assert_eq!(response.msg, "success");
        assert_eq!(response.resp_data, Some("data"));
    }
}
