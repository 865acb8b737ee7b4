use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppError;
use crate::utils::{generate_token_key, verify_password};

#[derive(Debug, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 不透明令牌，每个用户最多一条
#[derive(Debug, FromRow)]
pub struct AuthToken {
    pub key: String,
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

impl SignupRequest {
    /// 校验注册请求，缺失字段逐个上报
    pub fn validate(&self) -> Result<(String, String, Option<String>), AppError> {
        let mut errors = Vec::new();

        let username = self.username.as_deref().unwrap_or("").trim();
        if username.is_empty() {
            errors.push(("username".to_string(), "This field is required.".to_string()));
        } else if !username.chars().all(|c| c.is_alphanumeric() || c == '_') {
            // 用户名只允许使用字母、数字和下划线
            errors.push((
                "username".to_string(),
                "Only letters, digits and underscores are allowed.".to_string(),
            ));
        } else if username.len() > 150 {
            errors.push((
                "username".to_string(),
                "Must be at most 150 characters.".to_string(),
            ));
        }

        let password = self.password.as_deref().unwrap_or("");
        if password.is_empty() {
            errors.push(("password".to_string(), "This field is required.".to_string()));
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let email = self
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string);

        Ok((username.to_string(), password.to_string(), email))
    }
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(String, String), AppError> {
        let mut errors = Vec::new();

        let username = self.username.as_deref().unwrap_or("").trim();
        if username.is_empty() {
            errors.push(("username".to_string(), "This field is required.".to_string()));
        }

        let password = self.password.as_deref().unwrap_or("");
        if password.is_empty() {
            errors.push(("password".to_string(), "This field is required.".to_string()));
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok((username.to_string(), password.to_string()))
    }
}

impl User {
    pub async fn create(
        pool: &PgPool,
        username: &str,
        password_hash: &str,
        email: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, email)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, email, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(email)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, email, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await
    }

    pub fn verify_login(&self, password: &str) -> Result<bool, bcrypt::BcryptError> {
        verify_password(password, &self.password_hash)
    }
}

impl AuthToken {
    /// 注册时铸造新令牌
    pub async fn mint(pool: &PgPool, user_id: &Uuid) -> Result<Self, sqlx::Error> {
        let key = generate_token_key(user_id);

        sqlx::query_as::<_, AuthToken>(
            r#"
            INSERT INTO auth_tokens (key, user_id)
            VALUES ($1, $2)
            RETURNING key, user_id
            "#,
        )
        .bind(&key)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// 登录复用已有令牌，没有时才铸造新的
    ///
    /// ON CONFLICT 的 DO UPDATE 写回原值，保证并发登录拿到同一个键
    pub async fn fetch_or_mint(pool: &PgPool, user_id: &Uuid) -> Result<Self, sqlx::Error> {
        let key = generate_token_key(user_id);

        sqlx::query_as::<_, AuthToken>(
            r#"
            INSERT INTO auth_tokens (key, user_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET key = auth_tokens.key
            RETURNING key, user_id
            "#,
        )
        .bind(&key)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// 按令牌键查找所属用户，认证中间件的数据库回退路径
    pub async fn find_owner(
        pool: &PgPool,
        key: &str,
    ) -> Result<Option<(Uuid, String)>, sqlx::Error> {
        sqlx::query_as::<_, (Uuid, String)>(
            r#"
            SELECT u.id, u.username
            FROM auth_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_names(err: AppError) -> Vec<String> {
        match err {
            AppError::Validation(errors) => errors.into_iter().map(|(field, _)| field).collect(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn signup_reports_all_missing_fields() {
        let req = SignupRequest {
            username: None,
            password: None,
            email: None,
        };

        let fields = field_names(req.validate().unwrap_err());
        assert_eq!(fields, vec!["username", "password"]);
    }

    #[test]
    fn signup_rejects_bad_username_charset() {
        let req = SignupRequest {
            username: Some("alice!".to_string()),
            password: Some("pw1".to_string()),
            email: None,
        };

        let fields = field_names(req.validate().unwrap_err());
        assert_eq!(fields, vec!["username"]);
    }

    #[test]
    fn signup_accepts_minimal_body() {
        let req = SignupRequest {
            username: Some("alice".to_string()),
            password: Some("pw1".to_string()),
            email: Some("a@x.com".to_string()),
        };

        let (username, password, email) = req.validate().unwrap();
        assert_eq!(username, "alice");
        assert_eq!(password, "pw1");
        assert_eq!(email.as_deref(), Some("a@x.com"));
    }

    #[test]
    fn signup_treats_blank_email_as_absent() {
        let req = SignupRequest {
            username: Some("alice".to_string()),
            password: Some("pw1".to_string()),
            email: Some("  ".to_string()),
        };

        let (_, _, email) = req.validate().unwrap();
        assert_eq!(email, None);
    }

    #[test]
    fn login_requires_both_fields() {
        let req = LoginRequest {
            username: Some("alice".to_string()),
            password: None,
        };

        let fields = field_names(req.validate().unwrap_err());
        assert_eq!(fields, vec!["password"]);
    }
}
