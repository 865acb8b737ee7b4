use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::utils::error_codes;

/// 应用级错误，所有 handler 和模型层通过 `?` 向上传播
#[derive(Debug)]
pub enum AppError {
    /// 字段级校验失败（字段名 + 错误消息）
    Validation(Vec<(String, String)>),
    /// 唯一约束冲突（用户名已存在、资料已存在）
    Conflict(String),
    Unauthorized(String),
    NotFound(String),
    RateLimited(String),
    Database(sqlx::Error),
    Cache(redis::RedisError),
    Internal(String),
}

#[derive(Serialize)]
struct FieldError {
    field: String,
    message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    code: i32,
    msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field_errors: Option<Vec<FieldError>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, msg, field_errors) = match self {
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                error_codes::VALIDATION_ERROR,
                "Invalid request parameters.".to_string(),
                Some(
                    errors
                        .into_iter()
                        .map(|(field, message)| FieldError { field, message })
                        .collect(),
                ),
            ),
            AppError::Conflict(msg) => (
                StatusCode::BAD_REQUEST,
                error_codes::ALREADY_EXISTS,
                msg,
                None,
            ),
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, error_codes::AUTH_FAILED, msg, None)
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, error_codes::NOT_FOUND, msg, None),
            AppError::RateLimited(msg) => (
                StatusCode::TOO_MANY_REQUESTS,
                error_codes::RATE_LIMIT,
                msg,
                None,
            ),
            // 5xx 只返回通用消息，细节进日志
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_codes::INTERNAL_ERROR,
                    "Internal server error.".to_string(),
                    None,
                )
            }
            AppError::Cache(e) => {
                tracing::error!("Cache error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_codes::INTERNAL_ERROR,
                    "Internal server error.".to_string(),
                    None,
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_codes::INTERNAL_ERROR,
                    "Internal server error.".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            code,
            msg,
            field_errors,
        });

        (status, body).into_response()
    }
}

/// 判断数据库错误是否为唯一约束冲突
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Database(e)
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        AppError::Cache(e)
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(e: bcrypt::BcryptError) -> Self {
        AppError::Internal(format!("bcrypt error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn status_codes_follow_error_kind() {
        let cases = [
            (
                AppError::Validation(vec![("username".into(), "required".into())]),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Conflict("Username already exists.".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Unauthorized("Invalid username or password.".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                AppError::NotFound("Profile not found.".into()),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::RateLimited("Too many requests.".into()),
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                AppError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn validation_body_carries_field_errors() {
        let err = AppError::Validation(vec![
            ("username".into(), "This field is required.".into()),
            ("password".into(), "This field is required.".into()),
        ]);
        let response = err.into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["code"], error_codes::VALIDATION_ERROR);
        assert_eq!(json["field_errors"][0]["field"], "username");
        assert_eq!(json["field_errors"][1]["field"], "password");
    }

    #[tokio::test]
    async fn internal_error_body_hides_details() {
        let err = AppError::Internal("connection pool exhausted".into());
        let response = err.into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["msg"], "Internal server error.");
        assert!(json.get("field_errors").is_none());
    }
}
