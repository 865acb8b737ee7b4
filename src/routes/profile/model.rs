use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Serialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 校验通过后的完整资料字段
#[derive(Debug)]
pub struct ProfileFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// 全量替换请求，三个字段都必填
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// 部分更新请求，字段都可缺省，缺省字段保持原值
#[derive(Debug, Deserialize)]
pub struct PatchProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

fn check_name(field: &str, value: Option<&str>, errors: &mut Vec<(String, String)>) {
    let value = value.unwrap_or("").trim();
    if value.is_empty() {
        errors.push((field.to_string(), "This field is required.".to_string()));
    } else if value.len() > 150 {
        errors.push((
            field.to_string(),
            "Must be at most 150 characters.".to_string(),
        ));
    }
}

fn check_email(value: Option<&str>, errors: &mut Vec<(String, String)>) {
    let value = value.unwrap_or("").trim();
    if value.is_empty() {
        errors.push(("email".to_string(), "This field is required.".to_string()));
    } else if !is_valid_email(value) {
        errors.push(("email".to_string(), "Enter a valid email address.".to_string()));
    }
}

/// 全量校验：创建和全量替换共用，三个字段都必填
fn validate_full(
    first_name: Option<&str>,
    last_name: Option<&str>,
    email: Option<&str>,
) -> Result<ProfileFields, AppError> {
    let mut errors = Vec::new();

    check_name("first_name", first_name, &mut errors);
    check_name("last_name", last_name, &mut errors);
    check_email(email, &mut errors);

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    Ok(ProfileFields {
        first_name: first_name.unwrap_or("").trim().to_string(),
        last_name: last_name.unwrap_or("").trim().to_string(),
        email: email.unwrap_or("").trim().to_string(),
    })
}

impl CreateProfileRequest {
    pub fn validate(&self) -> Result<ProfileFields, AppError> {
        validate_full(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.email.as_deref(),
        )
    }
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<ProfileFields, AppError> {
        validate_full(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.email.as_deref(),
        )
    }
}

impl PatchProfileRequest {
    /// 部分校验：只检查出现的字段，返回修剪后的补丁
    pub fn validate(&self) -> Result<PatchProfileRequest, AppError> {
        let mut errors = Vec::new();

        if self.first_name.is_some() {
            check_name("first_name", self.first_name.as_deref(), &mut errors);
        }
        if self.last_name.is_some() {
            check_name("last_name", self.last_name.as_deref(), &mut errors);
        }
        if self.email.is_some() {
            check_email(self.email.as_deref(), &mut errors);
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok(PatchProfileRequest {
            first_name: self.first_name.as_deref().map(|s| s.trim().to_string()),
            last_name: self.last_name.as_deref().map(|s| s.trim().to_string()),
            email: self.email.as_deref().map(|s| s.trim().to_string()),
        })
    }
}

impl Profile {
    pub async fn create(
        pool: &PgPool,
        user_id: &Uuid,
        fields: &ProfileFields,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (user_id, first_name, last_name, email)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, first_name, last_name, email, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(&fields.email)
        .fetch_one(pool)
        .await
    }

    /// 全量替换，没有资料时返回 None
    pub async fn update_full(
        pool: &PgPool,
        user_id: &Uuid,
        fields: &ProfileFields,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET first_name = $2, last_name = $3, email = $4, updated_at = NOW()
            WHERE user_id = $1
            RETURNING id, user_id, first_name, last_name, email, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(&fields.email)
        .fetch_optional(pool)
        .await
    }

    /// 部分更新，缺省字段用 COALESCE 保持原值
    pub async fn update_partial(
        pool: &PgPool,
        user_id: &Uuid,
        patch: &PatchProfileRequest,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING id, user_id, first_name, last_name, email, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(patch.first_name.as_deref())
        .bind(patch.last_name.as_deref())
        .bind(patch.email.as_deref())
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
    fn full_validation_requires_every_field() {
        let req = CreateProfileRequest {
            first_name: Some("Alice".to_string()),
            last_name: None,
            email: None,
        };

        let fields = field_names(req.validate().unwrap_err());
        assert_eq!(fields, vec!["last_name", "email"]);
    }

    #[test]
    fn full_validation_rejects_malformed_email() {
        let req = UpdateProfileRequest {
            first_name: Some("Alice".to_string()),
            last_name: Some("Smith".to_string()),
            email: Some("not-an-email".to_string()),
        };

        let fields = field_names(req.validate().unwrap_err());
        assert_eq!(fields, vec!["email"]);
    }

    #[test]
    fn full_validation_trims_fields() {
        let req = CreateProfileRequest {
            first_name: Some(" Alice ".to_string()),
            last_name: Some("Smith".to_string()),
            email: Some("a@x.com".to_string()),
        };

        let fields = req.validate().unwrap();
        assert_eq!(fields.first_name, "Alice");
    }

    #[test]
    fn patch_validation_skips_absent_fields() {
        let req = PatchProfileRequest {
            first_name: Some("Alicia".to_string()),
            last_name: None,
            email: None,
        };

        let patch = req.validate().unwrap();
        assert_eq!(patch.first_name.as_deref(), Some("Alicia"));
        assert_eq!(patch.last_name, None);
        assert_eq!(patch.email, None);
    }

    #[test]
    fn patch_validation_checks_present_fields() {
        let req = PatchProfileRequest {
            first_name: Some("".to_string()),
            last_name: None,
            email: Some("broken@".to_string()),
        };

        let fields = field_names(req.validate().unwrap_err());
        assert_eq!(fields, vec!["first_name", "email"]);
    }

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
        assert!(!is_valid_email("missing-at.com"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("a@nodot"));
        assert!(!is_valid_email("a b@x.com"));
    }
}
