use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

/// 员工目录记录，本服务只读，数据由外部导入
#[derive(Debug, Serialize, FromRow)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub department: String,
    pub designation: String,
    pub salary: Decimal,
    pub joining_date: NaiveDate,
}

impl Employee {
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, department, designation, salary, joining_date
            FROM employees
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employee_serializes_decimal_salary_and_iso_date() {
        let employee = Employee {
            id: 1,
            name: "Alice Smith".to_string(),
            department: "Engineering".to_string(),
            designation: "Engineer".to_string(),
            salary: Decimal::new(1234567, 2),
            joining_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        };

        let value = serde_json::to_value(&employee).unwrap();
        assert_eq!(value["salary"], "12345.67");
        assert_eq!(value["joining_date"], "2024-03-15");
    }
}
