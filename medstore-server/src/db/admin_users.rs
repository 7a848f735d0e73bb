use chrono::{DateTime, Utc};
use sqlx::PgPool;

#[derive(sqlx::FromRow)]
pub struct AdminUser {
    pub id: i64,
    pub email: String,
    pub hashed_password: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<AdminUser>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM admin_users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admin_users")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn create(
    pool: &PgPool,
    email: &str,
    hashed_password: &str,
    name: &str,
    role: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO admin_users (email, hashed_password, name, role)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(email)
    .bind(hashed_password)
    .bind(name)
    .bind(role)
    .execute(pool)
    .await?;
    Ok(())
}
