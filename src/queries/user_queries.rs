use sqlx::PgPool;

use crate::{
    error::{Result, classify_write_error},
    models::{NewUser, User},
};

pub async fn create_user(pool: &PgPool, user: &NewUser) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, email, password, role) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.role)
    .fetch_one(pool)
    .await
    .map_err(classify_write_error)?;

    Ok(user)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}
