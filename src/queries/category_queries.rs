use sqlx::PgPool;

use crate::{
    error::Result,
    models::{Category, Supplier},
};

/// All categories ordered by name
pub async fn get_all_categories(pool: &PgPool) -> Result<Vec<Category>> {
    let categories =
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name ASC, id ASC")
            .fetch_all(pool)
            .await?;

    Ok(categories)
}

/// All suppliers ordered by name
pub async fn get_all_suppliers(pool: &PgPool) -> Result<Vec<Supplier>> {
    let suppliers =
        sqlx::query_as::<_, Supplier>("SELECT id, name FROM suppliers ORDER BY name ASC, id ASC")
            .fetch_all(pool)
            .await?;

    Ok(suppliers)
}
