use sqlx::PgPool;

use crate::{
    error::Result,
    models::{CategoryCount, SupplierCount},
};

// Inner joins: a category or supplier without products never shows up.

pub async fn count_by_category(pool: &PgPool) -> Result<Vec<CategoryCount>> {
    let counts = sqlx::query_as::<_, CategoryCount>(
        "SELECT c.name AS category_name, COUNT(*)::bigint AS total_products
         FROM products p
         JOIN categories c ON c.id = p.category_id
         GROUP BY c.name
         ORDER BY c.name ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(counts)
}

pub async fn count_by_supplier(pool: &PgPool) -> Result<Vec<SupplierCount>> {
    let counts = sqlx::query_as::<_, SupplierCount>(
        "SELECT s.name AS supplier_name, COUNT(*)::bigint AS total_products
         FROM products p
         JOIN suppliers s ON s.id = p.supplier_id
         GROUP BY s.name
         ORDER BY s.name ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(counts)
}

pub async fn distinct_cities(pool: &PgPool) -> Result<Vec<String>> {
    let cities = sqlx::query_scalar::<_, String>(
        "SELECT stock_city
         FROM products
         GROUP BY stock_city
         ORDER BY stock_city ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(cities)
}
