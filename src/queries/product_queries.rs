use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::{Result, classify_write_error},
    models::{
        CreateProductRequest, FilterColumn, Predicate, Product, ProductRow, Relation,
        UpdateProductRequest,
    },
    repository::FetchSpec,
};

const PRODUCT_COLUMNS: &str = "p.id, p.name, p.reference, p.added_date, p.status, \
     p.category_id, p.price, p.stock_city, p.supplier_id, p.quantity";

/// Hydrates a `p` row source with its category and supplier names.
const HYDRATED_SELECT: &str = "SELECT p.*, c.name AS category_name, s.name AS supplier_name \
     FROM p \
     LEFT JOIN categories c ON c.id = p.category_id \
     LEFT JOIN suppliers s ON s.id = p.supplier_id";

/// Appends the predicates as an AND chain. Values are always bound.
pub fn push_predicates(query: &mut QueryBuilder<'_, Postgres>, predicates: &[Predicate]) {
    query.push(" WHERE 1=1");

    for predicate in predicates {
        match predicate {
            Predicate::AnyOf { column, values } => {
                query.push(" AND ");
                query.push(column.sql());
                query.push(" = ANY(");
                query.push_bind(values.clone());
                query.push(")");
            }
            Predicate::ReferenceBefore(cursor) => {
                query.push(" AND ");
                query.push(FilterColumn::Reference.sql());
                query.push(" < ");
                query.push_bind(cursor.clone());
            }
        }
    }
}

/// Builds the single listing statement for `spec`.
pub fn build_fetch_query(spec: &FetchSpec) -> QueryBuilder<'static, Postgres> {
    let join_category = spec.joins(Relation::Category);
    let join_supplier = spec.joins(Relation::Supplier);

    let mut query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
    query.push(PRODUCT_COLUMNS);

    if spec.relations.category {
        query.push(", c.name AS category_name");
    } else {
        query.push(", NULL::text AS category_name");
    }

    if spec.relations.supplier {
        query.push(", s.name AS supplier_name");
    } else {
        query.push(", NULL::text AS supplier_name");
    }

    query.push(" FROM products p");

    if join_category {
        query.push(" LEFT JOIN categories c ON c.id = p.category_id");
    }

    if join_supplier {
        query.push(" LEFT JOIN suppliers s ON s.id = p.supplier_id");
    }

    push_predicates(&mut query, &spec.predicates);

    // display order and keyset order must stay the same column
    query.push(" ORDER BY p.reference DESC");

    if let Some(limit) = spec.limit {
        query.push(" LIMIT ");
        query.push_bind(limit);
    }

    query
}

pub async fn fetch_products(pool: &PgPool, spec: &FetchSpec) -> Result<Vec<Product>> {
    let mut query = build_fetch_query(spec);

    let rows = query
        .build_query_as::<ProductRow>()
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(Product::from).collect())
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Product>> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "WITH p AS (SELECT * FROM products WHERE id = $1) {}",
        HYDRATED_SELECT
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Product::from))
}

pub async fn create_product(pool: &PgPool, req: &CreateProductRequest) -> Result<Product> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        r#"
        WITH p AS (
            INSERT INTO products (
                name, reference, status, category_id, price,
                stock_city, supplier_id, quantity
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
        )
        {}
        "#,
        HYDRATED_SELECT
    ))
    .bind(&req.name)
    .bind(&req.reference)
    .bind(&req.status)
    .bind(&req.category_id)
    .bind(req.price)
    .bind(&req.stock_city)
    .bind(&req.supplier_id)
    .bind(req.quantity)
    .fetch_one(pool)
    .await
    .map_err(classify_write_error)?;

    tracing::info!(product_id = %row.id, reference = %row.reference, "Created product");

    Ok(row.into())
}

pub async fn update_product(
    pool: &PgPool,
    id: &str,
    req: &UpdateProductRequest,
) -> Result<Option<Product>> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        r#"
        WITH p AS (
            UPDATE products
            SET
                name = COALESCE($1, name),
                reference = COALESCE($2, reference),
                status = COALESCE($3, status),
                category_id = COALESCE($4, category_id),
                price = COALESCE($5, price),
                stock_city = COALESCE($6, stock_city),
                supplier_id = COALESCE($7, supplier_id),
                quantity = COALESCE($8, quantity)
            WHERE id = $9
            RETURNING *
        )
        {}
        "#,
        HYDRATED_SELECT
    ))
    .bind(req.name.as_set())
    .bind(req.reference.as_set())
    .bind(req.status.as_set())
    .bind(req.category_id.as_set())
    .bind(req.price.as_set())
    .bind(req.stock_city.as_set())
    .bind(req.supplier_id.as_set())
    .bind(req.quantity.as_set())
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(classify_write_error)?;

    if row.is_some() {
        tracing::info!(product_id = %id, "Updated product");
    }

    Ok(row.map(Product::from))
}

pub async fn delete_product(pool: &PgPool, id: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() > 0 {
        tracing::info!(product_id = %id, "Deleted product");
    }

    Ok(result.rows_affected())
}
