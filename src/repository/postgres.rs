use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    database,
    error::Result,
    models::{
        Category, CategoryCount, CreateProductRequest, NewUser, Product, Supplier, SupplierCount,
        UpdateProductRequest, User,
    },
    queries::{category_queries, product_queries, statistics_queries, user_queries},
    repository::{CatalogRepository, FetchSpec, UserRepository},
};

#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn fetch_products(&self, spec: &FetchSpec) -> Result<Vec<Product>> {
        product_queries::fetch_products(&self.pool, spec).await
    }

    async fn find_product(&self, id: &str) -> Result<Option<Product>> {
        product_queries::find_by_id(&self.pool, id).await
    }

    async fn create_product(&self, input: &CreateProductRequest) -> Result<Product> {
        product_queries::create_product(&self.pool, input).await
    }

    async fn update_product(
        &self,
        id: &str,
        input: &UpdateProductRequest,
    ) -> Result<Option<Product>> {
        product_queries::update_product(&self.pool, id, input).await
    }

    async fn delete_product(&self, id: &str) -> Result<bool> {
        Ok(product_queries::delete_product(&self.pool, id).await? > 0)
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        category_queries::get_all_categories(&self.pool).await
    }

    async fn list_suppliers(&self) -> Result<Vec<Supplier>> {
        category_queries::get_all_suppliers(&self.pool).await
    }

    async fn count_by_category(&self) -> Result<Vec<CategoryCount>> {
        statistics_queries::count_by_category(&self.pool).await
    }

    async fn count_by_supplier(&self) -> Result<Vec<SupplierCount>> {
        statistics_queries::count_by_supplier(&self.pool).await
    }

    async fn distinct_cities(&self) -> Result<Vec<String>> {
        statistics_queries::distinct_cities(&self.pool).await
    }

    async fn ping(&self) -> Result<()> {
        database::check_health(&self.pool).await
    }
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        user_queries::find_by_email(&self.pool, email).await
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        user_queries::create_user(&self.pool, &user).await
    }
}
