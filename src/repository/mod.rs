//! Storage seam between the HTTP/service layers and the database.
//!
//! `PgCatalogRepository` runs the sqlx queries in [`crate::queries`];
//! `InMemoryCatalogRepository` evaluates the same [`FetchSpec`] over maps and
//! backs the test suite.

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::{
    error::Result,
    models::{
        Category, CategoryCount, CreateProductRequest, NewUser, Predicate, Product, Relation,
        Relations, Supplier, SupplierCount, UpdateProductRequest, User,
    },
};

pub use memory::{InMemoryCatalogRepository, InMemoryUserRepository};
pub use postgres::{PgCatalogRepository, PgUserRepository};

/// What the query executor should fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchSpec {
    pub predicates: Vec<Predicate>,
    /// `None` fetches the whole filtered set.
    pub limit: Option<i64>,
    pub relations: Relations,
}

impl FetchSpec {
    /// Whether the fetch needs `relation` joined, for hydration or filtering.
    pub fn joins(&self, relation: Relation) -> bool {
        self.relations.includes(relation)
            || self
                .predicates
                .iter()
                .any(|predicate| predicate.relation() == Some(relation))
    }
}

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Filtered products ordered by reference, descending.
    async fn fetch_products(&self, spec: &FetchSpec) -> Result<Vec<Product>>;

    async fn find_product(&self, id: &str) -> Result<Option<Product>>;

    async fn create_product(&self, input: &CreateProductRequest) -> Result<Product>;

    /// Applies the patch; `None` when no product has this id.
    async fn update_product(
        &self,
        id: &str,
        input: &UpdateProductRequest,
    ) -> Result<Option<Product>>;

    /// Returns whether a row was removed.
    async fn delete_product(&self, id: &str) -> Result<bool>;

    async fn list_categories(&self) -> Result<Vec<Category>>;

    async fn list_suppliers(&self) -> Result<Vec<Supplier>>;

    async fn count_by_category(&self) -> Result<Vec<CategoryCount>>;

    async fn count_by_supplier(&self) -> Result<Vec<SupplierCount>>;

    async fn distinct_cities(&self) -> Result<Vec<String>>;

    async fn ping(&self) -> Result<()>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn create_user(&self, user: NewUser) -> Result<User>;
}
