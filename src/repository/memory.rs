use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{
        Category, CategoryCount, CreateProductRequest, NewUser, Product, Supplier, SupplierCount,
        UpdateProductRequest, User,
    },
    repository::{CatalogRepository, FetchSpec, UserRepository},
};

#[derive(Debug, Default)]
struct CatalogData {
    categories: HashMap<String, Category>,
    suppliers: HashMap<String, Supplier>,
    /// Stored without relations; they are attached on read.
    products: HashMap<String, Product>,
}

impl CatalogData {
    fn hydrate(&self, product: &Product) -> Product {
        let mut product = product.clone();
        product.category = product
            .category_id
            .as_ref()
            .and_then(|id| self.categories.get(id))
            .cloned();
        product.supplier = product
            .supplier_id
            .as_ref()
            .and_then(|id| self.suppliers.get(id))
            .cloned();
        product
    }

    fn check_references(
        &self,
        category_id: Option<&String>,
        supplier_id: Option<&String>,
    ) -> Result<()> {
        if let Some(id) = category_id {
            if !self.categories.contains_key(id) {
                return Err(AppError::InvalidReference(
                    "category_id not exists".to_string(),
                ));
            }
        }

        if let Some(id) = supplier_id {
            if !self.suppliers.contains_key(id) {
                return Err(AppError::InvalidReference(
                    "supplier_id not exists".to_string(),
                ));
            }
        }

        Ok(())
    }

    fn check_reference_free(&self, reference: &str, except_id: Option<&str>) -> Result<()> {
        let taken = self
            .products
            .values()
            .any(|p| p.reference == reference && Some(p.id.as_str()) != except_id);

        if taken {
            return Err(AppError::Conflict(
                "product reference already exists".to_string(),
            ));
        }

        Ok(())
    }
}

/// Map-backed catalog for tests and local runs.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalogRepository {
    data: Arc<RwLock<CatalogData>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_category(&self, name: &str) -> Category {
        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
        };
        self.data
            .write()
            .await
            .categories
            .insert(category.id.clone(), category.clone());
        category
    }

    pub async fn add_supplier(&self, name: &str) -> Supplier {
        let supplier = Supplier {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
        };
        self.data
            .write()
            .await
            .suppliers
            .insert(supplier.id.clone(), supplier.clone());
        supplier
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn fetch_products(&self, spec: &FetchSpec) -> Result<Vec<Product>> {
        let data = self.data.read().await;

        let mut products: Vec<Product> = data
            .products
            .values()
            .map(|p| data.hydrate(p))
            .filter(|p| spec.predicates.iter().all(|predicate| predicate.matches(p)))
            .collect();

        products.sort_by(|a, b| b.reference.cmp(&a.reference));

        if let Some(limit) = spec.limit {
            products.truncate(usize::try_from(limit).unwrap_or(0));
        }

        for product in &mut products {
            if !spec.relations.category {
                product.category = None;
            }
            if !spec.relations.supplier {
                product.supplier = None;
            }
        }

        Ok(products)
    }

    async fn find_product(&self, id: &str) -> Result<Option<Product>> {
        let data = self.data.read().await;
        Ok(data.products.get(id).map(|p| data.hydrate(p)))
    }

    async fn create_product(&self, input: &CreateProductRequest) -> Result<Product> {
        let mut data = self.data.write().await;

        data.check_references(input.category_id.as_ref(), input.supplier_id.as_ref())?;
        data.check_reference_free(&input.reference, None)?;

        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: input.name.clone(),
            reference: input.reference.clone(),
            added_date: Utc::now(),
            status: input.status.clone(),
            category_id: input.category_id.clone(),
            price: input.price,
            stock_city: input.stock_city.clone(),
            supplier_id: input.supplier_id.clone(),
            quantity: input.quantity,
            category: None,
            supplier: None,
        };
        data.products.insert(product.id.clone(), product.clone());

        tracing::info!(product_id = %product.id, reference = %product.reference, "Created product");
        Ok(data.hydrate(&product))
    }

    async fn update_product(
        &self,
        id: &str,
        input: &UpdateProductRequest,
    ) -> Result<Option<Product>> {
        let mut data = self.data.write().await;

        let Some(mut product) = data.products.get(id).cloned() else {
            return Ok(None);
        };

        data.check_references(input.category_id.as_set(), input.supplier_id.as_set())?;
        if let Some(reference) = input.reference.as_set() {
            data.check_reference_free(reference, Some(id))?;
        }

        let input = input.clone();
        input.name.apply_to(&mut product.name);
        input.reference.apply_to(&mut product.reference);
        input.status.apply_to(&mut product.status);
        if let Some(category_id) = input.category_id.into_option() {
            product.category_id = Some(category_id);
        }
        input.price.apply_to(&mut product.price);
        input.stock_city.apply_to(&mut product.stock_city);
        if let Some(supplier_id) = input.supplier_id.into_option() {
            product.supplier_id = Some(supplier_id);
        }
        input.quantity.apply_to(&mut product.quantity);

        data.products.insert(product.id.clone(), product.clone());

        tracing::info!(product_id = %id, "Updated product");
        Ok(Some(data.hydrate(&product)))
    }

    async fn delete_product(&self, id: &str) -> Result<bool> {
        let mut data = self.data.write().await;

        if data.products.remove(id).is_some() {
            tracing::info!(product_id = %id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let data = self.data.read().await;
        let mut categories: Vec<Category> = data.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(categories)
    }

    async fn list_suppliers(&self) -> Result<Vec<Supplier>> {
        let data = self.data.read().await;
        let mut suppliers: Vec<Supplier> = data.suppliers.values().cloned().collect();
        suppliers.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(suppliers)
    }

    async fn count_by_category(&self) -> Result<Vec<CategoryCount>> {
        let data = self.data.read().await;

        let mut counts: BTreeMap<String, i64> = BTreeMap::new();
        for category in data
            .products
            .values()
            .filter_map(|p| p.category_id.as_ref())
            .filter_map(|id| data.categories.get(id))
        {
            *counts.entry(category.name.clone()).or_default() += 1;
        }

        Ok(counts
            .into_iter()
            .map(|(category_name, total_products)| CategoryCount {
                category_name,
                total_products,
            })
            .collect())
    }

    async fn count_by_supplier(&self) -> Result<Vec<SupplierCount>> {
        let data = self.data.read().await;

        let mut counts: BTreeMap<String, i64> = BTreeMap::new();
        for supplier in data
            .products
            .values()
            .filter_map(|p| p.supplier_id.as_ref())
            .filter_map(|id| data.suppliers.get(id))
        {
            *counts.entry(supplier.name.clone()).or_default() += 1;
        }

        Ok(counts
            .into_iter()
            .map(|(supplier_name, total_products)| SupplierCount {
                supplier_name,
                total_products,
            })
            .collect())
    }

    async fn distinct_cities(&self) -> Result<Vec<String>> {
        let data = self.data.read().await;

        let cities: BTreeSet<String> = data
            .products
            .values()
            .map(|p| p.stock_city.clone())
            .collect();

        Ok(cities.into_iter().collect())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// Map-backed user store keyed by email.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.email) {
            return Err(AppError::Conflict("email already exists".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: user.name,
            email: user.email,
            password: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.email.clone(), user.clone());

        Ok(user)
    }
}
