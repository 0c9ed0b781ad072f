use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::Cursor;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Supplier {
    pub id: String,
    pub name: String,
}

/// A product with its category and supplier attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub reference: String,
    pub added_date: DateTime<Utc>,
    pub status: String,
    pub category_id: Option<String>,
    pub price: Decimal,
    pub stock_city: String,
    pub supplier_id: Option<String>,
    pub quantity: i32,
    pub category: Option<Category>,
    pub supplier: Option<Supplier>,
}

/// Flat row produced by the joined listing query.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub reference: String,
    pub added_date: DateTime<Utc>,
    pub status: String,
    pub category_id: Option<String>,
    pub price: Decimal,
    pub stock_city: String,
    pub supplier_id: Option<String>,
    pub quantity: i32,
    pub category_name: Option<String>,
    pub supplier_name: Option<String>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        let category = match (&row.category_id, row.category_name) {
            (Some(id), Some(name)) => Some(Category {
                id: id.clone(),
                name,
            }),
            _ => None,
        };
        let supplier = match (&row.supplier_id, row.supplier_name) {
            (Some(id), Some(name)) => Some(Supplier {
                id: id.clone(),
                name,
            }),
            _ => None,
        };

        Self {
            id: row.id,
            name: row.name,
            reference: row.reference,
            added_date: row.added_date,
            status: row.status,
            category_id: row.category_id,
            price: row.price,
            stock_city: row.stock_city,
            supplier_id: row.supplier_id,
            quantity: row.quantity,
            category,
            supplier,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub reference: String,
    #[serde(default)]
    pub status: String,
    pub category_id: Option<String>,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub stock_city: String,
    pub supplier_id: Option<String>,
    #[serde(default)]
    pub quantity: i32,
}

/// A field that is either left alone or overwritten.
///
/// Absent and `null` JSON values both deserialize to [`Patch::Unset`].
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
    Unset,
    SetTo(T),
}

impl<T> Patch<T> {
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Patch::Unset => None,
            Patch::SetTo(value) => Some(value),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Patch::Unset => None,
            Patch::SetTo(value) => Some(value),
        }
    }

    pub fn apply_to(self, target: &mut T) {
        if let Patch::SetTo(value) = self {
            *target = value;
        }
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Unset
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.map_or(Patch::Unset, Patch::SetTo))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateProductRequest {
    pub name: Patch<String>,
    pub reference: Patch<String>,
    pub status: Patch<String>,
    pub category_id: Patch<String>,
    pub price: Patch<Decimal>,
    pub stock_city: Patch<String>,
    pub supplier_id: Patch<String>,
    pub quantity: Patch<i32>,
}

/// Raw query string of `GET /products`; `values` may repeat.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListParams {
    #[serde(rename = "perPage")]
    pub per_page: Option<i64>,
    pub field: Option<String>,
    #[serde(default)]
    pub values: Vec<String>,
    pub last_reference: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Pdf,
    Text,
}

/// Query string of `GET /products/export`.
#[derive(Debug, Default, Deserialize)]
pub struct ProductExportParams {
    pub field: Option<String>,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub format: ReportFormat,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    pub next_reference: Option<Cursor>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryListResponse {
    pub categories: Vec<Category>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SupplierListResponse {
    pub suppliers: Vec<Supplier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CategoryCount {
    pub category_name: String,
    pub total_products: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SupplierCount {
    pub supplier_name: String,
    pub total_products: i64,
}
