//! Client filter requests and the column whitelist they resolve against.
//!
//! Query parameters arrive as an arbitrary `field` string plus a list of
//! `values`. They are turned into a [`ProductFilter`] at the boundary; from
//! there on only [`FilterColumn`] variants travel towards SQL, and every
//! variant maps to a fixed `&'static str` column reference.

use crate::{
    error::{AppError, Result},
    models::{Predicate, Product},
};

/// Upper bound on the number of values a single filter may carry.
pub const MAX_FILTER_VALUES: usize = 100;

/// Lookup tables that can be joined onto a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Category,
    Supplier,
}

/// Which relations a fetch should attach to each product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Relations {
    pub category: bool,
    pub supplier: bool,
}

impl Relations {
    pub const ALL: Relations = Relations {
        category: true,
        supplier: true,
    };

    pub const NONE: Relations = Relations {
        category: false,
        supplier: false,
    };

    pub fn includes(self, relation: Relation) -> bool {
        match relation {
            Relation::Category => self.category,
            Relation::Supplier => self.supplier,
        }
    }
}

/// Every column a filter is allowed to touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterColumn {
    ProductId,
    ProductName,
    Reference,
    Status,
    StockCity,
    CategoryId,
    SupplierId,
    CategoryName,
    SupplierName,
}

/// Physical product columns a client may name directly.
const PERMITTED_COLUMNS: &[(&str, FilterColumn)] = &[
    ("id", FilterColumn::ProductId),
    ("name", FilterColumn::ProductName),
    ("reference", FilterColumn::Reference),
    ("status", FilterColumn::Status),
    ("stock_city", FilterColumn::StockCity),
    ("category_id", FilterColumn::CategoryId),
    ("supplier_id", FilterColumn::SupplierId),
];

impl FilterColumn {
    pub const ALL: [FilterColumn; 9] = [
        FilterColumn::ProductId,
        FilterColumn::ProductName,
        FilterColumn::Reference,
        FilterColumn::Status,
        FilterColumn::StockCity,
        FilterColumn::CategoryId,
        FilterColumn::SupplierId,
        FilterColumn::CategoryName,
        FilterColumn::SupplierName,
    ];

    /// Maps a client field name to a column, or `None` for "no filter".
    pub fn resolve(field: &str) -> Option<Self> {
        match field.trim() {
            "" => None,
            "name" => Some(FilterColumn::ProductName),
            "category" => Some(FilterColumn::CategoryName),
            "supplier" => Some(FilterColumn::SupplierName),
            other => {
                let physical = other.strip_prefix("product.").unwrap_or(other);
                PERMITTED_COLUMNS
                    .iter()
                    .find(|(name, _)| *name == physical)
                    .map(|(_, column)| *column)
            }
        }
    }

    /// Qualified column reference, using the aliases of the listing query.
    pub fn sql(self) -> &'static str {
        match self {
            FilterColumn::ProductId => "p.id",
            FilterColumn::ProductName => "p.name",
            FilterColumn::Reference => "p.reference",
            FilterColumn::Status => "p.status",
            FilterColumn::StockCity => "p.stock_city",
            FilterColumn::CategoryId => "p.category_id",
            FilterColumn::SupplierId => "p.supplier_id",
            FilterColumn::CategoryName => "c.name",
            FilterColumn::SupplierName => "s.name",
        }
    }

    /// The joined table this column lives on, if any.
    pub fn relation(self) -> Option<Relation> {
        match self {
            FilterColumn::CategoryName => Some(Relation::Category),
            FilterColumn::SupplierName => Some(Relation::Supplier),
            _ => None,
        }
    }

    /// Reads this column from an already-hydrated product.
    pub fn value_of(self, product: &Product) -> Option<&str> {
        match self {
            FilterColumn::ProductId => Some(&product.id),
            FilterColumn::ProductName => Some(&product.name),
            FilterColumn::Reference => Some(&product.reference),
            FilterColumn::Status => Some(&product.status),
            FilterColumn::StockCity => Some(&product.stock_city),
            FilterColumn::CategoryId => product.category_id.as_deref(),
            FilterColumn::SupplierId => product.supplier_id.as_deref(),
            FilterColumn::CategoryName => product.category.as_ref().map(|c| c.name.as_str()),
            FilterColumn::SupplierName => product.supplier.as_ref().map(|s| s.name.as_str()),
        }
    }
}

/// A validated filter over products.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProductFilter {
    #[default]
    NoFilter,
    ByName(Vec<String>),
    ByCategory(Vec<String>),
    BySupplier(Vec<String>),
    ByColumn(FilterColumn, Vec<String>),
}

impl ProductFilter {
    /// Builds a filter from the raw `field` / `values` query parameters.
    ///
    /// An absent, empty or unknown field, or an empty value list, yields
    /// [`ProductFilter::NoFilter`].
    pub fn from_params(field: Option<&str>, values: Vec<String>) -> Result<Self> {
        let Some(column) = field.and_then(FilterColumn::resolve) else {
            return Ok(ProductFilter::NoFilter);
        };

        let mut values = values;
        values.sort();
        values.dedup();

        if values.is_empty() {
            return Ok(ProductFilter::NoFilter);
        }

        if values.len() > MAX_FILTER_VALUES {
            return Err(AppError::BadRequest(format!(
                "at most {} filter values are allowed",
                MAX_FILTER_VALUES
            )));
        }

        Ok(Self::for_column(column, values))
    }

    pub fn for_column(column: FilterColumn, values: Vec<String>) -> Self {
        match column {
            FilterColumn::ProductName => ProductFilter::ByName(values),
            FilterColumn::CategoryName => ProductFilter::ByCategory(values),
            FilterColumn::SupplierName => ProductFilter::BySupplier(values),
            other => ProductFilter::ByColumn(other, values),
        }
    }

    pub fn column(&self) -> Option<FilterColumn> {
        match self {
            ProductFilter::NoFilter => None,
            ProductFilter::ByName(_) => Some(FilterColumn::ProductName),
            ProductFilter::ByCategory(_) => Some(FilterColumn::CategoryName),
            ProductFilter::BySupplier(_) => Some(FilterColumn::SupplierName),
            ProductFilter::ByColumn(column, _) => Some(*column),
        }
    }

    pub fn values(&self) -> &[String] {
        match self {
            ProductFilter::NoFilter => &[],
            ProductFilter::ByName(values)
            | ProductFilter::ByCategory(values)
            | ProductFilter::BySupplier(values)
            | ProductFilter::ByColumn(_, values) => values,
        }
    }

    /// The membership predicate for this filter, if it filters anything.
    pub fn predicate(&self) -> Option<Predicate> {
        self.column()
            .and_then(|column| Predicate::any_of(column, self.values()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn logical_names_resolve_to_joined_columns() {
        assert_eq!(FilterColumn::resolve("name").map(FilterColumn::sql), Some("p.name"));
        assert_eq!(FilterColumn::resolve("category").map(FilterColumn::sql), Some("c.name"));
        assert_eq!(FilterColumn::resolve("supplier").map(FilterColumn::sql), Some("s.name"));
    }

    #[test]
    fn raw_columns_must_be_whitelisted() {
        assert_eq!(FilterColumn::resolve("reference"), Some(FilterColumn::Reference));
        assert_eq!(FilterColumn::resolve("product.stock_city"), Some(FilterColumn::StockCity));
        assert_eq!(FilterColumn::resolve("bogus_field"), None);
        assert_eq!(FilterColumn::resolve("price"), None);
        assert_eq!(FilterColumn::resolve("name; DROP TABLE products"), None);
        assert_eq!(FilterColumn::resolve("1=1 OR reference"), None);
        assert_eq!(FilterColumn::resolve(""), None);
    }

    #[test]
    fn resolved_columns_stay_inside_the_permitted_set() {
        let permitted = [
            "p.id",
            "p.name",
            "p.reference",
            "p.status",
            "p.stock_city",
            "p.category_id",
            "p.supplier_id",
            "c.name",
            "s.name",
        ];
        let inputs = [
            "name",
            "category",
            "supplier",
            "id",
            "reference",
            "status",
            "stock_city",
            "category_id",
            "supplier_id",
            "product.reference",
            "category.name",
            "added_date",
            "quantity",
            "reference DESC --",
            "\"products\".\"name\"",
        ];

        for input in inputs {
            if let Some(column) = FilterColumn::resolve(input) {
                assert!(permitted.contains(&column.sql()), "{input} escaped the whitelist");
            }
        }
        for column in FilterColumn::ALL {
            assert!(permitted.contains(&column.sql()));
        }
    }

    #[test]
    fn unknown_field_means_no_filter() {
        let filter =
            ProductFilter::from_params(Some("bogus_field"), strings(&["x", "y"])).unwrap();
        assert_eq!(filter, ProductFilter::NoFilter);
        assert!(filter.predicate().is_none());
    }

    #[test]
    fn missing_values_mean_no_filter() {
        assert_eq!(
            ProductFilter::from_params(Some("category"), Vec::new()).unwrap(),
            ProductFilter::NoFilter
        );
        assert_eq!(
            ProductFilter::from_params(None, strings(&["Electronics"])).unwrap(),
            ProductFilter::NoFilter
        );
    }

    #[test]
    fn values_are_deduplicated() {
        let filter = ProductFilter::from_params(
            Some("category"),
            strings(&["Toys", "Electronics", "Toys"]),
        )
        .unwrap();
        assert_eq!(
            filter,
            ProductFilter::ByCategory(strings(&["Electronics", "Toys"]))
        );
    }

    #[test]
    fn raw_column_builds_by_column_variant() {
        let filter =
            ProductFilter::from_params(Some("status"), strings(&["active"])).unwrap();
        assert_eq!(
            filter,
            ProductFilter::ByColumn(FilterColumn::Status, strings(&["active"]))
        );
    }

    #[test]
    fn too_many_values_is_a_validation_failure() {
        let values = (0..=MAX_FILTER_VALUES).map(|i| format!("v{i}")).collect();
        assert!(matches!(
            ProductFilter::from_params(Some("name"), values),
            Err(AppError::BadRequest(_))
        ));
    }
}
