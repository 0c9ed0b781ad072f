use crate::models::{Cursor, FilterColumn, Product, Relation};

/// A condition on products. Predicates in a list combine with AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Column value is one of `values`. Values are always bound, never inlined.
    AnyOf {
        column: FilterColumn,
        values: Vec<String>,
    },
    /// Reference sorts strictly before the cursor.
    ReferenceBefore(String),
}

impl Predicate {
    /// Membership predicate; `None` when there is nothing to match.
    pub fn any_of(column: FilterColumn, values: &[String]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        Some(Predicate::AnyOf {
            column,
            values: values.to_vec(),
        })
    }

    /// Keyset predicate for the page after `cursor`.
    pub fn after_cursor(cursor: Option<&Cursor>) -> Option<Self> {
        cursor.map(|c| Predicate::ReferenceBefore(c.as_str().to_string()))
    }

    pub fn relation(&self) -> Option<Relation> {
        match self {
            Predicate::AnyOf { column, .. } => column.relation(),
            Predicate::ReferenceBefore(_) => None,
        }
    }

    /// Evaluates the predicate against a hydrated product.
    ///
    /// A missing value never matches, mirroring SQL `NULL = ANY(..)`.
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Predicate::AnyOf { column, values } => column
                .value_of(product)
                .is_some_and(|value| values.iter().any(|v| v == value)),
            Predicate::ReferenceBefore(cursor) => product.reference.as_str() < cursor.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn product(reference: &str, category: Option<&str>) -> Product {
        Product {
            id: reference.to_lowercase(),
            name: format!("Product {reference}"),
            reference: reference.to_string(),
            added_date: Utc::now(),
            status: "active".to_string(),
            category_id: category.map(|c| c.to_lowercase()),
            price: Decimal::ONE,
            stock_city: "Paris".to_string(),
            supplier_id: None,
            quantity: 1,
            category: category.map(|c| Category {
                id: c.to_lowercase(),
                name: c.to_string(),
            }),
            supplier: None,
        }
    }

    #[test]
    fn empty_value_set_builds_nothing() {
        assert!(Predicate::any_of(FilterColumn::Status, &[]).is_none());
    }

    #[test]
    fn absent_cursor_builds_nothing() {
        assert!(Predicate::after_cursor(None).is_none());
        assert_eq!(
            Predicate::after_cursor(Some(&Cursor::new("P2"))),
            Some(Predicate::ReferenceBefore("P2".to_string()))
        );
    }

    #[test]
    fn membership_on_joined_column() {
        let predicate =
            Predicate::any_of(FilterColumn::CategoryName, &["Electronics".to_string()]).unwrap();

        assert_eq!(predicate.relation(), Some(Relation::Category));
        assert!(predicate.matches(&product("P1", Some("Electronics"))));
        assert!(!predicate.matches(&product("P2", Some("Toys"))));
        assert!(!predicate.matches(&product("P3", None)));
    }

    #[test]
    fn cursor_is_strictly_less_than() {
        let predicate = Predicate::ReferenceBefore("P2".to_string());
        assert!(predicate.matches(&product("P1", None)));
        assert!(!predicate.matches(&product("P2", None)));
        assert!(!predicate.matches(&product("P3", None)));
    }
}
