use crate::error::AppError;

pub const CATEGORY_FKEY: &str = "products_category_id_fkey";
pub const SUPPLIER_FKEY: &str = "products_supplier_id_fkey";
pub const REFERENCE_KEY: &str = "products_reference_key";
pub const USER_EMAIL_KEY: &str = "users_email_key";

/// Maps a known constraint name to its user-facing error.
pub fn constraint_error(constraint: &str) -> Option<AppError> {
    match constraint {
        CATEGORY_FKEY => Some(AppError::InvalidReference(
            "category_id not exists".to_string(),
        )),
        SUPPLIER_FKEY => Some(AppError::InvalidReference(
            "supplier_id not exists".to_string(),
        )),
        REFERENCE_KEY => Some(AppError::Conflict(
            "product reference already exists".to_string(),
        )),
        USER_EMAIL_KEY => Some(AppError::Conflict("email already exists".to_string())),
        _ => None,
    }
}

/// Splits write failures into constraint violations and opaque storage errors.
pub fn classify_write_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        if let Some(mapped) = db_err.constraint().and_then(constraint_error) {
            return mapped;
        }
    }

    AppError::DatabaseError(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_keys_map_to_invalid_reference() {
        assert!(matches!(
            constraint_error(CATEGORY_FKEY),
            Some(AppError::InvalidReference(msg)) if msg == "category_id not exists"
        ));
        assert!(matches!(
            constraint_error(SUPPLIER_FKEY),
            Some(AppError::InvalidReference(msg)) if msg == "supplier_id not exists"
        ));
    }

    #[test]
    fn unique_reference_maps_to_conflict() {
        assert!(matches!(
            constraint_error(REFERENCE_KEY),
            Some(AppError::Conflict(_))
        ));
    }

    #[test]
    fn unknown_constraints_stay_opaque() {
        assert!(constraint_error("products_pkey").is_none());
        assert!(matches!(
            classify_write_error(sqlx::Error::RowNotFound),
            AppError::DatabaseError(_)
        ));
    }
}
