use axum::{Json, extract::State};

use crate::{
    AppState,
    error::Result,
    models::{CategoryCount, SupplierCount},
};

/// Product totals per category name. Categories without products are omitted.
pub async fn products_per_category(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryCount>>> {
    let counts = state.catalog.count_by_category().await?;

    Ok(Json(counts))
}

pub async fn products_per_supplier(
    State(state): State<AppState>,
) -> Result<Json<Vec<SupplierCount>>> {
    let counts = state.catalog.count_by_supplier().await?;

    Ok(Json(counts))
}
