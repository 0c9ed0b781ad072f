use axum::{Json, extract::State};

use crate::{
    AppState,
    error::Result,
    models::{CategoryListResponse, SupplierListResponse},
};

pub async fn get_categories(State(state): State<AppState>) -> Result<Json<CategoryListResponse>> {
    let categories = state.catalog.list_categories().await?;

    Ok(Json(CategoryListResponse { categories }))
}

pub async fn get_suppliers(State(state): State<AppState>) -> Result<Json<SupplierListResponse>> {
    let suppliers = state.catalog.list_suppliers().await?;

    Ok(Json(SupplierListResponse { suppliers }))
}

pub async fn get_cities(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    let cities = state.catalog.distinct_cities().await?;

    Ok(Json(cities))
}
