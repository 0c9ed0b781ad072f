use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use axum_extra::extract::Query;
use rust_decimal::Decimal;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        CreateProductRequest, Patch, Product, ProductExportParams, ProductFilter,
        ProductListParams, ProductListResponse, UpdateProductRequest,
    },
    services::{
        export_service,
        listing_service::{self, ListingRequest},
        pagination,
    },
};

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> Result<Json<ProductListResponse>> {
    let filter = ProductFilter::from_params(params.field.as_deref(), params.values)?;

    let page = listing_service::list_products(
        state.catalog.as_ref(),
        ListingRequest {
            page_size: params.per_page,
            filter,
            cursor: pagination::decode(params.last_reference.as_deref()),
        },
    )
    .await?;

    Ok(Json(ProductListResponse {
        products: page.products,
        next_reference: page.next_cursor,
    }))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let product = state
        .catalog
        .find_product(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(mut payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    validate_required("name", &payload.name)?;
    validate_required("reference", &payload.reference)?;
    validate_price(payload.price)?;
    validate_quantity(payload.quantity)?;

    payload.name = payload.name.trim().to_string();
    payload.reference = payload.reference.trim().to_string();
    payload.category_id = non_blank(payload.category_id);
    payload.supplier_id = non_blank(payload.supplier_id);

    let product = state.catalog.create_product(&payload).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut payload): Json<UpdateProductRequest>,
) -> Result<Json<Product>> {
    if let Patch::SetTo(name) = &mut payload.name {
        validate_required("name", name)?;
        *name = name.trim().to_string();
    }
    if let Patch::SetTo(reference) = &mut payload.reference {
        validate_required("reference", reference)?;
        *reference = reference.trim().to_string();
    }
    if let Some(price) = payload.price.as_set() {
        validate_price(*price)?;
    }
    if let Some(quantity) = payload.quantity.as_set() {
        validate_quantity(*quantity)?;
    }
    // blank ids mean "leave as is"; unlinking is not supported
    payload.category_id = blank_to_unset(payload.category_id);
    payload.supplier_id = blank_to_unset(payload.supplier_id);

    let product = state
        .catalog
        .update_product(&id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if !state.catalog.delete_product(&id).await? {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn export_products(
    State(state): State<AppState>,
    Query(params): Query<ProductExportParams>,
) -> Result<impl IntoResponse> {
    let filter = ProductFilter::from_params(params.field.as_deref(), params.values)?;
    let sink = export_service::sink_for(params.format);

    let body = export_service::export_report(state.catalog.as_ref(), &filter, sink.as_ref()).await?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(sink.content_type()));
    let disposition = format!("attachment; filename={}", sink.file_name());
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|e| AppError::InternalError(format!("Invalid file name: {}", e)))?,
    );

    Ok((headers, body))
}

fn validate_required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }
    Ok(())
}

fn validate_price(price: Decimal) -> Result<()> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(AppError::BadRequest("price must not be negative".to_string()));
    }
    Ok(())
}

fn validate_quantity(quantity: i32) -> Result<()> {
    if quantity < 0 {
        return Err(AppError::BadRequest("quantity must not be negative".to_string()));
    }
    Ok(())
}

fn non_blank(id: Option<String>) -> Option<String> {
    id.map(|id| id.trim().to_string()).filter(|id| !id.is_empty())
}

fn blank_to_unset(id: Patch<String>) -> Patch<String> {
    match non_blank(id.into_option()) {
        Some(id) => Patch::SetTo(id),
        None => Patch::Unset,
    }
}
