use crate::{
    error::Result,
    models::{Cursor, Predicate, Product, ProductFilter, Relations},
    repository::{CatalogRepository, FetchSpec},
    services::pagination,
};

/// One validated "list products" request.
#[derive(Debug, Clone, Default)]
pub struct ListingRequest {
    pub page_size: Option<i64>,
    pub filter: ProductFilter,
    pub cursor: Option<Cursor>,
}

#[derive(Debug, Clone)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub next_cursor: Option<Cursor>,
}

pub async fn list_products(
    repo: &dyn CatalogRepository,
    request: ListingRequest,
) -> Result<ProductPage> {
    let page_size = pagination::page_size(request.page_size);

    let predicates: Vec<Predicate> = request
        .filter
        .predicate()
        .into_iter()
        .chain(Predicate::after_cursor(request.cursor.as_ref()))
        .collect();

    let spec = FetchSpec {
        predicates,
        limit: Some(page_size),
        relations: Relations::ALL,
    };

    let products = repo.fetch_products(&spec).await?;
    let next_cursor = pagination::encode_next(&products, page_size);

    tracing::debug!(
        returned = products.len(),
        page_size,
        has_next = next_cursor.is_some(),
        "Listed products"
    );

    Ok(ProductPage {
        products,
        next_cursor,
    })
}
