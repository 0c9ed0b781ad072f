use catalog_api::{
    AppError,
    models::{CreateProductRequest, FilterColumn, ProductFilter},
    repository::{CatalogRepository, InMemoryCatalogRepository},
    services::{
        export_service,
        listing_service::{self, ListingRequest},
    },
};
use rust_decimal::Decimal;

fn product(reference: &str, category_id: Option<&str>, supplier_id: Option<&str>) -> CreateProductRequest {
    CreateProductRequest {
        name: format!("Product {}", reference),
        reference: reference.to_string(),
        status: "in_stock".to_string(),
        category_id: category_id.map(str::to_string),
        price: Decimal::new(999, 2),
        stock_city: "Lyon".to_string(),
        supplier_id: supplier_id.map(str::to_string),
        quantity: 5,
    }
}

fn references(products: &[catalog_api::models::Product]) -> Vec<&str> {
    products.iter().map(|p| p.reference.as_str()).collect()
}

#[tokio::test]
async fn pages_walk_references_in_descending_order() {
    let repo = InMemoryCatalogRepository::new();
    for reference in ["P1", "P3", "P2"] {
        repo.create_product(&product(reference, None, None)).await.unwrap();
    }

    let first = listing_service::list_products(
        &repo,
        ListingRequest {
            page_size: Some(2),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(references(&first.products), vec!["P3", "P2"]);
    let cursor = first.next_cursor.expect("full page has a cursor");
    assert_eq!(cursor.as_str(), "P2");

    let second = listing_service::list_products(
        &repo,
        ListingRequest {
            page_size: Some(2),
            cursor: Some(cursor),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(references(&second.products), vec!["P1"]);
    assert!(second.next_cursor.is_none());
}

#[tokio::test]
async fn category_filter_returns_exactly_matching_products() {
    let repo = InMemoryCatalogRepository::new();
    let electronics = repo.add_category("Electronics").await;
    let garden = repo.add_category("Garden").await;

    repo.create_product(&product("P1", Some(&electronics.id), None)).await.unwrap();
    repo.create_product(&product("P2", Some(&garden.id), None)).await.unwrap();
    repo.create_product(&product("P3", Some(&electronics.id), None)).await.unwrap();
    repo.create_product(&product("P4", None, None)).await.unwrap();

    let filter =
        ProductFilter::from_params(Some("category"), vec!["Electronics".to_string()]).unwrap();
    let page = listing_service::list_products(
        &repo,
        ListingRequest {
            filter,
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(references(&page.products), vec!["P3", "P1"]);
    assert!(page.products.iter().all(|p| {
        p.category.as_ref().map(|c| c.name.as_str()) == Some("Electronics")
    }));
}

#[tokio::test]
async fn unknown_filter_field_lists_everything() {
    let repo = InMemoryCatalogRepository::new();
    for reference in ["P1", "P2"] {
        repo.create_product(&product(reference, None, None)).await.unwrap();
    }

    let filter =
        ProductFilter::from_params(Some("bogus_field"), vec!["x".to_string()]).unwrap();
    assert_eq!(filter, ProductFilter::NoFilter);

    let page = listing_service::list_products(
        &repo,
        ListingRequest {
            filter,
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(references(&page.products), vec!["P2", "P1"]);
}

#[tokio::test]
async fn unknown_category_id_is_a_reference_error() {
    let repo = InMemoryCatalogRepository::new();

    let err = repo
        .create_product(&product("P1", Some("missing"), None))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidReference(_)));
}

#[tokio::test]
async fn paging_never_repeats_or_skips_while_products_are_added() {
    let repo = InMemoryCatalogRepository::new();
    for i in 0..7 {
        repo.create_product(&product(&format!("REF-{:02}", i), None, None))
            .await
            .unwrap();
    }

    let mut seen = Vec::new();
    let mut cursor = None;
    let mut pages = 0;

    loop {
        let page = listing_service::list_products(
            &repo,
            ListingRequest {
                page_size: Some(3),
                cursor: cursor.take(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        pages += 1;

        seen.extend(page.products.iter().map(|p| p.reference.clone()));

        if pages == 1 {
            // sorts above every cursor still to come
            repo.create_product(&product("REF-99", None, None)).await.unwrap();
        }

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    let expected: Vec<String> = (0..7).rev().map(|i| format!("REF-{:02}", i)).collect();
    assert_eq!(seen, expected);
}

#[tokio::test]
async fn export_matches_concatenated_pages() {
    let repo = InMemoryCatalogRepository::new();
    let acme = repo.add_supplier("Acme").await;
    for i in 0..5 {
        let supplier = (i % 2 == 0).then_some(acme.id.as_str());
        repo.create_product(&product(&format!("R{}", i), None, supplier))
            .await
            .unwrap();
    }

    let filter = ProductFilter::for_column(FilterColumn::SupplierName, vec!["Acme".to_string()]);

    let mut paged = Vec::new();
    let mut cursor = None;
    loop {
        let page = listing_service::list_products(
            &repo,
            ListingRequest {
                page_size: Some(1),
                filter: filter.clone(),
                cursor: cursor.take(),
            },
        )
        .await
        .unwrap();
        paged.extend(page.products);
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    let exported = export_service::export_products(&repo, &filter).await.unwrap();

    assert_eq!(exported, paged);
    assert_eq!(references(&exported), vec!["R4", "R2", "R0"]);
}

#[tokio::test]
async fn large_page_sizes_are_honoured() {
    let repo = InMemoryCatalogRepository::new();
    for i in 0..150 {
        repo.create_product(&product(&format!("REF-{:03}", i), None, None))
            .await
            .unwrap();
    }

    let page = listing_service::list_products(
        &repo,
        ListingRequest {
            page_size: Some(150),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(page.products.len(), 150);
    assert_eq!(page.next_cursor.map(|c| c.as_str().to_string()).as_deref(), Some("REF-000"));
}
