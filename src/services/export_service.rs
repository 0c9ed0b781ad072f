use crate::{
    error::Result,
    models::{Product, ProductFilter, Relations, ReportFormat},
    repository::{CatalogRepository, FetchSpec},
    services::report_service::{FixedWidthTable, PdfTable, ReportSink},
};

pub const REPORT_TITLE: &str = "Products";

/// Column order is relied upon by existing report consumers.
pub const REPORT_HEADER: [&str; 9] = [
    "Product Reference",
    "Product Name",
    "Date Added",
    "Status",
    "Product Category",
    "Price",
    "Stock Location (City)",
    "Supplier",
    "Available Quantity",
];

/// Minimum text column widths, in characters.
pub const REPORT_COLUMN_WIDTHS: [usize; 9] = [20, 28, 12, 12, 20, 12, 22, 20, 18];

/// PDF column widths, in millimetres.
pub const REPORT_COLUMN_WIDTHS_MM: [f32; 9] = [45.0, 60.0, 30.0, 30.0, 50.0, 30.0, 50.0, 40.0, 50.0];

pub fn sink_for(format: ReportFormat) -> Box<dyn ReportSink> {
    match format {
        ReportFormat::Pdf => Box::new(PdfTable::new(REPORT_TITLE, &REPORT_COLUMN_WIDTHS_MM)),
        ReportFormat::Text => Box::new(FixedWidthTable::new(REPORT_TITLE, &REPORT_COLUMN_WIDTHS)),
    }
}

pub fn report_row(product: &Product) -> Vec<String> {
    vec![
        product.reference.clone(),
        product.name.clone(),
        product.added_date.format("%Y-%m-%d").to_string(),
        product.status.clone(),
        product
            .category
            .as_ref()
            .map(|c| c.name.clone())
            .unwrap_or_default(),
        product.price.normalize().to_string(),
        product.stock_city.clone(),
        product
            .supplier
            .as_ref()
            .map(|s| s.name.clone())
            .unwrap_or_default(),
        product.quantity.to_string(),
    ]
}

/// Every product matching `filter`, newest reference first. Never paged.
pub async fn export_products(
    repo: &dyn CatalogRepository,
    filter: &ProductFilter,
) -> Result<Vec<Product>> {
    let spec = FetchSpec {
        predicates: filter.predicate().into_iter().collect(),
        limit: None,
        relations: Relations::ALL,
    };

    repo.fetch_products(&spec).await
}

pub async fn export_report(
    repo: &dyn CatalogRepository,
    filter: &ProductFilter,
    sink: &dyn ReportSink,
) -> Result<Vec<u8>> {
    let products = export_products(repo, filter).await?;
    let rows: Vec<Vec<String>> = products.iter().map(report_row).collect();

    tracing::info!(rows = rows.len(), "Exporting product report");

    sink.render(&REPORT_HEADER, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Supplier};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    #[test]
    fn row_follows_report_layout() {
        let product = Product {
            id: "1".to_string(),
            name: "Desk".to_string(),
            reference: "PROD-202401-029".to_string(),
            added_date: Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap(),
            status: "in_stock".to_string(),
            category_id: Some("c".to_string()),
            price: Decimal::new(12050, 2),
            stock_city: "Lyon".to_string(),
            supplier_id: Some("s".to_string()),
            quantity: 7,
            category: Some(Category {
                id: "c".to_string(),
                name: "Furniture".to_string(),
            }),
            supplier: Some(Supplier {
                id: "s".to_string(),
                name: "Acme".to_string(),
            }),
        };

        assert_eq!(
            report_row(&product),
            vec![
                "PROD-202401-029",
                "Desk",
                "2024-01-15",
                "in_stock",
                "Furniture",
                "120.5",
                "Lyon",
                "Acme",
                "7"
            ]
        );
    }

    #[test]
    fn missing_relations_render_blank() {
        let product = Product {
            id: "2".to_string(),
            name: "Chair".to_string(),
            reference: "P2".to_string(),
            added_date: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
            status: String::new(),
            category_id: None,
            price: Decimal::ZERO,
            stock_city: String::new(),
            supplier_id: None,
            quantity: 0,
            category: None,
            supplier: None,
        };

        let row = report_row(&product);
        assert_eq!(row[4], "");
        assert_eq!(row[7], "");
        assert_eq!(row.len(), REPORT_HEADER.len());
    }

    #[test]
    fn pdf_is_the_default_format() {
        let sink = sink_for(ReportFormat::default());
        assert_eq!(sink.content_type(), "application/pdf");
        assert_eq!(sink.file_name(), "output.pdf");
        assert_eq!(sink_for(ReportFormat::Text).file_name(), "products.txt");
    }
}
