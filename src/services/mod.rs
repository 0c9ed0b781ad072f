pub mod export_service;
pub mod geo_service;
pub mod listing_service;
pub mod pagination;
pub mod report_service;
