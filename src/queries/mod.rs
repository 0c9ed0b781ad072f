pub mod category_queries;
pub mod product_queries;
pub mod statistics_queries;
pub mod user_queries;
