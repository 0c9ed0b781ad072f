mod catalog;
mod distance;
mod health;
mod products;
mod statistics;
mod users;

pub use distance::{DistanceParams, DistanceResponse};

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{AppState, middleware::auth_middleware};

pub fn create_router(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/products/categories", get(catalog::get_categories))
        .route("/products/suppliers", get(catalog::get_suppliers))
        .route("/products/cities", get(catalog::get_cities))
        .route("/products/export", get(products::export_products))
        .route(
            "/api/statistics/products-per-category",
            get(statistics::products_per_category),
        )
        .route(
            "/api/statistics/products-per-supplier",
            get(statistics::products_per_supplier),
        )
        .route("/distance", get(distance::calculate_distance))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/users/sign-up", post(users::sign_up))
        .route("/users/sign-in", post(users::sign_in))
        .merge(protected)
}
