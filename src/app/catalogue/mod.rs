//! 商品目录：模型、存储接口、服务、处理器、页面

pub mod handler;
pub mod model;
pub mod service;
pub mod store;
pub mod view;

use axum::{
    routing::{get, post},
    Router,
};

pub use handler::AppState;

/// 目录路由（相对挂载路径）
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(handler::list_page).post(handler::create_product))
        .route("/new", get(handler::new_product_form))
        .route(
            "/product/:id",
            get(handler::product_page).post(handler::update_product),
        )
        .route("/product/:id/edit", get(handler::edit_product_form))
        .route("/product/:id/delete", post(handler::delete_product))
        .route(
            "/api/products",
            get(handler::api_list_products).post(handler::api_create_product),
        )
        .route(
            "/api/products/:id",
            get(handler::api_get_product)
                .put(handler::api_update_product)
                .delete(handler::api_delete_product),
        )
        .route("/health", get(handler::health))
        .with_state(state)
}
