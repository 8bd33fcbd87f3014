//! 商品目录处理器

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{Html, Json, Redirect},
    Form,
};
use serde::Deserialize;
use tracing::instrument;

use super::{
    model::{Product, ProductForm, ProductInput},
    service::ProductService,
    view::{self, View},
};
use crate::core::{error::Result, response::HealthResponse};

#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
    /// 规范化后的挂载路径，根路径为空串
    pub base_path: Arc<str>,
}

impl AppState {
    pub fn new(product_service: ProductService, base_path: &str) -> Self {
        Self {
            product_service,
            base_path: Arc::from(base_path),
        }
    }

    fn render(&self, view: View<'_>) -> Html<String> {
        Html(view::render(&view, &self.base_path))
    }

    fn list_url(&self) -> String {
        view::list_url(&self.base_path)
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    #[serde(default)]
    pub category: Option<String>,
}

impl CategoryQuery {
    fn filter(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }
}

#[instrument(skip(state))]
pub async fn list_page(
    State(state): State<AppState>,
    query: std::result::Result<Query<CategoryQuery>, QueryRejection>,
) -> Result<Html<String>> {
    let Query(query) = query?;
    let current_category = query.filter();
    let products = state.product_service.list_products(current_category).await?;
    let categories = state.product_service.distinct_categories().await?;

    Ok(state.render(View::Index {
        products: &products,
        categories: &categories,
        current_category,
    }))
}

#[instrument(skip(state))]
pub async fn product_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>> {
    let product = state.product_service.get_product(&id).await?;
    Ok(state.render(View::Detail { product: &product }))
}

pub async fn new_product_form(State(state): State<AppState>) -> Html<String> {
    state.render(View::Form { product: None })
}

#[instrument(skip_all)]
pub async fn create_product(
    State(state): State<AppState>,
    form: std::result::Result<Form<ProductForm>, FormRejection>,
) -> Result<Redirect> {
    let Form(form) = form?;
    state
        .product_service
        .create_product(ProductInput::try_from(form)?)
        .await?;
    Ok(Redirect::to(&state.list_url()))
}

#[instrument(skip(state))]
pub async fn edit_product_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>> {
    let product = state.product_service.get_product(&id).await?;
    Ok(state.render(View::Form {
        product: Some(&product),
    }))
}

#[instrument(skip(state, form))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: std::result::Result<Form<ProductForm>, FormRejection>,
) -> Result<Redirect> {
    let Form(form) = form?;
    let product = state
        .product_service
        .update_product(&id, ProductInput::try_from(form)?)
        .await?;
    Ok(Redirect::to(&view::product_url(&state.base_path, &product)))
}

#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect> {
    state.product_service.delete_product(&id).await?;
    Ok(Redirect::to(&state.list_url()))
}

// JSON API

pub async fn api_list_products(
    State(state): State<AppState>,
    query: std::result::Result<Query<CategoryQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>> {
    let Query(query) = query?;
    let products = state.product_service.list_products(query.filter()).await?;
    Ok(Json(products))
}

pub async fn api_get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let product = state.product_service.get_product(&id).await?;
    Ok(Json(product))
}

pub async fn api_create_product(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ProductInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>)> {
    let Json(input) = payload?;
    let product = state.product_service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn api_update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<Product>> {
    let Json(input) = payload?;
    let product = state.product_service.update_product(&id, input).await?;
    Ok(Json(product))
}

pub async fn api_delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.product_service.delete_product(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
