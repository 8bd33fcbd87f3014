//! # 商品目录服务
//!
//! 基于 Axum 的商品目录：服务端渲染页面 + JSON API，数据存放在 MongoDB。
//! - `app::catalogue`：模型、服务、处理器、页面渲染
//! - `infrastructure`：配置、日志、MongoDB / 内存存储
//! - `core`：错误类型、中间件、通用响应

pub mod app;
pub mod core;
pub mod infrastructure;

use std::{path::Path, sync::Arc};

use axum::{extract::Request, middleware, Router, ServiceExt};
use tokio::{net::TcpListener, signal};
use tower_http::{normalize_path::NormalizePath, services::ServeDir, trace::TraceLayer};
use tracing::info;

pub use crate::app::catalogue::{service::ProductService, store::ProductStore, AppState};
pub use crate::core::error::{AppError, Result};

use crate::core::middleware::request_logging_middleware;
use crate::infrastructure::{
    config::{AppConfig, StoreBackend},
    database::MongoProductStore,
    logger::Logger,
    memory::MemoryProductStore,
};

/// 路由前先去掉路径末尾的 `/`，`{mount}/` 与 `{mount}` 命中同一路由
pub type App = NormalizePath<Router>;

/// 组装完整应用：目录路由挂载到 `state.base_path`，可选静态目录挂在 `/static`
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> App {
    let base_path = state.base_path.clone();
    let mut routes = app::catalogue::routes(state);
    if let Some(dir) = static_dir {
        routes = routes.nest_service("/static", ServeDir::new(dir));
    }

    let app = if base_path.is_empty() {
        routes
    } else {
        Router::new().nest(&base_path, routes)
    };

    let app = app
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http());

    NormalizePath::trim_trailing_slash(app)
}

pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn ProductStore>> {
    let store: Arc<dyn ProductStore> = match config.store {
        StoreBackend::Mongo => Arc::new(MongoProductStore::connect(&config.mongodb_uri).await?),
        StoreBackend::Memory => {
            info!("Using in-memory product store");
            Arc::new(MemoryProductStore::new())
        }
    };
    Ok(store)
}

pub async fn start_server() -> Result<()> {
    dotenvy::dotenv().ok();
    Logger::init();

    let config = AppConfig::from_env()?;

    info!("Initializing store...");
    let product_service = ProductService::new(open_store(&config).await?);
    product_service.seed_if_empty().await?;

    let state = AppState::new(product_service.clone(), &config.base_path);
    let app = build_router(state, Some(&config.static_dir));

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!(
        "Catalogue service running on http://{}{}",
        address,
        app::catalogue::view::list_url(&config.base_path)
    );

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    product_service.close().await;
    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
