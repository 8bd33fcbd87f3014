//! 商品业务服务

use std::sync::Arc;

use tracing::{info, warn};

use super::{
    model::{Product, ProductFields, ProductId, ProductInput},
    store::ProductStore,
};
use crate::core::error::{AppError, Result};

/// 列表接口返回的记录上限
pub const MAX_LIST_RESULTS: usize = 100;

#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub async fn list_products(&self, category: Option<&str>) -> Result<Vec<Product>> {
        let category = category.filter(|c| !c.is_empty());
        self.store.find(category, MAX_LIST_RESULTS).await
    }

    pub async fn distinct_categories(&self) -> Result<Vec<String>> {
        let mut categories = self.store.distinct_categories().await?;
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    pub async fn get_product(&self, id: &str) -> Result<Product> {
        let id: ProductId = id.parse()?;
        match self.store.find_by_id(id).await? {
            Some(product) => Ok(product),
            None => {
                warn!("Product {} not found", id);
                Err(AppError::NotFound)
            }
        }
    }

    pub async fn create_product(&self, input: ProductInput) -> Result<Product> {
        let fields = input.into_fields()?;
        let id = self.store.insert(fields.clone()).await?;
        info!("Created product: {} ({})", fields.name, id);
        Ok(Product::from_parts(id, fields))
    }

    /// 整体替换；标识格式错误或记录不存在时返回 NotFound，不会新建记录
    pub async fn update_product(&self, id: &str, input: ProductInput) -> Result<Product> {
        let id: ProductId = id.parse()?;
        let fields = input.into_fields()?;
        if !self.store.replace(id, fields.clone()).await? {
            warn!("Update of missing product {}", id);
            return Err(AppError::NotFound);
        }
        info!("Updated product: {} ({})", fields.name, id);
        Ok(Product::from_parts(id, fields))
    }

    pub async fn delete_product(&self, id: &str) -> Result<()> {
        let id: ProductId = id.parse()?;
        if !self.store.delete(id).await? {
            warn!("Delete of missing product {}", id);
            return Err(AppError::NotFound);
        }
        info!("Deleted product {}", id);
        Ok(())
    }

    /// 集合为空时写入示例数据，返回写入条数
    pub async fn seed_if_empty(&self) -> Result<usize> {
        let count = self.store.count().await?;
        if count > 0 {
            info!("Collection already contains {} products, skipping seed", count);
            return Ok(0);
        }

        let inserted = self.store.insert_many(seed_products()).await?;
        info!("Seeded {} sample products", inserted);
        Ok(inserted)
    }

    pub async fn close(&self) {
        self.store.close().await;
    }
}

pub fn seed_products() -> Vec<ProductFields> {
    vec![
        ProductFields::new(
            "Laptop Pro",
            "High-performance laptop for professionals",
            1299.99,
            "electronics",
            50,
        ),
        ProductFields::new(
            "Wireless Headphones",
            "Premium noise-canceling headphones",
            299.99,
            "electronics",
            100,
        ),
        ProductFields::new(
            "Office Chair",
            "Ergonomic office chair with lumbar support",
            449.99,
            "furniture",
            25,
        ),
        ProductFields::new(
            "Standing Desk",
            "Electric height-adjustable standing desk",
            599.99,
            "furniture",
            15,
        ),
        ProductFields::new(
            "Mechanical Keyboard",
            "RGB mechanical keyboard with Cherry MX switches",
            149.99,
            "electronics",
            75,
        ),
    ]
}
