//! 内存存储：无数据库时的本地运行与测试

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::app::catalogue::{
    model::{Product, ProductFields, ProductId},
    store::ProductStore,
};
use crate::core::error::Result;

/// 按插入顺序保存记录
#[derive(Default)]
pub struct MemoryProductStore {
    products: RwLock<Vec<Product>>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn find(&self, category: Option<&str>, limit: usize) -> Result<Vec<Product>> {
        let products = self.products.read().await;
        Ok(products
            .iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn distinct_categories(&self) -> Result<Vec<String>> {
        let products = self.products.read().await;
        let mut categories: Vec<String> = Vec::new();
        for product in products.iter() {
            if !categories.contains(&product.category) {
                categories.push(product.category.clone());
            }
        }
        Ok(categories)
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, fields: ProductFields) -> Result<ProductId> {
        let id = ProductId::new();
        self.products
            .write()
            .await
            .push(Product::from_parts(id, fields));
        Ok(id)
    }

    async fn insert_many(&self, fields: Vec<ProductFields>) -> Result<usize> {
        let mut products = self.products.write().await;
        let count = fields.len();
        products.extend(
            fields
                .into_iter()
                .map(|f| Product::from_parts(ProductId::new(), f)),
        );
        Ok(count)
    }

    async fn replace(&self, id: ProductId, fields: ProductFields) -> Result<bool> {
        let mut products = self.products.write().await;
        match products.iter_mut().find(|p| p.id == id) {
            Some(product) => {
                *product = Product::from_parts(id, fields);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: ProductId) -> Result<bool> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() != before)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.products.read().await.len() as u64)
    }

    async fn close(&self) {
        debug!("Memory store closed");
    }
}
