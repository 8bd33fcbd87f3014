//! 商品存储接口
//!
//! 处理器层只依赖这个 trait；MongoDB 与内存实现位于 `infrastructure`。

use async_trait::async_trait;

use super::model::{Product, ProductFields, ProductId};
use crate::core::error::Result;

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// 按存储原生顺序返回至多 `limit` 条记录，可按分类精确过滤
    async fn find(&self, category: Option<&str>, limit: usize) -> Result<Vec<Product>>;

    /// 当前出现过的每个分类值（各一次）
    async fn distinct_categories(&self) -> Result<Vec<String>>;

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>>;

    /// 插入一条记录，返回存储分配的标识
    async fn insert(&self, fields: ProductFields) -> Result<ProductId>;

    async fn insert_many(&self, fields: Vec<ProductFields>) -> Result<usize>;

    /// 整体替换可编辑字段；记录不存在时返回 false
    async fn replace(&self, id: ProductId, fields: ProductFields) -> Result<bool>;

    /// 删除记录；记录不存在时返回 false
    async fn delete(&self, id: ProductId) -> Result<bool>;

    async fn count(&self) -> Result<u64>;

    /// 关闭底层连接
    async fn close(&self);
}
