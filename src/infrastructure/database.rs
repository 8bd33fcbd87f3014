//! 数据库基础设施：MongoDB 商品集合

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    options::{ClientOptions, FindOptions},
    Client, Collection, Database,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use crate::app::catalogue::{
    model::{Product, ProductFields, ProductId, PLACEHOLDER_IMAGE},
    store::ProductStore,
};
use crate::core::{error::Result, response::SERVICE_NAME};

pub const DEFAULT_DATABASE: &str = "catalogue";
pub const PRODUCTS_COLLECTION: &str = "products";

/// 集合中的文档形态
#[derive(Debug, Serialize, Deserialize)]
struct ProductDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    price: f64,
    category: String,
    #[serde(default)]
    stock: i64,
    #[serde(default)]
    image: Option<String>,
}

impl ProductDocument {
    fn new(id: ObjectId, fields: ProductFields) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
            price: fields.price,
            category: fields.category,
            stock: fields.stock,
            image: Some(fields.image),
        }
    }
}

impl From<ProductDocument> for Product {
    fn from(doc: ProductDocument) -> Self {
        Product {
            id: doc.id.into(),
            name: doc.name,
            description: doc.description,
            price: doc.price,
            category: doc.category,
            stock: doc.stock,
            image: doc
                .image
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        }
    }
}

pub struct MongoProductStore {
    client: Client,
    database: Database,
}

impl MongoProductStore {
    /// 连接并 ping 一次，确认数据库可达
    pub async fn connect(uri: &str) -> Result<Self> {
        Self::connect_database(uri, None).await
    }

    /// 同 `connect`，`database` 为空时取 URI 中的库名，再退回 `catalogue`
    pub async fn connect_database(uri: &str, database: Option<&str>) -> Result<Self> {
        let mut options = ClientOptions::parse(uri).await?;
        options.app_name = Some(SERVICE_NAME.to_string());
        options.connect_timeout = Some(Duration::from_secs(8));
        options.server_selection_timeout = Some(Duration::from_secs(8));

        let client = Client::with_options(options)?;
        let database = match database {
            Some(name) => client.database(name),
            None => client
                .default_database()
                .unwrap_or_else(|| client.database(DEFAULT_DATABASE)),
        };

        database.run_command(doc! { "ping": 1 }, None).await?;
        info!("Connected to MongoDB database '{}'", database.name());

        Ok(Self { client, database })
    }

    fn products(&self) -> Collection<ProductDocument> {
        self.database.collection(PRODUCTS_COLLECTION)
    }

    /// 读取走原始文档，逐条解码，坏文档不影响整页
    fn raw_products(&self) -> Collection<Document> {
        self.database.collection(PRODUCTS_COLLECTION)
    }
}

/// 解码失败的文档记一条 warn 并跳过
fn decode(raw: Document) -> Option<Product> {
    let id = raw.get("_id").cloned();
    match mongodb::bson::from_document::<ProductDocument>(raw) {
        Ok(doc) => Some(doc.into()),
        Err(e) => {
            warn!("Skipping undecodable product document {:?}: {}", id, e);
            None
        }
    }
}

fn id_filter(id: ProductId) -> Document {
    doc! { "_id": id.as_object_id() }
}

#[async_trait]
impl ProductStore for MongoProductStore {
    async fn find(&self, category: Option<&str>, limit: usize) -> Result<Vec<Product>> {
        let filter = match category {
            Some(category) => doc! { "category": category },
            None => doc! {},
        };
        let options = FindOptions::builder().limit(limit as i64).build();

        let cursor = self.raw_products().find(filter, options).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents.into_iter().filter_map(decode).collect())
    }

    async fn distinct_categories(&self) -> Result<Vec<String>> {
        let values = self.products().distinct("category", None, None).await?;
        Ok(values
            .into_iter()
            .filter_map(|value| match value {
                Bson::String(s) => Some(s),
                _ => None,
            })
            .collect())
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>> {
        let document = self.raw_products().find_one(id_filter(id), None).await?;
        Ok(document.and_then(decode))
    }

    async fn insert(&self, fields: ProductFields) -> Result<ProductId> {
        let id = ObjectId::new();
        self.products()
            .insert_one(ProductDocument::new(id, fields), None)
            .await?;
        Ok(id.into())
    }

    async fn insert_many(&self, fields: Vec<ProductFields>) -> Result<usize> {
        if fields.is_empty() {
            return Ok(0);
        }
        let documents: Vec<ProductDocument> = fields
            .into_iter()
            .map(|f| ProductDocument::new(ObjectId::new(), f))
            .collect();
        let result = self.products().insert_many(documents, None).await?;
        Ok(result.inserted_ids.len())
    }

    async fn replace(&self, id: ProductId, fields: ProductFields) -> Result<bool> {
        let update = doc! {
            "$set": {
                "name": fields.name.as_str(),
                "description": fields.description.as_str(),
                "price": fields.price,
                "category": fields.category.as_str(),
                "stock": fields.stock,
                "image": fields.image.as_str(),
            }
        };
        let result = self
            .products()
            .update_one(id_filter(id), update, None)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: ProductId) -> Result<bool> {
        let result = self.products().delete_one(id_filter(id), None).await?;
        Ok(result.deleted_count > 0)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.products().count_documents(doc! {}, None).await?)
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
        info!("Disconnected from MongoDB");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_without_image_gets_placeholder() {
        let doc = ProductDocument {
            id: ObjectId::new(),
            name: "Lamp".into(),
            description: String::new(),
            price: 12.0,
            category: "lighting".into(),
            stock: 4,
            image: None,
        };
        let product = Product::from(doc);
        assert_eq!(product.image, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn int32_stock_is_read() {
        let raw = doc! {
            "_id": ObjectId::new(),
            "name": "Desk",
            "description": "d",
            "price": 599.99,
            "category": "furniture",
            "stock": 15_i32,
            "image": "https://via.placeholder.com/300x200",
        };
        let parsed: ProductDocument = mongodb::bson::from_document(raw).unwrap();
        assert_eq!(parsed.stock, 15);
    }

    #[test]
    fn missing_price_defaults_to_zero() {
        let raw = doc! {
            "_id": ObjectId::new(),
            "name": "Legacy",
            "category": "misc",
        };
        let product = decode(raw).unwrap();
        assert_eq!(product.price, 0.0);
        assert_eq!(product.stock, 0);
        assert_eq!(product.image, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn non_numeric_price_is_skipped() {
        let raw = doc! {
            "_id": ObjectId::new(),
            "name": "Broken",
            "price": "abc",
            "category": "misc",
        };
        assert!(decode(raw).is_none());
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB; set MONGODB_URI"]
    async fn mongo_store_round_trip() {
        let Ok(uri) = std::env::var("MONGODB_URI") else {
            return;
        };
        let name = format!("catalogue_test_{}", uuid::Uuid::new_v4().simple());
        let store = MongoProductStore::connect_database(&uri, Some(&name))
            .await
            .unwrap();

        let fields = |name: &str, category: &str| ProductFields::new(name, "d", 10.0, category, 1);
        let seeded = store
            .insert_many(vec![
                fields("Laptop", "electronics"),
                fields("Mouse", "electronics"),
                fields("Desk", "furniture"),
            ])
            .await
            .unwrap();
        assert_eq!(seeded, 3);

        let electronics = store.find(Some("electronics"), 100).await.unwrap();
        assert_eq!(electronics.len(), 2);
        assert!(electronics.iter().all(|p| p.category == "electronics"));

        let mut categories = store.distinct_categories().await.unwrap();
        categories.sort();
        assert_eq!(categories, vec!["electronics", "furniture"]);

        let missing: ProductId = ObjectId::new().into();
        assert!(!store.replace(missing, fields("Ghost", "none")).await.unwrap());
        assert!(store.find_by_id(missing).await.unwrap().is_none());

        let desk = store.find(Some("furniture"), 100).await.unwrap().remove(0);
        assert!(store
            .replace(desk.id, ProductFields::new("Standing Desk", "tall", 599.5, "furniture", 3))
            .await
            .unwrap());
        let updated = store.find_by_id(desk.id).await.unwrap().unwrap();
        assert_eq!(updated.name, "Standing Desk");
        assert_eq!(updated.price, 599.5);
        assert_eq!(updated.stock, 3);

        let bulk = (0..105).map(|i| fields(&format!("Bulk {}", i), "bulk")).collect();
        assert_eq!(store.insert_many(bulk).await.unwrap(), 105);
        assert_eq!(store.find(None, 100).await.unwrap().len(), 100);
        assert_eq!(store.count().await.unwrap(), 108);

        assert!(store.delete(desk.id).await.unwrap());
        assert!(!store.delete(desk.id).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 107);

        store.database.drop(None).await.unwrap();
        store.close().await;
    }
}
