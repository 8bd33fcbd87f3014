//! 商品数据模型

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize, Serializer};
use validator::Validate;

use crate::core::error::{AppError, Result};

/// 未提供图片时使用的占位图
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x200";

/// 商品标识，由存储分配（24 位十六进制 ObjectId）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProductId(ObjectId);

impl ProductId {
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    pub fn as_object_id(&self) -> ObjectId {
        self.0
    }

    /// ObjectId 内嵌的创建时间（秒级）
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0.timestamp().timestamp_millis())
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for ProductId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

/// 格式错误的标识与不存在的记录一样按 NotFound 处理
impl FromStr for ProductId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        ObjectId::parse_str(s)
            .map(Self)
            .map_err(|_| AppError::NotFound)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl Serialize for ProductId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

/// 商品记录
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub stock: i64,
    pub image: String,
}

impl Product {
    pub fn from_parts(id: ProductId, fields: ProductFields) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
            price: fields.price,
            category: fields.category,
            stock: fields.stock,
            image: fields.image,
        }
    }
}

/// 写入存储的可编辑字段（已校验）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub stock: i64,
    pub image: String,
}

impl ProductFields {
    pub fn new(name: &str, description: &str, price: f64, category: &str, stock: i64) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            price,
            category: category.to_string(),
            stock,
            image: PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

/// 创建/更新请求，表单和 JSON 两条路径都归一到这里
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductInput {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub description: String,
    #[validate(range(exclusive_min = 0.0, message = "price must be greater than 0"))]
    pub price: f64,
    pub category: String,
    #[validate(range(min = 0, message = "stock must not be negative"))]
    pub stock: i64,
    #[serde(default)]
    pub image: Option<String>,
}

impl ProductInput {
    /// 校验并补全默认图片
    pub fn into_fields(mut self) -> Result<ProductFields> {
        self.name = self.name.trim().to_string();
        self.category = self.category.trim().to_string();
        self.validate()?;

        let image = self
            .image
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());

        Ok(ProductFields {
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            stock: self.stock,
            image,
        })
    }
}

/// HTML 表单原始字段，数值在转换时解析
#[derive(Debug, Clone, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub stock: String,
    #[serde(default)]
    pub image: String,
}

impl TryFrom<ProductForm> for ProductInput {
    type Error = AppError;

    fn try_from(form: ProductForm) -> Result<Self> {
        let price = form
            .price
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
            .ok_or_else(|| AppError::Validation("price must be a number".to_string()))?;
        let stock = form
            .stock
            .trim()
            .parse::<i64>()
            .map_err(|_| AppError::Validation("stock must be an integer".to_string()))?;

        Ok(Self {
            name: form.name,
            description: form.description,
            price,
            category: form.category,
            stock,
            image: Some(form.image),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(price: &str, stock: &str, image: &str) -> ProductForm {
        ProductForm {
            name: "Mouse".into(),
            description: "x".into(),
            price: price.into(),
            category: "electronics".into(),
            stock: stock.into(),
            image: image.into(),
        }
    }

    #[test]
    fn malformed_id_is_not_found() {
        assert!(matches!("not-an-id".parse::<ProductId>(), Err(AppError::NotFound)));
        assert!(matches!("12345".parse::<ProductId>(), Err(AppError::NotFound)));
        assert!("000000000000000000000000".parse::<ProductId>().is_ok());
    }

    #[test]
    fn id_serializes_as_hex_string() {
        let id: ProductId = "65a1b2c3d4e5f60718293a4b".parse().unwrap();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::json!("65a1b2c3d4e5f60718293a4b"));
        assert_eq!(id.to_string(), "65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn created_at_comes_from_object_id() {
        // 0x65a1b2c3 = 2024-01-12T21:44:35Z
        let id: ProductId = "65a1b2c3d4e5f60718293a4b".parse().unwrap();
        let created = id.created_at().unwrap();
        assert_eq!(created.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-01-12 21:44:35");
    }

    #[test]
    fn blank_image_gets_placeholder() {
        let input = ProductInput::try_from(form("19.99", "10", "  ")).unwrap();
        let fields = input.into_fields().unwrap();
        assert_eq!(fields.image, PLACEHOLDER_IMAGE);
        assert_eq!(fields.price, 19.99);
        assert_eq!(fields.stock, 10);
    }

    #[test]
    fn explicit_image_is_kept() {
        let input = ProductInput::try_from(form("5", "1", "https://img.example/m.png")).unwrap();
        assert_eq!(input.into_fields().unwrap().image, "https://img.example/m.png");
    }

    #[test]
    fn form_coercion_failures_are_validation_errors() {
        assert!(matches!(
            ProductInput::try_from(form("cheap", "1", "")),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            ProductInput::try_from(form("NaN", "1", "")),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            ProductInput::try_from(form("1.0", "2.5", "")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn invariants_are_enforced() {
        let zero_price = ProductInput::try_from(form("0", "1", "")).unwrap();
        assert!(matches!(zero_price.into_fields(), Err(AppError::Validation(_))));

        let negative_stock = ProductInput::try_from(form("1", "-1", "")).unwrap();
        match negative_stock.into_fields() {
            Err(AppError::Validation(msg)) => assert_eq!(msg, "stock must not be negative"),
            other => panic!("unexpected result: {:?}", other),
        }

        let mut blank_name = ProductInput::try_from(form("1", "1", "")).unwrap();
        blank_name.name = "   ".into();
        assert!(matches!(blank_name.into_fields(), Err(AppError::Validation(_))));
    }
}
