//! 运行配置：环境变量（可选 .env）

use std::{env, fmt, path::PathBuf, str::FromStr};

use tracing::info;

use crate::core::error::{AppError, Result};

pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017/catalogue";
pub const DEFAULT_BASE_PATH: &str = "/catalogue";

/// 存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(Self::Mongo),
            "memory" => Ok(Self::Memory),
            other => Err(AppError::Config(format!(
                "Invalid CATALOGUE_STORE '{}', expected 'mongo' or 'memory'",
                other
            ))),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mongo => write!(f, "mongo"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mongodb_uri: String,
    /// 规范化后的挂载路径，根路径为空串
    pub base_path: String,
    pub host: String,
    pub port: u16,
    pub store: StoreBackend,
    pub static_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = get("PORT", "8000")
            .parse::<u16>()
            .map_err(|e| AppError::Config(format!("Invalid PORT: {}", e)))?;
        let store = get("CATALOGUE_STORE", "mongo").parse()?;

        let config = Self {
            mongodb_uri: get("MONGODB_URI", DEFAULT_MONGODB_URI),
            base_path: normalize_base_path(&get("BASE_PATH", DEFAULT_BASE_PATH)),
            host: get("HOST", "0.0.0.0"),
            port,
            store,
            static_dir: PathBuf::from(get("STATIC_DIR", "static")),
        };

        info!(
            "Configuration loaded: store={}, uri={}, base_path='{}', bind={}",
            config.store,
            mask_credentials(&config.mongodb_uri),
            config.base_path,
            config.bind_address()
        );

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 保证以 `/` 开头、不以 `/` 结尾；根路径返回空串
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

/// 日志中隐藏连接串里的密码
pub fn mask_credentials(uri: &str) -> String {
    let Some(scheme_end) = uri.find("://") else {
        return uri.to_string();
    };
    let rest = &uri[scheme_end + 3..];
    let Some(at) = rest.find('@') else {
        return uri.to_string();
    };
    let userinfo = &rest[..at];
    match userinfo.find(':') {
        Some(colon) => format!(
            "{}{}:***{}",
            &uri[..scheme_end + 3],
            &userinfo[..colon],
            &rest[at..]
        ),
        None => uri.to_string(),
    }
}
