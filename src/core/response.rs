//! 核心响应处理模块

use serde::Serialize;

pub const SERVICE_NAME: &str = "catalogue";

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok",
            service: SERVICE_NAME,
        }
    }
}
