//! 基础设施：配置、日志、存储实现

pub mod config;
pub mod database;
pub mod logger;
pub mod memory;
