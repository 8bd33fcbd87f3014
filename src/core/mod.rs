//! 核心模块：错误、中间件、通用响应

pub mod error;
pub mod middleware;
pub mod response;

pub use error::{AppError, Result};
