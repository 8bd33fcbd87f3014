//! 日志基础设施

use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "info";

pub struct Logger;

impl Logger {
    /// 以 RUST_LOG 为准，未设置时使用 info
    pub fn init() {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        // 重复初始化（例如测试中）时忽略
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }
}
