//! 工具模块
//!
//! 包含错误类型、导航 ID 生成、日志系统等通用工具。

pub mod error;
pub mod id;
pub mod logger;

// 重导出常用类型
pub use error::{Result, RouterError};
pub use id::{generate_id, is_valid_id};
pub use logger::{fields, LogGuard, Logger, LoggerConfig, LoggerConfigBuilder, RotationStrategy};
