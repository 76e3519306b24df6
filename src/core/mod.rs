//! 核心配置模块

pub mod config;

pub use config::{load_route_table, AppConfig, LogConfig, TableSource};
