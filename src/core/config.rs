//! 引擎配置
//!
//! 路由表是上游构建管线产出的静态工件（JSON 或 YAML），本模块
//! 负责加载它，并承载日志等运行配置。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::router::record::RouteTable;
use crate::utils::logger::{LoggerConfig, RotationStrategy};
use crate::utils::{Result, RouterError};

/// 路由表来源
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableSource {
    /// 内联在配置文件中的路由表
    Inline(RouteTable),
    /// 指向独立路由表工件的路径
    Path(PathBuf),
}

impl Default for TableSource {
    fn default() -> Self {
        TableSource::Inline(Vec::new())
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否输出到文件
    #[serde(default)]
    pub file_output: bool,

    /// 日志文件目录
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// 是否输出 JSON 格式
    #[serde(default)]
    pub json_format: bool,

    /// 日志轮转策略
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_output: false,
            log_dir: None,
            json_format: false,
            rotation: default_rotation(),
        }
    }
}

impl LogConfig {
    /// 转换为日志系统配置
    pub fn to_logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            level: self.level.clone(),
            json_format: self.json_format,
            file_output: if self.file_output {
                self.log_dir.clone()
            } else {
                None
            },
            rotation: RotationStrategy::parse(&self.rotation),
            ..Default::default()
        }
    }
}

/// 引擎配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 路由表来源
    #[serde(default)]
    pub table: TableSource,

    /// 日志配置
    #[serde(default)]
    pub logging: LogConfig,
}

impl AppConfig {
    /// 从文件加载配置（按扩展名区分 YAML/JSON）
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            RouterError::ConfigLoadFailed(format!("{}: {e}", path.display()))
        })?;

        match extension(path) {
            "json" => Ok(serde_json::from_str(&text)?),
            _ => Ok(serde_yaml::from_str(&text)?),
        }
    }

    /// 解析出路由表
    ///
    /// 内联来源直接返回；路径来源再做一次工件加载。
    pub fn resolve_table(&self, base: impl AsRef<Path>) -> Result<RouteTable> {
        match &self.table {
            TableSource::Inline(table) => Ok(table.clone()),
            TableSource::Path(path) => {
                let resolved = if path.is_absolute() {
                    path.clone()
                } else {
                    base.as_ref().join(path)
                };
                load_route_table(resolved)
            }
        }
    }
}

/// 从工件文件加载路由表（按扩展名区分 YAML/JSON）
pub fn load_route_table(path: impl AsRef<Path>) -> Result<RouteTable> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| RouterError::ConfigLoadFailed(format!("{}: {e}", path.display())))?;

    match extension(path) {
        "json" => Ok(serde_json::from_str(&text)?),
        _ => Ok(serde_yaml::from_str(&text)?),
    }
}

fn extension(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or("yaml")
}
