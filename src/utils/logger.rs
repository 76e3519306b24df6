//! 日志系统模块
//!
//! 基于 tracing 生态实现路由引擎的日志功能：
//!
//! - 多级别日志支持（TRACE, DEBUG, INFO, WARN, ERROR）
//! - 结构化日志（JSON 格式输出）
//! - 文件日志输出（异步非阻塞）
//! - 日志轮转（每天、每小时）
//! - 日志过滤（按模块、按级别）
//!
//! # 示例
//!
//! ```rust,no_run
//! use mina_router::utils::logger::{Logger, LoggerConfig, RotationStrategy};
//! use std::path::PathBuf;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LoggerConfig::builder()
//!         .level("debug")
//!         .file_output(PathBuf::from("./logs"))
//!         .rotation(RotationStrategy::Daily)
//!         .build();
//!
//!     let _guard = Logger::init(config)?;
//!
//!     tracing::info!(nav_id = "a1B2c3D4e5", page = "pages/home/index", "navigation started");
//!     Ok(())
//! }
//! ```

use crate::utils::{Result, RouterError};
use std::io;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// 日志轮转策略
// ============================================================================

/// 日志轮转策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationStrategy {
    /// 不轮转（单个日志文件）
    Never,
    /// 每小时轮转
    Hourly,
    /// 每天轮转（默认）
    #[default]
    Daily,
}

impl RotationStrategy {
    /// 转换为 tracing-appender 的 Rotation 类型
    fn to_rotation(self) -> Rotation {
        match self {
            RotationStrategy::Never => Rotation::NEVER,
            RotationStrategy::Hourly => Rotation::HOURLY,
            RotationStrategy::Daily => Rotation::DAILY,
        }
    }

    /// 从字符串解析轮转策略
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "never" | "none" => RotationStrategy::Never,
            "hourly" | "hour" => RotationStrategy::Hourly,
            _ => RotationStrategy::Daily,
        }
    }
}

impl std::fmt::Display for RotationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RotationStrategy::Never => write!(f, "never"),
            RotationStrategy::Hourly => write!(f, "hourly"),
            RotationStrategy::Daily => write!(f, "daily"),
        }
    }
}

// ============================================================================
// 日志配置
// ============================================================================

/// 日志系统配置
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// 默认日志级别（例如 "trace", "debug", "info", "warn", "error"）
    pub level: String,

    /// 是否使用 JSON 格式输出
    pub json_format: bool,

    /// 是否输出到控制台
    pub console_output: bool,

    /// 文件输出目录（None 表示不输出到文件）
    pub file_output: Option<PathBuf>,

    /// 日志文件名前缀
    pub file_prefix: String,

    /// 日志轮转策略
    pub rotation: RotationStrategy,

    /// 是否显示目标模块
    pub show_target: bool,

    /// 是否显示文件名和行号
    pub show_file_line: bool,

    /// 自定义过滤指令（EnvFilter 格式）
    /// 例如："mina_router=debug,mina_router::router=trace"
    pub filter_directives: Option<String>,

    /// 是否启用 ANSI 颜色（控制台输出）
    pub ansi_colors: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            console_output: true,
            file_output: None,
            file_prefix: "mina-router".to_string(),
            rotation: RotationStrategy::Daily,
            show_target: true,
            show_file_line: false,
            filter_directives: None,
            ansi_colors: true,
        }
    }
}

impl LoggerConfig {
    /// 创建配置构建器
    pub fn builder() -> LoggerConfigBuilder {
        LoggerConfigBuilder::new()
    }
}

/// 日志配置构建器
#[derive(Debug, Default)]
pub struct LoggerConfigBuilder {
    config: LoggerConfig,
}

impl LoggerConfigBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
        }
    }

    /// 设置日志级别
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.config.level = level.into();
        self
    }

    /// 启用 JSON 格式输出
    pub fn json_format(mut self, enable: bool) -> Self {
        self.config.json_format = enable;
        self
    }

    /// 设置控制台输出
    pub fn console_output(mut self, enable: bool) -> Self {
        self.config.console_output = enable;
        self
    }

    /// 设置文件输出目录
    pub fn file_output(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.file_output = Some(dir.into());
        self
    }

    /// 设置日志文件前缀
    pub fn file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.file_prefix = prefix.into();
        self
    }

    /// 设置轮转策略
    pub fn rotation(mut self, strategy: RotationStrategy) -> Self {
        self.config.rotation = strategy;
        self
    }

    /// 设置过滤指令
    pub fn filter_directives(mut self, directives: impl Into<String>) -> Self {
        self.config.filter_directives = Some(directives.into());
        self
    }

    /// 启用 ANSI 颜色
    pub fn ansi_colors(mut self, enable: bool) -> Self {
        self.config.ansi_colors = enable;
        self
    }

    /// 构建配置
    pub fn build(self) -> LoggerConfig {
        self.config
    }
}

// ============================================================================
// 日志守卫
// ============================================================================

/// 日志系统守卫
///
/// 持有非阻塞写入器的 WorkerGuard，确保在程序退出前完成日志写入。
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

impl LogGuard {
    fn empty() -> Self {
        Self { _file_guard: None }
    }

    fn with_file_guard(guard: WorkerGuard) -> Self {
        Self {
            _file_guard: Some(guard),
        }
    }
}

// ============================================================================
// 日志系统
// ============================================================================

/// 全局日志初始化状态
static LOGGER_INITIALIZED: OnceLock<bool> = OnceLock::new();

/// 日志系统
///
/// 提供日志系统的初始化功能
pub struct Logger;

impl Logger {
    /// 初始化日志系统
    ///
    /// # Errors
    ///
    /// 如果日志系统已初始化，返回错误
    pub fn init(config: LoggerConfig) -> Result<LogGuard> {
        if LOGGER_INITIALIZED.get().is_some() {
            return Err(RouterError::InitFailed(
                "日志系统已初始化，不能重复初始化".to_string(),
            ));
        }

        let env_filter = Self::create_env_filter(&config);

        let (file_writer, file_guard) = match config.file_output {
            Some(ref dir) => {
                let appender = RollingFileAppender::new(
                    config.rotation.to_rotation(),
                    dir,
                    &config.file_prefix,
                );
                let (writer, guard) = tracing_appender::non_blocking(appender);
                (Some(writer), Some(guard))
            }
            None => (None, None),
        };

        let file_layer = file_writer.map(|writer| {
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(config.show_target)
        });

        let console_pretty = (config.console_output && !config.json_format).then(|| {
            fmt::layer()
                .with_writer(io::stdout)
                .with_ansi(config.ansi_colors)
                .with_target(config.show_target)
                .with_file(config.show_file_line)
                .with_line_number(config.show_file_line)
        });

        let console_json = (config.console_output && config.json_format).then(|| {
            fmt::layer()
                .json()
                .with_writer(io::stdout)
                .with_target(config.show_target)
        });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(console_pretty)
            .with(console_json)
            .try_init()
            .map_err(|e| RouterError::InitFailed(e.to_string()))?;

        let _ = LOGGER_INITIALIZED.set(true);

        Ok(match file_guard {
            Some(guard) => LogGuard::with_file_guard(guard),
            None => LogGuard::empty(),
        })
    }

    /// 尝试初始化日志系统（不会失败）
    ///
    /// 如果日志系统已初始化，返回空守卫而不是错误。适用于测试场景。
    pub fn try_init(config: LoggerConfig) -> LogGuard {
        Self::init(config).unwrap_or_else(|_| LogGuard::empty())
    }

    /// 使用默认配置初始化日志系统
    pub fn init_default() -> Result<LogGuard> {
        Self::init(LoggerConfig::default())
    }

    /// 创建 EnvFilter
    ///
    /// 优先使用环境变量 RUST_LOG，其次使用配置中的级别与过滤指令。
    fn create_env_filter(config: &LoggerConfig) -> EnvFilter {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

        match config.filter_directives {
            Some(ref directives) => directives.split(',').fold(filter, |f, directive| {
                match directive.trim().parse() {
                    Ok(d) => f.add_directive(d),
                    Err(_) => f,
                }
            }),
            None => filter,
        }
    }
}

/// 常用结构化日志字段名
pub mod fields {
    /// 导航尝试 ID
    pub const NAV_ID: &str = "nav_id";
    /// 目标页面路径
    pub const PAGE: &str = "page";
    /// 路由名称
    pub const ROUTE_NAME: &str = "route_name";
    /// 导航意图（push/replace/switch_tab/re_launch）
    pub const INTENT: &str = "intent";
}
