//! 路由引擎错误类型定义
//!
//! 本模块定义路由引擎中使用的所有错误类型。导航流程内部的
//! "失败"（守卫取消、重定向等）不是错误，见 `router::failure`。

use thiserror::Error;

/// 路由引擎核心错误类型
#[derive(Error, Debug)]
pub enum RouterError {
    // ==================== 路由表错误 ====================

    /// 路由表无效
    #[error("路由表无效: {0}")]
    InvalidTable(String),

    /// 路由名称重复
    #[error("路由名称重复: '{0}'")]
    DuplicateRouteName(String),

    /// 页面路径格式无效
    #[error("页面路径格式无效: '{0}'")]
    InvalidPagePath(String),

    /// 路由记录缺少页面路径
    #[error("路由记录缺少页面路径: '{0}'")]
    MissingPage(String),

    // ==================== 宿主调用错误 ====================

    /// 宿主导航调用被拒绝
    ///
    /// 宿主返回的失败原样向调用方透传，引擎不做重试。
    #[error("宿主调用失败: {method} - {message}")]
    Host {
        method: String,
        message: String,
    },

    // ==================== 配置错误 ====================

    /// 配置加载失败
    #[error("配置加载失败: {0}")]
    ConfigLoadFailed(String),

    /// 配置值无效
    #[error("配置值无效: '{key}' - {reason}")]
    InvalidConfigValue {
        key: String,
        reason: String,
    },

    // ==================== IO 和序列化错误 ====================

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 序列化/反序列化错误
    #[error("JSON 错误: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML 序列化/反序列化错误
    #[error("YAML 错误: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ==================== 通用错误 ====================

    /// 初始化失败
    #[error("初始化失败: {0}")]
    InitFailed(String),

    /// 其他错误
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// 路由引擎操作结果类型别名
pub type Result<T> = std::result::Result<T, RouterError>;

impl RouterError {
    /// 构造宿主调用错误
    pub fn host(method: impl Into<String>, message: impl Into<String>) -> Self {
        RouterError::Host {
            method: method.into(),
            message: message.into(),
        }
    }

    /// 是否为宿主调用错误
    pub fn is_host(&self) -> bool {
        matches!(self, RouterError::Host { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RouterError::DuplicateRouteName("detail".to_string());
        assert!(err.to_string().contains("detail"));
    }

    #[test]
    fn test_host_error() {
        let err = RouterError::host("navigateTo", "fail can not navigate");
        assert!(err.is_host());
        assert!(err.to_string().contains("navigateTo"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RouterError = io_err.into();
        assert!(matches!(err, RouterError::Io(_)));
    }
}
