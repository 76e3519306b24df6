//! 导航结果与失败分类
//!
//! 导航的"失败"是带标签的值而不是异常：守卫取消、并发拒绝、
//! 重定向信号、解析失败都走同一通道返回，调用方用
//! [`is_navigation_failure`] 做标签检查。宿主调用被拒绝是唯一
//! 以 `Err` 形态透传的导航期错误。

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use super::record::NormalizedRoute;
use crate::utils::Result;

/// 失败种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationFailureKind {
    /// 守卫拒绝了本次导航（可恢复，调用方可重试）
    Aborted,
    /// 被另一次进行中的导航挤掉（信息性）
    Cancelled,
    /// 重定向信号（引擎内部已跟随，通常不会到达调用方）
    Redirect,
    /// 目标不匹配任何路由记录，或检测到重定向循环
    ResolutionFailed,
}

impl fmt::Display for NavigationFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationFailureKind::Aborted => write!(f, "aborted"),
            NavigationFailureKind::Cancelled => write!(f, "cancelled"),
            NavigationFailureKind::Redirect => write!(f, "redirect"),
            NavigationFailureKind::ResolutionFailed => write!(f, "resolution_failed"),
        }
    }
}

/// 导航失败
#[derive(Debug, Clone, Serialize)]
pub struct NavigationFailure {
    /// 失败种类
    pub kind: NavigationFailureKind,
    /// 目标路由（可得时）
    pub to: Option<NormalizedRoute>,
    /// 来源路由（可得时）
    pub from: Option<NormalizedRoute>,
}

impl NavigationFailure {
    /// 构造失败
    pub fn new(
        kind: NavigationFailureKind,
        to: Option<NormalizedRoute>,
        from: Option<NormalizedRoute>,
    ) -> Self {
        Self { kind, to, from }
    }
}

impl fmt::Display for NavigationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "navigation {}", self.kind)?;
        if let Some(ref to) = self.to {
            write!(f, " to '{}'", to.full_page_path)?;
        }
        Ok(())
    }
}

/// 一次导航的结果
#[derive(Debug, Clone)]
pub enum NavigationResult {
    /// 导航完成，携带宿主调用的返回值
    Completed(Value),
    /// 导航以失败告终（带标签的值，不是错误）
    Failed(NavigationFailure),
}

impl NavigationResult {
    /// 是否完成
    pub fn is_completed(&self) -> bool {
        matches!(self, NavigationResult::Completed(_))
    }

    /// 取失败信息
    pub fn failure(&self) -> Option<&NavigationFailure> {
        match self {
            NavigationResult::Failed(failure) => Some(failure),
            NavigationResult::Completed(_) => None,
        }
    }
}

/// 标签检查：结果是否为指定种类的导航失败
///
/// 重定向与真实失败刻意共用同一通道，调用方应当用本函数
/// 区分种类，而不是检查错误类型。
///
/// # Example
///
/// ```
/// use mina_router::router::failure::{
///     is_navigation_failure, NavigationFailure, NavigationFailureKind, NavigationResult,
/// };
///
/// let result = Ok(NavigationResult::Failed(NavigationFailure::new(
///     NavigationFailureKind::Aborted,
///     None,
///     None,
/// )));
/// assert!(is_navigation_failure(&result, NavigationFailureKind::Aborted));
/// assert!(!is_navigation_failure(&result, NavigationFailureKind::Cancelled));
/// ```
pub fn is_navigation_failure(
    result: &Result<NavigationResult>,
    kind: NavigationFailureKind,
) -> bool {
    matches!(
        result,
        Ok(NavigationResult::Failed(failure)) if failure.kind == kind
    )
}

/// 导航尝试的阶段
///
/// 一次导航是一个短命状态机；阶段变化通过结构化日志可见。
/// `Redirecting` 恰好一次地回到 `Resolving`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationPhase {
    /// 解析目标
    Resolving,
    /// 守卫求值中
    GuardEvaluating,
    /// 跟随重定向
    Redirecting,
    /// 宿主调用中
    HostCalling,
    /// 已完成（终态）
    Completed,
    /// 已中止（终态）
    Aborted,
    /// 已失败（终态）
    Failed,
}

impl fmt::Display for NavigationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NavigationPhase::Resolving => "resolving",
            NavigationPhase::GuardEvaluating => "guard_evaluating",
            NavigationPhase::Redirecting => "redirecting",
            NavigationPhase::HostCalling => "host_calling",
            NavigationPhase::Completed => "completed",
            NavigationPhase::Aborted => "aborted",
            NavigationPhase::Failed => "failed",
        };
        write!(f, "{label}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_display() {
        let failure = NavigationFailure::new(NavigationFailureKind::Aborted, None, None);
        assert_eq!(failure.to_string(), "navigation aborted");
    }

    #[test]
    fn test_is_navigation_failure_on_err_is_false() {
        let result: Result<NavigationResult> =
            Err(crate::utils::RouterError::host("navigateTo", "fail"));
        assert!(!is_navigation_failure(
            &result,
            NavigationFailureKind::Aborted
        ));
    }

    #[test]
    fn test_result_accessors() {
        let completed = NavigationResult::Completed(serde_json::json!({"ok": true}));
        assert!(completed.is_completed());
        assert!(completed.failure().is_none());

        let failed = NavigationResult::Failed(NavigationFailure::new(
            NavigationFailureKind::ResolutionFailed,
            None,
            None,
        ));
        assert!(!failed.is_completed());
        assert_eq!(
            failed.failure().unwrap().kind,
            NavigationFailureKind::ResolutionFailed
        );
    }
}
