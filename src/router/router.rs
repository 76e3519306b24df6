//! 路由器主结构体
//!
//! 组合匹配器、守卫管线与历史栈适配器，实现完整的导航编排：
//! 解析目标 → 决策导航意图 → 栈复用扫描 → 守卫求值 →
//! 宿主调用 → 导航后钩子。

use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use super::failure::{
    NavigationFailure, NavigationFailureKind, NavigationPhase, NavigationResult,
};
use super::guard::{AfterHandle, BeforeHandle, GuardOutcome, GuardPipeline, NavigationGuard};
use super::matcher::RouteMatcher;
use super::query::parse_query_obj;
use super::record::{HistorySnapshot, NormalizedRoute, RouteLocation, RouteRecord, RouteTable};
use crate::history::HistoryAdapter;
use crate::utils::{generate_id, Result};

/// 导航意图
///
/// 决策优先级：显式 reLaunch > tab 页 > 显式 replace 或栈满 > push。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationIntent {
    /// 压栈
    Push,
    /// 换顶
    Replace,
    /// 切换 tab
    SwitchTab,
    /// 重启到目标页
    ReLaunch,
}

impl std::fmt::Display for NavigationIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            NavigationIntent::Push => "push",
            NavigationIntent::Replace => "replace",
            NavigationIntent::SwitchTab => "switch_tab",
            NavigationIntent::ReLaunch => "re_launch",
        };
        write!(f, "{label}")
    }
}

// ============================================================================
// 导航统计
// ============================================================================

/// 导航统计信息
#[derive(Debug, Default)]
pub struct NavigationStats {
    /// 总导航次数
    total: AtomicU64,
    /// 完成次数
    completed: AtomicU64,
    /// 守卫中止次数
    aborted: AtomicU64,
    /// 并发拒绝次数
    cancelled: AtomicU64,
    /// 重定向次数
    redirected: AtomicU64,
    /// 栈复用回退次数
    reused: AtomicU64,
    /// 失败次数（解析失败 + 宿主拒绝）
    failed: AtomicU64,
}

impl NavigationStats {
    fn record_total(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    fn record_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    fn record_aborted(&self) {
        self.aborted.fetch_add(1, Ordering::Relaxed);
    }

    fn record_cancelled(&self) {
        self.cancelled.fetch_add(1, Ordering::Relaxed);
    }

    fn record_redirected(&self) {
        self.redirected.fetch_add(1, Ordering::Relaxed);
    }

    fn record_reused(&self) {
        self.reused.fetch_add(1, Ordering::Relaxed);
    }

    fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// 获取统计快照
    pub fn snapshot(&self) -> NavigationStatsSnapshot {
        NavigationStatsSnapshot {
            total: self.total.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            aborted: self.aborted.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            redirected: self.redirected.load(Ordering::Relaxed),
            reused: self.reused.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }

    /// 重置统计
    pub fn reset(&self) {
        self.total.store(0, Ordering::Relaxed);
        self.completed.store(0, Ordering::Relaxed);
        self.aborted.store(0, Ordering::Relaxed);
        self.cancelled.store(0, Ordering::Relaxed);
        self.redirected.store(0, Ordering::Relaxed);
        self.reused.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
    }
}

/// 导航统计快照
#[derive(Debug, Clone, Serialize)]
pub struct NavigationStatsSnapshot {
    /// 总导航次数
    pub total: u64,
    /// 完成次数
    pub completed: u64,
    /// 守卫中止次数
    pub aborted: u64,
    /// 并发拒绝次数
    pub cancelled: u64,
    /// 重定向次数
    pub redirected: u64,
    /// 栈复用回退次数
    pub reused: u64,
    /// 失败次数
    pub failed: u64,
}

// ============================================================================
// 路由器
// ============================================================================

/// 路由器
///
/// 导航编排的核心组件，负责：
/// - 解析导航目标为规范化路由
/// - 运行导航守卫管线（取消/重定向语义）
/// - 决策并调用宿主导航原语
/// - 栈复用优化（目标页已在栈中时回退复用）
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use mina_router::history::MemoryHistory;
/// use mina_router::router::record::{RouteLocation, RouteRecord};
/// use mina_router::router::Router;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let table = vec![
///     RouteRecord::new("home", "/", "pages/home/index"),
///     RouteRecord::new("detail", "/detail", "pages/detail/index"),
/// ];
/// let router = Router::new(table, Arc::new(MemoryHistory::new()))?;
///
/// let result = router
///     .push(RouteLocation::named("detail").with_param("id", "42"))
///     .await?;
/// assert!(result.is_completed());
/// assert_eq!(router.current_route().full_page_path, "pages/detail/index?id=42");
/// # Ok(())
/// # }
/// ```
pub struct Router {
    /// 路由匹配器（构建后只读）
    matcher: RouteMatcher,
    /// 历史栈适配器
    history: Arc<dyn HistoryAdapter>,
    /// 守卫管线
    pipeline: GuardPipeline,
    /// 在途导航门闩：同一时刻最多一次导航在途
    gate: Arc<Semaphore>,
    /// 统计信息
    stats: Arc<NavigationStats>,
}

impl Router {
    /// 由路由表与历史栈适配器创建路由器
    ///
    /// # Errors
    ///
    /// 路由表无效（重名、页面路径非法等）时返回错误。
    pub fn new(table: RouteTable, history: Arc<dyn HistoryAdapter>) -> Result<Self> {
        let matcher = RouteMatcher::new(table)?;
        info!(
            record_count = matcher.records().len(),
            max_stack_length = history.max_stack_length(),
            "router created"
        );

        Ok(Self {
            matcher,
            history,
            pipeline: GuardPipeline::new(),
            gate: Arc::new(Semaphore::new(1)),
            stats: Arc::new(NavigationStats::default()),
        })
    }

    // ------------------------------------------------------------------------
    // 公开导航接口
    // ------------------------------------------------------------------------

    /// 压栈方式导航到目标
    pub async fn push(&self, to: impl Into<RouteLocation>) -> Result<NavigationResult> {
        self.navigate(to.into()).await
    }

    /// 换顶方式导航到目标
    pub async fn replace(&self, to: impl Into<RouteLocation>) -> Result<NavigationResult> {
        let mut to = to.into();
        to.replace = true;
        self.navigate(to).await
    }

    /// 回退一个页面（等价于 `go(1)`）
    pub async fn back(&self) -> Result<Value> {
        self.go(1).await
    }

    /// 回退 delta 个页面
    pub async fn go(&self, delta: i64) -> Result<Value> {
        self.history.go(delta).await
    }

    /// 注册导航前守卫，返回退订句柄
    pub fn before_each(&self, guard: impl NavigationGuard + 'static) -> BeforeHandle {
        self.pipeline.add_before(Arc::new(guard))
    }

    /// 注册导航后钩子，返回退订句柄
    pub fn after_each(
        &self,
        hook: impl Fn(&NormalizedRoute, &NormalizedRoute) + Send + Sync + 'static,
    ) -> AfterHandle {
        self.pipeline.add_after(Arc::new(hook))
    }

    /// 宿主当前页面的规范化路由
    ///
    /// 宿主停在路由表不认识的页面时返回规范空路由，不报错。
    pub fn current_route(&self) -> NormalizedRoute {
        let snapshot = self.history.current_route();
        self.normalize_by_page(&snapshot)
    }

    /// 全部路由记录（扁平化，保持表内顺序）
    pub fn routes(&self) -> Vec<Arc<RouteRecord>> {
        self.matcher.records().to_vec()
    }

    /// 是否存在指定名称的路由
    pub fn has_route(&self, name: &str) -> bool {
        self.matcher.has_route(name)
    }

    /// 获取统计快照
    pub fn stats(&self) -> NavigationStatsSnapshot {
        self.stats.snapshot()
    }

    /// 重置统计信息
    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    // ------------------------------------------------------------------------
    // 导航编排
    // ------------------------------------------------------------------------

    /// 执行一次导航
    ///
    /// 同一路由器上并发到达的第二次导航不会排队：在途门闩占用时
    /// 直接以 `Cancelled` 失败返回，避免与栈复用扫描竞争。
    #[instrument(level = "debug", skip(self, to))]
    pub async fn navigate(&self, to: RouteLocation) -> Result<NavigationResult> {
        let nav_id = generate_id();
        self.stats.record_total();

        let permit = match Arc::clone(&self.gate).try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                warn!(nav_id, "navigation rejected, another one is in flight");
                self.stats.record_cancelled();
                let from = self.current_route();
                return Ok(NavigationResult::Failed(NavigationFailure::new(
                    NavigationFailureKind::Cancelled,
                    None,
                    Some(from),
                )));
            }
        };

        let result = self.navigate_inner(&nav_id, to, false).await;
        drop(permit);
        result
    }

    /// 导航主流程（重定向时恰好重入一次）
    fn navigate_inner<'a>(
        &'a self,
        nav_id: &'a str,
        to: RouteLocation,
        redirecting: bool,
    ) -> Pin<Box<dyn Future<Output = Result<NavigationResult>> + Send + 'a>> {
        Box::pin(async move {
            let started = Instant::now();
            debug!(nav_id, phase = %NavigationPhase::Resolving, "resolving navigation target");

            let resolved = self.matcher.resolve(&to);
            let from_route = self.current_route();

            // 未解析的目标绝不转发给宿主
            let Some(record) = resolved.record else {
                warn!(
                    nav_id,
                    phase = %NavigationPhase::Failed,
                    target = ?to.target,
                    "target did not match any route record"
                );
                self.stats.record_failed();
                return Ok(NavigationResult::Failed(NavigationFailure::new(
                    NavigationFailureKind::ResolutionFailed,
                    None,
                    Some(from_route),
                )));
            };
            let to_route = NormalizedRoute::normalize(&record, resolved.params);

            // 意图决策：reLaunch > tab > replace/栈满 > push
            let intent = if to.re_launch {
                NavigationIntent::ReLaunch
            } else if to_route.meta.is_tab {
                NavigationIntent::SwitchTab
            } else if to.replace
                || self.history.pages_length() >= self.history.max_stack_length()
            {
                NavigationIntent::Replace
            } else {
                NavigationIntent::Push
            };

            // 栈复用：目标页与当前页相同时不查栈
            if to_route.full_page_path != from_route.full_page_path {
                if let Some(delta) = self.find_page_in_stack(&to_route.full_page_path) {
                    debug!(
                        nav_id,
                        delta,
                        page = %to_route.page,
                        "target already in stack, going back instead"
                    );
                    let value = self.history.go(delta).await?;
                    self.stats.record_reused();
                    return Ok(NavigationResult::Completed(value));
                }
            }

            // 守卫管线：注册顺序串行求值，首个非放行结论短路
            debug!(
                nav_id,
                phase = %NavigationPhase::GuardEvaluating,
                guard_count = self.pipeline.before_count(),
                "running before guards"
            );
            match self.pipeline.run_before(&to_route, &from_route).await {
                GuardOutcome::Allow => {}
                GuardOutcome::Cancel => {
                    info!(
                        nav_id,
                        phase = %NavigationPhase::Aborted,
                        page = %to_route.page,
                        "navigation aborted by guard"
                    );
                    self.stats.record_aborted();
                    return Ok(NavigationResult::Failed(NavigationFailure::new(
                        NavigationFailureKind::Aborted,
                        Some(to_route),
                        Some(from_route),
                    )));
                }
                GuardOutcome::Redirect(next) => {
                    let signal = NavigationFailure::new(
                        NavigationFailureKind::Redirect,
                        Some(to_route.clone()),
                        Some(from_route.clone()),
                    );
                    if redirecting {
                        // 重定向链中再次重定向：终止而不是继续递归
                        warn!(
                            nav_id,
                            phase = %NavigationPhase::Failed,
                            signal = %signal,
                            "nested redirect detected, giving up"
                        );
                        self.stats.record_failed();
                        return Ok(NavigationResult::Failed(NavigationFailure::new(
                            NavigationFailureKind::ResolutionFailed,
                            Some(to_route),
                            Some(from_route),
                        )));
                    }

                    debug!(
                        nav_id,
                        phase = %NavigationPhase::Redirecting,
                        signal = %signal,
                        "following guard redirect"
                    );
                    self.stats.record_redirected();
                    return self.navigate_inner(nav_id, next, true).await;
                }
            }

            // 宿主调用：宿主拒绝原样透传给调用方
            let path = format!("/{}", to_route.full_page_path);
            debug!(
                nav_id,
                phase = %NavigationPhase::HostCalling,
                intent = %intent,
                path = %path,
                "invoking host primitive"
            );
            let host_call = match intent {
                NavigationIntent::Push => self.history.push(&path, to.events.clone()).await,
                NavigationIntent::Replace => self.history.replace(&path).await,
                NavigationIntent::SwitchTab => self.history.switch_tab(&path).await,
                NavigationIntent::ReLaunch => self.history.re_launch(&path).await,
            };
            let value = match host_call {
                Ok(value) => value,
                Err(err) => {
                    warn!(
                        nav_id,
                        phase = %NavigationPhase::Failed,
                        error = %err,
                        "host call rejected"
                    );
                    self.stats.record_failed();
                    return Err(err);
                }
            };

            // 导航后钩子：仅在宿主调用完成后、按注册顺序执行
            self.pipeline.run_after(&to_route, &from_route);
            self.stats.record_completed();
            info!(
                nav_id,
                phase = %NavigationPhase::Completed,
                page = %to_route.page,
                intent = %intent,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "navigation completed"
            );

            Ok(NavigationResult::Completed(value))
        })
    }

    /// 在宿主页面栈（最旧 → 最新）中查找目标页
    ///
    /// 命中时返回回退步数；命中栈顶（步数 0）视为未命中。
    fn find_page_in_stack(&self, full_page_path: &str) -> Option<i64> {
        let routes = self.history.routes();
        let len = routes.len();

        for (index, snapshot) in routes.iter().enumerate() {
            let normalized = self.normalize_by_page(snapshot);
            if normalized.full_page_path == full_page_path {
                let delta = (len - index - 1) as i64;
                return (delta >= 1).then_some(delta);
            }
        }
        None
    }

    /// 把宿主栈条目反向解析为规范化路由
    ///
    /// 原始参数经 `parse_query_obj` 还原；页面不在路由表中时
    /// 返回规范空路由。
    fn normalize_by_page(&self, snapshot: &HistorySnapshot) -> NormalizedRoute {
        let params = parse_query_obj(&snapshot.params);
        match self.matcher.record_by_page(&snapshot.route) {
            Some(record) => NormalizedRoute::normalize(record, params),
            None => NormalizedRoute::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryHistory;
    use crate::router::failure::is_navigation_failure;

    fn sample_table() -> RouteTable {
        vec![
            RouteRecord::new("home", "/", "pages/home/index"),
            RouteRecord::new("detail", "/detail", "pages/detail/index"),
        ]
    }

    #[tokio::test]
    async fn test_push_by_name() {
        let history = Arc::new(MemoryHistory::with_entry("/pages/home/index"));
        let router = Router::new(sample_table(), history).unwrap();

        let result = router
            .push(RouteLocation::named("detail").with_param("id", "42"))
            .await
            .unwrap();

        assert!(result.is_completed());
        let current = router.current_route();
        assert_eq!(current.name, "detail");
        assert_eq!(current.full_page_path, "pages/detail/index?id=42");
    }

    #[tokio::test]
    async fn test_unresolved_target_fails_without_host_call() {
        let history = Arc::new(MemoryHistory::with_entry("/pages/home/index"));
        let router = Router::new(sample_table(), Arc::clone(&history) as _).unwrap();

        let result = router.push("/pages/unknown/index").await;
        assert!(is_navigation_failure(
            &result,
            NavigationFailureKind::ResolutionFailed
        ));
        assert_eq!(history.pages_length(), 1);
    }

    #[tokio::test]
    async fn test_current_route_unknown_page_is_empty() {
        let history = Arc::new(MemoryHistory::with_entry("/pages/raw-entry/index"));
        let router = Router::new(sample_table(), history).unwrap();

        let current = router.current_route();
        assert!(current.is_empty());
        assert_eq!(current.full_page_path, "");
    }

    #[tokio::test]
    async fn test_has_route_and_routes() {
        let history = Arc::new(MemoryHistory::new());
        let router = Router::new(sample_table(), history).unwrap();

        assert!(router.has_route("home"));
        assert!(!router.has_route("missing"));
        assert_eq!(router.routes().len(), 2);
    }

    #[tokio::test]
    async fn test_stats_record_flow() {
        let history = Arc::new(MemoryHistory::with_entry("/pages/home/index"));
        let router = Router::new(sample_table(), history).unwrap();

        router.push(RouteLocation::named("detail")).await.unwrap();
        router.push("/pages/unknown/index").await.unwrap();

        let stats = router.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.failed, 1);

        router.reset_stats();
        assert_eq!(router.stats().total, 0);
    }
}
