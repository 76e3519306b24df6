//! 导航守卫管线
//!
//! 两个独立的有序注册表：导航前守卫（beforeEach）与导航后钩子
//! （afterEach）。注册返回退订句柄；退订可重复调用，守卫在执行
//! 中途退订自身也不影响同一轮其余守卫（执行基于注册表快照）。
//!
//! 守卫统一归一为异步可调用，产出三种结论之一：放行、取消、
//! 重定向。按注册顺序严格串行求值，第一个非放行结论短路本次
//! 导航剩余守卫。afterEach 钩子仅在宿主调用完成后按注册顺序
//! 执行，彼此不短路。

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};

use super::record::{NormalizedRoute, RouteLocation};

/// 守卫结论
#[derive(Debug, Clone)]
pub enum GuardOutcome {
    /// 放行，继续执行后续守卫
    Allow,
    /// 取消本次导航
    Cancel,
    /// 重定向到新目标
    Redirect(RouteLocation),
}

/// 导航守卫
///
/// 在路由变化完成前调用，可放行、取消或重定向进行中的导航。
/// 同步闭包经由毯式实现自动归一为异步守卫：
///
/// ```
/// use mina_router::router::guard::{GuardOutcome, NavigationGuard};
/// use mina_router::router::record::NormalizedRoute;
///
/// fn accepts_guard(_g: impl NavigationGuard) {}
///
/// accepts_guard(|to: &NormalizedRoute, _from: &NormalizedRoute| {
///     if to.meta.is_tab {
///         GuardOutcome::Allow
///     } else {
///         GuardOutcome::Cancel
///     }
/// });
/// ```
///
/// 注意：守卫没有超时约束，一个永不返回的守卫会无限期挂起
/// 本次导航。
#[async_trait]
pub trait NavigationGuard: Send + Sync {
    /// 求值守卫
    async fn check(&self, to: &NormalizedRoute, from: &NormalizedRoute) -> GuardOutcome;
}

#[async_trait]
impl<F> NavigationGuard for F
where
    F: Fn(&NormalizedRoute, &NormalizedRoute) -> GuardOutcome + Send + Sync,
{
    async fn check(&self, to: &NormalizedRoute, from: &NormalizedRoute) -> GuardOutcome {
        self(to, from)
    }
}

/// 导航后钩子
pub type AfterEachHook = dyn Fn(&NormalizedRoute, &NormalizedRoute) + Send + Sync;

// ============================================================================
// 回调注册表
// ============================================================================

/// 有序回调注册表
///
/// 迭代基于快照，注册/退订不影响进行中的一轮执行。
struct CallbackRegistry<T: Clone> {
    slots: Arc<RwLock<Vec<(u64, T)>>>,
    next_id: AtomicU64,
}

impl<T: Clone> CallbackRegistry<T> {
    fn new() -> Self {
        Self {
            slots: Arc::new(RwLock::new(Vec::new())),
            next_id: AtomicU64::new(0),
        }
    }

    fn add(&self, callback: T) -> GuardHandle<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.slots
            .write()
            .expect("callback registry poisoned")
            .push((id, callback));
        GuardHandle {
            id,
            slots: Arc::downgrade(&self.slots),
        }
    }

    fn list(&self) -> Vec<T> {
        self.slots
            .read()
            .expect("callback registry poisoned")
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect()
    }

    fn len(&self) -> usize {
        self.slots.read().expect("callback registry poisoned").len()
    }
}

/// 退订句柄
///
/// 重复调用 [`unsubscribe`](GuardHandle::unsubscribe) 是安全的空操作。
pub struct GuardHandle<T> {
    id: u64,
    slots: Weak<RwLock<Vec<(u64, T)>>>,
}

impl<T> GuardHandle<T> {
    /// 退订对应的守卫/钩子
    pub fn unsubscribe(&self) {
        if let Some(slots) = self.slots.upgrade() {
            slots
                .write()
                .expect("callback registry poisoned")
                .retain(|(id, _)| *id != self.id);
        }
    }
}

/// beforeEach 守卫退订句柄
pub type BeforeHandle = GuardHandle<Arc<dyn NavigationGuard>>;

/// afterEach 钩子退订句柄
pub type AfterHandle = GuardHandle<Arc<AfterEachHook>>;

// ============================================================================
// 守卫管线
// ============================================================================

/// 导航守卫管线
pub struct GuardPipeline {
    before: CallbackRegistry<Arc<dyn NavigationGuard>>,
    after: CallbackRegistry<Arc<AfterEachHook>>,
}

impl GuardPipeline {
    /// 创建空管线
    pub fn new() -> Self {
        Self {
            before: CallbackRegistry::new(),
            after: CallbackRegistry::new(),
        }
    }

    /// 注册导航前守卫
    pub fn add_before(&self, guard: Arc<dyn NavigationGuard>) -> BeforeHandle {
        self.before.add(guard)
    }

    /// 注册导航后钩子
    pub fn add_after(&self, hook: Arc<AfterEachHook>) -> AfterHandle {
        self.after.add(hook)
    }

    /// 按注册顺序串行求值导航前守卫
    ///
    /// 第一个非放行结论立即返回，剩余守卫不再执行。
    pub async fn run_before(&self, to: &NormalizedRoute, from: &NormalizedRoute) -> GuardOutcome {
        for guard in self.before.list() {
            match guard.check(to, from).await {
                GuardOutcome::Allow => continue,
                outcome => return outcome,
            }
        }
        GuardOutcome::Allow
    }

    /// 按注册顺序执行导航后钩子
    pub fn run_after(&self, to: &NormalizedRoute, from: &NormalizedRoute) {
        for hook in self.after.list() {
            hook(to, from);
        }
    }

    /// 当前注册的导航前守卫数量
    pub fn before_count(&self) -> usize {
        self.before.len()
    }
}

impl Default for GuardPipeline {
    fn default() -> Self {
        Self::new()
    }
}
