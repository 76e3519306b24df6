//! 历史栈适配层
//!
//! 页面栈由宿主持有，引擎只通过本层定义的能力集观察与操作它。
//! 每个宿主族实现一份 [`HistoryAdapter`]；路由器只面向该接口，
//! 从不区分宿主身份。新增宿主族 = 新增一份能力集实现。
//!
//! - [`wechat::WechatHistory`] — `wx.*` 宿主族
//! - [`alipay::AlipayHistory`] — `my.*` 宿主族
//! - [`memory::MemoryHistory`] — 进程内页面栈（脱离宿主的测试/演练）

pub mod alipay;
pub mod memory;
pub mod pages;
pub mod wechat;

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::router::record::HistorySnapshot;
use crate::utils::Result;

pub use alipay::AlipayHistory;
pub use memory::MemoryHistory;
pub use pages::PageRegistry;
pub use wechat::WechatHistory;

/// 宿主页面栈深度上限的默认值
pub const DEFAULT_MAX_STACK_LENGTH: usize = 10;

/// 页面间事件回调表
///
/// push 导航时随宿主调用下发，供目标页面回传数据。
#[derive(Clone, Default)]
pub struct TransitionEvents {
    callbacks: HashMap<String, Arc<dyn Fn(Value) + Send + Sync>>,
}

impl TransitionEvents {
    /// 创建空事件表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册事件回调
    pub fn on(
        mut self,
        name: impl Into<String>,
        callback: impl Fn(Value) + Send + Sync + 'static,
    ) -> Self {
        self.callbacks.insert(name.into(), Arc::new(callback));
        self
    }

    /// 触发事件回调
    pub fn emit(&self, name: &str, payload: Value) {
        if let Some(callback) = self.callbacks.get(name) {
            callback(payload);
        }
    }

    /// 已注册的事件名
    pub fn names(&self) -> Vec<&str> {
        self.callbacks.keys().map(String::as_str).collect()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl fmt::Debug for TransitionEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionEvents")
            .field("names", &self.names())
            .finish()
    }
}

/// 宿主页面信息
///
/// 宿主原生 API 对栈内单个页面的描述。
#[derive(Debug, Clone, Default)]
pub struct HostPage {
    /// 页面路径（不带前导 `/`）
    pub route: String,
    /// 页面加载时携带的原始参数（微信族在栈条目上暴露，支付宝族不暴露）
    pub options: BTreeMap<String, String>,
}

/// 宿主原生导航能力
///
/// 对应平台全局对象上的导航动词。真实绑定在宿主胶水层实现；
/// 本 crate 面向该接口编写两个宿主族的适配器。
#[async_trait]
pub trait HostApi: Send + Sync {
    /// 压入新页面
    async fn navigate_to(&self, url: &str, events: Option<TransitionEvents>) -> Result<Value>;

    /// 替换当前页面
    async fn redirect_to(&self, url: &str) -> Result<Value>;

    /// 切换到 tab 页
    async fn switch_tab(&self, url: &str) -> Result<Value>;

    /// 关闭所有页面后打开目标页
    async fn re_launch(&self, url: &str) -> Result<Value>;

    /// 回退 delta 个页面
    async fn navigate_back(&self, delta: i64) -> Result<Value>;

    /// 当前页面栈（最旧 → 最新）
    fn current_pages(&self) -> Vec<HostPage>;
}

/// 历史栈能力集
///
/// 任何宿主绑定都必须实现的固定能力集。路由器通过它读取栈、
/// 触发导航原语，除此之外绝不改动页面栈。
#[async_trait]
pub trait HistoryAdapter: Send + Sync {
    /// push 原语
    async fn push(&self, path: &str, events: Option<TransitionEvents>) -> Result<Value>;

    /// replace 原语
    async fn replace(&self, path: &str) -> Result<Value>;

    /// switchTab 原语
    async fn switch_tab(&self, path: &str) -> Result<Value>;

    /// reLaunch 原语
    async fn re_launch(&self, path: &str) -> Result<Value>;

    /// 回退原语（delta 钳制到 ≥ 1，方向恒为栈底）
    async fn go(&self, delta: i64) -> Result<Value>;

    /// 栈顶页面快照
    fn current_route(&self) -> HistorySnapshot;

    /// 页面栈快照（最旧 → 最新）
    fn routes(&self) -> Vec<HistorySnapshot>;

    /// 当前栈深度
    fn pages_length(&self) -> usize;

    /// 宿主栈深度上限
    fn max_stack_length(&self) -> usize {
        DEFAULT_MAX_STACK_LENGTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_transition_events() {
        let hits = Arc::new(AtomicUsize::new(0));
        let events = {
            let hits = Arc::clone(&hits);
            TransitionEvents::new().on("acceptResult", move |_payload| {
                hits.fetch_add(1, Ordering::SeqCst);
            })
        };

        events.emit("acceptResult", serde_json::json!({"ok": true}));
        events.emit("unknown", serde_json::json!(null));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(events.names(), vec!["acceptResult"]);
    }
}
