//! 支付宝宿主族历史栈绑定
//!
//! 把能力集映射到 `my.*` 导航动词。支付宝宿主不在栈条目上暴露
//! 页面加载参数，原始参数从 [`PageRegistry`] 取回（宿主胶水层在
//! 页面加载时写入）。

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::pages::PageRegistry;
use super::{HistoryAdapter, HostApi, TransitionEvents};
use crate::router::record::HistorySnapshot;
use crate::utils::Result;

/// 支付宝宿主页面栈深度上限
const MAX_STACK_LENGTH: usize = 10;

/// 支付宝宿主族历史栈适配器
pub struct AlipayHistory {
    api: Arc<dyn HostApi>,
    pages: Arc<PageRegistry>,
}

impl AlipayHistory {
    /// 由宿主绑定与页面参数注册表构造适配器
    pub fn new(api: Arc<dyn HostApi>, pages: Arc<PageRegistry>) -> Self {
        Self { api, pages }
    }

    fn snapshot(&self, route: String) -> HistorySnapshot {
        let params = self.pages.raw_for(&route).unwrap_or_default();
        HistorySnapshot::new(route, params)
    }
}

#[async_trait]
impl HistoryAdapter for AlipayHistory {
    async fn push(&self, path: &str, events: Option<TransitionEvents>) -> Result<Value> {
        self.api.navigate_to(path, events).await
    }

    async fn replace(&self, path: &str) -> Result<Value> {
        self.api.redirect_to(path).await
    }

    async fn switch_tab(&self, path: &str) -> Result<Value> {
        self.api.switch_tab(path).await
    }

    async fn re_launch(&self, path: &str) -> Result<Value> {
        self.api.re_launch(path).await
    }

    async fn go(&self, delta: i64) -> Result<Value> {
        self.api.navigate_back(delta.max(1)).await
    }

    fn current_route(&self) -> HistorySnapshot {
        let pages = self.api.current_pages();
        match pages.last() {
            Some(page) => self.snapshot(page.route.clone()),
            None => HistorySnapshot::default(),
        }
    }

    fn routes(&self) -> Vec<HistorySnapshot> {
        self.api
            .current_pages()
            .into_iter()
            .map(|page| self.snapshot(page.route))
            .collect()
    }

    fn pages_length(&self) -> usize {
        self.api.current_pages().len()
    }

    fn max_stack_length(&self) -> usize {
        MAX_STACK_LENGTH
    }
}
