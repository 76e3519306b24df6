//! 微信宿主族历史栈绑定
//!
//! 把能力集映射到 `wx.*` 导航动词。微信宿主在栈条目上直接暴露
//! 页面加载参数（`options`），因此栈快照的原始参数取自宿主本身。

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::{HistoryAdapter, HostApi, TransitionEvents};
use crate::router::record::HistorySnapshot;
use crate::utils::Result;

/// 微信宿主页面栈深度上限
const MAX_STACK_LENGTH: usize = 10;

/// 微信宿主族历史栈适配器
pub struct WechatHistory {
    api: Arc<dyn HostApi>,
}

impl WechatHistory {
    /// 由宿主绑定构造适配器
    pub fn new(api: Arc<dyn HostApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl HistoryAdapter for WechatHistory {
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
            Some(page) => HistorySnapshot::new(page.route.clone(), page.options.clone()),
            None => HistorySnapshot::default(),
        }
    }

    fn routes(&self) -> Vec<HistorySnapshot> {
        self.api
            .current_pages()
            .into_iter()
            .map(|page| HistorySnapshot::new(page.route, page.options))
            .collect()
    }

    fn pages_length(&self) -> usize {
        self.api.current_pages().len()
    }

    fn max_stack_length(&self) -> usize {
        MAX_STACK_LENGTH
    }
}
