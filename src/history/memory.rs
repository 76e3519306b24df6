//! 进程内历史栈
//!
//! 不依赖任何宿主的能力集实现：用一个进程内页面栈模拟宿主的
//! 栈语义（push 追加、replace 换顶、switchTab/reLaunch 重置、
//! go 出栈）。用于单元/集成测试与脱离宿主的演练。

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{HistoryAdapter, TransitionEvents, DEFAULT_MAX_STACK_LENGTH};
use crate::router::record::HistorySnapshot;
use crate::utils::{Result, RouterError};

/// 进程内历史栈适配器
pub struct MemoryHistory {
    stack: RwLock<Vec<HistorySnapshot>>,
    max_stack: usize,
}

impl MemoryHistory {
    /// 创建空栈
    pub fn new() -> Self {
        Self::with_max_stack(DEFAULT_MAX_STACK_LENGTH)
    }

    /// 创建指定深度上限的空栈
    pub fn with_max_stack(max_stack: usize) -> Self {
        Self {
            stack: RwLock::new(Vec::new()),
            max_stack: max_stack.max(1),
        }
    }

    /// 以入口页初始化
    pub fn with_entry(path: &str) -> Self {
        let history = Self::new();
        history
            .stack
            .write()
            .expect("memory history poisoned")
            .push(parse_entry(path));
        history
    }

    fn ok(method: &str) -> Value {
        json!({ "errMsg": format!("{method}:ok") })
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryAdapter for MemoryHistory {
    async fn push(&self, path: &str, _events: Option<TransitionEvents>) -> Result<Value> {
        let mut stack = self.stack.write().expect("memory history poisoned");
        if stack.len() >= self.max_stack {
            return Err(RouterError::host(
                "navigateTo",
                format!("fail page stack limit exceeded ({})", self.max_stack),
            ));
        }
        stack.push(parse_entry(path));
        Ok(Self::ok("navigateTo"))
    }

    async fn replace(&self, path: &str) -> Result<Value> {
        let mut stack = self.stack.write().expect("memory history poisoned");
        stack.pop();
        stack.push(parse_entry(path));
        Ok(Self::ok("redirectTo"))
    }

    async fn switch_tab(&self, path: &str) -> Result<Value> {
        let mut stack = self.stack.write().expect("memory history poisoned");
        stack.clear();
        // tab 页不携带查询参数
        let mut entry = parse_entry(path);
        entry.params.clear();
        stack.push(entry);
        Ok(Self::ok("switchTab"))
    }

    async fn re_launch(&self, path: &str) -> Result<Value> {
        let mut stack = self.stack.write().expect("memory history poisoned");
        stack.clear();
        stack.push(parse_entry(path));
        Ok(Self::ok("reLaunch"))
    }

    async fn go(&self, delta: i64) -> Result<Value> {
        let mut stack = self.stack.write().expect("memory history poisoned");
        let delta = delta.max(1) as usize;
        // 最多退到栈底页面
        let popped = delta.min(stack.len().saturating_sub(1));
        for _ in 0..popped {
            stack.pop();
        }
        Ok(Self::ok("navigateBack"))
    }

    fn current_route(&self) -> HistorySnapshot {
        self.stack
            .read()
            .expect("memory history poisoned")
            .last()
            .cloned()
            .unwrap_or_default()
    }

    fn routes(&self) -> Vec<HistorySnapshot> {
        self.stack.read().expect("memory history poisoned").clone()
    }

    fn pages_length(&self) -> usize {
        self.stack.read().expect("memory history poisoned").len()
    }

    fn max_stack_length(&self) -> usize {
        self.max_stack
    }
}

/// 把宿主路径切分为栈条目（原始参数不解码）
fn parse_entry(path: &str) -> HistorySnapshot {
    let path = path.trim_start_matches('/');
    let (route, search) = match path.split_once('?') {
        Some((route, search)) => (route, search),
        None => (path, ""),
    };

    let mut params = BTreeMap::new();
    for pair in search.split('&') {
        if pair.is_empty() {
            continue;
        }
        match pair.split_once('=') {
            Some((key, value)) => params.insert(key.to_string(), value.to_string()),
            None => params.insert(pair.to_string(), String::new()),
        };
    }

    HistorySnapshot::new(route, params)
}
