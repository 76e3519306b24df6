//! 页面参数注册表
//!
//! 宿主胶水层在页面注册处包一层：页面加载时把宿主交付的原始
//! 参数显式写入本注册表，页面出栈时清除。页面代码与适配器按
//! 页面路径取回参数——显式依赖注入，引擎不改动任何共享的全局
//! 页面构造器。

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use crate::router::query::{parse_query_obj, QueryMap};

/// 页面参数注册表
///
/// 按页面路径记录最近一次加载时的原始参数。
#[derive(Debug, Default)]
pub struct PageRegistry {
    raw: RwLock<HashMap<String, BTreeMap<String, String>>>,
}

impl PageRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 页面加载：记录宿主交付的原始参数
    pub fn record_load(&self, route: impl Into<String>, raw_query: BTreeMap<String, String>) {
        self.raw
            .write()
            .expect("page registry poisoned")
            .insert(route.into(), raw_query);
    }

    /// 页面出栈：清除参数记录
    pub fn record_unload(&self, route: &str) {
        self.raw
            .write()
            .expect("page registry poisoned")
            .remove(route);
    }

    /// 取页面的原始参数（适配器用）
    pub fn raw_for(&self, route: &str) -> Option<BTreeMap<String, String>> {
        self.raw
            .read()
            .expect("page registry poisoned")
            .get(route)
            .cloned()
    }

    /// 取页面的还原参数（页面代码用）
    pub fn query_for(&self, route: &str) -> Option<QueryMap> {
        self.raw_for(route).map(|raw| parse_query_obj(&raw))
    }
}
