//! 路由数据模型
//!
//! 路由表由上游构建管线从页面文件系统生成（JSON/YAML 工件），
//! 本模块定义表中记录的结构，以及导航过程中使用的目标定位与
//! 规范化路由快照。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::query::{stringify_query, QueryMap, QueryValue};

/// 路由表：有序的路由记录序列
pub type RouteTable = Vec<RouteRecord>;

/// 路由元信息
///
/// `is_tab` 标记 tab 页（经 switchTab 而非 push 到达），
/// 其余键原样保留供守卫与业务读取。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteMeta {
    /// 是否为 tab 页
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_tab: bool,

    /// 业务自定义元信息
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl RouteMeta {
    /// 构造 tab 页元信息
    pub fn tab() -> Self {
        Self {
            is_tab: true,
            ..Default::default()
        }
    }
}

/// 路由记录
///
/// 叶子记录描述一个页面；携带 `root` 与 `children` 的记录描述一个
/// 分包分组，子记录的 `page` 相对于 `root`。
/// 约束：声明了 `name` 的记录之间名称唯一。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRecord {
    /// 路由名称（分组记录可为空）
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// 逻辑路径（如 `/detail`）
    #[serde(default)]
    pub path: String,

    /// 页面路径（相对宿主包根，如 `pages/detail/index`）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,

    /// 元信息
    #[serde(default)]
    pub meta: RouteMeta,

    /// 构建管线声明的参数名列表
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<String>>,

    /// 分包根目录（分组记录）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,

    /// 分包是否独立加载
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub independent: Option<bool>,

    /// 分组内的子记录
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RouteRecord>>,
}

impl RouteRecord {
    /// 构造叶子记录
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        page: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            page: Some(page.into()),
            meta: RouteMeta::default(),
            params: None,
            root: None,
            independent: None,
            children: None,
        }
    }

    /// 设置元信息
    pub fn with_meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }

    /// 构造分包分组记录
    pub fn group(
        path: impl Into<String>,
        root: impl Into<String>,
        children: Vec<RouteRecord>,
    ) -> Self {
        Self {
            name: String::new(),
            path: path.into(),
            page: None,
            meta: RouteMeta::default(),
            params: None,
            root: Some(root.into()),
            independent: None,
            children: Some(children),
        }
    }

    /// 是否为分包分组记录
    pub fn is_group(&self) -> bool {
        self.root.is_some()
    }
}

// ============================================================================
// 导航目标定位
// ============================================================================

/// 导航目标：路径串或命名路由
#[derive(Debug, Clone, PartialEq)]
pub enum LocationTarget {
    /// 路径串（可携带查询串，如 `/pages/detail/index?id=42`）
    Path(String),
    /// 命名路由
    Name(String),
}

/// 导航目标定位
///
/// `push`/`replace` 的入参。用构建器风格组装：
///
/// ```
/// use mina_router::router::record::RouteLocation;
///
/// let to = RouteLocation::named("detail").with_param("id", "42");
/// assert!(!to.replace);
/// ```
#[derive(Clone)]
pub struct RouteLocation {
    /// 目标
    pub target: LocationTarget,
    /// 命名路由携带的参数
    pub params: QueryMap,
    /// 以 replace 方式导航
    pub replace: bool,
    /// 以 reLaunch 方式导航
    pub re_launch: bool,
    /// push 导航时传递给宿主的页面间事件回调
    pub events: Option<crate::history::TransitionEvents>,
}

impl RouteLocation {
    /// 以路径串定位
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            target: LocationTarget::Path(path.into()),
            params: QueryMap::new(),
            replace: false,
            re_launch: false,
            events: None,
        }
    }

    /// 以路由名定位
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            target: LocationTarget::Name(name.into()),
            params: QueryMap::new(),
            replace: false,
            re_launch: false,
            events: None,
        }
    }

    /// 设置整组参数
    pub fn with_params(mut self, params: QueryMap) -> Self {
        self.params = params;
        self
    }

    /// 追加单个参数
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// 以 replace 方式导航
    pub fn as_replace(mut self) -> Self {
        self.replace = true;
        self
    }

    /// 以 reLaunch 方式导航
    pub fn as_re_launch(mut self) -> Self {
        self.re_launch = true;
        self
    }

    /// 设置页面间事件回调
    pub fn with_events(mut self, events: crate::history::TransitionEvents) -> Self {
        self.events = Some(events);
        self
    }
}

impl fmt::Debug for RouteLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteLocation")
            .field("target", &self.target)
            .field("params", &self.params)
            .field("replace", &self.replace)
            .field("re_launch", &self.re_launch)
            .field("events", &self.events.as_ref().map(|e| e.names()))
            .finish()
    }
}

impl From<&str> for RouteLocation {
    fn from(path: &str) -> Self {
        RouteLocation::path(path)
    }
}

impl From<String> for RouteLocation {
    fn from(path: String) -> Self {
        RouteLocation::path(path)
    }
}

/// 匹配结果
///
/// 未命中不是错误：`record` 为 `None`，由调用方决定策略。
#[derive(Debug, Clone)]
pub struct ResolvedLocation {
    /// 命中的路由记录（扁平化后的叶子）
    pub record: Option<Arc<RouteRecord>>,
    /// 查询串解析出的或调用方提供的参数
    pub params: QueryMap,
}

// ============================================================================
// 规范化路由快照
// ============================================================================

/// 规范化路由快照
///
/// 一次导航/查询产生的不可变值对象。同一 `(page, params)`
/// 组合产生相同的 `full_page_path`。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRoute {
    /// 路由名称
    pub name: String,
    /// 逻辑路径
    pub path: String,
    /// 页面路径
    pub page: String,
    /// 逻辑路径 + 查询串
    pub full_path: String,
    /// 页面路径 + 查询串
    pub full_page_path: String,
    /// 参数表
    pub params: QueryMap,
    /// 元信息
    pub meta: RouteMeta,
}

impl NormalizedRoute {
    /// 由记录与参数构造快照
    pub fn normalize(record: &RouteRecord, params: QueryMap) -> Self {
        let search = if params.is_empty() {
            String::new()
        } else {
            format!("?{}", stringify_query(&params))
        };
        let page = record.page.clone().unwrap_or_default();

        Self {
            name: record.name.clone(),
            path: record.path.clone(),
            full_path: format!("{}{}", record.path, search),
            full_page_path: format!("{page}{search}"),
            page,
            params,
            meta: record.meta.clone(),
        }
    }

    /// 规范空路由
    ///
    /// 宿主可能停在路由表不认识的页面（如原生入口页），
    /// 此时返回空快照而不是报错。
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            path: String::new(),
            page: String::new(),
            full_path: String::new(),
            full_page_path: String::new(),
            params: QueryMap::new(),
            meta: RouteMeta::default(),
        }
    }

    /// 是否为规范空路由
    pub fn is_empty(&self) -> bool {
        self.page.is_empty() && self.name.is_empty()
    }
}

/// 宿主页面栈条目快照
///
/// `params` 是宿主交回的原始字符串表，
/// 还原见 [`super::query::parse_query_obj`]。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistorySnapshot {
    /// 页面路径（不带前导 `/`）
    pub route: String,
    /// 原始页面参数
    pub params: BTreeMap<String, String>,
}

impl HistorySnapshot {
    /// 构造快照
    pub fn new(route: impl Into<String>, params: BTreeMap<String, String>) -> Self {
        Self {
            route: route.into(),
            params,
        }
    }
}
