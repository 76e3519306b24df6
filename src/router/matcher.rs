//! 路由匹配器
//!
//! 把路由表一次性编译为查找索引（按名称、按页面路径），并把
//! 导航目标解析为路由记录 + 参数。索引构建后只读，进程生命周期
//! 内不再变化。

use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::LazyLock;
use tracing::debug;

use super::query::{parse_query, QueryMap};
use super::record::{LocationTarget, ResolvedLocation, RouteLocation, RouteRecord, RouteTable};
use crate::utils::{Result, RouterError};

/// 页面路径格式正则表达式
///
/// 格式: 以 `/` 分隔的路径段，如 `pages/detail/index`、
/// `packageShop/pages/goods/index`
static PAGE_PATH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+(/[A-Za-z0-9_-]+)*$").expect("invalid page path regex")
});

/// 页面路径格式是否有效
pub fn is_valid_page_path(page: &str) -> bool {
    PAGE_PATH_REGEX.is_match(page)
}

/// 路由匹配器
///
/// 构建时把分包分组展开为扁平的叶子记录列表（子记录的页面路径
/// 带上分组 `root` 前缀），并建立两个索引：
/// - `by_name`: 名称 -> 记录
/// - `by_page`: 规范化页面路径 -> 记录
#[derive(Debug)]
pub struct RouteMatcher {
    /// 扁平化后的记录（保持表内顺序）
    records: Vec<Arc<RouteRecord>>,
    /// 名称索引
    by_name: HashMap<String, Arc<RouteRecord>>,
    /// 页面路径索引
    by_page: HashMap<String, Arc<RouteRecord>>,
}

impl RouteMatcher {
    /// 由路由表构建匹配器
    ///
    /// # Errors
    ///
    /// - 叶子记录缺少页面路径
    /// - 页面路径格式无效
    /// - 声明的路由名称重复
    pub fn new(table: RouteTable) -> Result<Self> {
        let mut records = Vec::new();
        let mut by_name = HashMap::new();
        let mut by_page = HashMap::new();

        for mut record in table {
            if record.is_group() {
                let root = record.root.take().unwrap_or_default();
                for child in record.children.take().unwrap_or_default() {
                    let page = child
                        .page
                        .as_deref()
                        .ok_or_else(|| RouterError::MissingPage(child.name.clone()))?;
                    let flattened = RouteRecord {
                        page: Some(format!("{root}/{page}")),
                        root: None,
                        independent: None,
                        children: None,
                        ..child
                    };
                    Self::index(&mut records, &mut by_name, &mut by_page, flattened)?;
                }
            } else {
                record.children = None;
                Self::index(&mut records, &mut by_name, &mut by_page, record)?;
            }
        }

        debug!(record_count = records.len(), "route matcher built");

        Ok(Self {
            records,
            by_name,
            by_page,
        })
    }

    /// 登记一条扁平化记录
    fn index(
        records: &mut Vec<Arc<RouteRecord>>,
        by_name: &mut HashMap<String, Arc<RouteRecord>>,
        by_page: &mut HashMap<String, Arc<RouteRecord>>,
        record: RouteRecord,
    ) -> Result<()> {
        let page = record
            .page
            .as_deref()
            .ok_or_else(|| RouterError::MissingPage(record.name.clone()))?;
        let page = normalize_page(page).to_string();

        if !is_valid_page_path(&page) {
            return Err(RouterError::InvalidPagePath(page));
        }

        let record = Arc::new(RouteRecord {
            page: Some(page.clone()),
            ..record
        });

        if !record.name.is_empty()
            && by_name
                .insert(record.name.clone(), Arc::clone(&record))
                .is_some()
        {
            return Err(RouterError::DuplicateRouteName(record.name.clone()));
        }

        by_page.insert(page, Arc::clone(&record));
        records.push(record);
        Ok(())
    }

    /// 解析导航目标
    ///
    /// 路径串目标：按 `?` 切出页面路径与查询串，查询串即参数；
    /// 命名目标：取调用方提供的参数。未命中不是错误，
    /// `record` 为 `None`。
    pub fn resolve(&self, location: &RouteLocation) -> ResolvedLocation {
        match &location.target {
            LocationTarget::Path(path) => {
                let (page, params) = split_path(path);
                ResolvedLocation {
                    record: self.record_by_page(page).cloned(),
                    params,
                }
            }
            LocationTarget::Name(name) => ResolvedLocation {
                record: self.record_by_name(name).cloned(),
                params: location.params.clone(),
            },
        }
    }

    /// 按页面路径查找记录（O(1)）
    pub fn record_by_page(&self, page: &str) -> Option<&Arc<RouteRecord>> {
        self.by_page.get(normalize_page(page))
    }

    /// 按名称查找记录（O(1)）
    pub fn record_by_name(&self, name: &str) -> Option<&Arc<RouteRecord>> {
        self.by_name.get(name)
    }

    /// 是否存在指定名称的路由
    pub fn has_route(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// 扁平化记录快照（保持表内顺序）
    pub fn records(&self) -> &[Arc<RouteRecord>] {
        &self.records
    }
}

/// 去掉页面路径的前导 `/`
fn normalize_page(page: &str) -> &str {
    page.trim_start_matches('/')
}

/// 把路径串切分为页面路径与参数
fn split_path(path: &str) -> (&str, QueryMap) {
    match path.split_once('?') {
        Some((page, search)) => (normalize_page(page), parse_query(search)),
        None => (normalize_page(path), QueryMap::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::query::QueryValue;
    use crate::router::record::RouteMeta;

    fn sample_table() -> RouteTable {
        vec![
            RouteRecord::new("home", "/", "pages/home/index").with_meta(RouteMeta::tab()),
            RouteRecord::new("detail", "/detail", "pages/detail/index"),
            RouteRecord::group(
                "/shop",
                "packageShop",
                vec![RouteRecord::new("goods", "/goods", "pages/goods/index")],
            ),
        ]
    }

    #[test]
    fn test_build_flattens_groups() {
        let matcher = RouteMatcher::new(sample_table()).unwrap();
        assert_eq!(matcher.records().len(), 3);

        let goods = matcher.record_by_name("goods").unwrap();
        assert_eq!(goods.page.as_deref(), Some("packageShop/pages/goods/index"));
    }

    #[test]
    fn test_resolve_by_name_returns_provided_params() {
        let matcher = RouteMatcher::new(sample_table()).unwrap();
        let mut params = QueryMap::new();
        params.insert("id".to_string(), "42".into());

        let resolved = matcher.resolve(
            &RouteLocation::named("detail").with_params(params.clone()),
        );
        assert_eq!(resolved.record.unwrap().name, "detail");
        assert_eq!(resolved.params, params);
    }

    #[test]
    fn test_resolve_by_path_parses_query() {
        let matcher = RouteMatcher::new(sample_table()).unwrap();
        let resolved = matcher.resolve(&RouteLocation::path("/pages/detail/index?id=42"));

        assert_eq!(resolved.record.unwrap().name, "detail");
        assert_eq!(resolved.params["id"], QueryValue::Text("42".to_string()));
    }

    #[test]
    fn test_resolve_unknown_is_not_error() {
        let matcher = RouteMatcher::new(sample_table()).unwrap();

        let resolved = matcher.resolve(&RouteLocation::named("missing"));
        assert!(resolved.record.is_none());
        assert!(resolved.params.is_empty());

        let resolved = matcher.resolve(&RouteLocation::path("/pages/unknown/index"));
        assert!(resolved.record.is_none());
    }

    #[test]
    fn test_record_by_page_ignores_leading_slash() {
        let matcher = RouteMatcher::new(sample_table()).unwrap();
        assert!(matcher.record_by_page("/pages/home/index").is_some());
        assert!(matcher.record_by_page("pages/home/index").is_some());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let table = vec![
            RouteRecord::new("home", "/", "pages/home/index"),
            RouteRecord::new("home", "/home2", "pages/home2/index"),
        ];
        let err = RouteMatcher::new(table).unwrap_err();
        assert!(matches!(err, RouterError::DuplicateRouteName(_)));
    }

    #[test]
    fn test_invalid_page_path_rejected() {
        let table = vec![RouteRecord::new("bad", "/bad", "pages//index")];
        let err = RouteMatcher::new(table).unwrap_err();
        assert!(matches!(err, RouterError::InvalidPagePath(_)));
    }

    #[test]
    fn test_missing_page_rejected() {
        let table = vec![RouteRecord {
            page: None,
            ..RouteRecord::new("empty", "/empty", "x")
        }];
        let err = RouteMatcher::new(table).unwrap_err();
        assert!(matches!(err, RouterError::MissingPage(_)));
    }

    #[test]
    fn test_has_route() {
        let matcher = RouteMatcher::new(sample_table()).unwrap();
        assert!(matcher.has_route("home"));
        assert!(!matcher.has_route("missing"));
    }
}
