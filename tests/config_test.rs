//! 配置与路由表工件加载测试

use std::fs;
use std::path::PathBuf;

use mina_router::core::{load_route_table, AppConfig, TableSource};
use mina_router::router::RouteMatcher;

/// 测试用临时目录（测试结束自动清理）
struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(tag: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "mina-router-test-{}-{tag}",
            std::process::id()
        ));
        fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let file = self.path.join(name);
        fs::write(&file, content).unwrap();
        file
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

#[test]
fn test_load_yaml_config_with_inline_table() {
    let dir = TempDir::new("inline-yaml");
    let config_path = dir.write(
        "router.yaml",
        r#"
table:
  - name: home
    path: /
    page: pages/home/index
    meta:
      isTab: true
  - name: detail
    path: /detail
    page: pages/detail/index
logging:
  level: debug
"#,
    );

    let config = AppConfig::load(&config_path).unwrap();
    assert_eq!(config.logging.level, "debug");

    let table = config.resolve_table(&dir.path).unwrap();
    assert_eq!(table.len(), 2);
    assert!(table[0].meta.is_tab);

    let matcher = RouteMatcher::new(table).unwrap();
    assert!(matcher.has_route("detail"));
}

#[test]
fn test_load_config_with_table_artifact_path() {
    let dir = TempDir::new("artifact-path");
    dir.write(
        "routes.json",
        r#"[
            { "name": "home", "path": "/", "page": "pages/home/index" },
            {
                "path": "/shop",
                "root": "packageShop",
                "children": [
                    { "name": "goods", "path": "/goods", "page": "pages/goods/index" }
                ]
            }
        ]"#,
    );
    let config_path = dir.write(
        "router.yaml",
        r#"
table: routes.json
"#,
    );

    let config = AppConfig::load(&config_path).unwrap();
    assert!(matches!(config.table, TableSource::Path(_)));

    let table = config.resolve_table(&dir.path).unwrap();
    let matcher = RouteMatcher::new(table).unwrap();

    let goods = matcher.record_by_name("goods").unwrap();
    assert_eq!(
        goods.page.as_deref(),
        Some("packageShop/pages/goods/index")
    );
}

#[test]
fn test_load_route_table_json_and_yaml() {
    let dir = TempDir::new("table-formats");
    let json = dir.write(
        "routes.json",
        r#"[{ "name": "home", "path": "/", "page": "pages/home/index" }]"#,
    );
    let yaml = dir.write(
        "routes.yaml",
        r#"
- name: home
  path: /
  page: pages/home/index
"#,
    );

    assert_eq!(load_route_table(&json).unwrap().len(), 1);
    assert_eq!(load_route_table(&yaml).unwrap().len(), 1);
}

#[test]
fn test_missing_config_is_load_error() {
    let err = AppConfig::load("/nonexistent/router.yaml").unwrap_err();
    assert!(matches!(
        err,
        mina_router::RouterError::ConfigLoadFailed(_)
    ));
}
