//! # mina-router - 小程序栈式导航路由引擎
//!
//! 面向封闭小程序运行时的客户端导航引擎，把声明式命名路由表
//! 映射到宿主的页面栈原语（push、replace、switchTab、reLaunch、
//! back），支持两个宿主族（`wx.*` 与 `my.*`），核心功能：
//!
//! - **路由匹配**: 名称/页面路径双索引，分包分组扁平化
//! - **守卫管线**: 有序的导航前守卫与导航后钩子，取消/重定向语义
//! - **栈复用优化**: 目标页已在栈中时回退复用，规避栈深上限
//! - **查询编解码**: 多值键与 JSON 对象值的 URL 查询串格式
//! - **日志系统**: 结构化日志与导航 ID 关联
//!
//! ## 快速开始
//!
//! ```rust
//! use std::sync::Arc;
//! use mina_router::history::MemoryHistory;
//! use mina_router::router::record::{NormalizedRoute, RouteLocation, RouteRecord};
//! use mina_router::router::{GuardOutcome, Router};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let table = vec![
//!         RouteRecord::new("home", "/", "pages/home/index"),
//!         RouteRecord::new("detail", "/detail", "pages/detail/index"),
//!     ];
//!     let router = Router::new(table, Arc::new(MemoryHistory::new()))?;
//!
//!     router.before_each(|to: &NormalizedRoute, _from: &NormalizedRoute| {
//!         tracing::debug!(page = %to.page, "navigating");
//!         GuardOutcome::Allow
//!     });
//!
//!     let result = router
//!         .push(RouteLocation::named("detail").with_param("id", "42"))
//!         .await?;
//!     assert!(result.is_completed());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## 模块结构
//!
//! - `router` - 匹配器、守卫管线与路由器主结构体
//! - `history` - 宿主历史栈能力集与各宿主族绑定
//! - `api` - 进程级路由器访问接口
//! - `core` - 配置与路由表工件加载
//! - `utils` - 错误类型、导航 ID、日志系统

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod api;
pub mod core;
pub mod history;
pub mod router;
pub mod utils;

// 重导出常用类型，方便使用
pub use history::{
    AlipayHistory, HistoryAdapter, HostApi, HostPage, MemoryHistory, PageRegistry,
    TransitionEvents, WechatHistory,
};
pub use router::{
    is_navigation_failure, GuardOutcome, NavigationFailure, NavigationFailureKind,
    NavigationGuard, NavigationResult, NormalizedRoute, QueryMap, QueryValue, RouteLocation,
    RouteMatcher, RouteMeta, RouteRecord, RouteTable, Router,
};
pub use utils::{Result, RouterError};
