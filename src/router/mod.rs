//! 路由模块
//!
//! 包含导航引擎的核心组件：
//! - 路由数据模型（记录、目标定位、规范化快照）
//! - 查询串编解码
//! - 路由匹配器
//! - 导航守卫管线
//! - 导航结果与失败分类
//! - 路由器主结构体

pub mod failure;
pub mod guard;
pub mod matcher;
pub mod query;
pub mod record;
pub mod router;

// 重导出常用类型
pub use failure::{
    is_navigation_failure, NavigationFailure, NavigationFailureKind, NavigationPhase,
    NavigationResult,
};
pub use guard::{
    AfterHandle, BeforeHandle, GuardHandle, GuardOutcome, GuardPipeline, NavigationGuard,
};
pub use matcher::{is_valid_page_path, RouteMatcher};
pub use query::{parse_query, parse_query_obj, stringify_query, QueryMap, QueryValue};
pub use record::{
    HistorySnapshot, LocationTarget, NormalizedRoute, ResolvedLocation, RouteLocation, RouteMeta,
    RouteRecord, RouteTable,
};
pub use router::{NavigationIntent, NavigationStats, NavigationStatsSnapshot, Router};
