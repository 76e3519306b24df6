//! 基本使用示例
//!
//! 展示导航引擎的基本用法，包括：
//!
//! - 构建路由表与路由器
//! - 注册导航守卫与导航后钩子
//! - push / replace / back 导航
//! - 栈复用回退
//!
//! # 运行示例
//!
//! ```bash
//! cargo run --example basic_usage
//! ```
//!
//! 示例使用进程内历史栈，无需真实小程序宿主。

use std::sync::Arc;

use mina_router::history::MemoryHistory;
use mina_router::router::record::{NormalizedRoute, RouteLocation, RouteRecord};
use mina_router::router::{GuardOutcome, RouteMeta, Router};
use mina_router::utils::{Logger, LoggerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _guard = Logger::try_init(LoggerConfig::builder().level("info").build());

    println!("=== mina-router 基本使用示例 ===\n");

    // -------------------------------------------------------------------------
    // 1. 构建路由表与路由器
    // -------------------------------------------------------------------------
    println!("1. 构建路由表与路由器...");

    let table = vec![
        RouteRecord::new("home", "/", "pages/home/index").with_meta(RouteMeta::tab()),
        RouteRecord::new("detail", "/detail", "pages/detail/index"),
        RouteRecord::new("login", "/login", "pages/login/index"),
        RouteRecord::group(
            "/shop",
            "packageShop",
            vec![RouteRecord::new("goods", "/goods", "pages/goods/index")],
        ),
    ];

    let history = Arc::new(MemoryHistory::with_entry("/pages/home/index"));
    let router = Router::new(table, history)?;
    println!("   路由记录数: {}", router.routes().len());
    println!("   ✅ 路由器创建成功\n");

    // -------------------------------------------------------------------------
    // 2. 注册守卫与钩子
    // -------------------------------------------------------------------------
    println!("2. 注册导航守卫与导航后钩子...");

    router.before_each(|to: &NormalizedRoute, _from: &NormalizedRoute| {
        // 未登录访问详情页时重定向到登录页
        if to.name == "detail" && to.params.get("token").is_none() {
            println!("   守卫: 缺少 token，重定向到登录页");
            return GuardOutcome::Redirect(RouteLocation::named("login"));
        }
        GuardOutcome::Allow
    });

    router.after_each(|to: &NormalizedRoute, from: &NormalizedRoute| {
        println!("   钩子: {} -> {}", from.full_page_path, to.full_page_path);
    });
    println!("   ✅ 注册完成\n");

    // -------------------------------------------------------------------------
    // 3. 导航
    // -------------------------------------------------------------------------
    println!("3. 发起导航...");

    let result = router.push(RouteLocation::named("detail")).await?;
    println!("   第一次 push 结果: completed = {}", result.is_completed());
    println!("   当前页面: {}\n", router.current_route().full_page_path);

    let result = router
        .push(
            RouteLocation::named("detail")
                .with_param("token", "t-123")
                .with_param("id", "42"),
        )
        .await?;
    println!("   携带 token 的 push 结果: completed = {}", result.is_completed());
    println!("   当前页面: {}\n", router.current_route().full_page_path);

    // -------------------------------------------------------------------------
    // 4. 栈复用：回到已在栈中的页面
    // -------------------------------------------------------------------------
    println!("4. 栈复用导航...");

    let result = router.push("/pages/login/index").await?;
    println!("   结果: completed = {}", result.is_completed());
    println!("   当前页面: {}", router.current_route().full_page_path);

    // -------------------------------------------------------------------------
    // 5. 统计
    // -------------------------------------------------------------------------
    println!("\n5. 导航统计:");
    let stats = router.stats();
    println!("   总数: {}", stats.total);
    println!("   完成: {}", stats.completed);
    println!("   重定向: {}", stats.redirected);
    println!("   栈复用: {}", stats.reused);

    Ok(())
}
