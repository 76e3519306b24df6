//! mina-router 命令行入口
//!
//! 面向路由表工件的检查与调试工具。
//!
//! # 命令概览
//!
//! - `check-table` - 校验路由表（重名、页面路径格式、分包展开）
//! - `routes` - 列出扁平化后的全部路由记录
//! - `resolve` - 把路径或路由名解析为记录 + 参数
//!
//! # 使用示例
//!
//! ```bash
//! # 校验路由表
//! mina-router -c router.yaml check-table
//!
//! # 列出路由（JSON 输出）
//! mina-router -c router.yaml routes --json
//!
//! # 解析路径
//! mina-router -c router.yaml resolve "/pages/detail/index?id=42"
//!
//! # 解析命名路由
//! mina-router -c router.yaml resolve detail --name
//! ```

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use mina_router::core::AppConfig;
use mina_router::router::record::RouteLocation;
use mina_router::router::RouteMatcher;
use mina_router::utils::{Logger, LoggerConfig};

/// mina-router - 小程序导航路由表工具
#[derive(Parser)]
#[command(name = "mina-router")]
#[command(version, about = "小程序栈式导航路由引擎的路由表工具", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, default_value = "router.yaml", global = true)]
    config: PathBuf,

    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 校验路由表
    CheckTable,

    /// 列出扁平化后的全部路由记录
    Routes {
        /// 以 JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 把路径或路由名解析为记录 + 参数
    Resolve {
        /// 路径串（或配合 --name 的路由名）
        target: String,

        /// 把 target 当作路由名解析
        #[arg(long)]
        name: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _guard = Logger::try_init(
        LoggerConfig::builder()
            .level(cli.log_level.clone())
            .ansi_colors(true)
            .build(),
    );

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("无法加载配置文件 {}", cli.config.display()))?;
    let base = cli.config.parent().unwrap_or_else(|| std::path::Path::new("."));
    let table = config.resolve_table(base)?;

    match cli.command {
        Command::CheckTable => {
            let matcher = RouteMatcher::new(table)?;
            info!(record_count = matcher.records().len(), "route table ok");
            println!(
                "路由表校验通过：{} 条记录（分包已展开）",
                matcher.records().len()
            );
        }
        Command::Routes { json } => {
            let matcher = RouteMatcher::new(table)?;
            if json {
                let records: Vec<_> = matcher.records().iter().map(|r| r.as_ref()).collect();
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                for record in matcher.records() {
                    let tab = if record.meta.is_tab { " [tab]" } else { "" };
                    println!(
                        "{:<16} {:<20} {}{}",
                        record.name,
                        record.path,
                        record.page.as_deref().unwrap_or(""),
                        tab
                    );
                }
            }
        }
        Command::Resolve { target, name } => {
            let matcher = RouteMatcher::new(table)?;
            let location = if name {
                RouteLocation::named(&target)
            } else {
                RouteLocation::path(&target)
            };

            let resolved = matcher.resolve(&location);
            match resolved.record {
                Some(record) => {
                    println!("record: {}", serde_json::to_string_pretty(record.as_ref())?);
                    println!("params: {}", serde_json::to_string_pretty(&resolved.params)?);
                }
                None => bail!("未命中任何路由记录: {target}"),
            }
        }
    }

    Ok(())
}
