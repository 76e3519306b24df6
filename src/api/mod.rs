//! 进程级路由器访问接口
//!
//! 宿主应用在启动时安装一个全局路由器实例，页面代码通过
//! [`use_router`] / [`use_route`] 取用，无须逐层传递。

use std::sync::{Arc, OnceLock};

use crate::router::record::NormalizedRoute;
use crate::router::Router;
use crate::utils::{Result, RouterError};

/// 进程级路由器实例
static ROUTER: OnceLock<Arc<Router>> = OnceLock::new();

/// 安装进程级路由器
///
/// # Errors
///
/// 重复安装时返回错误。
pub fn install_router(router: Arc<Router>) -> Result<()> {
    ROUTER
        .set(router)
        .map_err(|_| RouterError::InitFailed("路由器已安装，不能重复安装".to_string()))
}

/// 取进程级路由器
///
/// 未安装时返回 `None`。
pub fn use_router() -> Option<Arc<Router>> {
    ROUTER.get().cloned()
}

/// 取宿主当前页面的规范化路由
///
/// 未安装路由器时返回 `None`。
pub fn use_route() -> Option<NormalizedRoute> {
    use_router().map(|router| router.current_route())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryHistory;
    use crate::router::record::RouteRecord;

    #[test]
    fn test_install_and_use() {
        let table = vec![RouteRecord::new("home", "/", "pages/home/index")];
        let router = Arc::new(Router::new(table, Arc::new(MemoryHistory::new())).unwrap());

        // 同进程内其他测试可能已安装过，两种结果都合法
        match install_router(Arc::clone(&router)) {
            Ok(()) => {
                assert!(use_router().is_some());
                assert!(use_route().is_some());
                assert!(install_router(router).is_err());
            }
            Err(err) => assert!(matches!(err, RouterError::InitFailed(_))),
        }
    }
}
