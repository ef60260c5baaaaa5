//! Server state

use sqlx::SqlitePool;

use crate::core::Config;

/// 服务器状态 - 所有处理器共享的引用
///
/// 只持有配置与数据库连接池; 连接池内部已是 Arc, 克隆成本极低。
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
}

impl ServerState {
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        Self { config, pool }
    }
}
