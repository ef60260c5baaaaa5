//! Mesa Server - 餐厅目录与预订平台后端
//!
//! # 模块结构
//!
//! ```text
//! server/src/
//! ├── core/          # 配置、状态、HTTP 服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (连接池 + 仓储)
//! ├── money/         # 金额计算 (rust_decimal)
//! └── utils/         # 错误、日志、输入校验
//! ```
//!
//! The HTTP layer in `api/` maps routes onto the repository functions in
//! `db/repository/`; the repositories own every SQL statement, existence
//! check, duplicate check and transaction. The booking core (table
//! availability, reservation lifecycle, order totals) lives in
//! `db/repository/{dining_table, reservation, order}` plus `money`.

pub mod api;
pub mod core;
pub mod db;
pub mod money;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use db::DbService;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
   __  ___
  /  |/  /__ ___ ___ _
 / /|_/ / -_|_-</ _ `/
/_/  /_/\__/___/\_,_/
    "#
    );
}
