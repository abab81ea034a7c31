// ==========================================
// LLD 配置生成工具 - 应用层
// ==========================================
// 职责: 命令行解析与命令执行，连接配置层 / 引擎层 / 渲染层
// ==========================================

pub mod cli;
pub mod commands;
pub mod state;

// 重导出
pub use cli::{Cli, Command};
pub use commands::RunSummary;
pub use state::{AppState, DEFAULT_SETTINGS_DIR};
