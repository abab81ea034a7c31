// ==========================================
// LLD 配置生成工具 - 命令行定义
// ==========================================
// 工具: clap derive
// ==========================================

use crate::app::state::DEFAULT_SETTINGS_DIR;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// LLD 规划表 → 网络设备配置生成工具
#[derive(Debug, Parser)]
#[command(
    name = "lld-config-gen",
    version,
    about = "LLD 规划表 → 网络设备配置生成工具",
    long_about = "解析 LLD 规划工作簿，按设备型号选择模板，生成每台设备的 <ci_name>.txt 配置。"
)]
pub struct Cli {
    /// settings 目录（包含 settings.yaml 与 DevConfig.yaml）
    #[arg(long, global = true, env = "LLD_SETTINGS", default_value = DEFAULT_SETTINGS_DIR)]
    pub settings: PathBuf,

    /// 控制台日志使用 JSON 格式
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 初始化设备配置文件 DevConfig.yaml，修改后执行 run
    Init,

    /// 按 DevConfig.yaml 生成设备配置
    Run,

    /// 配置 LLD 工作簿（文件名或完整路径）
    Lld {
        /// LLD 文件名（位于数据目录下）
        #[arg(long, conflicts_with = "file")]
        name: Option<String>,

        /// LLD 文件完整路径
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// 以 JSON 导出设备的类型化记录
    Dump {
        /// 只导出指定设备
        #[arg(long)]
        device: Option<String>,
    },
}
