// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 控制台: RUST_LOG 过滤（默认 info），可切换 JSON 格式
// 文件:   <LOGS_DIR>/app.log，固定 debug 级别
// ==========================================

use anyhow::Context;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// 日志文件名
pub const LOG_FILE: &str = "app.log";

fn console_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// 初始化日志系统
///
/// # 参数
/// - logs_dir: 日志目录（须已存在）
/// - json: 控制台输出是否使用 JSON 格式
///
/// # 环境变量
/// - RUST_LOG: 控制台日志级别过滤器（默认: info）
///   例如: RUST_LOG=debug 或 RUST_LOG=lld_config_gen=trace
///
/// # 示例
/// ```no_run
/// use lld_config_gen::logging;
/// logging::init(std::path::Path::new("logs"), false).unwrap();
/// ```
pub fn init(logs_dir: &Path, json: bool) -> anyhow::Result<()> {
    let log_path = logs_dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("无法打开日志文件 {}", log_path.display()))?;

    let console = if json {
        fmt::layer()
            .json()
            .with_target(true)
            .with_line_number(true)
            .with_filter(console_filter())
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_line_number(true)
            .with_filter(console_filter())
            .boxed()
    };

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .with_writer(Mutex::new(file))
        .with_filter(LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init()
        .context("日志系统已初始化")?;
    Ok(())
}

/// 初始化测试环境的日志系统
///
/// 使用更详细的日志级别，便于调试
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
