// ==========================================
// LLD 配置生成工具 - 命令行主入口
// ==========================================

use clap::Parser;
use lld_config_gen::app::{commands, AppState, Cli, Command};
use lld_config_gen::logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut state = AppState::load(&cli.settings)?;
    logging::init(&state.config.logs_dir()?, cli.log_json)?;

    tracing::info!("==================================================");
    tracing::info!("{} v{}", lld_config_gen::APP_NAME, lld_config_gen::VERSION);
    tracing::info!("==================================================");

    match cli.command {
        Command::Init => {
            let path = commands::init(&state)?;
            println!("初始化完成，请查看并修改 {}，修改完成后执行 run 生成配置文件", path.display());
        }
        Command::Run => {
            let summary = commands::run(&state)?;
            println!(
                "已生成 {} 台设备配置，跳过 {} 台，失败 {} 台，拒收 {} 行",
                summary.written.len(),
                summary.skipped.len(),
                summary.failed.len(),
                summary.rejected_rows
            );
            if !summary.failed.is_empty() {
                anyhow::bail!("以下设备渲染失败: {}", summary.failed.join(", "));
            }
        }
        Command::Lld { name, file } => {
            match commands::lld(&mut state, name.as_deref(), file.as_deref())? {
                Some(settings) => println!("LLD 配置已写入 {}", settings.display()),
                None => println!("未指定参数，使用 lld -h 查看需要指定的参数。"),
            }
        }
        Command::Dump { device } => {
            println!("{}", commands::dump(&state, device.as_deref())?);
        }
    }
    Ok(())
}
