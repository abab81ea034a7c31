// ==========================================
// LLD 配置生成工具 - 命令实现
// ==========================================
// 职责: init / run / lld / dump 四个命令的执行流程
// 红线: 单台设备失败只跳过该设备，表区域失败终止整个运行
// ==========================================

use crate::app::state::AppState;
use crate::config::DevConfig;
use crate::domain::record::Record;
use crate::engine::{DeviceConfigCollector, DeviceConfigContext, SnmpTarget};
use crate::importer::{ImportError, RowRejection};
use anyhow::Context;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

// ==========================================
// init
// ==========================================

/// 解析工作簿，生成带默认值与设备清单的 DevConfig.yaml
///
/// # 返回
/// - Ok(PathBuf): 写入的 DevConfig.yaml 路径
pub fn init(state: &AppState) -> anyhow::Result<PathBuf> {
    let collector = state.open_collector(SnmpTarget::default())?;
    let devices = collector.device_list().context("读取设备清单失败")?;
    report_rejections(&collector.rejections());

    let path = state.dev_config_path();
    DevConfig::with_devices(devices)
        .write(&path)
        .with_context(|| format!("写入 {} 失败", path.display()))?;
    info!(
        path = %path.display(),
        "初始化完成，请检查并修改该配置文件，修改完成后执行 run 生成设备配置"
    );
    Ok(path)
}

// ==========================================
// run
// ==========================================

/// 一次 run 的结果汇总
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
    pub rejected_rows: usize,
}

/// 渲染 ci_name_list 中的全部设备
pub fn run(state: &AppState) -> anyhow::Result<RunSummary> {
    let dev_config = state.load_dev_config()?;
    let collector = state.open_collector(SnmpTarget {
        target_host: dev_config.snmp_config.target_host.clone(),
        udp_port: dev_config.snmp_config.udp_port,
    })?;
    let renderer = state.renderer()?;

    let mut summary = RunSummary::default();
    for ci_name in &dev_config.ci_name_list {
        let context = match DeviceConfigContext::build(&collector, ci_name, &dev_config) {
            Ok(context) => context,
            Err(ImportError::DeviceNotFound(_)) => {
                warn!(ci_name = %ci_name, "设备不在基础管理信息中，跳过");
                summary.skipped.push(ci_name.clone());
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("构建设备 {} 的配置数据失败", ci_name));
            }
        };

        match renderer.render_device(context) {
            Ok(path) => summary.written.push(path),
            Err(e) => {
                error!(ci_name = %ci_name, error = %e, "设备配置渲染失败");
                summary.failed.push(ci_name.clone());
            }
        }
    }

    let rejections = collector.rejections();
    report_rejections(&rejections);
    summary.rejected_rows = rejections.len();
    info!(
        written = summary.written.len(),
        skipped = summary.skipped.len(),
        failed = summary.failed.len(),
        rejected_rows = summary.rejected_rows,
        save_dir = %renderer.save_dir().display(),
        "配置生成完成"
    );
    Ok(summary)
}

// ==========================================
// lld
// ==========================================

/// 写入 LLD 文件名或路径
///
/// # 返回
/// - Ok(Some(PathBuf)): 更新后的 settings.yaml 路径
/// - Ok(None): 两个参数都未指定
pub fn lld(
    state: &mut AppState,
    name: Option<&str>,
    file: Option<&Path>,
) -> anyhow::Result<Option<PathBuf>> {
    let updated = match (name, file) {
        (Some(name), _) => {
            let path = state.config.update_lld_name(name)?;
            info!(name, settings = %path.display(), "LLD 文件名配置成功");
            Some(path)
        }
        (None, Some(file)) => {
            let path = state.config.update_lld_file(file)?;
            info!(file = %file.display(), settings = %path.display(), "LLD 文件路径配置成功");
            Some(path)
        }
        (None, None) => None,
    };
    Ok(updated)
}

// ==========================================
// dump
// ==========================================

/// 导出一台或全部设备的类型化记录（JSON）
pub fn dump(state: &AppState, device: Option<&str>) -> anyhow::Result<String> {
    let collector = state.open_collector(SnmpTarget::default())?;
    let records = collect_records(&collector, device)?;
    report_rejections(&collector.rejections());
    serde_json::to_string_pretty(&records).context("记录序列化失败")
}

/// 设备 → 记录列表
pub fn collect_records(
    collector: &DeviceConfigCollector,
    device: Option<&str>,
) -> anyhow::Result<BTreeMap<String, Vec<Record>>> {
    let devices = match device {
        Some(ci_name) => vec![ci_name.to_string()],
        None => collector.device_list()?,
    };

    let mut records = BTreeMap::new();
    for ci_name in devices {
        let device_records = collector
            .device_records(&ci_name)
            .with_context(|| format!("读取设备 {} 的记录失败", ci_name))?;
        records.insert(ci_name, device_records);
    }
    Ok(records)
}

/// 逐行输出拒收记录
pub fn report_rejections(rejections: &[RowRejection]) {
    if rejections.is_empty() {
        return;
    }
    warn!(count = rejections.len(), "存在被拒收的规划表行");
    for rejection in rejections {
        warn!(
            kind = %rejection.kind,
            row = rejection.row_number,
            device = rejection.device.as_deref().unwrap_or("-"),
            reason = %rejection.reason,
            "拒收行"
        );
    }
}
