// ==========================================
// LLD 配置生成工具 - 应用状态
// ==========================================
// 职责: 持有 settings 目录与 AppConfig，按需创建收集器 / 渲染器
// ==========================================

use crate::config::{AppConfig, DevConfig, DEV_CONFIG_FILE};
use crate::engine::{DeviceConfigCollector, SnmpTarget};
use crate::render::{ConfigRenderer, ModelResolver};
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::info;

/// 默认 settings 目录
pub const DEFAULT_SETTINGS_DIR: &str = "settings";

/// 应用状态
///
/// 一次命令调用内共享的配置
pub struct AppState {
    pub config: AppConfig,
}

impl AppState {
    /// 加载 settings 目录下的 settings.yaml
    pub fn load(settings_dir: &Path) -> anyhow::Result<Self> {
        let config = AppConfig::load(settings_dir)
            .with_context(|| format!("加载 settings 目录失败: {}", settings_dir.display()))?;
        Ok(Self { config })
    }

    pub fn dev_config_path(&self) -> PathBuf {
        self.config.settings_dir().join(DEV_CONFIG_FILE)
    }

    /// 加载 DevConfig.yaml（须先执行 init）
    pub fn load_dev_config(&self) -> anyhow::Result<DevConfig> {
        DevConfig::load(&self.dev_config_path()).context("加载设备配置失败，请先执行 init")
    }

    /// 解析 LLD 工作簿并创建收集器
    pub fn open_collector(&self, snmp_target: SnmpTarget) -> anyhow::Result<DeviceConfigCollector> {
        let lld_file = self.config.lld_file()?;
        let data_dir = self.config.data_dir()?;
        info!(lld = %lld_file.display(), data_dir = %data_dir.display(), "打开 LLD 工作簿");
        let collector = DeviceConfigCollector::open(&lld_file, &data_dir)
            .with_context(|| format!("解析 LLD 工作簿失败: {}", lld_file.display()))?;
        Ok(collector.with_snmp_target(snmp_target))
    }

    /// 按 settings.yaml 创建渲染器
    pub fn renderer(&self) -> anyhow::Result<ConfigRenderer> {
        let resolver = ModelResolver::new(self.config.model_mapping())?;
        let templates_dir = self.config.templates_dir()?;
        let renderer = ConfigRenderer::from_dir(
            &templates_dir,
            self.config.template_name.clone(),
            resolver,
            self.config.save_config_dir()?,
        )?;
        Ok(renderer)
    }
}
