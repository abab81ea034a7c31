// ==========================================
// LLD 配置生成工具 - 配置层
// ==========================================
// 职责: settings.yaml（目录布局 / 模板映射）与 DevConfig.yaml（补充数据 / 开关）
// 存储: settings 目录下的 YAML 文件
// ==========================================

pub mod app_config;
pub mod dev_config;
pub mod error;

pub use app_config::{AppConfig, DEFAULT_TEMPLATE, SETTINGS_FILE};
pub use dev_config::{BasicSettings, DevConfig, OptionSettings, SnmpSettings, DEV_CONFIG_FILE};
pub use error::{ConfigError, ConfigResult};
