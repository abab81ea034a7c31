// ==========================================
// LLD 配置生成工具 - 应用配置 (settings.yaml)
// ==========================================
// 职责: 目录布局 / LLD 文件定位 / 模板与型号映射
// 存储: <settings 目录>/settings.yaml
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const SETTINGS_FILE: &str = "settings.yaml";

/// 未匹配到型号模板时使用的模板
pub const DEFAULT_TEMPLATE: &str = "base.jinja2";

pub mod keys {
    pub const LLD_FILE_NAME: &str = "LLD_FILE_NAME";
    pub const LLD_FILE: &str = "LLD_FILE";
}

// ==========================================
// AppConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(rename = "BASE_DIR", default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
    #[serde(rename = "DATA_DIR")]
    pub data_dir: PathBuf,
    #[serde(rename = "TEMPLATES_DIR")]
    pub templates_dir: PathBuf,
    #[serde(rename = "LOGS_DIR")]
    pub logs_dir: PathBuf,
    /// 相对数据目录
    #[serde(rename = "SAVE_CONFIG_DIR")]
    pub save_config_dir: PathBuf,
    #[serde(rename = "LLD_FILE_NAME", default)]
    pub lld_file_name: Option<String>,
    #[serde(rename = "LLD_FILE", default)]
    pub lld_file: Option<PathBuf>,
    /// 型号 → 模板文件
    #[serde(default)]
    pub template_name: BTreeMap<String, String>,
    /// 型号前缀 → 型号族（按文件中的顺序匹配）
    #[serde(default)]
    pub model_mapping: Mapping,

    #[serde(skip)]
    settings_dir: PathBuf,
}

impl AppConfig {
    /// 从 settings 目录加载 settings.yaml
    ///
    /// # 返回
    /// - Err(FileNotFound): settings.yaml 不存在
    /// - Err(Yaml): 格式错误或缺少必填项
    pub fn load(settings_dir: &Path) -> ConfigResult<Self> {
        let path = settings_dir.join(SETTINGS_FILE);
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(&path).map_err(|e| ConfigError::io(&path, e))?;
        let mut config: AppConfig =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::yaml(&path, e))?;
        config.settings_dir = settings_dir.to_path_buf();
        debug!(path = %path.display(), "settings.yaml 已加载");
        Ok(config)
    }

    pub fn settings_dir(&self) -> &Path {
        &self.settings_dir
    }

    pub fn settings_file(&self) -> PathBuf {
        self.settings_dir.join(SETTINGS_FILE)
    }

    /// 根目录（未配置时为当前工作目录）
    pub fn base_dir(&self) -> ConfigResult<PathBuf> {
        match &self.base_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().map_err(|e| ConfigError::io(Path::new("."), e)),
        }
    }

    /// 数据目录（不存在时创建）
    pub fn data_dir(&self) -> ConfigResult<PathBuf> {
        let dir = self.base_dir()?.join(&self.data_dir);
        ensure_dir(&dir)?;
        Ok(dir)
    }

    pub fn templates_dir(&self) -> ConfigResult<PathBuf> {
        Ok(self.base_dir()?.join(&self.templates_dir))
    }

    /// 日志目录（不存在时创建）
    pub fn logs_dir(&self) -> ConfigResult<PathBuf> {
        let dir = self.base_dir()?.join(&self.logs_dir);
        ensure_dir(&dir)?;
        Ok(dir)
    }

    /// 设备配置输出目录（数据目录下）
    pub fn save_config_dir(&self) -> ConfigResult<PathBuf> {
        Ok(self.data_dir()?.join(&self.save_config_dir))
    }

    /// LLD 文件路径
    ///
    /// # 规则
    /// - LLD_FILE 优先
    /// - 否则 数据目录/LLD_FILE_NAME
    /// - 都未配置时报错
    pub fn lld_file(&self) -> ConfigResult<PathBuf> {
        if let Some(file) = self.lld_file.as_ref().filter(|f| !f.as_os_str().is_empty()) {
            return Ok(file.clone());
        }
        match self.lld_file_name.as_deref().filter(|n| !n.trim().is_empty()) {
            Some(name) => Ok(self.data_dir()?.join(name)),
            None => Err(ConfigError::MissingLldFile),
        }
    }

    /// 型号映射（保持配置文件中的顺序）
    pub fn model_mapping(&self) -> Vec<(String, String)> {
        self.model_mapping
            .iter()
            .filter_map(|(k, v)| Some((value_to_string(k)?, value_to_string(v)?)))
            .collect()
    }

    /// 型号对应的模板文件（未配置时使用默认模板）
    pub fn template_for(&self, model: &str) -> &str {
        self.template_name
            .get(model)
            .map(String::as_str)
            .unwrap_or(DEFAULT_TEMPLATE)
    }

    /// 写入 LLD 文件名
    pub fn update_lld_name(&mut self, name: &str) -> ConfigResult<PathBuf> {
        self.update_key(keys::LLD_FILE_NAME, Value::String(name.to_string()))?;
        self.lld_file_name = Some(name.to_string());
        Ok(self.settings_file())
    }

    /// 写入 LLD 文件路径
    pub fn update_lld_file(&mut self, file: &Path) -> ConfigResult<PathBuf> {
        let text = file.display().to_string();
        self.update_key(keys::LLD_FILE, Value::String(text))?;
        self.lld_file = Some(file.to_path_buf());
        Ok(self.settings_file())
    }

    /// 更新单个键并回写，保留文件中的其他键
    fn update_key(&self, key: &str, value: Value) -> ConfigResult<()> {
        let path = self.settings_file();
        let content = fs::read_to_string(&path).map_err(|e| ConfigError::io(&path, e))?;
        let mut document: Value =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::yaml(&path, e))?;
        let Some(mapping) = document.as_mapping_mut() else {
            return Err(ConfigError::InvalidValue(format!(
                "{} 顶层必须是映射",
                path.display()
            )));
        };
        mapping.insert(Value::String(key.to_string()), value);

        let output = serde_yaml::to_string(&document).map_err(|e| ConfigError::yaml(&path, e))?;
        fs::write(&path, output).map_err(|e| ConfigError::io(&path, e))?;
        info!(path = %path.display(), key, "settings.yaml 已更新");
        Ok(())
    }
}

fn ensure_dir(dir: &Path) -> ConfigResult<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| ConfigError::io(dir, e))?;
    }
    Ok(())
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
