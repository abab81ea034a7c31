// ==========================================
// LLD 配置生成工具 - 设备补充配置 (DevConfig.yaml)
// ==========================================
// 职责: 补充 LLD 中没有的数据（管理网关 / SNMP 目标 / 设备清单 / 功能开关）
// 存储: <settings 目录>/DevConfig.yaml
// 红线: 功能开关默认全部开启，缺失字段取默认值
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::device::DEFAULT_SNMP_UDP_PORT;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub const DEV_CONFIG_FILE: &str = "DevConfig.yaml";

// ==========================================
// 各配置段
// ==========================================

/// 管理面补充配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicSettings {
    pub manage_vrf_name: Option<String>,
    pub option_manage_mode: bool,
    pub manage_gw_ip: Option<String>,
    pub sftp: bool,
}

/// SNMP trap 目标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnmpSettings {
    pub target_host: Option<String>,
    pub udp_port: u16,
    pub target_host_host_name: Option<String>,
}

impl Default for SnmpSettings {
    fn default() -> Self {
        Self {
            target_host: None,
            udp_port: DEFAULT_SNMP_UDP_PORT,
            target_host_host_name: None,
        }
    }
}

/// 配置段开关
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionSettings {
    pub option_vrf: bool,
    pub option_snmp: bool,
    pub option_mlag: bool,
    pub option_batch_vlan: bool,
    pub option_global_vlan: bool,
    pub option_gw: bool,
    pub option_l3_vlan: bool,
    pub option_l3_phy: bool,
    pub option_ndi_l2: bool,
    pub option_server_int: bool,
    pub option_netconf: bool,
    pub option_look_back: bool,
    pub option_static_route: bool,
    pub option_bfd: bool,
}

impl Default for OptionSettings {
    fn default() -> Self {
        Self {
            option_vrf: true,
            option_snmp: true,
            option_mlag: true,
            option_batch_vlan: true,
            option_global_vlan: true,
            option_gw: true,
            option_l3_vlan: true,
            option_l3_phy: true,
            option_ndi_l2: true,
            option_server_int: true,
            option_netconf: true,
            option_look_back: true,
            option_static_route: true,
            option_bfd: true,
        }
    }
}

// ==========================================
// DevConfig
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevConfig {
    pub basic_config: BasicSettings,
    pub snmp_config: SnmpSettings,
    pub ci_name_list: Vec<String>,
    pub option_config: OptionSettings,
}

impl DevConfig {
    /// 以默认值和设备清单构造（init 使用）
    pub fn with_devices(ci_name_list: Vec<String>) -> Self {
        Self {
            ci_name_list,
            ..Self::default()
        }
    }

    /// 加载 DevConfig.yaml
    ///
    /// # 返回
    /// - Err(FileNotFound): 尚未执行 init
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let config: DevConfig =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::yaml(path, e))?;
        debug!(
            path = %path.display(),
            devices = config.ci_name_list.len(),
            "DevConfig.yaml 已加载"
        );
        Ok(config)
    }

    /// 生成带说明注释的 YAML 文本
    pub fn to_commented_yaml(&self) -> ConfigResult<String> {
        let basic = section("basic_config", &self.basic_config)?;
        let snmp = section("snmp_config", &self.snmp_config)?;
        let devices = section("ci_name_list", &self.ci_name_list)?;
        let options = section("option_config", &self.option_config)?;

        Ok(format!(
            "# 该配置文件主要用于补充LLD内没有的数据，以下是配置项的说明，以及用法。\n\
             # basic配置项说明\n\
             # manage_gw_ip：设备管理地址的网关\n\
             # manage_vrf_name：设备管理地址所绑定的VRF\n\
             # option_manage_mode：设备管理模式，false是带外管理，管理IP配置在MEth接口；true则使用LLD中的vlan_id生成vlanif接口，管理IP配置在vlanif接口下面。\n\
             # sftp：是否开启sftp功能，false不开启。\n\
             \n{basic}\n\
             # snmp配置项说明\n\
             # target_host：esight主机地址，或者运维平台地址\n\
             # target_host_host_name：host name 字符串，不支持空格，区分大小写，长度范围是1～32。不配置时使用管理地址计算出的字符串填充。\n\
             # udp_port：运维主机端口号\n\
             \n{snmp}\n\
             # ci_name_list：通过LLD解析出来可以生成配置的设备，可以删减以生成指定设备的配置，只能从该列表内进行选择，默认包含除防火墙外的所有网络设备。\n\
             \n{devices}\n\
             # option配置项说明：各配置段开关，false 表示不生成该段配置。\n\
             \n{options}"
        ))
    }

    /// 写入 DevConfig.yaml（覆盖已有文件）
    pub fn write(&self, path: &Path) -> ConfigResult<()> {
        let content = self.to_commented_yaml()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }
        fs::write(path, content).map_err(|e| ConfigError::io(path, e))?;
        info!(path = %path.display(), devices = self.ci_name_list.len(), "DevConfig.yaml 已写入");
        Ok(())
    }
}

/// 把单个配置段序列化为以 key 为根的 YAML
fn section<T: Serialize>(key: &str, value: &T) -> ConfigResult<String> {
    let to_invalid = |e: serde_yaml::Error| ConfigError::InvalidValue(format!("{}: {}", key, e));
    let mut root = Mapping::new();
    root.insert(
        Value::String(key.to_string()),
        serde_yaml::to_value(value).map_err(to_invalid)?,
    );
    serde_yaml::to_string(&root).map_err(to_invalid)
}
