// ==========================================
// LLD 配置生成工具 - 设备级记录
// ==========================================
// 依据: 4.1 设备初始化配置 / 3.5 VRF规划 / 3.4 Loopback规划
// 职责: Basic / SNMP / VRF / Loopback / NetConf 记录及其构造规则
// ==========================================

use crate::domain::fields::{Fields, FromFields, RecordError};
use crate::domain::netaddr::{ipv4_host_token, is_integer};
use crate::domain::types::{is_blank_value, RecordKind};
use serde::{Deserialize, Serialize};

/// 默认管理网段掩码
pub const DEFAULT_MANAGE_MASK: &str = "255.255.255.0";

/// SNMP trap 默认 UDP 端口
pub const DEFAULT_SNMP_UDP_PORT: u16 = 10162;

/// SNMP 可接受的版本写法
pub const SNMP_VERSIONS: [&str; 4] = ["SNMPV3", "SNMPV2c", "v2c", "v3"];

// ==========================================
// 设备基础管理信息 (Basic)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicConfig {
    pub device_name: String,
    pub manage_ip: String,
    pub manage_pro: String,
    pub manage_user: String,
    pub manage_pass: String,
    pub manage_vlan: Option<String>,
    pub manage_mask: String,
    pub option_manage_mode: bool,
    pub option_manage_vrf: bool,
    pub manage_vrf_name: Option<String>,
    pub manage_int: Option<String>,
    pub option_manage_gw: bool,
    pub manage_gw_ip: Option<String>,
    pub sftp: bool,
}

impl BasicConfig {
    /// 叠加 DevConfig 中的管理面设置
    pub fn apply_manage_settings(
        &mut self,
        manage_gw_ip: Option<&str>,
        manage_vrf_name: Option<&str>,
        option_manage_mode: bool,
        sftp: bool,
    ) {
        if let Some(gw) = manage_gw_ip.filter(|v| !v.trim().is_empty()) {
            self.option_manage_gw = true;
            self.manage_gw_ip = Some(gw.to_string());
        }
        if let Some(vrf) = manage_vrf_name.filter(|v| !v.trim().is_empty()) {
            self.option_manage_vrf = true;
            self.manage_vrf_name = Some(vrf.to_string());
        }
        self.option_manage_mode = option_manage_mode;
        self.sftp = sftp;
    }
}

impl FromFields for BasicConfig {
    const KIND: RecordKind = RecordKind::Basic;
    const FIELDS: &'static [&'static str] = &[
        "device_name",
        "manage_vlan",
        "manage_ip",
        "manage_pro",
        "manage_user",
        "manage_pass",
    ];

    fn from_fields(fields: &Fields) -> Result<Self, RecordError> {
        Ok(Self {
            device_name: fields.required("device_name")?,
            manage_ip: fields.required("manage_ip")?,
            manage_pro: fields.required("manage_pro")?,
            manage_user: fields.required("manage_user")?,
            manage_pass: fields.required("manage_pass")?,
            manage_vlan: fields.text("manage_vlan"),
            manage_mask: DEFAULT_MANAGE_MASK.to_string(),
            option_manage_mode: false,
            option_manage_vrf: false,
            manage_vrf_name: None,
            manage_int: None,
            option_manage_gw: false,
            manage_gw_ip: None,
            sftp: false,
        })
    }
}

// ==========================================
// SNMP 配置 (SNMP)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnmpConfig {
    pub version: String,
    pub user: String,
    pub authentication_protocol: Option<String>,
    pub authentication_pass: Option<String>,
    pub encryption_protocol: Option<String>,
    pub encryption_pass: Option<String>,
    pub port: Option<String>,
    pub read_community: Option<String>,
    pub write_community: Option<String>,
    pub target_host: Option<String>,
    pub udp_port: u16,
    pub target_host_host_name: Option<String>,
    pub option_target: bool,
}

impl FromFields for SnmpConfig {
    const KIND: RecordKind = RecordKind::Snmp;
    const FIELDS: &'static [&'static str] = &[
        "version",
        "user",
        "authentication_protocol",
        "authentication_pass",
        "encryption_protocol",
        "encryption_pass",
        "port",
        "read_community",
        "write_community",
        "target_host",
        "udp_port",
    ];

    /// # 规则
    /// - 版本必须为 SNMPV3 / SNMPV2c / v2c / v3
    /// - v2 系列: 读团体字或写团体字至少一个有值
    /// - v3 系列: 认证密码或加密密码至少一个有值，版本统一为 v3 且清空团体字
    /// - 配置了 trap 目标主机时生成 host_name 标识
    fn from_fields(fields: &Fields) -> Result<Self, RecordError> {
        let version = fields.required("version")?;
        if !SNMP_VERSIONS.contains(&version.as_str()) {
            return Err(RecordError::invalid(
                "version",
                &version,
                "仅支持 SNMPV3 / SNMPV2c / v2c / v3",
            ));
        }

        let mut read_community = fields.text("read_community");
        let mut write_community = fields.text("write_community");
        let authentication_pass = fields.text("authentication_pass");
        let encryption_pass = fields.text("encryption_pass");
        let has_value = |v: &Option<String>| v.as_deref().is_some_and(|s| !is_blank_value(s));

        let version = if version.contains('2') {
            if !has_value(&read_community) && !has_value(&write_community) {
                return Err(RecordError::Rule(
                    "SNMP v2c 必须配置读团体字或写团体字".to_string(),
                ));
            }
            version
        } else {
            if !has_value(&authentication_pass) && !has_value(&encryption_pass) {
                return Err(RecordError::Rule(
                    "SNMP v3 必须配置认证密码或加密密码".to_string(),
                ));
            }
            read_community = None;
            write_community = None;
            "v3".to_string()
        };

        let target_host = fields.present("target_host");
        let target_host_host_name = match &target_host {
            Some(host) => Some(ipv4_host_token(host)?),
            None => None,
        };
        let udp_port = match fields.present("udp_port") {
            Some(port) => port
                .parse::<u16>()
                .map_err(|_| RecordError::invalid("udp_port", &port, "不是合法端口"))?,
            None => DEFAULT_SNMP_UDP_PORT,
        };

        Ok(Self {
            version,
            user: fields.required("user")?,
            authentication_protocol: fields.text("authentication_protocol"),
            authentication_pass,
            encryption_protocol: fields.text("encryption_protocol"),
            encryption_pass,
            port: fields.text("port"),
            read_community,
            write_community,
            option_target: target_host.is_some(),
            target_host,
            udp_port,
            target_host_host_name,
        })
    }
}

// ==========================================
// VRF 规划 (VRF)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VrfConfig {
    pub vrf_name: String,
    pub vrf_rd: String,
    pub option_vrf_v6: bool,
    pub vrf_v6: Option<String>,
    pub option_vrf_rt: bool,
    pub vrf_rt: Option<String>,
}

impl FromFields for VrfConfig {
    const KIND: RecordKind = RecordKind::Vrf;
    const FIELDS: &'static [&'static str] = &["vrf_name", "vrf_rd", "vrf_v6", "vrf_rt"];

    fn from_fields(fields: &Fields) -> Result<Self, RecordError> {
        let vrf_v6 = fields.text("vrf_v6");
        let vrf_rt = fields.text("vrf_rt");
        Ok(Self {
            vrf_name: fields.required("vrf_name")?,
            vrf_rd: fields.required("vrf_rd")?,
            option_vrf_v6: fields.present("vrf_v6").is_some(),
            vrf_v6,
            option_vrf_rt: fields.present("vrf_rt").is_some(),
            vrf_rt,
        })
    }
}

// ==========================================
// Loopback 规划 (Loopback)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopbackConfig {
    pub ip: String,
    pub mask: String,
    pub id: String,
}

impl FromFields for LoopbackConfig {
    const KIND: RecordKind = RecordKind::Loopback;
    const FIELDS: &'static [&'static str] = &["ip", "mask", "id"];

    fn from_fields(fields: &Fields) -> Result<Self, RecordError> {
        let id = fields.required("id")?;
        // 整数编号统一为无小数的文本
        let id = if is_integer(&id) {
            id.trim().parse::<i64>().map(|n| n.to_string()).unwrap_or(id)
        } else {
            id
        };
        Ok(Self {
            ip: fields.required("ip")?,
            mask: fields.required("mask")?,
            id,
        })
    }
}

// ==========================================
// NetConf 账号 (NetConf)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetConfConfig {
    pub user: String,
    pub password: String,
}

impl FromFields for NetConfConfig {
    const KIND: RecordKind = RecordKind::NetConf;
    const FIELDS: &'static [&'static str] = &["user", "password"];

    fn from_fields(fields: &Fields) -> Result<Self, RecordError> {
        Ok(Self {
            user: fields.required("user")?,
            password: fields.required("password")?,
        })
    }
}
