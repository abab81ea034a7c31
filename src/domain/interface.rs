// ==========================================
// LLD 配置生成工具 - 接口类记录
// ==========================================
// 依据: 3.8 二层对接 / 3.9 三层对接 / 3.13 服务器对接
// 职责: 二层/下联接口与三层接口记录及其构造规则
// ==========================================

use crate::domain::fields::{Fields, FromFields, RecordError};
use crate::domain::netaddr::{format_number_ranges, is_integer};
use crate::domain::types::{is_blank_value, RecordKind};
use serde::{Deserialize, Serialize};

/// 支持的端口模式
pub const PORT_MODES: [&str; 3] = ["trunk", "access", "hybrid"];

/// 缺省 PVID / untag VLAN
pub const DEFAULT_VLAN: &str = "1";

// ==========================================
// 二层接口 (L2 / Downlink Interface)
// ==========================================
// 二层互联与服务器下联共用同一记录结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceConfig {
    pub phy: String,
    pub eth_trunk: Option<String>,
    pub m_lag_id: Option<String>,
    pub int_type: Option<String>,
    pub trunk_vlan: Option<String>,
    pub pvid: String,
    pub untag_vlan: String,
    pub lacp_mode: Option<String>,
    pub lacp_timeout_mode: bool,
    pub force_up: bool,
    pub description: Option<String>,
    pub option_vray: bool,
    pub option_eth_trunk: bool,
    pub option_mlag: bool,
}

/// "-" / "NA" / 缺失 视为无效 VLAN 取值
fn is_invalid_vlan_value(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => v == "-" || v == "NA",
    }
}

/// 整数取值转文本，否则回落到缺省 VLAN
fn int_text_or_default(value: Option<&str>) -> String {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .map(|n| n.to_string())
        .unwrap_or_else(|| DEFAULT_VLAN.to_string())
}

impl FromFields for InterfaceConfig {
    const KIND: RecordKind = RecordKind::L2Interface;
    const FIELDS: &'static [&'static str] = &[
        "phy",
        "eth_trunk",
        "m_lag_id",
        "int_type",
        "trunk_vlan",
        "pvid",
        "untag_vlan",
        "lacp_mode",
        "lacp_timeout_mode",
        "force_up",
        "description",
    ];

    /// # 规则
    /// - trunk_vlan 经范围规范化（无法解析时置空）
    /// - trunk_vlan / pvid / untag_vlan 全部无效时关闭 VLAN 下发 (option_vray)
    /// - 端口模式小写后必须为 trunk/access/hybrid，否则关闭 VLAN 下发
    /// - lacp 模式仅接受纯字母，否则视为关闭
    /// - 无 PVID 列的 access 口以 trunk_vlan 作为 PVID
    fn from_fields(fields: &Fields) -> Result<Self, RecordError> {
        let phy = fields.required("phy")?;

        let trunk_vlan = match fields.text("trunk_vlan") {
            Some(raw) if !raw.is_empty() => format_number_ranges(&raw),
            other => other,
        };
        let pvid_raw = fields.text("pvid");
        let untag_raw = fields.text("untag_vlan");

        let mut option_vray = !(is_invalid_vlan_value(trunk_vlan.as_deref())
            && is_invalid_vlan_value(pvid_raw.as_deref())
            && is_invalid_vlan_value(untag_raw.as_deref()));

        let int_type = match fields.text("int_type") {
            Some(raw) if !raw.is_empty() => {
                let lower = raw.to_lowercase();
                if PORT_MODES.contains(&lower.as_str()) {
                    Some(lower)
                } else {
                    option_vray = false;
                    Some(raw)
                }
            }
            other => other,
        };

        let eth_trunk = fields.text("eth_trunk");
        let option_eth_trunk = eth_trunk.as_deref().is_some_and(is_integer);

        let lacp_mode = fields
            .text("lacp_mode")
            .filter(|m| !m.is_empty() && m.chars().all(char::is_alphabetic))
            .map(|m| m.to_lowercase());

        let pvid_source = if !fields.contains("pvid") && int_type.as_deref() == Some("access") {
            trunk_vlan.clone()
        } else {
            pvid_raw
        };

        let m_lag_id = fields.text("m_lag_id");
        let option_mlag = m_lag_id.as_deref().is_some_and(is_integer);

        Ok(Self {
            phy,
            eth_trunk,
            m_lag_id,
            int_type,
            trunk_vlan,
            pvid: int_text_or_default(pvid_source.as_deref()),
            untag_vlan: int_text_or_default(untag_raw.as_deref()),
            lacp_mode,
            lacp_timeout_mode: fields.flag("lacp_timeout_mode"),
            force_up: fields.flag("force_up"),
            description: fields.text("description"),
            option_vray,
            option_eth_trunk,
            option_mlag,
        })
    }
}

// ==========================================
// 三层接口 (L3 Interface)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct L3InterfaceConfig {
    pub phy: String,
    pub ip: String,
    pub mask: String,
    pub vrf: Option<String>,
    pub option_vrf: bool,
    pub mac_add: Option<String>,
    pub vid: Option<i64>,
    pub option_mac_add: bool,
}

impl L3InterfaceConfig {
    /// VLANIF 接口（参与虚拟 MAC 分配）
    pub fn is_vlanif(&self) -> bool {
        self.phy.starts_with("Vlanif")
    }

    /// VLAN 类接口（渲染时与物理口分组）
    pub fn is_vlan_interface(&self) -> bool {
        self.phy.starts_with("Vlan")
    }

    /// 有效接口地址
    pub fn address(&self) -> Option<&str> {
        Some(self.ip.as_str()).filter(|ip| !is_blank_value(ip))
    }

    pub fn assign_mac(&mut self, mac: Option<String>) {
        self.option_mac_add = mac.is_some();
        self.mac_add = mac;
    }
}

impl FromFields for L3InterfaceConfig {
    const KIND: RecordKind = RecordKind::L3Interface;
    const FIELDS: &'static [&'static str] = &["phy", "ip", "mask", "vrf", "vid"];

    fn from_fields(fields: &Fields) -> Result<Self, RecordError> {
        let vrf = fields.text("vrf");
        let option_vrf = fields.present("vrf").is_some_and(|v| v != "public");
        Ok(Self {
            phy: fields.required("phy")?,
            ip: fields.required("ip")?,
            mask: fields.required("mask")?,
            vrf,
            option_vrf,
            mac_add: None,
            vid: fields.int("vid"),
            option_mac_add: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::FieldValue;

    fn l2_fields() -> Fields {
        Fields::new()
            .with("phy", "10GE1/0/1")
            .with("eth_trunk", "10")
            .with("int_type", "Trunk")
            .with("trunk_vlan", "1-3,5,7-9")
            .with("m_lag_id", "-")
    }

    #[test]
    fn test_interface_trunk_vlan_normalized() {
        let int = InterfaceConfig::from_fields(&l2_fields()).unwrap();
        assert_eq!(int.trunk_vlan.as_deref(), Some("1 to 3 5 7 to 9"));
        assert_eq!(int.int_type.as_deref(), Some("trunk"));
        assert!(int.option_vray);
        assert!(int.option_eth_trunk);
        assert!(!int.option_mlag);
        assert_eq!(int.pvid, DEFAULT_VLAN);
        assert_eq!(int.lacp_mode, None);
    }

    #[test]
    fn test_interface_all_vlan_invalid_disables_vray() {
        let int = InterfaceConfig::from_fields(
            &l2_fields()
                .with("trunk_vlan", "-")
                .with("pvid", "NA")
                .with("untag_vlan", FieldValue::Null),
        )
        .unwrap();
        assert!(!int.option_vray);
        assert_eq!(int.trunk_vlan, None);
    }

    #[test]
    fn test_interface_unknown_mode_disables_vray() {
        let int = InterfaceConfig::from_fields(&l2_fields().with("int_type", "dot1q")).unwrap();
        assert!(!int.option_vray);
        assert_eq!(int.int_type.as_deref(), Some("dot1q"));
    }

    #[test]
    fn test_access_port_pvid_from_trunk_vlan() {
        let int = InterfaceConfig::from_fields(
            &l2_fields().with("int_type", "access").with("trunk_vlan", "100"),
        )
        .unwrap();
        assert_eq!(int.pvid, "100");
    }

    #[test]
    fn test_downlink_lacp_and_flags() {
        let int = InterfaceConfig::from_fields(
            &l2_fields()
                .with("lacp_mode", "Static")
                .with("lacp_timeout_mode", true)
                .with("force_up", false)
                .with("pvid", "20")
                .with("untag_vlan", "x")
                .with("m_lag_id", "3"),
        )
        .unwrap();
        assert_eq!(int.lacp_mode.as_deref(), Some("static"));
        assert!(int.lacp_timeout_mode);
        assert!(!int.force_up);
        assert_eq!(int.pvid, "20");
        assert_eq!(int.untag_vlan, DEFAULT_VLAN);
        assert!(int.option_mlag);

        let numeric_lacp =
            InterfaceConfig::from_fields(&l2_fields().with("lacp_mode", "-")).unwrap();
        assert_eq!(numeric_lacp.lacp_mode, None);
    }

    #[test]
    fn test_l3_interface_vrf_flag() {
        let base = Fields::new()
            .with("phy", "Vlanif100")
            .with("ip", "10.0.0.1")
            .with("mask", "30")
            .with("vid", FieldValue::Null);

        let public = L3InterfaceConfig::from_fields(&base.clone().with("vrf", "public")).unwrap();
        assert!(!public.option_vrf);
        assert!(public.is_vlanif());

        let vpn = L3InterfaceConfig::from_fields(&base.with("vrf", "vpn1")).unwrap();
        assert!(vpn.option_vrf);
        assert_eq!(vpn.vid, None);
    }
}
