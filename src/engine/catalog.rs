// ==========================================
// LLD 配置生成工具 - 表目录
// ==========================================
// 依据: LLD 规划表 sheet 命名 / 区域标记 / 列名约定
// 职责: 每种记录的 表区域 + 过滤条件 + 表头结构 + 映射规则
// 红线: 工作簿约定只在本文件出现，其他模块不写死列名
// ==========================================

use crate::domain::table::{RowFilter, TableRegion};
use crate::domain::table_head::{
    derived, BasicTableHead, BfdTableHead, DownlinkTableHead, GatewayTableHead,
    GlobalVlanTableHead, L2InterfaceTableHead, L3InterfaceTableHead, LoopbackTableHead,
    MlagTableHead, NetConfTableHead, SnmpTableHead, StaticRouteTableHead, VrfTableHead,
};
use crate::importer::field_mapper::{FailurePolicy, FieldGroup, FieldMapping};

// ==========================================
// Sheet 名称与区域标记
// ==========================================
pub const SHEET_DEVICE_INIT: &str = "4.1 设备初始化配置";
pub const SHEET_MLAG: &str = "3.2.1 M-lag规划";
pub const SHEET_VRF: &str = "3.5 VRF规划";
pub const SHEET_IP_VLAN: &str = "3.1.1 IP&VLAN规划(二层组网)";
pub const SHEET_L3_INTERCONNECT: &str = "3.9 网络设备对接信息规划_三层";
pub const SHEET_L2_INTERCONNECT: &str = "3.8 网络设备对接信息规划_二层";
pub const SHEET_SERVER_DOWNLINK: &str = "3.13 服务器对接信息规划";
pub const SHEET_LOOPBACK: &str = "3.4 Loopback规划";
pub const SHEET_STATIC_ROUTE: &str = "3.12 静态路由规划";

pub const MARKER_MANAGE_INFO: &str = "2、网络&存储设备管理信息";
pub const MARKER_STORAGE_MANAGE_INFO: &str = "3、分布式存储设备管理信息";
pub const MARKER_NETCONF: &str = "4、netconf协议";
pub const MARKER_OPENSTACK: &str = "5、对接openstack";

/// 仅 ssh 登录的设备参与配置生成
pub const LOGIN_PROTOCOL_COLUMN: &str = "登录协议";
pub const LOGIN_PROTOCOL_SSH: &str = "ssh";

// ==========================================
// 表规格 (Table Spec)
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    pub region: TableRegion,
    pub filter: Option<RowFilter>,
}

impl TableSpec {
    fn whole_sheet(sheet_name: &str) -> Self {
        Self {
            region: TableRegion::whole_sheet(sheet_name),
            filter: None,
        }
    }
}

/// 设备管理信息区域（Basic / SNMP 共用）
pub fn manage_info_table() -> TableSpec {
    TableSpec {
        region: TableRegion::between(
            SHEET_DEVICE_INIT,
            MARKER_MANAGE_INFO,
            Some(MARKER_STORAGE_MANAGE_INFO),
            1,
        ),
        filter: Some(RowFilter::equals(LOGIN_PROTOCOL_COLUMN, LOGIN_PROTOCOL_SSH)),
    }
}

pub fn netconf_table() -> TableSpec {
    TableSpec {
        region: TableRegion::between(SHEET_DEVICE_INIT, MARKER_NETCONF, Some(MARKER_OPENSTACK), 0),
        filter: None,
    }
}

pub fn mlag_table() -> TableSpec {
    TableSpec::whole_sheet(SHEET_MLAG)
}

pub fn vrf_table() -> TableSpec {
    TableSpec::whole_sheet(SHEET_VRF)
}

/// IP&VLAN 规划（Gateway / GlobalVlan 共用）
pub fn ip_vlan_table() -> TableSpec {
    TableSpec::whole_sheet(SHEET_IP_VLAN)
}

pub fn l3_interface_table() -> TableSpec {
    TableSpec::whole_sheet(SHEET_L3_INTERCONNECT)
}

pub fn l2_interface_table() -> TableSpec {
    TableSpec::whole_sheet(SHEET_L2_INTERCONNECT)
}

pub fn downlink_table() -> TableSpec {
    TableSpec::whole_sheet(SHEET_SERVER_DOWNLINK)
}

pub fn loopback_table() -> TableSpec {
    TableSpec::whole_sheet(SHEET_LOOPBACK)
}

/// 静态路由规划（StaticRoute / BFD 共用）
pub fn static_route_table() -> TableSpec {
    TableSpec::whole_sheet(SHEET_STATIC_ROUTE)
}

// ==========================================
// 表头结构
// ==========================================

pub fn basic_head() -> BasicTableHead {
    BasicTableHead {
        ci_name: derived("ci_name"),
        device_name: "设备名称".to_string(),
        manage_ip: "BMC IP".to_string(),
        manage_pass: "登录密码".to_string(),
        manage_pro: LOGIN_PROTOCOL_COLUMN.to_string(),
        manage_user: "登录账号".to_string(),
        manage_vlan: "BMC VLAN".to_string(),
    }
}

pub fn snmp_head() -> SnmpTableHead {
    SnmpTableHead {
        ci_name: derived("ci_name"),
        device_name: "设备名称".to_string(),
        manage_ip: "BMC IP".to_string(),
        version: "SNMP版本".to_string(),
        user: "用户名".to_string(),
        authentication_protocol: "认证协议".to_string(),
        authentication_pass: "认证密码".to_string(),
        encryption_protocol: "数据加密协议".to_string(),
        encryption_pass: "加密密码".to_string(),
        port: "端口".to_string(),
        read_community: "读团体字".to_string(),
        write_community: "写团体字".to_string(),
        target_host: derived("target_host"),
        udp_port: derived("udp_port"),
    }
}

pub fn mlag_head() -> MlagTableHead {
    MlagTableHead {
        ci_name: "CI NAME".to_string(),
        dad_ip: "DAD互联IP".to_string(),
        dad_mask: "DAD子网掩码".to_string(),
        dad_phy: "DAD链路".to_string(),
        dad_vrf: "DAD VRF".to_string(),
        dev_group_id: "设备组ID".to_string(),
        dfs_group: "DFS-Group ID".to_string(),
        eth_trunk_id: "Eth-Trunk ID".to_string(),
        peer_link: "Peer-Link".to_string(),
        peer_link_phy: "Peer-Link物理口".to_string(),
        priority: "priority".to_string(),
        v_stp_br_add_mac: "Stp-bridge-address MAC".to_string(),
    }
}

pub fn vrf_head() -> VrfTableHead {
    VrfTableHead {
        ci_name: "CI NAME".to_string(),
        vrf_name: "VRF".to_string(),
        vrf_rd: "route-distinguisher".to_string(),
        vrf_v6: "VRFv6".to_string(),
        vrf_rt: "vpn-target".to_string(),
    }
}

pub fn gateway_head() -> GatewayTableHead {
    GatewayTableHead {
        ci_name: derived("ci_name"),
        dev_ci_name: "网关设备CI NAME".to_string(),
        gw_ip: "网关".to_string(),
        gw_local_ip: "local ip".to_string(),
        gw_mac: "VLAN MAC".to_string(),
        gw_network: "网段/掩码".to_string(),
        gw_mask: derived("gw_mask"),
        gw_type: "网关类型".to_string(),
        gw_vrf: "VRF".to_string(),
        net_plane: "网络平面名称".to_string(),
        vlan_id: "VLAN ID".to_string(),
        vrrp_vrid: derived("vrrp_vrid"),
    }
}

pub fn global_vlan_head() -> GlobalVlanTableHead {
    GlobalVlanTableHead {
        dev_ci_name: "网关设备CI NAME".to_string(),
        vlan_id: "VLAN ID".to_string(),
        net_plane: "网络平面名称".to_string(),
    }
}

pub fn l2_interface_head() -> L2InterfaceTableHead {
    L2InterfaceTableHead {
        local_ci_name: "本端CI NAME".to_string(),
        local_phy: "本端物理端口".to_string(),
        local_eth: "本端Eth-Trunk ID".to_string(),
        local_int_type: "本端端口模式".to_string(),
        local_trunk_vlan: "本端透传VLAN".to_string(),
        local_m_lag_id: "本端M-lag ID".to_string(),
        local_description: derived("local_description"),
        remote_ci_name: "对端CI NAME".to_string(),
        remote_phy: "对端物理端口".to_string(),
        remote_eth: "对端Eth-Trunk ID".to_string(),
        remote_int_type: "对端端口模式".to_string(),
        remote_trunk_vlan: "对端透传VLAN".to_string(),
        remote_m_lag_id: "对端M-lag ID".to_string(),
        remote_description: derived("remote_description"),
    }
}

pub fn l3_interface_head() -> L3InterfaceTableHead {
    L3InterfaceTableHead {
        local_ci_name: "本端CI NAME".to_string(),
        local_ip_address: "本端IP".to_string(),
        local_logical_port: "本端逻辑端口".to_string(),
        local_vrf: "本端VRF".to_string(),
        local_mask: derived("local_mask"),
        remote_ci_name: "对端CI NAME".to_string(),
        remote_ip_address: "对端IP".to_string(),
        remote_logical_port: "对端逻辑端口".to_string(),
        remote_vrf: "对端VRF".to_string(),
        remote_mask: derived("remote_mask"),
        vid: derived("vid"),
    }
}

pub fn downlink_head() -> DownlinkTableHead {
    DownlinkTableHead {
        local_ci_name: "本端CI NAME".to_string(),
        local_phy: "本端物理端口".to_string(),
        local_logical_port: "本端逻辑端口".to_string(),
        local_m_lag_id: "M-lag ID".to_string(),
        int_type: "本端端口模式".to_string(),
        lacp_mode: "lacp mode".to_string(),
        lacp_timeout_mode: "lacp timeout mode".to_string(),
        force_up: "是否force-up".to_string(),
        trunk_vlan: "Trunk Vlan".to_string(),
        pvid: "PVID".to_string(),
        untag_vlan: "UNTAG VLAN".to_string(),
        remote_ci_name: "对端CI NAME".to_string(),
        remote_phy: "对端物理端口".to_string(),
        description: derived("description"),
    }
}

pub fn netconf_head() -> NetConfTableHead {
    NetConfTableHead {
        net_conf_dev_name: "设备名称".to_string(),
        net_conf_user: "用户名".to_string(),
        net_conf_pass: "密码".to_string(),
    }
}

pub fn loopback_head() -> LoopbackTableHead {
    LoopbackTableHead {
        ci_name: "CI NAME".to_string(),
        id: "Loopback ID".to_string(),
        ip: "Loopback IP".to_string(),
        mask: "掩码".to_string(),
    }
}

pub fn static_route_head() -> StaticRouteTableHead {
    StaticRouteTableHead {
        ci_name: "CI NAME".to_string(),
        destination: "目的网络/掩码".to_string(),
        destination_net: derived("destination_net"),
        destination_mask: derived("destination_mask"),
        local_vrf: "VRF/安全域".to_string(),
        next_hop: "下一跳地址".to_string(),
        bfd: "关联".to_string(),
        priority: "路由优先级".to_string(),
        related_service: "关联服务/网元".to_string(),
        peer_ip: "NQA/BFD探测IP（目的IP）".to_string(),
        bfd_name: derived("bfd_name"),
    }
}

pub fn bfd_head() -> BfdTableHead {
    BfdTableHead {
        ci_name: "CI NAME".to_string(),
        discriminator_local: "BFD ID".to_string(),
        interface: "BFD单臂接口".to_string(),
        local_vrf: "VRF/安全域".to_string(),
        peer_ip: "NQA/BFD探测IP（目的IP）".to_string(),
        association: "关联".to_string(),
        related_service: "关联服务/网元".to_string(),
        bfd_name: derived("bfd_name"),
    }
}

// ==========================================
// 映射规则（分组键 → 值字段，规范名 → 记录字段名）
// ==========================================
// 失败策略: 静态路由与 BFD 只丢弃出错行，其余种类丢弃该设备的同类记录

pub const BASIC_MAPPING: FieldMapping = FieldMapping {
    groups: &[FieldGroup {
        key: "ci_name",
        fields: &[
            "device_name",
            "manage_vlan",
            "manage_ip",
            "manage_pro",
            "manage_user",
            "manage_pass",
        ],
    }],
    aliases: &[],
    on_failure: FailurePolicy::DropDevice,
};

pub const SNMP_MAPPING: FieldMapping = FieldMapping {
    groups: &[FieldGroup {
        key: "ci_name",
        fields: &[
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
        ],
    }],
    aliases: &[],
    on_failure: FailurePolicy::DropDevice,
};

pub const MLAG_MAPPING: FieldMapping = FieldMapping {
    groups: &[FieldGroup {
        key: "ci_name",
        fields: &[
            "dfs_group",
            "priority",
            "peer_link_phy",
            "eth_trunk_id",
            "peer_link",
            "dad_phy",
            "dad_vrf",
            "dad_ip",
            "dad_mask",
            "v_stp_br_add_mac",
        ],
    }],
    aliases: &[],
    on_failure: FailurePolicy::DropDevice,
};

pub const VRF_MAPPING: FieldMapping = FieldMapping {
    groups: &[FieldGroup {
        key: "ci_name",
        fields: &["vrf_name", "vrf_rd", "vrf_v6", "vrf_rt"],
    }],
    aliases: &[],
    on_failure: FailurePolicy::DropDevice,
};

pub const GATEWAY_MAPPING: FieldMapping = FieldMapping {
    groups: &[FieldGroup {
        key: "ci_name",
        fields: &[
            "vlan_id",
            "gw_vrf",
            "gw_ip",
            "gw_mask",
            "gw_type",
            "gw_local_ip",
            "gw_mac",
            "net_plane",
            "vrrp_vrid",
        ],
    }],
    aliases: &[("net_plane", "description")],
    on_failure: FailurePolicy::DropDevice,
};

pub const L2_INTERFACE_MAPPING: FieldMapping = FieldMapping {
    groups: &[
        FieldGroup {
            key: "local_ci_name",
            fields: &[
                "local_phy",
                "local_eth",
                "local_int_type",
                "local_trunk_vlan",
                "local_m_lag_id",
                "local_description",
            ],
        },
        FieldGroup {
            key: "remote_ci_name",
            fields: &[
                "remote_phy",
                "remote_eth",
                "remote_int_type",
                "remote_trunk_vlan",
                "remote_m_lag_id",
                "remote_description",
            ],
        },
    ],
    aliases: &[
        ("local_phy", "phy"),
        ("local_eth", "eth_trunk"),
        ("local_int_type", "int_type"),
        ("local_trunk_vlan", "trunk_vlan"),
        ("local_m_lag_id", "m_lag_id"),
        ("local_description", "description"),
        ("remote_phy", "phy"),
        ("remote_eth", "eth_trunk"),
        ("remote_int_type", "int_type"),
        ("remote_trunk_vlan", "trunk_vlan"),
        ("remote_m_lag_id", "m_lag_id"),
        ("remote_description", "description"),
    ],
    on_failure: FailurePolicy::DropDevice,
};

pub const L3_INTERFACE_MAPPING: FieldMapping = FieldMapping {
    groups: &[
        FieldGroup {
            key: "local_ci_name",
            fields: &[
                "local_logical_port",
                "local_vrf",
                "local_ip_address",
                "local_mask",
                "vid",
            ],
        },
        FieldGroup {
            key: "remote_ci_name",
            fields: &[
                "remote_logical_port",
                "remote_vrf",
                "remote_ip_address",
                "remote_mask",
                "vid",
            ],
        },
    ],
    aliases: &[
        ("local_logical_port", "phy"),
        ("local_vrf", "vrf"),
        ("local_ip_address", "ip"),
        ("local_mask", "mask"),
        ("remote_logical_port", "phy"),
        ("remote_vrf", "vrf"),
        ("remote_ip_address", "ip"),
        ("remote_mask", "mask"),
    ],
    on_failure: FailurePolicy::DropDevice,
};

pub const DOWNLINK_MAPPING: FieldMapping = FieldMapping {
    groups: &[FieldGroup {
        key: "local_ci_name",
        fields: &[
            "local_phy",
            "int_type",
            "local_logical_port",
            "local_m_lag_id",
            "lacp_mode",
            "lacp_timeout_mode",
            "force_up",
            "trunk_vlan",
            "pvid",
            "untag_vlan",
            "description",
        ],
    }],
    aliases: &[
        ("local_phy", "phy"),
        ("local_logical_port", "eth_trunk"),
        ("local_m_lag_id", "m_lag_id"),
    ],
    on_failure: FailurePolicy::DropDevice,
};

pub const NETCONF_MAPPING: FieldMapping = FieldMapping {
    groups: &[FieldGroup {
        key: "net_conf_dev_name",
        fields: &["net_conf_user", "net_conf_pass"],
    }],
    aliases: &[("net_conf_user", "user"), ("net_conf_pass", "password")],
    on_failure: FailurePolicy::DropDevice,
};

pub const LOOPBACK_MAPPING: FieldMapping = FieldMapping {
    groups: &[FieldGroup {
        key: "ci_name",
        fields: &["ip", "mask", "id"],
    }],
    aliases: &[],
    on_failure: FailurePolicy::DropDevice,
};

pub const STATIC_ROUTE_MAPPING: FieldMapping = FieldMapping {
    groups: &[FieldGroup {
        key: "ci_name",
        fields: &[
            "destination_net",
            "destination_mask",
            "next_hop",
            "priority",
            "local_vrf",
            "bfd",
            "bfd_name",
        ],
    }],
    aliases: &[],
    on_failure: FailurePolicy::DropRow,
};

pub const BFD_MAPPING: FieldMapping = FieldMapping {
    groups: &[FieldGroup {
        key: "ci_name",
        fields: &[
            "bfd_name",
            "peer_ip",
            "local_vrf",
            "interface",
            "discriminator_local",
        ],
    }],
    aliases: &[],
    on_failure: FailurePolicy::DropRow,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::device::{BasicConfig, LoopbackConfig, NetConfConfig, SnmpConfig, VrfConfig};
    use crate::domain::interface::{InterfaceConfig, L3InterfaceConfig};
    use crate::domain::routing::{BfdConfig, GatewayConfig, MlagConfig, StaticRouteConfig};
    use crate::importer::field_mapper::FieldMapper;

    // 映射规则必须与表头结构、记录字段一致（结构错误在此提前暴露）
    #[test]
    fn test_all_mappings_consistent_with_heads() {
        let mapper = FieldMapper;
        mapper.validate::<BasicConfig, _>(&basic_head(), &BASIC_MAPPING).unwrap();
        mapper.validate::<SnmpConfig, _>(&snmp_head(), &SNMP_MAPPING).unwrap();
        mapper.validate::<MlagConfig, _>(&mlag_head(), &MLAG_MAPPING).unwrap();
        mapper.validate::<VrfConfig, _>(&vrf_head(), &VRF_MAPPING).unwrap();
        mapper.validate::<GatewayConfig, _>(&gateway_head(), &GATEWAY_MAPPING).unwrap();
        mapper
            .validate::<InterfaceConfig, _>(&l2_interface_head(), &L2_INTERFACE_MAPPING)
            .unwrap();
        mapper
            .validate::<L3InterfaceConfig, _>(&l3_interface_head(), &L3_INTERFACE_MAPPING)
            .unwrap();
        mapper
            .validate::<InterfaceConfig, _>(&downlink_head(), &DOWNLINK_MAPPING)
            .unwrap();
        mapper.validate::<NetConfConfig, _>(&netconf_head(), &NETCONF_MAPPING).unwrap();
        mapper.validate::<LoopbackConfig, _>(&loopback_head(), &LOOPBACK_MAPPING).unwrap();
        mapper
            .validate::<StaticRouteConfig, _>(&static_route_head(), &STATIC_ROUTE_MAPPING)
            .unwrap();
        mapper.validate::<BfdConfig, _>(&bfd_head(), &BFD_MAPPING).unwrap();
    }

    #[test]
    fn test_only_routes_and_bfd_drop_single_rows() {
        let drop_row: Vec<bool> = [
            &BASIC_MAPPING,
            &SNMP_MAPPING,
            &MLAG_MAPPING,
            &VRF_MAPPING,
            &GATEWAY_MAPPING,
            &L2_INTERFACE_MAPPING,
            &L3_INTERFACE_MAPPING,
            &DOWNLINK_MAPPING,
            &NETCONF_MAPPING,
            &LOOPBACK_MAPPING,
        ]
        .iter()
        .map(|mapping| mapping.on_failure == FailurePolicy::DropRow)
        .collect();
        assert!(drop_row.iter().all(|d| !d));
        assert_eq!(STATIC_ROUTE_MAPPING.on_failure, FailurePolicy::DropRow);
        assert_eq!(BFD_MAPPING.on_failure, FailurePolicy::DropRow);
    }

    #[test]
    fn test_manage_info_region() {
        let spec = manage_info_table();
        assert_eq!(spec.region.artifact_name(), MARKER_MANAGE_INFO);
        assert_eq!(spec.region.output_offset, 1);
        assert_eq!(
            spec.filter,
            Some(RowFilter::equals("登录协议", "ssh"))
        );
    }
}
