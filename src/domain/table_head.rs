// ==========================================
// LLD 配置生成工具 - 表头结构
// ==========================================
// 依据: LLD 规划表各 sheet 列名约定
// 职责: 规范字段名 → 源列名 的显式映射（每种记录一个结构）
// 红线: 派生列也必须在表头中声明（列名即字段名）
// ==========================================

use crate::domain::types::RecordKind;

// ==========================================
// TableHead Trait
// ==========================================
// 用途: 字段映射引擎按规范字段名解析源列名
pub trait TableHead {
    /// 所属记录种类
    fn kind(&self) -> RecordKind;

    /// 规范字段名 → 源列名（未声明的字段返回 None）
    fn column(&self, field: &str) -> Option<&str>;
}

macro_rules! table_head {
    ($(#[$meta:meta])* $name:ident => $kind:expr, { $($field:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            $(pub $field: String,)+
        }

        impl TableHead for $name {
            fn kind(&self) -> RecordKind {
                $kind
            }

            fn column(&self, field: &str) -> Option<&str> {
                match field {
                    $(stringify!($field) => Some(self.$field.as_str()),)+
                    _ => None,
                }
            }
        }
    };
}

/// 派生列的列名（与字段同名）
pub fn derived(field: &str) -> String {
    field.to_string()
}

table_head!(
    /// 设备管理信息表头（4.1 设备初始化配置 / 网络&存储设备管理信息）
    BasicTableHead => RecordKind::Basic, {
        ci_name,
        device_name,
        manage_ip,
        manage_pass,
        manage_pro,
        manage_user,
        manage_vlan,
    }
);

table_head!(
    /// SNMP 表头（与设备管理信息共用同一区域）
    SnmpTableHead => RecordKind::Snmp, {
        ci_name,
        device_name,
        manage_ip,
        version,
        user,
        authentication_protocol,
        authentication_pass,
        encryption_protocol,
        encryption_pass,
        port,
        read_community,
        write_community,
        target_host,
        udp_port,
    }
);

table_head!(
    /// VRF 规划表头
    VrfTableHead => RecordKind::Vrf, {
        ci_name,
        vrf_name,
        vrf_rd,
        vrf_v6,
        vrf_rt,
    }
);

table_head!(
    /// Loopback 规划表头
    LoopbackTableHead => RecordKind::Loopback, {
        ci_name,
        id,
        ip,
        mask,
    }
);

table_head!(
    /// 网关规划表头（IP&VLAN 规划）
    GatewayTableHead => RecordKind::Gateway, {
        ci_name,
        dev_ci_name,
        gw_ip,
        gw_local_ip,
        gw_mac,
        gw_network,
        gw_mask,
        gw_type,
        gw_vrf,
        net_plane,
        vlan_id,
        vrrp_vrid,
    }
);

table_head!(
    /// 全局 VLAN 表头（与网关共用 IP&VLAN 规划）
    GlobalVlanTableHead => RecordKind::GlobalVlan, {
        dev_ci_name,
        vlan_id,
        net_plane,
    }
);

table_head!(
    /// M-LAG 规划表头
    MlagTableHead => RecordKind::Mlag, {
        ci_name,
        dad_ip,
        dad_mask,
        dad_phy,
        dad_vrf,
        dev_group_id,
        dfs_group,
        eth_trunk_id,
        peer_link,
        peer_link_phy,
        priority,
        v_stp_br_add_mac,
    }
);

table_head!(
    /// 二层对接表头（本端 / 对端两组）
    L2InterfaceTableHead => RecordKind::L2Interface, {
        local_ci_name,
        local_phy,
        local_eth,
        local_int_type,
        local_trunk_vlan,
        local_m_lag_id,
        local_description,
        remote_ci_name,
        remote_phy,
        remote_eth,
        remote_int_type,
        remote_trunk_vlan,
        remote_m_lag_id,
        remote_description,
    }
);

table_head!(
    /// 三层对接表头（本端 / 对端两组 + 共享 vid）
    L3InterfaceTableHead => RecordKind::L3Interface, {
        local_ci_name,
        local_ip_address,
        local_logical_port,
        local_vrf,
        local_mask,
        remote_ci_name,
        remote_ip_address,
        remote_logical_port,
        remote_vrf,
        remote_mask,
        vid,
    }
);

table_head!(
    /// 服务器对接（下联）表头
    DownlinkTableHead => RecordKind::DownlinkInterface, {
        local_ci_name,
        local_phy,
        local_logical_port,
        local_m_lag_id,
        int_type,
        lacp_mode,
        lacp_timeout_mode,
        force_up,
        trunk_vlan,
        pvid,
        untag_vlan,
        remote_ci_name,
        remote_phy,
        description,
    }
);

table_head!(
    /// NetConf 表头（4.1 设备初始化配置 / netconf协议）
    NetConfTableHead => RecordKind::NetConf, {
        net_conf_dev_name,
        net_conf_user,
        net_conf_pass,
    }
);

table_head!(
    /// 静态路由表头
    StaticRouteTableHead => RecordKind::StaticRoute, {
        ci_name,
        destination,
        destination_net,
        destination_mask,
        local_vrf,
        next_hop,
        bfd,
        priority,
        related_service,
        peer_ip,
        bfd_name,
    }
);

table_head!(
    /// BFD 表头（与静态路由共用 3.12 静态路由规划）
    BfdTableHead => RecordKind::Bfd, {
        ci_name,
        discriminator_local,
        interface,
        local_vrf,
        peer_ip,
        association,
        related_service,
        bfd_name,
    }
);
