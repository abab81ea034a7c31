// ==========================================
// LLD 配置生成工具 - 记录联合类型
// ==========================================
// 职责: 13 种类型化记录的带标签联合，供导出/审计按种类穷举处理
// ==========================================

use crate::domain::device::{BasicConfig, LoopbackConfig, NetConfConfig, SnmpConfig, VrfConfig};
use crate::domain::interface::{InterfaceConfig, L3InterfaceConfig};
use crate::domain::routing::{BfdConfig, GatewayConfig, GlobalVlan, MlagConfig, StaticRouteConfig};
use crate::domain::types::RecordKind;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum Record {
    Basic(BasicConfig),
    Snmp(SnmpConfig),
    Vrf(VrfConfig),
    Loopback(LoopbackConfig),
    Gateway(GatewayConfig),
    Mlag(MlagConfig),
    L2Interface(InterfaceConfig),
    L3Interface(L3InterfaceConfig),
    DownlinkInterface(InterfaceConfig),
    NetConf(NetConfConfig),
    StaticRoute(StaticRouteConfig),
    Bfd(BfdConfig),
    GlobalVlan(GlobalVlan),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Basic(_) => RecordKind::Basic,
            Record::Snmp(_) => RecordKind::Snmp,
            Record::Vrf(_) => RecordKind::Vrf,
            Record::Loopback(_) => RecordKind::Loopback,
            Record::Gateway(_) => RecordKind::Gateway,
            Record::Mlag(_) => RecordKind::Mlag,
            Record::L2Interface(_) => RecordKind::L2Interface,
            Record::L3Interface(_) => RecordKind::L3Interface,
            Record::DownlinkInterface(_) => RecordKind::DownlinkInterface,
            Record::NetConf(_) => RecordKind::NetConf,
            Record::StaticRoute(_) => RecordKind::StaticRoute,
            Record::Bfd(_) => RecordKind::Bfd,
            Record::GlobalVlan(_) => RecordKind::GlobalVlan,
        }
    }
}
