// ==========================================
// LLD 配置生成工具 - 网关与路由类记录
// ==========================================
// 依据: 3.1.1 IP&VLAN规划 / 3.2.1 M-lag规划 / 3.12 静态路由规划
// 职责: Gateway / MLAG / StaticRoute / BFD / GlobalVlan 记录及其构造规则
// ==========================================

use crate::domain::fields::{Fields, FromFields, RecordError};
use crate::domain::netaddr::{compress_ranges, is_dotted_mac, peer_host_in_slash30, vlan_span};
use crate::domain::types::RecordKind;
use serde::{Deserialize, Serialize};

/// 批量 VLAN 每组最多片段数
pub const VLAN_BATCH_SIZE: usize = 15;

// ==========================================
// 网关 (Gateway)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub vlan_id: String,
    pub gw_ip: String,
    pub gw_mask: String,
    pub gw_type: String,
    pub gw_mac: Option<String>,
    pub gw_vrf: Option<String>,
    pub option_vrf: bool,
    pub gw_local_ip: Option<String>,
    pub description: Option<String>,
    pub gw_mode: bool,
    pub vrrp_vrid: Option<i64>,
    pub option_gw_mac: bool,
}

impl FromFields for GatewayConfig {
    const KIND: RecordKind = RecordKind::Gateway;
    const FIELDS: &'static [&'static str] = &[
        "vlan_id",
        "gw_vrf",
        "gw_ip",
        "gw_mask",
        "gw_type",
        "gw_local_ip",
        "gw_mac",
        "description",
        "vrrp_vrid",
    ];

    /// # 规则
    /// - VRF 非占位符且非 public 时开启 option_vrf
    /// - 存在本端地址时为双活网关模式 (gw_mode)
    /// - VLAN MAC 形如 xxxx-xxxx-xxxx 时开启 option_gw_mac
    fn from_fields(fields: &Fields) -> Result<Self, RecordError> {
        let gw_vrf = fields.text("gw_vrf");
        let gw_mac = fields.text("gw_mac");
        let gw_local_ip = fields.text("gw_local_ip");
        Ok(Self {
            vlan_id: fields.required("vlan_id")?,
            gw_ip: fields.required("gw_ip")?,
            gw_mask: fields.required("gw_mask")?,
            gw_type: fields.required("gw_type")?,
            option_vrf: fields.present("gw_vrf").is_some_and(|v| v != "public"),
            gw_vrf,
            option_gw_mac: gw_mac.as_deref().is_some_and(is_dotted_mac),
            gw_mac,
            gw_mode: fields.present("gw_local_ip").is_some(),
            gw_local_ip,
            description: fields.text("description"),
            vrrp_vrid: fields.int("vrrp_vrid"),
        })
    }
}

// ==========================================
// M-LAG (MLAG)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlagConfig {
    pub dfs_group: String,
    pub priority: String,
    #[serde(rename = "peer_Link_phy")]
    pub peer_link_phy: Vec<String>,
    pub eth_trunk_id: String,
    #[serde(rename = "peer_Link")]
    pub peer_link: String,
    pub dad_phy: String,
    pub dad_vrf: String,
    pub dad_ip: String,
    pub dad_mask: String,
    pub v_stp_br_add_mac: String,
    pub dad_vlan: Option<String>,
    pub dad_peer_ip: Option<String>,
}

impl FromFields for MlagConfig {
    const KIND: RecordKind = RecordKind::Mlag;
    const FIELDS: &'static [&'static str] = &[
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
    ];

    /// # 规则
    /// - DAD 掩码必须为 30 位（前缀或点分写法）
    /// - dad_peer_ip 取同一 /30 网段内的另一地址
    /// - Peer-Link 物理口按 "," 拆分为列表
    fn from_fields(fields: &Fields) -> Result<Self, RecordError> {
        let dad_ip = fields.required("dad_ip")?;
        let dad_mask = fields.required("dad_mask")?;
        let dad_peer_ip = peer_host_in_slash30(&dad_ip, &dad_mask)?;
        let peer_link_phy = fields
            .required("peer_link_phy")?
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        Ok(Self {
            dfs_group: fields.required("dfs_group")?,
            priority: fields.required("priority")?,
            peer_link_phy,
            eth_trunk_id: fields.required("eth_trunk_id")?,
            peer_link: fields.required("peer_link")?,
            dad_phy: fields.required("dad_phy")?,
            dad_vrf: fields.required("dad_vrf")?,
            dad_ip,
            dad_mask,
            v_stp_br_add_mac: fields.required("v_stp_br_add_mac")?,
            dad_vlan: None,
            dad_peer_ip: Some(dad_peer_ip),
        })
    }
}

// ==========================================
// 静态路由 (Static Route)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticRouteConfig {
    pub destination_net: String,
    pub destination_mask: String,
    pub next_hop: String,
    pub priority: Option<String>,
    pub local_vrf: Option<String>,
    pub bfd: bool,
    pub bfd_name: Option<String>,
}

impl FromFields for StaticRouteConfig {
    const KIND: RecordKind = RecordKind::StaticRoute;
    const FIELDS: &'static [&'static str] = &[
        "destination_net",
        "destination_mask",
        "next_hop",
        "priority",
        "local_vrf",
        "bfd",
        "bfd_name",
    ];

    fn from_fields(fields: &Fields) -> Result<Self, RecordError> {
        Ok(Self {
            destination_net: fields.required("destination_net")?,
            destination_mask: fields.required("destination_mask")?,
            next_hop: fields.required("next_hop")?,
            priority: fields.text("priority"),
            local_vrf: fields.text("local_vrf"),
            bfd: fields.flag("bfd"),
            bfd_name: fields.text("bfd_name"),
        })
    }
}

// ==========================================
// BFD 会话 (BFD)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BfdConfig {
    pub bfd_name: String,
    pub peer_ip: String,
    pub local_vrf: Option<String>,
    pub interface: Option<String>,
    pub source_ip: Option<String>,
    pub discriminator_local: Option<String>,
}

impl BfdConfig {
    /// 单臂接口中的 VLAN 编号（取末尾连续数字）
    pub fn interface_vlan(&self) -> Option<i64> {
        let interface = self.interface.as_deref()?;
        let digits: String = interface
            .chars()
            .rev()
            .take_while(char::is_ascii_digit)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        digits.parse().ok()
    }

    /// 按网关 VLAN 匹配源地址，并去掉接口名中的空白
    pub fn attach_source_ip(&mut self, gateways: &[GatewayConfig]) {
        if let Some(interface) = self.interface.as_mut() {
            interface.retain(|c| !c.is_whitespace());
        }
        let Some(vlan) = self.interface_vlan() else {
            return;
        };
        if let Some(gw) = gateways
            .iter()
            .rev()
            .find(|gw| gw.vlan_id.trim().parse::<i64>().ok() == Some(vlan))
        {
            self.source_ip = Some(gw.gw_ip.clone());
        }
    }
}

impl FromFields for BfdConfig {
    const KIND: RecordKind = RecordKind::Bfd;
    const FIELDS: &'static [&'static str] = &[
        "bfd_name",
        "peer_ip",
        "local_vrf",
        "interface",
        "discriminator_local",
    ];

    fn from_fields(fields: &Fields) -> Result<Self, RecordError> {
        Ok(Self {
            bfd_name: fields.required("bfd_name")?,
            peer_ip: fields.required("peer_ip")?,
            local_vrf: fields.text("local_vrf"),
            interface: fields.text("interface"),
            source_ip: None,
            discriminator_local: fields.text("discriminator_local"),
        })
    }
}

// ==========================================
// 全局 VLAN (Global VLAN)
// ==========================================
/// 批量 VLAN 分组: 满组为片段列表，尾组为空格拼接的字符串
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VlanBatch {
    Full(Vec<String>),
    Tail(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalVlan {
    pub vlan_id: Vec<i64>,
    pub description: Option<String>,
    pub batch_vlan: Vec<VlanBatch>,
}

impl GlobalVlan {
    /// 解析 VLAN ID 单元格: "a-b" 展开为闭区间，单值为单元素列表
    pub fn parse_vlan_ids(raw: &str) -> Result<Vec<i64>, RecordError> {
        let parse = |v: &str| {
            v.trim()
                .parse::<i64>()
                .map_err(|_| RecordError::invalid("vlan_id", raw, "不是合法的 VLAN 编号"))
        };
        let (start, end) = match raw.split_once('-') {
            Some((start, end)) => (parse(start)?, parse(end)?),
            None => {
                let id = parse(raw)?;
                (id, id)
            }
        };
        let span =
            vlan_span(start, end).map_err(|reason| RecordError::invalid("vlan_id", raw, reason))?;
        Ok(span.collect())
    }

    /// 合并全部 VLAN，去重排序、压缩为范围片段后按组切分
    pub fn batch(vlan_lists: &[Vec<i64>]) -> Vec<VlanBatch> {
        let mut all: Vec<i64> = vlan_lists.iter().flatten().copied().collect();
        all.sort_unstable();
        all.dedup();

        let segments = compress_ranges(&all);
        let mut batches: Vec<VlanBatch> = Vec::new();
        let mut chunks = segments.chunks(VLAN_BATCH_SIZE).peekable();
        while let Some(chunk) = chunks.next() {
            if chunk.len() == VLAN_BATCH_SIZE {
                batches.push(VlanBatch::Full(chunk.to_vec()));
            } else if chunks.peek().is_none() {
                batches.push(VlanBatch::Tail(chunk.join(" ")));
            }
        }
        batches
    }
}
