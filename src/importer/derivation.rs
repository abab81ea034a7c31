// ==========================================
// LLD 配置生成工具 - 行派生服务实现
// ==========================================
// 依据: LLD 规划表填写约定 - 各记录种类的预处理规则
// 职责: 字段映射前的行级过滤 / 拆分 / 派生列写入
// ==========================================
// 红线: 派生结果写入表头中声明的派生列，不改变行顺序
// ==========================================

use crate::domain::fields::RecordError;
use crate::domain::netaddr::{parse_network, split_ci_pair, split_ip_mask};
use crate::domain::routing::GlobalVlan;
use crate::domain::table::{NormalizedTable, Row, RowFilter};
use crate::domain::table_head::{
    BasicTableHead, BfdTableHead, DownlinkTableHead, GatewayTableHead, GlobalVlanTableHead,
    L2InterfaceTableHead, L3InterfaceTableHead, SnmpTableHead, StaticRouteTableHead,
};
use crate::domain::types::{is_blank_value, FieldValue, RecordKind, PLACEHOLDER};
use crate::importer::error::{ImportError, ImportResult, RowRejection};
use std::net::IpAddr;
use tracing::debug;

/// 静态路由 / BFD 的关联取值
pub const BFD_ASSOCIATION: &str = "BFD";

/// 子接口编号到 VLAN 的偏移
pub const SUBINTERFACE_VLAN_OFFSET: i64 = 99;

/// 派生结果: 保留的行 + 被拒收的行
#[derive(Debug, Default)]
pub struct DerivedRows {
    pub rows: Vec<Row>,
    pub rejections: Vec<RowRejection>,
}

impl DerivedRows {
    fn accept(&mut self, row: Row) {
        self.rows.push(row);
    }

    fn reject(&mut self, kind: RecordKind, row: &Row, reason: impl Into<String>) {
        let rejection = RowRejection::new(kind, row.row_number, reason);
        debug!(rejection = %rejection, "行派生失败");
        self.rejections.push(rejection);
    }

    /// 拒收并记下归属设备（设备标识为空时不记）
    fn reject_for(
        &mut self,
        kind: RecordKind,
        row: &Row,
        device: &str,
        reason: impl Into<String>,
    ) {
        let mut rejection = RowRejection::new(kind, row.row_number, reason);
        if !is_blank_value(device) {
            rejection = rejection.for_device(device);
        }
        debug!(rejection = %rejection, "行派生失败");
        self.rejections.push(rejection);
    }
}

pub struct DerivationService;

impl DerivationService {
    /// 规整表 → 行记录，并按过滤条件筛选
    ///
    /// # 规则
    /// - 过滤列不存在于表头时为结构错误
    pub fn filter_rows(
        &self,
        kind: RecordKind,
        table: &NormalizedTable,
        filter: Option<&RowFilter>,
    ) -> ImportResult<Vec<Row>> {
        let rows = table.to_rows();
        let Some(filter) = filter else {
            return Ok(rows);
        };
        if !table.has_column(&filter.column) {
            return Err(ImportError::SchemaMismatch {
                kind,
                field: filter.column.clone(),
            });
        }
        Ok(rows
            .into_iter()
            .filter(|row| row.text(&filter.column).as_deref() == Some(filter.value.as_str()))
            .collect())
    }

    /// 设备标识: 设备名称去掉末尾 2 个字符 + 管理 IP
    pub fn device_identity(&self, device_name: &str, manage_ip: &str) -> String {
        let chars: Vec<char> = device_name.chars().collect();
        let base: String = chars[..chars.len().saturating_sub(2)].iter().collect();
        format!("{}{}", base, manage_ip)
    }

    /// Basic 预处理: 写入设备标识列
    pub fn derive_basic(&self, mut rows: Vec<Row>, head: &BasicTableHead) -> DerivedRows {
        for row in rows.iter_mut() {
            let ci_name = self.device_identity(
                &row.text_or_empty(&head.device_name),
                &row.text_or_empty(&head.manage_ip),
            );
            row.set(head.ci_name.as_str(), ci_name);
        }
        DerivedRows {
            rows,
            rejections: Vec::new(),
        }
    }

    /// SNMP 预处理: 设备标识 + trap 目标主机 / 端口
    ///
    /// # 参数
    /// - target_host: 配置的 trap 目标主机（未配置写占位符）
    /// - udp_port: trap UDP 端口
    pub fn derive_snmp(
        &self,
        mut rows: Vec<Row>,
        head: &SnmpTableHead,
        target_host: Option<&str>,
        udp_port: u16,
    ) -> DerivedRows {
        for row in rows.iter_mut() {
            let ci_name = self.device_identity(
                &row.text_or_empty(&head.device_name),
                &row.text_or_empty(&head.manage_ip),
            );
            row.set(head.ci_name.as_str(), ci_name);
            row.set(head.target_host.as_str(), target_host.unwrap_or(PLACEHOLDER));
            row.set(head.udp_port.as_str(), i64::from(udp_port));
        }
        DerivedRows {
            rows,
            rejections: Vec::new(),
        }
    }

    /// Gateway 预处理: 一行双设备拆分为两行
    ///
    /// # 规则
    /// - 网关或网关设备 CI 为占位符的行跳过
    /// - 掩码取自 "网段/掩码"
    /// - local ip 为 "ip1,ip2"（占位符时两侧均为占位符）
    /// - 网关类型为 vrrp 时分配递增 VRID（整张表共用一个计数器）
    pub fn derive_gateway(&self, rows: Vec<Row>, head: &GatewayTableHead) -> DerivedRows {
        let kind = RecordKind::Gateway;
        let mut derived = DerivedRows::default();
        let mut vrrp_vrid: i64 = 0;

        for row in rows {
            let gw_ip = row.text_or_empty(&head.gw_ip);
            let dev_ci_name = row.text_or_empty(&head.dev_ci_name);
            if gw_ip == PLACEHOLDER || dev_ci_name == PLACEHOLDER {
                debug!(row = row.row_number, "无网关信息，跳过");
                continue;
            }

            let (ci1, ci2) = match split_ci_pair(&dev_ci_name) {
                Ok(pair) => pair,
                Err(e) => {
                    derived.reject(kind, &row, e.to_string());
                    continue;
                }
            };
            let side_values =
                split_ip_mask(&row.text_or_empty(&head.gw_network)).and_then(|(_, mask)| {
                    gateway_local_ips(&row.text_or_empty(&head.gw_local_ip)).map(|ips| (mask, ips))
                });
            let (mask, local_ips) = match side_values {
                Ok(values) => values,
                Err(e) => {
                    // 两侧设备同时失去该行
                    derived.reject_for(kind, &row, &ci1, e.to_string());
                    derived.reject_for(kind, &row, &ci2, e.to_string());
                    continue;
                }
            };

            let vrid = if row.text_or_empty(&head.gw_type) == "vrrp" {
                vrrp_vrid += 1;
                FieldValue::Int(vrrp_vrid)
            } else {
                FieldValue::Null
            };

            for (ci_name, ip) in [(ci1, local_ips.0.clone()), (ci2, local_ips.1.clone())] {
                let mut side = row.clone();
                side.set(head.gw_mask.as_str(), mask.clone());
                side.set(head.vrrp_vrid.as_str(), vrid.clone());
                side.set(head.ci_name.as_str(), ci_name);
                side.set(head.gw_local_ip.as_str(), ip);
                derived.accept(side);
            }
        }
        derived
    }

    /// L2 预处理: 两端描述互指对端
    pub fn derive_l2(&self, mut rows: Vec<Row>, head: &L2InterfaceTableHead) -> DerivedRows {
        for row in rows.iter_mut() {
            let local = format!(
                "{}_{}",
                row.text_or_empty(&head.remote_ci_name),
                row.text_or_empty(&head.remote_phy)
            );
            let remote = format!(
                "{}_{}",
                row.text_or_empty(&head.local_ci_name),
                row.text_or_empty(&head.local_phy)
            );
            row.set(head.local_description.as_str(), local);
            row.set(head.remote_description.as_str(), remote);
        }
        DerivedRows {
            rows,
            rejections: Vec::new(),
        }
    }

    /// L3 预处理: 拆分两端 "ip/掩码"，由本端逻辑端口推导 vid
    ///
    /// # 规则
    /// - 某一端地址缺少 "/" 时拒收该端（该端设备标识置为占位符，另一端照常映射）
    /// - vid = 逻辑端口最后一个 ".数字" 段 + 99，无此段为空
    pub fn derive_l3(&self, rows: Vec<Row>, head: &L3InterfaceTableHead) -> DerivedRows {
        let kind = RecordKind::L3Interface;
        let mut derived = DerivedRows::default();

        for mut row in rows {
            let sides = [
                (&head.local_ci_name, &head.local_ip_address, &head.local_mask),
                (&head.remote_ci_name, &head.remote_ip_address, &head.remote_mask),
            ];
            for (ci_column, ip_column, mask_column) in sides {
                match split_ip_mask(&row.text_or_empty(ip_column)) {
                    Ok((ip, mask)) => {
                        row.set(ip_column.as_str(), ip);
                        row.set(mask_column.as_str(), mask);
                    }
                    Err(e) => {
                        let device = row.text_or_empty(ci_column);
                        derived.reject_for(kind, &row, &device, e.to_string());
                        // 该侧不再参与映射
                        row.set(ci_column.as_str(), PLACEHOLDER);
                    }
                }
            }

            let vid = subinterface_number(&row.text_or_empty(&head.local_logical_port))
                .map(|n| FieldValue::Int(n + SUBINTERFACE_VLAN_OFFSET))
                .unwrap_or(FieldValue::Null);
            row.set(head.vid.as_str(), vid);
            derived.accept(row);
        }
        derived
    }

    /// 下联预处理: 描述 / force-up / lacp 超时模式
    pub fn derive_downlink(&self, mut rows: Vec<Row>, head: &DownlinkTableHead) -> DerivedRows {
        for row in rows.iter_mut() {
            let description = format!(
                "{}_{}",
                row.text_or_empty(&head.remote_ci_name),
                row.text_or_empty(&head.remote_phy)
            );
            let force_up = row.text_or_empty(&head.force_up) == "是";
            let lacp_slow = row.text_or_empty(&head.lacp_timeout_mode) == "slow";
            row.set(head.description.as_str(), description);
            row.set(head.force_up.as_str(), force_up);
            row.set(head.lacp_timeout_mode.as_str(), lacp_slow);
        }
        DerivedRows {
            rows,
            rejections: Vec::new(),
        }
    }

    /// 静态路由预处理
    ///
    /// # 规则
    /// - 缺少下一跳或目的网络列的行拒收
    /// - 下一跳不是合法 IP、目的网络无法拆分为 网络/掩码 的行拒收
    /// - 通过的行生成 BFD 会话名，关联列转为 是否等于 "BFD"
    pub fn derive_static_route(&self, rows: Vec<Row>, head: &StaticRouteTableHead) -> DerivedRows {
        let kind = RecordKind::StaticRoute;
        let mut derived = DerivedRows::default();

        for mut row in rows {
            let device = row.text_or_empty(&head.ci_name);
            let (Some(next_hop), Some(destination)) =
                (row.text(&head.next_hop), row.text(&head.destination))
            else {
                derived.reject_for(kind, &row, &device, "缺少下一跳地址或目的网络");
                continue;
            };

            if next_hop.trim().parse::<IpAddr>().is_err() {
                let reason = format!("下一跳地址不是合法 IP: {}", next_hop);
                derived.reject_for(kind, &row, &device, reason);
                continue;
            }
            let (net, mask) = match split_ip_mask(&destination)
                .and_then(|(net, mask)| parse_network(&net, &mask).map(|_| (net, mask)))
            {
                Ok(pair) => pair,
                Err(e) => {
                    derived.reject_for(kind, &row, &device, e.to_string());
                    continue;
                }
            };

            let bfd_name = self.bfd_name(&row, &head.related_service, &head.peer_ip);
            let associated = row.text_or_empty(&head.bfd) == BFD_ASSOCIATION;
            row.set(head.destination_net.as_str(), net);
            row.set(head.destination_mask.as_str(), mask);
            row.set(head.bfd_name.as_str(), bfd_name);
            row.set(head.bfd.as_str(), associated);
            derived.accept(row);
        }
        derived
    }

    /// BFD 预处理: 仅保留关联为 BFD 的行，生成与静态路由一致的会话名
    pub fn derive_bfd(&self, rows: Vec<Row>, head: &BfdTableHead) -> DerivedRows {
        let rows = rows
            .into_iter()
            .filter(|row| row.text(&head.association).as_deref() == Some(BFD_ASSOCIATION))
            .map(|mut row| {
                let bfd_name = self.bfd_name(&row, &head.related_service, &head.peer_ip);
                row.set(head.bfd_name.as_str(), bfd_name);
                row
            })
            .collect();
        DerivedRows {
            rows,
            rejections: Vec::new(),
        }
    }

    /// BFD 会话名: "<关联服务>_<探测IP>"（缺列按空串处理）
    fn bfd_name(&self, row: &Row, service_column: &str, peer_ip_column: &str) -> String {
        format!(
            "{}_{}",
            row.text_or_empty(service_column),
            row.text_or_empty(peer_ip_column)
        )
    }

    /// 全局 VLAN: 逐行解析 VLAN 编号，并汇总出共享的批量 VLAN 表示
    ///
    /// # 规则
    /// - VLAN ID 为占位符的行跳过
    /// - "a-b" 展开为区间，单值为单元素列表
    /// - 批量表示附加到每一条记录上
    pub fn collect_global_vlans(
        &self,
        rows: &[Row],
        head: &GlobalVlanTableHead,
    ) -> (Vec<GlobalVlan>, Vec<RowRejection>) {
        let kind = RecordKind::GlobalVlan;
        let mut vlans = Vec::new();
        let mut rejections = Vec::new();

        for row in rows {
            let raw = row.text_or_empty(&head.vlan_id);
            if is_blank_value(&raw) {
                continue;
            }
            match GlobalVlan::parse_vlan_ids(&raw) {
                Ok(vlan_id) => vlans.push(GlobalVlan {
                    vlan_id,
                    description: row.text(&head.net_plane),
                    batch_vlan: Vec::new(),
                }),
                Err(e) => rejections.push(RowRejection::new(kind, row.row_number, e.to_string())),
            }
        }

        let id_lists: Vec<Vec<i64>> = vlans.iter().map(|v| v.vlan_id.clone()).collect();
        let batch = GlobalVlan::batch(&id_lists);
        for vlan in vlans.iter_mut() {
            vlan.batch_vlan = batch.clone();
        }
        (vlans, rejections)
    }
}

/// 逻辑端口中最后一个 "." 之后的数字段（"10GE1/0/1.100" → 100）
fn subinterface_number(port: &str) -> Option<i64> {
    port.split('.')
        .skip(1)
        .filter_map(|segment| {
            let digits: String = segment.chars().take_while(char::is_ascii_digit).collect();
            digits.parse::<i64>().ok()
        })
        .last()
}

/// 网关双侧本端地址 "ip1,ip2"（占位符时两侧均为占位符）
fn gateway_local_ips(local_ip: &str) -> Result<(String, String), RecordError> {
    if local_ip == PLACEHOLDER {
        return Ok((PLACEHOLDER.to_string(), PLACEHOLDER.to_string()));
    }
    match local_ip.split_once(',') {
        Some((first, second)) => Ok((first.trim().to_string(), second.trim().to_string())),
        None => Err(RecordError::invalid("gw_local_ip", local_ip, "需为两个地址")),
    }
}
