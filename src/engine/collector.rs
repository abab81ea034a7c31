// ==========================================
// LLD 配置生成工具 - 设备配置收集器
// ==========================================
// 依据: 表目录 (engine::catalog) + 导入层流水线
// 职责: 13 种记录集合的惰性构建与进程内共享
// ==========================================
// 流水线（每种记录）:
// 表区域定位(缓存) → 行过滤 → 行派生 → 字段映射 → 后置派生
// ==========================================
// 红线: 每种集合每次运行只构建一次，返回只读共享结果
// ==========================================

use crate::domain::device::{
    BasicConfig, LoopbackConfig, NetConfConfig, SnmpConfig, VrfConfig, DEFAULT_SNMP_UDP_PORT,
};
use crate::domain::fields::FromFields;
use crate::domain::interface::{InterfaceConfig, L3InterfaceConfig};
use crate::domain::netaddr::vrrp_virtual_mac;
use crate::domain::record::Record;
use crate::domain::routing::{BfdConfig, GatewayConfig, GlobalVlan, MlagConfig, StaticRouteConfig};
use crate::domain::table::{Row, Workbook};
use crate::domain::table_head::TableHead;
use crate::domain::types::DeviceRecords;
use crate::engine::catalog::{self, TableSpec};
use crate::importer::derivation::{DerivationService, DerivedRows};
use crate::importer::error::{ImportError, ImportResult, RowRejection};
use crate::importer::field_mapper::{FieldMapper, FieldMapping};
use crate::importer::file_parser::ExcelParser;
use crate::importer::importer_trait::WorkbookParser;
use crate::importer::table_cache::{Memo, TableCache};
use crate::importer::table_writer::CsvArtifactStore;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use tracing::{info, instrument, warn};

/// 设备列表中排除的设备类型标记（防火墙）
const EXCLUDED_DEVICE_MARKERS: [&str; 2] = ["USG", "fw"];

// ==========================================
// SNMP trap 目标 (SNMP Target)
// ==========================================
// 规划表中没有 trap 目标，由设备配置文件补充
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnmpTarget {
    pub target_host: Option<String>,
    pub udp_port: u16,
}

impl Default for SnmpTarget {
    fn default() -> Self {
        Self {
            target_host: None,
            udp_port: DEFAULT_SNMP_UDP_PORT,
        }
    }
}

// ==========================================
// DeviceConfigCollector
// ==========================================
pub struct DeviceConfigCollector {
    workbook: Workbook,
    cache: TableCache,
    mapper: FieldMapper,
    deriver: DerivationService,
    snmp_target: SnmpTarget,
    rejections: RefCell<Vec<RowRejection>>,

    basic: Memo<DeviceRecords<BasicConfig>>,
    snmp: Memo<DeviceRecords<SnmpConfig>>,
    vrf: Memo<DeviceRecords<VrfConfig>>,
    loopback: Memo<DeviceRecords<LoopbackConfig>>,
    gateway: Memo<DeviceRecords<GatewayConfig>>,
    mlag: Memo<DeviceRecords<MlagConfig>>,
    l2_interface: Memo<DeviceRecords<InterfaceConfig>>,
    l3_interface: Memo<DeviceRecords<L3InterfaceConfig>>,
    downlink: Memo<DeviceRecords<InterfaceConfig>>,
    netconf: Memo<DeviceRecords<NetConfConfig>>,
    static_route: Memo<DeviceRecords<StaticRouteConfig>>,
    bfd: Memo<DeviceRecords<BfdConfig>>,
    global_vlan: Memo<Vec<GlobalVlan>>,
}

impl DeviceConfigCollector {
    /// 创建收集器
    ///
    /// # 参数
    /// - workbook: 已解析的工作簿
    /// - cache: 表区域缓存（可带中间表落盘）
    pub fn new(workbook: Workbook, cache: TableCache) -> Self {
        Self {
            workbook,
            cache,
            mapper: FieldMapper,
            deriver: DerivationService,
            snmp_target: SnmpTarget::default(),
            rejections: RefCell::new(Vec::new()),
            basic: Memo::new(),
            snmp: Memo::new(),
            vrf: Memo::new(),
            loopback: Memo::new(),
            gateway: Memo::new(),
            mlag: Memo::new(),
            l2_interface: Memo::new(),
            l3_interface: Memo::new(),
            downlink: Memo::new(),
            netconf: Memo::new(),
            static_route: Memo::new(),
            bfd: Memo::new(),
            global_vlan: Memo::new(),
        }
    }

    /// 解析工作簿文件并创建收集器，中间表写入 data_dir
    pub fn open(lld_file: &Path, data_dir: &Path) -> ImportResult<Self> {
        info!(file = %lld_file.display(), "开始解析 LLD 工作簿");
        let workbook = ExcelParser.parse_workbook(lld_file)?;
        let cache = TableCache::with_store(Box::new(CsvArtifactStore::new(data_dir)));
        Ok(Self::new(workbook, cache))
    }

    /// 设置 SNMP trap 目标（须在首次构建 SNMP 集合前调用）
    pub fn with_snmp_target(mut self, target: SnmpTarget) -> Self {
        self.snmp_target = target;
        self
    }

    /// 通用构建流程: 定位 → 过滤 → 派生 → 映射
    fn build<T, H>(
        &self,
        spec: TableSpec,
        head: &H,
        mapping: &FieldMapping,
        derive: impl FnOnce(Vec<Row>) -> DerivedRows,
    ) -> ImportResult<DeviceRecords<T>>
    where
        T: FromFields,
        H: TableHead,
    {
        let table = self.cache.get_or_locate(&self.workbook, &spec.region)?;
        let rows = self
            .deriver
            .filter_rows(head.kind(), &table, spec.filter.as_ref())?;
        let derived = derive(rows);
        let outcome =
            self.mapper
                .map_rows::<T, H>(&derived.rows, &derived.rejections, head, mapping)?;

        self.record_rejections(derived.rejections);
        self.record_rejections(outcome.rejections);
        info!(
            kind = %head.kind(),
            devices = outcome.records.len(),
            records = outcome.records.record_count(),
            "记录集合构建完成"
        );
        Ok(outcome.records)
    }

    fn record_rejections(&self, rejections: Vec<RowRejection>) {
        for rejection in &rejections {
            warn!(rejection = %rejection, "行被拒收");
        }
        self.rejections.borrow_mut().extend(rejections);
    }

    // ==========================================
    // 13 种记录集合
    // ==========================================

    #[instrument(skip(self))]
    pub fn create_basic(&self) -> ImportResult<Rc<DeviceRecords<BasicConfig>>> {
        self.basic.get_or_try_init(|| {
            let head = catalog::basic_head();
            self.build(catalog::manage_info_table(), &head, &catalog::BASIC_MAPPING, |rows| {
                self.deriver.derive_basic(rows, &head)
            })
        })
    }

    #[instrument(skip(self))]
    pub fn create_snmp(&self) -> ImportResult<Rc<DeviceRecords<SnmpConfig>>> {
        self.snmp.get_or_try_init(|| {
            let head = catalog::snmp_head();
            let target = &self.snmp_target;
            self.build(catalog::manage_info_table(), &head, &catalog::SNMP_MAPPING, |rows| {
                self.deriver.derive_snmp(
                    rows,
                    &head,
                    target.target_host.as_deref(),
                    target.udp_port,
                )
            })
        })
    }

    #[instrument(skip(self))]
    pub fn create_vrf(&self) -> ImportResult<Rc<DeviceRecords<VrfConfig>>> {
        self.vrf.get_or_try_init(|| {
            self.build(catalog::vrf_table(), &catalog::vrf_head(), &catalog::VRF_MAPPING, |rows| {
                DerivedRows {
                    rows,
                    ..Default::default()
                }
            })
        })
    }

    #[instrument(skip(self))]
    pub fn create_loopback(&self) -> ImportResult<Rc<DeviceRecords<LoopbackConfig>>> {
        self.loopback.get_or_try_init(|| {
            self.build(
                catalog::loopback_table(),
                &catalog::loopback_head(),
                &catalog::LOOPBACK_MAPPING,
                |rows| DerivedRows {
                    rows,
                    ..Default::default()
                },
            )
        })
    }

    #[instrument(skip(self))]
    pub fn create_gateway(&self) -> ImportResult<Rc<DeviceRecords<GatewayConfig>>> {
        self.gateway.get_or_try_init(|| {
            let head = catalog::gateway_head();
            self.build(catalog::ip_vlan_table(), &head, &catalog::GATEWAY_MAPPING, |rows| {
                self.deriver.derive_gateway(rows, &head)
            })
        })
    }

    #[instrument(skip(self))]
    pub fn create_mlag(&self) -> ImportResult<Rc<DeviceRecords<MlagConfig>>> {
        self.mlag.get_or_try_init(|| {
            self.build(catalog::mlag_table(), &catalog::mlag_head(), &catalog::MLAG_MAPPING, |rows| {
                DerivedRows {
                    rows,
                    ..Default::default()
                }
            })
        })
    }

    #[instrument(skip(self))]
    pub fn create_l2_interface(&self) -> ImportResult<Rc<DeviceRecords<InterfaceConfig>>> {
        self.l2_interface.get_or_try_init(|| {
            let head = catalog::l2_interface_head();
            self.build(
                catalog::l2_interface_table(),
                &head,
                &catalog::L2_INTERFACE_MAPPING,
                |rows| self.deriver.derive_l2(rows, &head),
            )
        })
    }

    /// 三层接口（含 VLANIF 虚拟 MAC 分配）
    #[instrument(skip(self))]
    pub fn create_l3_interface(&self) -> ImportResult<Rc<DeviceRecords<L3InterfaceConfig>>> {
        self.l3_interface.get_or_try_init(|| {
            let head = catalog::l3_interface_head();
            let mut records = self.build(
                catalog::l3_interface_table(),
                &head,
                &catalog::L3_INTERFACE_MAPPING,
                |rows| self.deriver.derive_l3(rows, &head),
            )?;
            assign_virtual_macs(&mut records);
            Ok(records)
        })
    }

    #[instrument(skip(self))]
    pub fn create_downlink_interface(&self) -> ImportResult<Rc<DeviceRecords<InterfaceConfig>>> {
        self.downlink.get_or_try_init(|| {
            let head = catalog::downlink_head();
            self.build(catalog::downlink_table(), &head, &catalog::DOWNLINK_MAPPING, |rows| {
                self.deriver.derive_downlink(rows, &head)
            })
        })
    }

    #[instrument(skip(self))]
    pub fn create_netconf(&self) -> ImportResult<Rc<DeviceRecords<NetConfConfig>>> {
        self.netconf.get_or_try_init(|| {
            self.build(
                catalog::netconf_table(),
                &catalog::netconf_head(),
                &catalog::NETCONF_MAPPING,
                |rows| DerivedRows {
                    rows,
                    ..Default::default()
                },
            )
        })
    }

    #[instrument(skip(self))]
    pub fn create_static_route(&self) -> ImportResult<Rc<DeviceRecords<StaticRouteConfig>>> {
        self.static_route.get_or_try_init(|| {
            let head = catalog::static_route_head();
            self.build(
                catalog::static_route_table(),
                &head,
                &catalog::STATIC_ROUTE_MAPPING,
                |rows| self.deriver.derive_static_route(rows, &head),
            )
        })
    }

    /// BFD 会话（源 IP 取自同设备同 VLAN 的网关地址）
    #[instrument(skip(self))]
    pub fn create_bfd(&self) -> ImportResult<Rc<DeviceRecords<BfdConfig>>> {
        self.bfd.get_or_try_init(|| {
            // 网关集合先完整构建，失败时不产生 BFD 拒收记录
            let gateways = self.create_gateway()?;

            let head = catalog::bfd_head();
            let mut records: DeviceRecords<BfdConfig> = self.build(
                catalog::static_route_table(),
                &head,
                &catalog::BFD_MAPPING,
                |rows| self.deriver.derive_bfd(rows, &head),
            )?;
            for (device, sessions) in records.iter_mut() {
                let device_gateways = gateways.get(device).unwrap_or(&[]);
                for session in sessions.iter_mut() {
                    session.attach_source_ip(device_gateways);
                }
            }
            Ok(records)
        })
    }

    /// 全局 VLAN（所有设备共用同一列表）
    #[instrument(skip(self))]
    pub fn create_global_vlan(&self) -> ImportResult<Rc<Vec<GlobalVlan>>> {
        self.global_vlan.get_or_try_init(|| {
            let spec = catalog::ip_vlan_table();
            let head = catalog::global_vlan_head();
            let table = self.cache.get_or_locate(&self.workbook, &spec.region)?;
            let rows = self
                .deriver
                .filter_rows(head.kind(), &table, spec.filter.as_ref())?;
            let (vlans, rejections) = self.deriver.collect_global_vlans(&rows, &head);
            self.record_rejections(rejections);
            info!(records = vlans.len(), "全局 VLAN 构建完成");
            Ok(vlans)
        })
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 需要生成配置的设备列表（排除防火墙类设备）
    pub fn device_list(&self) -> ImportResult<Vec<String>> {
        let basic = self.create_basic()?;
        Ok(basic
            .devices()
            .filter(|ci| !EXCLUDED_DEVICE_MARKERS.iter().any(|m| ci.contains(m)))
            .map(str::to_string)
            .collect())
    }

    /// 单台设备的全部类型化记录（审计导出使用）
    ///
    /// # 返回
    /// - Err(DeviceNotFound): 设备不在基础管理信息中
    pub fn device_records(&self, ci_name: &str) -> ImportResult<Vec<Record>> {
        let basic = self.create_basic()?;
        let Some(basic_records) = basic.get(ci_name) else {
            return Err(ImportError::DeviceNotFound(ci_name.to_string()));
        };

        let mut records = collect(Some(basic_records), Record::Basic);
        records.extend(collect(self.create_snmp()?.get(ci_name), Record::Snmp));
        records.extend(collect(self.create_vrf()?.get(ci_name), Record::Vrf));
        records.extend(collect(self.create_loopback()?.get(ci_name), Record::Loopback));
        records.extend(collect(self.create_gateway()?.get(ci_name), Record::Gateway));
        records.extend(collect(self.create_mlag()?.get(ci_name), Record::Mlag));
        records.extend(collect(self.create_l2_interface()?.get(ci_name), Record::L2Interface));
        records.extend(collect(self.create_l3_interface()?.get(ci_name), Record::L3Interface));
        records.extend(collect(
            self.create_downlink_interface()?.get(ci_name),
            Record::DownlinkInterface,
        ));
        records.extend(collect(self.create_netconf()?.get(ci_name), Record::NetConf));
        records.extend(collect(self.create_static_route()?.get(ci_name), Record::StaticRoute));
        records.extend(collect(self.create_bfd()?.get(ci_name), Record::Bfd));
        records.extend(self.create_global_vlan()?.iter().cloned().map(Record::GlobalVlan));
        Ok(records)
    }

    /// 本次运行累计的拒收行
    pub fn rejections(&self) -> Vec<RowRejection> {
        self.rejections.borrow().clone()
    }

    /// 已缓存的表区域数量
    pub fn cached_tables(&self) -> usize {
        self.cache.len()
    }
}

fn collect<T: Clone>(items: Option<&[T]>, wrap: fn(T) -> Record) -> Vec<Record> {
    items.unwrap_or(&[]).iter().cloned().map(wrap).collect()
}

/// VLANIF 接口按地址分配虚拟 MAC
///
/// # 规则
/// - 仅 Vlanif 开头且有地址的接口分配
/// - 同一地址（跨设备）共用同一 MAC，编号按地址首次出现顺序递增
/// - 编号超出两位十进制后不再分配
/// - 其他接口不分配
pub fn assign_virtual_macs(records: &mut DeviceRecords<L3InterfaceConfig>) {
    let mut ip_macs: HashMap<String, String> = HashMap::new();
    for (_, interfaces) in records.iter_mut() {
        for interface in interfaces.iter_mut() {
            if !interface.is_vlanif() {
                interface.assign_mac(None);
                continue;
            }
            let mac = interface.address().and_then(|ip| {
                if let Some(mac) = ip_macs.get(ip) {
                    return Some(mac.clone());
                }
                let mac = vrrp_virtual_mac(ip_macs.len() + 1)?;
                ip_macs.insert(ip.to_string(), mac.clone());
                Some(mac)
            });
            interface.assign_mac(mac);
        }
    }
}
