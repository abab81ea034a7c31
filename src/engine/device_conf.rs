// ==========================================
// LLD 配置生成工具 - 单设备渲染上下文
// ==========================================
// 职责: 把各类记录集合与 DevConfig 补充数据组装成单台设备的模板上下文
// 红线: 配置段开关 = DevConfig 开关 AND 该设备存在对应数据
// ==========================================

use crate::config::dev_config::DevConfig;
use crate::domain::device::{BasicConfig, LoopbackConfig, NetConfConfig, SnmpConfig, VrfConfig};
use crate::domain::interface::{InterfaceConfig, L3InterfaceConfig};
use crate::domain::routing::{BfdConfig, GatewayConfig, GlobalVlan, MlagConfig, StaticRouteConfig};
use crate::domain::types::DeviceRecords;
use crate::engine::collector::DeviceConfigCollector;
use crate::importer::error::{ImportError, ImportResult};
use serde::Serialize;
use tracing::{debug, info};

// ==========================================
// DeviceConfigContext
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct DeviceConfigContext {
    pub ci_name: String,

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

    pub basic: BasicConfig,
    pub vrf_data: Vec<VrfConfig>,
    pub snmp: Option<SnmpConfig>,
    pub mlag: Option<MlagConfig>,
    pub global_vlan: Vec<GlobalVlan>,
    pub gw: Vec<GatewayConfig>,
    pub l3_vlan: Vec<L3InterfaceConfig>,
    pub l3_phy: Vec<L3InterfaceConfig>,
    pub ndi_l2_data: Vec<InterfaceConfig>,
    pub server_data: Vec<InterfaceConfig>,
    pub netconf: Option<NetConfConfig>,
    pub look_back: Vec<LoopbackConfig>,
    pub static_route: Vec<StaticRouteConfig>,
    pub bfd_data: Vec<BfdConfig>,
}

impl DeviceConfigContext {
    /// 组装单台设备的上下文
    ///
    /// # 参数
    /// - collector: 记录集合（按需构建并缓存）
    /// - ci_name: 设备标识
    /// - dev_config: 设备补充配置
    ///
    /// # 返回
    /// - Err(DeviceNotFound): 设备不在基础管理信息中
    /// - Err(其他): 任一表区域构建失败
    pub fn build(
        collector: &DeviceConfigCollector,
        ci_name: &str,
        dev_config: &DevConfig,
    ) -> ImportResult<Self> {
        let options = &dev_config.option_config;
        let basic_settings = &dev_config.basic_config;

        let basic_records = collector.create_basic()?;
        let mut basic = basic_records
            .first(ci_name)
            .cloned()
            .ok_or_else(|| ImportError::DeviceNotFound(ci_name.to_string()))?;
        basic.apply_manage_settings(
            basic_settings.manage_gw_ip.as_deref(),
            basic_settings.manage_vrf_name.as_deref(),
            basic_settings.option_manage_mode,
            basic_settings.sftp,
        );

        let snmp = collector.create_snmp()?.first(ci_name).cloned().map(|mut snmp| {
            let settings = &dev_config.snmp_config;
            if settings.target_host.is_some() {
                snmp.option_target = true;
                snmp.udp_port = settings.udp_port;
                if let Some(name) = &settings.target_host_host_name {
                    snmp.target_host_host_name = Some(name.clone());
                }
            }
            snmp
        });
        let mlag = collector.create_mlag()?.first(ci_name).cloned();
        let netconf = collector.create_netconf()?.first(ci_name).cloned();

        let vrf_data = records_of(&*collector.create_vrf()?, ci_name);
        let gw = records_of(&*collector.create_gateway()?, ci_name);
        let (l3_vlan, l3_phy): (Vec<_>, Vec<_>) =
            records_of(&*collector.create_l3_interface()?, ci_name)
                .into_iter()
                .partition(L3InterfaceConfig::is_vlan_interface);
        let ndi_l2_data = records_of(&*collector.create_l2_interface()?, ci_name);
        let server_data = records_of(&*collector.create_downlink_interface()?, ci_name);
        let look_back = records_of(&*collector.create_loopback()?, ci_name);
        let static_route = records_of(&*collector.create_static_route()?, ci_name);
        let bfd_data = records_of(&*collector.create_bfd()?, ci_name);
        let global_vlan = collector.create_global_vlan()?.to_vec();

        let context = Self {
            ci_name: ci_name.to_string(),
            option_vrf: options.option_vrf && !vrf_data.is_empty(),
            option_snmp: options.option_snmp && snmp.is_some(),
            option_mlag: options.option_mlag && mlag.is_some(),
            option_batch_vlan: options.option_batch_vlan && !global_vlan.is_empty(),
            option_global_vlan: options.option_global_vlan && !global_vlan.is_empty(),
            option_gw: options.option_gw && !gw.is_empty(),
            option_l3_vlan: options.option_l3_vlan && !l3_vlan.is_empty(),
            option_l3_phy: options.option_l3_phy && !l3_phy.is_empty(),
            option_ndi_l2: options.option_ndi_l2 && !ndi_l2_data.is_empty(),
            option_server_int: options.option_server_int && !server_data.is_empty(),
            option_netconf: options.option_netconf && netconf.is_some(),
            option_look_back: options.option_look_back && !look_back.is_empty(),
            option_static_route: options.option_static_route && !static_route.is_empty(),
            option_bfd: options.option_bfd && !bfd_data.is_empty(),
            basic,
            vrf_data,
            snmp,
            mlag,
            global_vlan,
            gw,
            l3_vlan,
            l3_phy,
            ndi_l2_data,
            server_data,
            netconf,
            look_back,
            static_route,
            bfd_data,
        };
        debug!(ci_name, sections = ?context.enabled_sections(), "设备上下文已组装");
        info!(ci_name, "设备上下文组装完成");
        Ok(context)
    }

    /// 已开启的配置段名称（日志与 dump 使用）
    pub fn enabled_sections(&self) -> Vec<&'static str> {
        [
            ("vrf", self.option_vrf),
            ("snmp", self.option_snmp),
            ("mlag", self.option_mlag),
            ("batch_vlan", self.option_batch_vlan),
            ("global_vlan", self.option_global_vlan),
            ("gw", self.option_gw),
            ("l3_vlan", self.option_l3_vlan),
            ("l3_phy", self.option_l3_phy),
            ("ndi_l2", self.option_ndi_l2),
            ("server_int", self.option_server_int),
            ("netconf", self.option_netconf),
            ("look_back", self.option_look_back),
            ("static_route", self.option_static_route),
            ("bfd", self.option_bfd),
        ]
        .into_iter()
        .filter(|(_, on)| *on)
        .map(|(name, _)| name)
        .collect()
    }
}

fn records_of<T: Clone>(records: &DeviceRecords<T>, ci_name: &str) -> Vec<T> {
    records.get(ci_name).map(<[T]>::to_vec).unwrap_or_default()
}
