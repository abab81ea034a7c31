// ==========================================
// DeviceConfigCollector 集成测试
// ==========================================
// 测试目标: 验证 工作簿 → 表区域 → 派生 → 映射 的完整流程
// 数据来源: test_helpers 构造的内存工作簿
// ==========================================


use lld_config_gen::config::DevConfig;
use lld_config_gen::domain::{Record, RecordKind, VlanBatch, Workbook};
use lld_config_gen::engine::{DeviceConfigCollector, DeviceConfigContext, SnmpTarget};
use lld_config_gen::importer::{ImportError, TableCache};
use lld_config_gen::logging;
use std::rc::Rc;
use test_helpers::*;

// ==========================================
// 设备清单与基础信息
// ==========================================

#[test]
fn test_device_list_excludes_firewall_and_non_ssh() {
    logging::init_test();
    let collector = sample_collector();

    let devices = collector.device_list().unwrap();
    assert_eq!(devices, vec![LEAF1, LEAF2, MGMT]);

    // 防火墙仍有基础记录，只是不参与配置生成
    let basic = collector.create_basic().unwrap();
    assert!(basic.contains(FIREWALL));
    assert!(!basic.devices().any(|ci| ci.contains("S5700")));
}

#[test]
fn test_basic_records_use_device_identity() {
    logging::init_test();
    let collector = sample_collector();
    let basic = collector.create_basic().unwrap();

    let leaf1 = basic.first(LEAF1).unwrap();
    assert_eq!(leaf1.device_name, "HCS-leaf-CE6881-01");
    assert_eq!(leaf1.manage_ip, "10.0.0.1");
    assert_eq!(leaf1.manage_user, "admin");
    assert_eq!(leaf1.manage_vlan.as_deref(), Some("10"));

    // 空单元格规整为占位符
    let mgmt = basic.first(MGMT).unwrap();
    assert_eq!(mgmt.manage_vlan.as_deref(), Some("-"));
}

// ==========================================
// SNMP
// ==========================================

#[test]
fn test_snmp_version_rules_and_rejection() {
    logging::init_test();
    let collector = sample_collector();
    let snmp = collector.create_snmp().unwrap();

    let leaf1 = snmp.first(LEAF1).unwrap();
    assert_eq!(leaf1.version, "v3");
    assert_eq!(leaf1.read_community, None);
    assert_eq!(leaf1.authentication_pass.as_deref(), Some("Auth@123"));
    assert!(!leaf1.option_target);
    assert_eq!(leaf1.udp_port, 10162);

    let leaf2 = snmp.first(LEAF2).unwrap();
    assert_eq!(leaf2.version, "v2c");
    assert_eq!(leaf2.read_community.as_deref(), Some("public"));
    assert_eq!(leaf2.write_community.as_deref(), Some("private"));

    // v3 无认证/加密密码 → 拒收
    assert!(snmp.get(MGMT).is_none());
    let rejections = collector.rejections();
    assert_eq!(rejections.len(), 1);
    assert_eq!(rejections[0].kind, RecordKind::Snmp);
    assert!(rejections[0].reason.contains(MGMT));
}

#[test]
fn test_snmp_target_from_dev_config() {
    logging::init_test();
    let collector = sample_collector().with_snmp_target(SnmpTarget {
        target_host: Some("192.168.1.100".to_string()),
        udp_port: 162,
    });
    let snmp = collector.create_snmp().unwrap();

    let leaf1 = snmp.first(LEAF1).unwrap();
    assert!(leaf1.option_target);
    assert_eq!(leaf1.target_host.as_deref(), Some("192.168.1.100"));
    assert_eq!(leaf1.udp_port, 162);
    assert_eq!(leaf1.target_host_host_name.as_deref(), Some("host_namec0a80164"));
}

#[test]
fn test_snmp_community_columns_synthesized() {
    logging::init_test();
    let workbook = Workbook::new(vec![device_init_sheet_without_communities()]);
    let collector = DeviceConfigCollector::new(workbook, TableCache::new());

    let snmp = collector.create_snmp().unwrap();
    let leaf1 = snmp.first(LEAF1).unwrap();
    assert_eq!(leaf1.version, "v3");
    assert_eq!(leaf1.port.as_deref(), Some("161"));
    assert!(collector.rejections().is_empty());
}

// ==========================================
// 网关与全局 VLAN
// ==========================================

#[test]
fn test_gateway_rows_split_per_device() {
    logging::init_test();
    let collector = sample_collector();
    let gateways = collector.create_gateway().unwrap();

    // 无网关的行被跳过，每行拆为两台设备
    let leaf1 = gateways.get(LEAF1).unwrap();
    let leaf2 = gateways.get(LEAF2).unwrap();
    assert_eq!(leaf1.len(), 3);
    assert_eq!(leaf2.len(), 3);

    let vlan_ids: Vec<&str> = leaf1.iter().map(|gw| gw.vlan_id.as_str()).collect();
    assert_eq!(vlan_ids, vec!["100", "200-202", "210"]);

    assert_eq!(leaf1[0].gw_local_ip.as_deref(), Some("172.16.100.2"));
    assert_eq!(leaf2[0].gw_local_ip.as_deref(), Some("172.16.100.3"));
    assert_eq!(leaf1[0].gw_mask, "24");
    assert_eq!(leaf1[0].description.as_deref(), Some("业务平面"));
    assert!(leaf1[0].gw_mode);
    assert!(leaf1[0].option_vrf);

    // public VRF 不开启 option_vrf，local ip 为空时不是双活网关
    assert!(!leaf1[1].option_vrf);
    assert!(!leaf1[1].gw_mode);
    assert!(leaf1[1].option_gw_mac);
    assert!(!leaf1[0].option_gw_mac);
}

#[test]
fn test_vrrp_vrid_counts_across_table() {
    logging::init_test();
    let collector = sample_collector();
    let gateways = collector.create_gateway().unwrap();

    let vrids: Vec<Option<i64>> = gateways
        .get(LEAF1)
        .unwrap()
        .iter()
        .map(|gw| gw.vrrp_vrid)
        .collect();
    assert_eq!(vrids, vec![Some(1), Some(2), None]);

    // 同一行的两台设备共用 VRID
    let peer_vrids: Vec<Option<i64>> = gateways
        .get(LEAF2)
        .unwrap()
        .iter()
        .map(|gw| gw.vrrp_vrid)
        .collect();
    assert_eq!(peer_vrids, vrids);
}

#[test]
fn test_global_vlan_compressed_batch() {
    logging::init_test();
    let collector = sample_collector();
    let vlans = collector.create_global_vlan().unwrap();

    // 无网关的行仍参与全局 VLAN
    assert_eq!(vlans.len(), 4);
    assert_eq!(vlans[1].vlan_id, vec![200, 201, 202]);
    assert_eq!(vlans[2].vlan_id, vec![300]);
    assert_eq!(vlans[2].description.as_deref(), Some("管理平面"));

    let expected = vec![VlanBatch::Tail("100 200 to 202 210 300".to_string())];
    for vlan in vlans.iter() {
        assert_eq!(vlan.batch_vlan, expected);
    }
}

// ==========================================
// 接口
// ==========================================

#[test]
fn test_l3_interfaces_and_virtual_mac() {
    logging::init_test();
    let collector = sample_collector();
    let l3 = collector.create_l3_interface().unwrap();

    let leaf1 = l3.get(LEAF1).unwrap();
    assert_eq!(leaf1.len(), 3);
    assert_eq!(leaf1[0].phy, "Vlanif500");
    assert_eq!(leaf1[0].ip, "10.5.0.1");
    assert_eq!(leaf1[0].mask, "24");
    assert_eq!(leaf1[0].mac_add.as_deref(), Some("0000-5e00-0101"));
    assert!(leaf1[0].option_vrf);

    // 子接口: vid = 3000 + 99，物理接口不分配 MAC
    assert_eq!(leaf1[1].vid, Some(3099));
    assert_eq!(leaf1[1].mac_add, None);
    assert!(!leaf1[1].option_vrf);

    // 第 3 行对端地址完整，LEAF1 照常得到该接口并分配下一个 MAC
    assert_eq!(leaf1[2].phy, "Vlanif600");
    assert_eq!(leaf1[2].ip, "10.6.0.2");
    assert_eq!(leaf1[2].mac_add.as_deref(), Some("0000-5e00-0102"));

    // LEAF2 本端缺少掩码: 整台设备的三层接口都不生成
    assert!(l3.get(LEAF2).is_none());

    let border = l3.get(BORDER).unwrap();
    assert_eq!(border[0].vid, Some(3099));
    assert_eq!(border[0].ip, "10.30.0.2");

    let rejections = collector.rejections();
    assert_eq!(rejections.len(), 1);
    assert_eq!(rejections[0].kind, RecordKind::L3Interface);
    assert_eq!(rejections[0].row_number, 3);
    assert_eq!(rejections[0].device.as_deref(), Some(LEAF2));
}

#[test]
fn test_l2_interfaces_both_sides() {
    logging::init_test();
    let collector = sample_collector();
    let l2 = collector.create_l2_interface().unwrap();

    let leaf1 = &l2.get(LEAF1).unwrap()[0];
    assert_eq!(leaf1.phy, "10GE1/0/47");
    assert_eq!(leaf1.int_type.as_deref(), Some("trunk"));
    assert_eq!(leaf1.trunk_vlan.as_deref(), Some("100 200 to 202"));
    assert_eq!(
        leaf1.description.as_deref(),
        Some("HCS-spine-CE12800-10.0.0.40_100GE1/0/1")
    );
    assert!(leaf1.option_vray);
    assert!(leaf1.option_eth_trunk);
    assert!(leaf1.option_mlag);

    let spine = &l2.get("HCS-spine-CE12800-10.0.0.40").unwrap()[0];
    assert_eq!(spine.description.as_deref(), Some(&*format!("{}_10GE1/0/47", LEAF1)));
}

#[test]
fn test_downlink_interfaces() {
    logging::init_test();
    let collector = sample_collector();
    let downlink = collector.create_downlink_interface().unwrap();

    let leaf1 = downlink.get(LEAF1).unwrap();
    assert_eq!(leaf1.len(), 2);
    assert_eq!(leaf1[0].eth_trunk.as_deref(), Some("1"));
    assert_eq!(leaf1[0].lacp_mode.as_deref(), Some("active"));
    assert!(leaf1[0].lacp_timeout_mode);
    assert!(leaf1[0].force_up);
    assert_eq!(leaf1[0].trunk_vlan.as_deref(), Some("100 210"));
    assert_eq!(leaf1[0].pvid, "1");
    assert_eq!(leaf1[1].pvid, "100");
    assert_eq!(leaf1[0].description.as_deref(), Some("server-01_eth0"));

    // 非字母的 lacp 模式视为关闭
    let leaf2 = &downlink.get(LEAF2).unwrap()[0];
    assert_eq!(leaf2.lacp_mode, None);
    assert!(!leaf2.lacp_timeout_mode);
    assert!(!leaf2.force_up);
    assert_eq!(leaf2.untag_vlan, "10");
}

// ==========================================
// 路由与 BFD
// ==========================================

#[test]
fn test_static_route_rejects_bad_next_hop() {
    logging::init_test();
    let collector = sample_collector();
    let routes = collector.create_static_route().unwrap();

    let leaf1 = routes.get(LEAF1).unwrap();
    assert_eq!(leaf1.len(), 1);
    assert_eq!(leaf1[0].destination_net, "192.168.10.0");
    assert_eq!(leaf1[0].destination_mask, "24");
    assert!(leaf1[0].bfd);
    assert_eq!(leaf1[0].bfd_name.as_deref(), Some("storage_172.16.210.254"));

    let leaf2 = routes.get(LEAF2).unwrap();
    assert_eq!(leaf2[0].destination_mask, "0");
    assert!(!leaf2[0].bfd);

    let rejections = collector.rejections();
    assert_eq!(rejections.len(), 1);
    assert_eq!(rejections[0].kind, RecordKind::StaticRoute);
    assert!(rejections[0].reason.contains("not-an-ip"));
}

#[test]
fn test_bfd_source_ip_from_gateway() {
    logging::init_test();
    let collector = sample_collector();
    let bfd = collector.create_bfd().unwrap();

    let sessions = bfd.get(LEAF1).unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].bfd_name, "storage_172.16.210.254");
    assert_eq!(sessions[0].interface.as_deref(), Some("Vlanif210"));
    assert_eq!(sessions[0].source_ip.as_deref(), Some("172.16.210.1"));
    assert_eq!(sessions[0].discriminator_local.as_deref(), Some("10"));

    // 未关联 BFD 的设备没有会话
    assert!(bfd.get(LEAF2).is_none());
}

// ==========================================
// 其他记录
// ==========================================

#[test]
fn test_mlag_vrf_loopback_netconf() {
    logging::init_test();
    let collector = sample_collector();

    let mlag = collector.create_mlag().unwrap();
    let leaf1 = mlag.first(LEAF1).unwrap();
    assert_eq!(leaf1.peer_link_phy, vec!["100GE1/0/1", "100GE1/0/2"]);
    assert_eq!(leaf1.dad_peer_ip.as_deref(), Some("192.168.255.2"));
    assert_eq!(
        mlag.first(LEAF2).unwrap().dad_peer_ip.as_deref(),
        Some("192.168.255.1")
    );

    let vrf = collector.create_vrf().unwrap();
    let leaf1_vrfs = vrf.get(LEAF1).unwrap();
    assert_eq!(leaf1_vrfs.len(), 2);
    assert!(leaf1_vrfs[0].option_vrf_rt);
    assert!(!leaf1_vrfs[0].option_vrf_v6);
    assert!(leaf1_vrfs[1].option_vrf_v6);

    let loopback = collector.create_loopback().unwrap();
    assert_eq!(loopback.first(LEAF2).unwrap().ip, "1.1.1.2");
    assert_eq!(loopback.first(LEAF2).unwrap().id, "0");

    let netconf = collector.create_netconf().unwrap();
    assert_eq!(netconf.first(LEAF1).unwrap().password, "Netconf@123");
    assert_eq!(netconf.first(LEAF2).unwrap().user, "netconf");
}

// ==========================================
// 缓存与错误
// ==========================================

#[test]
fn test_collections_built_once() {
    logging::init_test();
    let collector = sample_collector();

    let first = collector.create_gateway().unwrap();
    let second = collector.create_gateway().unwrap();
    assert!(Rc::ptr_eq(&first, &second));

    // Basic / SNMP 共用同一表区域，Gateway / GlobalVlan 共用另一个
    collector.create_basic().unwrap();
    collector.create_snmp().unwrap();
    collector.create_global_vlan().unwrap();
    assert_eq!(collector.cached_tables(), 2);

    // 重复构建不重复记录拒收行
    collector.create_snmp().unwrap();
    assert_eq!(collector.rejections().len(), 1);
}

#[test]
fn test_all_rejections_collected() {
    logging::init_test();
    let collector = sample_collector();

    let records = collector.device_records(LEAF1).unwrap();
    let kinds: Vec<RecordKind> = collector.rejections().iter().map(|r| r.kind).collect();
    assert_eq!(kinds.len(), 3);
    assert!(kinds.contains(&RecordKind::Snmp));
    assert!(kinds.contains(&RecordKind::L3Interface));
    assert!(kinds.contains(&RecordKind::StaticRoute));

    assert!(matches!(records[0], Record::Basic(_)));
    assert!(records.iter().any(|r| r.kind() == RecordKind::Bfd));
    let global = records
        .iter()
        .filter(|r| r.kind() == RecordKind::GlobalVlan)
        .count();
    assert_eq!(global, 4);
}

#[test]
fn test_unknown_device_not_found() {
    logging::init_test();
    let collector = sample_collector();
    let result = collector.device_records("NO-SUCH-DEVICE");
    assert!(matches!(result, Err(ImportError::DeviceNotFound(_))));
}

#[test]
fn test_missing_end_marker() {
    logging::init_test();
    let mut sheet = device_init_sheet();
    let end_marker = Some("3、分布式存储设备管理信息".to_string());
    sheet
        .rows
        .retain(|row| row.first().and_then(|c| c.to_text()) != end_marker);
    let collector = DeviceConfigCollector::new(Workbook::new(vec![sheet]), TableCache::new());

    let result = collector.create_basic();
    assert!(matches!(result, Err(ImportError::MarkerNotFound { .. })));
}

#[test]
fn test_artifacts_written_to_data_dir() {
    logging::init_test();
    let temp_dir = tempfile::tempdir().unwrap();
    let store = lld_config_gen::importer::CsvArtifactStore::new(temp_dir.path());
    let collector = DeviceConfigCollector::new(
        sample_workbook(),
        TableCache::with_store(Box::new(store)),
    );

    collector.create_vrf().unwrap();
    collector.create_loopback().unwrap();

    let csv_files = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "csv"))
        .count();
    assert_eq!(csv_files, 2);
}

// ==========================================
// 设备上下文
// ==========================================

#[test]
fn test_context_flags_follow_data() {
    logging::init_test();
    let collector = sample_collector();
    let dev_config = DevConfig::with_devices(vec![LEAF1.to_string(), MGMT.to_string()]);

    let leaf1 = DeviceConfigContext::build(&collector, LEAF1, &dev_config).unwrap();
    assert_eq!(leaf1.enabled_sections().len(), 14);
    assert_eq!(leaf1.l3_vlan.len(), 2);
    assert_eq!(leaf1.l3_phy.len(), 1);
    assert_eq!(leaf1.global_vlan.len(), 4);

    // 只有基础信息与全局 VLAN 的设备
    let mgmt = DeviceConfigContext::build(&collector, MGMT, &dev_config).unwrap();
    assert!(!mgmt.option_snmp);
    assert!(!mgmt.option_gw);
    assert!(!mgmt.option_mlag);
    assert!(mgmt.option_global_vlan);
    assert!(mgmt.option_batch_vlan);
    assert_eq!(mgmt.enabled_sections(), vec!["batch_vlan", "global_vlan"]);
}

#[test]
fn test_context_respects_switches_and_settings() {
    logging::init_test();
    let collector = sample_collector();
    let mut dev_config = DevConfig::with_devices(vec![LEAF2.to_string()]);
    dev_config.option_config.option_vrf = false;
    dev_config.basic_config.manage_gw_ip = Some("10.0.0.254".to_string());
    dev_config.snmp_config.target_host = Some("192.168.1.100".to_string());
    dev_config.snmp_config.target_host_host_name = Some("nms".to_string());

    let context = DeviceConfigContext::build(&collector, LEAF2, &dev_config).unwrap();
    assert!(!context.option_vrf);
    assert!(!context.vrf_data.is_empty());
    assert!(context.basic.option_manage_gw);
    assert_eq!(context.basic.manage_gw_ip.as_deref(), Some("10.0.0.254"));

    let snmp = context.snmp.unwrap();
    assert!(snmp.option_target);
    assert_eq!(snmp.target_host_host_name.as_deref(), Some("nms"));
    assert_eq!(snmp.udp_port, dev_config.snmp_config.udp_port);
}

#[test]
fn test_context_unknown_device() {
    logging::init_test();
    let collector = sample_collector();
    let dev_config = DevConfig::default();
    let result = DeviceConfigContext::build(&collector, "NO-SUCH-DEVICE", &dev_config);
    assert!(matches!(result, Err(ImportError::DeviceNotFound(_))));
}
