// ==========================================
// 配置层与命令集成测试
// ==========================================
// 测试目标: settings.yaml / DevConfig.yaml 读写，AppState 组装与 lld 命令
// ==========================================


use lld_config_gen::app::{commands, AppState};
use lld_config_gen::config::{AppConfig, ConfigError, DevConfig, DEV_CONFIG_FILE};
use lld_config_gen::engine::SnmpTarget;
use lld_config_gen::importer::ImportError;
use lld_config_gen::logging;
use std::fs;
use test_helpers::*;

#[test]
fn test_settings_layout_resolved_from_base_dir() {
    logging::init_test();
    let temp_dir = tempfile::tempdir().unwrap();
    let settings_dir = write_settings(temp_dir.path());

    let config = AppConfig::load(&settings_dir).unwrap();
    let data_dir = config.data_dir().unwrap();
    assert_eq!(data_dir, temp_dir.path().join("data"));
    assert!(data_dir.exists());
    assert_eq!(config.save_config_dir().unwrap(), data_dir.join("configs"));
    assert_eq!(config.lld_file().unwrap(), data_dir.join("LLD.xlsx"));

    // 型号映射保持文件中的顺序
    let mapping = config.model_mapping();
    assert_eq!(mapping[0], ("CE68".to_string(), "CE68XX".to_string()));
    assert_eq!(config.template_for("S57XX"), "s57.jinja2");
    assert_eq!(config.template_for("CE12800"), "base.jinja2");
}

#[test]
fn test_lld_command_updates_settings() {
    logging::init_test();
    let temp_dir = tempfile::tempdir().unwrap();
    let settings_dir = write_settings(temp_dir.path());
    let mut state = AppState::load(&settings_dir).unwrap();

    // 两个参数都未指定时不改写文件
    assert_eq!(commands::lld(&mut state, None, None).unwrap(), None);

    let updated = commands::lld(&mut state, Some("HCS_LLD_v2.xlsx"), None).unwrap();
    assert_eq!(updated, Some(settings_dir.join("settings.yaml")));

    let reloaded = AppConfig::load(&settings_dir).unwrap();
    assert_eq!(reloaded.lld_file_name.as_deref(), Some("HCS_LLD_v2.xlsx"));
    assert_eq!(reloaded.template_name.len(), 2);

    // LLD_FILE 优先于 LLD_FILE_NAME
    let external = temp_dir.path().join("elsewhere").join("LLD.xlsx");
    commands::lld(&mut state, None, Some(&external)).unwrap();
    let reloaded = AppConfig::load(&settings_dir).unwrap();
    assert_eq!(reloaded.lld_file().unwrap(), external);
    assert_eq!(state.config.lld_file().unwrap(), external);
}

#[test]
fn test_dev_config_written_with_comments_and_reloaded() {
    logging::init_test();
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join(DEV_CONFIG_FILE);

    let mut config = DevConfig::with_devices(vec![LEAF1.to_string(), LEAF2.to_string()]);
    config.snmp_config.target_host = Some("192.168.1.100".to_string());
    config.option_config.option_bfd = false;
    config.write(&path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("# 该配置文件主要用于补充LLD内没有的数据"));
    assert!(content.contains("ci_name_list:"));

    let reloaded = DevConfig::load(&path).unwrap();
    assert_eq!(reloaded, config);
}

#[test]
fn test_run_requires_init() {
    logging::init_test();
    let temp_dir = tempfile::tempdir().unwrap();
    let settings_dir = write_settings(temp_dir.path());
    let state = AppState::load(&settings_dir).unwrap();

    let err = commands::run(&state).unwrap_err();
    let cause = err.downcast_ref::<ConfigError>();
    assert!(matches!(cause, Some(ConfigError::FileNotFound(_))));
}

#[test]
fn test_init_reports_missing_workbook() {
    logging::init_test();
    let temp_dir = tempfile::tempdir().unwrap();
    let settings_dir = write_settings(temp_dir.path());
    let state = AppState::load(&settings_dir).unwrap();

    let err = commands::init(&state).unwrap_err();
    let cause = err.downcast_ref::<ImportError>();
    assert!(matches!(cause, Some(ImportError::FileNotFound(_))));
    assert!(!state.dev_config_path().exists());
}

#[test]
fn test_renderer_built_from_settings() {
    logging::init_test();
    let temp_dir = tempfile::tempdir().unwrap();
    let settings_dir = write_settings(temp_dir.path());
    write_templates(&temp_dir.path().join("templates"));
    let state = AppState::load(&settings_dir).unwrap();

    let renderer = state.renderer().unwrap();
    assert_eq!(renderer.template_for(MGMT).1, "s57.jinja2");
    assert_eq!(
        renderer.save_dir(),
        temp_dir.path().join("data").join("configs").as_path()
    );
}

#[test]
fn test_collect_records_for_dump() {
    logging::init_test();
    let collector = sample_collector().with_snmp_target(SnmpTarget::default());

    let all = commands::collect_records(&collector, None).unwrap();
    let devices: Vec<&str> = all.keys().map(String::as_str).collect();
    assert_eq!(devices.len(), 3);
    assert!(!devices.contains(&FIREWALL));

    let single = commands::collect_records(&collector, Some(LEAF2)).unwrap();
    assert_eq!(single.len(), 1);
    let json = serde_json::to_value(&single).unwrap();
    assert_eq!(json[LEAF2][0]["kind"], "basic");
    assert_eq!(json[LEAF2][0]["record"]["manage_ip"], "10.0.0.2");

    assert!(commands::collect_records(&collector, Some("NO-SUCH-DEVICE")).is_err());
}
