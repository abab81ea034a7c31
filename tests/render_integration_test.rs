// ==========================================
// ConfigRenderer 集成测试
// ==========================================
// 测试目标: 设备上下文 → 型号模板 → <ci_name>.txt
// 模板: 临时目录中的测试模板（使用全部自定义过滤器）
// ==========================================


use lld_config_gen::config::DevConfig;
use lld_config_gen::engine::DeviceConfigContext;
use lld_config_gen::logging;
use lld_config_gen::render::{ConfigRenderer, ModelResolver, RenderError, DEFAULT_MODEL};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use test_helpers::*;

fn model_mapping() -> Vec<(String, String)> {
    vec![
        ("CE68".to_string(), "CE68XX".to_string()),
        ("S57".to_string(), "S57XX".to_string()),
    ]
}

fn template_names() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("CE68XX".to_string(), "ce68.jinja2".to_string()),
        ("S57XX".to_string(), "s57.jinja2".to_string()),
    ])
}

fn create_renderer(base: &Path, template_name: BTreeMap<String, String>) -> ConfigRenderer {
    let templates_dir = base.join("templates");
    write_templates(&templates_dir);
    let resolver = ModelResolver::new(model_mapping()).unwrap();
    ConfigRenderer::from_dir(&templates_dir, template_name, resolver, base.join("configs")).unwrap()
}

fn build_context(ci_name: &str) -> DeviceConfigContext {
    let collector = sample_collector();
    let dev_config = DevConfig::with_devices(vec![ci_name.to_string()]);
    DeviceConfigContext::build(&collector, ci_name, &dev_config).unwrap()
}

#[test]
fn test_template_selection_by_model() {
    logging::init_test();
    let temp_dir = tempfile::tempdir().unwrap();
    let renderer = create_renderer(temp_dir.path(), template_names());

    assert_eq!(
        renderer.template_for(LEAF1),
        ("CE68XX".to_string(), "ce68.jinja2".to_string())
    );
    assert_eq!(
        renderer.template_for(MGMT),
        ("S57XX".to_string(), "s57.jinja2".to_string())
    );
    // 设备名中没有型号片段 → 默认模板
    assert_eq!(
        renderer.template_for(FIREWALL),
        (DEFAULT_MODEL.to_string(), "base.jinja2".to_string())
    );
}

#[test]
fn test_render_leaf_config() {
    logging::init_test();
    let temp_dir = tempfile::tempdir().unwrap();
    let renderer = create_renderer(temp_dir.path(), template_names());

    let output = renderer.render(build_context(LEAF1)).unwrap();

    assert!(output.starts_with(&format!("sysname {}\n", LEAF1)));
    assert!(output.contains("ip vpn-instance vpn1\n route-distinguisher 100:1\n"));
    assert!(output.contains("ip vpn-instance vpn2\n"));
    assert!(output.contains("vlan batch 100 200 to 202 210 300\n"));
    assert!(output.contains("interface Vlanif100\n vrrp vrid 1 virtual-ip 172.16.100.1\n"));
    assert!(output.contains("interface Vlanif210\n"));
    assert!(!output.contains("virtual-ip 172.16.210.1"));

    // 同一 Eth-Trunk 的成员口只生成一个聚合口
    assert_eq!(output.matches("interface Eth-Trunk1\n").count(), 1);
    assert!(output.contains(" description server-01\n"));

    assert!(!output.contains("stp root primary"));
    assert!(output.contains(
        "bfd storage_172.16.210.254 bind peer-ip 172.16.210.254 source-ip 172.16.210.1\n"
    ));
}

#[test]
fn test_render_s57xx_overrides() {
    logging::init_test();
    let temp_dir = tempfile::tempdir().unwrap();
    let renderer = create_renderer(temp_dir.path(), template_names());

    let context = build_context(MGMT);
    assert!(context.option_global_vlan);
    let output = renderer.render(context).unwrap();

    assert!(output.contains("manage-int MEth0/0/1\n"));
    assert!(output.contains("global-vlan false\n"));
}

#[test]
fn test_render_device_writes_txt() {
    logging::init_test();
    let temp_dir = tempfile::tempdir().unwrap();
    let renderer = create_renderer(temp_dir.path(), template_names());

    let path = renderer.render_device(build_context(LEAF2)).unwrap();
    assert_eq!(path, temp_dir.path().join("configs").join(format!("{}.txt", LEAF2)));

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with(&format!("sysname {}\n", LEAF2)));
    // LEAF2 没有 BFD 会话
    assert!(!content.contains("bfd "));

    // 再次渲染覆盖已有文件
    let again = renderer.render_device(build_context(LEAF2)).unwrap();
    assert_eq!(again, path);
}

#[test]
fn test_missing_template_is_reported() {
    logging::init_test();
    let temp_dir = tempfile::tempdir().unwrap();
    let names = BTreeMap::from([("CE68XX".to_string(), "missing.jinja2".to_string())]);
    let renderer = create_renderer(temp_dir.path(), names);

    let result = renderer.render(build_context(LEAF1));
    match result {
        Err(RenderError::TemplateNotFound { template, ci_name }) => {
            assert_eq!(template, "missing.jinja2");
            assert_eq!(ci_name, LEAF1);
        }
        other => panic!("期望 TemplateNotFound，实际: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_unknown_filter_fails_render() {
    logging::init_test();
    let temp_dir = tempfile::tempdir().unwrap();
    let templates_dir = temp_dir.path().join("templates");
    write_templates(&templates_dir);
    fs::write(templates_dir.join("ce68.jinja2"), "{{ ci_name | no_such_filter }}").unwrap();

    let resolver = ModelResolver::new(model_mapping()).unwrap();
    let result = ConfigRenderer::from_dir(
        &templates_dir,
        template_names(),
        resolver,
        temp_dir.path().join("configs"),
    );
    // 未知过滤器在加载或渲染阶段报错，均不产生输出文件
    match result {
        Ok(renderer) => {
            let err = renderer.render_device(build_context(LEAF1)).unwrap_err();
            assert!(matches!(err, RenderError::Render { .. }));
        }
        Err(err) => assert!(matches!(err, RenderError::TemplateLoad { .. })),
    }
    assert!(!temp_dir.path().join("configs").join(format!("{}.txt", LEAF1)).exists());
}
