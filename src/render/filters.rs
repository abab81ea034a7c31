// ==========================================
// LLD 配置生成工具 - 模板过滤器
// ==========================================
// 职责: 注册到 tera 的设备配置专用过滤器
// ==========================================

use std::collections::{HashMap, HashSet};
use tera::{Tera, Value};
use tracing::debug;

/// 需要配置 STP 根桥的设备名关键字
const STP_ROOT_MARKERS: [&str; 3] = ["cs", "spine", "core"];

/// 注册全部过滤器
pub fn register_filters(tera: &mut Tera) {
    tera.register_filter("stp_root_filter", stp_root_filter);
    tera.register_filter("unique_by_eth_trunk", unique_by_eth_trunk);
    tera.register_filter("first_part", first_part);
}

/// 设备名包含 cs / spine / core 时为 true
pub fn stp_root_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let name = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("stp_root_filter 需要字符串参数"))?;
    let is_root = STP_ROOT_MARKERS.iter().any(|m| name.contains(m));
    debug!(name, is_root, "stp_root_filter");
    Ok(Value::Bool(is_root))
}

/// 按 eth_trunk 去重，保留首次出现的接口
///
/// 数据按物理口采集，同一 Eth-Trunk 的成员口只渲染一次聚合口
pub fn unique_by_eth_trunk(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let items = value
        .as_array()
        .ok_or_else(|| tera::Error::msg("unique_by_eth_trunk 需要列表参数"))?;

    let mut seen = HashSet::new();
    let unique: Vec<Value> = items
        .iter()
        .filter(|item| {
            let key = item.get("eth_trunk").cloned().unwrap_or(Value::Null).to_string();
            seen.insert(key)
        })
        .cloned()
        .collect();
    Ok(Value::Array(unique))
}

/// 取第一个 `_` 之前的部分（对端描述 → 对端设备名）
pub fn first_part(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("first_part 需要字符串参数"))?;
    let head = text.split('_').next().unwrap_or_default();
    Ok(Value::String(head.to_string()))
}
