// ==========================================
// LLD 配置生成工具 - 领域类型定义
// ==========================================
// 依据: LLD 规划表约定 - 占位符 / 字段值 / 记录种类
// 职责: 跨层共享的基础值类型（不含解析与业务逻辑）
// ==========================================

use indexmap::IndexMap;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 空值占位符（规划表内"无值"的统一写法）
pub const PLACEHOLDER: &str = "-";

/// 判断文本是否为"无值"（空串或占位符）
pub fn is_blank_value(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == PLACEHOLDER
}

// ==========================================
// 字段值 (Field Value)
// ==========================================
// 行内单元格在映射阶段的动态值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Bool(bool),
    Null,
}

impl FieldValue {
    /// 转为文本形式（Null 返回 None）
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Int(i) => Some(i.to_string()),
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::Null => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Null => write!(f, "None"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

// ==========================================
// 记录种类 (Record Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Basic,
    Snmp,
    Vrf,
    Loopback,
    Gateway,
    Mlag,
    L2Interface,
    L3Interface,
    DownlinkInterface,
    NetConf,
    StaticRoute,
    Bfd,
    GlobalVlan,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Basic => "basic",
            RecordKind::Snmp => "snmp",
            RecordKind::Vrf => "vrf",
            RecordKind::Loopback => "loopback",
            RecordKind::Gateway => "gateway",
            RecordKind::Mlag => "mlag",
            RecordKind::L2Interface => "l2_interface",
            RecordKind::L3Interface => "l3_interface",
            RecordKind::DownlinkInterface => "downlink_interface",
            RecordKind::NetConf => "netconf",
            RecordKind::StaticRoute => "static_route",
            RecordKind::Bfd => "bfd",
            RecordKind::GlobalVlan => "global_vlan",
        };
        write!(f, "{}", name)
    }
}

// ==========================================
// 设备记录集合 (Device Records)
// ==========================================
// 设备标识 → 记录列表，保持首次出现的设备顺序
#[derive(Debug, Clone)]
pub struct DeviceRecords<T> {
    entries: IndexMap<String, Vec<T>>,
}

impl<T> Default for DeviceRecords<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<T> DeviceRecords<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条记录（设备首次出现时登记顺序）
    pub fn push(&mut self, device: impl Into<String>, record: T) {
        self.entries.entry(device.into()).or_default().push(record);
    }

    /// 移除一台设备的全部记录（保持其余设备顺序）
    pub fn remove(&mut self, device: &str) -> Option<Vec<T>> {
        self.entries.shift_remove(device)
    }

    pub fn get(&self, device: &str) -> Option<&[T]> {
        self.entries.get(device).map(Vec::as_slice)
    }

    pub fn first(&self, device: &str) -> Option<&T> {
        self.entries.get(device).and_then(|list| list.first())
    }

    pub fn contains(&self, device: &str) -> bool {
        self.entries.contains_key(device)
    }

    /// 按首次出现顺序遍历设备标识
    pub fn devices(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// 按设备顺序遍历 (设备, 记录列表)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.entries
            .iter()
            .map(|(device, list)| (device.as_str(), list.as_slice()))
    }

    /// 按设备顺序可变遍历（仅供构建阶段的派生步骤使用）
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Vec<T>)> {
        self.entries
            .iter_mut()
            .map(|(device, list)| (device.as_str(), list))
    }

    /// 设备数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 记录总数
    pub fn record_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

impl<T: Serialize> Serialize for DeviceRecords<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}
