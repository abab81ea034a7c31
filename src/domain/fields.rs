// ==========================================
// LLD 配置生成工具 - 记录构造入参
// ==========================================
// 职责: 字段映射后的具名参数集合 + 记录构造 trait + 行级校验错误
// 红线: 记录只能经由 FromFields 构造，构造即校验
// ==========================================

use crate::domain::types::{is_blank_value, FieldValue, RecordKind};
use std::collections::HashMap;
use thiserror::Error;

// ==========================================
// 行级校验错误 (Record Error)
// ==========================================
// 单行数据不满足记录规则，调用方决定跳过该行或中止
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("缺少必填字段: {0}")]
    MissingField(String),

    #[error("字段 {field} 取值非法 ({value}): {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    Rule(String),
}

impl RecordError {
    pub fn invalid(field: &str, value: &str, reason: impl Into<String>) -> Self {
        RecordError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

// ==========================================
// 构造入参 (Fields)
// ==========================================
// 键为记录字段名（已完成别名重命名）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    values: HashMap<String, FieldValue>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// 链式构造（测试与派生步骤使用）
    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// 文本值（缺失或 Null 返回 None，占位符原样保留）
    pub fn text(&self, name: &str) -> Option<String> {
        self.values.get(name).and_then(FieldValue::as_text)
    }

    /// 有效文本值（空串与占位符视为无值）
    pub fn present(&self, name: &str) -> Option<String> {
        self.text(name).filter(|v| !is_blank_value(v))
    }

    /// 必填文本值
    pub fn required(&self, name: &str) -> Result<String, RecordError> {
        self.text(name)
            .ok_or_else(|| RecordError::MissingField(name.to_string()))
    }

    /// 布尔标记（Bool 原值，文本 true/false 兼容）
    pub fn flag(&self, name: &str) -> bool {
        match self.values.get(name) {
            Some(FieldValue::Bool(b)) => *b,
            Some(FieldValue::Text(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// 整数值
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(FieldValue::Int(i)) => Some(*i),
            Some(FieldValue::Text(s)) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

// ==========================================
// FromFields Trait
// ==========================================
// 用途: 类型化记录的唯一构造入口
// 实现者: domain::device / domain::interface / domain::routing 中的全部记录
pub trait FromFields: Sized {
    /// 记录种类
    const KIND: RecordKind;

    /// 可接受的字段名（映射阶段据此检查别名结果）
    const FIELDS: &'static [&'static str];

    /// 按字段构造并执行校验/派生规则
    fn from_fields(fields: &Fields) -> Result<Self, RecordError>;
}
