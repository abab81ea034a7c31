// ==========================================
// LLD 配置生成工具 - 字段映射器实现
// ==========================================
// 依据: 字段分组表 + 别名表 约定
// 职责: 行记录 → 按设备分组的类型化记录
// ==========================================
// 流程（每行 × 每个分组）:
// 1. 分组键字段 → 源列 → 设备标识
// 2. 值字段 → 源列 → 取值 → 别名重命名为记录字段名
// 3. FromFields 构造（校验失败的行记入拒收清单）
// 4. 按失败策略处理: 丢弃该行，或丢弃该设备的全部同类记录
// ==========================================

use crate::domain::fields::{Fields, FromFields};
use crate::domain::table::Row;
use crate::domain::table_head::TableHead;
use crate::domain::types::{is_blank_value, DeviceRecords, FieldValue};
use crate::importer::error::{ImportError, ImportResult, RowRejection};
use std::collections::HashSet;
use tracing::{debug, warn};

// ==========================================
// 映射规则 (Field Mapping)
// ==========================================

/// 一个分组: 分组键字段 + 该组的值字段
#[derive(Debug, Clone, Copy)]
pub struct FieldGroup {
    pub key: &'static str,
    pub fields: &'static [&'static str],
}

/// 行校验失败时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// 该设备不再有此类记录（对应的 option 开关随之为 false）
    DropDevice,
    /// 仅丢弃出错的行，其余行照常构造
    DropRow,
}

/// 一种记录的完整映射规则
#[derive(Debug, Clone, Copy)]
pub struct FieldMapping {
    pub groups: &'static [FieldGroup],
    /// 规范字段名 → 记录字段名（未列出的字段名保持不变）
    pub aliases: &'static [(&'static str, &'static str)],
    pub on_failure: FailurePolicy,
}

impl FieldMapping {
    pub fn alias<'a>(&self, field: &'a str) -> &'a str {
        self.aliases
            .iter()
            .find(|(from, _)| *from == field)
            .map(|(_, to)| *to)
            .unwrap_or(field)
    }
}

/// 映射结果: 记录集合 + 被拒收的行
#[derive(Debug)]
pub struct MappingOutcome<T> {
    pub records: DeviceRecords<T>,
    pub rejections: Vec<RowRejection>,
}

// ==========================================
// Field Mapper 实现
// ==========================================
pub struct FieldMapper;

impl FieldMapper {
    /// 校验映射规则与表头、记录字段是否一致
    ///
    /// # 规则
    /// - 分组键与值字段必须在表头中声明
    /// - 别名后的字段名必须被记录构造接受
    pub fn validate<T: FromFields, H: TableHead>(
        &self,
        head: &H,
        mapping: &FieldMapping,
    ) -> ImportResult<()> {
        let mismatch = |field: &str| ImportError::SchemaMismatch {
            kind: head.kind(),
            field: field.to_string(),
        };

        for group in mapping.groups {
            head.column(group.key).ok_or_else(|| mismatch(group.key))?;
            for field in group.fields {
                head.column(field).ok_or_else(|| mismatch(field))?;
                let renamed = mapping.alias(field);
                if !T::FIELDS.contains(&renamed) {
                    return Err(mismatch(renamed));
                }
            }
        }
        Ok(())
    }

    /// 按映射规则把行记录分组构造为类型化记录
    ///
    /// # 参数
    /// - rows: 已完成派生的行记录
    /// - upstream: 派生阶段已拒收的行（DropDevice 时其设备不再接收记录）
    /// - head: 表头结构
    /// - mapping: 分组、别名与失败策略
    ///
    /// # 返回
    /// - Ok(MappingOutcome): 设备 → 记录列表（保持设备首次出现顺序）与拒收行
    /// - Err(SchemaMismatch): 映射规则与表头/数据列不一致
    pub fn map_rows<T: FromFields, H: TableHead>(
        &self,
        rows: &[Row],
        upstream: &[RowRejection],
        head: &H,
        mapping: &FieldMapping,
    ) -> ImportResult<MappingOutcome<T>> {
        self.validate::<T, H>(head, mapping)?;

        let drop_device = mapping.on_failure == FailurePolicy::DropDevice;
        let mut failed: HashSet<String> = if drop_device {
            upstream.iter().filter_map(|r| r.device.clone()).collect()
        } else {
            HashSet::new()
        };
        let mut records = DeviceRecords::new();
        let mut rejections = Vec::new();

        for row in rows {
            for group in mapping.groups {
                let key_column = self.resolve_column(head, row, group.key)?;
                let device = row.text_or_empty(key_column);
                if is_blank_value(&device) {
                    debug!(row = row.row_number, key = group.key, "分组键为空，跳过");
                    continue;
                }

                let mut fields = Fields::new();
                for field in group.fields {
                    let column = self.resolve_column(head, row, field)?;
                    let value = row.get(column).cloned().unwrap_or(FieldValue::Null);
                    fields.insert(mapping.alias(field), value);
                }

                match T::from_fields(&fields) {
                    Ok(_) if failed.contains(&device) => {
                        debug!(
                            device = %device,
                            kind = %head.kind(),
                            row = row.row_number,
                            "设备已有行被拒收，丢弃该记录"
                        );
                    }
                    Ok(record) => {
                        debug!(device = %device, kind = %head.kind(), "记录构造完成");
                        records.push(device, record);
                    }
                    Err(source) => {
                        let reason = format!("{}: {}", device, source);
                        let err = ImportError::RecordValidation {
                            kind: head.kind(),
                            row: row.row_number,
                            source,
                        };
                        warn!(device = %device, error = %err, "记录校验失败，跳过该行");
                        rejections.push(
                            RowRejection::new(head.kind(), row.row_number, reason)
                                .for_device(device.as_str()),
                        );
                        if drop_device && failed.insert(device.clone()) {
                            let dropped = records.remove(&device).map_or(0, |list| list.len());
                            warn!(
                                device = %device,
                                kind = %head.kind(),
                                dropped,
                                "设备该类记录整体丢弃"
                            );
                        }
                    }
                }
            }
        }

        Ok(MappingOutcome {
            records,
            rejections,
        })
    }

    /// 字段 → 源列，并确认数据行中存在该列
    fn resolve_column<'h, H: TableHead>(
        &self,
        head: &'h H,
        row: &Row,
        field: &str,
    ) -> ImportResult<&'h str> {
        let column = head.column(field).ok_or_else(|| ImportError::SchemaMismatch {
            kind: head.kind(),
            field: field.to_string(),
        })?;
        if !row.contains(column) {
            return Err(ImportError::SchemaMismatch {
                kind: head.kind(),
                field: format!("{}（源列 '{}' 不存在）", field, column),
            });
        }
        Ok(column)
    }
}
