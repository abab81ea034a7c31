// ==========================================
// LLD 配置生成工具 - 表格领域模型
// ==========================================
// 依据: LLD 规划表结构 - 工作簿 / 工作表 / 表区域
// 职责: 工作簿内存模型、表区域描述、规整后的扁平表与行
// ==========================================

use crate::domain::types::FieldValue;
use std::collections::HashMap;

// ==========================================
// 单元格 (Cell)
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    /// 单元格文本形式（整数值的浮点数去掉小数部分）
    pub fn to_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(n.to_string())
                }
            }
            Cell::Bool(b) => Some(b.to_string()),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

// ==========================================
// 工作表 / 工作簿 (Sheet / Workbook)
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// 从文本网格构造（空串视为空单元格，测试与 CSV 回读使用）
    pub fn from_text_rows(name: impl Into<String>, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|v| Cell::from(*v)).collect())
            .collect();
        Self::new(name, rows)
    }

    /// 最大列数
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn add_sheet(&mut self, sheet: Sheet) {
        self.sheets.retain(|s| s.name != sheet.name);
        self.sheets.push(sheet);
    }
}

// ==========================================
// 表区域描述 (Table Region)
// ==========================================
// 标记均为空时表示整表模式
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableRegion {
    pub sheet_name: String,
    pub start_marker: Option<String>,
    pub end_marker: Option<String>,
    /// 规整后作为表头行的行偏移（仅标记模式生效）
    pub output_offset: usize,
}

impl TableRegion {
    /// 整表模式
    pub fn whole_sheet(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            start_marker: None,
            end_marker: None,
            output_offset: 0,
        }
    }

    /// 标记模式: start_marker 所在行之后，end_marker 所在行之前
    pub fn between(
        sheet_name: impl Into<String>,
        start_marker: impl Into<String>,
        end_marker: Option<&str>,
        output_offset: usize,
    ) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            start_marker: Some(start_marker.into()),
            end_marker: end_marker.map(str::to_string),
            output_offset,
        }
    }

    pub fn is_whole_sheet(&self) -> bool {
        self.start_marker.is_none() && self.end_marker.is_none()
    }

    /// 中间表落盘文件名（不含扩展名）
    pub fn artifact_name(&self) -> &str {
        self.start_marker.as_deref().unwrap_or(&self.sheet_name)
    }
}

// ==========================================
// 行过滤条件 (Row Filter)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFilter {
    pub column: String,
    pub value: String,
}

impl RowFilter {
    pub fn equals(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

// ==========================================
// 规整后的扁平表 (Normalized Table)
// ==========================================
// 表头唯一，单元格均已填充（空值为占位符）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl NormalizedTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// 转为行记录（row_number 从 1 开始计数）
    pub fn to_rows(&self) -> Vec<Row> {
        self.rows
            .iter()
            .enumerate()
            .map(|(idx, values)| {
                let mut row = Row::new(idx + 1);
                for (header, value) in self.headers.iter().zip(values.iter()) {
                    row.set(header.clone(), FieldValue::Text(value.clone()));
                }
                row
            })
            .collect()
    }
}

// ==========================================
// 行记录 (Row)
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub row_number: usize,
    cells: HashMap<String, FieldValue>,
}

impl Row {
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            cells: HashMap::new(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.cells.get(column)
    }

    /// 列文本（缺列或 Null 返回 None）
    pub fn text(&self, column: &str) -> Option<String> {
        self.cells.get(column).and_then(FieldValue::as_text)
    }

    /// 列文本，缺失时返回空串
    pub fn text_or_empty(&self, column: &str) -> String {
        self.text(column).unwrap_or_default()
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<FieldValue>) {
        self.cells.insert(column.into(), value.into());
    }

    pub fn contains(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }
}
