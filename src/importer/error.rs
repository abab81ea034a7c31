// ==========================================
// LLD 配置生成工具 - 导入模块错误类型
// ==========================================
// 依据: 工作簿解析 / 表区域定位 / 字段映射 三阶段失败分类
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::fields::RecordError;
use crate::domain::types::RecordKind;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xlsm/.xls）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 表区域定位错误 =====
    #[error("工作表不存在: {0}")]
    SheetNotFound(String),

    #[error("工作表 {sheet} 中未找到标记: {marker}")]
    MarkerNotFound { sheet: String, marker: String },

    #[error("中间表写入失败: {0}")]
    ArtifactWriteError(String),

    // ===== 字段映射错误 =====
    #[error("表头结构不匹配 ({kind}): 字段 {field} 无法解析")]
    SchemaMismatch { kind: RecordKind, field: String },

    #[error("记录校验失败 ({kind}, 行 {row}): {source}")]
    RecordValidation {
        kind: RecordKind,
        row: usize,
        #[source]
        source: RecordError,
    },

    // ===== 设备查询错误 =====
    #[error("设备不存在于基础管理信息表: {0}")]
    DeviceNotFound(String),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

// ==========================================
// 行拒收记录 (Row Rejection)
// ==========================================
// 单行因格式/规则问题被跳过，不中止整体处理
#[derive(Debug, Clone, PartialEq)]
pub struct RowRejection {
    pub kind: RecordKind,
    pub row_number: usize,
    /// 该行归属的设备（无法确定时为 None）
    pub device: Option<String>,
    pub reason: String,
}

impl RowRejection {
    pub fn new(kind: RecordKind, row_number: usize, reason: impl Into<String>) -> Self {
        Self {
            kind,
            row_number,
            device: None,
            reason: reason.into(),
        }
    }

    pub fn for_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }
}

impl std::fmt::Display for RowRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] 行 {}: {}", self.kind, self.row_number, self.reason)
    }
}
