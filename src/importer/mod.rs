// ==========================================
// LLD 配置生成工具 - 导入层
// ==========================================
// 职责: 工作簿解析 → 表区域定位与规整 → 行派生 → 字段映射
// 支持: Excel (xlsx/xls/ods)，中间表以 CSV 落盘
// ==========================================

// 模块声明
pub mod derivation;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;
pub mod table_cache;
pub mod table_locator;
pub mod table_writer;

// 重导出核心类型
pub use derivation::{DerivationService, DerivedRows};
pub use error::{ImportError, ImportResult, RowRejection};
pub use field_mapper::{FieldGroup, FieldMapper, FieldMapping, MappingOutcome};
pub use file_parser::ExcelParser;
pub use table_cache::{Memo, TableCache};
pub use table_locator::TableLocator;
pub use table_writer::CsvArtifactStore;

// 重导出 Trait 接口
pub use importer_trait::{ArtifactStore, WorkbookParser};
