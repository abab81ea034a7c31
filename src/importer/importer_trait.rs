// ==========================================
// LLD 配置生成工具 - 导入层 Trait
// ==========================================
// 职责: 定义工作簿解析与中间表落盘接口（不包含实现）
// ==========================================

use crate::domain::table::{NormalizedTable, TableRegion, Workbook};
use crate::importer::error::ImportResult;
use std::path::{Path, PathBuf};

// ==========================================
// WorkbookParser Trait
// ==========================================
// 用途: 工作簿解析接口（阶段 0）
// 实现者: ExcelParser
pub trait WorkbookParser {
    /// 解析整个工作簿到内存
    ///
    /// # 参数
    /// - file_path: 工作簿路径
    ///
    /// # 返回
    /// - Ok(Workbook): 全部工作表的单元格网格
    /// - Err: 文件不存在、格式不支持、解析失败
    fn parse_workbook(&self, file_path: &Path) -> ImportResult<Workbook>;
}

// ==========================================
// ArtifactStore Trait
// ==========================================
// 用途: 规整后表区域的落盘与回读（供人工核对与下游复用）
// 实现者: CsvArtifactStore
pub trait ArtifactStore {
    /// 写入表区域，覆盖同名旧文件
    ///
    /// # 返回
    /// - Ok(PathBuf): 写入的文件路径
    fn write_table(&self, region: &TableRegion, table: &NormalizedTable) -> ImportResult<PathBuf>;

    /// 回读表区域（首行为表头）
    fn read_table(&self, region: &TableRegion) -> ImportResult<NormalizedTable>;
}
