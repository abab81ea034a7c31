// ==========================================
// LLD 配置生成工具 - 工作簿解析器实现
// ==========================================
// 依据: 阶段 0 - LLD 工作簿读取
// 支持: Excel (.xlsx/.xlsm/.xls/.xlsb) / OpenDocument (.ods)
// ==========================================

use crate::domain::table::{Cell, Sheet, Workbook};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::WorkbookParser;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::{debug, info};

/// 支持的工作簿扩展名
const SUPPORTED_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xls", "xlsb", "ods"];

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl WorkbookParser for ExcelParser {
    fn parse_workbook(&self, file_path: &Path) -> ImportResult<Workbook> {
        // 检查文件存在
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        // 检查扩展名
        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        // 打开工作簿（按扩展名自动选择格式）
        let mut workbook = open_workbook_auto(file_path)?;

        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(ImportError::ExcelParseError("工作簿无工作表".to_string()));
        }

        // 全部工作表载入内存，后续按表区域描述定位
        let mut result = Workbook::default();
        for sheet_name in sheet_names {
            let range = workbook.worksheet_range(&sheet_name)?;
            let rows: Vec<Vec<Cell>> = range
                .rows()
                .map(|row| row.iter().map(convert_cell).collect())
                .collect();
            debug!(sheet = %sheet_name, rows = rows.len(), "工作表已载入");
            result.add_sheet(Sheet::new(sheet_name, rows));
        }

        info!(
            file = %file_path.display(),
            sheets = result.sheet_names().len(),
            "工作簿解析完成"
        );
        Ok(result)
    }
}

/// calamine 单元格 → 领域单元格
fn convert_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        other => Cell::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_excel_parser_file_not_found() {
        let result = ExcelParser.parse_workbook(Path::new("/nonexistent/lld.xlsx"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_excel_parser_rejects_unsupported_extension() {
        let mut temp_file = Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(temp_file, "not a workbook").unwrap();

        let result = ExcelParser.parse_workbook(temp_file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_excel_parser_corrupt_file() {
        let mut temp_file = Builder::new().suffix(".xlsx").tempfile().unwrap();
        writeln!(temp_file, "definitely not a zip archive").unwrap();

        let result = ExcelParser.parse_workbook(temp_file.path());
        assert!(matches!(result, Err(ImportError::ExcelParseError(_))));
    }

    #[test]
    fn test_convert_cell_variants() {
        assert_eq!(convert_cell(&Data::Empty), Cell::Empty);
        assert_eq!(convert_cell(&Data::Int(7)), Cell::Number(7.0));
        assert_eq!(
            convert_cell(&Data::String("CI NAME".to_string())),
            Cell::Text("CI NAME".to_string())
        );
    }
}
