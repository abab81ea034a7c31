// ==========================================
// LLD 配置生成工具 - 表区域定位与规整
// ==========================================
// 依据: LLD 工作表排版约定（多表共页、合并单元格表头、标题行标记）
// 职责: 按表区域描述截取子表，修复两行合并表头，输出扁平表
// ==========================================
// 规则:
// 1. 工作表首行作为列标签（空标签 → "Unnamed: N"，重复标签加 ".N" 后缀）
// 2. 整表模式: 去空行/空列，空值填占位符
// 3. 标记模式: 起始标记所在行之后、结束标记所在行之前
//    - 无结束标记且仅一行 → 以该行非空值为表头，补一行占位符
//    - 去空行/空列 → 首行向右填充 → 第二行空位取首行同列值
//    - 管理信息表第二行以"端口"结尾时补 SNMP 团体字两列
//    - 空值填占位符，按 output_offset 取表头行
// ==========================================

use crate::domain::table::{NormalizedTable, Sheet, TableRegion, Workbook};
use crate::domain::types::PLACEHOLDER;
use crate::importer::error::{ImportError, ImportResult};
use tracing::{debug, instrument};

/// 管理信息表（SNMP 列补齐）起始标记后缀
const MANAGE_INFO_SUFFIX: &str = "管理信息";
/// 管理信息表第二表头行的末列
const SNMP_TRIGGER_HEADER: &str = "端口";
/// 补齐列的分组标题与列名
const SNMP_GROUP_TITLE: &str = "SNMP信息";
const SNMP_READ_COMMUNITY: &str = "读团体字";
const SNMP_WRITE_COMMUNITY: &str = "写团体字";

type Grid = Vec<Vec<Option<String>>>;

pub struct TableLocator;

impl TableLocator {
    /// 定位并规整表区域
    ///
    /// # 返回
    /// - Ok(NormalizedTable): 表头唯一、空值为占位符的扁平表
    /// - Err: 工作表不存在 / 标记未找到
    #[instrument(skip(self, workbook), fields(sheet = %region.sheet_name))]
    pub fn locate(&self, workbook: &Workbook, region: &TableRegion) -> ImportResult<NormalizedTable> {
        let sheet = workbook
            .sheet(&region.sheet_name)
            .ok_or_else(|| ImportError::SheetNotFound(region.sheet_name.clone()))?;

        let (labels, body) = split_labels(sheet);

        let table = match &region.start_marker {
            None => whole_sheet(labels, body, region.output_offset),
            Some(start) => marked_region(region, start, labels, body)?,
        };

        debug!(
            columns = table.headers.len(),
            rows = table.rows.len(),
            "表区域规整完成"
        );
        Ok(table)
    }
}

// ==========================================
// 列标签与数据体
// ==========================================

/// 拆出首行列标签与其余数据行（按最大列宽补齐）
fn split_labels(sheet: &Sheet) -> (Vec<String>, Grid) {
    let width = sheet.width();
    let mut rows = sheet.rows.iter().map(|row| {
        let mut cells: Vec<Option<String>> = row.iter().map(|c| c.to_text()).collect();
        cells.resize(width, None);
        cells
    });

    let labels = match rows.next() {
        Some(first) => first
            .into_iter()
            .enumerate()
            .map(|(idx, cell)| cell.unwrap_or_else(|| format!("Unnamed: {}", idx)))
            .collect(),
        None => Vec::new(),
    };
    (dedupe_headers(labels), rows.collect())
}

/// 重复列名追加 ".1" / ".2" 后缀
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(headers.len());
    for header in headers {
        let mut candidate = header.clone();
        let mut counter = 0;
        while seen.contains(&candidate) {
            counter += 1;
            candidate = format!("{}.{}", header, counter);
        }
        seen.push(candidate);
    }
    seen
}

fn row_has_marker(row: &[Option<String>], marker: &str) -> bool {
    row.iter().flatten().any(|cell| cell.contains(marker))
}

fn is_blank_row(row: &[Option<String>]) -> bool {
    row.iter().all(Option::is_none)
}

/// 去掉全空行与全空列（列标签同步裁剪）
fn strip_blank(labels: Vec<String>, grid: Grid) -> (Vec<String>, Grid) {
    let grid: Grid = grid.into_iter().filter(|row| !is_blank_row(row)).collect();
    let keep: Vec<bool> = (0..labels.len())
        .map(|col| grid.iter().any(|row| row.get(col).is_some_and(Option::is_some)))
        .collect();

    let labels = labels
        .into_iter()
        .zip(&keep)
        .filter_map(|(label, keep)| keep.then_some(label))
        .collect();
    let grid = grid
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(&keep)
                .filter_map(|(cell, keep)| keep.then_some(cell))
                .collect()
        })
        .collect();
    (labels, grid)
}

fn fill_placeholder(grid: Grid) -> Vec<Vec<String>> {
    grid.into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| cell.unwrap_or_else(|| PLACEHOLDER.to_string()))
                .collect()
        })
        .collect()
}

// ==========================================
// 整表模式
// ==========================================
fn whole_sheet(labels: Vec<String>, body: Grid, offset: usize) -> NormalizedTable {
    let (labels, body) = strip_blank(labels, body);
    let rows = fill_placeholder(body).into_iter().skip(offset).collect();
    NormalizedTable::new(labels, rows)
}

// ==========================================
// 标记模式
// ==========================================
fn marked_region(
    region: &TableRegion,
    start_marker: &str,
    labels: Vec<String>,
    body: Grid,
) -> ImportResult<NormalizedTable> {
    let marker_not_found = |marker: &str| ImportError::MarkerNotFound {
        sheet: region.sheet_name.clone(),
        marker: marker.to_string(),
    };

    let start_row = body
        .iter()
        .position(|row| row_has_marker(row, start_marker))
        .ok_or_else(|| marker_not_found(start_marker))?;

    let end_row = match &region.end_marker {
        Some(end_marker) => body
            .iter()
            .skip(start_row + 1)
            .position(|row| row_has_marker(row, end_marker))
            .map(|idx| idx + start_row + 1)
            .ok_or_else(|| marker_not_found(end_marker))?,
        None => body.len(),
    };

    let slice: Grid = body[start_row + 1..end_row].to_vec();

    // 无结束标记且仅一行: 该行即表头，补一行占位符
    if region.end_marker.is_none() && slice.len() == 1 {
        let headers: Vec<String> = slice[0].iter().flatten().cloned().collect();
        let placeholders = vec![PLACEHOLDER.to_string(); headers.len()];
        return Ok(NormalizedTable::new(dedupe_headers(headers), vec![placeholders]));
    }

    let (mut labels, mut grid) = strip_blank(labels, slice);
    if grid.is_empty() {
        return Ok(NormalizedTable::default());
    }

    repair_header_rows(&mut grid);

    if start_marker.ends_with(MANAGE_INFO_SUFFIX) && needs_snmp_columns(&grid) {
        append_snmp_columns(&mut labels, &mut grid);
    }

    let mut rows = fill_placeholder(grid).into_iter().skip(region.output_offset);
    let headers = rows.next().map(dedupe_headers).unwrap_or_default();
    Ok(NormalizedTable::new(headers, rows.collect()))
}

/// 两行合并表头修复
///
/// # 规则
/// - 首行向右填充
/// - 第二行为空的列，该列所有空位都取首行同列值
fn repair_header_rows(grid: &mut Grid) {
    let mut last: Option<String> = None;
    for cell in grid[0].iter_mut() {
        match cell {
            Some(value) => last = Some(value.clone()),
            None => *cell = last.clone(),
        }
    }

    if grid.len() < 2 {
        return;
    }
    let first = grid[0].clone();
    let blank_columns: Vec<usize> = (0..first.len())
        .filter(|&col| grid[1].get(col).is_some_and(Option::is_none))
        .collect();
    for row in grid.iter_mut().skip(1) {
        for &col in &blank_columns {
            if let Some(cell) = row.get_mut(col).filter(|cell| cell.is_none()) {
                *cell = first[col].clone();
            }
        }
    }
}

fn needs_snmp_columns(grid: &Grid) -> bool {
    grid.get(1)
        .and_then(|row| row.last())
        .and_then(Option::as_deref)
        == Some(SNMP_TRIGGER_HEADER)
}

/// 追加读/写团体字两列
fn append_snmp_columns(labels: &mut Vec<String>, grid: &mut Grid) {
    let (prefix, base) = labels
        .last()
        .and_then(|label| label.split_once(": "))
        .and_then(|(prefix, num)| num.trim().parse::<usize>().ok().map(|n| (prefix.to_string(), n)))
        .unwrap_or_else(|| ("Unnamed".to_string(), labels.len().saturating_sub(1)));
    labels.push(format!("{}: {}", prefix, base + 1));
    labels.push(format!("{}: {}", prefix, base + 2));

    for (idx, row) in grid.iter_mut().enumerate() {
        let (read, write) = match idx {
            0 => (Some(SNMP_GROUP_TITLE), Some(SNMP_GROUP_TITLE)),
            1 => (Some(SNMP_READ_COMMUNITY), Some(SNMP_WRITE_COMMUNITY)),
            _ => (None, None),
        };
        row.push(read.map(str::to_string));
        row.push(write.map(str::to_string));
    }
    debug!("管理信息表已补齐 SNMP 团体字列");
}
