// ==========================================
// LLD 配置生成工具 - 中间表落盘
// ==========================================
// 依据: 表区域规整结果持久化约定（<sheet 名 | 起始标记>.csv）
// 职责: 规整后的表区域写入数据目录 / 从数据目录回读
// ==========================================

use crate::domain::table::{NormalizedTable, TableRegion};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::ArtifactStore;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

// ==========================================
// CSV 中间表存储
// ==========================================
pub struct CsvArtifactStore {
    data_dir: PathBuf,
}

impl CsvArtifactStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// 表区域对应的落盘路径（文件名中的路径分隔符替换为 "_"）
    pub fn artifact_path(&self, region: &TableRegion) -> PathBuf {
        let file_name: String = region
            .artifact_name()
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        self.data_dir.join(format!("{}.csv", file_name))
    }
}

impl ArtifactStore for CsvArtifactStore {
    fn write_table(&self, region: &TableRegion, table: &NormalizedTable) -> ImportResult<PathBuf> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| ImportError::ArtifactWriteError(format!("{}: {}", self.data_dir.display(), e)))?;

        let path = self.artifact_path(region);
        let file = File::create(&path)
            .map_err(|e| ImportError::ArtifactWriteError(format!("{}: {}", path.display(), e)))?;

        let mut writer = WriterBuilder::new().flexible(true).from_writer(file);
        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer
            .flush()
            .map_err(|e| ImportError::ArtifactWriteError(format!("{}: {}", path.display(), e)))?;

        debug!(path = %path.display(), rows = table.rows.len(), "中间表已写入");
        Ok(path)
    }

    fn read_table(&self, region: &TableRegion) -> ImportResult<NormalizedTable> {
        let path = self.artifact_path(region);
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let file = File::open(&path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(NormalizedTable::new(headers, rows))
    }
}
