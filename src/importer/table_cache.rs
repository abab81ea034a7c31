// ==========================================
// LLD 配置生成工具 - 表区域缓存
// ==========================================
// 职责: 表区域描述 → 规整后扁平表 的进程内缓存
// 红线: 同一描述只定位一次；缓存结果只读共享
// ==========================================

use crate::domain::table::{NormalizedTable, TableRegion, Workbook};
use crate::importer::error::ImportResult;
use crate::importer::importer_trait::ArtifactStore;
use crate::importer::table_locator::TableLocator;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, warn};

pub struct TableCache {
    locator: TableLocator,
    store: Option<Box<dyn ArtifactStore>>,
    tables: RefCell<HashMap<TableRegion, Rc<NormalizedTable>>>,
}

impl TableCache {
    /// 纯内存缓存（不落盘）
    pub fn new() -> Self {
        Self {
            locator: TableLocator,
            store: None,
            tables: RefCell::new(HashMap::new()),
        }
    }

    /// 带中间表落盘的缓存
    pub fn with_store(store: Box<dyn ArtifactStore>) -> Self {
        Self {
            store: Some(store),
            ..Self::new()
        }
    }

    /// 命中直接返回；未命中则定位、规整、落盘回读后登记
    pub fn get_or_locate(
        &self,
        workbook: &Workbook,
        region: &TableRegion,
    ) -> ImportResult<Rc<NormalizedTable>> {
        if let Some(table) = self.tables.borrow().get(region) {
            debug!(region = region.artifact_name(), "表区域缓存命中");
            return Ok(Rc::clone(table));
        }

        let located = self.locator.locate(workbook, region)?;
        let table = Rc::new(match &self.store {
            Some(store) => persist(store.as_ref(), region, located),
            None => located,
        });

        self.tables
            .borrow_mut()
            .insert(region.clone(), Rc::clone(&table));
        Ok(table)
    }

    /// 已缓存的表区域数量
    pub fn len(&self) -> usize {
        self.tables.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.borrow().is_empty()
    }
}

/// 中间表落盘后以回读内容为准；落盘或回读失败时沿用内存结果
fn persist(
    store: &dyn ArtifactStore,
    region: &TableRegion,
    table: NormalizedTable,
) -> NormalizedTable {
    if let Err(e) = store.write_table(region, &table) {
        warn!(region = region.artifact_name(), error = %e, "中间表写入失败");
        return table;
    }
    match store.read_table(region) {
        Ok(reread) => reread,
        Err(e) => {
            warn!(region = region.artifact_name(), error = %e, "中间表回读失败");
            table
        }
    }
}

impl Default for TableCache {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 单值惰性缓存 (Memo)
// ==========================================
// 首次成功构建后固定；构建失败不缓存，下次调用重试
pub struct Memo<T> {
    value: RefCell<Option<Rc<T>>>,
}

impl<T> Memo<T> {
    pub fn new() -> Self {
        Self {
            value: RefCell::new(None),
        }
    }

    /// 取缓存值，未构建时调用 init（构建期间不持有借用，允许嵌套取其他 Memo）
    pub fn get_or_try_init<E>(&self, init: impl FnOnce() -> Result<T, E>) -> Result<Rc<T>, E> {
        if let Some(value) = self.value.borrow().as_ref() {
            return Ok(Rc::clone(value));
        }
        let value = Rc::new(init()?);
        *self.value.borrow_mut() = Some(Rc::clone(&value));
        Ok(value)
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::Sheet;
    use crate::importer::table_writer::CsvArtifactStore;
    use tempfile::tempdir;

    fn sample_workbook() -> Workbook {
        Workbook::new(vec![Sheet::from_text_rows(
            "3.4 Loopback规划",
            &[&["CI NAME", "Loopback ID"], &["SW1", "0"]],
        )])
    }

    #[test]
    fn test_cache_returns_shared_table() {
        let cache = TableCache::new();
        let workbook = sample_workbook();
        let region = TableRegion::whole_sheet("3.4 Loopback规划");

        let first = cache.get_or_locate(&workbook, &region).unwrap();
        let second = cache.get_or_locate(&workbook, &region).unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_persists_artifact() {
        let dir = tempdir().unwrap();
        let cache = TableCache::with_store(Box::new(CsvArtifactStore::new(dir.path())));
        let region = TableRegion::whole_sheet("3.4 Loopback规划");

        let table = cache.get_or_locate(&sample_workbook(), &region).unwrap();
        assert!(dir.path().join("3.4 Loopback规划.csv").exists());

        // 回读结果与纯内存定位一致
        let in_memory = TableCache::new()
            .get_or_locate(&sample_workbook(), &region)
            .unwrap();
        assert_eq!(*table, *in_memory);
    }

    #[test]
    fn test_cache_uses_reread_artifact() {
        struct FixedStore;
        impl ArtifactStore for FixedStore {
            fn write_table(
                &self,
                _region: &TableRegion,
                _table: &NormalizedTable,
            ) -> ImportResult<std::path::PathBuf> {
                Ok(std::path::PathBuf::from("fixed.csv"))
            }
            fn read_table(&self, _region: &TableRegion) -> ImportResult<NormalizedTable> {
                Ok(NormalizedTable::new(
                    vec!["CI NAME".to_string()],
                    vec![vec!["SW9".to_string()]],
                ))
            }
        }

        let cache = TableCache::with_store(Box::new(FixedStore));
        let region = TableRegion::whole_sheet("3.4 Loopback规划");
        let table = cache.get_or_locate(&sample_workbook(), &region).unwrap();
        assert_eq!(table.rows, vec![vec!["SW9".to_string()]]);
    }

    #[test]
    fn test_memo_initializes_once() {
        let memo: Memo<u32> = Memo::new();
        let mut calls = 0;
        let first = memo
            .get_or_try_init(|| {
                calls += 1;
                Ok::<_, String>(7)
            })
            .unwrap();
        assert_eq!(*first, 7);

        let second = memo.get_or_try_init(|| Ok::<_, String>(9)).unwrap();
        assert_eq!(*second, 7);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_memo_failure_not_cached() {
        let memo: Memo<u32> = Memo::new();
        assert!(memo.get_or_try_init(|| Err::<u32, _>("boom")).is_err());
        // 失败后再次调用重新构建
        assert_eq!(*memo.get_or_try_init(|| Ok::<_, &str>(3)).unwrap(), 3);
    }
}
