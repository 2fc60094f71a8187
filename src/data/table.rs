//! 单表快照管理
//! 每张表只有一个当前快照；重载时在锁外构建新快照，再整体替换指针

use crate::data::loader::{load_table, SnapshotOrigin, TableRecord};
use chrono::{DateTime, Local};
use log::warn;
use parking_lot::RwLock;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// 不可变表快照
#[derive(Debug)]
pub struct Snapshot<T> {
    pub generation: u64,
    pub records: Vec<T>,
    pub origin: SnapshotOrigin,
    pub source: Option<PathBuf>,
    pub skipped: usize,
    pub loaded_at: DateTime<Local>,
}

impl<T> Snapshot<T> {
    fn empty() -> Self {
        Self {
            generation: 0,
            records: Vec::new(),
            origin: SnapshotOrigin::Empty,
            source: None,
            skipped: 0,
            loaded_at: Local::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn info(&self) -> TableInfo {
        TableInfo {
            generation: self.generation,
            origin: self.origin,
            source: self.source.clone(),
            records: self.records.len(),
            skipped: self.skipped,
            loaded_at: self.loaded_at,
        }
    }
}

/// 快照元数据，供 /health 展示
#[derive(Debug, Clone, Serialize)]
pub struct TableInfo {
    pub generation: u64,
    pub origin: SnapshotOrigin,
    pub source: Option<PathBuf>,
    pub records: usize,
    pub skipped: usize,
    pub loaded_at: DateTime<Local>,
}

pub struct TableManager<T> {
    current: RwLock<Arc<Snapshot<T>>>,
    next_generation: AtomicU64,
}

impl<T: TableRecord> TableManager<T> {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(Snapshot::empty())),
            next_generation: AtomicU64::new(1),
        }
    }

    /// 当前快照；持有期间不受后续重载影响
    pub fn snapshot(&self) -> Arc<Snapshot<T>> {
        self.current.read().clone()
    }

    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn info(&self) -> TableInfo {
        self.current.read().info()
    }

    /// 从文件重新加载并发布新快照，返回是否成功
    pub fn reload(&self, path: &Path) -> bool {
        // 先领代次再构建，代次顺序即构建开始顺序
        let generation = self.next_ticket();
        let outcome = load_table::<T>(path);
        let succeeded = outcome.succeeded();
        self.install(Snapshot {
            generation,
            records: outcome.records,
            origin: outcome.origin,
            source: Some(outcome.source),
            skipped: outcome.skipped,
            loaded_at: Local::now(),
        });
        succeeded
    }

    /// 用给定记录替换当前快照
    pub fn replace(&self, records: Vec<T>) -> bool {
        let generation = self.next_ticket();
        self.install(Snapshot {
            generation,
            records,
            origin: SnapshotOrigin::File,
            source: None,
            skipped: 0,
            loaded_at: Local::now(),
        })
    }

    fn next_ticket(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::SeqCst)
    }

    /// 在写锁内比较代次，晚于当前快照才发布
    fn install(&self, snapshot: Snapshot<T>) -> bool {
        let mut current = self.current.write();
        if snapshot.generation <= current.generation {
            warn!(
                "⚠️ 丢弃过期的{}快照: 代次 {} 不晚于当前 {}",
                T::KIND,
                snapshot.generation,
                current.generation
            );
            return false;
        }
        *current = Arc::new(snapshot);
        true
    }
}

impl<T: TableRecord> Default for TableManager<T> {
    fn default() -> Self {
        Self::new()
    }
}
