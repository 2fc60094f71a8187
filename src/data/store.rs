use crate::core::config::{DataConfig, FeatureConfig};
use crate::core::types::{ClientStatus, CreditLine, TableSizes, TradeRecord};
use crate::data::table::{TableInfo, TableManager};
use log::info;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// 三张表的持有者；状态表与授信表为可选能力
pub struct DataStore {
    pub trades: TableManager<TradeRecord>,
    pub statuses: TableManager<ClientStatus>,
    pub credit_lines: TableManager<CreditLine>,
    sources: DataSources,
}

/// 各表数据文件；`None` 表示该能力未启用
#[derive(Debug, Clone)]
pub struct DataSources {
    pub trades: PathBuf,
    pub statuses: Option<PathBuf>,
    pub credit_lines: Option<PathBuf>,
}

impl DataSources {
    pub fn from_config(data: &DataConfig, features: &FeatureConfig) -> Self {
        Self {
            trades: data.trades_path(),
            statuses: features.status.then(|| data.status_path()),
            credit_lines: features.credit.then(|| data.credit_path()),
        }
    }
}

/// 各表快照元数据；未启用的表为 `None`
#[derive(Debug, Clone, Serialize)]
pub struct TablesInfo {
    pub trades: TableInfo,
    pub statuses: Option<TableInfo>,
    pub credit_lines: Option<TableInfo>,
}

/// 一次全量重载的结果
#[derive(Debug, Clone, Serialize)]
pub struct ReloadReport {
    pub trades_success: bool,
    pub status_success: bool,
    pub credit_success: bool,
    pub total_trades: usize,
    pub total_statuses: usize,
    pub total_credit_lines: usize,
    pub message: String,
}

impl DataStore {
    pub fn new(sources: DataSources) -> Self {
        Self {
            trades: TableManager::new(),
            statuses: TableManager::new(),
            credit_lines: TableManager::new(),
            sources,
        }
    }

    pub fn status_enabled(&self) -> bool {
        self.sources.statuses.is_some()
    }

    pub fn credit_enabled(&self) -> bool {
        self.sources.credit_lines.is_some()
    }

    pub fn load_trades(&self, path: &Path) -> bool {
        self.trades.reload(path)
    }

    pub fn load_statuses(&self, path: &Path) -> bool {
        self.statuses.reload(path)
    }

    pub fn load_credit_lines(&self, path: &Path) -> bool {
        self.credit_lines.reload(path)
    }

    /// 重新加载所有已启用的表，各表互不影响
    pub fn reload_all(&self) -> ReloadReport {
        let trades_success = self.load_trades(&self.sources.trades);
        let status_success = match &self.sources.statuses {
            Some(path) => self.load_statuses(path),
            None => false,
        };
        let credit_success = match &self.sources.credit_lines {
            Some(path) => self.load_credit_lines(path),
            None => false,
        };

        let sizes = self.table_sizes();
        let mark = |ok: bool| if ok { "✅" } else { "❌" };
        let message = format!(
            "Reload completed - Trades: {}, Status: {}, Credit: {}",
            mark(trades_success),
            mark(status_success),
            mark(credit_success)
        );
        info!("🔄 {}", message);

        ReloadReport {
            trades_success,
            status_success,
            credit_success,
            total_trades: sizes.trades,
            total_statuses: sizes.statuses,
            total_credit_lines: sizes.credit_lines,
            message,
        }
    }

    pub fn tables_info(&self) -> TablesInfo {
        TablesInfo {
            trades: self.trades.info(),
            statuses: self.status_enabled().then(|| self.statuses.info()),
            credit_lines: self.credit_enabled().then(|| self.credit_lines.info()),
        }
    }

    pub fn table_sizes(&self) -> TableSizes {
        TableSizes {
            trades: self.trades.len(),
            statuses: self.statuses.len(),
            credit_lines: self.credit_lines.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::SnapshotOrigin;
    use std::io::Write;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn trade_failure_does_not_block_other_tables() {
        let dir = tempfile::tempdir().unwrap();
        let statuses = write(
            dir.path(),
            "client_status.csv",
            "client_id,client_name,kyc_status\nC1,Uno,OK\n",
        );
        let store = DataStore::new(DataSources {
            trades: dir.path().join("missing_trades.csv"),
            statuses: Some(statuses),
            credit_lines: Some(dir.path().join("missing_credit.csv")),
        });

        let report = store.reload_all();
        assert!(!report.trades_success);
        assert!(report.status_success);
        assert!(!report.credit_success);
        // 缺失文件退回样例数据
        assert_eq!(report.total_trades, 2);
        assert_eq!(report.total_statuses, 1);
        assert_eq!(report.total_credit_lines, 1);
        assert_eq!(
            report.message,
            "Reload completed - Trades: ❌, Status: ✅, Credit: ❌"
        );
    }

    #[test]
    fn disabled_capabilities_stay_empty() {
        let dir = tempfile::tempdir().unwrap();
        let data = DataConfig {
            dir: dir.path().to_path_buf(),
            ..DataConfig::default()
        };
        let features = FeatureConfig {
            status: false,
            credit: false,
        };
        let store = DataStore::new(DataSources::from_config(&data, &features));

        assert!(!store.status_enabled());
        let report = store.reload_all();
        assert!(!report.status_success);
        let info = store.tables_info();
        assert!(info.statuses.is_none());
        assert!(info.credit_lines.is_none());
        assert_eq!(info.trades.origin, SnapshotOrigin::Sample);
        assert_eq!(store.table_sizes().statuses, 0);
        assert_eq!(store.table_sizes().credit_lines, 0);
    }
}
