// 数据层 - CSV加载与快照管理
pub mod loader;
pub mod records;
pub mod store;
pub mod table;

pub use loader::{load_table, LoadOutcome, RowView, SnapshotOrigin, TableRecord};
pub use store::{DataSources, DataStore, ReloadReport, TablesInfo};
pub use table::{Snapshot, TableInfo, TableManager};
