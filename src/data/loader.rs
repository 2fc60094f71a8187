//! CSV数据加载
//! 按表头字段名取值，容忍缺失字段与坏行

use crate::core::error::{LoadError, SkipReason};
use csv::{ReaderBuilder, StringRecord};
use log::{error, info, warn};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// 可从CSV行构建的表记录
pub trait TableRecord: Sized + Clone + Send + Sync + 'static {
    /// 日志里使用的表名
    const KIND: &'static str;

    /// 解析一行；返回 `Err` 时该行被跳过
    fn from_row(row: &RowView<'_>) -> Result<Self, SkipReason>;

    /// 源文件缺失时使用的内置样例数据
    fn sample() -> Vec<Self>;
}

/// 一行数据的按列名视图
pub struct RowView<'a> {
    columns: &'a HashMap<String, usize>,
    record: &'a StringRecord,
}

impl<'a> RowView<'a> {
    pub fn new(columns: &'a HashMap<String, usize>, record: &'a StringRecord) -> Self {
        Self { columns, record }
    }

    /// 取字段值并去掉首尾空白；缺失或为空时返回默认值
    pub fn field(&self, name: &str, default: &str) -> String {
        let value = self
            .columns
            .get(name)
            .and_then(|&idx| self.record.get(idx))
            .map(str::trim)
            .unwrap_or("");

        if value.is_empty() {
            default.to_string()
        } else {
            value.to_string()
        }
    }
}

/// 快照数据来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotOrigin {
    File,
    Sample,
    Empty,
}

/// 单次加载结果
#[derive(Debug)]
pub struct LoadOutcome<T> {
    pub records: Vec<T>,
    pub origin: SnapshotOrigin,
    pub source: PathBuf,
    pub skipped: usize,
    pub error: Option<LoadError>,
}

impl<T> LoadOutcome<T> {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// 读取一张表
///
/// 文件不存在时退回内置样例，读取失败时返回空表，两种情况都视为加载失败。
pub fn load_table<T: TableRecord>(path: &Path) -> LoadOutcome<T> {
    let result = fs::File::open(path)
        .map_err(|e| classify_open_error(path, e))
        .and_then(|file| parse_records::<T, _>(file, path));

    match result {
        Ok((records, skipped)) => {
            info!(
                "✅ 已加载 {} 条{}记录: {} (跳过 {} 行)",
                records.len(),
                T::KIND,
                path.display(),
                skipped
            );
            LoadOutcome {
                records,
                origin: SnapshotOrigin::File,
                source: path.to_path_buf(),
                skipped,
                error: None,
            }
        }
        Err(err @ LoadError::SourceMissing(_)) => {
            let records = T::sample();
            warn!("⚠️ {}，使用 {} 条{}样例数据", err, records.len(), T::KIND);
            LoadOutcome {
                records,
                origin: SnapshotOrigin::Sample,
                source: path.to_path_buf(),
                skipped: 0,
                error: Some(err),
            }
        }
        Err(err) => {
            error!("❌ 加载{}数据失败: {}", T::KIND, err);
            LoadOutcome {
                records: Vec::new(),
                origin: SnapshotOrigin::Empty,
                source: path.to_path_buf(),
                skipped: 0,
                error: Some(err),
            }
        }
    }
}

fn classify_open_error(path: &Path, err: io::Error) -> LoadError {
    if err.kind() == io::ErrorKind::NotFound {
        LoadError::SourceMissing(path.to_path_buf())
    } else {
        LoadError::SourceUnreadable {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }
}

/// 逐行解析，返回 (记录, 跳过行数)
pub fn parse_records<T: TableRecord, R: Read>(
    source: R,
    path: &Path,
) -> Result<(Vec<T>, usize), LoadError> {
    let unreadable = |reason: String| LoadError::SourceUnreadable {
        path: path.to_path_buf(),
        reason,
    };

    let mut reader = ReaderBuilder::new().flexible(true).from_reader(source);

    let headers = reader.headers().map_err(|e| unreadable(e.to_string()))?;
    let columns: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.to_string(), idx))
        .collect();

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // 表头占第1行
        let fallback_line = idx as u64 + 2;

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                if let csv::ErrorKind::Io(_) = e.kind() {
                    return Err(unreadable(e.to_string()));
                }
                let line = e.position().map(|p| p.line()).unwrap_or(fallback_line);
                warn!("⚠️ 处理{}第 {} 行出错: {}", T::KIND, line, e);
                skipped += 1;
                continue;
            }
        };

        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(fallback_line);

        match T::from_row(&RowView::new(&columns, &record)) {
            Ok(item) => records.push(item),
            Err(reason) => {
                warn!("⚠️ 跳过{}第 {} 行: {}", T::KIND, line, reason);
                skipped += 1;
            }
        }
    }

    Ok((records, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TradeRecord;
    use std::io::Write;

    const HEADER: &str = "client_id,client_name,trade_number,trade_date,start_date,product,direction,currency_pair,notional_amount,price,spread,expiry_date";

    fn write_csv(dir: &tempfile::TempDir, name: &str, body: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(body).unwrap();
        path
    }

    #[test]
    fn fields_are_trimmed_and_defaulted() {
        let csv = format!(
            "{HEADER}\n  93.685.712-6 , Comercial ,T1, 06/07/2025 ,06/07/2025,Spot,Buy,USD/CLP,100,950.25,2.5,   \n"
        );
        let (rows, skipped) =
            parse_records::<TradeRecord, _>(csv.as_bytes(), Path::new("mem.csv")).unwrap();

        assert_eq!(skipped, 0);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].client_id, "93.685.712-6");
        assert_eq!(rows[0].client_name, "Comercial");
        assert_eq!(rows[0].trade_date, "06/07/2025");
        assert_eq!(rows[0].expiry_date, "");
    }

    #[test]
    fn keyless_rows_are_skipped_without_dropping_neighbours() {
        let csv = format!(
            "{HEADER}\nA,Alpha,T1,01/01/2025,,,,,,,,\n,NoId,T2,01/01/2025,,,,,,,,\nB,Beta,,01/01/2025,,,,,,,,\nC,Gamma,T3,02/01/2025,,,,,,,,\n"
        );
        let (rows, skipped) =
            parse_records::<TradeRecord, _>(csv.as_bytes(), Path::new("mem.csv")).unwrap();

        assert_eq!(skipped, 2);
        let ids: Vec<_> = rows.iter().map(|t| t.trade_number.as_str()).collect();
        assert_eq!(ids, vec!["T1", "T3"]);
    }

    #[test]
    fn short_rows_fall_back_to_defaults() {
        let csv = format!("{HEADER}\nA,Alpha,T1\n");
        let (rows, _) =
            parse_records::<TradeRecord, _>(csv.as_bytes(), Path::new("mem.csv")).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].trade_date, "");
        assert_eq!(rows[0].product, "");
    }

    #[test]
    fn invalid_utf8_row_is_skipped() {
        let mut body = format!("{HEADER}\nA,Alpha,T1,01/01/2025,,,,,,,,\n").into_bytes();
        body.extend_from_slice(b"B,\xff\xfe,T2,01/01/2025,,,,,,,,\n");
        body.extend_from_slice(b"C,Gamma,T3,01/01/2025,,,,,,,,\n");

        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "trades.csv", &body);
        let outcome = load_table::<TradeRecord>(&path);

        assert!(outcome.succeeded());
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.records[1].client_id, "C");
    }

    #[test]
    fn missing_source_uses_sample_and_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = load_table::<TradeRecord>(&dir.path().join("absent.csv"));

        assert!(!outcome.succeeded());
        assert_eq!(outcome.origin, SnapshotOrigin::Sample);
        assert!(matches!(outcome.error, Some(LoadError::SourceMissing(_))));
        assert_eq!(outcome.records, TradeRecord::sample());
    }

    #[test]
    fn unreadable_source_yields_empty_table() {
        // 目录无法按文件读取
        let dir = tempfile::tempdir().unwrap();
        let outcome = load_table::<TradeRecord>(dir.path());

        assert!(!outcome.succeeded());
        assert_eq!(outcome.origin, SnapshotOrigin::Empty);
        assert!(outcome.records.is_empty());
    }
}
