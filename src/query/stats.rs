use crate::core::types::{
    CreditStats, LoadedStats, StatsSnapshot, StatusField, StatusStats, TradeStats,
};
use crate::data::DataStore;
use std::collections::{BTreeMap, HashMap};

/// 排行榜长度
pub const TOP_CLIENTS_LIMIT: usize = 5;

impl DataStore {
    pub fn query_stats(&self) -> StatsSnapshot {
        let trades = self.trades.snapshot();
        let statuses = self.statuses.snapshot();
        let credit_lines = self.credit_lines.snapshot();

        if trades.is_empty() && statuses.is_empty() {
            return StatsSnapshot::NoData {
                message: "No data loaded".to_string(),
            };
        }

        // 按首次出现顺序计数，排序稳定，同笔数时先出现者在前
        let mut order: Vec<&str> = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for trade in &trades.records {
            let count = counts.entry(trade.client_id.as_str()).or_insert_with(|| {
                order.push(trade.client_id.as_str());
                0
            });
            *count += 1;
        }

        let unique_clients = order.len();
        let avg_trades_per_client = if unique_clients > 0 {
            round2(trades.len() as f64 / unique_clients as f64)
        } else {
            0.0
        };

        let mut ranking: Vec<(String, usize)> = order
            .iter()
            .map(|id| (id.to_string(), counts[id]))
            .collect();
        ranking.sort_by(|a, b| b.1.cmp(&a.1));
        ranking.truncate(TOP_CLIENTS_LIMIT);

        let mut status_breakdown = BTreeMap::new();
        if !statuses.is_empty() {
            for field in StatusField::ALL {
                let mut values: BTreeMap<String, usize> = BTreeMap::new();
                for status in &statuses.records {
                    *values.entry(status.get(field).to_string()).or_insert(0) += 1;
                }
                status_breakdown.insert(field.column().to_string(), values);
            }
        }

        StatsSnapshot::Loaded(LoadedStats {
            trades: TradeStats {
                total_trades: trades.len(),
                unique_clients_with_trades: unique_clients,
                avg_trades_per_client,
                clients_with_most_trades: ranking,
            },
            status: StatusStats {
                total_statuses: statuses.len(),
                status_breakdown,
            },
            credit: CreditStats {
                total_credit_lines: credit_lines.len(),
            },
        })
    }
}

/// 保留两位小数，恰好一半时取偶数
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
