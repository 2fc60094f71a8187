// 查询层 - 只读取当前快照
pub mod classify;
pub mod lookup;
pub mod stats;

pub use classify::{classify_credit_percentage, classify_status};
pub use lookup::{
    credit_view, parse_trade_date, placeholder_credit_view, status_view, RECENT_TRADES_LIMIT,
};
pub use stats::TOP_CLIENTS_LIMIT;
