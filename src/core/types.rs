use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 交易记录（源文件日期格式 DD/MM/YYYY，保留原文）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub client_id: String,
    pub client_name: String,
    pub trade_number: String,
    pub trade_date: String,
    pub start_date: String,
    pub product: String,
    pub direction: String,
    pub currency_pair: String,
    pub notional_amount: String,
    pub price: String,
    pub spread: String,
    pub expiry_date: String,
}

/// 客户状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientStatus {
    pub client_id: String,
    pub client_name: String,
    pub kyc_status: String,
    pub onboarding_status: String,
    pub ccg_status: String,
    pub contract_status: String,
    pub client_status: String,
}

impl ClientStatus {
    /// 未找到客户时返回的占位状态
    pub fn unknown(client_id: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_name: UNKNOWN.to_string(),
            kyc_status: UNKNOWN.to_string(),
            onboarding_status: UNKNOWN.to_string(),
            ccg_status: UNKNOWN.to_string(),
            contract_status: UNKNOWN.to_string(),
            client_status: UNKNOWN.to_string(),
        }
    }

    pub fn get(&self, field: StatusField) -> &str {
        match field {
            StatusField::Kyc => &self.kyc_status,
            StatusField::Onboarding => &self.onboarding_status,
            StatusField::Ccg => &self.ccg_status,
            StatusField::Contract => &self.contract_status,
            StatusField::Client => &self.client_status,
        }
    }
}

pub const UNKNOWN: &str = "Unknown";

/// 状态字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusField {
    Kyc,
    Onboarding,
    Ccg,
    Contract,
    Client,
}

impl StatusField {
    /// 固定展示顺序
    pub const ALL: [StatusField; 5] = [
        StatusField::Kyc,
        StatusField::Onboarding,
        StatusField::Ccg,
        StatusField::Contract,
        StatusField::Client,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            Self::Kyc => "kyc_status",
            Self::Onboarding => "onboarding_status",
            Self::Ccg => "ccg_status",
            Self::Contract => "contract_status",
            Self::Client => "client_status",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Kyc => "KYC",
            Self::Onboarding => "Onboarding",
            Self::Ccg => "CCG",
            Self::Contract => "Contract",
            Self::Client => "Client",
        }
    }
}

/// 授信额度（金额与使用率均为原始字符串）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditLine {
    pub client_id: String,
    pub client_name: String,
    pub spot: CreditUsage,
    pub fwd: CreditUsage,
    pub deriv: CreditUsage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditUsage {
    pub approved: String,
    pub used: String,
    pub percentage: String,
}

impl CreditUsage {
    pub fn zero() -> Self {
        Self {
            approved: "0".to_string(),
            used: "0".to_string(),
            percentage: "0".to_string(),
        }
    }
}

impl CreditLine {
    /// 未找到客户时返回的零额度占位
    pub fn unknown(client_id: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_name: UNKNOWN.to_string(),
            spot: CreditUsage::zero(),
            fwd: CreditUsage::zero(),
            deriv: CreditUsage::zero(),
        }
    }
}

/// 红绿灯分级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLight {
    Green,
    Amber,
    Red,
    Neutral,
}

impl TrafficLight {
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Green => "🟢",
            Self::Amber => "🟡",
            Self::Red => "🔴",
            Self::Neutral => "⚪",
        }
    }
}

/// 带红绿灯的客户状态视图
#[derive(Debug, Clone, Serialize)]
pub struct ClientStatusView {
    pub client_id: String,
    pub client_name: String,
    pub kyc_status: String,
    pub kyc_emoji: &'static str,
    pub onboarding_status: String,
    pub onboarding_emoji: &'static str,
    pub ccg_status: String,
    pub ccg_emoji: &'static str,
    pub contract_status: String,
    pub contract_emoji: &'static str,
    pub client_status: String,
    pub client_emoji: &'static str,
    pub status_line: String,
}

/// 带红绿灯的授信视图
#[derive(Debug, Clone, Serialize)]
pub struct CreditLineView {
    pub client_id: String,
    pub client_name: String,
    pub spot_line_approved: String,
    pub spot_line_used: String,
    #[serde(rename = "spot_line_%")]
    pub spot_line_pct: String,
    pub spot_emoji: &'static str,
    pub fwd_line_approved: String,
    pub fwd_line_used: String,
    #[serde(rename = "fwd_line_%")]
    pub fwd_line_pct: String,
    pub fwd_emoji: &'static str,
    pub deriv_line_approved: String,
    pub deriv_line_used: String,
    #[serde(rename = "deriv_line_%")]
    pub deriv_line_pct: String,
    pub deriv_emoji: &'static str,
    pub credit_line: String,
}

/// 各表当前行数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableSizes {
    pub trades: usize,
    pub statuses: usize,
    pub credit_lines: usize,
}

/// 统计结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatsSnapshot {
    NoData { message: String },
    Loaded(LoadedStats),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedStats {
    pub trades: TradeStats,
    pub status: StatusStats,
    pub credit: CreditStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeStats {
    pub total_trades: usize,
    pub unique_clients_with_trades: usize,
    pub avg_trades_per_client: f64,
    /// (client_id, 交易笔数)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub clients_with_most_trades: Vec<(String, usize)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusStats {
    pub total_statuses: usize,
    /// 字段名 -> (取值 -> 出现次数)
    pub status_breakdown: BTreeMap<String, BTreeMap<String, usize>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditStats {
    pub total_credit_lines: usize,
}
