use crate::core::error::{AppError, Result};
use crate::core::types::{
    ClientStatus, ClientStatusView, CreditLine, CreditLineView, StatusField, TradeRecord,
    TrafficLight,
};
use crate::data::DataStore;
use crate::query::classify::{classify_credit_percentage, classify_status};
use chrono::NaiveDate;

/// 每次最多返回的交易笔数
pub const RECENT_TRADES_LIMIT: usize = 5;

/// 解析 DD/MM/YYYY，年份必须为四位；失败时排在最早
pub fn parse_trade_date(value: &str) -> NaiveDate {
    let four_digit_year = value
        .rsplit('/')
        .next()
        .is_some_and(|year| year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()));
    if !four_digit_year {
        return NaiveDate::MIN;
    }
    NaiveDate::parse_from_str(value, "%d/%m/%Y").unwrap_or(NaiveDate::MIN)
}

impl DataStore {
    /// 某客户最近的交易，按交易日期倒序，同日保持原顺序
    pub fn query_trades(&self, client_id: &str) -> Result<Vec<TradeRecord>> {
        let snapshot = self.trades.snapshot();

        let mut matched: Vec<(NaiveDate, &TradeRecord)> = snapshot
            .records
            .iter()
            .filter(|t| t.client_id == client_id)
            .map(|t| (parse_trade_date(&t.trade_date), t))
            .collect();

        if matched.is_empty() {
            return Err(AppError::NotFound(format!(
                "No trades found for client {}",
                client_id
            )));
        }

        matched.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(matched
            .into_iter()
            .take(RECENT_TRADES_LIMIT)
            .map(|(_, t)| t.clone())
            .collect())
    }

    /// 客户状态；同一客户有多行时取第一行，找不到时返回 Unknown 占位
    pub fn query_status(&self, client_id: &str) -> ClientStatusView {
        let snapshot = self.statuses.snapshot();
        let status = snapshot
            .records
            .iter()
            .find(|s| s.client_id == client_id)
            .cloned()
            .unwrap_or_else(|| ClientStatus::unknown(client_id));

        status_view(status)
    }

    /// 授信额度；找不到时返回全零占位
    pub fn query_credit(&self, client_id: &str) -> CreditLineView {
        let snapshot = self.credit_lines.snapshot();
        match snapshot.records.iter().find(|c| c.client_id == client_id) {
            Some(line) => credit_view(line.clone()),
            None => placeholder_credit_view(client_id),
        }
    }
}

pub fn status_view(status: ClientStatus) -> ClientStatusView {
    let status_line = StatusField::ALL
        .iter()
        .map(|&field| format!("{} {}", classify_status(status.get(field)).glyph(), field.label()))
        .collect::<Vec<_>>()
        .join("  ");

    ClientStatusView {
        kyc_emoji: classify_status(&status.kyc_status).glyph(),
        onboarding_emoji: classify_status(&status.onboarding_status).glyph(),
        ccg_emoji: classify_status(&status.ccg_status).glyph(),
        contract_emoji: classify_status(&status.contract_status).glyph(),
        client_emoji: classify_status(&status.client_status).glyph(),
        client_id: status.client_id,
        client_name: status.client_name,
        kyc_status: status.kyc_status,
        onboarding_status: status.onboarding_status,
        ccg_status: status.ccg_status,
        contract_status: status.contract_status,
        client_status: status.client_status,
        status_line,
    }
}

pub fn credit_view(line: CreditLine) -> CreditLineView {
    let lights = [
        classify_credit_percentage(&line.spot.percentage),
        classify_credit_percentage(&line.fwd.percentage),
        classify_credit_percentage(&line.deriv.percentage),
    ];
    render_credit(line, lights)
}

/// 零额度占位不代表真实使用率，三项都显示为中性
pub fn placeholder_credit_view(client_id: &str) -> CreditLineView {
    render_credit(CreditLine::unknown(client_id), [TrafficLight::Neutral; 3])
}

fn render_credit(line: CreditLine, lights: [TrafficLight; 3]) -> CreditLineView {
    let [spot, fwd, deriv] = lights.map(|l| l.glyph());

    let credit_line = format!(
        "{} Spot: {}%  {} Fwd: {}%  {} Derivados: {}%",
        spot, line.spot.percentage, fwd, line.fwd.percentage, deriv, line.deriv.percentage
    );

    CreditLineView {
        client_id: line.client_id,
        client_name: line.client_name,
        spot_line_approved: line.spot.approved,
        spot_line_used: line.spot.used,
        spot_line_pct: line.spot.percentage,
        spot_emoji: spot,
        fwd_line_approved: line.fwd.approved,
        fwd_line_used: line.fwd.used,
        fwd_line_pct: line.fwd.percentage,
        fwd_emoji: fwd,
        deriv_line_approved: line.deriv.approved,
        deriv_line_used: line.deriv.used,
        deriv_line_pct: line.deriv.percentage,
        deriv_emoji: deriv,
        credit_line,
    }
}
