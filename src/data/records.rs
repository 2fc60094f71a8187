use crate::core::error::SkipReason;
use crate::core::types::{ClientStatus, CreditLine, CreditUsage, TradeRecord, UNKNOWN};
use crate::data::loader::{RowView, TableRecord};

const SAMPLE_CLIENT_ID: &str = "93.685.712-6";
const SAMPLE_CLIENT_NAME: &str = "Comercial Metropolitana SA";

impl TableRecord for TradeRecord {
    const KIND: &'static str = "交易";

    fn from_row(row: &RowView<'_>) -> Result<Self, SkipReason> {
        let trade = TradeRecord {
            client_id: row.field("client_id", ""),
            client_name: row.field("client_name", ""),
            trade_number: row.field("trade_number", ""),
            trade_date: row.field("trade_date", ""),
            start_date: row.field("start_date", ""),
            product: row.field("product", ""),
            direction: row.field("direction", ""),
            currency_pair: row.field("currency_pair", ""),
            notional_amount: row.field("notional_amount", ""),
            price: row.field("price", ""),
            spread: row.field("spread", ""),
            expiry_date: row.field("expiry_date", ""),
        };

        if trade.trade_number.is_empty() || trade.client_id.is_empty() {
            return Err(SkipReason::MissingKey("trade_number/client_id"));
        }
        Ok(trade)
    }

    fn sample() -> Vec<Self> {
        vec![
            TradeRecord {
                client_id: SAMPLE_CLIENT_ID.to_string(),
                client_name: SAMPLE_CLIENT_NAME.to_string(),
                trade_number: "T2025001".to_string(),
                trade_date: "06/07/2025".to_string(),
                start_date: "06/07/2025".to_string(),
                product: "Spot".to_string(),
                direction: "Buy".to_string(),
                currency_pair: "USD/CLP".to_string(),
                notional_amount: "1000000".to_string(),
                price: "950.25".to_string(),
                spread: "2.5".to_string(),
                expiry_date: String::new(),
            },
            TradeRecord {
                client_id: SAMPLE_CLIENT_ID.to_string(),
                client_name: SAMPLE_CLIENT_NAME.to_string(),
                trade_number: "T2025002".to_string(),
                trade_date: "05/07/2025".to_string(),
                start_date: "08/07/2025".to_string(),
                product: "Forward".to_string(),
                direction: "Sell".to_string(),
                currency_pair: "EUR/CLP".to_string(),
                notional_amount: "500000".to_string(),
                price: "1025.80".to_string(),
                spread: "3.0".to_string(),
                expiry_date: "08/08/2025".to_string(),
            },
        ]
    }
}

impl TableRecord for ClientStatus {
    const KIND: &'static str = "客户状态";

    fn from_row(row: &RowView<'_>) -> Result<Self, SkipReason> {
        let status = ClientStatus {
            client_id: row.field("client_id", ""),
            client_name: row.field("client_name", ""),
            kyc_status: row.field("kyc_status", UNKNOWN),
            onboarding_status: row.field("onboarding_status", UNKNOWN),
            ccg_status: row.field("ccg_status", UNKNOWN),
            contract_status: row.field("contract_status", UNKNOWN),
            client_status: row.field("client_status", UNKNOWN),
        };

        if status.client_id.is_empty() {
            return Err(SkipReason::MissingKey("client_id"));
        }
        Ok(status)
    }

    fn sample() -> Vec<Self> {
        vec![ClientStatus {
            client_id: SAMPLE_CLIENT_ID.to_string(),
            client_name: SAMPLE_CLIENT_NAME.to_string(),
            kyc_status: "OK".to_string(),
            onboarding_status: "En Curso".to_string(),
            ccg_status: "OK".to_string(),
            contract_status: "NOK".to_string(),
            client_status: "En Curso".to_string(),
        }]
    }
}

fn usage(row: &RowView<'_>, prefix: &str) -> CreditUsage {
    CreditUsage {
        approved: row.field(&format!("{}_line_approved", prefix), "0"),
        used: row.field(&format!("{}_line_used", prefix), "0"),
        percentage: row.field(&format!("{}_line_%", prefix), "0"),
    }
}

impl TableRecord for CreditLine {
    const KIND: &'static str = "授信额度";

    fn from_row(row: &RowView<'_>) -> Result<Self, SkipReason> {
        let line = CreditLine {
            client_id: row.field("client_id", ""),
            client_name: row.field("client_name", ""),
            spot: usage(row, "spot"),
            fwd: usage(row, "fwd"),
            deriv: usage(row, "deriv"),
        };

        if line.client_id.is_empty() {
            return Err(SkipReason::MissingKey("client_id"));
        }
        Ok(line)
    }

    fn sample() -> Vec<Self> {
        let usage = |approved: &str, used: &str, pct: &str| CreditUsage {
            approved: approved.to_string(),
            used: used.to_string(),
            percentage: pct.to_string(),
        };

        vec![CreditLine {
            client_id: SAMPLE_CLIENT_ID.to_string(),
            client_name: SAMPLE_CLIENT_NAME.to_string(),
            spot: usage("1000000", "750000", "75"),
            fwd: usage("500000", "425000", "85"),
            deriv: usage("200000", "210000", "105"),
        }]
    }
}
