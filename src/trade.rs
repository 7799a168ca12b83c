use chrono::NaiveDate;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::MigrationError;

const MAX_SYMBOL_LEN: usize = 10;

/// One margin position as stored by the legacy diary.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    pub symbol: String,
    pub entry_price: Decimal,
    pub exit_price: Option<Decimal>,
    pub quantity: u32,
    pub entry_date: NaiveDate,
    pub exit_date: Option<NaiveDate>,
    pub margin_amount: Decimal,
    pub daily_interest: String,
    pub notes: String,
}

impl TradeRecord {
    pub fn is_open(&self) -> bool {
        self.exit_price.is_none()
    }

    pub fn total_cost(&self) -> Decimal {
        self.entry_price * Decimal::from(self.quantity)
    }

    pub fn validate(&self) -> Result<(), MigrationError> {
        let len = self.symbol.chars().count();
        if len == 0 || len > MAX_SYMBOL_LEN {
            return Err(self.invalid(format!(
                "symbol must be between 1 and {} characters",
                MAX_SYMBOL_LEN
            )));
        }
        if self.quantity == 0 {
            return Err(self.invalid("quantity must be at least 1"));
        }
        if self.entry_price <= Decimal::ZERO {
            return Err(self.invalid("entry price must be greater than 0"));
        }
        if matches!(self.exit_price, Some(p) if p <= Decimal::ZERO) {
            return Err(self.invalid("exit price must be greater than 0"));
        }
        if self.margin_amount <= Decimal::ZERO {
            return Err(self.invalid("margin amount must be greater than 0"));
        }
        if matches!(self.exit_date, Some(exit) if exit < self.entry_date) {
            return Err(self.invalid("exit date precedes entry date"));
        }
        Ok(())
    }

    fn invalid(&self, reason: impl Into<String>) -> MigrationError {
        MigrationError::InvalidRecord {
            symbol: self.symbol.clone(),
            reason: reason.into(),
        }
    }
}

/// Trades recovered by hand from the old database, ordered by entry date.
pub fn sample_trades() -> Vec<TradeRecord> {
    vec![
        TradeRecord {
            symbol: "GAZP".into(),
            entry_price: Decimal::new(1500, 1),
            exit_price: Some(Decimal::new(1800, 1)),
            quantity: 100,
            entry_date: NaiveDate::from_ymd(2023, 1, 15),
            exit_date: Some(NaiveDate::from_ymd(2023, 2, 15)),
            margin_amount: Decimal::new(500000, 1),
            daily_interest: "12.5".into(),
            notes: "Газпром - восстановленная сделка".into(),
        },
        TradeRecord {
            symbol: "RUSAGRO".into(),
            entry_price: Decimal::new(12000, 1),
            exit_price: Some(Decimal::new(13500, 1)),
            quantity: 50,
            entry_date: NaiveDate::from_ymd(2023, 3, 10),
            exit_date: Some(NaiveDate::from_ymd(2023, 4, 10)),
            margin_amount: Decimal::new(600000, 1),
            daily_interest: "15.0".into(),
            notes: "Русагро - восстановленная сделка".into(),
        },
        TradeRecord {
            symbol: "SBER".into(),
            entry_price: Decimal::new(2000, 1),
            exit_price: Some(Decimal::new(2200, 1)),
            quantity: 200,
            entry_date: NaiveDate::from_ymd(2023, 5, 1),
            exit_date: Some(NaiveDate::from_ymd(2023, 6, 1)),
            margin_amount: Decimal::new(400000, 1),
            daily_interest: "10.0".into(),
            notes: "Сбербанк - восстановленная сделка".into(),
        },
    ]
}

#[cfg(test)]
mod test {
    use super::*;

    fn gazp() -> TradeRecord {
        sample_trades().remove(0)
    }

    #[test]
    fn samples_are_valid_and_ordered() {
        let trades = sample_trades();
        let symbols: Vec<_> = trades.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["GAZP", "RUSAGRO", "SBER"]);
        assert!(trades.iter().all(|t| t.validate().is_ok()));
        assert!(trades
            .windows(2)
            .all(|pair| pair[0].entry_date <= pair[1].entry_date));
    }

    #[test]
    fn total_cost() {
        assert_eq!(gazp().total_cost(), Decimal::new(15000, 0));
    }

    #[test]
    fn open_without_exit_price() {
        let mut trade = gazp();
        assert!(!trade.is_open());
        trade.exit_price = None;
        trade.exit_date = None;
        assert!(trade.is_open());
        assert!(trade.validate().is_ok());
    }

    #[test]
    fn rejects_zero_quantity() {
        let trade = TradeRecord {
            quantity: 0,
            ..gazp()
        };
        match trade.validate() {
            Err(MigrationError::InvalidRecord { symbol, reason }) => {
                assert_eq!(symbol, "GAZP");
                assert!(reason.contains("quantity"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn rejects_exit_before_entry() {
        let trade = TradeRecord {
            exit_date: Some(NaiveDate::from_ymd(2022, 12, 31)),
            ..gazp()
        };
        assert!(trade.validate().is_err());
    }

    #[test]
    fn same_day_exit_is_valid() {
        let trade = TradeRecord {
            exit_date: Some(NaiveDate::from_ymd(2023, 1, 15)),
            ..gazp()
        };
        assert!(trade.validate().is_ok());
    }

    #[test]
    fn rejects_bad_symbol() {
        let long = TradeRecord {
            symbol: "ABCDEFGHIJK".into(),
            ..gazp()
        };
        assert!(long.validate().is_err());
        let empty = TradeRecord {
            symbol: String::new(),
            ..gazp()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_amounts() {
        let zero_margin = TradeRecord {
            margin_amount: Decimal::ZERO,
            ..gazp()
        };
        assert!(zero_margin.validate().is_err());
        let zero_exit = TradeRecord {
            exit_price: Some(Decimal::ZERO),
            ..gazp()
        };
        assert!(zero_exit.validate().is_err());
    }
}
