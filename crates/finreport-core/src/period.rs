//! Fiscal periods: labels and calendar bounds

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::models::Period;

/// Fiscal year plus period number, as carried by generated reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiscalPeriod {
    pub fiscal_year: i32,
    /// 1..=12
    pub period_number: u32,
}

impl FiscalPeriod {
    /// Create a period, rejecting numbers outside 1..=12
    pub fn new(fiscal_year: i32, period_number: u32) -> Option<Self> {
        if (1..=12).contains(&period_number) {
            Some(Self {
                fiscal_year,
                period_number,
            })
        } else {
            None
        }
    }

    /// First day of the period
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.fiscal_year, self.period_number, 1)
    }

    /// Last day of the period
    pub fn end_date(&self) -> Option<NaiveDate> {
        let (year, month) = if self.period_number == 12 {
            (self.fiscal_year + 1, 1)
        } else {
            (self.fiscal_year, self.period_number + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1).and_then(|d| d.pred_opt())
    }

    /// `2024-6 (2024-06-01 ~ 2024-06-30)` style heading
    pub fn heading(&self) -> String {
        match (self.start_date(), self.end_date()) {
            (Some(start), Some(end)) => format!("{} ({} ~ {})", self, start, end),
            _ => self.to_string(),
        }
    }
}

impl std::fmt::Display for FiscalPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.fiscal_year, self.period_number)
    }
}

impl Period {
    pub fn fiscal_period(&self) -> FiscalPeriod {
        FiscalPeriod {
            fiscal_year: self.fiscal_year,
            period_number: self.period_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_label() {
        let period = FiscalPeriod::new(2024, 3).unwrap();
        assert_eq!(period.to_string(), "2024-3");
    }

    #[test]
    fn test_period_number_range() {
        assert!(FiscalPeriod::new(2024, 0).is_none());
        assert!(FiscalPeriod::new(2024, 13).is_none());
    }

    #[test]
    fn test_period_bounds() {
        let feb = FiscalPeriod::new(2024, 2).unwrap();
        assert_eq!(feb.start_date(), NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(feb.end_date(), NaiveDate::from_ymd_opt(2024, 2, 29));

        let dec = FiscalPeriod::new(2023, 12).unwrap();
        assert_eq!(dec.end_date(), NaiveDate::from_ymd_opt(2023, 12, 31));
    }

    #[test]
    fn test_period_heading() {
        let period = FiscalPeriod::new(2024, 6).unwrap();
        assert_eq!(period.heading(), "2024-6 (2024-06-01 ~ 2024-06-30)");

        // Deserialized periods skip the range check
        let odd: FiscalPeriod = serde_json::from_value(serde_json::json!({
            "fiscalYear": 2024,
            "periodNumber": 13
        }))
        .unwrap();
        assert_eq!(odd.heading(), "2024-13");
    }

    #[test]
    fn test_period_record_conversion() {
        let period: Period = serde_json::from_value(serde_json::json!({
            "id": "p-1",
            "fiscalYear": 2024,
            "periodNumber": 5,
            "isCurrent": true
        }))
        .unwrap();
        assert_eq!(period.fiscal_period().to_string(), "2024-5");
        assert!(!period.is_closed);
    }
}
