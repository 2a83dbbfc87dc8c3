//! Basic enumerations shared by accounts, ledgers and reports

use serde::{Deserialize, Serialize};

/// Side of the ledger an account's balance normally sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceDirection {
    /// Assets and expenses
    Debit,
    /// Liabilities, equity and income
    Credit,
}

impl Default for BalanceDirection {
    fn default() -> Self {
        BalanceDirection::Debit
    }
}

impl std::str::FromStr for BalanceDirection {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debit" => Ok(BalanceDirection::Debit),
            "credit" => Ok(BalanceDirection::Credit),
            _ => Err(format!("Invalid balance direction: {}", s)),
        }
    }
}

impl std::fmt::Display for BalanceDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BalanceDirection::Debit => write!(f, "debit"),
            BalanceDirection::Credit => write!(f, "credit"),
        }
    }
}

/// Contribution sign of a report line to its running subtotal.
///
/// Serialized as the bare integer (`1`, `0`, `-1`), which is how report
/// templates carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum SumFactor {
    Add,
    Ignore,
    Deduct,
}

impl SumFactor {
    /// Numeric sign of the factor
    pub fn value(self) -> i8 {
        match self {
            SumFactor::Add => 1,
            SumFactor::Ignore => 0,
            SumFactor::Deduct => -1,
        }
    }

    /// Whether this factor takes part in running-subtotal groups
    pub fn is_signed(self) -> bool {
        self != SumFactor::Ignore
    }
}

impl Default for SumFactor {
    fn default() -> Self {
        SumFactor::Ignore
    }
}

impl TryFrom<i8> for SumFactor {
    type Error = String;
    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SumFactor::Add),
            0 => Ok(SumFactor::Ignore),
            -1 => Ok(SumFactor::Deduct),
            other => Err(format!("Invalid sum factor: {}", other)),
        }
    }
}

impl From<SumFactor> for i8 {
    fn from(factor: SumFactor) -> Self {
        factor.value()
    }
}

impl std::str::FromStr for SumFactor {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "add" | "1" | "+1" => Ok(SumFactor::Add),
            "ignore" | "0" => Ok(SumFactor::Ignore),
            "deduct" | "-1" => Ok(SumFactor::Deduct),
            _ => Err(format!("Invalid sum factor: {}", s)),
        }
    }
}

impl std::fmt::Display for SumFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SumFactor::Add => write!(f, "add"),
            SumFactor::Ignore => write!(f, "ignore"),
            SumFactor::Deduct => write!(f, "deduct"),
        }
    }
}

/// Where a report line's amounts come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Subtotal of preceding lines
    Sum,
    /// Computed from account formulas
    Formulas,
    /// Plain text or header line
    None,
}

impl DataSource {
    /// Lines that carry amounts get a line number
    pub fn is_numbered(self) -> bool {
        matches!(self, DataSource::Sum | DataSource::Formulas)
    }
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::None
    }
}

impl std::str::FromStr for DataSource {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sum" => Ok(DataSource::Sum),
            "formulas" => Ok(DataSource::Formulas),
            "none" => Ok(DataSource::None),
            _ => Err(format!("Invalid data source: {}", s)),
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Sum => write!(f, "sum"),
            DataSource::Formulas => write!(f, "formulas"),
            DataSource::None => write!(f, "none"),
        }
    }
}

/// Which ledger figure a formula reads from its account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormulaRule {
    Net,
    Debit,
    Credit,
    Transaction,
}

impl std::str::FromStr for FormulaRule {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "net" => Ok(FormulaRule::Net),
            "debit" => Ok(FormulaRule::Debit),
            "credit" => Ok(FormulaRule::Credit),
            "transaction" => Ok(FormulaRule::Transaction),
            _ => Err(format!("Invalid formula rule: {}", s)),
        }
    }
}

impl std::fmt::Display for FormulaRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormulaRule::Net => write!(f, "net"),
            FormulaRule::Debit => write!(f, "debit"),
            FormulaRule::Credit => write!(f, "credit"),
            FormulaRule::Transaction => write!(f, "transaction"),
        }
    }
}

/// Known report classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportClass {
    /// Two-column assets vs. liabilities+equity layout
    BalanceSheet,
    /// Single-column layout
    IncomeStatement,
}

impl ReportClass {
    pub const BALANCE_SHEET: &'static str = "balance_sheet";
    pub const INCOME_STATEMENT: &'static str = "income_statement";

    /// Classify a raw class string; unknown classes yield `None`
    pub fn parse(class: &str) -> Option<Self> {
        match class {
            Self::BALANCE_SHEET => Some(ReportClass::BalanceSheet),
            Self::INCOME_STATEMENT => Some(ReportClass::IncomeStatement),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReportClass::BalanceSheet => Self::BALANCE_SHEET,
            ReportClass::IncomeStatement => Self::INCOME_STATEMENT,
        }
    }
}

impl std::fmt::Display for ReportClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_direction_from_str() {
        assert_eq!("debit".parse::<BalanceDirection>().unwrap(), BalanceDirection::Debit);
        assert_eq!("CREDIT".parse::<BalanceDirection>().unwrap(), BalanceDirection::Credit);
        assert!("both".parse::<BalanceDirection>().is_err());
    }

    #[test]
    fn test_sum_factor_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&SumFactor::Deduct).unwrap(), "-1");
        let factor: SumFactor = serde_json::from_str("1").unwrap();
        assert_eq!(factor, SumFactor::Add);
        assert!(serde_json::from_str::<SumFactor>("2").is_err());
    }

    #[test]
    fn test_sum_factor_is_signed() {
        assert!(SumFactor::Add.is_signed());
        assert!(SumFactor::Deduct.is_signed());
        assert!(!SumFactor::Ignore.is_signed());
    }

    #[test]
    fn test_data_source_numbering() {
        assert!(DataSource::Sum.is_numbered());
        assert!(DataSource::Formulas.is_numbered());
        assert!(!DataSource::None.is_numbered());
        assert_eq!(serde_json::to_string(&DataSource::None).unwrap(), "\"none\"");
    }

    #[test]
    fn test_formula_rule_round_trip_str() {
        for rule in ["net", "debit", "credit", "transaction"] {
            assert_eq!(rule.parse::<FormulaRule>().unwrap().to_string(), rule);
        }
    }

    #[test]
    fn test_report_class_parse() {
        assert_eq!(ReportClass::parse("balance_sheet"), Some(ReportClass::BalanceSheet));
        assert_eq!(ReportClass::parse("income_statement"), Some(ReportClass::IncomeStatement));
        assert_eq!(ReportClass::parse("cash_flow"), None);
    }
}
