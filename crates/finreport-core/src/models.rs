//! General-ledger records as delivered by the backend

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::BalanceDirection;

/// Chart-of-accounts entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub sob_id: String,
    /// Id of the parent account, absent for top-level accounts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superior_account_id: Option<String>,
    pub title: String,
    pub account_number: String,
    /// Per-level numbers making up the account number
    #[serde(default)]
    pub number_hierarchy: Vec<u32>,
    #[serde(default)]
    pub is_leaf: bool,
    /// 1-based depth in the chart of accounts
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub group: String,
    pub balance_direction: BalanceDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_level() -> u32 {
    1
}

impl Account {
    /// Parent id, treating an empty string as "no parent"
    pub fn parent_id(&self) -> Option<&str> {
        self.superior_account_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }

    /// Check if this is a top-level account
    pub fn is_root(&self) -> bool {
        self.parent_id().is_none()
    }

    /// "1001 Cash" style label
    pub fn display_name(&self) -> String {
        format!("{} {}", self.account_number, self.title)
    }
}

/// Per-period balance record of one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    pub id: String,
    #[serde(default)]
    pub sob_id: String,
    pub account_id: String,
    /// Signed opening balance: positive on the debit side
    #[serde(default)]
    pub opening_amount: Decimal,
    #[serde(default)]
    pub period_debit: Decimal,
    #[serde(default)]
    pub period_credit: Decimal,
    #[serde(default)]
    pub ending_amount: Decimal,
    pub account: Account,
    #[serde(default)]
    pub period_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Ledger {
    pub fn balance_direction(&self) -> BalanceDirection {
        self.account.balance_direction
    }
}

/// Fiscal period of a set of books
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub id: String,
    #[serde(default)]
    pub sob_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_period_id: Option<String>,
    pub fiscal_year: i32,
    pub period_number: u32,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default)]
    pub is_current: bool,
}

/// Leaf opening balance submitted when a period's ledgers are initialized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeLedgerItem {
    pub account_number: String,
    pub opening_balance: Decimal,
}

/// Request body for initializing ledgers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitializeLedgersRequest {
    pub ledgers: Vec<InitializeLedgerItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_account_from_backend_json() {
        let account: Account = serde_json::from_value(serde_json::json!({
            "id": "a-1",
            "sobId": "sob",
            "superiorAccountId": "a-0",
            "title": "Cash",
            "accountNumber": "1001",
            "numberHierarchy": [1, 1],
            "isLeaf": true,
            "level": 2,
            "class": "1",
            "group": "101",
            "balanceDirection": "debit",
            "createdAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(account.parent_id(), Some("a-0"));
        assert_eq!(account.balance_direction, BalanceDirection::Debit);
        assert_eq!(account.display_name(), "1001 Cash");
        assert!(account.created_at.is_some());
        assert!(account.updated_at.is_none());
    }

    #[test]
    fn test_empty_superior_id_is_root() {
        let account: Account = serde_json::from_value(serde_json::json!({
            "id": "a-1",
            "superiorAccountId": "",
            "title": "Assets",
            "accountNumber": "1",
            "balanceDirection": "debit"
        }))
        .unwrap();

        assert!(account.is_root());
        assert_eq!(account.level, 1);
    }

    #[test]
    fn test_ledger_amounts_accept_numbers_and_strings() {
        let ledger: Ledger = serde_json::from_value(serde_json::json!({
            "id": "l-1",
            "accountId": "a-1",
            "openingAmount": -120.5,
            "periodDebit": "10.25",
            "account": {
                "id": "a-1",
                "title": "Loans",
                "accountNumber": "2001",
                "balanceDirection": "credit"
            }
        }))
        .unwrap();

        assert_eq!(ledger.opening_amount, dec!(-120.5));
        assert_eq!(ledger.period_debit, dec!(10.25));
        assert_eq!(ledger.period_credit, Decimal::ZERO);
        assert_eq!(ledger.balance_direction(), BalanceDirection::Credit);
    }
}
