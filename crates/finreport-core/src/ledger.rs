//! Account and ledger trees, and bottom-up balance rollups

use finreport_config::OrphanPolicy;
use log::debug;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::CoreResult;
use crate::models::{Account, InitializeLedgerItem, InitializeLedgersRequest, Ledger};
use crate::tree::{build_forest, flatten, Forest, TreeNode};
use crate::types::BalanceDirection;

pub type AccountTreeNode = TreeNode<Account>;
pub type LedgerTreeNode = TreeNode<LedgerEntry>;

/// A ledger plus the editable, direction-aware view of its opening balance
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    #[serde(flatten)]
    pub ledger: Ledger,
    /// Unsigned opening balance ("distance from zero")
    pub opening_balance: Decimal,
    /// Opening balance on the debit side
    pub opening_debit: Decimal,
    /// Opening balance on the credit side
    pub opening_credit: Decimal,
}

impl LedgerEntry {
    /// Wrap a ledger; the directional split follows the sign of the source
    /// amount.
    pub fn new(ledger: Ledger) -> Self {
        let amount = ledger.opening_amount;
        let (opening_debit, opening_credit) = if amount.is_sign_negative() {
            (Decimal::ZERO, -amount)
        } else {
            (amount, Decimal::ZERO)
        };
        Self {
            opening_balance: amount.abs(),
            opening_debit,
            opening_credit,
            ledger,
        }
    }

    pub fn account(&self) -> &Account {
        &self.ledger.account
    }

    /// Store a rolled-up opening balance on the side named by the
    /// account's own balance direction.
    fn set_rolled_up_opening(&mut self, total: Decimal) {
        self.opening_balance = total;
        match self.ledger.account.balance_direction {
            BalanceDirection::Debit => {
                self.ledger.opening_amount = total;
                self.opening_debit = total;
                self.opening_credit = Decimal::ZERO;
            }
            BalanceDirection::Credit => {
                self.ledger.opening_amount = -total;
                self.opening_debit = Decimal::ZERO;
                self.opening_credit = total;
            }
        }
    }
}

/// Build the chart-of-accounts tree
pub fn build_account_tree(accounts: Vec<Account>, policy: OrphanPolicy) -> CoreResult<Forest<Account>> {
    build_forest(
        accounts,
        |a| a.id.clone(),
        |a| a.superior_account_id.clone(),
        policy,
    )
}

/// Build the ledger tree, keyed by account id and shaped by the account
/// hierarchy.
pub fn build_ledger_tree(ledgers: Vec<Ledger>, policy: OrphanPolicy) -> CoreResult<Forest<LedgerEntry>> {
    build_forest(
        ledgers.into_iter().map(LedgerEntry::new),
        |e| e.ledger.account_id.clone(),
        |e| e.ledger.account.superior_account_id.clone(),
        policy,
    )
}

/// Keep only the ledgers of one period
pub fn ledgers_for_period(ledgers: Vec<Ledger>, period_id: &str) -> Vec<Ledger> {
    ledgers
        .into_iter()
        .filter(|l| l.period_id == period_id)
        .collect()
}

/// Recalculate every non-leaf node from its children, bottom-up.
///
/// Opening balances roll up as the gross sum of the children's unsigned
/// balances and land on the parent's own balance side. Period movements
/// roll up as plain sums. Leaves keep their source figures.
pub fn calculate_parent_balances(nodes: &mut [LedgerTreeNode]) {
    for node in nodes.iter_mut() {
        if node.children.is_empty() {
            continue;
        }
        calculate_parent_balances(&mut node.children);

        let opening: Decimal = node.children.iter().map(|c| c.data.opening_balance).sum();
        let period_debit: Decimal = node.children.iter().map(|c| c.data.ledger.period_debit).sum();
        let period_credit: Decimal = node.children.iter().map(|c| c.data.ledger.period_credit).sum();

        node.data.set_rolled_up_opening(opening);
        node.data.ledger.period_debit = period_debit;
        node.data.ledger.period_credit = period_credit;

        debug!(
            target: "finreport::ledger",
            "rolled up {} children into {}: opening {}",
            node.children.len(),
            node.key,
            opening
        );
    }
}

/// Opening balances of leaf accounts, ready for submission
pub fn initialize_ledgers_request(roots: &[LedgerTreeNode]) -> InitializeLedgersRequest {
    let ledgers = flatten(roots)
        .into_iter()
        .filter(|node| node.is_leaf())
        .map(|node| InitializeLedgerItem {
            account_number: node.data.account().account_number.clone(),
            opening_balance: node.data.opening_balance,
        })
        .collect();
    InitializeLedgersRequest { ledgers }
}

/// Zero-pad an account level number to the code length configured for its
/// level. `None` when the level is deeper than the configured code lengths.
pub fn pad_level_number(level_number: u32, level: usize, code_lengths: &[usize]) -> Option<String> {
    if level == 0 || level > code_lengths.len() {
        log::error!(
            target: "finreport::ledger",
            "level {} exceeds account max depth {}",
            level,
            code_lengths.len()
        );
        return None;
    }
    if level_number == 0 {
        return Some("0".to_string());
    }
    Some(format!("{:0width$}", level_number, width = code_lengths[level - 1]))
}
