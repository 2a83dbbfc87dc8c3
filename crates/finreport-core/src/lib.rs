//! Core tree building, ledger aggregation and report layout
//!
//! Everything here is pure: callers hand in records already loaded from
//! the backend and get trees, balances or display data back.

pub mod error;
pub mod ledger;
pub mod models;
pub mod period;
pub mod report;
pub mod tree;
pub mod types;

pub use error::{CoreError, CoreResult, ErrorCode, ErrorSeverity};
pub use finreport_config::OrphanPolicy;
pub use ledger::{
    build_account_tree, build_ledger_tree, calculate_parent_balances, initialize_ledgers_request,
    ledgers_for_period, pad_level_number, AccountTreeNode, LedgerEntry, LedgerTreeNode,
};
pub use models::{Account, Ledger, Period};
pub use period::FiscalPeriod;
pub use report::display::{BalanceSheetCell, BalanceSheetRow, Entry, Header, ReportDisplayData};
pub use report::editor::{delete_item, find_item, insert_item, insert_item_with, update_item, Position};
pub use report::layout::{build_report_display_data, LayoutOptions};
pub use report::prefix::{entry_prefix_info, EntryPrefixInfo};
pub use report::{Formula, Item, Report, Section};
pub use tree::{build_forest, flatten, Forest, TreeNode};
pub use types::{BalanceDirection, DataSource, FormulaRule, ReportClass, SumFactor};
