//! Display structures produced by the report layout engine

use serde::{Deserialize, Serialize};

use super::{is_false, Item};
use crate::types::{DataSource, SumFactor};

// ==================== Entries ====================

/// A report item annotated for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(flatten)]
    pub item: Item,
    /// Rendering units, always a multiple of the configured scale
    pub indentation: u32,
    /// Only lines that carry amounts are numbered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    /// Shares the running-subtotal sign of the group above without showing it
    #[serde(default)]
    pub is_sum_factor_continuation: bool,
    /// Set on rows inserted to even out balance sheet columns
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_padding: bool,
}

impl Entry {
    pub fn new(item: Item) -> Self {
        Self {
            item,
            indentation: 0,
            line_number: None,
            is_sum_factor_continuation: false,
            is_padding: false,
        }
    }

    /// Placeholder row used to even out balance sheet columns
    pub fn blank(id: String) -> Self {
        let mut item = Item::new(id, "", 0);
        item.sum_factor = SumFactor::Ignore;
        item.data_source = DataSource::None;
        Self {
            is_padding: true,
            ..Self::new(item)
        }
    }

    pub fn is_numbered(&self) -> bool {
        self.item.data_source.is_numbered()
    }
}

// ==================== Headers ====================

/// Column header of one report side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub title: String,
    pub line_number_label: String,
    /// Localized amount column titles
    pub amount_types: Vec<String>,
}

// ==================== Balance sheet rows ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheetCell {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<Entry>,
    pub is_blank: bool,
}

impl BalanceSheetCell {
    pub fn filled(entry: Entry) -> Self {
        Self {
            entry: Some(entry),
            is_blank: false,
        }
    }

    pub fn blank() -> Self {
        Self {
            entry: None,
            is_blank: true,
        }
    }
}

/// One printed balance sheet line: assets on the left, claims on the right
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheetRow {
    pub asset: BalanceSheetCell,
    pub liability: BalanceSheetCell,
}

// ==================== Report ====================

/// Layout result: `rows` for balance sheets, `entries` for everything else
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDisplayData {
    pub class: String,
    pub headers: Vec<Header>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<BalanceSheetRow>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<Entry>>,
}

impl ReportDisplayData {
    /// Printed line count
    pub fn row_count(&self) -> usize {
        match (&self.rows, &self.entries) {
            (Some(rows), _) => rows.len(),
            (None, Some(entries)) => entries.len(),
            (None, None) => 0,
        }
    }

    /// All entries in reading order; balance sheets list assets first.
    /// Blank padding is skipped.
    pub fn entries_in_order(&self) -> Vec<&Entry> {
        if let Some(rows) = &self.rows {
            let assets = rows.iter().filter_map(|row| row.asset.entry.as_ref());
            let claims = rows.iter().filter_map(|row| row.liability.entry.as_ref());
            return assets
                .chain(claims)
                .filter(|entry| !entry.is_padding)
                .collect();
        }
        self.entries.iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_entry_shape() {
        let entry = Entry::blank("blank-1".to_string());
        assert_eq!(entry.item.id, "blank-1");
        assert_eq!(entry.item.text, "");
        assert_eq!(entry.item.level, 0);
        assert_eq!(entry.item.sum_factor, SumFactor::Ignore);
        assert!(!entry.is_numbered());
        assert!(entry.is_padding);
    }

    #[test]
    fn test_entry_serializes_flat() {
        let mut entry = Entry::new(Item::new("i-1", "Cash", 2).with_data_source(DataSource::Formulas));
        entry.indentation = 2;
        entry.line_number = Some(3);

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["id"], "i-1");
        assert_eq!(value["lineNumber"], 3);
        assert_eq!(value["indentation"], 2);
        assert_eq!(value["isSumFactorContinuation"], false);
        assert!(value.get("isPadding").is_none());
    }

    #[test]
    fn test_single_column_counts() {
        let data = ReportDisplayData {
            class: "income_statement".to_string(),
            headers: vec![],
            rows: None,
            entries: Some(vec![Entry::new(Item::new("a", "A", 1)), Entry::new(Item::new("b", "B", 1))]),
        };
        assert_eq!(data.row_count(), 2);
        assert_eq!(data.entries_in_order().len(), 2);
    }

    #[test]
    fn test_entries_in_order_skips_blanks() {
        let data = ReportDisplayData {
            class: "balance_sheet".to_string(),
            headers: vec![],
            rows: Some(vec![
                BalanceSheetRow {
                    asset: BalanceSheetCell::filled(Entry::new(Item::new("a", "Cash", 1))),
                    liability: BalanceSheetCell::filled(Entry::new(Item::new("l", "Loans", 1))),
                },
                BalanceSheetRow {
                    asset: BalanceSheetCell::filled(Entry::new(Item::new("b", "Stock", 1))),
                    liability: BalanceSheetCell::filled(Entry::blank("blank-1".to_string())),
                },
            ]),
            entries: None,
        };

        let ids: Vec<_> = data.entries_in_order().iter().map(|e| e.item.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "l"]);
        assert_eq!(data.row_count(), 2);
    }
}
