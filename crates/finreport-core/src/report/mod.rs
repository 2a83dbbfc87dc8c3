//! Financial report templates: sections, items, formulas
//!
//! A report is a forest of [`Section`]s. Each section may nest further
//! sections and holds an ordered list of [`Item`]s whose `level` marks their
//! depth independently of section nesting.

pub mod display;
pub mod editor;
pub mod layout;
pub mod prefix;
pub mod request;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Account;
use crate::period::FiscalPeriod;
use crate::types::{DataSource, FormulaRule, ReportClass, SumFactor};

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

/// A report definition or a generated report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    #[serde(default)]
    pub sob_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<FiscalPeriod>,
    pub title: String,
    #[serde(default)]
    pub template: bool,
    /// `balance_sheet`, `income_statement`, or anything else
    pub class: String,
    #[serde(default)]
    pub amount_types: Vec<String>,
    pub sections: Vec<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Report {
    pub fn report_class(&self) -> Option<ReportClass> {
        ReportClass::parse(&self.class)
    }

    pub fn is_balance_sheet(&self) -> bool {
        self.report_class() == Some(ReportClass::BalanceSheet)
    }

    /// Number of items across all sections
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(Section::item_count).sum()
    }
}

/// Named or anonymous grouping of report lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub amounts: Vec<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<Section>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Item>>,
}

impl Section {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            amounts: Vec::new(),
            sections: None,
            items: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = Some(items);
        self
    }

    pub fn with_sections(mut self, sections: Vec<Section>) -> Self {
        self.sections = Some(sections);
        self
    }

    pub fn subsections(&self) -> &[Section] {
        self.sections.as_deref().unwrap_or_default()
    }

    pub fn own_items(&self) -> &[Item] {
        self.items.as_deref().unwrap_or_default()
    }

    /// Items in this section and all nested sections
    pub fn item_count(&self) -> usize {
        self.own_items().len() + self.subsections().iter().map(Section::item_count).sum::<usize>()
    }
}

/// A single report line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub text: String,
    /// 1-based depth marker
    pub level: u32,
    #[serde(default)]
    pub sum_factor: SumFactor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    /// First line of a running-subtotal group
    #[serde(default, skip_serializing_if = "is_false")]
    pub display_sum_factor: bool,
    #[serde(default)]
    pub data_source: DataSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formulas: Option<Vec<Formula>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amounts: Option<Vec<Decimal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_editable: Option<bool>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_breakdown_item: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_able_to_add_child: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_able_to_add_leaf: Option<bool>,
}

impl Item {
    /// Plain item with no flags, formulas or amounts
    pub fn new(id: impl Into<String>, text: impl Into<String>, level: u32) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            level,
            sum_factor: SumFactor::Ignore,
            item_type: None,
            display_sum_factor: false,
            data_source: DataSource::None,
            formulas: None,
            amounts: None,
            is_editable: None,
            is_breakdown_item: false,
            is_able_to_add_child: None,
            is_able_to_add_leaf: None,
        }
    }

    pub fn with_sum_factor(mut self, sum_factor: SumFactor) -> Self {
        self.sum_factor = sum_factor;
        self
    }

    pub fn with_data_source(mut self, data_source: DataSource) -> Self {
        self.data_source = data_source;
        self
    }

    /// Mark as the first line of a running-subtotal group
    pub fn showing_sum_factor(mut self) -> Self {
        self.display_sum_factor = true;
        self
    }

    pub fn as_breakdown(mut self) -> Self {
        self.is_breakdown_item = true;
        self
    }
}

/// Account-based calculation rule of an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Formula {
    pub id: String,
    pub account: Account,
    /// Only `add` and `deduct` occur in formulas
    pub sum_factor: SumFactor,
    pub rule: FormulaRule,
    #[serde(default)]
    pub amounts: Vec<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> serde_json::Value {
        serde_json::json!({
            "id": "r-1",
            "sobId": "sob",
            "period": { "fiscalYear": 2024, "periodNumber": 6 },
            "title": "Income statement",
            "template": false,
            "class": "income_statement",
            "amountTypes": ["period_amount", "year_to_date_amount"],
            "sections": [{
                "id": "s-1",
                "amounts": [0, 0],
                "items": [{
                    "id": "i-1",
                    "text": "Revenue",
                    "level": 1,
                    "sumFactor": 1,
                    "displaySumFactor": true,
                    "dataSource": "formulas",
                    "formulas": [{
                        "id": "f-1",
                        "account": {
                            "id": "a-1",
                            "title": "Sales",
                            "accountNumber": "6001",
                            "balanceDirection": "credit"
                        },
                        "sumFactor": 1,
                        "rule": "credit",
                        "amounts": [1200, 5400]
                    }],
                    "amounts": [1200, 5400]
                }]
            }]
        })
    }

    #[test]
    fn test_report_from_json() {
        let report: Report = serde_json::from_value(sample_report()).unwrap();
        assert_eq!(report.report_class(), Some(ReportClass::IncomeStatement));
        assert!(!report.is_balance_sheet());
        assert_eq!(report.item_count(), 1);

        let item = &report.sections[0].own_items()[0];
        assert_eq!(item.sum_factor, SumFactor::Add);
        assert!(item.display_sum_factor);
        assert!(!item.is_breakdown_item);
        let formula = &item.formulas.as_ref().unwrap()[0];
        assert_eq!(formula.rule, FormulaRule::Credit);
        assert_eq!(formula.account.account_number, "6001");
    }

    #[test]
    fn test_item_skips_unset_flags_when_serialized() {
        let value = serde_json::to_value(Item::new("i", "Cash", 2)).unwrap();
        assert_eq!(value["sumFactor"], 0);
        assert_eq!(value["dataSource"], "none");
        assert!(value.get("displaySumFactor").is_none());
        assert!(value.get("isBreakdownItem").is_none());
        assert!(value.get("formulas").is_none());
    }

    #[test]
    fn test_section_item_count_includes_nested() {
        let section = Section::new("root")
            .with_sections(vec![Section::new("child").with_items(vec![
                Item::new("a", "A", 1),
                Item::new("b", "B", 2),
            ])])
            .with_items(vec![Item::new("total", "Total", 1)]);
        assert_eq!(section.item_count(), 3);
        assert_eq!(section.subsections().len(), 1);
    }
}
