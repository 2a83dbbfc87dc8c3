//! Submission shapes for saving an edited report template
//!
//! The backend takes a leaner form than it serves: formulas reference their
//! account by number only, and new items go without an id.

use serde::{Deserialize, Serialize};

use super::editor::{ItemTree, Leveled};
use super::{is_false, Formula, Item, Report, Section};
use crate::types::{DataSource, FormulaRule, SumFactor};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_types: Option<Vec<String>>,
    pub sections: Vec<UpdateReportRequestSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportRequestSection {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<UpdateReportRequestSection>>,
    #[serde(default)]
    pub items: Vec<UpdateReportRequestItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportRequestItem {
    /// Absent for items the backend has not stored yet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub level: u32,
    #[serde(default)]
    pub sum_factor: SumFactor,
    #[serde(default)]
    pub data_source: DataSource,
    #[serde(default, skip_serializing_if = "is_false")]
    pub display_sum_factor: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_breakdown_item: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_able_to_add_child: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formulas: Option<Vec<UpdateReportRequestItemFormula>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportRequestItemFormula {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub sum_factor: SumFactor,
    pub account_number: String,
    pub rule: FormulaRule,
}

impl Leveled for UpdateReportRequestItem {
    fn level(&self) -> u32 {
        self.level
    }
}

impl ItemTree for UpdateReportRequestSection {
    type Item = UpdateReportRequestItem;

    fn items(&self) -> Option<&Vec<UpdateReportRequestItem>> {
        Some(&self.items)
    }

    fn items_mut(&mut self) -> Option<&mut Vec<UpdateReportRequestItem>> {
        Some(&mut self.items)
    }

    fn subsections(&self) -> Option<&Vec<UpdateReportRequestSection>> {
        self.sections.as_ref()
    }

    fn subsections_mut(&mut self) -> Option<&mut Vec<UpdateReportRequestSection>> {
        self.sections.as_mut()
    }
}

/// Collapse formula accounts to their account numbers
pub fn formulas_to_request(formulas: Option<&[Formula]>) -> Option<Vec<UpdateReportRequestItemFormula>> {
    formulas.map(|formulas| {
        formulas
            .iter()
            .map(|formula| UpdateReportRequestItemFormula {
                id: Some(formula.id.clone()),
                sum_factor: formula.sum_factor,
                account_number: formula.account.account_number.clone(),
                rule: formula.rule,
            })
            .collect()
    })
}

pub fn item_to_request(item: &Item) -> UpdateReportRequestItem {
    UpdateReportRequestItem {
        id: Some(item.id.clone()),
        text: Some(item.text.clone()),
        level: item.level,
        sum_factor: item.sum_factor,
        data_source: item.data_source,
        display_sum_factor: item.display_sum_factor,
        is_breakdown_item: item.is_breakdown_item,
        is_able_to_add_child: item.is_able_to_add_child,
        formulas: formulas_to_request(item.formulas.as_deref()),
    }
}

fn section_to_request(section: &Section) -> UpdateReportRequestSection {
    UpdateReportRequestSection {
        id: section.id.clone(),
        title: section.title.clone(),
        sections: section
            .sections
            .as_ref()
            .map(|sections| sections.iter().map(section_to_request).collect()),
        items: section.own_items().iter().map(item_to_request).collect(),
    }
}

/// Request that saves `report` as it is
pub fn report_to_request(report: &Report) -> UpdateReportRequest {
    UpdateReportRequest {
        title: Some(report.title.clone()),
        amount_types: Some(report.amount_types.clone()),
        sections: report.sections.iter().map(section_to_request).collect(),
    }
}

/// Id for an item created during an edit session
pub fn new_temporary_id() -> String {
    finreport_utils::generate_id()
}

/// Drop temporary ids so the backend assigns real ones
pub fn clean_temporary_ids(mut request: UpdateReportRequest) -> UpdateReportRequest {
    fn clean_section(section: &mut UpdateReportRequestSection) {
        for item in &mut section.items {
            if item.id.as_deref().is_some_and(finreport_utils::is_temporary_id) {
                item.id = None;
            }
        }
        for subsection in section.sections.iter_mut().flatten() {
            clean_section(subsection);
        }
    }

    request.sections.iter_mut().for_each(clean_section);
    request
}
