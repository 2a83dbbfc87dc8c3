//! Report layout: from a section tree to rendering-ready entries
//!
//! Single-column reports become one entry list. Balance sheets become rows
//! pairing an asset entry with a liabilities+equity entry, with blank
//! entries padding whichever column is shorter.

use std::collections::HashMap;

use finreport_config::{Config, LabelConfig};

use super::display::{BalanceSheetCell, BalanceSheetRow, Entry, Header, ReportDisplayData};
use super::{Report, Section};
use crate::error::{CoreError, CoreResult};
use crate::types::{ReportClass, SumFactor};

const LOG_TARGET: &str = "finreport::layout";

/// Layout settings
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Rendering units per indentation unit
    pub indent_scale: u32,
    /// Level rendered without base indentation
    pub level_starts_from: u32,
    pub line_number_start: u32,
    pub labels: LabelConfig,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl LayoutOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            indent_scale: config.layout.indent_scale,
            level_starts_from: config.layout.level_starts_from,
            line_number_start: config.layout.line_number_start,
            labels: config.labels.clone(),
        }
    }

    fn header(&self, title: String, amount_types: &[String]) -> Header {
        Header {
            title,
            line_number_label: self.labels.line_number.clone(),
            amount_types: amount_types
                .iter()
                .map(|key| self.labels.amount_type_title(key))
                .collect(),
        }
    }
}

/// Lay out `report` according to its class.
///
/// Unknown classes fall back to the single-column layout.
pub fn build_report_display_data(report: &Report, options: &LayoutOptions) -> CoreResult<ReportDisplayData> {
    match report.report_class() {
        Some(ReportClass::BalanceSheet) => build_balance_sheet(report, options),
        Some(ReportClass::IncomeStatement) => Ok(build_single_column(report, options)),
        None => {
            log::warn!(
                target: LOG_TARGET,
                "Unknown report class '{}' for report {}, using single-column layout",
                report.class,
                report.id
            );
            Ok(build_single_column(report, options))
        }
    }
}

fn build_single_column(report: &Report, options: &LayoutOptions) -> ReportDisplayData {
    let title = report
        .sections
        .first()
        .and_then(|section| section.title.clone())
        .unwrap_or_else(|| report.title.clone());
    let headers = vec![options.header(title, &report.amount_types)];

    let mut entries: Vec<Entry> = report.sections.iter().flat_map(items_from_section).collect();
    calculate_indentation(&mut entries, options);
    assign_line_numbers(&mut entries, options.line_number_start);

    log::debug!(
        target: LOG_TARGET,
        "Laid out report {} as a single column of {} entries",
        report.id,
        entries.len()
    );

    ReportDisplayData {
        class: report.class.clone(),
        headers,
        rows: None,
        entries: Some(entries),
    }
}

fn build_balance_sheet(report: &Report, options: &LayoutOptions) -> CoreResult<ReportDisplayData> {
    let [assets, claims] = report.sections.as_slice() else {
        return Err(CoreError::InvalidBalanceSheet {
            message: format!(
                "expected 2 top sections (assets, liabilities+equity), got {}",
                report.sections.len()
            ),
        });
    };
    let [liabilities, equity] = claims.subsections() else {
        return Err(CoreError::InvalidBalanceSheet {
            message: format!(
                "expected 2 subsections (liabilities, equity), got {}",
                claims.subsections().len()
            ),
        });
    };

    let headers = vec![
        options.header(assets.title.clone().unwrap_or_default(), &report.amount_types),
        options.header(claims.title.clone().unwrap_or_default(), &report.amount_types),
    ];

    let mut asset_entries = items_from_section(assets);
    let liability_entries = items_from_section(liabilities);
    let mut equity_entries = items_from_section(equity);
    // The combined total is printed after equity
    equity_entries.extend(claims.own_items().iter().cloned().map(Entry::new));

    calculate_indentation(&mut asset_entries, options);
    let split = liability_entries.len();
    let mut right_entries = liability_entries;
    right_entries.extend(equity_entries);
    calculate_indentation(&mut right_entries, options);

    let mut blanks = BlankFactory::default();
    if asset_entries.len() > right_entries.len() {
        let needed = asset_entries.len() - right_entries.len();
        let equity_part = right_entries.split_off(split);
        right_entries.extend(blanks.take(needed));
        right_entries.extend(equity_part);
        log::debug!(target: LOG_TARGET, "Padded liabilities with {} blank rows", needed);
    } else if right_entries.len() > asset_entries.len() {
        let needed = right_entries.len() - asset_entries.len();
        asset_entries.extend(blanks.take(needed));
        log::debug!(target: LOG_TARGET, "Padded assets with {} blank rows", needed);
    }

    assign_line_numbers(&mut asset_entries, options.line_number_start);
    let right_start = (max_line_number(&asset_entries) + 1).max(options.line_number_start);
    assign_line_numbers(&mut right_entries, right_start);

    let rows = zip_rows(asset_entries, right_entries);
    log::debug!(target: LOG_TARGET, "Laid out balance sheet {} in {} rows", report.id, rows.len());

    Ok(ReportDisplayData {
        class: report.class.clone(),
        headers,
        rows: Some(rows),
        entries: None,
    })
}

/// Entries of `section`: items of nested sections first, depth-first, then
/// the section's own items.
pub fn items_from_section(section: &Section) -> Vec<Entry> {
    let mut entries: Vec<Entry> = section.subsections().iter().flat_map(items_from_section).collect();
    entries.extend(section.own_items().iter().cloned().map(Entry::new));
    entries
}

/// Indentation recorded for the last non-breakdown entry of a level
#[derive(Clone, Copy)]
struct LevelMark {
    units: u32,
    has_prefix: bool,
}

/// Compute `indentation` and `is_sum_factor_continuation` in one left to
/// right pass.
///
/// Base indentation is the level below `level_starts_from`. Continuations of
/// a running-subtotal group get one extra unit, which deeper entries inherit
/// until the next root-level entry or group start. Breakdown entries ignore
/// their own level and take their parent's indentation, plus one if the
/// parent shows a prefix.
pub fn calculate_indentation(entries: &mut [Entry], options: &LayoutOptions) {
    let root_level = options.level_starts_from;
    let mut preserved: Option<SumFactor> = None;
    let mut extra = 0u32;
    let mut extra_from_level = root_level;
    let mut parents: HashMap<u32, LevelMark> = HashMap::new();

    for entry in entries.iter_mut() {
        let item = &entry.item;
        let level = item.level;
        if level == root_level {
            extra = 0;
            extra_from_level = root_level;
        }

        let starts_group = item.display_sum_factor;
        let same_group = item.sum_factor.is_signed() && preserved == Some(item.sum_factor);
        let is_continuation = !starts_group && same_group;
        let has_prefix = starts_group || same_group;
        if starts_group {
            preserved = Some(item.sum_factor);
        }

        let level_units = level.saturating_sub(root_level);
        let parent = level.checked_sub(1).and_then(|parent_level| parents.get(&parent_level).copied());
        let units = match (item.is_breakdown_item && level > root_level, parent) {
            (true, Some(parent)) => parent.units + u32::from(parent.has_prefix),
            (true, None) => level_units,
            (false, _) => {
                let mut own_extra = if level > extra_from_level { extra } else { 0 };
                if is_continuation {
                    own_extra += 1;
                    extra = own_extra;
                    extra_from_level = level;
                } else if starts_group {
                    extra = 0;
                    extra_from_level = root_level;
                }
                let units = level_units + own_extra;
                parents.insert(level, LevelMark { units, has_prefix });
                units
            }
        };

        entry.indentation = units * options.indent_scale;
        entry.is_sum_factor_continuation = is_continuation;
    }
}

/// Number entries that carry amounts, starting at `start`.
///
/// Returns the next unused number.
pub fn assign_line_numbers(entries: &mut [Entry], start: u32) -> u32 {
    let mut next = start;
    for entry in entries.iter_mut() {
        if entry.is_numbered() {
            entry.line_number = Some(next);
            next += 1;
        } else {
            entry.line_number = None;
        }
    }
    next
}

/// Largest assigned line number, 0 when nothing is numbered
pub fn max_line_number(entries: &[Entry]) -> u32 {
    entries.iter().filter_map(|entry| entry.line_number).max().unwrap_or(0)
}

/// Pair entries by index; a missing side becomes a blank cell
pub fn zip_rows(assets: Vec<Entry>, claims: Vec<Entry>) -> Vec<BalanceSheetRow> {
    let len = assets.len().max(claims.len());
    let mut assets = assets.into_iter();
    let mut claims = claims.into_iter();
    (0..len)
        .map(|_| BalanceSheetRow {
            asset: assets.next().map_or_else(BalanceSheetCell::blank, BalanceSheetCell::filled),
            liability: claims.next().map_or_else(BalanceSheetCell::blank, BalanceSheetCell::filled),
        })
        .collect()
}

/// Hands out padding entries with ids unique within one layout call
#[derive(Default)]
struct BlankFactory {
    issued: usize,
}

impl BlankFactory {
    fn take(&mut self, count: usize) -> Vec<Entry> {
        (0..count)
            .map(|_| {
                self.issued += 1;
                Entry::blank(format!("blank-{}", self.issued))
            })
            .collect()
    }
}
