//! Running-subtotal and breakdown prefixes of rendered entries

use finreport_config::LabelConfig;
use serde::Serialize;

use super::display::Entry;
use crate::types::SumFactor;

/// Prefix texts of one entry.
///
/// Texts are present whenever the entry belongs to a group so renderers can
/// reserve the column; the `*_visible` flags say whether to print them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPrefixInfo {
    pub sum_factor_text: Option<String>,
    pub sum_factor_visible: bool,
    pub breakdown_text: Option<String>,
    pub breakdown_visible: bool,
}

fn sum_factor_label(factor: SumFactor, labels: &LabelConfig) -> Option<String> {
    match factor {
        SumFactor::Add => Some(labels.sum_factor_add.clone()),
        SumFactor::Deduct => Some(labels.sum_factor_deduct.clone()),
        SumFactor::Ignore => None,
    }
}

/// Prefix info for `entry`, given the entry printed right above it
pub fn entry_prefix_info(entry: &Entry, prev: Option<&Entry>, labels: &LabelConfig) -> EntryPrefixInfo {
    let in_group = entry.item.display_sum_factor || entry.is_sum_factor_continuation;
    let sum_factor_text = in_group
        .then(|| sum_factor_label(entry.item.sum_factor, labels))
        .flatten();
    let sum_factor_visible = sum_factor_text.is_some() && entry.item.display_sum_factor;

    let (breakdown_text, breakdown_visible) = if entry.item.is_breakdown_item {
        let first_of_run = !prev.is_some_and(|prev| prev.item.is_breakdown_item);
        (Some(labels.breakdown.clone()), first_of_run)
    } else {
        (None, false)
    };

    EntryPrefixInfo {
        sum_factor_text,
        sum_factor_visible,
        breakdown_text,
        breakdown_visible,
    }
}

impl EntryPrefixInfo {
    /// Prefix string for plain-text output: hidden prefixes become spaces
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (text, visible) in [
            (&self.sum_factor_text, self.sum_factor_visible),
            (&self.breakdown_text, self.breakdown_visible),
        ] {
            if let Some(text) = text {
                if visible {
                    out.push_str(text);
                } else {
                    out.extend(std::iter::repeat(' ').take(display_width(text)));
                }
            }
        }
        out
    }
}

/// Terminal columns taken by `text`; CJK labels are double width
fn display_width(text: &str) -> usize {
    text.chars().map(|c| if c.is_ascii() { 1 } else { 2 }).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Item;

    fn entry(item: Item, continuation: bool) -> Entry {
        let mut entry = Entry::new(item);
        entry.is_sum_factor_continuation = continuation;
        entry
    }

    #[test]
    fn test_first_in_group_shows_prefix() {
        let labels = LabelConfig::default();
        let first = entry(Item::new("a", "Revenue", 1).with_sum_factor(SumFactor::Add).showing_sum_factor(), false);

        let info = entry_prefix_info(&first, None, &labels);
        assert_eq!(info.sum_factor_text.as_deref(), Some("加："));
        assert!(info.sum_factor_visible);
        assert_eq!(info.breakdown_text, None);
    }

    #[test]
    fn test_continuation_reserves_hidden_prefix() {
        let labels = LabelConfig::default();
        let next = entry(Item::new("b", "Cost", 1).with_sum_factor(SumFactor::Deduct), true);

        let info = entry_prefix_info(&next, None, &labels);
        assert_eq!(info.sum_factor_text.as_deref(), Some("减："));
        assert!(!info.sum_factor_visible);
        assert_eq!(info.render(), "    ");
    }

    #[test]
    fn test_zero_sum_factor_has_no_prefix() {
        let labels = LabelConfig::default();
        let item = Item::new("c", "Note", 1).showing_sum_factor();

        let info = entry_prefix_info(&entry(item, false), None, &labels);
        assert_eq!(info.sum_factor_text, None);
        assert!(!info.sum_factor_visible);
    }

    #[test]
    fn test_breakdown_prefix_only_on_first_of_run() {
        let labels = LabelConfig::default();
        let parent = entry(Item::new("p", "Receivables", 1), false);
        let first = entry(Item::new("b1", "Trade", 2).as_breakdown(), false);
        let second = entry(Item::new("b2", "Other", 2).as_breakdown(), false);

        let first_info = entry_prefix_info(&first, Some(&parent), &labels);
        let second_info = entry_prefix_info(&second, Some(&first), &labels);

        assert!(first_info.breakdown_visible);
        assert_eq!(first_info.render(), "其中：");
        assert!(!second_info.breakdown_visible);
        assert_eq!(second_info.breakdown_text.as_deref(), Some("其中："));
    }

    #[test]
    fn test_custom_labels() {
        let labels = LabelConfig {
            sum_factor_add: "Add: ".to_string(),
            ..LabelConfig::default()
        };
        let first = entry(Item::new("a", "Revenue", 1).with_sum_factor(SumFactor::Add).showing_sum_factor(), false);

        assert_eq!(entry_prefix_info(&first, None, &labels).render(), "Add: ");
    }
}
