//! Positional edits on the items of a section tree
//!
//! Items carry their depth in `level` rather than in nesting, so "after an
//! item" means after the item and every deeper item that directly follows
//! it. The operations are generic over [`ItemTree`] so they work on stored
//! report sections and on request payloads alike.

use serde::{Deserialize, Serialize};

use super::{Item, Section};

const LOG_TARGET: &str = "finreport::editor";

/// Anything with a 1-based depth marker
pub trait Leveled {
    fn level(&self) -> u32;
}

impl Leveled for Item {
    fn level(&self) -> u32 {
        self.level
    }
}

/// A section holding an optional item list and optional subsections
pub trait ItemTree: Sized {
    type Item: Leveled;

    fn items(&self) -> Option<&Vec<Self::Item>>;
    fn items_mut(&mut self) -> Option<&mut Vec<Self::Item>>;
    fn subsections(&self) -> Option<&Vec<Self>>;
    fn subsections_mut(&mut self) -> Option<&mut Vec<Self>>;
}

impl ItemTree for Section {
    type Item = Item;

    fn items(&self) -> Option<&Vec<Item>> {
        self.items.as_ref()
    }

    fn items_mut(&mut self) -> Option<&mut Vec<Item>> {
        self.items.as_mut()
    }

    fn subsections(&self) -> Option<&Vec<Section>> {
        self.sections.as_ref()
    }

    fn subsections_mut(&mut self) -> Option<&mut Vec<Section>> {
        self.sections.as_mut()
    }
}

/// Where a new item goes relative to the reference item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Before,
    After,
    /// Same slot as `After`; the caller sets the deeper level
    Child,
}

impl std::str::FromStr for Position {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "before" => Ok(Position::Before),
            "after" => Ok(Position::After),
            "child" => Ok(Position::Child),
            _ => Err(format!("Invalid position: {}", s)),
        }
    }
}

/// Section indices from the top, plus the item index in the last one
struct ItemPath {
    sections: Vec<usize>,
    item: usize,
}

/// Depth-first, pre-order search: a section's own items are searched before
/// its subsections.
fn locate<S, F>(sections: &[S], predicate: &mut F, trail: &mut Vec<usize>) -> Option<usize>
where
    S: ItemTree,
    F: FnMut(&S::Item) -> bool,
{
    for (index, section) in sections.iter().enumerate() {
        trail.push(index);
        if let Some(found) = section.items().and_then(|items| items.iter().position(|item| predicate(item))) {
            return Some(found);
        }
        if let Some(subsections) = section.subsections() {
            if let Some(found) = locate(subsections, predicate, trail) {
                return Some(found);
            }
        }
        trail.pop();
    }
    None
}

fn find_path<S, F>(sections: &[S], mut predicate: F) -> Option<ItemPath>
where
    S: ItemTree,
    F: FnMut(&S::Item) -> bool,
{
    let mut trail = Vec::new();
    let item = locate(sections, &mut predicate, &mut trail)?;
    Some(ItemPath {
        sections: trail,
        item,
    })
}

fn items_at_mut<'a, S: ItemTree>(sections: &'a mut [S], path: &[usize]) -> Option<&'a mut Vec<S::Item>> {
    let (first, rest) = path.split_first()?;
    let mut section = sections.get_mut(*first)?;
    for &index in rest {
        section = section.subsections_mut()?.get_mut(index)?;
    }
    section.items_mut()
}

/// Index right past `reference_index` and the run of deeper items after it
pub fn find_index_after_descendants<I: Leveled>(items: &[I], reference_index: usize) -> usize {
    let Some(reference) = items.get(reference_index) else {
        return items.len();
    };
    let level = reference.level();
    items[reference_index + 1..]
        .iter()
        .position(|item| item.level() <= level)
        .map(|offset| reference_index + 1 + offset)
        .unwrap_or(items.len())
}

/// First item matching `predicate`, searching sections depth-first
pub fn find_item<S, F>(sections: &[S], predicate: F) -> Option<&S::Item>
where
    S: ItemTree,
    F: FnMut(&S::Item) -> bool,
{
    let path = find_path(sections, predicate)?;
    let mut section = sections.get(*path.sections.first()?)?;
    for &index in &path.sections[1..] {
        section = section.subsections()?.get(index)?;
    }
    section.items()?.get(path.item)
}

/// Insert `item` relative to the first item matching `find_reference`.
///
/// Returns `false` and leaves the tree untouched when nothing matches.
pub fn insert_item<S, F>(sections: &mut [S], item: S::Item, find_reference: F, position: Position) -> bool
where
    S: ItemTree,
    F: FnMut(&S::Item) -> bool,
{
    insert_item_with(sections, item, find_reference, position, |item| item)
}

/// Like [`insert_item`], converting the new item into the stored type first
pub fn insert_item_with<S, T, F, C>(
    sections: &mut [S],
    item: T,
    find_reference: F,
    position: Position,
    convert: C,
) -> bool
where
    S: ItemTree,
    F: FnMut(&S::Item) -> bool,
    C: FnOnce(T) -> S::Item,
{
    let Some(path) = find_path(sections, find_reference) else {
        log::debug!(target: LOG_TARGET, "insert: reference item not found");
        return false;
    };
    let Some(items) = items_at_mut(sections, &path.sections) else {
        return false;
    };

    let index = match position {
        Position::Before => path.item,
        Position::After | Position::Child => find_index_after_descendants(items, path.item),
    };
    items.insert(index, convert(item));
    log::debug!(target: LOG_TARGET, "insert: {:?} at index {}", position, index);
    true
}

/// Replace the first matching item with `update(old)`
pub fn update_item<S, F, U>(sections: &mut [S], predicate: F, update: U) -> bool
where
    S: ItemTree,
    F: FnMut(&S::Item) -> bool,
    U: FnOnce(&S::Item) -> S::Item,
{
    let Some(path) = find_path(sections, predicate) else {
        log::debug!(target: LOG_TARGET, "update: item not found");
        return false;
    };
    let Some(slot) = items_at_mut(sections, &path.sections).and_then(|items| items.get_mut(path.item)) else {
        return false;
    };
    *slot = update(&*slot);
    true
}

/// Remove the first matching item. Its deeper followers stay in place.
pub fn delete_item<S, F>(sections: &mut [S], predicate: F) -> bool
where
    S: ItemTree,
    F: FnMut(&S::Item) -> bool,
{
    remove_item(sections, predicate).is_some()
}

/// Remove and return the first matching item
pub fn remove_item<S, F>(sections: &mut [S], predicate: F) -> Option<S::Item>
where
    S: ItemTree,
    F: FnMut(&S::Item) -> bool,
{
    let path = find_path(sections, predicate)?;
    let items = items_at_mut(sections, &path.sections)?;
    (path.item < items.len()).then(|| items.remove(path.item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(section: &Section) -> Vec<&str> {
        section.own_items().iter().map(|item| item.id.as_str()).collect()
    }

    fn sample() -> Vec<Section> {
        vec![
            Section::new("assets").with_items(vec![
                Item::new("a", "Current assets", 1),
                Item::new("a1", "Cash", 2),
                Item::new("a2", "Receivables", 2),
                Item::new("b", "Fixed assets", 1),
            ]),
            Section::new("claims").with_sections(vec![
                Section::new("liabilities").with_items(vec![Item::new("l", "Loans", 1)]),
                Section::new("equity").with_items(vec![
                    Item::new("e", "Capital", 1),
                    Item::new("e1", "Paid-in", 2),
                ]),
            ]),
        ]
    }

    #[test]
    fn test_index_after_descendants() {
        let items = sample().remove(0).items.unwrap();
        assert_eq!(find_index_after_descendants(&items, 0), 3);
        assert_eq!(find_index_after_descendants(&items, 1), 2);
        assert_eq!(find_index_after_descendants(&items, 3), 4);
        assert_eq!(find_index_after_descendants(&items, 9), 4);
    }

    #[test]
    fn test_insert_after_skips_descendants() {
        let mut sections = sample();
        let inserted = insert_item(&mut sections, Item::new("x", "Prepaid", 1), |item| item.id == "a", Position::After);

        assert!(inserted);
        assert_eq!(ids(&sections[0]), vec!["a", "a1", "a2", "x", "b"]);
    }

    #[test]
    fn test_insert_child_lands_after_existing_children() {
        let mut sections = sample();
        insert_item(&mut sections, Item::new("a3", "Inventory", 2), |item| item.id == "a", Position::Child);

        assert_eq!(ids(&sections[0]), vec!["a", "a1", "a2", "a3", "b"]);
    }

    #[test]
    fn test_insert_before() {
        let mut sections = sample();
        insert_item(&mut sections, Item::new("x", "Goodwill", 1), |item| item.id == "b", Position::Before);

        assert_eq!(ids(&sections[0]), vec!["a", "a1", "a2", "x", "b"]);
    }

    #[test]
    fn test_insert_into_nested_section() {
        let mut sections = sample();
        insert_item(&mut sections, Item::new("e2", "Reserves", 2), |item| item.id == "e1", Position::After);

        let equity = &sections[1].subsections()[1];
        assert_eq!(ids(equity), vec!["e", "e1", "e2"]);
    }

    #[test]
    fn test_missing_reference_leaves_tree_unchanged() {
        let mut sections = sample();
        let before = sections.clone();

        assert!(!insert_item(&mut sections, Item::new("x", "X", 1), |item| item.id == "nope", Position::After));
        assert!(!update_item(&mut sections, |item| item.id == "nope", |item| item.clone()));
        assert!(!delete_item(&mut sections, |item| item.id == "nope"));
        assert_eq!(sections, before);
    }

    #[test]
    fn test_update_replaces_matched_item() {
        let mut sections = sample();
        let updated = update_item(&mut sections, |item| item.id == "l", |item| Item {
            text: format!("{} (long-term)", item.text),
            ..item.clone()
        });

        assert!(updated);
        let found = find_item(&sections, |item| item.id == "l").unwrap();
        assert_eq!(found.text, "Loans (long-term)");
    }

    #[test]
    fn test_delete_keeps_followers() {
        let mut sections = sample();
        assert!(delete_item(&mut sections, |item| item.id == "a"));
        assert_eq!(ids(&sections[0]), vec!["a1", "a2", "b"]);
    }

    #[test]
    fn test_delete_then_insert_restores_count() {
        let mut sections = sample();
        let total: usize = sections.iter().map(Section::item_count).sum();

        let removed = remove_item(&mut sections, |item| item.id == "a2").unwrap();
        insert_item(&mut sections, removed, |item| item.id == "a1", Position::After);

        assert_eq!(sections.iter().map(Section::item_count).sum::<usize>(), total);
        assert_eq!(ids(&sections[0]), vec!["a", "a1", "a2", "b"]);
    }

    #[test]
    fn test_find_searches_own_items_before_subsections() {
        let sections = vec![Section::new("outer")
            .with_items(vec![Item::new("dup", "outer", 1)])
            .with_sections(vec![Section::new("inner").with_items(vec![Item::new("dup", "inner", 1)])])];

        let found = find_item(&sections, |item| item.id == "dup").unwrap();
        assert_eq!(found.text, "outer");
    }

    #[test]
    fn test_insert_with_converts_item() {
        let mut sections = sample();
        let inserted = insert_item_with(
            &mut sections,
            ("z", "Deferred tax"),
            |item| item.id == "b",
            Position::After,
            |(id, text)| Item::new(id, text, 1),
        );

        assert!(inserted);
        assert_eq!(ids(&sections[0]), vec!["a", "a1", "a2", "b", "z"]);
    }
}
