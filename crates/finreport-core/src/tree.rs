//! Parent-referencing records to forests, and back.
//!
//! [`build_forest`] turns a flat collection where each record names its
//! parent by id into owned trees. The parent relation is kept only as an id
//! (on the node and in the forest's index), never as a pointer, so trees can
//! be moved, cloned and mutated freely.
//!
//! Records that cannot be attached are handled per [`OrphanPolicy`]:
//!
//! ```text
//! input:  A, B(A), C(ghost), D(C), E(F), F(E)
//! collect:        roots [A -> B], orphans [C], cycles [E, F]
//! attach_as_root: roots [A -> B, C -> D], cycles [E, F]
//! reject:         Err(OrphanRecord { id: C, parent_id: ghost })
//! ```

use std::collections::{HashMap, HashSet};

use finreport_config::OrphanPolicy;
use log::{debug, warn};
use serde::Serialize;

use crate::error::{CoreError, CoreResult};

/// A record with its ordered children.
///
/// Serializes as the record's own fields plus a `children` array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode<T> {
    /// Identity of the record
    #[serde(skip)]
    pub key: String,
    /// Identity of the parent record, if any
    #[serde(skip)]
    pub parent_key: Option<String>,
    #[serde(flatten)]
    pub data: T,
    pub children: Vec<TreeNode<T>>,
}

impl<T> TreeNode<T> {
    pub fn new(key: impl Into<String>, parent_key: Option<String>, data: T) -> Self {
        Self {
            key: key.into(),
            parent_key,
            data,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including self
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }

    /// Find a node by key in this subtree
    pub fn find(&self, key: &str) -> Option<&TreeNode<T>> {
        if self.key == key {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(key))
    }

    /// Find a node by key in this subtree, mutably
    pub fn find_mut(&mut self, key: &str) -> Option<&mut TreeNode<T>> {
        if self.key == key {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(key))
    }
}

/// Pre-order iterator over a forest, yielding each node with its depth
/// (roots are depth 0).
pub struct PreOrder<'a, T> {
    stack: Vec<(usize, std::slice::Iter<'a, TreeNode<T>>)>,
}

impl<'a, T> PreOrder<'a, T> {
    pub fn new(roots: &'a [TreeNode<T>]) -> Self {
        Self {
            stack: vec![(0, roots.iter())],
        }
    }
}

impl<'a, T> Iterator for PreOrder<'a, T> {
    type Item = (usize, &'a TreeNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (depth, iter) = self.stack.last_mut()?;
            let depth = *depth;
            match iter.next() {
                Some(node) => {
                    if !node.children.is_empty() {
                        self.stack.push((depth + 1, node.children.iter()));
                    }
                    return Some((depth, node));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Flatten a forest pre-order: each node before its children, children in
/// stored order.
pub fn flatten<T>(roots: &[TreeNode<T>]) -> Vec<&TreeNode<T>> {
    PreOrder::new(roots).map(|(_, node)| node).collect()
}

/// Consuming variant of [`flatten`] that yields the records themselves
pub fn into_flat_records<T>(roots: Vec<TreeNode<T>>) -> Vec<T> {
    fn push_all<T>(nodes: Vec<TreeNode<T>>, out: &mut Vec<T>) {
        for node in nodes {
            out.push(node.data);
            push_all(node.children, out);
        }
    }

    let mut out = Vec::new();
    push_all(roots, &mut out);
    out
}

/// Result of [`build_forest`]
#[derive(Debug, Clone)]
pub struct Forest<T> {
    pub roots: Vec<TreeNode<T>>,
    /// Records whose parent id matched nothing (collect policy only)
    pub orphans: Vec<String>,
    /// Records whose ancestor chain loops instead of reaching a root
    pub cycles: Vec<String>,
    parents: HashMap<String, String>,
}

impl<T> Forest<T> {
    /// Number of attached nodes
    pub fn len(&self) -> usize {
        self.roots.iter().map(TreeNode::size).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Whether every input record ended up in the forest
    pub fn is_complete(&self) -> bool {
        self.orphans.is_empty() && self.cycles.is_empty()
    }

    /// Parent key of an attached node
    pub fn parent_of(&self, key: &str) -> Option<&str> {
        self.parents.get(key).map(String::as_str)
    }

    /// Keys from the node up to its root, excluding the node itself
    pub fn ancestors_of(&self, key: &str) -> Vec<&str> {
        let mut out = Vec::new();
        let mut current = self.parent_of(key);
        while let Some(parent) = current {
            out.push(parent);
            current = self.parent_of(parent);
        }
        out
    }

    pub fn find(&self, key: &str) -> Option<&TreeNode<T>> {
        self.roots.iter().find_map(|root| root.find(key))
    }

    pub fn iter(&self) -> PreOrder<'_, T> {
        PreOrder::new(&self.roots)
    }

    pub fn flatten(&self) -> Vec<&TreeNode<T>> {
        flatten(&self.roots)
    }

    pub fn into_roots(self) -> Vec<TreeNode<T>> {
        self.roots
    }
}

struct Slot<T> {
    key: String,
    parent: Option<String>,
    data: Option<T>,
}

/// Build a forest from flat records.
///
/// Roots and children keep input order. A duplicate id replaces the earlier
/// record in the earlier record's position.
pub fn build_forest<T, K, P>(
    records: impl IntoIterator<Item = T>,
    key_of: K,
    parent_of: P,
    policy: OrphanPolicy,
) -> CoreResult<Forest<T>>
where
    K: Fn(&T) -> String,
    P: Fn(&T) -> Option<String>,
{
    let mut slots: Vec<Slot<T>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let key = key_of(&record);
        let parent = parent_of(&record).filter(|p| !p.is_empty());
        match index.get(&key) {
            Some(&existing) => {
                if policy == OrphanPolicy::Reject {
                    return Err(CoreError::DuplicateRecord { id: key });
                }
                warn!(target: "finreport::tree", "duplicate record id {}, keeping the later record", key);
                slots[existing].parent = parent;
                slots[existing].data = Some(record);
            }
            None => {
                index.insert(key.clone(), slots.len());
                slots.push(Slot {
                    key,
                    parent,
                    data: Some(record),
                });
            }
        }
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); slots.len()];
    let mut root_slots = Vec::new();
    let mut orphans = Vec::new();

    for (i, slot) in slots.iter().enumerate() {
        let Some(parent) = slot.parent.as_deref() else {
            root_slots.push(i);
            continue;
        };
        match index.get(parent) {
            Some(&p) => children[p].push(i),
            None => match policy {
                OrphanPolicy::Collect => {
                    warn!(target: "finreport::tree", "record {} references missing parent {}", slot.key, parent);
                    orphans.push(slot.key.clone());
                }
                OrphanPolicy::AttachAsRoot => {
                    debug!(target: "finreport::tree", "promoting orphan {} to root", slot.key);
                    root_slots.push(i);
                }
                OrphanPolicy::Reject => {
                    return Err(CoreError::OrphanRecord {
                        id: slot.key.clone(),
                        parent_id: parent.to_string(),
                    });
                }
            },
        }
    }

    let mut parents = HashMap::new();
    let mut roots = Vec::with_capacity(root_slots.len());
    for i in root_slots {
        if let Some(node) = assemble(i, &mut slots, &children, &mut parents) {
            roots.push(node);
        }
    }

    let orphan_set: HashSet<&str> = orphans.iter().map(String::as_str).collect();
    let cycles: Vec<String> = slots
        .iter()
        .filter(|slot| slot.data.is_some())
        .filter(|slot| !hangs_off_orphan(slot, &slots, &index, &orphan_set))
        .map(|slot| slot.key.clone())
        .collect();

    if !cycles.is_empty() {
        if policy == OrphanPolicy::Reject {
            return Err(CoreError::CyclicHierarchy { ids: cycles });
        }
        warn!(target: "finreport::tree", "{} records sit on cyclic parent chains", cycles.len());
    }

    let forest = Forest {
        roots,
        orphans,
        cycles,
        parents,
    };
    debug!(
        target: "finreport::tree",
        "built forest: {} roots, {} nodes from {} records",
        forest.roots.len(),
        forest.len(),
        slots.len()
    );
    Ok(forest)
}

fn assemble<T>(
    i: usize,
    slots: &mut [Slot<T>],
    children: &[Vec<usize>],
    parents: &mut HashMap<String, String>,
) -> Option<TreeNode<T>> {
    let data = slots[i].data.take()?;
    let mut node = TreeNode::new(slots[i].key.clone(), slots[i].parent.clone(), data);
    if let Some(parent) = &node.parent_key {
        parents.insert(node.key.clone(), parent.clone());
    }
    for &child in &children[i] {
        if let Some(child_node) = assemble(child, slots, children, parents) {
            node.children.push(child_node);
        }
    }
    Some(node)
}

/// Whether the slot's ancestor chain ends at a collected orphan
fn hangs_off_orphan<T>(
    slot: &Slot<T>,
    slots: &[Slot<T>],
    index: &HashMap<String, usize>,
    orphans: &HashSet<&str>,
) -> bool {
    let mut seen = HashSet::new();
    let mut current = slot;
    loop {
        if orphans.contains(current.key.as_str()) {
            return true;
        }
        if !seen.insert(current.key.as_str()) {
            return false;
        }
        match current.parent.as_deref().and_then(|p| index.get(p)) {
            Some(&p) => current = &slots[p],
            None => return false,
        }
    }
}
