//! Adjacency-list helpers for self-referential rows (categories, comments).
//!
//! Rows only carry a parent id; nothing holds pointers to other rows. Trees
//! are rebuilt on demand from `(id, parent_id)` pairs.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::Serialize;

use crate::types::DbId;

/// Parent -> children index over a flat list of `(id, parent_id)` pairs.
#[derive(Debug, Default, Clone)]
pub struct Adjacency {
    children: HashMap<DbId, Vec<DbId>>,
}

impl Adjacency {
    pub fn from_edges(edges: impl IntoIterator<Item = (DbId, Option<DbId>)>) -> Self {
        let mut children: HashMap<DbId, Vec<DbId>> = HashMap::new();
        for (id, parent) in edges {
            if let Some(parent) = parent {
                children.entry(parent).or_default().push(id);
            }
        }
        Self { children }
    }

    /// Direct children of `id`.
    pub fn children_of(&self, id: DbId) -> &[DbId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every node below `id`, breadth-first. Terminates on cyclic data.
    pub fn descendants(&self, id: DbId) -> Vec<DbId> {
        let mut seen = HashSet::from([id]);
        let mut out = Vec::new();
        let mut queue = VecDeque::from([id]);

        while let Some(current) = queue.pop_front() {
            for &child in self.children_of(current) {
                if seen.insert(child) {
                    out.push(child);
                    queue.push_back(child);
                }
            }
        }
        out
    }

    /// Whether `candidate` sits somewhere below `ancestor`.
    pub fn is_descendant(&self, ancestor: DbId, candidate: DbId) -> bool {
        self.descendants(ancestor).contains(&candidate)
    }
}

/// A row together with its nested children.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode<T> {
    #[serde(flatten)]
    pub item: T,
    pub children: Vec<TreeNode<T>>,
}

/// Nest a flat list of rows.
///
/// Rows whose parent is absent from `items` become roots. Input order is
/// kept among siblings.
pub fn build_nested<T>(
    items: Vec<T>,
    link: impl Fn(&T) -> (DbId, Option<DbId>),
) -> Vec<TreeNode<T>> {
    let links: Vec<(DbId, Option<DbId>)> = items.iter().map(&link).collect();
    let known: HashSet<DbId> = links.iter().map(|(id, _)| *id).collect();

    let mut by_id: HashMap<DbId, T> = HashMap::with_capacity(items.len());
    let mut children: HashMap<DbId, Vec<DbId>> = HashMap::new();
    let mut roots = Vec::new();

    for ((id, parent), item) in links.into_iter().zip(items) {
        by_id.insert(id, item);
        match parent.filter(|p| *p != id && known.contains(p)) {
            Some(parent) => children.entry(parent).or_default().push(id),
            None => roots.push(id),
        }
    }

    roots
        .into_iter()
        .filter_map(|id| take_subtree(id, &mut by_id, &children))
        .collect()
}

fn take_subtree<T>(
    id: DbId,
    by_id: &mut HashMap<DbId, T>,
    children: &HashMap<DbId, Vec<DbId>>,
) -> Option<TreeNode<T>> {
    // Removing the row first means a cycle can never be walked twice.
    let item = by_id.remove(&id)?;
    let nested: Vec<TreeNode<T>> = children
        .get(&id)
        .map(|ids| {
            ids.iter()
                .filter_map(|child| take_subtree(*child, by_id, children))
                .collect()
        })
        .unwrap_or_default();
    Some(TreeNode {
        item,
        children: nested,
    })
}
