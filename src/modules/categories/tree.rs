//! In-memory category forest for hierarchical UI traversal.

use std::collections::HashMap;
use std::collections::HashSet;

use serde::Serialize;

use catena_store::CategoryRecord;

/// One category with its attached children, `level` 0 at the roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub level: usize,
    pub children: Vec<CategoryNode>,
}

/// Set of root nodes assembled from a flat category collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryForest {
    pub roots: Vec<CategoryNode>,
}

impl CategoryForest {
    /// Assemble a forest from flat records (arena + index, two passes).
    ///
    /// A record whose parent is not present in the input set is promoted to
    /// a root rather than dropped; this keeps filtered subsets usable. A
    /// record that names itself as parent is promoted the same way, and a
    /// longer parent cycle is broken by promoting one of its members, so
    /// every input record stays reachable from the roots.
    pub fn build(records: Vec<CategoryRecord>) -> Self {
        let index: HashMap<&str, usize> = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.as_str(), i))
            .collect();

        let mut parents: Vec<Option<usize>> = Vec::with_capacity(records.len());
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
        let mut roots: Vec<usize> = Vec::new();

        for (i, record) in records.iter().enumerate() {
            let parent_idx = record
                .parent_id
                .as_deref()
                .and_then(|p| index.get(p).copied())
                .filter(|&p| p != i);
            parents.push(parent_idx);
            match parent_idx {
                Some(parent) => children[parent].push(i),
                None => roots.push(i),
            }
        }

        // Mark everything reachable from the roots; nodes trapped in a
        // parent cycle have no root above them and stay unmarked.
        let mut reached = vec![false; records.len()];
        Self::mark_reachable(&roots, &children, &mut reached);

        for i in 0..records.len() {
            if reached[i] {
                continue;
            }
            // Break the cycle: detach from the parent and promote to root.
            if let Some(parent) = parents[i] {
                children[parent].retain(|&child| child != i);
            }
            tracing::warn!(
                category = %records[i].id,
                "parent cycle detected, promoting to root"
            );
            roots.push(i);
            Self::mark_reachable(&[i], &children, &mut reached);
        }

        let roots = roots
            .into_iter()
            .map(|idx| Self::assemble(idx, 0, &records, &children))
            .collect();

        Self { roots }
    }

    fn mark_reachable(from: &[usize], children: &[Vec<usize>], reached: &mut [bool]) {
        let mut stack: Vec<usize> = from.to_vec();
        while let Some(idx) = stack.pop() {
            if !reached[idx] {
                reached[idx] = true;
                stack.extend(children[idx].iter().copied());
            }
        }
    }

    fn assemble(
        idx: usize,
        level: usize,
        records: &[CategoryRecord],
        children: &[Vec<usize>],
    ) -> CategoryNode {
        let record = &records[idx];
        CategoryNode {
            id: record.id.clone(),
            name: record.name.clone(),
            slug: record.slug.clone(),
            level,
            children: children[idx]
                .iter()
                .map(|&child| Self::assemble(child, level + 1, records, children))
                .collect(),
        }
    }

    /// Depth-first lookup by id.
    pub fn find(&self, id: &str) -> Option<&CategoryNode> {
        fn walk<'a>(node: &'a CategoryNode, id: &str) -> Option<&'a CategoryNode> {
            if node.id == id {
                return Some(node);
            }
            node.children.iter().find_map(|child| walk(child, id))
        }
        self.roots.iter().find_map(|root| walk(root, id))
    }

    /// Total number of nodes reachable from the roots.
    pub fn len(&self) -> usize {
        fn count(node: &CategoryNode) -> usize {
            1 + node.children.iter().map(count).sum::<usize>()
        }
        self.roots.iter().map(count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Cascading selection over a [`CategoryForest`].
///
/// Selecting a node selects its whole subtree; deselecting removes it.
/// Both operations are idempotent set updates.
#[derive(Debug, Default)]
pub struct TreeSelection {
    selected: HashSet<String>,
}

impl TreeSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `id` and every descendant. Unknown ids are ignored.
    pub fn select(&mut self, forest: &CategoryForest, id: &str) {
        if let Some(node) = forest.find(id) {
            Self::visit(node, &mut |n| {
                self.selected.insert(n.id.clone());
            });
        }
    }

    /// Deselect `id` and every descendant. Unknown ids are ignored.
    pub fn deselect(&mut self, forest: &CategoryForest, id: &str) {
        if let Some(node) = forest.find(id) {
            Self::visit(node, &mut |n| {
                self.selected.remove(&n.id);
            });
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn ids(&self) -> &HashSet<String> {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    fn visit(node: &CategoryNode, apply: &mut impl FnMut(&CategoryNode)) {
        apply(node);
        for child in &node.children {
            Self::visit(child, apply);
        }
    }
}
