// Copyright 2025 the Widgetstore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! R-tree backend generic over scalar `T: Scalar` with SAH-like split.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::types::{Aabb2D, Scalar, area};

/// R-tree backend using SAH-like splits and widened accumulator metrics.
///
/// Nodes live in an arena and refer to each other by index. Removal prunes empty
/// nodes from their parents (their arena slots are reused) but does not condense
/// underfull ones; the arena is reset whenever the tree becomes empty.
pub struct RTree<T: Scalar> {
    max_children: usize,
    min_children: usize,
    root: Option<NodeIdx>,
    arena: Vec<Node<T>>,
    free_nodes: Vec<NodeIdx>,
    slots: Vec<Option<Aabb2D<T>>>,
}

#[derive(Clone)]
struct Node<T: Scalar> {
    bbox: Aabb2D<T>,
    leaf: bool,
    children: Vec<Child<T>>,
}

#[derive(Copy, Clone)]
enum Child<T: Scalar> {
    Node(NodeIdx),
    Item { slot: usize, bbox: Aabb2D<T> },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct NodeIdx(usize);

impl<T: Scalar> Default for RTree<T> {
    fn default() -> Self {
        Self::with_fanout(8, 4)
    }
}

impl<T: Scalar> RTree<T> {
    /// Create an empty tree with the given node fanout.
    ///
    /// `min_children` is clamped to `1..=max_children / 2` so a split can always
    /// satisfy both halves.
    pub fn with_fanout(max_children: usize, min_children: usize) -> Self {
        let max_children = max_children.max(2);
        Self {
            max_children,
            min_children: min_children.clamp(1, max_children / 2),
            root: None,
            arena: Vec::new(),
            free_nodes: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// Depth of the tree (0 when empty, 1 for a single leaf).
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cur = self.root;
        while let Some(idx) = cur {
            depth += 1;
            let node = &self.arena[idx.0];
            cur = if node.leaf {
                None
            } else {
                node.children.iter().find_map(|c| match c {
                    Child::Node(i) => Some(*i),
                    Child::Item { .. } => None,
                })
            };
        }
        depth
    }

    fn child_bbox(&self, child: &Child<T>) -> Aabb2D<T> {
        match child {
            Child::Node(i) => self.arena[i.0].bbox,
            Child::Item { bbox, .. } => *bbox,
        }
    }

    fn children_bbox(&self, children: &[Child<T>]) -> Option<Aabb2D<T>> {
        children
            .iter()
            .map(|c| self.child_bbox(c))
            .reduce(|acc, b| acc.union(&b))
    }

    fn push_node(&mut self, node: Node<T>) -> NodeIdx {
        if let Some(idx) = self.free_nodes.pop() {
            self.arena[idx.0] = node;
            return idx;
        }
        self.arena.push(node);
        NodeIdx(self.arena.len() - 1)
    }

    /// Index of the child whose box grows least when extended by `bbox`.
    fn choose_child(&self, node: NodeIdx, bbox: &Aabb2D<T>) -> Option<usize> {
        let mut best: Option<(usize, T::Acc)> = None;
        for (i, c) in self.arena[node.0].children.iter().enumerate() {
            let cb = self.child_bbox(c);
            let cost = area(&cb.union(bbox)) - area(&cb);
            if best.is_none_or(|(_, bc)| cost < bc) {
                best = Some((i, cost));
            }
        }
        best.map(|(i, _)| i)
    }

    /// SAH-like split: sort along each axis and choose the `k` minimizing
    /// `area(first k) * k + area(rest) * (n - k)`.
    fn split(&self, children: Vec<Child<T>>) -> (Vec<Child<T>>, Vec<Child<T>>) {
        let n = children.len();
        let lo = self.min_children.min(n / 2).max(1);
        let hi = n - lo;
        let mut best: Option<(T::Acc, Vec<Child<T>>, usize)> = None;

        for axis in 0..2 {
            let centroid = |c: &Child<T>| {
                let b = self.child_bbox(c);
                if axis == 0 {
                    T::mid(b.min_x, b.max_x)
                } else {
                    T::mid(b.min_y, b.max_y)
                }
            };
            let mut sorted = children.clone();
            sorted.sort_by(|a, b| {
                centroid(a)
                    .partial_cmp(&centroid(b))
                    .unwrap_or(Ordering::Equal)
            });

            let boxes: Vec<_> = sorted.iter().map(|c| self.child_bbox(c)).collect();
            let prefix: Vec<_> = boxes
                .iter()
                .scan(None, |acc: &mut Option<Aabb2D<T>>, b| {
                    let next = acc.map_or(*b, |a| a.union(b));
                    *acc = Some(next);
                    Some(next)
                })
                .collect();
            let mut suffix: Vec<_> = boxes
                .iter()
                .rev()
                .scan(None, |acc: &mut Option<Aabb2D<T>>, b| {
                    let next = acc.map_or(*b, |a| a.union(b));
                    *acc = Some(next);
                    Some(next)
                })
                .collect();
            suffix.reverse();

            for k in lo..=hi {
                let cost = area(&prefix[k - 1]) * T::acc_from_usize(k)
                    + area(&suffix[k]) * T::acc_from_usize(n - k);
                if best.as_ref().is_none_or(|(bc, _, _)| cost < *bc) {
                    best = Some((cost, sorted.clone(), k));
                }
            }
        }

        match best {
            Some((_, mut sorted, k)) => {
                let right = sorted.split_off(k);
                (sorted, right)
            }
            None => {
                let mut left = children;
                let right = left.split_off(n / 2);
                (left, right)
            }
        }
    }

    /// Insert below `node`; returns a new sibling when `node` had to split.
    fn insert_at(&mut self, node: NodeIdx, slot: usize, bbox: Aabb2D<T>) -> Option<NodeIdx> {
        let grown = self.arena[node.0].bbox.union(&bbox);
        self.arena[node.0].bbox = grown;

        if self.arena[node.0].leaf {
            self.arena[node.0]
                .children
                .push(Child::Item { slot, bbox });
        } else {
            let pick = self.choose_child(node, &bbox)?;
            let Child::Node(target) = self.arena[node.0].children[pick] else {
                return None;
            };
            if let Some(sibling) = self.insert_at(target, slot, bbox) {
                self.arena[node.0]
                    .children
                    .insert(pick + 1, Child::Node(sibling));
            }
        }

        if self.arena[node.0].children.len() <= self.max_children {
            return None;
        }
        let children = core::mem::take(&mut self.arena[node.0].children);
        let (left, right) = self.split(children);
        let leaf = self.arena[node.0].leaf;
        let left_bb = self.children_bbox(&left)?;
        let right_bb = self.children_bbox(&right)?;
        self.arena[node.0].children = left;
        self.arena[node.0].bbox = left_bb;
        Some(self.push_node(Node {
            bbox: right_bb,
            leaf,
            children: right,
        }))
    }

    /// Remove `slot` below `node`. Returns true if found.
    fn remove_at(&mut self, node: NodeIdx, slot: usize, old: &Aabb2D<T>) -> bool {
        if !self.arena[node.0].bbox.overlaps(old) {
            return false;
        }
        let found = if self.arena[node.0].leaf {
            let before = self.arena[node.0].children.len();
            self.arena[node.0]
                .children
                .retain(|c| !matches!(c, Child::Item { slot: s, .. } if *s == slot));
            self.arena[node.0].children.len() != before
        } else {
            let subtrees: Vec<NodeIdx> = self.arena[node.0]
                .children
                .iter()
                .filter_map(|c| match c {
                    Child::Node(i) => Some(*i),
                    Child::Item { .. } => None,
                })
                .collect();
            let found = subtrees.into_iter().any(|i| self.remove_at(i, slot, old));
            if found {
                let children = core::mem::take(&mut self.arena[node.0].children);
                let mut pruned = Vec::new();
                let kept: Vec<_> = children
                    .into_iter()
                    .filter(|c| match c {
                        Child::Node(i) if self.arena[i.0].children.is_empty() => {
                            pruned.push(*i);
                            false
                        }
                        _ => true,
                    })
                    .collect();
                self.arena[node.0].children = kept;
                self.free_nodes.extend(pruned);
            }
            found
        };
        if found && let Some(bb) = self.children_bbox(&self.arena[node.0].children) {
            self.arena[node.0].bbox = bb;
        }
        found
    }

    fn collapse_if_empty(&mut self) {
        if let Some(root) = self.root
            && self.arena[root.0].children.is_empty()
        {
            self.root = None;
            self.arena.clear();
            self.free_nodes.clear();
        }
    }
}

impl<T: Scalar> Backend<T> for RTree<T> {
    fn insert(&mut self, slot: usize, aabb: Aabb2D<T>) {
        if self.slots.len() <= slot {
            self.slots.resize_with(slot + 1, || None);
        }
        self.slots[slot] = Some(aabb);

        let Some(root) = self.root else {
            let idx = self.push_node(Node {
                bbox: aabb,
                leaf: true,
                children: vec![Child::Item { slot, bbox: aabb }],
            });
            self.root = Some(idx);
            return;
        };
        if let Some(sibling) = self.insert_at(root, slot, aabb) {
            let bbox = self.arena[root.0].bbox.union(&self.arena[sibling.0].bbox);
            let new_root = self.push_node(Node {
                bbox,
                leaf: false,
                children: vec![Child::Node(root), Child::Node(sibling)],
            });
            self.root = Some(new_root);
        }
    }

    fn update(&mut self, slot: usize, aabb: Aabb2D<T>) {
        self.remove(slot);
        self.insert(slot, aabb);
    }

    fn remove(&mut self, slot: usize) {
        let Some(old) = self.slots.get_mut(slot).and_then(Option::take) else {
            return;
        };
        if let Some(root) = self.root {
            self.remove_at(root, slot, &old);
            self.collapse_if_empty();
        }
    }

    fn clear(&mut self) {
        self.root = None;
        self.arena.clear();
        self.free_nodes.clear();
        self.slots.clear();
    }

    fn query_rect<'a>(&'a self, rect: Aabb2D<T>) -> Box<dyn Iterator<Item = usize> + 'a> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeIdx> = self.root.into_iter().collect();
        while let Some(i) = stack.pop() {
            let node = &self.arena[i.0];
            if !node.bbox.overlaps(&rect) {
                continue;
            }
            for c in &node.children {
                match c {
                    Child::Node(ci) => stack.push(*ci),
                    Child::Item { slot, bbox } if bbox.overlaps(&rect) => out.push(*slot),
                    Child::Item { .. } => {}
                }
            }
        }
        Box::new(out.into_iter())
    }

    fn visit_contained(&self, region: &Aabb2D<T>, visit: &mut dyn FnMut(usize)) {
        let mut stack: Vec<NodeIdx> = self.root.into_iter().collect();
        while let Some(i) = stack.pop() {
            let node = &self.arena[i.0];
            // Overlap only prunes; membership is decided by the containment test.
            if !node.bbox.overlaps(region) {
                continue;
            }
            for c in &node.children {
                match c {
                    Child::Node(ci) => stack.push(*ci),
                    Child::Item { slot, bbox } if region.contains(bbox) => visit(*slot),
                    Child::Item { .. } => {}
                }
            }
        }
    }
}

impl<T: Scalar> Debug for RTree<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let alive = self.slots.iter().filter(|e| e.is_some()).count();
        f.debug_struct("RTree")
            .field("max_children", &self.max_children)
            .field("min_children", &self.min_children)
            .field("arena_nodes", &(self.arena.len() - self.free_nodes.len()))
            .field("alive", &alive)
            .field("depth", &self.depth())
            .finish_non_exhaustive()
    }
}

/// R-tree with i64 coordinates and i128 metrics.
pub type RTreeI64 = RTree<i64>;

/// R-tree with f64 coordinates and f64 metrics.
pub type RTreeF64 = RTree<f64>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::flatvec::FlatVec;

    fn contained<B: Backend<i64>>(b: &B, region: Aabb2D<i64>) -> Vec<usize> {
        let mut out = Vec::new();
        b.visit_contained(&region, &mut |s| out.push(s));
        out.sort_unstable();
        out
    }

    fn grid(n: i64) -> Vec<Aabb2D<i64>> {
        let mut out = Vec::new();
        for y in 0..n {
            for x in 0..n {
                out.push(Aabb2D::<i64>::from_xywh(x * 10, y * 10, 8 + (x % 3) * 5, 8 + (y % 2) * 7));
            }
        }
        out
    }

    #[test]
    fn containment_matches_linear_scan() {
        let mut tree = RTreeI64::default();
        let mut flat: FlatVec<i64> = FlatVec::default();
        for (slot, r) in grid(20).into_iter().enumerate() {
            tree.insert(slot, r);
            flat.insert(slot, r);
        }
        assert!(tree.depth() > 1, "400 boxes must not fit in one leaf");
        for region in [
            Aabb2D::new(0, 0, 200, 200),
            Aabb2D::new(35, 35, 95, 120),
            Aabb2D::new(-10, -10, 9, 9),
            Aabb2D::new(500, 500, 600, 600),
        ] {
            assert_eq!(contained(&tree, region), contained(&flat, region));
        }
    }

    #[test]
    fn removal_until_empty_resets_the_tree() {
        let mut tree = RTreeI64::default();
        let rects = grid(6);
        for (slot, r) in rects.iter().enumerate() {
            tree.insert(slot, *r);
        }
        for slot in 0..rects.len() {
            tree.remove(slot);
        }
        assert_eq!(tree.depth(), 0);
        assert!(tree.arena.is_empty());

        // The tree must accept inserts again after being emptied.
        tree.insert(7, Aabb2D::new(0, 0, 5, 5));
        assert_eq!(contained(&tree, Aabb2D::new(0, 0, 5, 5)), vec![7]);
    }

    #[test]
    fn partial_removal_keeps_remaining_items_reachable() {
        let mut tree = RTreeI64::with_fanout(4, 2);
        let rects = grid(8);
        for (slot, r) in rects.iter().enumerate() {
            tree.insert(slot, *r);
        }
        for slot in (0..rects.len()).filter(|s| s % 3 == 0) {
            tree.remove(slot);
        }
        let all = contained(&tree, Aabb2D::new(-1000, -1000, 1000, 1000));
        let expected: Vec<_> = (0..rects.len()).filter(|s| s % 3 != 0).collect();
        assert_eq!(all, expected);
    }

    #[test]
    fn churn_reuses_pruned_nodes() {
        let mut tree = RTreeI64::with_fanout(4, 2);
        let rects = grid(8);
        for (slot, r) in rects.iter().enumerate() {
            tree.insert(slot, *r);
        }
        let mut peak = 0;
        for round in 0..20_i64 {
            for (slot, r) in rects.iter().enumerate() {
                let dx = round * 1000;
                let moved = Aabb2D::new(r.min_x + dx, r.min_y, r.max_x + dx, r.max_y);
                tree.update(slot, moved);
            }
            peak = peak.max(tree.arena.len());
        }
        assert!(peak < rects.len() * 8, "arena grew to {peak} nodes");
        let last_round = Aabb2D::new(19_000, -10, 20_000, 100);
        assert_eq!(contained(&tree, last_round).len(), rects.len());
    }

    #[test]
    fn update_moves_item() {
        let mut tree = RTreeI64::default();
        tree.insert(0, Aabb2D::new(0, 0, 10, 10));
        tree.insert(1, Aabb2D::new(12, 0, 22, 10));
        tree.update(0, Aabb2D::new(100, 100, 110, 110));

        assert!(contained(&tree, Aabb2D::new(0, 0, 11, 11)).is_empty());
        assert_eq!(contained(&tree, Aabb2D::new(90, 90, 120, 120)), vec![0]);
        let overlapping: Vec<_> = tree.query_rect(Aabb2D::new(15, 5, 16, 6)).collect();
        assert_eq!(overlapping, vec![1]);
    }

    #[test]
    fn f64_tree_answers_containment() {
        let mut tree = RTreeF64::default();
        for i in 0_u32..30 {
            let x = f64::from(i) * 3.5;
            tree.insert(i as usize, Aabb2D::<f64>::from_xywh(x, 0.0, 3.0, 3.0));
        }
        let mut hits = Vec::new();
        tree.visit_contained(&Aabb2D::new(0.0, 0.0, 10.5, 3.0), &mut |s| hits.push(s));
        hits.sort_unstable();
        assert_eq!(hits, vec![0, 1, 2]);
    }
}
