// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.
//!
//! Besides the [`Children`] and [`Ancestors`] iterators there is a single
//! predicate-driven walk, [`ElementTree::visit`], which every search in the
//! crate (name lookup, kind lookup, focus lookup, `for_each`) is built on.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use super::id::{ElementId, INVALID};
use super::store::ElementTree;

/// An iterator over the direct children of an element.
///
/// Created by [`ElementTree::children`].
#[derive(Debug)]
pub struct Children<'a> {
    tree: &'a ElementTree,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(tree: &'a ElementTree, first: u32) -> Self {
        Self {
            tree,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.tree.next_sibling[idx as usize];
        Some(self.tree.id_at(idx))
    }
}

/// An iterator over the ancestors of an element, nearest first.
///
/// Created by [`ElementTree::ancestors`].
#[derive(Debug)]
pub struct Ancestors<'a> {
    tree: &'a ElementTree,
    current: u32,
}

impl<'a> Ancestors<'a> {
    pub(crate) fn new(tree: &'a ElementTree, first: u32) -> Self {
        Self {
            tree,
            current: first,
        }
    }
}

impl Iterator for Ancestors<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.tree.parent[idx as usize];
        Some(self.tree.id_at(idx))
    }
}

/// Visiting order for [`ElementTree::visit`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Order {
    /// Pre-order, children in document order.
    #[default]
    DepthFirst,
    /// Level by level, children in document order.
    BreadthFirst,
}

/// What a [`visit`](ElementTree::visit) callback wants next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visit {
    /// Keep going, including this element's children.
    Continue,
    /// Keep going, but not below this element.
    SkipChildren,
    /// End the walk, returning this element.
    Stop,
}

impl ElementTree {
    /// Walks the subtree rooted at `root` (inclusive) in `order`, calling `f`
    /// for each element.
    ///
    /// Returns the element at which `f` returned [`Visit::Stop`], if any.
    pub fn visit(
        &self,
        root: ElementId,
        order: Order,
        mut f: impl FnMut(&Self, ElementId) -> Visit,
    ) -> Option<ElementId> {
        self.validate(root);
        match order {
            Order::DepthFirst => {
                let mut stack = Vec::from([root.idx]);
                while let Some(idx) = stack.pop() {
                    let id = self.id_at(idx);
                    match f(self, id) {
                        Visit::Stop => return Some(id),
                        Visit::SkipChildren => {}
                        Visit::Continue => {
                            let first = stack.len();
                            stack.extend(Children::new(self, self.first_child[idx as usize]).map(|c| c.idx));
                            stack[first..].reverse();
                        }
                    }
                }
            }
            Order::BreadthFirst => {
                let mut queue = VecDeque::from([root.idx]);
                while let Some(idx) = queue.pop_front() {
                    let id = self.id_at(idx);
                    match f(self, id) {
                        Visit::Stop => return Some(id),
                        Visit::SkipChildren => {}
                        Visit::Continue => {
                            queue.extend(Children::new(self, self.first_child[idx as usize]).map(|c| c.idx));
                        }
                    }
                }
            }
        }
        None
    }

    /// Returns the first element of `root`'s subtree matching `pred`.
    pub fn search(
        &self,
        root: ElementId,
        order: Order,
        mut pred: impl FnMut(&Self, ElementId) -> bool,
    ) -> Option<ElementId> {
        self.visit(root, order, |tree, id| {
            if pred(tree, id) {
                Visit::Stop
            } else {
                Visit::Continue
            }
        })
    }

    /// Calls `f` for every element of `root`'s subtree, depth-first.
    pub fn for_each(&self, root: ElementId, mut f: impl FnMut(&Self, ElementId)) {
        self.visit(root, Order::DepthFirst, |tree, id| {
            f(tree, id);
            Visit::Continue
        });
    }

    /// Returns the first element of `root`'s subtree whose kind has the
    /// given [diagnostic name](super::ElementKind::name).
    #[must_use]
    pub fn find_kind(&self, root: ElementId, kind_name: &str) -> Option<ElementId> {
        self.search(root, Order::BreadthFirst, |tree, id| {
            tree.kind(id).name() == kind_name
        })
    }

    /// Returns the element of `root`'s subtree that holds focus, if any.
    #[must_use]
    pub fn find_focused(&self, root: ElementId) -> Option<ElementId> {
        let focused = self.focused()?;
        self.is_ancestor_or_self(root, focused).then_some(focused)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::element::ElementKind;
    use crate::element::field;

    /// ```text
    ///        r
    ///      /   \
    ///     a     d
    ///    / \
    ///   b   c
    /// ```
    fn sample() -> (ElementTree, [ElementId; 5]) {
        let mut tree = ElementTree::new();
        let ids = core::array::from_fn(|_| tree.create_element(ElementKind::overlay()));
        let [r, a, b, c, d] = ids;
        tree.add_child(r, a).unwrap();
        tree.add_child(a, b).unwrap();
        tree.add_child(a, c).unwrap();
        tree.add_child(r, d).unwrap();
        (tree, ids)
    }

    #[test]
    fn depth_first_is_pre_order() {
        let (tree, [r, a, b, c, d]) = sample();
        let mut seen = Vec::new();
        tree.for_each(r, |_, id| seen.push(id));
        assert_eq!(seen, vec![r, a, b, c, d]);
    }

    #[test]
    fn breadth_first_is_level_order() {
        let (tree, [r, a, b, c, d]) = sample();
        let mut seen = Vec::new();
        tree.visit(r, Order::BreadthFirst, |_, id| {
            seen.push(id);
            Visit::Continue
        });
        assert_eq!(seen, vec![r, a, d, b, c]);
    }

    #[test]
    fn skip_children_prunes() {
        let (tree, [r, a, _, _, d]) = sample();
        let mut seen = Vec::new();
        tree.visit(r, Order::DepthFirst, |_, id| {
            seen.push(id);
            if id == a {
                Visit::SkipChildren
            } else {
                Visit::Continue
            }
        });
        assert_eq!(seen, vec![r, a, d]);
    }

    #[test]
    fn search_returns_first_match() {
        let (mut tree, [r, _, _, c, d]) = sample();
        tree.set(c, field::Z_INDEX, 3);
        tree.set(d, field::Z_INDEX, 3);
        let hit = tree.search(r, Order::DepthFirst, |tree, id| {
            *tree.get(id, field::Z_INDEX) == 3
        });
        assert_eq!(hit, Some(c));
        let hit = tree.search(r, Order::BreadthFirst, |tree, id| {
            *tree.get(id, field::Z_INDEX) == 3
        });
        assert_eq!(hit, Some(d));
    }

    #[test]
    fn ancestors_walk_to_root() {
        let (tree, [r, a, b, _, _]) = sample();
        assert_eq!(tree.ancestors(b).collect::<Vec<_>>(), vec![a, r]);
        assert_eq!(tree.root_of(b), r);
        assert!(tree.is_ancestor_or_self(a, b));
        assert!(!tree.is_ancestor_or_self(b, a));
    }
}
