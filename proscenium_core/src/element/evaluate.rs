// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-channel draining and change reporting.
//!
//! Evaluation follows a drain-recompute pattern per channel:
//!
//! 1. **LAYOUT** — drain the affected set (the marked elements plus every
//!    ancestor, through the parent-depends-on-child edges) and raise each
//!    element's layout flag.
//! 2. **VISIBILITY** — drain the affected set (marked elements plus their
//!    descendants) in parent-before-child order and recompute effective
//!    visibility, reporting transitions.
//!    Items a scroll viewport arranged out of view, or back into it, are
//!    reported the same way together with their shown descendants.
//! 3. **GEOMETRY** — drain and flag each element's build cache stale.
//! 4. **TOPOLOGY** — drain and discard; the lifecycle lists carry the
//!    structural changes.
//!
//! [`TreeChanges`] uses raw slot indices, like the lists backends consume.

use alloc::vec::Vec;

use super::id::INVALID;
use super::store::ElementTree;
use super::traverse::{Order, Visit};
use crate::dirty;

/// The set of changes produced by one [`ElementTree::evaluate`] call.
#[derive(Clone, Debug, Default)]
pub struct TreeChanges {
    /// Elements whose layout flag was raised by pending invalidations.
    pub layout: Vec<u32>,
    /// Elements whose cached build data became stale.
    pub geometry: Vec<u32>,
    /// Elements that stopped being effectively visible.
    pub hidden: Vec<u32>,
    /// Elements that became effectively visible.
    pub unhidden: Vec<u32>,
    /// Elements created since the last evaluate.
    pub added: Vec<u32>,
    /// Elements destroyed since the last evaluate.
    pub removed: Vec<u32>,
    /// Whether any link changed.
    pub topology_changed: bool,
}

impl TreeChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.layout.clear();
        self.geometry.clear();
        self.hidden.clear();
        self.unhidden.clear();
        self.added.clear();
        self.removed.clear();
        self.topology_changed = false;
    }
}

impl ElementTree {
    /// Drains every dirty channel and returns what changed.
    pub fn evaluate(&mut self) -> TreeChanges {
        let mut changes = TreeChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), reusing a caller-provided buffer.
    pub fn evaluate_into(&mut self, changes: &mut TreeChanges) {
        changes.clear();

        changes.layout = self.flush_invalidations();

        let dirty_visibility: Vec<u32> = self
            .dirty
            .drain(dirty::VISIBILITY)
            .affected()
            .deterministic()
            .run()
            .collect();
        for idx in dirty_visibility {
            let parent_idx = self.parent[idx as usize];
            let parent_visible = parent_idx == INVALID || self.effective_visible[parent_idx as usize];
            let visible = parent_visible && self.props[idx as usize].visibility.get().is_visible();
            if visible != self.effective_visible[idx as usize] {
                if visible {
                    changes.unhidden.push(idx);
                } else {
                    changes.hidden.push(idx);
                }
                self.effective_visible[idx as usize] = visible;
            }
        }

        for idx in core::mem::take(&mut self.pending_viewport) {
            if !self.is_live_index(idx) || !self.effective_visible[idx as usize] {
                continue;
            }
            let list = if self.in_viewport[idx as usize] {
                &mut changes.unhidden
            } else {
                &mut changes.hidden
            };
            let item = self.id_at(idx);
            self.visit(item, Order::DepthFirst, |tree, e| {
                let j = e.idx as usize;
                // Nested viewports keep their own out-of-view items.
                if !tree.effective_visible[j] || (e != item && !tree.in_viewport[j]) {
                    return Visit::SkipChildren;
                }
                if !list.contains(&e.idx) {
                    list.push(e.idx);
                }
                Visit::Continue
            });
        }

        changes.geometry = self
            .dirty
            .drain(dirty::GEOMETRY)
            .deterministic()
            .run()
            .collect();
        for &idx in &changes.geometry {
            self.build_invalid[idx as usize] = true;
        }

        let topology: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();
        changes.topology_changed = !topology.is_empty();

        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }

    /// Raises the layout flag of every element reached by pending
    /// invalidations and returns their indices.
    pub(crate) fn flush_invalidations(&mut self) -> Vec<u32> {
        let affected: Vec<u32> = self
            .dirty
            .drain(dirty::LAYOUT)
            .affected()
            .deterministic()
            .run()
            .collect();
        for &idx in &affected {
            self.layout[idx as usize].invalid = true;
        }
        affected
    }
}
