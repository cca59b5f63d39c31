// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Naming scopes and resource dictionaries.
//!
//! A *naming region* is the subtree of a scope element (a root, or an
//! element flagged with [`set_name_scope`](ElementTree::set_name_scope))
//! minus the subtrees of nested scopes. A nested scope's own name belongs to
//! the enclosing region. Names are unique per region; lookups search the
//! region with [`ElementTree::visit`].

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use super::id::ElementId;
use super::store::ElementTree;
use super::traverse::{Order, Visit};
use crate::paint::Brush;

/// Failure to register a name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NameError {
    /// Another element of the same naming region already has this name.
    Conflict {
        /// The contested name.
        name: String,
    },
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict { name } => {
                write!(f, "name {name:?} is already used in this naming scope")
            }
        }
    }
}

impl core::error::Error for NameError {}

/// A value stored in a [`ResourceDictionary`].
#[derive(Clone, Debug, PartialEq)]
pub enum ResourceValue {
    /// A brush.
    Brush(Brush),
    /// A number.
    Number(f64),
    /// A string.
    Text(String),
}

/// Per-element keyed resources, resolved through ancestors.
#[derive(Clone, Debug, Default)]
pub struct ResourceDictionary {
    entries: BTreeMap<String, ResourceValue>,
}

impl ResourceDictionary {
    /// Looks up a key in this dictionary only.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ResourceValue> {
        self.entries.get(key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ElementTree {
    // -- Naming --

    /// Flags or unflags an element as a naming scope.
    pub fn set_name_scope(&mut self, id: ElementId, is_scope: bool) {
        self.validate(id);
        self.name_scope[id.idx as usize] = is_scope;
    }

    /// Returns whether the element starts a naming region (flagged, or a
    /// root).
    #[must_use]
    pub fn is_name_scope(&self, id: ElementId) -> bool {
        self.validate(id);
        self.name_scope[id.idx as usize] || self.parent(id).is_none()
    }

    /// Returns the scope element of the region `id`'s name belongs to.
    #[must_use]
    pub fn name_scope_of(&self, id: ElementId) -> ElementId {
        match self.parent(id) {
            Some(parent) => self.region_for_children(parent),
            None => id,
        }
    }

    /// Sets the element's name, checking its region for clashes.
    ///
    /// An empty name is always accepted and removes the element from
    /// lookups.
    pub fn set_name(&mut self, id: ElementId, name: impl Into<String>) -> Result<(), NameError> {
        self.validate(id);
        let name = name.into();
        if !name.is_empty() {
            let scope = self.name_scope_of(id);
            if let Some(other) = self.find_in_region(scope, &name)
                && other != id
            {
                return Err(NameError::Conflict { name });
            }
        }
        let notification = self.props[id.idx as usize].name.set(name);
        notification.dispatch(self);
        Ok(())
    }

    /// Resolves `name` in the nearest naming region of `from`.
    ///
    /// If `from` is itself a scope, its own region is searched.
    #[must_use]
    pub fn find_name(&self, from: ElementId, name: &str) -> Option<ElementId> {
        if name.is_empty() {
            return None;
        }
        self.find_in_region(self.region_for_children(from), name)
    }

    /// The scope whose region `id`'s children join.
    fn region_for_children(&self, id: ElementId) -> ElementId {
        if self.is_name_scope(id) {
            id
        } else {
            self.name_scope_of(id)
        }
    }

    fn find_in_region(&self, scope: ElementId, name: &str) -> Option<ElementId> {
        let scope_is_root = self.parent(scope).is_none();
        self.visit(scope, Order::DepthFirst, |tree, id| {
            let named = tree.name(id) == name;
            if id == scope {
                // A scope's own name lives in the enclosing region.
                if scope_is_root && named {
                    return Visit::Stop;
                }
                return Visit::Continue;
            }
            if named {
                Visit::Stop
            } else if tree.name_scope[id.idx as usize] {
                Visit::SkipChildren
            } else {
                Visit::Continue
            }
        })
    }

    /// Checks that attaching `child` under `parent` introduces no name
    /// clash in `parent`'s region.
    pub(crate) fn check_subtree_names(
        &self,
        parent: ElementId,
        child: ElementId,
    ) -> Result<(), NameError> {
        let mut incoming: Vec<&str> = Vec::new();
        self.visit(child, Order::DepthFirst, |_, id| {
            let name = self.name(id);
            if !name.is_empty() {
                incoming.push(name);
            }
            // Names below a nested scope stay in that scope.
            if self.name_scope[id.idx as usize] {
                Visit::SkipChildren
            } else {
                Visit::Continue
            }
        });
        if incoming.is_empty() {
            return Ok(());
        }

        let scope = self.region_for_children(parent);
        for (i, name) in incoming.iter().enumerate() {
            if incoming[..i].contains(name) || self.find_in_region(scope, name).is_some() {
                return Err(NameError::Conflict {
                    name: String::from(*name),
                });
            }
        }
        Ok(())
    }

    // -- Resources --

    /// Stores a keyed resource on an element.
    pub fn set_resource(&mut self, id: ElementId, key: impl Into<String>, value: ResourceValue) {
        self.validate(id);
        self.resources[id.idx as usize]
            .entries
            .insert(key.into(), value);
    }

    /// Returns the element's own dictionary.
    #[must_use]
    pub fn resources(&self, id: ElementId) -> &ResourceDictionary {
        self.validate(id);
        &self.resources[id.idx as usize]
    }

    /// Resolves `key` on the element, then on each ancestor in turn.
    #[must_use]
    pub fn find_resource(&self, id: ElementId, key: &str) -> Option<&ResourceValue> {
        self.validate(id);
        core::iter::once(id)
            .chain(self.ancestors(id))
            .find_map(|e| self.resources[e.idx as usize].get(key))
    }
}
