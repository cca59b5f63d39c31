// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Opaque resource keys and the table of live backend assets.

use alloc::collections::BTreeMap;
use core::fmt;

use proscenium_core::backend::{AssetHandle, AssetKind, AssetRequest};

/// An opaque handle to a backend-managed resource (texture, buffer, etc.).
///
/// Resource keys are assigned by the [`ResourceTable`] and passed through
/// the render plan without interpretation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceKey(pub u64);

impl fmt::Debug for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceKey({})", self.0)
    }
}

impl From<AssetHandle> for ResourceKey {
    fn from(handle: AssetHandle) -> Self {
        Self(handle.0)
    }
}

impl From<ResourceKey> for AssetHandle {
    fn from(key: ResourceKey) -> Self {
        Self(key.0)
    }
}

/// A live resource and the request it was created from.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceEntry {
    /// Category of the resource.
    pub kind: AssetKind,
    /// The originating request.
    pub request: AssetRequest,
}

/// Live backend resources, keyed by [`ResourceKey`].
///
/// Keys count up from 1 and are never reused.
#[derive(Clone, Debug, Default)]
pub struct ResourceTable {
    next: u64,
    entries: BTreeMap<ResourceKey, ResourceEntry>,
}

impl ResourceTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new resource and returns its key.
    pub fn insert(&mut self, request: &AssetRequest) -> ResourceKey {
        self.next += 1;
        let key = ResourceKey(self.next);
        self.entries.insert(
            key,
            ResourceEntry {
                kind: request.source.kind(),
                request: request.clone(),
            },
        );
        key
    }

    /// Forgets a resource, returning its entry if it was live.
    pub fn remove(&mut self, key: ResourceKey) -> Option<ResourceEntry> {
        self.entries.remove(&key)
    }

    /// Returns the entry of a live resource.
    #[must_use]
    pub fn get(&self, key: ResourceKey) -> Option<&ResourceEntry> {
        self.entries.get(&key)
    }

    /// Number of live resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no resource is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of live resources of `kind`.
    #[must_use]
    pub fn count(&self, kind: AssetKind) -> usize {
        self.entries.values().filter(|e| e.kind == kind).count()
    }

    /// Iterates live resources in key order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKey, &ResourceEntry)> + '_ {
        self.entries.iter().map(|(k, e)| (*k, e))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use proscenium_core::backend::AssetSource;
    use proscenium_core::element::{ElementKind, ElementTree};

    use super::*;

    #[test]
    fn keys_are_never_reused() {
        let mut tree = ElementTree::new();
        let owner = tree.create_element(ElementKind::input_leaf());
        let request = AssetRequest {
            owner,
            source: AssetSource::Image(String::from("a.png")),
        };
        let mut table = ResourceTable::new();
        let a = table.insert(&request);
        assert_eq!(table.count(AssetKind::Texture), 1);
        assert!(table.remove(a).is_some());
        assert!(table.remove(a).is_none(), "second removal is a no-op");
        let b = table.insert(&request);
        assert_ne!(a, b);
        assert_eq!(table.len(), 1);
    }
}
