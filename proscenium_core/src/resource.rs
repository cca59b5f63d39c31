// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Asset ownership scopes.
//!
//! Every element owns at most one backend asset per [`AssetKind`], tracked
//! in a per-element scope:
//!
//! - [`ElementTree::allocate`] opens the scope of every element of a
//!   subtree, parents first, and creates persistent assets (textures).
//! - [`ElementTree::deallocate`] closes the scopes again, children first,
//!   releasing everything the scope owns. Both are idempotent.
//! - Visibility transitions drive the lighter pair
//!   [`becomes_hidden`](ElementTree::becomes_hidden) and
//!   [`becomes_visible`](ElementTree::becomes_visible): transient assets
//!   (vertex buffers, glyph buffers, render targets) are released while an
//!   element is off screen and recreated by the next build pass.
//!
//! Closing a scope is the only path on which the core releases an asset it
//! did not replace itself, so every handle is released exactly once. Each
//! operation is recorded as an [`AssetEvent`] for tracing.

use alloc::vec::Vec;

use crate::backend::{AssetHandle, AssetKind, AssetRequest, AssetSource, RenderBackend};
use crate::element::{ElementId, ElementKind, ElementTree};

/// Whether an asset was created or destroyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetOp {
    /// The backend allocated the asset.
    Allocate,
    /// The backend released the asset.
    Release,
}

/// One asset operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssetEvent {
    /// Index of the owning element.
    pub element_index: u32,
    /// Asset category.
    pub kind: AssetKind,
    /// What happened.
    pub op: AssetOp,
    /// Raw backend handle.
    pub handle: u64,
}

/// An asset held by an element's scope.
#[derive(Clone, Debug)]
pub(crate) struct OwnedAsset {
    pub(crate) source: AssetSource,
    pub(crate) handle: AssetHandle,
}

impl OwnedAsset {
    fn kind(&self) -> AssetKind {
        self.source.kind()
    }

    /// Transient assets do not survive becoming hidden.
    fn is_transient(&self) -> bool {
        self.kind() != AssetKind::Texture
    }
}

/// Per-element asset scope.
#[derive(Clone, Debug, Default)]
pub(crate) struct AssetScope {
    pub(crate) open: bool,
    pub(crate) owned: Vec<OwnedAsset>,
}

impl ElementTree {
    /// Opens the asset scope of every element of `id`'s subtree, parents
    /// first, creating persistent assets.
    ///
    /// Elements whose scope is already open are left alone.
    pub fn allocate(&mut self, id: ElementId, backend: &mut dyn RenderBackend) {
        self.validate(id);
        let mut order = Vec::new();
        self.for_each(id, |_, e| order.push(e));
        for e in order {
            self.open_scope(e, backend);
        }
    }

    /// Closes the asset scope of every element of `id`'s subtree, children
    /// first, releasing every asset the scopes own.
    ///
    /// Elements whose scope is already closed are left alone.
    pub fn deallocate(&mut self, id: ElementId, backend: &mut dyn RenderBackend) {
        self.validate(id);
        let mut order = Vec::new();
        self.for_each(id, |_, e| order.push(e));
        // Reverse pre-order visits every element after its descendants.
        for e in order.into_iter().rev() {
            self.close_scope(e, backend);
        }
    }

    /// Releases the element's transient assets and marks its build cache
    /// stale.
    pub fn becomes_hidden(&mut self, id: ElementId, backend: &mut dyn RenderBackend) {
        self.validate(id);
        let i = id.idx as usize;
        let owned = core::mem::take(&mut self.assets[i].owned);
        let (transient, kept): (Vec<_>, Vec<_>) = owned.into_iter().partition(OwnedAsset::is_transient);
        self.assets[i].owned = kept;
        for asset in transient {
            self.release_logged(id, &asset, backend);
        }
        self.build_invalid[i] = true;
    }

    /// Marks the element's build cache stale so the next build pass
    /// recreates its transient assets.
    pub fn becomes_visible(&mut self, id: ElementId) {
        self.validate(id);
        self.build_invalid[id.idx as usize] = true;
    }

    /// Returns whether the element's asset scope is open.
    #[must_use]
    pub fn is_allocated(&self, id: ElementId) -> bool {
        self.validate(id);
        self.assets[id.idx as usize].open
    }

    /// Returns the assets the element currently owns.
    pub fn owned_assets(&self, id: ElementId) -> impl Iterator<Item = (AssetKind, AssetHandle)> + '_ {
        self.validate(id);
        self.assets[id.idx as usize]
            .owned
            .iter()
            .map(|a| (a.kind(), a.handle))
    }

    /// Takes the asset events recorded since the last call.
    pub fn take_asset_events(&mut self) -> Vec<AssetEvent> {
        core::mem::take(&mut self.asset_log)
    }

    // -- Crate-internal scope operations --

    pub(crate) fn open_scope(&mut self, id: ElementId, backend: &mut dyn RenderBackend) {
        let i = id.idx as usize;
        if self.assets[i].open {
            return;
        }
        self.assets[i].open = true;
        self.build_invalid[i] = true;
        if let ElementKind::InputLeaf(d) = &self.kind[i]
            && let Some(path) = d.texture.get().clone()
        {
            self.ensure_asset(id, AssetSource::Image(path), backend);
        }
    }

    fn close_scope(&mut self, id: ElementId, backend: &mut dyn RenderBackend) {
        let i = id.idx as usize;
        if !self.assets[i].open {
            return;
        }
        let scope = core::mem::take(&mut self.assets[i]);
        for asset in &scope.owned {
            self.release_logged(id, asset, backend);
        }
        self.build_invalid[i] = true;
        self.cache[i].key = None;
    }

    /// Returns the handle of the element's asset of `kind`.
    pub(crate) fn asset_of(&self, id: ElementId, kind: AssetKind) -> Option<AssetHandle> {
        self.assets[id.idx as usize]
            .owned
            .iter()
            .find(|a| a.kind() == kind)
            .map(|a| a.handle)
    }

    /// Makes the element own an asset built from `source`, replacing an
    /// asset of the same kind built from something else.
    pub(crate) fn ensure_asset(
        &mut self,
        id: ElementId,
        source: AssetSource,
        backend: &mut dyn RenderBackend,
    ) -> AssetHandle {
        let i = id.idx as usize;
        let kind = source.kind();
        if let Some(pos) = self.assets[i].owned.iter().position(|a| a.kind() == kind) {
            if self.assets[i].owned[pos].source == source {
                return self.assets[i].owned[pos].handle;
            }
            let old = self.assets[i].owned.swap_remove(pos);
            self.release_logged(id, &old, backend);
        }

        let request = AssetRequest { owner: id, source };
        let handle = backend.allocate(&request);
        self.asset_log.push(AssetEvent {
            element_index: id.idx,
            kind,
            op: AssetOp::Allocate,
            handle: handle.0,
        });
        self.assets[i].owned.push(OwnedAsset {
            source: request.source,
            handle,
        });
        handle
    }

    /// Releases the element's asset of `kind`, if it owns one.
    pub(crate) fn release_kind(&mut self, id: ElementId, kind: AssetKind, backend: &mut dyn RenderBackend) {
        let i = id.idx as usize;
        if let Some(pos) = self.assets[i].owned.iter().position(|a| a.kind() == kind) {
            let old = self.assets[i].owned.swap_remove(pos);
            self.release_logged(id, &old, backend);
        }
    }

    fn release_logged(&mut self, id: ElementId, asset: &OwnedAsset, backend: &mut dyn RenderBackend) {
        backend.release(asset.handle);
        self.asset_log.push(AssetEvent {
            element_index: id.idx,
            kind: asset.kind(),
            op: AssetOp::Release,
            handle: asset.handle.0,
        });
    }
}
