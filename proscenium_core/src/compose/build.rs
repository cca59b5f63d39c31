// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build pass.

use alloc::vec::Vec;

use super::quad;
use crate::backend::{AssetKind, AssetSource, RenderBackend};
use crate::element::{ElementId, ElementKind, ElementTree, Order, Visit};
use crate::paint::Color;

impl ElementTree {
    /// Refreshes the cached draw data of every shown element (effectively
    /// visible and inside its scroll viewport) of `root`'s subtree and returns how many elements were rebuilt.
    ///
    /// Elements are rebuilt when their build cache was marked stale (paint
    /// or text changed, scope reopened) or when layout moved them. Asset
    /// scopes that are not open yet are opened on the way.
    pub fn build(&mut self, root: ElementId, backend: &mut dyn RenderBackend) -> u32 {
        let mut order = Vec::new();
        self.visit(root, Order::DepthFirst, |tree, id| {
            if tree.is_shown(id.idx) {
                order.push(id);
                Visit::Continue
            } else {
                Visit::SkipChildren
            }
        });

        let mut rebuilt = 0;
        for id in order {
            if self.build_element(id, backend) {
                rebuilt += 1;
            }
        }
        rebuilt
    }

    fn build_element(&mut self, id: ElementId, backend: &mut dyn RenderBackend) -> bool {
        let i = id.idx as usize;
        self.open_scope(id, backend);
        let key = (self.layout[i].actual, self.layout[i].z);
        if !self.build_invalid[i] && self.cache[i].key == Some(key) {
            return false;
        }
        let (rect, z) = key;

        // -- Background --
        match self.props[i].background.get().clone() {
            Some(brush) => {
                self.cache[i].background = quad(rect, z, |p| brush.color_at(p));
                self.ensure_asset(id, AssetSource::Vertices { count: 6 }, backend);
            }
            None => {
                self.cache[i].background.clear();
                self.release_kind(id, AssetKind::VertexBuffer, backend);
            }
        }

        // -- Content --
        match &self.kind[i] {
            ElementKind::Text(d) => {
                let text = d.text.get().clone();
                let font = d.font.get().clone();
                if text.is_empty() {
                    self.release_kind(id, AssetKind::GlyphBuffer, backend);
                } else {
                    self.ensure_asset(id, AssetSource::Glyphs { text, font }, backend);
                }
                self.cache[i].text_rect = rect;
            }
            ElementKind::InputLeaf(d) => match d.texture.get().clone() {
                Some(path) => {
                    self.ensure_asset(id, AssetSource::Image(path), backend);
                    self.cache[i].content = quad(rect, z, |_| Color::WHITE);
                }
                None => {
                    self.release_kind(id, AssetKind::Texture, backend);
                    self.cache[i].content.clear();
                }
            },
            ElementKind::Container(_) | ElementKind::ContentHost | ElementKind::ItemsHost(_) => {}
        }

        // -- Opacity mask target --
        if self.props[i].opacity_mask.get().is_some() && !rect.is_zero_area() {
            self.ensure_asset(id, AssetSource::Target(rect.size()), backend);
            self.cache[i].mask = quad(rect, z, |_| Color::WHITE);
        } else {
            self.release_kind(id, AssetKind::RenderTarget, backend);
            self.cache[i].mask.clear();
        }

        self.build_invalid[i] = false;
        self.cache[i].key = Some(key);
        true
    }
}
