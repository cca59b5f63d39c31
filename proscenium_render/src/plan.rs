// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render plan: an ordered sequence of draw items for one frame.

use alloc::vec::Vec;

use kurbo::{Affine, Rect};
use proscenium_core::backend::Vertex;
use proscenium_core::element::{ElementId, HorizontalAlignment};
use proscenium_core::paint::{Brush, Color};

use crate::resource::ResourceKey;

/// Blend mode for compositing a render item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Standard source-over alpha compositing.
    #[default]
    SourceOver,
    /// Source-over with the source alpha multiplied by the item's mask.
    Masked,
}

/// A glyph run drawn by a render item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphItem {
    /// Shaped glyphs.
    pub glyphs: ResourceKey,
    /// Layout rectangle of the run.
    pub rect: Rect,
    /// Horizontal placement inside `rect`.
    pub align: HorizontalAlignment,
    /// Text color.
    pub color: Color,
}

/// A single draw command in the render plan.
///
/// Items are produced back to front, in the order the issue pass visits
/// elements.
#[derive(Clone, Debug)]
pub struct RenderItem {
    /// The element this item originates from.
    pub element: ElementId,
    /// Offscreen target drawn into, or `None` for the output.
    pub target: Option<ResourceKey>,
    /// Triangle list.
    pub vertices: Vec<Vertex>,
    /// Texture sampled by the triangles, if any.
    pub texture: Option<ResourceKey>,
    /// Glyph run, if any.
    pub glyphs: Option<GlyphItem>,
    /// Cumulative transform.
    pub transform: Affine,
    /// Cumulative opacity (0.0–1.0).
    pub opacity: f64,
    /// Mask brush for [`BlendMode::Masked`] items.
    pub mask: Option<Brush>,
    /// Blend mode.
    pub blend_mode: BlendMode,
}

/// An ordered list of draw commands for a single frame.
///
/// Items drawn into an offscreen target precede the item that composites
/// that target.
#[derive(Clone, Debug, Default)]
pub struct RenderPlan {
    /// Draw items in back-to-front order.
    pub items: Vec<RenderItem>,
}

impl RenderPlan {
    /// Creates an empty render plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the plan for reuse.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Items drawn into `target` (`None` for the output), in order.
    pub fn items_in(&self, target: Option<ResourceKey>) -> impl Iterator<Item = &RenderItem> + '_ {
        self.items.iter().filter(move |item| item.target == target)
    }

    /// Elements of the items drawn to the output, in order.
    #[must_use]
    pub fn elements(&self) -> Vec<ElementId> {
        self.items_in(None).map(|item| item.element).collect()
    }
}
