// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test doubles for the backend and text collaborators.

use alloc::vec::Vec;

use kurbo::{Affine, Rect, Size};

use crate::backend::{
    AssetHandle, AssetRequest, DrawPrimitive, GlyphRun, RenderBackend, Vertex,
};
use crate::element::ElementId;
use crate::text::{FontSpec, TextMetrics};

/// One recorded backend call.
#[derive(Clone, Debug)]
pub(crate) enum Call {
    Draw {
        element: ElementId,
        vertices: Vec<Vertex>,
        texture: Option<AssetHandle>,
        glyphs: Option<GlyphRun>,
        transform: Affine,
        opacity: f64,
        masked: bool,
    },
    PushTarget(AssetHandle, Rect),
    PopTarget,
}

/// Records every call; handles count up from 1.
#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    next: u64,
    pub(crate) allocated: Vec<(AssetHandle, AssetRequest)>,
    pub(crate) released: Vec<AssetHandle>,
    pub(crate) calls: Vec<Call>,
}

impl RecordingBackend {
    /// Handles allocated and not yet released.
    pub(crate) fn live(&self) -> Vec<AssetHandle> {
        self.allocated
            .iter()
            .map(|(h, _)| *h)
            .filter(|h| !self.released.contains(h))
            .collect()
    }

    /// Elements drawn, in call order.
    pub(crate) fn drawn(&self) -> Vec<ElementId> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Draw { element, .. } => Some(*element),
                _ => None,
            })
            .collect()
    }

    /// Opacity of the first draw of `id`.
    pub(crate) fn opacity_of(&self, id: ElementId) -> Option<f64> {
        self.calls.iter().find_map(|c| match c {
            Call::Draw {
                element, opacity, ..
            } if *element == id => Some(*opacity),
            _ => None,
        })
    }
}

impl RenderBackend for RecordingBackend {
    fn allocate(&mut self, request: &AssetRequest) -> AssetHandle {
        self.next += 1;
        let handle = AssetHandle(self.next);
        self.allocated.push((handle, request.clone()));
        handle
    }

    fn release(&mut self, handle: AssetHandle) {
        assert!(!self.released.contains(&handle), "{handle:?} released twice");
        self.released.push(handle);
    }

    fn draw(&mut self, primitive: &DrawPrimitive<'_>) {
        self.calls.push(Call::Draw {
            element: primitive.element,
            vertices: primitive.vertices.to_vec(),
            texture: primitive.texture,
            glyphs: primitive.glyphs,
            transform: primitive.transform,
            opacity: primitive.opacity,
            masked: primitive.opacity_mask.is_some(),
        });
    }

    fn push_render_target(&mut self, target: AssetHandle, bounds: Rect) {
        self.calls.push(Call::PushTarget(target, bounds));
    }

    fn pop_render_target(&mut self) {
        self.calls.push(Call::PopTarget);
    }
}

/// Monospace metrics: 10 units per character and 20 units per line at the
/// default 20-unit font size, scaled linearly with the font size.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FixedMetrics {
    pub(crate) char_width: f64,
    pub(crate) line_height: f64,
}

impl Default for FixedMetrics {
    fn default() -> Self {
        Self {
            char_width: 10.0,
            line_height: 20.0,
        }
    }
}

impl TextMetrics for FixedMetrics {
    fn measure(&self, font: &FontSpec, text: &str) -> Size {
        let scale = font.size / 20.0;
        let chars = text.chars().count() as f64;
        Size::new(chars * self.char_width * scale, self.line_height(font))
    }

    fn line_height(&self, font: &FontSpec) -> f64 {
        self.line_height * font.size / 20.0
    }
}
