// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A render backend that records plans.

use alloc::vec::Vec;

use kurbo::Rect;
use proscenium_core::backend::{AssetHandle, AssetRequest, DrawPrimitive, RenderBackend};

use crate::plan::{BlendMode, GlyphItem, RenderItem, RenderPlan};
use crate::resource::{ResourceKey, ResourceTable};

/// Records draw calls into a [`RenderPlan`] and tracks live assets in a
/// [`ResourceTable`].
///
/// Releasing an unknown handle is ignored and counted in
/// [`stray_releases`](Self::stray_releases).
#[derive(Debug, Default)]
pub struct PlanRecorder {
    plan: RenderPlan,
    resources: ResourceTable,
    targets: Vec<(ResourceKey, Rect)>,
    stray_releases: u32,
}

impl PlanRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The plan recorded since the last [`take_plan`](Self::take_plan).
    #[must_use]
    pub fn plan(&self) -> &RenderPlan {
        &self.plan
    }

    /// Takes the recorded plan, leaving an empty one.
    pub fn take_plan(&mut self) -> RenderPlan {
        core::mem::take(&mut self.plan)
    }

    /// Live resources.
    #[must_use]
    pub fn resources(&self) -> &ResourceTable {
        &self.resources
    }

    /// Releases of handles that were not live.
    #[must_use]
    pub fn stray_releases(&self) -> u32 {
        self.stray_releases
    }

    /// Current offscreen target and its bounds, if any.
    #[must_use]
    pub fn current_target(&self) -> Option<(ResourceKey, Rect)> {
        self.targets.last().copied()
    }
}

impl RenderBackend for PlanRecorder {
    fn allocate(&mut self, request: &AssetRequest) -> AssetHandle {
        self.resources.insert(request).into()
    }

    fn release(&mut self, handle: AssetHandle) {
        if self.resources.remove(handle.into()).is_none() {
            self.stray_releases += 1;
        }
    }

    fn draw(&mut self, primitive: &DrawPrimitive<'_>) {
        let mask = primitive.opacity_mask.cloned();
        self.plan.items.push(RenderItem {
            element: primitive.element,
            target: self.targets.last().map(|(key, _)| *key),
            vertices: primitive.vertices.to_vec(),
            texture: primitive.texture.map(ResourceKey::from),
            glyphs: primitive.glyphs.map(|run| GlyphItem {
                glyphs: run.glyphs.into(),
                rect: run.rect,
                align: run.align,
                color: run.color,
            }),
            transform: primitive.transform,
            opacity: primitive.opacity,
            blend_mode: if mask.is_some() {
                BlendMode::Masked
            } else {
                BlendMode::SourceOver
            },
            mask,
        });
    }

    fn push_render_target(&mut self, target: AssetHandle, bounds: Rect) {
        self.targets.push((target.into(), bounds));
    }

    fn pop_render_target(&mut self) {
        self.targets.pop();
    }
}
