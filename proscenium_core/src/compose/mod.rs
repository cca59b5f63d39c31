// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render composition.
//!
//! Drawing walks the effectively visible part of the tree twice:
//!
//! 1. **Build** ([`ElementTree::build`]) — recomputes cached draw data
//!    (background quads, texture quads, text rectangles) for elements whose
//!    geometry or paint changed, and reconciles the element's assets with
//!    what it needs to draw. Elements whose cache is current are skipped.
//! 2. **Issue** ([`ElementTree::issue`]) — submits the cached data to the
//!    [`RenderBackend`](crate::backend::RenderBackend) with the cumulative
//!    transform and opacity held by a [`RenderContext`].
//!
//! The context is a stack: each element pushes its render transform (about
//! its origin point) and opacity, and the returned [`RenderScope`] guard
//! pops them when dropped.
//!
//! An element with an opacity mask is drawn indirectly: its content is
//! issued into an offscreen target covering its rectangle, then the target
//! is drawn as a textured quad with the mask attached.

mod build;
mod issue;

use alloc::vec::Vec;
use core::ops::{Deref, DerefMut};

use kurbo::{Affine, Point, Rect};

use crate::backend::{DrawPrimitive, RenderBackend, Vertex};
use crate::paint::Color;

/// Cached draw data of one element.
#[derive(Clone, Debug, Default)]
pub(crate) struct RenderCache {
    /// Actual rectangle and z the cache was built for.
    pub(crate) key: Option<(Rect, f64)>,
    pub(crate) background: Vec<Vertex>,
    /// Texture quad of an input leaf.
    pub(crate) content: Vec<Vertex>,
    /// Quad compositing the offscreen target of a masked element.
    pub(crate) mask: Vec<Vertex>,
    pub(crate) text_rect: Rect,
}

/// Builds a two-triangle quad covering `rect` at depth `z`, coloring each
/// corner with `color_at` sampled at unit coordinates.
pub(crate) fn quad(rect: Rect, z: f64, color_at: impl Fn(Point) -> Color) -> Vec<Vertex> {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "vertex data is single precision"
    )]
    let corner = |u: f64, v: f64| Vertex {
        x: (rect.x0 + u * rect.width()) as f32,
        y: (rect.y0 + v * rect.height()) as f32,
        z: z as f32,
        color: color_at(Point::new(u, v)),
        u: u as f32,
        v: v as f32,
    };
    let tl = corner(0.0, 0.0);
    let tr = corner(1.0, 0.0);
    let bl = corner(0.0, 1.0);
    let br = corner(1.0, 1.0);
    Vec::from([tl, tr, bl, tr, br, bl])
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    transform: Affine,
    opacity: f64,
}

/// Cumulative transform and opacity threaded through the issue pass.
#[derive(Debug)]
pub struct RenderContext {
    stack: Vec<Entry>,
    draws: u32,
}

impl RenderContext {
    /// Creates a context whose base transform is `base` at full opacity.
    #[must_use]
    pub fn new(base: Affine) -> Self {
        Self {
            stack: Vec::from([Entry {
                transform: base,
                opacity: 1.0,
            }]),
            draws: 0,
        }
    }

    fn top(&self) -> Entry {
        self.stack.last().copied().unwrap_or(Entry {
            transform: Affine::IDENTITY,
            opacity: 1.0,
        })
    }

    /// The cumulative transform.
    #[must_use]
    pub fn transform(&self) -> Affine {
        self.top().transform
    }

    /// The cumulative opacity.
    #[must_use]
    pub fn opacity(&self) -> f64 {
        self.top().opacity
    }

    /// Draw calls issued through this context.
    #[must_use]
    pub fn draws(&self) -> u32 {
        self.draws
    }

    /// Composes `transform` and `opacity` onto the current state until the
    /// returned guard is dropped.
    pub fn push(&mut self, transform: Affine, opacity: f64) -> RenderScope<'_> {
        let top = self.top();
        self.stack.push(Entry {
            transform: top.transform * transform,
            opacity: top.opacity * opacity,
        });
        RenderScope { cx: self }
    }

    /// Replaces the current state with `transform` and `opacity` until the
    /// returned guard is dropped. Used for offscreen targets.
    pub fn push_isolated(&mut self, transform: Affine, opacity: f64) -> RenderScope<'_> {
        self.stack.push(Entry { transform, opacity });
        RenderScope { cx: self }
    }

    /// Sends `primitive` to `backend` and counts it.
    pub fn draw(&mut self, backend: &mut dyn RenderBackend, primitive: &DrawPrimitive<'_>) {
        self.draws += 1;
        backend.draw(primitive);
    }
}

/// Guard returned by [`RenderContext::push`]; pops the entry on drop.
#[derive(Debug)]
pub struct RenderScope<'c> {
    cx: &'c mut RenderContext,
}

impl Deref for RenderScope<'_> {
    type Target = RenderContext;

    fn deref(&self) -> &Self::Target {
        self.cx
    }
}

impl DerefMut for RenderScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.cx
    }
}

impl Drop for RenderScope<'_> {
    fn drop(&mut self) {
        self.cx.stack.pop();
    }
}
