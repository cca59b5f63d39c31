// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render backend contract.
//!
//! Proscenium never talks to a graphics API. The composition pass turns the
//! element tree into calls on a [`RenderBackend`], which a host implements on
//! top of its device (or records, as `proscenium_render` does):
//!
//! - **Assets** — [`allocate`](RenderBackend::allocate) and
//!   [`release`](RenderBackend::release) bracket the lifetime of textures,
//!   vertex buffers, glyph buffers and offscreen render targets. The
//!   [`resource`](crate::resource) coordinator guarantees that every handle
//!   it allocates is released exactly once.
//! - **Drawing** — [`draw`](RenderBackend::draw) receives one
//!   [`DrawPrimitive`] with its cumulative transform and opacity already
//!   resolved.
//! - **Indirection** — [`push_render_target`](RenderBackend::push_render_target)
//!   redirects subsequent draws into an offscreen target until the matching
//!   [`pop_render_target`](RenderBackend::pop_render_target).
//!
//! ```rust,ignore
//! screen.dispatch_key(&mut key);
//! let stats = screen.frame(&mut backend, &metrics, &mut tracer);
//! backend.present();
//! ```

use alloc::string::String;
use core::fmt;

use kurbo::{Affine, Rect, Size};

use crate::element::{ElementId, HorizontalAlignment};
use crate::paint::{Brush, Color};
use crate::text::FontSpec;

/// Category of a backend asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Image texture.
    Texture,
    /// Vertex buffer (background quads).
    VertexBuffer,
    /// Shaped glyphs for one text run.
    GlyphBuffer,
    /// Offscreen render target.
    RenderTarget,
}

/// Opaque handle to a backend asset, assigned by the backend.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetHandle(pub u64);

impl fmt::Debug for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetHandle({})", self.0)
    }
}

/// What an asset is created from.
#[derive(Clone, Debug, PartialEq)]
pub enum AssetSource {
    /// A texture loaded from a skin-relative path.
    Image(String),
    /// A vertex buffer with room for `count` vertices.
    Vertices {
        /// Vertex capacity.
        count: usize,
    },
    /// A glyph run for `text` in `font`.
    Glyphs {
        /// The string to shape.
        text: String,
        /// The font to shape with.
        font: FontSpec,
    },
    /// An offscreen target of the given pixel size.
    Target(Size),
}

impl AssetSource {
    /// The asset category this source produces.
    #[must_use]
    pub fn kind(&self) -> AssetKind {
        match self {
            Self::Image(_) => AssetKind::Texture,
            Self::Vertices { .. } => AssetKind::VertexBuffer,
            Self::Glyphs { .. } => AssetKind::GlyphBuffer,
            Self::Target(_) => AssetKind::RenderTarget,
        }
    }
}

/// A request to create one asset on behalf of an element.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetRequest {
    /// Element whose resource scope will own the asset.
    pub owner: ElementId,
    /// What to create.
    pub source: AssetSource,
}

/// One vertex of a textured, colored triangle list.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    /// X in the element's layout space.
    pub x: f32,
    /// Y in the element's layout space.
    pub y: f32,
    /// Depth, from the arrange-time z-order.
    pub z: f32,
    /// Vertex color.
    pub color: Color,
    /// Texture U.
    pub u: f32,
    /// Texture V.
    pub v: f32,
}

/// A text run to draw from a glyph buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphRun {
    /// Shaped glyphs.
    pub glyphs: AssetHandle,
    /// Layout rectangle the run is placed in.
    pub rect: Rect,
    /// Horizontal placement inside `rect`.
    pub align: HorizontalAlignment,
    /// Text color.
    pub color: Color,
}

/// A single draw call.
#[derive(Clone, Copy, Debug)]
pub struct DrawPrimitive<'a> {
    /// Element this draw originates from.
    pub element: ElementId,
    /// Triangle list, empty for pure glyph runs.
    pub vertices: &'a [Vertex],
    /// Texture sampled by `vertices`, if any.
    pub texture: Option<AssetHandle>,
    /// Glyph run drawn after `vertices`, if any.
    pub glyphs: Option<GlyphRun>,
    /// Cumulative transform, layout space to target space.
    pub transform: Affine,
    /// Cumulative opacity.
    pub opacity: f64,
    /// Mask applied to the result, in element-relative unit coordinates.
    pub opacity_mask: Option<&'a Brush>,
}

/// Receives asset and draw requests from the composition pass.
///
/// Implemented by GPU backends and by recording test doubles.
pub trait RenderBackend {
    /// Creates an asset and returns its handle.
    fn allocate(&mut self, request: &AssetRequest) -> AssetHandle;

    /// Destroys an asset. Handles are never released twice by the core.
    fn release(&mut self, handle: AssetHandle);

    /// Draws one primitive into the current target.
    fn draw(&mut self, primitive: &DrawPrimitive<'_>);

    /// Redirects subsequent draws into `target`, which covers `bounds`.
    fn push_render_target(&mut self, target: AssetHandle, bounds: Rect);

    /// Restores the previous target.
    fn pop_render_target(&mut self);
}
