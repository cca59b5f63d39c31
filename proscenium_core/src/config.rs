// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screen configuration.
//!
//! Skins are authored against a fixed *skin size* (for example 1280×720) and
//! scaled to the output with per-axis zoom factors. Layout multiplies every
//! explicit size, intrinsic size and margin by the zoom; the device
//! transform is the base of the layout-transform stack.

use kurbo::{Affine, Size, Vec2};

/// Parameters shared by layout, composition and focus.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkinConfig {
    /// Authoring size of the skin, in skin units.
    pub skin_size: Size,
    /// Output units per skin unit, per axis.
    pub zoom: Vec2,
    /// Base transform of every element's final layout transform.
    pub device_transform: Affine,
    /// Whether directional focus search starts in strict mode (candidates
    /// must overlap the current element's cross axis).
    pub strict_focus: bool,
}

impl SkinConfig {
    /// A 1280×720 skin shown at its authoring size.
    pub const HD: Self = Self::new(Size::new(1280.0, 720.0));

    /// A 1920×1080 skin shown at its authoring size.
    pub const FULL_HD: Self = Self::new(Size::new(1920.0, 1080.0));

    /// A skin of `skin_size` shown at its authoring size.
    #[must_use]
    pub const fn new(skin_size: Size) -> Self {
        Self {
            skin_size,
            zoom: Vec2::new(1.0, 1.0),
            device_transform: Affine::IDENTITY,
            strict_focus: true,
        }
    }

    /// A skin of `skin_size` scaled to fill `output`.
    #[must_use]
    pub fn for_output(skin_size: Size, output: Size) -> Self {
        let zoom = if skin_size.width > 0.0 && skin_size.height > 0.0 {
            Vec2::new(
                output.width / skin_size.width,
                output.height / skin_size.height,
            )
        } else {
            Vec2::new(1.0, 1.0)
        };
        Self {
            zoom,
            ..Self::new(skin_size)
        }
    }

    /// The skin size in output units.
    #[must_use]
    pub fn output_size(&self) -> Size {
        Size::new(
            self.skin_size.width * self.zoom.x,
            self.skin_size.height * self.zoom.y,
        )
    }
}

impl Default for SkinConfig {
    fn default() -> Self {
        Self::HD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_output_computes_zoom() {
        let c = SkinConfig::for_output(Size::new(1280.0, 720.0), Size::new(1920.0, 1080.0));
        assert_eq!(c.zoom, Vec2::new(1.5, 1.5));
        assert_eq!(c.output_size(), Size::new(1920.0, 1080.0));
        assert!(c.strict_focus);
    }

    #[test]
    fn degenerate_skin_keeps_unit_zoom() {
        let c = SkinConfig::for_output(Size::ZERO, Size::new(100.0, 100.0));
        assert_eq!(c.zoom, Vec2::new(1.0, 1.0));
    }
}
