// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Colors and brushes.

use alloc::vec::Vec;

use kurbo::Point;

/// A straight-alpha RGBA color with `f32` channels in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from its channels.
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Linear interpolation between `self` and `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }
}

/// One color stop of a gradient, at `offset` in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient axis.
    pub offset: f32,
    /// Color at that position.
    pub color: Color,
}

/// Paint used for element backgrounds and opacity masks.
#[derive(Clone, Debug, PartialEq)]
pub enum Brush {
    /// A single color.
    Solid(Color),
    /// A linear gradient. `start` and `end` are in element-relative unit
    /// coordinates (`(0, 0)` is the top-left corner, `(1, 1)` the
    /// bottom-right); stops are sorted by offset.
    LinearGradient {
        /// Gradient axis start.
        start: Point,
        /// Gradient axis end.
        end: Point,
        /// Color stops.
        stops: Vec<GradientStop>,
    },
}

impl Brush {
    /// Samples the brush at element-relative unit coordinates.
    #[must_use]
    pub fn color_at(&self, at: Point) -> Color {
        match self {
            Self::Solid(c) => *c,
            Self::LinearGradient { start, end, stops } => {
                let axis = *end - *start;
                let len2 = axis.hypot2();
                let t = if len2 > 0.0 {
                    ((at - *start).dot(axis) / len2).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "gradient offsets are f32"
                )]
                let t = t as f32;
                sample_stops(stops, t)
            }
        }
    }
}

fn sample_stops(stops: &[GradientStop], t: f32) -> Color {
    let Some(first) = stops.first() else {
        return Color::TRANSPARENT;
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            if span <= 0.0 {
                return b.color;
            }
            return a.color.lerp(b.color, (t - a.offset) / span);
        }
    }
    stops[stops.len() - 1].color
}
