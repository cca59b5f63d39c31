// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font identity and the text-metrics collaborator.

use alloc::string::String;

use kurbo::Size;

/// A font family at a given size, in skin units.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    /// Family name.
    pub family: String,
    /// Em size.
    pub size: f64,
}

impl FontSpec {
    /// Creates a font spec.
    #[must_use]
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new("default", 20.0)
    }
}

/// Measures text for layout.
///
/// Implemented by the host's font service. Results are in skin units; the
/// layout engine applies zoom.
pub trait TextMetrics {
    /// Returns the extent of `text` laid out on a single line.
    fn measure(&self, font: &FontSpec, text: &str) -> Size;

    /// Returns the line height of `font`.
    fn line_height(&self, font: &FontSpec) -> f64;
}
