// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small value types shared by elements and layout.

/// Whether an element is drawn and whether it takes part in layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Laid out and drawn.
    #[default]
    Visible,
    /// Keeps its layout slot but is neither drawn nor hit.
    Hidden,
    /// Takes no space and is neither drawn nor hit.
    Collapsed,
}

impl Visibility {
    /// Returns `true` for [`Visible`](Self::Visible).
    #[inline]
    #[must_use]
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }
}

/// Horizontal placement of an element inside its layout cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HorizontalAlignment {
    /// Flush left.
    Left,
    /// Centered.
    Center,
    /// Flush right.
    Right,
    /// Fills the cell.
    #[default]
    Stretch,
}

/// Vertical placement of an element inside its layout cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerticalAlignment {
    /// Flush top.
    Top,
    /// Centered.
    Center,
    /// Flush bottom.
    Bottom,
    /// Fills the cell.
    #[default]
    Stretch,
}

/// Stacking direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Children flow top to bottom.
    #[default]
    Vertical,
    /// Children flow left to right.
    Horizontal,
}
