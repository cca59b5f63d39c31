// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The closed set of element kinds and their kind-specific attributes.

use alloc::string::String;

use kurbo::Size;

use super::store::ElementTree;
use super::types::Orientation;
use crate::input::Key;
use crate::paint::Color;
use crate::property::Property;
use crate::text::FontSpec;

/// How a container places its children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Arrangement {
    /// Every child gets the full inner rectangle; desired size is the
    /// largest child.
    #[default]
    Overlay,
    /// Children are stacked along the orientation; desired size sums the
    /// main axis and takes the largest cross axis.
    Stack(Orientation),
    /// Children fill equal cells row by row. A zero count is derived from
    /// the other one and the number of children; both zero makes a square
    /// grid just large enough for every child.
    UniformGrid {
        /// Row count, or 0 for auto.
        rows: u32,
        /// Column count, or 0 for auto.
        columns: u32,
    },
    /// Children flow along the orientation and break onto a new line when
    /// the next one would overflow the available extent.
    Wrap(Orientation),
}

impl Arrangement {
    /// Resolves the `(rows, columns)` of a uniform grid holding `children`
    /// cells. Never returns a zero count.
    #[must_use]
    pub fn grid_dimensions(rows: u32, columns: u32, children: usize) -> (u32, u32) {
        let n = u32::try_from(children).unwrap_or(u32::MAX).max(1);
        match (rows, columns) {
            (0, 0) => {
                let mut side = 1;
                while side * side < n {
                    side += 1;
                }
                (side, side)
            }
            (0, c) => (n.div_ceil(c), c),
            (r, 0) => (r, n.div_ceil(r)),
            (r, c) => (r, c),
        }
    }
}

/// A container of any number of children.
#[derive(Debug)]
pub struct ContainerData {
    pub(crate) arrangement: Property<Arrangement, ElementTree>,
}

/// A host for generated item containers, optionally scrollable.
#[derive(Debug)]
pub struct ItemsHostData {
    pub(crate) orientation: Property<Orientation, ElementTree>,
    pub(crate) can_scroll: Property<bool, ElementTree>,
    /// Offset along the orientation, in layout units.
    pub(crate) scroll_offset: Property<f64, ElementTree>,
}

/// A single run of text.
#[derive(Debug)]
pub struct TextData {
    pub(crate) text: Property<String, ElementTree>,
    pub(crate) font: Property<FontSpec, ElementTree>,
    pub(crate) color: Property<Color, ElementTree>,
}

/// A leaf bound to input, optionally showing a texture.
#[derive(Debug)]
pub struct InputLeafData {
    pub(crate) texture: Property<Option<String>, ElementTree>,
    pub(crate) natural_size: Property<Size, ElementTree>,
    pub(crate) activation: Key,
}

/// What an element is.
///
/// The kind fixes how the element measures, arranges, draws and which
/// children it may own (see [`ElementKind::max_children`]).
#[derive(Debug)]
pub enum ElementKind {
    /// Any number of children, arranged per [`Arrangement`].
    Container(ContainerData),
    /// At most one content child, sized to it.
    ContentHost,
    /// Generated item containers stacked along an orientation.
    ItemsHost(ItemsHostData),
    /// Text, no children.
    Text(TextData),
    /// Input-bound leaf, no children.
    InputLeaf(InputLeafData),
}

impl ElementKind {
    /// An overlay container.
    #[must_use]
    pub fn overlay() -> Self {
        Self::Container(ContainerData {
            arrangement: Property::new(Arrangement::Overlay),
        })
    }

    /// A stacking container.
    #[must_use]
    pub fn stack(orientation: Orientation) -> Self {
        Self::Container(ContainerData {
            arrangement: Property::new(Arrangement::Stack(orientation)),
        })
    }

    /// A uniform grid container; zero counts are derived.
    #[must_use]
    pub fn uniform_grid(rows: u32, columns: u32) -> Self {
        Self::Container(ContainerData {
            arrangement: Property::new(Arrangement::UniformGrid { rows, columns }),
        })
    }

    /// A wrapping container.
    #[must_use]
    pub fn wrap(orientation: Orientation) -> Self {
        Self::Container(ContainerData {
            arrangement: Property::new(Arrangement::Wrap(orientation)),
        })
    }

    /// An items host; `can_scroll` makes it a scroll viewport.
    #[must_use]
    pub fn items_host(orientation: Orientation, can_scroll: bool) -> Self {
        Self::ItemsHost(ItemsHostData {
            orientation: Property::new(orientation),
            can_scroll: Property::new(can_scroll),
            scroll_offset: Property::new(0.0),
        })
    }

    /// A text host.
    #[must_use]
    pub fn text(text: impl Into<String>, font: FontSpec) -> Self {
        Self::Text(TextData {
            text: Property::new(text.into()),
            font: Property::new(font),
            color: Property::new(Color::WHITE),
        })
    }

    /// An input leaf activated by `Enter`.
    #[must_use]
    pub fn input_leaf() -> Self {
        Self::input_leaf_with(Key::Enter)
    }

    /// An input leaf activated by `activation`.
    #[must_use]
    pub fn input_leaf_with(activation: Key) -> Self {
        Self::InputLeaf(InputLeafData {
            texture: Property::new(None),
            natural_size: Property::new(Size::ZERO),
            activation,
        })
    }

    /// Maximum number of children this kind may own.
    #[must_use]
    pub fn max_children(&self) -> usize {
        match self {
            Self::Container(_) | Self::ItemsHost(_) => usize::MAX,
            Self::ContentHost => 1,
            Self::Text(_) | Self::InputLeaf(_) => 0,
        }
    }

    /// Short name for diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Container(_) => "container",
            Self::ContentHost => "content-host",
            Self::ItemsHost(_) => "items-host",
            Self::Text(_) => "text",
            Self::InputLeaf(_) => "input-leaf",
        }
    }

    /// Builds a kind with the same variant and current attribute values,
    /// without subscribers.
    pub(crate) fn duplicate(&self) -> Self {
        match self {
            Self::Container(d) => Self::Container(ContainerData {
                arrangement: Property::new(*d.arrangement.get()),
            }),
            Self::ContentHost => Self::ContentHost,
            Self::ItemsHost(d) => Self::ItemsHost(ItemsHostData {
                orientation: Property::new(*d.orientation.get()),
                can_scroll: Property::new(*d.can_scroll.get()),
                scroll_offset: Property::new(*d.scroll_offset.get()),
            }),
            Self::Text(d) => Self::Text(TextData {
                text: Property::new(d.text.get().clone()),
                font: Property::new(d.font.get().clone()),
                color: Property::new(*d.color.get()),
            }),
            Self::InputLeaf(d) => Self::InputLeaf(InputLeafData {
                texture: Property::new(d.texture.get().clone()),
                natural_size: Property::new(*d.natural_size.get()),
                activation: d.activation,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_dimensions_fill_in_zero_counts() {
        assert_eq!(Arrangement::grid_dimensions(0, 0, 5), (3, 3));
        assert_eq!(Arrangement::grid_dimensions(0, 0, 9), (3, 3));
        assert_eq!(Arrangement::grid_dimensions(0, 4, 6), (2, 4));
        assert_eq!(Arrangement::grid_dimensions(3, 0, 7), (3, 3));
        assert_eq!(Arrangement::grid_dimensions(2, 2, 9), (2, 2));
        assert_eq!(Arrangement::grid_dimensions(0, 0, 0), (1, 1));
    }
}
