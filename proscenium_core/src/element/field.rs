// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed attribute selectors.
//!
//! Each constant names one observable attribute and is passed to
//! [`ElementTree::get`], [`set`](ElementTree::set),
//! [`attach`](ElementTree::attach) and [`detach`](ElementTree::detach):
//!
//! ```
//! use proscenium_core::element::{ElementKind, ElementTree, field};
//!
//! let mut tree = ElementTree::new();
//! let e = tree.create_element(ElementKind::ContentHost);
//! tree.set(e, field::WIDTH, Some(120.0));
//! assert_eq!(*tree.get(e, field::WIDTH), Some(120.0));
//! ```
//!
//! Kind-specific selectors (e.g. [`TEXT`]) panic when used on an element of
//! another kind; [`ElementTree::try_get`] returns `None` instead.

use alloc::string::String;
use core::fmt;

use kurbo::{Affine, Insets, Point, Size};

use super::kind::{Arrangement, ElementKind};
use super::store::ElementTree;
use super::types::{HorizontalAlignment, Orientation, VerticalAlignment, Visibility};
use crate::paint::{Brush, Color};
use crate::property::Property;
use crate::text::FontSpec;

type Getter<T> = fn(&ElementTree, u32) -> Option<&Property<T, ElementTree>>;
type GetterMut<T> = fn(&mut ElementTree, u32) -> Option<&mut Property<T, ElementTree>>;

/// Selects one observable attribute of type `T`.
pub struct Field<T: 'static> {
    pub(crate) name: &'static str,
    pub(crate) get: Getter<T>,
    pub(crate) get_mut: GetterMut<T>,
}

impl<T: 'static> Clone for Field<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for Field<T> {}

impl<T: 'static> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field({})", self.name)
    }
}

impl<T: 'static> Field<T> {
    /// The attribute's name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.name
    }
}

macro_rules! common {
    ($(#[$meta:meta])* $konst:ident: $ty:ty => $slot:ident) => {
        $(#[$meta])*
        pub const $konst: Field<$ty> = Field {
            name: stringify!($slot),
            get: |t, i| Some(&t.props[i as usize].$slot),
            get_mut: |t, i| Some(&mut t.props[i as usize].$slot),
        };
    };
}

macro_rules! kind_specific {
    ($(#[$meta:meta])* $konst:ident: $ty:ty => $variant:ident . $slot:ident) => {
        $(#[$meta])*
        pub const $konst: Field<$ty> = Field {
            name: stringify!($slot),
            get: |t, i| match &t.kind[i as usize] {
                ElementKind::$variant(d) => Some(&d.$slot),
                _ => None,
            },
            get_mut: |t, i| match &mut t.kind[i as usize] {
                ElementKind::$variant(d) => Some(&mut d.$slot),
                _ => None,
            },
        };
    };
}

common!(
    /// Whether the element is drawn and laid out.
    VISIBILITY: Visibility => visibility
);
common!(
    /// Opacity in `0.0..=1.0`, multiplied into descendants while drawing.
    OPACITY: f64 => opacity
);
common!(
    /// Outer margin in skin units.
    MARGIN: Insets => margin
);
common!(
    /// Explicit width in skin units; `None` is auto.
    WIDTH: Option<f64> => width
);
common!(
    /// Explicit height in skin units; `None` is auto.
    HEIGHT: Option<f64> => height
);
common!(
    /// Horizontal placement in the layout cell.
    HORIZONTAL_ALIGNMENT: HorizontalAlignment => horizontal_alignment
);
common!(
    /// Vertical placement in the layout cell.
    VERTICAL_ALIGNMENT: VerticalAlignment => vertical_alignment
);
common!(
    /// Transform applied to the element's measured space.
    LAYOUT_TRANSFORM: Option<Affine> => layout_transform
);
common!(
    /// Transform applied while drawing, around
    /// [`RENDER_TRANSFORM_ORIGIN`].
    RENDER_TRANSFORM: Option<Affine> => render_transform
);
common!(
    /// Render-transform pivot relative to the element's size.
    RENDER_TRANSFORM_ORIGIN: Point => render_transform_origin
);
common!(
    /// Brush whose alpha masks the element's rendered output.
    OPACITY_MASK: Option<Brush> => opacity_mask
);
common!(
    /// Brush filling the element's rectangle behind its content.
    BACKGROUND: Option<Brush> => background
);
common!(
    /// Whether the element reacts to input.
    ENABLED: bool => enabled
);
common!(
    /// Whether the element can take focus.
    FOCUSABLE: bool => focusable
);
common!(
    /// Whether directional focus search descends into this element, and
    /// whether a scrollable host may intercept directional keys.
    IS_FOCUS_SCOPE: bool => is_focus_scope
);
common!(
    /// Whether the element is the focused element.
    HAS_FOCUS: bool => has_focus
);
common!(
    /// Sibling draw order; lower draws first.
    Z_INDEX: i32 => z_index
);

kind_specific!(
    /// How a container places its children.
    ARRANGEMENT: Arrangement => Container.arrangement
);
kind_specific!(
    /// Stacking direction of an items host.
    ORIENTATION: Orientation => ItemsHost.orientation
);
kind_specific!(
    /// Whether an items host is a scroll viewport.
    CAN_SCROLL: bool => ItemsHost.can_scroll
);
kind_specific!(
    /// Scroll offset of an items host along its orientation.
    SCROLL_OFFSET: f64 => ItemsHost.scroll_offset
);
kind_specific!(
    /// Text of a text host.
    TEXT: String => Text.text
);
kind_specific!(
    /// Font of a text host.
    FONT: FontSpec => Text.font
);
kind_specific!(
    /// Color of a text host.
    TEXT_COLOR: Color => Text.color
);
kind_specific!(
    /// Texture path of an input leaf.
    TEXTURE: Option<String> => InputLeaf.texture
);
kind_specific!(
    /// Intrinsic size of an input leaf, in skin units.
    NATURAL_SIZE: Size => InputLeaf.natural_size
);
