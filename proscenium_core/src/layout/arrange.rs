// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arrange pass.

use alloc::vec::Vec;

use kurbo::{Affine, Insets, Rect, Size};

use super::{LayoutContext, main_cross, wrap_lines};
use crate::element::{
    Arrangement, ElementId, ElementKind, ElementTree, HorizontalAlignment, Orientation,
    VerticalAlignment, Visibility,
};

/// Placement of a child along one axis of its cell.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Placement {
    Start,
    Center,
    End,
    Fill,
}

impl From<HorizontalAlignment> for Placement {
    fn from(a: HorizontalAlignment) -> Self {
        match a {
            HorizontalAlignment::Left => Self::Start,
            HorizontalAlignment::Center => Self::Center,
            HorizontalAlignment::Right => Self::End,
            HorizontalAlignment::Stretch => Self::Fill,
        }
    }
}

impl From<VerticalAlignment> for Placement {
    fn from(a: VerticalAlignment) -> Self {
        match a {
            VerticalAlignment::Top => Self::Start,
            VerticalAlignment::Center => Self::Center,
            VerticalAlignment::Bottom => Self::End,
            VerticalAlignment::Stretch => Self::Fill,
        }
    }
}

/// Returns `(start, extent)` of a child wanting `desired` inside
/// `start..start + extent`. Oversized children get the whole cell.
fn place(start: f64, extent: f64, desired: f64, placement: Placement) -> (f64, f64) {
    let slack = extent - desired;
    if slack <= 0.0 {
        return (start, extent);
    }
    match placement {
        Placement::Fill => (start, extent),
        Placement::Start => (start, desired),
        Placement::Center => (start + slack / 2.0, desired),
        Placement::End => (start + slack, desired),
    }
}

fn deflate(rect: Rect, m: Insets) -> Rect {
    let x0 = rect.x0 + m.x0;
    let y0 = rect.y0 + m.y0;
    Rect::new(x0, y0, (rect.x1 - m.x1).max(x0), (rect.y1 - m.y1).max(y0))
}

/// Whether `rect` reaches into `viewport` along `axis`.
fn overlaps_along(rect: Rect, viewport: Rect, axis: Orientation) -> bool {
    match axis {
        Orientation::Vertical => rect.y1 > viewport.y0 && rect.y0 < viewport.y1,
        Orientation::Horizontal => rect.x1 > viewport.x0 && rect.x0 < viewport.x1,
    }
}

/// Computes the cell of each child of an `arrangement` laid out in
/// `inner`, stacks starting `offset` before the start edge.
fn cells(arrangement: Arrangement, inner: Rect, offset: f64, totals: &[Size]) -> Vec<Rect> {
    match arrangement {
        Arrangement::Overlay => totals.iter().map(|_| inner).collect(),
        Arrangement::Stack(o) => {
            let mut cursor = match o {
                Orientation::Vertical => inner.y0,
                Orientation::Horizontal => inner.x0,
            } - offset;
            totals
                .iter()
                .map(|&total| {
                    let (main, _) = main_cross(total, o);
                    let cell = match o {
                        Orientation::Vertical => Rect::new(inner.x0, cursor, inner.x1, cursor + main),
                        Orientation::Horizontal => Rect::new(cursor, inner.y0, cursor + main, inner.y1),
                    };
                    cursor += main;
                    cell
                })
                .collect()
        }
        Arrangement::UniformGrid { rows, columns } => {
            let (rows, columns) = Arrangement::grid_dimensions(rows, columns, totals.len());
            let w = inner.width() / f64::from(columns);
            let h = inner.height() / f64::from(rows);
            (0..totals.len())
                .map(|k| {
                    let k = u32::try_from(k).unwrap_or(u32::MAX);
                    let x = inner.x0 + f64::from(k % columns) * w;
                    let y = inner.y0 + f64::from(k / columns) * h;
                    Rect::new(x, y, x + w, y + h)
                })
                .collect()
        }
        Arrangement::Wrap(o) => {
            let (extent, _) = main_cross(inner.size(), o);
            let (main_start, cross_start) = match o {
                Orientation::Horizontal => (inner.x0, inner.y0),
                Orientation::Vertical => (inner.y0, inner.x0),
            };
            let mut out = Vec::with_capacity(totals.len());
            let mut line_start = cross_start;
            for line in wrap_lines(totals, o, extent) {
                let mut cursor = main_start;
                for &total in &totals[line.start..line.end] {
                    let (main, _) = main_cross(total, o);
                    out.push(match o {
                        Orientation::Horizontal => {
                            Rect::new(cursor, line_start, cursor + main, line_start + line.cross)
                        }
                        Orientation::Vertical => {
                            Rect::new(line_start, cursor, line_start + line.cross, cursor + main)
                        }
                    });
                    cursor += main;
                }
                line_start += line.cross;
            }
            out
        }
    }
}

impl ElementTree {
    /// Arranges `id` and its subtree into `final_rect` (output units,
    /// margins included).
    ///
    /// The element's actual rectangle becomes `final_rect` minus its
    /// margins; children are placed inside it per the element's kind and
    /// their alignment. Elements arranged for the first time fire
    /// [`Loaded`](crate::element::RoutedEvent::Loaded) once the pass is
    /// over.
    ///
    /// # Panics
    ///
    /// Panics if any element of the subtree was not measured in the
    /// context's current pass.
    pub fn arrange(&mut self, id: ElementId, final_rect: Rect, cx: &mut LayoutContext<'_>) {
        self.validate(id);
        self.arrange_element(id, final_rect, cx);
        self.fire_pending_loaded(cx);
    }

    pub(super) fn arrange_element(
        &mut self,
        id: ElementId,
        final_rect: Rect,
        cx: &mut LayoutContext<'_>,
    ) {
        let i = id.idx as usize;
        assert!(
            self.layout[i].measured_pass == Some(cx.stats.pass),
            "arrange called before measure in this layout pass: {id:?}"
        );
        cx.stats.arranged += 1;

        let props = &self.props[i];
        let collapsed = *props.visibility.get() == Visibility::Collapsed;
        let margin = cx.scale_margin(*props.margin.get());
        let layout_transform = props.layout_transform.get().unwrap_or(Affine::IDENTITY);
        let inner = if collapsed {
            Rect::from_origin_size(final_rect.origin(), Size::ZERO)
        } else {
            deflate(final_rect, margin)
        };
        let z = cx.next_z();

        let slot = &mut self.layout[i];
        let moved = slot.actual != inner;
        slot.actual = inner;
        slot.final_rect = Some(final_rect);
        slot.z = z;

        if !collapsed {
            let mut scope = cx.push_layout_transform(layout_transform);
            self.layout[i].final_transform = scope.final_transform();
            self.arrange_children(id, inner, &mut scope);
        }

        self.layout[i].invalid = false;
        if moved {
            self.invalidate_geometry(id);
        }
        if !self.triggers[i].initialized {
            cx.pending_loaded.push(id);
        }
    }

    fn arrange_children(&mut self, id: ElementId, inner: Rect, cx: &mut LayoutContext<'_>) {
        let (arrangement, offset, scroll_axis) = match &self.kind[id.idx as usize] {
            ElementKind::Container(d) => (*d.arrangement.get(), 0.0, None),
            ElementKind::ContentHost => (Arrangement::Overlay, 0.0, None),
            ElementKind::ItemsHost(d) => {
                let o = *d.orientation.get();
                (
                    Arrangement::Stack(o),
                    *d.scroll_offset.get(),
                    d.can_scroll.get().then_some(o),
                )
            }
            ElementKind::Text(_) | ElementKind::InputLeaf(_) => return,
        };

        let mut children = Vec::new();
        self.add_children(id, &mut children);
        let totals: Vec<Size> = children
            .iter()
            .map(|c| self.layout[c.idx as usize].total_desired)
            .collect();
        let cells = cells(arrangement, inner, offset, &totals);
        for ((child, total), cell) in children.into_iter().zip(totals).zip(cells) {
            let rect = self.align_in_cell(child, cell, total);
            let in_view = scroll_axis.is_none_or(|axis| overlaps_along(rect, inner, axis));
            self.set_in_viewport(child, in_view);
            self.arrange_element(child, rect, cx);
        }
    }

    fn align_in_cell(&self, child: ElementId, cell: Rect, total: Size) -> Rect {
        let props = &self.props[child.idx as usize];
        let (x, w) = place(
            cell.x0,
            cell.width(),
            total.width,
            (*props.horizontal_alignment.get()).into(),
        );
        let (y, h) = place(
            cell.y0,
            cell.height(),
            total.height,
            (*props.vertical_alignment.get()).into(),
        );
        Rect::new(x, y, x + w, y + h)
    }
}
