// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measure pass.

use alloc::vec::Vec;

use kurbo::{Affine, Size};

use super::{LayoutContext, explicit_extent, from_main_cross, main_cross, transform_size, wrap_lines};
use crate::element::{Arrangement, ElementId, ElementKind, ElementTree, Visibility};

/// Where an element's content size came from.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Source {
    /// Text extent or leaf size, still in the element's local space.
    Intrinsic,
    /// Children's totals, already in final space.
    Children,
}

impl ElementTree {
    /// Measures `id` and its subtree against `available` (output units,
    /// margins included) and returns the element's total desired size.
    ///
    /// Collapsed elements measure to zero. Explicit sizes, intrinsic sizes
    /// and margins are scaled by the context's zoom; sizes derived from
    /// children are taken as the children report them.
    pub fn measure(&mut self, id: ElementId, available: Size, cx: &mut LayoutContext<'_>) -> Size {
        self.validate(id);
        self.measure_element(id, available, cx)
    }

    pub(super) fn measure_element(
        &mut self,
        id: ElementId,
        available: Size,
        cx: &mut LayoutContext<'_>,
    ) -> Size {
        let i = id.idx as usize;
        cx.stats.measured += 1;
        self.layout[i].available = Some(available);
        self.layout[i].measured_pass = Some(cx.stats.pass);

        let props = &self.props[i];
        if *props.visibility.get() == Visibility::Collapsed {
            self.layout[i].desired = Size::ZERO;
            self.layout[i].total_desired = Size::ZERO;
            return Size::ZERO;
        }

        let zoom = cx.zoom();
        let margin = cx.scale_margin(*props.margin.get());
        let explicit_w = explicit_extent(*props.width.get()).map(|w| w * zoom.x);
        let explicit_h = explicit_extent(*props.height.get()).map(|h| h * zoom.y);
        let layout_transform = props.layout_transform.get().unwrap_or(Affine::IDENTITY);

        let inner = Size::new(
            (available.width - margin.x0 - margin.x1).max(0.0),
            (available.height - margin.y0 - margin.y1).max(0.0),
        );
        let child_available = Size::new(
            explicit_w.unwrap_or(inner.width),
            explicit_h.unwrap_or(inner.height),
        );

        let (content, source, final_transform) = {
            let mut scope = cx.push_layout_transform(layout_transform);
            let (content, source) = self.measure_content(id, child_available, &mut scope);
            (content, source, scope.final_transform())
        };

        let base = Size::new(
            explicit_w.unwrap_or(content.width),
            explicit_h.unwrap_or(content.height),
        );
        let transformed = transform_size(final_transform, base);
        let from_children = source == Source::Children;
        let desired = Size::new(
            if explicit_w.is_none() && from_children {
                content.width
            } else {
                transformed.width
            },
            if explicit_h.is_none() && from_children {
                content.height
            } else {
                transformed.height
            },
        );
        let total = Size::new(
            desired.width + margin.x0 + margin.x1,
            desired.height + margin.y0 + margin.y1,
        );

        let slot = &mut self.layout[i];
        slot.desired = desired;
        slot.total_desired = total;
        total
    }

    fn measure_content(
        &mut self,
        id: ElementId,
        available: Size,
        cx: &mut LayoutContext<'_>,
    ) -> (Size, Source) {
        let zoom = cx.zoom();
        let arrangement = match &self.kind[id.idx as usize] {
            ElementKind::Container(d) => *d.arrangement.get(),
            ElementKind::ContentHost => Arrangement::Overlay,
            // A scroll viewport asks for its largest item only.
            ElementKind::ItemsHost(d) if *d.can_scroll.get() => Arrangement::Overlay,
            ElementKind::ItemsHost(d) => Arrangement::Stack(*d.orientation.get()),
            ElementKind::Text(d) => {
                let extent = cx.text_metrics().measure(d.font.get(), d.text.get());
                let size = Size::new(extent.width * zoom.x, extent.height * zoom.y);
                return (size, Source::Intrinsic);
            }
            ElementKind::InputLeaf(d) => {
                let natural = *d.natural_size.get();
                let size = Size::new(natural.width * zoom.x, natural.height * zoom.y);
                return (size, Source::Intrinsic);
            }
        };

        let mut children = Vec::new();
        self.add_children(id, &mut children);
        let grid = match arrangement {
            Arrangement::UniformGrid { rows, columns } => {
                Some(Arrangement::grid_dimensions(rows, columns, children.len()))
            }
            _ => None,
        };
        let child_available = match grid {
            Some((rows, columns)) => Size::new(
                available.width / f64::from(columns),
                available.height / f64::from(rows),
            ),
            None => available,
        };
        let sizes: Vec<Size> = children
            .into_iter()
            .map(|child| self.measure_element(child, child_available, cx))
            .collect();

        let largest = sizes.iter().fold(Size::ZERO, |acc, s| {
            Size::new(acc.width.max(s.width), acc.height.max(s.height))
        });
        let size = match arrangement {
            Arrangement::Overlay => largest,
            Arrangement::Stack(o) => {
                let main: f64 = sizes.iter().map(|&s| main_cross(s, o).0).sum();
                from_main_cross(main, main_cross(largest, o).1, o)
            }
            Arrangement::UniformGrid { .. } => {
                let (rows, columns) = grid.unwrap_or((1, 1));
                Size::new(
                    largest.width * f64::from(columns),
                    largest.height * f64::from(rows),
                )
            }
            Arrangement::Wrap(o) => {
                let lines = wrap_lines(&sizes, o, main_cross(available, o).0);
                let main = lines.iter().fold(0.0_f64, |acc, l| acc.max(l.main));
                let cross = lines.iter().map(|l| l.cross).sum();
                from_main_cross(main, cross, o)
            }
        };
        (size, Source::Children)
    }
}
