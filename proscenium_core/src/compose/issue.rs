// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Issue pass.

use alloc::vec::Vec;

use kurbo::{Affine, Vec2};

use super::RenderContext;
use crate::backend::{AssetKind, DrawPrimitive, GlyphRun, RenderBackend};
use crate::element::{ElementId, ElementKind, ElementTree, HorizontalAlignment};

impl ElementTree {
    /// Issues the draw calls of `root`'s subtree through `cx`.
    ///
    /// Elements that are not effectively visible, lie outside their scroll
    /// viewport, or whose asset scope is closed, are skipped with their
    /// subtrees. Siblings are drawn in
    /// ascending [`Z_INDEX`](crate::element::field::Z_INDEX) order, document
    /// order breaking ties. Returns the number of draw calls.
    pub fn issue(
        &self,
        root: ElementId,
        cx: &mut RenderContext,
        backend: &mut dyn RenderBackend,
    ) -> u32 {
        self.validate(root);
        let before = cx.draws();
        self.issue_element(root, cx, backend);
        cx.draws() - before
    }

    fn issue_element(&self, id: ElementId, cx: &mut RenderContext, backend: &mut dyn RenderBackend) {
        let i = id.idx as usize;
        if !self.is_shown(id.idx) || !self.assets[i].open {
            return;
        }
        let props = &self.props[i];
        let rect = self.layout[i].actual;
        let local = match *props.render_transform.get() {
            Some(t) => {
                let origin = *props.render_transform_origin.get();
                let pivot = Vec2::new(
                    rect.x0 + rect.width() * origin.x,
                    rect.y0 + rect.height() * origin.y,
                );
                Affine::translate(pivot) * t * Affine::translate(-pivot)
            }
            None => Affine::IDENTITY,
        };
        let mut scope = cx.push(local, *props.opacity.get());

        let mask = props.opacity_mask.get().as_ref();
        let target = self.asset_of(id, AssetKind::RenderTarget);
        match (mask, target) {
            (Some(mask), Some(target)) => {
                backend.push_render_target(target, rect);
                {
                    let offset = Affine::translate(-rect.origin().to_vec2());
                    let mut offscreen = scope.push_isolated(offset, 1.0);
                    self.issue_content(id, &mut offscreen, backend);
                }
                backend.pop_render_target();
                let primitive = DrawPrimitive {
                    element: id,
                    vertices: &self.cache[i].mask,
                    texture: Some(target),
                    glyphs: None,
                    transform: scope.transform(),
                    opacity: scope.opacity(),
                    opacity_mask: Some(mask),
                };
                scope.draw(backend, &primitive);
            }
            _ => self.issue_content(id, &mut scope, backend),
        }
    }

    /// Draws the element's own data, then its children.
    fn issue_content(&self, id: ElementId, cx: &mut RenderContext, backend: &mut dyn RenderBackend) {
        let i = id.idx as usize;
        let cache = &self.cache[i];
        let base = DrawPrimitive {
            element: id,
            vertices: &[],
            texture: None,
            glyphs: None,
            transform: cx.transform(),
            opacity: cx.opacity(),
            opacity_mask: None,
        };

        if !cache.background.is_empty() {
            let primitive = DrawPrimitive {
                vertices: &cache.background,
                ..base
            };
            cx.draw(backend, &primitive);
        }

        match &self.kind[i] {
            ElementKind::Text(d) => {
                if let Some(glyphs) = self.asset_of(id, AssetKind::GlyphBuffer) {
                    let align = match *self.props[i].horizontal_alignment.get() {
                        HorizontalAlignment::Stretch => HorizontalAlignment::Left,
                        other => other,
                    };
                    let primitive = DrawPrimitive {
                        glyphs: Some(GlyphRun {
                            glyphs,
                            rect: cache.text_rect,
                            align,
                            color: *d.color.get(),
                        }),
                        ..base
                    };
                    cx.draw(backend, &primitive);
                }
            }
            ElementKind::InputLeaf(_) => {
                if let Some(texture) = self.asset_of(id, AssetKind::Texture)
                    && !cache.content.is_empty()
                {
                    let primitive = DrawPrimitive {
                        vertices: &cache.content,
                        texture: Some(texture),
                        ..base
                    };
                    cx.draw(backend, &primitive);
                }
            }
            ElementKind::Container(_) | ElementKind::ContentHost | ElementKind::ItemsHost(_) => {}
        }

        let mut children = Vec::new();
        self.add_children(id, &mut children);
        // Stable: equal z-indices keep document order.
        children.sort_by_key(|c| *self.props[c.idx as usize].z_index.get());
        for child in children {
            self.issue_element(child, cx, backend);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use kurbo::Point;

    use super::*;
    use crate::config::SkinConfig;
    use crate::element::{Orientation, Visibility, field};
    use crate::layout::LayoutContext;
    use crate::paint::{Brush, Color};
    use crate::testing::{Call, FixedMetrics, RecordingBackend};
    use crate::text::FontSpec;

    fn render(tree: &mut ElementTree, root: ElementId, backend: &mut RecordingBackend) -> u32 {
        let metrics = FixedMetrics::default();
        let mut lcx = LayoutContext::new(&SkinConfig::default(), &metrics);
        let _ = tree.evaluate();
        tree.update_layout(root, &mut lcx);
        let _ = tree.evaluate();
        tree.build(root, backend);
        let mut cx = RenderContext::new(Affine::IDENTITY);
        tree.issue(root, &mut cx, backend)
    }

    fn filled(tree: &mut ElementTree, kind: ElementKind) -> ElementId {
        let e = tree.create_element(kind);
        tree.set(e, field::BACKGROUND, Some(Brush::Solid(Color::WHITE)));
        e
    }

    #[test]
    fn opacity_multiplies_down_the_tree() {
        let mut tree = ElementTree::new();
        let mut backend = RecordingBackend::default();
        let parent = filled(&mut tree, ElementKind::overlay());
        let child = filled(&mut tree, ElementKind::overlay());
        tree.add_child(parent, child).unwrap();
        tree.set(parent, field::OPACITY, 0.5);
        tree.set(child, field::OPACITY, 0.4);

        assert_eq!(render(&mut tree, parent, &mut backend), 2);
        assert_eq!(backend.opacity_of(parent), Some(0.5));
        assert_eq!(backend.opacity_of(child), Some(0.2));
    }

    #[test]
    fn z_index_orders_siblings_stably() {
        let mut tree = ElementTree::new();
        let mut backend = RecordingBackend::default();
        let root = tree.create_element(ElementKind::overlay());
        let a = filled(&mut tree, ElementKind::overlay());
        let b = filled(&mut tree, ElementKind::overlay());
        let c = filled(&mut tree, ElementKind::overlay());
        for e in [a, b, c] {
            tree.add_child(root, e).unwrap();
        }
        tree.set(a, field::Z_INDEX, 1);
        render(&mut tree, root, &mut backend);
        assert_eq!(backend.drawn(), [b, c, a]);
    }

    #[test]
    fn hidden_elements_draw_nothing() {
        let mut tree = ElementTree::new();
        let mut backend = RecordingBackend::default();
        let root = filled(&mut tree, ElementKind::stack(Orientation::Vertical));
        let child = filled(&mut tree, ElementKind::overlay());
        tree.add_child(root, child).unwrap();
        tree.set(child, field::VISIBILITY, Visibility::Hidden);
        render(&mut tree, root, &mut backend);
        assert_eq!(backend.drawn(), [root]);
    }

    #[test]
    fn render_transform_pivots_on_origin() {
        let mut tree = ElementTree::new();
        let mut backend = RecordingBackend::default();
        let root = filled(&mut tree, ElementKind::overlay());
        tree.set(root, field::WIDTH, Some(100.0));
        tree.set(root, field::HEIGHT, Some(50.0));
        tree.set(root, field::RENDER_TRANSFORM, Some(Affine::scale(2.0)));
        tree.set(root, field::RENDER_TRANSFORM_ORIGIN, Point::new(0.5, 0.5));
        render(&mut tree, root, &mut backend);

        let Some(Call::Draw { transform, .. }) = backend.calls.first() else {
            panic!("expected a draw");
        };
        // The pivot stays put; the corner moves away from it.
        assert_eq!(*transform * Point::new(50.0, 25.0), Point::new(50.0, 25.0));
        assert_eq!(*transform * Point::ZERO, Point::new(-50.0, -25.0));
    }

    #[test]
    fn text_draws_glyph_run() {
        let mut tree = ElementTree::new();
        let mut backend = RecordingBackend::default();
        let text = tree.create_element(ElementKind::text("Menu", FontSpec::default()));
        tree.set(text, field::TEXT_COLOR, Color::BLACK);
        render(&mut tree, text, &mut backend);
        let Some(Call::Draw {
            glyphs: Some(run),
            vertices,
            ..
        }) = backend.calls.first()
        else {
            panic!("expected a glyph draw");
        };
        assert!(vertices.is_empty());
        assert_eq!(run.color, Color::BLACK);
        assert_eq!(run.align, HorizontalAlignment::Left);
    }

    #[test]
    fn opacity_mask_renders_through_target() {
        let mut tree = ElementTree::new();
        let mut backend = RecordingBackend::default();
        let root = filled(&mut tree, ElementKind::overlay());
        let leaf = tree.create_element(ElementKind::input_leaf());
        tree.add_child(root, leaf).unwrap();
        tree.set(leaf, field::TEXTURE, Some(String::from("poster.png")));
        tree.set(root, field::WIDTH, Some(200.0));
        tree.set(root, field::HEIGHT, Some(100.0));
        tree.set(root, field::MARGIN, kurbo::Insets::uniform(10.0));
        tree.set(root, field::OPACITY, 0.5);
        tree.set(root, field::OPACITY_MASK, Some(Brush::Solid(Color::WHITE)));

        assert_eq!(render(&mut tree, root, &mut backend), 3);
        let target = match &backend.calls[0] {
            Call::PushTarget(target, bounds) => {
                assert_eq!(*bounds, kurbo::Rect::new(10.0, 10.0, 210.0, 110.0));
                *target
            }
            other => panic!("expected a target push, got {other:?}"),
        };
        // Content is drawn in target space at full opacity.
        match &backend.calls[1] {
            Call::Draw {
                transform, opacity, ..
            } => {
                assert_eq!(*transform * Point::new(10.0, 10.0), Point::ZERO);
                assert_eq!(*opacity, 1.0);
            }
            other => panic!("expected a draw, got {other:?}"),
        }
        assert!(matches!(backend.calls[3], Call::PopTarget));
        match &backend.calls[4] {
            Call::Draw {
                texture,
                opacity,
                masked,
                ..
            } => {
                assert_eq!(*texture, Some(target));
                assert_eq!(*opacity, 0.5);
                assert!(*masked);
            }
            other => panic!("expected the composite draw, got {other:?}"),
        }
    }
}
