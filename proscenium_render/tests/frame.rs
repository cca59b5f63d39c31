// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end frames through a [`Screen`] into a [`PlanRecorder`].

use kurbo::{Insets, Size};
use proscenium_core::backend::AssetKind;
use proscenium_core::config::SkinConfig;
use proscenium_core::element::{ElementId, ElementKind, ElementTree, HorizontalAlignment, field};
use proscenium_core::input::Key;
use proscenium_core::layout::LayoutContext;
use proscenium_core::paint::{Brush, Color, GradientStop};
use proscenium_core::screen::Screen;
use proscenium_core::text::{FontSpec, TextMetrics};
use proscenium_core::trace::{FrameSummary, Tracer};
use proscenium_render::{BlendMode, PlanRecorder};

/// 10 units per character, 20 per line.
struct Monospace;

impl TextMetrics for Monospace {
    fn measure(&self, font: &FontSpec, text: &str) -> Size {
        Size::new(text.chars().count() as f64 * 10.0, self.line_height(font))
    }

    fn line_height(&self, _font: &FontSpec) -> f64 {
        20.0
    }
}

fn frame(screen: &mut Screen, recorder: &mut PlanRecorder) -> FrameSummary {
    screen.frame(recorder, &Monospace, &mut Tracer::none())
}

#[test]
fn content_host_adds_margins_to_text() {
    let mut tree = ElementTree::new();
    let host = tree.create_element(ElementKind::ContentHost);
    let text = tree.create_element(ElementKind::text("Now Playing!", FontSpec::default()));
    tree.add_child(host, text).unwrap();
    tree.set(host, field::MARGIN, Insets::uniform(4.0));

    let mut cx = LayoutContext::new(&SkinConfig::HD, &Monospace);
    cx.begin_pass();
    let total = tree.measure(host, Size::new(1280.0, 720.0), &mut cx);
    assert_eq!(total, Size::new(128.0, 28.0));
    assert_eq!(tree.desired_size(host), Size::new(120.0, 20.0));
}

#[test]
fn explicit_width_with_auto_height() {
    let mut tree = ElementTree::new();
    let host = tree.create_element(ElementKind::ContentHost);
    let leaf = tree.create_element(ElementKind::input_leaf());
    tree.add_child(host, leaf).unwrap();
    tree.set(host, field::WIDTH, Some(100.0));
    tree.set(leaf, field::NATURAL_SIZE, Size::new(60.0, 30.0));

    let mut cx = LayoutContext::new(&SkinConfig::HD, &Monospace);
    cx.begin_pass();
    assert_eq!(
        tree.measure(host, Size::new(1280.0, 720.0), &mut cx),
        Size::new(100.0, 30.0)
    );
}

struct Row {
    screen: Screen,
    from: ElementId,
    other: ElementId,
}

fn row(from_x: f64, other_x: f64) -> Row {
    let mut tree = ElementTree::new();
    let root = tree.create_element(ElementKind::overlay());
    let mut leaf = |x: f64| {
        let e = tree.create_element(ElementKind::input_leaf());
        tree.set(e, field::NATURAL_SIZE, Size::new(50.0, 40.0));
        tree.set(e, field::FOCUSABLE, true);
        tree.set(e, field::HORIZONTAL_ALIGNMENT, HorizontalAlignment::Left);
        tree.set(e, field::MARGIN, Insets::new(x, 0.0, 0.0, 0.0));
        tree.add_child(root, e).unwrap();
        e
    };
    let from = leaf(from_x);
    let other = leaf(other_x);
    Row {
        screen: Screen::new(tree, root, SkinConfig::HD),
        from,
        other,
    }
}

#[test]
fn left_arrow_moves_focus_only_leftwards() {
    let mut recorder = PlanRecorder::new();

    let Row {
        mut screen,
        from,
        other,
    } = row(200.0, 100.0);
    frame(&mut screen, &mut recorder);
    assert_eq!(screen.tree().actual_position(other).x, 100.0);
    screen.tree_mut().set(from, field::HAS_FOCUS, true);
    let mut key = Key::Left;
    screen.dispatch_key(&mut key);
    assert_eq!(key, Key::None);
    assert_eq!(screen.tree().focused(), Some(other));

    let Row {
        mut screen, from, ..
    } = row(200.0, 300.0);
    frame(&mut screen, &mut recorder);
    screen.tree_mut().set(from, field::HAS_FOCUS, true);
    let mut key = Key::Left;
    screen.dispatch_key(&mut key);
    assert_eq!(key, Key::Left, "nothing to the left leaves the key unconsumed");
    assert_eq!(screen.tree().focused(), Some(from));
}

fn masked_poster() -> (Screen, ElementId, ElementId) {
    let mut tree = ElementTree::new();
    let root = tree.create_element(ElementKind::overlay());
    let panel = tree.create_element(ElementKind::overlay());
    let poster = tree.create_element(ElementKind::input_leaf());
    tree.add_child(root, panel).unwrap();
    tree.add_child(panel, poster).unwrap();
    tree.set(panel, field::WIDTH, Some(300.0));
    tree.set(panel, field::HEIGHT, Some(200.0));
    tree.set(panel, field::BACKGROUND, Some(Brush::Solid(Color::BLACK)));
    tree.set(
        panel,
        field::OPACITY_MASK,
        Some(Brush::LinearGradient {
            start: kurbo::Point::new(0.0, 0.0),
            end: kurbo::Point::new(0.0, 1.0),
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: Color::WHITE,
                },
                GradientStop {
                    offset: 1.0,
                    color: Color::TRANSPARENT,
                },
            ],
        }),
    );
    tree.set(poster, field::TEXTURE, Some(String::from("poster.png")));
    tree.set(poster, field::NATURAL_SIZE, Size::new(300.0, 200.0));
    (Screen::new(tree, root, SkinConfig::HD), panel, poster)
}

#[test]
fn opacity_mask_composites_an_offscreen_target() {
    let (mut screen, panel, poster) = masked_poster();
    let mut recorder = PlanRecorder::new();
    screen.show(&mut recorder);
    let summary = frame(&mut screen, &mut recorder);
    assert_eq!(summary.draws, 3);

    let plan = recorder.take_plan();
    let target = plan.items[0]
        .target
        .expect("content is drawn offscreen first");
    let offscreen: Vec<_> = plan.items_in(Some(target)).map(|i| i.element).collect();
    assert_eq!(offscreen, [panel, poster]);
    assert_eq!(plan.elements(), [panel]);

    let composite = plan.items.last().unwrap();
    assert_eq!(composite.blend_mode, BlendMode::Masked);
    assert_eq!(composite.texture, Some(target));
    assert!(composite.mask.is_some());
    assert_eq!(
        recorder.resources().get(target).map(|e| e.kind),
        Some(AssetKind::RenderTarget)
    );
}

#[test]
fn hiding_and_closing_release_everything() {
    let (mut screen, panel, _) = masked_poster();
    let mut recorder = PlanRecorder::new();
    screen.show(&mut recorder);
    frame(&mut screen, &mut recorder);
    assert_eq!(recorder.resources().count(AssetKind::Texture), 1);

    screen
        .tree_mut()
        .set(panel, field::VISIBILITY, proscenium_core::element::Visibility::Hidden);
    let summary = frame(&mut screen, &mut recorder);
    assert_eq!(summary.draws, 0);
    // Persistent textures survive hiding.
    assert_eq!(recorder.resources().count(AssetKind::Texture), 1);
    assert_eq!(recorder.resources().count(AssetKind::RenderTarget), 0);

    screen.close(&mut recorder);
    assert!(recorder.resources().is_empty(), "{:?}", recorder.resources());
    assert_eq!(recorder.stray_releases(), 0);
}
