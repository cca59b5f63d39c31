// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-screen frame driver.
//!
//! A [`Screen`] owns an element tree and one root, and runs the frame
//! pipeline in a fixed order:
//!
//! ```text
//! evaluate ─► visibility assets ─► update_layout ─► evaluate ─► build ─► issue
//! ```
//!
//! Input is dispatched between frames. Directional keys nobody consumed
//! move focus across the whole screen.

use alloc::vec::Vec;

use kurbo::Affine;

use crate::backend::RenderBackend;
use crate::compose::RenderContext;
use crate::config::SkinConfig;
use crate::element::{ElementId, ElementTree, TreeChanges};
use crate::input::Key;
use crate::layout::LayoutContext;
use crate::text::TextMetrics;
use crate::trace::{
    FrameBeginEvent, FrameSummary, FrameSummaryBuilder, LayoutPassEvent, PhaseBeginEvent,
    PhaseEndEvent, PhaseKind, Tracer,
};

/// A top-level element tree shown on one output.
#[derive(Debug)]
pub struct Screen {
    tree: ElementTree,
    root: ElementId,
    config: SkinConfig,
    frame_index: u64,
    seq: u64,
    layout_pass: u64,
    changes: TreeChanges,
}

impl Screen {
    /// Creates a screen showing `root` of `tree`.
    ///
    /// # Panics
    ///
    /// Panics if `root` is stale or has a parent.
    #[must_use]
    pub fn new(tree: ElementTree, root: ElementId, config: SkinConfig) -> Self {
        assert!(tree.parent(root).is_none(), "screen root must not have a parent");
        Self {
            tree,
            root,
            config,
            frame_index: 0,
            seq: 0,
            layout_pass: 0,
            changes: TreeChanges::default(),
        }
    }

    /// The element tree.
    #[must_use]
    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    /// The element tree, for mutation between frames.
    pub fn tree_mut(&mut self) -> &mut ElementTree {
        &mut self.tree
    }

    /// The root element.
    #[must_use]
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &SkinConfig {
        &self.config
    }

    /// Replaces the configuration and schedules a relayout.
    pub fn set_config(&mut self, config: SkinConfig) {
        self.config = config;
        self.tree.invalidate(self.root);
    }

    /// Frames run so far.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Opens the asset scopes of the whole tree.
    pub fn show(&mut self, backend: &mut dyn RenderBackend) {
        self.tree.allocate(self.root, backend);
    }

    /// Releases every asset of the tree.
    pub fn close(&mut self, backend: &mut dyn RenderBackend) {
        self.tree.deallocate(self.root, backend);
    }

    /// Dispatches a key through the tree, then uses an unconsumed
    /// directional key to move focus.
    pub fn dispatch_key(&mut self, key: &mut Key) {
        self.tree.dispatch_key(self.root, key);
        let (Some(dir), Some(focused)) = (key.direction(), self.tree.focused()) else {
            return;
        };
        if self
            .tree
            .move_focus(focused, dir, self.config.strict_focus)
            .is_some()
        {
            key.consume();
        }
    }

    /// Updates hover state for a pointer at `(x, y)` in output space.
    pub fn on_mouse_move(&mut self, x: f64, y: f64) {
        self.tree.on_mouse_move(self.root, x, y);
    }

    fn phase<R>(&mut self, tracer: &mut Tracer<'_>, phase: PhaseKind, f: impl FnOnce(&mut Self) -> R) -> R {
        self.seq += 1;
        tracer.phase_begin(&PhaseBeginEvent {
            frame_index: self.frame_index,
            phase,
            seq: self.seq,
        });
        let result = f(self);
        self.seq += 1;
        tracer.phase_end(&PhaseEndEvent {
            frame_index: self.frame_index,
            phase,
            seq: self.seq,
        });
        result
    }

    /// Runs one frame and returns its summary.
    pub fn frame(
        &mut self,
        backend: &mut dyn RenderBackend,
        text: &dyn TextMetrics,
        tracer: &mut Tracer<'_>,
    ) -> FrameSummary {
        self.frame_index += 1;
        let begin = FrameBeginEvent {
            frame_index: self.frame_index,
            element_count: u32::try_from(self.tree.element_count()).unwrap_or(u32::MAX),
        };
        tracer.frame_begin(&begin);
        let mut summary = FrameSummaryBuilder::new(&begin);

        // ---- evaluate ----
        self.phase(tracer, PhaseKind::Evaluate, |s| {
            s.tree.evaluate_into(&mut s.changes);
            s.apply_changes(backend);
        });
        summary.visibility(self.changes.hidden.len(), self.changes.unhidden.len());
        #[cfg(feature = "trace-rich")]
        self.trace_changes(tracer);

        // ---- layout ----
        let stats = self.phase(tracer, PhaseKind::Layout, |s| {
            let mut cx = LayoutContext::new(&s.config, text).after_pass(s.layout_pass);
            let ran = s.tree.update_layout(s.root, &mut cx);
            s.layout_pass = cx.stats().pass;
            ran.then(|| cx.stats())
        });
        if let Some(stats) = stats {
            let event = LayoutPassEvent {
                frame_index: self.frame_index,
                root_index: self.root.index(),
                stats,
            };
            tracer.layout_pass(&event);
            summary.layout_pass(&event);
        }

        // ---- build ----
        self.phase(tracer, PhaseKind::Build, |s| {
            // Arrange may have moved elements and triggers may have
            // changed visibility.
            s.tree.evaluate_into(&mut s.changes);
            s.apply_changes(backend);
            s.tree.build(s.root, backend);
        });
        summary.visibility(self.changes.hidden.len(), self.changes.unhidden.len());

        // ---- issue ----
        let draws = self.phase(tracer, PhaseKind::Issue, |s| {
            let mut cx = RenderContext::new(Affine::IDENTITY);
            s.tree.issue(s.root, &mut cx, backend)
        });
        summary.draws(draws);

        for event in self.tree.take_asset_events() {
            tracer.asset(self.frame_index, &event);
            summary.asset(&event);
        }
        let focus: Vec<_> = core::mem::take(&mut self.tree.focus_log);
        for event in &focus {
            tracer.focus_change(self.frame_index, event);
            summary.focus_change();
        }

        let summary = summary.finish();
        tracer.frame_summary(&summary);
        summary
    }

    /// Reconciles assets with visibility and lifecycle changes.
    fn apply_changes(&mut self, backend: &mut dyn RenderBackend) {
        for &idx in &self.changes.hidden {
            let id = self.tree.id_at(idx);
            self.tree.becomes_hidden(id, backend);
        }
        for &idx in &self.changes.unhidden {
            let id = self.tree.id_at(idx);
            self.tree.becomes_visible(id);
        }
        // New elements under an allocated parent join the allocation.
        for &idx in &self.changes.added {
            if !self.tree.is_live_index(idx) {
                continue;
            }
            let id = self.tree.id_at(idx);
            if self
                .tree
                .parent(id)
                .is_some_and(|p| self.tree.is_allocated(p))
            {
                self.tree.allocate(id, backend);
            }
        }
    }

    #[cfg(feature = "trace-rich")]
    fn trace_changes(&self, tracer: &mut Tracer<'_>) {
        use crate::trace::{ElementChange, ElementField};

        let c = &self.changes;
        let lists = [
            (&c.layout, ElementField::Layout),
            (&c.geometry, ElementField::Geometry),
            (&c.hidden, ElementField::Hidden),
            (&c.unhidden, ElementField::Unhidden),
            (&c.added, ElementField::Added),
            (&c.removed, ElementField::Removed),
        ];
        let changes: Vec<ElementChange> = lists
            .iter()
            .flat_map(|(list, field)| {
                list.iter().map(|&element_index| ElementChange {
                    element_index,
                    field: *field,
                })
            })
            .collect();
        if !changes.is_empty() {
            tracer.element_changes(self.frame_index, &changes);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use kurbo::Size;

    use super::*;
    use crate::backend::AssetKind;
    use crate::element::{
        ElementKind, HorizontalAlignment, Orientation, VerticalAlignment, Visibility, field,
    };
    use crate::paint::{Brush, Color};
    use crate::testing::{FixedMetrics, RecordingBackend};
    use crate::text::FontSpec;

    struct Menu {
        screen: Screen,
        items: [ElementId; 3],
    }

    fn menu() -> Menu {
        let mut tree = ElementTree::new();
        let root = tree.create_element(ElementKind::stack(Orientation::Vertical));
        tree.set(root, field::BACKGROUND, Some(Brush::Solid(Color::BLACK)));
        let items = core::array::from_fn(|_| {
            let item = tree.create_element(ElementKind::input_leaf());
            tree.set(item, field::NATURAL_SIZE, Size::new(200.0, 40.0));
            tree.set(item, field::FOCUSABLE, true);
            tree.set(item, field::TEXTURE, Some(String::from("item.png")));
            tree.add_child(root, item).unwrap();
            item
        });
        Menu {
            screen: Screen::new(tree, root, SkinConfig::default()),
            items,
        }
    }

    fn run(screen: &mut Screen, backend: &mut RecordingBackend) -> FrameSummary {
        screen.frame(backend, &FixedMetrics::default(), &mut Tracer::none())
    }

    #[test]
    fn first_frame_lays_out_builds_and_draws() {
        let Menu { mut screen, .. } = menu();
        let mut backend = RecordingBackend::default();
        screen.show(&mut backend);
        let summary = run(&mut screen, &mut backend);
        assert!(summary.layout_ran);
        assert_eq!(summary.measured, 4);
        assert_eq!(summary.draws, 4);
        // Three textures and the root's background.
        assert_eq!(summary.allocations, 4);
        assert_eq!(summary.frame_index, 1);
    }

    #[test]
    fn layout_passes_are_numbered_across_frames() {
        struct Passes(Vec<u64>);
        impl crate::trace::TraceSink for Passes {
            fn on_layout_pass(&mut self, e: &LayoutPassEvent) {
                self.0.push(e.stats.pass);
            }
        }

        let Menu { mut screen, items } = menu();
        let mut backend = RecordingBackend::default();
        let mut sink = Passes(Vec::new());
        let metrics = FixedMetrics::default();
        screen.frame(&mut backend, &metrics, &mut Tracer::new(&mut sink));
        screen.tree_mut().set(items[0], field::HEIGHT, Some(10.0));
        screen.frame(&mut backend, &metrics, &mut Tracer::new(&mut sink));
        if cfg!(feature = "trace") {
            assert_eq!(sink.0, [1, 2]);
        } else {
            assert!(sink.0.is_empty());
        }
    }

    #[test]
    fn idle_frame_only_redraws() {
        let Menu { mut screen, .. } = menu();
        let mut backend = RecordingBackend::default();
        run(&mut screen, &mut backend);
        let summary = run(&mut screen, &mut backend);
        assert!(!summary.layout_ran);
        assert_eq!(summary.allocations, 0);
        assert_eq!(summary.draws, 4);
    }

    #[test]
    fn hiding_releases_transients_only() {
        let Menu { mut screen, items } = menu();
        let mut backend = RecordingBackend::default();
        run(&mut screen, &mut backend);
        let root = screen.root();
        screen.tree_mut().set(root, field::VISIBILITY, Visibility::Hidden);
        let summary = run(&mut screen, &mut backend);
        assert_eq!(summary.hidden, 4);
        assert_eq!(summary.draws, 0);
        // The background buffer goes; textures stay.
        assert_eq!(summary.releases, 1);
        assert!(screen.tree().is_allocated(items[0]));

        screen.tree_mut().set(root, field::VISIBILITY, Visibility::Visible);
        let summary = run(&mut screen, &mut backend);
        assert_eq!(summary.unhidden, 4);
        assert_eq!(summary.allocations, 1);
        assert_eq!(summary.draws, 4);
    }

    #[test]
    fn unconsumed_arrows_move_focus() {
        let Menu { mut screen, items } = menu();
        let mut backend = RecordingBackend::default();
        run(&mut screen, &mut backend);
        screen.tree_mut().set(items[0], field::HAS_FOCUS, true);

        let mut key = Key::Down;
        screen.dispatch_key(&mut key);
        assert_eq!(key, Key::None);
        assert_eq!(screen.tree().focused(), Some(items[1]));

        let mut key = Key::Left;
        screen.dispatch_key(&mut key);
        assert_eq!(key, Key::Left);

        let summary = run(&mut screen, &mut backend);
        // Set on item 0, then moved to item 1.
        assert_eq!(summary.focus_changes, 2);
    }

    #[test]
    fn added_children_join_allocation() {
        let Menu { mut screen, .. } = menu();
        let mut backend = RecordingBackend::default();
        screen.show(&mut backend);
        run(&mut screen, &mut backend);

        let root = screen.root();
        let tree = screen.tree_mut();
        let label = tree.create_element(ElementKind::text("New", FontSpec::default()));
        tree.add_child(root, label).unwrap();
        run(&mut screen, &mut backend);
        assert!(screen.tree().is_allocated(label));

        screen.close(&mut backend);
        assert!(backend.live().is_empty());
    }

    fn kinds(screen: &Screen, id: ElementId) -> Vec<AssetKind> {
        let mut kinds: Vec<_> = screen.tree().owned_assets(id).map(|(k, _)| k).collect();
        kinds.sort_by_key(|k| *k != AssetKind::Texture);
        kinds
    }

    #[test]
    fn scrolled_out_items_are_not_drawn_and_drop_transients() {
        let mut tree = ElementTree::new();
        let root = tree.create_element(ElementKind::overlay());
        let list = tree.create_element(ElementKind::items_host(Orientation::Vertical, true));
        tree.set(list, field::WIDTH, Some(200.0));
        tree.set(list, field::HEIGHT, Some(40.0));
        tree.set(list, field::HORIZONTAL_ALIGNMENT, HorizontalAlignment::Left);
        tree.set(list, field::VERTICAL_ALIGNMENT, VerticalAlignment::Top);
        tree.add_child(root, list).unwrap();
        let items: [ElementId; 6] = core::array::from_fn(|_| {
            let item = tree.create_element(ElementKind::input_leaf());
            tree.set(item, field::NATURAL_SIZE, Size::new(200.0, 40.0));
            tree.set(item, field::TEXTURE, Some(String::from("poster.png")));
            tree.set(item, field::BACKGROUND, Some(Brush::Solid(Color::BLACK)));
            tree.add_child(list, item).unwrap();
            item
        });
        let mut screen = Screen::new(tree, root, SkinConfig::default());
        let mut backend = RecordingBackend::default();
        screen.show(&mut backend);

        let summary = run(&mut screen, &mut backend);
        let mut drawn = backend.drawn();
        drawn.dedup();
        assert_eq!(drawn, [items[0]]);
        assert_eq!(summary.hidden, 5);
        assert!(!screen.tree().is_in_viewport(items[1]));
        assert_eq!(kinds(&screen, items[1]), [AssetKind::Texture]);

        screen.tree_mut().set(list, field::SCROLL_OFFSET, 40.0);
        backend.calls.clear();
        let summary = run(&mut screen, &mut backend);
        let mut drawn = backend.drawn();
        drawn.dedup();
        assert_eq!(drawn, [items[1]]);
        assert_eq!((summary.hidden, summary.unhidden), (1, 1));
        // Item 0's background buffer goes, item 1 gets one.
        assert_eq!((summary.releases, summary.allocations), (1, 1));
        assert_eq!(kinds(&screen, items[0]), [AssetKind::Texture]);
        assert_eq!(
            kinds(&screen, items[1]),
            [AssetKind::Texture, AssetKind::VertexBuffer]
        );
        assert!(screen.tree().is_effectively_visible(items[0]));
    }
}
