// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Traced frame loop over a scrolling menu.
//!
//! Builds a screen with a scrollable list of posters, feeds it a short
//! sequence of remote-control keys, and runs one frame after each. Events go
//! to both a [`PrettyPrintSink`] on stdout and a [`RecorderSink`]; the
//! recording is exported as a Chrome trace JSON file at the end.

use std::fs::File;
use std::io::BufWriter;

use kurbo::{Insets, Size};
use proscenium_core::config::SkinConfig;
use proscenium_core::element::{ElementId, ElementKind, ElementTree, Orientation, field};
use proscenium_core::input::Key;
use proscenium_core::paint::{Brush, Color};
use proscenium_core::resource::AssetEvent;
use proscenium_core::screen::Screen;
use proscenium_core::text::{FontSpec, TextMetrics};
use proscenium_core::trace::{
    ElementChange, FocusChangeEvent, FrameBeginEvent, FrameSummary, LayoutPassEvent,
    PhaseBeginEvent, PhaseEndEvent, TraceSink, Tracer,
};
use proscenium_debug::pretty::PrettyPrintSink;
use proscenium_debug::recorder::RecorderSink;
use proscenium_render::PlanRecorder;

const POSTERS: usize = 8;

/// Forwards every event to both sinks.
struct Tee {
    pretty: PrettyPrintSink,
    recorder: RecorderSink,
}

impl TraceSink for Tee {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.pretty.on_frame_begin(e);
        self.recorder.on_frame_begin(e);
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.pretty.on_phase_begin(e);
        self.recorder.on_phase_begin(e);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.pretty.on_phase_end(e);
        self.recorder.on_phase_end(e);
    }

    fn on_layout_pass(&mut self, e: &LayoutPassEvent) {
        self.pretty.on_layout_pass(e);
        self.recorder.on_layout_pass(e);
    }

    fn on_asset(&mut self, frame_index: u64, e: &AssetEvent) {
        self.pretty.on_asset(frame_index, e);
        self.recorder.on_asset(frame_index, e);
    }

    fn on_focus_change(&mut self, frame_index: u64, e: &FocusChangeEvent) {
        self.pretty.on_focus_change(frame_index, e);
        self.recorder.on_focus_change(frame_index, e);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.pretty.on_frame_summary(s);
        self.recorder.on_frame_summary(s);
    }

    fn on_element_changes(&mut self, frame_index: u64, changes: &[ElementChange]) {
        self.pretty.on_element_changes(frame_index, changes);
        self.recorder.on_element_changes(frame_index, changes);
    }
}

/// Fixed-pitch stand-in for a font service.
struct Monospace;

impl TextMetrics for Monospace {
    fn measure(&self, font: &FontSpec, text: &str) -> Size {
        Size::new(
            text.chars().count() as f64 * font.size * 0.5,
            self.line_height(font),
        )
    }

    fn line_height(&self, font: &FontSpec) -> f64 {
        font.size * 1.2
    }
}

fn build_menu() -> (Screen, ElementId) {
    let mut tree = ElementTree::new();
    let root = tree.create_element(ElementKind::stack(Orientation::Vertical));
    tree.set(root, field::BACKGROUND, Some(Brush::Solid(Color::BLACK)));

    let title = tree.create_element(ElementKind::text("Movies", FontSpec::new("sans", 32.0)));
    tree.set(title, field::TEXT_COLOR, Color::WHITE);
    tree.set(title, field::MARGIN, Insets::new(40.0, 20.0, 40.0, 20.0));
    tree.add_child(root, title).expect("title has no name");

    let list = tree.create_element(ElementKind::items_host(Orientation::Vertical, true));
    tree.set(list, field::HEIGHT, Some(300.0));
    tree.add_child(root, list).expect("list has no name");

    let mut first = None;
    for i in 0..POSTERS {
        let poster = tree.create_element(ElementKind::input_leaf());
        tree.set(poster, field::NATURAL_SIZE, Size::new(400.0, 90.0));
        tree.set(poster, field::MARGIN, Insets::uniform(5.0));
        tree.set(poster, field::FOCUSABLE, true);
        tree.set(poster, field::TEXTURE, Some(format!("posters/{i}.png")));
        tree.add_child(list, poster).expect("poster has no name");
        if first.is_none() {
            first = Some(poster);
        }
    }

    let screen = Screen::new(tree, root, SkinConfig::HD);
    (screen, first.expect("menu has posters"))
}

fn main() {
    let mut sink = Tee {
        pretty: PrettyPrintSink::new(Box::new(std::io::stdout())),
        recorder: RecorderSink::new(),
    };
    let mut backend = PlanRecorder::new();
    let (mut screen, first) = build_menu();

    screen.show(&mut backend);
    screen.tree_mut().set(first, field::HAS_FOCUS, true);
    screen.frame(&mut backend, &Monospace, &mut Tracer::new(&mut sink));

    let keys = [
        Key::Down,
        Key::Down,
        Key::Down,
        Key::Down,
        Key::Up,
        Key::Right,
        Key::Enter,
    ];
    for key in keys {
        let mut key = key;
        screen.dispatch_key(&mut key);
        screen.frame(&mut backend, &Monospace, &mut Tracer::new(&mut sink));
        println!(
            "  plan: {} items, {} live resources",
            backend.take_plan().items.len(),
            backend.resources().len(),
        );
    }

    screen.close(&mut backend);
    println!("after close: {} live resources", backend.resources().len());

    // -- export Chrome trace -----------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    proscenium_debug::chrome::export(sink.recorder.as_bytes(), &mut writer)
        .expect("failed to write Chrome trace");

    println!("Wrote {path} ({} frames)", screen.frame_index());
}
