// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use proscenium_core::resource::{AssetEvent, AssetOp};
use proscenium_core::trace::{
    ElementChange, FocusChangeEvent, FrameBeginEvent, FrameSummary, LayoutPassEvent,
    PhaseBeginEvent, PhaseEndEvent, PhaseKind, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn phase_name(phase: PhaseKind) -> &'static str {
    match phase {
        PhaseKind::Evaluate => "eval",
        PhaseKind::Layout => "layout",
        PhaseKind::Build => "build",
        PhaseKind::Issue => "issue",
    }
}

fn element(index: Option<u32>) -> String {
    index.map_or_else(|| String::from("-"), |i| format!("#{i}"))
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[frame] frame={} elements={}",
            e.frame_index, e.element_count,
        );
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:begin] frame={} {} seq={}",
            e.frame_index,
            phase_name(e.phase),
            e.seq,
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] frame={} {} seq={}",
            e.frame_index,
            phase_name(e.phase),
            e.seq,
        );
    }

    fn on_layout_pass(&mut self, e: &LayoutPassEvent) {
        let _ = writeln!(
            self.writer,
            "[layout] frame={} pass={} root=#{} measured={} arranged={}",
            e.frame_index, e.stats.pass, e.root_index, e.stats.measured, e.stats.arranged,
        );
    }

    fn on_asset(&mut self, frame_index: u64, e: &AssetEvent) {
        let op = match e.op {
            AssetOp::Allocate => "alloc",
            AssetOp::Release => "release",
        };
        let _ = writeln!(
            self.writer,
            "[asset:{op}] frame={frame_index} #{} {:?} handle={}",
            e.element_index, e.kind, e.handle,
        );
    }

    fn on_focus_change(&mut self, frame_index: u64, e: &FocusChangeEvent) {
        let _ = writeln!(
            self.writer,
            "[focus] frame={frame_index} {} -> {}",
            element(e.from),
            element(e.to),
        );
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] frame={} layout={} measured={} arranged={} draws={} \
             alloc={} release={} hidden={} unhidden={} focus={}",
            s.frame_index,
            if s.layout_ran { "ran" } else { "idle" },
            s.measured,
            s.arranged,
            s.draws,
            s.allocations,
            s.releases,
            s.hidden,
            s.unhidden,
            s.focus_changes,
        );
    }

    fn on_element_changes(&mut self, frame_index: u64, changes: &[ElementChange]) {
        let _ = writeln!(
            self.writer,
            "[elements] frame={frame_index} changes={}",
            changes.len(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proscenium_core::backend::AssetKind;

    #[test]
    fn pretty_print_frame_begin() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_frame_begin(&FrameBeginEvent {
            frame_index: 1,
            element_count: 12,
        });
        let output = String::from_utf8(sink.into_writer()).unwrap();
        assert!(output.contains("[frame]"), "got: {output}");
        assert!(output.contains("frame=1"), "got: {output}");
        assert!(output.contains("elements=12"), "got: {output}");
    }

    #[test]
    fn pretty_print_asset_and_focus() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_asset(
            3,
            &AssetEvent {
                element_index: 5,
                kind: AssetKind::Texture,
                op: AssetOp::Release,
                handle: 9,
            },
        );
        sink.on_focus_change(
            3,
            &FocusChangeEvent {
                from: None,
                to: Some(4),
            },
        );
        let output = String::from_utf8(sink.into_writer()).unwrap();
        assert!(output.contains("[asset:release] frame=3 #5 Texture handle=9"), "got: {output}");
        assert!(output.contains("[focus] frame=3 - -> #4"), "got: {output}");
    }
}
