// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the frame pipeline.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! [`Screen::frame`](crate::screen::Screen::frame) calls at each stage. All
//! method bodies default to no-ops, so implementing only the events you care
//! about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! [`FrameSummaryBuilder`] collects counters during a frame and produces a
//! [`FrameSummary`] at the end. The summary is computed whether or not the
//! `trace` feature is on.
//!
//! The core has no clock, so phase events carry a per-screen sequence number
//! instead of a timestamp; sinks that need wall time stamp events on arrival.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) — gates [`ElementChange`] events and the
//!   corresponding `TraceSink` method.

use crate::layout::LayoutStats;
use crate::resource::{AssetEvent, AssetOp};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which phase of the frame pipeline is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Dirty-channel draining, visibility and lifecycle reconciliation.
    Evaluate,
    /// Measure and arrange.
    Layout,
    /// Rebuilding cached draw data and allocating assets.
    Build,
    /// Issuing draw calls to the backend.
    Issue,
}

/// Which aspect of an element changed.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementField {
    /// Layout was invalidated.
    Layout,
    /// Cached draw data became stale.
    Geometry,
    /// The element became hidden.
    Hidden,
    /// The element became visible.
    Unhidden,
    /// The element was created.
    Added,
    /// The element was destroyed.
    Removed,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a frame starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameBeginEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Live elements at the start of the frame.
    pub element_count: u32,
}

/// Marks the beginning of a pipeline phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseBeginEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is starting.
    pub phase: PhaseKind,
    /// Sequence number, increasing across all phase events of a screen.
    pub seq: u64,
}

/// Marks the end of a pipeline phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseEndEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is ending.
    pub phase: PhaseKind,
    /// Sequence number, increasing across all phase events of a screen.
    pub seq: u64,
}

/// Emitted after a layout pass ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutPassEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Index of the element the pass started at.
    pub root_index: u32,
    /// Pass counters.
    pub stats: LayoutStats,
}

/// Emitted when the focused element changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FocusChangeEvent {
    /// Index of the element that lost focus, if any.
    pub from: Option<u32>,
    /// Index of the element that gained focus, if any.
    pub to: Option<u32>,
}

/// Per-frame summary produced by [`FrameSummaryBuilder`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameSummary {
    /// Frame counter.
    pub frame_index: u64,
    /// Whether a layout pass ran.
    pub layout_ran: bool,
    /// Elements measured.
    pub measured: u32,
    /// Elements arranged.
    pub arranged: u32,
    /// Draw calls issued.
    pub draws: u32,
    /// Assets allocated.
    pub allocations: u32,
    /// Assets released.
    pub releases: u32,
    /// Elements that became hidden.
    pub hidden: u32,
    /// Elements that became visible.
    pub unhidden: u32,
    /// Focus changes.
    pub focus_changes: u32,
}

/// A per-frame element change record.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementChange {
    /// Index of the element that changed.
    pub element_index: u32,
    /// What changed.
    pub field: ElementField,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the frame pipeline.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a frame starts.
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        _ = e;
    }

    /// Called at the beginning of a pipeline phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a pipeline phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called after a layout pass.
    fn on_layout_pass(&mut self, e: &LayoutPassEvent) {
        _ = e;
    }

    /// Called for every asset allocation and release.
    fn on_asset(&mut self, frame_index: u64, e: &AssetEvent) {
        _ = (frame_index, e);
    }

    /// Called when the focused element changes.
    fn on_focus_change(&mut self, frame_index: u64, e: &FocusChangeEvent) {
        _ = (frame_index, e);
    }

    /// Called with a per-frame summary.
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        _ = s;
    }

    /// Called with per-frame element changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_element_changes(&mut self, frame_index: u64, changes: &[ElementChange]) {
        _ = (frame_index, changes);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`FrameBeginEvent`].
    #[inline]
    pub fn frame_begin(&mut self, e: &FrameBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseBeginEvent`].
    #[inline]
    pub fn phase_begin(&mut self, e: &PhaseBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseEndEvent`].
    #[inline]
    pub fn phase_end(&mut self, e: &PhaseEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LayoutPassEvent`].
    #[inline]
    pub fn layout_pass(&mut self, e: &LayoutPassEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_layout_pass(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AssetEvent`].
    #[inline]
    pub fn asset(&mut self, frame_index: u64, e: &AssetEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_asset(frame_index, e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = (frame_index, e);
        }
    }

    /// Emits a [`FocusChangeEvent`].
    #[inline]
    pub fn focus_change(&mut self, frame_index: u64, e: &FocusChangeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_focus_change(frame_index, e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = (frame_index, e);
        }
    }

    /// Emits a [`FrameSummary`].
    #[inline]
    pub fn frame_summary(&mut self, s: &FrameSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_frame_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits element changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn element_changes(&mut self, frame_index: u64, changes: &[ElementChange]) {
        if let Some(s) = &mut self.sink {
            s.on_element_changes(frame_index, changes);
        }
    }
}

// ---------------------------------------------------------------------------
// FrameSummaryBuilder
// ---------------------------------------------------------------------------

/// Collects counters during a frame and produces a [`FrameSummary`].
#[derive(Debug)]
pub struct FrameSummaryBuilder {
    summary: FrameSummary,
}

impl FrameSummaryBuilder {
    /// Starts building a summary for the given frame.
    #[must_use]
    pub fn new(frame: &FrameBeginEvent) -> Self {
        Self {
            summary: FrameSummary {
                frame_index: frame.frame_index,
                ..FrameSummary::default()
            },
        }
    }

    /// Records a layout pass.
    pub fn layout_pass(&mut self, e: &LayoutPassEvent) {
        self.summary.layout_ran = true;
        self.summary.measured += e.stats.measured;
        self.summary.arranged += e.stats.arranged;
    }

    /// Records an asset operation.
    pub fn asset(&mut self, e: &AssetEvent) {
        match e.op {
            AssetOp::Allocate => self.summary.allocations += 1,
            AssetOp::Release => self.summary.releases += 1,
        }
    }

    /// Records a focus change.
    pub fn focus_change(&mut self) {
        self.summary.focus_changes += 1;
    }

    /// Records visibility transitions.
    pub fn visibility(&mut self, hidden: usize, unhidden: usize) {
        self.summary.hidden += u32::try_from(hidden).unwrap_or(u32::MAX);
        self.summary.unhidden += u32::try_from(unhidden).unwrap_or(u32::MAX);
    }

    /// Records issued draw calls.
    pub fn draws(&mut self, count: u32) {
        self.summary.draws += count;
    }

    /// Consumes the builder and produces the final [`FrameSummary`].
    #[must_use]
    pub fn finish(self) -> FrameSummary {
        self.summary
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
