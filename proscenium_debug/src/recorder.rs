// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Rich events ([`on_element_changes`](TraceSink::on_element_changes)) store
//! only the count.

use proscenium_core::backend::AssetKind;
use proscenium_core::layout::LayoutStats;
use proscenium_core::resource::{AssetEvent, AssetOp};
use proscenium_core::trace::{
    ElementChange, FocusChangeEvent, FrameBeginEvent, FrameSummary, LayoutPassEvent,
    PhaseBeginEvent, PhaseEndEvent, PhaseKind, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_FRAME_BEGIN: u8 = 1;
const TAG_PHASE_BEGIN: u8 = 2;
const TAG_PHASE_END: u8 = 3;
const TAG_LAYOUT_PASS: u8 = 4;
const TAG_ASSET: u8 = 5;
const TAG_FOCUS_CHANGE: u8 = 6;
const TAG_FRAME_SUMMARY: u8 = 7;
const TAG_ELEMENT_CHANGES_COUNT: u8 = 8;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_option_u32(&mut self, v: Option<u32>) {
        self.write_u8(u8::from(v.is_some()));
        self.write_u32(v.unwrap_or(0));
    }

    fn write_phase(&mut self, p: PhaseKind) {
        self.write_u8(match p {
            PhaseKind::Evaluate => 0,
            PhaseKind::Layout => 1,
            PhaseKind::Build => 2,
            PhaseKind::Issue => 3,
        });
    }

    fn write_asset_kind(&mut self, k: AssetKind) {
        self.write_u8(match k {
            AssetKind::Texture => 0,
            AssetKind::VertexBuffer => 1,
            AssetKind::GlyphBuffer => 2,
            AssetKind::RenderTarget => 3,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.write_u8(TAG_FRAME_BEGIN);
        self.write_u64(e.frame_index);
        self.write_u32(e.element_count);
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.write_u8(TAG_PHASE_BEGIN);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_u64(e.seq);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.write_u8(TAG_PHASE_END);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_u64(e.seq);
    }

    fn on_layout_pass(&mut self, e: &LayoutPassEvent) {
        self.write_u8(TAG_LAYOUT_PASS);
        self.write_u64(e.frame_index);
        self.write_u32(e.root_index);
        self.write_u64(e.stats.pass);
        self.write_u32(e.stats.measured);
        self.write_u32(e.stats.arranged);
    }

    fn on_asset(&mut self, frame_index: u64, e: &AssetEvent) {
        self.write_u8(TAG_ASSET);
        self.write_u64(frame_index);
        self.write_u32(e.element_index);
        self.write_asset_kind(e.kind);
        self.write_u8(match e.op {
            AssetOp::Allocate => 0,
            AssetOp::Release => 1,
        });
        self.write_u64(e.handle);
    }

    fn on_focus_change(&mut self, frame_index: u64, e: &FocusChangeEvent) {
        self.write_u8(TAG_FOCUS_CHANGE);
        self.write_u64(frame_index);
        self.write_option_u32(e.from);
        self.write_option_u32(e.to);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.write_u8(TAG_FRAME_SUMMARY);
        self.write_u64(s.frame_index);
        self.write_u8(u8::from(s.layout_ran));
        self.write_u32(s.measured);
        self.write_u32(s.arranged);
        self.write_u32(s.draws);
        self.write_u32(s.allocations);
        self.write_u32(s.releases);
        self.write_u32(s.hidden);
        self.write_u32(s.unhidden);
        self.write_u32(s.focus_changes);
    }

    fn on_element_changes(&mut self, frame_index: u64, changes: &[ElementChange]) {
        self.write_u8(TAG_ELEMENT_CHANGES_COUNT);
        self.write_u64(frame_index);
        self.write_u32(u32::try_from(changes.len()).unwrap_or(u32::MAX));
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`FrameBeginEvent`].
    FrameBegin(FrameBeginEvent),
    /// A [`PhaseBeginEvent`].
    PhaseBegin(PhaseBeginEvent),
    /// A [`PhaseEndEvent`].
    PhaseEnd(PhaseEndEvent),
    /// A [`LayoutPassEvent`].
    LayoutPass(LayoutPassEvent),
    /// An [`AssetEvent`].
    Asset {
        /// Frame counter.
        frame_index: u64,
        /// The asset operation.
        event: AssetEvent,
    },
    /// A [`FocusChangeEvent`].
    FocusChange {
        /// Frame counter.
        frame_index: u64,
        /// The focus change.
        event: FocusChangeEvent,
    },
    /// A [`FrameSummary`].
    FrameSummary(FrameSummary),
    /// Element-change count for a frame.
    ElementChangesCount {
        /// Frame counter.
        frame_index: u64,
        /// Number of element changes.
        count: u32,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
///
/// Stops at the first unknown tag or truncated record.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?;
        self.pos += N;
        bytes.try_into().ok()
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[v]| v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_option_u32(&mut self) -> Option<Option<u32>> {
        let present = self.read_u8()?;
        let val = self.read_u32()?;
        Some((present != 0).then_some(val))
    }

    fn read_phase(&mut self) -> Option<PhaseKind> {
        Some(match self.read_u8()? {
            0 => PhaseKind::Evaluate,
            1 => PhaseKind::Layout,
            2 => PhaseKind::Build,
            _ => PhaseKind::Issue,
        })
    }

    fn read_asset_kind(&mut self) -> Option<AssetKind> {
        Some(match self.read_u8()? {
            0 => AssetKind::Texture,
            1 => AssetKind::VertexBuffer,
            2 => AssetKind::GlyphBuffer,
            _ => AssetKind::RenderTarget,
        })
    }

    fn decode_frame_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameBegin(FrameBeginEvent {
            frame_index: self.read_u64()?,
            element_count: self.read_u32()?,
        }))
    }

    fn decode_phase_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseBegin(PhaseBeginEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            seq: self.read_u64()?,
        }))
    }

    fn decode_phase_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseEnd(PhaseEndEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            seq: self.read_u64()?,
        }))
    }

    fn decode_layout_pass(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::LayoutPass(LayoutPassEvent {
            frame_index: self.read_u64()?,
            root_index: self.read_u32()?,
            stats: LayoutStats {
                pass: self.read_u64()?,
                measured: self.read_u32()?,
                arranged: self.read_u32()?,
            },
        }))
    }

    fn decode_asset(&mut self) -> Option<RecordedEvent> {
        let frame_index = self.read_u64()?;
        let event = AssetEvent {
            element_index: self.read_u32()?,
            kind: self.read_asset_kind()?,
            op: if self.read_u8()? == 0 {
                AssetOp::Allocate
            } else {
                AssetOp::Release
            },
            handle: self.read_u64()?,
        };
        Some(RecordedEvent::Asset { frame_index, event })
    }

    fn decode_focus_change(&mut self) -> Option<RecordedEvent> {
        let frame_index = self.read_u64()?;
        let event = FocusChangeEvent {
            from: self.read_option_u32()?,
            to: self.read_option_u32()?,
        };
        Some(RecordedEvent::FocusChange { frame_index, event })
    }

    fn decode_frame_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameSummary(FrameSummary {
            frame_index: self.read_u64()?,
            layout_ran: self.read_u8()? != 0,
            measured: self.read_u32()?,
            arranged: self.read_u32()?,
            draws: self.read_u32()?,
            allocations: self.read_u32()?,
            releases: self.read_u32()?,
            hidden: self.read_u32()?,
            unhidden: self.read_u32()?,
            focus_changes: self.read_u32()?,
        }))
    }

    fn decode_element_changes_count(&mut self) -> Option<RecordedEvent> {
        let frame_index = self.read_u64()?;
        let count = self.read_u32()?;
        Some(RecordedEvent::ElementChangesCount { frame_index, count })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_FRAME_BEGIN => self.decode_frame_begin(),
            TAG_PHASE_BEGIN => self.decode_phase_begin(),
            TAG_PHASE_END => self.decode_phase_end(),
            TAG_LAYOUT_PASS => self.decode_layout_pass(),
            TAG_ASSET => self.decode_asset(),
            TAG_FOCUS_CHANGE => self.decode_focus_change(),
            TAG_FRAME_SUMMARY => self.decode_frame_summary(),
            TAG_ELEMENT_CHANGES_COUNT => self.decode_element_changes_count(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proscenium_core::trace::ElementField;

    fn sample_summary() -> FrameSummary {
        FrameSummary {
            frame_index: 7,
            layout_ran: true,
            measured: 12,
            arranged: 12,
            draws: 9,
            allocations: 4,
            releases: 1,
            hidden: 2,
            unhidden: 0,
            focus_changes: 1,
        }
    }

    #[test]
    fn phase_events_keep_sequence_numbers() {
        let mut rec = RecorderSink::new();
        rec.on_phase_begin(&PhaseBeginEvent {
            frame_index: 5,
            phase: PhaseKind::Layout,
            seq: 20,
        });
        rec.on_phase_end(&PhaseEndEvent {
            frame_index: 5,
            phase: PhaseKind::Layout,
            seq: 21,
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 2);
        match &events[0] {
            RecordedEvent::PhaseBegin(e) => {
                assert_eq!(e.phase, PhaseKind::Layout);
                assert_eq!(e.seq, 20);
            }
            other => panic!("expected PhaseBegin, got {other:?}"),
        }
        match &events[1] {
            RecordedEvent::PhaseEnd(e) => assert_eq!(e.seq, 21),
            other => panic!("expected PhaseEnd, got {other:?}"),
        }
    }

    #[test]
    fn frame_summary_survives_recording() {
        let mut rec = RecorderSink::new();
        rec.on_frame_summary(&sample_summary());
        let events: Vec<_> = decode(rec.as_bytes()).collect();
        match &events[..] {
            [RecordedEvent::FrameSummary(s)] => assert_eq!(*s, sample_summary()),
            other => panic!("expected one FrameSummary, got {other:?}"),
        }
    }

    #[test]
    fn focus_change_keeps_missing_ends() {
        let mut rec = RecorderSink::new();
        let orig = FocusChangeEvent {
            from: Some(3),
            to: None,
        };
        rec.on_focus_change(2, &orig);
        let events: Vec<_> = decode(rec.as_bytes()).collect();
        match &events[..] {
            [RecordedEvent::FocusChange { frame_index, event }] => {
                assert_eq!(*frame_index, 2);
                assert_eq!(*event, orig);
            }
            other => panic!("expected one FocusChange, got {other:?}"),
        }
    }

    #[test]
    fn mixed_stream_decodes_in_order() {
        let mut rec = RecorderSink::new();
        rec.on_frame_begin(&FrameBeginEvent {
            frame_index: 7,
            element_count: 12,
        });
        rec.on_asset(
            7,
            &AssetEvent {
                element_index: 4,
                kind: AssetKind::RenderTarget,
                op: AssetOp::Allocate,
                handle: 11,
            },
        );
        rec.on_element_changes(
            7,
            &[
                ElementChange {
                    element_index: 0,
                    field: ElementField::Layout,
                },
                ElementChange {
                    element_index: 1,
                    field: ElementField::Hidden,
                },
            ],
        );
        rec.on_frame_summary(&sample_summary());

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], RecordedEvent::FrameBegin(_)));
        match &events[1] {
            RecordedEvent::Asset { event, .. } => {
                assert_eq!(event.kind, AssetKind::RenderTarget);
                assert_eq!(event.handle, 11);
            }
            other => panic!("expected Asset, got {other:?}"),
        }
        assert!(matches!(
            events[2],
            RecordedEvent::ElementChangesCount { count: 2, .. }
        ));
        assert!(matches!(events[3], RecordedEvent::FrameSummary(_)));
    }

    #[test]
    fn truncated_record_stops_decoding() {
        let mut rec = RecorderSink::new();
        rec.on_frame_summary(&sample_summary());
        let bytes = rec.into_bytes();
        assert_eq!(decode(&bytes[..bytes.len() - 1]).count(), 0);
        assert_eq!(decode(&[]).count(), 0);
    }
}
