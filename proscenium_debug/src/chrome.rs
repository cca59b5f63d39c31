// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Frame events carry no wall time, so phase sequence numbers stand in for
//! microsecond timestamps. Instant events take the sequence number of the
//! last phase event before them. The result shows phase order and nesting,
//! not durations.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut ts = 0_u64;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::FrameBegin(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "FrameBegin",
                    "cat": "Frame",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": e.frame_index,
                        "element_count": e.element_count,
                    }
                }));
            }
            RecordedEvent::PhaseBegin(e) => {
                ts = e.seq;
                events.push(json!({
                    "ph": "B",
                    "name": format!("{:?}", e.phase),
                    "cat": "Frame",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::PhaseEnd(e) => {
                ts = e.seq;
                events.push(json!({
                    "ph": "E",
                    "name": format!("{:?}", e.phase),
                    "cat": "Frame",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::LayoutPass(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "LayoutPass",
                    "cat": "Layout",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "pass": e.stats.pass,
                        "root": e.root_index,
                        "measured": e.stats.measured,
                        "arranged": e.stats.arranged,
                    }
                }));
            }
            RecordedEvent::Asset { frame_index, event } => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?}", event.op),
                    "cat": "Asset",
                    "ts": ts,
                    "pid": 0,
                    "tid": 1,
                    "s": "t",
                    "args": {
                        "frame_index": frame_index,
                        "element": event.element_index,
                        "kind": format!("{:?}", event.kind),
                        "handle": event.handle,
                    }
                }));
            }
            RecordedEvent::FocusChange { frame_index, event } => {
                events.push(json!({
                    "ph": "i",
                    "name": "FocusChange",
                    "cat": "Input",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": frame_index,
                        "from": event.from,
                        "to": event.to,
                    }
                }));
            }
            RecordedEvent::FrameSummary(s) => {
                events.push(json!({
                    "ph": "i",
                    "name": "FrameSummary",
                    "cat": "Summary",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": s.frame_index,
                        "layout_ran": s.layout_ran,
                        "measured": s.measured,
                        "arranged": s.arranged,
                        "draws": s.draws,
                        "allocations": s.allocations,
                        "releases": s.releases,
                        "hidden": s.hidden,
                        "unhidden": s.unhidden,
                        "focus_changes": s.focus_changes,
                    }
                }));
            }
            RecordedEvent::ElementChangesCount { frame_index, count } => {
                events.push(json!({
                    "ph": "i",
                    "name": "ElementChanges",
                    "cat": "Rich",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "frame_index": frame_index,
                        "count": count,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}
