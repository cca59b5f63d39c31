// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element tree, layout and render composition for 10-foot skins.
//!
//! `proscenium_core` holds the scene graph of a remote-driven media UI: a
//! tree of elements with observable attributes, a two-pass measure/arrange
//! layout engine, a render composition pass that turns the tree into
//! backend draw calls, per-element GPU asset ownership, and directional
//! focus navigation. It is `no_std` compatible (with `alloc`) and stores
//! elements struct-of-arrays with generational index handles.
//!
//! # Architecture
//!
//! Everything runs on one thread, once per frame:
//!
//! ```text
//!   Key / pointer input ──► ElementTree::dispatch_key / on_mouse_move
//!                                     │ (attribute writes)
//!                                     ▼
//!   ElementTree::evaluate() ──► TreeChanges ──► becomes_hidden / visible
//!                                     │
//!                                     ▼
//!   ElementTree::update_layout() ──► measure ──► arrange
//!                                                   │
//!                 ┌─────────────────────────────────┘
//!                 ▼
//!   ElementTree::build() ──► ElementTree::issue() ──► RenderBackend
//! ```
//!
//! [`Screen`](screen::Screen) drives that sequence for one root.
//!
//! **[`element`]** — Struct-of-arrays element tree with generational
//! handles, closed element kinds, typed attribute selectors, triggers,
//! naming scopes and resource dictionaries.
//!
//! **[`property`]** — Observable values whose subscribers run on every set.
//!
//! **[`dirty`]** — Multi-channel dirty tracking via `understory_dirty`.
//! LAYOUT propagates to ancestors, VISIBILITY to descendants; GEOMETRY is
//! local and TOPOLOGY structural.
//!
//! **[`layout`]** — Measure and arrange with zoom, margins, alignment and
//! layout transforms threaded through a [`LayoutContext`](layout::LayoutContext).
//!
//! **[`compose`]** — Build and issue passes with the cumulative
//! transform/opacity stack and offscreen opacity masks.
//!
//! **[`resource`]** — Per-element asset scopes over the
//! [`RenderBackend`](backend::RenderBackend) contract in [`backend`].
//!
//! **[`focus`]** and **[`input`]** — Directional focus search, key routing
//! and hover tracking.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! frame instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-element
//!   change events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod compose;
pub mod config;
pub mod dirty;
pub mod element;
pub mod focus;
pub mod input;
pub mod layout;
pub mod paint;
pub mod property;
pub mod resource;
pub mod screen;
pub mod text;
pub mod trace;

#[cfg(test)]
mod testing;
