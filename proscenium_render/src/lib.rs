// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render-plan recording and backend resource tracking for proscenium.
//!
//! This crate sits between [`proscenium_core`]'s composition passes and a
//! GPU backend. It defines:
//!
//! - [`RenderItem`] — a single draw command in the render plan
//! - [`RenderPlan`] — an ordered list of draw commands for one frame
//! - [`ResourceKey`] and [`ResourceTable`] — opaque handles for
//!   backend-managed assets and the table of live ones
//! - [`PlanRecorder`] — a [`RenderBackend`](proscenium_core::backend::RenderBackend)
//!   that records a plan instead of drawing, for backends that translate
//!   plans in bulk and for end-to-end tests

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod plan;
mod recorder;
mod resource;

pub use plan::{BlendMode, GlyphItem, RenderItem, RenderPlan};
pub use recorder::PlanRecorder;
pub use resource::{ResourceEntry, ResourceKey, ResourceTable};
