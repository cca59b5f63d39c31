// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Element invalidation is tracked per channel with [`understory_dirty`].
//!
//! # Propagation semantics
//!
//! - **Upward** — [`LAYOUT`] has dependency edges from parent to child, so
//!   marking an element with [`EagerPolicy`](understory_dirty::EagerPolicy)
//!   also marks every ancestor: a child's size change can change the size of
//!   everything above it. The element's own layout flag is raised at mark
//!   time; ancestors' flags are raised when the channel is drained.
//!
//! - **Downward** — [`VISIBILITY`] has edges from child to parent, so an
//!   eager mark reaches the whole subtree, whose effective visibility is
//!   inherited.
//!
//! - **Local-only** — [`GEOMETRY`] marks one element whose cached build
//!   data (background quad, glyph run) must be recomputed.
//!
//! - **Structural** — [`TOPOLOGY`] is marked on link changes and element
//!   creation.
//!
//! # Consumption
//!
//! [`ElementTree::evaluate`](crate::element::ElementTree::evaluate) drains
//! all channels and reports the result as
//! [`TreeChanges`](crate::element::TreeChanges);
//! [`ElementTree::update_layout`](crate::element::ElementTree::update_layout)
//! drains [`LAYOUT`] on its own before laying out.

use understory_dirty::Channel;

/// Measured size may have changed; propagates to ancestors.
pub const LAYOUT: Channel = Channel::new(0);

/// Cached build data is stale; local.
pub const GEOMETRY: Channel = Channel::new(1);

/// Visibility changed; propagates to descendants.
pub const VISIBILITY: Channel = Channel::new(2);

/// Tree topology changed.
pub const TOPOLOGY: Channel = Channel::new(3);
