// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element tree data model.
//!
//! An *element* is a node of a skin's visual tree. Each element has:
//!
//! - An identity ([`ElementId`]), a generational handle that becomes stale
//!   when the element is destroyed.
//! - Topology: parent, first-child and sibling links forming an ordered
//!   tree. The tree owns children; the parent link is a plain index.
//! - A [kind](ElementKind) fixing its layout and drawing behavior.
//! - **Attributes**, each an observable [`Property`](crate::property::Property)
//!   addressed through a [`Field`] selector (see [`field`]).
//! - **Computed state** written by layout and evaluation: desired size,
//!   actual rectangle, z-order, effective visibility.
//!
//! Elements are stored in struct-of-arrays layout with index handles.
//!
//! # Dirty tracking
//!
//! Attribute changes mark the corresponding [`dirty`](crate::dirty)
//! channel through built-in handlers attached at creation. Layout
//! invalidation propagates to ancestors, visibility to descendants.

mod evaluate;
pub mod field;
mod id;
mod kind;
mod naming;
mod store;
mod traverse;
mod trigger;
mod types;

pub use evaluate::TreeChanges;
pub use field::Field;
pub use id::{ElementId, INVALID};
pub use kind::{Arrangement, ContainerData, ElementKind, InputLeafData, ItemsHostData, TextData};
pub use naming::{NameError, ResourceDictionary, ResourceValue};
pub use store::ElementTree;
pub use traverse::{Ancestors, Children, Order, Visit};
pub use trigger::{EventTrigger, RoutedEvent, TriggerAction};
pub use types::{HorizontalAlignment, Orientation, VerticalAlignment, Visibility};
