// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Routed events and event triggers.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use super::id::ElementId;
use super::store::ElementTree;

/// A named UI event fired on one element.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RoutedEvent {
    /// First arrange of the element.
    Loaded,
    /// The element became the focused element.
    GotFocus,
    /// The element stopped being the focused element.
    LostFocus,
    /// The pointer entered the element's rectangle.
    MouseEnter,
    /// The pointer left the element's rectangle.
    MouseLeave,
    /// An input leaf consumed its activation key.
    Click,
    /// A skin-defined event.
    Named(String),
}

/// Callback run when a trigger's event fires.
pub type TriggerAction = Rc<dyn Fn(&mut ElementTree, ElementId)>;

/// Runs an action when an event fires on its element.
#[derive(Clone)]
pub struct EventTrigger {
    /// Event to react to.
    pub event: RoutedEvent,
    /// What to do.
    pub action: TriggerAction,
}

impl EventTrigger {
    /// Creates a trigger.
    pub fn new(event: RoutedEvent, action: impl Fn(&mut ElementTree, ElementId) + 'static) -> Self {
        Self {
            event,
            action: Rc::new(action),
        }
    }
}

impl fmt::Debug for EventTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventTrigger")
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}

/// Per-element trigger storage.
#[derive(Clone, Debug, Default)]
pub(crate) struct TriggerList {
    pub(crate) triggers: Vec<EventTrigger>,
    pub(crate) initialized: bool,
}

impl TriggerList {
    /// Snapshot of the actions matching `event`, in registration order.
    pub(crate) fn actions_for(&self, event: &RoutedEvent) -> Vec<TriggerAction> {
        self.triggers
            .iter()
            .filter(|t| t.event == *event)
            .map(|t| Rc::clone(&t.action))
            .collect()
    }
}

impl ElementTree {
    /// Appends an event trigger to an element.
    pub fn add_trigger(&mut self, id: ElementId, trigger: EventTrigger) {
        self.validate(id);
        self.triggers[id.idx as usize].triggers.push(trigger);
    }

    /// Returns the element's triggers.
    #[must_use]
    pub fn triggers(&self, id: ElementId) -> &[EventTrigger] {
        self.validate(id);
        &self.triggers[id.idx as usize].triggers
    }

    /// Fires `event` on `id`, running every matching trigger action.
    ///
    /// Actions may mutate the tree; triggers added while firing run from
    /// the next firing on.
    pub fn fire_event(&mut self, id: ElementId, event: &RoutedEvent) {
        self.validate(id);
        let actions = self.triggers[id.idx as usize].actions_for(event);
        for action in actions {
            if !self.is_alive(id) {
                break;
            }
            action(self, id);
        }
    }

    /// Initializes the element's triggers once per element lifetime and
    /// fires [`RoutedEvent::Loaded`]. Later calls do nothing.
    pub(crate) fn initialize_triggers(&mut self, id: ElementId) {
        let list = &mut self.triggers[id.idx as usize];
        if list.initialized {
            return;
        }
        list.initialized = true;
        self.fire_event(id, &RoutedEvent::Loaded);
    }

    /// Returns whether the element's triggers have been initialized.
    #[must_use]
    pub fn is_loaded(&self, id: ElementId) -> bool {
        self.validate(id);
        self.triggers[id.idx as usize].initialized
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;
    use crate::element::ElementKind;

    #[test]
    fn fire_event_runs_only_matching_triggers() {
        let mut tree = ElementTree::new();
        let e = tree.create_element(ElementKind::ContentHost);
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        tree.add_trigger(
            e,
            EventTrigger::new(RoutedEvent::Click, move |_, _| h.set(h.get() + 1)),
        );
        tree.add_trigger(
            e,
            EventTrigger::new(RoutedEvent::MouseEnter, |_, _| panic!("wrong event")),
        );
        tree.fire_event(e, &RoutedEvent::Click);
        tree.fire_event(e, &RoutedEvent::Named("Other".into()));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn initialize_fires_loaded_once() {
        let mut tree = ElementTree::new();
        let e = tree.create_element(ElementKind::ContentHost);
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        tree.add_trigger(
            e,
            EventTrigger::new(RoutedEvent::Loaded, move |_, _| h.set(h.get() + 1)),
        );
        assert!(!tree.is_loaded(e));
        tree.initialize_triggers(e);
        tree.initialize_triggers(e);
        assert!(tree.is_loaded(e));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn trigger_action_can_mutate_tree() {
        let mut tree = ElementTree::new();
        let e = tree.create_element(ElementKind::ContentHost);
        tree.add_trigger(
            e,
            EventTrigger::new(RoutedEvent::Named("Dim".into()), |tree, id| {
                tree.set(id, crate::element::field::OPACITY, 0.25);
            }),
        );
        tree.fire_event(e, &RoutedEvent::Named("Dim".into()));
        assert_eq!(*tree.get(e, crate::element::field::OPACITY), 0.25);
    }
}
