// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard and pointer dispatch.
//!
//! Keys travel down the tree by mutable reference. Children get the key
//! before their parent; a handler that consumes it resets it to
//! [`Key::None`], which stops the walk and tells every ancestor the key was
//! handled.
//!
//! Pointer moves are compared against each element's actual rectangle to
//! drive hover state and pointer focus.

use alloc::vec::Vec;

use kurbo::Point;

use crate::element::{ElementId, ElementKind, ElementTree, Order, Orientation, RoutedEvent, field};
use crate::focus::FocusDirection;

/// A remote-control or keyboard key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Key {
    /// No key, or a key that has been consumed.
    #[default]
    None,
    /// Directional up.
    Up,
    /// Directional down.
    Down,
    /// Directional left.
    Left,
    /// Directional right.
    Right,
    /// Select / OK.
    Enter,
    /// Back / cancel.
    Back,
    /// A character key.
    Char(char),
}

impl Key {
    /// The focus direction of a directional key.
    #[must_use]
    pub const fn direction(self) -> Option<FocusDirection> {
        match self {
            Self::Up => Some(FocusDirection::Up),
            Self::Down => Some(FocusDirection::Down),
            Self::Left => Some(FocusDirection::Left),
            Self::Right => Some(FocusDirection::Right),
            _ => None,
        }
    }

    /// Marks the key handled.
    pub fn consume(&mut self) {
        *self = Self::None;
    }
}

impl ElementTree {
    /// Dispatches `key` into `id`'s subtree.
    ///
    /// Hidden and disabled elements are skipped with their subtrees.
    /// Children are visited in document order before the element itself;
    /// the walk stops as soon as the key is consumed.
    pub fn dispatch_key(&mut self, id: ElementId, key: &mut Key) {
        self.validate(id);
        if *key == Key::None || !self.accepts_input(id) {
            return;
        }
        let mut children = Vec::new();
        self.add_children(id, &mut children);
        for child in children {
            if *key == Key::None {
                return;
            }
            if self.is_alive(child) {
                self.dispatch_key(child, key);
            }
        }
        if *key != Key::None && self.is_alive(id) {
            self.handle_key(id, key);
        }
    }

    fn accepts_input(&self, id: ElementId) -> bool {
        self.effective_visible[id.idx as usize] && *self.props[id.idx as usize].enabled.get()
    }

    fn handle_key(&mut self, id: ElementId, key: &mut Key) {
        let i = id.idx as usize;
        match &self.kind[i] {
            ElementKind::InputLeaf(d) => {
                if *self.props[i].has_focus.get() && *key == d.activation {
                    key.consume();
                    self.fire_event(id, &RoutedEvent::Click);
                }
            }
            ElementKind::ItemsHost(d) => {
                if *d.can_scroll.get() && *self.props[i].is_focus_scope.get() {
                    let orientation = *d.orientation.get();
                    self.scroll_items(id, orientation, key);
                }
            }
            ElementKind::Container(_) | ElementKind::ContentHost | ElementKind::Text(_) => {}
        }
    }

    /// Moves focus between the items of a scroll viewport and scrolls the
    /// newly focused item into view.
    fn scroll_items(&mut self, host: ElementId, orientation: Orientation, key: &mut Key) {
        let step: isize = match (orientation, *key) {
            (Orientation::Vertical, Key::Up) | (Orientation::Horizontal, Key::Left) => -1,
            (Orientation::Vertical, Key::Down) | (Orientation::Horizontal, Key::Right) => 1,
            _ => return,
        };
        let Some(focused) = self.find_focused(host) else {
            return;
        };
        let items: Vec<ElementId> = self.children(host).collect();
        let Some(current) = items
            .iter()
            .position(|&item| self.is_ancestor_or_self(item, focused))
        else {
            return;
        };

        // Nearest item in the step direction holding a focus candidate.
        let mut index = current;
        let target = loop {
            index = match index.checked_add_signed(step) {
                Some(next) if next < items.len() => next,
                _ => return,
            };
            let item = items[index];
            if let Some(target) =
                self.search(item, Order::DepthFirst, |tree, e| tree.is_focus_candidate(e))
            {
                break (item, target);
            }
        };

        key.consume();
        let (item, target) = target;
        self.set(target, field::HAS_FOCUS, true);
        self.scroll_into_view(host, item, orientation);
    }

    fn scroll_into_view(&mut self, host: ElementId, item: ElementId, orientation: Orientation) {
        let viewport = self.layout[host.idx as usize].actual;
        let rect = self.layout[item.idx as usize].actual;
        let (view_start, view_end, start, end) = match orientation {
            Orientation::Vertical => (viewport.y0, viewport.y1, rect.y0, rect.y1),
            Orientation::Horizontal => (viewport.x0, viewport.x1, rect.x0, rect.x1),
        };
        let shift = if start < view_start {
            start - view_start
        } else if end > view_end {
            (end - view_end).min(start - view_start)
        } else {
            return;
        };
        let offset = *self.get(host, field::SCROLL_OFFSET) + shift;
        self.set(host, field::SCROLL_OFFSET, offset.max(0.0));
    }

    /// Updates hover state for a pointer at `(x, y)` in output space.
    ///
    /// Every shown, enabled element of `id`'s subtree whose actual
    /// rectangle the pointer entered fires
    /// [`MouseEnter`](RoutedEvent::MouseEnter); elements the pointer left
    /// fire [`MouseLeave`](RoutedEvent::MouseLeave) and drop their focus.
    /// A focusable element under the pointer takes focus on every move, so
    /// focus moved away by keys returns with the next pointer move.
    ///
    /// Elements that stop accepting the pointer (hidden, disabled, or
    /// scrolled out of their viewport) end hover on their whole subtree.
    /// Focus held by an element the pointer never entered is left alone.
    pub fn on_mouse_move(&mut self, id: ElementId, x: f64, y: f64) {
        self.validate(id);
        self.hover(id, Point::new(x, y));
    }

    fn hover(&mut self, id: ElementId, point: Point) {
        let i = id.idx as usize;
        if !self.is_shown(id.idx) || !*self.props[i].enabled.get() {
            self.clear_hover(id);
            return;
        }
        let inside = self.layout[i].actual.contains(point);
        if inside != self.mouse_over[i] {
            self.mouse_over[i] = inside;
            if inside {
                self.fire_event(id, &RoutedEvent::MouseEnter);
            } else {
                self.fire_event(id, &RoutedEvent::MouseLeave);
                if self.is_alive(id) && *self.props[i].has_focus.get() {
                    self.set(id, field::HAS_FOCUS, false);
                }
            }
        }
        if !self.is_alive(id) {
            return;
        }
        if inside && *self.props[i].focusable.get() && !*self.props[i].has_focus.get() {
            self.set(id, field::HAS_FOCUS, true);
        }
        let mut children = Vec::new();
        self.add_children(id, &mut children);
        for child in children {
            if self.is_alive(child) {
                self.hover(child, point);
            }
        }
    }

    /// Ends hover on every element of `id`'s subtree, firing
    /// [`MouseLeave`](RoutedEvent::MouseLeave) where it was active.
    fn clear_hover(&mut self, id: ElementId) {
        let mut hovered = Vec::new();
        self.for_each(id, |tree, e| {
            if tree.mouse_over[e.idx as usize] {
                hovered.push(e);
            }
        });
        for e in hovered {
            if self.is_alive(e) {
                self.mouse_over[e.idx as usize] = false;
                self.fire_event(e, &RoutedEvent::MouseLeave);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use core::cell::{Cell, RefCell};

    use kurbo::{Rect, Size};

    use super::*;
    use crate::config::SkinConfig;
    use crate::element::EventTrigger;
    use crate::layout::LayoutContext;
    use crate::testing::FixedMetrics;

    fn counter(tree: &mut ElementTree, id: ElementId, event: RoutedEvent) -> Rc<Cell<u32>> {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        tree.add_trigger(id, EventTrigger::new(event, move |_, _| h.set(h.get() + 1)));
        hits
    }

    fn lay_out(tree: &mut ElementTree, root: ElementId) {
        let metrics = FixedMetrics::default();
        let mut cx = LayoutContext::new(&SkinConfig::default(), &metrics);
        let _ = tree.evaluate();
        tree.update_layout(root, &mut cx);
    }

    #[test]
    fn focused_leaf_consumes_activation_key() {
        let mut tree = ElementTree::new();
        let root = tree.create_element(ElementKind::overlay());
        let a = tree.create_element(ElementKind::input_leaf());
        let b = tree.create_element(ElementKind::input_leaf());
        tree.add_child(root, a).unwrap();
        tree.add_child(root, b).unwrap();
        let a_clicks = counter(&mut tree, a, RoutedEvent::Click);
        let b_clicks = counter(&mut tree, b, RoutedEvent::Click);
        tree.set(b, field::HAS_FOCUS, true);

        let mut key = Key::Enter;
        tree.dispatch_key(root, &mut key);
        assert_eq!(key, Key::None);
        assert_eq!((a_clicks.get(), b_clicks.get()), (0, 1));

        let mut key = Key::Back;
        tree.dispatch_key(root, &mut key);
        assert_eq!(key, Key::Back);
    }

    #[test]
    fn custom_activation_key() {
        let mut tree = ElementTree::new();
        let leaf = tree.create_element(ElementKind::input_leaf_with(Key::Char('x')));
        let clicks = counter(&mut tree, leaf, RoutedEvent::Click);
        tree.set(leaf, field::HAS_FOCUS, true);
        let mut key = Key::Enter;
        tree.dispatch_key(leaf, &mut key);
        assert_eq!(key, Key::Enter);
        let mut key = Key::Char('x');
        tree.dispatch_key(leaf, &mut key);
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn disabled_and_hidden_subtrees_see_no_keys() {
        let mut tree = ElementTree::new();
        let root = tree.create_element(ElementKind::overlay());
        let group = tree.create_element(ElementKind::overlay());
        let leaf = tree.create_element(ElementKind::input_leaf());
        tree.add_child(root, group).unwrap();
        tree.add_child(group, leaf).unwrap();
        let clicks = counter(&mut tree, leaf, RoutedEvent::Click);
        tree.set(leaf, field::HAS_FOCUS, true);

        tree.set(group, field::ENABLED, false);
        let mut key = Key::Enter;
        tree.dispatch_key(root, &mut key);
        assert_eq!(key, Key::Enter);

        tree.set(group, field::ENABLED, true);
        tree.set(group, field::VISIBILITY, crate::element::Visibility::Hidden);
        let _ = tree.evaluate();
        tree.dispatch_key(root, &mut key);
        assert_eq!(clicks.get(), 0);
    }

    #[test]
    fn consumed_key_stops_before_later_siblings() {
        let mut tree = ElementTree::new();
        let root = tree.create_element(ElementKind::overlay());
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in ['a', 'b'] {
            let leaf = tree.create_element(ElementKind::input_leaf());
            tree.add_child(root, leaf).unwrap();
            tree.set(leaf, field::HAS_FOCUS, true);
            let l = Rc::clone(&log);
            tree.add_trigger(
                leaf,
                EventTrigger::new(RoutedEvent::Click, move |_, _| l.borrow_mut().push(tag)),
            );
        }
        let first = tree.children(root).next().unwrap();
        tree.set(first, field::HAS_FOCUS, true);
        let mut key = Key::Enter;
        tree.dispatch_key(root, &mut key);
        assert_eq!(*log.borrow(), ['a']);
    }

    fn scroll_list(count: usize) -> (ElementTree, ElementId, Vec<ElementId>) {
        let mut tree = ElementTree::new();
        let list = tree.create_element(ElementKind::items_host(Orientation::Vertical, true));
        tree.set(list, field::HEIGHT, Some(60.0));
        let items: Vec<_> = (0..count)
            .map(|_| {
                let item = tree.create_element(ElementKind::input_leaf());
                tree.set(item, field::NATURAL_SIZE, Size::new(100.0, 30.0));
                tree.set(item, field::FOCUSABLE, true);
                tree.add_child(list, item).unwrap();
                item
            })
            .collect();
        lay_out(&mut tree, list);
        (tree, list, items)
    }

    #[test]
    fn scroll_viewport_moves_focus_and_scrolls() {
        let (mut tree, list, items) = scroll_list(4);
        tree.set(items[1], field::HAS_FOCUS, true);

        let mut key = Key::Down;
        tree.dispatch_key(list, &mut key);
        assert_eq!(key, Key::None);
        assert_eq!(tree.focused(), Some(items[2]));
        // Item 2 spans 60..90 in a 0..60 viewport.
        assert_eq!(*tree.get(list, field::SCROLL_OFFSET), 30.0);

        lay_out(&mut tree, list);
        assert_eq!(tree.actual_rect(items[2]).y0, 30.0);

        let mut key = Key::Up;
        tree.dispatch_key(list, &mut key);
        assert_eq!(tree.focused(), Some(items[1]));
        assert_eq!(*tree.get(list, field::SCROLL_OFFSET), 30.0);
    }

    #[test]
    fn scroll_viewport_leaves_key_at_the_ends() {
        let (mut tree, list, items) = scroll_list(3);
        tree.set(items[0], field::HAS_FOCUS, true);
        let mut key = Key::Up;
        tree.dispatch_key(list, &mut key);
        assert_eq!(key, Key::Up);

        let mut key = Key::Left;
        tree.dispatch_key(list, &mut key);
        assert_eq!(key, Key::Left);
        assert_eq!(tree.focused(), Some(items[0]));
    }

    #[test]
    fn non_scope_viewport_does_not_intercept() {
        let (mut tree, list, items) = scroll_list(3);
        tree.set(list, field::IS_FOCUS_SCOPE, false);
        tree.set(items[0], field::HAS_FOCUS, true);
        let mut key = Key::Down;
        tree.dispatch_key(list, &mut key);
        assert_eq!(key, Key::Down);
    }

    #[test]
    fn hover_enters_leaves_and_focuses() {
        let mut tree = ElementTree::new();
        let root = tree.create_element(ElementKind::overlay());
        let leaf = tree.create_element(ElementKind::input_leaf());
        tree.add_child(root, leaf).unwrap();
        tree.set(leaf, field::FOCUSABLE, true);
        tree.set(leaf, field::WIDTH, Some(100.0));
        tree.set(leaf, field::HEIGHT, Some(50.0));
        tree.set(leaf, field::HORIZONTAL_ALIGNMENT, crate::element::HorizontalAlignment::Left);
        tree.set(leaf, field::VERTICAL_ALIGNMENT, crate::element::VerticalAlignment::Top);
        lay_out(&mut tree, root);
        assert_eq!(tree.actual_rect(leaf), Rect::new(0.0, 0.0, 100.0, 50.0));
        let enters = counter(&mut tree, leaf, RoutedEvent::MouseEnter);
        let leaves = counter(&mut tree, leaf, RoutedEvent::MouseLeave);

        tree.on_mouse_move(root, 10.0, 10.0);
        tree.on_mouse_move(root, 20.0, 10.0);
        assert!(tree.is_mouse_over(leaf));
        assert_eq!(tree.focused(), Some(leaf));
        assert_eq!(enters.get(), 1);

        tree.on_mouse_move(root, 500.0, 10.0);
        assert!(!tree.is_mouse_over(leaf));
        assert!(tree.is_mouse_over(root));
        assert_eq!(tree.focused(), None);
        assert_eq!(leaves.get(), 1);
    }

    fn hover_leaf(tree: &mut ElementTree, root: ElementId) -> ElementId {
        let leaf = tree.create_element(ElementKind::input_leaf());
        tree.add_child(root, leaf).unwrap();
        tree.set(leaf, field::FOCUSABLE, true);
        tree.set(leaf, field::WIDTH, Some(100.0));
        tree.set(leaf, field::HEIGHT, Some(50.0));
        tree.set(leaf, field::HORIZONTAL_ALIGNMENT, crate::element::HorizontalAlignment::Left);
        tree.set(leaf, field::VERTICAL_ALIGNMENT, crate::element::VerticalAlignment::Top);
        leaf
    }

    #[test]
    fn disabling_a_hovered_element_fires_leave() {
        let mut tree = ElementTree::new();
        let root = tree.create_element(ElementKind::overlay());
        let leaf = hover_leaf(&mut tree, root);
        lay_out(&mut tree, root);
        let leaves = counter(&mut tree, leaf, RoutedEvent::MouseLeave);

        tree.on_mouse_move(root, 10.0, 10.0);
        assert!(tree.is_mouse_over(leaf));

        tree.set(leaf, field::ENABLED, false);
        tree.on_mouse_move(root, 20.0, 10.0);
        assert!(!tree.is_mouse_over(leaf));
        assert_eq!(leaves.get(), 1);

        // No second leave once the pointer really goes.
        tree.on_mouse_move(root, 500.0, 10.0);
        assert_eq!(leaves.get(), 1);

        tree.set(leaf, field::ENABLED, true);
        tree.on_mouse_move(root, 10.0, 10.0);
        assert!(tree.is_mouse_over(leaf));
    }

    #[test]
    fn pointer_takes_focus_back_on_next_move() {
        let mut tree = ElementTree::new();
        let root = tree.create_element(ElementKind::overlay());
        let leaf = hover_leaf(&mut tree, root);
        let other = tree.create_element(ElementKind::input_leaf());
        tree.add_child(root, other).unwrap();
        tree.set(other, field::FOCUSABLE, true);
        tree.set(other, field::WIDTH, Some(100.0));
        tree.set(other, field::HEIGHT, Some(50.0));
        tree.set(other, field::HORIZONTAL_ALIGNMENT, crate::element::HorizontalAlignment::Right);
        lay_out(&mut tree, root);

        tree.on_mouse_move(root, 10.0, 10.0);
        assert_eq!(tree.focused(), Some(leaf));
        tree.set(other, field::HAS_FOCUS, true);
        assert_eq!(tree.focused(), Some(other));

        tree.on_mouse_move(root, 11.0, 10.0);
        assert_eq!(tree.focused(), Some(leaf));
    }
}
