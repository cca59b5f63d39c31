// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directional focus navigation.
//!
//! There is one focused element per tree (see
//! [`ElementTree::focused`]); this module only answers "where would focus
//! go next". A candidate must be effectively visible, enabled and
//! focusable, and must lie strictly in the requested direction from the
//! reference element's actual position:
//!
//! - **Vertical** moves accept any candidate above (below) in non-strict
//!   mode. In strict mode the candidate's horizontal extent must also
//!   overlap or touch the reference's.
//! - **Horizontal** moves never check the vertical extent.
//!
//! Search descends only into elements flagged
//! [`IS_FOCUS_SCOPE`](crate::element::field::IS_FOCUS_SCOPE) and picks the
//! candidate nearest to the reference by distance between actual
//! positions; the first candidate found wins ties.

use kurbo::Rect;

use crate::element::{ElementId, ElementTree, Order, Visit, field};

/// Direction of a focus move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FocusDirection {
    /// Towards smaller y.
    Up,
    /// Towards larger y.
    Down,
    /// Towards smaller x.
    Left,
    /// Towards larger x.
    Right,
}

impl FocusDirection {
    /// Returns `true` for [`Up`](Self::Up) and [`Down`](Self::Down).
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

/// Whether the horizontal spans of `candidate` and `reference` overlap.
/// Spans that only touch at an edge count.
fn spans_overlap(candidate: Rect, reference: Rect) -> bool {
    let (c0, c1) = (candidate.x0, candidate.x1);
    let (r0, r1) = (reference.x0, reference.x1);
    let starts_within = c0 >= r0 && c0 <= r1;
    let covers = c0 <= r0 && c1 >= r1;
    let ends_within = c1 >= r0 && c1 <= r1;
    starts_within || covers || ends_within
}

impl ElementTree {
    /// Returns whether `id` can take focus: effectively visible, enabled and
    /// focusable.
    #[must_use]
    pub fn is_focus_candidate(&self, id: ElementId) -> bool {
        self.validate(id);
        let props = &self.props[id.idx as usize];
        self.effective_visible[id.idx as usize] && *props.enabled.get() && *props.focusable.get()
    }

    fn lies_towards(&self, candidate: ElementId, reference: Rect, dir: FocusDirection, strict: bool) -> bool {
        let rect = self.layout[candidate.idx as usize].actual;
        match dir {
            FocusDirection::Up | FocusDirection::Down => {
                let beyond = if dir == FocusDirection::Up {
                    rect.y0 < reference.y0
                } else {
                    rect.y0 > reference.y0
                };
                beyond && (!strict || spans_overlap(rect, reference))
            }
            FocusDirection::Left => rect.x0 < reference.x0,
            FocusDirection::Right => rect.x0 > reference.x0,
        }
    }

    /// Finds the element that focus would move to from `from` in `dir`,
    /// searching `scope`'s subtree.
    ///
    /// Returns `None` when no element qualifies.
    #[must_use]
    pub fn predict_focus(
        &self,
        scope: ElementId,
        from: ElementId,
        dir: FocusDirection,
        strict: bool,
    ) -> Option<ElementId> {
        self.validate(from);
        let reference = self.layout[from.idx as usize].actual;
        let origin = reference.origin();
        let mut best: Option<(ElementId, f64)> = None;
        self.visit(scope, Order::DepthFirst, |tree, id| {
            if !tree.effective_visible[id.idx as usize] {
                return Visit::SkipChildren;
            }
            if id != from
                && tree.is_focus_candidate(id)
                && tree.lies_towards(id, reference, dir, strict)
            {
                let distance = tree.layout[id.idx as usize].actual.origin().distance(origin);
                if best.is_none_or(|(_, d)| distance < d) {
                    best = Some((id, distance));
                }
            }
            if id == scope || *tree.get(id, field::IS_FOCUS_SCOPE) {
                Visit::Continue
            } else {
                Visit::SkipChildren
            }
        });
        best.map(|(id, _)| id)
    }

    /// [`predict_focus`](Self::predict_focus) upwards across `from`'s tree.
    #[must_use]
    pub fn predict_focus_up(&self, from: ElementId, strict: bool) -> Option<ElementId> {
        self.predict_focus(self.root_of(from), from, FocusDirection::Up, strict)
    }

    /// [`predict_focus`](Self::predict_focus) downwards across `from`'s tree.
    #[must_use]
    pub fn predict_focus_down(&self, from: ElementId, strict: bool) -> Option<ElementId> {
        self.predict_focus(self.root_of(from), from, FocusDirection::Down, strict)
    }

    /// [`predict_focus`](Self::predict_focus) leftwards across `from`'s tree.
    #[must_use]
    pub fn predict_focus_left(&self, from: ElementId, strict: bool) -> Option<ElementId> {
        self.predict_focus(self.root_of(from), from, FocusDirection::Left, strict)
    }

    /// [`predict_focus`](Self::predict_focus) rightwards across `from`'s tree.
    #[must_use]
    pub fn predict_focus_right(&self, from: ElementId, strict: bool) -> Option<ElementId> {
        self.predict_focus(self.root_of(from), from, FocusDirection::Right, strict)
    }

    /// Moves focus from `from` in `dir` and returns the newly focused
    /// element.
    ///
    /// With `strict`, vertical moves try strict mode first and fall back to
    /// non-strict. Focus is left unchanged when nothing qualifies.
    pub fn move_focus(&mut self, from: ElementId, dir: FocusDirection, strict: bool) -> Option<ElementId> {
        let scope = self.root_of(from);
        let target = if strict && dir.is_vertical() {
            self.predict_focus(scope, from, dir, true)
                .or_else(|| self.predict_focus(scope, from, dir, false))
        } else {
            self.predict_focus(scope, from, dir, false)
        }?;
        self.set(target, field::HAS_FOCUS, true);
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;

    fn place(tree: &mut ElementTree, parent: ElementId, rect: Rect) -> ElementId {
        let e = tree.create_element(ElementKind::input_leaf());
        tree.add_child(parent, e).unwrap();
        tree.set(e, field::FOCUSABLE, true);
        tree.layout[e.index() as usize].actual = rect;
        e
    }

    fn cell(x: f64, y: f64) -> Rect {
        Rect::new(x, y, x + 50.0, y + 20.0)
    }

    #[test]
    fn left_accepts_only_candidates_to_the_left() {
        let mut tree = ElementTree::new();
        let root = tree.create_element(ElementKind::overlay());
        let from = place(&mut tree, root, cell(200.0, 0.0));
        let left = place(&mut tree, root, cell(100.0, 0.0));
        assert_eq!(tree.predict_focus_left(from, true), Some(left));

        let mut tree = ElementTree::new();
        let root = tree.create_element(ElementKind::overlay());
        let from = place(&mut tree, root, cell(200.0, 0.0));
        place(&mut tree, root, cell(300.0, 0.0));
        assert_eq!(tree.predict_focus_left(from, true), None);
    }

    #[test]
    fn horizontal_moves_ignore_vertical_extent() {
        let mut tree = ElementTree::new();
        let root = tree.create_element(ElementKind::overlay());
        let from = place(&mut tree, root, cell(200.0, 0.0));
        let far_down = place(&mut tree, root, cell(300.0, 500.0));
        assert_eq!(tree.predict_focus_right(from, true), Some(far_down));
    }

    #[test]
    fn strict_vertical_requires_overlap() {
        let mut tree = ElementTree::new();
        let root = tree.create_element(ElementKind::overlay());
        let from = place(&mut tree, root, Rect::new(100.0, 100.0, 200.0, 120.0));
        let aside = place(&mut tree, root, Rect::new(300.0, 0.0, 350.0, 20.0));
        assert_eq!(tree.predict_focus_up(from, true), None);
        assert_eq!(tree.predict_focus_up(from, false), Some(aside));

        let straddle = place(&mut tree, root, Rect::new(180.0, 40.0, 260.0, 60.0));
        assert_eq!(tree.predict_focus_up(from, true), Some(straddle));
    }

    #[test]
    fn overlap_cases() {
        let reference = Rect::new(100.0, 0.0, 200.0, 10.0);
        let span = |x0, x1| Rect::new(x0, 0.0, x1, 10.0);
        assert!(spans_overlap(span(120.0, 180.0), reference), "inside");
        assert!(spans_overlap(span(50.0, 250.0), reference), "contains");
        assert!(spans_overlap(span(50.0, 150.0), reference), "left edge");
        assert!(spans_overlap(span(150.0, 250.0), reference), "right edge");
        assert!(spans_overlap(span(0.0, 100.0), reference), "touching left");
        assert!(spans_overlap(span(200.0, 250.0), reference), "touching right");
        assert!(!spans_overlap(span(0.0, 99.0), reference), "apart left");
        assert!(!spans_overlap(span(201.0, 250.0), reference), "apart right");
    }

    #[test]
    fn strict_vertical_accepts_edge_neighbour() {
        let mut tree = ElementTree::new();
        let root = tree.create_element(ElementKind::overlay());
        let from = place(&mut tree, root, Rect::new(100.0, 100.0, 200.0, 120.0));
        let above = place(&mut tree, root, Rect::new(200.0, 40.0, 250.0, 60.0));
        let below = place(&mut tree, root, Rect::new(50.0, 200.0, 100.0, 220.0));
        assert_eq!(tree.predict_focus_up(from, true), Some(above));
        assert_eq!(tree.predict_focus_down(from, true), Some(below));
    }

    #[test]
    fn nearest_candidate_wins() {
        let mut tree = ElementTree::new();
        let root = tree.create_element(ElementKind::overlay());
        let from = place(&mut tree, root, cell(0.0, 200.0));
        place(&mut tree, root, cell(0.0, 0.0));
        let near = place(&mut tree, root, cell(0.0, 100.0));
        assert_eq!(tree.predict_focus_up(from, true), Some(near));
    }

    #[test]
    fn unusable_candidates_are_skipped() {
        let mut tree = ElementTree::new();
        let root = tree.create_element(ElementKind::overlay());
        let from = place(&mut tree, root, cell(0.0, 200.0));
        let disabled = place(&mut tree, root, cell(0.0, 150.0));
        let hidden = place(&mut tree, root, cell(0.0, 100.0));
        let plain = place(&mut tree, root, cell(0.0, 50.0));
        tree.set(disabled, field::ENABLED, false);
        tree.effective_visible[hidden.index() as usize] = false;
        tree.set(plain, field::FOCUSABLE, false);
        assert_eq!(tree.predict_focus_up(from, false), None);
    }

    #[test]
    fn search_stays_out_of_non_scopes() {
        let mut tree = ElementTree::new();
        let root = tree.create_element(ElementKind::overlay());
        let from = place(&mut tree, root, cell(0.0, 200.0));
        let closed = tree.create_element(ElementKind::overlay());
        tree.add_child(root, closed).unwrap();
        tree.set(closed, field::IS_FOCUS_SCOPE, false);
        place(&mut tree, closed, cell(0.0, 100.0));
        assert_eq!(tree.predict_focus_up(from, false), None);

        tree.set(closed, field::IS_FOCUS_SCOPE, true);
        assert!(tree.predict_focus_up(from, false).is_some());
    }

    #[test]
    fn move_focus_falls_back_to_non_strict() {
        let mut tree = ElementTree::new();
        let root = tree.create_element(ElementKind::overlay());
        let from = place(&mut tree, root, cell(0.0, 200.0));
        let aside = place(&mut tree, root, cell(400.0, 0.0));
        tree.set(from, field::HAS_FOCUS, true);

        assert_eq!(tree.move_focus(from, FocusDirection::Up, true), Some(aside));
        assert_eq!(tree.focused(), Some(aside));
        assert!(!*tree.get(from, field::HAS_FOCUS));
        assert_eq!(tree.move_focus(aside, FocusDirection::Up, true), None);
        assert_eq!(tree.focused(), Some(aside));
    }
}
