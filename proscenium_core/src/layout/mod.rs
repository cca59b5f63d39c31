// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-pass layout.
//!
//! Layout runs top-down in two passes over the element tree:
//!
//! 1. **Measure** — each element computes its desired size from its
//!    explicit size, its content (text extent, intrinsic leaf size) or its
//!    children, then adds its margin. See [`ElementTree::measure`].
//! 2. **Arrange** — each element receives a final rectangle, removes its
//!    margin, records the remainder as its actual rectangle and places its
//!    children inside it per alignment. See [`ElementTree::arrange`].
//!
//! Both passes thread a [`LayoutContext`] that carries the zoom factors,
//! the stack of cumulative layout transforms and the per-pass z-order
//! counter. Pushing a layout transform returns a [`LayoutScope`] guard that
//! pops it when dropped, on every exit path.
//!
//! [`ElementTree::update_layout`] ties the passes to invalidation: it walks
//! to the top of the rooted tree and re-lays it out if anything below was
//! invalidated.

mod arrange;
mod measure;

use alloc::vec::Vec;
use core::ops::{Deref, DerefMut};

use kurbo::{Affine, Insets, Point, Rect, Size, Vec2};

use crate::config::SkinConfig;
use crate::element::{ElementId, ElementTree, Orientation};
use crate::text::TextMetrics;

/// Per-element layout results.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LayoutSlot {
    /// Content size after layout transforms, before margins.
    pub(crate) desired: Size,
    /// `desired` plus margins.
    pub(crate) total_desired: Size,
    /// Input of the last measure.
    pub(crate) available: Option<Size>,
    /// Input of the last arrange.
    pub(crate) final_rect: Option<Rect>,
    /// `final_rect` minus margins.
    pub(crate) actual: Rect,
    pub(crate) z: f64,
    pub(crate) final_transform: Affine,
    pub(crate) invalid: bool,
    /// Pass in which the element was last measured.
    pub(crate) measured_pass: Option<u64>,
}

impl Default for LayoutSlot {
    fn default() -> Self {
        Self {
            desired: Size::ZERO,
            total_desired: Size::ZERO,
            available: None,
            final_rect: None,
            actual: Rect::ZERO,
            z: 0.0,
            final_transform: Affine::IDENTITY,
            invalid: true,
            measured_pass: None,
        }
    }
}

/// Counters for one layout pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutStats {
    /// Pass number, starting at 1.
    pub pass: u64,
    /// Elements measured.
    pub measured: u32,
    /// Elements arranged.
    pub arranged: u32,
}

/// Ambient state threaded through measure and arrange.
pub struct LayoutContext<'a> {
    text: &'a dyn TextMetrics,
    zoom: Vec2,
    skin_size: Size,
    transforms: Vec<Affine>,
    stats: LayoutStats,
    z: f64,
    pending_loaded: Vec<ElementId>,
}

impl core::fmt::Debug for LayoutContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayoutContext")
            .field("zoom", &self.zoom)
            .field("skin_size", &self.skin_size)
            .field("depth", &self.transforms.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<'a> LayoutContext<'a> {
    /// Creates a context for `config`, measuring text with `text`.
    #[must_use]
    pub fn new(config: &SkinConfig, text: &'a dyn TextMetrics) -> Self {
        Self {
            text,
            zoom: config.zoom,
            skin_size: config.skin_size,
            transforms: Vec::from([config.device_transform]),
            stats: LayoutStats::default(),
            z: 0.0,
            pending_loaded: Vec::new(),
        }
    }

    /// Continues pass numbering after `pass`, for callers that create a
    /// fresh context per frame.
    #[must_use]
    pub fn after_pass(mut self, pass: u64) -> Self {
        self.stats.pass = pass;
        self
    }

    /// Zoom factors from skin units to output units.
    #[inline]
    #[must_use]
    pub fn zoom(&self) -> Vec2 {
        self.zoom
    }

    /// The text-metrics collaborator.
    #[must_use]
    pub fn text_metrics(&self) -> &'a dyn TextMetrics {
        self.text
    }

    /// Combination of every pushed layout transform and the device
    /// transform.
    #[must_use]
    pub fn final_transform(&self) -> Affine {
        self.transforms
            .last()
            .copied()
            .unwrap_or(Affine::IDENTITY)
    }

    /// Pushes `transform` on top of the current final transform until the
    /// returned guard is dropped.
    pub fn push_layout_transform(&mut self, transform: Affine) -> LayoutScope<'_, 'a> {
        let combined = self.final_transform() * transform;
        self.transforms.push(combined);
        LayoutScope { cx: self }
    }

    /// Starts a new pass: bumps the pass number and resets the z-order
    /// counter and statistics.
    pub fn begin_pass(&mut self) {
        self.stats = LayoutStats {
            pass: self.stats.pass + 1,
            measured: 0,
            arranged: 0,
        };
        self.z = 0.0;
    }

    /// Counters of the current (or last) pass.
    #[must_use]
    pub fn stats(&self) -> LayoutStats {
        self.stats
    }

    /// Samples the z-order counter.
    pub(crate) fn next_z(&mut self) -> f64 {
        let z = self.z;
        self.z += 1.0;
        z
    }

    pub(crate) fn scale_margin(&self, m: Insets) -> Insets {
        Insets::new(
            m.x0 * self.zoom.x,
            m.y0 * self.zoom.y,
            m.x1 * self.zoom.x,
            m.y1 * self.zoom.y,
        )
    }
}

/// Guard returned by [`LayoutContext::push_layout_transform`]; pops the
/// transform on drop.
#[derive(Debug)]
pub struct LayoutScope<'c, 'a> {
    cx: &'c mut LayoutContext<'a>,
}

impl<'a> Deref for LayoutScope<'_, 'a> {
    type Target = LayoutContext<'a>;

    fn deref(&self) -> &Self::Target {
        self.cx
    }
}

impl DerefMut for LayoutScope<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.cx
    }
}

impl Drop for LayoutScope<'_, '_> {
    fn drop(&mut self) {
        self.cx.transforms.pop();
    }
}

/// Bounding size of `size` after `transform` (translation ignored).
pub(crate) fn transform_size(transform: Affine, size: Size) -> Size {
    transform
        .transform_rect_bbox(Rect::from_origin_size(Point::ZERO, size))
        .size()
}

/// An explicit width or height as layout uses it: non-finite values mean
/// auto and negative ones clamp to zero.
pub(crate) fn explicit_extent(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite()).map(|v| v.max(0.0))
}

/// Splits `size` into `(main, cross)` extents along `orientation`.
pub(crate) fn main_cross(size: Size, orientation: Orientation) -> (f64, f64) {
    match orientation {
        Orientation::Horizontal => (size.width, size.height),
        Orientation::Vertical => (size.height, size.width),
    }
}

/// Inverse of [`main_cross`].
pub(crate) fn from_main_cross(main: f64, cross: f64, orientation: Orientation) -> Size {
    match orientation {
        Orientation::Horizontal => Size::new(main, cross),
        Orientation::Vertical => Size::new(cross, main),
    }
}

/// One line of a wrapping arrangement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct WrapLine {
    /// Children `start..end` sit on this line.
    pub(crate) start: usize,
    pub(crate) end: usize,
    /// Summed main extent of the line's children.
    pub(crate) main: f64,
    /// Largest cross extent of the line's children.
    pub(crate) cross: f64,
}

/// Breaks `sizes` into lines no longer than `extent` along `orientation`.
///
/// A child longer than `extent` gets a line of its own.
pub(crate) fn wrap_lines(sizes: &[Size], orientation: Orientation, extent: f64) -> Vec<WrapLine> {
    let mut lines = Vec::new();
    let mut line = WrapLine {
        start: 0,
        end: 0,
        main: 0.0,
        cross: 0.0,
    };
    for (k, &size) in sizes.iter().enumerate() {
        let (main, cross) = main_cross(size, orientation);
        if line.end > line.start && line.main + main > extent {
            lines.push(line);
            line = WrapLine {
                start: k,
                end: k,
                main: 0.0,
                cross: 0.0,
            };
        }
        line.end = k + 1;
        line.main += main;
        line.cross = line.cross.max(cross);
    }
    if line.end > line.start {
        lines.push(line);
    }
    lines
}

impl ElementTree {
    /// Lays out the rooted tree containing `id` if it has pending
    /// invalidations.
    ///
    /// Pending invalidations are flushed first, so a dirty element anywhere
    /// below raises the root's flag. The root is measured with its explicit
    /// size times zoom (or the skin size times zoom when auto) and arranged
    /// at the origin, margins outside an explicit size. Returns whether a
    /// pass ran.
    pub fn update_layout(&mut self, id: ElementId, cx: &mut LayoutContext<'_>) -> bool {
        self.validate(id);
        self.flush_invalidations();
        let root = self.root_of(id);
        if !self.layout[root.idx as usize].invalid {
            return false;
        }

        cx.begin_pass();
        let props = &self.props[root.idx as usize];
        let width = explicit_extent(*props.width.get());
        let height = explicit_extent(*props.height.get());
        let zoom = cx.zoom();
        let available = Size::new(
            width.unwrap_or(cx.skin_size.width) * zoom.x,
            height.unwrap_or(cx.skin_size.height) * zoom.y,
        );
        let total = self.measure_element(root, available, cx);
        // Explicit root sizes exclude the margins; auto roots fill the skin.
        let slot = Size::new(
            if width.is_some() { total.width } else { available.width },
            if height.is_some() { total.height } else { available.height },
        );
        self.arrange_element(root, Rect::from_origin_size(Point::ZERO, slot), cx);
        self.fire_pending_loaded(cx);
        true
    }

    fn fire_pending_loaded(&mut self, cx: &mut LayoutContext<'_>) {
        for id in core::mem::take(&mut cx.pending_loaded) {
            if self.is_alive(id) {
                self.initialize_triggers(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, Orientation, field};
    use crate::testing::FixedMetrics;

    #[test]
    fn layout_scope_pops_on_drop() {
        let metrics = FixedMetrics::default();
        let mut cx = LayoutContext::new(&SkinConfig::default(), &metrics);
        {
            let mut outer = cx.push_layout_transform(Affine::scale(2.0));
            {
                let inner = outer.push_layout_transform(Affine::scale(3.0));
                assert_eq!(inner.final_transform(), Affine::scale(6.0));
            }
            assert_eq!(outer.final_transform(), Affine::scale(2.0));
        }
        assert_eq!(cx.final_transform(), Affine::IDENTITY);
    }

    #[test]
    fn transform_size_swaps_axes_under_quarter_turn() {
        let s = transform_size(
            Affine::rotate(core::f64::consts::FRAC_PI_2),
            Size::new(100.0, 20.0),
        );
        assert!((s.width - 20.0).abs() < 1e-9);
        assert!((s.height - 100.0).abs() < 1e-9);
    }

    #[test]
    fn update_layout_runs_only_when_root_is_dirty() {
        let metrics = FixedMetrics::default();
        let mut cx = LayoutContext::new(&SkinConfig::new(Size::new(1280.0, 720.0)), &metrics);
        let mut tree = ElementTree::new();
        let root = tree.create_element(ElementKind::stack(Orientation::Vertical));
        let leaf = tree.create_element(ElementKind::input_leaf());
        tree.add_child(root, leaf).unwrap();

        assert!(tree.update_layout(leaf, &mut cx));
        assert_eq!(tree.actual_rect(root), Rect::new(0.0, 0.0, 1280.0, 720.0));
        assert!(!tree.update_layout(root, &mut cx));

        tree.set(leaf, field::HEIGHT, Some(40.0));
        assert!(tree.is_layout_invalid(leaf));
        assert!(tree.update_layout(leaf, &mut cx));
        assert!(!tree.is_layout_invalid(root));
        assert_eq!(tree.actual_rect(leaf).height(), 40.0);
        assert_eq!(cx.stats().pass, 2);
    }

    #[test]
    fn wrap_lines_break_before_overflow() {
        let sizes = [
            Size::new(40.0, 10.0),
            Size::new(40.0, 20.0),
            Size::new(40.0, 10.0),
            Size::new(150.0, 5.0),
        ];
        let lines = wrap_lines(&sizes, Orientation::Horizontal, 100.0);
        let spans: Vec<_> = lines.iter().map(|l| (l.start, l.end, l.main, l.cross)).collect();
        assert_eq!(
            spans,
            [(0, 2, 80.0, 20.0), (2, 3, 40.0, 10.0), (3, 4, 150.0, 5.0)]
        );
        assert!(wrap_lines(&[], Orientation::Vertical, 100.0).is_empty());
    }

    #[test]
    fn explicit_extent_rejects_nan_and_negatives() {
        assert_eq!(explicit_extent(Some(f64::NAN)), None);
        assert_eq!(explicit_extent(Some(f64::INFINITY)), None);
        assert_eq!(explicit_extent(Some(-10.0)), Some(0.0));
        assert_eq!(explicit_extent(Some(12.0)), Some(12.0));
        assert_eq!(explicit_extent(None), None);
    }

    #[test]
    fn zoomed_root_fills_output() {
        let metrics = FixedMetrics::default();
        let config = SkinConfig::for_output(Size::new(1280.0, 720.0), Size::new(1920.0, 1080.0));
        let mut cx = LayoutContext::new(&config, &metrics);
        let mut tree = ElementTree::new();
        let root = tree.create_element(ElementKind::overlay());
        tree.update_layout(root, &mut cx);
        assert_eq!(tree.actual_rect(root), Rect::new(0.0, 0.0, 1920.0, 1080.0));
    }
}
