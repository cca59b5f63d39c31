// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays element storage with allocation, topology, and
//! observable attributes.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Affine, Insets, Point, Rect, Size};
use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::field::{self, Field};
use super::id::{ElementId, INVALID};
use super::kind::ElementKind;
use super::naming::{NameError, ResourceDictionary};
use super::traverse::{Ancestors, Children};
use super::trigger::{RoutedEvent, TriggerList};
use super::types::{HorizontalAlignment, VerticalAlignment, Visibility};
use crate::backend::RenderBackend;
use crate::compose::RenderCache;
use crate::dirty;
use crate::layout::LayoutSlot;
use crate::paint::Brush;
use crate::property::{Property, SubscriptionId};
use crate::resource::{AssetEvent, AssetScope};
use crate::trace::FocusChangeEvent;

/// Observable attributes common to every element kind.
#[derive(Debug)]
pub(crate) struct ElementProps {
    pub(crate) name: Property<String, ElementTree>,
    pub(crate) visibility: Property<Visibility, ElementTree>,
    pub(crate) opacity: Property<f64, ElementTree>,
    pub(crate) margin: Property<Insets, ElementTree>,
    pub(crate) width: Property<Option<f64>, ElementTree>,
    pub(crate) height: Property<Option<f64>, ElementTree>,
    pub(crate) horizontal_alignment: Property<HorizontalAlignment, ElementTree>,
    pub(crate) vertical_alignment: Property<VerticalAlignment, ElementTree>,
    pub(crate) layout_transform: Property<Option<Affine>, ElementTree>,
    pub(crate) render_transform: Property<Option<Affine>, ElementTree>,
    pub(crate) render_transform_origin: Property<Point, ElementTree>,
    pub(crate) opacity_mask: Property<Option<Brush>, ElementTree>,
    pub(crate) background: Property<Option<Brush>, ElementTree>,
    pub(crate) enabled: Property<bool, ElementTree>,
    pub(crate) focusable: Property<bool, ElementTree>,
    pub(crate) is_focus_scope: Property<bool, ElementTree>,
    pub(crate) has_focus: Property<bool, ElementTree>,
    pub(crate) z_index: Property<i32, ElementTree>,
}

impl Default for ElementProps {
    fn default() -> Self {
        Self {
            name: Property::new(String::new()),
            visibility: Property::new(Visibility::Visible),
            opacity: Property::new(1.0),
            margin: Property::new(Insets::ZERO),
            width: Property::new(None),
            height: Property::new(None),
            horizontal_alignment: Property::new(HorizontalAlignment::Stretch),
            vertical_alignment: Property::new(VerticalAlignment::Stretch),
            layout_transform: Property::new(None),
            render_transform: Property::new(None),
            render_transform_origin: Property::new(Point::ZERO),
            opacity_mask: Property::new(None),
            background: Property::new(None),
            enabled: Property::new(true),
            focusable: Property::new(false),
            is_focus_scope: Property::new(true),
            has_focus: Property::new(false),
            z_index: Property::new(0),
        }
    }
}

/// Struct-of-arrays storage for all elements of a skin.
///
/// Elements are addressed by [`ElementId`] handles. Each element occupies a
/// slot in parallel arrays; destroyed slots are recycled through a free list
/// and generation counters reject stale handles.
///
/// Attributes are [`Property`] values whose notification context is the
/// tree itself, so change handlers can mutate any element. Built-in handlers
/// are attached when an element is created: layout attributes invalidate
/// layout, paint attributes invalidate the build cache, visibility
/// invalidates the parent, and `has_focus` keeps focus exclusive.
#[derive(Debug)]
pub struct ElementTree {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Attributes (set by callers) --
    pub(crate) kind: Vec<ElementKind>,
    pub(crate) props: Vec<ElementProps>,
    pub(crate) triggers: Vec<TriggerList>,
    pub(crate) name_scope: Vec<bool>,
    pub(crate) resources: Vec<ResourceDictionary>,

    // -- Computed state --
    pub(crate) layout: Vec<LayoutSlot>,
    pub(crate) effective_visible: Vec<bool>,
    /// Cleared for items a scroll viewport arranged out of view.
    pub(crate) in_viewport: Vec<bool>,
    pub(crate) build_invalid: Vec<bool>,
    pub(crate) cache: Vec<RenderCache>,
    pub(crate) assets: Vec<AssetScope>,
    pub(crate) mouse_over: Vec<bool>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) alive: Vec<bool>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Focus --
    pub(crate) focused: Option<ElementId>,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
    /// Elements whose viewport flag flipped since the last evaluate.
    pub(crate) pending_viewport: Vec<u32>,
    pub(crate) asset_log: Vec<AssetEvent>,
    pub(crate) focus_log: Vec<FocusChangeEvent>,
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            kind: Vec::new(),
            props: Vec::new(),
            triggers: Vec::new(),
            name_scope: Vec::new(),
            resources: Vec::new(),
            layout: Vec::new(),
            effective_visible: Vec::new(),
            in_viewport: Vec::new(),
            build_invalid: Vec::new(),
            cache: Vec::new(),
            assets: Vec::new(),
            mouse_over: Vec::new(),
            generation: Vec::new(),
            alive: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            focused: None,
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
            pending_viewport: Vec::new(),
            asset_log: Vec::new(),
            focus_log: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Creates a detached element of the given kind and returns its handle.
    ///
    /// The element starts visible, enabled, not focusable, a focus scope,
    /// with auto size, no margin, stretch alignment, and dirty layout.
    pub fn create_element(&mut self, kind: ElementKind) -> ElementId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            let i = idx as usize;
            self.generation[i] += 1;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.kind[i] = kind;
            self.props[i] = ElementProps::default();
            self.triggers[i] = TriggerList::default();
            self.name_scope[i] = false;
            self.resources[i] = ResourceDictionary::default();
            self.layout[i] = LayoutSlot::default();
            self.effective_visible[i] = true;
            self.in_viewport[i] = true;
            self.build_invalid[i] = true;
            self.cache[i] = RenderCache::default();
            self.assets[i] = AssetScope::default();
            self.mouse_over[i] = false;
            self.alive[i] = true;
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.kind.push(kind);
            self.props.push(ElementProps::default());
            self.triggers.push(TriggerList::default());
            self.name_scope.push(false);
            self.resources.push(ResourceDictionary::default());
            self.layout.push(LayoutSlot::default());
            self.effective_visible.push(true);
            self.in_viewport.push(true);
            self.build_invalid.push(true);
            self.cache.push(RenderCache::default());
            self.assets.push(AssetScope::default());
            self.mouse_over.push(false);
            self.generation.push(0);
            self.alive.push(true);
            idx
        };

        let id = ElementId {
            idx,
            generation: self.generation[idx as usize],
        };
        self.attach_builtin_handlers(id);
        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
        self.invalidate(id);
        id
    }

    /// Returns whether the handle refers to a live element.
    #[must_use]
    pub fn is_alive(&self, id: ElementId) -> bool {
        id.idx < self.len && self.generation[id.idx as usize] == id.generation
    }

    /// Number of live elements.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    /// Returns the element's kind.
    #[must_use]
    pub fn kind(&self, id: ElementId) -> &ElementKind {
        self.validate(id);
        &self.kind[id.idx as usize]
    }

    // -- Topology API --

    /// Adds `child` as the last child of `parent`.
    ///
    /// Every named element of `child`'s subtree joins the naming scope of
    /// `parent`; on a name clash nothing is changed.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, if `child` already has a parent, or
    /// if `parent`'s kind cannot own another child.
    pub fn add_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), NameError> {
        self.check_attach(parent, child);
        self.check_subtree_names(parent, child)?;
        let p = parent.idx;
        let c = child.idx;

        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }

        self.link_dependencies(p, c);
        Ok(())
    }

    /// Inserts `child` before `sibling` in `sibling`'s parent.
    ///
    /// # Panics
    ///
    /// Panics if handles are stale, `child` already has a parent, `sibling`
    /// has no parent, or the parent's kind cannot own another child.
    pub fn insert_before(&mut self, child: ElementId, sibling: ElementId) -> Result<(), NameError> {
        self.validate(sibling);
        let s = sibling.idx;
        let p = self.parent[s as usize];
        assert!(p != INVALID, "sibling has no parent");
        let parent = self.id_at(p);
        self.check_attach(parent, child);
        self.check_subtree_names(parent, child)?;
        let c = child.idx;

        self.parent[c as usize] = p;
        self.next_sibling[c as usize] = s;
        self.prev_sibling[c as usize] = self.prev_sibling[s as usize];

        if self.prev_sibling[s as usize] != INVALID {
            self.next_sibling[self.prev_sibling[s as usize] as usize] = c;
        } else {
            // `sibling` was the first child.
            self.first_child[p as usize] = c;
        }
        self.prev_sibling[s as usize] = c;

        self.link_dependencies(p, c);
        Ok(())
    }

    /// Removes `child` from `parent` and destroys its subtree.
    ///
    /// The subtree's assets are released through `backend` depth-first
    /// before the links are cut; afterwards every handle into the subtree
    /// is stale.
    ///
    /// # Panics
    ///
    /// Panics if handles are stale or `child` is not a child of `parent`.
    pub fn remove_child(
        &mut self,
        parent: ElementId,
        child: ElementId,
        backend: &mut dyn RenderBackend,
    ) {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx;
        let c = child.idx;
        assert!(
            self.parent[c as usize] == p,
            "element is not a child of this parent"
        );

        self.deallocate(child, backend);
        if let Some(f) = self.focused
            && self.is_ancestor_or_self(child, f)
        {
            self.focused = None;
        }

        self.unlink_from_parent(c);
        self.dirty.remove_dependency(p, c, dirty::LAYOUT);
        self.dirty.remove_dependency(c, p, dirty::VISIBILITY);
        self.invalidate(parent);
        self.dirty.mark(p, dirty::TOPOLOGY);

        self.destroy_subtree(c);
    }

    /// Removes every child of `parent`, destroying their subtrees.
    pub fn clear_children(&mut self, parent: ElementId, backend: &mut dyn RenderBackend) {
        while let Some(child) = self.children(parent).next() {
            self.remove_child(parent, child, backend);
        }
    }

    /// Returns the parent of an element, if any.
    #[must_use]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        (p != INVALID).then(|| self.id_at(p))
    }

    /// Returns an iterator over the direct children of an element.
    #[must_use]
    pub fn children(&self, id: ElementId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns an iterator over the ancestors of an element, nearest first.
    #[must_use]
    pub fn ancestors(&self, id: ElementId) -> Ancestors<'_> {
        self.validate(id);
        Ancestors::new(self, self.parent[id.idx as usize])
    }

    /// Number of direct children.
    #[must_use]
    pub fn child_count(&self, id: ElementId) -> usize {
        self.children(id).count()
    }

    /// Appends the children this element owns, in document order.
    pub fn add_children(&self, id: ElementId, out: &mut Vec<ElementId>) {
        out.extend(self.children(id));
    }

    /// Returns the topmost ancestor of `id` (or `id` itself).
    #[must_use]
    pub fn root_of(&self, id: ElementId) -> ElementId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Returns whether `ancestor` is `id` or one of its ancestors.
    #[must_use]
    pub fn is_ancestor_or_self(&self, ancestor: ElementId, id: ElementId) -> bool {
        id == ancestor || self.ancestors(id).any(|a| a == ancestor)
    }

    /// Returns the roots (elements without a parent).
    #[must_use]
    pub fn roots(&self) -> Vec<ElementId> {
        (0..self.len)
            .filter(|&idx| self.alive[idx as usize] && self.parent[idx as usize] == INVALID)
            .map(|idx| self.id_at(idx))
            .collect()
    }

    // -- Attribute API --

    /// Returns the current value of an attribute.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the element's kind lacks `field`.
    #[must_use]
    pub fn get<T: 'static>(&self, id: ElementId, field: Field<T>) -> &T {
        self.validate(id);
        match (field.get)(self, id.idx) {
            Some(p) => p.get(),
            None => self.missing_field(id, field.name),
        }
    }

    /// Returns the current value of an attribute, or `None` if the element's
    /// kind lacks it.
    #[must_use]
    pub fn try_get<T: 'static>(&self, id: ElementId, field: Field<T>) -> Option<&T> {
        self.validate(id);
        (field.get)(self, id.idx).map(Property::get)
    }

    /// Sets an attribute and notifies its subscribers, built-in handlers
    /// first.
    ///
    /// Every call notifies, whether or not the value changed.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the element's kind lacks `field`.
    pub fn set<T: Clone + 'static>(&mut self, id: ElementId, field: Field<T>, value: T) {
        self.validate(id);
        let notification = match (field.get_mut)(self, id.idx) {
            Some(p) => p.set(value),
            None => self.missing_field(id, field.name),
        };
        notification.dispatch(self);
    }

    /// Subscribes to changes of an attribute.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the element's kind lacks `field`.
    pub fn attach<T: 'static>(
        &mut self,
        id: ElementId,
        field: Field<T>,
        handler: impl Fn(&mut Self, &T) + 'static,
    ) -> SubscriptionId {
        self.validate(id);
        match (field.get_mut)(self, id.idx) {
            Some(p) => p.attach(handler),
            None => self.missing_field(id, field.name),
        }
    }

    /// Removes a subscription. Returns `false` if it was not attached.
    pub fn detach<T: 'static>(&mut self, id: ElementId, field: Field<T>, sub: SubscriptionId) -> bool {
        self.validate(id);
        (field.get_mut)(self, id.idx).is_some_and(|p| p.detach(sub))
    }

    /// Returns the element's name (empty if unnamed).
    #[must_use]
    pub fn name(&self, id: ElementId) -> &str {
        self.validate(id);
        self.props[id.idx as usize].name.get()
    }

    /// Returns the focused element, if any.
    #[must_use]
    pub fn focused(&self) -> Option<ElementId> {
        self.focused.filter(|f| self.is_alive(*f))
    }

    /// Returns whether the element and all its ancestors are
    /// [`Visible`](Visibility::Visible).
    ///
    /// Only valid after [`evaluate`](Self::evaluate).
    #[must_use]
    pub fn is_effectively_visible(&self, id: ElementId) -> bool {
        self.validate(id);
        self.effective_visible[id.idx as usize]
    }

    /// Returns whether the element lies inside the viewport of the scroll
    /// host that arranged it. Elements outside any scroll host always do.
    #[must_use]
    pub fn is_in_viewport(&self, id: ElementId) -> bool {
        self.validate(id);
        self.in_viewport[id.idx as usize]
    }

    /// Returns whether the element takes part in build and issue: it is
    /// effectively visible and inside its scroll viewport.
    #[must_use]
    pub(crate) fn is_shown(&self, idx: u32) -> bool {
        self.effective_visible[idx as usize] && self.in_viewport[idx as usize]
    }

    /// Records whether a scroll host arranged the element inside its
    /// viewport. A flip that is undone before the next evaluate cancels out.
    pub(crate) fn set_in_viewport(&mut self, id: ElementId, in_view: bool) {
        let i = id.idx as usize;
        if self.in_viewport[i] == in_view {
            return;
        }
        self.in_viewport[i] = in_view;
        match self.pending_viewport.iter().position(|&p| p == id.idx) {
            Some(pos) => {
                self.pending_viewport.swap_remove(pos);
            }
            None => self.pending_viewport.push(id.idx),
        }
    }

    /// Returns whether the pointer is over the element.
    #[must_use]
    pub fn is_mouse_over(&self, id: ElementId) -> bool {
        self.validate(id);
        self.mouse_over[id.idx as usize]
    }

    // -- Invalidation --

    /// Marks the element's layout dirty.
    ///
    /// Only the element's own flag is raised here; ancestors are raised
    /// when pending invalidations are flushed, at the latest by the next
    /// [`update_layout`](Self::update_layout).
    pub fn invalidate(&mut self, id: ElementId) {
        self.validate(id);
        self.layout[id.idx as usize].invalid = true;
        self.dirty.mark_with(id.idx, dirty::LAYOUT, &EagerPolicy);
    }

    /// Marks the element's cached build data stale.
    pub(crate) fn invalidate_geometry(&mut self, id: ElementId) {
        self.dirty.mark(id.idx, dirty::GEOMETRY);
    }

    // -- Copy --

    /// Deep-copies an element subtree and returns the detached copy.
    ///
    /// Attribute values, triggers, resources and naming-scope flags are
    /// copied; focus, layout results and assets are not. Built-in handlers
    /// of each copy are detached during the bulk write and re-attached
    /// afterwards, then the copy is invalidated once.
    pub fn copy_subtree(&mut self, src: ElementId) -> ElementId {
        self.validate(src);
        let copy = self.create_element(self.kind[src.idx as usize].duplicate());
        self.copy_attributes(src, copy);
        let mut children = Vec::new();
        self.add_children(src, &mut children);
        for child in children {
            let child_copy = self.copy_subtree(child);
            // Names are checked when the copy is attached elsewhere.
            self.link_unchecked(copy, child_copy);
        }
        self.invalidate(copy);
        copy
    }

    // -- Internal helpers --

    /// Returns whether the slot at `idx` holds a live element.
    pub(crate) fn is_live_index(&self, idx: u32) -> bool {
        idx < self.len && self.alive[idx as usize]
    }

    /// Builds the handle for a live raw index.
    #[inline]
    pub(crate) fn id_at(&self, idx: u32) -> ElementId {
        ElementId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    pub(crate) fn validate(&self, id: ElementId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale ElementId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    fn missing_field(&self, id: ElementId, name: &str) -> ! {
        panic!(
            "`{name}` is not an attribute of a {} element",
            self.kind[id.idx as usize].name()
        )
    }

    fn check_attach(&self, parent: ElementId, child: ElementId) {
        self.validate(parent);
        self.validate(child);
        assert!(
            self.parent[child.idx as usize] == INVALID,
            "child already has a parent"
        );
        assert!(parent != child, "element cannot be its own child");
        let kind = &self.kind[parent.idx as usize];
        assert!(
            self.child_count(parent) < kind.max_children(),
            "a {} element cannot own another child",
            kind.name()
        );
    }

    /// Appends `c` under `p` without name registration (used by copies,
    /// which are detached and have no naming scope yet).
    fn link_unchecked(&mut self, parent: ElementId, child: ElementId) {
        let (p, c) = (parent.idx, child.idx);
        self.parent[c as usize] = p;
        let mut last = self.first_child[p as usize];
        if last == INVALID {
            self.first_child[p as usize] = c;
        } else {
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }
        self.link_dependencies(p, c);
    }

    /// Wires dirty edges for a freshly linked child and invalidates.
    fn link_dependencies(&mut self, p: u32, c: u32) {
        // Parent layout depends on the child; child visibility on the parent.
        let _ = self.dirty.add_dependency(p, c, dirty::LAYOUT);
        let _ = self.dirty.add_dependency(c, p, dirty::VISIBILITY);
        self.dirty.mark_with(c, dirty::VISIBILITY, &EagerPolicy);
        self.dirty.mark(p, dirty::TOPOLOGY);
        let child = self.id_at(c);
        self.invalidate(child);
    }

    /// Removes `idx` from its parent's child list without touching dirty state.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }

    /// Frees `idx` and every descendant, children first.
    fn destroy_subtree(&mut self, idx: u32) {
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            let next = self.next_sibling[child as usize];
            self.destroy_subtree(child);
            child = next;
        }
        self.first_child[idx as usize] = INVALID;
        self.parent[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        // Drop subscribers and trigger closures now rather than at reuse.
        self.props[idx as usize] = ElementProps::default();
        self.triggers[idx as usize] = TriggerList::default();

        self.dirty.remove_key(idx);
        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;
        self.alive[idx as usize] = false;
        self.free_list.push(idx);
        self.pending_removed.push(idx);
    }

    fn copy_attributes(&mut self, src: ElementId, dst: ElementId) {
        let (s, d) = (src.idx as usize, dst.idx as usize);

        macro_rules! bulk_copy {
            ($($slot:ident),* $(,)?) => {$(
                let value = self.props[s].$slot.get().clone();
                let saved = self.props[d].$slot.take_subscribers();
                // Nobody is subscribed, so the notification is empty.
                let _ = self.props[d].$slot.set(value);
                self.props[d].$slot.restore_subscribers(saved);
            )*};
        }
        bulk_copy!(
            name,
            visibility,
            opacity,
            margin,
            width,
            height,
            horizontal_alignment,
            vertical_alignment,
            layout_transform,
            render_transform,
            render_transform_origin,
            opacity_mask,
            background,
            enabled,
            focusable,
            is_focus_scope,
            z_index,
        );

        self.triggers[d].triggers = self.triggers[s].triggers.clone();
        self.resources[d] = self.resources[s].clone();
        self.name_scope[d] = self.name_scope[s];
        self.effective_visible[d] = self.props[d].visibility.get().is_visible();
    }

    fn attach_builtin_handlers(&mut self, id: ElementId) {
        let idx = id.idx as usize;
        let relayout = move |tree: &mut Self| tree.invalidate(id);
        let repaint = move |tree: &mut Self| tree.invalidate_geometry(id);

        let props = &mut self.props[idx];
        props.width.attach(move |t, _| relayout(t));
        props.height.attach(move |t, _| relayout(t));
        props.margin.attach(move |t, _| relayout(t));
        props.horizontal_alignment.attach(move |t, _| relayout(t));
        props.vertical_alignment.attach(move |t, _| relayout(t));
        props.layout_transform.attach(move |t, _| relayout(t));
        props.visibility.attach(move |t, _| t.on_visibility_changed(id));
        props.background.attach(move |t, _| repaint(t));
        props.opacity_mask.attach(move |t, _| repaint(t));
        props.has_focus.attach(move |t, v| t.on_has_focus_changed(id, *v));

        match &mut self.kind[idx] {
            ElementKind::Container(d) => {
                d.arrangement.attach(move |t, _| relayout(t));
            }
            ElementKind::ContentHost => {}
            ElementKind::ItemsHost(d) => {
                d.orientation.attach(move |t, _| relayout(t));
                d.can_scroll.attach(move |t, _| relayout(t));
                d.scroll_offset.attach(move |t, _| relayout(t));
            }
            ElementKind::Text(d) => {
                d.text.attach(move |t, _| {
                    relayout(t);
                    repaint(t);
                });
                d.font.attach(move |t, _| {
                    relayout(t);
                    repaint(t);
                });
                d.color.attach(move |t, _| repaint(t));
            }
            ElementKind::InputLeaf(d) => {
                d.texture.attach(move |t, _| repaint(t));
                d.natural_size.attach(move |t, _| relayout(t));
            }
        }
    }

    fn on_visibility_changed(&mut self, id: ElementId) {
        match self.parent(id) {
            Some(parent) => self.invalidate(parent),
            None => self.invalidate(id),
        }
        self.dirty
            .mark_with(id.idx, dirty::VISIBILITY, &EagerPolicy);
    }

    fn on_has_focus_changed(&mut self, id: ElementId, has_focus: bool) {
        if has_focus {
            let previous = self.focused();
            // Claim focus first so the previous holder's handler sees it gone.
            self.focused = Some(id);
            if previous != Some(id) {
                if let Some(prev) = previous {
                    self.set(prev, field::HAS_FOCUS, false);
                }
                self.focus_log.push(FocusChangeEvent {
                    from: previous.map(ElementId::index),
                    to: Some(id.idx),
                });
            }
            self.fire_event(id, &RoutedEvent::GotFocus);
        } else {
            if self.focused == Some(id) {
                self.focused = None;
                self.focus_log.push(FocusChangeEvent {
                    from: Some(id.idx),
                    to: None,
                });
            }
            self.fire_event(id, &RoutedEvent::LostFocus);
        }
    }
}

// Layout state accessors live next to the storage so callers can inspect
// results without going through the layout module.
impl ElementTree {
    /// Returns the content size computed by the last measure (excluding
    /// margins).
    #[must_use]
    pub fn desired_size(&self, id: ElementId) -> Size {
        self.validate(id);
        self.layout[id.idx as usize].desired
    }

    /// Returns the desired size including margins.
    #[must_use]
    pub fn total_desired_size(&self, id: ElementId) -> Size {
        self.validate(id);
        self.layout[id.idx as usize].total_desired
    }

    /// Returns the rectangle assigned by the last arrange (margins already
    /// removed).
    #[must_use]
    pub fn actual_rect(&self, id: ElementId) -> Rect {
        self.validate(id);
        self.layout[id.idx as usize].actual
    }

    /// Returns the top-left corner of [`actual_rect`](Self::actual_rect).
    #[must_use]
    pub fn actual_position(&self, id: ElementId) -> Point {
        self.actual_rect(id).origin()
    }

    /// Returns the z-order sampled when the element was last arranged.
    #[must_use]
    pub fn actual_z(&self, id: ElementId) -> f64 {
        self.validate(id);
        self.layout[id.idx as usize].z
    }

    /// Returns whether the element's layout flag is raised.
    #[must_use]
    pub fn is_layout_invalid(&self, id: ElementId) -> bool {
        self.validate(id);
        self.layout[id.idx as usize].invalid
    }
}
