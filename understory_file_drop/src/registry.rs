// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page-scoped hover registry shared by every drop target.
//!
//! ## Usage
//!
//! 1) Create one registry per root scope with [`HoverRegistry::shared`].
//! 2) Construct a [`DropTarget`](crate::target::DropTarget) per widget, passing
//!    the shared registry, and attach it.
//! 3) Route every `dragenter`/`dragleave` seen on the root to
//!    [`HoverRegistry::drag_enter`] / [`HoverRegistry::drag_leave`] (or their
//!    `_at` variants that resolve ancestors through a [`ParentLookup`]).
//! 4) Apply the returned [`HoverEvent`]s to your visuals.
//!
//! ## Minimal example
//!
//! ```
//! use understory_file_drop::hover::HoverEvent;
//! use understory_file_drop::registry::HoverRegistry;
//!
//! // Root 0 contains drop target element 1.
//! let mut registry = HoverRegistry::new(0_u32);
//! let target = registry.next_target_id();
//! registry.attach(target, 1).unwrap();
//!
//! let events = registry.drag_enter([1, 0]);
//! assert_eq!(
//!     events,
//!     vec![
//!         HoverEvent::TargetEntered { target, element: 1 },
//!         HoverEvent::RootEntered,
//!     ]
//! );
//! assert!(registry.is_dragging_over(target));
//!
//! registry.drag_leave([1, 0]);
//! assert!(!registry.is_dragging_over_root());
//! ```

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt::Debug;
use core::hash::Hash;

use smallvec::SmallVec;

use crate::error::AttachError;
use crate::hover::{DragPhase, HoverCounts, HoverEvent};
use crate::path::{ParentLookup, ancestors};
use crate::subscription::{Subscription, Subscriptions, TargetId};

/// A registry shared by all targets of one root scope.
pub type SharedRegistry<K> = Rc<RefCell<HoverRegistry<K>>>;

/// Detaches queued by targets dropped while the registry was borrowed.
pub(crate) type PendingDetach = Rc<RefCell<Vec<Subscription>>>;

/// Resolved set of elements touched by one enter/leave.
type Touched<K> = SmallVec<[K; 8]>;

/// Hover counters, attached targets and the root scope they live in.
///
/// A registry owns its target ids and element claims, so it cannot be cloned;
/// share it through [`SharedRegistry`] instead.
///
/// ```compile_fail
/// use understory_file_drop::registry::HoverRegistry;
///
/// let registry = HoverRegistry::new(0_u32);
/// let _copy = registry.clone();
/// ```
///
/// Targets dropped while the registry is borrowed queue their detach; it is
/// applied at the start of the next `attach`, `detach`, reconcile or `cancel`.
#[derive(Debug)]
pub struct HoverRegistry<K> {
    root: K,
    counts: HoverCounts<K>,
    subscriptions: Subscriptions<K>,
    next_target: u32,
    pending: PendingDetach,
}

impl<K> HoverRegistry<K>
where
    K: Copy + Eq + Hash + Debug,
{
    /// Creates a registry for the root scope `root`.
    pub fn new(root: K) -> Self {
        Self {
            root,
            counts: HoverCounts::new(),
            subscriptions: Subscriptions::default(),
            next_target: 0,
            pending: PendingDetach::default(),
        }
    }

    /// Creates a registry already wrapped for sharing between targets.
    pub fn shared(root: K) -> SharedRegistry<K> {
        Rc::new(RefCell::new(Self::new(root)))
    }

    /// The root scope element.
    pub fn root(&self) -> K {
        self.root
    }

    /// Allocates a fresh target identity.
    pub fn next_target_id(&mut self) -> TargetId {
        let id = TargetId::from_raw(self.next_target);
        self.next_target = self.next_target.wrapping_add(1);
        id
    }

    /// Queue that targets push onto when they are dropped mid-borrow.
    pub(crate) fn pending_detach(&self) -> PendingDetach {
        Rc::clone(&self.pending)
    }

    /// Applies detaches queued while the registry was borrowed.
    fn flush_pending(&mut self) {
        let pending = core::mem::take(&mut *self.pending.borrow_mut());
        for sub in pending {
            self.remove(sub);
        }
    }

    /// Registers `target` as rendering to `element`.
    ///
    /// Attaching the same target to the same element again returns the
    /// existing subscription.
    pub fn attach(
        &mut self,
        target: TargetId,
        element: K,
    ) -> Result<Subscription, AttachError<K>> {
        self.flush_pending();
        let sub = self.subscriptions.attach(target, element)?;
        log::debug!("attached {target:?} to {element:?}");
        Ok(sub)
    }

    /// Removes the registration named by `sub`.
    ///
    /// Returns `false` if it was already detached. The element's counter is
    /// forgotten unless the element is also the root.
    pub fn detach(&mut self, sub: Subscription) -> bool {
        self.flush_pending();
        self.remove(sub)
    }

    fn remove(&mut self, sub: Subscription) -> bool {
        match self.subscriptions.detach(sub) {
            Some(element) => {
                if element != self.root {
                    self.counts.remove(element);
                }
                log::debug!("detached {:?} from {element:?}", sub.target());
                true
            }
            None => false,
        }
    }

    /// Returns `true` while `target` is attached.
    pub fn is_attached(&self, target: TargetId) -> bool {
        self.subscriptions.is_attached(target)
    }

    /// The attached target rendering to `element`, if any.
    pub fn target_at(&self, element: K) -> Option<TargetId> {
        self.subscriptions.target_at(element)
    }

    /// Number of attached targets.
    pub fn target_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Current hover counter of `element`.
    pub fn count(&self, element: K) -> u32 {
        self.counts.count(element)
    }

    /// Returns `true` while any drag is active over the root scope.
    pub fn is_dragging_over_root(&self) -> bool {
        self.counts.is_over(self.root)
    }

    /// Returns `true` while the pointer is over `target`'s element.
    ///
    /// Always `false` for detached targets.
    pub fn is_dragging_over(&self, target: TargetId) -> bool {
        self.subscriptions
            .element_of(target)
            .is_some_and(|element| self.counts.is_over(element))
    }

    /// Applies a `dragenter` whose origin and ancestors are `path`.
    pub fn drag_enter(&mut self, path: impl IntoIterator<Item = K>) -> Vec<HoverEvent<K>> {
        self.reconcile(DragPhase::Enter, path)
    }

    /// Applies a `dragleave` whose origin and ancestors are `path`.
    pub fn drag_leave(&mut self, path: impl IntoIterator<Item = K>) -> Vec<HoverEvent<K>> {
        self.reconcile(DragPhase::Leave, path)
    }

    /// Applies a `dragenter` on `origin`, resolving ancestors through `lookup`.
    pub fn drag_enter_at<L>(&mut self, origin: K, lookup: &L) -> Vec<HoverEvent<K>>
    where
        L: ParentLookup<K> + ?Sized,
    {
        self.reconcile(DragPhase::Enter, ancestors(origin, lookup))
    }

    /// Applies a `dragleave` on `origin`, resolving ancestors through `lookup`.
    pub fn drag_leave_at<L>(&mut self, origin: K, lookup: &L) -> Vec<HoverEvent<K>>
    where
        L: ParentLookup<K> + ?Sized,
    {
        self.reconcile(DragPhase::Leave, ancestors(origin, lookup))
    }

    /// Applies one enter or leave to every target in `path` and to the root.
    ///
    /// Elements in `path` that are not attached targets are skipped. The root
    /// is always counted, whether or not `path` reaches it.
    pub fn reconcile(
        &mut self,
        phase: DragPhase,
        path: impl IntoIterator<Item = K>,
    ) -> Vec<HoverEvent<K>> {
        self.flush_pending();
        let mut touched = Touched::new();
        for element in path {
            if element != self.root
                && !touched.contains(&element)
                && self.subscriptions.target_at(element).is_some()
            {
                touched.push(element);
            }
        }
        touched.push(self.root);

        let mut events = Vec::with_capacity(touched.len() + 1);
        for element in touched {
            let over = self.counts.apply(element, phase) > 0;
            if let Some(target) = self.subscriptions.target_at(element) {
                events.push(if over {
                    HoverEvent::TargetEntered { target, element }
                } else {
                    HoverEvent::TargetLeft { target, element }
                });
            }
            if element == self.root {
                events.push(if over {
                    HoverEvent::RootEntered
                } else {
                    HoverEvent::RootLeft
                });
            }
        }
        log::trace!("{phase:?} -> {events:?}");
        events
    }

    /// Clears every counter and returns a `*Left` for each element that was
    /// hovered.
    ///
    /// Called on every drop; hosts also call it when a gesture ends without a
    /// drop (window blur, `dragend`, drop outside any target).
    pub fn cancel(&mut self) -> Vec<HoverEvent<K>> {
        self.flush_pending();
        let cleared = self.counts.clear();
        let mut events = Vec::with_capacity(cleared.len() + 1);
        let mut root_was_over = false;
        for element in cleared {
            if let Some(target) = self.subscriptions.target_at(element) {
                events.push(HoverEvent::TargetLeft { target, element });
            }
            root_was_over |= element == self.root;
        }
        if root_was_over {
            events.push(HoverEvent::RootLeft);
        }
        if !events.is_empty() {
            log::debug!("hover state reset: {events:?}");
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    const ROOT: u32 = 0;

    #[test]
    fn root_is_counted_without_targets() {
        let mut registry = HoverRegistry::new(ROOT);
        assert_eq!(registry.drag_enter([5, 4]), vec![HoverEvent::RootEntered]);
        assert_eq!(registry.count(ROOT), 1);
        assert_eq!(registry.count(5), 0, "non-targets are not tracked");
        assert_eq!(registry.drag_leave([5, 4]), vec![HoverEvent::RootLeft]);
    }

    #[test]
    fn repeated_path_entries_count_once() {
        let mut registry = HoverRegistry::new(ROOT);
        let t = registry.next_target_id();
        registry.attach(t, 1).unwrap();
        registry.drag_enter([1, 1, ROOT, ROOT]);
        assert_eq!(registry.count(1), 1);
        assert_eq!(registry.count(ROOT), 1);
    }

    #[test]
    fn root_target_reports_both_events() {
        let mut registry = HoverRegistry::new(ROOT);
        let t = registry.next_target_id();
        registry.attach(t, ROOT).unwrap();
        assert_eq!(
            registry.drag_enter([ROOT]),
            vec![
                HoverEvent::TargetEntered {
                    target: t,
                    element: ROOT
                },
                HoverEvent::RootEntered,
            ]
        );
    }

    #[test]
    fn detach_forgets_counter_and_hover() {
        let mut registry = HoverRegistry::new(ROOT);
        let t = registry.next_target_id();
        let sub = registry.attach(t, 1).unwrap();
        registry.drag_enter([1, ROOT]);
        assert!(registry.is_dragging_over(t));

        assert!(registry.detach(sub));
        assert!(!registry.is_dragging_over(t));
        assert_eq!(registry.count(1), 0);
        assert!(registry.is_dragging_over_root());
        assert!(!registry.detach(sub));
    }

    #[test]
    fn cancel_reports_only_hovered_elements() {
        let mut registry = HoverRegistry::new(ROOT);
        let a = registry.next_target_id();
        let b = registry.next_target_id();
        registry.attach(a, 1).unwrap();
        registry.attach(b, 2).unwrap();
        registry.drag_enter([1, ROOT]);

        assert_eq!(
            registry.cancel(),
            vec![
                HoverEvent::TargetLeft {
                    target: a,
                    element: 1
                },
                HoverEvent::RootLeft,
            ]
        );
        assert!(registry.cancel().is_empty());
    }

    #[test]
    fn lookup_variants_walk_ancestors() {
        // 3 -> 2 -> 1 -> ROOT
        let parent = |n: &u32| if *n == ROOT { None } else { Some(n - 1) };
        let mut registry = HoverRegistry::new(ROOT);
        let outer = registry.next_target_id();
        registry.attach(outer, 1).unwrap();

        registry.drag_enter_at(3, &parent);
        assert!(registry.is_dragging_over(outer));
        assert_eq!(registry.count(ROOT), 1);

        registry.drag_leave_at(3, &parent);
        assert!(!registry.is_dragging_over(outer));
        assert!(!registry.is_dragging_over_root());
    }

    #[test]
    fn queued_detach_applies_on_next_mutation() {
        let mut registry = HoverRegistry::new(ROOT);
        let t = registry.next_target_id();
        let sub = registry.attach(t, 1).unwrap();
        registry.pending_detach().borrow_mut().push(sub);
        assert!(registry.is_attached(t), "queued detach waits for a mutation");

        assert_eq!(registry.drag_enter([1, ROOT]), vec![HoverEvent::RootEntered]);
        assert!(!registry.is_attached(t));
        assert_eq!(registry.count(1), 0);
    }

    #[test]
    fn target_ids_are_unique() {
        let mut registry = HoverRegistry::new(ROOT);
        let a = registry.next_target_id();
        let b = registry.next_target_id();
        assert_ne!(a, b);
        assert_eq!(b.get(), a.get() + 1);
    }
}
