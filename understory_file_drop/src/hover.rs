// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover counters: net enter/leave balance per element.
//!
//! Browsers fire `dragleave` on a parent whenever the pointer moves onto one of
//! its children, immediately followed by `dragenter` on that child. Tracking a
//! plain boolean per element therefore flickers. Counting every enter and leave
//! that happens *anywhere inside* an element fixes this: the child's enter and
//! the parent's leave cancel out, and the element's count only reaches zero
//! once the pointer has left its whole subtree.
//!
//! ```
//! use understory_file_drop::hover::{DragPhase, HoverCounts};
//!
//! let mut counts = HoverCounts::<u32>::new();
//! // Enter parent 1.
//! counts.apply(1, DragPhase::Enter);
//! // Pointer moves onto child 2: the child's enter bubbles to 1 first, then
//! // the parent receives its own leave.
//! counts.apply(1, DragPhase::Enter);
//! counts.apply(1, DragPhase::Leave);
//! assert!(counts.is_over(1));
//! ```

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use crate::subscription::TargetId;

/// Kind of boundary crossing reported by the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DragPhase {
    /// `dragenter`: the pointer crossed into an element.
    Enter,
    /// `dragleave`: the pointer crossed out of an element.
    Leave,
}

/// A hover transition produced by the reconciler.
///
/// These are idempotent "set flag" notifications: an element that is still
/// hovered after an update reports `*Entered` again.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HoverEvent<K> {
    /// A drag is active somewhere over the root scope.
    RootEntered,
    /// No drag is active over the root scope any more.
    RootLeft,
    /// The pointer is over the subtree of `target`'s element.
    TargetEntered {
        /// The hovered target.
        target: TargetId,
        /// Its element.
        element: K,
    },
    /// The pointer is no longer over `target`'s element.
    TargetLeft {
        /// The target that lost hover.
        target: TargetId,
        /// Its element.
        element: K,
    },
}

impl<K> HoverEvent<K> {
    /// Returns `true` for the two `*Entered` variants.
    #[must_use]
    pub fn is_enter(&self) -> bool {
        matches!(self, Self::RootEntered | Self::TargetEntered { .. })
    }
}

/// Per-element hover counters. An absent entry means zero.
#[derive(Clone, Debug)]
pub struct HoverCounts<K> {
    counts: HashMap<K, u32>,
}

impl<K> Default for HoverCounts<K> {
    fn default() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash + core::fmt::Debug> HoverCounts<K> {
    /// Creates an empty set of counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current count for `element`.
    #[must_use]
    pub fn count(&self, element: K) -> u32 {
        self.counts.get(&element).copied().unwrap_or(0)
    }

    /// Returns `true` while `element`'s count is positive.
    #[must_use]
    pub fn is_over(&self, element: K) -> bool {
        self.count(element) > 0
    }

    /// Applies one enter or leave to `element` and returns the new count.
    ///
    /// A leave on an element whose count is already zero is ignored.
    pub fn apply(&mut self, element: K, phase: DragPhase) -> u32 {
        match (phase, self.counts.entry(element)) {
            (DragPhase::Enter, Entry::Occupied(mut slot)) => {
                *slot.get_mut() += 1;
                *slot.get()
            }
            (DragPhase::Enter, Entry::Vacant(slot)) => *slot.insert(1),
            (DragPhase::Leave, Entry::Occupied(mut slot)) => {
                if *slot.get() <= 1 {
                    slot.remove();
                    0
                } else {
                    *slot.get_mut() -= 1;
                    *slot.get()
                }
            }
            (DragPhase::Leave, Entry::Vacant(_)) => {
                log::debug!("unmatched drag leave on {element:?}");
                0
            }
        }
    }

    /// Forgets the counter for `element`.
    pub fn remove(&mut self, element: K) {
        self.counts.remove(&element);
    }

    /// Clears every counter, returning the elements that were hovered.
    pub fn clear(&mut self) -> Vec<K> {
        self.counts.drain().map(|(k, _)| k).collect()
    }

    /// Number of elements with a positive count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` when no element is hovered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
