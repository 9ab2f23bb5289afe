// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Target identities and attach/detach bookkeeping.
//!
//! Every drop target gets a [`TargetId`] when it is created. Attaching it to an
//! element yields a [`Subscription`] token; handing that token back detaches
//! exactly that registration. Tokens carry an attach generation, so a token
//! kept from an earlier attach cycle cannot detach a later one.

use core::hash::Hash;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use crate::error::AttachError;

/// Opaque identity of a drop target, stable for the target's lifetime.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(u32);

impl TargetId {
    pub(crate) const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric id.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Token returned by an attach, passed back to detach.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Subscription {
    target: TargetId,
    generation: u32,
}

impl Subscription {
    /// The target this subscription belongs to.
    #[inline]
    #[must_use]
    pub const fn target(&self) -> TargetId {
        self.target
    }
}

#[derive(Copy, Clone, Debug)]
struct Attached<K> {
    element: K,
    generation: u32,
}

/// Two-way table of attached targets and the elements they render to.
#[derive(Clone, Debug)]
pub(crate) struct Subscriptions<K> {
    by_target: HashMap<TargetId, Attached<K>>,
    by_element: HashMap<K, TargetId>,
    next_generation: u32,
}

impl<K> Default for Subscriptions<K> {
    fn default() -> Self {
        Self {
            by_target: HashMap::new(),
            by_element: HashMap::new(),
            next_generation: 0,
        }
    }
}

impl<K: Copy + Eq + Hash> Subscriptions<K> {
    pub(crate) fn attach(
        &mut self,
        target: TargetId,
        element: K,
    ) -> Result<Subscription, AttachError<K>> {
        if let Some(existing) = self.by_target.get(&target) {
            return if existing.element == element {
                Ok(Subscription {
                    target,
                    generation: existing.generation,
                })
            } else {
                Err(AttachError::AlreadyAttached {
                    target,
                    element: existing.element,
                })
            };
        }
        match self.by_element.entry(element) {
            Entry::Occupied(owner) => Err(AttachError::ElementInUse {
                element,
                owner: *owner.get(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(target);
                let generation = self.next_generation;
                self.next_generation = self.next_generation.wrapping_add(1);
                self.by_target.insert(
                    target,
                    Attached {
                        element,
                        generation,
                    },
                );
                Ok(Subscription { target, generation })
            }
        }
    }

    /// Removes the registration named by `sub`, returning its element.
    ///
    /// Stale or unknown tokens are ignored.
    pub(crate) fn detach(&mut self, sub: Subscription) -> Option<K> {
        match self.by_target.entry(sub.target) {
            Entry::Occupied(slot) if slot.get().generation == sub.generation => {
                let element = slot.remove().element;
                self.by_element.remove(&element);
                Some(element)
            }
            _ => None,
        }
    }

    pub(crate) fn is_attached(&self, target: TargetId) -> bool {
        self.by_target.contains_key(&target)
    }

    pub(crate) fn element_of(&self, target: TargetId) -> Option<K> {
        self.by_target.get(&target).map(|a| a.element)
    }

    pub(crate) fn target_at(&self, element: K) -> Option<TargetId> {
        self.by_element.get(&element).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_target.len()
    }
}
