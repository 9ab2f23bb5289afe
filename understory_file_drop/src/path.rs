// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ancestor resolution for drag events.
//!
//! Drag enter/leave events fire on whatever descendant the pointer crossed.
//! The reconciler needs that origin plus all of its ancestors; embedders either
//! hand over a pre-resolved origin→root path or provide a [`ParentLookup`].
//!
//! ```
//! use understory_file_drop::path::ancestors;
//!
//! // 3 is inside 2, which is inside 1.
//! let parent = |n: &u32| match *n {
//!     3 => Some(2),
//!     2 => Some(1),
//!     _ => None,
//! };
//! let chain: Vec<u32> = ancestors(3, &parent).collect();
//! assert_eq!(chain, vec![3, 2, 1]);
//! ```

/// Upper bound on the number of ancestors walked from one origin.
///
/// Protects against lookups that accidentally form a cycle.
pub const MAX_DEPTH: usize = 4096;

/// Source of parent links for element keys.
pub trait ParentLookup<K> {
    /// Returns the parent of `node`, or `None` at the top of the tree.
    fn parent_of(&self, node: &K) -> Option<K>;
}

impl<K, F> ParentLookup<K> for F
where
    F: Fn(&K) -> Option<K>,
{
    #[inline]
    fn parent_of(&self, node: &K) -> Option<K> {
        self(node)
    }
}

/// Iterator over `origin` followed by its ancestors, innermost first.
#[derive(Debug)]
pub struct Ancestors<'a, K, L: ?Sized> {
    next: Option<K>,
    lookup: &'a L,
    remaining: usize,
}

impl<K, L> Iterator for Ancestors<'_, K, L>
where
    K: Copy,
    L: ParentLookup<K> + ?Sized,
{
    type Item = K;

    fn next(&mut self) -> Option<K> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next?;
        self.remaining -= 1;
        self.next = self.lookup.parent_of(&current);
        Some(current)
    }
}

/// Walks from `origin` up through its ancestors.
///
/// Stops at the first node without a parent or after [`MAX_DEPTH`] nodes.
pub fn ancestors<K, L>(origin: K, lookup: &L) -> Ancestors<'_, K, L>
where
    K: Copy,
    L: ParentLookup<K> + ?Sized,
{
    Ancestors {
        next: Some(origin),
        lookup,
        remaining: MAX_DEPTH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn origin_without_parent_yields_itself() {
        let none = |_: &u32| None;
        let chain: Vec<u32> = ancestors(5, &none).collect();
        assert_eq!(chain, [5]);
    }

    #[test]
    fn cyclic_lookup_is_bounded() {
        // 1 -> 2 -> 1 -> ...
        let cyclic = |n: &u32| Some(if *n == 1 { 2 } else { 1 });
        assert_eq!(ancestors(1, &cyclic).count(), MAX_DEPTH);
    }

    #[test]
    fn trait_objects_work_as_lookups() {
        struct Table(Vec<Option<u32>>);
        impl ParentLookup<u32> for Table {
            fn parent_of(&self, node: &u32) -> Option<u32> {
                self.0.get(*node as usize).copied().flatten()
            }
        }

        let table = Table(alloc::vec![None, Some(0), Some(1)]);
        let dyn_lookup: &dyn ParentLookup<u32> = &table;
        let chain: Vec<u32> = ancestors(2, dyn_lookup).collect();
        assert_eq!(chain, [2, 1, 0]);
    }
}
