// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the demos.
//!
//! [`Page`] is a tiny stand-in for a document: a list of named nodes with
//! parent links. Demos feed it to the hover registry as a parent lookup and
//! use it to narrate drag gestures by element name.

use understory_file_drop::hover::HoverEvent;
use understory_file_drop::path::ParentLookup;
use understory_file_drop::registry::SharedRegistry;

/// Node handle in a [`Page`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Node(pub u32);

/// A flat page tree; node 0 is the body.
#[derive(Debug)]
pub struct Page {
    nodes: Vec<(&'static str, Option<Node>)>,
}

impl Page {
    /// Creates a page holding only the body.
    pub fn new() -> Self {
        Self {
            nodes: vec![("body", None)],
        }
    }

    /// The body node.
    pub fn body(&self) -> Node {
        Node(0)
    }

    /// Appends a child named `name` under `parent`.
    pub fn add(&mut self, parent: Node, name: &'static str) -> Node {
        let id = Node(self.nodes.len() as u32);
        self.nodes.push((name, Some(parent)));
        id
    }

    /// Name of `node`, or `"?"` for unknown handles.
    pub fn name(&self, node: Node) -> &'static str {
        self.nodes.get(node.0 as usize).map_or("?", |(name, _)| name)
    }

    /// Simulates the pointer moving from `from` onto `to`.
    ///
    /// Browsers fire `dragenter` on the new element before `dragleave` on the
    /// old one; both are forwarded in that order.
    pub fn cross(&self, registry: &SharedRegistry<Node>, from: Node, to: Node) {
        let entered = registry.borrow_mut().drag_enter_at(to, self);
        let left = registry.borrow_mut().drag_leave_at(from, self);
        println!("  {} -> {}", self.name(from), self.name(to));
        for event in entered.iter().chain(&left) {
            println!("    {}", self.describe(event));
        }
    }

    /// Renders a hover event using element names.
    pub fn describe(&self, event: &HoverEvent<Node>) -> String {
        match event {
            HoverEvent::RootEntered => "page: dragging".to_string(),
            HoverEvent::RootLeft => "page: idle".to_string(),
            HoverEvent::TargetEntered { element, .. } => {
                format!("{}: dragging over", self.name(*element))
            }
            HoverEvent::TargetLeft { element, .. } => {
                format!("{}: not dragging over", self.name(*element))
            }
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl ParentLookup<Node> for Page {
    fn parent_of(&self, node: &Node) -> Option<Node> {
        self.nodes.get(node.0 as usize).and_then(|(_, parent)| *parent)
    }
}
