// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_file_drop --heading-base-level=0

//! Understory File Drop: hover tracking and drop validation for file drop targets.
//!
//! This crate holds the state behind "drop files here" regions. It answers two
//! questions from a stream of drag events:
//!
//! - Is the pointer over a given drop target right now, even though the browser
//!   fires `dragleave` every time the pointer moves onto one of its children?
//! - Is a file drag active anywhere over the page?
//!
//! and turns a raw drop into a validated, normalized set of files.
//!
//! The pieces:
//!
//! - [`registry`]: the page-scoped [`HoverRegistry`](registry::HoverRegistry) shared by
//!   every target. Reconciles enter/leave events into per-element counters.
//! - [`target`]: the per-widget [`DropTarget`](target::DropTarget) with its drag-over
//!   affordance and drop validation.
//! - [`hover`]: the counters and the [`HoverEvent`](hover::HoverEvent)s they produce.
//! - [`subscription`]: target identities and attach/detach tokens.
//! - [`pattern`]: MIME type patterns such as `image/*`.
//! - [`path`]: ancestor resolution through a [`ParentLookup`](path::ParentLookup).
//!
//! The crate does not touch the DOM. Element identity is any `Copy + Eq + Hash`
//! key the host chooses; `understory_file_drop_web` binds it to `web-sys`.
//!
//! ## Example
//!
//! ```rust
//! use understory_file_drop::file::FileInfo;
//! use understory_file_drop::registry::HoverRegistry;
//! use understory_file_drop::target::{DropOptions, DropTarget};
//!
//! // Page root 0 holds two sibling drop zones, 1 and 2. Element 3 is a label
//! // inside zone 1.
//! let parent = |n: &u32| match *n {
//!     1 | 2 => Some(0),
//!     3 => Some(1),
//!     _ => None,
//! };
//!
//! let registry = HoverRegistry::shared(0_u32);
//! let mut left = DropTarget::<u32, FileInfo>::new(&registry, 1, DropOptions::default());
//! let mut right = DropTarget::<u32, FileInfo>::new(&registry, 2, DropOptions::default());
//! left.attach().unwrap();
//! right.attach().unwrap();
//!
//! // Pointer enters zone 1, then moves onto its label.
//! registry.borrow_mut().drag_enter_at(1, &parent);
//! registry.borrow_mut().drag_enter_at(3, &parent);
//! registry.borrow_mut().drag_leave_at(1, &parent);
//!
//! assert!(left.is_dragging_over_self());
//! assert!(!right.is_dragging_over_self());
//! assert!(right.is_dragging_over_root());
//!
//! // Drop a file on the label; it lands in zone 1.
//! left.handle_drop([FileInfo::new("cat.png", "image/png")], &mut ());
//! assert_eq!(left.file().map(|f| f.name.as_str()), Some("cat.png"));
//! assert!(!left.is_dragging_over_root());
//! ```
//!
//! ## Features
//!
//! - `serde`: (de)serialize [`DropOptions`](target::DropOptions) and
//!   [`TypePattern`](pattern::TypePattern).
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

pub mod error;
pub mod file;
pub mod hover;
pub mod path;
pub mod pattern;
pub mod registry;
pub mod subscription;
pub mod target;

pub use error::{AttachError, PatternError};
pub use registry::{HoverRegistry, SharedRegistry};
pub use target::{DropOptions, DropTarget};
