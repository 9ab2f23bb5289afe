// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_file_drop_web --heading-base-level=0

//! DOM binding for [`understory_file_drop`] targets.
//!
//! When targeting `wasm32`, this crate provides `WebDropRoot` and
//! `WebDropZone`, which wire `web_sys` drag events into a shared
//! [`HoverRegistry`](understory_file_drop::HoverRegistry) and toggle CSS
//! classes as the pointer moves.
//!
//! # Usage
//!
//! Install one root per page (usually on `document.body`), then mount a zone
//! per widget element. Dropping a zone unmounts it.
//!
//! ```no_run
//! #[cfg(target_arch = "wasm32")]
//! fn mount(
//!     body: web_sys::Element,
//!     zone: web_sys::Element,
//! ) -> Result<(), wasm_bindgen::JsValue> {
//!     use understory_file_drop::file::DroppedFile;
//!     use understory_file_drop::target::{Callbacks, DropOptions};
//!     use understory_file_drop_web::{WebDropRoot, WebDropZone, WebFile};
//!
//!     let root = WebDropRoot::install(body)?;
//!     let options = DropOptions::default().with_allowed_types("image/*".parse().unwrap());
//!     let handler = Callbacks::new(
//!         |f: &WebFile| log::warn!("not an image: {}", f.name()),
//!         |f: &WebFile| log::info!("got {}", f.name()),
//!     );
//!     let zone = WebDropZone::mount(&root, zone, options, handler)?;
//!     // Keep `root` and `zone` alive for as long as the widget is mounted.
//!     core::mem::forget((root, zone));
//!     Ok(())
//! }
//! ```
//!
//! Notes:
//! - Elements are identified by a `data-understory-drop` attribute holding an
//!   [`ElementKey`]. Enter/leave events resolve the keyed ancestors of the
//!   event target; unkeyed elements are skipped.
//! - The root also suppresses the browser's default for drops outside every
//!   zone, so a missed drop never navigates away from the page, and it resets
//!   hover state on such drops, on `dragend` and on window `blur`.
//! - Handlers run while the zone's state is borrowed; they receive the files
//!   directly and must not call back into the zone.

use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

use understory_file_drop::hover::HoverEvent;

#[cfg(target_arch = "wasm32")]
mod dom;

#[cfg(target_arch = "wasm32")]
pub use dom::{WebDropRoot, WebDropZone, WebFile};

/// Attribute that carries an element's [`ElementKey`].
pub const KEY_ATTRIBUTE: &str = "data-understory-drop";

static NEXT_KEY: AtomicU32 = AtomicU32::new(0);

/// Page-unique identity of a keyed DOM element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementKey(u32);

impl ElementKey {
    /// Allocates a key no other element on the page has.
    pub fn next() -> Self {
        Self(NEXT_KEY.fetch_add(1, Ordering::Relaxed))
    }

    /// Parses the value of a [`KEY_ATTRIBUTE`].
    pub fn parse(value: &str) -> Option<Self> {
        value.trim().parse().ok().map(Self)
    }

    /// Returns the raw numeric key.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a class toggle applies.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClassTarget {
    /// The root element.
    Root,
    /// A zone element.
    Element(ElementKey),
}

/// One class to add to or remove from an element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClassToggle<'a> {
    /// Element to change.
    pub on: ClassTarget,
    /// Class name.
    pub class: &'a str,
    /// `true` to add, `false` to remove.
    pub add: bool,
}

/// CSS classes reflecting hover and drop state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverClasses {
    /// Set on the root while a drag is active anywhere over it.
    pub root: String,
    /// Set on a zone while the pointer is over it.
    pub target: String,
    /// Set on a zone once it has received a non-empty drop.
    pub dropped: String,
}

impl Default for HoverClasses {
    fn default() -> Self {
        Self {
            root: "is-dragging-over-page".into(),
            target: "is-dragging-over".into(),
            dropped: "is-dropped".into(),
        }
    }
}

impl HoverClasses {
    /// The class change a hover transition calls for.
    pub fn toggle_for(&self, event: &HoverEvent<ElementKey>) -> ClassToggle<'_> {
        match *event {
            HoverEvent::RootEntered | HoverEvent::RootLeft => ClassToggle {
                on: ClassTarget::Root,
                class: &self.root,
                add: event.is_enter(),
            },
            HoverEvent::TargetEntered { element, .. } | HoverEvent::TargetLeft { element, .. } => {
                ClassToggle {
                    on: ClassTarget::Element(element),
                    class: &self.target,
                    add: event.is_enter(),
                }
            }
        }
    }
}
