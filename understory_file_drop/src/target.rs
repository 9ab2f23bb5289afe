// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-widget drop target: drag-over affordance and drop validation.
//!
//! ## Usage
//!
//! 1) Build a [`DropTarget`] for the widget's element with [`DropOptions`] and
//!    the page's [`SharedRegistry`], then [`attach`](DropTarget::attach) it.
//! 2) On `dragover` at the element, call [`DropTarget::drag_over`] and report
//!    the returned [`DropEffect`].
//! 3) On `drop` at the element, call [`DropTarget::handle_drop`] with the
//!    dropped files and a [`DropHandler`].
//! 4) [`detach`](DropTarget::detach) when the widget unmounts (dropping the
//!    target does the same).
//!
//! ## Minimal example
//!
//! ```
//! use understory_file_drop::file::FileInfo;
//! use understory_file_drop::registry::HoverRegistry;
//! use understory_file_drop::target::{Callbacks, DropOptions, DropStatus, DropTarget};
//!
//! let registry = HoverRegistry::shared(0_u32);
//! let options = DropOptions::default().with_allowed_types("image/*".parse().unwrap());
//! let mut target = DropTarget::new(&registry, 1, options);
//! target.attach().unwrap();
//!
//! registry.borrow_mut().drag_enter([1, 0]);
//! assert!(target.is_dragging_over_self());
//!
//! let mut rejected = Vec::new();
//! let mut handler = Callbacks::new(|f: &FileInfo| rejected.push(f.name.clone()), |_: &FileInfo| {});
//! let outcome = target.handle_drop(
//!     [FileInfo::new("notes.txt", "text/plain")],
//!     &mut handler,
//! );
//! assert_eq!(outcome.status, DropStatus::Delivered { accepted: 0, rejected: 1 });
//! assert!(target.is_dropped());
//! assert_eq!(target.file(), None);
//! drop(handler);
//! assert_eq!(rejected, ["notes.txt"]);
//! ```

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use crate::error::AttachError;
use crate::file::DroppedFile;
use crate::hover::HoverEvent;
use crate::pattern::TypePattern;
use crate::registry::{PendingDetach, SharedRegistry};
use crate::subscription::{Subscription, TargetId};

/// Construction-time configuration of a drop target.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct DropOptions {
    /// Accept several files per drop. When `false`, only the first file of a
    /// drop is considered.
    pub allow_multiple: bool,
    /// Files whose declared type fails this pattern are rejected.
    pub allowed_types: TypePattern,
}

impl DropOptions {
    /// Sets [`allow_multiple`](Self::allow_multiple).
    #[must_use]
    pub fn with_allow_multiple(mut self, allow_multiple: bool) -> Self {
        self.allow_multiple = allow_multiple;
        self
    }

    /// Sets [`allowed_types`](Self::allowed_types).
    #[must_use]
    pub fn with_allowed_types(mut self, allowed_types: TypePattern) -> Self {
        self.allowed_types = allowed_types;
        self
    }
}

/// Affordance reported to the browser during `dragover`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DropEffect {
    /// Dropping here does nothing.
    #[default]
    None,
    /// Dropping here copies the files.
    Copy,
}

impl DropEffect {
    /// The `DataTransfer.dropEffect` keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Copy => "copy",
        }
    }
}

/// Files delivered by the most recent non-empty drop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Accepted<F> {
    /// Single-file target: the first accepted file, if any.
    Single(Option<F>),
    /// Multi-file target: every accepted file, in drop order.
    Multiple(Vec<F>),
}

impl<F> Accepted<F> {
    /// The first accepted file.
    pub fn file(&self) -> Option<&F> {
        self.files().first()
    }

    /// All accepted files, in drop order.
    pub fn files(&self) -> &[F] {
        match self {
            Self::Single(file) => file.as_slice(),
            Self::Multiple(files) => files,
        }
    }

    /// Number of accepted files.
    pub fn len(&self) -> usize {
        self.files().len()
    }

    /// Returns `true` if nothing was accepted.
    pub fn is_empty(&self) -> bool {
        self.files().is_empty()
    }
}

/// Consumer callbacks invoked while a drop is processed.
///
/// All methods default to doing nothing. No registry borrow is held while they
/// run.
pub trait DropHandler<F> {
    /// Called once per file whose type failed the pattern.
    fn invalid_file_type(&mut self, file: &F) {
        let _ = file;
    }

    /// Called once per accepted file, in drop order.
    fn file_dropped(&mut self, file: &F) {
        let _ = file;
    }

    /// Called once with the final result of a non-empty drop.
    fn delivered(&mut self, accepted: &Accepted<F>) {
        let _ = accepted;
    }
}

impl<F> DropHandler<F> for () {}

impl<F, H: DropHandler<F> + ?Sized> DropHandler<F> for &mut H {
    fn invalid_file_type(&mut self, file: &F) {
        (**self).invalid_file_type(file);
    }

    fn file_dropped(&mut self, file: &F) {
        (**self).file_dropped(file);
    }

    fn delivered(&mut self, accepted: &Accepted<F>) {
        (**self).delivered(accepted);
    }
}

/// [`DropHandler`] built from two closures.
#[derive(Debug)]
pub struct Callbacks<I, D> {
    on_invalid_file_type: I,
    on_file_dropped: D,
}

impl<I, D> Callbacks<I, D> {
    /// Wraps `on_invalid_file_type` and `on_file_dropped`.
    pub fn new(on_invalid_file_type: I, on_file_dropped: D) -> Self {
        Self {
            on_invalid_file_type,
            on_file_dropped,
        }
    }
}

impl<F, I, D> DropHandler<F> for Callbacks<I, D>
where
    I: FnMut(&F),
    D: FnMut(&F),
{
    fn invalid_file_type(&mut self, file: &F) {
        (self.on_invalid_file_type)(file);
    }

    fn file_dropped(&mut self, file: &F) {
        (self.on_file_dropped)(file);
    }
}

/// How a drop was handled.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DropStatus {
    /// The drop carried no files; nothing beyond the hover reset happened.
    Empty,
    /// Files were validated and delivered.
    Delivered {
        /// Files that passed the type pattern.
        accepted: usize,
        /// Files reported through [`DropHandler::invalid_file_type`].
        rejected: usize,
    },
    /// The target was detached; the drop was ignored.
    Detached,
}

/// Result of [`DropTarget::handle_drop`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropOutcome<K> {
    /// Hover transitions caused by the reset that every drop performs.
    pub transitions: Vec<HoverEvent<K>>,
    /// What happened to the files.
    pub status: DropStatus,
}

/// State of one mounted drop target widget.
#[derive(Debug)]
pub struct DropTarget<K, F>
where
    K: Copy + Eq + Hash + Debug,
{
    id: TargetId,
    element: K,
    options: DropOptions,
    registry: SharedRegistry<K>,
    pending: PendingDetach,
    subscription: Option<Subscription>,
    dropped: bool,
    result: Option<Accepted<F>>,
}

impl<K, F> DropTarget<K, F>
where
    K: Copy + Eq + Hash + Debug,
    F: DroppedFile,
{
    /// Creates a detached target rendering to `element`.
    pub fn new(registry: &SharedRegistry<K>, element: K, options: DropOptions) -> Self {
        let (id, pending) = {
            let mut shared = registry.borrow_mut();
            (shared.next_target_id(), shared.pending_detach())
        };
        Self {
            id,
            element,
            options,
            registry: registry.clone(),
            pending,
            subscription: None,
            dropped: false,
            result: None,
        }
    }

    /// This target's identity.
    pub fn id(&self) -> TargetId {
        self.id
    }

    /// The element this target renders to.
    pub fn element(&self) -> K {
        self.element
    }

    /// The configuration fixed at construction.
    pub fn options(&self) -> &DropOptions {
        &self.options
    }

    /// The registry this target reports to.
    pub fn registry(&self) -> &SharedRegistry<K> {
        &self.registry
    }

    /// Starts tracking hover for this target.
    ///
    /// Idempotent: attaching an attached target returns the same subscription.
    pub fn attach(&mut self) -> Result<Subscription, AttachError<K>> {
        let sub = self.registry.borrow_mut().attach(self.id, self.element)?;
        self.subscription = Some(sub);
        Ok(sub)
    }

    /// Stops tracking hover for this target.
    ///
    /// Returns `false` if the target was not attached.
    pub fn detach(&mut self) -> bool {
        match self.subscription.take() {
            Some(sub) => self.registry.borrow_mut().detach(sub),
            None => false,
        }
    }

    /// Returns `true` while attached.
    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Returns `true` while the pointer is over this target's element.
    pub fn is_dragging_over_self(&self) -> bool {
        self.registry.borrow().is_dragging_over(self.id)
    }

    /// Returns `true` while any drag is active over the root scope.
    pub fn is_dragging_over_root(&self) -> bool {
        self.registry.borrow().is_dragging_over_root()
    }

    /// Returns `true` once a non-empty drop has been processed.
    pub fn is_dropped(&self) -> bool {
        self.dropped
    }

    /// Returns `true` while neither hovered nor dropped.
    pub fn is_empty(&self) -> bool {
        !self.dropped && !self.is_dragging_over_self()
    }

    /// Result of the most recent non-empty drop.
    pub fn result(&self) -> Option<&Accepted<F>> {
        self.result.as_ref()
    }

    /// First accepted file of the most recent drop.
    pub fn file(&self) -> Option<&F> {
        self.result.as_ref().and_then(Accepted::file)
    }

    /// Accepted files of the most recent drop.
    pub fn files(&self) -> &[F] {
        self.result.as_ref().map(Accepted::files).unwrap_or_default()
    }

    /// Takes the result of the most recent drop, leaving none.
    pub fn take_result(&mut self) -> Option<Accepted<F>> {
        self.result.take()
    }

    /// Affordance for a `dragover` on this target's element.
    pub fn drag_over(&self) -> DropEffect {
        if self.is_dragging_over_self() {
            DropEffect::Copy
        } else {
            DropEffect::None
        }
    }

    /// Processes a drop of `files` on this target's element.
    ///
    /// Every drop on an attached target resets all hover state first. An empty
    /// drop stops there. Otherwise a single-file target keeps only the first
    /// file, files failing the type pattern go to
    /// [`DropHandler::invalid_file_type`], and the rest go to
    /// [`DropHandler::file_dropped`] and become the new [`result`](Self::result).
    pub fn handle_drop<H>(
        &mut self,
        files: impl IntoIterator<Item = F>,
        handler: &mut H,
    ) -> DropOutcome<K>
    where
        H: DropHandler<F> + ?Sized,
    {
        if !self.is_attached() {
            log::debug!("ignoring drop on detached {:?}", self.id);
            return DropOutcome {
                transitions: Vec::new(),
                status: DropStatus::Detached,
            };
        }
        let transitions = self.registry.borrow_mut().cancel();

        let mut files = files.into_iter();
        let candidates: Vec<F> = if self.options.allow_multiple {
            files.collect()
        } else {
            files.next().into_iter().collect()
        };
        if candidates.is_empty() {
            return DropOutcome {
                transitions,
                status: DropStatus::Empty,
            };
        }

        let mut accepted = Vec::with_capacity(candidates.len());
        let mut rejected = 0;
        for file in candidates {
            if self.options.allowed_types.matches(file.mime_type()) {
                accepted.push(file);
            } else {
                log::debug!(
                    "{:?} rejected {:?} with type {:?}",
                    self.id,
                    file.name(),
                    file.mime_type()
                );
                rejected += 1;
                handler.invalid_file_type(&file);
            }
        }

        self.dropped = true;
        for file in &accepted {
            handler.file_dropped(file);
        }

        let status = DropStatus::Delivered {
            accepted: accepted.len(),
            rejected,
        };
        let result = if self.options.allow_multiple {
            Accepted::Multiple(accepted)
        } else {
            Accepted::Single(accepted.into_iter().next())
        };
        handler.delivered(&result);
        self.result = Some(result);

        DropOutcome {
            transitions,
            status,
        }
    }
}

impl<K, F> Drop for DropTarget<K, F>
where
    K: Copy + Eq + Hash + Debug,
{
    fn drop(&mut self) {
        if let Some(sub) = self.subscription.take() {
            match self.registry.try_borrow_mut() {
                Ok(mut registry) => {
                    registry.detach(sub);
                }
                Err(_) => {
                    log::debug!("registry busy; deferring detach of {:?}", self.id);
                    self.pending.borrow_mut().push(sub);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::FileInfo;
    use crate::registry::HoverRegistry;
    use alloc::string::String;
    use alloc::vec;

    const ROOT: u32 = 0;

    #[derive(Default)]
    struct Log {
        invalid: Vec<String>,
        dropped: Vec<String>,
        delivered: usize,
    }

    impl DropHandler<FileInfo> for Log {
        fn invalid_file_type(&mut self, file: &FileInfo) {
            self.invalid.push(file.name.clone());
        }

        fn file_dropped(&mut self, file: &FileInfo) {
            self.dropped.push(file.name.clone());
        }

        fn delivered(&mut self, _: &Accepted<FileInfo>) {
            self.delivered += 1;
        }
    }

    fn attached(options: DropOptions) -> (SharedRegistry<u32>, DropTarget<u32, FileInfo>) {
        let registry = HoverRegistry::shared(ROOT);
        let mut target = DropTarget::new(&registry, 1, options);
        target.attach().unwrap();
        (registry, target)
    }

    #[test]
    fn fresh_target_is_idle() {
        let (_, target) = attached(DropOptions::default());
        assert!(!target.is_dragging_over_self());
        assert!(!target.is_dragging_over_root());
        assert!(!target.is_dropped());
        assert!(target.is_empty());
        assert_eq!(target.drag_over(), DropEffect::None);
        assert!(target.result().is_none());
        assert!(target.files().is_empty());
    }

    #[test]
    fn drag_over_reports_copy_only_while_hovered() {
        let (registry, target) = attached(DropOptions::default());
        registry.borrow_mut().drag_enter([1, ROOT]);
        assert_eq!(target.drag_over(), DropEffect::Copy);
        assert_eq!(target.drag_over().as_str(), "copy");
        assert_eq!(registry.borrow().count(1), 1, "dragover must not count");
        registry.borrow_mut().drag_leave([1, ROOT]);
        assert_eq!(target.drag_over(), DropEffect::None);
    }

    #[test]
    fn multiple_target_keeps_order_and_reports_each() {
        let options = DropOptions::default()
            .with_allow_multiple(true)
            .with_allowed_types(TypePattern::parse("image/*").unwrap());
        let (_, mut target) = attached(options);
        let mut log = Log::default();

        let outcome = target.handle_drop(
            vec![
                FileInfo::new("a.png", "image/png"),
                FileInfo::new("b.txt", "text/plain"),
                FileInfo::new("c.jpg", "image/jpeg"),
            ],
            &mut log,
        );

        assert_eq!(
            outcome.status,
            DropStatus::Delivered {
                accepted: 2,
                rejected: 1
            }
        );
        assert_eq!(log.invalid, ["b.txt"]);
        assert_eq!(log.dropped, ["a.png", "c.jpg"]);
        assert_eq!(log.delivered, 1);
        let names: Vec<&str> = target.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a.png", "c.jpg"]);
        assert!(matches!(target.result(), Some(Accepted::Multiple(_))));
    }

    #[test]
    fn multiple_target_with_nothing_accepted_exposes_empty_list() {
        let options = DropOptions::default()
            .with_allow_multiple(true)
            .with_allowed_types(TypePattern::parse("image/*").unwrap());
        let (_, mut target) = attached(options);
        target.handle_drop([FileInfo::new("a.txt", "text/plain")], &mut ());
        assert!(target.is_dropped());
        assert_eq!(target.result(), Some(&Accepted::Multiple(Vec::new())));
    }

    #[test]
    fn detached_target_ignores_drop() {
        let (registry, mut target) = attached(DropOptions::default());
        registry.borrow_mut().drag_enter([1, ROOT]);
        assert!(target.detach());

        let mut log = Log::default();
        let outcome = target.handle_drop([FileInfo::new("a.png", "image/png")], &mut log);

        assert_eq!(outcome.status, DropStatus::Detached);
        assert!(outcome.transitions.is_empty());
        assert!(log.dropped.is_empty());
        assert!(!target.is_dropped());
        assert!(registry.borrow().is_dragging_over_root(), "no reset");
    }

    #[test]
    fn dropping_the_target_detaches_it() {
        let (registry, target) = attached(DropOptions::default());
        let id = target.id();
        assert!(registry.borrow().is_attached(id));
        drop(target);
        assert!(!registry.borrow().is_attached(id));
        assert_eq!(registry.borrow().target_count(), 0);
    }

    #[test]
    fn take_result_clears_result_but_not_dropped() {
        let (_, mut target) = attached(DropOptions::default());
        target.handle_drop([FileInfo::new("a.png", "image/png")], &mut ());
        let taken = target.take_result();
        assert_eq!(taken.and_then(|r| r.file().map(|f| f.name.clone())), Some("a.png".into()));
        assert!(target.result().is_none());
        assert!(target.is_dropped());
    }

    #[test]
    fn callbacks_may_reenter_the_registry() {
        let (registry, mut target) = attached(DropOptions::default());
        let seen = core::cell::Cell::new(false);
        let mut handler = Callbacks::new(
            |_: &FileInfo| {},
            |_: &FileInfo| seen.set(!registry.borrow().is_dragging_over_root()),
        );
        registry.borrow_mut().drag_enter([1, ROOT]);
        target.handle_drop([FileInfo::new("a.png", "image/png")], &mut handler);
        assert!(seen.get());
    }
}
