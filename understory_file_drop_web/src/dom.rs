// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `web_sys` listeners for drop roots and zones.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use understory_file_drop::file::DroppedFile;
use understory_file_drop::hover::HoverEvent;
use understory_file_drop::registry::{HoverRegistry, SharedRegistry};
use understory_file_drop::target::{Accepted, DropHandler, DropOptions, DropStatus, DropTarget};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{DragEvent, Element, Event, EventTarget, File, Node};

use crate::{ClassTarget, ElementKey, HoverClasses, KEY_ATTRIBUTE};

/// A registered event listener, removed again when dropped.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn add(
        target: &EventTarget,
        kind: &'static str,
        callback: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(Event)>::new(callback);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let removed = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
        if let Err(err) = removed {
            log::warn!("failed to remove {} listener: {err:?}", self.kind);
        }
    }
}

/// A dropped `web_sys::File` with its metadata read up front.
#[derive(Clone, Debug)]
pub struct WebFile {
    file: File,
    name: String,
    mime_type: String,
    size: u64,
}

impl WebFile {
    /// Wraps a `File` from a `DataTransfer`.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Blob sizes are whole byte counts well below 2^53."
    )]
    pub fn new(file: File) -> Self {
        let size = file.size().max(0.0) as u64;
        Self {
            name: file.name(),
            mime_type: file.type_(),
            size,
            file,
        }
    }

    /// The underlying file handle, for reading its contents.
    pub fn file(&self) -> &File {
        &self.file
    }

    /// Consumes the wrapper and returns the file handle.
    pub fn into_file(self) -> File {
        self.file
    }
}

impl DroppedFile for WebFile {
    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> Option<u64> {
        Some(self.size)
    }
}

fn dropped_files(event: &DragEvent) -> Vec<WebFile> {
    let Some(list) = event.data_transfer().and_then(|dt| dt.files()) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(WebFile::new)
        .collect()
}

struct RootInner {
    element: Element,
    key: ElementKey,
    registry: SharedRegistry<ElementKey>,
    classes: HoverClasses,
    elements: RefCell<HashMap<ElementKey, Element>>,
    listeners: RefCell<Vec<Listener>>,
}

impl RootInner {
    /// Keys of `origin` and its keyed ancestors, innermost first, up to the root.
    fn keyed_path(&self, origin: Option<EventTarget>) -> Vec<ElementKey> {
        let mut path = Vec::new();
        let mut node = origin.and_then(|t| t.dyn_into::<Node>().ok());
        while let Some(current) = node {
            if let Some(key) = current
                .dyn_ref::<Element>()
                .and_then(|e| e.get_attribute(KEY_ATTRIBUTE))
                .and_then(|v| ElementKey::parse(&v))
            {
                path.push(key);
                if key == self.key {
                    break;
                }
            }
            node = current.parent_node();
        }
        path
    }

    fn apply(&self, events: &[HoverEvent<ElementKey>]) {
        for event in events {
            let toggle = self.classes.toggle_for(event);
            let element = match toggle.on {
                ClassTarget::Root => Some(self.element.clone()),
                ClassTarget::Element(key) => self.elements.borrow().get(&key).cloned(),
            };
            if let Some(element) = element {
                set_class(&element, toggle.class, toggle.add);
            }
        }
    }

    fn cancel(&self) {
        let events = self.registry.borrow_mut().cancel();
        self.apply(&events);
    }

    /// Returns the key already on `element`, or assigns a fresh one.
    fn key_element(&self, element: &Element) -> Result<ElementKey, JsValue> {
        if let Some(key) = element
            .get_attribute(KEY_ATTRIBUTE)
            .and_then(|v| ElementKey::parse(&v))
        {
            return Ok(key);
        }
        let key = ElementKey::next();
        element.set_attribute(KEY_ATTRIBUTE, &key.to_string())?;
        Ok(key)
    }
}

impl Drop for RootInner {
    fn drop(&mut self) {
        self.listeners.get_mut().clear();
        set_class(&self.element, &self.classes.root, false);
        if let Err(err) = self.element.remove_attribute(KEY_ATTRIBUTE) {
            log::warn!("failed to unkey drop root: {err:?}");
        }
    }
}

fn set_class(element: &Element, class: &str, add: bool) {
    let list = element.class_list();
    let result = if add {
        list.add_1(class)
    } else {
        list.remove_1(class)
    };
    if let Err(err) = result {
        log::warn!("failed to toggle class {class:?}: {err:?}");
    }
}

/// Root scope of a page: tracks enter/leave for every zone mounted under it.
///
/// Clones share the same root. Listeners are removed once the last clone and
/// every zone's reference to it are gone.
#[derive(Clone)]
pub struct WebDropRoot {
    inner: Rc<RootInner>,
}

impl fmt::Debug for WebDropRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebDropRoot")
            .field("element", &self.inner.element)
            .field("key", &self.inner.key)
            .finish_non_exhaustive()
    }
}

impl WebDropRoot {
    /// Installs drag listeners on `element` with the default classes.
    pub fn install(element: Element) -> Result<Self, JsValue> {
        Self::install_with_classes(element, HoverClasses::default())
    }

    /// Installs drag listeners on `element`.
    pub fn install_with_classes(element: Element, classes: HoverClasses) -> Result<Self, JsValue> {
        let key = ElementKey::next();
        element.set_attribute(KEY_ATTRIBUTE, &key.to_string())?;
        let inner = Rc::new(RootInner {
            element: element.clone(),
            key,
            registry: HoverRegistry::shared(key),
            classes,
            elements: RefCell::new(HashMap::new()),
            listeners: RefCell::new(Vec::new()),
        });

        let mut listeners = Vec::with_capacity(6);
        listeners.push(Listener::add(&element, "dragenter", {
            let weak = Rc::downgrade(&inner);
            move |ev: Event| {
                let Some(inner) = weak.upgrade() else { return };
                ev.prevent_default();
                let path = inner.keyed_path(ev.target());
                let events = inner.registry.borrow_mut().drag_enter(path);
                inner.apply(&events);
            }
        })?);
        listeners.push(Listener::add(&element, "dragleave", {
            let weak = Rc::downgrade(&inner);
            move |ev: Event| {
                let Some(inner) = weak.upgrade() else { return };
                ev.prevent_default();
                let path = inner.keyed_path(ev.target());
                let events = inner.registry.borrow_mut().drag_leave(path);
                inner.apply(&events);
            }
        })?);
        // Zones handle their own dragover first; anything left unhandled
        // bubbles here and is refused.
        listeners.push(Listener::add(&element, "dragover", move |ev: Event| {
            if ev.default_prevented() {
                return;
            }
            ev.prevent_default();
            if let Some(dt) = ev.dyn_ref::<DragEvent>().and_then(DragEvent::data_transfer) {
                dt.set_drop_effect("none");
            }
        })?);
        listeners.push(Listener::add(&element, "drop", {
            let weak = Rc::downgrade(&inner);
            move |ev: Event| {
                let Some(inner) = weak.upgrade() else { return };
                ev.prevent_default();
                inner.cancel();
            }
        })?);
        listeners.push(Listener::add(&element, "dragend", {
            let weak = Rc::downgrade(&inner);
            move |_: Event| {
                if let Some(inner) = weak.upgrade() {
                    inner.cancel();
                }
            }
        })?);
        if let Some(window) = web_sys::window() {
            listeners.push(Listener::add(&window, "blur", {
                let weak = Rc::downgrade(&inner);
                move |_: Event| {
                    if let Some(inner) = weak.upgrade() {
                        inner.cancel();
                    }
                }
            })?);
        }
        *inner.listeners.borrow_mut() = listeners;
        log::debug!("installed drop root {key}");

        Ok(Self { inner })
    }

    /// The shared registry behind this root.
    pub fn registry(&self) -> &SharedRegistry<ElementKey> {
        &self.inner.registry
    }

    /// The root element.
    pub fn element(&self) -> &Element {
        &self.inner.element
    }

    /// Returns `true` while a drag is active anywhere over the root.
    pub fn is_dragging(&self) -> bool {
        self.inner.registry.borrow().is_dragging_over_root()
    }

    /// Force-resets all hover state, e.g. when the host knows a gesture ended.
    pub fn cancel(&self) {
        self.inner.cancel();
    }
}

struct ZoneState {
    target: DropTarget<ElementKey, WebFile>,
    handler: Box<dyn DropHandler<WebFile>>,
}

/// One mounted drop zone widget.
pub struct WebDropZone {
    element: Element,
    key: ElementKey,
    root: Rc<RootInner>,
    state: Rc<RefCell<ZoneState>>,
    listeners: Vec<Listener>,
}

impl fmt::Debug for WebDropZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebDropZone")
            .field("element", &self.element)
            .field("key", &self.key)
            .field("mounted", &!self.listeners.is_empty())
            .finish_non_exhaustive()
    }
}

impl WebDropZone {
    /// Turns `element`, which must sit under `root`, into a drop zone.
    pub fn mount(
        root: &WebDropRoot,
        element: Element,
        options: DropOptions,
        handler: impl DropHandler<WebFile> + 'static,
    ) -> Result<Self, JsValue> {
        let inner = Rc::clone(&root.inner);
        let key = inner.key_element(&element)?;
        let mut target = DropTarget::new(&inner.registry, key, options);
        if let Err(err) = target.attach() {
            // Only unkey the element if nobody else owns it.
            if inner.registry.borrow().target_at(key).is_none() && key != inner.key {
                if let Err(dom_err) = element.remove_attribute(KEY_ATTRIBUTE) {
                    log::warn!("failed to unkey refused drop zone: {dom_err:?}");
                }
            }
            return Err(JsValue::from_str(&err.to_string()));
        }
        inner.elements.borrow_mut().insert(key, element.clone());

        let state = Rc::new(RefCell::new(ZoneState {
            target,
            handler: Box::new(handler),
        }));

        let mut listeners = Vec::with_capacity(2);
        listeners.push(Listener::add(&element, "dragover", {
            let state = Rc::downgrade(&state);
            move |ev: Event| {
                let Some(state) = state.upgrade() else { return };
                ev.prevent_default();
                let effect = state.borrow().target.drag_over();
                if let Some(dt) = ev.dyn_ref::<DragEvent>().and_then(DragEvent::data_transfer) {
                    dt.set_drop_effect(effect.as_str());
                }
            }
        })?);
        listeners.push(Listener::add(&element, "drop", {
            let state = Rc::downgrade(&state);
            let root = Rc::downgrade(&inner);
            let element = element.clone();
            move |ev: Event| {
                let (Some(state), Some(root)) = (state.upgrade(), root.upgrade()) else {
                    return;
                };
                ev.prevent_default();
                ev.stop_propagation();
                let files = ev
                    .dyn_ref::<DragEvent>()
                    .map(dropped_files)
                    .unwrap_or_default();
                let outcome = {
                    let mut state = state.borrow_mut();
                    let ZoneState { target, handler } = &mut *state;
                    target.handle_drop(files, &mut **handler)
                };
                root.apply(&outcome.transitions);
                if matches!(outcome.status, DropStatus::Delivered { .. }) {
                    set_class(&element, &root.classes.dropped, true);
                }
            }
        })?);
        log::debug!("mounted drop zone {key}");

        Ok(Self {
            element,
            key,
            root: inner,
            state,
            listeners,
        })
    }

    /// Removes this zone's listeners and detaches it. Idempotent.
    pub fn unmount(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        self.listeners.clear();
        self.state.borrow_mut().target.detach();
        self.root.elements.borrow_mut().remove(&self.key);
        set_class(&self.element, &self.root.classes.target, false);
        if self.key != self.root.key {
            if let Err(err) = self.element.remove_attribute(KEY_ATTRIBUTE) {
                log::warn!("failed to unkey drop zone: {err:?}");
            }
        }
        log::debug!("unmounted drop zone {}", self.key);
    }

    /// The zone's element.
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Returns `true` while the pointer is over this zone.
    pub fn is_dragging_over_self(&self) -> bool {
        self.state.borrow().target.is_dragging_over_self()
    }

    /// Returns `true` while a drag is active anywhere over the root.
    pub fn is_dragging_over_root(&self) -> bool {
        self.state.borrow().target.is_dragging_over_root()
    }

    /// Returns `true` once a non-empty drop has been processed.
    pub fn is_dropped(&self) -> bool {
        self.state.borrow().target.is_dropped()
    }

    /// Returns `true` while neither hovered nor dropped.
    pub fn is_empty(&self) -> bool {
        self.state.borrow().target.is_empty()
    }

    /// Result of the most recent non-empty drop.
    pub fn result(&self) -> Option<Accepted<WebFile>> {
        self.state.borrow().target.result().cloned()
    }

    /// First accepted file of the most recent drop.
    pub fn file(&self) -> Option<WebFile> {
        self.state.borrow().target.file().cloned()
    }

    /// Accepted files of the most recent drop.
    pub fn files(&self) -> Vec<WebFile> {
        self.state.borrow().target.files().to_vec()
    }
}

impl Drop for WebDropZone {
    fn drop(&mut self) {
        self.unmount();
    }
}
