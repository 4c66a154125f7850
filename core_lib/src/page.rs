//! In-memory page model standing in for the browser document.
//!
//! Elements are cheap cloneable handles; clones refer to the same node, so a
//! widget holding an element sees edits made through any other handle.

use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

impl fmt::Display for ReadyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadyState::Loading => write!(f, "loading"),
            ReadyState::Interactive => write!(f, "interactive"),
            ReadyState::Complete => write!(f, "complete"),
        }
    }
}

#[derive(Debug, Default)]
struct ElementData {
    tag: String,
    classes: BTreeSet<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    value: String,
    children: Vec<Element>,
}

#[derive(Debug, Clone)]
pub struct Element {
    data: Arc<RwLock<ElementData>>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            data: Arc::new(RwLock::new(ElementData {
                tag: tag.to_string(),
                ..ElementData::default()
            })),
        }
    }

    pub fn with_class(self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_value(self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    pub fn with_child(self, child: Element) -> Self {
        self.append_child(child);
        self
    }

    pub fn tag(&self) -> String {
        self.data.read().tag.clone()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.data.read().classes.contains(class)
    }

    pub fn add_class(&self, class: &str) {
        self.data.write().classes.insert(class.to_string());
    }

    pub fn remove_class(&self, class: &str) {
        self.data.write().classes.remove(class);
    }

    pub fn classes(&self) -> Vec<String> {
        self.data.read().classes.iter().cloned().collect()
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.data.read().attributes.get(name).cloned()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.data.read().attributes.contains_key(name)
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.data
            .write()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn remove_attribute(&self, name: &str) {
        self.data.write().attributes.remove(name);
    }

    pub fn text(&self) -> String {
        self.data.read().text.clone()
    }

    pub fn set_text(&self, text: &str) {
        self.data.write().text = text.to_string();
    }

    /// Current value of a form control.
    pub fn value(&self) -> String {
        self.data.read().value.clone()
    }

    pub fn set_value(&self, value: &str) {
        self.data.write().value = value.to_string();
    }

    pub fn children(&self) -> Vec<Element> {
        self.data.read().children.clone()
    }

    pub fn append_child(&self, child: Element) {
        self.data.write().children.push(child);
    }

    /// All descendants in document order, excluding `self`.
    pub fn descendants(&self) -> Vec<Element> {
        let mut found = Vec::new();
        for child in self.children() {
            let nested = child.descendants();
            found.push(child);
            found.extend(nested);
        }
        found
    }

    pub fn find_by_class(&self, class: &str) -> Option<Element> {
        self.descendants().into_iter().find(|el| el.has_class(class))
    }

    /// First descendant whose `name` attribute equals `name`.
    pub fn find_by_name(&self, name: &str) -> Option<Element> {
        self.descendants()
            .into_iter()
            .find(|el| el.attribute("name").as_deref() == Some(name))
    }

    pub fn same_node(&self, other: &Element) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

#[derive(Debug)]
pub struct Page {
    body: Element,
    ready: watch::Sender<ReadyState>,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    /// An empty page that is still loading.
    pub fn new() -> Self {
        let (ready, _) = watch::channel(ReadyState::Loading);
        Self {
            body: Element::new("body"),
            ready,
        }
    }

    /// A page that has finished loading with the given top-level elements.
    pub fn loaded(elements: impl IntoIterator<Item = Element>) -> Self {
        let page = Self::new();
        for element in elements {
            page.append(element);
        }
        page.set_ready_state(ReadyState::Complete);
        page
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    pub fn append(&self, element: Element) {
        self.body.append_child(element);
    }

    /// Elements carrying `class`, and `attribute` when one is given.
    pub fn query_all(&self, class: &str, attribute: Option<&str>) -> Vec<Element> {
        self.body
            .descendants()
            .into_iter()
            .filter(|el| el.has_class(class))
            .filter(|el| attribute.map_or(true, |name| el.has_attribute(name)))
            .collect()
    }

    pub fn ready_state(&self) -> ReadyState {
        *self.ready.borrow()
    }

    pub fn set_ready_state(&self, state: ReadyState) {
        self.ready.send_replace(state);
    }

    /// Resolves once the page has left the `Loading` state.
    pub async fn content_loaded(&self) {
        let mut rx = self.ready.subscribe();
        if rx.wait_for(|state| *state != ReadyState::Loading).await.is_err() {
            debug!("Ready state channel closed before the page loaded");
        }
    }
}
