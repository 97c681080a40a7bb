//! Types passed to the DOM helpers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use web_sys::{Element, Node};

/// An element given either directly or by CSS selector.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Selector(&'a str),
    Element(&'a Element),
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(selector: &'a str) -> Self {
        Target::Selector(selector)
    }
}

impl<'a> From<&'a String> for Target<'a> {
    fn from(selector: &'a String) -> Self {
        Target::Selector(selector)
    }
}

impl<'a> From<&'a Element> for Target<'a> {
    fn from(element: &'a Element) -> Self {
        Target::Element(element)
    }
}

/// Content placed inside a newly created element.
#[derive(Debug, Clone)]
pub enum Inner {
    /// Assigned as `innerHTML`.
    Html(String),
    /// Appended as a child.
    Node(Node),
}

/// Options for [`create_element`](crate::utils::dom::create_element).
///
/// Applied in order: id, classes, style, inner content, attachment to
/// `target`, attributes, dataset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ElementOptions {
    pub id: Option<String>,
    /// Space-separated class names.
    #[serde(alias = "class")]
    pub classes: Option<String>,
    pub style: BTreeMap<String, String>,
    #[serde(skip)]
    pub inner: Option<Inner>,
    #[serde(skip)]
    pub target: Option<Element>,
    pub attributes: BTreeMap<String, String>,
    pub dataset: BTreeMap<String, String>,
}

impl ElementOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn classes(mut self, classes: impl Into<String>) -> Self {
        self.classes = Some(classes.into());
        self
    }

    pub fn style(mut self, prop: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(prop.into(), value.into());
        self
    }

    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.inner = Some(Inner::Html(html.into()));
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.inner = Some(Inner::Node(node.into()));
        self
    }

    /// Append the new element to `target`.
    pub fn target(mut self, target: Element) -> Self {
        self.target = Some(target);
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set `data-*` entries; keys are in camelCase as for `dataset`.
    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.dataset.insert(key.into(), value.into());
        self
    }
}

/// `IntersectionObserver` settings.
#[derive(Debug, Clone, Default)]
pub struct ObserverOptions {
    pub root: Option<Element>,
    pub root_margin: Option<String>,
    pub threshold: Vec<f64>,
}

/// Document position of an element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Offset {
    pub top: f64,
    pub left: f64,
}
