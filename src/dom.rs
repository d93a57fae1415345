//! In-memory page document.
//!
//! Nodes live in an arena addressed by [`NodeId`]. Removing a node only
//! detaches it from its parent, so ids held by pending timers stay valid and
//! can be checked with [`Document::is_connected`].

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Layout box in document coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Visible window onto the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_y: f64,
    pub height: f64,
}

/// What an element displays: plain text or raw markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Markup(String),
}

impl Default for Content {
    fn default() -> Self {
        Content::Text(String::new())
    }
}

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    style: BTreeMap<String, String>,
    content: Content,
    value: String,
    disabled: bool,
    rect: Rect,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
    title: String,
    scroll_y: f64,
    viewport_height: f64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
            title: String::new(),
            scroll_y: 0.0,
            viewport_height: 800.0,
        };
        doc.root = doc.create_element("html");
        doc.head = doc.create_element("head");
        doc.body = doc.create_element("body");
        doc.append_child(doc.root, doc.head);
        doc.append_child(doc.root, doc.body);
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    // ==================== Viewport ====================

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Set the scroll offset, clamped at the top of the page.
    pub fn set_scroll_y(&mut self, scroll_y: f64) {
        self.scroll_y = scroll_y.max(0.0);
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height.max(0.0);
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            scroll_y: self.scroll_y,
            height: self.viewport_height,
        }
    }

    // ==================== Tree ====================

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            tag: tag.to_ascii_lowercase(),
            ..Node::default()
        });
        id
    }

    /// Start building a detached element.
    pub fn element(&mut self, tag: &str) -> ElementBuilder<'_> {
        let id = self.create_element(tag);
        ElementBuilder { doc: self, id }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    pub fn remove(&mut self, node: NodeId) {
        self.detach(node);
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    fn clear_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Whether the node is reachable from the document root.
    pub fn is_connected(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.root {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }

    /// Pre-order descendants of `node`, excluding `node` itself.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[node.0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    // ==================== Attributes ====================

    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0].attrs.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.nodes[node.0].attrs.contains_key(name)
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        self.nodes[node.0].attrs.insert(name.to_string(), value.into());
    }

    /// The first connected element carrying `id`.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|node| self.attr(*node, "id") == Some(id))
    }

    // ==================== Classes ====================

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes[node.0].classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if !self.has_class(node, class) {
            self.nodes[node.0].classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        self.nodes[node.0].classes.retain(|c| c != class);
    }

    /// Flip `class`, returning whether it is now present.
    pub fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        let present = !self.has_class(node, class);
        self.set_class_present(node, class, present);
        present
    }

    pub fn set_class_present(&mut self, node: NodeId, class: &str, present: bool) {
        if present {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
    }

    pub fn class_name(&self, node: NodeId) -> String {
        self.nodes[node.0].classes.join(" ")
    }

    // ==================== Inline style ====================

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.nodes[node.0].style.get(property).map(String::as_str)
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: impl Into<String>) {
        self.nodes[node.0]
            .style
            .insert(property.to_string(), value.into());
    }

    /// Replace the whole inline style with `prop: value;` declarations.
    pub fn set_css_text(&mut self, node: NodeId, css: &str) {
        let style = &mut self.nodes[node.0].style;
        style.clear();
        for declaration in css.split(';') {
            if let Some((property, value)) = declaration.split_once(':') {
                let property = property.trim();
                if !property.is_empty() {
                    style.insert(property.to_string(), value.trim().to_string());
                }
            }
        }
    }

    // ==================== Content ====================

    pub fn content(&self, node: NodeId) -> &Content {
        &self.nodes[node.0].content
    }

    /// Text of the node and its descendants, with markup tags stripped.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut text = match &self.nodes[node.0].content {
            Content::Text(text) => text.clone(),
            Content::Markup(markup) => strip_tags(markup),
        };
        for child in &self.nodes[node.0].children {
            text.push_str(&self.text_content(*child));
        }
        text
    }

    pub fn set_text_content(&mut self, node: NodeId, text: impl Into<String>) {
        self.clear_children(node);
        self.nodes[node.0].content = Content::Text(text.into());
    }

    pub fn set_inner_html(&mut self, node: NodeId, markup: impl Into<String>) {
        self.clear_children(node);
        self.nodes[node.0].content = Content::Markup(markup.into());
    }

    // ==================== Form state ====================

    pub fn value(&self, node: NodeId) -> &str {
        &self.nodes[node.0].value
    }

    pub fn set_value(&mut self, node: NodeId, value: impl Into<String>) {
        self.nodes[node.0].value = value.into();
    }

    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.nodes[node.0].disabled
    }

    pub fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        self.nodes[node.0].disabled = disabled;
    }

    /// The `type` attribute, lowercased, defaulting to `text` for inputs.
    pub fn input_type(&self, node: NodeId) -> String {
        match self.attr(node, "type") {
            Some(kind) => kind.to_ascii_lowercase(),
            None if self.tag(node) == "input" => "text".to_string(),
            None => String::new(),
        }
    }

    // ==================== Layout ====================

    pub fn rect(&self, node: NodeId) -> Rect {
        self.nodes[node.0].rect
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        self.nodes[node.0].rect = rect;
    }

    // ==================== Queries ====================

    pub fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        let element = &self.nodes[node.0];
        if let Some(tag) = &selector.tag {
            if &element.tag != tag {
                return false;
            }
        }
        if !selector.classes.iter().all(|c| self.has_class(node, c)) {
            return false;
        }
        if !selector.attrs.iter().all(|m| m.matches(&element.attrs)) {
            return false;
        }
        match &selector.ancestor {
            None => true,
            Some(ancestor) => {
                let mut current = element.parent;
                while let Some(id) = current {
                    if self.matches(id, ancestor) {
                        return true;
                    }
                    current = self.nodes[id.0].parent;
                }
                false
            }
        }
    }

    /// Connected elements matching `selector`, in document order.
    pub fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.query_all_in(self.root, selector)
    }

    pub fn query_all_in(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|node| self.matches(*node, selector))
            .collect()
    }

    pub fn query(&self, selector: &Selector) -> Option<NodeId> {
        self.query_in(self.root, selector)
    }

    pub fn query_in(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|node| self.matches(*node, selector))
    }

    /// Elements matching any selector of the group, in document order.
    pub fn query_any(&self, group: &[Selector]) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|node| group.iter().any(|s| self.matches(*node, s)))
            .collect()
    }

    /// Nearest inclusive ancestor matching `selector`.
    pub fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.matches(id, selector) {
                return Some(id);
            }
            current = self.nodes[id.0].parent;
        }
        None
    }
}

fn strip_tags(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut in_tag = false;
    for c in markup.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Chained construction of a single element.
pub struct ElementBuilder<'a> {
    doc: &'a mut Document,
    id: NodeId,
}

impl<'a> ElementBuilder<'a> {
    pub fn class(self, class_name: &str) -> Self {
        for class in class_name.split_whitespace() {
            self.doc.add_class(self.id, class);
        }
        self
    }

    pub fn attr(self, name: &str, value: &str) -> Self {
        self.doc.set_attr(self.id, name, value);
        self
    }

    /// Set both the `value` attribute and the current value.
    pub fn value(self, value: &str) -> Self {
        self.doc.set_attr(self.id, "value", value);
        self.doc.set_value(self.id, value);
        self
    }

    pub fn text(self, text: &str) -> Self {
        self.doc.set_text_content(self.id, text);
        self
    }

    pub fn html(self, markup: &str) -> Self {
        self.doc.set_inner_html(self.id, markup);
        self
    }

    pub fn rect(self, top: f64, height: f64) -> Self {
        self.doc.set_rect(self.id, Rect::new(top, height));
        self
    }

    pub fn append_to(self, parent: NodeId) -> NodeId {
        self.doc.append_child(parent, self.id);
        self.id
    }

    /// Finish without attaching.
    pub fn build(self) -> NodeId {
        self.id
    }
}

#[derive(Debug, Clone)]
enum AttrMatch {
    Present(String),
    Equals(String, String),
    Prefix(String, String),
}

impl AttrMatch {
    fn matches(&self, attrs: &BTreeMap<String, String>) -> bool {
        match self {
            AttrMatch::Present(name) => attrs.contains_key(name),
            AttrMatch::Equals(name, value) => attrs.get(name) == Some(value),
            AttrMatch::Prefix(name, prefix) => attrs
                .get(name)
                .map(|v| v.starts_with(prefix.as_str()))
                .unwrap_or(false),
        }
    }
}

/// Compound selector with an optional descendant combinator.
///
/// `Selector::tag("img").within(Selector::class("hero-background"))` is the
/// equivalent of `.hero-background img`.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    tag: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
    ancestor: Option<Box<Selector>>,
}

impl Selector {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn tag(tag: &str) -> Self {
        Self::any().with_tag(tag)
    }

    pub fn class(class: &str) -> Self {
        Self::any().with_class(class)
    }

    pub fn attr(name: &str) -> Self {
        Self::any().with_attr(name)
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_ascii_lowercase());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_attr(mut self, name: &str) -> Self {
        self.attrs.push(AttrMatch::Present(name.to_string()));
        self
    }

    pub fn with_attr_eq(mut self, name: &str, value: &str) -> Self {
        self.attrs
            .push(AttrMatch::Equals(name.to_string(), value.to_string()));
        self
    }

    pub fn with_attr_prefix(mut self, name: &str, prefix: &str) -> Self {
        self.attrs
            .push(AttrMatch::Prefix(name.to_string(), prefix.to_string()));
        self
    }

    /// Require a proper ancestor matching `ancestor`.
    pub fn within(mut self, ancestor: Selector) -> Self {
        self.ancestor = Some(Box::new(ancestor));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let hero = doc.element("div").class("hero-background").append_to(body);
        let img = doc
            .element("img")
            .attr("src", "hero.jpg")
            .rect(0.0, 600.0)
            .append_to(hero);
        let other = doc.element("img").attr("data-src", "late.jpg").append_to(body);
        (doc, hero, img, other)
    }

    // ==================== Tree Tests ====================

    #[test]
    fn test_new_document_has_head_and_body() {
        let doc = Document::new();
        assert_eq!(doc.children(doc.root()), &[doc.head(), doc.body()]);
        assert_eq!(doc.tag(doc.body()), "body");
        assert!(doc.is_connected(doc.body()));
    }

    #[test]
    fn test_remove_detaches_but_keeps_node() {
        let (mut doc, hero, img, _) = sample();
        doc.remove(img);
        assert!(!doc.is_connected(img));
        assert!(doc.children(hero).is_empty());
        assert_eq!(doc.attr(img, "src"), Some("hero.jpg"));
    }

    #[test]
    fn test_set_text_content_replaces_children() {
        let (mut doc, hero, img, _) = sample();
        doc.set_text_content(hero, "plain");
        assert!(!doc.is_connected(img));
        assert_eq!(doc.text_content(hero), "plain");
    }

    #[test]
    fn test_text_content_strips_markup() {
        let mut doc = Document::new();
        let body = doc.body();
        let p = doc
            .element("p")
            .html("Hello <strong>world</strong>")
            .append_to(body);
        assert_eq!(doc.text_content(p), "Hello world");
        assert_eq!(
            doc.content(p),
            &Content::Markup("Hello <strong>world</strong>".to_string())
        );
    }

    // ==================== Class Tests ====================

    #[test]
    fn test_toggle_class() {
        let (mut doc, hero, _, _) = sample();
        assert!(doc.toggle_class(hero, "active"));
        assert!(doc.has_class(hero, "active"));
        assert!(!doc.toggle_class(hero, "active"));
        assert_eq!(doc.class_name(hero), "hero-background");
    }

    #[test]
    fn test_set_css_text_replaces_style() {
        let (mut doc, hero, _, _) = sample();
        doc.set_style(hero, "opacity", "0");
        doc.set_css_text(hero, "color: #ef4444;\n font-size: 0.875rem; display: block;");
        assert_eq!(doc.style(hero, "opacity"), None);
        assert_eq!(doc.style(hero, "color"), Some("#ef4444"));
        assert_eq!(doc.style(hero, "display"), Some("block"));
    }

    // ==================== Query Tests ====================

    #[test]
    fn test_descendant_selector() {
        let (doc, _, img, other) = sample();
        let selector = Selector::tag("img").within(Selector::class("hero-background"));
        assert_eq!(doc.query(&selector), Some(img));
        assert_eq!(doc.query_all(&Selector::attr("data-src")), vec![other]);
    }

    #[test]
    fn test_query_any_keeps_document_order() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.element("div").class("location-card").append_to(body);
        let b = doc.element("div").class("service-card").append_to(body);
        let found = doc.query_any(&[Selector::class("service-card"), Selector::class("location-card")]);
        assert_eq!(found, vec![a, b]);
    }

    #[test]
    fn test_closest_is_inclusive() {
        let (doc, hero, img, _) = sample();
        assert_eq!(doc.closest(img, &Selector::class("hero-background")), Some(hero));
        assert_eq!(doc.closest(hero, &Selector::class("hero-background")), Some(hero));
        assert_eq!(doc.closest(img, &Selector::class("navbar")), None);
    }

    #[test]
    fn test_attr_prefix_selector() {
        let mut doc = Document::new();
        let body = doc.body();
        let anchor = doc.element("a").attr("href", "#services").append_to(body);
        doc.element("a").attr("href", "https://example.com").append_to(body);
        let found = doc.query_all(&Selector::tag("a").with_attr_prefix("href", "#"));
        assert_eq!(found, vec![anchor]);
    }

    #[test]
    fn test_element_by_id_ignores_detached() {
        let mut doc = Document::new();
        let detached = doc.element("section").attr("id", "contact").build();
        assert_eq!(doc.element_by_id("contact"), None);
        let body = doc.body();
        doc.append_child(body, detached);
        assert_eq!(doc.element_by_id("contact"), Some(detached));
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut doc = Document::new();
        doc.set_scroll_y(-20.0);
        assert_eq!(doc.scroll_y(), 0.0);
    }
}
