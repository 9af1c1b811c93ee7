// src/page/document.rs
// =============================================================================
// The document the page behaviors run against.
//
// A page is parsed once with `scraper` and never re-parsed. Everything the
// behaviors change afterwards (class lists, the carousel's inline transform,
// image `loading` attributes) is written into a small per-element overlay
// keyed by the node's id in scraper's tree. Reads go through the overlay
// first and fall back to the parsed markup.
//
// This keeps the parsed tree immutable (scraper doesn't expose attribute
// mutation) while still letting tests ask "what does this element look like
// now?".
// =============================================================================

use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

// Mutations recorded for a single element
#[derive(Debug, Clone, Default)]
struct ElementState {
    /// Full class list once any class was toggled (None = untouched)
    classes: Option<Vec<String>>,
    /// Inline `transform` style
    transform: Option<String>,
    /// Value written to the `loading` attribute
    loading: Option<String>,
}

/// A parsed page plus the mutations made to it
#[derive(Debug)]
pub struct Document {
    html: Html,
    overlay: HashMap<NodeId, ElementState>,
}

impl Document {
    /// Parses a full HTML document
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
            overlay: HashMap::new(),
        }
    }

    // Looks up an element by node id
    // Returns None if the id doesn't point at an element
    fn element(&self, node: NodeId) -> Option<ElementRef<'_>> {
        self.html.tree.get(node).and_then(ElementRef::wrap)
    }

    /// All elements matching a CSS selector, in document order
    ///
    /// An unparseable selector matches nothing. The behaviors treat a
    /// missing target as a no-op, so this is the same outcome.
    pub fn select_all(&self, css: &str) -> Vec<NodeId> {
        match Selector::parse(css) {
            Ok(selector) => self.html.select(&selector).map(|el| el.id()).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// First element matching a CSS selector
    pub fn select_first(&self, css: &str) -> Option<NodeId> {
        self.select_all(css).into_iter().next()
    }

    /// Element whose `id` attribute equals `id`
    ///
    /// Compared literally so ids that aren't valid CSS identifiers
    /// (e.g. "2024-projects") still resolve.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.html
            .tree
            .nodes()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().id() == Some(id))
            .map(|el| el.id())
    }

    /// Attribute value as written in the markup, with `loading` overridden
    /// by anything the behaviors set
    pub fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        if name == "loading" {
            if let Some(loading) = self.overlay.get(&node).and_then(|s| s.loading.clone()) {
                return Some(loading);
            }
        }
        self.element(node)
            .and_then(|el| el.value().attr(name))
            .map(str::to_string)
    }

    /// Current class list of an element
    pub fn classes(&self, node: NodeId) -> Vec<String> {
        if let Some(classes) = self.overlay.get(&node).and_then(|s| s.classes.clone()) {
            return classes;
        }
        self.element(node)
            .map(|el| el.value().classes().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.classes(node).iter().any(|c| c == class)
    }

    /// Flips a class on an element and returns whether it is now present
    pub fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        let mut classes = self.classes(node);
        let present = if let Some(pos) = classes.iter().position(|c| c == class) {
            classes.remove(pos);
            false
        } else {
            classes.push(class.to_string());
            true
        };
        self.overlay.entry(node).or_default().classes = Some(classes);
        present
    }

    /// Inline transform written by the behaviors, if any
    pub fn transform(&self, node: NodeId) -> Option<&str> {
        self.overlay.get(&node).and_then(|s| s.transform.as_deref())
    }

    pub fn set_transform(&mut self, node: NodeId, transform: String) {
        self.overlay.entry(node).or_default().transform = Some(transform);
    }

    pub fn set_loading(&mut self, node: NodeId, strategy: &str) {
        self.overlay.entry(node).or_default().loading = Some(strategy.to_string());
    }

    /// True if the element or one of its ancestors has the given id
    ///
    /// Same semantics as `element.closest('#id')` in a browser.
    pub fn is_within_id(&self, node: NodeId, id: &str) -> bool {
        let Some(el) = self.element(node) else {
            return false;
        };
        if el.value().id() == Some(id) {
            return true;
        }
        el.ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| ancestor.value().id() == Some(id))
    }

    /// Short CSS-like label for reports: `tag#id.class1.class2`
    pub fn describe(&self, node: NodeId) -> String {
        let Some(el) = self.element(node) else {
            return "?".to_string();
        };
        let mut label = el.value().name().to_string();
        if let Some(id) = el.value().id() {
            label.push('#');
            label.push_str(id);
        }
        for class in self.classes(node) {
            label.push('.');
            label.push_str(&class);
        }
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
            <nav id="nav" class="menu"></nav>
            <section id="hero"><div><img id="portrait" src="me.png"></div></section>
            <img id="footer-logo" src="logo.png" loading="eager">
        </body></html>
    "#;

    #[test]
    fn test_toggle_class_flips_back_and_forth() {
        let mut doc = Document::parse(PAGE);
        let nav = doc.element_by_id("nav").unwrap();

        assert!(doc.toggle_class(nav, "active"));
        assert!(doc.has_class(nav, "active"));
        assert!(doc.has_class(nav, "menu"));

        assert!(!doc.toggle_class(nav, "active"));
        assert!(!doc.has_class(nav, "active"));
        assert_eq!(doc.classes(nav), vec!["menu"]);
    }

    #[test]
    fn test_is_within_id_walks_ancestors() {
        let doc = Document::parse(PAGE);
        let portrait = doc.element_by_id("portrait").unwrap();
        let logo = doc.element_by_id("footer-logo").unwrap();

        assert!(doc.is_within_id(portrait, "hero"));
        assert!(!doc.is_within_id(logo, "hero"));
    }

    #[test]
    fn test_loading_overlay_wins_over_markup() {
        let mut doc = Document::parse(PAGE);
        let portrait = doc.element_by_id("portrait").unwrap();
        let logo = doc.element_by_id("footer-logo").unwrap();

        assert_eq!(doc.attr(portrait, "loading"), None);
        doc.set_loading(portrait, "lazy");
        assert_eq!(doc.attr(portrait, "loading").as_deref(), Some("lazy"));
        assert_eq!(doc.attr(logo, "loading").as_deref(), Some("eager"));
    }

    #[test]
    fn test_bad_selector_matches_nothing() {
        let doc = Document::parse(PAGE);
        assert!(doc.select_all("img[").is_empty());
        assert_eq!(doc.element_by_id(""), None);
    }

    #[test]
    fn test_describe() {
        let doc = Document::parse(PAGE);
        let nav = doc.element_by_id("nav").unwrap();
        assert_eq!(doc.describe(nav), "nav#nav.menu");
    }
}
