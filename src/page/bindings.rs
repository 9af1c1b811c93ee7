// src/page/bindings.rs
// =============================================================================
// Which element reacts to which event, decided once when the page loads.
//
// In a browser this would be a series of addEventListener calls hidden inside
// closures. Here each listener is a plain `Binding` value: the selector it was
// found by, the element (or the window) it listens on, the event it listens
// for, and the action it runs. The full set is an ordinary Vec, so it can be
// printed, counted and tested without a browser.
//
// Each behavior looks for its own elements and simply contributes no bindings
// when they aren't on the page.
// =============================================================================

use super::carousel::Carousel;
use super::document::Document;
use ego_tree::NodeId;
use serde::Serialize;

// Selectors and class names used by the site's markup
pub const NAV_TRIGGER_ID: &str = "hamburger";
/// Selector form of `NAV_TRIGGER_ID`, as reported on the binding
pub const NAV_TRIGGER: &str = "#hamburger";
pub const NAV_CONTAINER_ID: &str = "nav";
pub const NAV_ACTIVE_CLASS: &str = "active";
pub const CAROUSEL_TRACK: &str = ".carousel-track";
pub const CAROUSEL_SLIDE: &str = ".project-slide";
pub const CAROUSEL_PREV: &str = ".carousel-btn.prev";
pub const CAROUSEL_NEXT: &str = ".carousel-btn.next";
pub const CAROUSEL_CONTROLS: &str = ".carousel-btn";
pub const CTA_LINKS: &str = ".cta-primary, .cta-secondary";
pub const ANCHOR_LINKS: &str = r##"a[href^="#"]"##;
pub const IMAGES_WITHOUT_LOADING: &str = "img:not([loading])";
pub const HERO_ID: &str = "hero";
pub const PROFILE_PIC_CLASS: &str = "profile-pic";

/// What a binding listens on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Element(NodeId),
    Window,
}

/// The event a binding listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Click,
    KeyDown,
    Resize,
    HistoryNavigation,
}

/// What happens when a binding fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Flip a class on another element
    ToggleClass { container: NodeId, class: &'static str },
    CarouselNext,
    CarouselPrevious,
    CarouselReposition,
    /// Enter/Space behave like a click on the same element
    ClickOnKey,
    /// Enter/Space follow the link
    NavigateOnKey { href: String },
    /// Scroll smoothly to the element with this id
    SmoothScroll { fragment: String },
}

/// One event listener
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub selector: &'static str,
    pub target: Target,
    pub trigger: Trigger,
    pub action: Action,
}

impl Binding {
    fn on(selector: &'static str, node: NodeId, trigger: Trigger, action: Action) -> Self {
        Self {
            selector,
            target: Target::Element(node),
            trigger,
            action,
        }
    }

    fn on_window(selector: &'static str, trigger: Trigger, action: Action) -> Self {
        Self {
            selector,
            target: Target::Window,
            trigger,
            action,
        }
    }

    /// Human-readable description of the action
    pub fn describe(&self, document: &Document) -> String {
        match &self.action {
            Action::ToggleClass { container, class } => {
                format!("toggle .{} on {}", class, document.describe(*container))
            }
            Action::CarouselNext => "carousel next".to_string(),
            Action::CarouselPrevious => "carousel previous".to_string(),
            Action::CarouselReposition => "carousel reposition".to_string(),
            Action::ClickOnKey => "Enter/Space -> click".to_string(),
            Action::NavigateOnKey { href } => format!("Enter/Space -> navigate {}", href),
            Action::SmoothScroll { fragment } => format!("smooth scroll to #{}", fragment),
        }
    }
}

/// Everything page setup produced
#[derive(Debug, Clone, PartialEq)]
pub struct Wiring {
    pub bindings: Vec<Binding>,
    pub carousel: Option<Carousel>,
}

/// Builds the bindings for all behaviors
///
/// Order matches the order the site initializes them in: navigation,
/// carousel, accessibility, smooth scrolling. Lazy loading doesn't bind
/// anything; see `apply_lazy_loading`.
pub fn wire(document: &Document) -> Wiring {
    let mut bindings = Vec::new();

    bindings.extend(navigation_bindings(document));

    let carousel = build_carousel(document);
    if carousel.is_some() {
        bindings.extend(carousel_bindings(document));
    }

    bindings.extend(accessibility_bindings(document));
    bindings.extend(smooth_scroll_bindings(document));

    tracing::debug!(count = bindings.len(), "page wired");
    Wiring { bindings, carousel }
}

// Hamburger button toggles the nav menu
// Both elements must exist, otherwise nothing is bound
fn navigation_bindings(document: &Document) -> Vec<Binding> {
    let trigger = document.element_by_id(NAV_TRIGGER_ID);
    let container = document.element_by_id(NAV_CONTAINER_ID);

    match (trigger, container) {
        (Some(trigger), Some(container)) => vec![Binding::on(
            NAV_TRIGGER,
            trigger,
            Trigger::Click,
            Action::ToggleClass {
                container,
                class: NAV_ACTIVE_CLASS,
            },
        )],
        _ => Vec::new(),
    }
}

// The carousel exists only if the page has a track
fn build_carousel(document: &Document) -> Option<Carousel> {
    let track = document.select_first(CAROUSEL_TRACK)?;
    let slides = document.select_all(CAROUSEL_SLIDE);
    Some(Carousel::new(track, slides))
}

fn carousel_bindings(document: &Document) -> Vec<Binding> {
    let mut bindings = Vec::new();

    if let Some(next) = document.select_first(CAROUSEL_NEXT) {
        bindings.push(Binding::on(CAROUSEL_NEXT, next, Trigger::Click, Action::CarouselNext));
    }
    if let Some(prev) = document.select_first(CAROUSEL_PREV) {
        bindings.push(Binding::on(
            CAROUSEL_PREV,
            prev,
            Trigger::Click,
            Action::CarouselPrevious,
        ));
    }

    bindings.push(Binding::on_window(
        "window",
        Trigger::Resize,
        Action::CarouselReposition,
    ));
    bindings.push(Binding::on_window(
        "window",
        Trigger::HistoryNavigation,
        Action::CarouselReposition,
    ));

    bindings
}

// Keyboard access for carousel buttons and call-to-action links
fn accessibility_bindings(document: &Document) -> Vec<Binding> {
    let controls = document
        .select_all(CAROUSEL_CONTROLS)
        .into_iter()
        .map(|node| Binding::on(CAROUSEL_CONTROLS, node, Trigger::KeyDown, Action::ClickOnKey));

    let links = document.select_all(CTA_LINKS).into_iter().map(|node| {
        // A CTA without href navigates to an empty URL in the browser too
        let href = document.attr(node, "href").unwrap_or_default();
        Binding::on(CTA_LINKS, node, Trigger::KeyDown, Action::NavigateOnKey { href })
    });

    controls.chain(links).collect()
}

fn smooth_scroll_bindings(document: &Document) -> Vec<Binding> {
    document
        .select_all(ANCHOR_LINKS)
        .into_iter()
        .map(|node| {
            let href = document.attr(node, "href").unwrap_or_default();
            let fragment = href.trim_start_matches('#').to_string();
            Binding::on(ANCHOR_LINKS, node, Trigger::Click, Action::SmoothScroll { fragment })
        })
        .collect()
}

/// What lazy-load hinting did to one image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingDecision {
    /// `loading="lazy"` was added
    Lazy,
    /// Left eager because it sits inside the hero section
    EagerHero,
    /// Left eager because it is a profile picture
    EagerProfile,
}

/// Marks below-the-fold images `loading="lazy"`
///
/// Only images without a `loading` attribute are considered. Hero images
/// and profile pictures are left alone.
pub fn apply_lazy_loading(document: &mut Document) -> Vec<(NodeId, LoadingDecision)> {
    let images = document.select_all(IMAGES_WITHOUT_LOADING);
    let mut decisions = Vec::with_capacity(images.len());

    for image in images {
        let decision = if document.is_within_id(image, HERO_ID) {
            LoadingDecision::EagerHero
        } else if document.has_class(image, PROFILE_PIC_CLASS) {
            LoadingDecision::EagerProfile
        } else {
            document.set_loading(image, "lazy");
            LoadingDecision::Lazy
        };
        decisions.push((image, decision));
    }

    decisions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_page_has_no_bindings() {
        let doc = Document::parse("<html><body><p>hello</p></body></html>");
        let wiring = wire(&doc);
        assert!(wiring.bindings.is_empty());
        assert!(wiring.carousel.is_none());
    }

    #[test]
    fn test_navigation_needs_both_elements() {
        let only_trigger = Document::parse(r#"<button id="hamburger"></button>"#);
        assert!(wire(&only_trigger).bindings.is_empty());

        let both = Document::parse(r#"<button id="hamburger"></button><nav id="nav"></nav>"#);
        let bindings = wire(&both).bindings;
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].trigger, Trigger::Click);
        // The reported selector finds the same element the binding is on
        assert_eq!(bindings[0].selector, NAV_TRIGGER);
        assert_eq!(both.select_first(NAV_TRIGGER), both.element_by_id(NAV_TRIGGER_ID));
        assert!(matches!(bindings[0].action, Action::ToggleClass { class: "active", .. }));
    }

    #[test]
    fn test_carousel_binds_buttons_and_window() {
        let doc = Document::parse(
            r#"<div class="carousel-track"><div class="project-slide"></div></div>
               <button class="carousel-btn prev"></button>
               <button class="carousel-btn next"></button>"#,
        );
        let wiring = wire(&doc);
        let carousel = wiring.carousel.expect("carousel");
        assert_eq!(carousel.slide_count(), 1);

        let actions: Vec<_> = wiring.bindings.iter().map(|b| b.action.clone()).collect();
        assert!(actions.contains(&Action::CarouselNext));
        assert!(actions.contains(&Action::CarouselPrevious));

        let window_triggers: Vec<_> = wiring
            .bindings
            .iter()
            .filter(|b| b.target == Target::Window)
            .map(|b| b.trigger)
            .collect();
        assert_eq!(window_triggers, vec![Trigger::Resize, Trigger::HistoryNavigation]);

        // Both buttons also get keyboard handling
        let keyed = wiring
            .bindings
            .iter()
            .filter(|b| b.action == Action::ClickOnKey)
            .count();
        assert_eq!(keyed, 2);
    }

    #[test]
    fn test_cta_links_navigate_on_key() {
        let doc = Document::parse(
            r#"<a class="cta-primary" href="/contact.html">Contact</a>
               <a class="cta-secondary" href="/cv.pdf">CV</a>"#,
        );
        let hrefs: Vec<_> = wire(&doc)
            .bindings
            .into_iter()
            .filter_map(|b| match b.action {
                Action::NavigateOnKey { href } => Some(href),
                _ => None,
            })
            .collect();
        assert_eq!(hrefs, vec!["/contact.html", "/cv.pdf"]);
    }

    #[test]
    fn test_anchor_links_only() {
        let doc = Document::parse(
            r##"<a href="#about">About</a><a href="/blog">Blog</a><a href="#">Top</a>"##,
        );
        let fragments: Vec<_> = wire(&doc)
            .bindings
            .into_iter()
            .filter_map(|b| match b.action {
                Action::SmoothScroll { fragment } => Some(fragment),
                _ => None,
            })
            .collect();
        assert_eq!(fragments, vec!["about", ""]);
    }

    #[test]
    fn test_lazy_loading_all_combinations() {
        let mut doc = Document::parse(
            r#"<section id="hero">
                 <img id="hero-plain" src="a.png">
                 <img id="hero-profile" class="profile-pic" src="b.png">
               </section>
               <img id="plain" src="c.png">
               <img id="profile" class="profile-pic" src="d.png">
               <img id="explicit" src="e.png" loading="eager">"#,
        );

        let decisions = apply_lazy_loading(&mut doc);
        assert_eq!(decisions.len(), 4);

        let loading = |doc: &Document, id: &str| doc.attr(doc.element_by_id(id).unwrap(), "loading");
        assert_eq!(loading(&doc, "hero-plain"), None);
        assert_eq!(loading(&doc, "hero-profile"), None);
        assert_eq!(loading(&doc, "plain").as_deref(), Some("lazy"));
        assert_eq!(loading(&doc, "profile"), None);
        // Explicit attributes are never touched
        assert_eq!(loading(&doc, "explicit").as_deref(), Some("eager"));
    }
}
