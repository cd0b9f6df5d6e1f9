use std::time::Duration;

use pagedom::{Document, Element, Modifiers, NodeId, Overflow};
use pagewire::behaviors::mobile_menu::{CLOSE_PATH, HAMBURGER_PATH};
use pagewire::behaviors::page_transition::OVERLAY_CLASS;
use pagewire::behaviors::{ActiveNav, AnchorScroll, BackToTop, MobileMenu, PageTransitions, ScrollReset};
use pagewire::{Environment, NavigationKind, Page, PageConfig};

const LIMIT: Duration = Duration::from_secs(2);

/// Header 80px, then three 1000px sections: about 80, work 1080, contact 2080.
fn site() -> Document {
    Document::with_body([
        Element::new("header").intrinsic_height(80.0).children([
            Element::a("#about").id("nav-about").class("nav-link"),
            Element::a("#work").id("nav-work").class("nav-link"),
            Element::a("#work").id("m-nav-work").class("mobile-nav-link"),
            Element::a("#missing").id("nav-missing").class("nav-link"),
            Element::a("#").id("nav-top"),
            Element::a("/work.html").id("internal").child(Element::new("span").id("internal-label")),
            Element::a("https://elsewhere.org/").id("external"),
            Element::a("mailto:hi@example.com").id("mail"),
            Element::a("/cv.pdf").id("download").attr("download", ""),
            Element::a("/blog").id("blank").attr("target", "_blank"),
            Element::button().id("mobile-menu-button").attr("aria-expanded", "false"),
            Element::new("path").id("menu-icon-path").attr("d", HAMBURGER_PATH),
            Element::div()
                .id("mobile-menu")
                .child(Element::a("#contact").id("menu-contact")),
        ]),
        Element::new("section").id("about").intrinsic_height(1000.0),
        Element::new("section").id("work").intrinsic_height(1000.0),
        Element::new("section").id("contact").intrinsic_height(1000.0),
        Element::button().id("back-to-top"),
    ])
}

fn env() -> Environment {
    Environment::at("https://example.com/index.html")
        .unwrap()
        .viewport(1280.0, 800.0)
}

fn page_with(env: Environment) -> Page {
    Page::new(site(), env, PageConfig::default())
}

fn node(page: &Page, id: &str) -> NodeId {
    page.element(id).unwrap()
}

fn scroll_y(page: &Page) -> f32 {
    page.viewport().scroll_y
}

// ============================================================================
// Anchor Scroll Tests
// ============================================================================

#[test]
fn test_anchor_smooth_scrolls_with_desktop_offset() {
    let mut page = page_with(env());
    page.attach(AnchorScroll::new());

    let default_ran = page.click(node(&page, "nav-work"));
    assert!(!default_ran);
    assert_eq!(scroll_y(&page), 0.0, "smooth scroll has not started yet");

    page.advance(Duration::from_millis(200));
    let mid = scroll_y(&page);
    assert!(mid > 0.0 && mid < 1040.0);

    assert!(page.run_until_idle(LIMIT));
    assert_eq!(scroll_y(&page), 1080.0 - 40.0);
    assert_eq!(page.location().fragment(), None);
}

#[test]
fn test_anchor_jumps_under_reduced_motion() {
    let mut page = page_with(env().reduced_motion(true));
    page.attach(AnchorScroll::new());

    page.click(node(&page, "nav-about"));
    assert_eq!(scroll_y(&page), 40.0);
}

#[test]
fn test_anchor_on_mobile_closes_menu_then_scrolls() {
    let mut page = page_with(env().viewport(800.0, 800.0));
    page.attach(MobileMenu::new());
    page.attach(AnchorScroll::new());
    let button = node(&page, "mobile-menu-button");
    page.click(button);
    assert_eq!(page.document().attr(button, "aria-expanded"), Some("true"));

    page.click(node(&page, "nav-work"));
    assert_eq!(page.document().attr(button, "aria-expanded"), Some("false"));
    let body = page.document().body();
    assert_eq!(page.document().style(body).overflow, Overflow::Visible);
    // Deferred to the next frame
    assert!(!page.is_idle());
    assert_eq!(scroll_y(&page), 0.0);

    assert!(page.run_until_idle(LIMIT));
    assert_eq!(scroll_y(&page), 1080.0 - 96.0);
}

#[test]
fn test_anchor_without_target_is_left_alone() {
    let mut page = page_with(env());
    page.attach(AnchorScroll::new());

    // Unknown fragment: native jump finds nothing to scroll to
    assert!(page.click(node(&page, "nav-missing")));
    assert!(page.click(node(&page, "nav-top")));
    assert!(page.is_idle());
    assert_eq!(scroll_y(&page), 0.0);
}

// ============================================================================
// Page Transition Tests
// ============================================================================

fn overlay(page: &Page) -> NodeId {
    page.document()
        .select(&format!(".{OVERLAY_CLASS}"))
        .unwrap()
        .first()
        .copied()
        .unwrap()
}

fn is_leaving(page: &Page) -> bool {
    page.document().has_class(overlay(page), "is-leaving")
}

#[test]
fn test_internal_link_fades_then_navigates() {
    let mut page = page_with(env());
    page.attach(PageTransitions::new());

    assert!(!page.click(node(&page, "internal-label")));
    assert!(is_leaving(&page));
    assert!(page.navigations().is_empty());

    page.advance(Duration::from_millis(300));
    let navigations = page.navigations();
    assert_eq!(navigations.len(), 1);
    assert_eq!(navigations[0].url.as_str(), "https://example.com/work.html");
    assert_eq!(navigations[0].kind, NavigationKind::Direct);
}

#[test]
fn test_view_transition_navigates_immediately() {
    let mut page = page_with(env().view_transitions(true));
    page.attach(PageTransitions::new());

    assert!(!page.click(node(&page, "internal")));
    assert!(!is_leaving(&page));
    assert_eq!(page.navigations().len(), 1);
    assert_eq!(page.navigations()[0].kind, NavigationKind::ViewTransition);
    assert_eq!(page.location().path(), "/work.html");
}

#[test]
fn test_skipped_links_keep_default_navigation() {
    for id in ["external", "mail", "download", "blank", "nav-about"] {
        let mut page = page_with(env());
        page.attach(PageTransitions::new());
        assert!(page.click(node(&page, id)), "{id} should not be intercepted");
        assert!(!is_leaving(&page), "{id}");
    }
}

#[test]
fn test_modified_click_is_not_intercepted() {
    for modifiers in [Modifiers::ctrl(), Modifiers::meta(), Modifiers::shift()] {
        let mut page = page_with(env());
        page.attach(PageTransitions::new());
        assert!(page.click_with(node(&page, "internal"), modifiers));
        assert!(!is_leaving(&page));
    }
}

#[test]
fn test_persisted_page_show_clears_overlay() {
    let mut page = page_with(env());
    page.attach(PageTransitions::new());
    page.click(node(&page, "internal"));
    assert!(is_leaving(&page));

    page.page_show(false);
    assert!(is_leaving(&page));
    page.page_show(true);
    assert!(!is_leaving(&page));
}

#[test]
fn test_reduced_motion_disables_page_transitions() {
    let mut page = page_with(env().reduced_motion(true));
    let id = page.attach(PageTransitions::new());

    assert!(page.behavior::<PageTransitions>(id).unwrap().overlay().is_none());
    assert!(page.document().select(".page-transition-overlay").unwrap().is_empty());
    assert!(page.click(node(&page, "internal")));
    assert_eq!(page.navigations().len(), 1);
}

// ============================================================================
// Mobile Menu Tests
// ============================================================================

#[test]
fn test_mobile_menu_toggle() {
    let mut page = page_with(env());
    page.attach(MobileMenu::new());
    let button = node(&page, "mobile-menu-button");
    let menu = node(&page, "mobile-menu");
    let icon = node(&page, "menu-icon-path");
    let body = page.document().body();

    page.click(button);
    let doc = page.document();
    assert_eq!(doc.attr(button, "aria-expanded"), Some("true"));
    assert!(doc.has_class(menu, "is-open"));
    assert_eq!(doc.attr(icon, "d"), Some(CLOSE_PATH));
    assert_eq!(doc.style(body).overflow, Overflow::Hidden);

    page.click(button);
    let doc = page.document();
    assert_eq!(doc.attr(button, "aria-expanded"), Some("false"));
    assert!(!doc.has_class(menu, "is-open"));
    assert_eq!(doc.attr(icon, "d"), Some(HAMBURGER_PATH));
    assert_eq!(doc.style(body).overflow, Overflow::Visible);
}

#[test]
fn test_menu_link_closes_menu() {
    let mut page = page_with(env());
    page.attach(MobileMenu::new());
    let button = node(&page, "mobile-menu-button");

    page.click(button);
    page.click(node(&page, "menu-contact"));
    assert_eq!(page.document().attr(button, "aria-expanded"), Some("false"));
    assert!(!page.document().has_class(node(&page, "mobile-menu"), "is-open"));
}

#[test]
fn test_mobile_menu_needs_button_and_menu() {
    let doc = Document::with_body([Element::button().id("mobile-menu-button")]);
    let mut page = Page::new(doc, env(), PageConfig::default());
    let id = page.attach(MobileMenu::new());
    assert!(!page.behavior::<MobileMenu>(id).unwrap().is_attached());

    let button = node(&page, "mobile-menu-button");
    page.click(button);
    assert_eq!(page.document().attr(button, "aria-expanded"), None);
}

// ============================================================================
// Active Nav Tests
// ============================================================================

fn is_current(page: &Page, id: &str) -> bool {
    let link = node(page, id);
    page.document().has_class(link, "active")
        && page.document().attr(link, "aria-current") == Some("page")
}

#[test]
fn test_active_nav_follows_scroll() {
    let mut page = page_with(env());
    let id = page.attach(ActiveNav::new());
    assert_eq!(page.behavior::<ActiveNav>(id).unwrap().sections().len(), 2);

    assert!(is_current(&page, "nav-about"));
    assert!(!is_current(&page, "nav-work"));

    page.scroll_to(1000.0);
    assert!(!is_current(&page, "nav-about"));
    assert_eq!(page.document().attr(node(&page, "nav-about"), "aria-current"), None);
    assert!(is_current(&page, "nav-work"));
    assert!(is_current(&page, "m-nav-work"));
}

#[test]
fn test_active_nav_without_observer_support() {
    let mut page = page_with(env().intersection_observer(false));
    page.attach(ActiveNav::new());
    page.scroll_to(1000.0);
    assert!(!page.document().has_class(node(&page, "nav-work"), "active"));
}

// ============================================================================
// Back To Top Tests
// ============================================================================

#[test]
fn test_back_to_top_visibility_and_click() {
    let mut page = page_with(env());
    page.attach(BackToTop::new());
    let button = node(&page, "back-to-top");

    page.scroll_to(500.0);
    assert!(!page.document().has_class(button, "is-visible"));
    page.scroll_to(501.0);
    assert!(page.document().has_class(button, "is-visible"));

    page.click(button);
    assert!(page.run_until_idle(LIMIT));
    assert_eq!(scroll_y(&page), 0.0);
    assert!(!page.document().has_class(button, "is-visible"));
}

#[test]
fn test_user_scroll_interrupts_smooth_scroll() {
    let mut page = page_with(env());
    page.attach(BackToTop::new());
    page.scroll_to(1500.0);
    page.click(node(&page, "back-to-top"));
    page.advance(Duration::from_millis(100));

    page.scroll_to(900.0);
    assert!(page.run_until_idle(LIMIT));
    assert_eq!(scroll_y(&page), 900.0);
}

// ============================================================================
// Scroll Reset Tests
// ============================================================================

#[test]
fn test_load_resets_scroll_twice() {
    let mut page = page_with(env());
    let id = page.attach(ScrollReset::new());

    page.scroll_to(700.0);
    page.load();
    assert_eq!(scroll_y(&page), 0.0);

    // Late layout shift before the retry
    page.scroll_to(300.0);
    page.advance(Duration::from_millis(50));
    assert_eq!(scroll_y(&page), 0.0);
    assert_eq!(page.behavior::<ScrollReset>(id).unwrap().resets(), 3);
}

#[test]
fn test_only_first_load_resets() {
    let mut page = page_with(env());
    page.attach(ScrollReset::new());
    page.load();
    assert!(page.run_until_idle(LIMIT));

    page.scroll_to(700.0);
    page.load();
    assert!(page.run_until_idle(LIMIT));
    assert_eq!(scroll_y(&page), 700.0);
}

#[test]
fn test_persisted_page_show_resets() {
    let mut page = page_with(env());
    page.attach(ScrollReset::new());

    page.scroll_to(700.0);
    page.page_show(false);
    assert_eq!(scroll_y(&page), 700.0);

    page.page_show(true);
    assert_eq!(scroll_y(&page), 0.0);
}

#[test]
fn test_fragment_target_skips_reset() {
    let env = Environment::at("https://example.com/index.html#work").unwrap();
    let mut page = page_with(env);
    let id = page.attach(ScrollReset::new());

    page.scroll_to(1080.0);
    page.load();
    assert!(page.run_until_idle(LIMIT));
    assert_eq!(scroll_y(&page), 1080.0);
    assert_eq!(page.behavior::<ScrollReset>(id).unwrap().resets(), 0);
}

#[test]
fn test_unknown_fragment_still_resets() {
    let env = Environment::at("https://example.com/index.html#nowhere").unwrap();
    let mut page = page_with(env);
    page.attach(ScrollReset::new());

    page.scroll_to(500.0);
    page.load();
    assert_eq!(scroll_y(&page), 0.0);
}
