use std::time::Duration;

use chrono::NaiveDate;
use pagedom::{Document, Element, NodeId};
use pagewire::behaviors::{
    image_paths, Counters, CopyButtons, FooterYear, ImagePaths, Reveal, TableOfContents,
};
use pagewire::{Clipboard, ClipboardError, Environment, MemoryClipboard, Page, PageConfig};

const LIMIT: Duration = Duration::from_secs(5);

fn env() -> Environment {
    Environment::at("https://example.com/projects/atlas.html")
        .unwrap()
        .viewport(1280.0, 800.0)
}

fn node(page: &Page, id: &str) -> NodeId {
    page.element(id).unwrap()
}

fn text(page: &Page, id: &str) -> String {
    page.document().text_content(node(page, id))
}

// ============================================================================
// Copy Button Tests
// ============================================================================

fn copy_doc() -> Document {
    Document::with_body([
        Element::new("pre").id("code").text("  cargo run --release \n"),
        Element::button().id("copy").attr("data-copy", "#code"),
        Element::button().id("unmatched").attr("data-copy", "#nothing"),
        Element::button().id("invalid").attr("data-copy", "##"),
        Element::button().id("empty").attr("data-copy", ""),
    ])
}

#[test]
fn test_copy_writes_trimmed_text() {
    let mut page = Page::new(copy_doc(), env(), PageConfig::default());
    page.attach(CopyButtons::new());
    let button = node(&page, "copy");

    page.click(button);
    assert_eq!(page.clipboard().read_text(), Some("cargo run --release"));
    assert_eq!(page.document().attr(button, "data-copied"), Some("true"));

    page.advance(Duration::from_millis(1500));
    assert_eq!(page.document().attr(button, "data-copied"), None);
}

#[test]
fn test_copy_falls_back_when_denied() {
    let mut page = Page::new(copy_doc(), env(), PageConfig::default())
        .with_clipboard(MemoryClipboard::denying());
    page.attach(CopyButtons::new());
    let button = node(&page, "copy");

    page.click(button);
    assert_eq!(page.clipboard().read_text(), Some("cargo run --release"));
    assert_eq!(page.document().attr(button, "data-copied"), Some("true"));
    // The temporary field is gone again
    assert!(page.document().select("textarea").unwrap().is_empty());
    let clipboard = page.clipboard_as::<MemoryClipboard>().unwrap();
    assert_eq!(clipboard.fallback_copies(), 1);
}

#[test]
fn test_fallback_copy_frees_its_field() {
    let mut page = Page::new(copy_doc(), env(), PageConfig::default())
        .with_clipboard(MemoryClipboard::denying());
    page.attach(CopyButtons::new());
    let button = node(&page, "copy");
    let nodes = page.document().len();

    for _ in 0..200 {
        page.click(button);
        page.tick(Duration::from_millis(16));
    }
    assert_eq!(page.document().len(), nodes);
    assert!(page.animation().tracked() <= nodes);
    let clipboard = page.clipboard_as::<MemoryClipboard>().unwrap();
    assert_eq!(clipboard.fallback_copies(), 200);
}

#[test]
fn test_copy_without_any_clipboard_still_gives_feedback() {
    let mut page = Page::new(copy_doc(), env(), PageConfig::default())
        .with_clipboard(MemoryClipboard::unavailable());
    page.attach(CopyButtons::new());
    let button = node(&page, "copy");

    page.click(button);
    assert_eq!(page.clipboard().read_text(), None);
    assert_eq!(page.document().attr(button, "data-copied"), Some("true"));
    assert!(page.document().select("textarea").unwrap().is_empty());
    let clipboard = page.clipboard_as::<MemoryClipboard>().unwrap();
    assert_eq!(clipboard.fallback_copies(), 0);

    let mut clipboard = MemoryClipboard::unavailable();
    let err = clipboard.write_text("x").unwrap_err();
    assert!(matches!(err, ClipboardError::Unavailable(_)));
    assert_eq!(err.to_string(), "clipboard unavailable: insecure context");
    assert!(!clipboard.copy_selection("x"));
}

#[test]
fn test_repeat_copy_restarts_feedback() {
    let mut page = Page::new(copy_doc(), env(), PageConfig::default());
    page.attach(CopyButtons::new());
    let button = node(&page, "copy");

    page.click(button);
    page.advance(Duration::from_millis(1000));
    page.click(button);
    page.advance(Duration::from_millis(1000));
    assert_eq!(page.document().attr(button, "data-copied"), Some("true"));

    page.advance(Duration::from_millis(500));
    assert_eq!(page.document().attr(button, "data-copied"), None);
}

#[test]
fn test_copy_skips_buttons_without_source() {
    let mut page = Page::new(copy_doc(), env(), PageConfig::default());
    let id = page.attach(CopyButtons::new());
    let copy = node(&page, "copy");
    assert_eq!(page.behavior::<CopyButtons>(id).unwrap().buttons(), vec![copy]);

    for skipped in ["unmatched", "invalid", "empty"] {
        page.click(node(&page, skipped));
        assert_eq!(page.document().attr(node(&page, skipped), "data-copied"), None);
    }
    assert_eq!(page.clipboard().read_text(), None);
}

// ============================================================================
// Table Of Contents Tests
// ============================================================================

/// Intro heading at 200, usage heading at 1240, document 2280 tall.
fn article() -> Document {
    Document::with_body([
        Element::new("nav")
            .id("toc")
            .child(Element::new("p").id("placeholder").text("Loading")),
        Element::new("header").intrinsic_height(200.0),
        Element::new("h2").id("intro").intrinsic_height(40.0).text("  Intro "),
        Element::new("p").intrinsic_height(1000.0),
        Element::new("h2").id("usage").intrinsic_height(40.0).text("Usage"),
        Element::new("p").intrinsic_height(1000.0),
        Element::new("h2").text("Untitled"),
    ])
}

fn links(page: &Page, selector: &str) -> Vec<NodeId> {
    page.document().select(selector).unwrap()
}

#[test]
fn test_toc_builds_desktop_and_mobile_lists() {
    let mut page = Page::new(article(), env(), PageConfig::default());
    let id = page.attach(TableOfContents::new());
    let toc = page.behavior::<TableOfContents>(id).unwrap();
    assert_eq!(toc.headings().len(), 2);

    // Old contents are replaced
    let toc_children = page.document().children(node(&page, "toc"));
    assert_eq!(toc_children.len(), 1);
    assert_eq!(page.document().tag(toc_children[0]), Some("ul"));

    let desktop = links(&page, "#toc > ul > li > a.toc-link");
    assert_eq!(desktop.len(), 2);
    assert_eq!(page.document().attr(desktop[0], "href"), Some("#intro"));
    assert_eq!(page.document().text_content(desktop[0]), "Intro");

    let mobile = links(&page, "#mobile-toc-menu > nav > a.mobile-toc-link");
    assert_eq!(mobile.len(), 2);
    assert_eq!(page.document().attr(mobile[1], "href"), Some("#usage"));
    assert_eq!(links(&page, "button.mobile-toc-toggle").len(), 1);
}

#[test]
fn test_toc_link_scrolls_to_heading() {
    let mut page = Page::new(article(), env(), PageConfig::default());
    page.attach(TableOfContents::new());

    let usage = links(&page, "a.toc-link")[1];
    assert!(!page.click(usage));
    assert!(page.run_until_idle(LIMIT));
    assert_eq!(page.viewport().scroll_y, 1240.0 - 40.0);
}

#[test]
fn test_mobile_toc_toggle_and_close() {
    let mut page = Page::new(article(), env().reduced_motion(true), PageConfig::default());
    let id = page.attach(TableOfContents::new());
    let toc = page.behavior::<TableOfContents>(id).unwrap();
    let (menu, toggle) = (toc.mobile_menu().unwrap(), toc.toggle_button().unwrap());

    page.click(toggle);
    assert!(page.document().has_class(menu, "is-open"));

    let intro = links(&page, "a.mobile-toc-link")[0];
    page.click(intro);
    assert!(!page.document().has_class(menu, "is-open"));
    assert_eq!(page.viewport().scroll_y, 200.0 - 40.0);

    page.click(toggle);
    page.click(toggle);
    assert!(!page.document().has_class(menu, "is-open"));
}

#[test]
fn test_toc_highlights_current_heading() {
    let mut page = Page::new(article(), env(), PageConfig::default());
    page.attach(TableOfContents::new());
    let desktop = links(&page, "a.toc-link");
    let mobile = links(&page, "a.mobile-toc-link");
    let active = |page: &Page, link: NodeId| page.document().has_class(link, "active");

    assert!(active(&page, desktop[0]) && active(&page, mobile[0]));
    assert!(!active(&page, desktop[1]) && !active(&page, mobile[1]));

    // Usage heading at 140..180 in the viewport, inside the 160..240 band
    page.scroll_to(1100.0);
    assert!(!active(&page, desktop[0]) && !active(&page, mobile[0]));
    assert!(active(&page, desktop[1]) && active(&page, mobile[1]));
}

#[test]
fn test_toc_without_headings_adds_nothing() {
    let doc = Document::with_body([Element::new("nav").id("toc").child(Element::new("p").id("keep"))]);
    let mut page = Page::new(doc, env(), PageConfig::default());
    page.attach(TableOfContents::new());
    assert!(page.element("mobile-toc-menu").is_none());
    assert!(page.document().is_connected(node(&page, "keep")));
}

#[test]
fn test_toc_without_container_still_builds_mobile_menu() {
    let doc = Document::with_body([Element::new("h2").id("only").text("Only")]);
    let mut page = Page::new(doc, env(), PageConfig::default());
    page.attach(TableOfContents::new());
    assert!(links(&page, "a.toc-link").is_empty());
    assert_eq!(links(&page, "a.mobile-toc-link").len(), 1);
}

// ============================================================================
// Reveal Tests
// ============================================================================

fn gallery() -> Document {
    Document::with_body([
        Element::div().id("near").class("reveal-on-scroll").intrinsic_height(200.0),
        Element::div().intrinsic_height(1800.0),
        Element::div().id("far").class("reveal-on-scroll").intrinsic_height(200.0),
    ])
}

fn revealed(page: &Page, id: &str) -> bool {
    page.document().has_class(node(page, id), "is-visible")
}

#[test]
fn test_reveal_on_intersection() {
    let mut page = Page::new(gallery(), env(), PageConfig::default());
    page.attach(Reveal::new());
    assert!(revealed(&page, "near"));
    assert!(!revealed(&page, "far"));

    // Far spans 600..800 in the viewport; band ends at 750, 75% visible
    page.scroll_to(1400.0);
    assert!(revealed(&page, "far"));

    // Once revealed, stays revealed
    page.scroll_to(0.0);
    assert!(revealed(&page, "far"));
}

#[test]
fn test_reveal_needs_enough_of_the_item() {
    let mut page = Page::new(gallery(), env(), PageConfig::default());
    page.attach(Reveal::new());

    // Far spans 730..930: 20px inside the band, 10%
    page.scroll_to(1270.0);
    assert!(!revealed(&page, "far"));
}

#[test]
fn test_reveal_immediately_without_motion_or_observer() {
    for env in [env().reduced_motion(true), env().intersection_observer(false)] {
        let mut page = Page::new(gallery(), env, PageConfig::default());
        page.attach(Reveal::new());
        assert!(revealed(&page, "near"));
        assert!(revealed(&page, "far"));
    }
}

// ============================================================================
// Counter Tests
// ============================================================================

fn stats() -> Document {
    Document::with_body([
        Element::new("span")
            .id("clients")
            .attr("data-target", "250")
            .attr("data-suffix", "+")
            .intrinsic_height(40.0)
            .text("0+"),
        Element::new("span")
            .id("price")
            .attr("data-target", "4.5")
            .attr("data-prefix", "$")
            .attr("data-decimals", "1")
            .intrinsic_height(40.0),
        Element::new("span")
            .id("broken")
            .attr("data-target", "lots")
            .intrinsic_height(40.0)
            .text("n/a"),
        Element::div().intrinsic_height(2000.0),
        Element::new("span")
            .id("later")
            .attr("data-target", "99")
            .intrinsic_height(40.0)
            .text("0"),
    ])
}

#[test]
fn test_counter_eases_to_exact_target() {
    let mut page = Page::new(stats(), env(), PageConfig::default());
    let id = page.attach(Counters::new());
    assert_eq!(page.behavior::<Counters>(id).unwrap().counters().len(), 3);

    page.advance(Duration::from_millis(1000));
    // 1 - 2^-5 of the way there
    assert_eq!(text(&page, "clients"), "242+");

    page.advance(Duration::from_millis(1100));
    assert_eq!(text(&page, "clients"), "250+");
    assert_eq!(text(&page, "price"), "$4.5");
}

#[test]
fn test_counter_skips_invalid_target() {
    let mut page = Page::new(stats(), env(), PageConfig::default());
    page.attach(Counters::new());
    assert!(page.run_until_idle(LIMIT));
    assert_eq!(text(&page, "broken"), "n/a");
}

#[test]
fn test_counter_waits_until_visible() {
    let mut page = Page::new(stats(), env(), PageConfig::default());
    let id = page.attach(Counters::new());
    assert!(page.run_until_idle(LIMIT));
    assert_eq!(text(&page, "later"), "0");

    // Later spans 2120..2160
    page.scroll_to(1500.0);
    let counters = page.behavior::<Counters>(id).unwrap().counters();
    assert!(counters.iter().all(|c| c.is_started()));
    assert!(page.run_until_idle(LIMIT));
    assert_eq!(text(&page, "later"), "99");
}

#[test]
fn test_counter_runs_once() {
    let mut page = Page::new(stats(), env(), PageConfig::default());
    page.attach(Counters::new());
    assert!(page.run_until_idle(LIMIT));

    let clients = node(&page, "clients");
    page.document_mut().set_text(clients, "edited");
    page.scroll_to(1500.0);
    page.scroll_to(0.0);
    assert!(page.run_until_idle(LIMIT));
    assert_eq!(text(&page, "clients"), "edited");
}

#[test]
fn test_counter_shows_final_value_without_observer() {
    let mut page = Page::new(stats(), env().intersection_observer(false), PageConfig::default());
    page.attach(Counters::new());
    assert_eq!(text(&page, "later"), "99");
    assert!(page.is_idle());
}

// ============================================================================
// Footer Year and Image Path Tests
// ============================================================================

#[test]
fn test_footer_year() {
    let doc = Document::with_body([Element::new("span").id("year").text("2024")]);
    let today = NaiveDate::from_ymd_opt(2031, 3, 14).unwrap();
    let mut page = Page::new(doc, env().today(today), PageConfig::default());
    page.attach(FooterYear);
    assert_eq!(text(&page, "year"), "2031");
}

fn project_doc() -> Document {
    Document::with_body([
        Element::new("meta")
            .id("og")
            .attr("property", "og:image")
            .attr("content", ""),
        Element::new("img").id("hero").attr("data-slug", "hero.webp"),
        Element::new("img").id("blank").attr("data-slug", ""),
        Element::new("img").id("plain").attr("src", "logo.svg"),
    ])
}

#[test]
fn test_image_paths_use_configured_slug() {
    let config = PageConfig::default().project_slug("atlas");
    let mut page = Page::new(project_doc(), env(), config);
    page.attach(ImagePaths);

    let doc = page.document();
    assert_eq!(
        doc.attr(node(&page, "hero"), "src"),
        Some("assets/projects/atlas/hero.webp")
    );
    assert_eq!(doc.attr(node(&page, "blank"), "src"), None);
    assert_eq!(doc.attr(node(&page, "plain"), "src"), Some("logo.svg"));
    assert_eq!(
        doc.attr(node(&page, "og"), "content"),
        Some("assets/projects/atlas/og-image.jpg")
    );
}

#[test]
fn test_image_paths_fall_back_to_placeholder_slug() {
    let mut page = Page::new(project_doc(), env(), PageConfig::default());
    let id = page.attach(ImagePaths);
    assert_eq!(
        page.document().attr(node(&page, "hero"), "src"),
        Some("assets/projects/PROJECT_SLUG/hero.webp")
    );

    // Re-pointing at runtime, an empty slug also falls back
    page.with_behavior::<ImagePaths, _>(id, |_, cx| image_paths::set_image_paths(cx, Some("orbit")));
    assert_eq!(
        page.document().attr(node(&page, "hero"), "src"),
        Some("assets/projects/orbit/hero.webp")
    );
    page.with_behavior::<ImagePaths, _>(id, |_, cx| image_paths::set_image_paths(cx, Some("")));
    assert_eq!(
        page.document().attr(node(&page, "og"), "content"),
        Some("assets/projects/PROJECT_SLUG/og-image.jpg")
    );
}
