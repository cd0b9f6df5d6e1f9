use std::any::Any;
use std::time::Duration;

use pagedom::{Document, Element, Event, EventKind, Height, NodeId};
use pagewire::{
    Behavior, BehaviorId, ConfigError, Context, Dispatch, Environment, NavigationKind, Page,
    PageConfig,
};

fn env() -> Environment {
    Environment::at("https://example.com/docs/index.html").unwrap()
}

fn node(page: &Page, id: &str) -> NodeId {
    page.element(id).unwrap()
}

/// Records what reaches it, optionally cancelling clicks.
#[derive(Default)]
struct Recorder {
    target: String,
    prevent: bool,
    seen: Vec<(u64, Event)>,
    frames: Vec<(u64, Duration)>,
    timers: Vec<(u64, Duration)>,
}

impl Recorder {
    fn on(target: &str) -> Self {
        Self {
            target: target.to_string(),
            ..Default::default()
        }
    }
}

impl Behavior for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn attach(&mut self, cx: &mut Context<'_>) {
        if let Some(target) = cx.document().get_element_by_id(&self.target) {
            cx.add_listener(target, EventKind::Click, 1);
        }
        cx.add_window_listener(EventKind::Click, 2);
    }

    fn on_event(&mut self, dispatch: &Dispatch, cx: &mut Context<'_>) {
        self.seen.push((dispatch.token, dispatch.event));
        if self.prevent {
            cx.prevent_default();
        }
        if dispatch.token == 1 {
            cx.request_frame(10);
            cx.set_timeout(Duration::from_millis(40), 20);
        }
    }

    fn on_frame(&mut self, token: u64, cx: &mut Context<'_>) {
        self.frames.push((token, cx.now()));
    }

    fn on_timer(&mut self, token: u64, cx: &mut Context<'_>) {
        self.timers.push((token, cx.now()));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn doc() -> Document {
    Document::with_body([
        Element::div().id("card").intrinsic_height(100.0).child(
            Element::a("guide.html#setup")
                .id("link")
                .child(Element::new("span").id("label")),
        ),
        Element::a("#later").id("jump"),
        Element::new("details").id("details").child(Element::new("summary").id("summary")),
        Element::new("section").id("later").intrinsic_height(400.0),
        Element::div().intrinsic_height(2000.0),
    ])
}

fn recorder(page: &Page, id: BehaviorId) -> &Recorder {
    page.behavior::<Recorder>(id).unwrap()
}

// ============================================================================
// Dispatch Tests
// ============================================================================

#[test]
fn test_click_bubbles_target_first() {
    let mut page = Page::new(doc(), env(), PageConfig::default());
    let id = page.attach(Recorder::on("card"));

    let label = node(&page, "label");
    page.click(label);
    let tokens: Vec<u64> = recorder(&page, id).seen.iter().map(|(t, _)| *t).collect();
    assert_eq!(tokens, vec![1, 2]);
    assert!(matches!(
        recorder(&page, id).seen[0].1,
        Event::Click { target, .. } if target == label
    ));
}

#[test]
fn test_unprevented_link_click_navigates() {
    let mut page = Page::new(doc(), env(), PageConfig::default());
    page.attach(Recorder::on("card"));

    assert!(page.click(node(&page, "label")));
    let navigation = &page.navigations()[0];
    assert_eq!(
        navigation.url.as_str(),
        "https://example.com/docs/guide.html#setup"
    );
    assert_eq!(navigation.kind, NavigationKind::Direct);
}

#[test]
fn test_prevented_click_skips_default_action() {
    let mut page = Page::new(doc(), env(), PageConfig::default());
    let mut recorder = Recorder::on("card");
    recorder.prevent = true;
    page.attach(recorder);

    assert!(!page.click(node(&page, "link")));
    assert!(page.navigations().is_empty());
    assert_eq!(page.location().path(), "/docs/index.html");
}

#[test]
fn test_fragment_link_jumps_in_document() {
    let mut page = Page::new(doc(), env(), PageConfig::default());
    assert!(page.click(node(&page, "jump")));
    assert_eq!(page.location().fragment(), Some("later"));
    assert!(page.navigations().is_empty());
    assert_eq!(page.viewport().scroll_y, 100.0);
}

#[test]
fn test_summary_click_toggles_details_natively() {
    let mut page = Page::new(doc(), env(), PageConfig::default());
    let details = node(&page, "details");
    page.click(node(&page, "summary"));
    assert!(page.document().has_attr(details, "open"));
    page.click(node(&page, "summary"));
    assert!(!page.document().has_attr(details, "open"));
}

// ============================================================================
// Clock Tests
// ============================================================================

#[test]
fn test_frames_run_on_next_tick_and_timers_when_due() {
    let mut page = Page::new(doc(), env(), PageConfig::default());
    let id = page.attach(Recorder::on("card"));
    page.click(node(&page, "card"));
    assert!(!page.is_idle());

    page.tick(Duration::from_millis(16));
    assert_eq!(recorder(&page, id).frames, vec![(10, Duration::from_millis(16))]);
    assert!(recorder(&page, id).timers.is_empty());

    assert!(page.run_until_idle(Duration::from_secs(1)));
    assert_eq!(recorder(&page, id).frames.len(), 1);
    assert_eq!(recorder(&page, id).timers, vec![(20, Duration::from_millis(48))]);
}

#[test]
fn test_run_until_idle_gives_up_at_limit() {
    let mut page = Page::new(doc(), env(), PageConfig::default());
    page.attach(Recorder::on("card"));
    page.click(node(&page, "card"));
    assert!(!page.run_until_idle(Duration::from_millis(20)));
    assert!(page.run_until_idle(Duration::from_millis(100)));
}

#[test]
fn test_scroll_is_clamped_to_document() {
    let mut page = Page::new(doc(), env().viewport(1280.0, 800.0), PageConfig::default());
    page.scroll_to(10_000.0);
    assert_eq!(page.viewport().scroll_y, 2500.0 - 800.0);
    page.scroll_to(-50.0);
    assert_eq!(page.viewport().scroll_y, 0.0);
}

#[test]
fn test_resize_updates_viewport() {
    let mut page = Page::new(doc(), env(), PageConfig::default());
    page.resize(375.0, 667.0);
    assert_eq!(page.viewport().width, 375.0);
    assert!(!page.config().is_desktop(page.viewport().width));
}

#[test]
fn test_document_mutations_from_outside_are_flushed() {
    let mut page = Page::new(doc(), env(), PageConfig::default());
    let later = node(&page, "later");
    page.document_mut().set_height(later, Height::Px(50.0));
    page.tick(Duration::from_millis(16));
    assert_eq!(page.layout().rendered_height(later), 50.0);
    assert!(page.is_idle());
}

// ============================================================================
// Setup Tests
// ============================================================================

#[test]
fn test_standard_behaviors_attach_to_any_page() {
    let mut page = Page::new(doc(), env(), PageConfig::default());
    let ids = page.attach_standard();
    assert_eq!(ids.len(), 13);
    page.load();
    assert!(page.run_until_idle(Duration::from_secs(1)));
}

#[test]
fn test_config_from_json_overrides_defaults() {
    let config = PageConfig::from_json(
        r##"{
            "desktop_breakpoint": 900,
            "accordion_root": "#questions",
            "accordion_settle_timeout": 450,
            "project_slug": "atlas"
        }"##,
    )
    .unwrap();

    assert_eq!(config.desktop_breakpoint, 900.0);
    assert_eq!(config.accordion_root, "#questions");
    assert_eq!(config.accordion_settle_timeout, Some(Duration::from_millis(450)));
    assert_eq!(config.project_slug.as_deref(), Some("atlas"));
    assert_eq!(config.accordion_transition, Duration::from_millis(300));
    assert_eq!(config.scroll_offset(950.0), 40.0);
}

#[test]
fn test_config_rejects_unknown_keys() {
    let err = PageConfig::from_json(r#"{ "desktop_breakpiont": 900 }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
    assert!(err.to_string().starts_with("invalid page config"));
}

#[test]
fn test_config_json_round_trip_keeps_millis() {
    let config = PageConfig::default().accordion_settle_timeout(Duration::from_millis(250));
    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["accordion_transition"], 300);
    assert_eq!(json["accordion_settle_timeout"], 250);
    assert_eq!(PageConfig::from_json(&json.to_string()).unwrap(), config);
}
