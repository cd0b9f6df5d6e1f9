//! The page enhancements shipped with the site.

pub mod accordion;
pub mod active_nav;
pub mod anchor_scroll;
pub mod back_to_top;
pub mod copy;
pub mod counter;
pub mod footer_year;
pub mod image_paths;
pub mod mobile_menu;
pub mod page_transition;
pub mod reveal;
pub mod scroll_reset;
pub mod toc;

pub use accordion::{AccordionController, DisclosureWidget, Motion};
pub use active_nav::ActiveNav;
pub use anchor_scroll::AnchorScroll;
pub use back_to_top::BackToTop;
pub use copy::CopyButtons;
pub use counter::Counters;
pub use footer_year::FooterYear;
pub use image_paths::{ImagePaths, DEFAULT_SLUG};
pub use mobile_menu::MobileMenu;
pub use page_transition::PageTransitions;
pub use reveal::Reveal;
pub use scroll_reset::ScrollReset;
pub use toc::TableOfContents;

use pagedom::{NodeId, ScrollBehavior};

use crate::behavior::Behavior;
use crate::runtime::Context;

/// Every behavior in the order the site's scripts set them up.
pub fn standard() -> Vec<Box<dyn Behavior>> {
    vec![
        Box::new(ScrollReset::new()),
        Box::new(FooterYear),
        Box::new(PageTransitions::new()),
        Box::new(BackToTop::new()),
        Box::new(MobileMenu::new()),
        Box::new(AnchorScroll::new()),
        Box::new(ActiveNav::new()),
        Box::new(AccordionController::new()),
        Box::new(Reveal::new()),
        Box::new(Counters::new()),
        Box::new(CopyButtons::new()),
        Box::new(TableOfContents::new()),
        Box::new(ImagePaths),
    ]
}

/// All matches of a selector, or nothing if it does not parse.
pub(crate) fn select_all(cx: &Context<'_>, selector: &str) -> Vec<NodeId> {
    match cx.document().select(selector) {
        Ok(found) => found,
        Err(err) => {
            log::debug!("[behaviors] bad selector {selector:?}: {err}");
            Vec::new()
        }
    }
}

/// Scroll offset that puts `target` just below the fixed header.
pub(crate) fn offset_top(cx: &mut Context<'_>, target: NodeId) -> f32 {
    let viewport = cx.viewport();
    let offset = cx.config().scroll_offset(viewport.width);
    cx.bounding_rect(target).top + viewport.scroll_y - offset
}

/// Smooth unless the user asked for reduced motion.
pub(crate) fn preferred_scroll(cx: &Context<'_>) -> ScrollBehavior {
    if cx.reduced_motion() {
        ScrollBehavior::Auto
    } else {
        ScrollBehavior::Smooth
    }
}

/// The element a `#fragment` href points at.
pub(crate) fn fragment_target(cx: &Context<'_>, href: &str) -> Option<NodeId> {
    let id = href.strip_prefix('#').filter(|id| !id.is_empty())?;
    cx.document().get_element_by_id(id)
}
