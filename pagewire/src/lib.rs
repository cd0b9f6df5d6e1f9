//! Client-side enhancements for a static site, run against a headless page.
//!
//! A [`Page`] owns a [`pagedom::Document`] together with a virtual clock,
//! viewport, clipboard and location. [`Behavior`]s attach to it and turn
//! clicks, scrolls and transition ends into document mutations.
//!
//! ```ignore
//! let mut page = Page::new(doc, Environment::at("https://example.com/")?, PageConfig::default());
//! let faq = page.attach(AccordionController::new());
//! page.click(summary);
//! page.run_until_idle(Duration::from_secs(1));
//! ```

pub mod behavior;
pub mod behaviors;
pub mod clipboard;
pub mod config;
pub mod env;
pub mod runtime;

pub use behavior::{Behavior, BehaviorId, Dispatch};
pub use behaviors::AccordionController;
pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard};
pub use config::{ConfigError, PageConfig};
pub use env::Environment;
pub use runtime::{Context, Navigation, NavigationKind, ObserverId, Page, FRAME};
