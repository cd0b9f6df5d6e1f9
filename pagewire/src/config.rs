//! Page configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tunables shared by every behavior on a page.
///
/// Defaults match the site's stylesheet and scripts. Load overrides from JSON
/// with [`PageConfig::from_json`]; missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    /// Viewport width at and above which the desktop layout applies.
    pub desktop_breakpoint: f32,

    /// Space left above an anchor target on desktop (fixed header).
    pub desktop_scroll_offset: f32,

    /// Space left above an anchor target below the breakpoint.
    pub mobile_scroll_offset: f32,

    /// Duration of a smooth scroll.
    #[serde(with = "millis")]
    pub smooth_scroll_duration: Duration,

    /// Scroll offset past which the back-to-top button shows.
    pub back_to_top_threshold: f32,

    /// How long a counter takes to reach its target.
    #[serde(with = "millis")]
    pub counter_duration: Duration,

    /// How long a copy button keeps its `data-copied` flag.
    #[serde(with = "millis")]
    pub copy_feedback: Duration,

    /// Overlay fade time before navigating when view transitions are unavailable.
    #[serde(with = "millis")]
    pub navigation_delay: Duration,

    /// Delay before the second scroll-to-top after load.
    #[serde(with = "millis")]
    pub scroll_reset_retry: Duration,

    /// Selector of the element holding the FAQ `<details>` widgets.
    pub accordion_root: String,

    /// Height transition applied to panels the accordion creates.
    /// Zero means panels never report a finished transition.
    #[serde(with = "millis")]
    pub accordion_transition: Duration,

    /// Force a toggle to settle if its transition never reports completion.
    /// None keeps the panel pinned until the next toggle.
    #[serde(with = "millis_opt")]
    pub accordion_settle_timeout: Option<Duration>,

    /// Project slug used to build image paths. Falls back to `PROJECT_SLUG`.
    pub project_slug: Option<String>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            desktop_breakpoint: 1024.0,
            desktop_scroll_offset: 40.0,
            mobile_scroll_offset: 96.0,
            smooth_scroll_duration: Duration::from_millis(400),
            back_to_top_threshold: 500.0,
            counter_duration: Duration::from_millis(2000),
            copy_feedback: Duration::from_millis(1500),
            navigation_delay: Duration::from_millis(300),
            scroll_reset_retry: Duration::from_millis(50),
            accordion_root: "#faq".to_string(),
            accordion_transition: Duration::from_millis(300),
            accordion_settle_timeout: None,
            project_slug: None,
        }
    }
}

impl PageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON config. Unknown keys are rejected.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn accordion_root(mut self, selector: impl Into<String>) -> Self {
        self.accordion_root = selector.into();
        self
    }

    pub fn accordion_transition(mut self, duration: Duration) -> Self {
        self.accordion_transition = duration;
        self
    }

    pub fn accordion_settle_timeout(mut self, timeout: Duration) -> Self {
        self.accordion_settle_timeout = Some(timeout);
        self
    }

    pub fn smooth_scroll_duration(mut self, duration: Duration) -> Self {
        self.smooth_scroll_duration = duration;
        self
    }

    pub fn counter_duration(mut self, duration: Duration) -> Self {
        self.counter_duration = duration;
        self
    }

    pub fn project_slug(mut self, slug: impl Into<String>) -> Self {
        self.project_slug = Some(slug.into());
        self
    }

    /// Offset left above a scroll target at the given viewport width.
    pub fn scroll_offset(&self, viewport_width: f32) -> f32 {
        if self.is_desktop(viewport_width) {
            self.desktop_scroll_offset
        } else {
            self.mobile_scroll_offset
        }
    }

    pub fn is_desktop(&self, viewport_width: f32) -> bool {
        viewport_width >= self.desktop_breakpoint
    }
}

/// Errors from loading a [`PageConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid page config: {0}")]
    Json(#[from] serde_json::Error),
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

mod millis_opt {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<u64>::deserialize(deserializer).map(|v| v.map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_offset_switches_at_breakpoint() {
        let config = PageConfig::default();
        assert_eq!(config.scroll_offset(1024.0), 40.0);
        assert_eq!(config.scroll_offset(1023.0), 96.0);
    }
}
