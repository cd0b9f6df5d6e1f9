//! What the page knows about its host: location, preferences and capabilities.

use chrono::NaiveDate;
use pagedom::Viewport;
use url::Url;

/// Host environment a [`Page`](crate::Page) runs in.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    /// Current page URL; its origin decides which links are internal.
    pub location: Url,
    /// `prefers-reduced-motion: reduce`
    pub reduced_motion: bool,
    /// Whether intersection observers are available.
    pub intersection_observer: bool,
    /// Whether the host supports view transitions for navigation.
    pub view_transitions: bool,
    pub viewport: Viewport,
    /// Local date, used for the footer year.
    pub today: NaiveDate,
}

impl Environment {
    pub fn new(location: Url) -> Self {
        Self {
            location,
            reduced_motion: false,
            intersection_observer: true,
            view_transitions: false,
            viewport: Viewport::default(),
            today: chrono::Local::now().date_naive(),
        }
    }

    /// Environment for a page at `location`.
    pub fn at(location: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(location)?))
    }

    pub fn reduced_motion(mut self, enabled: bool) -> Self {
        self.reduced_motion = enabled;
        self
    }

    pub fn intersection_observer(mut self, supported: bool) -> Self {
        self.intersection_observer = supported;
        self
    }

    pub fn view_transitions(mut self, supported: bool) -> Self {
        self.view_transitions = supported;
        self
    }

    pub fn viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Viewport::new(width, height);
        self
    }

    pub fn today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}
