//! Project pages reference their images by slug-relative paths.

use std::any::Any;

use super::select_all;
use crate::behavior::Behavior;
use crate::runtime::Context;

/// Placeholder slug left in the project page template.
pub const DEFAULT_SLUG: &str = "PROJECT_SLUG";

/// Point `img[data-slug]` sources and the Open Graph image at
/// `assets/projects/<slug>/`. An empty or missing slug uses [`DEFAULT_SLUG`].
pub fn set_image_paths(cx: &mut Context<'_>, slug: Option<&str>) {
    let slug = slug.filter(|s| !s.is_empty()).unwrap_or(DEFAULT_SLUG);
    let base = format!("assets/projects/{slug}/");

    for img in select_all(cx, "img[data-slug]") {
        let relative = cx
            .document()
            .attr(img, "data-slug")
            .unwrap_or_default()
            .to_string();
        if relative.is_empty() {
            continue;
        }
        cx.document_mut().set_attr(img, "src", format!("{base}{relative}"));
    }

    if let Some(&og) = select_all(cx, r#"meta[property="og:image"]"#).first() {
        cx.document_mut()
            .set_attr(og, "content", format!("{base}og-image.jpg"));
    }
    log::debug!("[image-paths] base {base}");
}

/// Applies [`set_image_paths`] with the configured project slug on attach.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImagePaths;

impl Behavior for ImagePaths {
    fn name(&self) -> &'static str {
        "image-paths"
    }

    fn attach(&mut self, cx: &mut Context<'_>) {
        let slug = cx.config().project_slug.clone();
        set_image_paths(cx, slug.as_deref());
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
