//! Copy-to-clipboard buttons.
//!
//! A button with `data-copy="<selector>"` copies the trimmed text of the
//! first element matching the selector. When the clipboard API refuses, the
//! text is copied through a temporary hidden `<textarea>` instead. The button
//! carries `data-copied="true"` for a short while afterwards.

use std::any::Any;

use pagedom::{Element, Event, EventKind, NodeId, TimerId};

use super::select_all;
use crate::behavior::{Behavior, Dispatch};
use crate::runtime::Context;

#[derive(Debug, Clone, Copy)]
struct CopyButton {
    button: NodeId,
    source: NodeId,
    feedback: Option<TimerId>,
}

#[derive(Debug, Default)]
pub struct CopyButtons {
    buttons: Vec<CopyButton>,
}

impl CopyButtons {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buttons whose source element was found.
    pub fn buttons(&self) -> Vec<NodeId> {
        self.buttons.iter().map(|b| b.button).collect()
    }

    fn copy(&mut self, index: usize, cx: &mut Context<'_>) {
        let CopyButton { button, source, .. } = self.buttons[index];
        let text = cx.document().text_content(source).trim().to_string();

        if let Err(err) = cx.clipboard().write_text(&text) {
            log::debug!("[copy] {err}, using fallback");
            fallback_copy(cx, &text);
        }

        // Restart the feedback window on repeated clicks
        if let Some(timer) = self.buttons[index].feedback.take() {
            cx.clear_timeout(timer);
        }
        cx.document_mut().set_attr(button, "data-copied", "true");
        let delay = cx.config().copy_feedback;
        self.buttons[index].feedback = Some(cx.set_timeout(delay, index as u64));
    }
}

/// Copy through a selected, invisible, read-only text field.
fn fallback_copy(cx: &mut Context<'_>, text: &str) {
    let body = cx.document().body();
    let field = cx.document_mut().append(
        body,
        Element::new("textarea")
            .attr("readonly", "")
            .attr("value", text)
            .text(text),
    );
    cx.document_mut().set_opacity(field, 0.0);
    if !cx.clipboard().copy_selection(text) {
        log::debug!("[copy] fallback copy refused");
    }
    cx.document_mut().destroy(field);
}

impl Behavior for CopyButtons {
    fn name(&self) -> &'static str {
        "copy"
    }

    fn attach(&mut self, cx: &mut Context<'_>) {
        for button in select_all(cx, "[data-copy]") {
            let selector = cx
                .document()
                .attr(button, "data-copy")
                .unwrap_or_default()
                .to_string();
            if selector.is_empty() {
                continue;
            }
            let Some(&source) = select_all(cx, &selector).first() else {
                log::debug!("[copy] nothing matches {selector:?}");
                continue;
            };

            let index = self.buttons.len();
            cx.add_listener(button, EventKind::Click, index as u64);
            self.buttons.push(CopyButton {
                button,
                source,
                feedback: None,
            });
        }
    }

    fn on_event(&mut self, dispatch: &Dispatch, cx: &mut Context<'_>) {
        let index = dispatch.token as usize;
        if matches!(dispatch.event, Event::Click { .. }) && index < self.buttons.len() {
            self.copy(index, cx);
        }
    }

    fn on_timer(&mut self, token: u64, cx: &mut Context<'_>) {
        let Some(entry) = self.buttons.get_mut(token as usize) else {
            return;
        };
        entry.feedback = None;
        let button = entry.button;
        cx.document_mut().remove_attr(button, "data-copied");
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
