use std::any::Any;

use chrono::Datelike;

use crate::behavior::Behavior;
use crate::runtime::Context;

/// Writes the current year into `#year`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FooterYear;

impl Behavior for FooterYear {
    fn name(&self) -> &'static str {
        "footer-year"
    }

    fn attach(&mut self, cx: &mut Context<'_>) {
        let Some(year) = cx.document().get_element_by_id("year") else {
            return;
        };
        let text = cx.env().today.year().to_string();
        cx.document_mut().set_text(year, text);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
