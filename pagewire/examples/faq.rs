use std::error::Error;
use std::fs::File;
use std::time::Duration;

use pagedom::{Document, Element, Height};
use pagewire::{AccordionController, Environment, Page, PageConfig};
use simplelog::{Config, LevelFilter, WriteLogger};

fn question(id: &str, answer_height: f32, open: bool) -> Element {
    let details = Element::new("details")
        .id(id)
        .child(Element::new("summary").id(format!("{id}-summary")).intrinsic_height(48.0))
        .child(Element::new("p").intrinsic_height(answer_height));
    if open {
        details.attr("open", "")
    } else {
        details
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Set up file logging
    let log_file = File::create("faq.log")?;
    WriteLogger::init(LevelFilter::Trace, Config::default(), log_file)?;

    let doc = Document::with_body([Element::new("section").id("faq").children([
        question("shipping", 120.0, false),
        question("returns", 80.0, true),
    ])]);
    let env = Environment::at("https://example.com/faq.html")?;
    let mut page = Page::new(doc, env, PageConfig::default());
    let faq = page.attach(AccordionController::new());

    let summary = page.element("shipping-summary").ok_or("missing summary")?;
    let details = page.element("shipping").ok_or("missing details")?;
    let panel = page
        .behavior::<AccordionController>(faq)
        .and_then(|a| a.panel(details))
        .ok_or("shipping was not initialized")?;

    page.click(summary);
    while !page.is_idle() {
        page.tick(Duration::from_millis(16));
        let height = page.layout().rendered_height(panel);
        println!("{:>5?}  {height:>6.1}px", page.now());
    }

    let settled = page.document().height(panel);
    println!("settled at {settled}");
    assert_eq!(settled, Height::Auto);
    Ok(())
}
