mod enums;
mod style;

pub use enums::{Height, Overflow, ScrollBehavior};
pub use style::Style;
